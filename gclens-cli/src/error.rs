//! CLI-specific error types and exit code mapping

use gclens_core::error::GclensError;
use gclens_gc_parser::GcLogError;

/// CLI-specific error type.
///
/// Each variant carries enough context for a user-friendly message.
/// The `exit_code()` method maps errors to standard Unix exit codes.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Configuration loading or validation failure.
    #[error("configuration error: {0}")]
    Config(String),

    /// A subcommand-specific operation failed.
    #[error("{0}")]
    Command(String),

    /// Parser construction failed (bad reference date, grammar compilation).
    #[error("parser error: {0}")]
    Parser(#[from] GcLogError),

    /// One or more input files could not be read.
    #[error("{failed} of {total} files could not be parsed")]
    Input { failed: usize, total: usize },

    /// JSON serialisation failed during output rendering.
    #[error("json output error: {0}")]
    JsonSerialize(#[from] serde_json::Error),

    /// IO error (file read, stdout write, etc.).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Wrapped domain error from gclens-core.
    #[error("{0}")]
    Core(#[from] GclensError),
}

impl CliError {
    /// Map the error to a process exit code.
    ///
    /// | Code | Meaning                              |
    /// |------|--------------------------------------|
    /// | 0    | Success                              |
    /// | 1    | General / command error              |
    /// | 2    | Configuration error                  |
    /// | 3    | Some input files could not be parsed |
    /// | 10   | IO error                             |
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) => 2,
            Self::Parser(GcLogError::Config { .. }) => 2,
            Self::Core(GclensError::Config(_)) => 2,
            Self::Input { .. } => 3,
            Self::Io(_) => 10,
            Self::Parser(_) | Self::JsonSerialize(_) | Self::Command(_) | Self::Core(_) => 1,
        }
    }
}
