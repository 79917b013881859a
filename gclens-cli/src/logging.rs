//! Diagnostic logging for gclens.
//!
//! Parser warnings (flushed fragments, oversized buffers) and command progress
//! go to stderr; stdout is reserved for rendered reports. The level from
//! `[general]` applies to gclens crates only, dependencies stay at `warn`.
//! `RUST_LOG` replaces the computed filter entirely.

use std::io::IsTerminal;

use anyhow::{Context, Result, bail};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use gclens_core::config::GeneralConfig;

use crate::cli::LogFormat;

/// Log targets owned by this workspace.
const GCLENS_TARGETS: [&str; 3] = ["gclens", "gclens_core", "gclens_gc_parser"];

/// Filter directives for `level`: gclens targets at `level`, everything else at `warn`.
pub fn filter_directives(level: &str) -> String {
    std::iter::once("warn".to_owned())
        .chain(GCLENS_TARGETS.iter().map(|target| format!("{target}={level}")))
        .collect::<Vec<_>>()
        .join(",")
}

/// Pick the log format: the CLI flag wins over `general.log_format`.
pub fn resolve_format(config: &GeneralConfig, flag: Option<LogFormat>) -> Result<LogFormat> {
    if let Some(format) = flag {
        return Ok(format);
    }
    match config.log_format.as_str() {
        "json" => Ok(LogFormat::Json),
        "pretty" => Ok(LogFormat::Pretty),
        other => bail!("unknown log format '{other}', expected 'json' or 'pretty'"),
    }
}

fn build_filter(level: &str) -> Result<EnvFilter> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    EnvFilter::try_new(filter_directives(level))
        .with_context(|| format!("invalid log level '{level}'"))
}

/// Install the global subscriber. Call once, before the first command runs.
pub fn init_tracing(config: &GeneralConfig, flag: Option<LogFormat>) -> Result<()> {
    let format = resolve_format(config, flag)?;
    let registry = tracing_subscriber::registry().with(build_filter(&config.log_level)?);

    let installed = match format {
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .try_init(),
        LogFormat::Pretty => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .pretty()
                    .with_ansi(std::io::stderr().is_terminal())
                    .with_writer(std::io::stderr),
            )
            .try_init(),
    };
    installed.with_context(|| format!("failed to initialize {format:?} tracing subscriber"))
}
