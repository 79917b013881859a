//! Command handlers -- one module per subcommand

pub mod config;
pub mod parse;
pub mod preprocess;

use std::path::Path;

use gclens_core::config::{GclensConfig, ParserSettings};
use gclens_gc_parser::ParserConfig;

use crate::error::CliError;

/// Load the effective configuration for commands that operate on logs.
///
/// A missing file is not an error here: defaults plus `GCLENS_*` overrides apply.
/// A present but invalid file is.
pub async fn load_config(path: &Path) -> Result<GclensConfig, CliError> {
    if tokio::fs::try_exists(path).await? {
        return Ok(GclensConfig::load(path).await?);
    }
    let mut config = GclensConfig::default();
    config.apply_env_overrides();
    config.validate()?;
    Ok(config)
}

/// Build the parser configuration, letting command-line values win over the file.
pub fn parser_config(
    settings: &ParserSettings,
    reference_date: Option<String>,
    vm_options: Option<String>,
) -> Result<ParserConfig, CliError> {
    let mut settings = settings.clone();
    if reference_date.is_some() {
        settings.reference_date = reference_date;
    }
    if vm_options.is_some() {
        settings.vm_options = vm_options;
    }
    Ok(ParserConfig::from_core(&settings)?)
}
