//! `gclens preprocess` command handler

use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::Path;

use serde::Serialize;
use tracing::info;

use gclens_core::config::GclensConfig;
use gclens_gc_parser::{CanonicalLine, GcLogError, ParserConfig, Preprocessor};

use crate::cli::PreprocessArgs;
use crate::commands::parser_config;
use crate::error::CliError;
use crate::output::{OutputWriter, Render};

/// Execute the `preprocess` command.
pub async fn execute(
    args: PreprocessArgs,
    config: &GclensConfig,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    let parser_config = parser_config(&config.parser, args.reference_date, None)?;
    let path = args.file;
    let source = path.display().to_string();

    let lines = tokio::task::spawn_blocking(move || preprocess_file(&parser_config, &path))
        .await
        .map_err(|e| CliError::Command(format!("preprocess task failed: {e}")))??;

    info!(path = %source, lines = lines.len(), "preprocessed gc log");

    writer.render(&PreprocessReport { source, lines })?;
    Ok(())
}

fn preprocess_file(config: &ParserConfig, path: &Path) -> Result<Vec<CanonicalLine>, GcLogError> {
    let reader = BufReader::new(File::open(path)?);
    let mut preprocessor = Preprocessor::new(config)?;
    let mut lines = Vec::new();
    for line in reader.lines() {
        lines.extend(preprocessor.push(&line?));
    }
    lines.extend(preprocessor.finish());
    Ok(lines)
}

/// Canonical lines of one file.
#[derive(Serialize)]
pub struct PreprocessReport {
    pub source: String,
    pub lines: Vec<CanonicalLine>,
}

impl Render for PreprocessReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        for line in &self.lines {
            writeln!(w, "{:>6}  {}", line.line_number, line.text)?;
        }
        Ok(())
    }
}
