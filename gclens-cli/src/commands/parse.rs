//! `gclens parse` command handler

use std::fs::File;
use std::io::{BufReader, Write};
use std::path::Path;
use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};

use gclens_core::config::GclensConfig;
use gclens_core::types::UnidentifiedLine;
use gclens_gc_parser::{GcLogError, GcLogParser, ParsedRun, RunSummary};

use crate::cli::ParseArgs;
use crate::commands::parser_config;
use crate::error::CliError;
use crate::output::{OutputWriter, Render};

/// Execute the `parse` command.
///
/// Each file is parsed on its own blocking task; reports keep argument order.
pub async fn execute(
    args: ParseArgs,
    config: &GclensConfig,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    let parser_config = parser_config(&config.parser, args.reference_date, args.vm_options)?;
    let parser = Arc::new(GcLogParser::new(parser_config)?);
    let total = args.files.len();

    info!(files = total, "parsing gc logs");

    let mut handles = Vec::with_capacity(total);
    for path in args.files {
        let parser = Arc::clone(&parser);
        handles.push(tokio::task::spawn_blocking(move || {
            let result = parse_file(&parser, &path);
            (path, result)
        }));
    }

    let mut files = Vec::with_capacity(total);
    for handle in handles {
        let (path, result) = handle
            .await
            .map_err(|e| CliError::Command(format!("parse task failed: {e}")))?;
        if let Err(ref e) = result {
            warn!(path = %path.display(), error = %e, "failed to parse gc log");
        }
        files.push(FileReport::new(&path, result, args.show_unidentified));
    }

    let failed = files.iter().filter(|f| f.error.is_some()).count();
    writer.render(&ParseReport { files })?;

    if failed > 0 {
        return Err(CliError::Input { failed, total });
    }
    Ok(())
}

fn parse_file(parser: &GcLogParser, path: &Path) -> Result<ParsedRun, GcLogError> {
    let file = File::open(path)?;
    parser.parse_reader(BufReader::new(file))
}

/// Report for the whole `parse` invocation.
#[derive(Serialize)]
pub struct ParseReport {
    pub files: Vec<FileReport>,
}

/// Per-file parse result.
#[derive(Serialize)]
pub struct FileReport {
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<RunSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vm_options: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub unidentified: Vec<UnidentifiedLine>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl FileReport {
    fn new(path: &Path, result: Result<ParsedRun, GcLogError>, show_unidentified: bool) -> Self {
        let path = path.display().to_string();
        match result {
            Ok(run) => Self {
                path,
                summary: Some(run.summary()),
                vm_options: run.vm_options().map(str::to_owned),
                unidentified: if show_unidentified {
                    run.unidentified
                } else {
                    Vec::new()
                },
                error: None,
            },
            Err(e) => Self {
                path,
                summary: None,
                vm_options: None,
                unidentified: Vec::new(),
                error: Some(e.to_string()),
            },
        }
    }
}

impl Render for ParseReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        for (i, file) in self.files.iter().enumerate() {
            if i > 0 {
                writeln!(w)?;
            }
            file.render_text(w)?;
        }
        Ok(())
    }
}

impl Render for FileReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        writeln!(w, "{}", self.path.bold())?;

        if let Some(ref error) = self.error {
            writeln!(w, "  Error: {}", error.red())?;
            return Ok(());
        }
        let Some(ref summary) = self.summary else {
            return Ok(());
        };

        writeln!(
            w,
            "  Lines: {} read, {} canonical",
            summary.lines_read, summary.canonical_lines
        )?;
        let unidentified = if summary.unidentified > 0 {
            summary.unidentified.to_string().yellow()
        } else {
            summary.unidentified.to_string().green()
        };
        writeln!(
            w,
            "  Events: {}  Unidentified: {}",
            summary.events, unidentified
        )?;
        if let (Some(first), Some(last)) = (summary.first_timestamp_ms, summary.last_timestamp_ms) {
            writeln!(w, "  Span: {} ms .. {} ms", first, last)?;
        }
        writeln!(
            w,
            "  Pauses: {} ms total, {} ms max",
            summary.total_pause_ms, summary.max_pause_ms
        )?;
        if let Some(ref options) = self.vm_options {
            writeln!(w, "  VM options: {}", options)?;
        }

        if !summary.kinds.is_empty() {
            writeln!(w)?;
            writeln!(w, "  {:<32} {:>8}", "KIND", "COUNT")?;
            writeln!(w, "  {}", "-".repeat(41))?;
            for (kind, count) in &summary.kinds {
                writeln!(w, "  {:<32} {:>8}", kind.as_str(), count)?;
            }
        }

        if !self.unidentified.is_empty() {
            writeln!(w)?;
            writeln!(w, "  {}", "Unidentified lines:".yellow())?;
            for line in &self.unidentified {
                match line.reason {
                    Some(ref reason) => {
                        writeln!(w, "  {:>6}: {} ({})", line.line_number, line.raw_text, reason)?
                    }
                    None => writeln!(w, "  {:>6}: {}", line.line_number, line.raw_text)?,
                }
            }
        }

        Ok(())
    }
}
