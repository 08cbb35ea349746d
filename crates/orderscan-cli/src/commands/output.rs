//! Rendering and writing of parsed tables.

use std::fs;
use std::path::{Path, PathBuf};

use console::style;

use orderscan_core::export::{to_csv_bytes, to_json};
use orderscan_core::{AppConfig, OrderTable};

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// CSV file (UTF-8 with BOM by default)
    Csv,
    /// JSON array of order lines
    Json,
    /// Markdown table
    Markdown,
}

/// Encode a table in the requested format.
pub fn render(table: &OrderTable, format: OutputFormat, config: &AppConfig) -> anyhow::Result<Vec<u8>> {
    let data = match format {
        OutputFormat::Csv => to_csv_bytes(table, config.export.bom)?,
        OutputFormat::Json => to_json(table)?.into_bytes(),
        OutputFormat::Markdown => table.to_markdown().into_bytes(),
    };
    Ok(data)
}

/// Where a table goes when no output path was given.
///
/// CSV lands in the configured export file; other formats go to stdout.
pub fn default_destination(format: OutputFormat, config: &AppConfig) -> Option<PathBuf> {
    match format {
        OutputFormat::Csv => Some(PathBuf::from(&config.export.file_name)),
        OutputFormat::Json | OutputFormat::Markdown => None,
    }
}

/// Write a table to a file, or to stdout when `path` is `None`.
pub fn emit(
    table: &OrderTable,
    format: OutputFormat,
    path: Option<&Path>,
    config: &AppConfig,
) -> anyhow::Result<()> {
    let data = render(table, format, config)?;

    match path {
        Some(path) => {
            fs::write(path, &data)?;
            println!(
                "{} {} rows written to {}",
                style("✓").green(),
                table.len(),
                path.display()
            );
        }
        None => {
            println!("{}", String::from_utf8_lossy(&data));
        }
    }

    Ok(())
}
