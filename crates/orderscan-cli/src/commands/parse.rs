//! Parse command - convert a saved model answer without calling the API.

use std::fs;
use std::path::PathBuf;

use clap::Args;
use tracing::info;

use orderscan_core::{MarkdownTableParser, TableParser};

use super::output::{self, OutputFormat};

/// Arguments for the parse command.
#[derive(Args)]
pub struct ParseArgs {
    /// Text file holding the model answer
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: configured export file for CSV, stdout otherwise)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "csv")]
    format: OutputFormat,
}

pub fn run(args: ParseArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = super::config::load(config_path)?;

    let text = fs::read_to_string(&args.input)
        .map_err(|e| anyhow::anyhow!("Cannot read {}: {}", args.input.display(), e))?;

    let parser = MarkdownTableParser::from_config(&config.table);

    let table = parser.parse(&text)?;
    info!("Parsed {} rows from {}", table.len(), args.input.display());

    let destination = args
        .output
        .or_else(|| output::default_destination(args.format, &config));
    output::emit(&table, args.format, destination.as_deref(), &config)
}
