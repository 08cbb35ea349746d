//! Analyze command - extract order lines from a single file.

use std::path::PathBuf;
use std::time::Duration;

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use orderscan_core::{
    AnalysisReport, AppConfig, ChatClient, DocumentInfo, DocumentKind, OrderAnalyzer, SourceDocument,
};

use super::output::{self, OutputFormat};

/// Arguments for the analyze command.
#[derive(Args)]
pub struct AnalyzeArgs {
    /// Order file (PDF, CSV or XLSX)
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: configured export file for CSV, stdout otherwise)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "csv")]
    format: OutputFormat,

    /// Treat the file as this MIME type instead of guessing from its extension
    #[arg(long)]
    mime: Option<String>,

    /// Fail when the model answer holds no usable table
    #[arg(long)]
    strict: bool,

    /// Do not print the model answer
    #[arg(short, long)]
    quiet: bool,
}

pub async fn run(args: AnalyzeArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = super::config::load(config_path)?;

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    let document = read_document(&args)?;
    print_details(&document.info());

    let analyzer = build_analyzer(&config)?;

    info!("Analyzing {}", args.input.display());
    let pb = spinner("Analyzing order...");
    let result = analyzer.analyze(&document).await;
    pb.finish_and_clear();
    let report = result?;

    debug!("Analysis took {}ms", report.elapsed_ms);

    if !args.quiet {
        print_answer(&report);
    }

    match &report.table {
        Some(table) => {
            let destination = args
                .output
                .clone()
                .or_else(|| output::default_destination(args.format, &config));
            output::emit(table, args.format, destination.as_deref(), &config)?;
        }
        None => {
            let reason = report.parse_error.as_deref().unwrap_or("no table found");
            if args.strict {
                anyhow::bail!("Model answer could not be converted: {}", reason);
            }
            eprintln!(
                "{} Nothing to export: {}",
                style("✗").red(),
                reason
            );
        }
    }

    Ok(())
}

fn read_document(args: &AnalyzeArgs) -> anyhow::Result<SourceDocument> {
    match &args.mime {
        Some(mime) => {
            let data = std::fs::read(&args.input)?;
            let name = args
                .input
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| args.input.display().to_string());
            Ok(SourceDocument::new(name, DocumentKind::from_mime(mime), data))
        }
        None => Ok(SourceDocument::from_path(&args.input)?),
    }
}

/// Build an analyzer from the configuration.
///
/// Fails with a user-facing message when no API key is configured.
pub fn build_analyzer(config: &AppConfig) -> anyhow::Result<OrderAnalyzer<ChatClient>> {
    let api_key = config.resolve_api_key().ok_or_else(|| {
        anyhow::anyhow!(
            "API key not set. Set the {} environment variable or llm.api_key in the config file.",
            config.llm.api_key_env
        )
    })?;

    let client = ChatClient::new(api_key, &config.llm)?;
    Ok(OrderAnalyzer::new(client).with_table_config(&config.table))
}

/// Spinner shown while waiting on the API.
pub fn spinner(message: &'static str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message);
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

// Details and the model answer go to stderr; stdout carries only the exported table.

/// Print the file details block.
pub fn print_details(info: &DocumentInfo) {
    eprintln!("{}", style("Input").bold());
    eprintln!("  File name: {}", info.name);
    eprintln!("  File type: {}", info.mime_type);
    eprintln!("  File size: {} bytes", info.size);
    eprintln!();
}

/// Print the model answer.
pub fn print_answer(report: &AnalysisReport) {
    eprintln!("{}", style("Output").bold());
    eprintln!("{}", report.raw_response.trim_end());
    eprintln!();
}
