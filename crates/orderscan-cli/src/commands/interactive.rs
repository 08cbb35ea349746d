//! Interactive command - pick a file, analyze, export, repeat.
//!
//! Failures are shown and the loop carries on, so the user can fix the cause
//! (wrong file, missing key, bad answer) and try again. The config file is
//! read again before every run, so `orderscan config set` from another shell
//! takes effect without restarting the session.

use std::path::{Path, PathBuf};

use console::style;
use dialoguer::{Confirm, Input};
use tracing::debug;

use orderscan_core::export::write_csv;
use orderscan_core::{Session, SourceDocument};

use super::analyze::{build_analyzer, print_answer, print_details, spinner};

pub async fn run(config_path: Option<&str>) -> anyhow::Result<()> {
    // Fail early on a broken config file
    super::config::load(config_path)?;
    let mut session = Session::new();

    println!("{}", style("Order analysis").bold().cyan());
    println!("Enter the path of a PDF, CSV or XLSX order file. Leave empty to quit.");
    println!();

    loop {
        let input: String = Input::new()
            .with_prompt("Order file")
            .allow_empty(true)
            .interact_text()?;

        let input = input.trim();
        if input.is_empty() {
            break;
        }

        match SourceDocument::from_path(Path::new(input)) {
            Ok(document) => {
                let info = session.load_document(document);
                print_details(&info);
            }
            Err(e) => {
                report_error(&e.to_string());
                continue;
            }
        }

        let proceed = Confirm::new()
            .with_prompt("Run analysis?")
            .default(true)
            .interact()?;
        if !proceed {
            continue;
        }

        if let Err(e) = analyze_and_export(&mut session, config_path).await {
            report_error(&e.to_string());
        }
    }

    println!("Bye.");
    Ok(())
}

async fn analyze_and_export(session: &mut Session, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = super::config::load(config_path)?;
    let analyzer = build_analyzer(&config)?;

    let pb = spinner("Analyzing order...");
    let result = session.analyze(&analyzer).await;
    pb.finish_and_clear();
    let report = result?;

    print_answer(report);

    let Some(table) = &report.table else {
        let reason = report.parse_error.as_deref().unwrap_or("no table found");
        report_error(&format!("Nothing to export: {}", reason));
        return Ok(());
    };

    println!("{} {} order lines parsed", style("✓").green(), table.len());

    let export = Confirm::new()
        .with_prompt("Export as CSV?")
        .default(true)
        .interact()?;
    if !export {
        return Ok(());
    }

    let file_name: String = Input::new()
        .with_prompt("Save as")
        .default(config.export.file_name.clone())
        .interact_text()?;

    let path = PathBuf::from(file_name.trim());
    write_csv(table, &path, config.export.bom)?;
    println!("{} Saved to {}", style("✓").green(), path.display());

    Ok(())
}

fn report_error(message: &str) {
    debug!("{}", message);
    eprintln!("{} {}", style("✗").red(), message);
}
