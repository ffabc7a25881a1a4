//! Preview command - show detected invoice numbers without splitting.

use std::fs;
use std::path::PathBuf;

use clap::{Args, ValueEnum};
use console::style;

use taxsplit_core::{preview_document, DocumentPreview};

use super::config::load_config;

/// Arguments for the preview command.
#[derive(Args)]
pub struct PreviewArgs {
    /// Input PDF
    #[arg(required = true)]
    input: PathBuf,

    /// Number of pages to inspect (default from config)
    #[arg(short = 'n', long)]
    pages: Option<usize>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    format: PreviewFormat,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum PreviewFormat {
    /// Aligned columns
    Table,
    /// JSON array
    Json,
}

pub async fn run(args: PreviewArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    let data = fs::read(&args.input)?;
    let max_pages = args.pages.unwrap_or(config.pdf.preview_pages);

    let report = preview_document(&data, max_pages)?;

    match args.format {
        PreviewFormat::Json => println!("{}", serde_json::to_string_pretty(&report.rows)?),
        PreviewFormat::Table => print_table(&report),
    }

    Ok(())
}

fn print_table(report: &DocumentPreview) {
    if report.rows.is_empty() {
        println!("{} No pages to preview.", style("ℹ").blue());
        return;
    }

    println!("{:>4}  {:<20}  {}", "Page", "Invoice No", "Filename");
    for row in &report.rows {
        let number = match &row.invoice_number {
            Some(number) => style(number.clone()).green(),
            None => style("(none)".to_string()).dim(),
        };
        println!("{:>4}  {:<20}  {}", row.page, number, row.filename);
    }

    println!();
    println!(
        "{} {} of {} pages have an invoice number in the text layer.",
        style("ℹ").blue(),
        report.matched_pages,
        report.page_count
    );
    if report.needs_ocr() {
        println!(
            "{} No page has one; a split would use OCR.",
            style("⚠").yellow()
        );
    }
}
