//! Split command - turn a combined PDF into a ZIP of per-invoice pages.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::Local;
use clap::{Args, ValueEnum};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use taxsplit_core::{
    PdfiumRasterizer, SharedRecognizer, SplitOptions, SplitOutcome, Splitter, Strategy,
};

use super::config::load_config;

/// Arguments for the split command.
#[derive(Args)]
pub struct SplitArgs {
    /// Input PDF
    #[arg(required = true)]
    input: PathBuf,

    /// Output ZIP (default: split_pages_<timestamp>.zip)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Leave pages without an invoice number out of the archive
    #[arg(long)]
    skip_unmatched: bool,

    /// Always run OCR, ignoring the text layer
    #[arg(long, conflicts_with = "strategy")]
    force_ocr: bool,

    /// Text source selection
    #[arg(long, value_enum)]
    strategy: Option<StrategyArg>,

    /// Rendering resolution for OCR
    #[arg(long)]
    dpi: Option<u32>,

    /// OCR model directory
    #[arg(short, long)]
    model_dir: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum StrategyArg {
    /// Text layer first, OCR when nothing matches
    Auto,
    /// Text layer only
    TextLayer,
    /// OCR only
    Optical,
}

impl From<StrategyArg> for Strategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::Auto => Strategy::Auto,
            StrategyArg::TextLayer => Strategy::TextLayer,
            StrategyArg::Optical => Strategy::Optical,
        }
    }
}

pub async fn run(args: SplitArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let mut config = load_config(config_path)?;

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }
    if let Some(dir) = &args.model_dir {
        config.models.model_dir = dir.clone();
    }

    let mut options = SplitOptions::from_config(&config);
    if args.skip_unmatched {
        options = options.with_skip_unmatched(true);
    }
    if args.force_ocr {
        options = options.with_strategy(Strategy::Optical);
    } else if let Some(strategy) = args.strategy {
        options = options.with_strategy(strategy.into());
    }
    if let Some(dpi) = args.dpi {
        options = options.with_dpi(dpi);
    }

    let output = args.output.unwrap_or_else(default_output_path);
    info!(
        "Splitting {} into {} ({})",
        args.input.display(),
        output.display(),
        options.strategy
    );

    let data = fs::read(&args.input)?;

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")
            .unwrap(),
    );
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_message("Splitting pages...");

    let outcome = tokio::task::spawn_blocking(move || -> anyhow::Result<SplitOutcome> {
        let rasterizer = match &config.pdfium.library_dir {
            Some(dir) => PdfiumRasterizer::with_library_dir(dir.clone()),
            None => PdfiumRasterizer::new(),
        };
        let recognizer = SharedRecognizer::global(&config.models, &config.ocr);
        Ok(Splitter::new(&rasterizer, recognizer).run(&data, &options)?)
    })
    .await?;

    let outcome = match outcome {
        Ok(outcome) => outcome,
        Err(e) => {
            pb.finish_and_clear();
            return Err(e);
        }
    };

    pb.set_message("Writing archive...");
    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(&output, &outcome.archive)?;
    pb.finish_and_clear();

    debug!("Archive is {} bytes", outcome.archive.len());
    print_summary(&outcome, &output);

    Ok(())
}

fn default_output_path() -> PathBuf {
    PathBuf::from(format!(
        "split_pages_{}.zip",
        Local::now().format("%Y%m%d-%H%M%S")
    ))
}

fn print_summary(outcome: &SplitOutcome, output: &Path) {
    println!(
        "{} Wrote {} files to {}",
        style("✓").green(),
        outcome.entries.len(),
        output.display()
    );
    println!(
        "{} {} of {} pages matched via {} in {}ms",
        style("ℹ").blue(),
        outcome.matched(),
        outcome.page_count,
        outcome.source,
        outcome.processing_time_ms
    );

    if !outcome.skipped.is_empty() {
        let pages: Vec<String> = outcome.skipped.iter().map(|p| p.to_string()).collect();
        println!(
            "{} Skipped pages without invoice number: {}",
            style("⚠").yellow(),
            pages.join(", ")
        );
    }

    for entry in &outcome.entries {
        println!("  {:>4}  {}", entry.page, entry.filename);
    }
}
