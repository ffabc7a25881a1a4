//! Splitting a combined PDF into per-invoice files.
//!
//! The text layer is tried first. When it yields no invoice number on any
//! page (or OCR is forced), every page is rendered and recognized instead.
//! The switch is made for the whole document, never per page.

mod archive;
mod preview;

pub use archive::{ArchiveWriter, OutputEntry};
pub use preview::{preview, preview_document, DocumentPreview, PreviewRow};

use std::fmt;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{PdfError, SplitError};
use crate::invoice::InvoiceNumberExtractor;
use crate::models::config::SplitterConfig;
use crate::naming::{positional_label, UsedNames, DEFAULT_MAX_FILENAME_LENGTH};
use crate::ocr::TextRecognizer;
use crate::pdf::{image_to_pdf, PageRasterizer, PdfDocument, DEFAULT_RENDER_DPI};
use crate::Result;

/// Where page text comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Strategy {
    /// Embedded text only; never falls back to OCR.
    TextLayer,
    /// Render and recognize every page.
    Optical,
    /// Text layer first, OCR for the whole document when nothing matched.
    Auto,
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::TextLayer => write!(f, "text-layer"),
            Strategy::Optical => write!(f, "optical"),
            Strategy::Auto => write!(f, "auto"),
        }
    }
}

/// The path that actually produced the output pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PageSource {
    /// Original pages re-serialized from the text-layer pass.
    TextLayer,
    /// Rendered page images wrapped in new PDFs.
    Optical,
}

impl fmt::Display for PageSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PageSource::TextLayer => write!(f, "text layer"),
            PageSource::Optical => write!(f, "OCR"),
        }
    }
}

/// Options for one split.
#[derive(Debug, Clone)]
pub struct SplitOptions {
    /// Text source selection.
    pub strategy: Strategy,
    /// Leave pages without an invoice number out of the archive.
    pub skip_unmatched: bool,
    /// Resolution used when rendering pages for OCR.
    pub dpi: u32,
    /// Join OCR digit runs split by whitespace.
    pub tolerant_digits: bool,
    /// Maximum filename stem length.
    pub max_filename_length: usize,
}

impl SplitOptions {
    /// Options matching the `skip_unmatched` / `force_ocr` switches.
    pub fn new(skip_unmatched: bool, force_ocr: bool) -> Self {
        Self {
            strategy: if force_ocr {
                Strategy::Optical
            } else {
                Strategy::Auto
            },
            skip_unmatched,
            ..Self::default()
        }
    }

    /// Options taken from a loaded configuration.
    pub fn from_config(config: &SplitterConfig) -> Self {
        Self {
            strategy: Strategy::Auto,
            skip_unmatched: config.extraction.skip_unmatched,
            dpi: config.pdf.render_dpi,
            tolerant_digits: config.extraction.tolerant_digits,
            max_filename_length: config.extraction.max_filename_length,
        }
    }

    /// Set the strategy.
    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Set the rendering DPI.
    pub fn with_dpi(mut self, dpi: u32) -> Self {
        self.dpi = dpi;
        self
    }

    /// Set whether OCR digit runs may contain spaces.
    pub fn with_tolerant_digits(mut self, tolerant: bool) -> Self {
        self.tolerant_digits = tolerant;
        self
    }

    /// Set whether unmatched pages are skipped.
    pub fn with_skip_unmatched(mut self, skip: bool) -> Self {
        self.skip_unmatched = skip;
        self
    }
}

impl Default for SplitOptions {
    fn default() -> Self {
        Self {
            strategy: Strategy::Auto,
            skip_unmatched: false,
            dpi: DEFAULT_RENDER_DPI,
            tolerant_digits: true,
            max_filename_length: DEFAULT_MAX_FILENAME_LENGTH,
        }
    }
}

/// What happened to one page that made it into the archive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryReport {
    /// Page number (1-indexed).
    pub page: u32,
    /// Archive entry name.
    pub filename: String,
    /// Detected invoice number, if any.
    pub invoice_number: Option<String>,
}

/// Result of a split.
#[derive(Debug, Clone)]
pub struct SplitOutcome {
    /// ZIP archive bytes.
    pub archive: Vec<u8>,
    /// Entries in archive order.
    pub entries: Vec<EntryReport>,
    /// Pages left out because they had no invoice number.
    pub skipped: Vec<u32>,
    /// Path that produced every entry.
    pub source: PageSource,
    /// Total pages in the document.
    pub page_count: u32,
    /// Wall time in milliseconds.
    pub processing_time_ms: u64,
}

impl SplitOutcome {
    /// Number of entries with a detected invoice number.
    pub fn matched(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| e.invoice_number.is_some())
            .count()
    }
}

/// Drives the text-layer / OCR fallback chain and builds the archive.
pub struct Splitter<'a> {
    rasterizer: &'a dyn PageRasterizer,
    recognizer: &'a dyn TextRecognizer,
}

impl<'a> Splitter<'a> {
    /// Create a splitter using the given OCR collaborators.
    ///
    /// Neither is touched unless the optical strategy is selected.
    pub fn new(rasterizer: &'a dyn PageRasterizer, recognizer: &'a dyn TextRecognizer) -> Self {
        Self {
            rasterizer,
            recognizer,
        }
    }

    /// Split `document` and return the archive bytes.
    pub fn split(&self, document: &[u8], skip_unmatched: bool, force_ocr: bool) -> Result<Vec<u8>> {
        let outcome = self.run(document, &SplitOptions::new(skip_unmatched, force_ocr))?;
        Ok(outcome.archive)
    }

    /// Split `document` and report what was produced.
    pub fn run(&self, document: &[u8], options: &SplitOptions) -> Result<SplitOutcome> {
        let start = Instant::now();

        if options.dpi == 0 {
            return Err(SplitError::Config("render DPI must be positive".to_string()));
        }

        info!("Splitting {} byte document, strategy {}", document.len(), options.strategy);

        let mut outcome = match options.strategy {
            Strategy::Optical => self.run_optical(document, options)?,
            Strategy::TextLayer | Strategy::Auto => {
                let pdf = PdfDocument::load(document)?;
                let pages = pdf.read_text_layer()?;

                // Embedded text keeps digit runs intact; a looser match would
                // pull in dates sharing the line
                let extractor = InvoiceNumberExtractor::strict();
                let numbers: Vec<(u32, Option<String>)> = pages
                    .iter()
                    .map(|p| (p.number, extractor.extract(&p.text)))
                    .collect();
                let matched = numbers.iter().filter(|(_, n)| n.is_some()).count();
                debug!("Text layer matched {} of {} pages", matched, numbers.len());

                if matched == 0 && options.strategy == Strategy::Auto {
                    info!(
                        "No invoice number in the text layer of {} pages, switching to OCR",
                        numbers.len()
                    );
                    self.run_optical(document, options)?
                } else {
                    let page_count = pdf.page_count();
                    let mut emitter = Emitter::new(options, PageSource::TextLayer, page_count);
                    for (page, number) in numbers {
                        emitter.emit(page, number, || Ok(pdf.extract_page(page)?))?;
                    }
                    emitter.finish()?
                }
            }
        };

        outcome.processing_time_ms = start.elapsed().as_millis() as u64;
        info!(
            "Split complete via {}: {} entries ({} matched), {} skipped in {}ms",
            outcome.source,
            outcome.entries.len(),
            outcome.matched(),
            outcome.skipped.len(),
            outcome.processing_time_ms
        );

        Ok(outcome)
    }

    fn run_optical(&self, document: &[u8], options: &SplitOptions) -> Result<SplitOutcome> {
        let extractor = InvoiceNumberExtractor::from_tolerance(options.tolerant_digits);
        let rendered = self.rasterizer.rasterize(document, options.dpi)?;
        if rendered.is_empty() {
            return Err(PdfError::NoPages.into());
        }

        let mut emitter = Emitter::new(options, PageSource::Optical, rendered.len() as u32);
        for page in &rendered {
            let text = self.recognizer.recognize(&page.image)?;
            let number = extractor.extract(&text);
            debug!("OCR page {}: {} chars, match {:?}", page.number, text.len(), number);

            emitter.emit(page.number, number, || {
                Ok(image_to_pdf(&page.image, options.dpi, page.number)?)
            })?;
        }

        emitter.finish()
    }
}

/// Names, filters and archives pages for one split.
struct Emitter {
    used: UsedNames,
    archive: ArchiveWriter,
    entries: Vec<EntryReport>,
    skipped: Vec<u32>,
    skip_unmatched: bool,
    source: PageSource,
    page_count: u32,
}

impl Emitter {
    fn new(options: &SplitOptions, source: PageSource, page_count: u32) -> Self {
        Self {
            used: UsedNames::with_max_length(options.max_filename_length),
            archive: ArchiveWriter::new(),
            entries: Vec::new(),
            skipped: Vec::new(),
            skip_unmatched: options.skip_unmatched,
            source,
            page_count,
        }
    }

    fn emit<F>(&mut self, page: u32, number: Option<String>, content: F) -> Result<()>
    where
        F: FnOnce() -> Result<Vec<u8>>,
    {
        if number.is_none() && self.skip_unmatched {
            debug!("Skipping page {} without invoice number", page);
            self.skipped.push(page);
            return Ok(());
        }

        let label = number.clone().unwrap_or_else(|| positional_label(page));
        let filename = self.used.allocate(&label, page);

        self.archive.add(&OutputEntry {
            filename: filename.clone(),
            content: content()?,
        })?;

        self.entries.push(EntryReport {
            page,
            filename,
            invoice_number: number,
        });
        Ok(())
    }

    fn finish(self) -> Result<SplitOutcome> {
        Ok(SplitOutcome {
            archive: self.archive.finish()?,
            entries: self.entries,
            skipped: self.skipped,
            source: self.source,
            page_count: self.page_count,
            processing_time_ms: 0,
        })
    }
}

/// Split with the system pdfium library and the process-wide OCR engine
/// loaded from the default `models` directory.
#[cfg(feature = "native")]
pub fn split(document: &[u8], skip_unmatched: bool, force_ocr: bool) -> Result<Vec<u8>> {
    use crate::models::config::{ModelConfig, OcrConfig};
    use crate::ocr::SharedRecognizer;
    use crate::pdf::PdfiumRasterizer;

    let rasterizer = PdfiumRasterizer::new();
    let recognizer = SharedRecognizer::global(&ModelConfig::default(), &OcrConfig::default());
    Splitter::new(&rasterizer, recognizer).split(document, skip_unmatched, force_ocr)
}
