//! Core library for splitting combined invoice PDFs.
//!
//! This crate provides:
//! - "Tax Invoice No" extraction from page text
//! - PDF text layer reading and single-page re-serialization
//! - OCR fallback on rendered pages (pdfium + pure-onnx-ocr)
//! - Collision-free output naming and ZIP packaging

pub mod error;
pub mod models;
pub mod naming;
pub mod invoice;
pub mod pdf;
pub mod ocr;
pub mod split;

pub use error::{SplitError, Result};
pub use models::config::SplitterConfig;
pub use naming::{sanitize_filename, UsedNames};
pub use invoice::{extract_invoice_number, InvoiceNumberExtractor};
pub use pdf::{read_text_layer, PageRasterizer, PageText, PdfDocument, RenderedPage};
pub use ocr::{SharedRecognizer, TextRecognizer};
pub use split::{
    preview, preview_document, DocumentPreview, PageSource, PreviewRow, SplitOptions,
    SplitOutcome, Splitter, Strategy,
};

#[cfg(feature = "native")]
pub use ocr::PureOcrEngine;
#[cfg(feature = "native")]
pub use pdf::{read_via_rasterization, PdfiumRasterizer};
#[cfg(feature = "native")]
pub use split::split;
