//! Quick look at the first pages before committing to a split.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::invoice::InvoiceNumberExtractor;
use crate::naming::{positional_label, sanitize_filename, DEFAULT_MAX_FILENAME_LENGTH};
use crate::pdf::PdfDocument;
use crate::Result;

/// Detection result for one previewed page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreviewRow {
    /// Page number (1-indexed).
    pub page: u32,
    /// Detected invoice number.
    pub invoice_number: Option<String>,
    /// Proposed output filename (before collision handling).
    pub filename: String,
}

/// Rows for the first pages plus whole-document match counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentPreview {
    pub rows: Vec<PreviewRow>,
    /// Pages in the document.
    pub page_count: u32,
    /// Pages anywhere in the document whose text layer has an invoice number.
    pub matched_pages: u32,
}

impl DocumentPreview {
    /// Whether an automatic split would switch to OCR.
    pub fn needs_ocr(&self) -> bool {
        self.matched_pages == 0
    }
}

/// Detect invoice numbers on the first `max_pages` pages using the text layer only.
pub fn preview(document: &[u8], max_pages: usize) -> Result<Vec<PreviewRow>> {
    Ok(preview_document(document, max_pages)?.rows)
}

/// Like [`preview`], also counting matches on the pages past `max_pages`.
pub fn preview_document(document: &[u8], max_pages: usize) -> Result<DocumentPreview> {
    let pdf = PdfDocument::load(document)?;
    let pages = pdf.read_text_layer()?;
    let extractor = InvoiceNumberExtractor::strict();

    let numbers: Vec<(u32, Option<String>)> = pages
        .iter()
        .map(|page| (page.number, extractor.extract(&page.text)))
        .collect();
    let matched_pages = numbers.iter().filter(|(_, n)| n.is_some()).count() as u32;

    let rows: Vec<PreviewRow> = numbers
        .into_iter()
        .take(max_pages)
        .map(|(page, invoice_number)| {
            let label = invoice_number
                .clone()
                .unwrap_or_else(|| positional_label(page));
            PreviewRow {
                page,
                invoice_number,
                filename: format!(
                    "{}.pdf",
                    sanitize_filename(&label, DEFAULT_MAX_FILENAME_LENGTH)
                ),
            }
        })
        .collect();

    debug!(
        "Preview: {} of {} pages shown, {} with invoice numbers",
        rows.len(),
        pages.len(),
        matched_pages
    );

    Ok(DocumentPreview {
        rows,
        page_count: pdf.page_count(),
        matched_pages,
    })
}
