//! Text layer extraction and single-page re-serialization using lopdf and pdf-extract.

use std::panic::{self, AssertUnwindSafe};

use lopdf::Document;
use tracing::{debug, trace, warn};

use super::{PageText, Result};
use crate::error::PdfError;

/// A parsed PDF together with the bytes handed to the text extractor.
pub struct PdfDocument {
    document: Document,
    raw_data: Vec<u8>,
}

impl PdfDocument {
    /// Parse a PDF from bytes.
    ///
    /// Documents encrypted with an empty user password are decrypted;
    /// anything else encrypted is rejected.
    pub fn load(data: &[u8]) -> Result<Self> {
        let mut document = Document::load_mem(data).map_err(|e| {
            if has_encrypt_entry(data) {
                debug!("Encrypted PDF failed to load: {}", e);
                PdfError::Encrypted
            } else {
                PdfError::Parse(e.to_string())
            }
        })?;

        let raw_data = if document.is_encrypted() {
            if document.decrypt("").is_err() {
                return Err(PdfError::Encrypted);
            }
            document.trailer.remove(b"Encrypt");
            debug!("Decrypted PDF with empty password");

            // pdf-extract re-parses the bytes, so hand it the decrypted copy
            let mut decrypted = Vec::new();
            document
                .save_to(&mut decrypted)
                .map_err(|e| PdfError::Parse(format!("failed to save decrypted PDF: {}", e)))?;
            decrypted
        } else {
            data.to_vec()
        };

        let page_count = document.get_pages().len();
        if page_count == 0 {
            return Err(PdfError::NoPages);
        }

        debug!("Loaded PDF with {} pages", page_count);
        Ok(Self { document, raw_data })
    }

    /// Number of pages in the page tree.
    pub fn page_count(&self) -> u32 {
        self.document.get_pages().len() as u32
    }

    /// Extract the embedded text of every page, in page order.
    ///
    /// Pages without a text layer yield an empty string. The extractor can
    /// panic on malformed content streams; that is reported as an error.
    pub fn read_text_layer(&self) -> Result<Vec<PageText>> {
        let data = &self.raw_data;
        let result = panic::catch_unwind(AssertUnwindSafe(|| {
            pdf_extract::extract_text_from_mem_by_pages(data)
        }));

        let texts = match result {
            Ok(Ok(pages)) => pages,
            Ok(Err(e)) => return Err(PdfError::TextExtraction(e.to_string())),
            Err(_) => {
                return Err(PdfError::TextExtraction(
                    "text extractor panicked (malformed document)".to_string(),
                ));
            }
        };

        let pages = number_pages(texts, self.page_count() as usize)?;

        let empty = pages.iter().filter(|p| p.text.trim().is_empty()).count();
        debug!(
            "Read text layer: {} pages, {} without text",
            pages.len(),
            empty
        );

        Ok(pages)
    }

    /// Re-serialize one page (1-indexed) as a standalone PDF.
    ///
    /// Page content, resources and annotations are kept as-is, so the result
    /// stays vector.
    pub fn extract_page(&self, page: u32) -> Result<Vec<u8>> {
        let pages = self.document.get_pages();
        if !pages.contains_key(&page) {
            return Err(PdfError::InvalidPage(page));
        }

        let others: Vec<u32> = pages.keys().copied().filter(|&n| n != page).collect();

        let mut single = self.document.clone();
        single.delete_pages(&others);
        single.prune_objects();
        single.renumber_objects();
        single.compress();

        let mut out = Vec::new();
        single.save_to(&mut out).map_err(|e| PdfError::Write {
            page,
            detail: e.to_string(),
        })?;

        trace!("Page {} re-serialized to {} bytes", page, out.len());
        Ok(out)
    }
}

/// Pair extracted texts with 1-based page numbers, checking them against the page tree.
fn number_pages(texts: Vec<String>, document_pages: usize) -> Result<Vec<PageText>> {
    if texts.len() != document_pages {
        warn!(
            "Text extractor returned {} pages, page tree has {}",
            texts.len(),
            document_pages
        );
        return Err(PdfError::PageCountMismatch {
            text_pages: texts.len(),
            document_pages,
        });
    }

    Ok(texts
        .into_iter()
        .enumerate()
        .map(|(index, text)| PageText {
            number: index as u32 + 1,
            text,
        })
        .collect())
}

fn has_encrypt_entry(data: &[u8]) -> bool {
    data.windows(b"/Encrypt".len()).any(|w| w == b"/Encrypt")
}
