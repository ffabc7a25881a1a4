//! Error types for the taxsplit-core library.

use thiserror::Error;

/// Main error type for the taxsplit library.
#[derive(Error, Debug)]
pub enum SplitError {
    /// PDF processing error.
    #[error("PDF error: {0}")]
    Pdf(#[from] PdfError),

    /// OCR processing error.
    #[error("OCR error: {0}")]
    Ocr(#[from] OcrError),

    /// Archive packaging error.
    #[error("archive error: {0}")]
    Archive(#[from] ArchiveError),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors related to PDF processing.
#[derive(Error, Debug)]
pub enum PdfError {
    /// The input bytes are not a readable PDF.
    #[error("failed to parse PDF: {0}")]
    Parse(String),

    /// Failed to extract the embedded text layer.
    #[error("failed to extract text: {0}")]
    TextExtraction(String),

    /// The text extractor and the page tree disagree on the page count.
    #[error("text layer has {text_pages} pages but the document has {document_pages}")]
    PageCountMismatch {
        text_pages: usize,
        document_pages: usize,
    },

    /// The PDF is encrypted with a non-empty password.
    #[error("PDF is encrypted")]
    Encrypted,

    /// The PDF is empty or has no pages.
    #[error("PDF has no pages")]
    NoPages,

    /// Invalid page number requested.
    #[error("invalid page number: {0}")]
    InvalidPage(u32),

    /// A page could not be rendered to an image.
    #[error("failed to render page {page}: {detail}")]
    Rasterization { page: u32, detail: String },

    /// The PDF renderer could not be initialized.
    #[error("PDF renderer unavailable: {0}")]
    RendererUnavailable(String),

    /// Failed to serialize a single-page document.
    #[error("failed to write page {page}: {detail}")]
    Write { page: u32, detail: String },
}

/// Errors related to OCR processing.
#[derive(Error, Debug)]
pub enum OcrError {
    /// Failed to load OCR models.
    #[error("failed to load model: {0}")]
    ModelLoad(String),

    /// Text recognition failed.
    #[error("text recognition failed: {0}")]
    Recognition(String),
}

/// Errors related to writing the output archive.
#[derive(Error, Debug)]
pub enum ArchiveError {
    /// The zip writer rejected an entry or failed to finish.
    #[error("zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// Failed to write entry content.
    #[error("failed to write entry {name}: {source}")]
    Entry {
        name: String,
        #[source]
        source: std::io::Error,
    },
}

/// Result type for the taxsplit library.
pub type Result<T> = std::result::Result<T, SplitError>;
