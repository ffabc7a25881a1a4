//! PDF processing module.

mod document;
mod image_page;
#[cfg(feature = "native")]
mod raster;

pub use document::PdfDocument;
pub use image_page::image_to_pdf;
#[cfg(feature = "native")]
pub use raster::PdfiumRasterizer;

use crate::error::PdfError;
use image::DynamicImage;

/// Default resolution for rendering pages before OCR.
pub const DEFAULT_RENDER_DPI: u32 = 200;

/// PDF user space units per inch.
pub const POINTS_PER_INCH: f32 = 72.0;

/// Result type for PDF operations.
pub type Result<T> = std::result::Result<T, PdfError>;

/// Embedded text of a single page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageText {
    /// Page number (1-indexed).
    pub number: u32,
    /// Text layer content; empty when the page has none.
    pub text: String,
}

/// A page rendered to pixels.
#[derive(Debug, Clone)]
pub struct RenderedPage {
    /// Page number (1-indexed).
    pub number: u32,
    /// Rendered image.
    pub image: DynamicImage,
}

/// Renders every page of a document to an image.
pub trait PageRasterizer: Send + Sync {
    /// Render all pages at `dpi`, in page order.
    ///
    /// Fails on the first page that cannot be rendered.
    fn rasterize(&self, document: &[u8], dpi: u32) -> Result<Vec<RenderedPage>>;
}

/// Read the embedded text of every page, in page order.
pub fn read_text_layer(document: &[u8]) -> Result<Vec<PageText>> {
    PdfDocument::load(document)?.read_text_layer()
}

/// Render every page with the system pdfium library.
#[cfg(feature = "native")]
pub fn read_via_rasterization(document: &[u8], dpi: u32) -> Result<Vec<RenderedPage>> {
    PdfiumRasterizer::new().rasterize(document, dpi)
}
