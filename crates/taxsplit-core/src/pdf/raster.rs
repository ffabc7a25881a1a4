//! Page rasterization with pdfium.

use std::path::PathBuf;
use std::time::Instant;

use pdfium_render::prelude::*;
use tracing::{debug, info};

use super::{PageRasterizer, RenderedPage, Result, POINTS_PER_INCH};
use crate::error::PdfError;

/// Renders pages through the pdfium library.
///
/// The library is bound on each `rasterize` call, so constructing a
/// rasterizer is free and text-layer-only runs never touch pdfium.
#[derive(Debug, Clone, Default)]
pub struct PdfiumRasterizer {
    library_dir: Option<PathBuf>,
}

impl PdfiumRasterizer {
    /// Rasterizer using the system pdfium library.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rasterizer loading pdfium from `library_dir`.
    pub fn with_library_dir(library_dir: impl Into<PathBuf>) -> Self {
        Self {
            library_dir: Some(library_dir.into()),
        }
    }

    fn bind(&self) -> Result<Pdfium> {
        let bindings = match &self.library_dir {
            Some(dir) => {
                Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path(dir))
            }
            None => Pdfium::bind_to_system_library(),
        }
        .map_err(|e| PdfError::RendererUnavailable(e.to_string()))?;

        Ok(Pdfium::new(bindings))
    }
}

impl PageRasterizer for PdfiumRasterizer {
    fn rasterize(&self, document: &[u8], dpi: u32) -> Result<Vec<RenderedPage>> {
        if dpi == 0 {
            return Err(PdfError::Rasterization {
                page: 0,
                detail: "DPI must be positive".to_string(),
            });
        }

        let start = Instant::now();
        let pdfium = self.bind()?;

        let pdf = pdfium
            .load_pdf_from_byte_slice(document, None)
            .map_err(|e| PdfError::Parse(e.to_string()))?;

        let pages = pdf.pages();
        let page_count = pages.len() as usize;
        if page_count == 0 {
            return Err(PdfError::NoPages);
        }

        let scale = dpi as f32 / POINTS_PER_INCH;
        let mut rendered = Vec::with_capacity(page_count);

        for (index, page) in pages.iter().enumerate() {
            let number = index as u32 + 1;
            let width = ((page.width().value * scale) as i32).max(1);
            let height = ((page.height().value * scale) as i32).max(1);

            let config = PdfRenderConfig::new()
                .set_target_width(width)
                .set_target_height(height);

            let bitmap = page
                .render_with_config(&config)
                .map_err(|e| PdfError::Rasterization {
                    page: number,
                    detail: e.to_string(),
                })?;

            let image = bitmap.as_image();
            debug!(
                "Rendered page {} -> {}x{} px",
                number,
                image.width(),
                image.height()
            );

            rendered.push(RenderedPage { number, image });
        }

        info!(
            "Rasterized {} pages at {} DPI in {}ms",
            rendered.len(),
            dpi,
            start.elapsed().as_millis()
        );

        Ok(rendered)
    }
}
