//! Text recognition on rendered pages.

#[cfg(feature = "native")]
mod pure_engine;
mod shared;

#[cfg(feature = "native")]
pub use pure_engine::PureOcrEngine;
pub use shared::SharedRecognizer;

use image::DynamicImage;
use serde::{Deserialize, Serialize};

use crate::error::OcrError;

/// Turns a page image into text.
pub trait TextRecognizer: Send + Sync {
    /// Recognize all text on the image.
    ///
    /// Fragments are joined with single spaces in detection order.
    fn recognize(&self, image: &DynamicImage) -> Result<String, OcrError>;
}

/// One piece of text located by the recognizer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextFragment {
    /// Recognized text content.
    pub text: String,

    /// Recognition confidence score (0.0 - 1.0).
    pub confidence: f32,
}

impl TextFragment {
    pub fn new(text: impl Into<String>, confidence: f32) -> Self {
        Self {
            text: text.into(),
            confidence,
        }
    }
}

/// Join fragment texts with single spaces, skipping blank fragments.
pub fn join_fragments<'a, I>(fragments: I) -> String
where
    I: IntoIterator<Item = &'a TextFragment>,
{
    fragments
        .into_iter()
        .map(|f| f.text.trim())
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
