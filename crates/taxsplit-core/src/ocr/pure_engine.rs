//! Pure Rust OCR engine wrapper using `pure-onnx-ocr`.

use std::sync::Mutex;
use std::time::Instant;

use image::{DynamicImage, GenericImageView};
use tracing::{debug, info};

use crate::error::OcrError;
use crate::models::config::{ModelConfig, OcrConfig};

use super::{join_fragments, TextFragment, TextRecognizer};

/// OCR engine backed by `pure-onnx-ocr` (pure Rust, no external ONNX Runtime).
///
/// Runs are serialized through a mutex so one engine can be shared between
/// threads.
pub struct PureOcrEngine {
    engine: Mutex<pure_onnx_ocr::engine::OcrEngine>,
    config: OcrConfig,
}

impl PureOcrEngine {
    /// Load detection, recognition and dictionary files named by `models`.
    pub fn from_models(models: &ModelConfig, config: OcrConfig) -> Result<Self, OcrError> {
        let det_path = models.detection_path();
        let rec_path = models.recognition_path();
        let dict_path = models.dictionary_path();

        if let Some(missing) = models.missing_files().first() {
            return Err(OcrError::ModelLoad(format!(
                "missing model file {}",
                missing.display()
            )));
        }

        let start = Instant::now();
        let engine = pure_onnx_ocr::engine::OcrEngineBuilder::new()
            .det_model_path(&det_path)
            .rec_model_path(&rec_path)
            .dictionary_path(&dict_path)
            .build()
            .map_err(|e| OcrError::ModelLoad(format!("pure-onnx-ocr: {}", e)))?;

        info!(
            "Loaded pure-onnx-ocr engine from {} in {}ms",
            models.model_dir.display(),
            start.elapsed().as_millis()
        );

        Ok(Self {
            engine: Mutex::new(engine),
            config,
        })
    }

    /// Run detection and recognition, returning fragments in detection order.
    pub fn fragments(&self, image: &DynamicImage) -> Result<Vec<TextFragment>, OcrError> {
        let start = Instant::now();
        let (width, height) = image.dimensions();

        let engine = self
            .engine
            .lock()
            .map_err(|_| OcrError::Recognition("OCR engine lock poisoned".to_string()))?;

        let results = engine
            .run_from_image(image)
            .map_err(|e| OcrError::Recognition(format!("pure-onnx-ocr: {}", e)))?;

        debug!("pure-onnx-ocr returned {} text regions", results.len());

        let fragments: Vec<TextFragment> = results
            .iter()
            .filter(|r| r.confidence >= self.config.min_confidence)
            .map(|r| {
                let text = if self.config.keep_unknown_tokens {
                    r.text.clone()
                } else {
                    r.text.replace("[UNK]", " ")
                };
                TextFragment::new(text, r.confidence)
            })
            .collect();

        debug!(
            "OCR on {}x{} image: {} fragments in {}ms",
            width,
            height,
            fragments.len(),
            start.elapsed().as_millis()
        );

        Ok(fragments)
    }
}

impl TextRecognizer for PureOcrEngine {
    fn recognize(&self, image: &DynamicImage) -> Result<String, OcrError> {
        Ok(join_fragments(&self.fragments(image)?))
    }
}
