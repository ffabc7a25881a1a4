//! Lazily loaded, process-wide OCR engine.

use image::DynamicImage;
use once_cell::sync::OnceCell;
use tracing::{debug, info};

use crate::error::OcrError;

use super::TextRecognizer;

type Loader<R> = Box<dyn Fn() -> Result<R, OcrError> + Send + Sync>;

/// Holds an OCR engine that is loaded on first use and then reused.
///
/// Loading happens at most once: concurrent first callers block until the
/// winner finishes. A failed load leaves the slot empty so a later call can
/// try again.
pub struct SharedRecognizer<R> {
    loader: Loader<R>,
    engine: OnceCell<R>,
}

impl<R: TextRecognizer> SharedRecognizer<R> {
    /// Create an empty holder that builds its engine with `loader`.
    pub fn new<F>(loader: F) -> Self
    where
        F: Fn() -> Result<R, OcrError> + Send + Sync + 'static,
    {
        Self {
            loader: Box::new(loader),
            engine: OnceCell::new(),
        }
    }

    /// Create a holder around an engine that is already loaded.
    pub fn preloaded(engine: R) -> Self {
        Self {
            loader: Box::new(|| {
                Err(OcrError::ModelLoad("engine was preloaded".to_string()))
            }),
            engine: OnceCell::with_value(engine),
        }
    }

    /// Whether the engine has been loaded.
    pub fn is_loaded(&self) -> bool {
        self.engine.get().is_some()
    }

    /// Get the engine, loading it if this is the first use.
    pub fn engine(&self) -> Result<&R, OcrError> {
        self.engine.get_or_try_init(|| {
            info!("Initializing OCR engine");
            (self.loader)()
        })
    }
}

impl<R: TextRecognizer> TextRecognizer for SharedRecognizer<R> {
    fn recognize(&self, image: &DynamicImage) -> Result<String, OcrError> {
        let engine = self.engine()?;
        debug!("Recognizing {}x{} page image", image.width(), image.height());
        engine.recognize(image)
    }
}

#[cfg(feature = "native")]
impl SharedRecognizer<super::PureOcrEngine> {
    /// The process-wide engine.
    ///
    /// The first call fixes the model location; later calls return the same
    /// instance and ignore their arguments.
    pub fn global(
        models: &crate::models::config::ModelConfig,
        config: &crate::models::config::OcrConfig,
    ) -> &'static Self {
        static GLOBAL: OnceCell<SharedRecognizer<super::PureOcrEngine>> = OnceCell::new();

        GLOBAL.get_or_init(|| {
            let models = models.clone();
            let config = config.clone();
            Self::new(move || super::PureOcrEngine::from_models(&models, config.clone()))
        })
    }
}
