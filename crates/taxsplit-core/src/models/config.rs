//! Configuration structures for the splitting pipeline.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::naming::DEFAULT_MAX_FILENAME_LENGTH;
use crate::pdf::DEFAULT_RENDER_DPI;

/// Main configuration for the taxsplit pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SplitterConfig {
    /// PDF processing configuration.
    pub pdf: PdfConfig,

    /// Invoice number extraction and naming configuration.
    pub extraction: ExtractionConfig,

    /// OCR configuration.
    pub ocr: OcrConfig,

    /// Model configuration.
    pub models: ModelConfig,

    /// Pdfium renderer configuration.
    pub pdfium: PdfiumConfig,
}

/// PDF processing configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PdfConfig {
    /// DPI for rendering PDF pages to images.
    pub render_dpi: u32,

    /// Number of pages shown by the preview.
    pub preview_pages: usize,
}

impl Default for PdfConfig {
    fn default() -> Self {
        Self {
            render_dpi: DEFAULT_RENDER_DPI,
            preview_pages: 8,
        }
    }
}

/// Invoice number extraction configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Accept OCR digit runs split by spaces. Text-layer pages always match strictly.
    pub tolerant_digits: bool,

    /// Maximum length of a sanitized filename stem.
    pub max_filename_length: usize,

    /// Leave pages without an invoice number out of the archive.
    pub skip_unmatched: bool,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            tolerant_digits: true,
            max_filename_length: DEFAULT_MAX_FILENAME_LENGTH,
            skip_unmatched: false,
        }
    }
}

/// OCR engine configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrConfig {
    /// Keep `[UNK]` tokens emitted by the recognizer instead of blanking them.
    pub keep_unknown_tokens: bool,

    /// Drop fragments recognized below this confidence (0.0 keeps all).
    pub min_confidence: f32,
}

/// Model file paths.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Directory containing model files.
    pub model_dir: PathBuf,

    /// Text detection model file name.
    pub detection_model: String,

    /// Text recognition model file name.
    pub recognition_model: String,

    /// Character dictionary file name.
    pub dictionary: String,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            model_dir: PathBuf::from("models"),
            detection_model: "det.onnx".to_string(),
            recognition_model: "latin_rec.onnx".to_string(),
            dictionary: "latin_dict.txt".to_string(),
        }
    }
}

impl ModelConfig {
    /// Full path to the detection model.
    pub fn detection_path(&self) -> PathBuf {
        self.model_dir.join(&self.detection_model)
    }

    /// Full path to the recognition model.
    pub fn recognition_path(&self) -> PathBuf {
        self.model_dir.join(&self.recognition_model)
    }

    /// Full path to the character dictionary.
    pub fn dictionary_path(&self) -> PathBuf {
        self.model_dir.join(&self.dictionary)
    }

    /// Model files that are not present on disk.
    pub fn missing_files(&self) -> Vec<PathBuf> {
        [
            self.detection_path(),
            self.recognition_path(),
            self.dictionary_path(),
        ]
        .into_iter()
        .filter(|path| !path.exists())
        .collect()
    }
}

/// Pdfium library location.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PdfiumConfig {
    /// Directory holding the pdfium shared library (system library when unset).
    pub library_dir: Option<PathBuf>,
}

impl SplitterConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })?;
        std::fs::write(path, content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SplitterConfig::default();
        assert_eq!(config.pdf.render_dpi, 200);
        assert_eq!(config.pdf.preview_pages, 8);
        assert_eq!(config.extraction.max_filename_length, 120);
        assert!(config.extraction.tolerant_digits);
        assert!(!config.extraction.skip_unmatched);
        assert!(config.pdfium.library_dir.is_none());
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config: SplitterConfig =
            serde_json::from_str(r#"{"pdf": {"render_dpi": 300}}"#).unwrap();
        assert_eq!(config.pdf.render_dpi, 300);
        assert_eq!(config.pdf.preview_pages, 8);
        assert_eq!(config.models.detection_model, "det.onnx");
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut config = SplitterConfig::default();
        config.extraction.skip_unmatched = true;
        config.save(&path).unwrap();

        let loaded = SplitterConfig::from_file(&path).unwrap();
        assert!(loaded.extraction.skip_unmatched);
    }

    #[test]
    fn test_invalid_json_is_invalid_data() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = SplitterConfig::from_file(&path).unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::InvalidData);
    }

    #[test]
    fn test_model_paths() {
        let models = ModelConfig {
            model_dir: PathBuf::from("/opt/models"),
            ..ModelConfig::default()
        };
        assert_eq!(models.detection_path(), PathBuf::from("/opt/models/det.onnx"));
        assert_eq!(
            models.dictionary_path(),
            PathBuf::from("/opt/models/latin_dict.txt")
        );
        assert_eq!(models.missing_files().len(), 3);
    }

    #[test]
    fn test_missing_files_lists_only_absent() {
        let dir = tempfile::tempdir().unwrap();
        let models = ModelConfig {
            model_dir: dir.path().to_path_buf(),
            ..ModelConfig::default()
        };
        std::fs::write(models.detection_path(), b"onnx").unwrap();
        std::fs::write(models.dictionary_path(), b"a\nb\n").unwrap();

        assert_eq!(models.missing_files(), vec![models.recognition_path()]);
    }
}
