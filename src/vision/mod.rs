//! Vision/OCR Layer
//!
//! Recognition is delegated to an external engine behind the
//! [`RecognitionEngine`] / [`RecognitionWorker`] seam. Backends:
//! - Tesseract CLI with managed language data (all platforms)
//! - Windows OCR API (Windows only)

pub mod image_input;
pub mod language_data;
pub mod ocr_preprocess;
pub mod tesseract;
#[cfg(windows)]
pub mod windows_ocr;

pub use image_input::{ImageInput, InputError, SourceImage};
pub use language_data::LanguageDataManager;
pub use tesseract::TesseractEngine;

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

use crate::config::{OcrBackend, OcrPreprocessing, RecognitionSettings};
use crate::session::progress::ProgressSender;

/// Failure reported by a recognition backend
#[derive(Debug, Error)]
pub enum RecognitionError {
    #[error("unsupported language code {0:?}")]
    UnsupportedLanguage(String),

    #[error("language data unavailable: {0:#}")]
    LanguageData(anyhow::Error),

    #[error("recognition engine failed: {0:#}")]
    Engine(#[from] anyhow::Error),

    #[error("recognition cancelled")]
    Cancelled,
}

/// Factory for per-job recognition workers
#[async_trait]
pub trait RecognitionEngine: Send + Sync {
    /// Backend name for logs
    fn name(&self) -> &'static str;

    /// Acquire a worker for `language`. May report initialization and
    /// language data download progress.
    async fn create_worker(
        &self,
        language: &str,
        progress: &ProgressSender,
    ) -> Result<Box<dyn RecognitionWorker>, RecognitionError>;
}

/// A worker bound to one language. Must be terminated after use, whatever
/// the outcome of `recognize`.
#[async_trait]
pub trait RecognitionWorker: Send {
    async fn recognize(
        &mut self,
        image: &SourceImage,
        progress: &ProgressSender,
    ) -> Result<String, RecognitionError>;

    /// Release everything the worker holds
    async fn terminate(self: Box<Self>);
}

/// Build the engine selected in the configuration
pub fn build_engine(
    settings: &RecognitionSettings,
    preprocessing: &OcrPreprocessing,
) -> anyhow::Result<Arc<dyn RecognitionEngine>> {
    info!("Using OCR backend: {:?}", settings.backend);
    match settings.backend {
        OcrBackend::Tesseract => Ok(Arc::new(TesseractEngine::new(settings, preprocessing.clone())?)),
        #[cfg(windows)]
        OcrBackend::WindowsOcr => Ok(Arc::new(windows_ocr::WindowsOcrEngine)),
        #[cfg(not(windows))]
        OcrBackend::WindowsOcr => anyhow::bail!("Windows OCR is only available on Windows"),
    }
}
