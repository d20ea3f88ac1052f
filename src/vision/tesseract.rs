//! Tesseract CLI backend
//!
//! Each worker writes the (optionally preprocessed) image to a temp file and
//! runs `tesseract --tessdata-dir <dir> <image> stdout -l <lang>`.

use anyhow::{anyhow, Context};
use async_trait::async_trait;
use std::path::PathBuf;
use std::process::Stdio;
use std::sync::Arc;
use tokio::process::Command;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::{OcrPreprocessing, RecognitionSettings};
use crate::session::progress::{ProgressEvent, ProgressSender};
use crate::vision::language_data::LanguageDataManager;
use crate::vision::ocr_preprocess::prepare_for_ocr;
use crate::vision::{RecognitionEngine, RecognitionError, RecognitionWorker, SourceImage};

/// Tesseract engine using the system executable
pub struct TesseractEngine {
    command: String,
    language_data: Arc<LanguageDataManager>,
    preprocessing: OcrPreprocessing,
}

impl TesseractEngine {
    pub fn new(settings: &RecognitionSettings, preprocessing: OcrPreprocessing) -> anyhow::Result<Self> {
        let language_data = LanguageDataManager::new(settings)?;
        info!("Tesseract language data directory: {:?}", language_data.data_dir());
        Ok(Self::with_language_data(
            settings.tesseract_command.clone(),
            Arc::new(language_data),
            preprocessing,
        ))
    }

    pub fn with_language_data(
        command: String,
        language_data: Arc<LanguageDataManager>,
        preprocessing: OcrPreprocessing,
    ) -> Self {
        Self {
            command,
            language_data,
            preprocessing,
        }
    }
}

#[async_trait]
impl RecognitionEngine for TesseractEngine {
    fn name(&self) -> &'static str {
        "tesseract"
    }

    async fn create_worker(
        &self,
        language: &str,
        progress: &ProgressSender,
    ) -> Result<Box<dyn RecognitionWorker>, RecognitionError> {
        let tessdata_dir = self.language_data.ensure_language(language, progress).await?;

        Ok(Box::new(TesseractWorker {
            command: self.command.clone(),
            tessdata_dir,
            language: language.to_string(),
            preprocessing: self.preprocessing.clone(),
            temp_image: None,
        }))
    }
}

struct TesseractWorker {
    command: String,
    tessdata_dir: PathBuf,
    language: String,
    preprocessing: OcrPreprocessing,
    temp_image: Option<PathBuf>,
}

impl TesseractWorker {
    async fn write_temp_image(&mut self, image: &SourceImage) -> anyhow::Result<PathBuf> {
        let image = image.clone();
        let settings = self.preprocessing.clone();
        let bytes = tokio::task::spawn_blocking(move || prepare_for_ocr(&image, &settings))
            .await
            .map_err(|e| anyhow!("Preprocessing task failed: {}", e))?
            .context("Failed to prepare image for OCR")?;

        let path = std::env::temp_dir().join(format!("textlens-{}.png", Uuid::new_v4().simple()));
        tokio::fs::write(&path, bytes)
            .await
            .with_context(|| format!("Failed to write temp image {:?}", path))?;
        self.temp_image = Some(path.clone());
        Ok(path)
    }
}

#[async_trait]
impl RecognitionWorker for TesseractWorker {
    async fn recognize(
        &mut self,
        image: &SourceImage,
        progress: &ProgressSender,
    ) -> Result<String, RecognitionError> {
        progress.send(ProgressEvent::recognizing(0.0));

        let input = self.write_temp_image(image).await?;
        debug!("Running {} on {:?} ({})", self.command, input, self.language);

        let output = Command::new(&self.command)
            .arg("--tessdata-dir")
            .arg(&self.tessdata_dir)
            .arg(&input)
            .arg("stdout")
            .arg("-l")
            .arg(&self.language)
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await
            .with_context(|| format!("Failed to run {}", self.command))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(anyhow!("{} exited with {}: {}", self.command, output.status, stderr.trim()).into());
        }

        progress.send(ProgressEvent::recognizing(1.0));

        // Tesseract ends each page with a form feed
        let text = String::from_utf8_lossy(&output.stdout);
        Ok(text.trim_end_matches('\u{c}').to_string())
    }

    async fn terminate(self: Box<Self>) {
        if let Some(path) = &self.temp_image {
            match tokio::fs::remove_file(path).await {
                Ok(()) => debug!("Removed temp image {:?}", path),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => warn!("Failed to remove temp image {:?}: {}", path, e),
            }
        }
    }
}
