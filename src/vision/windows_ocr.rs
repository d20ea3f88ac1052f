//! Windows OCR API backend
//!
//! Uses the built-in Windows OCR (Media.Ocr). No language data download is
//! needed; languages come from the installed Windows language packs.

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use tracing::{debug, info, warn};
use windows::{
    core::HSTRING,
    Foundation::IAsyncOperation,
    Globalization::Language,
    Graphics::Imaging::{BitmapPixelFormat, SoftwareBitmap},
    Media::Ocr::{OcrEngine as WinOcrEngine, OcrResult as WinOcrResult},
};

use crate::session::progress::{ProgressEvent, ProgressSender};
use crate::vision::language_data::is_valid_language_code;
use crate::vision::{RecognitionEngine, RecognitionError, RecognitionWorker, SourceImage};

/// Map a tesseract language code to a BCP-47 tag Windows understands
pub fn windows_language_tag(code: &str) -> &str {
    match code {
        "eng" => "en-US",
        "ben" => "bn-BD",
        "hin" => "hi-IN",
        "spa" => "es-ES",
        "fra" => "fr-FR",
        "deu" => "de-DE",
        other => other,
    }
}

/// Windows OCR engine wrapper
pub struct WindowsOcr {
    engine: WinOcrEngine,
    language: String,
}

impl WindowsOcr {
    /// Create a new Windows OCR engine with the specified language
    pub fn new(language_tag: &str) -> Result<Self> {
        debug!("Initializing Windows OCR engine with language: {}", language_tag);

        let language = Language::CreateLanguage(&HSTRING::from(language_tag))
            .context("Failed to create language")?;

        if !WinOcrEngine::IsLanguageSupported(&language)
            .context("Failed to check language support")?
        {
            warn!("Language '{}' not supported, falling back to user profile languages", language_tag);
            let engine = WinOcrEngine::TryCreateFromUserProfileLanguages()
                .context("Failed to create OCR engine from user profile")?;

            let lang_tag = engine
                .RecognizerLanguage()
                .context("Failed to get recognizer language")?
                .LanguageTag()
                .context("Failed to get language tag")?
                .to_string();

            info!("Windows OCR initialized with language: {}", lang_tag);
            return Ok(Self {
                engine,
                language: lang_tag,
            });
        }

        let engine = WinOcrEngine::TryCreateFromLanguage(&language)
            .context("Failed to create OCR engine for language")?;

        Ok(Self {
            engine,
            language: language_tag.to_string(),
        })
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    /// Recognize an RGBA buffer, one output line per OCR line
    pub fn recognize_text(&self, rgba: &[u8], width: u32, height: u32) -> Result<String> {
        if rgba.is_empty() || width == 0 || height == 0 {
            return Ok(String::new());
        }

        debug!("Windows OCR: Processing {}x{} image", width, height);

        let bgra = rgba_to_bgra(rgba);
        let bitmap = create_software_bitmap(&bgra, width, height)?;
        let result = run_ocr_sync(&self.engine, &bitmap)?;
        extract_text(&result)
    }
}

/// Convert RGBA to BGRA (Windows expects BGRA)
fn rgba_to_bgra(rgba: &[u8]) -> Vec<u8> {
    let mut bgra = rgba.to_vec();
    for chunk in bgra.chunks_exact_mut(4) {
        chunk.swap(0, 2);
    }
    bgra
}

/// Create a SoftwareBitmap from BGRA data using CopyFromBuffer
fn create_software_bitmap(bgra_data: &[u8], width: u32, height: u32) -> Result<SoftwareBitmap> {
    use windows::Storage::Streams::{DataReader, DataWriter, InMemoryRandomAccessStream};

    let stream = InMemoryRandomAccessStream::new().context("Failed to create in-memory stream")?;
    let writer = DataWriter::CreateDataWriter(&stream).context("Failed to create data writer")?;

    writer.WriteBytes(bgra_data).context("Failed to write pixel data")?;
    writer
        .StoreAsync()
        .context("Failed to start store operation")?
        .get()
        .context("Failed to store data")?;
    writer
        .FlushAsync()
        .context("Failed to start flush operation")?
        .get()
        .context("Failed to flush data")?;

    stream.Seek(0).context("Failed to seek stream")?;

    let bitmap = SoftwareBitmap::Create(BitmapPixelFormat::Bgra8, width as i32, height as i32)
        .context("Failed to create SoftwareBitmap")?;

    let input_stream = stream.GetInputStreamAt(0).context("Failed to get input stream")?;
    let reader = DataReader::CreateDataReader(&input_stream).context("Failed to create data reader")?;
    reader
        .LoadAsync(bgra_data.len() as u32)
        .context("Failed to start load operation")?
        .get()
        .context("Failed to load data")?;
    let buffer = reader
        .ReadBuffer(bgra_data.len() as u32)
        .context("Failed to read buffer")?;

    bitmap.CopyFromBuffer(&buffer).context("Failed to copy buffer to bitmap")?;

    Ok(bitmap)
}

/// Run OCR synchronously (blocks until complete)
fn run_ocr_sync(engine: &WinOcrEngine, bitmap: &SoftwareBitmap) -> Result<WinOcrResult> {
    let async_op: IAsyncOperation<WinOcrResult> = engine
        .RecognizeAsync(bitmap)
        .context("Failed to start OCR recognition")?;

    async_op.get().context("OCR recognition failed")
}

fn extract_text(ocr_result: &WinOcrResult) -> Result<String> {
    let lines = ocr_result.Lines().context("Failed to get OCR lines")?;

    let mut text = Vec::new();
    for i in 0..lines.Size().context("Failed to get lines size")? {
        let line = lines.GetAt(i).context("Failed to get line")?;
        text.push(line.Text().context("Failed to get line text")?.to_string());
    }

    Ok(text.join("\n"))
}

/// Recognition engine backed by Windows OCR
#[derive(Debug, Default)]
pub struct WindowsOcrEngine;

#[async_trait]
impl RecognitionEngine for WindowsOcrEngine {
    fn name(&self) -> &'static str {
        "windows-ocr"
    }

    async fn create_worker(
        &self,
        language: &str,
        _progress: &ProgressSender,
    ) -> Result<Box<dyn RecognitionWorker>, RecognitionError> {
        if !is_valid_language_code(language) {
            return Err(RecognitionError::UnsupportedLanguage(language.to_string()));
        }

        Ok(Box::new(WindowsOcrWorker {
            language_tag: windows_language_tag(language).to_string(),
        }))
    }
}

struct WindowsOcrWorker {
    language_tag: String,
}

#[async_trait]
impl RecognitionWorker for WindowsOcrWorker {
    async fn recognize(
        &mut self,
        image: &SourceImage,
        progress: &ProgressSender,
    ) -> Result<String, RecognitionError> {
        progress.send(ProgressEvent::recognizing(0.0));

        // WinRT objects stay on the blocking thread that created them
        let image = image.clone();
        let tag = self.language_tag.clone();
        let text = tokio::task::spawn_blocking(move || -> Result<String> {
            let rgba = image.decode().context("Failed to decode image")?.to_rgba8();
            let (width, height) = rgba.dimensions();
            let ocr = WindowsOcr::new(&tag)?;
            debug!("Windows OCR recognizing with {}", ocr.language());
            ocr.recognize_text(rgba.as_raw(), width, height)
        })
        .await
        .map_err(|e| anyhow!("OCR task failed: {}", e))??;

        progress.send(ProgressEvent::recognizing(1.0));
        Ok(text)
    }

    async fn terminate(self: Box<Self>) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_tag_mapping() {
        assert_eq!(windows_language_tag("eng"), "en-US");
        assert_eq!(windows_language_tag("ben"), "bn-BD");
        assert_eq!(windows_language_tag("en-GB"), "en-GB");
    }

    #[test]
    fn test_rgba_to_bgra() {
        assert_eq!(rgba_to_bgra(&[1, 2, 3, 4]), vec![3, 2, 1, 4]);
    }

    #[test]
    fn test_create_engine() {
        assert!(WindowsOcr::new("en-US").is_ok());
    }
}
