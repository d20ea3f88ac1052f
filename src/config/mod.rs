//! Application Configuration
//!
//! User settings stored in TOML format.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// General settings
    pub general: GeneralConfig,
    /// Recognition backend settings
    pub recognition: RecognitionSettings,
    /// Image preprocessing applied before recognition
    pub preprocessing: OcrPreprocessing,
    /// Translation relay settings
    pub translation: TranslationSettings,
}

/// A recognition language offered in the language picker
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageOption {
    /// Tesseract language code (e.g. "eng")
    pub code: String,
    /// Display name
    pub name: String,
}

impl LanguageOption {
    pub fn new(code: &str, name: &str) -> Self {
        Self {
            code: code.to_string(),
            name: name.to_string(),
        }
    }
}

/// General application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Language selected when the window opens
    pub default_language: String,
    /// Languages offered in the picker
    pub languages: Vec<LanguageOption>,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            default_language: "eng".to_string(),
            languages: vec![
                LanguageOption::new("eng", "English"),
                LanguageOption::new("ben", "Bengali"),
                LanguageOption::new("hin", "Hindi"),
                LanguageOption::new("spa", "Spanish"),
                LanguageOption::new("fra", "French"),
                LanguageOption::new("deu", "German"),
            ],
        }
    }
}

impl GeneralConfig {
    /// Display name for a language code, falling back to the code itself
    pub fn language_name<'a>(&'a self, code: &'a str) -> &'a str {
        self.languages
            .iter()
            .find(|l| l.code == code)
            .map(|l| l.name.as_str())
            .unwrap_or(code)
    }
}

/// OCR backend selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum OcrBackend {
    /// Tesseract CLI with downloaded language data
    #[default]
    Tesseract,
    /// Windows built-in OCR (Windows only)
    WindowsOcr,
}

/// Recognition-related settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RecognitionSettings {
    /// Backend used for recognition
    pub backend: OcrBackend,
    /// Tesseract executable name or path
    pub tesseract_command: String,
    /// Base URL that serves `<lang>.traineddata` files
    pub language_data_url: String,
    /// Directory holding traineddata files (defaults to the app data dir)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tessdata_dir: Option<PathBuf>,
}

impl Default for RecognitionSettings {
    fn default() -> Self {
        Self {
            backend: OcrBackend::Tesseract,
            tesseract_command: "tesseract".to_string(),
            language_data_url: "https://github.com/tesseract-ocr/tessdata_best/raw/main".to_string(),
            tessdata_dir: None,
        }
    }
}

/// Image preprocessing settings for OCR
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrPreprocessing {
    /// Master switch
    pub enabled: bool,
    /// Convert to grayscale
    pub grayscale: bool,
    /// Contrast factor (1.0 = unchanged)
    pub contrast: f32,
    /// Apply a 3x3 sharpen filter (grayscale only)
    pub sharpen: bool,
    /// Integer upscale factor (1 = unchanged)
    pub scale: u32,
}

impl Default for OcrPreprocessing {
    fn default() -> Self {
        Self {
            enabled: false,
            grayscale: true,
            contrast: 1.0,
            sharpen: false,
            scale: 1,
        }
    }
}

/// Translation relay settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TranslationSettings {
    /// Whether recognized text may be forwarded for translation
    pub enabled: bool,
    /// Translation endpoint
    pub endpoint: String,
    /// Recognition language that triggers translation
    pub trigger_language: String,
    /// Language requested from the translation service
    pub target_language: String,
    /// Text shown in place of a translation when the service fails
    pub fallback_message: String,
    /// Request timeout in seconds (none by default)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

impl Default for TranslationSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            endpoint: "http://localhost:3000/translate".to_string(),
            trigger_language: "ben".to_string(),
            target_language: "en".to_string(),
            fallback_message:
                "Translation service is unavailable. Make sure your local server is running."
                    .to_string(),
            timeout_secs: None,
        }
    }
}

/// Load configuration from file
pub fn load_config(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    let config: AppConfig = toml::from_str(&content)?;
    Ok(config)
}

/// Save configuration to file
pub fn save_config(config: &AppConfig, path: &Path) -> Result<()> {
    let content = toml::to_string_pretty(config)?;
    std::fs::write(path, content)?;
    Ok(())
}
