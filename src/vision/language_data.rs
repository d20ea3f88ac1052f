//! Language data management for tesseract
//!
//! Handles downloading, caching and verifying `<lang>.traineddata` files.

use anyhow::{Context, Result};
use futures_util::StreamExt;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

use crate::config::RecognitionSettings;
use crate::session::progress::{ProgressEvent, ProgressSender};
use crate::vision::RecognitionError;

/// Anything smaller is a truncated download or an error page
const MIN_TRAINEDDATA_BYTES: u64 = 1024;

/// Set to refuse network downloads
pub const OFFLINE_ENV: &str = "TEXTLENS_OFFLINE";

/// Tesseract language codes are lowercase letters and underscores ("chi_sim")
pub fn is_valid_language_code(code: &str) -> bool {
    !code.is_empty() && code.chars().all(|c| c.is_ascii_lowercase() || c == '_')
}

/// Manifest tracking downloaded language files
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LanguageManifest {
    pub languages: Vec<LanguageInfo>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LanguageInfo {
    pub code: String,
    pub filename: String,
    pub size_bytes: u64,
    pub sha256: String,
    /// Unix timestamp (seconds)
    pub downloaded_at: u64,
}

/// Downloads and caches traineddata files
pub struct LanguageDataManager {
    data_dir: PathBuf,
    base_url: String,
    client: reqwest::Client,
}

impl LanguageDataManager {
    /// Manager for the configured (or default) tessdata directory
    pub fn new(settings: &RecognitionSettings) -> Result<Self> {
        let data_dir = match &settings.tessdata_dir {
            Some(dir) => dir.clone(),
            None => crate::storage::get_data_dir()?.join("tessdata"),
        };
        Self::with_dir(data_dir, &settings.language_data_url)
    }

    /// Manager with an explicit directory and download base URL
    pub fn with_dir(data_dir: PathBuf, base_url: &str) -> Result<Self> {
        std::fs::create_dir_all(&data_dir)
            .with_context(|| format!("Failed to create tessdata directory {:?}", data_dir))?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(300))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            data_dir,
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn language_path(&self, code: &str) -> PathBuf {
        self.data_dir.join(format!("{}.traineddata", code))
    }

    pub fn download_url(&self, code: &str) -> String {
        format!("{}/{}.traineddata", self.base_url, code)
    }

    /// Whether a plausible traineddata file is already on disk
    pub fn is_available(&self, code: &str) -> bool {
        std::fs::metadata(self.language_path(code))
            .map(|m| m.len() >= MIN_TRAINEDDATA_BYTES)
            .unwrap_or(false)
    }

    /// Make sure `code` is on disk, downloading it if needed.
    /// Returns the tessdata directory to pass to tesseract.
    pub async fn ensure_language(
        &self,
        code: &str,
        progress: &ProgressSender,
    ) -> Result<PathBuf, RecognitionError> {
        if !is_valid_language_code(code) {
            return Err(RecognitionError::UnsupportedLanguage(code.to_string()));
        }

        if self.is_available(code) {
            debug!("Language data for {} already available", code);
            return Ok(self.data_dir.clone());
        }

        progress.send(ProgressEvent::downloading(None));
        self.download(code, progress)
            .await
            .map_err(RecognitionError::LanguageData)?;
        self.update_manifest(code)
            .map_err(RecognitionError::LanguageData)?;

        Ok(self.data_dir.clone())
    }

    async fn download(&self, code: &str, progress: &ProgressSender) -> Result<()> {
        let url = self.download_url(code);
        let path = self.language_path(code);

        if std::env::var(OFFLINE_ENV).is_ok() {
            anyhow::bail!(
                "Offline mode: cannot download language data. Place {}.traineddata in {:?}",
                code,
                self.data_dir
            );
        }

        info!("Downloading language data for {} from {}", code, url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .context("Failed to send download request")?;

        if !response.status().is_success() {
            anyhow::bail!("Download failed with status {}: {}", response.status(), url);
        }

        let total_size = response.content_length();
        debug!("Download size: {:?} bytes", total_size);

        // Deleted on drop unless persisted
        let mut file = tempfile::Builder::new()
            .prefix(&format!("{}.", code))
            .suffix(".traineddata.tmp")
            .tempfile_in(&self.data_dir)
            .context("Failed to create temp file")?;

        let mut downloaded: u64 = 0;
        let mut last_percent = None;
        let mut stream = response.bytes_stream();

        while let Some(chunk) = stream.next().await {
            if progress.is_cancelled() {
                anyhow::bail!("Download of {} cancelled", code);
            }

            let chunk = chunk.context("Error reading download stream")?;
            file.write_all(&chunk).context("Failed to write to temp file")?;
            downloaded += chunk.len() as u64;

            // One event per whole percent is plenty for the status line
            if let Some(total) = total_size.filter(|t| *t > 0) {
                let fraction = (downloaded as f32 / total as f32).min(1.0);
                let percent = (fraction * 100.0) as u8;
                if last_percent != Some(percent) {
                    last_percent = Some(percent);
                    progress.send(ProgressEvent::downloading(Some(fraction)));
                }
            }
        }

        file.flush().context("Failed to flush temp file")?;

        if downloaded < MIN_TRAINEDDATA_BYTES {
            anyhow::bail!("Downloaded language data for {} is too small ({} bytes)", code, downloaded);
        }

        file.persist(&path)
            .map_err(|e| e.error)
            .context("Failed to move downloaded file to final location")?;

        info!("Language data for {} ready ({} bytes)", code, downloaded);
        Ok(())
    }

    fn update_manifest(&self, code: &str) -> Result<()> {
        let mut manifest = self.load_manifest().unwrap_or_default();

        let path = self.language_path(code);
        let data = std::fs::read(&path)?;
        let hash = format!("{:x}", Sha256::digest(&data));

        let info = LanguageInfo {
            code: code.to_string(),
            filename: format!("{}.traineddata", code),
            size_bytes: data.len() as u64,
            sha256: hash,
            downloaded_at: unix_now(),
        };

        if let Some(existing) = manifest.languages.iter_mut().find(|l| l.code == code) {
            *existing = info;
        } else {
            manifest.languages.push(info);
        }

        self.save_manifest(&manifest)
    }

    pub fn load_manifest(&self) -> Result<LanguageManifest> {
        let manifest_path = self.data_dir.join("manifest.json");
        if manifest_path.exists() {
            let content = std::fs::read_to_string(&manifest_path)?;
            Ok(serde_json::from_str(&content)?)
        } else {
            Ok(LanguageManifest::default())
        }
    }

    pub fn save_manifest(&self, manifest: &LanguageManifest) -> Result<()> {
        let manifest_path = self.data_dir.join("manifest.json");
        let content = serde_json::to_string_pretty(manifest)?;
        std::fs::write(manifest_path, content)?;
        Ok(())
    }
}

fn unix_now() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
