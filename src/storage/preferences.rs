//! Persisted user preferences
//!
//! A small TOML key-value file that survives across sessions. Only the theme
//! lives here; everything else is configuration.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Window color theme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn is_dark(self) -> bool {
        self == Theme::Dark
    }

    pub fn from_dark(dark: bool) -> Self {
        if dark {
            Theme::Dark
        } else {
            Theme::Light
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct PreferenceFile {
    #[serde(default)]
    theme: Theme,
}

/// File-backed preference store
#[derive(Debug, Clone)]
pub struct PreferenceStore {
    path: PathBuf,
}

impl PreferenceStore {
    /// Store located in the application config directory
    pub fn open_default() -> Result<Self> {
        let config_dir = super::get_config_dir()?;
        Ok(Self::at(config_dir.join("preferences.toml")))
    }

    /// Store backed by an explicit file
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the saved theme. Missing or unreadable files yield the light theme.
    pub fn load_theme(&self) -> Theme {
        if !self.path.exists() {
            return Theme::default();
        }

        let parsed = std::fs::read_to_string(&self.path)
            .map_err(anyhow::Error::from)
            .and_then(|content| Ok(toml::from_str::<PreferenceFile>(&content)?));

        match parsed {
            Ok(file) => {
                debug!("Loaded theme preference: {}", file.theme.name());
                file.theme
            }
            Err(e) => {
                warn!("Ignoring unreadable preferences at {:?}: {}", self.path, e);
                Theme::default()
            }
        }
    }

    /// Persist the theme
    pub fn save_theme(&self, theme: Theme) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(&PreferenceFile { theme })?;
        std::fs::write(&self.path, content)?;
        debug!("Saved theme preference: {}", theme.name());
        Ok(())
    }
}
