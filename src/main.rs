//! TextLens - desktop OCR
//!
//! Open, drop or paste an image, read its text through an OCR engine and
//! optionally translate it through a remote translation service.

mod app;
mod config;
mod session;
mod shared;
mod storage;
mod translation;
mod ui;
mod vision;

use anyhow::{Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use crate::app::TextLensApp;
use crate::config::{AppConfig, OcrBackend};
use crate::storage::PreferenceStore;
use crate::ui::TextLensUi;

/// TextLens - extract text from images
#[derive(Parser, Debug)]
#[command(name = "textlens")]
#[command(about = "Extract text from images, with optional translation")]
struct Args {
    /// Configuration file (default: config.toml in the config directory)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Initial recognition language code (e.g. eng, ben)
    #[arg(short, long)]
    language: Option<String>,

    /// OCR backend, overriding the configuration
    #[arg(long, value_enum)]
    backend: Option<OcrBackend>,

    /// Image to recognize at startup
    image: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // RUST_LOG wins over the default level
    let default_level = if args.verbose { "textlens=debug,info" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let subscriber = FmtSubscriber::builder().with_env_filter(filter).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("TextLens starting...");

    let mut config = load_or_create_config(args.config.as_deref());
    if let Some(backend) = args.backend {
        config.recognition.backend = backend;
    }
    if let Some(language) = &args.language {
        if config.general.languages.iter().all(|l| &l.code != language) {
            warn!("Language {} is not in the configured list", language);
        }
    }

    let preferences = PreferenceStore::open_default().unwrap_or_else(|e| {
        warn!("Could not resolve config directory ({}), keeping preferences locally", e);
        PreferenceStore::at("preferences.toml")
    });
    info!("Preferences stored in {:?}", preferences.path());

    let coordinator = TextLensApp::new(config).context("Failed to initialize TextLens")?;
    let window = TextLensUi::new(coordinator, preferences, args.language, args.image);

    ui::run(window).map_err(|e| anyhow::anyhow!("Window error: {}", e))?;

    info!("TextLens shutdown complete");
    Ok(())
}

/// Load configuration from file or create default
fn load_or_create_config(explicit: Option<&Path>) -> AppConfig {
    if let Some(path) = explicit {
        return match config::load_config(path) {
            Ok(config) => {
                info!("Loaded configuration from {:?}", path);
                config
            }
            Err(e) => {
                warn!("Failed to load {:?}: {:#}. Using defaults", path, e);
                AppConfig::default()
            }
        };
    }

    if let Ok(config_dir) = storage::get_config_dir() {
        let config_path = config_dir.join("config.toml");
        if config_path.exists() {
            match config::load_config(&config_path) {
                Ok(config) => {
                    info!("Loaded configuration from {:?}", config_path);
                    return config;
                }
                Err(e) => warn!("Ignoring invalid {:?}: {:#}", config_path, e),
            }
        } else {
            let config = AppConfig::default();
            match config::save_config(&config, &config_path) {
                Ok(()) => info!("Wrote default configuration to {:?}", config_path),
                Err(e) => warn!("Could not write default configuration: {:#}", e),
            }
            return config;
        }
    }

    info!("Using default configuration");
    AppConfig::default()
}
