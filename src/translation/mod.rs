//! Translation relay
//!
//! Recognized text in the trigger language is forwarded to a remote
//! translation endpoint. The relay never fails a job: any error is replaced
//! by a fixed fallback message.

pub mod client;

pub use client::HttpTranslator;

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

use crate::config::TranslationSettings;

#[derive(Debug, Error)]
pub enum TranslationError {
    #[error("translation request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("translation service returned {0}")]
    Status(reqwest::StatusCode),

    #[error("malformed translation response: {0}")]
    Malformed(String),
}

/// Remote translation capability
#[async_trait]
pub trait Translator: Send + Sync {
    async fn translate(&self, text: &str, target_lang: &str) -> Result<String, TranslationError>;
}

/// Decides whether a recognition result should be translated
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationTrigger {
    /// Recognition language that activates translation; `None` disables it
    pub source_language: Option<String>,
}

impl TranslationTrigger {
    pub fn new(source_language: impl Into<String>) -> Self {
        Self {
            source_language: Some(source_language.into()),
        }
    }

    pub fn disabled() -> Self {
        Self { source_language: None }
    }

    pub fn from_settings(settings: &TranslationSettings) -> Self {
        if settings.enabled {
            Self::new(settings.trigger_language.clone())
        } else {
            Self::disabled()
        }
    }

    /// True iff `language` is the trigger language and `text` has content
    pub fn should_translate(&self, language: &str, text: &str) -> bool {
        self.source_language.as_deref() == Some(language) && !text.trim().is_empty()
    }
}

/// Wraps a [`Translator`], substituting the fallback message on failure
#[derive(Clone)]
pub struct TranslationRelay {
    translator: Arc<dyn Translator>,
    target_language: String,
    fallback_message: String,
}

impl TranslationRelay {
    pub fn new(
        translator: Arc<dyn Translator>,
        target_language: impl Into<String>,
        fallback_message: impl Into<String>,
    ) -> Self {
        Self {
            translator,
            target_language: target_language.into(),
            fallback_message: fallback_message.into(),
        }
    }

    pub fn from_settings(translator: Arc<dyn Translator>, settings: &TranslationSettings) -> Self {
        Self::new(translator, &settings.target_language, &settings.fallback_message)
    }

    /// Translate `text`, or return the fallback message
    pub async fn translate(&self, text: &str) -> String {
        match self.translator.translate(text, &self.target_language).await {
            Ok(translated) => {
                info!(
                    target_lang = %self.target_language,
                    chars = translated.chars().count(),
                    "Translation received"
                );
                translated
            }
            Err(e) => {
                warn!("Translation error: {}", e);
                self.fallback_message.clone()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    /// Records requests and answers from a fixed script
    struct ScriptedTranslator {
        calls: Mutex<Vec<(String, String)>>,
        reply: Option<String>,
    }

    #[async_trait]
    impl Translator for ScriptedTranslator {
        async fn translate(&self, text: &str, target_lang: &str) -> Result<String, TranslationError> {
            self.calls.lock().push((text.to_string(), target_lang.to_string()));
            self.reply
                .clone()
                .ok_or_else(|| TranslationError::Malformed("scripted failure".to_string()))
        }
    }

    #[test]
    fn test_trigger_matches_language_and_content() {
        let trigger = TranslationTrigger::new("ben");
        assert!(trigger.should_translate("ben", "আমি"));
        assert!(!trigger.should_translate("eng", "hello"));
        assert!(!trigger.should_translate("ben", "   "));
        assert!(!trigger.should_translate("ben", ""));
    }

    #[test]
    fn test_disabled_trigger_never_fires() {
        let settings = TranslationSettings {
            enabled: false,
            ..TranslationSettings::default()
        };
        let trigger = TranslationTrigger::from_settings(&settings);
        assert!(!trigger.should_translate("ben", "আমি"));
    }

    #[tokio::test]
    async fn test_relay_passes_target_language() {
        let translator = Arc::new(ScriptedTranslator {
            calls: Mutex::new(Vec::new()),
            reply: Some("I".to_string()),
        });
        let relay = TranslationRelay::new(translator.clone(), "en", "unavailable");

        assert_eq!(relay.translate("আমি").await, "I");
        assert_eq!(translator.calls.lock().as_slice(), &[("আমি".to_string(), "en".to_string())]);
    }

    #[tokio::test]
    async fn test_relay_substitutes_fallback() {
        let translator = Arc::new(ScriptedTranslator {
            calls: Mutex::new(Vec::new()),
            reply: None,
        });
        let relay = TranslationRelay::from_settings(translator, &TranslationSettings::default());

        let text = relay.translate("আমি").await;
        assert_eq!(text, TranslationSettings::default().fallback_message);
    }
}
