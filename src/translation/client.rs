//! HTTP client for the translation endpoint
//!
//! `POST <endpoint>` with `{"text": ..., "targetLang": ...}`, expecting
//! `{"translatedText": ...}` back.

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::{debug, instrument};

use crate::config::TranslationSettings;
use crate::translation::{TranslationError, Translator};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TranslateRequest<'a> {
    text: &'a str,
    target_lang: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TranslateResponse {
    translated_text: String,
}

/// Translator talking to a remote HTTP service
pub struct HttpTranslator {
    endpoint: String,
    http_client: reqwest::Client,
}

impl HttpTranslator {
    pub fn new(settings: &TranslationSettings) -> Result<Self> {
        let mut builder = reqwest::Client::builder().connect_timeout(Duration::from_secs(10));
        if let Some(secs) = settings.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let http_client = builder.build().context("Failed to create HTTP client")?;

        Ok(Self {
            endpoint: settings.endpoint.clone(),
            http_client,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl Translator for HttpTranslator {
    #[instrument(skip(self, text), fields(chars = text.chars().count()))]
    async fn translate(&self, text: &str, target_lang: &str) -> Result<String, TranslationError> {
        let start = Instant::now();

        let response = self
            .http_client
            .post(&self.endpoint)
            .json(&TranslateRequest { text, target_lang })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(TranslationError::Status(status));
        }

        let body = response.bytes().await?;
        let parsed: TranslateResponse = serde_json::from_slice(&body)
            .map_err(|e| TranslationError::Malformed(e.to_string()))?;

        debug!("Translation completed in {:?}", start.elapsed());
        Ok(parsed.translated_text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{http::StatusCode, routing::post, Json, Router};
    use serde_json::{json, Value};

    async fn serve(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}/translate", addr)
    }

    fn translator(endpoint: String) -> HttpTranslator {
        HttpTranslator::new(&TranslationSettings {
            endpoint,
            timeout_secs: Some(5),
            ..TranslationSettings::default()
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_request_and_response_shape() {
        let endpoint = serve(Router::new().route(
            "/translate",
            post(|Json(body): Json<Value>| async move {
                let echoed = format!(
                    "{}->{}",
                    body["text"].as_str().unwrap_or_default(),
                    body["targetLang"].as_str().unwrap_or_default()
                );
                Json(json!({ "translatedText": echoed }))
            }),
        ))
        .await;

        let result = translator(endpoint).translate("আমি", "en").await.unwrap();
        assert_eq!(result, "আমি->en");
    }

    #[tokio::test]
    async fn test_server_error_is_status_error() {
        let endpoint = serve(Router::new().route(
            "/translate",
            post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
        ))
        .await;

        let err = translator(endpoint).translate("text", "en").await.unwrap_err();
        assert!(matches!(err, TranslationError::Status(s) if s.as_u16() == 500));
    }

    #[tokio::test]
    async fn test_missing_field_is_malformed() {
        let endpoint = serve(Router::new().route(
            "/translate",
            post(|| async { Json(json!({ "result": "nope" })) }),
        ))
        .await;

        let err = translator(endpoint).translate("text", "en").await.unwrap_err();
        assert!(matches!(err, TranslationError::Malformed(_)));
    }

    #[tokio::test]
    async fn test_unreachable_service_is_network_error() {
        let err = translator("http://127.0.0.1:1/translate".to_string())
            .translate("text", "en")
            .await
            .unwrap_err();
        assert!(matches!(err, TranslationError::Network(_)));
    }
}
