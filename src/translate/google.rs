use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use super::{TranslationClient, TranslationRequest};
use crate::config::{TranslateConfig, API_KEY_ENV};
use crate::error::{Result, RetitleError};

/// Request body of `POST /language/translate/v2`
#[derive(Debug, Clone, Serialize)]
struct TranslateBody<'a> {
    q: &'a [String],
    source: &'a str,
    target: &'a str,
    format: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
struct TranslateResponse {
    data: TranslateData,
}

#[derive(Debug, Clone, Deserialize)]
struct TranslateData {
    translations: Vec<Translation>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Translation {
    translated_text: String,
}

#[derive(Debug, Clone, Deserialize)]
struct ErrorResponse {
    error: ApiError,
}

#[derive(Debug, Clone, Deserialize)]
struct ApiError {
    code: u16,
    message: String,
}

/// Google Cloud Translation (v2 REST) client, created once per run
pub struct GoogleTranslateClient {
    client: Client,
    url: String,
    api_key: String,
}

impl GoogleTranslateClient {
    pub fn new(config: &TranslateConfig) -> Result<Self> {
        let api_key = config.resolve_api_key().ok_or_else(|| {
            RetitleError::Config(format!(
                "No translation API key: set translate.api_key or {}",
                API_KEY_ENV
            ))
        })?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            url: format!("{}/language/translate/v2", config.endpoint.trim_end_matches('/')),
            api_key,
        })
    }
}

#[async_trait]
impl TranslationClient for GoogleTranslateClient {
    async fn translate_batch(&self, request: &TranslationRequest) -> Result<Vec<String>> {
        let body = TranslateBody {
            q: &request.texts,
            source: &request.source_language,
            target: &request.target_language,
            format: request.format.as_str(),
        };

        debug!("Sending {} texts to {}", request.texts.len(), self.url);

        let response = self
            .client
            .post(&self.url)
            .query(&[("key", &self.api_key)])
            .json(&body)
            .send()
            .await
            .map_err(|e| RetitleError::Translation(format!("HTTP request failed: {}", e)))?;

        let status = response.status();
        let payload = response
            .text()
            .await
            .map_err(|e| RetitleError::Translation(format!("Failed to read response: {}", e)))?;

        if !status.is_success() {
            return Err(RetitleError::Translation(describe_error(status.as_u16(), &payload)));
        }

        parse_translations(&payload)
    }
}

fn parse_translations(payload: &str) -> Result<Vec<String>> {
    let response: TranslateResponse = serde_json::from_str(payload)
        .map_err(|e| RetitleError::Translation(format!("Failed to parse response: {}", e)))?;

    Ok(response
        .data
        .translations
        .into_iter()
        .map(|translation| translation.translated_text)
        .collect())
}

fn describe_error(status: u16, payload: &str) -> String {
    match serde_json::from_str::<ErrorResponse>(payload) {
        Ok(ErrorResponse { error }) => {
            format!("Translation API error {}: {}", error.code, error.message)
        }
        Err(_) => format!("Translation API error {}: {}", status, payload.trim()),
    }
}
