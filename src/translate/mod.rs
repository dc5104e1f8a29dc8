// Batched translation architecture
//
// - TranslationClient: the remote batch RPC boundary (injected, mockable)
// - google: Google Cloud Translation v2 client
// - batch: drives a CueStore through fixed-size windows

pub mod batch;
pub mod google;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub use batch::{batch_windows, BatchTranslator};
pub use google::GoogleTranslateClient;

use crate::config::TranslateConfig;
use crate::error::Result;

/// How the translation service should treat markup inside the texts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextFormat {
    /// Markup is kept intact instead of being escaped
    Html,
    Text,
}

impl TextFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Html => "html",
            Self::Text => "text",
        }
    }
}

/// One batch RPC: ordered texts plus the run-wide language pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationRequest {
    pub texts: Vec<String>,
    pub source_language: String,
    pub target_language: String,
    pub format: TextFormat,
}

/// Remote batch translation service.
///
/// Implementations return one translation per input text, in input order.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TranslationClient: Send + Sync {
    async fn translate_batch(&self, request: &TranslationRequest) -> Result<Vec<String>>;
}

/// Factory for creating translation client instances
pub struct TranslationClientFactory;

impl TranslationClientFactory {
    /// Create the default client (Google Cloud Translation)
    pub fn create_client(config: &TranslateConfig) -> Result<Box<dyn TranslationClient>> {
        Ok(Box::new(GoogleTranslateClient::new(config)?))
    }
}
