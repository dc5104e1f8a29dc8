use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::error::{Result, RetitleError};
use crate::translate::TextFormat;

/// Environment variable consulted when no API key is configured
pub const API_KEY_ENV: &str = "GOOGLE_TRANSLATE_API_KEY";

// Default values for optional configuration fields
fn default_endpoint() -> String {
    "https://translation.googleapis.com".to_string()
}

fn default_source_language() -> String {
    "en".to_string()
}

fn default_target_language() -> String {
    "bg".to_string()
}

fn default_binary_path() -> String {
    "ffmpeg".to_string()
}

fn default_batch_size() -> usize {
    10
}

fn default_format() -> TextFormat {
    TextFormat::Html
}

fn default_timeout_secs() -> u64 {
    300
}

fn default_subtitle_codecs() -> BTreeMap<String, String> {
    ["mp4", "m4v", "mov"]
        .into_iter()
        .map(|ext| (ext.to_string(), "mov_text".to_string()))
        .collect()
}

fn default_subtitle_codec() -> String {
    "ass".to_string()
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub translate: TranslateConfig,
    #[serde(default)]
    pub media: MediaConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslateConfig {
    /// Translation API base URL
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// API key; falls back to GOOGLE_TRANSLATE_API_KEY
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Language tag of the subtitle text
    #[serde(default = "default_source_language")]
    pub source_language: String,
    /// Language tag to translate into
    #[serde(default = "default_target_language")]
    pub target_language: String,
    /// Number of cues sent per request
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    /// How the service treats markup in cue text
    #[serde(default = "default_format")]
    pub format: TextFormat,
    /// HTTP request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaConfig {
    /// Path to ffmpeg binary
    #[serde(default = "default_binary_path")]
    pub binary_path: String,
    /// Subtitle codec for extensions missing from `subtitle_codecs`
    #[serde(default = "default_subtitle_codec")]
    pub default_subtitle_codec: String,
    /// Subtitle codec by output file extension (lowercase, without dot)
    #[serde(default = "default_subtitle_codecs")]
    pub subtitle_codecs: BTreeMap<String, String>,
}

impl Default for TranslateConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            api_key: None,
            source_language: default_source_language(),
            target_language: default_target_language(),
            batch_size: default_batch_size(),
            format: default_format(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            binary_path: default_binary_path(),
            default_subtitle_codec: default_subtitle_codec(),
            subtitle_codecs: default_subtitle_codecs(),
        }
    }
}

impl TranslateConfig {
    /// Configured API key, or the one from the environment
    pub fn resolve_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .or_else(|| std::env::var(API_KEY_ENV).ok().filter(|key| !key.trim().is_empty()))
    }
}

impl MediaConfig {
    /// Subtitle codec to mux with, chosen by the output file extension
    pub fn subtitle_codec_for(&self, output_path: &Path) -> &str {
        output_path
            .extension()
            .map(|ext| ext.to_string_lossy().to_lowercase())
            .and_then(|ext| self.subtitle_codecs.get(&ext))
            .map(String::as_str)
            .unwrap_or(&self.default_subtitle_codec)
    }
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| RetitleError::Config(format!("Failed to read config file: {}", e)))?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| RetitleError::Config(format!("Failed to parse config file: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| RetitleError::Config(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, content)
            .map_err(|e| RetitleError::Config(format!("Failed to write config file: {}", e)))?;

        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.translate.batch_size == 0 {
            return Err(RetitleError::Config("translate.batch_size must be at least 1".to_string()));
        }
        if self.translate.source_language.trim().is_empty()
            || self.translate.target_language.trim().is_empty()
        {
            return Err(RetitleError::Config(
                "translate.source_language and translate.target_language must be set".to_string(),
            ));
        }
        if self.media.binary_path.trim().is_empty() {
            return Err(RetitleError::Config("media.binary_path must be set".to_string()));
        }
        Ok(())
    }
}
