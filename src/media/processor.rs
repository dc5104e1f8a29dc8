use async_trait::async_trait;
use std::path::Path;
use tracing::{info, warn};

use super::{MediaCommandBuilder, MediaProcessorTrait};
use crate::config::MediaConfig;
use crate::error::{Result, RetitleError};

/// Concrete implementation of media processor (FFmpeg-based)
pub struct MediaProcessorImpl {
    config: MediaConfig,
    command_builder: MediaCommandBuilder,
}

impl MediaProcessorImpl {
    /// Create a new media processor implementation
    pub fn new(config: MediaConfig) -> Self {
        let command_builder = MediaCommandBuilder::new(&config.binary_path);

        Self {
            config,
            command_builder,
        }
    }
}

#[async_trait]
impl MediaProcessorTrait for MediaProcessorImpl {
    async fn extract_subtitles(&self, video_path: &Path) -> Result<String> {
        info!("Extracting subtitles from {}", video_path.display());

        let stdout = self
            .command_builder
            .extract_subtitles(video_path)
            .capture_stdout()
            .await
            .map_err(|e| match e {
                RetitleError::Media(message) => RetitleError::Extraction(message),
                other => other,
            })?;

        let subtitles = match String::from_utf8(stdout) {
            Ok(text) => text,
            Err(e) => {
                warn!("Subtitle stream is not valid UTF-8, decoding lossily");
                String::from_utf8_lossy(e.as_bytes()).into_owned()
            }
        };

        info!("Extracted {} bytes of subtitles", subtitles.len());
        Ok(subtitles)
    }

    async fn mux_subtitles(
        &self,
        video_path: &Path,
        subtitles: &str,
        output_path: &Path,
    ) -> Result<()> {
        let codec = self.config.subtitle_codec_for(output_path);
        info!(
            "Muxing subtitles ({}) into {} -> {}",
            codec,
            video_path.display(),
            output_path.display()
        );

        self.command_builder
            .mux_subtitles(video_path, output_path, codec)
            .pipe_stdin(subtitles.as_bytes())
            .await
            .map_err(|e| match e {
                RetitleError::Media(message) => RetitleError::Sink(message),
                other => other,
            })?;

        info!("Subtitle muxing completed successfully");
        Ok(())
    }

    async fn check_availability(&self) -> Result<()> {
        self.command_builder
            .version_check()
            .capture_stdout()
            .await
            .map_err(|e| RetitleError::Media(format!("Media processor not available: {}", e)))?;

        info!("Media processor is available");
        Ok(())
    }
}
