// Media processing behind a trait
//
// - Processor: ffmpeg-backed subtitle source and sink
// - Commands: command builders and execution over stdin/stdout

pub mod commands;
pub mod processor;

use async_trait::async_trait;
use std::path::Path;

pub use commands::*;
pub use processor::*;

use crate::config::MediaConfig;
use crate::error::Result;

/// Source and sink of the subtitle stream
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MediaProcessorTrait: Send + Sync {
    /// Extract the embedded subtitle stream as numbered-cue text
    async fn extract_subtitles(&self, video_path: &Path) -> Result<String>;

    /// Write a copy of the video with `subtitles` added as a new stream
    async fn mux_subtitles(
        &self,
        video_path: &Path,
        subtitles: &str,
        output_path: &Path,
    ) -> Result<()>;

    /// Check if media processor is available
    async fn check_availability(&self) -> Result<()>;
}

/// Factory for creating media processor instances
pub struct MediaProcessorFactory;

impl MediaProcessorFactory {
    /// Create the default media processor implementation (FFmpeg-based)
    pub fn create_processor(config: MediaConfig) -> Box<dyn MediaProcessorTrait> {
        Box::new(processor::MediaProcessorImpl::new(config))
    }
}
