//! retitle - batched subtitle translation for video files
//!
//! Extracts the embedded numbered-cue subtitles of a video with ffmpeg,
//! translates the cue text in fixed-size batches and muxes the result
//! back into a new container.

pub mod cli;
pub mod config;
pub mod error;
pub mod media;
pub mod subtitle;
pub mod translate;
pub mod workflow;
