use clap::Parser;
use std::path::PathBuf;

/// Translate the embedded subtitles of a video into a new video file
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Input video file
    pub input: PathBuf,

    /// Output video file; its extension selects the subtitle codec
    pub output: PathBuf,
}
