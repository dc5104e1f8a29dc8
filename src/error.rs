use thiserror::Error;

#[derive(Error, Debug)]
pub enum RetitleError {
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Subtitle extraction failed: {0}")]
    Extraction(String),

    #[error("Translation error: {0}")]
    Translation(String),

    #[error("Cue range [{start}, {end}) out of bounds for {len} cues")]
    OutOfRange { start: usize, end: usize, len: usize },

    #[error("Subtitle muxing failed: {0}")]
    Sink(String),

    #[error("Media processing error: {0}")]
    Media(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("File not found: {0}")]
    FileNotFound(String),
}

pub type Result<T> = std::result::Result<T, RetitleError>;
