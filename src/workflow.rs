use std::fmt;
use std::path::{Path, PathBuf};
use tempfile::TempPath;
use tracing::{info, warn};

use crate::config::Config;
use crate::error::{Result, RetitleError};
use crate::media::{MediaProcessorFactory, MediaProcessorTrait};
use crate::subtitle::parse_cues;
use crate::translate::{BatchTranslator, TranslationClient, TranslationClientFactory};

/// Coarse progress reported during a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Checkpoint {
    Extracted { cues: usize },
    Translated { cues: usize, batches: usize },
    Writing { output: PathBuf },
}

impl fmt::Display for Checkpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Extracted { cues } => write!(f, "Extracted {} subtitles... Translating", cues),
            Self::Translated { cues, batches } => write!(
                f,
                "Translated {} subtitles in {} batches... Writing new video file",
                cues, batches
            ),
            Self::Writing { output } => write!(f, "Writing {}", output.display()),
        }
    }
}

pub struct Workflow {
    media: Box<dyn MediaProcessorTrait>,
    translator: BatchTranslator,
}

impl Workflow {
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;

        let client = TranslationClientFactory::create_client(&config.translate)?;
        let media = MediaProcessorFactory::create_processor(config.media.clone());

        Ok(Self::with_components(&config, media, client))
    }

    /// Build a workflow around explicit collaborators
    pub fn with_components(
        config: &Config,
        media: Box<dyn MediaProcessorTrait>,
        client: Box<dyn TranslationClient>,
    ) -> Self {
        Self {
            media,
            translator: BatchTranslator::new(client, &config.translate),
        }
    }

    /// Translate the subtitles of `input_path` into a new video at `output_path`
    pub async fn run<F>(&self, input_path: &Path, output_path: &Path, mut on_checkpoint: F) -> Result<()>
    where
        F: FnMut(&Checkpoint),
    {
        info!("Processing {} -> {}", input_path.display(), output_path.display());

        if !input_path.exists() {
            return Err(RetitleError::FileNotFound(input_path.display().to_string()));
        }
        if same_file(input_path, output_path) {
            return Err(RetitleError::Config(format!(
                "Output {} would overwrite the input video",
                output_path.display()
            )));
        }

        self.media.check_availability().await?;

        let raw = self.media.extract_subtitles(input_path).await?;
        let parsed = parse_cues(&raw);
        if parsed.malformed > 0 {
            warn!("Tolerated {} malformed subtitle blocks", parsed.malformed);
        }

        let mut store = parsed.store;
        if store.is_empty() {
            return Err(RetitleError::Extraction(format!(
                "No subtitle cues found in {}",
                input_path.display()
            )));
        }
        on_checkpoint(&Checkpoint::Extracted { cues: store.len() });

        let batches = self.translator.translate_store(&mut store).await?;
        on_checkpoint(&Checkpoint::Translated {
            cues: store.len(),
            batches,
        });

        let subtitles = store.serialize();
        on_checkpoint(&Checkpoint::Writing {
            output: output_path.to_path_buf(),
        });

        // ffmpeg writes into a staging file so an existing output survives a failed mux
        let staging = staging_path(output_path)?;
        self.media.mux_subtitles(input_path, &subtitles, &staging).await?;
        staging.persist(output_path).map_err(|e| {
            RetitleError::Sink(format!(
                "Failed to move muxed video to {}: {}",
                output_path.display(),
                e.error
            ))
        })?;

        info!("Wrote {}", output_path.display());
        Ok(())
    }
}

/// Empty temporary file beside `output_path` with the same extension; deleted on drop
fn staging_path(output_path: &Path) -> Result<TempPath> {
    let dir = output_path
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let suffix = output_path
        .extension()
        .map(|ext| format!(".{}", ext.to_string_lossy()))
        .unwrap_or_default();

    let file = tempfile::Builder::new()
        .prefix(".retitle-")
        .suffix(&suffix)
        .tempfile_in(dir)
        .map_err(|e| {
            RetitleError::Sink(format!("Failed to create staging file in {}: {}", dir.display(), e))
        })?;

    Ok(file.into_temp_path())
}

fn same_file(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}
