use tracing::{debug, warn};

use super::{Cue, CueStore};

/// Blank line separating two cues
pub const CUE_SEPARATOR: &str = "\n\n";

/// Blocks shorter than this (in bytes) are noise, e.g. a stray trailing separator
pub const MIN_BLOCK_LEN: usize = 5;

/// Result of parsing a raw subtitle stream
#[derive(Debug, Clone, Default)]
pub struct ParseOutcome {
    pub store: CueStore,
    /// Blocks accepted although a sequence or timing line terminator was missing
    pub malformed: usize,
}

/// Split a raw numbered-cue stream into ordered cues.
///
/// Malformed blocks are tolerated: a line without terminator is kept as-is
/// and a missing line becomes the empty string.
pub fn parse_cues(raw: &str) -> ParseOutcome {
    let mut outcome = ParseOutcome::default();

    for (index, block) in raw.split(CUE_SEPARATOR).enumerate() {
        if block.len() < MIN_BLOCK_LEN {
            if !block.is_empty() {
                debug!("Skipping block {} ({} bytes)", index, block.len());
            }
            continue;
        }

        let (sequence_label, rest, sequence_terminated) = split_line(block);
        let (timing_label, text, timing_terminated) = split_line(rest);

        if !(sequence_terminated && timing_terminated) {
            warn!("Subtitle block {} is missing its sequence or timing line: {:?}", index, block);
            outcome.malformed += 1;
        }

        let mut text = text.to_string();
        text.push_str(CUE_SEPARATOR);
        outcome.store.append(Cue::new(sequence_label, timing_label, text));
    }

    outcome
}

/// Split off the first line including its `\n`; reports whether a terminator was found
fn split_line(input: &str) -> (&str, &str, bool) {
    match input.find('\n') {
        Some(pos) => (&input[..=pos], &input[pos + 1..], true),
        None => (input, "", false),
    }
}
