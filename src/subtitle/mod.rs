// Numbered-cue subtitle model
//
// - Cue: one entry, labels kept verbatim so serialization is byte-exact
// - CueStore: ordered collection with windowed text access
// - parser: raw stream -> CueStore

pub mod parser;

pub use parser::{parse_cues, ParseOutcome, CUE_SEPARATOR, MIN_BLOCK_LEN};

use crate::error::{Result, RetitleError};

/// One subtitle entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cue {
    sequence_label: String,
    timing_label: String,
    text: String,
}

impl Cue {
    pub fn new<S1, S2, S3>(sequence_label: S1, timing_label: S2, text: S3) -> Self
    where
        S1: Into<String>,
        S2: Into<String>,
        S3: Into<String>,
    {
        Self {
            sequence_label: sequence_label.into(),
            timing_label: timing_label.into(),
            text: text.into(),
        }
    }

    /// Sequence number line, including its line terminator
    pub fn sequence_label(&self) -> &str {
        &self.sequence_label
    }

    /// Timing line, including its line terminator
    pub fn timing_label(&self) -> &str {
        &self.timing_label
    }

    /// Display text, terminated by the blank-line separator
    pub fn text(&self) -> &str {
        &self.text
    }
}

/// Ordered, exclusively owned collection of cues
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CueStore {
    cues: Vec<Cue>,
}

impl CueStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, cue: Cue) {
        self.cues.push(cue);
    }

    pub fn len(&self) -> usize {
        self.cues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cues.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Cue> {
        self.cues.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Cue> {
        self.cues.iter()
    }

    /// Texts of the cues in `[start, end)`, in order
    pub fn text_range(&self, start: usize, end: usize) -> Result<Vec<String>> {
        let cues = self.cues.get(start..end).ok_or(RetitleError::OutOfRange {
            start,
            end,
            len: self.cues.len(),
        })?;

        Ok(cues.iter().map(|cue| cue.text.clone()).collect())
    }

    /// Replace the text of the cue at `index`
    pub fn set_text_at<S: Into<String>>(&mut self, index: usize, text: S) -> Result<()> {
        let len = self.cues.len();
        let cue = self.cues.get_mut(index).ok_or(RetitleError::OutOfRange {
            start: index,
            end: index + 1,
            len,
        })?;

        cue.text = text.into();
        Ok(())
    }

    /// Reassemble the full subtitle stream
    pub fn serialize(&self) -> String {
        let capacity = self
            .cues
            .iter()
            .map(|cue| cue.sequence_label.len() + cue.timing_label.len() + cue.text.len())
            .sum();

        let mut stream = String::with_capacity(capacity);
        for cue in &self.cues {
            stream.push_str(&cue.sequence_label);
            stream.push_str(&cue.timing_label);
            stream.push_str(&cue.text);
        }
        stream
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_store() -> CueStore {
        let mut store = CueStore::new();
        store.append(Cue::new("1\n", "00:00:01,000 --> 00:00:02,000\n", "Hello\n\n"));
        store.append(Cue::new("2\n", "00:00:03,000 --> 00:00:04,000\n", "World\n\n"));
        store.append(Cue::new("3\n", "00:00:05,000 --> 00:00:06,000\n", "<i>Bye</i>\n\n"));
        store
    }

    #[test]
    fn test_text_range_returns_window_in_order() {
        let store = sample_store();

        assert_eq!(store.text_range(1, 3).unwrap(), vec!["World\n\n", "<i>Bye</i>\n\n"]);
        assert!(store.text_range(2, 2).unwrap().is_empty());
        assert!(store.text_range(3, 3).unwrap().is_empty());
    }

    #[test]
    fn test_text_range_rejects_invalid_bounds() {
        let store = sample_store();

        assert!(matches!(
            store.text_range(2, 4),
            Err(RetitleError::OutOfRange { start: 2, end: 4, len: 3 })
        ));
        assert!(matches!(store.text_range(2, 1), Err(RetitleError::OutOfRange { .. })));
    }

    #[test]
    fn test_set_text_at() {
        let mut store = sample_store();

        store.set_text_at(1, "Monde\n\n").unwrap();
        assert_eq!(store.get(1).map(Cue::text), Some("Monde\n\n"));
        assert_eq!(store.get(1).map(Cue::sequence_label), Some("2\n"));

        assert!(matches!(
            store.set_text_at(3, "nope"),
            Err(RetitleError::OutOfRange { start: 3, end: 4, len: 3 })
        ));
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn test_serialize_concatenates_labels_and_text() {
        let store = sample_store();

        assert_eq!(
            store.serialize(),
            "1\n00:00:01,000 --> 00:00:02,000\nHello\n\n\
             2\n00:00:03,000 --> 00:00:04,000\nWorld\n\n\
             3\n00:00:05,000 --> 00:00:06,000\n<i>Bye</i>\n\n"
        );
        assert_eq!(CueStore::new().serialize(), "");
    }
}
