use std::ops::Range;
use tracing::{debug, info};

use super::{TextFormat, TranslationClient, TranslationRequest};
use crate::config::TranslateConfig;
use crate::error::{Result, RetitleError};
use crate::subtitle::{CueStore, CUE_SEPARATOR};

/// Consecutive, non-overlapping windows of at most `batch_size` covering `[0, len)`
pub fn batch_windows(len: usize, batch_size: usize) -> impl Iterator<Item = Range<usize>> {
    let step = batch_size.max(1);
    (0..len).step_by(step).map(move |start| start..(start + step).min(len))
}

/// Translates a whole CueStore window by window through one client
pub struct BatchTranslator {
    client: Box<dyn TranslationClient>,
    source_language: String,
    target_language: String,
    batch_size: usize,
    format: TextFormat,
}

impl BatchTranslator {
    pub fn new(client: Box<dyn TranslationClient>, config: &TranslateConfig) -> Self {
        Self {
            client,
            source_language: config.source_language.clone(),
            target_language: config.target_language.clone(),
            batch_size: config.batch_size.max(1),
            format: config.format,
        }
    }

    /// Translate every cue in order; returns the number of requests made.
    ///
    /// Stops at the first failing window. Cues of that window and of every
    /// later window keep their current text.
    pub async fn translate_store(&self, store: &mut CueStore) -> Result<usize> {
        let total = store.len();
        let mut batches = 0;

        info!(
            "Translating {} cues from {} to {} in batches of {}",
            total, self.source_language, self.target_language, self.batch_size
        );

        for window in batch_windows(total, self.batch_size) {
            info!("Translating cues {}-{} of {}", window.start + 1, window.end, total);
            self.translate_window(store, window).await?;
            batches += 1;
        }

        info!("Translated {} cues in {} batches", total, batches);
        Ok(batches)
    }

    async fn translate_window(&self, store: &mut CueStore, window: Range<usize>) -> Result<()> {
        let request = TranslationRequest {
            texts: store.text_range(window.start, window.end)?,
            source_language: self.source_language.clone(),
            target_language: self.target_language.clone(),
            format: self.format,
        };

        let translations = self.client.translate_batch(&request).await?;

        if translations.len() != request.texts.len() {
            return Err(RetitleError::Translation(format!(
                "Expected {} translations for cues {}-{}, got {}",
                request.texts.len(),
                window.start + 1,
                window.end,
                translations.len()
            )));
        }

        for (index, translation) in window.zip(translations) {
            debug!("Cue {}: {:?}", index + 1, translation);
            store.set_text_at(index, terminate_cue_text(&translation))?;
        }

        Ok(())
    }
}

/// End a translated text with exactly one blank line, whatever newlines the service kept
fn terminate_cue_text(translation: &str) -> String {
    format!("{}{}", translation.trim_end_matches('\n'), CUE_SEPARATOR)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::subtitle::{parse_cues, Cue};
    use crate::translate::MockTranslationClient;
    use mockall::{predicate, Sequence};
    use std::collections::HashMap;
    use tokio_test::{assert_err, assert_ok};

    fn config(batch_size: usize) -> TranslateConfig {
        TranslateConfig {
            batch_size,
            ..TranslateConfig::default()
        }
    }

    fn numbered_store(count: usize) -> CueStore {
        let mut store = CueStore::new();
        for i in 0..count {
            store.append(Cue::new(
                format!("{}\n", i + 1),
                "00:00:01,000 --> 00:00:02,000\n",
                format!("line {}\n\n", i),
            ));
        }
        store
    }

    /// Client that returns its input unchanged
    fn echo_client() -> MockTranslationClient {
        let mut client = MockTranslationClient::new();
        client
            .expect_translate_batch()
            .returning(|request| Ok(request.texts.clone()));
        client
    }

    #[test]
    fn test_batch_windows_cover_range() {
        let windows: Vec<_> = batch_windows(23, 10).collect();
        assert_eq!(windows, vec![0..10, 10..20, 20..23]);

        assert_eq!(batch_windows(20, 10).count(), 2);
        assert_eq!(batch_windows(0, 10).count(), 0);
        assert_eq!(batch_windows(3, 1).collect::<Vec<_>>(), vec![0..1, 1..2, 2..3]);
    }

    #[test]
    fn test_terminate_cue_text() {
        assert_eq!(terminate_cue_text("Bonjour"), "Bonjour\n\n");
        assert_eq!(terminate_cue_text("Bonjour\n\n"), "Bonjour\n\n");
        assert_eq!(terminate_cue_text("Deux\nlignes"), "Deux\nlignes\n\n");
        assert_eq!(terminate_cue_text(""), "\n\n");
    }

    #[tokio::test]
    async fn test_reply_newlines_collapse_to_one_blank_line() {
        let mut store = numbered_store(3);
        let mut client = MockTranslationClient::new();
        client.expect_translate_batch().times(1).returning(|_| {
            Ok(vec![
                "Bonjour\n".to_string(),
                "Monde\n\n\n".to_string(),
                "Salut".to_string(),
            ])
        });

        let translator = BatchTranslator::new(Box::new(client), &config(10));
        assert_ok!(translator.translate_store(&mut store).await);

        assert_eq!(
            store.text_range(0, 3).unwrap(),
            vec!["Bonjour\n\n", "Monde\n\n", "Salut\n\n"]
        );
        assert!(store.serialize().ends_with("3\n00:00:01,000 --> 00:00:02,000\nSalut\n\n"));
    }

    #[tokio::test]
    async fn test_hello_world_example() {
        let stream = "1\n00:00:01,000 --> 00:00:02,000\nHello\n\n\
                      2\n00:00:03,000 --> 00:00:04,000\nWorld\n\n";
        let mut store = parse_cues(stream).store;

        let dictionary: HashMap<&str, &str> =
            [("Hello\n\n", "Bonjour\n\n"), ("World\n\n", "Monde\n\n")].into_iter().collect();

        let mut client = MockTranslationClient::new();
        client
            .expect_translate_batch()
            .times(2)
            .returning(move |request| {
                Ok(request
                    .texts
                    .iter()
                    .map(|text| dictionary[text.as_str()].to_string())
                    .collect())
            });

        let translator = BatchTranslator::new(Box::new(client), &config(1));
        let batches = translator.translate_store(&mut store).await.unwrap();

        assert_eq!(batches, 2);
        assert_eq!(
            store.serialize(),
            "1\n00:00:01,000 --> 00:00:02,000\nBonjour\n\n\
             2\n00:00:03,000 --> 00:00:04,000\nMonde\n\n"
        );
    }

    #[tokio::test]
    async fn test_windows_are_requested_in_order() {
        let mut store = numbered_store(25);
        let mut client = MockTranslationClient::new();
        let mut seq = Sequence::new();

        for window in [0..10, 10..20, 20..25] {
            let expected: Vec<String> = window.map(|i| format!("line {}\n\n", i)).collect();
            client
                .expect_translate_batch()
                .withf(move |request| {
                    request.texts == expected
                        && request.source_language == "en"
                        && request.target_language == "bg"
                        && request.format == TextFormat::Html
                })
                .times(1)
                .in_sequence(&mut seq)
                .returning(|request| Ok(request.texts.iter().map(|t| t.to_uppercase()).collect()));
        }

        let translator = BatchTranslator::new(Box::new(client), &config(10));
        assert_eq!(translator.translate_store(&mut store).await.unwrap(), 3);

        for (i, cue) in store.iter().enumerate() {
            assert_eq!(cue.text(), format!("LINE {}\n\n", i));
        }
    }

    #[tokio::test]
    async fn test_identity_translation_round_trips() {
        let stream = "1\n00:00:01,000 --> 00:00:02,000\n<b>Bold</b>\nline\n\n\
                      2\n00:00:03,000 --> 00:00:04,000\nPlain\n\n\
                      3\n00:00:05,000 --> 00:00:06,000\nLast\n\n";

        for batch_size in [1, 2, 3, 10] {
            let mut store = parse_cues(stream).store;
            let translator = BatchTranslator::new(Box::new(echo_client()), &config(batch_size));

            assert_ok!(translator.translate_store(&mut store).await);
            assert_eq!(store.serialize(), stream, "batch size {}", batch_size);
        }
    }

    #[tokio::test]
    async fn test_empty_store_makes_no_requests() {
        let mut client = MockTranslationClient::new();
        client.expect_translate_batch().times(0);

        let translator = BatchTranslator::new(Box::new(client), &config(10));
        let mut store = CueStore::new();

        assert_eq!(translator.translate_store(&mut store).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_short_response_fails_without_touching_window() {
        let mut store = numbered_store(4);
        let mut client = MockTranslationClient::new();
        let mut seq = Sequence::new();

        client
            .expect_translate_batch()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(vec!["un\n\n".to_string(), "deux\n\n".to_string()]));
        client
            .expect_translate_batch()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(vec!["trois".to_string()]));

        let translator = BatchTranslator::new(Box::new(client), &config(2));
        let err = assert_err!(translator.translate_store(&mut store).await);

        assert!(matches!(err, RetitleError::Translation(_)));
        assert_eq!(store.len(), 4);
        assert_eq!(store.text_range(0, 4).unwrap(), vec!["un\n\n", "deux\n\n", "line 2\n\n", "line 3\n\n"]);
    }

    #[tokio::test]
    async fn test_client_error_stops_the_run() {
        let mut store = numbered_store(5);
        let mut client = MockTranslationClient::new();

        client
            .expect_translate_batch()
            .with(predicate::function(|request: &TranslationRequest| request.texts.len() == 5))
            .times(1)
            .returning(|_| Err(RetitleError::Translation("quota exceeded".to_string())));

        let translator = BatchTranslator::new(Box::new(client), &config(10));
        let err = assert_err!(translator.translate_store(&mut store).await);

        assert_eq!(err.to_string(), "Translation error: quota exceeded");
        assert_eq!(store.get(0).unwrap().text(), "line 0\n\n");
    }
}
