//! Translation of foreign-language captions into English.

mod google;

pub use google::GoogleTranslator;

use async_trait::async_trait;
use thiserror::Error;

/// Source language value asking the provider to detect the language.
pub const AUTO_DETECT: &str = "auto";

/// Default target language.
pub const ENGLISH: &str = "en";

/// Translation failure. Fatal for the video being processed.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TranslationError {
    #[error("translation request failed: {0}")]
    Request(String),

    #[error("unexpected translation response: {0}")]
    InvalidResponse(String),
}

impl From<reqwest::Error> for TranslationError {
    fn from(err: reqwest::Error) -> Self {
        TranslationError::Request(err.to_string())
    }
}

/// Trait for translation services.
///
/// Input is line-oriented; implementations keep line order.
#[async_trait]
pub trait Translator: Send + Sync {
    async fn translate(
        &self,
        text: &str,
        source: &str,
        target: &str,
    ) -> Result<String, TranslationError>;
}

/// Split text into line-aligned batches of at most `max_chars` characters.
///
/// A single line longer than the limit becomes its own batch.
pub fn batch_lines(text: &str, max_chars: usize) -> Vec<String> {
    let mut batches = Vec::new();
    let mut current = String::new();

    for line in text.lines() {
        let needed = if current.is_empty() {
            line.chars().count()
        } else {
            current.chars().count() + 1 + line.chars().count()
        };

        if needed > max_chars && !current.is_empty() {
            batches.push(std::mem::take(&mut current));
        }

        if !current.is_empty() {
            current.push('\n');
        }
        current.push_str(line);
    }

    if !current.is_empty() {
        batches.push(current);
    }

    batches
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batch_lines_keeps_order() {
        let text = "alpha\nbeta\ngamma\ndelta";
        let batches = batch_lines(text, 11);
        assert_eq!(batches, vec!["alpha\nbeta", "gamma\ndelta"]);
        assert_eq!(batches.join("\n"), text);
    }

    #[test]
    fn test_batch_lines_long_line() {
        let batches = batch_lines("short\nthis line is far too long\nend", 8);
        assert_eq!(batches, vec!["short", "this line is far too long", "end"]);
    }

    #[test]
    fn test_batch_lines_single_batch() {
        assert_eq!(batch_lines("a\nb", 100), vec!["a\nb"]);
        assert!(batch_lines("", 100).is_empty());
    }
}
