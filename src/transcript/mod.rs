//! Transcript model and normalization.
//!
//! Every caption source upstream produces something slightly different: timed
//! segment lists, `json3` event structures, SRT/WebVTT text, or plain strings.
//! This module turns all of them into one flat [`Transcript`] string.

mod normalize;
mod payload;
mod subtitle;

pub use normalize::{normalize, normalize_str};
pub(crate) use normalize::canonicalize;
pub use payload::{CaptionEvent, CaptionSeg, EventTrack, RawCaptionPayload, TimedSegment};
pub use subtitle::{is_cue_metadata, looks_structured, strip_cue_lines};

use serde::Serialize;
use std::fmt;

/// Marker stored when no caption content could be found for a video.
pub const NOT_AVAILABLE: &str = "Transcript not available";

/// Prefix of the marker stored when a fetch or translation step failed.
pub const FETCH_FAILED_PREFIX: &str = "Transcript fetch failed";

/// Canonical transcript text.
///
/// Never empty: an empty result is replaced by [`NOT_AVAILABLE`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Transcript(String);

impl Transcript {
    /// Wrap normalized text, substituting the failure marker for empty input.
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        if text.trim().is_empty() {
            Self::not_available()
        } else {
            Self(text)
        }
    }

    /// The marker transcript used when no captions exist.
    pub fn not_available() -> Self {
        Self(NOT_AVAILABLE.to_string())
    }

    /// A marker transcript embedding the error that stopped acquisition.
    pub fn fetch_failed(detail: impl fmt::Display) -> Self {
        Self(format!("{}: {}", FETCH_FAILED_PREFIX, detail))
    }

    /// Whether this transcript is one of the failure markers.
    pub fn is_failure(&self) -> bool {
        self.0 == NOT_AVAILABLE || self.0.starts_with(FETCH_FAILED_PREFIX)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    /// Number of whitespace-separated words.
    pub fn word_count(&self) -> usize {
        self.0.split_whitespace().count()
    }
}

impl fmt::Display for Transcript {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Transcript {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
