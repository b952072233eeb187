//! Caption sources.
//!
//! A [`CaptionSource`] offers two tiers of caption data for a video: the
//! platform's official transcript service and a generic catalog of every
//! subtitle track an extractor can see. The acquisition state machine tries
//! them in that order.

mod catalog;
mod official;
mod youtube;

pub use catalog::{CaptionTrack, CaptionTrackCatalog, TrackKind};
pub use official::OfficialTranscripts;
pub use youtube::YoutubeCaptions;

use crate::transcript::TimedSegment;
use async_trait::async_trait;
use thiserror::Error;

/// Failure of a single caption fetch.
///
/// Both variants send the acquisition to the next tier; they differ only in
/// how loudly they are logged.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FetchError {
    /// No caption track is registered, or transcripts are disabled.
    #[error("no caption track: {0}")]
    NoTrack(String),

    /// Network, rate-limit or parse fault on one call.
    #[error("transient fetch error: {0}")]
    Transient(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        FetchError::Transient(err.to_string())
    }
}

/// Trait for caption data providers.
#[async_trait]
pub trait CaptionSource: Send + Sync {
    /// Fetch the official transcript as timed segments.
    async fn fetch_official(&self, video_id: &str) -> Result<Vec<TimedSegment>, FetchError>;

    /// List every downloadable subtitle track. Empty when extraction fails.
    async fn fetch_catalog(&self, video_id: &str) -> CaptionTrackCatalog;

    /// Download one track's raw content.
    async fn fetch_track_content(&self, url: &str) -> Result<String, FetchError>;
}
