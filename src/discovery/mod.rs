//! Video discovery.
//!
//! Turns a search phrase into [`VideoRef`]s for the acquisition pipeline.

mod youtube;

pub use youtube::{extract_video_id, YoutubeSearch};

use crate::error::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A discovered video. Read-only once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoRef {
    /// Platform video identifier.
    pub id: String,
    pub title: String,
    /// Canonical watch URL; also the dedup key.
    pub url: String,
    /// View count (if reported).
    pub views: Option<u64>,
    /// Publication date (if reported).
    pub published: Option<NaiveDate>,
    /// Duration in seconds (if known).
    pub duration_seconds: Option<f64>,
    /// Channel or uploader name (if available).
    pub channel: Option<String>,
}

impl VideoRef {
    /// A reference with only the required fields set.
    pub fn new(id: impl Into<String>, title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            url: url.into(),
            views: None,
            published: None,
            duration_seconds: None,
            channel: None,
        }
    }
}

/// Trait for video search backends.
#[async_trait]
pub trait VideoDiscovery: Send + Sync {
    /// Search for up to `max_results` videos, in ranking order.
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<VideoRef>>;
}
