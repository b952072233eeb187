//! Result records and the per-article JSON writer.

use crate::discovery::VideoRef;
use crate::error::Result;
use crate::transcript::Transcript;
use chrono::NaiveDate;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::info;

/// One processed video in the results file.
#[derive(Debug, Clone, Serialize)]
pub struct VideoRecord {
    pub title: String,
    pub url: String,
    pub views: Option<u64>,
    pub published: Option<NaiveDate>,
    /// Duration in seconds.
    pub duration: Option<f64>,
    pub channel: Option<String>,
    pub transcript: Transcript,
}

impl VideoRecord {
    pub fn new(video: &VideoRef, transcript: Transcript) -> Self {
        Self {
            title: video.title.clone(),
            url: video.url.clone(),
            views: video.views,
            published: video.published,
            duration: video.duration_seconds,
            channel: video.channel.clone(),
            transcript,
        }
    }
}

/// `<results_dir>/<article_name>.json`
pub fn results_path(results_dir: &Path, article_name: &str) -> PathBuf {
    results_dir.join(format!("{}.json", article_name))
}

/// Write all records of a run as a pretty JSON array. Returns the file path.
pub fn write_results(
    results_dir: &Path,
    article_name: &str,
    records: &[VideoRecord],
) -> Result<PathBuf> {
    std::fs::create_dir_all(results_dir)?;

    let path = results_path(results_dir, article_name);
    let json = serde_json::to_string_pretty(records)?;
    std::fs::write(&path, json)?;

    info!("Wrote {} records to {:?}", records.len(), path);
    Ok(path)
}
