//! YouTube caption source.

use super::{CaptionSource, CaptionTrackCatalog, FetchError, OfficialTranscripts};
use crate::config::CaptionSettings;
use crate::error::Result;
use crate::transcript::TimedSegment;
use crate::ytdlp::{watch_url, YtDlp};
use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, instrument, warn};

/// Captions from YouTube: official transcripts first, yt-dlp's catalog second.
pub struct YoutubeCaptions {
    http: reqwest::Client,
    official: OfficialTranscripts,
    ytdlp: YtDlp,
}

impl YoutubeCaptions {
    /// Create a caption source from settings.
    pub fn new(settings: &CaptionSettings, ytdlp: YtDlp) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.request_timeout_secs))
            .user_agent(settings.user_agent.as_str())
            .build()?;

        let official = OfficialTranscripts::new(http.clone(), settings.official_languages.clone());

        Ok(Self {
            http,
            official,
            ytdlp,
        })
    }
}

#[async_trait]
impl CaptionSource for YoutubeCaptions {
    async fn fetch_official(&self, video_id: &str) -> std::result::Result<Vec<TimedSegment>, FetchError> {
        self.official.fetch(video_id).await
    }

    #[instrument(skip(self))]
    async fn fetch_catalog(&self, video_id: &str) -> CaptionTrackCatalog {
        let output = match self
            .ytdlp
            .dump_json(&watch_url(video_id), &["--skip-download", "--no-playlist"])
            .await
        {
            Ok(output) => output,
            Err(e) => {
                warn!("Subtitle extraction failed for {}: {}", video_id, e);
                return CaptionTrackCatalog::new();
            }
        };

        let info: serde_json::Value = match serde_json::from_str(output.trim()) {
            Ok(info) => info,
            Err(e) => {
                warn!("Could not parse yt-dlp output for {}: {}", video_id, e);
                return CaptionTrackCatalog::new();
            }
        };

        let catalog = CaptionTrackCatalog::from_info(&info);
        debug!(
            "Catalog for {}: [{}]",
            video_id,
            catalog.languages().collect::<Vec<_>>().join(", ")
        );
        catalog
    }

    async fn fetch_track_content(&self, url: &str) -> std::result::Result<String, FetchError> {
        let response = self.http.get(url).send().await?;

        if !response.status().is_success() {
            return Err(FetchError::Transient(format!(
                "track download failed: HTTP {}",
                response.status()
            )));
        }

        Ok(response.text().await?)
    }
}
