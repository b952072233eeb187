//! Official YouTube transcripts via the innertube player API.
//!
//! The watch page carries the innertube API key; the player endpoint lists
//! the registered caption tracks; the chosen track is downloaded as `json3`.

use super::FetchError;
use crate::transcript::{EventTrack, TimedSegment};
use regex::Regex;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, instrument};

const WATCH_URL: &str = "https://www.youtube.com/watch?v=";
const PLAYER_URL: &str = "https://www.youtube.com/youtubei/v1/player";
const CLIENT_NAME: &str = "ANDROID";
const CLIENT_VERSION: &str = "20.10.38";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlayerResponse {
    playability_status: Option<PlayabilityStatus>,
    captions: Option<Captions>,
}

#[derive(Debug, Deserialize)]
struct PlayabilityStatus {
    status: String,
    reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Captions {
    player_captions_tracklist_renderer: Option<TracklistRenderer>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TracklistRenderer {
    #[serde(default)]
    caption_tracks: Vec<OfficialTrack>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OfficialTrack {
    base_url: String,
    language_code: String,
    /// `"asr"` for auto-generated tracks.
    kind: Option<String>,
}

impl OfficialTrack {
    fn is_generated(&self) -> bool {
        self.kind.as_deref() == Some("asr")
    }
}

/// Client for the platform's native transcript service.
pub struct OfficialTranscripts {
    http: reqwest::Client,
    languages: Vec<String>,
    api_key_regex: Regex,
}

impl OfficialTranscripts {
    /// Create a client requesting tracks in the given language order.
    pub fn new(http: reqwest::Client, languages: Vec<String>) -> Self {
        let api_key_regex =
            Regex::new(r#""INNERTUBE_API_KEY":\s*"([a-zA-Z0-9_-]+)""#).expect("Invalid regex");

        Self {
            http,
            languages,
            api_key_regex,
        }
    }

    /// Fetch the transcript of a video as timed segments.
    #[instrument(skip(self))]
    pub async fn fetch(&self, video_id: &str) -> Result<Vec<TimedSegment>, FetchError> {
        let api_key = self.fetch_api_key(video_id).await?;
        let player = self.fetch_player(video_id, &api_key).await?;
        let tracks = caption_tracks(video_id, player)?;
        let track = select_track(&tracks, &self.languages).ok_or_else(|| {
            FetchError::NoTrack(format!(
                "no transcript in {:?} for {} (available: {})",
                self.languages,
                video_id,
                tracks
                    .iter()
                    .map(|t| t.language_code.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            ))
        })?;

        debug!(
            "Downloading official {} track ({})",
            track.language_code,
            if track.is_generated() { "generated" } else { "manual" }
        );

        let response = self
            .http
            .get(json3_url(&track.base_url))
            .send()
            .await?
            .error_for_status()?;
        let body = response.text().await?;

        if body.trim().is_empty() {
            return Err(FetchError::NoTrack(format!("empty transcript for {}", video_id)));
        }

        let events: EventTrack = serde_json::from_str(&body)
            .map_err(|e| FetchError::Transient(format!("invalid json3 transcript: {}", e)))?;

        let segments = events.into_segments();
        if segments.is_empty() {
            return Err(FetchError::NoTrack(format!("empty transcript for {}", video_id)));
        }

        Ok(segments)
    }

    async fn fetch_api_key(&self, video_id: &str) -> Result<String, FetchError> {
        let html = self
            .http
            .get(format!("{}{}", WATCH_URL, video_id))
            .header(reqwest::header::ACCEPT_LANGUAGE, "en-US")
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        if let Some(caps) = self.api_key_regex.captures(&html) {
            return Ok(caps[1].to_string());
        }

        if html.contains("class=\"g-recaptcha\"") {
            Err(FetchError::Transient("too many requests (captcha)".to_string()))
        } else {
            Err(FetchError::Transient("innertube API key not found".to_string()))
        }
    }

    async fn fetch_player(&self, video_id: &str, api_key: &str) -> Result<PlayerResponse, FetchError> {
        let body = json!({
            "context": {
                "client": {
                    "clientName": CLIENT_NAME,
                    "clientVersion": CLIENT_VERSION,
                }
            },
            "videoId": video_id,
        });

        let response = self
            .http
            .post(PLAYER_URL)
            .query(&[("key", api_key)])
            .json(&body)
            .send()
            .await?
            .error_for_status()?;

        response
            .json::<PlayerResponse>()
            .await
            .map_err(|e| FetchError::Transient(format!("invalid player response: {}", e)))
    }
}

fn caption_tracks(video_id: &str, player: PlayerResponse) -> Result<Vec<OfficialTrack>, FetchError> {
    if let Some(status) = &player.playability_status {
        if status.status != "OK" {
            return Err(FetchError::Transient(format!(
                "video {} is not playable ({}): {}",
                video_id,
                status.status,
                status.reason.as_deref().unwrap_or("no reason given")
            )));
        }
    }

    let tracks = player
        .captions
        .and_then(|c| c.player_captions_tracklist_renderer)
        .map(|r| r.caption_tracks)
        .unwrap_or_default();

    if tracks.is_empty() {
        return Err(FetchError::NoTrack(format!(
            "transcripts are disabled for {}",
            video_id
        )));
    }

    Ok(tracks)
}

/// Pick a track by language preference, manual before generated.
fn select_track<'a>(tracks: &'a [OfficialTrack], languages: &[String]) -> Option<&'a OfficialTrack> {
    languages.iter().find_map(|lang| {
        let candidates: Vec<&OfficialTrack> =
            tracks.iter().filter(|t| &t.language_code == lang).collect();
        candidates
            .iter()
            .find(|t| !t.is_generated())
            .or_else(|| candidates.first())
            .copied()
    })
}

/// Track URL rewritten to request the `json3` format.
fn json3_url(base_url: &str) -> String {
    let base = base_url.replace("&fmt=srv3", "");
    format!("{}&fmt=json3", base)
}
