//! YouTube search through yt-dlp.

use super::{VideoDiscovery, VideoRef};
use crate::error::{Result, TubescribeError};
use crate::ytdlp::{watch_url, YtDlp};
use async_trait::async_trait;
use chrono::NaiveDate;
use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;
use tracing::{debug, instrument, warn};
use url::Url;

static VIDEO_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9_-]{11}$").expect("valid video id regex"));

/// Video search backed by `yt-dlp "ytsearchN:<query>"`.
pub struct YoutubeSearch {
    ytdlp: YtDlp,
}

impl YoutubeSearch {
    pub fn new(ytdlp: YtDlp) -> Self {
        Self { ytdlp }
    }
}

#[async_trait]
impl VideoDiscovery for YoutubeSearch {
    #[instrument(skip(self))]
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<VideoRef>> {
        let query = query.trim();
        if query.is_empty() {
            return Err(TubescribeError::InvalidInput("empty search query".to_string()));
        }
        if max_results == 0 {
            return Ok(Vec::new());
        }

        let target = format!("ytsearch{}:{}", max_results, query);
        let output = self
            .ytdlp
            .dump_json(&target, &["--flat-playlist"])
            .await?;

        let videos = parse_search_output(&output);
        debug!("Search '{}' returned {} videos", query, videos.len());
        Ok(videos)
    }
}

/// Parse yt-dlp's one-object-per-line output, skipping unusable lines.
fn parse_search_output(output: &str) -> Vec<VideoRef> {
    output
        .lines()
        .filter(|line| !line.trim().is_empty())
        .filter_map(|line| match serde_json::from_str::<Value>(line) {
            Ok(entry) => video_from_entry(&entry),
            Err(e) => {
                warn!("Skipping unparsable search result: {}", e);
                None
            }
        })
        .collect()
}

fn video_from_entry(entry: &Value) -> Option<VideoRef> {
    let id = entry["id"]
        .as_str()
        .map(str::to_string)
        .or_else(|| entry["url"].as_str().and_then(extract_video_id))?;

    let title = entry["title"].as_str().unwrap_or("Unknown Title").to_string();

    let published = entry["upload_date"]
        .as_str()
        .and_then(|date| NaiveDate::parse_from_str(date, "%Y%m%d").ok())
        .or_else(|| {
            entry["timestamp"]
                .as_i64()
                .and_then(|ts| chrono::DateTime::from_timestamp(ts, 0))
                .map(|dt| dt.date_naive())
        });

    let channel = entry["channel"]
        .as_str()
        .or_else(|| entry["uploader"].as_str())
        .map(str::to_string);

    Some(VideoRef {
        url: watch_url(&id),
        id,
        title,
        views: entry["view_count"].as_u64(),
        published,
        duration_seconds: entry["duration"].as_f64(),
        channel,
    })
}

/// Extract a video ID from a YouTube URL or a bare ID.
pub fn extract_video_id(input: &str) -> Option<String> {
    let input = input.trim();
    if VIDEO_ID.is_match(input) {
        return Some(input.to_string());
    }

    let url = Url::parse(input)
        .or_else(|_| Url::parse(&format!("https://{}", input)))
        .ok()?;
    let host = url.host_str()?;
    let host = host
        .strip_prefix("www.")
        .or_else(|| host.strip_prefix("m."))
        .unwrap_or(host);

    let candidate = match host {
        "youtu.be" => url.path_segments()?.next()?.to_string(),
        "youtube.com" | "music.youtube.com" => {
            if url.path() == "/watch" {
                url.query_pairs()
                    .find(|(key, _)| key == "v")
                    .map(|(_, value)| value.into_owned())?
            } else {
                let mut segments = url.path_segments()?;
                match segments.next()? {
                    "embed" | "v" | "shorts" | "live" => segments.next()?.to_string(),
                    _ => return None,
                }
            }
        }
        _ => return None,
    };

    VIDEO_ID.is_match(&candidate).then_some(candidate)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_video_id() {
        let cases = [
            ("dQw4w9WgXcQ", Some("dQw4w9WgXcQ")),
            ("https://www.youtube.com/watch?v=dQw4w9WgXcQ", Some("dQw4w9WgXcQ")),
            ("https://youtube.com/watch?feature=share&v=dQw4w9WgXcQ", Some("dQw4w9WgXcQ")),
            ("youtube.com/watch?v=dQw4w9WgXcQ", Some("dQw4w9WgXcQ")),
            ("https://youtu.be/dQw4w9WgXcQ", Some("dQw4w9WgXcQ")),
            ("https://www.youtube.com/embed/dQw4w9WgXcQ", Some("dQw4w9WgXcQ")),
            ("https://www.youtube.com/shorts/dQw4w9WgXcQ", Some("dQw4w9WgXcQ")),
            ("https://m.youtube.com/watch?v=dQw4w9WgXcQ", Some("dQw4w9WgXcQ")),
            ("https://vimeo.com/123456", None),
            ("https://www.youtube.com/watch?v=short", None),
            ("not a video", None),
        ];

        for (input, expected) in cases {
            assert_eq!(
                extract_video_id(input).as_deref(),
                expected,
                "input: {}",
                input
            );
        }
    }

    #[test]
    fn test_parse_search_output() {
        let output = concat!(
            r#"{"id":"dQw4w9WgXcQ","title":"First","view_count":1200,"duration":61.0,"channel":"Lab","upload_date":"20240105"}"#,
            "\n",
            "not json\n",
            "\n",
            r#"{"url":"https://www.youtube.com/watch?v=abcdefghijk","uploader":"Someone"}"#,
            "\n",
            r#"{"title":"no id"}"#,
            "\n"
        );

        let videos = parse_search_output(output);
        assert_eq!(videos.len(), 2);

        assert_eq!(videos[0].id, "dQw4w9WgXcQ");
        assert_eq!(videos[0].url, "https://www.youtube.com/watch?v=dQw4w9WgXcQ");
        assert_eq!(videos[0].views, Some(1200));
        assert_eq!(videos[0].duration_seconds, Some(61.0));
        assert_eq!(videos[0].channel.as_deref(), Some("Lab"));
        assert_eq!(videos[0].published, NaiveDate::from_ymd_opt(2024, 1, 5));

        assert_eq!(videos[1].id, "abcdefghijk");
        assert_eq!(videos[1].title, "Unknown Title");
        assert_eq!(videos[1].channel.as_deref(), Some("Someone"));
        assert_eq!(videos[1].views, None);
    }

    #[tokio::test]
    async fn test_empty_query_is_rejected() {
        let search = YoutubeSearch::new(YtDlp::default());
        let result = search.search("   ", 3).await;
        tokio_test::assert_err!(result);
    }

    #[tokio::test]
    async fn test_zero_results_skips_ytdlp() {
        let search = YoutubeSearch::new(YtDlp::new("tubescribe-definitely-missing-binary"));
        let videos = tokio_test::assert_ok!(search.search("rust", 0).await);
        assert!(videos.is_empty());
    }
}
