//! Catalog of downloadable subtitle tracks for one video.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Pseudo-language yt-dlp reports for live chat replays; not a subtitle.
const LIVE_CHAT: &str = "live_chat";

/// Whether a track was authored by a human or generated by speech recognition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackKind {
    Manual,
    Automatic,
}

impl std::fmt::Display for TrackKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TrackKind::Manual => write!(f, "manual"),
            TrackKind::Automatic => write!(f, "automatic"),
        }
    }
}

/// A single downloadable caption stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaptionTrack {
    /// Download URL.
    pub url: String,
    /// Container format reported by the extractor (json3, vtt, srv3, ...).
    pub ext: Option<String>,
    /// Human-readable language name.
    pub name: Option<String>,
    pub kind: TrackKind,
}

/// Language code to tracks, in the order the extractor reported them.
#[derive(Debug, Clone, Default)]
pub struct CaptionTrackCatalog {
    entries: Vec<(String, Vec<CaptionTrack>)>,
}

impl CaptionTrackCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog from a yt-dlp info document.
    ///
    /// Manual `subtitles` come first; `automatic_captions` only fill in
    /// languages without a manual track.
    pub fn from_info(info: &Value) -> Self {
        let mut catalog = Self::new();

        for (field, kind) in [
            ("subtitles", TrackKind::Manual),
            ("automatic_captions", TrackKind::Automatic),
        ] {
            let Some(languages) = info.get(field).and_then(Value::as_object) else {
                continue;
            };

            for (language, formats) in languages {
                if language == LIVE_CHAT {
                    continue;
                }
                catalog.insert(language, parse_tracks(formats, kind));
            }
        }

        catalog
    }

    /// Add tracks for a language.
    ///
    /// Empty track lists are ignored. An existing automatic entry is replaced
    /// by manual tracks; anything else already present is kept.
    pub fn insert(&mut self, language: &str, tracks: Vec<CaptionTrack>) {
        if tracks.is_empty() {
            return;
        }

        let incoming_manual = tracks.iter().any(|t| t.kind == TrackKind::Manual);

        match self.entries.iter_mut().find(|(lang, _)| lang == language) {
            Some((_, existing)) => {
                let existing_manual = existing.iter().any(|t| t.kind == TrackKind::Manual);
                if incoming_manual && !existing_manual {
                    *existing = tracks;
                }
            }
            None => self.entries.push((language.to_string(), tracks)),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Language codes in enumeration order.
    pub fn languages(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(lang, _)| lang.as_str())
    }

    /// Tracks registered for a language code (exact match).
    pub fn tracks(&self, language: &str) -> Option<&[CaptionTrack]> {
        self.entries
            .iter()
            .find(|(lang, _)| lang == language)
            .map(|(_, tracks)| tracks.as_slice())
    }

    /// First track of the first language in `preference` that is present.
    pub fn preferred<'a, S: AsRef<str>>(
        &'a self,
        preference: &[S],
    ) -> Option<(&'a str, &'a CaptionTrack)> {
        preference.iter().find_map(|wanted| {
            self.entries
                .iter()
                .find(|(lang, _)| lang == wanted.as_ref())
                .and_then(|(lang, tracks)| tracks.first().map(|t| (lang.as_str(), t)))
        })
    }

    /// First track of the first enumerated language.
    pub fn first(&self) -> Option<(&str, &CaptionTrack)> {
        self.entries
            .iter()
            .find_map(|(lang, tracks)| tracks.first().map(|t| (lang.as_str(), t)))
    }
}

fn parse_tracks(formats: &Value, kind: TrackKind) -> Vec<CaptionTrack> {
    formats
        .as_array()
        .map(|items| {
            items
                .iter()
                .filter_map(|item| {
                    let url = item.get("url")?.as_str()?;
                    Some(CaptionTrack {
                        url: url.to_string(),
                        ext: item.get("ext").and_then(Value::as_str).map(str::to_string),
                        name: item.get("name").and_then(Value::as_str).map(str::to_string),
                        kind,
                    })
                })
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn track(url: &str, kind: TrackKind) -> CaptionTrack {
        CaptionTrack {
            url: url.to_string(),
            ext: Some("vtt".to_string()),
            name: None,
            kind,
        }
    }

    #[test]
    fn test_from_info_prefers_manual() {
        let info = json!({
            "subtitles": {
                "de": [{"ext": "vtt", "url": "https://example.com/de-manual", "name": "German"}],
                "live_chat": [{"ext": "json", "url": "https://example.com/chat"}]
            },
            "automatic_captions": {
                "de": [{"ext": "vtt", "url": "https://example.com/de-auto"}],
                "fr": [{"ext": "json3", "url": "https://example.com/fr-auto"}, {"ext": "vtt", "url": "https://example.com/fr-auto-vtt"}],
                "es": []
            }
        });

        let catalog = CaptionTrackCatalog::from_info(&info);

        assert_eq!(catalog.languages().collect::<Vec<_>>(), vec!["de", "fr"]);
        assert_eq!(catalog.tracks("de").unwrap()[0].url, "https://example.com/de-manual");
        assert_eq!(catalog.tracks("de").unwrap()[0].kind, TrackKind::Manual);
        assert_eq!(catalog.tracks("fr").unwrap().len(), 2);
        assert!(catalog.tracks("live_chat").is_none());
        assert!(catalog.tracks("es").is_none());
    }

    #[test]
    fn test_from_info_without_captions() {
        let catalog = CaptionTrackCatalog::from_info(&json!({"title": "no captions"}));
        assert!(catalog.is_empty());
        assert!(catalog.first().is_none());
    }

    #[test]
    fn test_manual_replaces_automatic() {
        let mut catalog = CaptionTrackCatalog::new();
        catalog.insert("en", vec![track("auto", TrackKind::Automatic)]);
        catalog.insert("en", vec![track("manual", TrackKind::Manual)]);
        catalog.insert("en", vec![track("auto-again", TrackKind::Automatic)]);

        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.tracks("en").unwrap()[0].url, "manual");
    }

    #[test]
    fn test_preferred_order() {
        let mut catalog = CaptionTrackCatalog::new();
        catalog.insert("en-GB", vec![track("gb", TrackKind::Manual)]);
        catalog.insert("en-US", vec![track("us", TrackKind::Manual)]);

        let (lang, chosen) = catalog.preferred(&["en", "en-US", "en-GB"]).unwrap();
        assert_eq!(lang, "en-US");
        assert_eq!(chosen.url, "us");

        assert!(catalog.preferred(&["fr"]).is_none());
    }

    #[test]
    fn test_first_follows_insertion_order() {
        let mut catalog = CaptionTrackCatalog::new();
        catalog.insert("ja", vec![track("ja", TrackKind::Automatic)]);
        catalog.insert("de", vec![track("de", TrackKind::Manual)]);

        assert_eq!(catalog.first().unwrap().0, "ja");
    }
}
