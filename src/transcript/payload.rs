//! Raw caption payload shapes.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A caption cue with timing, as returned by the official transcript service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimedSegment {
    /// Spoken text.
    #[serde(default)]
    pub text: String,
    /// Start time in seconds.
    #[serde(default)]
    pub start: f64,
    /// Duration in seconds.
    #[serde(default)]
    pub duration: f64,
}

impl TimedSegment {
    pub fn new(text: impl Into<String>, start: f64, duration: f64) -> Self {
        Self {
            text: text.into(),
            start,
            duration,
        }
    }
}

/// YouTube `json3` caption document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventTrack {
    #[serde(default)]
    pub events: Vec<CaptionEvent>,
}

/// One timing event of an [`EventTrack`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CaptionEvent {
    #[serde(rename = "tStartMs", default)]
    pub start_ms: Option<u64>,
    #[serde(rename = "dDurationMs", default)]
    pub duration_ms: Option<u64>,
    #[serde(default)]
    pub segs: Vec<CaptionSeg>,
}

/// One text fragment inside a [`CaptionEvent`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CaptionSeg {
    #[serde(default)]
    pub utf8: String,
}

impl CaptionEvent {
    /// Concatenated fragment text of this event, untrimmed.
    pub fn text(&self) -> String {
        self.segs.iter().map(|s| s.utf8.as_str()).collect()
    }
}

impl EventTrack {
    /// Convert events into timed segments, dropping events without speech.
    pub fn into_segments(self) -> Vec<TimedSegment> {
        self.events
            .into_iter()
            .filter_map(|event| {
                let text = event.text();
                let text = text.trim();
                if text.is_empty() {
                    return None;
                }
                Some(TimedSegment::new(
                    text,
                    event.start_ms.unwrap_or(0) as f64 / 1000.0,
                    event.duration_ms.unwrap_or(0) as f64 / 1000.0,
                ))
            })
            .collect()
    }
}

/// Every raw transcript shape the normalizer accepts.
///
/// The variant is chosen once, by [`RawCaptionPayload::from_text`] or
/// [`RawCaptionPayload::from_value`]; nothing downstream inspects JSON types.
#[derive(Debug, Clone)]
pub enum RawCaptionPayload {
    /// Timed segments, from the official service or a `[{"text": ..}]` document.
    Segments(Vec<TimedSegment>),
    /// Event/segment structure (`{"events": [{"segs": [{"utf8": ..}]}]}`).
    Events(EventTrack),
    /// Flat fragment list (`[{"utf8": ..}]`).
    Fragments(Vec<String>),
    /// Spoken-text lines left after stripping subtitle cue metadata.
    Lines(Vec<String>),
    /// Any other decoded JSON value, normalized by string coercion.
    Value(Value),
    /// Text that is not JSON; passed through unchanged.
    Text(String),
}

impl RawCaptionPayload {
    /// Sniff a raw string: decode JSON when possible, otherwise keep the text.
    pub fn from_text(raw: &str) -> Self {
        match serde_json::from_str::<Value>(raw) {
            Ok(value) => Self::from_value(value),
            Err(_) => Self::Text(raw.to_string()),
        }
    }

    /// Classify a decoded JSON value.
    pub fn from_value(value: Value) -> Self {
        if value.get("events").is_some() {
            return match serde_json::from_value::<EventTrack>(value.clone()) {
                Ok(track) => Self::Events(track),
                Err(_) => Self::Value(value),
            };
        }

        if let Some(items) = value.as_array() {
            // The first record decides the shape of the whole list
            match items.first() {
                Some(first) if first.get("text").is_some() => {
                    return Self::Segments(
                        items
                            .iter()
                            .map(|item| {
                                TimedSegment::new(
                                    field_str(item, "text"),
                                    item.get("start").and_then(Value::as_f64).unwrap_or(0.0),
                                    item.get("duration").and_then(Value::as_f64).unwrap_or(0.0),
                                )
                            })
                            .collect(),
                    );
                }
                Some(first) if first.get("utf8").is_some() => {
                    return Self::Fragments(
                        items.iter().map(|item| field_str(item, "utf8")).collect(),
                    );
                }
                _ => {}
            }
        }

        Self::Value(value)
    }

    /// Short name of the shape, for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Segments(_) => "segments",
            Self::Events(_) => "events",
            Self::Fragments(_) => "fragments",
            Self::Lines(_) => "lines",
            Self::Value(_) => "value",
            Self::Text(_) => "text",
        }
    }
}

fn field_str(item: &Value, key: &str) -> String {
    item.get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}
