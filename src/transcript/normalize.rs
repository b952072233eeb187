//! Conversion of raw caption payloads into canonical transcript text.

use super::payload::RawCaptionPayload;
use super::Transcript;
use serde_json::Value;

/// Normalize a raw payload into a [`Transcript`].
///
/// Deterministic: the same payload always yields the same text. The result is
/// a fixed point, so normalizing it again as a string changes nothing.
pub fn normalize(payload: &RawCaptionPayload) -> Transcript {
    let mut text = render(payload);

    // Output that still decodes as JSON is re-read until it stops changing
    loop {
        let next = match RawCaptionPayload::from_text(&text) {
            RawCaptionPayload::Text(_) => break,
            reparsed => render(&reparsed),
        };
        if next == text {
            break;
        }
        text = next;
    }

    Transcript::new(text)
}

fn render(payload: &RawCaptionPayload) -> String {
    match payload {
        RawCaptionPayload::Events(track) => {
            let fragments = track
                .events
                .iter()
                .flat_map(|event| event.segs.iter())
                .map(|seg| seg.utf8.trim())
                .filter(|text| !text.is_empty());
            canonicalize(&join(fragments))
        }
        RawCaptionPayload::Segments(segments) => {
            canonicalize(&join(segments.iter().map(|s| s.text.as_str())))
        }
        RawCaptionPayload::Fragments(fragments) | RawCaptionPayload::Lines(fragments) => {
            canonicalize(&join(fragments.iter().map(String::as_str)))
        }
        RawCaptionPayload::Value(value) => coerce(value),
        RawCaptionPayload::Text(text) => text.clone(),
    }
}

/// Sniff and normalize a raw string.
///
/// Strings that are not JSON are returned unchanged.
pub fn normalize_str(raw: &str) -> Transcript {
    normalize(&RawCaptionPayload::from_text(raw))
}

fn join<'a>(parts: impl Iterator<Item = &'a str>) -> String {
    parts.collect::<Vec<_>>().join(" ")
}

/// Remove literal `\n` escapes and collapse whitespace runs.
pub(crate) fn canonicalize(text: &str) -> String {
    text.replace("\\n", " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn coerce(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
