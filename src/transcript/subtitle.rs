//! Line-oriented subtitle handling (SRT and WebVTT).

use regex::Regex;
use std::sync::LazyLock;

/// Inline cue markup such as `<c>`, `</c>` or `<00:00:01.000>`.
static CUE_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]*>").expect("Invalid regex"));

/// Whether a subtitle line carries cue metadata rather than speech.
///
/// Sequence-number lines consist solely of digits; timing lines contain
/// the `-->` range delimiter.
pub fn is_cue_metadata(line: &str) -> bool {
    let trimmed = line.trim();
    let sequence_number = !trimmed.is_empty() && trimmed.chars().all(|c| c.is_ascii_digit());
    sequence_number || trimmed.contains("-->")
}

/// Whether raw track content looks like a JSON document.
pub fn looks_structured(raw: &str) -> bool {
    matches!(raw.trim_start().chars().next(), Some('{') | Some('['))
}

/// Keep only the spoken-text lines of an SRT or WebVTT document, in order.
pub fn strip_cue_lines(raw: &str) -> Vec<String> {
    let mut lines = Vec::new();
    let mut in_header = true;

    for line in raw.lines() {
        let trimmed = line.trim();

        if is_cue_metadata(trimmed) {
            if trimmed.contains("-->") {
                in_header = false;
            }
            continue;
        }

        if in_header && is_vtt_header(trimmed) {
            continue;
        }

        let text = CUE_TAG.replace_all(trimmed, "");
        let text = text.trim();
        if !text.is_empty() {
            lines.push(text.to_string());
        }
    }

    lines
}

fn is_vtt_header(line: &str) -> bool {
    line.starts_with("WEBVTT") || line.starts_with("Kind:") || line.starts_with("Language:")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_srt() {
        let raw = "1\n00:00:01,000 --> 00:00:02,000\nHallo Welt\n";
        assert_eq!(strip_cue_lines(raw), vec!["Hallo Welt".to_string()]);
    }

    #[test]
    fn test_strip_srt_multiple_cues_crlf() {
        let raw = "1\r\n00:00:01,000 --> 00:00:02,000\r\nFirst line\r\n\r\n2\r\n00:00:02,000 --> 00:00:04,000\r\nSecond line\r\nstill second\r\n";
        assert_eq!(
            strip_cue_lines(raw),
            vec!["First line", "Second line", "still second"]
        );
    }

    #[test]
    fn test_strip_vtt_header_and_tags() {
        let raw = "WEBVTT\nKind: captions\nLanguage: en\n\n00:00:00.000 --> 00:00:02.000 align:start position:0%\nhello<00:00:00.500><c> there</c>\n\n00:00:02.000 --> 00:00:03.000\nLanguage: is spoken here\n";
        assert_eq!(
            strip_cue_lines(raw),
            vec!["hello there", "Language: is spoken here"]
        );
    }

    #[test]
    fn test_is_cue_metadata() {
        assert!(is_cue_metadata("12"));
        assert!(is_cue_metadata(" 00:00:01,000 --> 00:00:02,000 "));
        assert!(!is_cue_metadata("12 monkeys"));
        assert!(!is_cue_metadata(""));
    }

    #[test]
    fn test_looks_structured() {
        assert!(looks_structured("  {\"events\": []}"));
        assert!(looks_structured("\n[1]"));
        assert!(!looks_structured("1\n00:00:01,000 --> 00:00:02,000"));
        assert!(!looks_structured(""));
    }
}
