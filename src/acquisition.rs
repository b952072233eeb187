//! Tiered transcript acquisition.
//!
//! One video moves through an explicit state machine:
//!
//! ```text
//! Start -> TryOfficial -> TryCatalog -> SelectEnglishTrack | SelectForeignTrack | NoTracksFound
//!       -> [Translate] -> Normalize -> Done
//! ```
//!
//! Every fault is absorbed into a transition or a failure-marker transcript,
//! so [`TranscriptAcquirer::acquire`] always returns a [`Transcript`].

use crate::captions::{CaptionSource, CaptionTrack, FetchError};
use crate::transcript::{
    canonicalize, looks_structured, normalize, strip_cue_lines, RawCaptionPayload, Transcript,
};
use crate::translate::{Translator, AUTO_DETECT, ENGLISH};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Position of one video in the acquisition protocol.
#[derive(Debug, Clone)]
pub enum AcquisitionState {
    Start,
    TryOfficial,
    TryCatalog,
    SelectEnglishTrack { language: String, track: CaptionTrack },
    SelectForeignTrack { language: String, track: CaptionTrack },
    NoTracksFound,
    Translate { language: String, lines: Vec<String> },
    Normalize(RawCaptionPayload),
    Done(Transcript),
}

impl AcquisitionState {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::TryOfficial => "try_official",
            Self::TryCatalog => "try_catalog",
            Self::SelectEnglishTrack { .. } => "select_english_track",
            Self::SelectForeignTrack { .. } => "select_foreign_track",
            Self::NoTracksFound => "no_tracks_found",
            Self::Translate { .. } => "translate",
            Self::Normalize(_) => "normalize",
            Self::Done(_) => "done",
        }
    }
}

/// Drives caption sources, the translator and the normalizer for one video at a time.
pub struct TranscriptAcquirer {
    source: Arc<dyn CaptionSource>,
    translator: Arc<dyn Translator>,
    english_languages: Vec<String>,
    source_language: String,
    target_language: String,
}

impl TranscriptAcquirer {
    pub fn new(
        source: Arc<dyn CaptionSource>,
        translator: Arc<dyn Translator>,
        english_languages: Vec<String>,
    ) -> Self {
        Self {
            source,
            translator,
            english_languages,
            source_language: AUTO_DETECT.to_string(),
            target_language: ENGLISH.to_string(),
        }
    }

    /// Override the translation language pair.
    pub fn with_languages(mut self, source: impl Into<String>, target: impl Into<String>) -> Self {
        self.source_language = source.into();
        self.target_language = target.into();
        self
    }

    /// Run the protocol to completion.
    pub async fn acquire(&self, video_id: &str) -> Transcript {
        self.acquire_traced(video_id).await.0
    }

    /// Run the protocol to completion, also returning the names of the visited states.
    #[instrument(skip(self))]
    pub async fn acquire_traced(&self, video_id: &str) -> (Transcript, Vec<&'static str>) {
        let mut state = AcquisitionState::Start;
        let mut visited = vec![state.name()];

        loop {
            let next = self.step(video_id, state).await;
            visited.push(next.name());

            match next {
                AcquisitionState::Done(transcript) => {
                    info!(
                        "Transcript for {}: {} words via {}",
                        video_id,
                        transcript.word_count(),
                        visited.join(" -> ")
                    );
                    return (transcript, visited);
                }
                other => state = other,
            }
        }
    }

    /// Perform exactly one transition.
    pub async fn step(&self, video_id: &str, state: AcquisitionState) -> AcquisitionState {
        match state {
            AcquisitionState::Start => AcquisitionState::TryOfficial,

            AcquisitionState::TryOfficial => match self.source.fetch_official(video_id).await {
                Ok(segments) => {
                    debug!("Official transcript for {}: {} segments", video_id, segments.len());
                    AcquisitionState::Normalize(RawCaptionPayload::Segments(segments))
                }
                Err(FetchError::NoTrack(reason)) => {
                    debug!("No official transcript for {}: {}", video_id, reason);
                    AcquisitionState::TryCatalog
                }
                Err(FetchError::Transient(reason)) => {
                    warn!("Official transcript fetch failed for {}: {}", video_id, reason);
                    AcquisitionState::TryCatalog
                }
            },

            AcquisitionState::TryCatalog => {
                let catalog = self.source.fetch_catalog(video_id).await;

                if let Some((language, track)) = catalog.preferred(&self.english_languages) {
                    AcquisitionState::SelectEnglishTrack {
                        language: language.to_string(),
                        track: track.clone(),
                    }
                } else if let Some((language, track)) = catalog.first() {
                    AcquisitionState::SelectForeignTrack {
                        language: language.to_string(),
                        track: track.clone(),
                    }
                } else {
                    AcquisitionState::NoTracksFound
                }
            }

            AcquisitionState::NoTracksFound => {
                debug!("No caption tracks for {}", video_id);
                AcquisitionState::Done(Transcript::not_available())
            }

            AcquisitionState::SelectEnglishTrack { language, track } => {
                debug!("Using {} {} track for {}", track.kind, language, video_id);
                match self.source.fetch_track_content(&track.url).await {
                    Ok(content) => AcquisitionState::Normalize(english_payload(&content)),
                    Err(e) => {
                        warn!("Could not download {} track for {}: {}", language, video_id, e);
                        AcquisitionState::Done(Transcript::fetch_failed(e))
                    }
                }
            }

            AcquisitionState::SelectForeignTrack { language, track } => {
                debug!("Only a {} {} track for {}", track.kind, language, video_id);
                match self.source.fetch_track_content(&track.url).await {
                    Ok(content) => AcquisitionState::Translate {
                        language,
                        lines: foreign_lines(&content),
                    },
                    Err(e) => {
                        warn!("Could not download {} track for {}: {}", language, video_id, e);
                        AcquisitionState::Done(Transcript::fetch_failed(e))
                    }
                }
            }

            AcquisitionState::Translate { language, lines } => {
                if lines.is_empty() {
                    return AcquisitionState::Normalize(RawCaptionPayload::Lines(lines));
                }

                match self
                    .translator
                    .translate(&lines.join("\n"), &self.source_language, &self.target_language)
                    .await
                {
                    Ok(text) => {
                        debug!("Translated {} lines from {}", lines.len(), language);
                        AcquisitionState::Normalize(RawCaptionPayload::Lines(
                            text.lines().map(str::to_string).collect(),
                        ))
                    }
                    Err(e) => {
                        warn!("Translation failed for {}: {}", video_id, e);
                        AcquisitionState::Done(Transcript::fetch_failed(e))
                    }
                }
            }

            AcquisitionState::Normalize(payload) => {
                debug!("Normalizing {} payload", payload.kind());
                AcquisitionState::Done(normalize(&payload))
            }

            done @ AcquisitionState::Done(_) => done,
        }
    }
}

/// Decode a JSON-shaped English track, or strip subtitle cue metadata.
fn english_payload(content: &str) -> RawCaptionPayload {
    if looks_structured(content) {
        if let Ok(value) = serde_json::from_str(content.trim()) {
            return RawCaptionPayload::from_value(value);
        }
    }
    RawCaptionPayload::Lines(strip_cue_lines(content))
}

/// Lines to translate from a foreign track, one per spoken unit.
fn foreign_lines(content: &str) -> Vec<String> {
    if looks_structured(content) {
        if let Ok(value) = serde_json::from_str(content.trim()) {
            let lines: Vec<String> = match RawCaptionPayload::from_value(value) {
                RawCaptionPayload::Events(track) => track
                    .into_segments()
                    .into_iter()
                    .map(|segment| canonicalize(&segment.text))
                    .collect(),
                RawCaptionPayload::Segments(segments) => segments
                    .into_iter()
                    .map(|segment| canonicalize(&segment.text))
                    .collect(),
                RawCaptionPayload::Fragments(fragments) => {
                    fragments.iter().map(|f| canonicalize(f)).collect()
                }
                other => {
                    let flattened = normalize(&other);
                    if flattened.is_failure() {
                        Vec::new()
                    } else {
                        vec![flattened.into_string()]
                    }
                }
            };
            return lines.into_iter().filter(|line| !line.is_empty()).collect();
        }
    }
    strip_cue_lines(content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::captions::{CaptionTrackCatalog, TrackKind};
    use crate::transcript::{TimedSegment, NOT_AVAILABLE};
    use crate::translate::TranslationError;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    const GERMAN_SRT: &str = "1\n00:00:01,000 --> 00:00:02,000\nHallo Welt\n";

    struct MockSource {
        official: std::result::Result<Vec<TimedSegment>, FetchError>,
        catalog: CaptionTrackCatalog,
        content: HashMap<String, std::result::Result<String, FetchError>>,
        official_calls: AtomicUsize,
        catalog_calls: AtomicUsize,
        content_calls: AtomicUsize,
    }

    impl MockSource {
        fn new(official: std::result::Result<Vec<TimedSegment>, FetchError>) -> Self {
            Self {
                official,
                catalog: CaptionTrackCatalog::new(),
                content: HashMap::new(),
                official_calls: AtomicUsize::new(0),
                catalog_calls: AtomicUsize::new(0),
                content_calls: AtomicUsize::new(0),
            }
        }

        fn no_official() -> Self {
            Self::new(Err(FetchError::NoTrack("transcripts are disabled".to_string())))
        }

        fn with_track(
            mut self,
            language: &str,
            content: std::result::Result<String, FetchError>,
        ) -> Self {
            let url = format!("https://captions.test/{}", language);
            self.catalog.insert(
                language,
                vec![CaptionTrack {
                    url: url.clone(),
                    ext: Some("srt".to_string()),
                    name: None,
                    kind: TrackKind::Manual,
                }],
            );
            self.content.insert(url, content);
            self
        }
    }

    #[async_trait]
    impl CaptionSource for MockSource {
        async fn fetch_official(
            &self,
            _video_id: &str,
        ) -> std::result::Result<Vec<TimedSegment>, FetchError> {
            self.official_calls.fetch_add(1, Ordering::SeqCst);
            self.official.clone()
        }

        async fn fetch_catalog(&self, _video_id: &str) -> CaptionTrackCatalog {
            self.catalog_calls.fetch_add(1, Ordering::SeqCst);
            self.catalog.clone()
        }

        async fn fetch_track_content(&self, url: &str) -> std::result::Result<String, FetchError> {
            self.content_calls.fetch_add(1, Ordering::SeqCst);
            self.content
                .get(url)
                .cloned()
                .unwrap_or_else(|| Err(FetchError::Transient(format!("unknown url {}", url))))
        }
    }

    /// Translates by dictionary lookup, line by line.
    struct MockTranslator {
        fail: bool,
        calls: AtomicUsize,
        seen: Mutex<Vec<String>>,
    }

    impl MockTranslator {
        fn new() -> Self {
            Self {
                fail: false,
                calls: AtomicUsize::new(0),
                seen: Mutex::new(Vec::new()),
            }
        }

        fn failing() -> Self {
            Self {
                fail: true,
                ..Self::new()
            }
        }
    }

    #[async_trait]
    impl Translator for MockTranslator {
        async fn translate(
            &self,
            text: &str,
            source: &str,
            target: &str,
        ) -> std::result::Result<String, TranslationError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.seen.lock().unwrap().push(text.to_string());
            assert_eq!(source, AUTO_DETECT);
            assert_eq!(target, ENGLISH);

            if self.fail {
                return Err(TranslationError::Request("HTTP 429".to_string()));
            }

            Ok(text
                .lines()
                .map(|line| match line {
                    "Hallo Welt" => "Hello World",
                    "Guten Morgen" => "Good morning",
                    other => other,
                })
                .collect::<Vec<_>>()
                .join("\n"))
        }
    }

    fn acquirer(source: &Arc<MockSource>, translator: &Arc<MockTranslator>) -> TranscriptAcquirer {
        TranscriptAcquirer::new(
            source.clone(),
            translator.clone(),
            vec!["en".to_string(), "en-US".to_string(), "en-GB".to_string()],
        )
    }

    #[tokio::test]
    async fn test_official_success_skips_catalog() {
        let source = Arc::new(MockSource::new(Ok(vec![
            TimedSegment::new("Hello", 0.0, 1.0),
            TimedSegment::new("world\\n again", 1.0, 1.0),
        ])));
        let translator = Arc::new(MockTranslator::new());

        let (transcript, visited) = acquirer(&source, &translator).acquire_traced("abc").await;

        assert_eq!(transcript.as_str(), "Hello world again");
        assert_eq!(visited, vec!["start", "try_official", "normalize", "done"]);
        assert_eq!(source.official_calls.load(Ordering::SeqCst), 1);
        assert_eq!(source.catalog_calls.load(Ordering::SeqCst), 0);
        assert_eq!(source.content_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_no_official_and_empty_catalog() {
        let source = Arc::new(MockSource::no_official());
        let translator = Arc::new(MockTranslator::new());

        let (transcript, visited) = acquirer(&source, &translator).acquire_traced("abc").await;

        assert_eq!(transcript.as_str(), NOT_AVAILABLE);
        assert_eq!(
            visited,
            vec!["start", "try_official", "try_catalog", "no_tracks_found", "done"]
        );
        assert_eq!(translator.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_transient_official_error_falls_through() {
        let source = Arc::new(
            MockSource::new(Err(FetchError::Transient("HTTP 503".to_string())))
                .with_track("en", Ok("1\n00:00:00,000 --> 00:00:01,000\nHi there\n".to_string())),
        );
        let translator = Arc::new(MockTranslator::new());

        let transcript = acquirer(&source, &translator).acquire("abc").await;

        assert_eq!(transcript.as_str(), "Hi there");
        assert_eq!(source.catalog_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_prefers_en_us_when_en_missing() {
        let source = Arc::new(
            MockSource::no_official()
                .with_track("fr", Ok("Bonjour".to_string()))
                .with_track("en-GB", Ok("British".to_string()))
                .with_track("en-US", Ok("American".to_string())),
        );
        let translator = Arc::new(MockTranslator::new());
        let acquirer = acquirer(&source, &translator);

        let state = acquirer.step("abc", AcquisitionState::TryCatalog).await;
        match &state {
            AcquisitionState::SelectEnglishTrack { language, .. } => assert_eq!(language, "en-US"),
            other => panic!("unexpected state {:?}", other),
        }

        assert_eq!(acquirer.acquire("abc").await.as_str(), "American");
        assert_eq!(translator.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_english_json_track_is_decoded() {
        let source = Arc::new(MockSource::no_official().with_track(
            "en",
            Ok(r#"{"events":[{"segs":[{"utf8":"Hello"},{"utf8":" world"}]}]}"#.to_string()),
        ));
        let translator = Arc::new(MockTranslator::new());

        let transcript = acquirer(&source, &translator).acquire("abc").await;
        assert_eq!(transcript.as_str(), "Hello world");
    }

    #[tokio::test]
    async fn test_foreign_track_is_translated() {
        let source = Arc::new(MockSource::no_official().with_track("de", Ok(GERMAN_SRT.to_string())));
        let translator = Arc::new(MockTranslator::new());

        let (transcript, visited) = acquirer(&source, &translator).acquire_traced("abc").await;

        assert_eq!(transcript.as_str(), "Hello World");
        assert_eq!(
            visited,
            vec![
                "start",
                "try_official",
                "try_catalog",
                "select_foreign_track",
                "translate",
                "normalize",
                "done"
            ]
        );
        assert_eq!(*translator.seen.lock().unwrap(), vec!["Hallo Welt".to_string()]);
    }

    #[tokio::test]
    async fn test_foreign_step_strips_cues() {
        let source = Arc::new(MockSource::no_official().with_track("de", Ok(GERMAN_SRT.to_string())));
        let translator = Arc::new(MockTranslator::new());
        let acquirer = acquirer(&source, &translator);

        let state = acquirer.step("abc", AcquisitionState::TryCatalog).await;
        let state = acquirer.step("abc", state).await;

        match state {
            AcquisitionState::Translate { language, lines } => {
                assert_eq!(language, "de");
                assert_eq!(lines, vec!["Hallo Welt"]);
            }
            other => panic!("unexpected state {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_translation_failure_yields_marker() {
        let source = Arc::new(MockSource::no_official().with_track("de", Ok(GERMAN_SRT.to_string())));
        let translator = Arc::new(MockTranslator::failing());

        let transcript = acquirer(&source, &translator).acquire("abc").await;

        assert!(transcript.is_failure());
        assert!(transcript.as_str().starts_with("Transcript fetch failed:"));
        assert!(transcript.as_str().contains("HTTP 429"));
    }

    #[tokio::test]
    async fn test_download_failure_yields_marker() {
        let source = Arc::new(
            MockSource::no_official()
                .with_track("en", Err(FetchError::Transient("connection reset".to_string()))),
        );
        let translator = Arc::new(MockTranslator::new());

        let transcript = acquirer(&source, &translator).acquire("abc").await;
        assert_eq!(
            transcript.as_str(),
            "Transcript fetch failed: transient fetch error: connection reset"
        );
    }

    #[tokio::test]
    async fn test_empty_foreign_track_skips_translation() {
        let source = Arc::new(
            MockSource::no_official()
                .with_track("de", Ok("1\n00:00:01,000 --> 00:00:02,000\n\n".to_string())),
        );
        let translator = Arc::new(MockTranslator::new());

        let transcript = acquirer(&source, &translator).acquire("abc").await;

        assert_eq!(transcript.as_str(), NOT_AVAILABLE);
        assert_eq!(translator.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_done_is_terminal() {
        let source = Arc::new(MockSource::no_official());
        let translator = Arc::new(MockTranslator::new());
        let acquirer = acquirer(&source, &translator);

        let state = acquirer
            .step("abc", AcquisitionState::Done(Transcript::new("kept")))
            .await;
        match state {
            AcquisitionState::Done(transcript) => assert_eq!(transcript.as_str(), "kept"),
            other => panic!("unexpected state {:?}", other),
        }
        assert_eq!(source.official_calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_foreign_json_keeps_one_line_per_unit() {
        let lines = foreign_lines(r#"[{"utf8":"Guten"},{"utf8":" Morgen "}]"#);
        assert_eq!(lines, vec!["Guten", "Morgen"]);

        let lines = foreign_lines(
            r#"{"events":[
                {"tStartMs":0,"segs":[{"utf8":"Hallo"},{"utf8":" Welt"}]},
                {"tStartMs":900,"segs":[{"utf8":"\n"}]},
                {"tStartMs":1000,"segs":[{"utf8":"zweite\nZeile"}]}
            ]}"#,
        );
        assert_eq!(lines, vec!["Hallo Welt", "zweite Zeile"]);
    }

    #[test]
    fn test_long_foreign_json_track_fits_translation_batches() {
        let events: Vec<String> = (0..2000)
            .map(|i| {
                format!(
                    r#"{{"tStartMs":{},"dDurationMs":1000,"segs":[{{"utf8":"Satz Nummer {} hier"}}]}}"#,
                    i * 1000,
                    i
                )
            })
            .collect();
        let content = format!(r#"{{"events":[{}]}}"#, events.join(","));

        let lines = foreign_lines(&content);
        assert_eq!(lines.len(), 2000);
        assert_eq!(lines[0], "Satz Nummer 0 hier");
        assert_eq!(lines[1999], "Satz Nummer 1999 hier");

        let batches = crate::translate::batch_lines(&lines.join("\n"), 4500);
        assert!(batches.len() > 1);
        for batch in &batches {
            assert!(batch.chars().count() <= 4500, "batch of {} chars", batch.chars().count());
        }
        let rejoined: Vec<&str> = batches.iter().flat_map(|b| b.lines()).collect();
        assert_eq!(rejoined.len(), 2000);
    }
}
