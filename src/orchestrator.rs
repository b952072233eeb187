//! Batch pipeline orchestrator for Tubescribe.
//!
//! Coordinates one run: article -> search phrase -> discovery -> per-video
//! dedup check and transcript acquisition -> results file.

use crate::acquisition::TranscriptAcquirer;
use crate::article::{first_article, load_article};
use crate::captions::YoutubeCaptions;
use crate::config::{Prompts, Settings};
use crate::dedup::DedupLog;
use crate::discovery::{VideoDiscovery, VideoRef, YoutubeSearch};
use crate::error::{Result, TubescribeError};
use crate::keywords::{KeywordGenerator, PhraseSource};
use crate::results::{write_results, VideoRecord};
use crate::translate::GoogleTranslator;
use crate::ytdlp::YtDlp;
use futures::stream::{self, StreamExt};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{info, instrument, warn};

/// Summary of one batch run.
#[derive(Debug, Clone)]
pub struct RunReport {
    /// Article name (file stem).
    pub article: String,
    /// Search phrase used for discovery.
    pub query: String,
    /// Videos returned by discovery.
    pub discovered: usize,
    /// Videos skipped as already processed or duplicated.
    pub skipped: usize,
    pub records: Vec<VideoRecord>,
    pub results_path: PathBuf,
}

/// Build the transcript acquirer for YouTube captions and Google Translate.
pub fn build_acquirer(settings: &Settings) -> Result<TranscriptAcquirer> {
    let ytdlp = YtDlp::new(settings.discovery.ytdlp_path.as_str());
    let captions = Arc::new(YoutubeCaptions::new(&settings.captions, ytdlp)?);
    let translator = Arc::new(GoogleTranslator::new(&settings.translation)
        .map_err(|e| TubescribeError::Config(e.to_string()))?);

    Ok(TranscriptAcquirer::new(
        captions,
        translator,
        settings.captions.english_languages.clone(),
    )
    .with_languages(
        settings.translation.source_language.as_str(),
        settings.translation.target_language.as_str(),
    ))
}

/// The main orchestrator for the Tubescribe pipeline.
pub struct Orchestrator {
    settings: Settings,
    discovery: Arc<dyn VideoDiscovery>,
    acquirer: TranscriptAcquirer,
    phrases: Arc<dyn PhraseSource>,
    dedup: Arc<Mutex<DedupLog>>,
}

impl Orchestrator {
    /// Create a new orchestrator wired to YouTube, Google Translate and OpenRouter.
    pub fn new(settings: Settings) -> Result<Self> {
        let prompts = Prompts::load(
            settings.prompts.custom_dir.as_deref(),
            Some(&settings.prompts.variables),
        )?;

        let acquirer = build_acquirer(&settings)?;
        let discovery = Arc::new(YoutubeSearch::new(YtDlp::new(
            settings.discovery.ytdlp_path.as_str(),
        )));
        let phrases = Arc::new(KeywordGenerator::new(&settings.keywords, prompts)?);
        let dedup = DedupLog::open(settings.video_log_path())?;

        Ok(Self::with_components(
            settings, discovery, acquirer, phrases, dedup,
        ))
    }

    /// Create an orchestrator with custom components.
    pub fn with_components(
        settings: Settings,
        discovery: Arc<dyn VideoDiscovery>,
        acquirer: TranscriptAcquirer,
        phrases: Arc<dyn PhraseSource>,
        dedup: DedupLog,
    ) -> Self {
        Self {
            settings,
            discovery,
            acquirer,
            phrases,
            dedup: Arc::new(Mutex::new(dedup)),
        }
    }

    /// Run the whole batch.
    ///
    /// `article` overrides the first file of the article directory, `query`
    /// skips phrase generation, `max_results` overrides the configured count.
    #[instrument(skip(self))]
    pub async fn run(
        &self,
        article: Option<&Path>,
        query: Option<&str>,
        max_results: Option<usize>,
    ) -> Result<RunReport> {
        let article = match article {
            Some(path) => load_article(path)?,
            None => first_article(self.settings.article_dir())?,
        };
        info!("Using article: {}", article.name);

        let query = match query {
            Some(q) => q.trim().to_string(),
            None => self.phrases.best_phrase(&article.text).await,
        };
        info!("Using query: {}", query);

        let max_results = max_results.unwrap_or(self.settings.discovery.max_results);
        let videos = self.discover(&query, max_results).await;
        let discovered = videos.len();

        let records = self.process_videos(videos).await;
        let results_path = write_results(&self.settings.results_dir(), &article.name, &records)?;

        Ok(RunReport {
            article: article.name,
            query,
            discovered,
            skipped: discovered.saturating_sub(records.len()),
            records,
            results_path,
        })
    }

    /// Search for videos. Failures are logged and yield an empty batch.
    pub async fn discover(&self, query: &str, max_results: usize) -> Vec<VideoRef> {
        match self.discovery.search(query, max_results).await {
            Ok(videos) => videos,
            Err(e) => {
                warn!("Video search failed: {}", e);
                Vec::new()
            }
        }
    }

    /// Process a batch in discovery order with bounded concurrency.
    pub async fn process_videos(&self, videos: Vec<VideoRef>) -> Vec<VideoRecord> {
        let mut seen = HashSet::new();
        let unique: Vec<VideoRef> = videos
            .into_iter()
            .filter(|video| seen.insert(video.url.clone()))
            .collect();

        let limit = self.settings.pipeline.max_concurrent_videos.max(1);

        let results: Vec<Option<VideoRecord>> = stream::iter(unique)
            .map(|video| async move { self.process_video(&video).await })
            .buffered(limit)
            .collect()
            .await;

        results.into_iter().flatten().collect()
    }

    /// Process one video. Returns `None` when its URL is already logged.
    #[instrument(skip(self, video), fields(id = %video.id))]
    pub async fn process_video(&self, video: &VideoRef) -> Option<VideoRecord> {
        if self.dedup.lock().await.contains(&video.url) {
            info!("Skipping logged video: {}", video.title);
            return None;
        }

        info!("Processing: {} ({})", video.title, video.url);
        let transcript = self.acquirer.acquire(&video.id).await;
        let record = VideoRecord::new(video, transcript);

        if let Err(e) = self.dedup.lock().await.append(&video.url) {
            warn!("Could not record {} in the video log: {}", video.url, e);
        }

        Some(record)
    }
}
