//! Search command implementation.

use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::discovery::{VideoDiscovery, YoutubeSearch};
use crate::ytdlp::YtDlp;
use anyhow::Result;

/// Run the search command.
pub async fn run_search(query: &str, limit: usize, settings: Settings) -> Result<()> {
    if let Err(e) = preflight::check(Operation::Search, &settings) {
        Output::error(&format!("{}", e));
        Output::info("Run 'tubescribe doctor' for detailed diagnostics.");
        return Err(e.into());
    }

    let search = YoutubeSearch::new(YtDlp::new(settings.discovery.ytdlp_path.as_str()));

    let spinner = Output::spinner("Searching...");
    let results = search.search(query, limit).await;
    spinner.finish_and_clear();

    match results {
        Ok(videos) if videos.is_empty() => {
            Output::warning("No videos found matching your query.");
        }
        Ok(videos) => {
            Output::success(&format!("Found {} videos", videos.len()));
            for video in &videos {
                Output::video(&video.title, &video.url, video.duration_seconds, video.views);
            }
        }
        Err(e) => {
            Output::error(&format!("Search failed: {}", e));
            return Err(e.into());
        }
    }

    Ok(())
}
