//! Transcript command implementation.

use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::discovery::extract_video_id;
use crate::orchestrator::build_acquirer;
use anyhow::Result;

/// Fetch and print (or save) the transcript of one video.
///
/// Does not consult or update the processed-video log.
pub async fn run_transcript(video: &str, output: Option<String>, settings: Settings) -> Result<()> {
    let Some(video_id) = extract_video_id(video) else {
        Output::error(&format!("Invalid YouTube video ID or URL: {}", video));
        return Err(anyhow::anyhow!("invalid video: {}", video));
    };

    if let Err(e) = preflight::check(Operation::Transcript, &settings) {
        Output::warning(&format!("{} (subtitle tracks will be unavailable)", e));
    }

    let acquirer = build_acquirer(&settings)?;

    let spinner = Output::spinner(&format!("Fetching transcript for {}...", video_id));
    let (transcript, visited) = acquirer.acquire_traced(&video_id).await;
    spinner.finish_and_clear();

    if transcript.is_failure() {
        Output::warning(transcript.as_str());
    }

    match output {
        Some(path) => {
            std::fs::write(&path, format!("{}\n", transcript))?;
            Output::success(&format!(
                "Saved {} words to {} ({})",
                transcript.word_count(),
                path,
                visited.join(" -> ")
            ));
        }
        None => println!("{}", transcript),
    }

    Ok(())
}
