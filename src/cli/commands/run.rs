//! Run command implementation.

use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::orchestrator::Orchestrator;
use anyhow::Result;
use std::path::PathBuf;

/// Run the full batch pipeline.
pub async fn run_pipeline(
    article: Option<String>,
    query: Option<String>,
    max_results: Option<usize>,
    settings: Settings,
) -> Result<()> {
    if let Err(e) = preflight::check(Operation::Run, &settings) {
        Output::error(&format!("{}", e));
        Output::info("Run 'tubescribe doctor' for detailed diagnostics.");
        return Err(e.into());
    }

    let orchestrator = Orchestrator::new(settings)?;
    let article = article.map(PathBuf::from);

    let spinner = Output::spinner("Finding videos and fetching transcripts...");
    let result = orchestrator
        .run(article.as_deref(), query.as_deref(), max_results)
        .await;
    spinner.finish_and_clear();

    let report = match result {
        Ok(report) => report,
        Err(e) => {
            Output::error(&format!("Run failed: {}", e));
            return Err(e.into());
        }
    };

    Output::header(&format!("Article: {}", report.article));
    Output::kv("Query", &report.query);
    Output::kv("Discovered", &report.discovered.to_string());
    Output::kv("Skipped (already logged)", &report.skipped.to_string());

    if report.records.is_empty() {
        Output::warning("No new videos were processed.");
    } else {
        println!();
        for record in &report.records {
            Output::video(&record.title, &record.url, record.duration, record.views);
            Output::transcript_preview(record.transcript.as_str(), record.transcript.is_failure());
        }
    }

    let failed = report
        .records
        .iter()
        .filter(|r| r.transcript.is_failure())
        .count();
    if failed > 0 {
        Output::warning(&format!("{} video(s) without a transcript", failed));
    }

    println!();
    Output::success(&format!("Results saved to {}", report.results_path.display()));
    Ok(())
}
