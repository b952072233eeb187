//! CLI module for Tubescribe.

pub mod commands;
mod output;
pub mod preflight;

pub use output::Output;

use clap::{Parser, Subcommand};

/// Tubescribe - find videos for an article and collect clean transcripts
///
/// Reads a seed article, searches YouTube for related videos and stores an
/// English transcript for each one, falling back across official captions,
/// subtitle tracks and translation.
#[derive(Parser, Debug)]
#[command(name = "tubescribe")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the full pipeline: article -> search -> transcripts -> results file
    Run {
        /// Article file to use instead of the first file in the article directory
        #[arg(short, long)]
        article: Option<String>,

        /// Search query to use instead of generating one from the article
        #[arg(short, long)]
        query: Option<String>,

        /// Number of videos to process
        #[arg(short = 'n', long)]
        max_results: Option<usize>,
    },

    /// Fetch the transcript of a single video
    Transcript {
        /// YouTube URL or video ID
        video: String,

        /// Write the transcript to a file instead of stdout
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Search YouTube without fetching transcripts
    Search {
        /// Search query
        query: String,

        /// Maximum number of results
        #[arg(short, long, default_value = "5")]
        limit: usize,
    },

    /// Generate the search phrase for an article
    Keywords {
        /// Article file (.txt or .md)
        file: String,
    },

    /// Check system requirements and configuration
    Doctor,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Open configuration file in editor
    Edit,

    /// Show configuration file path
    Path,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_run_flags() {
        let cli = Cli::try_parse_from([
            "tubescribe", "-vv", "run", "--query", "tidal energy", "-n", "2",
        ])
        .unwrap();

        assert_eq!(cli.verbose, 2);
        match cli.command {
            Commands::Run {
                article,
                query,
                max_results,
            } => {
                assert!(article.is_none());
                assert_eq!(query.as_deref(), Some("tidal energy"));
                assert_eq!(max_results, Some(2));
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_parse_transcript() {
        let cli = Cli::try_parse_from(["tubescribe", "transcript", "dQw4w9WgXcQ", "-o", "out.txt"])
            .unwrap();
        assert!(matches!(
            cli.command,
            Commands::Transcript { ref video, output: Some(_) } if video == "dQw4w9WgXcQ"
        ));
    }
}
