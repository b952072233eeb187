//! Tubescribe - video transcripts for a seed article
//!
//! Reads an article, picks a YouTube search phrase for it, discovers a few
//! related videos and stores a clean English transcript for each of them.
//!
//! # Overview
//!
//! The core is transcript acquisition. For every video it tries, in order:
//! - the official transcript service
//! - an English subtitle track from the yt-dlp catalog
//! - any other subtitle track, translated to English
//!
//! Whatever comes back (timed segments, `json3` events, SRT/WebVTT text) is
//! normalized into one whitespace-collapsed string. A video with no usable
//! captions still gets a transcript: an explicit failure marker.
//!
//! # Architecture
//!
//! - `config` - Configuration management
//! - `article` - Seed article loading
//! - `keywords` - Search phrase generation (OpenAI-compatible chat API)
//! - `discovery` - Video search via yt-dlp
//! - `captions` - Caption sources (official service, subtitle catalog)
//! - `translate` - Translation of foreign-language captions
//! - `transcript` - Payload shapes and normalization
//! - `acquisition` - The fallback state machine
//! - `dedup` - Append-only processed-video log
//! - `results` - Result records and the JSON writer
//! - `orchestrator` - Batch coordination
//!
//! # Example
//!
//! ```rust,no_run
//! use tubescribe::config::Settings;
//! use tubescribe::orchestrator::Orchestrator;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     let orchestrator = Orchestrator::new(settings)?;
//!
//!     let report = orchestrator.run(None, None, None).await?;
//!     println!("Wrote {} records to {}", report.records.len(), report.results_path.display());
//!
//!     Ok(())
//! }
//! ```

pub mod acquisition;
pub mod article;
pub mod captions;
pub mod cli;
pub mod config;
pub mod dedup;
pub mod discovery;
pub mod error;
pub mod keywords;
pub mod openai;
pub mod orchestrator;
pub mod results;
pub mod transcript;
pub mod translate;
pub mod ytdlp;

pub use error::{Result, TubescribeError};
