//! Append-only log of processed video URLs.
//!
//! One URL per line. A video whose URL is already in the log is skipped
//! before any network call.

use crate::error::Result;
use std::collections::HashSet;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Processed-video log backed by a plain text file.
///
/// Not synchronized; the batch orchestrator wraps it in a `tokio::sync::Mutex`.
#[derive(Debug)]
pub struct DedupLog {
    path: PathBuf,
    entries: HashSet<String>,
}

impl DedupLog {
    /// Open the log, reading existing entries. A missing file is an empty log.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        let entries = if path.exists() {
            std::fs::read_to_string(&path)?
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(str::to_string)
                .collect()
        } else {
            HashSet::new()
        };

        debug!("Loaded {} processed videos from {:?}", entries.len(), path);
        Ok(Self { path, entries })
    }

    /// Whether `url` was logged. Exact line match, not substring search.
    pub fn contains(&self, url: &str) -> bool {
        self.entries.contains(url.trim())
    }

    /// Record `url` as processed. Logging an already-present URL is a no-op.
    pub fn append(&mut self, url: &str) -> Result<()> {
        let url = url.trim();
        if url.is_empty() || self.entries.contains(url) {
            return Ok(());
        }

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let mut file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{}", url)?;

        self.entries.insert(url.to_string());
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
