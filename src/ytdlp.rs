//! Thin wrapper around the `yt-dlp` command-line tool.
//!
//! Both video discovery and the caption catalog read yt-dlp's JSON dumps;
//! this module owns process spawning and error mapping for them.

use crate::error::{Result, TubescribeError};
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, instrument};

/// Handle to a yt-dlp executable.
#[derive(Debug, Clone)]
pub struct YtDlp {
    binary: String,
}

impl YtDlp {
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    /// Run yt-dlp with `--dump-json` and return its stdout.
    ///
    /// For playlists and searches stdout holds one JSON object per line.
    #[instrument(skip(self, extra_args))]
    pub async fn dump_json(&self, target: &str, extra_args: &[&str]) -> Result<String> {
        debug!("Running {} --dump-json", self.binary);

        let result = Command::new(&self.binary)
            .arg("--dump-json")
            .arg("--no-warnings")
            .args(extra_args)
            .arg(target)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await;

        let output = match result {
            Ok(o) => o,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(TubescribeError::ToolNotFound(self.binary.clone()));
            }
            Err(e) => {
                return Err(TubescribeError::ToolFailed(format!(
                    "Failed to run {}: {e}",
                    self.binary
                )));
            }
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(TubescribeError::ToolFailed(format!(
                "{} failed: {}",
                self.binary,
                stderr.trim()
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl Default for YtDlp {
    fn default() -> Self {
        Self::new("yt-dlp")
    }
}

/// Canonical watch URL for a YouTube video ID.
pub fn watch_url(video_id: &str) -> String {
    format!("https://www.youtube.com/watch?v={}", video_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_watch_url() {
        assert_eq!(
            watch_url("dQw4w9WgXcQ"),
            "https://www.youtube.com/watch?v=dQw4w9WgXcQ"
        );
    }

    #[tokio::test]
    async fn test_missing_binary_is_tool_not_found() {
        let ytdlp = YtDlp::new("tubescribe-definitely-missing-binary");
        let err = ytdlp.dump_json("ytsearch1:test", &[]).await.unwrap_err();
        assert!(matches!(err, TubescribeError::ToolNotFound(_)));
    }
}
