//! Pre-flight checks before network-heavy operations.
//!
//! Validates that required tools are available before starting operations
//! that would otherwise fail midway.

use crate::config::Settings;
use crate::error::{Result, TubescribeError};
use std::process::Command;

/// Requirements for different operations.
#[derive(Debug, Clone, Copy)]
pub enum Operation {
    /// A full run searches and reads subtitle catalogs through yt-dlp.
    Run,
    /// A single transcript may need the subtitle catalog.
    Transcript,
    /// Search runs yt-dlp.
    Search,
}

/// Run pre-flight checks for the given operation.
pub fn check(operation: Operation, settings: &Settings) -> Result<()> {
    match operation {
        Operation::Run | Operation::Transcript | Operation::Search => {
            check_tool(&settings.discovery.ytdlp_path)?;
        }
    }
    Ok(())
}

/// Check if an external tool is available.
fn check_tool(name: &str) -> Result<()> {
    match Command::new(name).arg("--version").output() {
        Ok(output) if output.status.success() => Ok(()),
        Ok(_) => Err(TubescribeError::ToolFailed(format!(
            "{} is installed but not working correctly",
            name
        ))),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(TubescribeError::ToolNotFound(name.to_string()))
        }
        Err(e) => Err(TubescribeError::ToolFailed(format!("{}: {}", name, e))),
    }
}
