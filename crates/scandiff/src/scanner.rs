//! Nmap process wrapper.
//!
//! Executes nmap as a child process via `tokio::process::Command` with
//! grepable output (`-oG -`) written to stdout, and hands the raw
//! transcript lines to the extraction layer. Nothing intermediate touches
//! disk; the transcript lives only in memory until extraction reduces it.

use std::time::Instant;

use async_trait::async_trait;
use tokio::process::Command;
use uuid::Uuid;

use crate::error::{Result, ScandiffError};

/// A scan backend producing a raw transcript for a target.
///
/// The scan cycle only depends on this trait, so it can run against
/// canned transcripts without spawning a process.
#[async_trait]
pub trait Scanner: Send + Sync {
    /// Run one scan and return the transcript lines.
    async fn run(&self, flags: &[String], target: &str) -> Result<Vec<String>>;
}

/// Wrapper around the nmap binary.
pub struct NmapScanner {
    nmap_path: String,
}

impl NmapScanner {
    pub fn new(nmap_path: &str) -> Self {
        Self {
            nmap_path: nmap_path.to_string(),
        }
    }

    /// Verify nmap is installed and accessible.
    pub async fn verify_installation(&self) -> Result<String> {
        let output = Command::new(&self.nmap_path)
            .arg("--version")
            .output()
            .await
            .map_err(|_| ScandiffError::NmapNotFound {
                path: self.nmap_path.clone(),
            })?;

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

#[async_trait]
impl Scanner for NmapScanner {
    async fn run(&self, flags: &[String], target: &str) -> Result<Vec<String>> {
        let scan_id = Uuid::new_v4();
        let start = Instant::now();

        tracing::info!(
            scan_id = %scan_id,
            target = %target,
            flags = ?flags,
            "Starting nmap scan"
        );

        let output = Command::new(&self.nmap_path)
            .args(flags)
            .arg("-oG")
            .arg("-")
            .arg(target)
            .output()
            .await
            .map_err(|e| ScandiffError::NmapNotFound {
                path: format!("{}: {e}", self.nmap_path),
            })?;

        let duration = start.elapsed();

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).to_string();
            return Err(ScandiffError::NmapFailed {
                code: output.status.code().unwrap_or(-1),
                stderr,
            });
        }

        let transcript: Vec<String> = String::from_utf8_lossy(&output.stdout)
            .lines()
            .map(str::to_string)
            .collect();

        tracing::info!(
            scan_id = %scan_id,
            target = %target,
            lines = transcript.len(),
            duration_ms = duration.as_millis(),
            "Nmap scan complete"
        );

        Ok(transcript)
    }
}
