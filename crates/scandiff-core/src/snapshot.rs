//! Scan snapshots: the normalized view of one day's scan output.
//!
//! Nmap's grepable output (`-oG`) interleaves host records with comment
//! lines and run summaries. Only lines carrying the `Host:` marker describe
//! discovered hosts; extraction keeps those and drops everything else.

use std::collections::HashSet;
use std::fmt;

use chrono::NaiveDate;

/// Marker prefix of a host record in nmap grepable output. Checked against
/// the raw line, before trimming, so indented noise never matches.
pub const HOST_RECORD_PREFIX: &str = "Host:";

// ── Records ──────────────────────────────────────────────────────

/// One normalized line of scan output describing a single host state.
///
/// Records are opaque to the differ: two records represent the same
/// finding iff their text is identical. No field-level parsing happens
/// anywhere in the pipeline.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ScanRecord(String);

impl ScanRecord {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ScanRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ── Snapshots ────────────────────────────────────────────────────

/// The deduplicated host records captured for one target on one day.
///
/// Records keep their first-seen transcript order. Order never affects
/// comparison (the differ works over sets), but it is preserved so the
/// persisted artifact can still differ byte-wise from a reordered copy
/// with the same record set; the raw-file gate and the set-based diff
/// are independent checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanSnapshot {
    pub date: NaiveDate,
    records: Vec<ScanRecord>,
}

impl ScanSnapshot {
    /// Extract host records from a raw scan transcript.
    ///
    /// Keeps lines starting with [`HOST_RECORD_PREFIX`], trimmed, first
    /// occurrence wins. Comments, blank lines, and run summaries are
    /// expected noise and are dropped silently.
    pub fn extract<I, S>(date: NaiveDate, transcript: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen = HashSet::new();
        let mut records = Vec::new();
        for line in transcript {
            let line = line.as_ref();
            if !line.starts_with(HOST_RECORD_PREFIX) {
                continue;
            }
            let trimmed = line.trim();
            if seen.insert(trimmed.to_string()) {
                records.push(ScanRecord(trimmed.to_string()));
            }
        }
        Self { date, records }
    }

    /// Rebuild a snapshot from a stored artifact (one record per line).
    ///
    /// Stored files contain only records, so there is no prefix filter
    /// here: every non-empty trimmed line counts, deduplicated.
    pub fn from_stored<I, S>(date: NaiveDate, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen = HashSet::new();
        let mut records = Vec::new();
        for line in lines {
            let trimmed = line.as_ref().trim();
            if trimmed.is_empty() {
                continue;
            }
            if seen.insert(trimmed.to_string()) {
                records.push(ScanRecord(trimmed.to_string()));
            }
        }
        Self { date, records }
    }

    /// Records in first-seen order.
    pub fn records(&self) -> &[ScanRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
