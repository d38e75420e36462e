//! Snapshot persistence: one newline-delimited file per target per day.
//!
//! Snapshots are stored as plain text files organized by target:
//! ```text
//! {root}/
//!   scanme.nmap.org/
//!     scan_2026-08-22.txt
//!     scan_2026-08-23.txt
//! ```
//!
//! A stored file holds the snapshot's records in capture order, one per
//! line. Because the format is the records themselves, the store can
//! offer both views the change detector needs: the parsed record set and
//! the raw bytes for the file-level comparison gate.

use std::fs;
use std::path::PathBuf;

use chrono::NaiveDate;

use scandiff_core::ScanSnapshot;

use crate::error::{Result, ScandiffError};

/// File-system backed snapshot store.
pub struct SnapshotStore {
    root: PathBuf,
}

impl SnapshotStore {
    /// Create a new store rooted at the given directory.
    /// Creates the directory if it doesn't exist.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    /// Build the file path for a target's snapshot on a date.
    pub fn snapshot_path(&self, target: &str, date: NaiveDate) -> PathBuf {
        self.root
            .join(target_slug(target))
            .join(format!("scan_{date}.txt"))
    }

    /// True when a snapshot exists for the target on the date.
    pub fn contains(&self, target: &str, date: NaiveDate) -> bool {
        self.snapshot_path(target, date).is_file()
    }

    /// Persist a snapshot, overwriting any existing file for the same
    /// target and date (same-day rerun).
    pub fn save(&self, target: &str, snapshot: &ScanSnapshot) -> Result<PathBuf> {
        let path = self.snapshot_path(target, snapshot.date);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let mut content = snapshot
            .records()
            .iter()
            .map(|r| r.as_str())
            .collect::<Vec<_>>()
            .join("\n");
        if !content.is_empty() {
            content.push('\n');
        }
        fs::write(&path, content)?;

        tracing::debug!(
            target = %target,
            path = %path.display(),
            records = snapshot.len(),
            "Snapshot saved"
        );

        Ok(path)
    }

    /// Load a stored snapshot. A missing or unreadable file is reported
    /// as [`ScandiffError::SourceUnavailable`] so callers can decide
    /// whether that is fatal or just degrades the report.
    pub fn load(&self, target: &str, date: NaiveDate) -> Result<ScanSnapshot> {
        let path = self.snapshot_path(target, date);
        let content =
            fs::read_to_string(&path).map_err(|source| ScandiffError::SourceUnavailable {
                path: path.clone(),
                source,
            })?;
        Ok(ScanSnapshot::from_stored(date, content.lines()))
    }

    /// Bit-for-bit comparison of two stored snapshot files.
    ///
    /// This is the notification gate, independent of the set-based diff:
    /// reordered files compare unequal here while their record sets
    /// compare equal. The two checks must not be unified.
    pub fn raw_identical(&self, target: &str, earlier: NaiveDate, later: NaiveDate) -> Result<bool> {
        let a = self.read_raw(target, earlier)?;
        let b = self.read_raw(target, later)?;
        Ok(a == b)
    }

    fn read_raw(&self, target: &str, date: NaiveDate) -> Result<Vec<u8>> {
        let path = self.snapshot_path(target, date);
        fs::read(&path).map_err(|source| ScandiffError::SourceUnavailable {
            path: path.clone(),
            source,
        })
    }
}

/// Map a target expression to a filesystem-safe directory name.
///
/// Hostnames are folded to lowercase; anything outside `[a-z0-9._-]`
/// (CIDR slashes, IPv6 colons) becomes `-`.
fn target_slug(target: &str) -> String {
    target
        .trim()
        .to_ascii_lowercase()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '-'
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use scandiff_core::DiffSummary;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, d).unwrap()
    }

    fn snapshot(date: NaiveDate, lines: &[&str]) -> ScanSnapshot {
        ScanSnapshot::extract(date, lines)
    }

    #[test]
    fn save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = SnapshotStore::new(dir.path()).unwrap();
        let saved = snapshot(day(22), &["Host: 10.0.0.5\tStatus: Up", "Host: 10.0.0.9\tStatus: Up"]);

        store.save("10.0.0.0/24", &saved).unwrap();
        let loaded = store.load("10.0.0.0/24", day(22)).unwrap();

        assert_eq!(loaded, saved);
    }

    #[test]
    fn load_missing_snapshot_is_source_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let store = SnapshotStore::new(dir.path()).unwrap();

        let result = store.load("scanme.nmap.org", day(22));
        assert!(matches!(
            result,
            Err(ScandiffError::SourceUnavailable { .. })
        ));
    }

    #[test]
    fn contains_reflects_saved_snapshots() {
        let dir = tempfile::tempdir().unwrap();
        let store = SnapshotStore::new(dir.path()).unwrap();

        assert!(!store.contains("scanme.nmap.org", day(22)));
        store
            .save("scanme.nmap.org", &snapshot(day(22), &["Host: a"]))
            .unwrap();
        assert!(store.contains("scanme.nmap.org", day(22)));
        assert!(!store.contains("scanme.nmap.org", day(23)));
    }

    #[test]
    fn raw_identical_detects_equal_files() {
        let dir = tempfile::tempdir().unwrap();
        let store = SnapshotStore::new(dir.path()).unwrap();
        store.save("t", &snapshot(day(22), &["Host: a", "Host: b"])).unwrap();
        store.save("t", &snapshot(day(23), &["Host: a", "Host: b"])).unwrap();

        assert!(store.raw_identical("t", day(22), day(23)).unwrap());
    }

    #[test]
    fn raw_identical_detects_different_files() {
        let dir = tempfile::tempdir().unwrap();
        let store = SnapshotStore::new(dir.path()).unwrap();
        store.save("t", &snapshot(day(22), &["Host: a"])).unwrap();
        store.save("t", &snapshot(day(23), &["Host: a", "Host: b"])).unwrap();

        assert!(!store.raw_identical("t", day(22), day(23)).unwrap());
    }

    #[test]
    fn raw_identical_missing_file_is_source_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let store = SnapshotStore::new(dir.path()).unwrap();
        store.save("t", &snapshot(day(22), &["Host: a"])).unwrap();

        let result = store.raw_identical("t", day(22), day(23));
        assert!(matches!(
            result,
            Err(ScandiffError::SourceUnavailable { .. })
        ));
    }

    #[test]
    fn reordered_records_differ_raw_but_not_as_sets() {
        let dir = tempfile::tempdir().unwrap();
        let store = SnapshotStore::new(dir.path()).unwrap();
        store.save("t", &snapshot(day(22), &["Host: a", "Host: b"])).unwrap();
        store.save("t", &snapshot(day(23), &["Host: b", "Host: a"])).unwrap();

        assert!(!store.raw_identical("t", day(22), day(23)).unwrap());

        let previous = store.load("t", day(22)).unwrap();
        let current = store.load("t", day(23)).unwrap();
        assert!(DiffSummary::between(&previous, &current).is_unchanged());
    }

    #[test]
    fn empty_snapshot_saves_as_empty_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = SnapshotStore::new(dir.path()).unwrap();

        let path = store.save("t", &snapshot(day(22), &[])).unwrap();
        assert_eq!(fs::read(&path).unwrap(), Vec::<u8>::new());

        let loaded = store.load("t", day(22)).unwrap();
        assert!(loaded.is_empty());
    }

    #[test]
    fn snapshot_files_are_named_by_date_under_target_slug() {
        let dir = tempfile::tempdir().unwrap();
        let store = SnapshotStore::new(dir.path()).unwrap();

        let path = store.snapshot_path("ScanMe.Nmap.Org", day(5));
        assert!(path.ends_with("scanme.nmap.org/scan_2026-08-05.txt"));

        let path = store.snapshot_path("10.0.0.0/24", day(22));
        assert!(path.ends_with("10.0.0.0-24/scan_2026-08-22.txt"));
    }
}
