//! Set-difference between two scan snapshots and its report rendering.

use std::collections::HashSet;

use crate::snapshot::{ScanRecord, ScanSnapshot};

/// Report body when the raw files differ but no record-level change exists
/// (reordering, trailing whitespace, duplicate collapsing).
pub const NO_LINE_CHANGES: &str =
    "(Files differ but no line-level additions/removals were detected.)";

/// Report body when there is no previous snapshot to compare against.
pub const NO_PREVIOUS_SCAN: &str = "(No previous scan available for detailed diff summary.)";

/// Report body when a snapshot file cannot be read back for the summary.
pub const UNREADABLE_SNAPSHOTS: &str =
    "(Could not read one or both scan files to build summary.)";

/// Records that appeared or disappeared between two snapshots.
///
/// Both sides are sorted lexicographically and are disjoint: a record is
/// either new, closed, or present in both snapshots (and then in neither
/// list).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffSummary {
    /// Present in the current snapshot only.
    pub new_records: Vec<ScanRecord>,
    /// Present in the previous snapshot only.
    pub closed_records: Vec<ScanRecord>,
}

impl DiffSummary {
    /// Compare two snapshots by record text.
    pub fn between(previous: &ScanSnapshot, current: &ScanSnapshot) -> Self {
        let prev: HashSet<&str> = previous.records().iter().map(ScanRecord::as_str).collect();
        let curr: HashSet<&str> = current.records().iter().map(ScanRecord::as_str).collect();

        let mut new_records: Vec<ScanRecord> = current
            .records()
            .iter()
            .filter(|r| !prev.contains(r.as_str()))
            .cloned()
            .collect();
        new_records.sort();

        let mut closed_records: Vec<ScanRecord> = previous
            .records()
            .iter()
            .filter(|r| !curr.contains(r.as_str()))
            .cloned()
            .collect();
        closed_records.sort();

        Self {
            new_records,
            closed_records,
        }
    }

    /// True when neither side changed. The raw files may still differ
    /// byte-wise; callers gate notification on that check, not this one.
    pub fn is_unchanged(&self) -> bool {
        self.new_records.is_empty() && self.closed_records.is_empty()
    }

    /// Render the human-readable report body.
    ///
    /// One block per non-empty side ("New findings:" / "Closed findings:",
    /// one record per line), blocks separated by a blank line. When both
    /// sides are empty the [`NO_LINE_CHANGES`] sentinel is returned, since
    /// this is only called once the raw files are known to differ.
    pub fn render(&self) -> String {
        let mut blocks = Vec::new();
        if !self.new_records.is_empty() {
            blocks.push(format!("New findings:\n{}", join_lines(&self.new_records)));
        }
        if !self.closed_records.is_empty() {
            blocks.push(format!(
                "Closed findings:\n{}",
                join_lines(&self.closed_records)
            ));
        }
        if blocks.is_empty() {
            return NO_LINE_CHANGES.to_string();
        }
        blocks.join("\n\n")
    }
}

fn join_lines(records: &[ScanRecord]) -> String {
    records
        .iter()
        .map(ScanRecord::as_str)
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn snapshot(lines: &[&str]) -> ScanSnapshot {
        ScanSnapshot::extract(NaiveDate::from_ymd_opt(2026, 8, 22).unwrap(), lines)
    }

    fn texts(records: &[ScanRecord]) -> Vec<&str> {
        records.iter().map(ScanRecord::as_str).collect()
    }

    #[test]
    fn test_self_diff_is_empty() {
        let a = snapshot(&["Host: 10.0.0.5\tStatus: Up", "Host: 10.0.0.9\tStatus: Up"]);
        let summary = DiffSummary::between(&a, &a);
        assert!(summary.is_unchanged());
        assert!(summary.new_records.is_empty());
        assert!(summary.closed_records.is_empty());
    }

    #[test]
    fn test_new_host_appears_in_new_records() {
        let yesterday = snapshot(&["Host: A"]);
        let today = snapshot(&["Host: A", "Host: B"]);
        let summary = DiffSummary::between(&yesterday, &today);
        assert_eq!(texts(&summary.new_records), vec!["Host: B"]);
        assert!(summary.closed_records.is_empty());
    }

    #[test]
    fn test_closed_host_appears_in_closed_records() {
        let yesterday = snapshot(&["Host: A", "Host: B"]);
        let today = snapshot(&["Host: A"]);
        let summary = DiffSummary::between(&yesterday, &today);
        assert!(summary.new_records.is_empty());
        assert_eq!(texts(&summary.closed_records), vec!["Host: B"]);
    }

    #[test]
    fn test_empty_today_closes_every_record() {
        let yesterday = snapshot(&["Host: A"]);
        let today = snapshot(&[]);
        let summary = DiffSummary::between(&yesterday, &today);
        assert!(summary.new_records.is_empty());
        assert_eq!(texts(&summary.closed_records), vec!["Host: A"]);
    }

    #[test]
    fn test_diff_is_antisymmetric() {
        let a = snapshot(&["Host: A", "Host: B"]);
        let b = snapshot(&["Host: B", "Host: C"]);
        let forward = DiffSummary::between(&a, &b);
        let backward = DiffSummary::between(&b, &a);
        assert_eq!(forward.new_records, backward.closed_records);
        assert_eq!(forward.closed_records, backward.new_records);
    }

    #[test]
    fn test_new_and_closed_are_disjoint_from_intersection() {
        let a = snapshot(&["Host: A", "Host: B", "Host: C"]);
        let b = snapshot(&["Host: B", "Host: C", "Host: D"]);
        let summary = DiffSummary::between(&a, &b);

        assert_eq!(texts(&summary.new_records), vec!["Host: D"]);
        assert_eq!(texts(&summary.closed_records), vec!["Host: A"]);
        for shared in ["Host: B", "Host: C"] {
            assert!(!texts(&summary.new_records).contains(&shared));
            assert!(!texts(&summary.closed_records).contains(&shared));
        }
    }

    #[test]
    fn test_output_is_sorted() {
        let yesterday = snapshot(&[]);
        let today = snapshot(&["Host: z", "Host: a", "Host: m"]);
        let summary = DiffSummary::between(&yesterday, &today);
        assert_eq!(texts(&summary.new_records), vec!["Host: a", "Host: m", "Host: z"]);
    }

    #[test]
    fn test_reordered_snapshots_diff_as_unchanged() {
        let a = snapshot(&["Host: A", "Host: B"]);
        let b = snapshot(&["Host: B", "Host: A"]);
        assert!(DiffSummary::between(&a, &b).is_unchanged());
    }

    #[test]
    fn test_render_new_only() {
        let summary = DiffSummary::between(&snapshot(&["Host: A"]), &snapshot(&["Host: A", "Host: B"]));
        assert_eq!(summary.render(), "New findings:\nHost: B");
    }

    #[test]
    fn test_render_both_blocks_separated_by_blank_line() {
        let summary = DiffSummary::between(&snapshot(&["Host: A"]), &snapshot(&["Host: B"]));
        assert_eq!(
            summary.render(),
            "New findings:\nHost: B\n\nClosed findings:\nHost: A"
        );
    }

    #[test]
    fn test_render_empty_diff_uses_sentinel() {
        let summary = DiffSummary::between(&snapshot(&["Host: A"]), &snapshot(&["Host: A"]));
        assert_eq!(summary.render(), NO_LINE_CHANGES);
    }

    #[test]
    fn test_render_multiple_records_one_per_line() {
        let summary = DiffSummary::between(&snapshot(&[]), &snapshot(&["Host: b", "Host: a"]));
        assert_eq!(summary.render(), "New findings:\nHost: a\nHost: b");
    }
}
