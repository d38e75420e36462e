//! Daily scan cycle: scan, extract, persist, compare, notify.
//!
//! Daemon mode drives one ticker and runs every enabled target
//! sequentially on each tick. A day's snapshot is always fully written
//! before the next comparison reads it; no scan tasks are spawned.

use chrono::{Local, NaiveDate};
use tokio::time::{interval, Duration};

use scandiff_core::diff::{DiffSummary, NO_PREVIOUS_SCAN, UNREADABLE_SNAPSHOTS};
use scandiff_core::ScanSnapshot;

use crate::config::ScandiffConfig;
use crate::error::{Result, ScandiffError};
use crate::notify::{self, Notifier};
use crate::scanner::Scanner;
use crate::store::SnapshotStore;

/// Observable result of one scan cycle.
#[derive(Debug, PartialEq, Eq)]
pub enum CycleOutcome {
    /// First scan for this target; nothing to compare against yet.
    NoPrevious,
    /// Today's snapshot file is byte-identical to yesterday's.
    Unchanged,
    /// Files differ; the change summary was dispatched.
    Changed(DiffSummary),
    /// Files differ but could not be re-read for a record-level summary.
    SummaryUnavailable,
}

/// Execute a single scan cycle for one target.
///
/// Today's snapshot is always captured and persisted first; comparison
/// and notification happen against yesterday's file. Scanner and persist
/// errors are fatal for the cycle. Failures on the comparison side never
/// abort: they degrade to a sentinel report so a notification still goes
/// out.
pub async fn run_scan_cycle<S: Scanner, N: Notifier>(
    scanner: &S,
    notifier: &N,
    store: &SnapshotStore,
    flags: &[String],
    target: &str,
    today: NaiveDate,
) -> Result<CycleOutcome> {
    notifier
        .send(&notify::scan_started_message(
            target,
            Local::now().naive_local(),
        ))
        .await;

    let transcript = scanner.run(flags, target).await?;
    let snapshot = ScanSnapshot::extract(today, transcript);
    let path = store.save(target, &snapshot)?;

    tracing::info!(
        target = %target,
        date = %today,
        records = snapshot.len(),
        path = %path.display(),
        "Snapshot captured"
    );

    // pred_opt is None only at the calendar's lower bound; either way
    // there is nothing to compare against.
    let yesterday = today.pred_opt().filter(|d| store.contains(target, *d));
    let Some(yesterday) = yesterday else {
        tracing::info!(target = %target, "No previous snapshot, comparison skipped");
        notifier
            .send(&notify::difference_message(target, today, NO_PREVIOUS_SCAN))
            .await;
        return Ok(CycleOutcome::NoPrevious);
    };

    let identical = match store.raw_identical(target, yesterday, today) {
        Ok(identical) => identical,
        Err(e) => {
            tracing::warn!(target = %target, error = %e, "Raw comparison failed, assuming files differ");
            false
        }
    };
    if identical {
        tracing::info!(target = %target, "No changes since previous scan");
        return Ok(CycleOutcome::Unchanged);
    }

    match (store.load(target, yesterday), store.load(target, today)) {
        (Ok(previous), Ok(current)) => {
            let summary = DiffSummary::between(&previous, &current);
            notifier
                .send(&notify::difference_message(target, today, &summary.render()))
                .await;
            tracing::info!(
                target = %target,
                new = summary.new_records.len(),
                closed = summary.closed_records.len(),
                "Change summary dispatched"
            );
            Ok(CycleOutcome::Changed(summary))
        }
        (previous, current) => {
            if let Err(e) = previous.and(current) {
                tracing::warn!(target = %target, error = %e, "Snapshot unreadable for summary");
            }
            notifier
                .send(&notify::difference_message(
                    target,
                    today,
                    UNREADABLE_SNAPSHOTS,
                ))
                .await;
            Ok(CycleOutcome::SummaryUnavailable)
        }
    }
}

/// The scheduler runs periodic scan cycles for the configured targets.
pub struct ScanScheduler<S, N> {
    config: ScandiffConfig,
    scanner: S,
    notifier: N,
    store: SnapshotStore,
}

impl<S: Scanner, N: Notifier> ScanScheduler<S, N> {
    pub fn new(config: ScandiffConfig, scanner: S, notifier: N, store: SnapshotStore) -> Self {
        Self {
            config,
            scanner,
            notifier,
            store,
        }
    }

    /// Run the scheduler loop. The first cycle fires immediately, then
    /// once per configured interval. Per-target failures are logged and
    /// never stop the loop.
    pub async fn run(&self) -> Result<()> {
        for schedule in &self.config.targets {
            if !schedule.enabled {
                tracing::info!(target = %schedule.target, "Target disabled, skipping");
            }
        }
        let enabled: Vec<_> = self.config.targets.iter().filter(|t| t.enabled).collect();
        if enabled.is_empty() {
            return Err(ScandiffError::Config("No enabled targets configured".into()));
        }
        // tokio's interval panics on a zero period.
        if self.config.interval_secs == 0 {
            return Err(ScandiffError::Config(
                "interval_secs must be greater than zero".into(),
            ));
        }

        let mut ticker = interval(Duration::from_secs(self.config.interval_secs));
        tracing::info!(
            target_count = enabled.len(),
            interval_secs = self.config.interval_secs,
            "Scheduler started"
        );

        loop {
            ticker.tick().await;
            let today = Local::now().date_naive();

            for schedule in &enabled {
                let profile = schedule
                    .profile
                    .clone()
                    .unwrap_or(self.config.default_profile.clone());
                let flags: Vec<String> = profile
                    .nmap_flags()
                    .iter()
                    .map(|s| s.to_string())
                    .collect();

                tracing::info!(
                    target = %schedule.target,
                    profile = ?profile,
                    "Scheduled scan triggered"
                );

                match run_scan_cycle(
                    &self.scanner,
                    &self.notifier,
                    &self.store,
                    &flags,
                    &schedule.target,
                    today,
                )
                .await
                {
                    Ok(outcome) => {
                        tracing::debug!(target = %schedule.target, outcome = ?outcome, "Scan cycle finished");
                    }
                    Err(e) => {
                        tracing::error!(target = %schedule.target, error = %e, "Scheduled scan failed");
                    }
                }
            }
        }
    }
}
