//! Core logic for scandiff: turning raw nmap transcripts into normalized
//! per-day snapshots, and turning two snapshots into a change summary.
//!
//! This crate is pure. It never spawns a process, touches the filesystem,
//! or opens a socket; all I/O lives in the `scandiff` binary crate.

pub mod diff;
pub mod snapshot;

pub use diff::DiffSummary;
pub use snapshot::{ScanRecord, ScanSnapshot};
