//! scandiff: daily nmap scan differ with webhook change alerts.
//!
//! Wraps nmap to capture a per-day snapshot of discovered hosts for each
//! configured target, diffs it against the previous day's snapshot, and
//! posts any changes to a Slack-style incoming webhook.

pub mod config;
pub mod error;
pub mod notify;
pub mod scanner;
pub mod scheduler;
pub mod store;
