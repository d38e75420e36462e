//! Configuration for the scandiff daemon.

use serde::Deserialize;

/// Top-level scandiff configuration.
///
/// Loaded from `scandiff.toml` or `SCANDIFF__` environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct ScandiffConfig {
    /// Path to the nmap binary (default: "nmap").
    #[serde(default = "default_nmap_path")]
    pub nmap_path: String,

    /// Directory holding one snapshot file per target per day.
    #[serde(default = "default_snapshot_dir")]
    pub snapshot_dir: String,

    /// Default scan profile if not specified per target.
    #[serde(default)]
    pub default_profile: ScanProfile,

    /// Targets scanned on every cycle.
    #[serde(default)]
    pub targets: Vec<TargetSchedule>,

    /// Seconds between scan cycles in daemon mode.
    #[serde(default = "default_interval")]
    pub interval_secs: u64,

    /// Webhook notification settings.
    #[serde(default)]
    pub webhook: WebhookConfig,
}

/// A scan target with its scheduling options.
#[derive(Debug, Clone, Deserialize)]
pub struct TargetSchedule {
    /// Nmap target expression (host, hostname, or CIDR).
    pub target: String,

    /// Human-readable name for this target.
    pub name: Option<String>,

    /// Scan profile override for this target.
    pub profile: Option<ScanProfile>,

    /// Whether this target is enabled for scanning.
    #[serde(default = "default_true")]
    pub enabled: bool,
}

/// Slack-style incoming-webhook settings.
#[derive(Debug, Clone, Deserialize)]
pub struct WebhookConfig {
    /// Webhook URL. Empty disables notifications.
    #[serde(default)]
    pub url: String,

    /// Channel the message is posted to.
    #[serde(default = "default_channel")]
    pub channel: String,

    /// Username the message is posted as.
    #[serde(default = "default_username")]
    pub username: String,
}

/// Predefined scan profiles mapping to nmap flag sets.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ScanProfile {
    /// Ping sweep only: `-sn`
    Quick,
    /// Service version scan, top 1000 ports: `-sV`
    #[default]
    Standard,
    /// Full port range with service versions: `-sV -p-`
    Deep,
}

impl ScanProfile {
    /// Return the nmap flags for this profile.
    pub fn nmap_flags(&self) -> Vec<&'static str> {
        match self {
            Self::Quick => vec!["-sn"],
            Self::Standard => vec!["-sV", "--top-ports", "1000"],
            Self::Deep => vec!["-sV", "-p-"],
        }
    }
}

fn default_nmap_path() -> String {
    "nmap".to_string()
}

fn default_snapshot_dir() -> String {
    "./scans".to_string()
}

fn default_interval() -> u64 {
    86_400
}

fn default_channel() -> String {
    "#notifications".to_string()
}

fn default_username() -> String {
    "alert".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for ScandiffConfig {
    fn default() -> Self {
        Self {
            nmap_path: default_nmap_path(),
            snapshot_dir: default_snapshot_dir(),
            default_profile: ScanProfile::default(),
            targets: Vec::new(),
            interval_secs: default_interval(),
            webhook: WebhookConfig::default(),
        }
    }
}

impl Default for WebhookConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            channel: default_channel(),
            username: default_username(),
        }
    }
}
