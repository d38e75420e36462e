//! CLI entry point for the scandiff daily scan differ.

use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use scandiff::config::{ScandiffConfig, ScanProfile};
use scandiff::notify::WebhookNotifier;
use scandiff::scanner::NmapScanner;
use scandiff::scheduler::{run_scan_cycle, ScanScheduler};
use scandiff::store::SnapshotStore;

#[derive(Parser)]
#[command(name = "scandiff")]
#[command(about = "Daily nmap scan differ with webhook change alerts")]
struct Cli {
    /// Target to scan (host, hostname, or CIDR, e.g. scanme.nmap.org).
    #[arg(short = 'i', long)]
    target: Option<String>,

    /// Scan profile: quick, standard, deep.
    #[arg(short, long, default_value = "standard")]
    profile: String,

    /// Raw nmap flags overriding the profile (e.g. "-sV -p 1-1000").
    #[arg(short, long)]
    flags: Option<String>,

    /// Run a single scan-and-compare cycle and exit.
    #[arg(long)]
    once: bool,

    /// Run as daemon with scheduled daily scans.
    #[arg(long)]
    daemon: bool,

    /// Config file prefix (default: scandiff).
    #[arg(short, long, default_value = "scandiff")]
    config: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).init();

    let cli = Cli::parse();
    let config = load_config(&cli.config)?;

    // Verify nmap installation.
    let scanner = NmapScanner::new(&config.nmap_path);
    let version = scanner.verify_installation().await?;
    tracing::info!(nmap_version = %version.trim(), "Nmap verified");

    let store = SnapshotStore::new(&config.snapshot_dir)?;
    let notifier = WebhookNotifier::new(config.webhook.clone())?;

    if cli.once {
        let target = cli
            .target
            .as_deref()
            .ok_or_else(|| anyhow::anyhow!("--target is required in --once mode"))?;
        let profile = parse_profile(&cli.profile)?;
        let flags = resolve_flags(cli.flags.as_deref(), &profile);
        let today = chrono::Local::now().date_naive();

        run_scan_cycle(&scanner, &notifier, &store, &flags, target, today).await?;
    } else if cli.daemon {
        let sched = ScanScheduler::new(config, scanner, notifier, store);
        sched.run().await?;
    } else {
        anyhow::bail!("Specify --once (single scan cycle) or --daemon (scheduled daily scans)");
    }

    Ok(())
}

fn parse_profile(s: &str) -> anyhow::Result<ScanProfile> {
    match s.to_lowercase().as_str() {
        "quick" => Ok(ScanProfile::Quick),
        "standard" => Ok(ScanProfile::Standard),
        "deep" => Ok(ScanProfile::Deep),
        _ => anyhow::bail!("Invalid profile: {s}. Choose: quick, standard, deep"),
    }
}

/// Raw `--flags` win over the profile, whitespace-split like a shell would.
fn resolve_flags(raw: Option<&str>, profile: &ScanProfile) -> Vec<String> {
    match raw {
        Some(raw) => raw.split_whitespace().map(str::to_string).collect(),
        None => profile.nmap_flags().iter().map(|s| s.to_string()).collect(),
    }
}

fn load_config(file_prefix: &str) -> anyhow::Result<ScandiffConfig> {
    let cfg = config::Config::builder()
        .add_source(config::File::with_name(file_prefix).required(false))
        .add_source(
            config::Environment::with_prefix("SCANDIFF")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    match cfg.try_deserialize::<ScandiffConfig>() {
        Ok(c) => Ok(c),
        Err(_) => Ok(ScandiffConfig::default()),
    }
}
