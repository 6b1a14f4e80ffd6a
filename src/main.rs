//! Light node daemon.
//!
//! ```text
//!   settings file ─┐
//!   .env / env ────┼─▶ bootstrap ─▶ Supervisor ─▶ Worker 1..n ─▶ SampleVerifier
//!                  │                    ▲                          (every poll interval)
//!   SIGINT/TERM/ABRT ─▶ SignalWatcher ──┘ shutdown()
//!                                       wait_all() ─▶ exit 0
//! ```

use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;

use light_node::config::loader::{load_config, load_env_file};
use light_node::config::validation::validate_config;
use light_node::config::{ConfigError, NodeConfig, ObservabilityConfig};
use light_node::lifecycle::{bootstrap, SignalWatcher, StartupError, Supervisor};
use light_node::observability::{logging, metrics};

#[derive(Parser)]
#[command(name = "light-node", version)]
#[command(about = "Collects and verifies samples on a fixed interval", long_about = None)]
struct Cli {
    /// Settings file (TOML). Defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Dotenv file with GRPC_URL and PRIVATE_KEY. Defaults to ./.env if present.
    #[arg(long)]
    env_file: Option<PathBuf>,

    /// Override the number of workers.
    #[arg(long)]
    workers: Option<usize>,

    /// Override the poll interval in milliseconds.
    #[arg(long)]
    poll_interval_ms: Option<u64>,
}

fn load_settings(cli: &Cli) -> Result<NodeConfig, ConfigError> {
    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => NodeConfig::default(),
    };

    if let Some(workers) = cli.workers {
        config.worker.count = workers;
    }
    if let Some(interval) = cli.poll_interval_ms {
        config.worker.poll_interval_ms = interval;
    }

    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match load_settings(&cli) {
        Ok(config) => config,
        Err(e) => {
            logging::init_logging(&ObservabilityConfig::default());
            tracing::error!(error = %e, "Failed to load settings");
            return Err(e.into());
        }
    };
    logging::init_logging(&config.observability);

    tracing::info!("light-node v{} starting", env!("CARGO_PKG_VERSION"));

    match load_env_file(cli.env_file.as_deref()) {
        Ok(Some(path)) => tracing::info!(path = %path.display(), "Env file loaded"),
        Ok(None) => tracing::debug!("No .env file found, using process environment"),
        Err(e) => {
            tracing::error!(error = %e, "Failed to load env file");
            return Err(e.into());
        }
    }

    if config.observability.metrics_enabled {
        if let Ok(addr) = config.observability.metrics_address.parse::<SocketAddr>() {
            if let Err(e) = metrics::init_metrics(addr) {
                tracing::error!(error = %e, "Metrics disabled");
            }
        }
    }

    let mut supervisor = Supervisor::from_config(&config.worker);

    // Handlers go in before workers start so no signal is lost in between.
    let watcher = SignalWatcher::install(supervisor.shutdown_handle())
        .map_err(StartupError::Signals)
        .inspect_err(|e| tracing::error!(error = %e, "Startup failed"))?;

    bootstrap(config, |name| std::env::var(name).ok(), &mut supervisor)
        .inspect_err(|e| tracing::error!(error = %e, "Startup failed"))?;

    let watcher = watcher.spawn();
    let report = supervisor.wait_all().await;
    watcher.abort();

    tracing::info!(
        stopped = report.stopped(),
        aborted = report.aborted(),
        invocations = report.invocations(),
        "Workers have shut down, exiting"
    );

    if report.aborted() > 0 {
        return Err(format!("{} worker(s) terminated abnormally", report.aborted()).into());
    }
    Ok(())
}
