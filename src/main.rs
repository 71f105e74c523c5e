//! campwatch - Save-game watcher agent
//!
//! Entry point for the watcher.

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

use std::time::Duration;

use campwatch::delivery::{HttpSink, SinkCredentials};
use campwatch::observability::init_tracing;
use campwatch::report::MockExtractor;
use campwatch::watcher::Agent;
use campwatch::{Config, Result};
use clap::Parser;
use tokio_util::sync::CancellationToken;

/// campwatch - Save-game watcher agent
#[derive(Parser, Debug)]
#[command(name = "campwatch")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Camp ID grouping reports on the shared board (e.g. camp_123)
    #[arg(short, long, env = "CAMPWATCH_CAMP_ID")]
    camp_id: String,

    /// Directory tree watched for new save files
    #[arg(short, long, env = "CAMPWATCH_WATCH_DIR")]
    watch_dir: std::path::PathBuf,

    /// Path to the sink credential artifact
    #[arg(
        long,
        env = "CAMPWATCH_CREDENTIALS",
        default_value = "serviceAccountKey.json"
    )]
    credentials: std::path::PathBuf,

    /// Remote collection receiving reports
    #[arg(long, env = "CAMPWATCH_COLLECTION", default_value = "save_reports_v2")]
    collection: String,

    /// Seconds to sleep between scan cycles
    #[arg(short, long, env = "CAMPWATCH_INTERVAL", default_value = "5")]
    interval: u64,

    /// Per-attempt submission timeout in seconds
    #[arg(long, env = "CAMPWATCH_SUBMIT_TIMEOUT", default_value = "5")]
    submit_timeout: u64,

    /// Identifier for this agent instance (generated when omitted)
    #[arg(long, env = "CAMPWATCH_UPLOADER_ID")]
    uploader_id: Option<String>,

    /// Inclusive lower bound for extracted ability scores
    #[arg(long, env = "CAMPWATCH_STAT_MIN", default_value = "8")]
    stat_min: u8,

    /// Inclusive upper bound for extracted ability scores
    #[arg(long, env = "CAMPWATCH_STAT_MAX", default_value = "20")]
    stat_max: u8,

    /// Retry transiently failed uploads on later cycles
    #[arg(long, env = "CAMPWATCH_RETRY_FAILED")]
    retry_failed: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "CAMPWATCH_LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// Enable JSON logging output
    #[arg(long, env = "CAMPWATCH_LOG_JSON")]
    log_json: bool,
}

/// Instance identifier used when none is supplied.
fn default_uploader_id() -> String {
    let id = uuid::Uuid::new_v4().simple().to_string();
    format!("Agent_{}", &id[..8])
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(&cli.log_level, cli.log_json);

    tracing::info!("campwatch v{} starting...", env!("CARGO_PKG_VERSION"));

    let config = Config {
        watch_root: cli.watch_dir,
        camp_id: cli.camp_id,
        uploader_id: cli.uploader_id.unwrap_or_else(default_uploader_id),
        credentials_path: cli.credentials,
        collection: cli.collection,
        poll_interval: Duration::from_secs(cli.interval),
        submit_timeout: Duration::from_secs(cli.submit_timeout),
        stat_min: cli.stat_min,
        stat_max: cli.stat_max,
        retry_failed: cli.retry_failed,
        log_level: cli.log_level,
    };

    tracing::debug!(?config, "Configuration loaded");

    config.validate()?;

    // Missing or invalid credentials are the only fatal error.
    let credentials = match SinkCredentials::load(&config.credentials_path) {
        Ok(credentials) => credentials,
        Err(e) => {
            tracing::error!(error = %e, "Cannot start without sink credentials");
            std::process::exit(1);
        }
    };

    let sink = HttpSink::new(&credentials, &config.collection, config.submit_timeout)?;
    let extractor = MockExtractor::new(config.stat_range());
    let agent = Agent::new(config, extractor, sink);

    let shutdown = CancellationToken::new();
    let signal_token = shutdown.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Interrupt received, finishing current cycle");
            signal_token.cancel();
        }
    });

    agent.run(shutdown).await
}
