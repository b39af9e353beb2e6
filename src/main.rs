// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

use anyhow::{bail, Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info, warn};
use zonesync::{
    config::Config,
    constants::{CONFIG_PATH_ENV, TOKIO_WORKER_THREADS},
    provider::HttpProvider,
    sync::{ZoneJob, ZoneSyncer},
    transfer::AxfrClient,
};

/// Replicate DNS zones from an authoritative nameserver into a managed DNS provider.
#[derive(Debug, Parser)]
#[command(name = "zonesync", version, about)]
struct Cli {
    /// Path to the YAML configuration file
    #[arg(long, env = CONFIG_PATH_ENV)]
    config: PathBuf,

    /// Zone to transfer (replaces the configured jobs when given with --server and --zone-id)
    #[arg(short = 'd', long)]
    zone: Option<String>,

    /// Authoritative nameserver to transfer the zone from
    #[arg(short = 't', long)]
    server: Option<String>,

    /// Destination zone identifier at the provider
    #[arg(short = 'z', long)]
    zone_id: Option<String>,

    /// Compute and log changes without submitting them
    #[arg(long)]
    dry_run: bool,
}

impl Cli {
    /// The job given on the command line, if any.
    ///
    /// All three of `--zone`, `--server` and `--zone-id` must be given together.
    fn job(&self) -> Result<Option<ZoneJob>> {
        match (&self.zone, &self.server, &self.zone_id) {
            (None, None, None) => Ok(None),
            (Some(zone), Some(server), Some(zone_id)) => Ok(Some(ZoneJob {
                zone: zone.clone(),
                server: server.clone(),
                zone_id: zone_id.clone(),
            })),
            _ => bail!("--zone, --server and --zone-id must be given together"),
        }
    }
}

/// Apply command-line overrides to the loaded configuration.
fn apply_cli_overrides(mut config: Config, cli: &Cli) -> Result<Config> {
    if let Some(job) = cli.job()? {
        config.jobs = vec![job];
    }
    if cli.dry_run {
        config.sync.dry_run = true;
    }
    Ok(config)
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Build Tokio runtime with custom thread names
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(TOKIO_WORKER_THREADS)
        .thread_name("zonesync")
        .enable_all()
        .build()?;

    runtime.block_on(async_main(cli))
}

fn initialize_logging() {
    // Respects RUST_LOG environment variable if set, otherwise defaults to INFO level
    // Respects RUST_LOG_FORMAT environment variable for output format (json or text)
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let log_format = std::env::var("RUST_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    match log_format.to_lowercase().as_str() {
        "json" => {
            tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_file(true)
                .with_line_number(true)
                .with_thread_names(true)
                .with_target(false)
                .json()
                .init();
        }
        _ => {
            tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_file(true)
                .with_line_number(true)
                .with_thread_names(true)
                .with_target(false)
                .with_ansi(true)
                .compact()
                .init();
        }
    }
}

async fn async_main(cli: Cli) -> Result<()> {
    initialize_logging();

    info!("Starting zonesync");

    let config = Config::load(&cli.config)?;
    let config = apply_cli_overrides(config, &cli)?;
    config.validate()?;
    debug!(config = ?config, "Configuration loaded");

    let key = config.tsig.resolve()?;
    let mut transfer = AxfrClient::new(key);
    if let Some(timeout) = config.transfer_timeout() {
        transfer = transfer.with_timeout(timeout);
    }

    let token = match std::env::var(&config.provider.token_env) {
        Ok(token) => Some(token),
        Err(_) => {
            warn!(
                env = %config.provider.token_env,
                "Provider token not set, sending unauthenticated requests"
            );
            None
        }
    };
    let provider = HttpProvider::new(
        &config.provider.endpoint,
        token,
        config.provider.timeout(),
    )
    .context("Failed to create provider client")?;

    let syncer = ZoneSyncer::new(
        Arc::new(transfer),
        Arc::new(provider),
        config.sync_options(),
    );

    let results = syncer.sync_all(&config.jobs).await;

    let failed_jobs = results.iter().filter(|r| r.is_err()).count();
    let failed_batches: usize = results
        .iter()
        .filter_map(|r| r.as_ref().ok())
        .filter_map(|report| report.submission.as_ref())
        .map(zonesync::submitter::SubmissionReport::failed)
        .sum();

    info!(
        jobs = results.len(),
        failed_jobs,
        failed_batches,
        "Finished zone sync run"
    );

    if failed_jobs > 0 || failed_batches > 0 {
        bail!("{failed_jobs} zone job(s) and {failed_batches} change batch(es) failed");
    }

    Ok(())
}
