//! Fairplay VRF daemon: key tooling and the request service runner.

mod config;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context};
use clap::Parser;
use fairplay_requests::{monitor, RequestEvent, RequestService, ShutdownController};
use fairplay_types::{SystemClock, VrfPublicKey, VrfSecretKey};
use fairplay_utils::{format_millis, init_logging, LogFormat};
use fairplay_vrf::{
    generate_keypair, keypair_from_secret, prove, select_winners, verify, LocalVrf, VrfProof,
};
use tokio::sync::broadcast::error::RecvError;

use crate::config::DaemonConfig;

#[derive(Parser)]
#[command(name = "fairplay-daemon", about = "Provably fair randomness for matches")]
struct Cli {
    /// Log format: "human" or "json".
    #[arg(long, default_value = "human", env = "FAIRPLAY_LOG_FORMAT")]
    log_format: LogFormat,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, default_value = "warn", env = "FAIRPLAY_LOG_LEVEL")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Generate a VRF key pair and print it as JSON.
    Keygen,

    /// Prove `alpha` with a secret key.
    Prove {
        #[arg(long, env = "FAIRPLAY_SECRET_KEY")]
        secret: String,
        #[arg(long)]
        alpha: String,
    },

    /// Verify a proof and print the output it commits to.
    Verify {
        #[arg(long)]
        public: String,
        /// 80-byte proof string, hex.
        #[arg(long)]
        proof: String,
        #[arg(long)]
        alpha: String,
    },

    /// Select weighted winners from a VRF output.
    Select {
        /// VRF output (beta), hex.
        #[arg(long)]
        seed: String,
        /// Comma-separated weights, e.g. 10,20,70.
        #[arg(long, value_delimiter = ',')]
        weights: Vec<f64>,
        #[arg(long, default_value_t = 1)]
        count: usize,
    },

    /// Run the request service until SIGINT/SIGTERM.
    Run {
        /// Path to a TOML configuration file.
        #[arg(long, env = "FAIRPLAY_CONFIG")]
        config: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Keygen => {
            init_logging(cli.log_format, &cli.log_level);
            let keypair = generate_keypair()?;
            print_json(&serde_json::json!({
                "public_key": keypair.public.to_hex(),
                "secret_key": keypair.secret.to_hex(),
            }))
        }
        Command::Prove { secret, alpha } => {
            init_logging(cli.log_format, &cli.log_level);
            let keypair = keypair_from_secret(VrfSecretKey::from_hex(&secret)?);
            let output = prove(&keypair.secret, alpha.as_bytes())?;
            print_json(&serde_json::json!({
                "public_key": keypair.public.to_hex(),
                "proof": output.proof.to_hex(),
                "beta": output.beta_hex(),
            }))
        }
        Command::Verify {
            public,
            proof,
            alpha,
        } => {
            init_logging(cli.log_format, &cli.log_level);
            let public = VrfPublicKey::from_hex(&public)?;
            let proof = VrfProof::from_hex(&proof, alpha.as_bytes())?;
            let output = verify(&public, &proof, alpha.as_bytes());
            print_json(&serde_json::json!({
                "valid": output.is_valid,
                "beta": output.beta_hex(),
            }))?;
            if !output.is_valid {
                bail!("proof does not verify");
            }
            Ok(())
        }
        Command::Select {
            seed,
            weights,
            count,
        } => {
            init_logging(cli.log_format, &cli.log_level);
            let seed = hex::decode(seed.trim()).context("seed must be hex")?;
            let winners = select_winners(&weights, count, &seed)?;
            print_json(&serde_json::json!({ "winners": winners }))
        }
        Command::Run { config } => {
            let config = match config {
                Some(path) => DaemonConfig::from_toml_file(&path)?,
                None => DaemonConfig::default(),
            };
            init_logging(config.log_format, &config.log_level);
            run(config).await
        }
    }
}

fn print_json(value: &serde_json::Value) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

async fn run(config: DaemonConfig) -> anyhow::Result<()> {
    let keypair = match config.secret_key_hex.as_deref() {
        Some(secret_hex) => {
            keypair_from_secret(VrfSecretKey::from_hex(secret_hex).context("secret_key_hex")?)
        }
        None => {
            tracing::warn!("no secret_key_hex configured, generating an ephemeral VRF key");
            generate_keypair()?
        }
    };
    let provider = LocalVrf::new(keypair).with_prove_budget(config.requests.prove_budget());

    tracing::info!(
        poll = %format_millis(config.requests.poll_interval_ms),
        floor = %format_millis(config.requests.min_resolution_delay_ms),
        ceiling = %format_millis(config.requests.max_resolution_delay_ms),
        "starting fairplay request service"
    );

    let service = Arc::new(RequestService::new(
        config.requests.clone(),
        Arc::new(SystemClock),
        Arc::new(provider),
    )?);

    let shutdown = ShutdownController::new();
    let monitor_handle = monitor::spawn(service.clone(), shutdown.subscribe());

    let mut events = service.subscribe();
    let mut shutdown_rx = shutdown.subscribe();
    let event_handle = tokio::spawn(async move {
        loop {
            tokio::select! {
                biased;
                _ = shutdown_rx.recv() => break,
                event = events.recv() => match event {
                    Ok(event) => log_event(&event),
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::warn!(skipped, "event log lagging behind");
                    }
                    Err(RecvError::Closed) => break,
                },
            }
        }
    });

    let signal = shutdown.wait_for_signal().await;
    tracing::info!(%signal, "fairplay daemon shutting down");

    if let Err(e) = monitor_handle.await {
        tracing::error!(error = %e, "request monitor task failed");
    }
    if let Err(e) = event_handle.await {
        tracing::error!(error = %e, "event log task failed");
    }

    let stats = service.stats().snapshot();
    tracing::info!(?stats, pending = service.pending_count(), "fairplay daemon exited cleanly");
    Ok(())
}

fn log_event(event: &RequestEvent) {
    match serde_json::to_string(event) {
        Ok(json) => tracing::info!(target: "fairplay::events", event = %json),
        Err(e) => tracing::warn!(error = %e, "failed to encode request event"),
    }
}
