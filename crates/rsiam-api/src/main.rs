//! rsiam server binary
//!
//! A local, deterministic IAM policy emulator: strong consistency, no
//! propagation delay, fully offline.
//!
//! # Usage
//!
//! ```bash
//! # With config file
//! rsiam --config rsiam.yaml
//!
//! # With environment variables only
//! RSIAM_SERVER__PORT=9090 RSIAM_ROLES__COMPAT=true rsiam
//! ```

use std::net::SocketAddr;
use std::sync::Arc;

use clap::Parser;
use tokio::signal;
use tracing::info;

use rsiam_api::http::{create_router, AppState};
use rsiam_api::observability::{init_logging, parse_log_level, LoggingConfig};
use rsiam_domain::trace::JsonLinesSink;
use rsiam_server::{SeedDocument, ServerConfig};
use rsiam_storage::PolicyStore;

/// rsiam - Local IAM policy emulator
#[derive(Parser, Debug)]
#[command(name = "rsiam")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to configuration file (YAML)
    #[arg(short, long)]
    config: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let config = if let Some(config_path) = args.config {
        ServerConfig::load(&config_path)?
    } else {
        ServerConfig::from_env()?
    };

    init_logging(LoggingConfig {
        json_format: config.logging.json,
        default_level: parse_log_level(&config.logging.level),
    });

    info!(version = env!("CARGO_PKG_VERSION"), "Starting rsiam emulator");

    let mut store = PolicyStore::new();
    if let Some(path) = &config.trace.output {
        let sink = JsonLinesSink::create(path)
            .map_err(|e| anyhow::anyhow!("failed to create trace output {path}: {e}"))?;
        store = store.with_trace_sink(Arc::new(sink));
        info!(path = path.as_str(), "Trace output enabled (JSONL)");
    }
    let store = Arc::new(store);

    store.set_compat_mode(config.roles.compat);
    if config.roles.compat {
        info!("Compat mode enabled (wildcard role matching)");
    } else {
        info!("Strict mode enabled (unknown roles denied)");
    }

    if let Some(path) = &config.policies.path {
        load_seed(path, &store)?;
    }

    let trace = config.trace.effective();
    if trace {
        info!("Trace mode enabled (authz decisions will be logged)");
    }

    let state = AppState::new(Arc::clone(&store)).with_trace(trace);
    let router = create_router(state);

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "HTTP server listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Loads the policy seed document into the store.
fn load_seed(path: &str, store: &PolicyStore) -> anyhow::Result<()> {
    info!(path, "Loading policy seed document");
    let doc = SeedDocument::load_from_file(path)?;

    let policies = doc.to_policies();
    let policy_count = policies.len();
    store
        .load_policies(policies)
        .map_err(|e| anyhow::anyhow!("invalid seed policy: {e}"))?;
    info!(count = policy_count, "Loaded policies from seed document");

    let groups = doc.to_groups();
    if !groups.is_empty() {
        info!(count = groups.len(), "Loaded groups from seed document");
        store.load_groups(groups);
    }

    let roles = doc.to_custom_roles();
    if !roles.is_empty() {
        info!(count = roles.len(), "Loaded custom roles from seed document");
        store.load_custom_roles(roles);
    }

    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
