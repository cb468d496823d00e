//! PayApp Feedback Server
//!
//! Receives PayApp feedback callbacks, authenticates and deduplicates them,
//! and records every payment event as a structured log entry.

mod api;
mod config;
mod server;
mod shutdown;
mod state;

use clap::Parser;
use config::{ConfigLoader, Overrides};
use payapp_core::dedup::MemoryDedupStore;
use payapp_core::logs::{TracingLogWriter, log_handlers};
use payapp_core::processors::FeedbackProcessor;
use server::{build_router, run_server};
use shutdown::spawn_dedup_clear_task;
use state::AppState;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// PayApp feedback server - receives and records payment callbacks
#[derive(Parser, Debug)]
#[command(name = "payapp-server")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the configuration file
    #[arg(short, long, default_value = "./payapp-config.toml")]
    config: PathBuf,

    /// Override the listen address (e.g., 0.0.0.0:3000)
    #[arg(short, long)]
    listen: Option<SocketAddr>,

    /// Merchant user id
    #[arg(long, env = "PAYAPP_USERID")]
    userid: Option<String>,

    /// Link key used to authenticate callbacks
    #[arg(long, env = "PAYAPP_LINKKEY", hide_env_values = true)]
    linkkey: Option<String>,

    /// Link value used to authenticate callbacks
    #[arg(long, env = "PAYAPP_LINKVAL", hide_env_values = true)]
    linkval: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    init_tracing();

    // Parse command line arguments
    let args = Args::parse();

    tracing::info!("Starting payapp-server v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let config_loader = ConfigLoader::new(
        &args.config,
        Overrides {
            listen: args.listen,
            userid: args.userid,
            linkkey: args.linkkey,
            linkval: args.linkval,
        },
    );
    let loaded_config = config_loader.load().map_err(|e| {
        tracing::error!("Failed to load configuration: {}", e);
        e
    })?;
    tracing::info!(
        userid = loaded_config.credentials.userid(),
        webhook_path = %loaded_config.webhook_path,
        "Configuration loaded from {:?}",
        args.config
    );

    // Create the feedback processor
    let store = MemoryDedupStore::new();
    let processor = FeedbackProcessor::new(loaded_config.credentials, store.clone())
        .with_handlers(log_handlers(Arc::new(TracingLogWriter)));
    let state = AppState::new(processor);

    // Spawn periodic dedup clearing
    let clear_notify = loaded_config.dedup_clear_interval.map(|interval| {
        tracing::info!(interval_secs = interval.as_secs(), "Dedup store clearing enabled");
        spawn_dedup_clear_task(store, interval)
    });

    // Build the router
    let router = build_router(state, &loaded_config.webhook_path);

    // Run the server
    tracing::info!("Starting HTTP server on {}", loaded_config.listen);
    let result = run_server(router, loaded_config.listen).await;

    // Stop background tasks
    if let Some(notify) = clear_notify {
        notify.notify_one();
    }
    tracing::info!("Server shutdown complete");

    result.map_err(Into::into)
}

/// Initialize the tracing subscriber with environment-based filtering.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}
