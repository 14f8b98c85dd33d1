use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use coursegate_app::app::router;
use coursegate_app::server::serve;
use coursegate_app::session_store::spawn_session_cleanup;
use coursegate_core::config::load_config;
use coursegate_service::allow_list::AllowList;
use salvo::session::MemoryStore;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, reload, util::SubscriberInitExt};

/// Course materials portal backend.
#[derive(Parser, Debug)]
#[command(name = "coursegate")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Port to listen on; the TLS port (443) switches to HTTPS with a port 80 redirect
    #[arg(short, long)]
    port: Option<u16>,

    /// Extra configuration file, layered over config.toml
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let (filter_layer, filter_handle) = reload::Layer::new(EnvFilter::new("debug"));

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(
            fmt::layer()
                .with_target(true)
                .with_thread_ids(true)
                .with_file(true)
                .with_line_number(true),
        )
        .init();

    let cli = Cli::parse();

    tracing::info!("Starting coursegate");

    let mut config = load_config(cli.config.as_deref())?;
    if let Some(port) = cli.port {
        config.server.port = port;
    }

    tracing::info!(config = ?config, "Configuration loaded");

    if let Ok(filter) = EnvFilter::try_new(config.logging.level.as_str()) {
        if let Err(e) = filter_handle.modify(|current| *current = filter) {
            tracing::warn!(error = %e, "Failed to update log filter from config");
        }
    } else {
        tracing::warn!(level = %config.logging.level, "Invalid log level in config, keeping debug");
    }

    let allow_list = Arc::new(AllowList::load(config.auth.allow_list_path.clone()).await);

    let settings = Arc::new(config);
    let sessions = MemoryStore::new();
    let _cleanup = spawn_session_cleanup(sessions.clone(), settings.auth.session_cleanup_interval());
    let router = router(Arc::clone(&settings), allow_list, sessions)?;

    serve(&settings, router).await
}
