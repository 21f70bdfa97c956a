//! Sauti Gateway - HTTP API brokering media generation to a peer network

use std::sync::Arc;
use std::time::Duration;

use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod accounts;
mod api;
mod directory;
mod error;
mod processor;
mod state;
mod token;

use accounts::MemoryAccountStore;
use directory::{spawn_directory_refresh, HttpDirectorySource};
use processor::HttpMediaProcessor;
use sauti_core::{Denylist, DispatchCoordinator, GatewayConfig, PeerDirectory, PeerSelector};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sauti_server=debug,sauti_core=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Sauti gateway");

    // Load configuration; refuse to start without the signing secret.
    let config = GatewayConfig::from_env()?;
    info!("Artifacts directory: {:?}", config.artifacts_dir);

    // Denylists are loaded exactly once and never mutated afterwards.
    let denylist = match &config.denylist_path {
        Some(path) => {
            let denylist = Denylist::from_file(path)?;
            info!("Loaded {} denylisted identit(ies)", denylist.len());
            denylist
        }
        None => Denylist::default(),
    };

    let accounts = Arc::new(MemoryAccountStore::new());
    if let Some(path) = &config.accounts_path {
        accounts.seed_from_file(path).await?;
    }
    if let (Ok(username), Ok(password)) = (
        std::env::var("SAUTI_ADMIN_USERNAME"),
        std::env::var("SAUTI_ADMIN_PASSWORD"),
    ) {
        accounts.insert_admin(&username, &password).await;
        info!("Seeded administrative account '{}'", username);
    }

    // Peer directory plus its background refresh.
    let peer_directory = PeerDirectory::new();
    match &config.directory_url {
        Some(url) => {
            let source = Arc::new(HttpDirectorySource::new(url.clone())?);
            spawn_directory_refresh(
                peer_directory.clone(),
                source,
                Duration::from_secs(config.directory_refresh_secs),
            );
            info!("Peer directory refresh from {} every {}s", url, config.directory_refresh_secs);
        }
        None => warn!("SAUTI_DIRECTORY_URL not set; peer pool stays empty until published"),
    }

    let dispatch_timeout = Duration::from_secs(config.dispatch_timeout_secs);
    let processor = Arc::new(HttpMediaProcessor::new(
        config.artifacts_dir.clone(),
        dispatch_timeout,
    )?);
    let coordinator = DispatchCoordinator::new(processor.clone(), dispatch_timeout);
    let selector = PeerSelector::new(denylist);

    let state = AppState::new(
        config.clone(),
        accounts,
        peer_directory,
        selector,
        coordinator,
        processor,
    );

    // Build router
    let app = api::create_router(state);

    // Start server
    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Gateway listening on http://{}", addr);

    let server = axum::serve(listener, app).with_graceful_shutdown(shutdown_signal());

    info!("Gateway ready. Press Ctrl+C to stop.");
    server.await?;

    Ok(())
}

/// Wait for a shutdown signal.
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
            info!("Received Ctrl+C, shutting down...");
        },
        _ = terminate => {
            info!("Received SIGTERM, shutting down...");
        },
    }
}
