//! `blobfs-server`: HTTP filesystem queries over an object store.

use std::sync::Arc;

use anyhow::{Context, Result};
use blobfs::config::Config;
use blobfs::{Fs, LayerExt, ObjectFs, TracingLayer};
use clap::Parser;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::parse();
    config.validate().context("Invalid configuration")?;

    let storage = config
        .build_storage()
        .context("Failed to create storage client")?;
    let mapper = config.path_mapper();
    tracing::info!(
        backend = config.backend.as_str(),
        root = %mapper.root().display(),
        pseudo_dirs = ?mapper.pseudo_dirs(),
        "storage ready"
    );

    let fs: Arc<dyn Fs> = Arc::new(ObjectFs::new(mapper, storage).layer(TracingLayer::new()));
    let app = blobfs::http::router(fs);

    let addr = config.listen_addr();
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!(%addr, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}
