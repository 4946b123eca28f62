//! Wrapping a backend with the tracing layer.
//!
//! Every query is logged at `info`, failures at `warn`. Set `RUST_LOG` to
//! adjust the filter.
//!
//! Run with: `cargo run --example layer_middleware`

use blobfs::*;
use std::path::Path;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), FsError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let storage = MemoryStorage::new();
    storage.insert("a.sci", "abc");

    let fs: Arc<dyn Fs> = Arc::new(
        ObjectFs::new(PathMapper::new("/models"), storage).layer(TracingLayer::new()),
    );

    fs.exists(Path::new("/models/a.sci")).await?;
    fs.size(Path::new("/models/a.sci")).await?;
    // Logged as a warning.
    let _ = fs.size(Path::new("/models/missing.sci")).await;

    Ok(())
}
