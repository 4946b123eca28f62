//! # Layer Trait
//!
//! Tower-style middleware composition for filesystem backends.
//!
//! ## Overview
//!
//! The [`Layer`] trait wraps a backend to add behaviour around every query
//! without touching the backend itself.
//!
//! ```text
//! Backend ──▶ Layer::layer() ──▶ Wrapped Backend
//! ```
//!
//! Each middleware provides:
//! 1. A wrapper struct that implements the filesystem traits
//! 2. A `Layer` implementation that creates the wrapper
//!
//! ## Provided Middleware
//!
//! | Layer | Wrapper | Adds |
//! |-------|---------|------|
//! | [`TracingLayer`] | [`Traced`] | one `tracing` event per query, warnings on failure |
//!
//! ## Fluent Composition
//!
//! ```rust
//! use blobfs::{LayerExt, MemoryStorage, ObjectFs, PathMapper, TracingLayer};
//!
//! let fs = ObjectFs::new(PathMapper::new("/models"), MemoryStorage::new())
//!     .layer(TracingLayer::new());
//! ```

use std::fmt;
use std::path::Path;

use async_trait::async_trait;

use crate::{ByteRange, Download, Fs, FsDir, FsError, FsLink, FsRead};

/// A layer that wraps a backend to add functionality.
///
/// Inspired by Tower's `Layer` trait.
///
/// # Type Parameters
///
/// - `B`: The backend type being wrapped (must implement [`Fs`])
pub trait Layer<B> {
    /// The resulting backend type after applying this layer.
    type Backend;

    /// Wrap the given backend with this layer's functionality.
    fn layer(self, backend: B) -> Self::Backend;
}

/// Extension trait for fluent layer composition.
///
/// Provides the `.layer()` method on any [`Fs`] backend.
pub trait LayerExt: Fs + Sized {
    /// Apply a layer to this backend.
    fn layer<L: Layer<Self>>(self, layer: L) -> L::Backend {
        layer.layer(self)
    }
}

// Blanket implementation - any Fs backend gets LayerExt for free
impl<B: Fs> LayerExt for B {}

/// Layer that logs every query through `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLayer {
    _priv: (),
}

impl TracingLayer {
    /// Create the layer.
    pub fn new() -> Self {
        Self::default()
    }
}

impl<B: Fs> Layer<B> for TracingLayer {
    type Backend = Traced<B>;

    fn layer(self, backend: B) -> Self::Backend {
        Traced { inner: backend }
    }
}

/// Backend wrapper produced by [`TracingLayer`].
///
/// Emits an `info` event naming the operation and client path before
/// delegating, and a `warn` event when the inner backend fails. Results pass
/// through unchanged.
pub struct Traced<B> {
    inner: B,
}

impl<B> Traced<B> {
    /// The wrapped backend.
    pub fn inner(&self) -> &B {
        &self.inner
    }

    /// Unwrap, returning the inner backend.
    pub fn into_inner(self) -> B {
        self.inner
    }
}

impl<B: fmt::Debug> fmt::Debug for Traced<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Traced").field(&self.inner).finish()
    }
}

fn observe<T>(operation: &'static str, path: &Path, result: Result<T, FsError>) -> Result<T, FsError> {
    if let Err(e) = &result {
        tracing::warn!(operation, path = %path.display(), error = %e, "query failed");
    }
    result
}

#[async_trait]
impl<B: FsRead> FsRead for Traced<B> {
    async fn read(&self, path: &Path, range: ByteRange) -> Result<Download, FsError> {
        tracing::info!(path = %path.display(), offset = range.offset, len = ?range.len, "read");
        observe("read", path, self.inner.read(path, range).await)
    }

    async fn exists(&self, path: &Path) -> Result<bool, FsError> {
        tracing::info!(path = %path.display(), "exists");
        observe("exists", path, self.inner.exists(path).await)
    }

    async fn size(&self, path: &Path) -> Result<u64, FsError> {
        tracing::info!(path = %path.display(), "size");
        observe("size", path, self.inner.size(path).await)
    }

    async fn is_regular_file(&self, path: &Path) -> Result<bool, FsError> {
        tracing::info!(path = %path.display(), "is_regular_file");
        observe("is_regular_file", path, self.inner.is_regular_file(path).await)
    }

    async fn is_empty(&self, path: &Path) -> Result<bool, FsError> {
        tracing::info!(path = %path.display(), "is_empty");
        observe("is_empty", path, self.inner.is_empty(path).await)
    }
}

#[async_trait]
impl<B: FsDir> FsDir for Traced<B> {
    async fn is_dir(&self, path: &Path) -> Result<bool, FsError> {
        tracing::info!(path = %path.display(), "is_dir");
        observe("is_dir", path, self.inner.is_dir(path).await)
    }

    async fn get_children(&self, path: &Path) -> Result<Vec<String>, FsError> {
        tracing::info!(path = %path.display(), "get_children");
        observe("get_children", path, self.inner.get_children(path).await)
    }
}

#[async_trait]
impl<B: FsLink> FsLink for Traced<B> {
    async fn is_symlink(&self, path: &Path) -> Result<bool, FsError> {
        tracing::info!(path = %path.display(), "is_symlink");
        observe("is_symlink", path, self.inner.is_symlink(path).await)
    }
}
