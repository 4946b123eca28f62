//! Symlink queries.

use std::path::Path;

use async_trait::async_trait;

use crate::FsError;

/// Symlink queries.
///
/// # Object Safety
///
/// This trait is object-safe and can be used as `dyn FsLink`.
#[async_trait]
pub trait FsLink: Send + Sync {
    /// Check if a path is a symbolic link.
    ///
    /// Returns `Ok(false)` if the path doesn't exist (not an error).
    async fn is_symlink(&self, path: &Path) -> Result<bool, FsError>;
}
