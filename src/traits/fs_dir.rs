//! Directory operations.

use std::path::Path;

use async_trait::async_trait;

use crate::FsError;

/// Directory operations for a filesystem view over an object store.
///
/// Object stores have no directories of their own, so implementations decide
/// directory-ness from configuration rather than from storage.
///
/// # Thread Safety
///
/// All implementations must be `Send + Sync`.
///
/// # Object Safety
///
/// This trait is object-safe and can be used as `dyn FsDir`.
#[async_trait]
pub trait FsDir: Send + Sync {
    /// Check if a path is a directory.
    ///
    /// Returns `Ok(false)` for paths that do not exist.
    async fn is_dir(&self, path: &Path) -> Result<bool, FsError>;

    /// List the names of a directory's children.
    ///
    /// # Errors
    ///
    /// - [`FsError::NotSupported`] if the backend cannot enumerate directories
    async fn get_children(&self, path: &Path) -> Result<Vec<String>, FsError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fs_dir_is_object_safe() {
        fn _check(_: &dyn FsDir) {}
    }

    #[test]
    fn fs_dir_requires_send_sync() {
        fn _assert_send_sync<T: Send + Sync>() {}
        fn _check<T: FsDir>() {
            _assert_send_sync::<T>();
        }
    }
}
