//! Read and introspection operations over stored objects.

use std::path::Path;

use async_trait::async_trait;

use crate::{ByteRange, Download, FsError};

/// Read operations for a filesystem view over an object store.
///
/// All methods take `&self` and are `async`: answering usually means waiting
/// on the store, and one backend serves many requests at once.
///
/// # Thread Safety
///
/// All implementations must be `Send + Sync`.
///
/// # Object Safety
///
/// This trait is object-safe and can be used as `dyn FsRead`.
#[async_trait]
pub trait FsRead: Send + Sync {
    /// Read a range of bytes from a file.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the file
    /// * `range` - Bytes to read; an open range reads to the end
    ///
    /// # Errors
    ///
    /// - [`FsError::NotFound`] if the path does not exist or is outside the root
    /// - [`FsError::NotAFile`] if the path is a directory
    /// - [`FsError::InvalidRange`] if the store rejects the range
    /// - [`FsError::Storage`] on backend failure
    async fn read(&self, path: &Path, range: ByteRange) -> Result<Download, FsError>;

    /// Check if a path exists.
    ///
    /// Returns `Ok(true)` if the path exists, `Ok(false)` if it does not.
    /// Only returns an error for unexpected backend failures.
    async fn exists(&self, path: &Path) -> Result<bool, FsError>;

    /// Size of a file in bytes.
    ///
    /// # Errors
    ///
    /// - [`FsError::NotFound`] if the path does not exist or is outside the root
    /// - [`FsError::NotAFile`] if the path is a directory
    /// - [`FsError::SizeUnavailable`] if the store reports no length
    /// - [`FsError::Storage`] on backend failure
    async fn size(&self, path: &Path) -> Result<u64, FsError>;

    /// Check if a path is a regular file (exists and is not a directory).
    ///
    /// A missing path is `Ok(false)`, not an error.
    async fn is_regular_file(&self, path: &Path) -> Result<bool, FsError>;

    /// Check if a path is empty.
    ///
    /// Directories are never empty. A file is empty when its size is zero or
    /// unknown.
    ///
    /// # Errors
    ///
    /// - [`FsError::NotFound`] if the path does not exist or is outside the root
    /// - [`FsError::Storage`] on backend failure
    async fn is_empty(&self, path: &Path) -> Result<bool, FsError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fs_read_is_object_safe() {
        // This test verifies that FsRead can be used as a trait object
        fn _check(_: &dyn FsRead) {}
    }

    #[test]
    fn fs_read_requires_send_sync() {
        fn _assert_send_sync<T: Send + Sync>() {}
        fn _check<T: FsRead>() {
            _assert_send_sync::<T>();
        }
    }
}
