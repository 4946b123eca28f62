//! # Object Storage
//!
//! The collaborator the filesystem facade delegates leaf-object queries to.
//!
//! | Implementation | Backing store |
//! |----------------|---------------|
//! | [`ObjectStoreBackend`] | Any [`object_store::ObjectStore`] (Azure Blob, local directory, in-memory) |
//! | [`MemoryStorage`] | In-process map, for tests and local development |
//!
//! Implementations are responsible for their own timeouts and retries; the
//! facade issues each query once and reports what comes back.

mod cloud;
mod memory;

pub use cloud::ObjectStoreBackend;
pub use memory::MemoryStorage;

use std::sync::Arc;

use async_trait::async_trait;

use crate::{ByteRange, Download, ObjectMetadata, StorageError, StorageKey};

/// Queries against a flat, key-addressed object store.
///
/// # Thread Safety
///
/// All implementations must be `Send + Sync`. Methods take `&self` so one
/// client can serve concurrent requests.
///
/// # Object Safety
///
/// This trait is object-safe and can be used as `dyn ObjectStorage`.
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Check whether an object is stored under `key`.
    ///
    /// A missing object is `Ok(false)`, not an error.
    ///
    /// # Errors
    ///
    /// - [`StorageError::Backend`] on transport or service failure
    async fn key_exists(&self, key: &StorageKey) -> Result<bool, StorageError>;

    /// Fetch the metadata of the object stored under `key`.
    ///
    /// # Errors
    ///
    /// - [`StorageError::NotFound`] if no object is stored under `key`
    /// - [`StorageError::Backend`] on transport or service failure
    async fn metadata(&self, key: &StorageKey) -> Result<ObjectMetadata, StorageError>;

    /// Download `range` of the object stored under `key`.
    ///
    /// # Errors
    ///
    /// - [`StorageError::NotFound`] if no object is stored under `key`
    /// - [`StorageError::InvalidRange`] if the range starts past the end
    /// - [`StorageError::Backend`] on transport or service failure
    async fn download_range(
        &self,
        key: &StorageKey,
        range: ByteRange,
    ) -> Result<Download, StorageError>;
}

/// Range rule shared by every backend.
///
/// A range starting at or past the end of a non-empty object is rejected.
/// Anything else is satisfiable and gets truncated to the object, so a
/// zero-length range or any range over an empty object reads no bytes.
pub(crate) fn check_range(key: &StorageKey, range: ByteRange, len: u64) -> Result<(), StorageError> {
    if range.offset > 0 && range.offset >= len {
        return Err(StorageError::InvalidRange {
            key: key.to_string(),
            details: format!("{range} starts past length {len}"),
        });
    }
    Ok(())
}

#[async_trait]
impl<S: ObjectStorage + ?Sized> ObjectStorage for Arc<S> {
    async fn key_exists(&self, key: &StorageKey) -> Result<bool, StorageError> {
        (**self).key_exists(key).await
    }

    async fn metadata(&self, key: &StorageKey) -> Result<ObjectMetadata, StorageError> {
        (**self).metadata(key).await
    }

    async fn download_range(
        &self,
        key: &StorageKey,
        range: ByteRange,
    ) -> Result<Download, StorageError> {
        (**self).download_range(key, range).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_rule() {
        let key = StorageKey::new("a");
        assert!(check_range(&key, ByteRange::FULL, 0).is_ok());
        assert!(check_range(&key, ByteRange::new(0, 5), 0).is_ok());
        assert!(check_range(&key, ByteRange::new(1, 0), 5).is_ok());
        assert!(check_range(&key, ByteRange::new(4, 20), 5).is_ok());
        assert!(matches!(
            check_range(&key, ByteRange::new(5, 1), 5),
            Err(StorageError::InvalidRange { .. })
        ));
        assert!(matches!(
            check_range(&key, ByteRange::new(1, 0), 0),
            Err(StorageError::InvalidRange { .. })
        ));
    }

    #[test]
    fn object_storage_is_object_safe() {
        fn _check(_: &dyn ObjectStorage) {}
    }

    #[test]
    fn object_storage_requires_send_sync() {
        fn _assert_send_sync<T: Send + Sync>() {}
        fn _check<T: ObjectStorage>() {
            _assert_send_sync::<T>();
        }
    }

    #[test]
    fn arc_of_storage_is_storage() {
        fn _check<T: ObjectStorage>() {}
        _check::<Arc<MemoryStorage>>();
        _check::<Arc<dyn ObjectStorage>>();
    }
}
