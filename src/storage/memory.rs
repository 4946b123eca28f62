//! In-process object storage.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;
use bytes::Bytes;
use futures::{future, stream, StreamExt};

use super::{ObjectStorage, check_range};
use crate::{ByteRange, Download, ObjectMetadata, StorageError, StorageKey, DEFAULT_CONTENT_TYPE};

#[derive(Debug, Clone)]
struct StoredObject {
    data: Bytes,
    content_type: Option<String>,
}

/// Object storage held in memory.
///
/// Range reads follow blob-storage rules: a range starting at or past the end
/// of a non-empty object is rejected, and a range running past the end is
/// truncated to the object.
///
/// # Example
///
/// ```rust
/// use blobfs::MemoryStorage;
///
/// let storage = MemoryStorage::new();
/// storage.insert("sub/file.txt", "hello");
/// assert_eq!(storage.len(), 1);
/// ```
#[derive(Debug, Default)]
pub struct MemoryStorage {
    objects: RwLock<HashMap<String, StoredObject>>,
}

impl MemoryStorage {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `data` under `key`, replacing any previous object.
    pub fn insert(&self, key: impl Into<String>, data: impl Into<Bytes>) {
        self.put(key.into(), data.into(), None);
    }

    /// Store `data` under `key` with an explicit content type.
    pub fn insert_with_content_type(
        &self,
        key: impl Into<String>,
        data: impl Into<Bytes>,
        content_type: impl Into<String>,
    ) {
        self.put(key.into(), data.into(), Some(content_type.into()));
    }

    /// Number of stored objects.
    pub fn len(&self) -> usize {
        self.objects
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Returns `true` if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn put(&self, key: String, data: Bytes, content_type: Option<String>) {
        self.objects
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key, StoredObject { data, content_type });
    }

    fn get(&self, key: &StorageKey) -> Result<StoredObject, StorageError> {
        self.objects
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key.as_str())
            .cloned()
            .ok_or_else(|| StorageError::NotFound {
                key: key.to_string(),
            })
    }
}

#[async_trait]
impl ObjectStorage for MemoryStorage {
    async fn key_exists(&self, key: &StorageKey) -> Result<bool, StorageError> {
        Ok(self
            .objects
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(key.as_str()))
    }

    async fn metadata(&self, key: &StorageKey) -> Result<ObjectMetadata, StorageError> {
        let object = self.get(key)?;
        Ok(ObjectMetadata {
            content_length: Some(object.data.len() as u64),
            content_type: object.content_type,
        })
    }

    async fn download_range(
        &self,
        key: &StorageKey,
        range: ByteRange,
    ) -> Result<Download, StorageError> {
        let object = self.get(key)?;
        let len = object.data.len() as u64;
        check_range(key, range, len)?;
        let end = range.end().map_or(len, |end| end.min(len));
        let chunk = object.data.slice(range.offset as usize..end as usize);
        Ok(Download {
            content_type: object
                .content_type
                .unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_string()),
            body: stream::once(future::ready(Ok(chunk))).boxed(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::TryStreamExt;

    async fn collect(download: Download) -> Vec<u8> {
        let chunks: Vec<Bytes> = download.body.try_collect().await.unwrap();
        chunks.concat()
    }

    #[tokio::test]
    async fn key_exists_reflects_inserts() {
        let storage = MemoryStorage::new();
        assert!(storage.is_empty());
        assert!(!storage.key_exists(&StorageKey::new("a")).await.unwrap());
        storage.insert("a", "data");
        assert!(storage.key_exists(&StorageKey::new("a")).await.unwrap());
    }

    #[tokio::test]
    async fn metadata_reports_length_and_type() {
        let storage = MemoryStorage::new();
        storage.insert_with_content_type("a.json", "{}", "application/json");
        let meta = storage.metadata(&StorageKey::new("a.json")).await.unwrap();
        assert_eq!(meta.content_length, Some(2));
        assert_eq!(meta.content_type.as_deref(), Some("application/json"));
    }

    #[tokio::test]
    async fn metadata_missing_is_not_found() {
        let storage = MemoryStorage::new();
        let err = storage.metadata(&StorageKey::new("nope")).await.unwrap_err();
        assert!(matches!(err, StorageError::NotFound { ref key } if key == "nope"));
    }

    #[tokio::test]
    async fn download_full_object() {
        let storage = MemoryStorage::new();
        storage.insert("a", "hello world");
        let download = storage
            .download_range(&StorageKey::new("a"), ByteRange::FULL)
            .await
            .unwrap();
        assert_eq!(download.content_type, DEFAULT_CONTENT_TYPE);
        assert_eq!(collect(download).await, b"hello world");
    }

    #[tokio::test]
    async fn download_bounded_range() {
        let storage = MemoryStorage::new();
        storage.insert("a", "hello world");
        let download = storage
            .download_range(&StorageKey::new("a"), ByteRange::new(6, 5))
            .await
            .unwrap();
        assert_eq!(collect(download).await, b"world");
    }

    #[tokio::test]
    async fn download_truncates_range_past_end() {
        let storage = MemoryStorage::new();
        storage.insert("a", "hello");
        let download = storage
            .download_range(&StorageKey::new("a"), ByteRange::new(3, 100))
            .await
            .unwrap();
        assert_eq!(collect(download).await, b"lo");
    }

    #[tokio::test]
    async fn download_offset_past_end_is_invalid_range() {
        let storage = MemoryStorage::new();
        storage.insert("a", "12345");
        let err = storage
            .download_range(&StorageKey::new("a"), ByteRange::new(10, 20))
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::InvalidRange { .. }));
    }

    #[tokio::test]
    async fn download_empty_object_from_start() {
        let storage = MemoryStorage::new();
        storage.insert("empty", Bytes::new());
        let download = storage
            .download_range(&StorageKey::new("empty"), ByteRange::FULL)
            .await
            .unwrap();
        assert!(collect(download).await.is_empty());
    }

    #[tokio::test]
    async fn download_zero_length_and_empty_object_read_nothing() {
        let storage = MemoryStorage::new();
        storage.insert("a", "12345");
        storage.insert("empty", Bytes::new());
        for (key, range) in [("a", ByteRange::new(1, 0)), ("empty", ByteRange::new(0, 5))] {
            let download = storage
                .download_range(&StorageKey::new(key), range)
                .await
                .unwrap();
            assert!(collect(download).await.is_empty(), "{key} {range}");
        }
    }

    #[tokio::test]
    async fn download_missing_is_not_found() {
        let storage = MemoryStorage::new();
        let err = storage
            .download_range(&StorageKey::new("missing"), ByteRange::FULL)
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::NotFound { .. }));
    }
}
