//! [`ObjectStorage`] over the `object_store` crate.
//!
//! One adapter covers every store `object_store` speaks to. Constructors are
//! provided for the stores blobfs is deployed against: Azure Blob Storage
//! (behind the `azure` feature), a local directory, and memory.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use futures::{StreamExt, TryStreamExt, stream};
use object_store::local::LocalFileSystem;
use object_store::memory::InMemory;
use object_store::path::Path as ObjectPath;
use object_store::{Attribute, GetOptions, GetRange, ObjectStore};

use super::{ObjectStorage, check_range};
use crate::{ByteRange, Download, ObjectMetadata, StorageError, StorageKey, DEFAULT_CONTENT_TYPE};

/// Adapter from any [`ObjectStore`] to [`ObjectStorage`].
#[derive(Clone)]
pub struct ObjectStoreBackend {
    store: Arc<dyn ObjectStore>,
}

impl ObjectStoreBackend {
    /// Wrap an existing store.
    pub fn new(store: Arc<dyn ObjectStore>) -> Self {
        Self { store }
    }

    /// Azure Blob Storage container.
    ///
    /// Remaining settings (credentials, endpoints) are read from the
    /// `AZURE_*` environment variables; with no explicit credentials the
    /// store falls back to managed identity.
    #[cfg(feature = "azure")]
    pub fn azure(account: &str, container: &str) -> Result<Self, StorageError> {
        let store = object_store::azure::MicrosoftAzureBuilder::from_env()
            .with_account(account)
            .with_container_name(container)
            .build()?;
        Ok(Self::new(Arc::new(store)))
    }

    /// Objects stored as files under `dir`.
    pub fn local(dir: impl AsRef<Path>) -> Result<Self, StorageError> {
        let store = LocalFileSystem::new_with_prefix(dir)?;
        Ok(Self::new(Arc::new(store)))
    }

    /// Empty in-memory store.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemory::new()))
    }

    /// The wrapped store.
    pub fn inner(&self) -> &Arc<dyn ObjectStore> {
        &self.store
    }
}

impl fmt::Debug for ObjectStoreBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectStoreBackend")
            .field("store", &self.store.to_string())
            .finish()
    }
}

fn location(key: &StorageKey) -> ObjectPath {
    ObjectPath::from(key.as_str())
}

fn get_range(key: &StorageKey, range: ByteRange) -> Result<GetRange, StorageError> {
    let to_usize = |value: u64| {
        usize::try_from(value).map_err(|_| StorageError::InvalidRange {
            key: key.to_string(),
            details: format!("{range} exceeds addressable size"),
        })
    };
    let offset = to_usize(range.offset)?;
    match range.end() {
        Some(end) => Ok(GetRange::Bounded(offset..to_usize(end)?)),
        None => Ok(GetRange::Offset(offset)),
    }
}

fn empty_download() -> Download {
    Download {
        content_type: DEFAULT_CONTENT_TYPE.to_string(),
        body: stream::empty().boxed(),
    }
}

impl ObjectStoreBackend {
    /// Object length from a `head` request.
    async fn object_len(&self, key: &StorageKey) -> Result<u64, StorageError> {
        Ok(self.store.head(&location(key)).await?.size as u64)
    }

    /// Classify a failed ranged GET.
    ///
    /// Stores report unsatisfiable ranges as generic errors. The range is
    /// checked against the object length: a start past the end is
    /// `InvalidRange`, and a range over an empty object reads nothing.
    async fn range_failure(
        &self,
        key: &StorageKey,
        range: ByteRange,
        error: object_store::Error,
    ) -> Result<Download, StorageError> {
        if matches!(error, object_store::Error::NotFound { .. }) {
            return Err(error.into());
        }
        match self.object_len(key).await {
            Ok(len) => {
                check_range(key, range, len)?;
                if len == 0 {
                    return Ok(empty_download());
                }
                Err(error.into())
            }
            Err(_) => Err(error.into()),
        }
    }
}

#[async_trait]
impl ObjectStorage for ObjectStoreBackend {
    async fn key_exists(&self, key: &StorageKey) -> Result<bool, StorageError> {
        match self.store.head(&location(key)).await {
            Ok(_) => Ok(true),
            Err(object_store::Error::NotFound { .. }) => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    async fn metadata(&self, key: &StorageKey) -> Result<ObjectMetadata, StorageError> {
        let meta = self.store.head(&location(key)).await?;
        Ok(ObjectMetadata {
            content_length: Some(meta.size as u64),
            content_type: None,
        })
    }

    async fn download_range(
        &self,
        key: &StorageKey,
        range: ByteRange,
    ) -> Result<Download, StorageError> {
        // Stores reject empty ranges; only existence and offset need checking.
        if range.len == Some(0) {
            check_range(key, range, self.object_len(key).await?)?;
            return Ok(empty_download());
        }
        // An unbounded read from zero is a plain GET; some stores reject
        // `Offset(0)` on empty objects.
        let options = GetOptions {
            range: if range == ByteRange::FULL {
                None
            } else {
                Some(get_range(key, range)?)
            },
            ..GetOptions::default()
        };
        let result = match self.store.get_opts(&location(key), options).await {
            Ok(result) => result,
            Err(e) => return self.range_failure(key, range, e).await,
        };
        let content_type = result
            .attributes
            .get(&Attribute::ContentType)
            .map(|value| AsRef::<str>::as_ref(value).to_string())
            .unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_string());
        let body = result.into_stream().map_err(StorageError::from).boxed();
        Ok(Download { content_type, body })
    }
}
