//! # ObjectFs
//!
//! Filesystem facade over an [`ObjectStorage`] client.
//!
//! ## Responsibility
//! - Resolve every client path through the [`PathMapper`]
//! - Answer directory questions from the mapper alone
//! - Issue at most one storage query per operation for everything else
//!
//! ## Operation Summary
//!
//! | Operation | Directory | Outside root | Otherwise |
//! |-----------|-----------|--------------|-----------|
//! | `read` | `NotAFile` | `NotFound` | `download_range` |
//! | `exists` | `true` | `false` | `key_exists` |
//! | `size` | `NotAFile` | `NotFound` | `metadata` |
//! | `is_dir` | `true` | `false` | `false` |
//! | `is_regular_file` | `false` | `false` | `key_exists` |
//! | `is_symlink` | `false` | `false` | `false` |
//! | `is_empty` | `false` | `NotFound` | `metadata` |
//! | `get_children` | `NotSupported` | `NotSupported` | `NotSupported` |

use std::path::Path;

use async_trait::async_trait;

use crate::{
    ByteRange, Download, FsDir, FsError, FsLink, FsRead, ObjectStorage, PathMapper, StorageKey,
};

/// Read-only filesystem view of an object store.
///
/// Owns the path mapper and the storage client; construct it once at startup
/// and share it behind an `Arc`.
///
/// # Example
///
/// ```rust
/// use blobfs::{FsDir, FsRead, MemoryStorage, ObjectFs, PathMapper};
/// use std::path::Path;
///
/// # futures::executor::block_on(async {
/// let storage = MemoryStorage::new();
/// storage.insert("bncdata.sci", "payload");
///
/// let fs = ObjectFs::new(PathMapper::new("/models").with_pseudo_dirs(["bnc"]), storage);
///
/// assert!(fs.is_dir(Path::new("/models/bnc")).await?);
/// assert!(fs.exists(Path::new("/models/bnc/data.sci")).await?);
/// assert_eq!(fs.size(Path::new("/models/bnc/data.sci")).await?, 7);
/// # Ok::<(), blobfs::FsError>(())
/// # }).unwrap();
/// ```
#[derive(Debug)]
pub struct ObjectFs<S> {
    mapper: PathMapper,
    storage: S,
}

/// Where a client path lands.
enum Target {
    /// Root or pseudo-directory; no backing object.
    Directory,
    /// Outside the root.
    OutOfScope,
    /// A leaf object under this key.
    Object(StorageKey),
}

impl<S: ObjectStorage> ObjectFs<S> {
    /// Create a facade from a mapper and a storage client.
    pub fn new(mapper: PathMapper, storage: S) -> Self {
        Self { mapper, storage }
    }

    /// The path mapper.
    pub fn mapper(&self) -> &PathMapper {
        &self.mapper
    }

    /// The storage client.
    pub fn storage(&self) -> &S {
        &self.storage
    }

    fn target(&self, path: &Path) -> Target {
        if self.mapper.is_dir(path) {
            return Target::Directory;
        }
        match self.mapper.convert(path) {
            Some(key) => Target::Object(key),
            None => Target::OutOfScope,
        }
    }

    /// Key of the file at `path`, for operations that need a file.
    fn file_key(&self, path: &Path) -> Result<StorageKey, FsError> {
        match self.target(path) {
            Target::Object(key) => Ok(key),
            Target::Directory => Err(FsError::NotAFile {
                path: path.to_path_buf(),
            }),
            Target::OutOfScope => Err(FsError::NotFound {
                path: path.to_path_buf(),
            }),
        }
    }

    async fn object_exists(&self, path: &Path, key: &StorageKey) -> Result<bool, FsError> {
        match self.storage.key_exists(key).await {
            Ok(exists) => Ok(exists),
            Err(e) => match FsError::from_storage("exists", path, e) {
                FsError::NotFound { .. } => Ok(false),
                e => Err(e),
            },
        }
    }

    async fn content_length(
        &self,
        operation: &'static str,
        path: &Path,
        key: &StorageKey,
    ) -> Result<Option<u64>, FsError> {
        let metadata = self
            .storage
            .metadata(key)
            .await
            .map_err(|e| FsError::from_storage(operation, path, e))?;
        Ok(metadata.content_length)
    }
}

#[async_trait]
impl<S: ObjectStorage> FsRead for ObjectFs<S> {
    async fn read(&self, path: &Path, range: ByteRange) -> Result<Download, FsError> {
        let key = self.file_key(path)?;
        self.storage
            .download_range(&key, range)
            .await
            .map_err(|e| FsError::from_storage("read", path, e))
    }

    async fn exists(&self, path: &Path) -> Result<bool, FsError> {
        match self.target(path) {
            Target::Directory => Ok(true),
            Target::OutOfScope => Ok(false),
            Target::Object(key) => self.object_exists(path, &key).await,
        }
    }

    async fn size(&self, path: &Path) -> Result<u64, FsError> {
        let key = self.file_key(path)?;
        self.content_length("size", path, &key)
            .await?
            .ok_or_else(|| FsError::SizeUnavailable {
                path: path.to_path_buf(),
            })
    }

    async fn is_regular_file(&self, path: &Path) -> Result<bool, FsError> {
        match self.target(path) {
            Target::Directory | Target::OutOfScope => Ok(false),
            Target::Object(key) => self.object_exists(path, &key).await,
        }
    }

    async fn is_empty(&self, path: &Path) -> Result<bool, FsError> {
        // Directory contents are never listed; treat them as populated.
        match self.target(path) {
            Target::Directory => Ok(false),
            Target::OutOfScope => Err(FsError::NotFound {
                path: path.to_path_buf(),
            }),
            Target::Object(key) => Ok(self
                .content_length("is_empty", path, &key)
                .await?
                .unwrap_or(0)
                == 0),
        }
    }
}

#[async_trait]
impl<S: ObjectStorage> FsDir for ObjectFs<S> {
    async fn is_dir(&self, path: &Path) -> Result<bool, FsError> {
        Ok(self.mapper.is_dir(path))
    }

    async fn get_children(&self, _path: &Path) -> Result<Vec<String>, FsError> {
        Err(FsError::NotSupported {
            operation: "get_children",
        })
    }
}

#[async_trait]
impl<S: ObjectStorage> FsLink for ObjectFs<S> {
    async fn is_symlink(&self, _path: &Path) -> Result<bool, FsError> {
        Ok(false)
    }
}
