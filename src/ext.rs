//! # Extension Traits
//!
//! Convenience methods for filesystem backends.
//!
//! ## Overview
//!
//! [`FsExt`] provides utility methods that aren't part of the core traits.
//! They have default implementations and a blanket implementation, so any
//! [`FsRead`] backend gets them for free.
//!
//! ## Available Methods
//!
//! | Method | Description |
//! |--------|-------------|
//! | [`read_all`](FsExt::read_all) | Collect a range read into one buffer |
//! | [`read_to_string`](FsExt::read_to_string) | Read a whole file as UTF-8 |

use std::path::Path;

use async_trait::async_trait;
use bytes::{Bytes, BytesMut};
use futures::TryStreamExt;

use crate::{ByteRange, FsError, FsRead};

/// Extension methods for any filesystem backend.
///
/// # Example
///
/// ```rust
/// use blobfs::{ByteRange, FsError, FsExt, FsRead};
/// use std::path::Path;
///
/// async fn header<B: FsRead>(backend: &B) -> Result<Vec<u8>, FsError> {
///     let bytes = backend.read_all(Path::new("/models/a.sci"), ByteRange::new(0, 16)).await?;
///     Ok(bytes.to_vec())
/// }
/// ```
#[async_trait]
pub trait FsExt: FsRead {
    /// Read `range` of a file into memory.
    ///
    /// # Errors
    ///
    /// Any error from [`FsRead::read`], plus [`FsError::Storage`] if the
    /// byte stream fails part-way.
    async fn read_all(&self, path: &Path, range: ByteRange) -> Result<Bytes, FsError> {
        let download = self.read(path, range).await?;
        let buffer = download
            .body
            .map_err(|e| FsError::from_storage("read", path, e))
            .try_fold(BytesMut::new(), |mut buffer, chunk| async move {
                buffer.extend_from_slice(&chunk);
                Ok(buffer)
            })
            .await?;
        Ok(buffer.freeze())
    }

    /// Read an entire file as a UTF-8 string.
    ///
    /// # Errors
    ///
    /// Any error from [`read_all`](Self::read_all), plus
    /// [`FsError::InvalidData`] if the file is not valid UTF-8.
    async fn read_to_string(&self, path: &Path) -> Result<String, FsError> {
        let bytes = self.read_all(path, ByteRange::FULL).await?;
        String::from_utf8(bytes.to_vec()).map_err(|_| FsError::InvalidData {
            path: path.to_path_buf(),
            details: "not valid UTF-8".into(),
        })
    }
}

// Blanket implementation - any FsRead backend gets FsExt for free
impl<B: FsRead + ?Sized> FsExt for B {}
