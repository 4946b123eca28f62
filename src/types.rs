//! Core types for the blobfs query surface.

use std::fmt;

use bytes::Bytes;
use futures::stream::BoxStream;

use crate::StorageError;

/// Content type reported when the store does not record one.
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Flat identifier of an object in the backing store.
///
/// Produced by [`PathMapper::convert`](crate::PathMapper::convert) and
/// recomputed on every request. Always uses `/` as separator, whatever
/// separator the client path used.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StorageKey(String);

impl StorageKey {
    /// Wrap a raw key.
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// The key as a string slice.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` for the zero-length key (only the root maps to it).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Consume the key, returning the inner string.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for StorageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for StorageKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Byte range requested by a read.
///
/// `len: None` reads to the end of the object.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ByteRange {
    /// Byte offset to start reading from.
    pub offset: u64,
    /// Maximum number of bytes to read.
    pub len: Option<u64>,
}

impl ByteRange {
    /// The whole object.
    pub const FULL: Self = Self {
        offset: 0,
        len: None,
    };

    /// `len` bytes starting at `offset`.
    #[inline]
    pub const fn new(offset: u64, len: u64) -> Self {
        Self {
            offset,
            len: Some(len),
        }
    }

    /// Everything from `offset` to the end of the object.
    #[inline]
    pub const fn from_offset(offset: u64) -> Self {
        Self { offset, len: None }
    }

    /// Exclusive end offset, when bounded.
    #[inline]
    pub fn end(&self) -> Option<u64> {
        self.len.map(|len| self.offset.saturating_add(len))
    }
}

impl fmt::Display for ByteRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.end() {
            Some(end) => write!(f, "bytes {}..{}", self.offset, end),
            None => write!(f, "bytes {}..", self.offset),
        }
    }
}

/// Metadata the store reports for an object.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ObjectMetadata {
    /// Size in bytes, if the store reported it.
    pub content_length: Option<u64>,
    /// MIME type, if the store recorded one.
    pub content_type: Option<String>,
}

/// Stream of object bytes.
pub type ByteStream = BoxStream<'static, Result<Bytes, StorageError>>;

/// Result of a range read: the content type and a stream over the bytes.
pub struct Download {
    /// MIME type of the object.
    pub content_type: String,
    /// The requested bytes.
    pub body: ByteStream,
}

impl fmt::Debug for Download {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Download")
            .field("content_type", &self.content_type)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_key_display_is_raw_key() {
        let key = StorageKey::new("sub/file.txt");
        assert_eq!(key.to_string(), "sub/file.txt");
        assert_eq!(key.as_str(), "sub/file.txt");
        assert!(!key.is_empty());
    }

    #[test]
    fn storage_key_empty() {
        assert!(StorageKey::new("").is_empty());
    }

    #[test]
    fn byte_range_end() {
        assert_eq!(ByteRange::new(10, 20).end(), Some(30));
        assert_eq!(ByteRange::from_offset(10).end(), None);
        assert_eq!(ByteRange::new(u64::MAX, 1).end(), Some(u64::MAX));
    }

    #[test]
    fn byte_range_default_is_full() {
        assert_eq!(ByteRange::default(), ByteRange::FULL);
        assert_eq!(ByteRange::FULL.to_string(), "bytes 0..");
        assert_eq!(ByteRange::new(2, 3).to_string(), "bytes 2..5");
    }
}
