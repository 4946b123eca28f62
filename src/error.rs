//! Error types for the blobfs query surface and its storage collaborator.

use std::path::PathBuf;

/// Filesystem error type with contextual variants.
///
/// Every variant carries the client path (or operation) that failed, so the
/// `Display` output is enough to build a human-readable message. Storage keys
/// never appear here: clients only ever see the path they asked about.
///
/// # Examples
///
/// ```rust
/// use blobfs::FsError;
/// use std::path::PathBuf;
///
/// let err = FsError::NotFound { path: PathBuf::from("/models/missing.sci") };
/// assert_eq!(err.to_string(), "not found: /models/missing.sci");
/// ```
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum FsError {
    /// Path does not exist, or lies outside the configured root.
    #[error("not found: {path}")]
    NotFound {
        /// The path that was not found.
        path: PathBuf,
    },

    /// Expected a file but the path is a directory.
    #[error("not a file: {path}")]
    NotAFile {
        /// The path that is not a file.
        path: PathBuf,
    },

    /// The object exists but the store reported no content length.
    #[error("failed to get size: {path}")]
    SizeUnavailable {
        /// The path whose size is unknown.
        path: PathBuf,
    },

    /// The store rejected the requested byte range.
    #[error("invalid range: {path} ({details})")]
    InvalidRange {
        /// The path that was read.
        path: PathBuf,
        /// Backend description of the rejected range.
        details: String,
    },

    /// Stored data could not be interpreted.
    #[error("invalid data: {path} ({details})")]
    InvalidData {
        /// The path with invalid data.
        path: PathBuf,
        /// Details about the invalid data.
        details: String,
    },

    /// Operation is not supported.
    #[error("operation not supported: {operation}")]
    NotSupported {
        /// The unsupported operation.
        operation: &'static str,
    },

    /// Storage backend failure with context.
    #[error("{operation} failed for {path}: {source}")]
    Storage {
        /// The operation that failed.
        operation: &'static str,
        /// The client path involved in the operation.
        path: PathBuf,
        /// The underlying storage error.
        #[source]
        source: StorageError,
    },
}

impl FsError {
    /// Attach client-path context to a storage error.
    ///
    /// Storage `NotFound` and `InvalidRange` become their filesystem
    /// counterparts; anything else is wrapped in [`FsError::Storage`].
    pub fn from_storage(operation: &'static str, path: impl Into<PathBuf>, error: StorageError) -> Self {
        let path = path.into();
        match error {
            StorageError::NotFound { .. } => FsError::NotFound { path },
            StorageError::InvalidRange { details, .. } => FsError::InvalidRange { path, details },
            source => FsError::Storage {
                operation,
                path,
                source,
            },
        }
    }
}

/// Errors reported by an [`ObjectStorage`](crate::ObjectStorage) client.
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// No object is stored under the key.
    #[error("object not found: {key}")]
    NotFound {
        /// The missing key.
        key: String,
    },

    /// The requested range cannot be satisfied for the object.
    #[error("invalid range for {key}: {details}")]
    InvalidRange {
        /// The key that was read.
        key: String,
        /// What was wrong with the range.
        details: String,
    },

    /// Transport, authentication, throttling or any other backend failure.
    #[error("{code}: {message}")]
    Backend {
        /// Backend diagnostic code (store name or error class).
        code: String,
        /// Backend diagnostic message.
        message: String,
    },
}

impl From<object_store::Error> for StorageError {
    fn from(error: object_store::Error) -> Self {
        match error {
            object_store::Error::NotFound { path, .. } => StorageError::NotFound { key: path },
            object_store::Error::Generic { store, source } => StorageError::Backend {
                code: store.to_string(),
                message: source.to_string(),
            },
            other => StorageError::Backend {
                code: "ObjectStore".to_string(),
                message: other.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fs_error_not_found_display() {
        let err = FsError::NotFound {
            path: PathBuf::from("/missing"),
        };
        assert_eq!(err.to_string(), "not found: /missing");
    }

    #[test]
    fn fs_error_not_supported_display() {
        let err = FsError::NotSupported {
            operation: "get_children",
        };
        assert_eq!(err.to_string(), "operation not supported: get_children");
    }

    #[test]
    fn fs_error_storage_display_carries_backend_code() {
        let err = FsError::Storage {
            operation: "exists",
            path: PathBuf::from("/models/a"),
            source: StorageError::Backend {
                code: "AuthorizationFailure".into(),
                message: "token expired".into(),
            },
        };
        let msg = err.to_string();
        assert!(msg.contains("exists failed for /models/a"));
        assert!(msg.contains("AuthorizationFailure"));
        assert!(msg.contains("token expired"));
    }

    #[test]
    fn from_storage_maps_not_found() {
        let err = FsError::from_storage(
            "size",
            "/models/a",
            StorageError::NotFound { key: "a".into() },
        );
        assert!(matches!(err, FsError::NotFound { ref path } if path == &PathBuf::from("/models/a")));
    }

    #[test]
    fn from_storage_maps_invalid_range() {
        let err = FsError::from_storage(
            "read",
            "/models/a",
            StorageError::InvalidRange {
                key: "a".into(),
                details: "offset 10 beyond length 5".into(),
            },
        );
        match err {
            FsError::InvalidRange { details, .. } => assert!(details.contains("offset 10")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn from_storage_wraps_backend_failures() {
        let err = FsError::from_storage(
            "read",
            "/models/a",
            StorageError::Backend {
                code: "ServerBusy".into(),
                message: "slow down".into(),
            },
        );
        assert!(matches!(err, FsError::Storage { operation: "read", .. }));
    }

    #[test]
    fn storage_error_from_object_store_not_found() {
        let err = object_store::Error::NotFound {
            path: "sub/file.txt".into(),
            source: "missing".into(),
        };
        let storage = StorageError::from(err);
        assert!(matches!(storage, StorageError::NotFound { ref key } if key == "sub/file.txt"));
    }

    #[test]
    fn storage_error_from_object_store_generic() {
        let err = object_store::Error::Generic {
            store: "MicrosoftAzure",
            source: "connection reset".into(),
        };
        match StorageError::from(err) {
            StorageError::Backend { code, message } => {
                assert_eq!(code, "MicrosoftAzure");
                assert!(message.contains("connection reset"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
