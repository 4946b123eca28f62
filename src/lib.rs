//! # blobfs
//!
//! A filesystem-shaped query service over a flat, key-addressed object store.
//!
//! Object stores address data by flat keys and have no directories. Clients
//! that expect a filesystem ask about paths: does it exist, how big is it, is
//! it a directory, give me bytes 100..200. blobfs maps those paths onto
//! storage keys and answers the directory questions itself.
//!
//! ---
//!
//! ## Quick Start
//!
//! ```rust
//! use blobfs::{ByteRange, FsDir, FsExt, FsRead, MemoryStorage, ObjectFs, PathMapper};
//! use std::path::Path;
//!
//! # futures::executor::block_on(async {
//! let storage = MemoryStorage::new();
//! storage.insert("sub/file.txt", "hello world");
//! storage.insert("bncdata.sci", "flattened");
//!
//! // "bnc" is reported as a directory; its children are stored as "bnc<name>".
//! let mapper = PathMapper::new("/models").with_pseudo_dirs(["bnc"]);
//! let fs = ObjectFs::new(mapper, storage);
//!
//! assert!(fs.is_dir(Path::new("/models/bnc")).await?);
//! assert!(fs.exists(Path::new("/models/bnc/data.sci")).await?);
//! let bytes = fs.read_all(Path::new("/models/sub/file.txt"), ByteRange::new(6, 5)).await?;
//! assert_eq!(&bytes[..], b"world");
//! # Ok::<(), blobfs::FsError>(())
//! # }).unwrap();
//! ```
//!
//! ---
//!
//! ## Core Types
//!
//! | Type | Purpose |
//! |------|---------|
//! | [`PathMapper`] | Client path → [`StorageKey`], root and directory predicates |
//! | [`ObjectFs`] | The filesystem facade over an [`ObjectStorage`] client |
//! | [`Fs`] | Query surface: [`FsRead`] + [`FsDir`] + [`FsLink`] |
//! | [`ObjectStorage`] | What the facade needs from a store |
//! | [`FsError`] | Error type with path context |
//! | [`StorageError`] | Error type of the storage collaborator |
//!
//! ---
//!
//! ## Directories
//!
//! Directory-ness never comes from storage. The root directory is a
//! directory, and so is every registered pseudo-directory; nothing else is.
//! Directory predicates therefore never wait on the network. Listing a
//! directory is not supported and fails with [`FsError::NotSupported`].
//!
//! ---
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `serde` | `Serialize`/`Deserialize` for [`StorageKey`], [`ByteRange`], [`ObjectMetadata`] |
//! | `server` | HTTP surface (`http`), configuration (`config`) and the `blobfs-server` binary |
//! | `azure` | Azure Blob Storage through [`ObjectStoreBackend::azure`] |

// Private modules
mod error;
mod ext;
mod fs;
mod layer;
mod path_mapper;
mod storage;
mod traits;
mod types;

// Server modules
#[cfg(feature = "server")]
pub mod config;
#[cfg(feature = "server")]
pub mod http;

// Public re-exports - error types
pub use error::{FsError, StorageError};

// Public re-exports - core types
pub use types::{ByteRange, ByteStream, Download, ObjectMetadata, StorageKey, DEFAULT_CONTENT_TYPE};

// Public re-exports - traits
pub use traits::{Fs, FsDir, FsLink, FsRead};

// Public re-exports - path mapping and facade
pub use fs::ObjectFs;
pub use path_mapper::PathMapper;

// Public re-exports - storage
pub use storage::{MemoryStorage, ObjectStorage, ObjectStoreBackend};

// Public re-exports - infrastructure
pub use ext::FsExt;
pub use layer::{Layer, LayerExt, Traced, TracingLayer};
