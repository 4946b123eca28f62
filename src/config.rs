//! # Server Configuration
//!
//! Command-line and environment configuration for `blobfs-server`.
//!
//! Every flag falls back to an environment variable, so a container can be
//! configured purely through its environment:
//!
//! | Flag | Env | Default |
//! |------|-----|---------|
//! | `--root-dir` | `MODEL_ROOT_DIR` | required |
//! | `--port` | `SERVER_PORT` | `3000` |
//! | `--bind` | `SERVER_BIND` | `0.0.0.0` |
//! | `--pseudo-dir` | `PSEUDO_DIRS` (comma-separated) | none |
//! | `--backend` | `STORAGE_BACKEND` | `azure` |
//! | `--account` | `AZURE_STORAGE_ACCOUNT_NAME` | |
//! | `--container` | `AZURE_STORAGE_CONTAINER_NAME` | |
//! | `--local-dir` | `LOCAL_STORAGE_DIR` | |

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, ValueEnum};

use crate::{MemoryStorage, ObjectStorage, ObjectStoreBackend, PathMapper, StorageError};

/// Which object store serves the keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Backend {
    /// Azure Blob Storage container.
    Azure,
    /// Files under a local directory.
    Local,
    /// Empty in-process store.
    Memory,
}

impl Backend {
    /// Lowercase name, as accepted on the command line.
    pub fn as_str(&self) -> &'static str {
        match self {
            Backend::Azure => "azure",
            Backend::Local => "local",
            Backend::Memory => "memory",
        }
    }
}

/// Configuration errors detected at startup.
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A setting required by the selected backend was not given.
    #[error("{backend} backend requires {setting}")]
    MissingSetting {
        /// The selected backend.
        backend: &'static str,
        /// Flag and environment variable of the missing setting.
        setting: &'static str,
    },

    /// The selected backend was not compiled in.
    #[error("{backend} backend is not available in this build")]
    BackendUnavailable {
        /// The selected backend.
        backend: &'static str,
    },

    /// The storage client could not be built.
    #[error("failed to create storage client: {0}")]
    Storage(#[from] StorageError),
}

/// `blobfs-server` configuration.
#[derive(Debug, Clone, Parser)]
#[command(name = "blobfs-server", version, about = "Filesystem queries over an object store", long_about = None)]
pub struct Config {
    /// Root directory clients address; paths outside it do not exist
    #[arg(long, env = "MODEL_ROOT_DIR")]
    pub root_dir: PathBuf,

    /// Port to listen on
    #[arg(short, long, env = "SERVER_PORT", default_value_t = 3000)]
    pub port: u16,

    /// Address to bind
    #[arg(long, env = "SERVER_BIND", default_value_t = IpAddr::V4(Ipv4Addr::UNSPECIFIED))]
    pub bind: IpAddr,

    /// Path segment to report as a directory (repeatable)
    #[arg(long = "pseudo-dir", env = "PSEUDO_DIRS", value_delimiter = ',')]
    pub pseudo_dirs: Vec<String>,

    /// Object store backend
    #[arg(long, env = "STORAGE_BACKEND", value_enum, default_value_t = Backend::Azure)]
    pub backend: Backend,

    /// Azure storage account
    #[arg(long, env = "AZURE_STORAGE_ACCOUNT_NAME")]
    pub account: Option<String>,

    /// Azure blob container
    #[arg(long, env = "AZURE_STORAGE_CONTAINER_NAME")]
    pub container: Option<String>,

    /// Directory holding objects for the local backend
    #[arg(long, env = "LOCAL_STORAGE_DIR")]
    pub local_dir: Option<PathBuf>,
}

impl Config {
    /// Check that the selected backend has everything it needs.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::MissingSetting`] for a missing account, container
    ///   or local directory
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self.backend {
            Backend::Azure => {
                self.azure_settings()?;
            }
            Backend::Local => {
                self.local_settings()?;
            }
            Backend::Memory => {}
        }
        Ok(())
    }

    /// Socket address to listen on.
    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind, self.port)
    }

    /// Path mapper over the configured root and pseudo-directories.
    pub fn path_mapper(&self) -> PathMapper {
        let dirs = self
            .pseudo_dirs
            .iter()
            .map(|d| d.trim())
            .filter(|d| !d.is_empty());
        PathMapper::new(self.root_dir.clone()).with_pseudo_dirs(dirs)
    }

    /// Build the storage client for the selected backend.
    ///
    /// # Errors
    ///
    /// - Anything [`validate`](Self::validate) reports
    /// - [`ConfigError::BackendUnavailable`] for `azure` without the `azure`
    ///   feature
    /// - [`ConfigError::Storage`] if the client cannot be constructed
    pub fn build_storage(&self) -> Result<Arc<dyn ObjectStorage>, ConfigError> {
        match self.backend {
            Backend::Azure => {
                let (account, container) = self.azure_settings()?;
                azure_storage(account, container)
            }
            Backend::Local => {
                let dir = self.local_settings()?;
                Ok(Arc::new(ObjectStoreBackend::local(dir)?))
            }
            Backend::Memory => Ok(Arc::new(MemoryStorage::new())),
        }
    }

    fn azure_settings(&self) -> Result<(&str, &str), ConfigError> {
        let account = self.account.as_deref().ok_or(ConfigError::MissingSetting {
            backend: "azure",
            setting: "--account / AZURE_STORAGE_ACCOUNT_NAME",
        })?;
        let container = self.container.as_deref().ok_or(ConfigError::MissingSetting {
            backend: "azure",
            setting: "--container / AZURE_STORAGE_CONTAINER_NAME",
        })?;
        Ok((account, container))
    }

    fn local_settings(&self) -> Result<&PathBuf, ConfigError> {
        self.local_dir.as_ref().ok_or(ConfigError::MissingSetting {
            backend: "local",
            setting: "--local-dir / LOCAL_STORAGE_DIR",
        })
    }
}

#[cfg(feature = "azure")]
fn azure_storage(account: &str, container: &str) -> Result<Arc<dyn ObjectStorage>, ConfigError> {
    Ok(Arc::new(ObjectStoreBackend::azure(account, container)?))
}

#[cfg(not(feature = "azure"))]
fn azure_storage(_account: &str, _container: &str) -> Result<Arc<dyn ObjectStorage>, ConfigError> {
    Err(ConfigError::BackendUnavailable { backend: "azure" })
}
