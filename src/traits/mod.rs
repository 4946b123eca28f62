//! # Filesystem Traits
//!
//! The query interface blobfs exposes over an object store.
//!
//! ## Components
//!
//! | Trait | Operations | Touches storage |
//! |-------|------------|-----------------|
//! | [`FsRead`] | `read`, `exists`, `size`, `is_regular_file`, `is_empty` | yes, for files |
//! | [`FsDir`] | `is_dir`, `get_children` | no |
//! | [`FsLink`] | `is_symlink` | no |
//!
//! ## Blanket Implementation
//!
//! [`Fs`] is implemented for every type that implements the three component
//! traits. Implement the components and you get `Fs` for free.
//!
//! ## Thread Safety
//!
//! All traits require `Send + Sync` and take `&self`, so one backend can be
//! shared across request handlers behind an `Arc`.
//!
//! ## Object Safety
//!
//! All traits are object-safe. The HTTP layer serves an `Arc<dyn Fs>`.

mod fs_dir;
mod fs_link;
mod fs_read;

pub use fs_dir::FsDir;
pub use fs_link::FsLink;
pub use fs_read::FsRead;

/// The full query surface: reads, directory predicates and symlink queries.
///
/// # Blanket Implementation
///
/// Automatically implemented for any type that implements [`FsRead`],
/// [`FsDir`] and [`FsLink`]. You never need to implement `Fs` directly.
///
/// # Example
///
/// ```rust
/// use blobfs::{Fs, FsError};
/// use std::path::Path;
///
/// async fn describe<B: Fs + ?Sized>(fs: &B, path: &Path) -> Result<String, FsError> {
///     if fs.is_dir(path).await? {
///         return Ok("directory".into());
///     }
///     if !fs.exists(path).await? {
///         return Ok("missing".into());
///     }
///     Ok(format!("file, {} bytes", fs.size(path).await?))
/// }
/// ```
pub trait Fs: FsRead + FsDir + FsLink {}

// Blanket implementation - any type implementing all three gets Fs for free
impl<T: FsRead + FsDir + FsLink> Fs for T {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fs_is_object_safe() {
        fn _check(_: &dyn Fs) {}
    }

    #[test]
    fn arc_dyn_fs_is_send_sync() {
        fn _assert_send_sync<T: Send + Sync>() {}
        _assert_send_sync::<std::sync::Arc<dyn Fs>>();
    }
}
