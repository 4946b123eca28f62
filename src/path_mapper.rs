//! # PathMapper
//!
//! Translation between hierarchical client paths and flat storage keys.
//!
//! ## Responsibility
//! - Scope client paths to the configured root directory
//! - Map in-scope paths to [`StorageKey`]s, flattening pseudo-directories
//! - Answer the root and directory predicates without touching storage
//!
//! ## Mapping Rules
//!
//! ```text
//! root = /models, pseudo-dirs = {"bnc"}
//!
//! /models                  → ""              (root, never looked up)
//! /models/sub/file.txt     → "sub/file.txt"
//! \models\sub\file.txt     → "sub/file.txt"
//! /models/bnc/data.sci     → "bncdata.sci"   (parent is a pseudo-directory)
//! /other/file.txt          → None            (outside the root)
//! /models/../etc/passwd    → None
//! ```
//!
//! Paths are resolved lexically: `.` and empty segments are dropped and `..`
//! removes the previous segment. Both `/` and `\` separate segments, so a
//! client may use its native convention. Keys always use `/`.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};

use crate::StorageKey;

/// Separator used inside storage keys.
const KEY_SEPARATOR: &str = "/";

/// Maps client paths under a root directory onto storage keys.
///
/// Holds the root directory (fixed at construction) and the set of
/// pseudo-directories: locations reported as directories although no
/// container object exists for them. Children of a pseudo-directory are
/// stored under the directory name and the file name concatenated with no
/// separator.
///
/// # Thread Safety
///
/// Registration takes `&self`. The pseudo-directory set sits behind an
/// `RwLock`, so registration may race with lookups safely. In normal use
/// every registration happens before the mapper serves its first request.
///
/// # Example
///
/// ```rust
/// use blobfs::PathMapper;
///
/// let mapper = PathMapper::new("/models").with_pseudo_dirs(["bnc"]);
///
/// assert_eq!(mapper.convert("/models/sub/file.txt").unwrap().as_str(), "sub/file.txt");
/// assert_eq!(mapper.convert("/models/bnc/data.sci").unwrap().as_str(), "bncdata.sci");
/// assert!(mapper.convert("/other/file.txt").is_none());
///
/// assert!(mapper.is_dir("/models/"));
/// assert!(mapper.is_dir("/models/bnc"));
/// assert!(!mapper.is_dir("/models/sub"));
/// ```
#[derive(Debug)]
pub struct PathMapper {
    root: PathBuf,
    root_segments: Vec<String>,
    pseudo_dirs: RwLock<HashSet<String>>,
}

impl PathMapper {
    /// Create a mapper rooted at `root`.
    ///
    /// The root is always treated as absolute.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let root_segments = resolve_onto(Vec::new(), &root.to_string_lossy());
        Self {
            root,
            root_segments,
            pseudo_dirs: RwLock::new(HashSet::new()),
        }
    }

    /// Register every name in `dirs` as a pseudo-directory.
    pub fn with_pseudo_dirs<I, S>(self, dirs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for dir in dirs {
            self.register_pseudo_dir(dir);
        }
        self
    }

    /// Register `name` (relative to the root) as a pseudo-directory.
    ///
    /// Registering the same name twice is a no-op. `\` in the name is read as
    /// a separator, so `a\b` and `a/b` name the same directory.
    pub fn register_pseudo_dir(&self, name: impl AsRef<str>) {
        let name = normalize_name(name.as_ref());
        self.pseudo_dirs
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(name);
    }

    /// The configured root directory, as given.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Sorted snapshot of the registered pseudo-directories.
    pub fn pseudo_dirs(&self) -> Vec<String> {
        let mut dirs: Vec<String> = self
            .pseudo_dirs
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .cloned()
            .collect();
        dirs.sort();
        dirs
    }

    /// Convert a client path to its storage key.
    ///
    /// Returns `None` when the path does not lie beneath the root; such paths
    /// must never reach the store. The root itself maps to the empty key.
    pub fn convert(&self, path: impl AsRef<Path>) -> Option<StorageKey> {
        let relative = self.relative(path.as_ref())?;
        if let Some((base, parent)) = relative.split_last() {
            let parent = parent.join(KEY_SEPARATOR);
            if self.is_pseudo_dir(&parent) {
                return Some(StorageKey::new(format!("{parent}{base}")));
            }
        }
        Some(StorageKey::new(relative.join(KEY_SEPARATOR)))
    }

    /// Returns `true` if `path` denotes the root directory.
    ///
    /// Compares normalized segments, so `/models/`, `/models/.` and
    /// `\models` all match a root of `/models`.
    pub fn is_root(&self, path: impl AsRef<Path>) -> bool {
        self.relative(path.as_ref())
            .is_some_and(|relative| relative.is_empty())
    }

    /// Returns `true` if `path` is the root or a registered pseudo-directory.
    pub fn is_dir(&self, path: impl AsRef<Path>) -> bool {
        match self.relative(path.as_ref()) {
            None => false,
            Some(relative) if relative.is_empty() => true,
            Some(relative) => self.is_pseudo_dir(&relative.join(KEY_SEPARATOR)),
        }
    }

    fn is_pseudo_dir(&self, name: &str) -> bool {
        self.pseudo_dirs
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(name)
    }

    /// Segments of `path` below the root, or `None` if it escapes the root.
    fn relative(&self, path: &Path) -> Option<Vec<String>> {
        let path = path.to_string_lossy();
        let base = if is_absolute(&path) {
            Vec::new()
        } else {
            self.root_segments.clone()
        };
        let resolved = resolve_onto(base, &path);
        resolved
            .strip_prefix(self.root_segments.as_slice())
            .map(<[String]>::to_vec)
    }
}

fn is_separator(c: char) -> bool {
    c == '/' || c == '\\'
}

fn is_absolute(path: &str) -> bool {
    path.starts_with(is_separator) || has_drive_prefix(path)
}

// `C:` style prefix.
fn has_drive_prefix(path: &str) -> bool {
    let bytes = path.as_bytes();
    bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':'
}

/// Apply the segments of `path` on top of `base`.
///
/// `..` at the top level stays at the top level.
fn resolve_onto(mut base: Vec<String>, path: &str) -> Vec<String> {
    for segment in path.split(is_separator) {
        match segment {
            "" | "." => {}
            ".." => {
                base.pop();
            }
            segment => base.push(segment.to_string()),
        }
    }
    base
}

fn normalize_name(name: &str) -> String {
    name.split(is_separator)
        .filter(|segment| !segment.is_empty() && *segment != ".")
        .collect::<Vec<_>>()
        .join(KEY_SEPARATOR)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn key(mapper: &PathMapper, path: &str) -> Option<String> {
        mapper.convert(path).map(StorageKey::into_string)
    }

    #[test]
    fn converts_nested_path_under_root() {
        let mapper = PathMapper::new("/models");
        assert_eq!(key(&mapper, "/models/sub/file.txt").as_deref(), Some("sub/file.txt"));
    }

    #[test]
    fn flattens_children_of_pseudo_dirs() {
        let mapper = PathMapper::new("/models").with_pseudo_dirs(["bnc"]);
        assert_eq!(key(&mapper, "/models/bnc/data.sci").as_deref(), Some("bncdata.sci"));
    }

    #[test]
    fn flattens_children_of_nested_pseudo_dirs() {
        let mapper = PathMapper::new("/models").with_pseudo_dirs(["sets/bnc"]);
        assert_eq!(
            key(&mapper, "/models/sets/bnc/data.sci").as_deref(),
            Some("sets/bncdata.sci")
        );
        // Only the immediate parent counts.
        assert_eq!(
            key(&mapper, "/models/sets/bnc/deep/data.sci").as_deref(),
            Some("sets/bnc/deep/data.sci")
        );
    }

    #[test]
    fn paths_outside_root_are_out_of_scope() {
        let mapper = PathMapper::new("/models").with_pseudo_dirs(["bnc"]);
        for path in [
            "/other/file.txt",
            "/",
            "/modelsX/file.txt",
            "/models/../etc/passwd",
            "../file.txt",
            "/bnc/data.sci",
        ] {
            assert_eq!(key(&mapper, path), None, "{path}");
            assert!(!mapper.is_dir(path), "{path}");
            assert!(!mapper.is_root(path), "{path}");
        }
    }

    #[test]
    fn escape_never_yields_partial_key() {
        let mapper = PathMapper::new("/models");
        assert_eq!(key(&mapper, "/models/sub/../../models2/a"), None);
        // Climbing out and back in is still in scope.
        assert_eq!(key(&mapper, "/models/sub/../../models/a").as_deref(), Some("a"));
    }

    #[test]
    fn root_is_root_and_dir() {
        let mapper = PathMapper::new("/models");
        for path in ["/models", "/models/", "/models/.", "\\models\\", "//models//", "/models/sub/.."] {
            assert!(mapper.is_root(path), "{path}");
            assert!(mapper.is_dir(path), "{path}");
        }
        assert!(!mapper.is_root("/models/sub"));
    }

    #[test]
    fn root_converts_to_empty_key() {
        let mapper = PathMapper::new("/models/");
        assert_eq!(key(&mapper, "/models").as_deref(), Some(""));
    }

    #[test]
    fn backslash_separators_normalize_to_storage_separator() {
        let mapper = PathMapper::new("/models");
        assert_eq!(key(&mapper, "\\models\\sub\\file.txt").as_deref(), Some("sub/file.txt"));
        assert_eq!(key(&mapper, "/models\\sub/file.txt").as_deref(), Some("sub/file.txt"));
    }

    #[test]
    fn windows_style_root() {
        let mapper = PathMapper::new("C:\\models").with_pseudo_dirs(["bnc"]);
        assert_eq!(key(&mapper, "C:\\models\\sub\\file.txt").as_deref(), Some("sub/file.txt"));
        assert_eq!(key(&mapper, "C:/models/bnc/data.sci").as_deref(), Some("bncdata.sci"));
        assert_eq!(key(&mapper, "D:\\models\\file.txt"), None);
        assert!(mapper.is_root("C:\\models\\"));
    }

    #[test]
    fn equivalent_spellings_convert_identically() {
        let mapper = PathMapper::new("/models").with_pseudo_dirs(["bnc"]);
        let spellings = [
            "/models/sub/file.txt",
            "\\models\\sub\\file.txt",
            "/models//sub/./file.txt",
            "/models/sub/x/../file.txt",
            "sub/file.txt",
        ];
        let expected = key(&mapper, spellings[0]);
        for path in spellings {
            assert_eq!(key(&mapper, path), expected, "{path}");
        }
    }

    #[test]
    fn relative_client_paths_resolve_against_root() {
        let mapper = PathMapper::new("/models").with_pseudo_dirs(["bnc"]);
        assert_eq!(key(&mapper, "bnc/data.sci").as_deref(), Some("bncdata.sci"));
        assert!(mapper.is_dir("bnc"));
        assert!(mapper.is_root("."));
    }

    #[test]
    fn is_dir_requires_full_relative_path_match() {
        let mapper = PathMapper::new("/models").with_pseudo_dirs(["sets/bnc"]);
        assert!(mapper.is_dir("/models/sets/bnc"));
        assert!(mapper.is_dir("/models/sets/bnc/"));
        assert!(!mapper.is_dir("/models/sets"));
        assert!(!mapper.is_dir("/models/bnc"));
        assert!(!mapper.is_dir("/models/sets/bnc/data.sci"));
    }

    #[test]
    fn registration_normalizes_separators_and_ignores_duplicates() {
        let mapper = PathMapper::new("/models");
        mapper.register_pseudo_dir("sets\\bnc");
        mapper.register_pseudo_dir("sets/bnc");
        mapper.register_pseudo_dir("sets/bnc/");
        assert_eq!(mapper.pseudo_dirs(), vec!["sets/bnc".to_string()]);
        assert_eq!(
            key(&mapper, "/models/sets/bnc/data.sci").as_deref(),
            Some("sets/bncdata.sci")
        );
    }

    #[test]
    fn pseudo_dirs_are_sorted() {
        let mapper = PathMapper::new("/models").with_pseudo_dirs(["zeta", "alpha", "mid"]);
        assert_eq!(mapper.pseudo_dirs(), vec!["alpha", "mid", "zeta"]);
    }

    #[test]
    fn root_accessor_returns_configured_root() {
        let mapper = PathMapper::new("/models/");
        assert_eq!(mapper.root(), Path::new("/models/"));
    }

    #[test]
    fn top_level_root_maps_every_absolute_path() {
        let mapper = PathMapper::new("/");
        assert_eq!(key(&mapper, "/a/b").as_deref(), Some("a/b"));
        assert!(mapper.is_root("/"));
    }

    #[test]
    fn registration_races_with_lookups() {
        let mapper = Arc::new(PathMapper::new("/models"));
        std::thread::scope(|scope| {
            for i in 0..4 {
                let mapper = Arc::clone(&mapper);
                scope.spawn(move || {
                    for j in 0..100 {
                        mapper.register_pseudo_dir(format!("d{i}_{j}"));
                        let _ = mapper.convert(format!("/models/d{i}_{j}/file"));
                    }
                });
            }
        });
        assert_eq!(mapper.pseudo_dirs().len(), 400);
        assert_eq!(key(&mapper, "/models/d3_99/file").as_deref(), Some("d3_99file"));
    }

    #[test]
    fn path_mapper_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PathMapper>();
    }
}
