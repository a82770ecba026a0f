//! Filesystem access used during path resolution.
//!
//! Resolution only needs to know whether a candidate path is a readable
//! file. [`LocalFs`] answers that from disk; [`MemoryFs`] answers it from a
//! fixed set of paths, which keeps resolution tests off the filesystem.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use async_trait::async_trait;

/// Existence checks for candidate view paths.
#[async_trait]
pub trait Filesystem: Send + Sync {
    /// Returns true if `path` exists and is a regular file.
    async fn is_file(&self, path: &Path) -> bool;
}

/// The local filesystem, queried through `tokio::fs`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFs;

#[async_trait]
impl Filesystem for LocalFs {
    async fn is_file(&self, path: &Path) -> bool {
        match tokio::fs::metadata(path).await {
            Ok(meta) => meta.is_file(),
            Err(_) => false,
        }
    }
}

/// An in-memory set of file paths.
///
/// Paths are matched exactly as given; no normalization is applied.
///
/// ```rust
/// use standout_views::fs::{Filesystem, MemoryFs};
/// use std::path::Path;
///
/// let fs = MemoryFs::new().with_file("views/index.html");
/// futures::executor::block_on(async {
///     assert!(fs.is_file(Path::new("views/index.html")).await);
///     assert!(!fs.is_file(Path::new("views/missing.html")).await);
/// });
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryFs {
    files: HashSet<PathBuf>,
}

impl MemoryFs {
    /// Creates an empty in-memory filesystem.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a file path.
    pub fn with_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.files.insert(path.into());
        self
    }

    /// Adds a file path in place.
    pub fn add_file(&mut self, path: impl Into<PathBuf>) {
        self.files.insert(path.into());
    }
}

#[async_trait]
impl Filesystem for MemoryFs {
    async fn is_file(&self, path: &Path) -> bool {
        self.files.contains(path)
    }
}
