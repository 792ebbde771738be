//! Runner tool cache.
//!
//! Uses the layout of the hosted runner tool cache so entries are shared
//! with other actions and survive on self-hosted runners:
//!
//! ```text
//! $RUNNER_TOOL_CACHE/
//! └── kenbot/
//!     └── 2.8.7/
//!         ├── x64/
//!         │   └── kenbot
//!         └── x64.complete
//! ```
//!
//! An entry without its `.complete` marker is treated as absent.

use kenbot_action_core::{Error, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

/// Versioned tool directories under a cache root.
#[derive(Debug, Clone)]
pub struct ToolCache {
    root: PathBuf,
}

impl ToolCache {
    /// Create a cache at the specified root directory.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Directory holding one tool version for one architecture.
    #[must_use]
    pub fn entry_dir(&self, tool: &str, version: &str, arch: &str) -> PathBuf {
        self.root.join(tool).join(version).join(arch)
    }

    fn marker_path(&self, tool: &str, version: &str, arch: &str) -> PathBuf {
        self.root
            .join(tool)
            .join(version)
            .join(format!("{arch}.complete"))
    }

    /// Look up a completed cache entry.
    pub async fn find(&self, tool: &str, version: &str, arch: &str) -> Option<PathBuf> {
        let dir = self.entry_dir(tool, version, arch);
        let marker = self.marker_path(tool, version, arch);
        let complete = matches!(tokio::fs::metadata(&dir).await, Ok(m) if m.is_dir())
            && matches!(tokio::fs::metadata(&marker).await, Ok(m) if m.is_file());
        if complete {
            trace!(tool, version, ?dir, "Cache hit");
            Some(dir)
        } else {
            trace!(tool, version, "Cache miss");
            None
        }
    }

    /// Copy `source` into the cache as `file_name`, replacing any existing entry.
    ///
    /// Returns the entry directory.
    pub async fn cache_file(
        &self,
        source: &Path,
        file_name: &str,
        tool: &str,
        version: &str,
        arch: &str,
    ) -> Result<PathBuf> {
        let dir = self.entry_dir(tool, version, arch);
        let marker = self.marker_path(tool, version, arch);

        if tokio::fs::try_exists(&marker).await.unwrap_or(false) {
            tokio::fs::remove_file(&marker)
                .await
                .map_err(|e| Error::io(e, "remove cache marker", Some(marker.clone())))?;
        }
        if tokio::fs::try_exists(&dir).await.unwrap_or(false) {
            tokio::fs::remove_dir_all(&dir)
                .await
                .map_err(|e| Error::io(e, "remove cache entry", Some(dir.clone())))?;
        }
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|e| Error::io(e, "create cache entry", Some(dir.clone())))?;

        let dest = dir.join(file_name);
        tokio::fs::copy(source, &dest)
            .await
            .map_err(|e| Error::io(e, "copy into cache", Some(dest.clone())))?;
        tokio::fs::write(&marker, "")
            .await
            .map_err(|e| Error::io(e, "write cache marker", Some(marker.clone())))?;

        debug!(tool, version, ?dest, "Stored tool in cache");
        Ok(dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_miss_on_empty_cache() {
        let root = tempfile::tempdir().unwrap();
        let cache = ToolCache::new(root.path());
        assert!(cache.find("kenbot", "2.8.7", "x64").await.is_none());
    }

    #[tokio::test]
    async fn test_cache_file_then_find() {
        let root = tempfile::tempdir().unwrap();
        let source = root.path().join("download");
        std::fs::write(&source, b"binary").unwrap();

        let cache = ToolCache::new(root.path().join("cache"));
        let dir = cache
            .cache_file(&source, "kenbot", "kenbot", "2.8.7", "x64")
            .await
            .unwrap();

        assert_eq!(dir, root.path().join("cache/kenbot/2.8.7/x64"));
        assert_eq!(std::fs::read(dir.join("kenbot")).unwrap(), b"binary");
        assert!(root.path().join("cache/kenbot/2.8.7/x64.complete").is_file());
        assert_eq!(cache.find("kenbot", "2.8.7", "x64").await, Some(dir));
        assert!(cache.find("kenbot", "2.8.7", "arm64").await.is_none());
        assert!(cache.find("kenbot", "2.8.8", "x64").await.is_none());
    }

    #[tokio::test]
    async fn test_entry_without_marker_is_a_miss() {
        let root = tempfile::tempdir().unwrap();
        let cache = ToolCache::new(root.path());
        std::fs::create_dir_all(cache.entry_dir("kenbot", "1.0.0", "x64")).unwrap();
        assert!(cache.find("kenbot", "1.0.0", "x64").await.is_none());
    }

    #[tokio::test]
    async fn test_cache_file_replaces_entry() {
        let root = tempfile::tempdir().unwrap();
        let cache = ToolCache::new(root.path().join("cache"));

        let old = root.path().join("old");
        std::fs::write(&old, b"old").unwrap();
        let dir = cache
            .cache_file(&old, "kenbot", "kenbot", "[RELEASE]", "x64")
            .await
            .unwrap();
        std::fs::write(dir.join("stale"), b"x").unwrap();

        let new = root.path().join("new");
        std::fs::write(&new, b"new").unwrap();
        let dir = cache
            .cache_file(&new, "kenbot", "kenbot", "[RELEASE]", "x64")
            .await
            .unwrap();

        assert_eq!(std::fs::read(dir.join("kenbot")).unwrap(), b"new");
        assert!(!dir.join("stale").exists());
    }

    #[tokio::test]
    async fn test_missing_source_fails() {
        let root = tempfile::tempdir().unwrap();
        let cache = ToolCache::new(root.path());
        let err = cache
            .cache_file(&root.path().join("absent"), "kenbot", "kenbot", "1.0.0", "x64")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }
}
