//! Cache configuration
//!
//! A `CacheConfig` is built once and handed to a backend at construction.
//! It can be persisted as JSON next to the deployment:
//!
//! ```json
//! { "root": "/cache/download", "read_only": true, "atomic_writes": false }
//! ```

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default cache root used by the CLI
pub const DEFAULT_ROOT: &str = "/cache/download";

/// Immutable configuration for a cache backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Base directory holding every blob
    pub root: PathBuf,
    /// Turn every store into a no-op success
    #[serde(default)]
    pub read_only: bool,
    /// Write into a temporary file and rename it over the target
    #[serde(default)]
    pub atomic_writes: bool,
}

impl CacheConfig {
    /// Writable, non-atomic configuration rooted at `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        CacheConfig {
            root: root.into(),
            read_only: false,
            atomic_writes: false,
        }
    }

    /// Set whether stores are skipped
    pub fn read_only(mut self, read_only: bool) -> Self {
        self.read_only = read_only;
        self
    }

    /// Set whether stores go through a temporary file and rename
    pub fn atomic_writes(mut self, atomic_writes: bool) -> Self {
        self.atomic_writes = atomic_writes;
        self
    }

    /// Load a config from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        let config: CacheConfig = serde_json::from_str(&content)?;
        if config.root.as_os_str().is_empty() {
            return Err(Error::Config(format!(
                "{}: root must not be empty",
                path.display()
            )));
        }
        Ok(config)
    }

    /// Save the config as pretty JSON
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        CacheConfig::new(DEFAULT_ROOT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_builder() {
        let config = CacheConfig::new("/tmp/cache")
            .read_only(true)
            .atomic_writes(true);
        assert_eq!(config.root, PathBuf::from("/tmp/cache"));
        assert!(config.read_only);
        assert!(config.atomic_writes);
    }

    #[test]
    fn test_default_root() {
        let config = CacheConfig::default();
        assert_eq!(config.root, PathBuf::from(DEFAULT_ROOT));
        assert!(!config.read_only);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("modcache.json");

        let config = CacheConfig::new(dir.path().join("blobs")).read_only(true);
        config.save(&path).unwrap();

        let loaded = CacheConfig::load(&path).unwrap();
        assert_eq!(config, loaded);
    }

    #[test]
    fn test_load_defaults_flags() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("modcache.json");
        std::fs::write(&path, r#"{"root": "/srv/goproxy"}"#).unwrap();

        let loaded = CacheConfig::load(&path).unwrap();
        assert_eq!(loaded.root, PathBuf::from("/srv/goproxy"));
        assert!(!loaded.read_only);
        assert!(!loaded.atomic_writes);
    }

    #[test]
    fn test_load_rejects_empty_root() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("modcache.json");
        std::fs::write(&path, r#"{"root": ""}"#).unwrap();

        assert!(matches!(CacheConfig::load(&path), Err(Error::Config(_))));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempdir().unwrap();
        let err = CacheConfig::load(&dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
