//! In-memory cacher
//!
//! Behaves like `FileCacher` (same name rules, same read-only semantics) but
//! keeps blobs in a map. Useful for tests of code built on `Cacher`, and for
//! short-lived proxies that do not need persistence.

use crate::config::CacheConfig;
use crate::store::{name, CacheItem, Cacher};
use crate::{Error, Result};
use bytes::Bytes;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::io::Read;
use std::time::SystemTime;
use tracing::{debug, trace};

#[derive(Debug, Clone)]
struct Entry {
    content: Bytes,
    mod_time: SystemTime,
}

/// A cacher holding every blob in process memory
#[derive(Debug, Default)]
pub struct MemoryCacher {
    read_only: bool,
    entries: RwLock<HashMap<String, Entry>>,
}

impl MemoryCacher {
    /// Create an empty, writable cacher
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a cacher honouring the read-only flag of `config`
    ///
    /// The root is ignored.
    pub fn with_config(config: &CacheConfig) -> Self {
        MemoryCacher {
            read_only: config.read_only,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Seed a blob, bypassing read-only mode
    ///
    /// Stands in for a cache populated before the proxy starts.
    pub fn preload(&self, name: &str, content: impl Into<Bytes>) -> Result<()> {
        name::validate(name)?;
        self.insert(name, content.into());
        Ok(())
    }

    /// Number of stored blobs
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    fn insert(&self, name: &str, content: Bytes) {
        let entry = Entry {
            content,
            mod_time: SystemTime::now(),
        };
        self.entries.write().insert(name.to_string(), entry);
    }
}

impl Cacher for MemoryCacher {
    fn store(&self, name: &str, content: &mut dyn Read) -> Result<()> {
        if self.read_only {
            trace!("Read-only, skipping store of {}", name);
            return Ok(());
        }
        name::validate(name)?;

        // Read fully before taking the lock so a slow stream never blocks fetches
        let mut data = Vec::new();
        content.read_to_end(&mut data)?;
        debug!("Stored {} ({} bytes) in memory", name, data.len());
        self.insert(name, Bytes::from(data));
        Ok(())
    }

    fn fetch(&self, name: &str) -> Result<CacheItem> {
        name::validate(name)?;
        let entry = {
            let entries = self.entries.read();
            entries.get(name).cloned()
        };
        let entry = entry.ok_or_else(|| Error::NotFound(name.to_string()))?;
        Ok(CacheItem::new(name, entry.content, entry.mod_time))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Checksum;

    #[test]
    fn test_store_and_fetch() {
        let cache = MemoryCacher::new();
        cache.store_bytes("m/@v/v1.0.0.zip", b"PK\x03\x04").unwrap();

        let mut item = cache.fetch("m/@v/v1.0.0.zip").unwrap();
        let mut data = Vec::new();
        item.read_to_end(&mut data).unwrap();

        assert_eq!(data, b"PK\x03\x04");
        assert_eq!(item.mime_type(), "application/zip");
        assert_eq!(item.checksum(), Checksum::digest(&data));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_missing_is_not_found() {
        let cache = MemoryCacher::new();
        assert!(cache.is_empty());
        assert!(cache.fetch("m/@v/list").unwrap_err().is_not_found());
    }

    #[test]
    fn test_read_only() {
        let config = CacheConfig::new("/unused").read_only(true);
        let cache = MemoryCacher::with_config(&config);

        cache.store_bytes("m/@v/v1.0.0.info", b"{}").unwrap();
        assert!(cache.fetch("m/@v/v1.0.0.info").unwrap_err().is_not_found());

        cache.preload("m/@v/v1.0.0.info", &b"{\"Version\":\"v1.0.0\"}"[..]).unwrap();
        cache.store_bytes("m/@v/v1.0.0.info", b"{}").unwrap();
        assert_eq!(cache.fetch("m/@v/v1.0.0.info").unwrap().size(), 20);
    }

    #[test]
    fn test_overwrite() {
        let cache = MemoryCacher::new();
        cache.store_bytes("m/@v/list", b"v1.0.0\n").unwrap();
        cache.store_bytes("m/@v/list", b"v1.0.0\nv1.1.0\n").unwrap();

        let item = cache.fetch("m/@v/list").unwrap();
        assert_eq!(item.content().as_ref(), b"v1.0.0\nv1.1.0\n");
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_invalid_name() {
        let cache = MemoryCacher::new();
        assert!(matches!(
            cache.store_bytes("../x", b"x"),
            Err(Error::InvalidName { .. })
        ));
        assert!(cache.preload("", &b"x"[..]).is_err());
    }

    #[test]
    fn test_usable_as_trait_object() {
        let cache: Box<dyn Cacher> = Box::new(MemoryCacher::new());
        cache.store_bytes("m/@v/v1.0.0.mod", b"module m\n").unwrap();
        assert_eq!(cache.fetch("m/@v/v1.0.0.mod").unwrap().size(), 9);
    }
}
