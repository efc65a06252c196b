//! Cacher trait definition

use crate::model::Checksum;
use crate::store::CacheItem;
use crate::Result;
use std::io::Read;

/// Hash algorithm a cacher uses for item checksums
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HashAlgorithm {
    Md5,
}

impl HashAlgorithm {
    /// Start an incremental hasher matching `CacheItem::checksum`
    pub fn new_hasher(&self) -> Hasher {
        match self {
            HashAlgorithm::Md5 => Hasher(md5::Context::new()),
        }
    }

    /// Lowercase algorithm name, e.g. for CLI output
    pub fn name(&self) -> &'static str {
        match self {
            HashAlgorithm::Md5 => "md5",
        }
    }
}

/// Incremental checksum computation, e.g. while streaming an item to a client
pub struct Hasher(md5::Context);

impl Hasher {
    pub fn update(&mut self, data: &[u8]) {
        self.0.consume(data);
    }

    pub fn finalize(self) -> Checksum {
        self.0.compute().into()
    }
}

impl std::io::Write for Hasher {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.update(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

/// A named blob cache a module proxy reads from and writes to
///
/// Implementations:
/// - `FileCacher` stores blobs under a directory
/// - `MemoryCacher` keeps them in process, for tests and embedding
pub trait Cacher: Send + Sync {
    /// Algorithm behind `CacheItem::checksum`
    fn hash_algorithm(&self) -> HashAlgorithm {
        HashAlgorithm::Md5
    }

    /// Store everything `content` yields under `name`, replacing any prior blob
    ///
    /// The caller keeps ownership of `content`. A read-only cacher returns
    /// `Ok(())` without reading it.
    fn store(&self, name: &str, content: &mut dyn Read) -> Result<()>;

    /// Fetch the blob stored under `name`
    ///
    /// Returns `Error::NotFound` when nothing is stored there. The caller
    /// should `close` the item when done.
    fn fetch(&self, name: &str) -> Result<CacheItem>;

    /// Store an in-memory buffer
    fn store_bytes(&self, name: &str, content: &[u8]) -> Result<()> {
        let mut reader = content;
        self.store(name, &mut reader)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_hasher_matches_digest() {
        let mut hasher = HashAlgorithm::Md5.new_hasher();
        hasher.update(b"module ");
        hasher.write_all(b"example.com/m\n").unwrap();
        assert_eq!(
            hasher.finalize(),
            Checksum::digest(b"module example.com/m\n")
        );
    }

    #[test]
    fn test_algorithm_name() {
        assert_eq!(HashAlgorithm::Md5.name(), "md5");
    }
}
