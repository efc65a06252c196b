//! Filesystem-backed cacher
//!
//! Layout:
//! ```text
//! <root>/
//!   golang.org/x/text/@v/
//!     list
//!     v0.3.0.info
//!     v0.3.0.mod
//!     v0.3.0.zip
//! ```
//!
//! Each name is used verbatim as a path below the root. Nothing but the blob
//! itself is written; checksum, content type and size are derived on fetch.

use crate::config::CacheConfig;
use crate::store::{name, CacheItem, Cacher};
use crate::{Error, Result};
use bytes::Bytes;
use std::fs::{self, File};
use std::io::{self, Read};
use std::path::Path;
use tracing::{debug, trace};

/// Permissions for directories created on demand
#[cfg(unix)]
const DIR_MODE: u32 = 0o755;

/// Permissions for blobs written through a temporary file
#[cfg(unix)]
const FILE_MODE: u32 = 0o644;

/// A cacher storing each blob as a file under a root directory
#[derive(Debug, Clone)]
pub struct FileCacher {
    config: CacheConfig,
}

impl FileCacher {
    /// Create a cacher for the given configuration
    ///
    /// The root does not need to exist; it is created by the first store.
    pub fn new(config: CacheConfig) -> Self {
        FileCacher { config }
    }

    /// The configuration this cacher was built with
    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// The directory blobs are stored under
    pub fn root(&self) -> &Path {
        &self.config.root
    }

    fn write_in_place(&self, path: &Path, content: &mut dyn Read) -> Result<u64> {
        let mut file = File::create(path)?;
        let written = io::copy(content, &mut file)?;
        Ok(written)
    }

    fn write_atomic(&self, dir: &Path, path: &Path, content: &mut dyn Read) -> Result<u64> {
        let mut tmp = tempfile::Builder::new()
            .prefix(".modcache-")
            .suffix(".tmp")
            .tempfile_in(dir)?;
        let written = io::copy(content, &mut tmp)?;
        tmp.as_file().sync_all()?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            tmp.as_file()
                .set_permissions(fs::Permissions::from_mode(FILE_MODE))?;
        }

        tmp.persist(path).map_err(|e| Error::Io(e.error))?;
        Ok(written)
    }
}

impl Cacher for FileCacher {
    fn store(&self, name: &str, content: &mut dyn Read) -> Result<()> {
        if self.config.read_only {
            trace!("Read-only, skipping store of {}", name);
            return Ok(());
        }

        let path = name::resolve(&self.config.root, name)?;
        let dir = path.parent().unwrap_or(self.config.root.as_path());
        create_dir_all(dir)?;

        let written = if self.config.atomic_writes {
            self.write_atomic(dir, &path, content)?
        } else {
            self.write_in_place(&path, content)?
        };

        debug!("Stored {} ({} bytes)", name, written);
        Ok(())
    }

    fn fetch(&self, name: &str) -> Result<CacheItem> {
        let path = name::resolve(&self.config.root, name)?;

        let metadata = match fs::metadata(&path) {
            Ok(metadata) if metadata.is_file() => metadata,
            _ => return Err(Error::NotFound(name.to_string())),
        };

        let mut data = Vec::with_capacity(usize::try_from(metadata.len()).unwrap_or(0));
        {
            let mut file = File::open(&path)?;
            file.read_to_end(&mut data)?;
        }
        let mod_time = metadata.modified()?;

        debug!("Fetched {} ({} bytes)", name, data.len());
        Ok(CacheItem::new(name, Bytes::from(data), mod_time))
    }
}

fn create_dir_all(dir: &Path) -> io::Result<()> {
    let mut builder = fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(DIR_MODE);
    }
    builder.create(dir)
}
