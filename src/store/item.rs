//! Cache item - the handle returned by a fetch

use crate::model::Checksum;
use crate::store::mime::mime_type;
use bytes::Bytes;
use std::io::{self, Cursor, Read, Seek, SeekFrom};
use std::time::SystemTime;

/// A fetched blob with its derived metadata
///
/// The whole content is held in memory, so `size` and `checksum` always
/// describe exactly the bytes a reader gets back.
#[derive(Debug)]
pub struct CacheItem {
    reader: Cursor<Bytes>,
    name: String,
    mime_type: String,
    mod_time: SystemTime,
    checksum: Checksum,
    closed: bool,
}

impl CacheItem {
    /// Build an item over `content`, computing its checksum and content type
    pub fn new(name: impl Into<String>, content: Bytes, mod_time: SystemTime) -> Self {
        let name = name.into();
        let checksum = Checksum::digest(&content);
        let mime_type = mime_type(&name);
        CacheItem {
            reader: Cursor::new(content),
            name,
            mime_type,
            mod_time,
            checksum,
            closed: false,
        }
    }

    /// The name the item was fetched under
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Content type inferred from the name
    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    /// Total content length in bytes
    pub fn size(&self) -> u64 {
        self.reader.get_ref().len() as u64
    }

    /// Filesystem modification time of the blob
    pub fn mod_time(&self) -> SystemTime {
        self.mod_time
    }

    /// MD5 over the full content
    pub fn checksum(&self) -> Checksum {
        self.checksum
    }

    /// The full content, independent of the read position
    pub fn content(&self) -> &Bytes {
        self.reader.get_ref()
    }

    /// Release the item
    ///
    /// Nothing is held open past the fetch, so this only marks the item as
    /// closed; further reads fail. Calling it twice is fine.
    pub fn close(&mut self) -> io::Result<()> {
        self.closed = true;
        Ok(())
    }

    fn ensure_open(&self) -> io::Result<()> {
        if self.closed {
            return Err(io::Error::new(
                io::ErrorKind::Other,
                format!("cache item {} is closed", self.name),
            ));
        }
        Ok(())
    }
}

impl Read for CacheItem {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.ensure_open()?;
        self.reader.read(buf)
    }
}

impl Seek for CacheItem {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        self.ensure_open()?;
        self.reader.seek(pos)
    }
}
