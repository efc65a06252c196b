//! # modcache
//!
//! A filesystem cache backend for Go module proxies.
//!
//! A proxy stores what it produces (`.info`, `.mod`, `.zip`, version lists)
//! under hierarchical names and later fetches it back. modcache keeps each
//! blob as a plain file below a root directory and derives everything else
//! at read time.
//!
//! ## Core Concepts
//!
//! - **Cacher**: the pluggable store/fetch capability a proxy depends on
//! - **CacheItem**: a fetched blob, seekable, with size, content type,
//!   modification time and MD5 checksum
//! - **Read-only mode**: stores succeed without writing, for serving a
//!   pre-populated cache
//!
//! ## Example
//!
//! ```ignore
//! use modcache::{CacheConfig, Cacher, FileCacher};
//!
//! let cache = FileCacher::new(CacheConfig::new("/cache/download"));
//! cache.store_bytes("golang.org/x/text/@v/v0.3.0.mod", b"module golang.org/x/text\n")?;
//! let item = cache.fetch("golang.org/x/text/@v/v0.3.0.mod")?;
//! assert_eq!(item.mime_type(), "text/plain; charset=utf-8");
//! ```

pub mod config;
pub mod model;
pub mod store;

mod error;

pub use config::CacheConfig;
pub use error::{Error, Result};
pub use model::Checksum;
pub use store::{CacheItem, Cacher, FileCacher, HashAlgorithm, Hasher, MemoryCacher};
