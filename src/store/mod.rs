//! Named blob storage for module proxies
//!
//! This module implements the cache layer a module proxy plugs in. Blobs are
//! stored by name; checksum and content type are derived every time an item
//! is fetched, never persisted.

mod file_store;
mod item;
mod memory;
pub mod mime;
pub mod name;
mod traits;

pub use file_store::FileCacher;
pub use item::CacheItem;
pub use memory::MemoryCacher;
pub use traits::{Cacher, HashAlgorithm, Hasher};
