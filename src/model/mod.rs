//! Value types shared by the cache backends

mod checksum;

pub use checksum::Checksum;
