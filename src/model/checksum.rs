//! Integrity checksum type using MD5

use serde::{Deserialize, Serialize};
use std::fmt;

/// A 16-byte MD5 digest over the full content of a cached blob
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Checksum([u8; 16]);

impl Checksum {
    /// Digest length in bytes
    pub const LEN: usize = 16;

    /// Create a checksum from raw bytes
    pub fn from_bytes(bytes: [u8; 16]) -> Self {
        Checksum(bytes)
    }

    /// Checksum arbitrary data
    pub fn digest(data: &[u8]) -> Self {
        Checksum(md5::compute(data).0)
    }

    /// Get the raw bytes
    pub fn as_bytes(&self) -> &[u8; 16] {
        &self.0
    }

    /// Convert to lowercase hex string
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parse from hex string
    pub fn from_hex(s: &str) -> Result<Self, hex::FromHexError> {
        let bytes = hex::decode(s)?;
        if bytes.len() != Self::LEN {
            return Err(hex::FromHexError::InvalidStringLength);
        }
        let mut arr = [0u8; 16];
        arr.copy_from_slice(&bytes);
        Ok(Checksum(arr))
    }
}

impl fmt::Display for Checksum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl fmt::Debug for Checksum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Checksum({})", self.to_hex())
    }
}

impl AsRef<[u8]> for Checksum {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<md5::Digest> for Checksum {
    fn from(digest: md5::Digest) -> Self {
        Checksum(digest.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checksum_known_vectors() {
        assert_eq!(
            Checksum::digest(b"").to_hex(),
            "d41d8cd98f00b204e9800998ecf8427e"
        );
        assert_eq!(
            Checksum::digest(b"hello world").to_hex(),
            "5eb63bbbe01eeed093cb22bb8f5acdc3"
        );
    }

    #[test]
    fn test_checksum_hex_parse() {
        let c = Checksum::digest(b"module golang.org/x/text\n");
        assert_eq!(Checksum::from_hex(&c.to_hex()).unwrap(), c);
        assert!(Checksum::from_hex("abcd").is_err());
        assert!(Checksum::from_hex("not hex at all, definitely").is_err());
    }

    #[test]
    fn test_checksum_is_raw_bytes() {
        let c = Checksum::digest(b"data");
        assert_eq!(c.as_bytes().len(), Checksum::LEN);
        assert_eq!(c.as_ref(), &md5::compute(b"data").0[..]);
    }
}
