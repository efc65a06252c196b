//! Error types for modcache

use thiserror::Error;

/// Result type alias for modcache operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in modcache operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Cache not found: {0}")]
    NotFound(String),

    #[error("Invalid cache name {name:?}: {reason}")]
    InvalidName { name: String, reason: &'static str },

    #[error("Config error: {0}")]
    Config(String),
}

impl Error {
    /// Whether the error means "nothing stored under this name"
    ///
    /// Callers use this to fall back to an upstream fetch instead of failing.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_is_distinct_from_io() {
        let missing = Error::NotFound("golang.org/x/text/@v/list".into());
        assert!(missing.is_not_found());

        let io = Error::from(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "no such file",
        ));
        assert!(!io.is_not_found());
    }

    #[test]
    fn test_invalid_name_display() {
        let err = Error::InvalidName {
            name: "../etc/passwd".into(),
            reason: "contains a parent directory segment",
        };
        let msg = err.to_string();
        assert!(msg.contains("../etc/passwd"));
        assert!(msg.contains("parent directory"));
    }
}
