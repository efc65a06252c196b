//! Cache name validation
//!
//! Names are `/`-separated relative paths such as
//! `golang.org/x/text/@v/v0.3.0.zip`. They are mapped verbatim under the
//! cache root, so anything that could climb out of it is rejected.

use crate::{Error, Result};
use std::path::{Path, PathBuf};

/// Check that `name` is a well-formed relative cache name
pub fn validate(name: &str) -> Result<()> {
    let reject = |reason| {
        Err(Error::InvalidName {
            name: name.to_string(),
            reason,
        })
    };

    if name.is_empty() {
        return reject("name is empty");
    }
    if name.starts_with('/') {
        return reject("name must be relative");
    }
    if name.contains('\0') {
        return reject("name contains a NUL byte");
    }
    if name.contains('\\') {
        return reject("name contains a backslash");
    }

    for segment in name.split('/') {
        match segment {
            "" => return reject("name contains an empty segment"),
            "." => return reject("name contains a current directory segment"),
            ".." => return reject("name contains a parent directory segment"),
            _ => {}
        }
    }

    Ok(())
}

/// Validate `name` and join it onto `root`
pub fn resolve(root: &Path, name: &str) -> Result<PathBuf> {
    validate(name)?;
    Ok(name.split('/').fold(root.to_path_buf(), |path, segment| path.join(segment)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_names() {
        for name in [
            "golang.org/x/text/@v/list",
            "golang.org/x/text/@v/v0.3.0.info",
            "github.com/!azure/azure-sdk-for-go/@v/v1.0.0.zip",
            "single",
            "a/..b/c..",
        ] {
            assert!(validate(name).is_ok(), "{} should be valid", name);
        }
    }

    #[test]
    fn test_invalid_names() {
        for name in [
            "",
            "/etc/passwd",
            "../escape",
            "a/../../escape",
            "a/./b",
            "a//b",
            "trailing/",
            "a\\b",
            "nul\0byte",
        ] {
            let err = validate(name).unwrap_err();
            assert!(
                matches!(err, Error::InvalidName { .. }),
                "{:?} should be rejected",
                name
            );
        }
    }

    #[test]
    fn test_resolve_joins_segments() {
        let path = resolve(Path::new("/cache"), "example.com/m/@v/v1.0.0.mod").unwrap();
        assert_eq!(path, PathBuf::from("/cache/example.com/m/@v/v1.0.0.mod"));
        assert!(path.starts_with("/cache"));
    }
}
