//! Content fingerprints for drift detection
//!
//! A SHA-256 digest of a marker file's bytes. Comparison fails closed: if
//! either file cannot be read the two are reported as different, so the
//! user is prompted to re-sync.

use crate::error::Result;
use sha2::{Digest, Sha256};
use std::fmt;
use std::path::Path;
use tracing::debug;

/// Digest of a file's contents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fingerprint([u8; 32]);

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

/// Fingerprint the contents of `path`
pub fn fingerprint(path: &Path) -> Result<Fingerprint> {
    let bytes = std::fs::read(path)?;
    Ok(Fingerprint(Sha256::digest(&bytes).into()))
}

/// Whether both files have identical contents; `false` if either is unreadable
pub fn identical(a: &Path, b: &Path) -> bool {
    match (fingerprint(a), fingerprint(b)) {
        (Ok(left), Ok(right)) => left == right,
        (Err(e), _) | (_, Err(e)) => {
            debug!(
                "Cannot compare {} with {}: {e}",
                a.display(),
                b.display()
            );
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::create_test_dir;

    #[test]
    fn test_identical_files() {
        let dir = create_test_dir();
        let a = dir.path().join("a.app");
        let b = dir.path().join("b.app");
        std::fs::write(&a, r#"{"appName":"Foo"}"#).unwrap();
        std::fs::write(&b, r#"{"appName":"Foo"}"#).unwrap();
        assert!(identical(&a, &b));
    }

    #[test]
    fn test_one_byte_difference() {
        let dir = create_test_dir();
        let a = dir.path().join("a.app");
        let b = dir.path().join("b.app");
        std::fs::write(&a, r#"{"appName":"Foo"}"#).unwrap();
        std::fs::write(&b, r#"{"appName":"Fop"}"#).unwrap();
        assert!(!identical(&a, &b));
    }

    #[test]
    fn test_unreadable_fails_closed() {
        let dir = create_test_dir();
        let a = dir.path().join("a.app");
        std::fs::write(&a, "x").unwrap();
        assert!(!identical(&a, &dir.path().join("missing.app")));
        assert!(!identical(&dir.path().join("missing.app"), &dir.path().join("missing.app")));
    }

    #[test]
    fn test_fingerprint_renders_as_hex() {
        let dir = create_test_dir();
        let a = dir.path().join("a.app");
        std::fs::write(&a, "").unwrap();
        assert_eq!(
            fingerprint(&a).unwrap().to_string(),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }
}
