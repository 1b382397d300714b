//! SHA-256 checksum utilities
//!
//! Document fingerprints use the canonical `sha256:<hex>` format.

use sha2::{Digest, Sha256};

/// Prefix for all checksums produced by this module
const PREFIX: &str = "sha256:";

/// Fingerprint a document from its components' raw host text.
///
/// Each component contributes `name + ":" + raw_body`, in the order the host
/// enumerates them. The fingerprint is only compared for equality, so the
/// digest needs to be stable, not secret.
pub fn fingerprint<'a, I>(components: I) -> String
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let mut hasher = Sha256::new();
    for (name, body) in components {
        hasher.update(name.as_bytes());
        hasher.update(b":");
        hasher.update(body.as_bytes());
    }
    format!("{}{:x}", PREFIX, hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sha256(content: &str) -> String {
        format!("{}{:x}", PREFIX, Sha256::digest(content.as_bytes()))
    }

    #[test]
    fn fingerprint_matches_concatenation() {
        let fp = fingerprint([("A", "x"), ("B", "y")]);
        assert_eq!(fp, sha256("A:xB:y"));
    }

    #[test]
    fn fingerprint_has_prefix() {
        assert!(fingerprint([("Module1", "x")]).starts_with("sha256:"));
    }

    #[test]
    fn fingerprint_is_deterministic() {
        let parts = [("Module1", "Sub A()\nEnd Sub\n")];
        assert_eq!(fingerprint(parts), fingerprint(parts));
    }

    #[test]
    fn fingerprint_changes_with_body() {
        let a = fingerprint([("Module1", "Sub A()\nEnd Sub\n")]);
        let b = fingerprint([("Module1", "Sub B()\nEnd Sub\n")]);
        assert_ne!(a, b);
    }

    #[test]
    fn fingerprint_changes_with_name() {
        let a = fingerprint([("Module1", "x")]);
        let b = fingerprint([("Module2", "x")]);
        assert_ne!(a, b);
    }

    #[test]
    fn empty_document_has_stable_fingerprint() {
        let empty: [(&str, &str); 0] = [];
        assert_eq!(fingerprint(empty), sha256(""));
    }
}
