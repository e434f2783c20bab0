//! Non-mutating metadata probes over staged payloads.

use sha2::{Digest, Sha256};
use std::path::Path;

/// Compute SHA-256 of a file at `path`, returning a lowercase hex string.
/// Returns `None` when the file cannot be read; integrity recording is
/// best-effort and never fails a run.
pub fn sha256_hex_of(path: &Path) -> Option<String> {
    let mut f = std::fs::File::open(path).ok()?;
    let mut hasher = Sha256::new();
    std::io::copy(&mut f, &mut hasher).ok()?;
    let out = hasher.finalize();
    Some(hex::encode(out))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_digest() {
        let t = tempfile::tempdir().unwrap();
        let p = t.path().join("f");
        std::fs::write(&p, b"abc").unwrap();
        assert_eq!(
            sha256_hex_of(&p).unwrap(),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn unreadable_is_none() {
        let t = tempfile::tempdir().unwrap();
        assert!(sha256_hex_of(&t.path().join("missing")).is_none());
    }
}
