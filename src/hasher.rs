//! Streaming content hashing for monitored files.

use crate::error::HashError;
use crate::types::Digest;
use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::Path;

/// Files are read in fixed-size chunks so memory use is independent of
/// file size.
const CHUNK_SIZE: usize = 8192;

/// Compute the BLAKE3 digest of the file at `path`, hex-encoded lowercase.
///
/// A file that vanished between listing and reading surfaces as
/// [`HashError::NotFound`]; a locked or unreadable file as
/// [`HashError::Io`]. The descriptor is scoped to this call and released
/// on every exit path.
pub fn hash_file(path: &Path) -> Result<Digest, HashError> {
    let map_err = |source: std::io::Error| match source.kind() {
        ErrorKind::NotFound => HashError::NotFound(path.to_path_buf()),
        _ => HashError::Io {
            path: path.to_path_buf(),
            source,
        },
    };

    let mut file = File::open(path).map_err(map_err)?;
    let mut hasher = blake3::Hasher::new();
    let mut chunk = [0u8; CHUNK_SIZE];
    loop {
        let read = file.read(&mut chunk).map_err(map_err)?;
        if read == 0 {
            break;
        }
        hasher.update(&chunk[..read]);
    }
    Ok(hasher.finalize().to_hex().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn digest_is_64_lowercase_hex_chars() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("a.txt");
        fs::write(&path, b"hello").unwrap();

        let digest = hash_file(&path).unwrap();
        assert_eq!(digest.len(), 64);
        assert!(digest.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn digest_is_stable_for_identical_content() {
        let temp = tempfile::tempdir().unwrap();
        let first = temp.path().join("first.bin");
        let second = temp.path().join("second.bin");
        fs::write(&first, b"same bytes").unwrap();
        fs::write(&second, b"same bytes").unwrap();

        assert_eq!(hash_file(&first).unwrap(), hash_file(&second).unwrap());
    }

    #[test]
    fn digest_changes_with_content() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("a.txt");
        fs::write(&path, b"before").unwrap();
        let before = hash_file(&path).unwrap();
        fs::write(&path, b"after").unwrap();
        let after = hash_file(&path).unwrap();

        assert_ne!(before, after);
    }

    #[test]
    fn content_larger_than_one_chunk_hashes_like_whole_file() {
        let temp = tempfile::tempdir().unwrap();
        let big = temp.path().join("big.bin");
        let copy = temp.path().join("copy.bin");
        let content = vec![0xabu8; CHUNK_SIZE * 3 + 17];
        fs::write(&big, &content).unwrap();
        fs::write(&copy, &content).unwrap();

        assert_eq!(hash_file(&big).unwrap(), hash_file(&copy).unwrap());
    }

    #[test]
    fn missing_file_is_distinguishable_from_read_failure() {
        let temp = tempfile::tempdir().unwrap();
        let missing = temp.path().join("gone.txt");

        match hash_file(&missing) {
            Err(HashError::NotFound(path)) => assert_eq!(path, missing),
            other => panic!("expected NotFound, got {:?}", other),
        }
    }
}
