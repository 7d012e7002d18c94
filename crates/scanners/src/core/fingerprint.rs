use anyhow::{Context, Result};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::Path;
use walkdir::WalkDir;

/// Hashes every file's bytes into one incremental SHA-256 and returns the
/// hex digest. The walk is sorted by file name so the digest is stable for
/// a fixed tree; it is a content digest, not an order-independent manifest.
pub fn fingerprint_project(dir: &Path) -> Result<String> {
    let mut hasher = Sha256::new();

    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry.context("walking project tree")?;
        if !entry.file_type().is_file() {
            continue;
        }
        let bytes = fs::read(entry.path())
            .with_context(|| format!("reading {}", entry.path().display()))?;
        hasher.update(&bytes);
    }

    Ok(hex::encode(hasher.finalize()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn digest_is_deterministic_for_fixed_content() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.py"), "print('hello')").unwrap();
        fs::write(dir.path().join("b.py"), "print('world')").unwrap();

        let first = fingerprint_project(dir.path()).unwrap();
        let second = fingerprint_project(dir.path()).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.len(), 64);
    }

    #[test]
    fn digest_changes_with_content() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.py"), "v1").unwrap();
        let before = fingerprint_project(dir.path()).unwrap();

        fs::write(dir.path().join("a.py"), "v2").unwrap();
        let after = fingerprint_project(dir.path()).unwrap();
        assert_ne!(before, after);
    }

    #[test]
    fn nested_files_contribute() {
        let dir = TempDir::new().unwrap();
        let empty = fingerprint_project(dir.path()).unwrap();

        let nested = dir.path().join("deep").join("deeper");
        fs::create_dir_all(&nested).unwrap();
        fs::write(nested.join("leaf.rb"), "puts 1").unwrap();

        assert_ne!(fingerprint_project(dir.path()).unwrap(), empty);
    }
}
