use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use rand::Rng;

/// Disk-backed store for uploaded file blobs. Stored names carry a random
/// prefix so distinct uploads of the same file name never collide.
#[derive(Debug, Clone)]
pub struct BlobStore {
    root: PathBuf,
}

/// Strip path separators and anything outside a safe character set from a
/// client-supplied file name.
pub fn sanitize_file_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    let trimmed = cleaned.trim_matches('.').to_string();
    if trimmed.is_empty() {
        "file".to_string()
    } else {
        trimmed
    }
}

impl BlobStore {
    pub fn new(root: impl Into<PathBuf>) -> io::Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(BlobStore { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Write a blob and return its stored name.
    pub fn store(&self, original_name: &str, bytes: &[u8]) -> io::Result<String> {
        let mut rng = rand::rng();
        let prefix: [u8; 6] = rng.random();
        let stored_name = format!("{}_{}", hex::encode(prefix), sanitize_file_name(original_name));
        fs::write(self.root.join(&stored_name), bytes)?;
        Ok(stored_name)
    }

    /// Remove a blob. Only names produced by store() resolve; anything with
    /// a path separator is rejected.
    pub fn delete(&self, stored_name: &str) -> io::Result<()> {
        if stored_name.contains('/') || stored_name.contains('\\') || stored_name.contains("..") {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "invalid stored name",
            ));
        }
        fs::remove_file(self.root.join(stored_name))
    }
}
