//! Encrypted credentials file
//!
//! The entire file is one sealed blob; there is no plaintext header. Writes
//! replace the whole file.

use std::path::{Path, PathBuf};
use tracing::debug;

use super::file_ops::{read_optional, write_atomic};
use crate::error::Result;

/// Whole-file ciphertext store
#[derive(Debug, Clone)]
pub struct EncryptedFileStore {
    path: PathBuf,
}

impl EncryptedFileStore {
    /// Create a store for the ciphertext at `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path to the ciphertext file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Check if the ciphertext file is present
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Read the sealed bytes, or `None` if nothing has been written
    pub fn read(&self) -> Result<Option<Vec<u8>>> {
        let data = read_optional(&self.path)?;
        match &data {
            Some(bytes) => debug!("Read {} sealed bytes from {:?}", bytes.len(), self.path),
            None => debug!("No credentials file at {:?}", self.path),
        }
        Ok(data)
    }

    /// Replace the file with new sealed bytes
    pub fn write(&self, sealed: &[u8]) -> Result<()> {
        write_atomic(&self.path, sealed)?;
        debug!("Wrote {} sealed bytes to {:?}", sealed.len(), self.path);
        Ok(())
    }
}
