//! Key file storage
//!
//! Holds the raw symmetric key (32 bytes, no header). The key is generated
//! once and reused; replacing it orphans anything encrypted under the old one.

use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::file_ops::{read_optional, write_atomic};
use crate::crypto::MasterKey;
use crate::error::{Result, TolinoError};

/// File-backed store for the symmetric key
#[derive(Debug, Clone)]
pub struct KeyFileStore {
    path: PathBuf,
}

impl KeyFileStore {
    /// Create a store for the key at `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path to the key file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Check if a key file is present
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Read the persisted key without generating one
    pub fn load(&self) -> Result<Option<MasterKey>> {
        let Some(bytes) = read_optional(&self.path)? else {
            debug!("No key file at {:?}", self.path);
            return Ok(None);
        };

        let key = MasterKey::from_slice(&bytes).ok_or_else(|| TolinoError::InvalidKey {
            path: self.path.clone(),
            len: bytes.len(),
        })?;

        debug!("Loaded encryption key from {:?}", self.path);
        Ok(Some(key))
    }

    /// Read the persisted key, generating and persisting a new one if absent
    pub fn load_or_generate(&self) -> Result<MasterKey> {
        if let Some(key) = self.load()? {
            return Ok(key);
        }

        let key = MasterKey::generate()?;
        write_atomic(&self.path, key.as_bytes())?;

        info!("Generated new encryption key at {:?}", self.path);
        Ok(key)
    }
}
