//! Encrypted-at-rest cache for the single Tolino credential pair
//!
//! Every operation comes in two forms: a `try_` variant returning the tagged
//! error, and a plain variant that logs the failure and degrades to
//! "absent"/`false`.
//!
//! `has_credentials` only reads the in-memory record. It is refreshed by
//! `load` (which clears it when nothing usable is on disk) and by a
//! successful `save`.

use std::path::Path;
use tracing::{error, info};
use zeroize::Zeroizing;

use super::types::Credentials;
use crate::config::TolinoConfig;
use crate::crypto::{self, MasterKey};
use crate::error::{Result, TolinoError};
use crate::storage::{EncryptedFileStore, KeyFileStore};

/// Credential cache backed by a key file and a ciphertext file
#[derive(Debug)]
pub struct CredentialCache {
    key_store: KeyFileStore,
    store: EncryptedFileStore,
    key: Option<MasterKey>,
    credentials: Option<Credentials>,
}

impl CredentialCache {
    /// Create a cache over the given files without touching disk
    pub fn new(key_file: impl AsRef<Path>, credentials_file: impl AsRef<Path>) -> Self {
        Self {
            key_store: KeyFileStore::new(key_file.as_ref()),
            store: EncryptedFileStore::new(credentials_file.as_ref()),
            key: None,
            credentials: None,
        }
    }

    /// Create a cache over the configured files without touching disk
    pub fn from_config(config: &TolinoConfig) -> Self {
        Self::new(&config.key_file, &config.credentials_file)
    }

    /// Create a cache and prime it: obtain the key, then load credentials
    pub fn open(config: &TolinoConfig) -> Self {
        let mut cache = Self::from_config(config);
        cache.ensure_key();
        cache.load();
        cache
    }

    /// Path to the key file
    pub fn key_file(&self) -> &Path {
        self.key_store.path()
    }

    /// Path to the ciphertext file
    pub fn credentials_file(&self) -> &Path {
        self.store.path()
    }

    /// Return the key, reading or generating the key file if needed
    pub fn try_ensure_key(&mut self) -> Result<&MasterKey> {
        if self.key.is_none() {
            self.key = Some(self.key_store.load_or_generate()?);
        }
        self.key
            .as_ref()
            .ok_or_else(|| TolinoError::KeyUnavailable("key was not retained".to_string()))
    }

    /// Return the key, logging and yielding `None` on failure
    pub fn ensure_key(&mut self) -> Option<&MasterKey> {
        if let Err(e) = self.try_ensure_key().map(|_| ()) {
            error!(
                key_file = ?self.key_store.path(),
                error = %e,
                "Error loading/generating encryption key"
            );
            return None;
        }
        self.key.as_ref()
    }

    /// Reload the credential record from disk
    ///
    /// A missing credentials file yields `Ok(None)`. Never generates a key.
    pub fn try_load(&mut self) -> Result<Option<&Credentials>> {
        self.credentials = None;

        let Some(sealed) = self.store.read()? else {
            return Ok(None);
        };

        if self.key.is_none() {
            self.key = self.key_store.load()?;
        }
        let key = self.key.as_ref().ok_or_else(|| {
            TolinoError::KeyUnavailable(format!(
                "no key file at {:?} to decrypt {:?}",
                self.key_store.path(),
                self.store.path()
            ))
        })?;

        let plaintext = Zeroizing::new(crypto::open(&sealed, key)?);
        let credentials: Credentials =
            serde_json::from_slice(&plaintext).map_err(TolinoError::MalformedRecord)?;
        credentials
            .validate()
            .map_err(|e| TolinoError::MalformedRecord(serde::de::Error::custom(e)))?;

        info!("Loaded Tolino credentials");
        self.credentials = Some(credentials);
        Ok(self.credentials.as_ref())
    }

    /// Reload the credential record, logging failures and treating them as absent
    pub fn load(&mut self) -> Option<&Credentials> {
        if let Err(e) = self.try_load().map(|_| ()) {
            error!(
                credentials_file = ?self.store.path(),
                error = %e,
                "Error loading credentials"
            );
        }
        self.credentials.as_ref()
    }

    /// Encrypt and persist a new credential pair, replacing any previous one
    pub fn try_save(&mut self, username: &str, password: &str) -> Result<()> {
        let credentials = Credentials::new(username, password)?;

        self.try_ensure_key()?;
        let key = self
            .key
            .as_ref()
            .ok_or_else(|| TolinoError::KeyUnavailable("key was not retained".to_string()))?;

        let plaintext = Zeroizing::new(serde_json::to_vec(&credentials)?);
        let sealed = crypto::seal(&plaintext, key)?;
        self.store.write(&sealed)?;

        info!("Saved Tolino credentials");
        self.credentials = Some(credentials);
        Ok(())
    }

    /// Encrypt and persist a new credential pair; `true` only if every step succeeded
    pub fn save(&mut self, username: &str, password: &str) -> bool {
        match self.try_save(username, password) {
            Ok(()) => true,
            Err(e) => {
                error!(
                    credentials_file = ?self.store.path(),
                    error = %e,
                    "Error saving credentials"
                );
                false
            }
        }
    }

    /// Whether a complete credential pair is cached in memory
    pub fn has_credentials(&self) -> bool {
        self.credentials
            .as_ref()
            .map_or(false, |c| !c.username().is_empty() && !c.expose_password().is_empty())
    }

    /// The cached credential pair, if any
    pub fn credentials(&self) -> Option<&Credentials> {
        self.credentials.as_ref()
    }

    #[cfg(test)]
    fn forget_key(&mut self) {
        self.key = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn test_cache(dir: &TempDir) -> CredentialCache {
        CredentialCache::from_config(&TolinoConfig::in_dir(dir.path()))
    }

    #[test]
    fn test_empty_cache() {
        let temp_dir = TempDir::new().unwrap();
        let mut cache = test_cache(&temp_dir);

        assert!(!cache.has_credentials());
        assert!(cache.load().is_none());
        assert!(!cache.has_credentials());
        // load never creates a key
        assert!(!cache.key_file().exists());
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let mut cache = test_cache(&temp_dir);

        assert!(cache.save("reader@example.com", "Secr3t!"));
        assert!(cache.has_credentials());
        assert!(cache.key_file().exists());
        assert!(cache.credentials_file().exists());

        let loaded = cache.load().unwrap();
        assert_eq!(loaded.username(), "reader@example.com");
        assert_eq!(loaded.expose_password(), "Secr3t!");
    }

    #[test]
    fn test_file_holds_no_plaintext() {
        let temp_dir = TempDir::new().unwrap();
        let mut cache = test_cache(&temp_dir);
        assert!(cache.save("reader@example.com", "Secr3t!"));

        let raw = std::fs::read(cache.credentials_file()).unwrap();
        let haystack = String::from_utf8_lossy(&raw);
        assert!(!haystack.contains("reader@example.com"));
        assert!(!haystack.contains("Secr3t!"));
    }

    #[test]
    fn test_ensure_key_is_stable() {
        let temp_dir = TempDir::new().unwrap();
        let mut cache = test_cache(&temp_dir);

        let first = cache.ensure_key().unwrap().clone();
        cache.forget_key();
        let second = cache.ensure_key().unwrap().clone();

        assert_eq!(first, second);
    }

    #[test]
    fn test_save_overwrites_previous_pair() {
        let temp_dir = TempDir::new().unwrap();
        let mut cache = test_cache(&temp_dir);

        assert!(cache.save("old@example.com", "old"));
        assert!(cache.save("new@example.com", "new"));

        let loaded = cache.load().unwrap();
        assert_eq!(loaded.username(), "new@example.com");
        assert_eq!(loaded.expose_password(), "new");
    }

    #[test]
    fn test_save_rejects_empty_fields() {
        let temp_dir = TempDir::new().unwrap();
        let mut cache = test_cache(&temp_dir);

        assert!(!cache.save("", "pw"));
        assert!(!cache.save("reader@example.com", ""));
        assert!(matches!(
            cache.try_save("", ""),
            Err(TolinoError::InvalidCredentials(_))
        ));
        assert!(!cache.has_credentials());
        assert!(!cache.credentials_file().exists());
    }

    #[test]
    fn test_failed_save_keeps_previous_record() {
        let temp_dir = TempDir::new().unwrap();
        let blocker = temp_dir.path().join("blocker");
        std::fs::write(&blocker, b"x").unwrap();

        let mut cache = CredentialCache::new(
            temp_dir.path().join("encryption_key.bin"),
            blocker.join("tolino_credentials.enc"),
        );

        assert!(!cache.save("reader@example.com", "Secr3t!"));
        assert!(matches!(
            cache.try_save("reader@example.com", "Secr3t!"),
            Err(TolinoError::Storage { .. })
        ));
        assert!(!cache.has_credentials());
    }

    #[test]
    fn test_unwritable_key_path_fails_save() {
        let temp_dir = TempDir::new().unwrap();
        let blocker = temp_dir.path().join("blocker");
        std::fs::write(&blocker, b"x").unwrap();

        let mut cache = CredentialCache::new(
            blocker.join("encryption_key.bin"),
            temp_dir.path().join("tolino_credentials.enc"),
        );

        assert!(cache.ensure_key().is_none());
        assert!(!cache.save("reader@example.com", "Secr3t!"));
        assert!(!cache.credentials_file().exists());
    }

    #[test]
    fn test_tampered_file_is_absent() {
        let temp_dir = TempDir::new().unwrap();
        let mut cache = test_cache(&temp_dir);
        assert!(cache.save("reader@example.com", "Secr3t!"));

        let mut raw = std::fs::read(cache.credentials_file()).unwrap();
        let middle = raw.len() / 2;
        raw[middle] ^= 0x80;
        std::fs::write(cache.credentials_file(), &raw).unwrap();

        assert!(matches!(cache.try_load(), Err(TolinoError::Decryption(_))));
        assert!(cache.load().is_none());
        assert!(!cache.has_credentials());
    }

    #[test]
    fn test_missing_key_file_is_key_unavailable() {
        let temp_dir = TempDir::new().unwrap();
        let mut cache = test_cache(&temp_dir);
        assert!(cache.save("reader@example.com", "Secr3t!"));

        std::fs::remove_file(cache.key_file()).unwrap();
        cache.forget_key();

        let err = cache.try_load().unwrap_err();
        assert!(err.is_key_unavailable());
        assert!(!cache.has_credentials());
        assert!(!cache.key_file().exists());
    }

    #[test]
    fn test_malformed_record_is_absent() {
        let temp_dir = TempDir::new().unwrap();
        let mut cache = test_cache(&temp_dir);

        let key = cache.ensure_key().unwrap().clone();
        let sealed = crypto::seal(br#"{"user":"reader@example.com"}"#, &key).unwrap();
        std::fs::write(cache.credentials_file(), sealed).unwrap();

        assert!(matches!(cache.try_load(), Err(TolinoError::MalformedRecord(_))));
        assert!(cache.load().is_none());
    }

    #[test]
    fn test_record_with_empty_field_is_absent() {
        let temp_dir = TempDir::new().unwrap();
        let mut cache = test_cache(&temp_dir);

        let key = cache.ensure_key().unwrap().clone();
        let sealed =
            crypto::seal(br#"{"username":"reader@example.com","password":""}"#, &key).unwrap();
        std::fs::write(cache.credentials_file(), sealed).unwrap();

        assert!(matches!(cache.try_load(), Err(TolinoError::MalformedRecord(_))));
        assert!(!cache.has_credentials());
    }

    #[test]
    fn test_key_file_with_tmp_extension_survives_save() {
        let temp_dir = TempDir::new().unwrap();
        let key_path = temp_dir.path().join("tolino.tmp");
        let credentials_path = temp_dir.path().join("tolino.enc");

        let mut cache = CredentialCache::new(&key_path, &credentials_path);
        let key = cache.ensure_key().unwrap().clone();
        assert!(cache.save("reader@example.com", "Secr3t!"));
        assert_eq!(std::fs::read(&key_path).unwrap(), key.as_bytes());

        let mut reopened = CredentialCache::new(&key_path, &credentials_path);
        let loaded = reopened.try_load().unwrap().unwrap();
        assert_eq!(loaded.username(), "reader@example.com");
        assert_eq!(loaded.expose_password(), "Secr3t!");
    }

    #[test]
    fn test_deleted_file_keeps_memory_until_reload() {
        let temp_dir = TempDir::new().unwrap();
        let mut cache = test_cache(&temp_dir);

        assert!(cache.save("reader@example.com", "Secr3t!"));
        std::fs::remove_file(cache.credentials_file()).unwrap();

        // In-memory record survives until the next explicit load
        assert!(cache.has_credentials());
        assert_eq!(cache.credentials().unwrap().username(), "reader@example.com");

        assert!(cache.load().is_none());
        assert!(!cache.has_credentials());
    }
}
