//! AES-256-GCM authenticated encryption
//!
//! Sealed format (binary, no header): `nonce || ciphertext || auth_tag`
//! - Nonce: 12 bytes (96 bits) - standard for GCM
//! - Ciphertext: variable length
//! - Auth tag: 16 bytes (128 bits)

use aes_gcm::{
    aead::{Aead, KeyInit},
    Aes256Gcm, Nonce,
};
use rand::{rngs::OsRng, RngCore};

use super::MasterKey;
use crate::error::{Result, TolinoError};

const NONCE_LEN: usize = 12;
const TAG_LEN: usize = 16;

/// Encrypted data with nonce and auth tag
#[derive(Debug, Clone)]
pub struct EncryptedData {
    /// Nonce (12 bytes for GCM)
    pub nonce: [u8; NONCE_LEN],
    /// Authentication tag (16 bytes)
    pub auth_tag: [u8; TAG_LEN],
    /// Encrypted ciphertext
    pub ciphertext: Vec<u8>,
}

impl EncryptedData {
    /// Serialize into the on-disk layout
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(NONCE_LEN + self.ciphertext.len() + TAG_LEN);
        out.extend_from_slice(&self.nonce);
        out.extend_from_slice(&self.ciphertext);
        out.extend_from_slice(&self.auth_tag);
        out
    }

    /// Parse from the on-disk layout
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < NONCE_LEN + TAG_LEN {
            return Err(TolinoError::Decryption(format!(
                "Sealed data too short: expected at least {} bytes, got {}",
                NONCE_LEN + TAG_LEN,
                bytes.len()
            )));
        }

        let tag_start = bytes.len() - TAG_LEN;

        let mut nonce = [0u8; NONCE_LEN];
        nonce.copy_from_slice(&bytes[..NONCE_LEN]);

        let mut auth_tag = [0u8; TAG_LEN];
        auth_tag.copy_from_slice(&bytes[tag_start..]);

        Ok(Self {
            nonce,
            auth_tag,
            ciphertext: bytes[NONCE_LEN..tag_start].to_vec(),
        })
    }
}

/// Encrypt plaintext using AES-256-GCM with a random nonce
pub fn encrypt(plaintext: &[u8], key: &MasterKey) -> Result<EncryptedData> {
    let cipher = Aes256Gcm::new_from_slice(key.as_bytes())
        .map_err(|e| TolinoError::Encryption(e.to_string()))?;

    let mut nonce = [0u8; NONCE_LEN];
    OsRng
        .try_fill_bytes(&mut nonce)
        .map_err(|e| TolinoError::Entropy(e.to_string()))?;

    // aes-gcm appends the auth tag to the ciphertext
    let ciphertext_with_tag = cipher
        .encrypt(Nonce::from_slice(&nonce), plaintext)
        .map_err(|e| TolinoError::Encryption(e.to_string()))?;

    if ciphertext_with_tag.len() < TAG_LEN {
        return Err(TolinoError::Encryption("Ciphertext too short".to_string()));
    }

    let tag_start = ciphertext_with_tag.len() - TAG_LEN;
    let mut auth_tag = [0u8; TAG_LEN];
    auth_tag.copy_from_slice(&ciphertext_with_tag[tag_start..]);

    Ok(EncryptedData {
        nonce,
        auth_tag,
        ciphertext: ciphertext_with_tag[..tag_start].to_vec(),
    })
}

/// Decrypt and authenticate sealed data using AES-256-GCM
pub fn decrypt(encrypted: &EncryptedData, key: &MasterKey) -> Result<Vec<u8>> {
    let cipher = Aes256Gcm::new_from_slice(key.as_bytes())
        .map_err(|e| TolinoError::Decryption(e.to_string()))?;

    let mut ciphertext_with_tag = encrypted.ciphertext.clone();
    ciphertext_with_tag.extend_from_slice(&encrypted.auth_tag);

    cipher
        .decrypt(Nonce::from_slice(&encrypted.nonce), ciphertext_with_tag.as_slice())
        .map_err(|_| TolinoError::Decryption("authentication tag mismatch".to_string()))
}

/// Encrypt and serialize in one step
pub fn seal(plaintext: &[u8], key: &MasterKey) -> Result<Vec<u8>> {
    Ok(encrypt(plaintext, key)?.to_bytes())
}

/// Parse and decrypt in one step
pub fn open(sealed: &[u8], key: &MasterKey) -> Result<Vec<u8>> {
    decrypt(&EncryptedData::from_bytes(sealed)?, key)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_key() -> MasterKey {
        MasterKey::generate().unwrap()
    }

    #[test]
    fn test_seal_open_roundtrip() {
        let key = test_key();
        let plaintext = br#"{"username":"reader@example.com","password":"Secr3t!"}"#;

        let sealed = seal(plaintext, &key).unwrap();
        assert_eq!(sealed.len(), plaintext.len() + NONCE_LEN + TAG_LEN);

        let opened = open(&sealed, &key).unwrap();
        assert_eq!(opened, plaintext);
    }

    #[test]
    fn test_sealed_layout() {
        let key = test_key();
        let encrypted = encrypt(b"layout", &key).unwrap();
        let bytes = encrypted.to_bytes();

        assert_eq!(&bytes[..NONCE_LEN], &encrypted.nonce);
        assert_eq!(&bytes[bytes.len() - TAG_LEN..], &encrypted.auth_tag);

        let parsed = EncryptedData::from_bytes(&bytes).unwrap();
        assert_eq!(parsed.ciphertext, encrypted.ciphertext);
    }

    #[test]
    fn test_different_nonces_produce_different_ciphertext() {
        let key = test_key();
        let plaintext = b"same plaintext";

        let first = encrypt(plaintext, &key).unwrap();
        let second = encrypt(plaintext, &key).unwrap();

        assert_ne!(first.nonce, second.nonce);
        assert_ne!(first.ciphertext, second.ciphertext);
    }

    #[test]
    fn test_wrong_key_fails_decryption() {
        let sealed = seal(b"secret data", &test_key()).unwrap();
        let result = open(&sealed, &test_key());
        assert!(matches!(result, Err(TolinoError::Decryption(_))));
    }

    #[test]
    fn test_every_flipped_byte_is_detected() {
        let key = test_key();
        let sealed = seal(b"secret data", &key).unwrap();

        for i in 0..sealed.len() {
            let mut tampered = sealed.clone();
            tampered[i] ^= 0x01;
            assert!(open(&tampered, &key).is_err(), "byte {} tamper undetected", i);
        }
    }

    #[test]
    fn test_truncated_input_is_rejected() {
        assert!(EncryptedData::from_bytes(&[]).is_err());
        assert!(EncryptedData::from_bytes(&[0u8; NONCE_LEN + TAG_LEN - 1]).is_err());
        assert!(EncryptedData::from_bytes(&[0u8; NONCE_LEN + TAG_LEN]).is_ok());
    }
}
