//! Cryptographic primitives for the credential cache
//!
//! This module provides:
//! - AES-256-GCM authenticated encryption
//! - Key material with zeroize-on-drop

mod encryption;
mod secure_memory;

pub use encryption::{decrypt, encrypt, open, seal, EncryptedData};
pub use secure_memory::{MasterKey, KEY_LEN};
