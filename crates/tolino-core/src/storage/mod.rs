//! File storage for the credential cache
//!
//! Key and ciphertext live in separate files:
//! 1. The key file (raw symmetric key)
//! 2. The credentials file (ciphertext only)

mod encrypted_file;
mod file_ops;
mod key_file;

pub use encrypted_file::EncryptedFileStore;
pub use key_file::KeyFileStore;
