//! # tolino-core
//!
//! Core functionality for the Tolino integration including:
//! - Environment-driven configuration
//! - AES-256-GCM encryption with a locally generated key file
//! - A single-account credential cache, encrypted at rest
//! - Upload orchestration over an injected browser workflow

pub mod config;
pub mod credential;
pub mod crypto;
pub mod error;
pub mod storage;
pub mod uploader;

pub use config::{string_to_bool, LogConfig, TolinoConfig};
pub use credential::{CredentialCache, Credentials};
pub use crypto::MasterKey;
pub use error::{Result, TolinoError};
pub use storage::{EncryptedFileStore, KeyFileStore};
pub use uploader::{TolinoUploader, UploadWorkflow};
