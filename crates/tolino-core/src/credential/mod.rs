//! Credential record and its encrypted cache

mod cache;
mod types;

pub use cache::CredentialCache;
pub use types::Credentials;
