//! Credential record definitions

use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::{Result, TolinoError};

/// Username/password pair for the Tolino account - zeroed when dropped
///
/// Serialized as `{"username": ..., "password": ...}` before encryption.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
pub struct Credentials {
    username: String,
    password: String,
}

impl Credentials {
    /// Create a credential pair; both fields must be non-empty
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Result<Self> {
        let credentials = Self {
            username: username.into(),
            password: password.into(),
        };
        credentials.validate()?;
        Ok(credentials)
    }

    /// Check the both-or-nothing invariant
    pub fn validate(&self) -> Result<()> {
        if self.username.is_empty() {
            return Err(TolinoError::InvalidCredentials("username is empty".to_string()));
        }
        if self.password.is_empty() {
            return Err(TolinoError::InvalidCredentials("password is empty".to_string()));
        }
        Ok(())
    }

    /// Account username (usually an email address)
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Get the password (use carefully)
    pub fn expose_password(&self) -> &str {
        &self.password
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}
