//! Environment-driven configuration
//!
//! All settings come from environment variables. Lookups go through a
//! closure so tests can supply their own values without touching the
//! process environment.

use serde::Serialize;
use std::path::PathBuf;

/// Directory name used under the system temp dir when `TMP_DIR` is unset
const DEFAULT_TMP_SUBDIR: &str = "cwa-book-downloader";
const DEFAULT_CREDENTIALS_FILE: &str = "tolino_credentials.enc";
const DEFAULT_KEY_FILE: &str = "encryption_key.bin";
const DEFAULT_WEBSHOP: &str = "hugendubel";

/// Parse a boolean setting ("true", "yes", "1", "y", case-insensitive)
pub fn string_to_bool(s: &str) -> bool {
    matches!(
        s.trim().to_lowercase().as_str(),
        "true" | "yes" | "1" | "y"
    )
}

/// Tolino integration settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TolinoConfig {
    /// Whether uploads to Tolino are enabled (`ENABLE_TOLINO`)
    pub enabled: bool,
    /// Scratch directory used for default file locations (`TMP_DIR`)
    pub tmp_dir: PathBuf,
    /// Encrypted credentials file (`TOLINO_CREDENTIALS_FILE`)
    pub credentials_file: PathBuf,
    /// Raw symmetric key file (`ENCRYPTION_KEY_FILE`)
    pub key_file: PathBuf,
    /// Webshop whose webreader hosts the account (`TOLINO_WEBSHOP`)
    pub webshop: String,
}

impl TolinoConfig {
    /// Read settings from the process environment
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read settings through an arbitrary lookup function
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let tmp_dir = get("TMP_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| std::env::temp_dir().join(DEFAULT_TMP_SUBDIR));

        let credentials_file = get("TOLINO_CREDENTIALS_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|| tmp_dir.join(DEFAULT_CREDENTIALS_FILE));

        let key_file = get("ENCRYPTION_KEY_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|| tmp_dir.join(DEFAULT_KEY_FILE));

        Self {
            enabled: get("ENABLE_TOLINO").map_or(true, |v| string_to_bool(&v)),
            tmp_dir,
            credentials_file,
            key_file,
            webshop: get("TOLINO_WEBSHOP")
                .map(|v| v.to_lowercase())
                .unwrap_or_else(|| DEFAULT_WEBSHOP.to_string()),
        }
    }

    /// Settings rooted in `dir`, with Tolino enabled (for testing)
    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        let tmp_dir = dir.into();
        Self {
            enabled: true,
            credentials_file: tmp_dir.join(DEFAULT_CREDENTIALS_FILE),
            key_file: tmp_dir.join(DEFAULT_KEY_FILE),
            tmp_dir,
            webshop: DEFAULT_WEBSHOP.to_string(),
        }
    }

    /// Entry URL of the webshop's Tolino webreader
    pub fn webreader_url(&self) -> String {
        format!("https://webreader.{}.de/", self.webshop)
    }
}

impl Default for TolinoConfig {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

/// Logging settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    /// Whether a subscriber should be installed (`ENABLE_LOGGING`)
    pub enabled: bool,
    /// Filter level; `DEBUG=true` forces "debug" (`LOG_LEVEL`)
    pub level: String,
}

impl LogConfig {
    /// Read settings from the process environment
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read settings through an arbitrary lookup function
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let debug = lookup("DEBUG").map_or(false, |v| string_to_bool(&v));
        let level = if debug {
            "debug".to_string()
        } else {
            lookup("LOG_LEVEL")
                .map(|v| v.trim().to_lowercase())
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| "info".to_string())
        };

        Self {
            enabled: lookup("ENABLE_LOGGING").map_or(true, |v| string_to_bool(&v)),
            level,
        }
    }
}
