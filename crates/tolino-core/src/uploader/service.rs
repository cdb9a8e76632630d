//! Tolino upload service

use std::io::ErrorKind;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, error, info};

use super::UploadWorkflow;
use crate::config::TolinoConfig;
use crate::credential::{CredentialCache, Credentials};
use crate::error::{Result, TolinoError};

/// Uploads books to the Tolino cloud using cached credentials
pub struct TolinoUploader {
    config: TolinoConfig,
    cache: CredentialCache,
    workflow: Arc<dyn UploadWorkflow>,
}

impl TolinoUploader {
    /// Create an uploader, opening the credential cache from `config`
    pub fn new(config: TolinoConfig, workflow: Arc<dyn UploadWorkflow>) -> Self {
        let cache = CredentialCache::open(&config);
        Self::with_cache(config, cache, workflow)
    }

    /// Create an uploader around an existing cache
    pub fn with_cache(
        config: TolinoConfig,
        cache: CredentialCache,
        workflow: Arc<dyn UploadWorkflow>,
    ) -> Self {
        debug!(
            workflow = workflow.name(),
            enabled = config.enabled,
            "Tolino uploader initialized"
        );
        Self {
            config,
            cache,
            workflow,
        }
    }

    /// Upload a book, returning the specific failure
    pub async fn try_upload_book(&self, book_path: &Path) -> Result<()> {
        if !self.config.enabled {
            return Err(TolinoError::Disabled);
        }

        let is_file = match tokio::fs::metadata(book_path).await {
            Ok(metadata) => metadata.is_file(),
            Err(e) if e.kind() == ErrorKind::NotFound => false,
            Err(e) => return Err(TolinoError::storage(book_path, e)),
        };
        if !is_file {
            return Err(TolinoError::BookNotFound(book_path.to_path_buf()));
        }

        let credentials = self
            .cache
            .credentials()
            .ok_or(TolinoError::MissingCredentials)?;

        debug!(
            workflow = self.workflow.name(),
            book = ?book_path,
            "Starting Tolino upload"
        );
        self.workflow.upload(credentials, book_path).await
    }

    /// Upload a book; `true` if the workflow reported success
    pub async fn upload_book(&self, book_path: &Path) -> bool {
        match self.try_upload_book(book_path).await {
            Ok(()) => {
                info!("Successfully uploaded book to Tolino cloud: {:?}", book_path);
                true
            }
            Err(e) => {
                error!(book = ?book_path, error = %e, "Failed to upload book to Tolino");
                false
            }
        }
    }

    /// Store new credentials; `true` if they were persisted
    pub fn save_credentials(&mut self, username: &str, password: &str) -> bool {
        self.cache.save(username, password)
    }

    /// Whether credentials are available for uploads
    pub fn has_credentials(&self) -> bool {
        self.cache.has_credentials()
    }

    /// Cached credentials for an external authentication step
    pub fn credentials(&self) -> Option<&Credentials> {
        self.cache.credentials()
    }
}
