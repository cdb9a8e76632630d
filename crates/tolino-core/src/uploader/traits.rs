//! Upload workflow trait definitions

use async_trait::async_trait;
use std::path::Path;

use crate::credential::Credentials;
use crate::error::Result;

/// A remote upload capability, typically a scripted headless browser
///
/// Implementations authenticate with the given credentials and upload the
/// file in a single attempt. No retries and no resumption of partial uploads.
#[async_trait]
pub trait UploadWorkflow: Send + Sync {
    /// Authenticate and upload the book at `book_path`
    async fn upload(&self, credentials: &Credentials, book_path: &Path) -> Result<()>;

    /// Get a human-readable name for this workflow
    fn name(&self) -> &'static str;
}
