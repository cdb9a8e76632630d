//! Upload orchestration
//!
//! The browser-driven upload itself is an injected [`UploadWorkflow`];
//! [`TolinoUploader`] gates it on configuration, the book file, and the
//! cached credentials.

mod service;
mod traits;

pub use service::TolinoUploader;
pub use traits::UploadWorkflow;
