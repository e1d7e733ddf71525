//! File upload subsystem.
//!
//! # Data Flow
//! ```text
//! POST multipart/form-data
//!     → file.rs (stream the `upload` part into a temp file)
//!     → sanitize.rs (final path component, lower-cased extension)
//!     → store.rs (ensure directory, pick destination, move)
//!     → handler.rs (status message + HTML form)
//! ```
//!
//! # Design Decisions
//! - Only the filename extension is checked, never the content
//! - The claimed name is never joined onto a path before sanitization
//! - Staged temp files are deleted on drop unless moved into place

pub mod file;
pub mod handler;
pub mod sanitize;
pub mod store;

pub use file::{TransferStatus, UploadedFile};
pub use handler::{StoredFile, UploadError, UploadHandler, UploadPage};
pub use store::UploadStore;
