//! Upload request handling.
//!
//! # State machine (per request)
//! ```text
//! Start ──(not POST)──────────────────────────────────────────────▶ Render
//!   │
//!   ▼
//! Validate presence ──(missing / transfer failed)─────────────────▶ Render
//!   ▼
//! Sanitize name ──(nothing usable)────────────────────────────────▶ Render
//!   ▼
//! Ensure directory ──(create failed)──────────────────────────────▶ Render
//!   ▼
//! Check extension ──(not allow-listed)────────────────────────────▶ Render
//!   ▼
//! Move file ──(ok / failed)───────────────────────────────────────▶ Render
//! ```
//!
//! Every path ends in Render with HTTP 200; failures only show up as the
//! status line on the page.

use std::io;
use std::path::PathBuf;

use axum::extract::Multipart;
use axum::http::Method;
use thiserror::Error;

use crate::config::UploadConfig;
use crate::http::html;
use crate::observability::metrics;
use crate::upload::file::{self, TransferStatus, UploadedFile};
use crate::upload::sanitize;
use crate::upload::store::UploadStore;

/// Why an upload was not stored.
#[derive(Debug, Error)]
pub enum UploadError {
    /// The file did not arrive intact.
    #[error("upload transfer failed: {0}")]
    Transfer(TransferStatus),

    /// The extension is not allow-listed.
    #[error("extension not allowed (expected one of {})", .allowed.join(", "))]
    Validation { allowed: Vec<String> },

    /// The upload directory could not be created.
    #[error("cannot create upload directory: {0}")]
    Directory(#[source] io::Error),

    /// The staged file could not be moved into place.
    #[error("cannot move upload into place: {0}")]
    Move(#[source] io::Error),
}

impl UploadError {
    /// Text shown to the client. Never includes the underlying cause.
    pub fn status_message(&self) -> String {
        match self {
            UploadError::Transfer(_) => "Error: could not upload the file.".to_string(),
            UploadError::Validation { allowed } => {
                format!("Error: only {} allowed!", allowed.join(", "))
            }
            UploadError::Directory(_) => {
                "Error: could not create the destination directory.".to_string()
            }
            UploadError::Move(_) => {
                "Error: could not move the file to the destination directory.".to_string()
            }
        }
    }

    fn outcome(&self) -> &'static str {
        match self {
            UploadError::Transfer(_) => "transfer_error",
            UploadError::Validation { .. } => "rejected",
            UploadError::Directory(_) | UploadError::Move(_) => "filesystem_error",
        }
    }
}

/// A file that made it into the upload directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredFile {
    /// Name on disk.
    pub name: String,
    /// Full destination path.
    pub path: PathBuf,
    /// The upload directory as configured.
    pub directory: PathBuf,
    /// Size in bytes.
    pub size: u64,
}

impl StoredFile {
    pub fn status_message(&self) -> String {
        format!(
            "Uploaded '{}' to '{}' ({} bytes)",
            self.name,
            self.directory.display(),
            self.size
        )
    }
}

/// The rendered upload page: optional status line above the form.
#[derive(Debug, Clone)]
pub struct UploadPage {
    status: Option<String>,
    action: String,
    field_name: String,
    accept: String,
}

impl UploadPage {
    /// Status message, unescaped.
    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub fn render(&self) -> String {
        let mut body = String::new();
        if let Some(status) = &self.status {
            body.push_str(&format!("<p>{}</p>\n", html::escape(status)));
        }
        body.push_str(&format!(
            "<form action=\"{action}\" method=\"post\" enctype=\"multipart/form-data\">\n\
             \x20   <label for=\"{field}\">Image to upload</label>\n\
             \x20   <input type=\"file\" name=\"{field}\" id=\"{field}\" accept=\"{accept}\"><br>\n\
             \x20   <input type=\"submit\" value=\"HTTP Upload\">\n\
             </form>\n",
            action = html::escape(&self.action),
            field = html::escape(&self.field_name),
            accept = html::escape(&self.accept),
        ));
        html::document("Post File", &body)
    }
}

/// Handles the upload route.
#[derive(Debug)]
pub struct UploadHandler {
    config: UploadConfig,
    store: UploadStore,
    temp_dir: PathBuf,
}

impl UploadHandler {
    pub fn new(config: UploadConfig) -> Self {
        let store = UploadStore::new(config.directory.clone(), config.on_conflict);
        let temp_dir = config.temp_dir.clone().unwrap_or_else(std::env::temp_dir);
        Self {
            config,
            store,
            temp_dir,
        }
    }

    pub fn config(&self) -> &UploadConfig {
        &self.config
    }

    /// Run one request through the state machine.
    ///
    /// `multipart` is `None` when the body could not be read as
    /// `multipart/form-data`.
    pub async fn handle(&self, method: &Method, multipart: Option<Multipart>) -> UploadPage {
        if *method != Method::POST {
            return self.page(None);
        }

        let file = match multipart {
            Some(mut multipart) => self.receive(&mut multipart).await,
            None => None,
        };

        let status = match self.process(file).await {
            Ok(stored) => {
                tracing::info!(
                    name = %stored.name,
                    path = %stored.path.display(),
                    size = stored.size,
                    "Upload stored"
                );
                metrics::record_upload("stored");
                stored.status_message()
            }
            Err(e) => {
                tracing::warn!(error = %e, "Upload not stored");
                metrics::record_upload(e.outcome());
                e.status_message()
            }
        };

        self.page(Some(status))
    }

    /// Stream the configured file field into the staging directory.
    pub async fn receive(&self, multipart: &mut Multipart) -> Option<UploadedFile> {
        file::receive(
            multipart,
            &self.config.field_name,
            &self.temp_dir,
            self.config.max_file_size,
        )
        .await
    }

    /// Validate a received file and move it into the upload directory.
    pub async fn process(&self, file: Option<UploadedFile>) -> Result<StoredFile, UploadError> {
        let file = match file {
            Some(file) if file.status() == TransferStatus::Ok => file,
            Some(file) => return Err(UploadError::Transfer(file.status())),
            None => return Err(UploadError::Transfer(TransferStatus::NoFile)),
        };

        let safe_name = sanitize::safe_name(file.claimed_name())
            .ok_or(UploadError::Transfer(TransferStatus::NoFile))?
            .to_string();

        self.store
            .ensure_directory()
            .await
            .map_err(UploadError::Directory)?;

        let allowed = sanitize::extension(&safe_name)
            .is_some_and(|ext| self.config.allowed_extensions.iter().any(|a| *a == ext));
        if !allowed {
            return Err(UploadError::Validation {
                allowed: self.config.allowed_extensions.clone(),
            });
        }

        let size = file.size();
        let staged = file
            .into_temp_path()
            .ok_or(UploadError::Transfer(TransferStatus::NoFile))?;

        let (name, path) = self
            .store
            .destination(&safe_name)
            .await
            .map_err(UploadError::Move)?;
        self.store
            .persist(staged, &path)
            .await
            .map_err(UploadError::Move)?;

        Ok(StoredFile {
            name,
            path,
            directory: self.store.directory().to_path_buf(),
            size,
        })
    }

    fn page(&self, status: Option<String>) -> UploadPage {
        let accept = self
            .config
            .allowed_extensions
            .iter()
            .map(|ext| format!(".{}", ext))
            .collect::<Vec<_>>()
            .join(", ");

        UploadPage {
            status,
            action: self.config.route.clone(),
            field_name: self.config.field_name.clone(),
            accept,
        }
    }
}
