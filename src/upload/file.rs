//! Uploaded file descriptor and multipart reception.
//!
//! A file part is streamed into a temporary file as it arrives. The
//! descriptor owns that temporary file: dropping it without moving the file
//! into place deletes it, so a rejected or failed upload leaves nothing behind.

use std::fmt;
use std::path::Path;

use axum::extract::multipart::{Field, MultipartError};
use axum::extract::Multipart;
use axum::http::StatusCode;
use tempfile::TempPath;
use tokio::io::AsyncWriteExt;

/// Outcome of receiving a file part.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferStatus {
    /// Received completely.
    Ok,
    /// No file was sent in the expected field.
    NoFile,
    /// The file or the request body exceeded its size limit.
    TooLarge,
    /// The stream ended or broke mid-transfer.
    Partial,
    /// The temporary file could not be created or written.
    CantWrite,
}

impl TransferStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransferStatus::Ok => "ok",
            TransferStatus::NoFile => "no_file",
            TransferStatus::TooLarge => "too_large",
            TransferStatus::Partial => "partial",
            TransferStatus::CantWrite => "cant_write",
        }
    }

    fn from_multipart_error(err: &MultipartError) -> Self {
        if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
            TransferStatus::TooLarge
        } else {
            TransferStatus::Partial
        }
    }
}

impl fmt::Display for TransferStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A file received from a client. Only trustworthy when
/// [`status`](Self::status) is [`TransferStatus::Ok`].
#[derive(Debug)]
pub struct UploadedFile {
    claimed_name: String,
    temp_path: Option<TempPath>,
    status: TransferStatus,
    size: u64,
}

impl UploadedFile {
    /// A completely received file staged at `temp_path`.
    pub fn received(claimed_name: impl Into<String>, temp_path: TempPath, size: u64) -> Self {
        Self {
            claimed_name: claimed_name.into(),
            temp_path: Some(temp_path),
            status: TransferStatus::Ok,
            size,
        }
    }

    /// A transfer that did not complete.
    pub fn failed(claimed_name: impl Into<String>, status: TransferStatus) -> Self {
        Self {
            claimed_name: claimed_name.into(),
            temp_path: None,
            status,
            size: 0,
        }
    }

    /// The client-supplied name. Untrusted.
    pub fn claimed_name(&self) -> &str {
        &self.claimed_name
    }

    pub fn status(&self) -> TransferStatus {
        self.status
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn temp_path(&self) -> Option<&Path> {
        self.temp_path.as_deref()
    }

    /// Take ownership of the staged file.
    pub fn into_temp_path(self) -> Option<TempPath> {
        self.temp_path
    }
}

/// Pull the file part named `field_name` out of a multipart body.
///
/// Returns `None` when the body holds no part with that name. Other parts
/// are skipped.
pub async fn receive(
    multipart: &mut Multipart,
    field_name: &str,
    temp_dir: &Path,
    max_size: u64,
) -> Option<UploadedFile> {
    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!(error = %e, "Multipart stream failed before the file part");
                return Some(UploadedFile::failed(
                    String::new(),
                    TransferStatus::from_multipart_error(&e),
                ));
            }
        };

        if field.name() != Some(field_name) {
            continue;
        }

        let claimed_name = match field.file_name() {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => return Some(UploadedFile::failed(String::new(), TransferStatus::NoFile)),
        };

        return Some(stage(field, claimed_name, temp_dir, max_size).await);
    }
}

/// Stream one field into a fresh temporary file.
async fn stage(
    mut field: Field<'_>,
    claimed_name: String,
    temp_dir: &Path,
    max_size: u64,
) -> UploadedFile {
    let (file, temp_path) = match tempfile::Builder::new()
        .prefix("upload-")
        .tempfile_in(temp_dir)
    {
        Ok(named) => named.into_parts(),
        Err(e) => {
            tracing::error!(error = %e, temp_dir = %temp_dir.display(), "Cannot create temporary upload file");
            return UploadedFile::failed(claimed_name, TransferStatus::CantWrite);
        }
    };
    let mut file = tokio::fs::File::from_std(file);
    let mut size: u64 = 0;

    loop {
        match field.chunk().await {
            Ok(Some(chunk)) => {
                size += chunk.len() as u64;
                if size > max_size {
                    tracing::warn!(max_size, "Upload exceeds the per-file limit");
                    return UploadedFile::failed(claimed_name, TransferStatus::TooLarge);
                }
                if let Err(e) = file.write_all(&chunk).await {
                    tracing::error!(error = %e, "Cannot write temporary upload file");
                    return UploadedFile::failed(claimed_name, TransferStatus::CantWrite);
                }
            }
            Ok(None) => break,
            Err(e) => {
                tracing::warn!(error = %e, received = size, "Upload stream broke");
                return UploadedFile::failed(claimed_name, TransferStatus::from_multipart_error(&e));
            }
        }
    }

    if let Err(e) = file.flush().await {
        tracing::error!(error = %e, "Cannot flush temporary upload file");
        return UploadedFile::failed(claimed_name, TransferStatus::CantWrite);
    }

    tracing::debug!(claimed_name = %claimed_name, size, path = %temp_path.display(), "Upload staged");
    UploadedFile::received(claimed_name, temp_path, size)
}
