//! Permanent storage for accepted uploads.
//!
//! # Responsibilities
//! - Create the upload directory on demand
//! - Pick the destination path according to the collision policy
//! - Move a staged temporary file into place
//!
//! # Design Decisions
//! - `Overwrite` keeps last-write-wins: concurrent uploads of one name race
//!   with no locking
//! - `Suffix` probes for the first free `stem-N.ext`; probing and moving are
//!   separate steps, so two racing uploads can still pick the same name
//! - Moves are renames; a cross-device rename falls back to copying, after
//!   which the staged file is removed

use std::io;
use std::path::{Path, PathBuf};

use tempfile::TempPath;

use crate::config::CollisionPolicy;

/// Upper bound on suffix probing before giving up.
const MAX_SUFFIX: u32 = 10_000;

/// Mode of a stored upload: owner read/write, everyone else read.
#[cfg(unix)]
const STORED_MODE: u32 = 0o644;

/// The upload directory and its naming policy.
#[derive(Debug, Clone)]
pub struct UploadStore {
    directory: PathBuf,
    policy: CollisionPolicy,
}

impl UploadStore {
    pub fn new(directory: impl Into<PathBuf>, policy: CollisionPolicy) -> Self {
        Self {
            directory: directory.into(),
            policy,
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Create the directory and its parents. Existing directories, including
    /// ones created concurrently, are fine.
    pub async fn ensure_directory(&self) -> io::Result<()> {
        tokio::fs::create_dir_all(&self.directory).await
    }

    /// Final name and path for a sanitized name.
    pub async fn destination(&self, safe_name: &str) -> io::Result<(String, PathBuf)> {
        let path = self.directory.join(safe_name);
        if self.policy == CollisionPolicy::Overwrite || !tokio::fs::try_exists(&path).await? {
            return Ok((safe_name.to_string(), path));
        }

        let (stem, ext) = match safe_name.rsplit_once('.') {
            Some((stem, ext)) => (stem, Some(ext)),
            None => (safe_name, None),
        };
        for n in 1..=MAX_SUFFIX {
            let candidate = match ext {
                Some(ext) => format!("{}-{}.{}", stem, n, ext),
                None => format!("{}-{}", stem, n),
            };
            let path = self.directory.join(&candidate);
            if !tokio::fs::try_exists(&path).await? {
                return Ok((candidate, path));
            }
        }

        Err(io::Error::new(
            io::ErrorKind::AlreadyExists,
            format!("no free name for '{}' after {} attempts", safe_name, MAX_SUFFIX),
        ))
    }

    /// Move the staged file to `dest`.
    ///
    /// Staged files are private to the server user; the stored file is made
    /// readable by others so a separate web server can serve the directory.
    pub async fn persist(&self, staged: TempPath, dest: &Path) -> io::Result<()> {
        match tokio::fs::rename(&staged, dest).await {
            Ok(()) => {
                // Renamed away; nothing left for the guard to delete.
                let _ = staged.keep();
            }
            Err(e) if e.kind() == io::ErrorKind::CrossesDevices => {
                tracing::debug!(dest = %dest.display(), "Cross-device move, copying instead");
                tokio::fs::copy(&staged, dest).await?;
            }
            Err(e) => return Err(e),
        }
        set_stored_mode(dest).await
    }
}

#[cfg(unix)]
async fn set_stored_mode(path: &Path) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    tokio::fs::set_permissions(path, std::fs::Permissions::from_mode(STORED_MODE)).await
}

#[cfg(not(unix))]
async fn set_stored_mode(_path: &Path) -> io::Result<()> {
    Ok(())
}
