//! File uploads for editors (lab photos, event images).
//!
//! Unlike mutations, upload failures are returned to the caller.

use async_trait::async_trait;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs;

use crate::partition::validate_segment;

/// Folder used when the caller does not pick one.
pub const DEFAULT_FOLDER: &str = "events";

#[derive(Error, Debug)]
pub enum UploadError {
    #[error("Upload source has no file name: {}", .0.display())]
    MissingFileName(PathBuf),

    #[error("Invalid upload folder: {0:?}")]
    InvalidFolder(String),

    #[error("Failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to store {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

#[async_trait]
pub trait Uploader: Send + Sync {
    /// Stores `file` as `<folder>/<file name>` and returns its public URL.
    async fn upload(&self, file: &Path, folder: &str) -> Result<String, UploadError>;
}

/// Blob storage in a local directory served at `public_base_url`.
#[derive(Debug, Clone)]
pub struct FsUploader {
    root: PathBuf,
    public_base_url: String,
}

impl FsUploader {
    pub fn new(root: impl Into<PathBuf>, public_base_url: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            public_base_url: public_base_url.into(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn public_url(&self, folder: &str, file_name: &str) -> String {
        let folder: Vec<_> = folder
            .split('/')
            .map(|segment| urlencoding::encode(segment).into_owned())
            .collect();
        format!(
            "{}/{}/{}",
            self.public_base_url.trim_end_matches('/'),
            folder.join("/"),
            urlencoding::encode(file_name)
        )
    }
}

/// Folders may be nested (`lab/photos`) but every segment must be plain.
fn validate_folder(folder: &str) -> Result<(), UploadError> {
    if folder.split('/').any(|segment| validate_segment(segment).is_err()) {
        return Err(UploadError::InvalidFolder(folder.to_string()));
    }
    Ok(())
}

#[async_trait]
impl Uploader for FsUploader {
    async fn upload(&self, file: &Path, folder: &str) -> Result<String, UploadError> {
        validate_folder(folder)?;

        let file_name = file
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| UploadError::MissingFileName(file.to_path_buf()))?;

        let bytes = fs::read(file).await.map_err(|source| UploadError::Read {
            path: file.to_path_buf(),
            source,
        })?;

        let dir = self.root.join(folder);
        fs::create_dir_all(&dir)
            .await
            .map_err(|source| UploadError::Write {
                path: dir.clone(),
                source,
            })?;

        let target = dir.join(file_name);
        fs::write(&target, bytes)
            .await
            .map_err(|source| UploadError::Write {
                path: target.clone(),
                source,
            })?;

        let url = self.public_url(folder, file_name);
        tracing::info!("Uploaded {} to {}", file.display(), url);
        Ok(url)
    }
}
