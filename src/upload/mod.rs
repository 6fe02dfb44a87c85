use std::path::{Path, PathBuf};

use axum::extract::multipart::Field;
use thiserror::Error;
use tracing::warn;
use uuid::Uuid;

/// Upper bound on an uploaded image, in bytes.
pub const MAX_IMAGE_BYTES: usize = 500_000;

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("Unsupported media type: {0}")]
    InvalidMediaType(String),

    #[error("Image too large: {0} bytes")]
    TooLarge(usize),

    #[error("Failed to read upload: {0}")]
    Read(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Map an accepted media type to its stored file extension. Anything not in
/// this map is rejected.
pub fn extension_for(mime: &str) -> Option<&'static str> {
    match mime {
        "image/png" => Some("png"),
        "image/jpeg" => Some("jpeg"),
        "image/jpg" => Some("jpg"),
        _ => None,
    }
}

/// An image pulled out of a multipart field, validated for media type and
/// size but not yet persisted.
#[derive(Debug, Clone)]
pub struct UploadedImage {
    pub data: Vec<u8>,
    pub ext: &'static str,
}

/// Read and validate a multipart image field.
pub async fn read_image_field(field: Field<'_>) -> Result<UploadedImage, UploadError> {
    let mime = field
        .content_type()
        .map(str::to_owned)
        .ok_or_else(|| UploadError::InvalidMediaType("none".to_string()))?;
    let ext = extension_for(&mime).ok_or(UploadError::InvalidMediaType(mime))?;

    let data = field
        .bytes()
        .await
        .map_err(|e| UploadError::Read(e.to_string()))?;
    if data.len() > MAX_IMAGE_BYTES {
        return Err(UploadError::TooLarge(data.len()));
    }

    Ok(UploadedImage {
        data: data.to_vec(),
        ext,
    })
}

/// Filesystem destination for uploaded images. Files are written as
/// `<uuid>.<ext>` under a single directory and served statically.
#[derive(Debug, Clone)]
pub struct ImageStore {
    root: PathBuf,
}

impl ImageStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Persist a validated image, returning its stored path (relative to the
    /// serving root) for the owning record.
    pub async fn save(&self, image: &UploadedImage) -> Result<String, UploadError> {
        tokio::fs::create_dir_all(&self.root).await?;
        let filename = format!("{}.{}", Uuid::new_v4(), image.ext);
        tokio::fs::write(self.root.join(&filename), &image.data).await?;
        Ok(filename)
    }

    /// Best-effort removal of a stored image. The record deletion has already
    /// committed by the time this runs, so failure is logged and swallowed.
    pub async fn remove(&self, stored_path: &str) {
        let path = self.root.join(stored_path);
        if let Err(e) = tokio::fs::remove_file(&path).await {
            warn!("Failed to remove image {}: {}", path.display(), e);
        }
    }
}
