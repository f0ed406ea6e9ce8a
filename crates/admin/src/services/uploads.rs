//! Image uploads for products and banners.
//!
//! Files arrive base64-encoded in JSON, are checked against an allow-list of
//! image extensions, and are written under a random name so staff-supplied file
//! names never reach the filesystem.

use std::path::Path;

use base64::{Engine, engine::general_purpose::STANDARD};
use thiserror::Error;
use uuid::Uuid;

/// Largest accepted file, after decoding.
pub const MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

/// URL prefix the upload directory is served under.
pub const PUBLIC_PREFIX: &str = "/uploads";

/// Errors from accepting an upload.
#[derive(Debug, Error)]
pub enum UploadError {
    #[error("unsupported file type: {0}")]
    UnsupportedType(String),

    #[error("file is empty")]
    Empty,

    #[error("file is too large ({size} bytes, max {max})")]
    TooLarge { size: usize, max: usize },

    #[error("data_base64 is not valid base64")]
    InvalidEncoding(#[from] base64::DecodeError),

    #[error("failed to store upload: {0}")]
    Io(#[from] std::io::Error),
}

/// Accepted image formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    Png,
    Jpeg,
    Webp,
    Gif,
}

impl ImageKind {
    /// Identify the format from a file name's extension.
    ///
    /// # Errors
    ///
    /// Returns `UploadError::UnsupportedType` for anything outside the
    /// allow-list.
    pub fn from_filename(filename: &str) -> Result<Self, UploadError> {
        let ext = Path::new(filename)
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        match ext.as_str() {
            "png" => Ok(Self::Png),
            "jpg" | "jpeg" => Ok(Self::Jpeg),
            "webp" => Ok(Self::Webp),
            "gif" => Ok(Self::Gif),
            _ => Err(UploadError::UnsupportedType(filename.to_owned())),
        }
    }

    /// Extension used for stored files.
    #[must_use]
    pub const fn extension(&self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpg",
            Self::Webp => "webp",
            Self::Gif => "gif",
        }
    }
}

/// Decode and validate an upload without touching the filesystem.
///
/// # Errors
///
/// Returns an `UploadError` describing the first problem found.
pub fn decode_upload(filename: &str, data_base64: &str) -> Result<(ImageKind, Vec<u8>), UploadError> {
    let kind = ImageKind::from_filename(filename)?;

    // Reject oversized payloads before decoding them.
    let estimated = data_base64.len() / 4 * 3;
    if estimated > MAX_UPLOAD_BYTES + 3 {
        return Err(UploadError::TooLarge {
            size: estimated,
            max: MAX_UPLOAD_BYTES,
        });
    }

    let bytes = STANDARD.decode(data_base64.trim())?;
    if bytes.is_empty() {
        return Err(UploadError::Empty);
    }
    if bytes.len() > MAX_UPLOAD_BYTES {
        return Err(UploadError::TooLarge {
            size: bytes.len(),
            max: MAX_UPLOAD_BYTES,
        });
    }

    Ok((kind, bytes))
}

/// Store an upload in `dir` and return its public path.
///
/// # Errors
///
/// Returns an `UploadError` if validation or the write fails.
pub async fn save_upload(dir: &Path, filename: &str, data_base64: &str) -> Result<String, UploadError> {
    let (kind, bytes) = decode_upload(filename, data_base64)?;

    tokio::fs::create_dir_all(dir).await?;
    let stored = format!("{}.{}", Uuid::new_v4(), kind.extension());
    tokio::fs::write(dir.join(&stored), &bytes).await?;

    tracing::info!(file = %stored, size = bytes.len(), "Stored upload");
    Ok(format!("{PUBLIC_PREFIX}/{stored}"))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const PNG: &[u8] = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR";

    #[test]
    fn test_allowed_extensions() {
        assert_eq!(ImageKind::from_filename("a.PNG").unwrap(), ImageKind::Png);
        assert_eq!(ImageKind::from_filename("b.jpeg").unwrap(), ImageKind::Jpeg);
        assert_eq!(ImageKind::from_filename("c.webp").unwrap(), ImageKind::Webp);
        assert!(matches!(
            ImageKind::from_filename("shell.php"),
            Err(UploadError::UnsupportedType(_))
        ));
        assert!(ImageKind::from_filename("noext").is_err());
    }

    #[test]
    fn test_decode_keeps_bytes() {
        let (kind, bytes) = decode_upload("banner.png", &STANDARD.encode(PNG)).unwrap();
        assert_eq!(kind, ImageKind::Png);
        assert_eq!(bytes, PNG);
    }

    #[test]
    fn test_rejects_bad_payloads() {
        assert!(matches!(
            decode_upload("a.png", "!!!not base64"),
            Err(UploadError::InvalidEncoding(_))
        ));
        assert!(matches!(decode_upload("a.png", ""), Err(UploadError::Empty)));

        let huge = STANDARD.encode(vec![0u8; MAX_UPLOAD_BYTES + 1]);
        assert!(matches!(
            decode_upload("a.png", &huge),
            Err(UploadError::TooLarge { .. })
        ));
    }

    #[tokio::test]
    async fn test_save_upload_writes_random_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = save_upload(dir.path(), "../../etc/passwd.png", &STANDARD.encode(PNG))
            .await
            .unwrap();

        assert!(path.starts_with("/uploads/"));
        assert!(path.ends_with(".png"));
        assert!(!path.contains("passwd"));

        let stored = dir.path().join(path.trim_start_matches("/uploads/"));
        assert_eq!(std::fs::read(stored).unwrap(), PNG);
    }
}
