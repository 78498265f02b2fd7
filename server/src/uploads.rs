//! Storage for images uploaded through the admin forms.

use axum::body::Bytes;
use chrono::Utc;
use nfg_core::image::{allowed_extension, optimize_image, validate_image, Optimized};
use std::path::PathBuf;
use uuid::Uuid;

use crate::error::AppError;

/// A file part pulled out of a multipart form.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: String,
    pub data: Bytes,
}

/// Writes uploads to `<root>/<YYYYMMDD>/<uuid>.<ext>` and hands back the public URL.
#[derive(Debug)]
pub struct UploadStore {
    root: PathBuf,
    url_prefix: String,
    optimize: bool,
}

impl UploadStore {
    pub fn with_root(root: PathBuf, url_prefix: String, optimize: bool) -> Self {
        Self {
            root,
            url_prefix: url_prefix.trim_end_matches('/').to_string(),
            optimize,
        }
    }

    /// Store `file` under today's folder.
    ///
    /// Returns `Ok(None)` when the file has no name, a disallowed extension, or
    /// bytes that are not a readable image; callers fall back to the URL field.
    pub async fn save(&self, file: &UploadedFile) -> Result<Option<String>, AppError> {
        let day = Utc::now().format("%Y%m%d").to_string();
        self.save_in(file, &day).await
    }

    async fn save_in(&self, file: &UploadedFile, day: &str) -> Result<Option<String>, AppError> {
        if file.file_name.is_empty() || file.data.is_empty() {
            return Ok(None);
        }
        let Some(ext) = allowed_extension(&file.file_name) else {
            tracing::warn!(file_name = %file.file_name, "rejected upload with disallowed extension");
            return Ok(None);
        };

        let optimize = self.optimize;
        let data = file.data.clone();
        let processed = tokio::task::spawn_blocking(move || prepare(&data, optimize))
            .await
            .map_err(|e| AppError::Upload(std::io::Error::other(e)))?;
        let Some(bytes) = processed else {
            tracing::warn!(file_name = %file.file_name, "rejected upload that is not a valid image");
            return Ok(None);
        };

        let folder = self.root.join(day);
        tokio::fs::create_dir_all(&folder).await?;

        let file_name = format!("{}.{ext}", Uuid::new_v4().simple());
        tokio::fs::write(folder.join(&file_name), &bytes).await?;

        let url = format!("{}/{day}/{file_name}", self.url_prefix);
        tracing::info!(%url, size = bytes.len(), "stored upload");
        Ok(Some(url))
    }
}

/// Validate and optionally shrink the upload. `None` means "not an image".
fn prepare(data: &Bytes, optimize: bool) -> Option<Vec<u8>> {
    validate_image(data).ok()?;

    if optimize {
        match optimize_image(data) {
            Ok(Optimized::Smaller(bytes)) => return Some(bytes),
            Ok(Optimized::Unchanged) => {}
            Err(e) => tracing::warn!(error = %e, "image optimization skipped"),
        }
    }
    Some(data.to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, ImageFormat, RgbImage};
    use std::io::Cursor;
    use tempfile::TempDir;

    fn tiny_png() -> Bytes {
        let img = RgbImage::from_pixel(4, 4, image::Rgb([200, 10, 10]));
        let mut buf = Cursor::new(Vec::new());
        DynamicImage::ImageRgb8(img)
            .write_to(&mut buf, ImageFormat::Png)
            .unwrap();
        Bytes::from(buf.into_inner())
    }

    fn store(temp_dir: &TempDir) -> UploadStore {
        UploadStore::with_root(
            temp_dir.path().to_path_buf(),
            "/static/uploads/".to_string(),
            true,
        )
    }

    #[test]
    fn test_url_prefix_trailing_slash_trimmed() {
        let store = UploadStore::with_root(PathBuf::from("media"), "/media/".to_string(), false);
        assert_eq!(store.url_prefix, "/media");
        assert_eq!(store.root, PathBuf::from("media"));
    }

    #[tokio::test]
    async fn test_save_writes_file_and_returns_url() {
        let temp_dir = TempDir::new().unwrap();
        let store = store(&temp_dir);
        let file = UploadedFile {
            file_name: "Chest.PNG".to_string(),
            data: tiny_png(),
        };

        let url = store.save_in(&file, "20250101").await.unwrap().unwrap();
        assert!(url.starts_with("/static/uploads/20250101/"));
        assert!(url.ends_with(".png"));

        let stored_name = url.rsplit('/').next().unwrap();
        let on_disk = temp_dir.path().join("20250101").join(stored_name);
        assert!(on_disk.exists());
    }

    #[tokio::test]
    async fn test_save_skips_disallowed_extension() {
        let temp_dir = TempDir::new().unwrap();
        let file = UploadedFile {
            file_name: "evil.svg".to_string(),
            data: tiny_png(),
        };
        assert!(store(&temp_dir).save_in(&file, "20250101").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_save_skips_non_image_bytes() {
        let temp_dir = TempDir::new().unwrap();
        let file = UploadedFile {
            file_name: "photo.jpg".to_string(),
            data: Bytes::from_static(b"definitely not a jpeg"),
        };
        assert!(store(&temp_dir).save_in(&file, "20250101").await.unwrap().is_none());
        assert!(!temp_dir.path().join("20250101").exists());
    }

    #[tokio::test]
    async fn test_save_skips_empty_file() {
        let temp_dir = TempDir::new().unwrap();
        let file = UploadedFile {
            file_name: String::new(),
            data: Bytes::new(),
        };
        assert!(store(&temp_dir).save_in(&file, "20250101").await.unwrap().is_none());
    }
}
