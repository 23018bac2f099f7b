//! Media ingest: validates an uploaded image's extension, stores it under a
//! collision-resistant random name and normalizes it in place to a fixed
//! 200x200 canvas (aspect ratio is not preserved).

use std::path::Path;

use image::imageops::FilterType;
use rand::RngCore;
use tracing::{debug, warn};

use crate::error::ApiError;

pub const ALLOWED_EXTENSIONS: [&str; 2] = ["png", "jpg"];
const CANVAS_SIZE: u32 = 200;
const FILENAME_ENTROPY_BYTES: usize = 10;

/// Store an uploaded image under `media_dir` and return the generated
/// filename (not a path). The extension is the text after the first `.` of
/// the original filename; anything outside the allowed set is rejected
/// before a single byte touches disk.
pub async fn store_image(
    media_dir: &Path,
    bytes: Vec<u8>,
    original_filename: &str,
) -> Result<String, ApiError> {
    let extension = original_filename.split('.').nth(1).unwrap_or_default();
    if !ALLOWED_EXTENSIONS.contains(&extension) {
        return Err(ApiError::Validation(
            "File extension not allowed".to_string(),
        ));
    }

    let filename = format!("{}.{}", random_hex(FILENAME_ENTROPY_BYTES), extension);
    let path = media_dir.join(&filename);

    tokio::fs::write(&path, &bytes).await.map_err(|e| {
        warn!("Failed to write uploaded file {}: {e}", path.display());
        ApiError::Internal
    })?;
    debug!("Stored upload as {}", path.display());

    // Decode and resize on a blocking thread; both are CPU-bound.
    let resize_path = path.clone();
    let resized = tokio::task::spawn_blocking(move || -> Result<(), image::ImageError> {
        let img = image::open(&resize_path)?;
        img.resize_exact(CANVAS_SIZE, CANVAS_SIZE, FilterType::Triangle)
            .save(&resize_path)?;
        Ok(())
    })
    .await
    .map_err(|e| {
        warn!("Image resize task panicked: {e}");
        ApiError::Internal
    })?;

    if let Err(e) = resized {
        // Undecodable content behind a valid extension; drop the orphan.
        warn!("Could not decode uploaded image {filename}: {e}");
        let _ = tokio::fs::remove_file(&path).await;
        return Err(ApiError::Validation(
            "File is not a valid image".to_string(),
        ));
    }

    Ok(filename)
}

fn random_hex(bytes: usize) -> String {
    let mut buf = vec![0u8; bytes];
    rand::thread_rng().fill_bytes(&mut buf);
    buf.iter().map(|b| format!("{b:02x}")).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use std::path::PathBuf;

    fn temp_media_dir() -> PathBuf {
        let dir = std::env::temp_dir().join(format!("mainstage-media-{}", random_hex(8)));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = image::RgbImage::from_pixel(width, height, image::Rgb([180, 40, 90]));
        let mut buf = Cursor::new(Vec::new());
        image::DynamicImage::ImageRgb8(img)
            .write_to(&mut buf, image::ImageFormat::Png)
            .unwrap();
        buf.into_inner()
    }

    #[tokio::test]
    async fn rejects_disallowed_extension_without_writing() {
        let dir = temp_media_dir();
        let result = store_image(&dir, vec![1, 2, 3], "malware.gif").await;
        assert!(matches!(result, Err(ApiError::Validation(_))));
        assert_eq!(std::fs::read_dir(&dir).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn extension_is_text_after_first_dot() {
        // "archive.tar.png" has extension "tar", not "png"
        let dir = temp_media_dir();
        let result = store_image(&dir, png_bytes(4, 4), "archive.tar.png").await;
        assert!(matches!(result, Err(ApiError::Validation(_))));
    }

    #[tokio::test]
    async fn rejects_filename_without_extension() {
        let dir = temp_media_dir();
        let result = store_image(&dir, png_bytes(4, 4), "noextension").await;
        assert!(matches!(result, Err(ApiError::Validation(_))));
    }

    #[tokio::test]
    async fn stores_and_normalizes_to_fixed_canvas() {
        let dir = temp_media_dir();
        let filename = store_image(&dir, png_bytes(64, 16), "tall.png").await.unwrap();
        assert!(filename.ends_with(".png"));

        let (width, height) = image::image_dimensions(dir.join(&filename)).unwrap();
        assert_eq!((width, height), (200, 200));
    }

    #[tokio::test]
    async fn generated_names_do_not_collide() {
        let dir = temp_media_dir();
        let a = store_image(&dir, png_bytes(4, 4), "a.png").await.unwrap();
        let b = store_image(&dir, png_bytes(4, 4), "a.png").await.unwrap();
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn undecodable_content_is_removed() {
        let dir = temp_media_dir();
        let result = store_image(&dir, b"not an image".to_vec(), "fake.png").await;
        assert!(matches!(result, Err(ApiError::Validation(_))));
        assert_eq!(std::fs::read_dir(&dir).unwrap().count(), 0);
    }
}
