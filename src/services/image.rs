//! Profile-picture storage: resize on upload, best-effort cleanup of the
//! previous file.

use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs;
use tokio::task;
use tracing::{info, warn};

use crate::constants::images::{ALLOWED_EXTENSIONS, DEFAULT_PROFILE_IMAGE, PROFILE_IMAGE_SIZE};

#[derive(Debug, Error)]
pub enum ImageError {
    #[error("File does not have an approved extension: {}", ALLOWED_EXTENSIONS.join(", "))]
    UnsupportedExtension,

    #[error("Failed to process image: {0}")]
    Processing(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub struct ImageService {
    media_path: PathBuf,
}

impl ImageService {
    #[must_use]
    pub fn new(media_path: &str) -> Self {
        Self {
            media_path: PathBuf::from(media_path),
        }
    }

    #[must_use]
    pub fn media_path(&self) -> &Path {
        &self.media_path
    }

    /// Create the media directory and a placeholder default image if missing.
    pub async fn ensure_default(&self) -> Result<(), ImageError> {
        fs::create_dir_all(&self.media_path).await?;

        let default_path = self.media_path.join(DEFAULT_PROFILE_IMAGE);
        if default_path.exists() {
            return Ok(());
        }

        task::spawn_blocking(move || {
            let placeholder = image::RgbaImage::from_pixel(
                PROFILE_IMAGE_SIZE,
                PROFILE_IMAGE_SIZE,
                image::Rgba([200, 200, 200, 255]),
            );
            placeholder
                .save(&default_path)
                .map_err(|e| ImageError::Processing(e.to_string()))
        })
        .await
        .map_err(|e| ImageError::Processing(format!("Image task panicked: {e}")))??;

        info!("Created default profile image");
        Ok(())
    }

    /// Resize an uploaded picture to fit the profile dimensions and store it
    /// under a random filename. Returns the stored filename.
    pub async fn save_picture(
        &self,
        data: Vec<u8>,
        original_filename: &str,
    ) -> Result<String, ImageError> {
        let extension = Path::new(original_filename)
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase)
            .ok_or(ImageError::UnsupportedExtension)?;

        if !ALLOWED_EXTENSIONS.contains(&extension.as_str()) {
            return Err(ImageError::UnsupportedExtension);
        }

        fs::create_dir_all(&self.media_path).await?;

        let filename = format!("{}.{}", random_hex(8), extension);
        let file_path = self.media_path.join(&filename);

        // Decoding and resizing are CPU-bound; keep them off the async runtime.
        task::spawn_blocking(move || {
            let decoded = image::load_from_memory(&data)
                .map_err(|e| ImageError::Processing(e.to_string()))?;

            let resized = decoded.thumbnail(PROFILE_IMAGE_SIZE, PROFILE_IMAGE_SIZE);

            resized
                .save(&file_path)
                .map_err(|e| ImageError::Processing(e.to_string()))
        })
        .await
        .map_err(|e| ImageError::Processing(format!("Image task panicked: {e}")))??;

        info!(filename = %filename, "Profile picture stored");
        Ok(filename)
    }

    /// Best-effort removal of a previous profile picture. The shared default
    /// image is never deleted.
    pub async fn delete_picture(&self, filename: &str) {
        if filename == DEFAULT_PROFILE_IMAGE {
            return;
        }

        let path = self.media_path.join(filename);
        if let Err(e) = fs::remove_file(&path).await {
            warn!(path = %path.display(), "Failed to remove previous profile picture: {e}");
        }
    }
}

/// Random lowercase hex string of `bytes * 2` characters.
#[must_use]
pub fn random_hex(bytes: usize) -> String {
    use rand::Rng;

    let mut rng = rand::rng();

    (0..bytes)
        .map(|_| rng.random::<u8>())
        .fold(String::with_capacity(bytes * 2), |mut acc, b| {
            use std::fmt::Write;
            let _ = write!(acc, "{b:02x}");
            acc
        })
}
