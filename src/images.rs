//! Resolves image references of monster documents against a local root.

use std::path::{Path, PathBuf};

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use tracing::debug;

use crate::domain::{ImageData, MonsterFullResponse};

/// MIME type guessed from the file extension.
pub fn guess_mime_type(path: &str) -> &'static str {
    let extension = Path::new(path)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match extension.as_deref() {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("webp") => "image/webp",
        _ => "application/octet-stream",
    }
}

#[derive(Debug, Clone)]
pub struct ImageLoader {
    root: PathBuf,
}

impl ImageLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Builds the [`ImageData`] for `path`.
    ///
    /// Without `include_base64` only the path is returned. With it, the MIME
    /// type and encoded contents are added when the file can be read; a
    /// missing file still yields the bare path.
    pub async fn load(&self, path: &str, include_base64: bool) -> ImageData {
        let mut image = ImageData {
            path: path.to_string(),
            mime_type: None,
            base64: None,
        };
        if !include_base64 || path.is_empty() {
            return image;
        }

        let full_path = self.root.join(path.trim_start_matches('/'));
        match tokio::fs::read(&full_path).await {
            Ok(bytes) => {
                image.mime_type = Some(guess_mime_type(path).to_string());
                image.base64 = Some(STANDARD.encode(bytes));
            }
            Err(e) => {
                debug!(path = %full_path.display(), error = %e, "Image not readable");
            }
        }
        image
    }

    /// Rewrites every image slot of `monster`.
    pub async fn hydrate(&self, monster: &mut MonsterFullResponse, include_base64: bool) {
        for slot in monster.image_slots_mut() {
            if let Some(image) = slot.as_mut() {
                *image = self.load(&image.path, include_base64).await;
            }
        }
    }
}
