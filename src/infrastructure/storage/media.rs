//! Listing media on the local filesystem
//!
//! Uploads are written under randomized names (`<32 hex>.<ext>`) and served
//! statically from `public_path`. Only names this module could have produced
//! are ever deleted.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::infrastructure::crypto::token::random_hex;
use crate::shared::DomainError;

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp", "gif", "avif"];
const VIDEO_EXTENSIONS: &[&str] = &["mp4", "webm", "mov"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Image,
    Video,
}

impl MediaKind {
    pub fn allowed_extensions(&self) -> &'static [&'static str] {
        match self {
            Self::Image => IMAGE_EXTENSIONS,
            Self::Video => VIDEO_EXTENSIONS,
        }
    }

    /// Lower-cased extension of `file_name` if it is allowed for this kind.
    pub fn extension_of(&self, file_name: &str) -> Result<String, DomainError> {
        let ext = Path::new(file_name)
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase)
            .unwrap_or_default();

        if self.allowed_extensions().contains(&ext.as_str()) {
            Ok(ext)
        } else {
            Err(DomainError::Validation(format!(
                "File '{}' has an unsupported type; allowed: {}",
                file_name,
                self.allowed_extensions().join(", ")
            )))
        }
    }
}

/// A file written by [`MediaStorage::save`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredMedia {
    pub kind: MediaKind,
    pub url: String,
}

#[derive(Debug, Clone)]
pub struct MediaStorage {
    root: PathBuf,
    public_path: String,
}

impl MediaStorage {
    pub fn new(root: impl Into<PathBuf>, public_path: &str) -> Self {
        Self {
            root: root.into(),
            public_path: format!("/{}", public_path.trim_matches('/')),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn public_path(&self) -> &str {
        &self.public_path
    }

    pub async fn ensure_root(&self) -> std::io::Result<()> {
        tokio::fs::create_dir_all(&self.root).await
    }

    /// Write an upload and return its public URL.
    pub async fn save(
        &self,
        kind: MediaKind,
        original_name: &str,
        bytes: &[u8],
    ) -> Result<StoredMedia, DomainError> {
        let ext = kind.extension_of(original_name)?;
        let file_name = format!("{}.{}", random_hex(16), ext);

        self.ensure_root()
            .await
            .map_err(|e| DomainError::Internal(format!("Cannot create upload dir: {}", e)))?;
        tokio::fs::write(self.root.join(&file_name), bytes)
            .await
            .map_err(|e| DomainError::Internal(format!("Cannot write upload: {}", e)))?;

        debug!(file = %file_name, size = bytes.len(), "Stored media file");
        Ok(StoredMedia {
            kind,
            url: format!("{}/{}", self.public_path, file_name),
        })
    }

    /// Map a public URL back to a path inside the upload directory.
    fn resolve(&self, url: &str) -> Option<PathBuf> {
        let name = url
            .strip_prefix(self.public_path.as_str())?
            .strip_prefix('/')?;

        let (stem, ext) = name.split_once('.')?;
        let valid_stem = stem.len() == 32 && stem.bytes().all(|b| b.is_ascii_hexdigit());
        let valid_ext = IMAGE_EXTENSIONS.contains(&ext) || VIDEO_EXTENSIONS.contains(&ext);

        (valid_stem && valid_ext).then(|| self.root.join(name))
    }

    /// Remove a stored file. Missing files and foreign URLs are ignored.
    pub async fn delete(&self, url: &str) {
        let Some(path) = self.resolve(url) else {
            debug!(url, "Not a managed media URL, skipping delete");
            return;
        };

        match tokio::fs::remove_file(&path).await {
            Ok(()) => debug!(url, "Deleted media file"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => warn!(url, error = %e, "Failed to delete media file"),
        }
    }

    pub async fn delete_all(&self, urls: &[String]) {
        for url in urls {
            self.delete(url).await;
        }
    }
}
