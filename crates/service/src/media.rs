//! Media store: persists uploads and hands back a stable reference string that
//! listings keep as a plain field value.
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::Utc;
use rand::Rng;
use tracing::info;

use crate::errors::ServiceError;

const IMAGE_EXTENSIONS: [&str; 4] = ["jpg", "jpeg", "png", "gif"];

/// Public URL prefix the stored files are served under.
pub const PUBLIC_PREFIX: &str = "uploads";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaFolder {
    BusinessImages,
    Events,
}

impl MediaFolder {
    pub fn dir_name(self) -> &'static str {
        match self {
            MediaFolder::BusinessImages => "business_images",
            MediaFolder::Events => "events",
        }
    }

    fn file_prefix(self) -> &'static str {
        match self {
            MediaFolder::BusinessImages => "",
            MediaFolder::Events => "event-",
        }
    }

    /// Business images accept any file; event uploads are limited to images.
    pub fn accepts(self, original_name: &str) -> bool {
        match self {
            MediaFolder::BusinessImages => true,
            MediaFolder::Events => extension(original_name)
                .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
                .unwrap_or(false),
        }
    }
}

fn extension(name: &str) -> Option<&str> {
    Path::new(name).extension().and_then(|e| e.to_str())
}

#[async_trait]
pub trait MediaStore: Send + Sync {
    /// Store `bytes` and return the reference (`uploads/<folder>/<file>`).
    async fn store(&self, folder: MediaFolder, original_name: &str, bytes: &[u8]) -> Result<String, ServiceError>;
    /// Remove a stored upload by its reference. A reference that no longer
    /// exists is not an error.
    async fn discard(&self, reference: &str) -> Result<(), ServiceError>;
}

/// Writes uploads below a root directory on the local filesystem.
pub struct LocalMediaStore {
    root: PathBuf,
}

impl LocalMediaStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn file_name(folder: MediaFolder, original_name: &str) -> String {
        let suffix = rand::thread_rng().gen_range(0..1_000_000_000u32);
        let ext = extension(original_name).map(|e| format!(".{e}")).unwrap_or_default();
        format!("{}{}-{}{}", folder.file_prefix(), Utc::now().timestamp_millis(), suffix, ext)
    }
}

#[async_trait]
impl MediaStore for LocalMediaStore {
    async fn store(&self, folder: MediaFolder, original_name: &str, bytes: &[u8]) -> Result<String, ServiceError> {
        if !folder.accepts(original_name) {
            return Err(ServiceError::invalid("image", "Only image files are allowed!"));
        }
        let dir = self.root.join(folder.dir_name());
        tokio::fs::create_dir_all(&dir).await.map_err(|e| ServiceError::Internal(e.to_string()))?;
        let name = Self::file_name(folder, original_name);
        tokio::fs::write(dir.join(&name), bytes).await.map_err(|e| ServiceError::Internal(e.to_string()))?;
        let reference = format!("{}/{}/{}", PUBLIC_PREFIX, folder.dir_name(), name);
        info!(reference = %reference, size = bytes.len(), "media_stored");
        Ok(reference)
    }

    async fn discard(&self, reference: &str) -> Result<(), ServiceError> {
        let relative = reference
            .strip_prefix(PUBLIC_PREFIX)
            .and_then(|r| r.strip_prefix('/'))
            .filter(|r| !r.split('/').any(|part| part.is_empty() || part == ".."))
            .ok_or_else(|| ServiceError::Internal(format!("not a media reference: {reference}")))?;
        match tokio::fs::remove_file(self.root.join(relative)).await {
            Ok(()) => {
                info!(reference = %reference, "media_discarded");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(ServiceError::Internal(e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_store() -> LocalMediaStore {
        LocalMediaStore::new(std::env::temp_dir().join(format!("media-test-{}", uuid::Uuid::new_v4())))
    }

    #[test]
    fn event_folder_only_accepts_images() {
        assert!(MediaFolder::Events.accepts("poster.PNG"));
        assert!(MediaFolder::Events.accepts("a.jpeg"));
        assert!(!MediaFolder::Events.accepts("notes.pdf"));
        assert!(!MediaFolder::Events.accepts("no_extension"));
        assert!(MediaFolder::BusinessImages.accepts("menu.pdf"));
    }

    #[tokio::test]
    async fn stores_under_folder_with_expected_name_shape() {
        let store = temp_store();
        let reference = store.store(MediaFolder::Events, "poster.png", b"png-bytes").await.unwrap();
        assert!(reference.starts_with("uploads/events/event-"));
        assert!(reference.ends_with(".png"));

        let file = reference.trim_start_matches("uploads/");
        let on_disk = tokio::fs::read(store.root().join(file)).await.unwrap();
        assert_eq!(on_disk, b"png-bytes");
        let _ = tokio::fs::remove_dir_all(store.root()).await;
    }

    #[tokio::test]
    async fn discard_removes_the_file_once() {
        let store = temp_store();
        let reference = store.store(MediaFolder::BusinessImages, "front.jpg", b"jpeg").await.unwrap();
        let on_disk = store.root().join(reference.trim_start_matches("uploads/"));
        assert!(on_disk.exists());

        store.discard(&reference).await.unwrap();
        assert!(!on_disk.exists());
        store.discard(&reference).await.unwrap();

        assert!(store.discard("uploads/../etc/passwd").await.is_err());
        assert!(store.discard("elsewhere/x.png").await.is_err());
        let _ = tokio::fs::remove_dir_all(store.root()).await;
    }

    #[tokio::test]
    async fn rejects_non_image_event_upload() {
        let store = temp_store();
        let err = store.store(MediaFolder::Events, "virus.exe", b"x").await.unwrap_err();
        assert!(err.to_string().contains("Only image files are allowed!"));
    }
}
