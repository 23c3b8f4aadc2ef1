use std::collections::HashMap;

use axum::extract::Multipart;
use service::media::{MediaFolder, MediaStore};
use tracing::{debug, warn};

use crate::errors::JsonApiError;

#[derive(Debug)]
pub struct UploadedFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// A multipart form split into its text fields and at most one file part.
#[derive(Debug, Default)]
pub struct MultipartForm {
    fields: HashMap<String, String>,
    file: Option<UploadedFile>,
}

impl MultipartForm {
    /// Drain `multipart`. The part named `file_field` is kept as the upload; an
    /// empty file part (no name, no bytes) counts as no upload.
    pub async fn read(mut multipart: Multipart, file_field: &str) -> Result<Self, JsonApiError> {
        let mut form = MultipartForm::default();
        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| JsonApiError::bad_request(e.body_text()))?
        {
            let name = field.name().unwrap_or_default().to_string();
            if name == file_field {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let bytes = field.bytes().await.map_err(|e| JsonApiError::bad_request(e.body_text()))?;
                if !file_name.is_empty() || !bytes.is_empty() {
                    debug!(field = %name, %file_name, size = bytes.len(), "multipart_file_received");
                    form.file = Some(UploadedFile { file_name, bytes: bytes.to_vec() });
                }
            } else {
                let text = field.text().await.map_err(|e| JsonApiError::bad_request(e.body_text()))?;
                form.fields.insert(name, text);
            }
        }
        Ok(form)
    }

    pub fn take(&mut self, name: &str) -> Option<String> {
        self.fields.remove(name)
    }

    pub fn take_file(&mut self) -> Option<UploadedFile> {
        self.file.take()
    }
}

/// Hand the upload, if any, to the media store and return its reference.
pub async fn store_upload(
    media: &dyn MediaStore,
    folder: MediaFolder,
    file: Option<UploadedFile>,
) -> Result<Option<String>, JsonApiError> {
    match file {
        Some(f) => Ok(Some(media.store(folder, &f.file_name, &f.bytes).await?)),
        None => Ok(None),
    }
}

/// Remove an upload whose listing mutation failed. Cleanup errors are logged,
/// the original failure is what the caller reports.
pub async fn discard_upload(media: &dyn MediaStore, reference: Option<&str>) {
    if let Some(reference) = reference {
        if let Err(e) = media.discard(reference).await {
            warn!(%reference, error = %e, "orphaned_upload_not_removed");
        }
    }
}
