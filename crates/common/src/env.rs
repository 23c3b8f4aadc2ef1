//! Environment/runtime helpers
//!
//! Sanity checks to ensure expected directories exist at startup.

use std::path::Path;

use tracing::{info, warn};

/// Subfolders the media store writes into.
pub const UPLOAD_SUBDIRS: [&str; 2] = ["business_images", "events"];

/// Ensure the upload tree exists so the media store and static file service can use it.
pub async fn ensure_upload_dirs(upload_dir: &str) -> anyhow::Result<()> {
    for sub in UPLOAD_SUBDIRS {
        let dir = Path::new(upload_dir).join(sub);
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|e| anyhow::anyhow!("cannot create {}: {e}", dir.display()))?;
    }
    info!(%upload_dir, "upload directories ready");
    Ok(())
}

/// Warn when a `.env` file is absent; configuration then relies on the process environment.
pub async fn warn_missing_dotenv() {
    if tokio::fs::metadata(".env").await.is_err() {
        warn!("no .env file found; relying on process environment and config.toml");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn creates_all_upload_subdirs() -> anyhow::Result<()> {
        let root = std::env::temp_dir().join(format!("uploads_{}", uuid::Uuid::new_v4()));
        let root_str = root.to_string_lossy().to_string();
        ensure_upload_dirs(&root_str).await?;
        for sub in UPLOAD_SUBDIRS {
            assert!(tokio::fs::metadata(root.join(sub)).await?.is_dir());
        }
        // idempotent
        ensure_upload_dirs(&root_str).await?;
        let _ = tokio::fs::remove_dir_all(&root).await;
        Ok(())
    }
}
