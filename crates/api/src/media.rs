//! Writes accepted post images below the media root.

use std::io::ErrorKind;
use std::path::Path;

use quill_core::media::{name_candidates, post_image_path, POST_IMAGE_DIR};
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;

use crate::error::AppError;
use crate::submission::UploadedFile;

/// Store `file` under `<media_root>/posts/` and return its media-relative
/// path (`posts/<name>`).
///
/// Each candidate name is claimed with `create_new`, so an existing file is
/// never overwritten, even by a concurrent upload of the same name.
pub async fn save_post_image(media_root: &Path, file: &UploadedFile) -> Result<String, AppError> {
    let dir = media_root.join(POST_IMAGE_DIR);
    tokio::fs::create_dir_all(&dir)
        .await
        .map_err(|e| AppError::InternalError(format!("Failed to create media dir: {e}")))?;

    for filename in name_candidates(&file.filename) {
        let dest = dir.join(&filename);
        let mut out = match OpenOptions::new().write(true).create_new(true).open(&dest).await {
            Ok(out) => out,
            Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
            Err(e) => {
                return Err(AppError::InternalError(format!("Failed to store image: {e}")));
            }
        };

        if let Err(e) = write_all(&mut out, &file.bytes).await {
            // No truncated files.
            let _ = tokio::fs::remove_file(&dest).await;
            return Err(AppError::InternalError(format!("Failed to store image: {e}")));
        }

        tracing::info!(path = %dest.display(), bytes = file.bytes.len(), "Stored post image");
        return Ok(post_image_path(&filename));
    }

    Err(AppError::InternalError(format!(
        "No free name for image '{}'",
        file.filename
    )))
}

async fn write_all(out: &mut tokio::fs::File, bytes: &[u8]) -> std::io::Result<()> {
    out.write_all(bytes).await?;
    out.flush().await
}

/// Delete an image stored by [`save_post_image`] whose post was never saved.
///
/// Failures are logged, not returned: the caller is already reporting the
/// error that made the image an orphan.
pub async fn discard_post_image(media_root: &Path, relative: &str) {
    let path = media_root.join(relative);
    match tokio::fs::remove_file(&path).await {
        Ok(()) => tracing::info!(path = %path.display(), "Discarded unsaved post image"),
        Err(e) => {
            tracing::warn!(error = %e, path = %path.display(), "Failed to discard post image")
        }
    }
}
