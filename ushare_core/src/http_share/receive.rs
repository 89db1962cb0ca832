//! Upload side: `POST /receive`

use super::pages::{upload_failed_page, upload_success_page};
use crate::error::UploadError;
use crate::transfer::{StagedUpload, persist_batch};
use axum::extract::multipart::MultipartRejection;
use axum::extract::{Multipart, State};
use axum::response::Html;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Multipart field holding the uploaded files
pub const UPLOAD_FIELD: &str = "file";

pub struct ReceiveState {
    pub upload_dir: PathBuf,
}

/// Accept one or more files and write them to the upload directory.
///
/// Every outcome is a page with status 200: the success page when the whole
/// batch was written, the failure page otherwise.
pub async fn upload_handler(
    State(state): State<Arc<ReceiveState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Html<&'static str> {
    let multipart = match multipart {
        Ok(multipart) => multipart,
        Err(e) => {
            tracing::warn!("Rejected upload: {}", e);
            return upload_failed_page();
        }
    };

    match receive_files(&state.upload_dir, multipart).await {
        Ok(saved) => {
            tracing::info!("Upload complete: {} file(s)", saved.len());
            upload_success_page()
        }
        Err(e @ (UploadError::NoFiles | UploadError::EmptyFileName)) => {
            tracing::warn!("Rejected upload: {}", e);
            upload_failed_page()
        }
        Err(e) => {
            tracing::error!("Upload failed: {}", e);
            upload_failed_page()
        }
    }
}

/// Stage every `file` part, then persist the batch.
///
/// Nothing reaches its final name until all parts have been read, so a
/// rejected batch leaves the directory untouched.
pub async fn receive_files(
    upload_dir: &Path,
    mut multipart: Multipart,
) -> Result<Vec<PathBuf>, UploadError> {
    let mut staged = Vec::new();

    while let Some(mut field) = multipart.next_field().await? {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }

        let raw_name = match field.file_name() {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => return Err(UploadError::EmptyFileName),
        };

        let mut upload = StagedUpload::create(upload_dir, raw_name).await?;
        while let Some(chunk) = field.chunk().await? {
            upload.write_chunk(&chunk).await?;
        }
        upload.finish().await?;

        tracing::debug!(
            "Staged {:?} as {} ({} bytes)",
            upload.raw_name(),
            upload.target_name(),
            upload.size()
        );
        staged.push(upload);
    }

    if staged.is_empty() {
        return Err(UploadError::NoFiles);
    }

    Ok(persist_batch(upload_dir, staged).await?)
}
