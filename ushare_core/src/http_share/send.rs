//! Download side: `GET /send`

use super::control::ServerControl;
use crate::error::ShareError;
use crate::state::BoundFile;
use crate::transfer::{content_disposition, content_type, open_bound_file};
use axum::body::Body;
use axum::extract::State;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use std::sync::Arc;
use tokio_util::io::ReaderStream;

/// Text returned when the bound file is gone
pub const MISSING_FILE_MESSAGE: &str = "File not found, may be wrong path or filename.";

pub struct SendState {
    pub bound: BoundFile,
    pub control: ServerControl,
}

/// Stream the bound file as an attachment.
///
/// A missing file is fatal: it is reported to `ServerControl`, which stops
/// the server.
pub async fn download_handler(State(state): State<Arc<SendState>>) -> Response {
    let (file, len) = match open_bound_file(&state.bound).await {
        Ok(opened) => opened,
        Err(ShareError::BoundFileMissing(path)) => {
            tracing::error!("{} ({})", MISSING_FILE_MESSAGE, path.display());
            state.control.abort(ShareError::BoundFileMissing(path));
            return (StatusCode::NOT_FOUND, MISSING_FILE_MESSAGE).into_response();
        }
        Err(e) => {
            tracing::error!("Cannot open {}: {}", state.bound.path().display(), e);
            return (StatusCode::INTERNAL_SERVER_ERROR, "Cannot read the shared file").into_response();
        }
    };

    let file_name = state.bound.display_name();
    tracing::info!("Serving {} ({} bytes)", file_name, len);

    (
        [
            (header::CONTENT_TYPE, content_type(&file_name)),
            (header::CONTENT_LENGTH, len.to_string()),
            (header::CONTENT_DISPOSITION, content_disposition(&file_name)),
        ],
        Body::from_stream(ReaderStream::new(file)),
    )
        .into_response()
}
