use std::net::SocketAddr;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ShareError {
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("Not a regular file: {}", .0.display())]
    NotAFile(PathBuf),

    #[error("Directory does not exist: {}", .0.display())]
    DirectoryNotFound(PathBuf),

    /// The bound file vanished between startup and a download request
    #[error("File not found, may be wrong path or filename: {}", .0.display())]
    BoundFileMissing(PathBuf),

    #[error("Cannot listen on {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot render QR code: {0}")]
    QrCode(#[from] qrcode::types::QrError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Why an upload batch was turned away. Always answered with the failure page.
#[derive(Debug, Error)]
pub enum UploadError {
    #[error("No files in upload")]
    NoFiles,

    #[error("Upload part has no file name")]
    EmptyFileName,

    #[error("Malformed multipart body: {0}")]
    Multipart(#[from] axum::extract::multipart::MultipartError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
