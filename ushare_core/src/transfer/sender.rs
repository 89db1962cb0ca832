use super::utils::sanitize_file_name;
use crate::error::ShareError;
use crate::state::BoundFile;
use tokio::fs::File;

/// Bytes that may appear unescaped in an RFC 5987 `filename*` value
fn is_attr_char(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b"!#$&+-.^_`|~".contains(&b)
}

/// Open the bound file for streaming, returning it with its length.
///
/// A file that no longer exists is reported as `BoundFileMissing`.
pub async fn open_bound_file(bound: &BoundFile) -> Result<(File, u64), ShareError> {
    let path = bound.path();

    let file = File::open(&path).await.map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => ShareError::BoundFileMissing(path.clone()),
        _ => ShareError::Io(e),
    })?;

    let metadata = file.metadata().await?;
    if !metadata.is_file() {
        return Err(ShareError::BoundFileMissing(path));
    }

    Ok((file, metadata.len()))
}

/// `Content-Disposition` value that makes browsers save `file_name`
pub fn content_disposition(file_name: &str) -> String {
    let plain = file_name
        .chars()
        .all(|c| (c.is_ascii_graphic() || c == ' ') && c != '"' && c != '\\');

    if plain {
        return format!("attachment; filename=\"{}\"", file_name);
    }

    let encoded: String = file_name
        .bytes()
        .map(|b| {
            if is_attr_char(b) {
                (b as char).to_string()
            } else {
                format!("%{:02X}", b)
            }
        })
        .collect();

    format!(
        "attachment; filename=\"{}\"; filename*=UTF-8''{}",
        sanitize_file_name(file_name),
        encoded
    )
}

/// Guess the MIME type from the file extension
pub fn content_type(file_name: &str) -> String {
    mime_guess::from_path(file_name)
        .first_or_octet_stream()
        .essence_str()
        .to_string()
}
