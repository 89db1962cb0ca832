use super::constants::STAGING_PREFIX;
use super::utils::sanitize_file_name;
use std::io;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;

/// One uploaded part, held in a temp file inside the upload directory
/// until the whole batch has been read.
///
/// Dropping a staged upload deletes its temp file.
pub struct StagedUpload {
    raw_name: String,
    temp: NamedTempFile,
    writer: File,
    size: u64,
}

impl StagedUpload {
    /// Create an empty staging file in `upload_dir`
    pub async fn create(upload_dir: &Path, raw_name: impl Into<String>) -> io::Result<Self> {
        let raw_name = raw_name.into();
        let dir = upload_dir.to_path_buf();
        let temp = tokio::task::spawn_blocking(move || staging_file(&dir))
            .await
            .map_err(io::Error::other)??;
        let writer = File::from_std(temp.as_file().try_clone()?);

        Ok(Self {
            raw_name,
            temp,
            writer,
            size: 0,
        })
    }

    pub async fn write_chunk(&mut self, chunk: &[u8]) -> io::Result<()> {
        self.writer.write_all(chunk).await?;
        self.size += chunk.len() as u64;
        Ok(())
    }

    /// Flush everything written so far to the staging file
    pub async fn finish(&mut self) -> io::Result<()> {
        self.writer.flush().await
    }

    /// File name exactly as the client sent it
    pub fn raw_name(&self) -> &str {
        &self.raw_name
    }

    /// Name the upload will be saved under
    pub fn target_name(&self) -> String {
        sanitize_file_name(&self.raw_name)
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    /// Move the staged bytes to `upload_dir/<sanitized name>`, replacing any
    /// existing file of that name.
    pub fn persist(self, upload_dir: &Path) -> io::Result<PathBuf> {
        let target = upload_dir.join(self.target_name());
        let StagedUpload { temp, writer, .. } = self;
        drop(writer);

        temp.persist(&target).map_err(|e| e.error)?;
        Ok(target)
    }
}

/// Temp file in `upload_dir`. On unix it is created 0666 minus the umask,
/// the same as any other new file, so renaming it into place does not leave
/// an owner-only upload.
fn staging_file(upload_dir: &Path) -> io::Result<NamedTempFile> {
    let mut builder = tempfile::Builder::new();
    builder.prefix(STAGING_PREFIX);
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(std::fs::Permissions::from_mode(0o666));
    }
    builder.tempfile_in(upload_dir)
}

/// Persist every staged upload in order, off the async workers.
///
/// Stops at the first failure; uploads persisted before it stay on disk and
/// the rest are discarded.
pub async fn persist_batch(
    upload_dir: &Path,
    staged: Vec<StagedUpload>,
) -> io::Result<Vec<PathBuf>> {
    let dir = upload_dir.to_path_buf();
    tokio::task::spawn_blocking(move || {
        let mut saved = Vec::with_capacity(staged.len());
        for upload in staged {
            let size = upload.size();
            let path = upload.persist(&dir)?;
            tracing::info!("Saved upload {} ({} bytes)", path.display(), size);
            saved.push(path);
        }
        Ok(saved)
    })
    .await
    .map_err(io::Error::other)?
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn dir_entries(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[tokio::test]
    async fn test_stage_and_persist() {
        let dir = TempDir::new().unwrap();

        let mut upload = StagedUpload::create(dir.path(), "my notes.txt").await.unwrap();
        upload.write_chunk(b"hello ").await.unwrap();
        upload.write_chunk(b"world").await.unwrap();
        upload.finish().await.unwrap();

        assert_eq!(upload.raw_name(), "my notes.txt");
        assert_eq!(upload.target_name(), "my_notes.txt");
        assert_eq!(upload.size(), 11);

        let path = upload.persist(dir.path()).unwrap();
        assert_eq!(path, dir.path().join("my_notes.txt"));
        assert_eq!(std::fs::read(&path).unwrap(), b"hello world");
        assert_eq!(dir_entries(dir.path()), vec!["my_notes.txt"]);
    }

    #[tokio::test]
    async fn test_dropped_upload_leaves_no_trace() {
        let dir = TempDir::new().unwrap();

        let mut upload = StagedUpload::create(dir.path(), "discard.bin").await.unwrap();
        upload.write_chunk(&[0u8; 1024]).await.unwrap();
        upload.finish().await.unwrap();
        drop(upload);

        assert!(dir_entries(dir.path()).is_empty());
    }

    #[tokio::test]
    async fn test_persist_overwrites_existing() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("same.txt"), b"old contents").unwrap();

        let mut upload = StagedUpload::create(dir.path(), "same.txt").await.unwrap();
        upload.write_chunk(b"new").await.unwrap();
        upload.finish().await.unwrap();
        upload.persist(dir.path()).unwrap();

        assert_eq!(std::fs::read(dir.path().join("same.txt")).unwrap(), b"new");
        assert_eq!(dir_entries(dir.path()), vec!["same.txt"]);
    }

    #[tokio::test]
    async fn test_persist_batch_stops_at_first_failure() {
        let dir = TempDir::new().unwrap();
        // A directory where the second upload wants to land makes the rename fail
        std::fs::create_dir(dir.path().join("blocked")).unwrap();
        std::fs::write(dir.path().join("blocked").join("keep"), b"x").unwrap();

        let mut staged = Vec::new();
        for name in ["first.txt", "blocked", "third.txt"] {
            let mut upload = StagedUpload::create(dir.path(), name).await.unwrap();
            upload.write_chunk(name.as_bytes()).await.unwrap();
            upload.finish().await.unwrap();
            staged.push(upload);
        }

        assert!(persist_batch(dir.path(), staged).await.is_err());
        assert_eq!(dir_entries(dir.path()), vec!["blocked", "first.txt"]);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_overwritten_upload_gets_regular_file_mode() {
        use std::os::unix::fs::PermissionsExt;

        let mode = |path: &Path| std::fs::metadata(path).unwrap().permissions().mode() & 0o777;

        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("reference"), b"x").unwrap();
        let expected = mode(&dir.path().join("reference"));

        let existing = dir.path().join("shared.txt");
        std::fs::write(&existing, b"old").unwrap();
        std::fs::set_permissions(&existing, std::fs::Permissions::from_mode(0o644)).unwrap();

        let mut upload = StagedUpload::create(dir.path(), "shared.txt").await.unwrap();
        upload.write_chunk(b"new").await.unwrap();
        upload.finish().await.unwrap();
        let saved = persist_batch(dir.path(), vec![upload]).await.unwrap();

        assert_eq!(saved, vec![existing.clone()]);
        assert_eq!(std::fs::read(&existing).unwrap(), b"new");
        assert_eq!(mode(&existing), expected);
    }
}
