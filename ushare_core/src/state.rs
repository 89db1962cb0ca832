//! Mode binding
//!
//! Built once before the listener starts and shared read-only with the handlers.

use crate::ShareMode;
use crate::error::ShareError;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// The single file offered in send mode
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundFile {
    pub directory: PathBuf,
    pub file_name: OsString,
}

impl BoundFile {
    /// Absolute path of the bound file
    pub fn path(&self) -> PathBuf {
        self.directory.join(&self.file_name)
    }

    /// File name as shown to downloaders
    pub fn display_name(&self) -> String {
        self.file_name.to_string_lossy().into_owned()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransferState {
    Send(BoundFile),
    Receive { upload_dir: PathBuf },
}

impl TransferState {
    /// Bind send mode to `path`, relative to the working directory
    pub fn bind_for_send(path: &Path) -> Result<Self, ShareError> {
        let cwd = std::env::current_dir()?;
        Self::bind_for_send_in(&cwd, path)
    }

    /// Bind send mode to `path`, resolving relative paths against `cwd`
    pub fn bind_for_send_in(cwd: &Path, path: &Path) -> Result<Self, ShareError> {
        let full_path = cwd.join(path);

        let metadata = std::fs::metadata(&full_path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => ShareError::FileNotFound(path.to_path_buf()),
            _ => ShareError::Io(e),
        })?;
        if !metadata.is_file() {
            return Err(ShareError::NotAFile(path.to_path_buf()));
        }

        // Fail now rather than on the first download if we cannot read it
        std::fs::File::open(&full_path)?;

        let file_name = path
            .file_name()
            .ok_or_else(|| ShareError::NotAFile(path.to_path_buf()))?
            .to_os_string();

        let directory = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => cwd.join(parent),
            _ => cwd.to_path_buf(),
        };

        let bound = BoundFile {
            directory,
            file_name,
        };
        tracing::info!("Bound file for sending: {}", bound.path().display());
        Ok(TransferState::Send(bound))
    }

    /// Bind receive mode to `directory`, or the working directory when omitted
    pub fn bind_for_receive(directory: Option<&Path>) -> Result<Self, ShareError> {
        let cwd = std::env::current_dir()?;
        Self::bind_for_receive_in(&cwd, directory)
    }

    pub fn bind_for_receive_in(cwd: &Path, directory: Option<&Path>) -> Result<Self, ShareError> {
        let upload_dir = match directory {
            None => cwd.to_path_buf(),
            Some(dir) => {
                let full_path = cwd.join(dir);
                if !full_path.is_dir() {
                    return Err(ShareError::DirectoryNotFound(dir.to_path_buf()));
                }
                full_path
            }
        };

        tracing::info!("Receiving files into: {}", upload_dir.display());
        Ok(TransferState::Receive { upload_dir })
    }

    pub fn mode(&self) -> ShareMode {
        match self {
            TransferState::Send(_) => ShareMode::Send,
            TransferState::Receive { .. } => ShareMode::Receive,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_bind_bare_file_name_uses_cwd() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("notes.txt"), b"hi").unwrap();

        let state = TransferState::bind_for_send_in(dir.path(), Path::new("notes.txt")).unwrap();

        assert_eq!(state.mode(), ShareMode::Send);
        match state {
            TransferState::Send(bound) => {
                assert_eq!(bound.directory, dir.path());
                assert_eq!(bound.display_name(), "notes.txt");
            }
            _ => panic!("expected send state"),
        }
    }

    #[test]
    fn test_bind_nested_path_splits_directory() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("a").join("b");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(nested.join("photo.jpg"), b"jpeg").unwrap();

        let state = TransferState::bind_for_send_in(dir.path(), Path::new("a/b/photo.jpg")).unwrap();

        match state {
            TransferState::Send(bound) => {
                assert_eq!(bound.directory, nested);
                assert_eq!(bound.file_name, OsString::from("photo.jpg"));
                assert_eq!(bound.path(), nested.join("photo.jpg"));
            }
            _ => panic!("expected send state"),
        }
    }

    #[test]
    fn test_bind_absolute_path_ignores_cwd() {
        let dir = TempDir::new().unwrap();
        let other = TempDir::new().unwrap();
        let file = other.path().join("data.bin");
        std::fs::write(&file, [1u8, 2, 3]).unwrap();

        let state = TransferState::bind_for_send_in(dir.path(), &file).unwrap();

        match state {
            TransferState::Send(bound) => assert_eq!(bound.path(), file),
            _ => panic!("expected send state"),
        }
    }

    #[test]
    fn test_bind_missing_file_fails() {
        let dir = TempDir::new().unwrap();
        let err = TransferState::bind_for_send_in(dir.path(), Path::new("nope.txt")).unwrap_err();
        assert!(matches!(err, ShareError::FileNotFound(_)));
    }

    #[test]
    fn test_bind_directory_as_file_fails() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir(dir.path().join("folder")).unwrap();
        let err = TransferState::bind_for_send_in(dir.path(), Path::new("folder")).unwrap_err();
        assert!(matches!(err, ShareError::NotAFile(_)));
    }

    #[test]
    fn test_receive_defaults_to_cwd() {
        let dir = TempDir::new().unwrap();
        let state = TransferState::bind_for_receive_in(dir.path(), None).unwrap();
        assert_eq!(state.mode(), ShareMode::Receive);
        assert_eq!(
            state,
            TransferState::Receive {
                upload_dir: dir.path().to_path_buf()
            }
        );
    }

    #[test]
    fn test_receive_explicit_directory() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir(dir.path().join("inbox")).unwrap();
        let state = TransferState::bind_for_receive_in(dir.path(), Some(Path::new("inbox"))).unwrap();
        assert_eq!(
            state,
            TransferState::Receive {
                upload_dir: dir.path().join("inbox")
            }
        );
    }

    #[test]
    fn test_receive_missing_directory_fails() {
        let dir = TempDir::new().unwrap();
        let err =
            TransferState::bind_for_receive_in(dir.path(), Some(Path::new("missing"))).unwrap_err();
        assert!(matches!(err, ShareError::DirectoryNotFound(_)));
    }
}
