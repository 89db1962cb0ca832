use std::fmt;

pub mod config;
pub mod error;
pub mod http_share;
pub mod link;
pub mod net;
pub mod state;
pub mod transfer;

pub use config::{DEFAULT_PORT, ServeConfig};
pub use error::{ShareError, UploadError};
pub use link::ShareLink;
pub use state::{BoundFile, TransferState};

/// Operating mode, fixed at startup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShareMode {
    /// Serve one bound file for download
    Send,
    /// Accept uploads into a directory
    Receive,
}

impl ShareMode {
    /// URL path segment the mode is served under
    pub fn path_segment(self) -> &'static str {
        match self {
            ShareMode::Send => "send",
            ShareMode::Receive => "receive",
        }
    }
}

impl fmt::Display for ShareMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path_segment())
    }
}

