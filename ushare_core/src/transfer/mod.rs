//! Filesystem side of the two transfer directions.
//!
//! This module provides:
//! - File name sanitizing for uploads
//! - Staging and persisting uploaded files
//! - Opening the bound file and building download headers

pub mod constants;
pub mod receiver;
pub mod sender;
pub mod utils;

// Re-export public API
pub use constants::FALLBACK_FILE_NAME;
pub use receiver::{StagedUpload, persist_batch};
pub use sender::{content_disposition, content_type, open_bound_file};
pub use utils::sanitize_file_name;
