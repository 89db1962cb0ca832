/// Name used when nothing of the client's file name survives sanitizing
pub const FALLBACK_FILE_NAME: &str = "unnamed_file";

/// Longest file name we write, in bytes
pub const MAX_FILENAME_LENGTH: usize = 255;

/// Prefix of the hidden temp files uploads are staged in
pub const STAGING_PREFIX: &str = ".ushare-upload-";
