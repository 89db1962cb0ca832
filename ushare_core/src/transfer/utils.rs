use super::constants::{FALLBACK_FILE_NAME, MAX_FILENAME_LENGTH};
use unicode_normalization::UnicodeNormalization;

/// Device names Windows refuses as file stems
const RESERVED_NAMES: [&str; 22] = [
    "CON", "PRN", "AUX", "NUL", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7", "COM8",
    "COM9", "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9",
];

fn is_allowed(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.') || c.is_ascii_whitespace()
}

/// Turn a client-supplied file name into a single safe path segment.
///
/// The result is ASCII, never empty, and never contains a path separator,
/// so joining it onto a directory cannot escape that directory.
pub fn sanitize_file_name(file_name: &str) -> String {
    // 1. Decompose and keep the ASCII base characters (é -> e)
    // 2. Drop everything outside [A-Za-z0-9_.-] and whitespace
    let filtered: String = file_name
        .nfkd()
        .filter(|c| c.is_ascii() && is_allowed(*c))
        .collect();

    // 3+4. Trim, then join whitespace runs with '_'
    let joined = filtered.split_ascii_whitespace().collect::<Vec<_>>().join("_");

    // 5. No hidden files, no dot segments
    let mut clean_name = joined.trim_matches(|c| c == '.' || c == '_').to_string();

    // 6. Windows device names, checked on the stem
    let stem = clean_name.split('.').next().unwrap_or_default();
    if RESERVED_NAMES.iter().any(|r| stem.eq_ignore_ascii_case(r)) {
        clean_name.insert(0, '_');
    }

    // 7. Cap the length, keeping a short extension. Everything is ASCII here,
    // so byte indices are char boundaries.
    if clean_name.len() > MAX_FILENAME_LENGTH {
        match clean_name.rfind('.') {
            Some(idx) if clean_name.len() - idx < 20 => {
                let ext = clean_name[idx..].to_string();
                clean_name.truncate(MAX_FILENAME_LENGTH - ext.len());
                clean_name.push_str(&ext);
            }
            _ => clean_name.truncate(MAX_FILENAME_LENGTH),
        }
        // The cut may land right after a '.' or '_'
        let end = clean_name.trim_end_matches(['.', '_']).len();
        clean_name.truncate(end);
    }

    if clean_name.is_empty() {
        return FALLBACK_FILE_NAME.to_string();
    }

    clean_name
}
