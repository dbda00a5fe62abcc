//! Logical-key validation.
//!
//! Keys mirror file paths, so a hostile key like `../../etc/passwd` would
//! escape the storage root if joined naively. [`safe_key`] is the single
//! chokepoint every backend runs keys through before any I/O.

use super::{StorageError, StorageResult};

/// Validate a logical key and return its normalized form.
///
/// Leading slashes are stripped (the original site accepted `/images/...`
/// and `images/...` interchangeably). After normalization the key must be
/// non-empty, relative, and free of `.`/`..` segments and NUL bytes.
pub fn safe_key(key: &str) -> StorageResult<String> {
    let normalized = key.trim_start_matches('/');

    if normalized.is_empty() {
        return Err(StorageError::InvalidKey("key is empty".to_string()));
    }
    if normalized.contains('\0') {
        return Err(StorageError::InvalidKey("key contains a NUL byte".to_string()));
    }
    if normalized.contains('\\') {
        return Err(StorageError::InvalidKey(format!(
            "key {:?} contains a backslash",
            key
        )));
    }
    if normalized.split('/').any(|segment| segment == ".." || segment == ".") {
        return Err(StorageError::InvalidKey(format!(
            "key {:?} contains a path-escaping segment",
            key
        )));
    }

    Ok(normalized.to_string())
}
