/*!
 * VFS Error Types
 * Structured, type-safe error handling for filesystem operations
 */

use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

/// VFS operation result
pub type VfsResult<T> = Result<T, VfsError>;

/// VFS errors with structured, type-safe error handling
///
/// All error variants include context strings that should be non-empty.
/// Serialization uses tagged enum pattern for type safety.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case", tag = "error", content = "details")]
pub enum VfsError {
    #[error("Not found: {0}")]
    NotFound(#[serde(deserialize_with = "deserialize_nonempty_string")] String),

    #[error("Permission denied: {0}")]
    PermissionDenied(#[serde(deserialize_with = "deserialize_nonempty_string")] String),

    #[error("Is a directory: {0}")]
    IsADirectory(#[serde(deserialize_with = "deserialize_nonempty_string")] String),

    #[error("Invalid path: {0}")]
    InvalidPath(#[serde(deserialize_with = "deserialize_nonempty_string")] String),

    #[error("I/O error: {0}")]
    IoError(#[serde(deserialize_with = "deserialize_nonempty_string")] String),
}

impl VfsError {
    /// Convert std::io::Error to VfsError
    pub fn from_io(e: std::io::Error, context: impl Into<String>) -> Self {
        use std::io::ErrorKind;
        match e.kind() {
            ErrorKind::NotFound => VfsError::NotFound(context.into()),
            ErrorKind::PermissionDenied => VfsError::PermissionDenied(context.into()),
            _ => VfsError::IoError(format!("{}: {}", context.into(), e)),
        }
    }
}

/// Deserialize and validate non-empty string for error messages
fn deserialize_nonempty_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    if s.is_empty() {
        return Err(serde::de::Error::custom("error message must not be empty"));
    }
    Ok(s)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vfs_error_validation() {
        let error = VfsError::NotFound("file.txt".to_string());
        let json = serde_json::to_string(&error).unwrap();
        let deserialized: VfsError = serde_json::from_str(&json).unwrap();
        assert_eq!(error, deserialized);

        // Empty context is rejected
        let invalid_json = r#"{"error":"not_found","details":""}"#;
        let result: Result<VfsError, _> = serde_json::from_str(invalid_json);
        assert!(result.is_err());
    }

    #[test]
    fn test_from_io_kind() {
        let err = VfsError::from_io(std::io::Error::from(std::io::ErrorKind::NotFound), "a.txt");
        assert_eq!(err, VfsError::NotFound("a.txt".into()));

        let err = VfsError::from_io(std::io::Error::other("disk on fire"), "b.txt");
        assert!(matches!(err, VfsError::IoError(msg) if msg.contains("disk on fire")));
    }

    #[test]
    fn test_vfs_result_propagates() {
        fn open_twice(name: &str) -> VfsResult<()> {
            let fail = || -> VfsResult<()> { Err(VfsError::NotFound(name.to_string())) };
            fail()?;
            fail()
        }

        assert_eq!(open_twice("x"), Err(VfsError::NotFound("x".into())));
    }
}
