//! Error types for packaging.

use thiserror::Error;

/// Errors raised while building the downloadable archive.
#[derive(Error, Debug)]
pub enum PackagerError {
    /// Two entries would share a file name.
    #[error("Duplicate archive entry: {0}")]
    DuplicateEntry(String),

    /// The zip writer failed.
    #[error("Archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    /// I/O error while writing an archive or output file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A template placeholder or slot was not found.
    #[error("Template error: {0}")]
    Template(String),
}

/// Result type alias for packaging operations.
pub type PackagerResult<T> = Result<T, PackagerError>;

impl From<PackagerError> for nametagkit_core::Error {
    fn from(err: PackagerError) -> Self {
        match err {
            PackagerError::Io(e) => nametagkit_core::Error::Io(e),
            other => nametagkit_core::Error::other(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = PackagerError::DuplicateEntry("BOB_tag.stl".to_string());
        assert_eq!(err.to_string(), "Duplicate archive entry: BOB_tag.stl");
    }

    #[test]
    fn test_into_core_error() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let core: nametagkit_core::Error = PackagerError::Io(io).into();
        assert!(matches!(core, nametagkit_core::Error::Io(_)));

        let core: nametagkit_core::Error = PackagerError::Template("x".into()).into();
        assert_eq!(core.to_string(), "Template error: x");
    }
}
