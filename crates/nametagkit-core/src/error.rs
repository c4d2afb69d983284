//! Error handling for NameTagKit
//!
//! Provides the error taxonomy shared by every stage of the tag pipeline:
//! - Validation errors (raw user input, abort the whole batch)
//! - Geometry errors (glyph lookup, outline union, tessellation)
//! - Export errors (mesh serialization, external CAD tool)
//! - Delivery errors (writing finished artifacts)
//!
//! All error types use `thiserror` for ergonomic error handling.

use std::fmt;
use thiserror::Error;

/// Why a single input line was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationReason {
    /// Nothing left after trimming
    Empty,
    /// More characters than the configured maximum
    TooLong {
        /// Number of characters in the trimmed line.
        length: usize,
        /// The configured maximum.
        max: usize,
    },
    /// Characters outside A-Z, 0-9, space and hyphen
    InvalidChars {
        /// The offending characters, in order of first appearance.
        invalid: Vec<char>,
    },
}

impl ValidationReason {
    /// Short machine-friendly tag: `empty`, `tooLong` or `invalidChars`.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::TooLong { .. } => "tooLong",
            Self::InvalidChars { .. } => "invalidChars",
        }
    }
}

impl fmt::Display for ValidationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "name is empty"),
            Self::TooLong { length, max } => {
                write!(f, "name is too long ({} characters, max {})", length, max)
            }
            Self::InvalidChars { invalid } => {
                let listed: Vec<String> = invalid.iter().map(|c| format!("'{}'", c)).collect();
                write!(
                    f,
                    "contains invalid characters {} (only A-Z, 0-9, spaces and hyphens are allowed)",
                    listed.join(", ")
                )
            }
        }
    }
}

/// A rejected input line.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Line {line_number}: {reason}")]
pub struct ValidationError {
    /// 1-based line number in the raw input.
    pub line_number: usize,
    /// Why the line was rejected.
    pub reason: ValidationReason,
    /// The trimmed line text.
    pub text: String,
}

impl ValidationError {
    pub fn new(line_number: usize, reason: ValidationReason, text: impl Into<String>) -> Self {
        Self {
            line_number,
            reason,
            text: text.into(),
        }
    }
}

/// Geometry error type
///
/// Raised while turning a validated name into a solid description.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    /// Character has no glyph in the active glyph source
    #[error("Unsupported character '{ch}'")]
    UnsupportedCharacter {
        /// The character without a glyph.
        ch: char,
    },

    /// Outline union failed or produced an unusable result
    #[error("Degenerate geometry: {reason}")]
    DegenerateGeometry {
        /// Description of the failure.
        reason: String,
    },

    /// Cap triangulation failed
    #[error("Tessellation failed: {reason}")]
    Tessellation {
        /// Description of the failure.
        reason: String,
    },

    /// Requested preview font could not be loaded
    #[error("Font family '{family}' is not available")]
    FontUnavailable {
        /// The requested family name.
        family: String,
    },
}

/// Export error type
///
/// Raised while serializing a solid to bytes, natively or through an external tool.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExportError {
    /// Mesh serialization failed
    #[error("Export failed: {reason}")]
    ExportFailure {
        /// Description of the failure.
        reason: String,
    },

    /// External CAD process failed
    #[error("{tool} failed: {reason}")]
    ExternalToolFailure {
        /// Tool name.
        tool: String,
        /// Description of the failure.
        reason: String,
    },

    /// External CAD process exceeded its time budget
    #[error("{tool} timed out after {timeout_ms}ms")]
    ExternalToolTimeout {
        /// Tool name.
        tool: String,
        /// The timeout duration in milliseconds.
        timeout_ms: u64,
    },

    /// External CAD tool could not be found
    #[error("{tool} executable not found")]
    ExternalToolMissing {
        /// Tool name.
        tool: String,
    },

    /// Solid was built from a preview-only glyph source
    #[error("Solid was generated from a preview glyph source and cannot be exported")]
    PreviewGeometry,
}

impl ExportError {
    pub fn failure(reason: impl Into<String>) -> Self {
        Self::ExportFailure {
            reason: reason.into(),
        }
    }
}

/// Delivery error type
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DeliveryError {
    /// Artifact could not be handed over
    #[error("Delivery of {file_name} failed: {reason}")]
    Failed {
        /// Artifact file name.
        file_name: String,
        /// Description of the failure.
        reason: String,
    },
}

/// Main error type for NameTagKit
///
/// Unified error type that can represent any error in the system.
#[derive(Error, Debug)]
pub enum Error {
    /// Validation error
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Geometry error
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    /// Export error
    #[error(transparent)]
    Export(#[from] ExportError),

    /// Delivery error
    #[error(transparent)]
    Delivery(#[from] DeliveryError),

    /// Standard I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an error from a string message
    pub fn other(msg: impl Into<String>) -> Self {
        Error::Other(msg.into())
    }

    /// Whether a batch records this error against one name and carries on.
    ///
    /// Only validation failures stop a batch; they are raised before generation starts.
    pub fn is_per_name(&self) -> bool {
        !matches!(self, Error::Validation(_))
    }

    /// Check if this is a validation error
    pub fn is_validation_error(&self) -> bool {
        matches!(self, Error::Validation(_))
    }

    /// Check if an external tool ran out of time
    pub fn is_timeout(&self) -> bool {
        matches!(self, Error::Export(ExportError::ExternalToolTimeout { .. }))
    }
}

/// Result type using Error
pub type Result<T> = std::result::Result<T, Error>;
