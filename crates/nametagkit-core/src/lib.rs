//! # NameTagKit Core
//!
//! Core types shared by every NameTagKit crate: the error taxonomy, validated
//! tag names, and batch progress/result records.

pub mod error;
pub mod names;
pub mod progress;

pub use error::{
    DeliveryError, Error, ExportError, GeometryError, Result, ValidationError, ValidationReason,
};
pub use names::{is_allowed_char, NameString, NameValidator, ValidationReport, MAX_NAME_LENGTH};
pub use progress::{BatchError, BatchResult, CancellationToken, ProgressEvent, ProgressStatus};
