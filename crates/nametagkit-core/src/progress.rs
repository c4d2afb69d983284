//! Batch progress reporting and results.

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Status carried by a progress event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProgressStatus {
    Processing,
    Error,
}

/// One progress notification, emitted in strict name order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressEvent {
    /// 1-based position of the name in the batch
    pub current: usize,
    pub total: usize,
    pub name: String,
    pub status: ProgressStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ProgressEvent {
    pub fn processing(current: usize, total: usize, name: impl Into<String>) -> Self {
        Self {
            current,
            total,
            name: name.into(),
            status: ProgressStatus::Processing,
            error: None,
        }
    }

    pub fn failed(
        current: usize,
        total: usize,
        name: impl Into<String>,
        error: impl Into<String>,
    ) -> Self {
        Self {
            current,
            total,
            name: name.into(),
            status: ProgressStatus::Error,
            error: Some(error.into()),
        }
    }

    /// Completion percentage in `0.0..=100.0`.
    pub fn percent(&self) -> f64 {
        if self.total == 0 {
            return 100.0;
        }
        self.current as f64 / self.total as f64 * 100.0
    }
}

/// A name that could not be turned into a tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchError {
    pub name: String,
    pub error: String,
}

/// Summary of a batch run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchResult {
    pub total: usize,
    pub successful: usize,
    pub errors: Vec<BatchError>,
    /// Set when the run stopped early on a cancellation request
    #[serde(default)]
    pub cancelled: bool,
}

impl BatchResult {
    /// Build a result; `successful` is always `total - errors.len()`.
    pub fn new(total: usize, errors: Vec<BatchError>, cancelled: bool) -> Self {
        Self {
            total,
            successful: total.saturating_sub(errors.len()),
            errors,
            cancelled,
        }
    }

    pub fn is_complete_success(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Cooperative cancellation flag, checked between names.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    flag: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}
