//! Sequential batch generation.
//!
//! Names are processed strictly one after another. For each name a
//! `Processing` event is emitted, then the tag is generated, exported and
//! delivered. A failure is reported with an `Error` event and recorded in the
//! [`BatchResult`]; the batch then moves on to the next name, unless the
//! error is not a per-name one (see [`nametagkit_core::Error::is_per_name`]).
//! Then the batch stops as if cancelled.

use crate::archive::TagArtifact;
use crate::delivery::Delivery;
use nametagkit_core::{
    BatchError, BatchResult, CancellationToken, NameString, NameValidator, ProgressEvent, Result,
};
use nametagkit_designer::{MeshExporter, TagGenerator};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

/// Reason recorded for names skipped after cancellation
pub const CANCELLED_REASON: &str = "cancelled";

pub struct BatchProcessor<E: MeshExporter, D: Delivery> {
    generator: TagGenerator,
    exporter: E,
    delivery: D,
    cancel: CancellationToken,
}

impl<E: MeshExporter, D: Delivery> BatchProcessor<E, D> {
    pub fn new(generator: TagGenerator, exporter: E, delivery: D) -> Self {
        Self {
            generator,
            exporter,
            delivery,
            cancel: CancellationToken::new(),
        }
    }

    /// Share `token` with the caller so it can stop the batch between names.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    pub fn delivery(&self) -> &D {
        &self.delivery
    }

    pub fn into_delivery(self) -> D {
        self.delivery
    }

    fn process(&mut self, name: &NameString) -> Result<()> {
        let solid = self.generator.generate(name)?;
        let bytes = self.exporter.export(&solid)?;
        self.delivery
            .deliver(TagArtifact::new(name.clone(), bytes))?;
        Ok(())
    }

    /// Run the batch over already validated names.
    pub fn run<F>(&mut self, names: &[NameString], mut on_progress: F) -> BatchResult
    where
        F: FnMut(&ProgressEvent),
    {
        let job = Uuid::new_v4();
        let total = names.len();
        info!("Batch {} started: {} names", job, total);

        let mut errors = Vec::new();
        let mut cancelled = false;
        for (index, name) in names.iter().enumerate() {
            if cancelled || self.cancel.is_cancelled() {
                cancelled = true;
                warn!("Batch {} cancelled before '{}'", job, name);
                errors.extend(names[index..].iter().map(|n| BatchError {
                    name: n.to_string(),
                    error: CANCELLED_REASON.to_string(),
                }));
                break;
            }

            let current = index + 1;
            on_progress(&ProgressEvent::processing(current, total, name.as_str()));

            match self.process(name) {
                Ok(()) => debug!("Batch {}: '{}' done ({}/{})", job, name, current, total),
                Err(e) => {
                    warn!("Batch {}: '{}' failed: {}", job, name, e);
                    let message = e.to_string();
                    on_progress(&ProgressEvent::failed(
                        current,
                        total,
                        name.as_str(),
                        message.clone(),
                    ));
                    errors.push(BatchError {
                        name: name.to_string(),
                        error: message,
                    });
                    if !e.is_per_name() {
                        error!("Batch {} stopped at '{}': {}", job, name, e);
                        cancelled = true;
                    }
                }
            }
        }

        let result = BatchResult::new(total, errors, cancelled);
        info!(
            "Batch {} finished: {}/{} successful",
            job, result.successful, result.total
        );
        result
    }

    /// Validate `raw` first; any invalid line aborts before the first event.
    pub fn run_raw<F>(
        &mut self,
        raw: &str,
        validator: &NameValidator,
        on_progress: F,
    ) -> Result<BatchResult>
    where
        F: FnMut(&ProgressEvent),
    {
        let names = validator.validate(raw)?;
        Ok(self.run(&names, on_progress))
    }
}
