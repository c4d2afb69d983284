//! Where finished tags go.

use crate::archive::{stl_file_name, TagArtifact, UniqueStems};
use nametagkit_core::DeliveryError;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Receives each tag as soon as it has been exported.
pub trait Delivery {
    fn deliver(&mut self, artifact: TagArtifact) -> Result<(), DeliveryError>;
}

/// Keeps artifacts in memory, in delivery order, for later archiving.
#[derive(Debug, Clone, Default)]
pub struct MemoryDelivery {
    artifacts: Vec<TagArtifact>,
}

impl MemoryDelivery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn artifacts(&self) -> &[TagArtifact] {
        &self.artifacts
    }

    pub fn into_artifacts(self) -> Vec<TagArtifact> {
        self.artifacts
    }
}

impl Delivery for MemoryDelivery {
    fn deliver(&mut self, artifact: TagArtifact) -> Result<(), DeliveryError> {
        self.artifacts.push(artifact);
        Ok(())
    }
}

/// Writes each STL straight into a directory.
///
/// A name delivered twice gets a numbered file instead of overwriting the
/// first one.
#[derive(Debug, Clone)]
pub struct DirectoryDelivery {
    directory: PathBuf,
    written: Vec<PathBuf>,
    stems: UniqueStems,
}

impl DirectoryDelivery {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
            written: Vec::new(),
            stems: UniqueStems::new(),
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Paths written so far.
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }
}

impl Delivery for DirectoryDelivery {
    fn deliver(&mut self, artifact: TagArtifact) -> Result<(), DeliveryError> {
        let file_name = stl_file_name(&self.stems.claim(&artifact.name));
        let fail = |e: std::io::Error| DeliveryError::Failed {
            file_name: file_name.clone(),
            reason: e.to_string(),
        };
        std::fs::create_dir_all(&self.directory).map_err(fail)?;
        let path = self.directory.join(&file_name);
        std::fs::write(&path, &artifact.stl).map_err(fail)?;
        debug!("Wrote {} ({} bytes)", path.display(), artifact.stl.len());
        self.written.push(path);
        Ok(())
    }
}
