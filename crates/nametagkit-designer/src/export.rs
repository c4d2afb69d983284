//! Mesh export.

use crate::extrude::extrude_solid;
use crate::model3d::Mesh3D;
use crate::ops::{merge_bodies, UnionMode};
use crate::solid::Solid;
use nametagkit_core::{ExportError, Result};
use std::borrow::Cow;
use tracing::debug;

/// Turns a solid into the bytes of one model file.
pub trait MeshExporter {
    /// Extension of the produced files, without the dot
    fn file_extension(&self) -> &'static str {
        "stl"
    }

    fn export(&self, solid: &Solid) -> Result<Vec<u8>>;
}

/// Native binary STL writer.
///
/// Output depends only on the solid: identical solids give identical bytes.
#[derive(Debug, Clone, Copy, Default)]
pub struct StlExporter {
    pub union_mode: UnionMode,
}

impl StlExporter {
    pub fn new(union_mode: UnionMode) -> Self {
        Self { union_mode }
    }

    /// Mesh that [`MeshExporter::export`] would serialize.
    pub fn mesh(&self, solid: &Solid) -> Result<Mesh3D> {
        if !solid.is_printable() {
            return Err(ExportError::PreviewGeometry.into());
        }
        let solid = match self.union_mode {
            UnionMode::Disjoint => Cow::Borrowed(solid),
            UnionMode::Merged => Cow::Owned(merge_bodies(solid)?),
        };
        let mesh = extrude_solid(&solid)?;
        if mesh.is_empty() {
            return Err(ExportError::failure("mesh has no triangles").into());
        }
        Ok(mesh)
    }
}

impl MeshExporter for StlExporter {
    fn export(&self, solid: &Solid) -> Result<Vec<u8>> {
        let mesh = self.mesh(solid)?;
        let bytes = mesh.to_stl_binary()?;
        debug!(
            "Exported '{}' as STL: {} triangles, {} bytes",
            solid.label,
            mesh.triangle_count(),
            bytes.len()
        );
        Ok(bytes)
    }
}
