//! # NameTagKit Packager
//!
//! Turns a list of validated names into a downloadable archive:
//!
//! - [`batch`]: sequential generation with progress events and error isolation
//! - [`delivery`]: in-memory collection or direct file output
//! - [`archive`]: deterministic zip with STL files and a README
//! - [`templates`]: OpenSCAD model, batch script and README text
//! - [`openscad`]: optional external renderer with a timeout

pub mod archive;
pub mod batch;
pub mod delivery;
pub mod error;
pub mod openscad;
pub mod templates;

pub use archive::{
    package_tags, stl_file_name, ArchiveBuilder, PackageOptions, TagArtifact, UniqueStems,
};
pub use batch::{BatchProcessor, CANCELLED_REASON};
pub use delivery::{Delivery, DirectoryDelivery, MemoryDelivery};
pub use error::{PackagerError, PackagerResult};
pub use openscad::{OpenScadRunner, ScadExporter};
pub use templates::{render_batch_script, render_instructions, ReadmeInfo, ScadTemplate};
