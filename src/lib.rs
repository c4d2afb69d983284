//! # NameTagKit
//!
//! Turns a list of names into 3D-printable name tags: one STL per name,
//! bundled into a zip archive, with an optional SVG preview.
//!
//! ## Architecture
//!
//! NameTagKit is organized as a workspace with multiple crates:
//!
//! 1. **nametagkit-core** - Errors, name validation, progress records
//! 2. **nametagkit-designer** - Glyph table, layout, solids, STL export
//! 3. **nametagkit-visualizer** - Camera and preview session
//! 4. **nametagkit-settings** - Configuration files
//! 5. **nametagkit-packager** - Batch runs, OpenSCAD, zip archive
//! 6. **nametagkit** - Command-line binary that integrates all crates

pub mod cli;
pub mod commands;

pub use nametagkit_core::{
    BatchResult, Error, NameString, NameValidator, ProgressEvent, Result, ValidationError,
};
pub use nametagkit_designer::{MeshExporter, StlExporter, TagDimensions, TagGenerator, UnionMode};
pub use nametagkit_packager::{package_tags, BatchProcessor, PackageOptions};
pub use nametagkit_settings::Config;
pub use nametagkit_visualizer::PreviewSession;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// How log output is produced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LogOptions {
    /// Default level `debug` instead of `info`
    pub verbose: bool,
    /// One JSON object per line instead of human-readable output
    pub json: bool,
}

/// Initialize logging
///
/// Logs go to stderr so command output on stdout stays clean. `RUST_LOG`
/// overrides the default level.
pub fn init_logging(options: LogOptions) -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let default_level = if options.verbose { "debug" } else { "info" };
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    let registry = tracing_subscriber::registry().with(env_filter);
    if options.json {
        let fmt_layer = fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_current_span(false);
        registry
            .with(fmt_layer)
            .try_init()
            .map_err(|e| anyhow::anyhow!("failed to initialise logging: {}", e))?;
    } else {
        let fmt_layer = fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(options.verbose)
            .with_level(true)
            .with_line_number(options.verbose);
        registry
            .with(fmt_layer)
            .try_init()
            .map_err(|e| anyhow::anyhow!("failed to initialise logging: {}", e))?;
    }

    Ok(())
}
