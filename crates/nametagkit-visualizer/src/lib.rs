//! # NameTagKit Visualizer
//!
//! Interactive preview of a generated tag. A [`PreviewSession`] owns the
//! camera, the glyph source and the current model, and renders the scene to
//! a flat-shaded SVG.

pub mod visualizer;

pub use visualizer::{Camera, LightingParams, PreviewModel, PreviewSession, AUTO_ROTATE_SPEED_DEG};
