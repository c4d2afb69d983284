//! 3D preview
//!
//! - Orbit camera (camera)
//! - Preview session with SVG rendering (preview)

pub mod camera;
pub mod preview;

pub use camera::Camera;
pub use preview::{LightingParams, PreviewModel, PreviewSession, AUTO_ROTATE_SPEED_DEG};
