//! # NameTagKit Designer
//!
//! Geometry for printable name tags: a validated name goes in, a solid
//! description and its triangle mesh come out.
//!
//! ## Pipeline
//!
//! ```text
//! NameString
//!   └── TextLayout (glyph table, scale, spacing)
//!         ├── Underline
//!         └── Solid (clip + glyph bodies + underline)
//!               ├── ops::merge_bodies (optional union)
//!               └── extrude → Mesh3D → binary STL
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use nametagkit_designer::{MeshExporter, StlExporter, TagGenerator};
//!
//! let solid = TagGenerator::default().generate(&name)?;
//! let stl = StlExporter::default().export(&solid)?;
//! ```

pub mod assembler;
pub mod clip;
pub mod export;
pub mod extrude;
pub mod font_manager;
pub mod glyphs;
pub mod layout;
pub mod model;
pub mod model3d;
pub mod ops;
pub mod solid;
pub mod underline;

pub use assembler::{TagDimensions, TagGenerator};
pub use clip::clip_outline;
pub use export::{MeshExporter, StlExporter};
pub use extrude::extrude_solid;
pub use font_manager::{list_font_families, LoadedFontTable};
pub use glyphs::{
    advance_width, glyph_advance_width, glyph_outline, BakedOutlineTable, Glyph, GlyphSource,
    GlyphSourceKind, WidthClass, ALPHABET, NARROW_CHARS, WIDE_CHARS,
};
pub use layout::{PlacedGlyph, TextLayout};
pub use model::{Bounds, Outline, Point};
pub use model3d::{Mesh3D, Triangle3D};
pub use ops::{merge_bodies, UnionMode};
pub use solid::{Bevel, BodyKind, Offset3, Solid, SolidBody};
pub use underline::Underline;
