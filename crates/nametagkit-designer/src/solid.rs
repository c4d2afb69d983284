//! Solid description produced for one tag.

use crate::glyphs::GlyphSourceKind;
use crate::model::Outline;
use serde::{Deserialize, Serialize};

/// Chamfer on the top edges of an extruded body.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bevel {
    /// Height of the chamfer band (mm)
    pub thickness: f64,
    /// Horizontal inset at the top face (mm)
    pub size: f64,
}

impl Default for Bevel {
    fn default() -> Self {
        Self {
            thickness: 0.3,
            size: 0.2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Offset3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Offset3 {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BodyKind {
    Clip,
    Glyph(char),
    Underline,
    /// Result of unioning several bodies of one layer
    Merged,
}

/// One outline swept upwards by `depth` from `offset.z`.
#[derive(Debug, Clone, PartialEq)]
pub struct SolidBody {
    pub kind: BodyKind,
    /// Outline in the body's local frame; `offset` moves it into place
    pub outline: Outline,
    pub depth: f64,
    pub offset: Offset3,
    pub bevel: Option<Bevel>,
}

impl SolidBody {
    /// Outline translated by the XY offset.
    pub fn world_outline(&self) -> Outline {
        self.outline.translated(self.offset.x, self.offset.y)
    }

    pub fn volume(&self) -> f64 {
        self.outline.area() * self.depth
    }
}

/// Everything needed to build one printable tag.
#[derive(Debug, Clone, PartialEq)]
pub struct Solid {
    /// The name the solid spells
    pub label: String,
    /// Which glyph source produced the text bodies
    pub glyph_source: GlyphSourceKind,
    pub bodies: Vec<SolidBody>,
}

impl Solid {
    pub fn bodies_of(&self, pred: impl Fn(&BodyKind) -> bool) -> impl Iterator<Item = &SolidBody> {
        self.bodies.iter().filter(move |b| pred(&b.kind))
    }

    /// Top of the tallest body.
    pub fn height(&self) -> f64 {
        self.bodies
            .iter()
            .map(|b| b.offset.z + b.depth)
            .fold(0.0, f64::max)
    }

    pub fn is_printable(&self) -> bool {
        self.glyph_source == GlyphSourceKind::Baked
    }
}
