//! Left-to-right text layout, centred on `x = 0`.

use crate::glyphs::{Glyph, GlyphSource};
use nametagkit_core::{GeometryError, NameString};
use std::sync::Arc;

/// A glyph and the x position of its box's left edge.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedGlyph {
    pub glyph: Arc<Glyph>,
    pub x: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextLayout {
    pub glyphs: Vec<PlacedGlyph>,
    /// Sum of `advance * scale * spacing` over every character
    pub total_width: f64,
    pub scale: f64,
    pub spacing: f64,
}

impl TextLayout {
    /// Lay out `name`: the cursor starts at 0, each character records the
    /// cursor and then advances it by `advance * scale * spacing`. Every
    /// position is finally shifted left by half the total width.
    pub fn compute(
        name: &NameString,
        source: &dyn GlyphSource,
        scale: f64,
        spacing: f64,
    ) -> Result<Self, GeometryError> {
        let mut cursor = 0.0;
        let mut glyphs = Vec::with_capacity(name.len());
        for ch in name.chars() {
            let glyph = source.glyph(ch)?;
            let step = glyph.advance * scale * spacing;
            glyphs.push(PlacedGlyph { glyph, x: cursor });
            cursor += step;
        }

        let total_width = cursor;
        for placed in &mut glyphs {
            placed.x -= total_width / 2.0;
        }

        Ok(Self {
            glyphs,
            total_width,
            scale,
            spacing,
        })
    }

    /// Horizontal extent reserved by the glyphs: from the first cursor position
    /// to the final one.
    pub fn span(&self) -> (f64, f64) {
        match self.glyphs.first() {
            Some(first) => (first.x, first.x + self.total_width),
            None => (0.0, 0.0),
        }
    }

    /// Height of the glyph boxes after scaling.
    pub fn height(&self) -> f64 {
        crate::glyphs::CAP_HEIGHT * self.scale
    }
}
