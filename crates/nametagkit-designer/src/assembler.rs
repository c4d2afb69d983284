//! Tag generation: layout, underline and clip combined into one [`Solid`].

use crate::clip::{clip_face_center, clip_outline};
use crate::glyphs::{BakedOutlineTable, GlyphSource, CAP_HEIGHT};
use crate::layout::TextLayout;
use crate::solid::{Bevel, BodyKind, Offset3, Solid, SolidBody};
use crate::underline::Underline;
use nametagkit_core::{GeometryError, NameString};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Parameters for tag geometry. All lengths in millimetres.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TagDimensions {
    /// Height of the capital letters
    pub font_size: f64,
    /// Multiplier applied to every advance
    pub spacing_factor: f64,
    /// Underline width relative to the text width
    pub underline_width_factor: f64,
    pub underline_thickness: f64,
    /// Distance from the baseline to the underline's top edge
    pub underline_gap: f64,
    pub clip_thickness: f64,
    pub text_thickness: f64,
    /// Where the centre of the text line sits on the clip
    pub text_offset_x: f64,
    pub text_offset_y: f64,
    /// Chamfer for text and underline; absent for square edges
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bevel: Option<Bevel>,
}

impl Default for TagDimensions {
    fn default() -> Self {
        let face = clip_face_center();
        Self {
            font_size: 8.0,
            spacing_factor: 1.2,
            underline_width_factor: 1.2,
            underline_thickness: 1.5,
            underline_gap: 2.0,
            clip_thickness: 4.0,
            text_thickness: 4.0,
            text_offset_x: face.x,
            text_offset_y: 5.25,
            bevel: Some(Bevel::default()),
        }
    }
}

impl TagDimensions {
    /// Glyph units to millimetres.
    pub fn scale(&self) -> f64 {
        self.font_size / CAP_HEIGHT
    }

    pub fn validate(&self) -> Result<(), String> {
        let positive = [
            ("font_size", self.font_size),
            ("spacing_factor", self.spacing_factor),
            ("underline_width_factor", self.underline_width_factor),
            ("underline_thickness", self.underline_thickness),
            ("clip_thickness", self.clip_thickness),
            ("text_thickness", self.text_thickness),
        ];
        for (key, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(format!("{} must be > 0", key));
            }
        }
        if !self.underline_gap.is_finite() || self.underline_gap < 0.0 {
            return Err("underline_gap must be >= 0".to_string());
        }
        if let Some(bevel) = self.bevel {
            if bevel.thickness <= 0.0 || bevel.size <= 0.0 {
                return Err("bevel thickness and size must be > 0".to_string());
            }
            if bevel.thickness >= self.text_thickness {
                return Err("bevel thickness must be less than text_thickness".to_string());
            }
        }
        Ok(())
    }
}

/// Builds tag solids from names.
///
/// Stateless apart from its dimensions: the same name always yields the same solid.
#[derive(Debug, Clone, Default)]
pub struct TagGenerator {
    dims: TagDimensions,
    baked: BakedOutlineTable,
}

impl TagGenerator {
    pub fn new(dims: TagDimensions) -> Self {
        Self {
            dims,
            baked: BakedOutlineTable,
        }
    }

    pub fn dimensions(&self) -> &TagDimensions {
        &self.dims
    }

    /// Printable solid for `name`, built from the baked outline table.
    pub fn generate(&self, name: &NameString) -> Result<Solid, GeometryError> {
        self.generate_with(name, &self.baked)
    }

    /// Solid for `name` using any glyph source. Only baked solids can be exported.
    pub fn generate_with(
        &self,
        name: &NameString,
        source: &dyn GlyphSource,
    ) -> Result<Solid, GeometryError> {
        let d = &self.dims;
        let layout = self.layout(name, source)?;
        let underline = Underline::for_layout(
            &layout,
            d.underline_width_factor,
            d.underline_thickness,
            d.underline_gap,
        );

        let text_offset = Offset3::new(d.text_offset_x, d.text_offset_y, d.clip_thickness);
        let mut bodies = vec![SolidBody {
            kind: BodyKind::Clip,
            outline: clip_outline().clone(),
            depth: d.clip_thickness,
            offset: Offset3::default(),
            bevel: None,
        }];

        for placed in &layout.glyphs {
            for outline in &placed.glyph.outlines {
                bodies.push(SolidBody {
                    kind: BodyKind::Glyph(placed.glyph.ch),
                    outline: outline.scaled(layout.scale, layout.scale).translated(placed.x, 0.0),
                    depth: d.text_thickness,
                    offset: text_offset,
                    bevel: d.bevel,
                });
            }
        }

        bodies.push(SolidBody {
            kind: BodyKind::Underline,
            outline: underline.outline(),
            depth: d.text_thickness,
            offset: text_offset,
            bevel: d.bevel,
        });

        debug!(
            "Assembled '{}': {} bodies, text width {:.2}mm",
            name,
            bodies.len(),
            layout.total_width
        );

        Ok(Solid {
            label: name.to_string(),
            glyph_source: source.kind(),
            bodies,
        })
    }

    /// Text layout for `name` at this generator's scale and spacing.
    pub fn layout(
        &self,
        name: &NameString,
        source: &dyn GlyphSource,
    ) -> Result<TextLayout, GeometryError> {
        TextLayout::compute(name, source, self.dims.scale(), self.dims.spacing_factor)
    }
}
