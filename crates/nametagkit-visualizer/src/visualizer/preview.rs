//! Preview session: one tag, one camera, rendered to SVG.
//!
//! All state lives in [`PreviewSession`]; nothing here is global. The session
//! may use a [`LoadedFontTable`] for nicer letters, but the solids it shows
//! are never handed to an exporter.

use super::camera::Camera;
use glam::{Vec3, Vec4};
use nametagkit_core::{NameString, Result};
use nametagkit_designer::extrude::extrude_body;
use nametagkit_designer::{
    BakedOutlineTable, BodyKind, GlyphSource, GlyphSourceKind, LoadedFontTable, Solid,
    TagDimensions, TagGenerator, Triangle3D,
};
use std::fmt::Write;
use tracing::{debug, warn};

/// Degrees per second while auto-rotating
pub const AUTO_ROTATE_SPEED_DEG: f32 = 30.0;

/// Light model for the flat-shaded render.
#[derive(Debug, Clone, Copy)]
pub struct LightingParams {
    /// Direction the light travels, world space
    pub light_direction: Vec3,
    /// Fraction of the base colour that is always visible
    pub ambient: f32,
}

impl Default for LightingParams {
    fn default() -> Self {
        Self {
            light_direction: Vec3::new(-0.3, 0.5, -1.0).normalize(),
            ambient: 0.3,
        }
    }
}

impl LightingParams {
    /// Lambert intensity in `[ambient, 1]` for a surface normal.
    pub fn intensity(&self, normal: Vec3) -> f32 {
        let diffuse = normal.dot(-self.light_direction).max(0.0);
        self.ambient + (1.0 - self.ambient) * diffuse
    }
}

fn base_color(kind: BodyKind) -> [f32; 3] {
    match kind {
        BodyKind::Clip => [176.0, 180.0, 188.0],
        BodyKind::Glyph(_) | BodyKind::Merged => [33.0, 110.0, 201.0],
        BodyKind::Underline => [26.0, 86.0, 160.0],
    }
}

#[derive(Debug, Clone)]
struct ShadedTriangle {
    kind: BodyKind,
    triangle: Triangle3D,
}

/// The tag currently on display.
#[derive(Debug, Clone)]
pub struct PreviewModel {
    pub name: NameString,
    pub solid: Solid,
    triangles: Vec<ShadedTriangle>,
    bounds_min: Vec3,
    bounds_max: Vec3,
}

impl PreviewModel {
    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    pub fn bounds(&self) -> (Vec3, Vec3) {
        (self.bounds_min, self.bounds_max)
    }
}

/// Interactive preview state.
pub struct PreviewSession {
    pub camera: Camera,
    pub lighting: LightingParams,
    auto_rotate: bool,
    generator: TagGenerator,
    source: Box<dyn GlyphSource>,
    model: Option<PreviewModel>,
}

impl std::fmt::Debug for PreviewSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PreviewSession")
            .field("camera", &self.camera)
            .field("auto_rotate", &self.auto_rotate)
            .field("glyph_source", &self.source.kind())
            .field("model", &self.model.as_ref().map(|m| m.name.as_str()))
            .finish()
    }
}

impl Default for PreviewSession {
    fn default() -> Self {
        Self::new(TagDimensions::default(), Box::new(BakedOutlineTable))
    }
}

impl PreviewSession {
    pub fn new(dims: TagDimensions, source: Box<dyn GlyphSource>) -> Self {
        Self {
            camera: Camera::default(),
            lighting: LightingParams::default(),
            auto_rotate: false,
            generator: TagGenerator::new(dims),
            source,
            model: None,
        }
    }

    /// Session drawing letters from a system font, or from the baked table
    /// when `family` is `None` or cannot be loaded.
    pub fn with_font(dims: TagDimensions, family: Option<&str>) -> Self {
        let source: Box<dyn GlyphSource> = match family.map(LoadedFontTable::load) {
            Some(Ok(table)) => Box::new(table),
            Some(Err(e)) => {
                warn!("Preview font unavailable, using baked outlines: {}", e);
                Box::new(BakedOutlineTable)
            }
            None => Box::new(BakedOutlineTable),
        };
        Self::new(dims, source)
    }

    pub fn glyph_source(&self) -> GlyphSourceKind {
        self.source.kind()
    }

    pub fn model(&self) -> Option<&PreviewModel> {
        self.model.as_ref()
    }

    pub fn is_auto_rotating(&self) -> bool {
        self.auto_rotate
    }

    /// Build the tag for `name` and frame it. The previous model is kept
    /// when generation fails.
    pub fn load_name(&mut self, name: &NameString) -> Result<()> {
        let solid = self.generator.generate_with(name, self.source.as_ref())?;

        let mut triangles = Vec::new();
        for body in &solid.bodies {
            triangles.extend(
                extrude_body(body)?
                    .into_iter()
                    .map(|triangle| ShadedTriangle {
                        kind: body.kind,
                        triangle,
                    }),
            );
        }

        let mut bounds_min = Vec3::splat(f32::INFINITY);
        let mut bounds_max = Vec3::splat(f32::NEG_INFINITY);
        for t in &triangles {
            for v in &t.triangle.vertices {
                let v = Vec3::new(v.x, v.y, v.z);
                bounds_min = bounds_min.min(v);
                bounds_max = bounds_max.max(v);
            }
        }
        if triangles.is_empty() {
            bounds_min = Vec3::ZERO;
            bounds_max = Vec3::ZERO;
        }

        debug!(
            "Preview loaded '{}': {} triangles ({:?} glyphs)",
            name,
            triangles.len(),
            self.source.kind()
        );
        self.model = Some(PreviewModel {
            name: name.clone(),
            solid,
            triangles,
            bounds_min,
            bounds_max,
        });
        self.reset_view();
        Ok(())
    }

    /// Flip auto-rotation and return the new state.
    pub fn toggle_auto_rotate(&mut self) -> bool {
        self.auto_rotate = !self.auto_rotate;
        self.auto_rotate
    }

    /// Advance time by `dt` seconds.
    pub fn tick(&mut self, dt: f32) {
        if self.auto_rotate && dt > 0.0 {
            self.camera.orbit(AUTO_ROTATE_SPEED_DEG.to_radians() * dt, 0.0);
        }
    }

    /// Default orientation, framed on the current model.
    pub fn reset_view(&mut self) {
        let aspect = self.camera.aspect_ratio;
        self.camera = Camera {
            aspect_ratio: aspect,
            ..Camera::default()
        };
        if let Some(model) = &self.model {
            self.camera.fit_to_bounds(model.bounds_min, model.bounds_max);
        }
    }

    /// Flat-shaded SVG of the current view.
    ///
    /// Back faces are culled and the rest drawn far to near.
    pub fn render_svg(&self, width: u32, height: u32) -> String {
        let (w, h) = (width.max(1) as f32, height.max(1) as f32);
        let mut camera = self.camera;
        camera.update_aspect_ratio(w, h);
        let view = camera.view_matrix();
        let view_proj = camera.view_projection();
        let eye = camera.eye_position();

        let mut svg = String::new();
        let _ = writeln!(
            svg,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}" viewBox="0 0 {} {}">"#,
            width, height, width, height
        );
        let _ = writeln!(svg, r##"<rect width="100%" height="100%" fill="#f4f5f7"/>"##);

        let Some(model) = &self.model else {
            svg.push_str("</svg>\n");
            return svg;
        };

        let mut visible: Vec<(f32, [Vec3; 3], [u8; 3])> = Vec::new();
        for shaded in &model.triangles {
            let t = &shaded.triangle;
            let normal = Vec3::new(t.normal.x, t.normal.y, t.normal.z);
            if normal == Vec3::ZERO {
                continue;
            }
            let corners = t.vertices.map(|v| Vec3::new(v.x, v.y, v.z));
            let centroid = (corners[0] + corners[1] + corners[2]) / 3.0;
            if normal.dot(eye - centroid) <= 0.0 {
                continue;
            }

            let clip = corners.map(|c| view_proj * c.extend(1.0));
            if clip.iter().any(|c| c.w <= camera.near) {
                continue;
            }
            let screen = clip.map(|c: Vec4| {
                let ndc = c.truncate() / c.w;
                Vec3::new((ndc.x + 1.0) * 0.5 * w, (1.0 - ndc.y) * 0.5 * h, ndc.z)
            });

            let depth = view.transform_point3(centroid).z;
            let shade = self.lighting.intensity(normal);
            let color = base_color(shaded.kind).map(|c| (c * shade).round().clamp(0.0, 255.0) as u8);
            visible.push((depth, screen, color));
        }

        // Most negative view-space z is farthest away
        visible.sort_by(|a, b| a.0.total_cmp(&b.0));

        for (_, [a, b, c], [r, g, bl]) in &visible {
            let _ = writeln!(
                svg,
                r##"<polygon points="{:.2},{:.2} {:.2},{:.2} {:.2},{:.2}" fill="#{:02x}{:02x}{:02x}"/>"##,
                a.x, a.y, b.x, b.y, c.x, c.y, r, g, bl
            );
        }
        svg.push_str("</svg>\n");
        svg
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nametagkit_core::MAX_NAME_LENGTH;

    fn name(text: &str) -> NameString {
        NameString::parse(text, MAX_NAME_LENGTH).unwrap()
    }

    #[test]
    fn test_empty_session_renders_background() {
        let svg = PreviewSession::default().render_svg(320, 240);
        assert!(svg.starts_with("<svg"));
        assert!(svg.trim_end().ends_with("</svg>"));
        assert!(!svg.contains("<polygon"));
    }

    #[test]
    fn test_lambert_range() {
        let lighting = LightingParams::default();
        assert!((lighting.intensity(-lighting.light_direction) - 1.0).abs() < 1e-5);
        assert_eq!(lighting.intensity(lighting.light_direction), lighting.ambient);
    }

    #[test]
    fn test_back_faces_are_culled() {
        let mut session = PreviewSession::default();
        session.load_name(&name("BOB")).unwrap();
        let model = session.model().unwrap();
        let svg = session.render_svg(400, 300);
        let drawn = svg.matches("<polygon").count();
        assert!(drawn > 0);
        assert!(drawn < model.triangle_count());
    }

    #[test]
    fn test_auto_rotate_only_moves_when_enabled() {
        let mut session = PreviewSession::default();
        let yaw = session.camera.yaw;
        session.tick(1.0);
        assert_eq!(session.camera.yaw, yaw);

        assert!(session.toggle_auto_rotate());
        session.tick(1.0);
        assert_ne!(session.camera.yaw, yaw);
        assert!(!session.toggle_auto_rotate());
    }
}
