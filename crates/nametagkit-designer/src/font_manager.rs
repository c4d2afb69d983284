//! Font-backed glyph source for interactive preview.
//!
//! Outlines come from an installed font (looked up through `fontdb`, parsed with
//! `rusttype`). Advance widths still come from [`crate::glyphs::advance_width`];
//! each font glyph is scaled to the cap height and squeezed to fit its advance.

use crate::glyphs::{
    advance_width, is_supported, Glyph, GlyphSource, GlyphSourceKind, CAP_HEIGHT,
};
use crate::model::{bounds_of, Outline, Point};
use fontdb::{Database, Family, Query, Stretch, Style, Weight};
use lyon::geom::{CubicBezierSegment, LineSegment, QuadraticBezierSegment};
use lyon::math::point;
use nametagkit_core::GeometryError;
use rusttype::{Font, OutlineBuilder, Scale};
use std::{
    collections::{HashMap, HashSet},
    fs,
    sync::{Arc, Mutex, OnceLock},
};
use tracing::{debug, warn};

/// Share of the advance a font glyph may fill horizontally.
const INK_FILL: f64 = 0.9;

const FLATTEN_TOLERANCE: f32 = 0.01;

fn db() -> &'static Database {
    static DB: OnceLock<Database> = OnceLock::new();
    DB.get_or_init(|| {
        let mut db = Database::new();
        db.load_system_fonts();
        db
    })
}

pub fn list_font_families() -> Vec<String> {
    let mut set = HashSet::new();
    for face in db().faces() {
        for (name, _) in &face.families {
            set.insert(name.clone());
        }
    }
    let mut out: Vec<_> = set.into_iter().collect();
    out.sort();
    out
}

fn load_font_from_system(family: &str, bold: bool) -> Option<Font<'static>> {
    let families: Vec<Family<'_>> = match family.trim() {
        "" | "Sans" => vec![Family::SansSerif],
        "Serif" => vec![Family::Serif],
        "Monospace" => vec![Family::Monospace],
        other => vec![Family::Name(other)],
    };

    let query = Query {
        families: &families,
        weight: if bold { Weight::BOLD } else { Weight::NORMAL },
        stretch: Stretch::Normal,
        style: Style::Normal,
    };

    let id = db().query(&query)?;
    let face = db().face(id)?;

    match &face.source {
        fontdb::Source::File(path) => {
            let bytes = fs::read(path).ok()?;
            Font::try_from_vec(bytes)
        }
        fontdb::Source::SharedFile(path, _) => {
            let bytes = fs::read(path).ok()?;
            Font::try_from_vec(bytes)
        }
        fontdb::Source::Binary(bytes) => Font::try_from_vec(bytes.as_ref().as_ref().to_vec()),
    }
}

/// Collects flattened contours from a glyph outline.
#[derive(Default)]
struct RingCollector {
    rings: Vec<Vec<Point>>,
    current: Vec<Point>,
    last: lyon::math::Point,
}

impl RingCollector {
    fn push(&mut self, p: lyon::math::Point) {
        self.current.push(Point::new(p.x as f64, p.y as f64));
        self.last = p;
    }

    fn flush(&mut self) {
        let mut ring = std::mem::take(&mut self.current);
        if ring.len() > 1 && ring.first() == ring.last() {
            ring.pop();
        }
        if ring.len() >= 3 {
            self.rings.push(ring);
        }
    }
}

impl OutlineBuilder for RingCollector {
    fn move_to(&mut self, x: f32, y: f32) {
        self.flush();
        self.push(point(x, y));
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.push(point(x, y));
    }

    fn quad_to(&mut self, x1: f32, y1: f32, x: f32, y: f32) {
        let segment = QuadraticBezierSegment {
            from: self.last,
            ctrl: point(x1, y1),
            to: point(x, y),
        };
        let mut points = Vec::new();
        segment.for_each_flattened(FLATTEN_TOLERANCE, &mut |line: &LineSegment<f32>| {
            points.push(line.to)
        });
        for p in points {
            self.push(p);
        }
    }

    fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32) {
        let segment = CubicBezierSegment {
            from: self.last,
            ctrl1: point(x1, y1),
            ctrl2: point(x2, y2),
            to: point(x, y),
        };
        let mut points = Vec::new();
        segment.for_each_flattened(FLATTEN_TOLERANCE, &mut |line: &LineSegment<f32>| {
            points.push(line.to)
        });
        for p in points {
            self.push(p);
        }
    }

    fn close(&mut self) {
        self.flush();
    }
}

fn collect_rings(font: &Font<'static>, ch: char, scale: f32) -> Vec<Vec<Point>> {
    let mut collector = RingCollector::default();
    font.glyph(ch)
        .scaled(Scale::uniform(scale))
        .build_outline(&mut collector);
    collector.flush();
    collector.rings
}

/// Glyph source backed by an installed font. Preview only.
pub struct LoadedFontTable {
    family: String,
    font: Font<'static>,
    /// Font scale that makes a capital `H` exactly [`CAP_HEIGHT`] tall
    scale: f32,
    /// +1 when the font reports y growing upwards, -1 otherwise
    y_sign: f64,
    cache: Mutex<HashMap<char, Arc<Glyph>>>,
}

impl std::fmt::Debug for LoadedFontTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoadedFontTable")
            .field("family", &self.family)
            .field("scale", &self.scale)
            .finish()
    }
}

impl LoadedFontTable {
    /// Load `family` from the system font database.
    pub fn load(family: &str) -> Result<Self, GeometryError> {
        let font = load_font_from_system(family, true).ok_or_else(|| {
            warn!("Font family '{}' not found", family);
            GeometryError::FontUnavailable {
                family: family.to_string(),
            }
        })?;
        Self::from_font(family, font)
    }

    /// Use a font file already in memory.
    pub fn from_bytes(family: &str, bytes: Vec<u8>) -> Result<Self, GeometryError> {
        let font = Font::try_from_vec(bytes).ok_or_else(|| GeometryError::FontUnavailable {
            family: family.to_string(),
        })?;
        Self::from_font(family, font)
    }

    fn from_font(family: &str, font: Font<'static>) -> Result<Self, GeometryError> {
        let unavailable = || GeometryError::FontUnavailable {
            family: family.to_string(),
        };
        let reference: Vec<Outline> = Outline::assemble(collect_rings(&font, 'H', 1.0));
        let bounds = bounds_of(&reference).ok_or_else(unavailable)?;
        if bounds.height() <= f64::EPSILON {
            return Err(unavailable());
        }

        let y_sign = if bounds.max.y.abs() >= bounds.min.y.abs() {
            1.0
        } else {
            -1.0
        };
        let scale = (CAP_HEIGHT / bounds.height()) as f32;
        debug!("Loaded preview font '{}' (scale {:.3})", family, scale);

        Ok(Self {
            family: family.to_string(),
            font,
            scale,
            y_sign,
            cache: Mutex::new(HashMap::new()),
        })
    }

    pub fn family(&self) -> &str {
        &self.family
    }

    fn build_glyph(&self, ch: char) -> Result<Glyph, GeometryError> {
        let advance = advance_width(ch);
        if ch == ' ' || ch == '-' {
            return Ok(Glyph {
                ch,
                advance,
                outlines: Vec::new(),
            });
        }
        if self.font.glyph(ch).id().0 == 0 {
            return Err(GeometryError::UnsupportedCharacter { ch });
        }

        let rings: Vec<Vec<Point>> = collect_rings(&self.font, ch, self.scale)
            .into_iter()
            .map(|ring| {
                ring.into_iter()
                    .map(|p| Point::new(p.x, p.y * self.y_sign))
                    .collect()
            })
            .collect();
        let outlines = Outline::assemble(rings);
        let Some(ink) = bounds_of(&outlines) else {
            return Ok(Glyph {
                ch,
                advance,
                outlines,
            });
        };

        let squeeze = if ink.width() > advance * INK_FILL {
            advance * INK_FILL / ink.width()
        } else {
            1.0
        };
        let dx = (advance - ink.width() * squeeze) / 2.0;
        let outlines = outlines
            .iter()
            .map(|o| {
                o.translated(-ink.min.x, 0.0)
                    .scaled(squeeze, 1.0)
                    .translated(dx, 0.0)
            })
            .collect();

        Ok(Glyph {
            ch,
            advance,
            outlines,
        })
    }
}

impl GlyphSource for LoadedFontTable {
    fn kind(&self) -> GlyphSourceKind {
        GlyphSourceKind::LoadedFont
    }

    fn glyph(&self, ch: char) -> Result<Arc<Glyph>, GeometryError> {
        if !is_supported(ch) {
            return Err(GeometryError::UnsupportedCharacter { ch });
        }
        if let Some(glyph) = self.cache.lock().unwrap_or_else(|p| p.into_inner()).get(&ch) {
            return Ok(glyph.clone());
        }

        let glyph = Arc::new(self.build_glyph(ch)?);
        self.cache
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .insert(ch, glyph.clone());
        Ok(glyph)
    }
}
