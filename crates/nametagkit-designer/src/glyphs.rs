//! # Glyph Table
//!
//! The one place that knows how wide and what shape every tag character is.
//!
//! Advance widths come from a three-tier table ([`advance_width`]). Outlines
//! come from a [`GlyphSource`]: the [`BakedOutlineTable`] traces fixed 7-row
//! stroke bitmaps into rectilinear polygons and is what every exported solid
//! uses; the font-backed table in [`crate::font_manager`] exists for preview.
//!
//! Glyph boxes are `advance_width(ch)` wide and [`CAP_HEIGHT`] tall with the
//! baseline at `y = 0`.

use crate::model::{Outline, Point};
use nametagkit_core::GeometryError;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::{Arc, OnceLock};
use tracing::debug;

/// Height of a glyph box in glyph units.
pub const CAP_HEIGHT: f64 = 5.0;

pub const NARROW_WIDTH: f64 = 2.5;
pub const REGULAR_WIDTH: f64 = 3.5;
pub const WIDE_WIDTH: f64 = 5.0;

/// Characters advanced by [`NARROW_WIDTH`].
pub const NARROW_CHARS: &[char] = &['I', 'i', 'l', '1', 'J', '.', ',', '-'];

/// Characters advanced by [`WIDE_WIDTH`].
pub const WIDE_CHARS: &[char] = &['W', 'M', 'H', 'K', 'O', 'D', 'Q', 'G'];

/// Characters with a glyph.
pub const ALPHABET: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789 -";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WidthClass {
    Narrow,
    Regular,
    Wide,
}

impl WidthClass {
    pub fn of(ch: char) -> Self {
        if NARROW_CHARS.contains(&ch) {
            Self::Narrow
        } else if WIDE_CHARS.contains(&ch) {
            Self::Wide
        } else {
            Self::Regular
        }
    }

    pub fn width(self) -> f64 {
        match self {
            Self::Narrow => NARROW_WIDTH,
            Self::Regular => REGULAR_WIDTH,
            Self::Wide => WIDE_WIDTH,
        }
    }
}

/// Advance width of `ch` in glyph units.
pub fn advance_width(ch: char) -> f64 {
    WidthClass::of(ch).width()
}

pub fn is_supported(ch: char) -> bool {
    ALPHABET.contains(ch)
}

/// One character's outline and advance.
#[derive(Debug, Clone, PartialEq)]
pub struct Glyph {
    pub ch: char,
    pub advance: f64,
    pub outlines: Vec<Outline>,
}

impl Glyph {
    /// True for glyphs that only advance the cursor.
    pub fn is_blank(&self) -> bool {
        self.outlines.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GlyphSourceKind {
    /// Deterministic built-in outlines
    Baked,
    /// Outlines taken from an installed font
    LoadedFont,
}

/// Supplies glyphs for text layout.
pub trait GlyphSource: Send + Sync {
    fn kind(&self) -> GlyphSourceKind;

    /// Glyph for `ch`; characters outside [`ALPHABET`] are `UnsupportedCharacter`.
    fn glyph(&self, ch: char) -> Result<Arc<Glyph>, GeometryError>;
}

/// Built-in outline table, traced once per process.
#[derive(Debug, Clone, Copy, Default)]
pub struct BakedOutlineTable;

impl BakedOutlineTable {
    pub fn new() -> Self {
        Self
    }

    fn table() -> &'static HashMap<char, Arc<Glyph>> {
        static TABLE: OnceLock<HashMap<char, Arc<Glyph>>> = OnceLock::new();
        TABLE.get_or_init(|| {
            let mut table = HashMap::new();
            for (ch, rows) in BITMAPS {
                table.insert(*ch, Arc::new(trace_bitmap(*ch, rows)));
            }
            for ch in [' ', '-'] {
                table.insert(
                    ch,
                    Arc::new(Glyph {
                        ch,
                        advance: advance_width(ch),
                        outlines: Vec::new(),
                    }),
                );
            }
            debug!("Baked {} glyph outlines", table.len());
            table
        })
    }
}

impl GlyphSource for BakedOutlineTable {
    fn kind(&self) -> GlyphSourceKind {
        GlyphSourceKind::Baked
    }

    fn glyph(&self, ch: char) -> Result<Arc<Glyph>, GeometryError> {
        Self::table()
            .get(&ch)
            .cloned()
            .ok_or(GeometryError::UnsupportedCharacter { ch })
    }
}

/// Outline of `ch` from the built-in table.
pub fn glyph_outline(ch: char) -> Result<Vec<Outline>, GeometryError> {
    Ok(BakedOutlineTable.glyph(ch)?.outlines.clone())
}

/// Same as [`advance_width`]; kept alongside [`glyph_outline`] for callers that
/// think in terms of the table.
pub fn glyph_advance_width(ch: char) -> f64 {
    advance_width(ch)
}

const ROWS: usize = 7;

type LatticePoint = (i32, i32);

/// Trace the filled cells of a bitmap into outlines.
///
/// Every cell contributes its four counter-clockwise lattice edges; an edge shared
/// by two filled cells appears once in each direction and cancels. The survivors
/// are chained into closed loops.
///
/// Bitmaps have no cells touching only at a corner, so each lattice vertex has
/// exactly one outgoing boundary edge.
fn trace_bitmap(ch: char, rows: &[&str; ROWS]) -> Glyph {
    let columns = rows[0].len();
    let mut boundary: BTreeSet<(LatticePoint, LatticePoint)> = BTreeSet::new();

    for (r, row) in rows.iter().enumerate() {
        for (c, cell) in row.bytes().enumerate() {
            if cell != b'#' {
                continue;
            }
            let (x0, x1) = (c as i32, c as i32 + 1);
            let (y0, y1) = ((ROWS - 1 - r) as i32, (ROWS - r) as i32);
            for (from, to) in [
                ((x0, y0), (x1, y0)),
                ((x1, y0), (x1, y1)),
                ((x1, y1), (x0, y1)),
                ((x0, y1), (x0, y0)),
            ] {
                if !boundary.remove(&(to, from)) {
                    boundary.insert((from, to));
                }
            }
        }
    }
    let mut edges: BTreeMap<LatticePoint, LatticePoint> = boundary.into_iter().collect();

    let advance = advance_width(ch);
    let sx = advance / columns as f64;
    let sy = CAP_HEIGHT / ROWS as f64;

    let mut rings = Vec::new();
    while let Some((&start, _)) = edges.iter().next() {
        let mut ring = vec![start];
        let mut current = start;
        while let Some(next) = edges.remove(&current) {
            if next == start {
                break;
            }
            ring.push(next);
            current = next;
        }
        rings.push(
            drop_collinear(&ring)
                .into_iter()
                .map(|(x, y)| Point::new(x as f64 * sx, y as f64 * sy))
                .collect(),
        );
    }

    Glyph {
        ch,
        advance,
        outlines: Outline::assemble(rings),
    }
}

fn drop_collinear(ring: &[LatticePoint]) -> Vec<LatticePoint> {
    let n = ring.len();
    (0..n)
        .filter(|&i| {
            let (px, py) = ring[(i + n - 1) % n];
            let (cx, cy) = ring[i];
            let (nx, ny) = ring[(i + 1) % n];
            (cx - px) * (ny - cy) - (cy - py) * (nx - cx) != 0
        })
        .map(|i| ring[i])
        .collect()
}

/// Stroke bitmaps, top row first. Narrow glyphs are three columns wide.
const BITMAPS: &[(char, [&str; ROWS])] = &[
    ('A', ["#####", "#...#", "#...#", "#####", "#...#", "#...#", "#...#"]),
    ('B', ["####.", "#..#.", "#..#.", "#####", "#...#", "#...#", "#####"]),
    ('C', ["#####", "#....", "#....", "#....", "#....", "#....", "#####"]),
    ('D', ["####.", "#..##", "#...#", "#...#", "#...#", "#..##", "####."]),
    ('E', ["#####", "#....", "#....", "####.", "#....", "#....", "#####"]),
    ('F', ["#####", "#....", "#....", "####.", "#....", "#....", "#...."]),
    ('G', ["#####", "#....", "#....", "#.###", "#...#", "#...#", "#####"]),
    ('H', ["#...#", "#...#", "#...#", "#####", "#...#", "#...#", "#...#"]),
    ('I', ["###", ".#.", ".#.", ".#.", ".#.", ".#.", "###"]),
    ('J', ["..#", "..#", "..#", "..#", "..#", "#.#", "###"]),
    ('K', ["#...#", "#...#", "#..##", "####.", "#..##", "#...#", "#...#"]),
    ('L', ["#....", "#....", "#....", "#....", "#....", "#....", "#####"]),
    ('M', ["#####", "#.#.#", "#.#.#", "#.#.#", "#...#", "#...#", "#...#"]),
    ('N', ["##..#", "###.#", "#.###", "#..##", "#...#", "#...#", "#...#"]),
    ('O', ["#####", "#...#", "#...#", "#...#", "#...#", "#...#", "#####"]),
    ('P', ["#####", "#...#", "#...#", "#####", "#....", "#....", "#...."]),
    ('Q', ["#####", "#...#", "#...#", "#...#", "#.###", "#..##", "#####"]),
    ('R', ["#####", "#...#", "#...#", "#####", "#..#.", "#..##", "#...#"]),
    ('S', ["#####", "#....", "#....", "#####", "....#", "....#", "#####"]),
    ('T', ["#####", "..#..", "..#..", "..#..", "..#..", "..#..", "..#.."]),
    ('U', ["#...#", "#...#", "#...#", "#...#", "#...#", "#...#", "#####"]),
    ('V', ["#...#", "#...#", "#...#", "#...#", "##.##", ".###.", "..#.."]),
    ('W', ["#...#", "#...#", "#...#", "#.#.#", "#.#.#", "#.#.#", "#####"]),
    ('X', ["#...#", "##.##", ".###.", "..#..", ".###.", "##.##", "#...#"]),
    ('Y', ["#...#", "#...#", "##.##", ".###.", "..#..", "..#..", "..#.."]),
    ('Z', ["#####", "...##", "..##.", ".##..", "##...", "#....", "#####"]),
    ('0', ["#####", "#...#", "#...#", "#...#", "#...#", "#...#", "#####"]),
    ('1', [".#.", "##.", ".#.", ".#.", ".#.", ".#.", "###"]),
    ('2', ["#####", "....#", "....#", "#####", "#....", "#....", "#####"]),
    ('3', ["#####", "....#", "....#", ".####", "....#", "....#", "#####"]),
    ('4', ["#...#", "#...#", "#...#", "#####", "....#", "....#", "....#"]),
    ('5', ["#####", "#....", "#....", "#####", "....#", "....#", "#####"]),
    ('6', ["#####", "#....", "#....", "#####", "#...#", "#...#", "#####"]),
    ('7', ["#####", "....#", "....#", "...##", "...#.", "...#.", "...#."]),
    ('8', ["#####", "#...#", "#...#", "#####", "#...#", "#...#", "#####"]),
    ('9', ["#####", "#...#", "#...#", "#####", "....#", "....#", "#####"]),
];
