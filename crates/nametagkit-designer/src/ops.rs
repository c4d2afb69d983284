//! Boundary union of the bodies of a solid.
//!
//! Bodies that share a base height, depth and bevel form one layer. A layer's
//! outlines are unioned in 2D before extrusion: outlines that only touch are
//! merged into one, while outlines that overlap are reported as
//! `DegenerateGeometry` instead of being silently fused.
//!
//! Merging never produces a single watertight manifold. The clip and the
//! text layer stay separate shells that meet at `z = clip_thickness`, and
//! outlines that do not touch (separate letters, the underline) stay
//! separate bodies.

use crate::model::{signed_area, Outline, Point};
use crate::solid::{Bevel, BodyKind, Offset3, Solid, SolidBody};
use csgrs::sketch::Sketch;
use csgrs::traits::CSG;
use nametagkit_core::GeometryError;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// How a solid's bodies are written to a mesh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnionMode {
    /// Every body is its own closed shell
    #[default]
    Disjoint,
    /// Touching outlines of one layer are unioned before extrusion.
    ///
    /// Layers are not joined to each other, so the mesh is still several
    /// shells.
    Merged,
}

/// Relative area mismatch above which a union counts as overlapping.
const AREA_TOLERANCE: f64 = 1e-6;

#[derive(Debug, Clone, Copy, PartialEq)]
struct LayerKey {
    z: f64,
    depth: f64,
    bevel: Option<Bevel>,
}

impl LayerKey {
    fn of(body: &SolidBody) -> Self {
        Self {
            z: body.offset.z,
            depth: body.depth,
            bevel: body.bevel,
        }
    }
}

fn ring_coords(ring: &[Point]) -> Vec<[f64; 2]> {
    ring.iter().map(|p| [p.x, p.y]).collect()
}

fn outline_sketch(outline: &Outline) -> Sketch<()> {
    let mut sketch = Sketch::polygon(&ring_coords(&outline.exterior), None);
    for hole in &outline.holes {
        sketch = sketch.difference(&Sketch::polygon(&ring_coords(hole), None));
    }
    sketch
}

fn sketch_outlines(sketch: &Sketch<()>) -> Vec<Outline> {
    let mp = sketch.to_multipolygon();
    let mut outlines = Vec::new();
    for poly in mp.0 {
        let mut exterior: Vec<Point> = poly
            .exterior()
            .0
            .iter()
            .map(|c| Point::new(c.x, c.y))
            .collect();
        close_open(&mut exterior);

        let holes = poly
            .interiors()
            .iter()
            .map(|interior| {
                let mut ring: Vec<Point> =
                    interior.0.iter().map(|c| Point::new(c.x, c.y)).collect();
                close_open(&mut ring);
                ring
            })
            .filter(|ring| ring.len() >= 3)
            .collect();

        if exterior.len() >= 3 && signed_area(&exterior).abs() > f64::EPSILON {
            outlines.push(Outline::new(exterior, holes));
        }
    }
    outlines
}

/// Drop the repeated closing coordinate of a closed line string.
fn close_open(ring: &mut Vec<Point>) {
    if ring.len() > 1 && ring.first() == ring.last() {
        ring.pop();
    }
}

/// Union the outlines of one layer.
pub fn union_outlines(outlines: &[Outline]) -> Result<Vec<Outline>, GeometryError> {
    let input_area: f64 = outlines.iter().map(Outline::area).sum();
    if input_area <= 0.0 {
        return Err(GeometryError::DegenerateGeometry {
            reason: "layer has no area".to_string(),
        });
    }

    let mut merged: Sketch<()> = Sketch::new();
    for outline in outlines {
        merged = merged.union(&outline_sketch(outline));
    }

    let result = sketch_outlines(&merged);
    let result_area: f64 = result.iter().map(Outline::area).sum();
    if result.is_empty() {
        return Err(GeometryError::DegenerateGeometry {
            reason: "union produced no outline".to_string(),
        });
    }
    let mismatch = (input_area - result_area).abs() / input_area;
    if mismatch > AREA_TOLERANCE {
        return Err(GeometryError::DegenerateGeometry {
            reason: format!(
                "outlines overlap (union area {:.4} vs {:.4})",
                result_area, input_area
            ),
        });
    }
    Ok(result)
}

/// Union each layer of `solid`, keeping layers in first-appearance order.
pub fn merge_bodies(solid: &Solid) -> Result<Solid, GeometryError> {
    let mut layers: Vec<(LayerKey, Vec<&SolidBody>)> = Vec::new();
    for body in &solid.bodies {
        let key = LayerKey::of(body);
        match layers.iter_mut().find(|(k, _)| *k == key) {
            Some((_, members)) => members.push(body),
            None => layers.push((key, vec![body])),
        }
    }

    let mut bodies = Vec::new();
    for (key, members) in layers {
        if let [only] = members.as_slice() {
            bodies.push((*only).clone());
            continue;
        }

        let world: Vec<Outline> = members.iter().map(|b| b.world_outline()).collect();
        let merged = union_outlines(&world)?;
        debug!(
            "Merged {} bodies at z={:.2} into {}",
            members.len(),
            key.z,
            merged.len()
        );
        bodies.extend(merged.into_iter().map(|outline| SolidBody {
            kind: BodyKind::Merged,
            outline,
            depth: key.depth,
            offset: Offset3::new(0.0, 0.0, key.z),
            bevel: key.bevel,
        }));
    }

    Ok(Solid {
        label: solid.label.clone(),
        glyph_source: solid.glyph_source,
        bodies,
    })
}
