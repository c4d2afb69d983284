//! Linear extrusion of solid bodies into triangle meshes.
//!
//! Each body becomes one closed shell: side walls per ring edge, a bottom cap
//! and a top cap triangulated with `lyon`. With a bevel, the top cap is inset
//! and joined to the walls by a sloped band.

use crate::model::{signed_area, Point};
use crate::model3d::{Mesh3D, Triangle3D};
use crate::solid::{Solid, SolidBody};
use lyon::math::point;
use lyon::path::Path;
use lyon::tessellation::{
    BuffersBuilder, FillOptions, FillRule, FillTessellator, FillVertex, VertexBuffers,
};
use nalgebra::Point3;
use nametagkit_core::GeometryError;
use tracing::{debug, warn};

const TESSELLATION_TOLERANCE: f32 = 0.001;

fn vertex(p: &Point, z: f64) -> Point3<f32> {
    Point3::new(p.x as f32, p.y as f32, z as f32)
}

/// Walls between `lower` at `z0` and `upper` at `z1`. Both rings have the same
/// vertex count; material lies to the left of each edge.
fn walls(lower: &[Point], z0: f64, upper: &[Point], z1: f64, out: &mut Vec<Triangle3D>) {
    let n = lower.len();
    for i in 0..n {
        let j = (i + 1) % n;
        let a0 = vertex(&lower[i], z0);
        let b0 = vertex(&lower[j], z0);
        let a1 = vertex(&upper[i], z1);
        let b1 = vertex(&upper[j], z1);
        out.push(Triangle3D::new(a0, b0, b1));
        out.push(Triangle3D::new(a0, b1, a1));
    }
}

/// Triangulate the region bounded by `rings` (even-odd) at height `z`.
fn cap(rings: &[Vec<Point>], z: f64, up: bool) -> Result<Vec<Triangle3D>, GeometryError> {
    let mut builder = Path::builder();
    for ring in rings {
        let Some((first, rest)) = ring.split_first() else {
            continue;
        };
        builder.begin(point(first.x as f32, first.y as f32));
        for p in rest {
            builder.line_to(point(p.x as f32, p.y as f32));
        }
        builder.close();
    }
    let path = builder.build();

    let mut buffers: VertexBuffers<lyon::math::Point, u32> = VertexBuffers::new();
    let mut tessellator = FillTessellator::new();
    tessellator
        .tessellate_path(
            &path,
            &FillOptions::tolerance(TESSELLATION_TOLERANCE).with_fill_rule(FillRule::EvenOdd),
            &mut BuffersBuilder::new(&mut buffers, |vertex: FillVertex| vertex.position()),
        )
        .map_err(|e| GeometryError::Tessellation {
            reason: format!("{:?}", e),
        })?;

    let z = z as f32;
    let mut triangles = Vec::with_capacity(buffers.indices.len() / 3);
    for idx in buffers.indices.chunks_exact(3) {
        let [a, b, c] = [idx[0], idx[1], idx[2]].map(|i| buffers.vertices[i as usize]);
        let ccw = (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x) > 0.0;
        let (b, c) = if ccw == up { (b, c) } else { (c, b) };
        triangles.push(Triangle3D::new(
            Point3::new(a.x, a.y, z),
            Point3::new(b.x, b.y, z),
            Point3::new(c.x, c.y, z),
        ));
    }
    Ok(triangles)
}

/// Move every vertex `distance` towards the material side.
///
/// Returns `None` when the inset ring would fold over itself.
fn inset_ring(ring: &[Point], distance: f64) -> Option<Vec<Point>> {
    let n = ring.len();
    let left_normal = |a: &Point, b: &Point| {
        let (dx, dy) = (b.x - a.x, b.y - a.y);
        let len = (dx * dx + dy * dy).sqrt();
        (-dy / len, dx / len)
    };

    let mut inset = Vec::with_capacity(n);
    for i in 0..n {
        let prev = &ring[(i + n - 1) % n];
        let cur = &ring[i];
        let next = &ring[(i + 1) % n];
        let n1 = left_normal(prev, cur);
        let n2 = left_normal(cur, next);
        let denom = 1.0 + n1.0 * n2.0 + n1.1 * n2.1;
        if denom < 0.1 || !denom.is_finite() {
            return None;
        }
        let k = distance / denom;
        inset.push(Point::new(cur.x + (n1.0 + n2.0) * k, cur.y + (n1.1 + n2.1) * k));
    }

    for i in 0..n {
        let j = (i + 1) % n;
        let original = (ring[j].x - ring[i].x, ring[j].y - ring[i].y);
        let moved = (inset[j].x - inset[i].x, inset[j].y - inset[i].y);
        if original.0 * moved.0 + original.1 * moved.1 <= 0.0 {
            return None;
        }
    }
    if signed_area(&inset).signum() != signed_area(ring).signum() {
        return None;
    }
    Some(inset)
}

/// Triangles for one body, placed by its offset.
pub fn extrude_body(body: &SolidBody) -> Result<Vec<Triangle3D>, GeometryError> {
    let outline = body.world_outline();
    let rings: Vec<Vec<Point>> = outline.rings().cloned().collect();
    let z0 = body.offset.z;
    let z1 = z0 + body.depth;

    let bevel = body.bevel.and_then(|bevel| {
        let insets: Option<Vec<Vec<Point>>> =
            rings.iter().map(|r| inset_ring(r, bevel.size)).collect();
        if insets.is_none() {
            warn!("Bevel skipped on {:?}: outline too thin", body.kind);
        }
        insets.map(|insets| (bevel, insets))
    });

    let mut triangles = cap(&rings, z0, false)?;
    match &bevel {
        Some((bevel, insets)) => {
            let z_band = z1 - bevel.thickness;
            for (ring, inset) in rings.iter().zip(insets) {
                walls(ring, z0, ring, z_band, &mut triangles);
                walls(ring, z_band, inset, z1, &mut triangles);
            }
            triangles.extend(cap(insets, z1, true)?);
        }
        None => {
            for ring in &rings {
                walls(ring, z0, ring, z1, &mut triangles);
            }
            triangles.extend(cap(&rings, z1, true)?);
        }
    }
    Ok(triangles)
}

/// Mesh of every body in `solid`, bodies in order.
pub fn extrude_solid(solid: &Solid) -> Result<Mesh3D, GeometryError> {
    let mut triangles = Vec::new();
    for body in &solid.bodies {
        triangles.extend(extrude_body(body)?);
    }
    debug!(
        "Extruded '{}': {} bodies, {} triangles",
        solid.label,
        solid.bodies.len(),
        triangles.len()
    );
    Ok(Mesh3D::new(triangles))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Outline;
    use crate::solid::{Bevel, BodyKind, Offset3};

    fn body(outline: Outline, bevel: Option<Bevel>) -> SolidBody {
        SolidBody {
            kind: BodyKind::Underline,
            outline,
            depth: 2.0,
            offset: Offset3::new(10.0, 0.0, 1.0),
            bevel,
        }
    }

    #[test]
    fn test_box_volume_and_bounds() {
        let triangles = extrude_body(&body(Outline::rectangle(0.0, 0.0, 3.0, 1.0), None)).unwrap();
        // 2 per cap, 2 per side
        assert_eq!(triangles.len(), 12);
        let mesh = Mesh3D::new(triangles);
        assert!((mesh.volume() - 6.0).abs() < 1e-4);
        assert_eq!(mesh.bounds_min, Point3::new(10.0, 0.0, 1.0));
        assert_eq!(mesh.bounds_max, Point3::new(13.0, 1.0, 3.0));
    }

    #[test]
    fn test_holes_reduce_volume() {
        let ring = Outline::new(
            Outline::rectangle(0.0, 0.0, 4.0, 4.0).exterior,
            vec![Outline::rectangle(1.0, 1.0, 2.0, 2.0).exterior],
        );
        let mesh = Mesh3D::new(extrude_body(&body(ring, None)).unwrap());
        assert!((mesh.volume() - 24.0).abs() < 1e-3);
    }

    #[test]
    fn test_bevel_chamfers_top() {
        let bevel = Bevel {
            thickness: 0.5,
            size: 0.25,
        };
        let plain = Mesh3D::new(
            extrude_body(&body(Outline::rectangle(0.0, 0.0, 4.0, 2.0), None)).unwrap(),
        );
        let bevelled = Mesh3D::new(
            extrude_body(&body(Outline::rectangle(0.0, 0.0, 4.0, 2.0), Some(bevel))).unwrap(),
        );
        assert!(bevelled.volume() < plain.volume());
        assert!(bevelled.volume() > plain.volume() - 4.0 * 2.0 * 0.5);
        assert_eq!(bevelled.bounds_max.z, plain.bounds_max.z);
    }

    #[test]
    fn test_bevel_skipped_when_too_thin() {
        let bevel = Bevel {
            thickness: 0.3,
            size: 0.4,
        };
        let sliver = Outline::rectangle(0.0, 0.0, 5.0, 0.5);
        assert!(inset_ring(&sliver.exterior, 0.4).is_none());
        let mesh = Mesh3D::new(extrude_body(&body(sliver, Some(bevel))).unwrap());
        assert!((mesh.volume() - 5.0).abs() < 1e-4);
    }

    #[test]
    fn test_normals_point_out() {
        let triangles = extrude_body(&body(Outline::rectangle(0.0, 0.0, 1.0, 1.0), None)).unwrap();
        let center = Point3::new(10.5f32, 0.5, 2.0);
        for t in &triangles {
            let centroid = (t.vertices[0].coords + t.vertices[1].coords + t.vertices[2].coords) / 3.0;
            assert!(t.normal.dot(&(centroid - center.coords)) > 0.0);
        }
    }
}
