//! # 3D Model Module
//!
//! Triangle meshes built from extruded tag bodies, and their binary STL form.

use nalgebra::{Point3, Vector3};
use nametagkit_core::ExportError;
use std::io::Cursor;

/// A 3D triangle made up of three vertices
#[derive(Debug, Clone, PartialEq)]
pub struct Triangle3D {
    pub vertices: [Point3<f32>; 3],
    pub normal: Vector3<f32>,
}

impl Triangle3D {
    pub fn new(v1: Point3<f32>, v2: Point3<f32>, v3: Point3<f32>) -> Self {
        // Right-hand rule; zero for degenerate triangles
        let normal = (v2 - v1)
            .cross(&(v3 - v1))
            .try_normalize(f32::EPSILON)
            .unwrap_or_else(Vector3::zeros);

        Self {
            vertices: [v1, v2, v3],
            normal,
        }
    }

    /// Get bounding box of the triangle
    pub fn bounds(&self) -> (Point3<f32>, Point3<f32>) {
        let mut min = self.vertices[0];
        let mut max = self.vertices[0];
        for vertex in &self.vertices[1..] {
            min = min.inf(vertex);
            max = max.sup(vertex);
        }
        (min, max)
    }

    /// Twice the area.
    pub fn double_area(&self) -> f32 {
        let [a, b, c] = self.vertices;
        (b - a).cross(&(c - a)).norm()
    }
}

/// A 3D mesh model
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh3D {
    pub triangles: Vec<Triangle3D>,
    pub bounds_min: Point3<f32>,
    pub bounds_max: Point3<f32>,
}

impl Default for Mesh3D {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl Mesh3D {
    pub fn new(triangles: Vec<Triangle3D>) -> Self {
        let mut mesh = Self {
            triangles,
            bounds_min: Point3::origin(),
            bounds_max: Point3::origin(),
        };
        mesh.calculate_bounds();
        mesh
    }

    pub fn from_stl_mesh(stl_mesh: &stl_io::IndexedMesh) -> Self {
        let mut triangles = Vec::new();

        for face in &stl_mesh.faces {
            let [i1, i2, i3] = face.vertices;
            let (Some(v1), Some(v2), Some(v3)) = (
                stl_mesh.vertices.get(i1),
                stl_mesh.vertices.get(i2),
                stl_mesh.vertices.get(i3),
            ) else {
                continue;
            };

            triangles.push(Triangle3D::new(
                Point3::new(v1[0], v1[1], v1[2]),
                Point3::new(v2[0], v2[1], v2[2]),
                Point3::new(v3[0], v3[1], v3[2]),
            ));
        }

        Self::new(triangles)
    }

    /// Parse ASCII or binary STL.
    pub fn from_stl_bytes(bytes: &[u8]) -> Result<Self, ExportError> {
        let mut cursor = Cursor::new(bytes);
        let indexed = stl_io::read_stl(&mut cursor)
            .map_err(|e| ExportError::failure(format!("unreadable STL: {}", e)))?;
        Ok(Self::from_stl_mesh(&indexed))
    }

    fn calculate_bounds(&mut self) {
        let Some(first) = self.triangles.first() else {
            return;
        };

        let (mut min, mut max) = first.bounds();
        for triangle in &self.triangles[1..] {
            let (tri_min, tri_max) = triangle.bounds();
            min = min.inf(&tri_min);
            max = max.sup(&tri_max);
        }

        self.bounds_min = min;
        self.bounds_max = max;
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// Enclosed volume by the divergence theorem; positive for outward-facing
    /// triangles.
    pub fn volume(&self) -> f64 {
        self.triangles
            .iter()
            .map(|t| {
                let [a, b, c] = t.vertices.map(|v| v.coords.cast::<f64>());
                a.dot(&b.cross(&c)) / 6.0
            })
            .sum()
    }

    /// Binary STL bytes.
    pub fn to_stl_binary(&self) -> Result<Vec<u8>, ExportError> {
        let triangles: Vec<stl_io::Triangle> = self
            .triangles
            .iter()
            .map(|t| stl_io::Triangle {
                normal: stl_io::Normal::new([t.normal.x, t.normal.y, t.normal.z]),
                vertices: t
                    .vertices
                    .map(|v| stl_io::Vertex::new([v.x, v.y, v.z])),
            })
            .collect();

        let mut out = Cursor::new(Vec::with_capacity(84 + triangles.len() * 50));
        stl_io::write_stl(&mut out, triangles.iter())
            .map_err(|e| ExportError::failure(format!("STL write failed: {}", e)))?;
        Ok(out.into_inner())
    }
}
