//! 2D outline model.
//!
//! An [`Outline`] is one closed exterior ring plus zero or more hole rings.
//! Exteriors are stored counter-clockwise and holes clockwise, so material is
//! always on the left of every edge.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: Point,
    pub max: Point,
}

impl Bounds {
    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    pub fn center(&self) -> Point {
        Point::new(
            (self.min.x + self.max.x) / 2.0,
            (self.min.y + self.max.y) / 2.0,
        )
    }

    pub fn union(&self, other: &Bounds) -> Bounds {
        Bounds {
            min: Point::new(self.min.x.min(other.min.x), self.min.y.min(other.min.y)),
            max: Point::new(self.max.x.max(other.max.x), self.max.y.max(other.max.y)),
        }
    }

    fn of_points<'a>(points: impl IntoIterator<Item = &'a Point>) -> Option<Bounds> {
        let mut iter = points.into_iter();
        let first = *iter.next()?;
        let mut bounds = Bounds {
            min: first,
            max: first,
        };
        for p in iter {
            bounds.min.x = bounds.min.x.min(p.x);
            bounds.min.y = bounds.min.y.min(p.y);
            bounds.max.x = bounds.max.x.max(p.x);
            bounds.max.y = bounds.max.y.max(p.y);
        }
        Some(bounds)
    }
}

/// Shoelace area; positive for counter-clockwise rings.
pub fn signed_area(ring: &[Point]) -> f64 {
    if ring.len() < 3 {
        return 0.0;
    }
    let mut sum = 0.0;
    for (i, a) in ring.iter().enumerate() {
        let b = &ring[(i + 1) % ring.len()];
        sum += a.x * b.y - b.x * a.y;
    }
    sum / 2.0
}

/// Even-odd point in ring test. Points exactly on an edge are unspecified.
pub fn ring_contains(ring: &[Point], p: Point) -> bool {
    let mut inside = false;
    let n = ring.len();
    let mut j = n.wrapping_sub(1);
    for i in 0..n {
        let a = ring[i];
        let b = ring[j];
        if (a.y > p.y) != (b.y > p.y) {
            let x = (b.x - a.x) * (p.y - a.y) / (b.y - a.y) + a.x;
            if p.x < x {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

fn oriented(mut ring: Vec<Point>, ccw: bool) -> Vec<Point> {
    if (signed_area(&ring) > 0.0) != ccw {
        ring.reverse();
    }
    ring
}

/// A closed polygon with optional holes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Outline {
    pub exterior: Vec<Point>,
    pub holes: Vec<Vec<Point>>,
}

impl Outline {
    /// Build an outline, normalising ring orientation.
    pub fn new(exterior: Vec<Point>, holes: Vec<Vec<Point>>) -> Self {
        Self {
            exterior: oriented(exterior, true),
            holes: holes.into_iter().map(|h| oriented(h, false)).collect(),
        }
    }

    /// Axis-aligned rectangle with its lower-left corner at `(x, y)`.
    pub fn rectangle(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self::new(
            vec![
                Point::new(x, y),
                Point::new(x + width, y),
                Point::new(x + width, y + height),
                Point::new(x, y + height),
            ],
            Vec::new(),
        )
    }

    /// Group loose rings into outlines by nesting depth.
    ///
    /// A ring inside an even number of other rings is an exterior; one inside an
    /// odd number is a hole of the smallest exterior that contains it.
    pub fn assemble(rings: Vec<Vec<Point>>) -> Vec<Outline> {
        let rings: Vec<Vec<Point>> = rings
            .into_iter()
            .filter(|r| r.len() >= 3 && signed_area(r).abs() > f64::EPSILON)
            .collect();

        let depth: Vec<usize> = rings
            .iter()
            .enumerate()
            .map(|(i, ring)| {
                rings
                    .iter()
                    .enumerate()
                    .filter(|(j, other)| *j != i && ring_contains(other, ring[0]))
                    .count()
            })
            .collect();

        let mut exteriors: Vec<(usize, Vec<Vec<Point>>)> = depth
            .iter()
            .enumerate()
            .filter(|(_, d)| *d % 2 == 0)
            .map(|(i, _)| (i, Vec::new()))
            .collect();

        for (i, ring) in rings.iter().enumerate() {
            if depth[i] % 2 == 0 {
                continue;
            }
            let owner = exteriors
                .iter_mut()
                .filter(|(e, _)| ring_contains(&rings[*e], ring[0]))
                .min_by(|(a, _), (b, _)| {
                    signed_area(&rings[*a])
                        .abs()
                        .total_cmp(&signed_area(&rings[*b]).abs())
                });
            if let Some((_, holes)) = owner {
                holes.push(ring.clone());
            }
        }

        exteriors
            .into_iter()
            .map(|(e, holes)| Outline::new(rings[e].clone(), holes))
            .collect()
    }

    /// Filled area (exterior minus holes).
    pub fn area(&self) -> f64 {
        signed_area(&self.exterior).abs()
            - self
                .holes
                .iter()
                .map(|h| signed_area(h).abs())
                .sum::<f64>()
    }

    pub fn rings(&self) -> impl Iterator<Item = &Vec<Point>> {
        std::iter::once(&self.exterior).chain(self.holes.iter())
    }

    pub fn bounds(&self) -> Option<Bounds> {
        Bounds::of_points(self.exterior.iter())
    }

    pub fn translated(&self, dx: f64, dy: f64) -> Outline {
        self.map_points(|p| Point::new(p.x + dx, p.y + dy))
    }

    /// Scale about the origin. Both factors must be positive.
    pub fn scaled(&self, sx: f64, sy: f64) -> Outline {
        self.map_points(|p| Point::new(p.x * sx, p.y * sy))
    }

    pub fn contains(&self, p: Point) -> bool {
        ring_contains(&self.exterior, p) && !self.holes.iter().any(|h| ring_contains(h, p))
    }

    fn map_points(&self, f: impl Fn(&Point) -> Point) -> Outline {
        Outline {
            exterior: self.exterior.iter().map(&f).collect(),
            holes: self
                .holes
                .iter()
                .map(|h| h.iter().map(&f).collect())
                .collect(),
        }
    }
}

/// Combined bounds of several outlines.
pub fn bounds_of(outlines: &[Outline]) -> Option<Bounds> {
    outlines
        .iter()
        .filter_map(Outline::bounds)
        .reduce(|a, b| a.union(&b))
}
