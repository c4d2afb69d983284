//! The fixed spring-clip outline every tag is built on.

use crate::model::{Outline, Point};
use std::f64::consts::PI;
use std::sync::OnceLock;

pub const CLIP_LENGTH: f64 = 86.0;
pub const CLIP_WIDTH: f64 = 15.0;

/// Segments used for the rounded end.
const END_SEGMENTS: usize = 16;

/// Spring window near the rounded end: x from, x to, y from, y to.
const SLOT: [f64; 4] = [5.0, 17.0, 5.5, 9.5];

/// Clip outline in its local frame: lower-left of the bounding box at the origin.
pub fn clip_outline() -> &'static Outline {
    static CLIP: OnceLock<Outline> = OnceLock::new();
    CLIP.get_or_init(build_clip)
}

fn build_clip() -> Outline {
    let r = CLIP_WIDTH / 2.0;
    let mut exterior = vec![
        Point::new(CLIP_LENGTH, 0.0),
        Point::new(CLIP_LENGTH, CLIP_WIDTH),
    ];
    for i in 0..=END_SEGMENTS {
        let angle = PI / 2.0 + PI * i as f64 / END_SEGMENTS as f64;
        exterior.push(Point::new(r + r * angle.cos(), r + r * angle.sin()));
    }

    let [x0, x1, y0, y1] = SLOT;
    let slot = vec![
        Point::new(x0, y0),
        Point::new(x0, y1),
        Point::new(x1, y1),
        Point::new(x1, y0),
    ];
    Outline::new(exterior, vec![slot])
}

/// Centre of the plate area to the right of the spring window.
pub fn clip_face_center() -> Point {
    Point::new((SLOT[1] + CLIP_LENGTH) / 2.0, CLIP_WIDTH / 2.0)
}
