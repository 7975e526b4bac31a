//! Spacetime grid overlay.
//!
//! The grid is the Flamm embedding surface of the hole, drawn as a sheet of
//! lines below the disk plane. It is found along the straight camera ray by
//! a fixed march followed by bisection, and only tints the final color.

use glam::Vec3A;

use crate::hit::{Hit, HitKind};
use crate::noise::smoothstep;
use crate::ray::Ray;
use crate::scene::{
    GRID_BISECT_ITERATIONS, GRID_CONSTANT, GRID_EXTENT, GRID_FADE_END, GRID_FADE_START, GRID_HOLE_RADIUS,
    GRID_LINE_WIDTH, GRID_MARCH_STEPS, GRID_MAX_DISTANCE, GRID_SCALE, GRID_SPACING, RS,
};

/// Overlay opacity when the underlying pixel is the horizon.
const HORIZON_OPACITY: f32 = 0.15;
/// Overlay opacity when the grid is in front of the scene hit.
const NEAR_OPACITY: f32 = 0.85;
/// Overlay opacity when the grid lies behind the scene hit.
const FAR_OPACITY: f32 = 0.3;

/// Intersection of a ray with the grid surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridHit {
    /// Ray parameter of the intersection.
    pub distance: f32,
    /// World-space intersection point.
    pub point: Vec3A,
    /// Line intensity at the point, in [0, 1].
    pub line: f32,
}

/// Height of the surface at cylindrical radius `r`, or `None` outside its extent.
pub fn height(r: f32) -> Option<f32> {
    if !(GRID_HOLE_RADIUS..=GRID_EXTENT).contains(&r) {
        return None;
    }
    Some(GRID_SCALE * (GRID_CONSTANT - 2.0 * (RS * (r - RS)).sqrt()))
}

/// Vertical distance from `p` to the surface beneath or above it.
fn gap(r: &Ray, t: f32) -> Option<f32> {
    let p = r.at(t);
    height((p.x * p.x + p.z * p.z).sqrt()).map(|h| p.y - h)
}

/// First crossing of `r` with the surface, if any.
pub fn intersect(r: &Ray) -> Option<GridHit> {
    let dt = GRID_MAX_DISTANCE / GRID_MARCH_STEPS as f32;
    let mut prev_t = 0.0;
    let mut prev_gap = gap(r, prev_t);

    for k in 1..=GRID_MARCH_STEPS {
        let t = k as f32 * dt;
        let current = gap(r, t);
        if let (Some(a), Some(b)) = (prev_gap, current) {
            if (a > 0.0) != (b > 0.0) {
                return refine(r, prev_t, a, t);
            }
        }
        prev_t = t;
        prev_gap = current;
    }
    None
}

/// Bisect a bracketed sign change down to sub-step precision.
fn refine(r: &Ray, mut lo: f32, lo_gap: f32, mut hi: f32) -> Option<GridHit> {
    let above = lo_gap > 0.0;
    for _ in 0..GRID_BISECT_ITERATIONS {
        let mid = 0.5 * (lo + hi);
        match gap(r, mid) {
            Some(g) if (g > 0.0) == above => lo = mid,
            _ => hi = mid,
        }
    }

    let distance = 0.5 * (lo + hi);
    gap(r, distance)?;
    let point = r.at(distance);
    Some(GridHit {
        distance,
        point,
        line: line_intensity(point.x, point.z),
    })
}

/// Distance from `v` to the nearest multiple of the grid spacing.
fn line_distance(v: f32) -> f32 {
    (v - GRID_SPACING * (v / GRID_SPACING).round()).abs()
}

/// Line pattern at (x, z): 1 on a grid line, 0 between lines.
pub fn line_intensity(x: f32, z: f32) -> f32 {
    let d = line_distance(x).min(line_distance(z));
    1.0 - smoothstep(0.0, GRID_LINE_WIDTH, d)
}

/// Fades the overlay out with distance from the camera.
pub fn distance_fade(distance: f32) -> f32 {
    1.0 - smoothstep(GRID_FADE_START, GRID_FADE_END, distance)
}

/// Opacity of the grid over a resolved scene hit.
pub fn overlay_opacity(base: &Hit, grid: &GridHit) -> f32 {
    let kind_opacity = match base.kind {
        HitKind::Horizon => HORIZON_OPACITY,
        _ if grid.distance < base.distance => NEAR_OPACITY,
        _ => FAR_OPACITY,
    };
    (kind_opacity * distance_fade(grid.distance) * grid.line).clamp(0.0, 1.0)
}
