//! Deterministic hashing and value noise.
//!
//! Every function here is pure: the same input always yields the same output,
//! so the starfield and disk turbulence are reproducible across frames,
//! threads and runs. There is no generator state to seed.

use std::f32::consts::{PI, TAU};

/// Hash a 2D lattice point to [0, 1).
pub fn hash12(x: f32, y: f32) -> f32 {
    let p3x = (x * 0.1031).fract();
    let p3y = (y * 0.1031).fract();
    let p3z = (x * 0.1031).fract();
    let dot = p3x * (p3y + 33.33) + p3y * (p3z + 33.33) + p3z * (p3x + 33.33);
    ((p3x + p3y + 2.0 * dot) * (p3z + dot)).fract().abs()
}

/// Hash a 2D lattice point to two independent values in [0, 1).
pub fn hash22(x: f32, y: f32) -> (f32, f32) {
    (hash12(x + 17.31, y - 5.77), hash12(x - 41.9, y + 23.15))
}

/// Hermite smoothstep between two edges, clamped to [0, 1].
pub fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Bilinearly interpolated value noise in [0, 1].
pub fn value_noise(x: f32, y: f32) -> f32 {
    let ix = x.floor();
    let iy = y.floor();
    let fx = x - ix;
    let fy = y - iy;
    let ux = fx * fx * (3.0 - 2.0 * fx);
    let uy = fy * fy * (3.0 - 2.0 * fy);

    let a = hash12(ix, iy);
    let b = hash12(ix + 1.0, iy);
    let c = hash12(ix, iy + 1.0);
    let d = hash12(ix + 1.0, iy + 1.0);

    a + (b - a) * ux + (c - a) * uy + (a - b - c + d) * ux * uy
}

/// Wrap an angle into (-π, π].
pub fn wrap_angle(angle: f32) -> f32 {
    if !angle.is_finite() {
        return 0.0;
    }
    let wrapped = angle - TAU * ((angle + PI) / TAU).floor();
    // floor() puts exactly -π on the lower edge; move it to the upper one.
    if wrapped <= -PI {
        wrapped + TAU
    } else {
        wrapped
    }
}
