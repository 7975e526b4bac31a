//! Procedural deep-space background.
//!
//! Directions are mapped to equirectangular (u, v) and each layer divides
//! that map into cells; a cell holds a star when its hash clears a
//! threshold. Layers get finer and dimmer, and a constant ambient tint keeps
//! the sky from ever being pure black.

use std::f32::consts::{PI, TAU};

use glam::Vec3A;

use crate::noise::{hash12, hash22, smoothstep};

/// Faint sky tint added under every star layer.
pub const AMBIENT: Vec3A = Vec3A::new(0.006, 0.007, 0.012);

/// Hash value a cell must exceed to hold a star.
const STAR_THRESHOLD: f32 = 0.97;
/// Radius of a star's falloff disk, in cell units.
const STAR_RADIUS: f32 = 0.25;

const COOL_STAR: Vec3A = Vec3A::new(0.7, 0.8, 1.0);
const WARM_STAR: Vec3A = Vec3A::new(1.0, 0.85, 0.65);

struct Layer {
    /// Cells per unit of v; u gets twice as many.
    cells: f32,
    brightness: f32,
}

const LAYERS: [Layer; 4] = [
    Layer { cells: 30.0, brightness: 1.0 },
    Layer { cells: 60.0, brightness: 0.7 },
    Layer { cells: 120.0, brightness: 0.5 },
    Layer { cells: 240.0, brightness: 0.35 },
];

/// Sky radiance seen along `direction`.
pub fn sample(direction: Vec3A) -> Vec3A {
    let d = direction.normalize_or_zero();
    if d == Vec3A::ZERO {
        return AMBIENT;
    }
    let u = d.z.atan2(d.x) / TAU + 0.5;
    let v = d.y.clamp(-1.0, 1.0).acos() / PI;

    LAYERS
        .iter()
        .enumerate()
        .fold(AMBIENT, |sky, (k, layer)| sky + star(u, v, k as f32, layer))
}

fn star(u: f32, v: f32, index: f32, layer: &Layer) -> Vec3A {
    let x = u * layer.cells * 2.0;
    let y = v * layer.cells;
    let (cx, cy) = (x.floor(), y.floor());
    let seed = index * 97.13;

    let h = hash12(cx + seed, cy - seed);
    if h < STAR_THRESHOLD {
        return Vec3A::ZERO;
    }

    // Keep the star away from cell borders so its disk is never clipped.
    let (ox, oy) = hash22(cx + seed, cy + seed);
    let dx = x - cx - (0.2 + 0.6 * ox);
    let dy = y - cy - (0.2 + 0.6 * oy);
    let falloff = 1.0 - smoothstep(0.0, STAR_RADIUS, (dx * dx + dy * dy).sqrt());
    if falloff <= 0.0 {
        return Vec3A::ZERO;
    }

    let strength = (h - STAR_THRESHOLD) / (1.0 - STAR_THRESHOLD);
    let tint = COOL_STAR.lerp(WARM_STAR, ox * oy);
    tint * (layer.brightness * (0.3 + 0.7 * strength) * falloff)
}
