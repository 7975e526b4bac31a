//! Color of a traced ray.
//!
//! `shade` is the one place where hit kinds turn into radiance. Everything
//! returned here is linear HDR; tone mapping happens later.

use glam::Vec3A;

use crate::grid::{self, GridHit};
use crate::hit::{Hit, HitKind};
use crate::ray::Ray;
use crate::scene::{CelestialBody, Scene, GRID_COLOR};
use crate::starfield;
use crate::tonemap::sanitize;
use crate::tracer::Tracer;

/// RGB color type using Vec3A for SIMD optimization.
pub type Color = Vec3A;

/// Glow of the disk as seen by the bodies, treated as a point light at the origin.
const DISK_LIGHT: Color = Color::new(1.2, 0.85, 0.55);
/// Light reaching the unlit side of a body.
const BODY_AMBIENT: f32 = 0.03;
/// Brightness kept at a body's silhouette.
const LIMB_FLOOR: f32 = 0.4;

/// Radiance for a resolved hit at frame time `time`.
pub fn shade(hit: &Hit, scene: &Scene, time: f32) -> Color {
    match hit.kind {
        HitKind::Horizon => Color::ZERO,
        HitKind::Body { index, point, normal } => match scene.bodies().get(index) {
            Some(body) => shade_body(body, point, normal, hit.direction),
            None => starfield::sample(hit.direction),
        },
        HitKind::Disk { radius, angle } => {
            let (disk, alpha) = scene
                .disk()
                .emission(scene.black_hole(), radius, angle, time, hit.direction);
            disk * alpha + starfield::sample(hit.direction) * (1.0 - alpha)
        }
        HitKind::Background => starfield::sample(hit.direction),
    }
}

/// Lambertian body lit from the origin, with limb darkening and self-emission.
pub fn shade_body(body: &CelestialBody, point: Vec3A, normal: Vec3A, view: Vec3A) -> Color {
    let to_light = (-point).normalize_or_zero();
    let diffuse = normal.dot(to_light).max(0.0);
    let facing = normal.dot(-view).clamp(0.0, 1.0);
    let limb = LIMB_FLOOR + (1.0 - LIMB_FLOOR) * facing;

    body.color * (Color::splat(BODY_AMBIENT) + DISK_LIGHT * diffuse) * limb + body.color * body.emission
}

/// Tint `base` toward the grid color where the overlay is visible.
pub fn blend_grid(base: Color, hit: &Hit, grid: &GridHit) -> Color {
    base.lerp(GRID_COLOR, grid::overlay_opacity(hit, grid))
}

/// Linear radiance seen along a camera ray.
pub fn radiance(scene: &Scene, r: &Ray, time: f32, show_grid: bool) -> Color {
    let hit = Tracer::new(scene).trace(r);
    ray_color(scene, r, &hit, time, show_grid)
}

/// Radiance of camera ray `r` once it has been traced to `hit`.
pub fn ray_color(scene: &Scene, r: &Ray, hit: &Hit, time: f32, show_grid: bool) -> Color {
    let color = shade(hit, scene, time);
    let color = match show_grid.then(|| grid::intersect(r)).flatten() {
        Some(g) => blend_grid(color, hit, &g),
        None => color,
    };
    sanitize(color)
}
