//! Accretion disk: intersection tests and emission model.
//!
//! The disk is a thin annulus in the `y = 0` plane between the ISCO and an
//! outer radius. It carries no state; its look is a pure function of where
//! it was struck, the frame time and the viewing direction.

use glam::Vec3A;

use crate::interval::Interval;
use crate::noise::{smoothstep, value_noise, wrap_angle};
use crate::ray::Ray;
use crate::scene::{AccretionDisk, BlackHole};

/// Rays with |direction.y| below this are treated as parallel to the plane.
const PARALLEL_EPSILON: f32 = 1e-6;

/// Radial width of the fade ramp at the inner edge, as a fraction of the inner radius.
const INNER_FADE_FRACTION: f32 = 0.25;
/// Radial width of the fade ramp at the outer edge, as a fraction of the outer radius.
const OUTER_FADE_FRACTION: f32 = 0.3;

const COOL: Vec3A = Vec3A::new(0.75, 0.18, 0.03);
const WARM: Vec3A = Vec3A::new(1.0, 0.55, 0.16);
const HOT: Vec3A = Vec3A::new(1.0, 0.93, 0.85);

const BRIGHTNESS: f32 = 3.5;
const DOPPLER_STRENGTH: f32 = 0.6;
const DOPPLER_DRIFT: f32 = 0.05;
const REDSHIFT_FLOOR: f32 = 0.02;
const OPTICAL_DEPTH: f32 = 6.0;
/// Grazing rays see at most this many slab thicknesses.
const MAX_PATH_FACTOR: f32 = 50.0;

/// A plane crossing that lies on the disk.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DiskCrossing {
    /// Ray parameter (or segment fraction for `crossing_on_segment`).
    pub t: f32,
    /// Cylindrical radius of the crossing point.
    pub radius: f32,
    /// Azimuth atan2(z, x) of the crossing point.
    pub angle: f32,
}

impl AccretionDisk {
    /// Radial bounds of the annulus.
    pub fn bounds(&self) -> Interval {
        Interval::new(self.inner, self.outer)
    }

    /// Crossing of `r` with the disk plane inside `ray_t`.
    pub fn hit(&self, r: &Ray, ray_t: Interval) -> Option<DiskCrossing> {
        if r.direction.y.abs() < PARALLEL_EPSILON {
            return None;
        }
        let t = -r.origin.y / r.direction.y;
        if !ray_t.surrounds(t) {
            return None;
        }
        self.accept(r.at(t), t)
    }

    /// Crossing of the straight segment `from -> to`, detected by a sign change in y.
    ///
    /// The returned `t` is the fraction of the segment at which the plane is crossed.
    pub fn crossing_on_segment(&self, from: Vec3A, to: Vec3A) -> Option<DiskCrossing> {
        let crosses = (from.y > 0.0 && to.y <= 0.0) || (from.y < 0.0 && to.y >= 0.0);
        if !crosses {
            return None;
        }
        let fraction = from.y / (from.y - to.y);
        self.accept(from.lerp(to, fraction), fraction)
    }

    fn accept(&self, p: Vec3A, t: f32) -> Option<DiskCrossing> {
        let radius = (p.x * p.x + p.z * p.z).sqrt();
        if !self.bounds().contains(radius) {
            return None;
        }
        Some(DiskCrossing {
            t,
            radius,
            angle: wrap_angle(p.z.atan2(p.x)),
        })
    }

    /// Smooth ramp that is zero at both edges and one in the interior.
    pub fn edge_fade(&self, radius: f32) -> f32 {
        let inner = smoothstep(self.inner, self.inner * (1.0 + INNER_FADE_FRACTION), radius);
        let outer = 1.0 - smoothstep(self.outer * (1.0 - OUTER_FADE_FRACTION), self.outer, radius);
        inner * outer
    }

    /// Normalized temperature in (0, 1], hottest at the inner edge.
    pub fn temperature(&self, radius: f32) -> f32 {
        (self.inner / radius.max(self.inner)).powf(0.75)
    }

    /// Emitted color and opacity of the disk at (radius, angle).
    ///
    /// `direction` is the ray direction at the crossing and sets the slab's
    /// optical depth; `time` animates the turbulence and the Doppler phase.
    pub fn emission(
        &self,
        black_hole: &BlackHole,
        radius: f32,
        angle: f32,
        time: f32,
        direction: Vec3A,
    ) -> (Vec3A, f32) {
        let fade = self.edge_fade(radius);
        if fade <= 0.0 {
            return (Vec3A::ZERO, 0.0);
        }

        let temp = self.temperature(radius);
        let base = if temp < 0.5 {
            COOL.lerp(WARM, temp * 2.0)
        } else {
            WARM.lerp(HOT, (temp - 0.5) * 2.0)
        };

        let doppler = 1.0 + DOPPLER_STRENGTH * (angle + time * DOPPLER_DRIFT).sin();

        let rs = black_hole.schwarzschild_radius();
        let redshift = (1.0 - rs / radius).max(REDSHIFT_FLOOR).sqrt();

        // Keplerian rotation of the turbulence pattern.
        let omega = (black_hole.mass / (radius * radius * radius)).sqrt();
        let phase = wrap_angle(angle - omega * time);
        let (u, v) = (radius * phase.cos(), radius * phase.sin());
        let n1 = value_noise(u * 0.15, v * 0.15);
        let n2 = value_noise(u * 0.37 + 11.3, v * 0.37 - 7.9);
        let turbulence = 0.45 + 1.1 * n1 * n2;

        let color = base * (BRIGHTNESS * temp * doppler * redshift * turbulence * fade);

        let cos_incidence = direction.y.abs().max(1.0 / MAX_PATH_FACTOR);
        let tau = OPTICAL_DEPTH * self.half_thickness / cos_incidence;
        let alpha = (1.0 - (-tau).exp()) * fade;

        (color, alpha.clamp(0.0, 1.0))
    }
}
