//! Sphere primitive for ray tracing.
//!
//! Used for the celestial bodies, the event horizon and the lensing-zone
//! boundary. Implements ray-sphere intersection with the half-b form of the
//! quadratic formula.

use glam::Vec3A;

use crate::interval::Interval;
use crate::ray::Ray;
use crate::scene::CelestialBody;

/// Sphere defined by center and radius.
#[derive(Debug, Clone, Copy)]
pub struct Sphere {
    /// Center point of the sphere in world coordinates.
    pub center: Vec3A,

    /// Radius of the sphere (always non-negative).
    pub radius: f32,
}

impl Sphere {
    /// Create a new sphere.
    ///
    /// Negative radius values are clamped to 0.0.
    pub fn new(center: Vec3A, radius: f32) -> Self {
        Self {
            center,
            radius: radius.max(0.0),
        }
    }

    /// Nearest ray parameter inside `ray_t` where the ray meets the surface.
    ///
    /// The smaller root is preferred; when it lies behind the origin (or before
    /// `ray_t.min`) the larger root is used, which covers rays starting inside
    /// the sphere.
    pub fn hit(&self, r: &Ray, ray_t: Interval) -> Option<f32> {
        let oc = self.center - r.origin;

        let a = r.direction.length_squared();
        if a == 0.0 {
            return None;
        }
        let h = r.direction.dot(oc);
        let c = oc.length_squared() - self.radius * self.radius;

        let discriminant = h * h - a * c;
        if discriminant < 0.0 {
            return None;
        }

        let sqrtd = discriminant.sqrt();

        let mut root = (h - sqrtd) / a;
        if !ray_t.surrounds(root) {
            root = (h + sqrtd) / a;
            if !ray_t.surrounds(root) {
                return None;
            }
        }
        Some(root)
    }

    /// Outward unit normal at a point on the surface.
    pub fn normal_at(&self, p: Vec3A) -> Vec3A {
        if self.radius > 0.0 {
            (p - self.center) / self.radius
        } else {
            Vec3A::Y
        }
    }
}

impl From<&CelestialBody> for Sphere {
    fn from(body: &CelestialBody) -> Self {
        Sphere::new(body.center, body.radius)
    }
}

/// Nearest body hit by `r` within `ray_t`, as (index, t).
///
/// Ties keep the lower index so the result never depends on float noise in
/// the iteration order.
pub fn nearest_body(bodies: &[CelestialBody], r: &Ray, ray_t: Interval) -> Option<(usize, f32)> {
    let mut best: Option<(usize, f32)> = None;
    let mut closest_so_far = ray_t.max;

    for (index, body) in bodies.iter().enumerate() {
        if let Some(t) = Sphere::from(body).hit(r, ray_t.with_max(closest_so_far)) {
            closest_so_far = t;
            best = Some((index, t));
        }
    }
    best
}
