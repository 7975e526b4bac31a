//! Ray representation for straight-line tracing.
//!
//! A ray is defined as r(t) = origin + t * direction. Straight rays are used
//! for the direct intersection tests, for each integration segment and for
//! the continuation after a bent ray leaves the lensing zone.

use glam::Vec3A;

/// Ray in 3D space defined by origin and direction.
///
/// Mathematical representation: r(t) = origin + t * direction
#[derive(Debug, Clone, Copy)]
pub struct Ray {
    /// Starting point of the ray in world coordinates.
    pub origin: Vec3A,

    /// Unit direction of the ray.
    ///
    /// Every intersection routine treats `t` as a world-space distance, so the
    /// constructor normalizes whatever it is given.
    pub direction: Vec3A,
}

impl Ray {
    /// Create a new ray with origin and direction (normalized here).
    pub fn new(origin: Vec3A, direction: Vec3A) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
        }
    }

    /// Compute a point at parameter t along the ray.
    ///
    /// Returns r(t) = origin + t * direction.
    pub fn at(&self, t: f32) -> Vec3A {
        self.origin + t * self.direction
    }

    /// Parameter of the point closest to the world origin, clipped to t >= 0.
    pub fn closest_approach_t(&self) -> f32 {
        (-self.origin.dot(self.direction)).max(0.0)
    }

    /// Distance between the world origin and the ray's closest point.
    pub fn closest_approach(&self) -> f32 {
        self.at(self.closest_approach_t()).length()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_direction_is_normalized() {
        let ray = Ray::new(Vec3A::ZERO, Vec3A::new(3.0, 0.0, 4.0));
        assert_relative_eq!(ray.direction.length(), 1.0, epsilon = 1e-6);
        assert_relative_eq!(ray.at(5.0).x, 3.0, epsilon = 1e-5);
        assert_relative_eq!(ray.at(5.0).z, 4.0, epsilon = 1e-5);
    }

    #[test]
    fn test_closest_approach_in_front() {
        let ray = Ray::new(Vec3A::new(7.0, 0.0, 100.0), Vec3A::new(0.0, 0.0, -1.0));
        assert_relative_eq!(ray.closest_approach_t(), 100.0, epsilon = 1e-4);
        assert_relative_eq!(ray.closest_approach(), 7.0, epsilon = 1e-4);
    }

    #[test]
    fn test_closest_approach_behind_is_clipped() {
        // Moving away from the origin: the closest point is the ray origin itself.
        let ray = Ray::new(Vec3A::new(0.0, 3.0, 50.0), Vec3A::new(0.0, 0.0, 1.0));
        assert_eq!(ray.closest_approach_t(), 0.0);
        assert_relative_eq!(ray.closest_approach(), ray.origin.length(), epsilon = 1e-4);
    }
}
