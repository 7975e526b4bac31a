//! Light-ray integration around a Schwarzschild mass.
//!
//! Rays are advanced in spherical coordinates (r, θ, φ) with conjugate
//! momenta (p_r, p_θ, p_φ). θ is measured from the +y axis so the accretion
//! disk sits on the equator, and φ = atan2(z, x).
//!
//! Because the mass does not rotate, p_φ is a constant of motion and its
//! derivative is exactly zero. A rotating mass would couple it to the other
//! momenta and needs a different derivative function.

use std::f32::consts::PI;
use std::ops::{Add, Mul};

use glam::Vec3A;

use crate::noise::wrap_angle;
use crate::scene::{LAPSE_FLOOR, MAX_STEP, MIN_STEP, R_FLOOR, STEP_GROWTH, THETA_EPSILON};

/// Position and momentum of a ray in spherical coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SphericalState {
    /// Radial coordinate.
    pub r: f32,
    /// Polar angle from +y, kept inside (0, π).
    pub theta: f32,
    /// Azimuth in (-π, π].
    pub phi: f32,
    /// Radial momentum.
    pub p_r: f32,
    /// Polar momentum.
    pub p_theta: f32,
    /// Azimuthal angular momentum (conserved).
    pub p_phi: f32,
}

/// Local orthonormal spherical basis at (θ, φ).
#[derive(Debug, Clone, Copy)]
struct Basis {
    e_r: Vec3A,
    e_theta: Vec3A,
    e_phi: Vec3A,
}

impl Basis {
    fn at(theta: f32, phi: f32) -> Self {
        let (sin_t, cos_t) = theta.sin_cos();
        let (sin_p, cos_p) = phi.sin_cos();
        Self {
            e_r: Vec3A::new(sin_t * cos_p, cos_t, sin_t * sin_p),
            e_theta: Vec3A::new(cos_t * cos_p, -sin_t, cos_t * sin_p),
            e_phi: Vec3A::new(-sin_p, 0.0, cos_p),
        }
    }
}

impl SphericalState {
    /// Build a state from a Cartesian position and direction.
    ///
    /// The angular momenta are the direction's tangential components scaled
    /// by r and r·sinθ, so that in flat space the state moves at unit speed.
    pub fn from_cartesian(position: Vec3A, direction: Vec3A) -> Self {
        let r = position.length().max(R_FLOOR);
        let theta = (position.y / r).clamp(-1.0, 1.0).acos().clamp(THETA_EPSILON, PI - THETA_EPSILON);
        let phi = wrap_angle(position.z.atan2(position.x));

        let basis = Basis::at(theta, phi);
        let d = direction.normalize_or_zero();

        Self {
            r,
            theta,
            phi,
            p_r: d.dot(basis.e_r),
            p_theta: r * d.dot(basis.e_theta),
            p_phi: r * theta.sin() * d.dot(basis.e_phi),
        }
    }

    /// Cartesian position of the state.
    pub fn position(&self) -> Vec3A {
        let (sin_t, cos_t) = self.theta.sin_cos();
        let (sin_p, cos_p) = self.phi.sin_cos();
        self.r * Vec3A::new(sin_t * cos_p, cos_t, sin_t * sin_p)
    }

    /// Unit Cartesian direction of motion.
    pub fn direction(&self, rs: f32) -> Vec3A {
        let d = derivatives(self, rs);
        let basis = Basis::at(self.theta, self.phi);
        let sin_t = self.theta.sin();
        let v = d.r * basis.e_r + (self.r * d.theta) * basis.e_theta + (self.r * sin_t * d.phi) * basis.e_phi;
        v.normalize_or_zero()
    }

    /// Keep the coordinates inside their valid domains.
    fn clamped(mut self) -> Self {
        self.r = self.r.max(R_FLOOR);
        self.theta = self.theta.clamp(THETA_EPSILON, PI - THETA_EPSILON);
        self.phi = wrap_angle(self.phi);
        self
    }
}

impl Add for SphericalState {
    type Output = SphericalState;

    fn add(self, o: SphericalState) -> SphericalState {
        SphericalState {
            r: self.r + o.r,
            theta: self.theta + o.theta,
            phi: self.phi + o.phi,
            p_r: self.p_r + o.p_r,
            p_theta: self.p_theta + o.p_theta,
            p_phi: self.p_phi + o.p_phi,
        }
    }
}

impl Mul<f32> for SphericalState {
    type Output = SphericalState;

    fn mul(self, s: f32) -> SphericalState {
        SphericalState {
            r: self.r * s,
            theta: self.theta * s,
            phi: self.phi * s,
            p_r: self.p_r * s,
            p_theta: self.p_theta * s,
            p_phi: self.p_phi * s,
        }
    }
}

/// Lapse function 1 - RS/r, floored above zero.
pub fn lapse(r: f32, rs: f32) -> f32 {
    (1.0 - rs / r).max(LAPSE_FLOOR)
}

/// Right-hand side of the ray equations of motion.
pub fn derivatives(s: &SphericalState, rs: f32) -> SphericalState {
    let r = s.r.max(R_FLOOR);
    let r2 = r * r;
    let r3 = r2 * r;
    let f = lapse(r, rs);
    let (sin_t, cos_t) = s.theta.clamp(THETA_EPSILON, PI - THETA_EPSILON).sin_cos();
    let sin2 = sin_t * sin_t;

    SphericalState {
        r: f * s.p_r,
        theta: s.p_theta / r2,
        phi: s.p_phi / (r2 * sin2),
        p_r: -(rs / (2.0 * r2)) * s.p_r * s.p_r / f
            + (s.p_theta * s.p_theta + s.p_phi * s.p_phi / sin2) * f / r3,
        p_theta: cos_t * s.p_phi * s.p_phi / (r2 * sin2 * sin_t),
        p_phi: 0.0,
    }
}

/// One fourth-order Runge-Kutta step of size `h`, clamping after every sub-stage.
pub fn rk4_step(s: &SphericalState, h: f32, rs: f32) -> SphericalState {
    let k1 = derivatives(s, rs);
    let s2 = (*s + k1 * (0.5 * h)).clamped();
    let k2 = derivatives(&s2, rs);
    let s3 = (*s + k2 * (0.5 * h)).clamped();
    let k3 = derivatives(&s3, rs);
    let s4 = (*s + k3 * h).clamped();
    let k4 = derivatives(&s4, rs);

    (*s + (k1 + k2 * 2.0 + k3 * 2.0 + k4) * (h / 6.0)).clamped()
}

/// Affine step size: finest at the photon sphere, growing with distance from it.
pub fn adaptive_step(r: f32, photon_sphere: f32) -> f32 {
    (MIN_STEP + STEP_GROWTH * (r - photon_sphere).abs()).clamp(MIN_STEP, MAX_STEP)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{PHOTON_SPHERE, RS};
    use approx::assert_relative_eq;

    #[test]
    fn test_cartesian_round_trip() {
        let p = Vec3A::new(30.0, -12.0, 55.0);
        let d = Vec3A::new(-0.4, 0.3, -0.8).normalize();
        let s = SphericalState::from_cartesian(p, d);
        let back = s.position();
        assert_relative_eq!(back.x, p.x, epsilon = 1e-3);
        assert_relative_eq!(back.y, p.y, epsilon = 1e-3);
        assert_relative_eq!(back.z, p.z, epsilon = 1e-3);

        // Far from the mass the lapse is ~1 and the direction is recovered.
        let dir = SphericalState::from_cartesian(p * 1000.0, d).direction(RS);
        assert_relative_eq!(dir.dot(d), 1.0, epsilon = 1e-3);
    }

    #[test]
    fn test_p_phi_is_conserved() {
        let s0 = SphericalState::from_cartesian(Vec3A::new(0.0, 20.0, 200.0), Vec3A::new(0.3, -0.1, -1.0));
        let mut s = s0;
        for _ in 0..200 {
            s = rk4_step(&s, adaptive_step(s.r, PHOTON_SPHERE), RS);
        }
        assert_eq!(s.p_phi, s0.p_phi);
    }

    #[test]
    fn test_flat_space_is_straight() {
        // With no mass the integrator must reproduce a straight line.
        let origin = Vec3A::new(0.0, 5.0, 100.0);
        let dir = Vec3A::new(0.2, 0.0, -1.0).normalize();
        let mut s = SphericalState::from_cartesian(origin, dir);
        let mut travelled = 0.0;
        for _ in 0..100 {
            let h = 1.0;
            let prev = s.position();
            s = rk4_step(&s, h, 0.0);
            travelled += (s.position() - prev).length();
        }
        let expected = origin + dir * travelled;
        assert_relative_eq!((s.position() - expected).length(), 0.0, epsilon = 0.05);
    }

    #[test]
    fn test_radial_infall_moves_inward() {
        let mut s = SphericalState::from_cartesian(Vec3A::new(0.0, 0.0, 200.0), -Vec3A::Z);
        assert_relative_eq!(s.p_r, -1.0, epsilon = 1e-6);
        assert_relative_eq!(s.p_phi, 0.0, epsilon = 1e-4);
        let r0 = s.r;
        for _ in 0..50 {
            s = rk4_step(&s, 2.0, RS);
        }
        assert!(s.r < r0);
        assert!(s.p_r < 0.0);
    }

    #[test]
    fn test_clamps_hold_near_singularities() {
        let on_pole = SphericalState { r: 50.0, theta: 0.0, phi: 4.0, p_r: -1.0, p_theta: 0.5, p_phi: 0.0 };
        let next = rk4_step(&on_pole, MIN_STEP, RS);
        assert!(next.theta >= THETA_EPSILON && next.theta <= PI - THETA_EPSILON);
        assert!(next.phi > -PI && next.phi <= PI);
        assert!(next.r.is_finite() && next.p_r.is_finite() && next.p_theta.is_finite());

        let collapsed = SphericalState { r: -3.0, theta: 4.0, phi: -7.0, p_r: 0.0, p_theta: 0.0, p_phi: 0.0 }.clamped();
        assert_eq!(collapsed.r, R_FLOOR);
        assert_eq!(collapsed.theta, PI - THETA_EPSILON);
        assert!(collapsed.phi > -PI && collapsed.phi <= PI);
    }

    #[test]
    fn test_step_is_finest_at_photon_sphere() {
        assert_relative_eq!(adaptive_step(PHOTON_SPHERE, PHOTON_SPHERE), MIN_STEP);
        assert!(adaptive_step(2.0 * PHOTON_SPHERE, PHOTON_SPHERE) > MIN_STEP);
        assert_relative_eq!(adaptive_step(1e6, PHOTON_SPHERE), MAX_STEP);
        assert!(lapse(RS, RS) > 0.0);
    }
}
