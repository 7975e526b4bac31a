//! Fixed parametric description of the world.
//!
//! Everything here is a compile-time constant: the black hole at the origin,
//! the accretion disk bounds, the decorative bodies and the integration and
//! quality knobs. `Scene` only bundles read accessors around them.

use glam::Vec3A;

/// Mass of the black hole in geometric units (G = c = 1).
pub const MASS: f32 = 5.0;
/// Schwarzschild radius, RS = 2M.
pub const RS: f32 = 2.0 * MASS;
/// Radius at which light can orbit the hole.
pub const PHOTON_SPHERE: f32 = 1.5 * RS;
/// Innermost stable circular orbit, inner edge of the disk.
pub const ISCO: f32 = 3.0 * RS;

/// Inner radius of the accretion disk.
pub const DISK_INNER: f32 = ISCO;
/// Outer radius of the accretion disk.
pub const DISK_OUTER: f32 = 20.0 * RS;
/// Vertical half-thickness of the disk slab.
pub const DISK_HALF_THICKNESS: f32 = 0.02 * RS;

/// Radius inside which rays are integrated instead of traced straight.
pub const LENSING_ZONE: f32 = 25.0 * RS;

/// Upper bound on RK4 steps per ray.
pub const MAX_STEPS: usize = 600;
/// Smallest affine step, used right at the photon sphere.
pub const MIN_STEP: f32 = 0.05 * RS;
/// Largest affine step, used far from the hole.
pub const MAX_STEP: f32 = 0.5 * RS;
/// Growth of the step with distance from the photon sphere.
pub const STEP_GROWTH: f32 = 0.1;
/// Floor applied to r after every RK4 sub-stage.
pub const R_FLOOR: f32 = 0.01 * RS;
/// Minimum angular distance kept between θ and the poles.
pub const THETA_EPSILON: f32 = 1e-4;
/// Floor of the lapse function f = 1 - RS/r.
pub const LAPSE_FLOOR: f32 = 1e-3;
/// Relative margin above RS at which a ray counts as absorbed.
pub const HORIZON_EPSILON: f32 = 0.01;

/// Minimum accepted ray parameter, avoids self-intersection at t = 0.
pub const HIT_EPSILON: f32 = 1e-3;

/// Vertical scale of the embedding-diagram grid (negative: funnel opens downward).
pub const GRID_SCALE: f32 = -0.3;
/// Offset constant of the embedding height.
pub const GRID_CONSTANT: f32 = 190.0;
/// Cut-out radius around the hole where the grid has no surface.
pub const GRID_HOLE_RADIUS: f32 = 1.2 * RS;
/// Outer radius of the grid surface.
pub const GRID_EXTENT: f32 = 60.0 * RS;
/// Spacing between grid lines in world units.
pub const GRID_SPACING: f32 = 2.0 * RS;
/// Half-width of a grid line.
pub const GRID_LINE_WIDTH: f32 = 0.08 * RS;
/// Number of fixed-size march steps along the camera ray.
pub const GRID_MARCH_STEPS: usize = 256;
/// Distance covered by the grid march.
pub const GRID_MAX_DISTANCE: f32 = 160.0 * RS;
/// Bisection refinements after a sign change is found.
pub const GRID_BISECT_ITERATIONS: usize = 12;
/// Distance at which the grid overlay starts to fade.
pub const GRID_FADE_START: f32 = 50.0 * RS;
/// Distance at which the grid overlay has fully faded.
pub const GRID_FADE_END: f32 = 120.0 * RS;
/// Tint of the grid lines.
pub const GRID_COLOR: Vec3A = Vec3A::new(0.25, 0.55, 1.0);

/// Non-rotating black hole fixed at the coordinate origin.
#[derive(Debug, Clone, Copy)]
pub struct BlackHole {
    /// Mass in geometric units.
    pub mass: f32,
}

impl BlackHole {
    /// Event horizon radius.
    pub fn schwarzschild_radius(&self) -> f32 {
        2.0 * self.mass
    }

    /// Photon sphere radius (1.5 RS).
    pub fn photon_sphere(&self) -> f32 {
        1.5 * self.schwarzschild_radius()
    }

    /// Innermost stable circular orbit (3 RS).
    pub fn isco(&self) -> f32 {
        3.0 * self.schwarzschild_radius()
    }

    /// Radius below which an integrated ray is classified as absorbed.
    pub fn capture_radius(&self) -> f32 {
        self.schwarzschild_radius() * (1.0 + HORIZON_EPSILON)
    }
}

/// Equatorial annulus around the hole.
#[derive(Debug, Clone, Copy)]
pub struct AccretionDisk {
    /// Inner edge radius.
    pub inner: f32,
    /// Outer edge radius.
    pub outer: f32,
    /// Vertical half-thickness.
    pub half_thickness: f32,
}

/// Static decorative sphere.
#[derive(Debug, Clone, Copy)]
pub struct CelestialBody {
    /// World-space center.
    pub center: Vec3A,
    /// Sphere radius.
    pub radius: f32,
    /// Surface albedo.
    pub color: Vec3A,
    /// Self-emission multiplier applied to `color`.
    pub emission: f32,
}

/// The fixed set of bodies: two inside the lensing zone, two outside.
pub const BODIES: [CelestialBody; 4] = [
    CelestialBody {
        center: Vec3A::new(150.0, 25.0, -165.0),
        radius: 14.0,
        color: Vec3A::new(0.85, 0.45, 0.25),
        emission: 0.05,
    },
    CelestialBody {
        center: Vec3A::new(-420.0, 80.0, -380.0),
        radius: 30.0,
        color: Vec3A::new(0.35, 0.55, 1.0),
        emission: 0.6,
    },
    CelestialBody {
        center: Vec3A::new(380.0, -60.0, -520.0),
        radius: 22.0,
        color: Vec3A::new(0.7, 0.7, 0.65),
        emission: 0.0,
    },
    CelestialBody {
        center: Vec3A::new(-160.0, 140.0, 90.0),
        radius: 10.0,
        color: Vec3A::new(0.5, 0.9, 0.6),
        emission: 0.1,
    },
];

/// Read-only view over the scene constants.
#[derive(Debug, Clone)]
pub struct Scene {
    black_hole: BlackHole,
    disk: AccretionDisk,
    bodies: &'static [CelestialBody],
    lensing_zone: f32,
}

impl Default for Scene {
    fn default() -> Self {
        Self {
            black_hole: BlackHole { mass: MASS },
            disk: AccretionDisk {
                inner: DISK_INNER,
                outer: DISK_OUTER,
                half_thickness: DISK_HALF_THICKNESS,
            },
            bodies: &BODIES,
            lensing_zone: LENSING_ZONE,
        }
    }
}

impl Scene {
    /// The central mass.
    pub fn black_hole(&self) -> &BlackHole {
        &self.black_hole
    }

    /// The accretion disk.
    pub fn disk(&self) -> &AccretionDisk {
        &self.disk
    }

    /// All decorative bodies, indexed by `HitKind::Body::index`.
    pub fn bodies(&self) -> &[CelestialBody] {
        self.bodies
    }

    /// Lensing zone radius.
    pub fn lensing_zone(&self) -> f32 {
        self.lensing_zone
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_derived_radii() {
        let bh = Scene::default().black_hole;
        assert!(bh.schwarzschild_radius() > 0.0);
        assert_relative_eq!(bh.schwarzschild_radius(), RS);
        assert_relative_eq!(bh.photon_sphere(), PHOTON_SPHERE);
        assert_relative_eq!(bh.isco(), ISCO);
        assert!(bh.capture_radius() > RS && bh.capture_radius() < PHOTON_SPHERE);
    }

    #[test]
    fn test_disk_bounds_ordering() {
        let scene = Scene::default();
        let disk = scene.disk();
        assert!(disk.inner < disk.outer);
        assert!(disk.inner > PHOTON_SPHERE);
        assert!(disk.outer < scene.lensing_zone());
        assert!(disk.half_thickness > 0.0);
    }

    #[test]
    fn test_step_limits() {
        assert!(MIN_STEP > 0.0 && MIN_STEP < MAX_STEP);
        assert!(R_FLOOR > 0.0 && R_FLOOR < RS);
        assert!(LAPSE_FLOOR > 0.0);
    }

    #[test]
    fn test_grid_surface_stays_below_disk_plane() {
        for r in [GRID_HOLE_RADIUS, DISK_OUTER, GRID_EXTENT] {
            let height = crate::grid::height(r).unwrap();
            assert!(height < 0.0, "grid height {height} at r = {r}");
        }
        assert!(GRID_FADE_START < GRID_FADE_END);
    }

    #[test]
    fn test_bodies_do_not_touch_horizon_or_disk() {
        for body in Scene::default().bodies() {
            assert!(body.radius > 0.0);
            let clearance = body.center.length() - body.radius;
            assert!(clearance > DISK_OUTER, "body too close: {clearance}");
        }
    }
}
