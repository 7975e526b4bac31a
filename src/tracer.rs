//! Per-ray tracing: straight tests, lensing-zone decision and bent paths.
//!
//! A ray whose closest approach to the mass stays outside the lensing zone
//! is traced as a straight line. Otherwise it travels straight up to the
//! zone boundary and is then integrated step by step; every step's chord is
//! tested against the bodies and the disk plane. A ray that climbs back out
//! of the zone continues straight from where it left.

use glam::Vec3A;

use crate::geodesic::{adaptive_step, rk4_step, SphericalState};
use crate::hit::{resolve_nearest, Hit, HitKind};
use crate::interval::Interval;
use crate::ray::Ray;
use crate::scene::{Scene, MAX_STEPS};
use crate::sphere::{nearest_body, Sphere};

/// Traces rays through a fixed scene.
#[derive(Debug, Clone, Copy)]
pub struct Tracer<'a> {
    scene: &'a Scene,
    max_steps: usize,
}

/// A traced camera ray.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Traced {
    /// First feature met along the ray.
    pub hit: Hit,
    /// True when the ray was integrated through the lensing zone.
    pub integrated: bool,
}

impl<'a> Tracer<'a> {
    /// Create a tracer over `scene` with the default step budget.
    pub fn new(scene: &'a Scene) -> Self {
        Self {
            scene,
            max_steps: MAX_STEPS,
        }
    }

    /// Limit the number of integration steps per ray.
    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = max_steps;
        self
    }

    /// True when the ray passes close enough to the mass to need integration.
    pub fn in_lensing_zone(&self, r: &Ray) -> bool {
        r.closest_approach() <= self.scene.lensing_zone()
    }

    /// Trace a camera ray to the first feature it meets.
    pub fn trace(&self, r: &Ray) -> Hit {
        self.trace_path(r).hit
    }

    /// Like [`Tracer::trace`], also reporting whether the ray was integrated.
    pub fn trace_path(&self, r: &Ray) -> Traced {
        let direct = self.trace_direct(r);
        let straight = Traced {
            hit: direct,
            integrated: false,
        };
        if !self.in_lensing_zone(r) {
            return straight;
        }

        let t_enter = self.zone_entry(r);
        // Something in front of the zone occludes the lensed region.
        if direct.distance < t_enter {
            return straight;
        }
        Traced {
            hit: self.integrate(r.at(t_enter), r.direction, t_enter),
            integrated: true,
        }
    }

    /// Straight-line trace, ignoring gravity.
    pub fn trace_direct(&self, r: &Ray) -> Hit {
        self.straight_hits(r, 0.0)
    }

    /// Integrated trace starting at the ray origin, whatever its distance.
    pub fn trace_geodesic(&self, r: &Ray) -> Hit {
        self.integrate(r.origin, r.direction, 0.0)
    }

    /// Ray parameter at which the ray enters the lensing zone (0 when it starts inside).
    fn zone_entry(&self, r: &Ray) -> f32 {
        let zone = self.scene.lensing_zone();
        if r.origin.length() <= zone {
            return 0.0;
        }
        Sphere::new(Vec3A::ZERO, zone)
            .hit(r, Interval::new(0.0, f32::INFINITY))
            .unwrap_or_else(|| r.closest_approach_t())
    }

    /// Nearest of horizon, bodies and disk along a straight ray, `offset` added to distances.
    fn straight_hits(&self, r: &Ray, offset: f32) -> Hit {
        let scene = self.scene;
        let horizon = Sphere::new(Vec3A::ZERO, scene.black_hole().schwarzschild_radius())
            .hit(r, Interval::FORWARD)
            .map(|t| Hit {
                kind: HitKind::Horizon,
                distance: offset + t,
                direction: r.direction,
            });

        let body = nearest_body(scene.bodies(), r, Interval::FORWARD).map(|(index, t)| {
            let point = r.at(t);
            Hit {
                kind: HitKind::Body {
                    index,
                    point,
                    normal: Sphere::from(&scene.bodies()[index]).normal_at(point),
                },
                distance: offset + t,
                direction: r.direction,
            }
        });

        let disk = scene.disk().hit(r, Interval::FORWARD).map(|crossing| Hit {
            kind: HitKind::Disk {
                radius: crossing.radius,
                angle: crossing.angle,
            },
            distance: offset + crossing.t,
            direction: r.direction,
        });

        resolve_nearest(horizon.into_iter().chain(body).chain(disk), r.direction)
    }

    /// Hits on the chord `from -> to` of an integration step.
    fn segment_hits(&self, from: Vec3A, to: Vec3A, travelled: f32) -> Option<Hit> {
        let chord = to - from;
        let length = chord.length();
        if length <= 0.0 {
            return None;
        }
        let scene = self.scene;
        let segment = Ray::new(from, chord);

        let body = nearest_body(scene.bodies(), &segment, Interval::new(0.0, length)).map(|(index, t)| {
            let point = segment.at(t);
            Hit {
                kind: HitKind::Body {
                    index,
                    point,
                    normal: Sphere::from(&scene.bodies()[index]).normal_at(point),
                },
                distance: travelled + t,
                direction: segment.direction,
            }
        });

        let disk = scene.disk().crossing_on_segment(from, to).map(|crossing| Hit {
            kind: HitKind::Disk {
                radius: crossing.radius,
                angle: crossing.angle,
            },
            distance: travelled + crossing.t * length,
            direction: segment.direction,
        });

        let hit = resolve_nearest(body.into_iter().chain(disk), segment.direction);
        (hit.kind != HitKind::Background).then_some(hit)
    }

    /// Integrate the bent path from `start` until it is absorbed, hits something or leaves the zone.
    ///
    /// A ray still inside the zone when the step budget runs out is treated
    /// as background along its last direction.
    fn integrate(&self, start: Vec3A, direction: Vec3A, mut travelled: f32) -> Hit {
        let bh = self.scene.black_hole();
        let rs = bh.schwarzschild_radius();
        let photon_sphere = bh.photon_sphere();
        let capture = bh.capture_radius();
        let zone = self.scene.lensing_zone();

        let mut state = SphericalState::from_cartesian(start, direction);
        let mut prev = start;

        for _ in 0..self.max_steps {
            state = rk4_step(&state, adaptive_step(state.r, photon_sphere), rs);
            let next = state.position();
            let step_length = (next - prev).length();

            if state.r < capture {
                return Hit {
                    kind: HitKind::Horizon,
                    distance: travelled + step_length,
                    direction: state.direction(rs),
                };
            }

            if state.r > zone && state.p_r > 0.0 {
                let exit = Ray::new(next, state.direction(rs));
                return self.straight_hits(&exit, travelled + step_length);
            }

            if let Some(hit) = self.segment_hits(prev, next, travelled) {
                return hit;
            }

            travelled += step_length;
            prev = next;
        }

        Hit::background(state.direction(rs))
    }
}
