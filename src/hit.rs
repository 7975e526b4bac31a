//! Hit classification for traced rays.
//!
//! The set of things a ray can end on is closed, so it is a tagged enum
//! rather than a trait object. `shading::shade` is the single dispatch point
//! that turns a `Hit` into a color.

use glam::Vec3A;

/// What a traced ray ended on, with the data its shading needs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HitKind {
    /// Absorbed by the event horizon.
    Horizon,
    /// Struck a celestial body.
    Body {
        /// Index into `Scene::bodies`.
        index: usize,
        /// World-space hit point.
        point: Vec3A,
        /// Outward surface normal at `point`.
        normal: Vec3A,
    },
    /// Crossed the accretion disk.
    Disk {
        /// Cylindrical radius of the crossing.
        radius: f32,
        /// Azimuth of the crossing in (-π, π].
        angle: f32,
    },
    /// Escaped to the deep-space background.
    Background,
}

impl HitKind {
    /// Tie-break priority for hits at the same distance; lower wins.
    fn priority(&self) -> (u8, usize) {
        match self {
            HitKind::Horizon => (0, 0),
            HitKind::Disk { .. } => (1, 0),
            HitKind::Body { index, .. } => (2, *index),
            HitKind::Background => (3, 0),
        }
    }
}

/// Final state of a traced ray.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    /// Classification and per-kind data.
    pub kind: HitKind,
    /// Path length from the camera to the hit (infinite for background).
    pub distance: f32,
    /// Unit direction of the ray when it ended.
    pub direction: Vec3A,
}

impl Hit {
    /// A ray that escaped along `direction`.
    pub fn background(direction: Vec3A) -> Self {
        Self {
            kind: HitKind::Background,
            distance: f32::INFINITY,
            direction,
        }
    }

    /// True if the ray was absorbed by the horizon.
    pub fn is_horizon(&self) -> bool {
        matches!(self.kind, HitKind::Horizon)
    }

    /// Pick the nearer of two hits, breaking exact ties by kind priority.
    pub fn nearer(self, other: Hit) -> Hit {
        if other.distance < self.distance {
            other
        } else if self.distance < other.distance {
            self
        } else if other.kind.priority() < self.kind.priority() {
            other
        } else {
            self
        }
    }
}

/// Resolve a set of candidate hits to the nearest one.
///
/// An empty set resolves to background along `direction`.
pub fn resolve_nearest<I>(candidates: I, direction: Vec3A) -> Hit
where
    I: IntoIterator<Item = Hit>,
{
    candidates
        .into_iter()
        .fold(Hit::background(direction), Hit::nearer)
}
