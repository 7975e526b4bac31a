//! Interval arithmetic for ray parameter ranges and radial bounds.

/// Closed interval [min, max] for range checking.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    /// Minimum value of the interval
    pub min: f32,
    /// Maximum value of the interval
    pub max: f32,
}

impl Interval {
    /// Create a new interval with given min and max values
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Check if the interval contains the given value (inclusive bounds)
    pub fn contains(&self, x: f32) -> bool {
        self.min <= x && x <= self.max
    }

    /// Check if the interval surrounds the given value (exclusive bounds)
    pub fn surrounds(&self, x: f32) -> bool {
        self.min < x && x < self.max
    }

    /// Shrink the upper bound, used to keep only hits nearer than the best so far.
    pub fn with_max(self, max: f32) -> Self {
        Self::new(self.min, max.min(self.max))
    }
}

impl Interval {
    /// Every strictly positive ray parameter beyond the self-intersection epsilon.
    pub const FORWARD: Interval = Interval {
        min: crate::scene::HIT_EPSILON,
        max: f32::INFINITY,
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_vs_surrounds() {
        let iv = Interval::new(1.0, 2.0);
        assert!(iv.contains(1.0) && iv.contains(2.0));
        assert!(!iv.surrounds(1.0) && !iv.surrounds(2.0));
        assert!(iv.surrounds(1.5));
    }

    #[test]
    fn test_with_max_only_shrinks() {
        let iv = Interval::new(0.0, 10.0);
        assert_eq!(iv.with_max(5.0).max, 5.0);
        assert_eq!(iv.with_max(50.0).max, 10.0);
        assert!(!Interval::FORWARD.surrounds(0.0));
    }
}
