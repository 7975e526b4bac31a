//! HDR to display mapping.

use glam::Vec3A;
use image::{ImageBuffer, Rgb};

use crate::camera::RenderOptions;

const GAMMA: f32 = 2.2;

/// Replace NaN with 0 and clamp to [0, f32::MAX].
pub fn sanitize(c: Vec3A) -> Vec3A {
    Vec3A::select(c.is_nan_mask(), Vec3A::ZERO, c).clamp(Vec3A::ZERO, Vec3A::splat(f32::MAX))
}

/// Reinhard operator c / (c + 1), per channel.
pub fn reinhard(c: Vec3A) -> Vec3A {
    let c = sanitize(c);
    // (c + 1) rounds to c for huge values, so the ratio stays at most 1.
    c / (c + Vec3A::ONE)
}

/// Gamma 1/2.2 of the value clamped to [0, 1].
pub fn gamma(c: Vec3A) -> Vec3A {
    let c = sanitize(c).clamp(Vec3A::ZERO, Vec3A::ONE);
    Vec3A::new(c.x.powf(1.0 / GAMMA), c.y.powf(1.0 / GAMMA), c.z.powf(1.0 / GAMMA))
}

/// Reinhard followed by gamma.
pub fn tonemap(c: Vec3A) -> Vec3A {
    gamma(reinhard(c))
}

/// Radial darkening factor at screen coordinates `u`, `v` in [-1, 1].
pub fn vignette(u: f32, v: f32, strength: f32) -> f32 {
    (1.0 - strength * (u * u + v * v)).max(0.0)
}

/// Display color for pixel (i, j) of a `width` x `height` frame.
pub fn display_color(hdr: Vec3A, i: u32, j: u32, width: u32, height: u32, options: &RenderOptions) -> Vec3A {
    let mapped = tonemap(hdr);
    if options.vignette <= 0.0 {
        return mapped;
    }
    let u = 2.0 * (i as f32 + 0.5) / width.max(1) as f32 - 1.0;
    let v = 2.0 * (j as f32 + 0.5) / height.max(1) as f32 - 1.0;
    mapped * vignette(u, v, options.vignette)
}

/// Map a linear HDR frame to display values in [0, 1].
pub fn display_image(hdr: &ImageBuffer<Rgb<f32>, Vec<f32>>, options: &RenderOptions) -> ImageBuffer<Rgb<f32>, Vec<f32>> {
    let (width, height) = hdr.dimensions();
    ImageBuffer::from_fn(width, height, |i, j| {
        let p = hdr.get_pixel(i, j);
        let c = display_color(Vec3A::new(p[0], p[1], p[2]), i, j, width, height, options);
        Rgb([c.x, c.y, c.z])
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_monotonic() {
        let mut last = -1.0;
        for k in 0..200 {
            let c = Vec3A::splat(k as f32 * 0.25);
            let m = tonemap(c).x;
            assert!(m >= last);
            assert!((0.0..=1.0).contains(&m));
            last = m;
        }
        let a = tonemap(Vec3A::new(2.0, 0.5, 8.0));
        let b = tonemap(Vec3A::new(1.0, 0.5, 3.0));
        assert!(a.cmpge(b).all());
    }

    #[test]
    fn test_not_idempotent() {
        let c = Vec3A::new(0.5, 0.2, 4.0);
        let once = tonemap(c);
        let twice = tonemap(once);
        assert!((once - twice).abs().max_element() > 1e-3);
    }

    #[test]
    fn test_black_stays_black_and_bad_input() {
        assert_eq!(tonemap(Vec3A::ZERO), Vec3A::ZERO);
        let bad = tonemap(Vec3A::new(f32::NAN, f32::INFINITY, -5.0));
        assert_eq!(bad.x, 0.0);
        assert_relative_eq!(bad.y, 1.0);
        assert_eq!(bad.z, 0.0);
    }

    #[test]
    fn test_vignette() {
        assert_eq!(vignette(0.0, 0.0, 0.5), 1.0);
        assert_relative_eq!(vignette(1.0, 0.0, 0.5), 0.5);
        assert_eq!(vignette(1.0, 1.0, 2.0), 0.0);

        let options = RenderOptions { vignette: 0.5, ..RenderOptions::default() };
        let hdr = ImageBuffer::from_pixel(8, 8, Rgb([1.0f32, 1.0, 1.0]));
        let out = display_image(&hdr, &options);
        assert!(out.get_pixel(0, 0)[0] < out.get_pixel(4, 4)[0]);
    }
}
