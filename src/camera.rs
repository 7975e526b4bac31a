//! Camera for ray generation and frame rendering

use std::sync::atomic::{AtomicUsize, Ordering};

use glam::Vec3A;
use image::{ImageBuffer, Rgb};
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info, warn};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::ray::Ray;
use crate::scene::Scene;
use crate::shading::{self, Color};
use crate::tonemap;
use crate::tracer::Tracer;

/// Where the observer is and what it looks at.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraState {
    /// Camera position in world space
    pub position: Vec3A,
    /// Point the camera is looking at
    pub target: Vec3A,
    /// Vertical field of view in degrees, in (0, 180)
    pub fov_degrees: f32,
}

impl Default for CameraState {
    fn default() -> Self {
        Self {
            position: Vec3A::new(0.0, 0.0, 300.0),
            target: Vec3A::ZERO,
            fov_degrees: 60.0,
        }
    }
}

impl CameraState {
    /// True when no view frame can be built from this state.
    pub fn is_degenerate(&self) -> bool {
        !self.position.is_finite()
            || !self.target.is_finite()
            || !self.fov_degrees.is_finite()
            || self.fov_degrees <= 0.0
            || self.fov_degrees >= 180.0
            || (self.target - self.position).length_squared() <= f32::EPSILON
    }
}

/// Everything the driver supplies for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameContext {
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
    /// Elapsed time in seconds, drives the disk animation
    pub time: f32,
    /// Observer
    pub camera: CameraState,
}

impl Default for FrameContext {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            time: 0.0,
            camera: CameraState::default(),
        }
    }
}

/// Per-render switches that do not change the traced geometry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderOptions {
    /// Blend the spacetime grid overlay
    pub grid: bool,
    /// Vignette strength, 0 disables it
    pub vignette: f32,
    /// Draw a progress bar while rendering
    pub show_progress: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            grid: false,
            vignette: 0.0,
            show_progress: true,
        }
    }
}

/// Pinhole camera derived from a [`FrameContext`].
///
/// The basis and viewport are computed once in [`Camera::new`]; afterwards
/// the camera is immutable and shared across the rendering threads.
#[derive(Debug, Clone)]
pub struct Camera {
    /// Rendered image width in pixel count
    pub image_width: u32,
    /// Rendered image height in pixel count
    pub image_height: u32,
    /// Frame time passed to the shading
    pub time: f32,

    /// Camera position in world space
    center: Vec3A,
    /// World position of the top-left pixel center (pixel 0,0)
    pixel00_loc: Vec3A,
    /// Offset vector from pixel to pixel horizontally (right direction)
    pixel_delta_u: Vec3A,
    /// Offset vector from pixel to pixel vertically (down direction)
    pixel_delta_v: Vec3A,
}

impl Camera {
    /// Build the view frame for `frame`.
    ///
    /// A degenerate camera state falls back to the default camera, and
    /// width and height are raised to at least 1.
    pub fn new(frame: &FrameContext) -> Self {
        let image_width = frame.width.max(1);
        let image_height = frame.height.max(1);

        let state = if frame.camera.is_degenerate() {
            warn!("Degenerate camera {:?}, using the default view", frame.camera);
            CameraState::default()
        } else {
            frame.camera
        };

        let center = state.position;

        // Viewport at unit focus distance
        let h = (state.fov_degrees.to_radians() / 2.0).tan();
        let viewport_height = 2.0 * h;
        let viewport_width = viewport_height * (image_width as f32 / image_height as f32);

        // w points opposite the view direction; a vertical view uses +Z as up.
        let w = (state.position - state.target).normalize();
        let vup = if w.dot(Vec3A::Y).abs() > 0.999 { Vec3A::Z } else { Vec3A::Y };
        let u = vup.cross(w).normalize();
        let v = w.cross(u);

        let viewport_u = viewport_width * u;
        let viewport_v = viewport_height * -v;

        let pixel_delta_u = viewport_u / image_width as f32;
        let pixel_delta_v = viewport_v / image_height as f32;

        let viewport_upper_left = center - w - viewport_u / 2.0 - viewport_v / 2.0;
        let pixel00_loc = viewport_upper_left + 0.5 * (pixel_delta_u + pixel_delta_v);

        debug!("Camera basis u={u} v={v} w={w}, viewport {viewport_width:.3}x{viewport_height:.3}");

        Self {
            image_width,
            image_height,
            time: frame.time,
            center,
            pixel00_loc,
            pixel_delta_u,
            pixel_delta_v,
        }
    }

    /// Ray through the center of pixel (i, j); row 0 is the top of the image.
    pub fn get_ray(&self, i: u32, j: u32) -> Ray {
        let pixel_center = self.pixel00_loc + (i as f32 * self.pixel_delta_u) + (j as f32 * self.pixel_delta_v);
        Ray::new(self.center, pixel_center - self.center)
    }

    /// Linear radiance of pixel (i, j).
    pub fn render_pixel_hdr(&self, i: u32, j: u32, scene: &Scene, options: &RenderOptions) -> Color {
        shading::radiance(scene, &self.get_ray(i, j), self.time, options.grid)
    }

    /// Display color of pixel (i, j), tone mapped and vignetted.
    pub fn render_pixel(&self, i: u32, j: u32, scene: &Scene, options: &RenderOptions) -> Color {
        let hdr = self.render_pixel_hdr(i, j, scene, options);
        tonemap::display_color(hdr, i, j, self.image_width, self.image_height, options)
    }

    /// Renders the frame in parallel.
    ///
    /// Returns an HDR image buffer with linear, finite, non-negative f32 RGB values.
    pub fn render_hdr(&self, scene: &Scene, options: &RenderOptions) -> ImageBuffer<Rgb<f32>, Vec<f32>> {
        let mut image: ImageBuffer<Rgb<f32>, Vec<f32>> = ImageBuffer::new(self.image_width, self.image_height);

        info!(
            "Rendering {}x{} at t={:.3} using {} CPU cores...",
            self.image_width,
            self.image_height,
            self.time,
            rayon::current_num_threads()
        );
        let generation_start = std::time::Instant::now();
        let pb = if options.show_progress {
            ProgressBar::new(u64::from(self.image_width) * u64::from(self.image_height))
        } else {
            ProgressBar::hidden()
        };
        if let Ok(style) = ProgressStyle::default_bar().template("{bar:40} {pos}/{len} ETA: {eta}") {
            pb.set_style(style);
        }

        let tracer = Tracer::new(scene);
        let lensed = AtomicUsize::new(0);

        image.enumerate_pixels_mut().par_bridge().for_each(|(i, j, pixel)| {
            let r = self.get_ray(i, j);
            let traced = tracer.trace_path(&r);
            if traced.integrated {
                lensed.fetch_add(1, Ordering::Relaxed);
            }
            let c = shading::ray_color(scene, &r, &traced.hit, self.time, options.grid);
            *pixel = Rgb([c.x, c.y, c.z]);
            pb.inc(1);
        });

        pb.finish_and_clear();
        info!("Frame generated in {:.2?}", generation_start.elapsed());
        debug!(
            "{} of {} rays integrated through the lensing zone",
            lensed.into_inner(),
            u64::from(self.image_width) * u64::from(self.image_height)
        );

        image
    }

    /// Renders the frame and maps it to display values in [0, 1].
    pub fn render(&self, scene: &Scene, options: &RenderOptions) -> ImageBuffer<Rgb<f32>, Vec<f32>> {
        tonemap::display_image(&self.render_hdr(scene, options), options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn frame(width: u32, height: u32, camera: CameraState) -> FrameContext {
        FrameContext { width, height, time: 0.0, camera }
    }

    #[test]
    fn test_center_ray_looks_at_target() {
        let camera = Camera::new(&frame(101, 101, CameraState::default()));
        let r = camera.get_ray(50, 50);
        assert_relative_eq!(r.origin.z, 300.0);
        assert_relative_eq!(r.direction.z, -1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_row_zero_is_top() {
        let camera = Camera::new(&frame(64, 48, CameraState::default()));
        assert!(camera.get_ray(10, 0).direction.y > 0.0);
        assert!(camera.get_ray(10, 47).direction.y < 0.0);
        assert!(camera.get_ray(0, 10).direction.x < 0.0);
        assert!(camera.get_ray(63, 10).direction.x > 0.0);

        // A single pixel sits on the view axis.
        let top = Camera::new(&frame(1, 1, CameraState::default()));
        assert_relative_eq!(top.get_ray(0, 0).direction.z, -1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_degenerate_camera_falls_back() {
        let fallback = Camera::new(&frame(32, 32, CameraState::default()));
        for bad in [
            CameraState { target: Vec3A::new(0.0, 0.0, 300.0), ..CameraState::default() },
            CameraState { fov_degrees: 0.0, ..CameraState::default() },
            CameraState { fov_degrees: 180.0, ..CameraState::default() },
            CameraState { position: Vec3A::new(f32::NAN, 0.0, 1.0), ..CameraState::default() },
        ] {
            assert!(bad.is_degenerate());
            let camera = Camera::new(&frame(32, 32, bad));
            let (a, b) = (camera.get_ray(3, 7), fallback.get_ray(3, 7));
            assert_eq!(a.origin, b.origin);
            assert_eq!(a.direction, b.direction);
        }
    }

    #[test]
    fn test_vertical_view_and_zero_size() {
        let above = CameraState { position: Vec3A::new(0.0, 400.0, 0.0), ..CameraState::default() };
        let camera = Camera::new(&frame(0, 0, above));
        assert_eq!((camera.image_width, camera.image_height), (1, 1));
        let r = camera.get_ray(0, 0);
        assert!(r.direction.is_finite());
        assert_relative_eq!(r.direction.y, -1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_small_render_is_well_formed() {
        let scene = Scene::default();
        let options = RenderOptions { grid: true, vignette: 0.3, show_progress: false };
        let camera = Camera::new(&frame(12, 9, CameraState { position: Vec3A::new(0.0, 60.0, 280.0), ..CameraState::default() }));
        let hdr = camera.render_hdr(&scene, &options);
        assert_eq!(hdr.dimensions(), (12, 9));
        assert!(hdr.pixels().all(|p| p.0.iter().all(|c| c.is_finite() && *c >= 0.0)));
        for (i, j, p) in hdr.enumerate_pixels() {
            let c = camera.render_pixel_hdr(i, j, &scene, &options);
            assert_eq!(p.0, [c.x, c.y, c.z]);
        }

        let display = camera.render(&scene, &options);
        assert!(display.pixels().all(|p| p.0.iter().all(|c| (0.0..=1.0).contains(c))));
        let direct = camera.render_pixel(5, 4, &scene, &options);
        assert_relative_eq!(display.get_pixel(5, 4)[1], direct.y, epsilon = 1e-6);
    }
}
