//! gravlens: light bending around a Schwarzschild black hole
//!
//! Each pixel's ray is traced straight until it nears the hole, then
//! integrated through curved space and tested against the event horizon,
//! the accretion disk and a handful of celestial bodies. Frames are rendered
//! on the CPU with rayon and written as PNG or EXR, or streamed to TEV.

#![warn(missing_docs)]
#![warn(rustdoc::broken_intra_doc_links)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod camera;
pub mod config;
pub mod disk;
pub mod error;
pub mod geodesic;
pub mod grid;
pub mod hit;
pub mod interval;
pub mod noise;
pub mod output;
pub mod ray;
pub mod scene;
pub mod shading;
pub mod sphere;
pub mod starfield;
pub mod tonemap;
pub mod tracer;

pub use camera::{Camera, CameraState, FrameContext, RenderOptions};
pub use error::GravlensError;
pub use scene::Scene;
