//! JSON frame configuration.
//!
//! Every field is optional; anything left out keeps the built-in default.
//!
//! ```json
//! {
//!   "width": 1280,
//!   "height": 720,
//!   "time": 2.5,
//!   "camera": { "position": [0, 40, 300], "target": [0, 0, 0], "fov_degrees": 50 },
//!   "grid": true,
//!   "vignette": 0.3
//! }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::camera::{CameraState, FrameContext, RenderOptions};
use crate::error::GravlensError;

/// Frame settings read from a file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FrameConfig {
    /// Image width in pixels.
    pub width: Option<u32>,
    /// Image height in pixels.
    pub height: Option<u32>,
    /// Frame time in seconds.
    pub time: Option<f32>,
    /// Observer; missing camera fields take their defaults.
    pub camera: Option<CameraState>,
    /// Grid overlay switch.
    pub grid: Option<bool>,
    /// Vignette strength.
    pub vignette: Option<f32>,
}

impl FrameConfig {
    /// Parse a config from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Read and parse a config file.
    pub fn load(path: &Path) -> Result<Self, GravlensError> {
        let text = std::fs::read_to_string(path).map_err(|source| GravlensError::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text).map_err(|source| GravlensError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Frame context with defaults filled in.
    pub fn frame_context(&self) -> FrameContext {
        let defaults = FrameContext::default();
        FrameContext {
            width: self.width.unwrap_or(defaults.width),
            height: self.height.unwrap_or(defaults.height),
            time: self.time.unwrap_or(defaults.time),
            camera: self.camera.unwrap_or(defaults.camera),
        }
    }

    /// Render options with defaults filled in.
    pub fn render_options(&self) -> RenderOptions {
        let defaults = RenderOptions::default();
        RenderOptions {
            grid: self.grid.unwrap_or(defaults.grid),
            vignette: self.vignette.unwrap_or(defaults.vignette),
            show_progress: defaults.show_progress,
        }
    }
}
