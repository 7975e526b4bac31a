use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use glam::Vec3A;
use log::LevelFilter;

use gravlens::config::FrameConfig;
use gravlens::{CameraState, FrameContext, RenderOptions};

/// Custom enum for log levels that can be used with clap's ValueEnum
#[derive(Debug, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convert our custom LogLevel enum to log crate's LevelFilter
impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

/// Parse "x,y,z" into a vector.
fn parse_vec3(s: &str) -> Result<Vec3A, String> {
    let parts = s
        .split(',')
        .map(|p| p.trim().parse::<f32>().map_err(|e| format!("'{p}': {e}")))
        .collect::<Result<Vec<_>, _>>()?;
    match parts.as_slice() {
        [x, y, z] => Ok(Vec3A::new(*x, *y, *z)),
        _ => Err(format!("expected x,y,z but got {} components", parts.len())),
    }
}

fn parse_positive(s: &str) -> Result<f32, String> {
    match s.parse::<f32>() {
        Ok(v) if v.is_finite() && v > 0.0 => Ok(v),
        Ok(v) => Err(format!("{v} is not a positive number")),
        Err(e) => Err(e.to_string()),
    }
}

/// Command line arguments structure using clap derive macros
#[derive(Parser)]
#[command(name = "gravlens")]
#[command(about = "Renders light bending around a Schwarzschild black hole")]
pub struct Args {
    /// JSON frame configuration; explicit flags override its values
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Set the logging level (defaults to "info")
    #[arg(long, default_value = "info", help = "Set the logging level")]
    pub debug_level: LogLevel,

    /// Image width in pixels (default 800)
    #[arg(long)]
    pub width: Option<u32>,

    /// Image height in pixels (default 600)
    #[arg(long)]
    pub height: Option<u32>,

    /// Time of the first frame in seconds
    #[arg(long, short = 't', allow_hyphen_values = true)]
    pub time: Option<f32>,

    /// Camera position as x,y,z
    #[arg(long, value_parser = parse_vec3, allow_hyphen_values = true)]
    pub camera_pos: Option<Vec3A>,

    /// Camera look-at target as x,y,z
    #[arg(long, value_parser = parse_vec3, allow_hyphen_values = true)]
    pub camera_target: Option<Vec3A>,

    /// Vertical field of view in degrees
    #[arg(long)]
    pub fov: Option<f32>,

    /// Overlay the spacetime grid
    #[arg(long)]
    pub grid: bool,

    /// Vignette strength (0 disables it)
    #[arg(long)]
    pub vignette: Option<f32>,

    /// Number of frames to render
    #[arg(long, default_value_t = 1)]
    pub frames: u32,

    /// Frame rate of a sequence, sets the time step between frames
    #[arg(long, default_value_t = 30.0, value_parser = parse_positive)]
    pub fps: f32,

    /// Send image to TEV for real-time visualization
    #[arg(long, help = "Send image to TEV for real-time visualization")]
    pub tev: bool,

    /// TEV client IP address and port (automatically enables --tev)
    #[arg(long, help = "TEV client IP address and port (automatically enables --tev)")]
    pub tev_address: Option<String>,

    /// Output file path (.png for the tone-mapped image, .exr for linear HDR)
    #[arg(short, long, default_value = "output.png")]
    pub output: PathBuf,

    /// Hide the progress bar
    #[arg(long)]
    pub no_progress: bool,
}

impl Args {
    /// Merge the config file with the flags given on the command line.
    pub fn resolve(&self, config: &FrameConfig) -> (FrameContext, RenderOptions) {
        let base = config.frame_context();
        let camera = CameraState {
            position: self.camera_pos.unwrap_or(base.camera.position),
            target: self.camera_target.unwrap_or(base.camera.target),
            fov_degrees: self.fov.unwrap_or(base.camera.fov_degrees),
        };
        let frame = FrameContext {
            width: self.width.unwrap_or(base.width),
            height: self.height.unwrap_or(base.height),
            time: self.time.unwrap_or(base.time),
            camera,
        };

        let defaults = config.render_options();
        let options = RenderOptions {
            grid: self.grid || defaults.grid,
            vignette: self.vignette.unwrap_or(defaults.vignette),
            show_progress: !self.no_progress,
        };
        (frame, options)
    }

    /// Time of frame `index` in the sequence.
    pub fn frame_time(&self, start: f32, index: u32) -> f32 {
        start + index as f32 / self.fps
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_vec3() {
        assert_eq!(parse_vec3("1, -2.5,3").unwrap(), Vec3A::new(1.0, -2.5, 3.0));
        assert!(parse_vec3("1,2").is_err());
        assert!(parse_vec3("1,a,3").is_err());
    }

    #[test]
    fn test_flags_override_config() {
        let config = FrameConfig::from_json(r#"{ "width": 320, "height": 200, "time": 4.0, "vignette": 0.5, "camera": { "fov_degrees": 45 } }"#).unwrap();
        let args = Args::try_parse_from(["gravlens", "--width", "64", "--camera-pos", "0,-20,150", "--grid", "--no-progress"]).unwrap();
        let (frame, options) = args.resolve(&config);
        assert_eq!((frame.width, frame.height), (64, 200));
        assert_eq!(frame.time, 4.0);
        assert_eq!(frame.camera.position, Vec3A::new(0.0, -20.0, 150.0));
        assert_eq!(frame.camera.fov_degrees, 45.0);
        assert!(options.grid && !options.show_progress);
        assert_eq!(options.vignette, 0.5);
    }

    #[test]
    fn test_sequence_timing() {
        let args = Args::try_parse_from(["gravlens", "--frames", "3", "--fps", "4"]).unwrap();
        assert_eq!(args.frame_time(1.0, 2), 1.5);
        assert!(Args::try_parse_from(["gravlens", "--fps", "0"]).is_err());
    }
}
