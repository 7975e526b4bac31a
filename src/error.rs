//! Errors raised around the renderer: configuration and output.
//!
//! Tracing itself never fails; an ill-conditioned ray degrades to a black
//! or background pixel instead.

use std::path::PathBuf;

use thiserror::Error;

/// Failures of the driver-facing parts of the crate.
#[derive(Debug, Error)]
pub enum GravlensError {
    /// The configuration file could not be read.
    #[error("failed to read config {path}: {source}")]
    ConfigIo {
        /// File that was being read.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The configuration file is not valid JSON for a frame config.
    #[error("invalid config {path}: {source}")]
    ConfigParse {
        /// File that was being parsed.
        path: PathBuf,
        /// Underlying parse error.
        source: serde_json::Error,
    },

    /// Encoding or writing a PNG failed.
    #[error("failed to save image {path}: {source}")]
    ImageSave {
        /// Destination path.
        path: PathBuf,
        /// Underlying image error.
        source: image::ImageError,
    },

    /// Writing an OpenEXR file failed.
    #[error("failed to write EXR {path}: {source}")]
    Exr {
        /// Destination path.
        path: PathBuf,
        /// Underlying EXR error.
        source: exr::error::Error,
    },

    /// Output path has an extension other than .png or .exr.
    #[error("unsupported file extension '{0}', only .png and .exr formats are supported")]
    UnsupportedExtension(String),
}
