//! # Output Module
//!
//! Writes rendered frames to disk or streams them to a viewer:
//! - PNG export of the tone-mapped display image (8-bit)
//! - EXR export of the linear HDR radiance (32-bit float)
//! - Live display in TEV (The EXR Viewer) over TCP
//!
//! File writers return [`GravlensError`]; TEV problems are only logged.

use std::net::TcpStream;
use std::path::{Path, PathBuf};

use exr::prelude::write_rgb_file;
use image::{ImageBuffer, Rgb};
use log::{debug, info, warn};
use tev_client::{PacketCreateImage, PacketUpdateImage, TevClient};

use crate::error::GravlensError;

/// f32 RGB frame, the format every renderer entry point returns.
pub type FrameBuffer = ImageBuffer<Rgb<f32>, Vec<f32>>;

const TEV_DEFAULT_PORT: u16 = 14158;

/// Send an f32 RGB image to TEV under `image_name`.
///
/// `tev_address` is `host:port` or just `host`, in which case TEV's default
/// port is used. Connection and transfer failures are logged as warnings.
pub fn send_image_to_tev(image: &FrameBuffer, tev_address: &str, image_name: &str) {
    let tev_address = if tev_address.contains(':') {
        tev_address.to_string()
    } else {
        format!("{tev_address}:{TEV_DEFAULT_PORT}")
    };
    let (width, height) = image.dimensions();

    debug!("Attempting to connect to TEV at {}", tev_address);

    let stream = match TcpStream::connect(&tev_address) {
        Ok(stream) => stream,
        Err(e) => {
            warn!("Failed to connect to TEV on {}: {}", tev_address, e);
            return;
        }
    };
    if let Err(e) = stream.set_nodelay(true) {
        debug!("Failed to set TCP_NODELAY: {}", e);
    }
    let mut client = TevClient::wrap(stream);

    let create_packet = PacketCreateImage {
        image_name,
        width,
        height,
        channel_names: &["R", "G", "B"],
        grab_focus: true,
    };
    if let Err(e) = client.send(create_packet) {
        warn!("Failed to create image in TEV: {}", e);
        return;
    }

    let rgb_data = planar_channels(image);
    debug!(
        "Sending {} pixels to TEV ({:.1} MB)",
        rgb_data.len() / 3,
        rgb_data.len() as f32 * 4.0 / 1_000_000.0
    );
    let start_time = std::time::Instant::now();

    let pixel_count = u64::from(width) * u64::from(height);
    let update_packet = PacketUpdateImage {
        image_name,
        grab_focus: false,
        channel_names: &["R", "G", "B"],
        x: 0,
        y: 0,
        width,
        height,
        channel_offsets: &[0, pixel_count, 2 * pixel_count],
        channel_strides: &[1, 1, 1],
        data: &rgb_data,
    };

    match client.send(update_packet) {
        Ok(_) => info!("Image sent to TEV at {} in {:.2?}", tev_address, start_time.elapsed()),
        Err(e) => warn!("Failed to send image data to TEV: {}", e),
    }
}

/// Interleaved RGBRGB... to planar RRR...GGG...BBB... as TEV expects.
fn planar_channels(image: &FrameBuffer) -> Vec<f32> {
    (0..3)
        .flat_map(|channel| image.pixels().map(move |p| p[channel]))
        .collect()
}

/// Save a display image (values in [0, 1], already gamma encoded) as an 8-bit PNG.
pub fn save_image_as_png(image: &FrameBuffer, output_path: &Path) -> Result<(), GravlensError> {
    let (width, height) = image.dimensions();
    let u8_image: ImageBuffer<Rgb<u8>, Vec<u8>> = ImageBuffer::from_fn(width, height, |x, y| {
        let pixel = image.get_pixel(x, y);
        let quantize = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        Rgb([quantize(pixel[0]), quantize(pixel[1]), quantize(pixel[2])])
    });

    u8_image.save(output_path).map_err(|source| GravlensError::ImageSave {
        path: output_path.to_path_buf(),
        source,
    })?;
    info!("Image saved as {}", output_path.display());
    Ok(())
}

/// Save linear HDR radiance as a 32-bit float EXR, with no tone mapping.
pub fn save_image_as_exr(image: &FrameBuffer, output_path: &Path) -> Result<(), GravlensError> {
    let (width, height) = image.dimensions();
    write_rgb_file(output_path, width as usize, height as usize, |x, y| {
        let p = image.get_pixel(x as u32, y as u32);
        (p[0], p[1], p[2])
    })
    .map_err(|source| GravlensError::Exr {
        path: output_path.to_path_buf(),
        source,
    })?;
    info!("HDR image saved as EXR: {}", output_path.display());
    Ok(())
}

/// Supported output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// 8-bit PNG of the display image.
    Png,
    /// 32-bit float EXR of the linear radiance.
    Exr,
}

impl OutputFormat {
    /// Format chosen by the extension of `output_path`.
    pub fn from_path(output_path: &Path) -> Result<Self, GravlensError> {
        match output_path.extension().and_then(|e| e.to_str()) {
            Some("png") => Ok(OutputFormat::Png),
            Some("exr") => Ok(OutputFormat::Exr),
            other => Err(GravlensError::UnsupportedExtension(other.unwrap_or_default().to_string())),
        }
    }
}

/// Write a frame by extension: `.png` gets the display image, `.exr` the HDR one.
pub fn save_frame(display: &FrameBuffer, hdr: &FrameBuffer, output_path: &Path) -> Result<(), GravlensError> {
    match OutputFormat::from_path(output_path)? {
        OutputFormat::Png => save_image_as_png(display, output_path),
        OutputFormat::Exr => save_image_as_exr(hdr, output_path),
    }
}

/// Output path of frame `index` in a sequence: `<stem>_<index:04>.<ext>`.
///
/// A single-frame render keeps `output_path` unchanged.
pub fn frame_path(output_path: &Path, index: u32, frame_count: u32) -> PathBuf {
    if frame_count <= 1 {
        return output_path.to_path_buf();
    }
    let stem = output_path.file_stem().and_then(|s| s.to_str()).unwrap_or("frame");
    let name = match output_path.extension().and_then(|e| e.to_str()) {
        Some(ext) => format!("{stem}_{index:04}.{ext}"),
        None => format!("{stem}_{index:04}"),
    };
    output_path.with_file_name(name)
}
