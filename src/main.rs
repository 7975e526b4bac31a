use clap::Parser;
use log::{error, info};

mod cli;
mod logger;

use cli::Args;
use gravlens::config::FrameConfig;
use gravlens::output::{frame_path, save_frame, send_image_to_tev, OutputFormat};
use gravlens::{tonemap, Camera, FrameContext, GravlensError, Scene};
use logger::init_logger;

fn main() {
    let args = Args::parse();

    init_logger(args.debug_level.clone().into());

    // Log application startup with version information
    info!("gravlens - Git Version {} ({})", env!("GIT_HASH"), env!("GIT_DATE"));

    if let Err(e) = run(&args) {
        error!("{}", e);
        std::process::exit(1);
    }
}

/// Render every requested frame and write or stream it.
fn run(args: &Args) -> Result<(), GravlensError> {
    let config = match &args.config {
        Some(path) => FrameConfig::load(path)?,
        None => FrameConfig::default(),
    };
    let (first, options) = args.resolve(&config);

    // Reject a bad output path before spending time on rendering
    OutputFormat::from_path(&args.output)?;

    info!(
        "Image resolution: {}x{}, frames: {}, camera {} -> {}, fov {}",
        first.width,
        first.height,
        args.frames,
        first.camera.position,
        first.camera.target,
        first.camera.fov_degrees
    );

    let scene = Scene::default();
    let tev_address = (args.tev || args.tev_address.is_some())
        .then(|| args.tev_address.as_deref().unwrap_or("localhost:14158"));
    let sequence_start = std::time::Instant::now();

    for index in 0..args.frames {
        let frame = FrameContext {
            time: args.frame_time(first.time, index),
            ..first
        };
        let camera = Camera::new(&frame);
        let hdr = camera.render_hdr(&scene, &options);
        let display = tonemap::display_image(&hdr, &options);

        if let Some(address) = tev_address {
            send_image_to_tev(&hdr, address, "gravlens");
        }
        save_frame(&display, &hdr, &frame_path(&args.output, index, args.frames))?;
    }

    if args.frames > 1 {
        info!("{} frames rendered in {:.2?}", args.frames, sequence_start.elapsed());
    }
    Ok(())
}
