use glam::Vec3A;
use gravlens::config::FrameConfig;
use gravlens::{Camera, CameraState, FrameContext, GravlensError, RenderOptions, Scene};

fn quiet() -> RenderOptions {
    RenderOptions { show_progress: false, ..RenderOptions::default() }
}

#[test]
fn center_pixel_of_default_view_is_black() {
    let frame = FrameContext { width: 100, height: 100, time: 0.0, camera: CameraState::default() };
    let camera = Camera::new(&frame);
    let scene = Scene::default();

    assert_eq!(camera.render_pixel(50, 50, &scene, &quiet()), Vec3A::ZERO);

    let image = camera.render(&scene, &quiet());
    assert_eq!(image.get_pixel(50, 50).0, [0.0, 0.0, 0.0]);
    assert!(image.pixels().all(|p| p.0.iter().all(|c| (0.0..=1.0).contains(c))));
    // The disk and bodies make the frame more than a black disc.
    assert!(image.pixels().any(|p| p[0] > 0.3));
}

#[test]
fn empty_sky_is_dim_but_never_black() {
    // Looking away from the hole: nothing but stars in view.
    let camera_state = CameraState { target: Vec3A::new(0.0, 0.0, 600.0), ..CameraState::default() };
    let frame = FrameContext { width: 48, height: 32, time: 0.0, camera: camera_state };
    let image = Camera::new(&frame).render(&Scene::default(), &quiet());

    let mut total = 0.0;
    for p in image.pixels() {
        assert!(p.0.iter().all(|c| *c > 0.0 && *c < 0.95), "pixel {:?}", p.0);
        total += p[0] + p[1] + p[2];
    }
    let mean = total / (3.0 * 48.0 * 32.0);
    assert!(mean < 0.3, "mean {mean}");
}

#[test]
fn frames_are_deterministic() {
    let frame = FrameContext {
        width: 40,
        height: 30,
        time: 3.25,
        camera: CameraState { position: Vec3A::new(60.0, 80.0, 260.0), target: Vec3A::ZERO, fov_degrees: 50.0 },
    };
    let scene = Scene::default();
    let options = RenderOptions { grid: true, ..quiet() };
    let a = Camera::new(&frame).render_hdr(&scene, &options);
    let b = Camera::new(&frame).render_hdr(&scene, &options);
    assert_eq!(a.as_raw(), b.as_raw());
}

#[test]
fn grid_overlay_changes_the_frame() {
    let frame = FrameContext {
        width: 48,
        height: 48,
        time: 0.0,
        camera: CameraState { position: Vec3A::new(0.0, 150.0, 300.0), ..CameraState::default() },
    };
    let camera = Camera::new(&frame);
    let scene = Scene::default();
    let plain = camera.render_hdr(&scene, &quiet());
    let gridded = camera.render_hdr(&scene, &RenderOptions { grid: true, ..quiet() });
    let changed = plain.pixels().zip(gridded.pixels()).filter(|(a, b)| a != b).count();
    assert!(changed > 0);
}

#[test]
fn config_file_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("frame.json");
    std::fs::write(&path, r#"{ "width": 16, "height": 8, "camera": { "position": [10, 20, 250] }, "vignette": 0.2 }"#).unwrap();

    let config = FrameConfig::load(&path).unwrap();
    let frame = config.frame_context();
    assert_eq!((frame.width, frame.height), (16, 8));
    assert_eq!(frame.camera.position, Vec3A::new(10.0, 20.0, 250.0));
    assert_eq!(config.render_options().vignette, 0.2);

    std::fs::write(&path, "{ not json").unwrap();
    assert!(matches!(FrameConfig::load(&path), Err(GravlensError::ConfigParse { .. })));
    assert!(matches!(
        FrameConfig::load(&dir.path().join("missing.json")),
        Err(GravlensError::ConfigIo { .. })
    ));
}
