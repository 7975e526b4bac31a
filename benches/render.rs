use criterion::{black_box, criterion_group, criterion_main, Criterion};
use glam::Vec3A;
use gravlens::ray::Ray;
use gravlens::tracer::Tracer;
use gravlens::{Camera, CameraState, FrameContext, RenderOptions, Scene};

fn bench_trace(c: &mut Criterion) {
    let scene = Scene::default();
    let tracer = Tracer::new(&scene);
    let lensed = Ray::new(Vec3A::new(0.0, 20.0, 300.0), Vec3A::new(0.12, -0.05, -1.0));
    let direct = Ray::new(Vec3A::new(0.0, 0.0, 300.0), Vec3A::new(1.0, 0.2, 0.3));

    let mut group = c.benchmark_group("trace");
    group.bench_function("lensed_ray", |b| b.iter(|| tracer.trace(black_box(&lensed))));
    group.bench_function("direct_ray", |b| b.iter(|| tracer.trace(black_box(&direct))));
    group.finish();
}

fn bench_frame(c: &mut Criterion) {
    let scene = Scene::default();
    let options = RenderOptions { grid: true, vignette: 0.25, show_progress: false };
    let frame = FrameContext {
        width: 64,
        height: 48,
        time: 1.0,
        camera: CameraState { position: Vec3A::new(0.0, 40.0, 300.0), ..CameraState::default() },
    };
    let camera = Camera::new(&frame);

    let mut group = c.benchmark_group("render");
    group.sample_size(10);
    group.bench_function("frame_64x48", |b| b.iter(|| camera.render(black_box(&scene), &options)));
    group.finish();
}

criterion_group!(benches, bench_trace, bench_frame);
criterion_main!(benches);
