use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use raycaster::render::caster::{cast_column, column_to_camera_x};
use raycaster::{FrameRenderer, RenderConfig, Scene, Viewport};

const VIEWPORTS: [(&str, Viewport); 3] = [
    ("320x200", Viewport::new(320, 200)),
    ("800x600", Viewport::new(800, 600)),
    ("1920x1080", Viewport::new(1920, 1080)),
];

fn benchmark_full_frame(c: &mut Criterion) {
    let mut group = c.benchmark_group("full_frame");
    let scene = Scene::demo().expect("demo scene");

    for (name, viewport) in VIEWPORTS {
        for (mode, parallel) in [("sequential", false), ("parallel", true)] {
            let mut renderer = FrameRenderer::new(RenderConfig {
                parallel,
                ..RenderConfig::default()
            });
            group.bench_with_input(BenchmarkId::new(mode, name), &viewport, |b, &viewport| {
                b.iter(|| {
                    let frame = renderer.render_scene(black_box(&scene), viewport);
                    black_box(frame.map(|f| f.stats()));
                });
            });
        }
    }

    group.finish();
}

fn benchmark_cast_column(c: &mut Criterion) {
    let mut group = c.benchmark_group("cast_column");
    let scene = Scene::demo().expect("demo scene");

    group.bench_function("800_columns", |b| {
        b.iter(|| {
            for column in 0..800 {
                let camera_x = column_to_camera_x(column, 800);
                black_box(cast_column(black_box(camera_x), &scene.camera, &scene.grid));
            }
        });
    });

    // Long corridor: the DDA walk dominates.
    let mut corridor = scene.clone();
    corridor.grid = raycaster::WorldGrid::new(256, 3).expect("grid");
    corridor.grid.enclose(1);
    corridor.camera = corridor.camera.moved_to(raycaster::math::Vec2::new(1.5, 1.5));
    group.bench_function("corridor_256", |b| {
        b.iter(|| black_box(cast_column(0.0, &corridor.camera, &corridor.grid)));
    });

    group.finish();
}

criterion_group!(benches, benchmark_full_frame, benchmark_cast_column);
criterion_main!(benches);
