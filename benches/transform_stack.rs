use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use shadeview::math::mat4::Mat4;
use shadeview::math::vec3::Vec3;
use shadeview::scene::LocalOp;
use shadeview::TransformStack;

fn camera_view(stack: &mut TransformStack) {
    stack
        .translate(Vec3::new(0.0, 0.0, -2.0))
        .rotate(0.3, Vec3::X)
        .rotate(0.7, Vec3::Y);
}

fn teapot_placement() -> Vec<LocalOp> {
    vec![
        LocalOp::Translate(Vec3::new(0.5, 0.0, 0.0)),
        LocalOp::Scale(Vec3::splat(0.5)),
        LocalOp::Shear { amplitude: 0.5 },
        LocalOp::Rotate {
            angle: std::f32::consts::PI,
            axis: Vec3::Y,
        },
    ]
}

fn benchmark_object_scope(c: &mut Criterion) {
    let mut group = c.benchmark_group("object_scope");
    let placement = teapot_placement();

    for objects in [2usize, 64, 1024] {
        group.bench_with_input(BenchmarkId::new("place_and_invert", objects), &objects, |b, &n| {
            b.iter(|| {
                let mut mv = TransformStack::new();
                mv.push();
                camera_view(&mut mv);
                for i in 0..n {
                    let it = mv
                        .scoped(|s| {
                            for op in &placement {
                                op.apply(s, i as f32 * 0.01);
                            }
                            s.top().inverse_transpose()
                        })
                        .ok()
                        .flatten();
                    black_box(it);
                }
                black_box(mv.pop().ok());
            });
        });
    }

    group.finish();
}

fn benchmark_matrix_ops(c: &mut Criterion) {
    let mut group = c.benchmark_group("mat4");
    let m = Mat4::translation(Vec3::new(1.0, 2.0, 3.0))
        * Mat4::rotation(0.4, Vec3::new(1.0, 1.0, 0.0))
        * Mat4::scaling(Vec3::new(0.5, 2.0, 1.0));

    group.bench_function("multiply", |b| b.iter(|| black_box(m) * black_box(m)));
    group.bench_function("inverse", |b| b.iter(|| black_box(m).inverse()));
    group.bench_function("rotation", |b| {
        b.iter(|| Mat4::rotation(black_box(1.1), black_box(Vec3::new(0.0, 1.0, 1.0))))
    });

    group.finish();
}

criterion_group!(benches, benchmark_object_scope, benchmark_matrix_ops);
criterion_main!(benches);
