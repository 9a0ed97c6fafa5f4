//! Benchmarks for decal clipping and picking on the default sphere

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use decalkit_core::{Point3f, Ray, Vector3f};
use decalkit_geometry::{build_decal_mesh, PlacementFrame, Raycaster, Surface};
use nalgebra::UnitQuaternion;

fn bench_clip(c: &mut Criterion) {
    let surface = Surface::sphere(15.0, 64, 64).unwrap();
    let extents = [2.0, 5.0, 10.0];

    let mut group = c.benchmark_group("decal_clip");

    for &extent in &extents {
        let frame = PlacementFrame::new(
            Point3f::new(0.0, 0.0, 15.0),
            UnitQuaternion::identity(),
            Vector3f::repeat(extent),
        )
        .unwrap();

        group.bench_with_input(
            BenchmarkId::new("sphere_64x64", format!("extent_{}", extent)),
            &frame,
            |b, frame| b.iter(|| build_decal_mesh(black_box(&surface), black_box(frame))),
        );
    }

    group.finish();
}

fn bench_raycast(c: &mut Criterion) {
    let surface = Surface::sphere(15.0, 64, 64).unwrap();
    let ray = Ray::new(Point3f::new(0.3, 0.2, 30.0), Vector3f::new(0.0, 0.0, -1.0)).unwrap();
    let caster = Raycaster::default();

    c.bench_function("raycast_sphere_64x64", |b| {
        b.iter(|| caster.intersect_surface(black_box(&ray), black_box(&surface)))
    });
}

criterion_group!(benches, bench_clip, bench_raycast);
criterion_main!(benches);
