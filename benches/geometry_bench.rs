use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use glam::Vec3;
use molshape::g3d::geodesic::Geodesic;
use molshape::g3d::Colix;
use molshape::model::{ideal_helix, Atom, Element, MolecularModel};
use molshape::polymer::mesh_cylinder::{create_mesh_cylinder, SegmentMads, SegmentSource};
use molshape::surface::convex::{calc_convex_bits, find_neighbors};

fn geodesic_benchmark(c: &mut Criterion) {
    c.bench_function("geodesic_build", |b| b.iter(|| black_box(Geodesic::new())));
}

fn convex_bits_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("calc_convex_bits");
    // 3x3x3 carbon lattice, center atom fully surrounded
    let atoms: Vec<Atom> = (0..27)
        .map(|i| {
            let p = Vec3::new((i % 3) as f32, ((i / 3) % 3) as f32, (i / 9) as f32) * 1.5;
            Atom::new(Element::C, "C", p)
        })
        .collect();
    let Ok(model) = MolecularModel::new(atoms, Vec::new()) else {
        return;
    };
    let center = &model.atoms()[13];
    let neighbors = find_neighbors(&model, 13, 1.2);
    for level in [1, 2, 3] {
        group.bench_function(format!("level_{level}"), |b| {
            b.iter(|| {
                black_box(calc_convex_bits(
                    center.position,
                    center.vdw_radius(),
                    1.2,
                    black_box(&neighbors),
                    level,
                ))
            });
        });
    }
    group.finish();
}

fn mesh_cylinder_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("create_mesh_cylinder");
    let points = ideal_helix(10, Vec3::ZERO);
    let mads = SegmentMads {
        beg: 500,
        mid: 600,
        end: 500,
    };
    for hermite_level in [2, 4, 8] {
        let source = SegmentSource {
            control_points: &points,
            wing_vectors: None,
            tension: 0.5,
            hermite_level,
        };
        group.bench_function(format!("hermite_{hermite_level}"), |b| {
            b.iter(|| {
                black_box(create_mesh_cylinder("bench", Colix::GOLD, &source, 4, mads, 1.0))
            });
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    geodesic_benchmark,
    convex_bits_benchmark,
    mesh_cylinder_benchmark
);
criterion_main!(benches);
