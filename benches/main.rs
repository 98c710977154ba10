// Released under MIT License.
// Copyright (c) 2023-2025 Ladislav Bartos

use std::path::Path;

use criterion::{criterion_group, criterion_main, Criterion};
use matstudio_rs::prelude::*;

fn benchmark(c: &mut Criterion) {
    let working_dir = Path::new("/calc");

    c.bench_function("Structure::from_file", |b| {
        b.iter(|| {
            std::hint::black_box(
                Structure::from_file("test_files/example.xsd", working_dir).unwrap(),
            );
        })
    });

    let mut structure = Structure::from_file("test_files/example.xsd", working_dir).unwrap();

    c.bench_function("Structure::update (unchanged)", |b| {
        b.iter(|| {
            structure.update(working_dir).unwrap();
        })
    });

    c.bench_function("Structure::update (modified)", |b| {
        let mut flags = FreezeFlags::FIXED;
        b.iter(|| {
            flags = if flags.is_fixed() {
                FreezeFlags::FREE
            } else {
                FreezeFlags::FIXED
            };
            structure.set_species_freeze_flags("Pt", flags).unwrap();
            structure.update(working_dir).unwrap();
        })
    });

    c.bench_function("XmlDocument::to_string_lossy", |b| {
        b.iter(|| {
            std::hint::black_box(structure.document().to_string_lossy());
        })
    });

    let reader = ArcReader::new("test_files/example.arc").unwrap();

    c.bench_function("ArcReader::frames", |b| {
        b.iter(|| {
            std::hint::black_box(
                reader
                    .frames()
                    .unwrap()
                    .map(|frame| frame.unwrap().sum())
                    .sum::<f64>(),
            );
        })
    });

    let lattice = structure.lattice().unwrap().clone();
    let coordinates = structure.coordinates().clone();

    c.bench_function("Lattice::cart2dir", |b| {
        b.iter(|| {
            std::hint::black_box(lattice.cart2dir(coordinates.view()).unwrap());
        })
    });
}

criterion_group!(benches, benchmark);
criterion_main!(benches);
