use criterion::{black_box, criterion_group, criterion_main, Criterion};
use jlcfab::prelude::*;
use jlcfab::PcbParser;
use std::path::PathBuf;

fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// A board with `count` footprints, a third of them sharing a designator.
fn synthetic_board(count: usize) -> String {
    let mut board = String::from("(kicad_pcb (version 20221018)\n");
    for i in 0..count {
        board.push_str(&format!(
            "  (footprint \"Resistor_SMD:R_0603_1608Metric\" (layer \"F.Cu\") (at {x} {y} 90)\n\
             \x20   (property \"LCSC\" \"C{part}\")\n\
             \x20   (fp_text reference \"R{reference}\" (at 0 -1.43))\n\
             \x20   (fp_text value \"10k\" (at 0 1.43)))\n",
            x = i % 100,
            y = i / 100,
            part = 25800 + i % 7,
            reference = if i % 3 == 0 { 1 } else { i },
        ));
    }
    board.push(')');
    board
}

fn bench_convert_fixture(c: &mut Criterion) {
    let content = std::fs::read_to_string(fixture_path("sensor_board.kicad_pcb")).unwrap();
    let rotations = RotationTable::load(&fixture_path("rotations.cf")).unwrap();
    let extract = ExtractOptions::default();

    c.bench_function("convert_sensor_board", |b| {
        b.iter(|| JlcFabCore::convert_str(black_box(&content), &extract, &rotations));
    });
}

fn bench_walk_large_board(c: &mut Criterion) {
    let document = PcbParser::parse_str(&synthetic_board(120)).unwrap();
    let extract = ExtractOptions::default();

    c.bench_function("walk_120_footprints", |b| {
        b.iter(|| PcbParser::walk(black_box(&document), &extract));
    });
}

criterion_group!(benches, bench_convert_fixture, bench_walk_large_board);
criterion_main!(benches);
