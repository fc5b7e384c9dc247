//! Benchmarks for the kinnow pipeline.

use std::fs;
use std::path::PathBuf;

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use kinnow::parser::{parse_header, tokenize, ParserConfig};
use kinnow::registry::ModuleTreeBuilder;
use kinnow::render::{HeaderRenderer, ImplementationRenderer, JsonRenderer, Renderer};
use kinnow::validation::validate_tree;

fn load_fixture(name: &str) -> String {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name);
    fs::read_to_string(path).unwrap()
}

/// The fixture repeated with renamed declarations, to get a header of
/// realistic engine size.
fn large_header(source: &str, copies: usize) -> String {
    (0..copies)
        .map(|i| {
            source
                .replace("Health", &format!("Health{}", i))
                .replace("Armor", &format!("Armor{}", i))
                .replace("Sprite", &format!("Sprite{}", i))
                .replace("Damage", &format!("Damage{}", i))
                .replace("DAMAGE_", &format!("DAMAGE{}_", i))
                .replace("SPRITE_", &format!("SPRITE{}_", i))
        })
        .collect::<Vec<_>>()
        .join("\n")
}

// -- Parsing benchmarks --

fn bench_parsing(c: &mut Criterion) {
    let mut group = c.benchmark_group("parsing");
    let config = ParserConfig::default();

    let source = load_fixture("components.h");
    let large = large_header(&source, 50);

    group.bench_function("tokenize_fixture", |b| {
        b.iter(|| tokenize(black_box(&source)).len())
    });

    group.bench_function("parse_fixture", |b| {
        b.iter(|| parse_header(black_box(&source), &config).unwrap())
    });

    group.bench_function("parse_large", |b| {
        b.iter(|| parse_header(black_box(&large), &config).unwrap())
    });

    group.finish();
}

// -- Rendering benchmarks --

fn bench_rendering(c: &mut Criterion) {
    let mut group = c.benchmark_group("rendering");

    let source = large_header(&load_fixture("components.h"), 50);
    let header = parse_header(&source, &ParserConfig::default()).unwrap();
    let mut builder = ModuleTreeBuilder::new();
    builder.add_header(std::path::Path::new("components.h"), header);
    let (tree, _) = builder.build();

    group.bench_function("validate", |b| b.iter(|| validate_tree(black_box(&tree))));

    group.bench_function("render_json", |b| {
        b.iter(|| JsonRenderer.render(black_box(&tree)).unwrap())
    });

    group.bench_function("render_header", |b| {
        b.iter(|| HeaderRenderer.render(black_box(&tree)).unwrap())
    });

    let implementation = ImplementationRenderer::for_stem("KinnowComponentGen");
    group.bench_function("render_impl", |b| {
        b.iter(|| implementation.render(black_box(&tree)).unwrap())
    });

    group.finish();
}

criterion_group!(benches, bench_parsing, bench_rendering);
criterion_main!(benches);
