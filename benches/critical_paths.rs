//! Criterion benchmarks for Pixel Bloom critical paths
//!
//! Benchmarks the operations that run once per frame or once per export:
//! - Color: palette entry parsing (hex and functional)
//! - Validation: turning a response document into AnimationData
//! - Renderer: frame to surface, with and without dithering
//! - Spritesheet: sheet assembly and PNG encoding

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use pixelbloom::color::parse_color;
use pixelbloom::models::{AnimationData, Frame, ResolvedPalette};
use pixelbloom::output::encode_png;
use pixelbloom::renderer::{render_frame, Dither, RenderOptions};
use pixelbloom::spritesheet::{render_spritesheet, sanitize_filename};

// =============================================================================
// Test Data Generators
// =============================================================================

fn make_palette(n: usize) -> Vec<String> {
    (0..n)
        .map(|i| format!("#{:02X}{:02X}{:02X}", (i * 16) % 256, (i * 8) % 256, 255 - (i * 16) % 256))
        .collect()
}

/// A frame cycling through every palette index, shifted by `offset`
fn make_frame(colors: usize, offset: usize) -> Frame {
    Frame::new(
        (0..16)
            .map(|y| (0..16).map(|x| ((x + y + offset) % colors) as i64).collect())
            .collect(),
    )
}

fn make_animation(frame_count: usize) -> AnimationData {
    let frames = (0..frame_count).map(|i| make_frame(16, i)).collect();
    AnimationData::from_parts(make_palette(16), frames, 100).expect("valid benchmark animation")
}

fn make_json(frame_count: usize) -> String {
    make_animation(frame_count).to_json_pretty().expect("serializable animation")
}

// =============================================================================
// Color Benchmarks
// =============================================================================

fn bench_color(c: &mut Criterion) {
    let mut group = c.benchmark_group("color");

    group.bench_function("parse_hex_6", |b| b.iter(|| parse_color(black_box("#FF8C1A"))));
    group.bench_function("parse_hex_3", |b| b.iter(|| parse_color(black_box("#F80"))));
    group.bench_function("parse_rgb", |b| b.iter(|| parse_color(black_box("rgb(255, 140, 26)"))));
    group.bench_function("parse_named", |b| b.iter(|| parse_color(black_box("orange"))));

    let palette = make_palette(16);
    group.bench_function("resolve_palette_16", |b| {
        b.iter(|| ResolvedPalette::from_colors(black_box(&palette)))
    });

    group.finish();
}

// =============================================================================
// Validation Benchmarks
// =============================================================================

fn bench_validation(c: &mut Criterion) {
    let mut group = c.benchmark_group("validation");

    for frames in [1usize, 8, 24].iter() {
        let json = make_json(*frames);
        group.throughput(Throughput::Bytes(json.len() as u64));
        group.bench_with_input(BenchmarkId::new("from_json", frames), &json, |b, json| {
            b.iter(|| AnimationData::from_json(black_box(json)))
        });
    }

    group.finish();
}

// =============================================================================
// Renderer Benchmarks
// =============================================================================

fn bench_renderer(c: &mut Criterion) {
    let mut group = c.benchmark_group("renderer");
    let palette = ResolvedPalette::from_colors(&make_palette(16));
    let frame = make_frame(16, 0);

    for pixel_size in [1u32, 8, 20].iter() {
        let size = 16 * pixel_size;
        group.throughput(Throughput::Elements(u64::from(size * size)));
        group.bench_with_input(BenchmarkId::new("render_frame", pixel_size), pixel_size, |b, &ps| {
            let options = RenderOptions::new(ps, Dither::Off);
            b.iter(|| render_frame(black_box(&frame), &palette, &options))
        });
    }

    group.bench_function("render_frame_dithered_20", |b| {
        let options = RenderOptions::new(20, Dither::Checker);
        b.iter(|| render_frame(black_box(&frame), &palette, &options))
    });

    group.finish();
}

// =============================================================================
// Spritesheet Benchmarks
// =============================================================================

fn bench_spritesheet(c: &mut Criterion) {
    let mut group = c.benchmark_group("spritesheet");

    for frames in [4usize, 12, 24].iter() {
        let animation = make_animation(*frames);
        group.throughput(Throughput::Elements(*frames as u64));
        group.bench_with_input(BenchmarkId::new("render", frames), &animation, |b, anim| {
            b.iter(|| render_spritesheet(black_box(anim)))
        });
        group.bench_with_input(BenchmarkId::new("render_and_encode", frames), &animation, |b, anim| {
            b.iter(|| encode_png(&render_spritesheet(black_box(anim))))
        });
    }

    group.bench_function("sanitize_filename", |b| {
        b.iter(|| sanitize_filename(black_box("A Campfire! @ Night, with sparks drifting up")))
    });

    group.finish();
}

criterion_group!(benches, bench_color, bench_validation, bench_renderer, bench_spritesheet);
criterion_main!(benches);
