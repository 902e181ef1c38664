//! Benchmarks for the tilebake pipeline.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use tilebake::annotate::annotate;
use tilebake::index::{index_layer, DedupTable};
use tilebake::mount::detect_mount_points;
use tilebake::render::render_table;
use tilebake::types::{Colour, Layer, PixelBuffer, PixelFormat, World, TILE_SIZE};

const COLS: usize = 120;
const ROWS: usize = 68;

/// Art layer with a repeating pattern of 16 distinct tiles and blank gaps.
fn art_buffer() -> PixelBuffer {
    let mut buffer =
        PixelBuffer::transparent(COLS * TILE_SIZE, ROWS * TILE_SIZE, PixelFormat::GrayAlpha);
    for row in 0..ROWS {
        for col in 0..COLS {
            if (col + row) % 5 == 0 {
                continue;
            }
            let shade = ((col * 7 + row * 3) % 16) as u8 * 16;
            buffer.fill_tile(col, row, &[shade, 255]);
        }
    }
    buffer
}

/// Metadata layer: a floor, scattered squares and a few tags.
fn metadata_buffer() -> PixelBuffer {
    let mut buffer =
        PixelBuffer::transparent(COLS * TILE_SIZE, ROWS * TILE_SIZE, PixelFormat::Rgba);
    for col in 0..COLS {
        buffer.fill_tile(col, ROWS - 1, &Colour::BLACK.to_rgba());
    }
    for row in (4..ROWS - 4).step_by(6) {
        for col in (4..COLS - 4).step_by(9) {
            buffer.fill_tile(col, row, &Colour::BLACK.to_rgba());
            let (x, y) = ((col + 1) * TILE_SIZE + 16, row * TILE_SIZE + 16);
            buffer.put_pixel(x, y, &Colour::YELLOW.to_rgba());
        }
    }
    buffer
}

fn bench_indexing(c: &mut Criterion) {
    let mut group = c.benchmark_group("indexing");
    let art = art_buffer();

    group.bench_function("index_layer", |b| {
        b.iter(|| {
            let mut table = DedupTable::new();
            index_layer(black_box(&art), &mut table)
        })
    });

    // Second pass over a warm table: every tile is a lookup hit
    let mut warm = DedupTable::new();
    index_layer(&art, &mut warm);
    group.bench_function("index_layer_warm", |b| {
        b.iter(|| index_layer(black_box(&art), &mut warm))
    });

    group.finish();
}

fn bench_annotation(c: &mut Criterion) {
    let mut group = c.benchmark_group("annotation");
    let meta = metadata_buffer();

    group.bench_function("annotate", |b| b.iter(|| annotate(black_box(&meta))));

    let layer = annotate(&meta);
    group.bench_function("detect_mount_points", |b| {
        b.iter(|| {
            let mut grid = layer.grid.clone();
            detect_mount_points(black_box(&mut grid));
            grid
        })
    });

    group.finish();
}

fn bench_serialization(c: &mut Criterion) {
    let mut group = c.benchmark_group("serialization");

    let mut table = DedupTable::new();
    let mut world = World::new();
    world.insert("bg", Layer::Art(index_layer(&art_buffer(), &mut table)));
    world.insert("metadata", Layer::Metadata(annotate(&metadata_buffer())));

    group.bench_function("render_table", |b| {
        b.iter(|| render_table(black_box(&world), table.len(), "world"))
    });

    group.finish();
}

criterion_group!(benches, bench_indexing, bench_annotation, bench_serialization);
criterion_main!(benches);
