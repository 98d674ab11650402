// Copyright 2025 the Osk Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use kurbo::Rect;
use osk_benches::keyboard;

fn bench_fit(c: &mut Criterion) {
    let mut group = c.benchmark_group("fit_inside_canvas");
    for &(layers, rows, cols) in &[(1usize, 4usize, 10usize), (4, 5, 12), (8, 6, 16)] {
        let (mut tree, root) = keyboard(layers, rows, cols);
        group.throughput(Throughput::Elements(tree.len() as u64));
        group.bench_function(format!("layers{layers}_rows{rows}_cols{cols}"), |b| {
            b.iter_batched(
                || keyboard(layers, rows, cols),
                |(mut tree, root)| {
                    tree.fit_inside_canvas(root, Rect::new(0.0, 0.0, 1280.0, 400.0));
                    black_box(tree.item(root).map(|i| i.canvas_border_rect()));
                },
                BatchSize::SmallInput,
            );
        });
        // Refitting an already fitted tree at a new size, as on window resize.
        let mut width = 800.0;
        group.bench_function(format!("refit_layers{layers}_rows{rows}_cols{cols}"), |b| {
            b.iter(|| {
                width = if width > 1600.0 { 800.0 } else { width + 1.0 };
                tree.fit_inside_canvas(root, Rect::new(0.0, 0.0, width, 400.0));
                black_box(tree.item(root).map(|i| i.canvas_border_rect()));
            });
        });
    }
    group.finish();
}

fn bench_traversals(c: &mut Criterion) {
    let mut group = c.benchmark_group("traversals");
    let (tree, root) = keyboard(4, 5, 12);
    group.bench_function("layer_keys", |b| {
        b.iter(|| black_box(tree.layer_keys(root, Some("layer2")).len()));
    });
    group.bench_function("key_groups", |b| {
        b.iter(|| black_box(tree.key_groups(root).len()));
    });
    group.bench_function("visible_items", |b| {
        b.iter(|| black_box(tree.visible_items(root).count()));
    });
    group.finish();
}

criterion_group!(benches, bench_fit, bench_traversals);
criterion_main!(benches);
