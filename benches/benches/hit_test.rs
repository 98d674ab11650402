// Copyright 2025 the Osk Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use kurbo::Rect;
use osk_benches::{keyboard, pointer_positions};
use osk_layout::LayoutRoot;

fn fitted_layout(layers: usize) -> LayoutRoot {
    let (tree, root) = keyboard(layers, 5, 12);
    let mut layout = LayoutRoot::new(tree, root).unwrap();
    layout.set_visible_layers(&["layer0"]);
    layout.fit_inside_canvas(Rect::new(0.0, 0.0, 1280.0, 400.0));
    layout
}

fn bench_key_at(c: &mut Criterion) {
    let mut group = c.benchmark_group("key_at");
    let points = pointer_positions(1024, 1280.0, 400.0);

    for &layers in &[1usize, 4] {
        // Hit rects stay cached; each query is a fresh point.
        let mut layout = fitted_layout(layers);
        let mut i = 0;
        group.bench_function(format!("cached_layers{layers}"), |b| {
            b.iter(|| {
                i = (i + 1) % points.len();
                black_box(layout.key_at(points[i], Some("layer0")))
            });
        });

        // Rebuild the hit rects before every query, as after each refit.
        let mut layout = fitted_layout(layers);
        let mut i = 0;
        group.bench_function(format!("uncached_layers{layers}"), |b| {
            b.iter(|| {
                i = (i + 1) % points.len();
                layout.invalidate_geometry_caches();
                black_box(layout.key_at(points[i], Some("layer0")))
            });
        });
    }

    // The pointer did not move: answered by the memo.
    let mut layout = fitted_layout(4);
    let p = points[0];
    group.bench_function("repeated_point", |b| {
        b.iter(|| black_box(layout.key_at(p, Some("layer0"))));
    });
    group.finish();
}

criterion_group!(benches, bench_key_at);
criterion_main!(benches);
