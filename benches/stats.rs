// SPDX-License-Identifier: MPL-2.0
//! Benchmarks for the per-frame work of the compare widget.
//!
//! Measures the performance of:
//! - Stats derivation from a snapshot
//! - Time formatting
//! - A paired time update (one original frame refreshing both panels)

use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;
use vid_compare::media::{HeadlessElement, HeadlessInput, MediaElement, Side};
use vid_compare::ui::compare::{compute_stats, format_time, ControllerOptions, PairController};

fn bench_compute_stats(c: &mut Criterion) {
    let mut group = c.benchmark_group("stats");

    let mut element = HeadlessElement::loaded(1920, 1080, 600.0);
    element.set_current_time(123.4);
    let snapshot = element.snapshot();

    group.bench_function("compute_stats", |b| {
        b.iter(|| black_box(compute_stats(black_box(&snapshot), "H.264/AVC")));
    });

    group.bench_function("format_time", |b| {
        b.iter(|| black_box(format_time(black_box(3599.9))));
    });

    group.finish();
}

/// One original frame: slider update plus stats refresh on both sides.
fn bench_paired_time_update(c: &mut Criterion) {
    let mut group = c.benchmark_group("pair_controller");

    let mut controller = PairController::new(ControllerOptions::default());
    controller.mount(Side::Original, HeadlessElement::new(true));
    controller.mount(Side::Compressed, HeadlessElement::new(true));
    for side in Side::ALL {
        controller.on_input(
            side,
            HeadlessInput::LoadMetadata {
                width: 1920,
                height: 1080,
                duration_secs: f64::MAX,
            },
        );
    }

    group.bench_function("frame_advance", |b| {
        b.iter(|| {
            controller.on_input(Side::Original, HeadlessInput::Advance(1.0 / 30.0));
            black_box(controller.transport());
        });
    });

    group.bench_function("seek_both", |b| {
        b.iter(|| {
            controller.seek_both(black_box(42.0));
        });
    });

    group.finish();
}

criterion_group!(benches, bench_compute_stats, bench_paired_time_update);
criterion_main!(benches);
