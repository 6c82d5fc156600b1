//! Performance benchmarks for Ridge
//!
//! Stacking, cycling and hit-testing run on every click, key binding and
//! pointer motion, so they are measured against growing view counts.

use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use ridge::view::{ClientId, Geometry, ViewKind};
use ridge::{Desktop, Direction, RidgeConfig, ViewId};

const VIEW_COUNTS: [usize; 4] = [10, 50, 100, 500];

/// Desktop with `count` mapped views in a cascade; every fourth view is a
/// legacy transient of the one before it
fn populated_desktop(count: usize) -> (Desktop, Vec<ViewId>) {
    let mut desktop = Desktop::new(RidgeConfig::default());
    desktop.add_output("DP-1", Geometry::new(0, 0, 1920, 1080));

    let mut ids = Vec::with_capacity(count);
    for i in 0..count {
        let kind = if i % 4 == 3 {
            ViewKind::CompatLegacy {
                parent: ids.last().copied(),
            }
        } else {
            ViewKind::Native
        };
        let offset = (i % 40) as i32 * 20;
        let id = desktop.add_view(kind, "bench", Geometry::new(offset, offset, 640, 480));
        desktop.attach_surface(id, ClientId(1));
        desktop.map_view(id);
        ids.push(id);
    }
    (desktop, ids)
}

/// Benchmark raising views, alone and with their transient group
fn bench_raise(c: &mut Criterion) {
    let mut group = c.benchmark_group("raise");

    for &count in VIEW_COUNTS.iter() {
        group.bench_with_input(format!("raise_back_{}_views", count), &count, |b, &count| {
            b.iter_batched(
                || populated_desktop(count),
                |(mut desktop, _)| {
                    for _ in 0..10 {
                        let back = desktop.stack().last().copied();
                        desktop.raise(black_box(back));
                    }
                },
                BatchSize::SmallInput,
            );
        });

        group.bench_with_input(format!("raise_group_{}_views", count), &count, |b, &count| {
            b.iter_batched(
                || populated_desktop(count),
                |(mut desktop, ids)| {
                    for id in ids.iter().step_by(4).take(10) {
                        desktop.raise_with_group(black_box(Some(*id)));
                    }
                },
                BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

/// Benchmark focus changes, which also swap decoration looks
fn bench_focus(c: &mut Criterion) {
    let mut group = c.benchmark_group("focus");

    for &count in VIEW_COUNTS.iter() {
        group.bench_with_input(format!("focus_and_raise_{}_views", count), &count, |b, &count| {
            b.iter_batched(
                || populated_desktop(count),
                |(mut desktop, ids)| {
                    for id in ids.iter().rev().take(10) {
                        black_box(desktop.focus_and_raise(Some(*id)));
                    }
                },
                BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

/// Benchmark window cycling in both directions
fn bench_cycle(c: &mut Criterion) {
    let mut group = c.benchmark_group("cycle");

    for &count in VIEW_COUNTS.iter() {
        group.bench_with_input(format!("cycle_{}_views", count), &count, |b, &count| {
            b.iter_batched(
                || populated_desktop(count),
                |(mut desktop, _)| {
                    let mut current = desktop.focused_view();
                    for direction in [Direction::Forward, Direction::Backward] {
                        for _ in 0..10 {
                            current = desktop.cycle(current, direction);
                        }
                    }
                    black_box(current)
                },
                BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

/// Benchmark point queries over content, decorations and empty space
fn bench_hit_test(c: &mut Criterion) {
    let mut group = c.benchmark_group("hit_test");
    let points = [(300.0, 300.0), (30.0, 8.0), (1900.0, 1070.0), (795.0, 600.0)];

    for &count in VIEW_COUNTS.iter() {
        let (desktop, _) = populated_desktop(count);
        group.bench_function(format!("node_and_view_at_{}_views", count), |b| {
            b.iter(|| {
                for &(x, y) in points.iter() {
                    black_box(desktop.node_and_view_at(black_box(x), black_box(y)));
                }
            });
        });
    }

    group.finish();
}

/// Benchmark configuration parsing and serialization
fn bench_configuration(c: &mut Criterion) {
    let config = RidgeConfig::default();
    let serialized = toml::to_string(&config).unwrap();

    c.bench_function("config_serialize", |b| {
        b.iter(|| black_box(toml::to_string(black_box(&config)).unwrap()));
    });

    c.bench_function("config_deserialize", |b| {
        b.iter(|| black_box(toml::from_str::<RidgeConfig>(black_box(&serialized)).unwrap()));
    });
}

criterion_group!(
    benches,
    bench_raise,
    bench_focus,
    bench_cycle,
    bench_hit_test,
    bench_configuration
);

criterion_main!(benches);
