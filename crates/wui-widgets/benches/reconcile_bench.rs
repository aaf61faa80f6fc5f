//! Benchmarks for list reconciliation.
//!
//! Run with: cargo bench -p wui-widgets

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use wui_core::geometry::Size;
use wui_core::headless::{HeadlessHost, NodeId, RecordedAnimation};
use wui_core::host::AnimationOutcome;
use wui_widgets::animated_list::{AnimatedList, ListDiff};

type List = AnimatedList<NodeId, RecordedAnimation>;

fn pool(host: &mut HeadlessHost, n: usize) -> Vec<NodeId> {
    (0..n)
        .map(|i| host.create_sized("li", Size::new(100.0, 10.0 + (i % 7) as f32)))
        .collect()
}

/// Every third item dropped and a fresh tail appended.
fn churned(items: &[NodeId], fresh: &[NodeId]) -> Vec<NodeId> {
    items
        .iter()
        .enumerate()
        .filter(|(i, _)| i % 3 != 0)
        .map(|(_, n)| *n)
        .chain(fresh.iter().copied())
        .collect()
}

// ============================================================================
// Diff
// ============================================================================

fn bench_diff(c: &mut Criterion) {
    let mut group = c.benchmark_group("list/diff");

    for n in [10, 100, 1000] {
        let mut host = HeadlessHost::new();
        let prev = pool(&mut host, n);
        let fresh = pool(&mut host, n / 3);
        let next = churned(&prev, &fresh);

        group.bench_with_input(BenchmarkId::new("churn", n), &(), |b, _| {
            b.iter(|| black_box(ListDiff::compute(black_box(&prev), black_box(&next))))
        });

        let mut reversed = prev.clone();
        reversed.reverse();
        group.bench_with_input(BenchmarkId::new("reverse", n), &(), |b, _| {
            b.iter(|| black_box(ListDiff::compute(black_box(&prev), black_box(&reversed))))
        });
    }

    group.finish();
}

// ============================================================================
// Full update pass
// ============================================================================

fn bench_update_pass(c: &mut Criterion) {
    let mut group = c.benchmark_group("list/update");

    for n in [10, 100, 500] {
        group.bench_with_input(BenchmarkId::new("animated", n), &n, |b, &n| {
            let mut host = HeadlessHost::new();
            let items = pool(&mut host, n);
            let fresh = pool(&mut host, n / 3);
            let next = churned(&items, &fresh);
            let mut list = List::new(&mut host, None);

            b.iter(|| {
                list.set_items_immediate(&mut host, items.iter().copied());
                list.set_items(&mut host, next.iter().copied());
                if let Some(ticket) = host.last_ticket() {
                    list.animation_settled(&mut host, ticket, AnimationOutcome::Completed);
                }
                host.clear_journal();
                black_box(list.items_in_dom().len())
            })
        });

        group.bench_with_input(BenchmarkId::new("immediate", n), &n, |b, &n| {
            let mut host = HeadlessHost::new();
            let items = pool(&mut host, n);
            let mut list = List::new(&mut host, None);

            b.iter(|| {
                list.set_items_immediate(&mut host, items.iter().rev().copied());
                host.clear_journal();
                black_box(list.items_in_dom().len())
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_diff, bench_update_pass);
criterion_main!(benches);
