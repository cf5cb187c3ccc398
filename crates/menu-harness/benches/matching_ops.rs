//! Matching Operations Benchmarks
//!
//! Benchmarks for matching mock menus of growing size and rendering
//! failure reports.
//!
//! Run with: `cargo bench --bench matching_ops`

#![allow(missing_docs)]
#![allow(clippy::unwrap_used)]

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use menu_harness::prelude::*;

const BUS: &str = "org.bench";

fn bench_bus(rows: usize) -> MockBus {
    let bus = MockBus::new();
    let group = MockActionGroup::new();
    let items = (0..rows)
        .map(|i| {
            group.insert(&format!("toggle{i}"), Some(Variant::Bool(i % 2 == 0)));
            MockItem::new()
                .action(&format!("bench.toggle{i}"))
                .label(&format!("Toggle {i}"))
        })
        .collect();
    bus.export_menu(
        BUS,
        "/menu",
        MockMenu::new(vec![MockItem::new().section(items)]),
    );
    bus.export_action_group(BUS, "/actions", group);
    bus
}

fn expectation(rows: usize) -> MenuItemMatcher {
    (0..rows).fold(MenuItemMatcher::new().section(), |m, i| {
        m.item(
            MenuItemMatcher::checkbox()
                .action(&format!("bench.toggle{i}"))
                .label(&format!("Toggle {i}"))
                .toggled(i % 2 == 0),
        )
    })
}

fn bench_match_menu(c: &mut Criterion) {
    let mut group = c.benchmark_group("match_menu");
    let options = MatchOptions::new().with_item_wait(0).with_settle(0);

    for rows in [1, 10, 100, 500] {
        let bus = bench_bus(rows);
        let matcher = MenuMatcher::new(Parameters::new(BUS, [("bench", "/actions")], "/menu"), &bus)
            .with_options(options)
            .item(expectation(rows));
        group.bench_with_input(BenchmarkId::from_parameter(rows), &matcher, |bench, m| {
            bench.iter(|| {
                let result = m.match_menu();
                black_box(result.success());
            });
        });
    }

    group.finish();
}

fn bench_concat_failures(c: &mut Criterion) {
    let mut group = c.benchmark_group("concat_failures");

    for count in [10, 100, 1000] {
        let mut result = MatchResult::new();
        for i in 0..count {
            let location: Location = [i % 7, i % 3, i].into_iter().collect();
            result.failure(&location, format!("Expected label 'a{i}', but found 'b{i}'"));
        }
        group.bench_with_input(BenchmarkId::from_parameter(count), &result, |bench, r| {
            bench.iter(|| black_box(r.concat_failures()));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_match_menu, bench_concat_failures);
criterion_main!(benches);
