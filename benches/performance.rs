//! Performance benchmarks for the branch reporting engine.

use chrono::{TimeZone, Utc};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use sprig::{BranchReport, CommitTime, ReportOptions};
use std::collections::{BTreeMap, HashMap};

const NOW: i64 = 1_348_859_410;

/// Benchmark relative label computation across representative deltas
fn bench_relative_label(c: &mut Criterion) {
    let now = Utc.timestamp_opt(NOW, 0).single().unwrap();
    let mut group = c.benchmark_group("relative_label");

    for (name, delta) in [
        ("seconds", 42),
        ("hours", 3 * 3_600),
        ("days", 4 * 86_400),
        ("months", 70 * 86_400),
        ("years", 3 * 31_536_000),
    ] {
        group.bench_with_input(BenchmarkId::new("delta", name), &delta, |b, &delta| {
            b.iter(|| {
                black_box(CommitTime::from_epoch(NOW - delta, now).unwrap());
            });
        });
    }

    group.finish();
}

/// Benchmark report construction with varying branch counts
fn bench_report_build(c: &mut Criterion) {
    let now = Utc.timestamp_opt(NOW, 0).single().unwrap();
    let mut group = c.benchmark_group("report_build");

    for branch_count in [10, 100, 1000] {
        let names: Vec<String> = (0..branch_count).map(|i| format!("branch-{i}")).collect();
        let epochs: HashMap<String, i64> = names
            .iter()
            .enumerate()
            .map(|(i, n)| (n.clone(), NOW - (i as i64) * 3_600))
            .collect();
        let properties: BTreeMap<String, BTreeMap<String, String>> = names
            .iter()
            .map(|n| {
                (
                    n.clone(),
                    BTreeMap::from([("ticket".to_string(), "T-1".to_string())]),
                )
            })
            .collect();

        group.bench_with_input(
            BenchmarkId::new("branches", branch_count),
            &branch_count,
            |b, _| {
                b.iter(|| {
                    let report = BranchReport::build(
                        &names,
                        &epochs,
                        &properties,
                        now,
                        ReportOptions {
                            max_age_days: Some(30),
                            columns: vec!["ticket".to_string()],
                        },
                    )
                    .unwrap();
                    black_box(report.render("branch\tmodified"));
                });
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_relative_label, bench_report_build);
criterion_main!(benches);
