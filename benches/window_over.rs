// Copyright 2025 Stoolap Contributors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Window expression benchmarks
//!
//! Run with: cargo bench --bench window_over
//!
//! Measures the common `.over(..)` shapes on generated data:
//! - Aggregate broadcast (mean.over)
//! - Transform scatter (shift.over)
//! - List collect + flatten
//! - A batch of siblings sharing one group index, sequential vs parallel

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use overeval::{col, Column, Executor, ExecutorConfig, Expr, Table, Value};

const ROW_COUNT: usize = 100_000;

/// Generate a table with `groups` interleaved integer keys
fn setup_table(groups: usize) -> Table {
    let keys: Vec<Value> = (0..ROW_COUNT)
        .map(|i| Value::Integer(((i * 7919) % groups) as i64))
        .collect();
    let values: Vec<Value> = (0..ROW_COUNT)
        .map(|i| Value::Float((i % 1_000) as f64 * 0.5))
        .collect();
    Table::new(vec![Column::new("k", keys), Column::new("v", values)]).unwrap()
}

fn bench_single(c: &mut Criterion, name: &str, expr: Expr) {
    let mut group = c.benchmark_group(name);
    let executor = Executor::new();

    for groups in [10, 1_000, 50_000] {
        let table = setup_table(groups);
        let exprs = [expr.clone()];
        group.bench_with_input(BenchmarkId::from_parameter(groups), &table, |b, table| {
            b.iter(|| black_box(executor.select(table, &exprs).unwrap()));
        });
    }

    group.finish();
}

fn bench_aggregate(c: &mut Criterion) {
    bench_single(c, "mean.over", col("v").mean().over(["k"]));
}

fn bench_transform(c: &mut Criterion) {
    bench_single(c, "shift.over", col("v").shift(1).over(["k"]));
}

fn bench_flatten(c: &mut Criterion) {
    bench_single(
        c,
        "reverse.list.over.flatten",
        col("v").reverse().list().over(["k"]).flatten(),
    );
}

fn bench_batch(c: &mut Criterion) {
    let mut group = c.benchmark_group("sibling batch");
    let table = setup_table(1_000);
    let exprs = [
        col("v").mean().over(["k"]).alias("mean"),
        col("v").std(1).over(["k"]).alias("std"),
        col("v").shift(1).over(["k"]).alias("lag"),
        col("v").cum_sum().over(["k"]).alias("cum"),
        ((col("v") - col("v").mean().over(["k"])) / col("v").std(1).over(["k"])).alias("z"),
    ];

    let sequential = Executor::with_config(ExecutorConfig::sequential());
    group.bench_function("sequential", |b| {
        b.iter(|| black_box(sequential.select(&table, &exprs).unwrap()));
    });

    let parallel = Executor::with_config(ExecutorConfig::always_parallel());
    group.bench_function("parallel", |b| {
        b.iter(|| black_box(parallel.select(&table, &exprs).unwrap()));
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_aggregate,
    bench_transform,
    bench_flatten,
    bench_batch
);
criterion_main!(benches);
