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

//! Window Cache and Parallelism Tests
//!
//! Tests that sibling window expressions in one batch share a group index,
//! and that parallel evaluation returns exactly what sequential evaluation does.

use overeval::{col, Column, Executor, ExecutorConfig, Expr, RankMethod, Table, Value};
use tracing_subscriber::EnvFilter;

/// Route engine logs to the test output, filtered by RUST_LOG
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Many groups with interleaved rows
fn generate_table(rows: usize, groups: usize) -> Table {
    let keys: Vec<Value> = (0..rows)
        .map(|i| Value::Integer(((i * 7919) % groups) as i64))
        .collect();
    let values: Vec<Value> = (0..rows)
        .map(|i| Value::Float(((i * 31) % 97) as f64 / 4.0))
        .collect();
    Table::new(vec![Column::new("k", keys), Column::new("v", values)])
        .expect("Failed to create table")
}

fn batch() -> Vec<Expr> {
    vec![
        col("v").mean().over(["k"]).alias("mean"),
        col("v").std(1).over(["k"]).alias("std"),
        col("v").shift(1).over(["k"]).alias("lag"),
        col("v").reverse().over(["k"]).alias("rev"),
        col("v").cum_sum().over(["k"]).alias("cum"),
        col("v").rank(RankMethod::Dense).over(["k"]).alias("rank"),
        col("v").list().over(["k"]).flatten().alias("flat"),
        (col("v") - col("v").mean().over(["k"])).alias("centered"),
    ]
}

/// Every window over the same key uses one group index
#[test]
fn test_group_index_built_once() {
    init_tracing();
    let table = generate_table(200, 13);
    let exprs = batch();
    let output = Executor::new()
        .evaluate_batch(&table, &exprs)
        .expect("Failed to evaluate");

    assert_eq!(output.stats.group_misses, 1, "Group index should be built once");
    assert_eq!(
        output.stats.group_hits,
        exprs.len() as u64 - 1,
        "Every other window should hit the cache"
    );
    assert_eq!(output.stats.key_sets, vec![vec!["k".to_string()]]);
}

/// Identical inner expressions are evaluated once per batch
#[test]
fn test_window_results_shared() {
    let table = generate_table(50, 5);
    let output = Executor::new()
        .evaluate_batch(
            &table,
            &[
                col("v").list().over(["k"]).alias("list"),
                col("v").list().over(["k"]).flatten().alias("flat"),
                col("v").mean().over(["k"]).alias("m1"),
                col("v").mean().over(["k"]).alias("m2"),
            ],
        )
        .unwrap();

    assert_eq!(output.stats.result_misses, 2);
    assert_eq!(output.stats.result_hits, 2);
    assert_eq!(output.stats.cached_results, 2);
    assert_eq!(output.columns[2].values(), output.columns[3].values());
}

/// Different key sets get their own group index
#[test]
fn test_distinct_key_sets() {
    let table = Table::new(vec![
        Column::from_iter("a", [1, 1, 2, 2]),
        Column::from_iter("b", [1, 2, 1, 2]),
        Column::from_iter("v", [1, 2, 3, 4]),
    ])
    .unwrap();

    let output = Executor::new()
        .evaluate_batch(
            &table,
            &[
                col("v").sum().over(["a"]).alias("by_a"),
                col("v").sum().over(["b"]).alias("by_b"),
                col("v").sum().over(["a", "b"]).alias("by_ab"),
                col("v").max().over(["a"]).alias("max_a"),
            ],
        )
        .unwrap();

    assert_eq!(output.stats.group_misses, 3);
    assert_eq!(output.stats.group_hits, 1);
    assert_eq!(
        output.columns[1].values(),
        &[
            Value::Integer(4),
            Value::Integer(6),
            Value::Integer(4),
            Value::Integer(6)
        ]
    );
}

/// Each batch starts with an empty cache
#[test]
fn test_cache_scoped_to_batch() {
    let table = generate_table(20, 3);
    let executor = Executor::new();
    for _ in 0..3 {
        let output = executor
            .evaluate_batch(&table, &[col("v").sum().over(["k"])])
            .unwrap();
        assert_eq!(output.stats.group_misses, 1);
        assert_eq!(output.stats.group_hits, 0);
    }
}

/// Parallel and sequential evaluation agree row for row
#[test]
fn test_parallel_matches_sequential() {
    init_tracing();
    let table = generate_table(5_000, 97);
    let exprs = batch();

    let sequential = Executor::with_config(ExecutorConfig::sequential())
        .select(&table, &exprs)
        .expect("Sequential evaluation failed");
    let parallel = Executor::with_config(ExecutorConfig::always_parallel())
        .select(&table, &exprs)
        .expect("Parallel evaluation failed");
    let parallel_groups_only =
        Executor::with_config(ExecutorConfig::always_parallel().with_parallel_batch(false))
            .select(&table, &exprs)
            .expect("Parallel group evaluation failed");

    for expected in sequential.columns() {
        for other in [&parallel, &parallel_groups_only] {
            let got = other.column(expected.name()).unwrap();
            // NaN-free data, so plain equality is exact
            assert_eq!(
                got.values(),
                expected.values(),
                "Column {} differs between parallel and sequential",
                expected.name()
            );
        }
    }
}

/// Parallel batch still counts one group index build
#[test]
fn test_parallel_single_flight() {
    let table = generate_table(2_000, 50);
    let exprs = batch();
    let output = Executor::with_config(ExecutorConfig::always_parallel())
        .evaluate_batch(&table, &exprs)
        .unwrap();
    assert_eq!(output.stats.group_misses, 1);
    assert_eq!(output.stats.group_hits, exprs.len() as u64 - 1);
}

/// Default thresholds keep small inputs sequential
#[test]
fn test_config_thresholds() {
    let config = ExecutorConfig::default();
    assert!(!config.should_parallel_groups(2, 10));
    assert!(!ExecutorConfig::sequential().should_parallel_groups(10_000, 1_000_000));
    assert!(!ExecutorConfig::sequential().should_parallel_batch(100));

    let custom = ExecutorConfig::default().with_min_groups(2).with_min_rows(4);
    assert_eq!(custom.min_groups_for_parallel, 2);
    assert_eq!(custom.min_rows_for_parallel, 4);
}
