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

//! Window Aggregate Tests
//!
//! Tests aggregates broadcast over groups: MEAN, STD, VAR, QUANTILE, COUNT, etc.

use overeval::{col, Column, DataType, Error, Executor, Expr, QuantileInterpolation, Table, Value};

fn groups_table(values: Column) -> Table {
    Table::new(vec![
        Column::from_iter("groups", ["a", "a", "b", "b"]),
        values,
    ])
    .expect("Failed to create table")
}

fn float_values() -> Table {
    groups_table(Column::from_iter("values", [1.0, 2.0, 3.0, 4.0]))
}

fn int_values() -> Table {
    groups_table(Column::from_iter("values", [1, 2, 3, 4]))
}

fn select_one(table: &Table, expr: Expr) -> Vec<Value> {
    let out = Executor::new()
        .select(table, &[expr])
        .expect("Failed to evaluate");
    out.columns()[0].values().to_vec()
}

fn as_f64(value: &Value) -> f64 {
    value
        .as_float64()
        .unwrap_or_else(|| panic!("Expected a numeric value, got {:?}", value))
}

/// Test std/var/mean over a 2-element group {1, 2}
#[test]
fn test_std_var_mean_over_groups() {
    for table in [float_values(), int_values()] {
        let std = select_one(&table, col("values").std(1).over(["groups"]));
        assert!(
            (as_f64(&std[0]) - 0.7071067690849304).abs() < 1e-6,
            "Expected std ~0.70710677, got {}",
            std[0]
        );

        let var = select_one(&table, col("values").var(1).over(["groups"]));
        assert!(
            (as_f64(&var[0]) - 0.5).abs() < 1e-12,
            "Expected var 0.5, got {}",
            var[0]
        );

        let mean = select_one(&table, col("values").mean().over(["groups"]));
        assert_eq!(mean[0], Value::Float(1.5));
        assert_eq!(mean[3], Value::Float(3.5));
    }
}

/// Every row of a group receives the same scalar
#[test]
fn test_aggregate_is_broadcast() {
    let table = Table::new(vec![
        Column::from_iter("k", ["x", "y", "x", "z", "y", "x"]),
        Column::from_iter("v", [1, 10, 2, 100, 20, 3]),
    ])
    .unwrap();

    let sums = select_one(&table, col("v").sum().over(["k"]));
    assert_eq!(sums.len(), table.height());
    let expected = [6, 30, 6, 100, 30, 6];
    for (row, (got, want)) in sums.iter().zip(expected).enumerate() {
        assert_eq!(got, &Value::Integer(want), "row {}", row);
    }
}

/// var == std^2 for every group
#[test]
fn test_var_is_std_squared() {
    let table = Table::new(vec![
        Column::from_iter("g", [1, 2, 1, 2, 1, 2, 1]),
        Column::from_iter("v", [2.5, 1.0, 7.25, -3.0, 4.0, 8.5, 0.125]),
    ])
    .unwrap();

    let out = Executor::new()
        .select(
            &table,
            &[
                col("v").std(1).over(["g"]).alias("std"),
                col("v").var(1).over(["g"]).alias("var"),
            ],
        )
        .unwrap();

    let std = out.column("std").unwrap().values();
    let var = out.column("var").unwrap().values();
    for row in 0..table.height() {
        let s = as_f64(&std[row]);
        let v = as_f64(&var[row]);
        assert!((s * s - v).abs() < 1e-9, "row {}: std^2 {} != var {}", row, s * s, v);
    }
}

/// Single-row groups yield NULL for std/var instead of a number
#[test]
fn test_single_row_group_is_null() {
    let table = Table::new(vec![
        Column::from_iter("g", ["a", "b", "b"]),
        Column::from_iter("v", [1.0, 2.0, 4.0]),
    ])
    .unwrap();

    let std = select_one(&table, col("v").std(1).over(["g"]));
    assert!(std[0].is_null(), "Expected NULL for single row group, got {}", std[0]);
    assert!((as_f64(&std[1]) - 2f64.sqrt()).abs() < 1e-12);

    let var = select_one(&table, col("v").var(1).over(["g"]));
    assert!(var[0].is_null());

    // Population variance is defined for one row
    let var0 = select_one(&table, col("v").var(0).over(["g"]));
    assert_eq!(var0[0], Value::Float(0.0));
}

/// Standardizing two identical columns gives identical results
#[test]
fn test_standardize_identical_columns() {
    let mut cat = Vec::new();
    let mut val = Vec::new();
    for c in 0..2i64 {
        for offset in 0..2i64 {
            cat.push(c);
            val.push(c + offset);
        }
    }
    let table = Table::new(vec![
        Column::from_iter("cat", cat),
        Column::from_iter("val1", val.clone()),
        Column::from_iter("val2", val),
    ])
    .unwrap();

    let standardize = |value: &str| {
        (col(value) - col(value).mean().over(["cat"])) / col(value).std(1).over(["cat"])
    };

    let out = Executor::new()
        .with_columns(
            &table,
            &[
                standardize("val1").alias("out1"),
                standardize("val2").alias("out2"),
            ],
        )
        .unwrap();

    assert_eq!(out.column_names(), vec!["cat", "val1", "val2", "out1", "out2"]);
    assert_eq!(
        out.column("out1").unwrap().values(),
        out.column("out2").unwrap().values()
    );
    let out1 = out.column("out1").unwrap().values();
    assert!((as_f64(&out1[0]) + 0.5f64.sqrt()).abs() < 1e-12);
    assert!((as_f64(&out1[1]) - 0.5f64.sqrt()).abs() < 1e-12);
}

/// quantile(0.9) per group
#[test]
fn test_quantile_as_window() {
    let table = Table::new(vec![
        Column::from_iter("group", [0, 0, 1, 1]),
        Column::from_iter("value", [0, 1, 0, 2]),
    ])
    .unwrap();

    let out = Executor::new()
        .select(&table, &[col("value").quantile(0.9).over(["group"])])
        .unwrap();
    let column = &out.columns()[0];
    assert_eq!(column.name(), "value");
    assert_eq!(
        column.values(),
        &[
            Value::Float(1.0),
            Value::Float(1.0),
            Value::Float(2.0),
            Value::Float(2.0)
        ]
    );

    let linear = select_one(
        &table,
        col("value").quantile_with(0.9, QuantileInterpolation::Linear).over(["group"]),
    );
    assert!((as_f64(&linear[0]) - 0.9).abs() < 1e-12);
    assert!((as_f64(&linear[2]) - 1.8).abs() < 1e-12);
}

/// Quantiles outside [0, 1] fail instead of being clamped
#[test]
fn test_quantile_out_of_range() {
    let table = float_values();
    for p in [-0.1, 1.5, f64::NAN] {
        let err = Executor::new()
            .select(&table, &[col("values").quantile(p).over(["groups"])])
            .expect_err("Expected InvalidQuantile");
        assert!(
            matches!(err.root_cause(), Error::InvalidQuantile(_)),
            "Expected InvalidQuantile for {}, got {:?}",
            p,
            err
        );
    }
}

/// Invalid options fail the window even when there are no groups
#[test]
fn test_invalid_quantile_on_empty_table() {
    let table = Table::new(vec![
        Column::new("groups", Vec::<Value>::new()),
        Column::new("values", Vec::<Value>::new()),
    ])
    .unwrap();

    let err = Executor::new()
        .select(&table, &[col("values").quantile(1.5).over(["groups"])])
        .expect_err("Expected InvalidQuantile on an empty table");
    assert_eq!(err.root_cause(), &Error::InvalidQuantile(1.5));

    let ok = Executor::new()
        .select(&table, &[col("values").quantile(0.5).over(["groups"])])
        .expect("Valid quantile on an empty table");
    assert_eq!(ok.height(), 0);
}

/// std on text is a type error naming the expression
#[test]
fn test_type_mismatch() {
    let table = Table::new(vec![
        Column::from_iter("g", ["a", "a"]),
        Column::from_iter("s", ["x", "y"]),
    ])
    .unwrap();

    let expr = col("s").std(1).over(["g"]);
    let err = Executor::new().select(&table, &[expr.clone()]).unwrap_err();
    assert!(err.is_type_error(), "Expected type error, got {:?}", err);
    assert!(
        err.to_string().contains(&expr.to_string()),
        "Error should name the expression: {}",
        err
    );
}

/// Count, n_unique, first, last, min, max and median
#[test]
fn test_other_aggregates() {
    let table = Table::new(vec![
        Column::from_iter("g", ["a", "b", "a", "a", "b"]),
        Column::new(
            "v",
            vec![
                Value::Integer(3),
                Value::Integer(7),
                Value::null(DataType::Integer),
                Value::Integer(3),
                Value::Integer(9),
            ],
        ),
    ])
    .unwrap();

    let count = select_one(&table, col("v").count().over(["g"]));
    assert_eq!(count[0], Value::Integer(2));
    assert_eq!(count[1], Value::Integer(2));

    let n_unique = select_one(&table, col("v").n_unique().over(["g"]));
    assert_eq!(n_unique[0], Value::Integer(2), "NULL counts as a distinct value");

    let first = select_one(&table, col("v").first().over(["g"]));
    assert_eq!(first, vec![Value::Integer(3), Value::Integer(7), Value::Integer(3), Value::Integer(3), Value::Integer(7)]);

    let last = select_one(&table, col("v").last().over(["g"]));
    assert_eq!(last[1], Value::Integer(9));
    assert_eq!(last[0], Value::Integer(3));

    let min = select_one(&table, col("v").min().over(["g"]));
    let max = select_one(&table, col("v").max().over(["g"]));
    assert_eq!(min[4], Value::Integer(7));
    assert_eq!(max[4], Value::Integer(9));

    let median = select_one(&table, col("v").median().over(["g"]));
    assert_eq!(median[0], Value::Float(3.0));
    assert_eq!(median[1], Value::Float(8.0));
}

/// Partition by more than one column
#[test]
fn test_multi_key_partition() {
    let table = Table::new(vec![
        Column::from_iter("a", [1, 1, 1, 2]),
        Column::from_iter("b", ["x", "y", "x", "x"]),
        Column::from_iter("v", [1, 2, 3, 4]),
    ])
    .unwrap();

    let sums = select_one(&table, col("v").sum().over(["a", "b"]));
    assert_eq!(
        sums,
        vec![
            Value::Integer(4),
            Value::Integer(2),
            Value::Integer(4),
            Value::Integer(4)
        ]
    );
}

/// NaN values participate in aggregates as data
#[test]
fn test_nan_flows_through_mean() {
    let table = Table::new(vec![
        Column::from_iter("g", ["a", "a", "b"]),
        Column::from_iter("v", [1.0, f64::NAN, 2.0]),
    ])
    .unwrap();

    let mean = select_one(&table, col("v").mean().over(["g"]));
    assert!(mean[0].is_nan());
    assert!(mean[1].is_nan());
    assert_eq!(mean[2], Value::Float(2.0));
}
