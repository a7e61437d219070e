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

//! Window Executor
//!
//! This module evaluates batches of column expressions against a [`Table`].
//!
//! # Architecture
//!
//! ```text
//! Executor::select / with_columns
//!   ↓  one BatchCache per call
//! expression tree walk (arithmetic around windows)
//!   ↓
//! WindowEvaluator ── BatchCache::group_index ── GroupIndex::build
//!   ↓  per group, in first-occurrence order (rayon above thresholds)
//! ExpressionEval (DefaultEvaluator) ── aggregate / transform kernels
//!   ↓
//! scatter / broadcast / flatten back to original row order
//! ```
//!
//! # Components
//!
//! - [`Executor`] - Entry point, owns configuration and the expression evaluator
//! - [`BatchCache`] - Single-flight per-batch cache of group indexes and window results
//! - [`GroupIndex`] - First-occurrence grouping of rows by partition keys
//! - [`WindowEvaluator`] - Per-group evaluation of window expressions
//! - [`DefaultEvaluator`] - Built-in non-windowed expression evaluator

pub mod cache;
pub mod config;
pub mod evaluator;
pub mod group_index;
pub mod scatter;
pub mod window;

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use std::sync::Arc;

use crate::core::{Column, Result, Table, Value};
use crate::expr::Expr;

pub use cache::{BatchCache, CacheStats};
pub use config::{ExecutorConfig, DEFAULT_MIN_GROUPS_FOR_PARALLEL, DEFAULT_MIN_ROWS_FOR_PARALLEL};
pub use evaluator::{DefaultEvaluator, Evaluated, ExpressionEval, Frame};
pub use group_index::{GroupIndex, PartitionKey};
pub use window::{GroupResult, GroupResults, WindowEvaluator, WindowKind};

/// Columns produced by one batch together with its cache statistics
#[derive(Debug, Clone)]
pub struct BatchOutput {
    /// One column per input expression, in input order
    pub columns: Vec<Column>,
    /// Cache statistics of the batch
    pub stats: CacheStats,
}

/// Expression batch executor
///
/// Every call to [`select`](Executor::select) or
/// [`with_columns`](Executor::with_columns) is one batch: window expressions
/// over the same partition keys inside it share one group index.
#[derive(Clone)]
pub struct Executor {
    /// Evaluation settings
    config: ExecutorConfig,
    /// Evaluator for non-windowed expressions
    evaluator: Arc<dyn ExpressionEval>,
}

impl Default for Executor {
    fn default() -> Self {
        Self::new()
    }
}

impl Executor {
    /// Create an executor with the default configuration
    pub fn new() -> Self {
        Self::with_config(ExecutorConfig::default())
    }

    /// Create an executor with a custom configuration
    pub fn with_config(config: ExecutorConfig) -> Self {
        Self {
            config,
            evaluator: Arc::new(DefaultEvaluator::new()),
        }
    }

    /// Replace the non-windowed expression evaluator
    pub fn with_evaluator(mut self, evaluator: Arc<dyn ExpressionEval>) -> Self {
        self.evaluator = evaluator;
        self
    }

    /// Current configuration
    pub fn config(&self) -> &ExecutorConfig {
        &self.config
    }

    /// Evaluate `exprs` and return a table holding only their columns
    pub fn select(&self, table: &Table, exprs: &[Expr]) -> Result<Table> {
        let output = self.evaluate_batch(table, exprs)?;
        Table::new(output.columns)
    }

    /// Evaluate `exprs` and append them to `table`, replacing same-named columns
    pub fn with_columns(&self, table: &Table, exprs: &[Expr]) -> Result<Table> {
        let output = self.evaluate_batch(table, exprs)?;
        table.with_columns(output.columns)
    }

    /// Evaluate `exprs` as one batch
    ///
    /// The first failing expression aborts the batch; its error is wrapped in
    /// `Error::WindowEvaluation` naming the expression.
    pub fn evaluate_batch(&self, table: &Table, exprs: &[Expr]) -> Result<BatchOutput> {
        let cache = BatchCache::new();
        let use_parallel = self.config.should_parallel_batch(exprs.len());

        tracing::debug!(
            expressions = exprs.len(),
            rows = table.height(),
            parallel = use_parallel,
            "evaluating batch"
        );

        // Only one level of parallelism: parallel siblings evaluate their groups sequentially
        let columns = if use_parallel {
            self.evaluate_columns_parallel(table, exprs, &cache)?
        } else {
            exprs
                .iter()
                .map(|expr| self.evaluate_column(table, expr, &cache, true))
                .collect::<Result<Vec<_>>>()?
        };

        let stats = cache.stats();
        tracing::debug!(
            columns = columns.len(),
            group_indexes = stats.group_misses,
            group_cache_hits = stats.group_hits,
            "batch finished"
        );
        Ok(BatchOutput { columns, stats })
    }

    #[cfg(feature = "parallel")]
    fn evaluate_columns_parallel(
        &self,
        table: &Table,
        exprs: &[Expr],
        cache: &BatchCache,
    ) -> Result<Vec<Column>> {
        exprs
            .par_iter()
            .map(|expr| self.evaluate_column(table, expr, cache, false))
            .collect()
    }

    #[cfg(not(feature = "parallel"))]
    fn evaluate_columns_parallel(
        &self,
        table: &Table,
        exprs: &[Expr],
        cache: &BatchCache,
    ) -> Result<Vec<Column>> {
        exprs
            .iter()
            .map(|expr| self.evaluate_column(table, expr, cache, false))
            .collect()
    }

    /// Evaluate one output column of a batch
    fn evaluate_column(
        &self,
        table: &Table,
        expr: &Expr,
        cache: &BatchCache,
        parallel_groups: bool,
    ) -> Result<Column> {
        let mut window = WindowEvaluator::new(self.evaluator.as_ref(), cache, &self.config);
        if !parallel_groups {
            window = window.sequential_groups();
        }
        let values = self
            .evaluate_expr(&window, table, expr)
            .map(|evaluated| evaluated.into_series(table.height()))
            .map_err(|e| e.in_expression(expr.to_string()))?;
        Ok(Column::new(expr.output_name(), values))
    }

    /// Walk the top of an expression tree, routing windows to the window engine
    fn evaluate_expr(
        &self,
        window: &WindowEvaluator<'_>,
        table: &Table,
        expr: &Expr,
    ) -> Result<Evaluated> {
        match expr {
            Expr::Window {
                input,
                partition_by,
            } => Ok(Evaluated::Series(
                window.evaluate_window(table, input, partition_by)?,
            )),
            Expr::Flatten(input) => Ok(Evaluated::Series(window.evaluate_flatten(table, input)?)),
            Expr::Alias(input, _) => self.evaluate_expr(window, table, input),
            Expr::Binary { left, op, right } if expr.contains_window() => {
                let left = self.evaluate_expr(window, table, left)?;
                let right = self.evaluate_expr(window, table, right)?;
                evaluator::combine(left, *op, right)
            }
            _ => self.evaluator.evaluate(expr, &Frame::full(table)),
        }
    }
}

/// Convenience: evaluate a single expression into a column of values
pub fn evaluate(table: &Table, expr: &Expr) -> Result<Vec<Value>> {
    let output = Executor::new().evaluate_batch(table, std::slice::from_ref(expr))?;
    Ok(output
        .columns
        .into_iter()
        .next()
        .map(|c| c.values().to_vec())
        .unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Error;
    use crate::expr::{col, lit};

    fn table() -> Table {
        Table::new(vec![
            Column::from_iter("g", ["a", "b", "a", "b"]),
            Column::from_iter("v", [1.0, 2.0, 3.0, 6.0]),
        ])
        .unwrap()
    }

    #[test]
    fn test_select_names_and_lengths() {
        let out = Executor::new()
            .select(
                &table(),
                &[
                    col("v").mean().over(["g"]).alias("m"),
                    col("v").shift(1).over(["g"]),
                ],
            )
            .unwrap();
        assert_eq!(out.column_names(), vec!["m", "v"]);
        assert_eq!(out.height(), 4);
    }

    #[test]
    fn test_with_columns_replaces() {
        let out = Executor::new()
            .with_columns(&table(), &[col("v").sum().over(["g"])])
            .unwrap();
        assert_eq!(out.column_names(), vec!["g", "v"]);
        assert_eq!(
            out.column("v").unwrap().values(),
            &[
                Value::Float(4.0),
                Value::Float(8.0),
                Value::Float(4.0),
                Value::Float(8.0)
            ]
        );
    }

    #[test]
    fn test_arithmetic_around_windows() {
        let out = evaluate(&table(), &(col("v") - col("v").mean().over(["g"]))).unwrap();
        assert_eq!(
            out,
            vec![
                Value::Float(-1.0),
                Value::Float(-2.0),
                Value::Float(1.0),
                Value::Float(2.0)
            ]
        );
    }

    #[test]
    fn test_scalar_is_broadcast() {
        let out = evaluate(&table(), &lit(7)).unwrap();
        assert_eq!(out, vec![Value::Integer(7); 4]);
    }

    #[test]
    fn test_error_names_expression() {
        let expr = col("v").quantile(1.5).over(["g"]);
        let err = Executor::new().select(&table(), &[expr.clone()]).unwrap_err();
        match &err {
            Error::WindowEvaluation { expression, .. } => {
                assert_eq!(expression, &expr.to_string())
            }
            other => panic!("unexpected error {:?}", other),
        }
        assert_eq!(err.root_cause(), &Error::InvalidQuantile(1.5));
    }

    #[test]
    fn test_siblings_share_group_index() {
        let output = Executor::new()
            .evaluate_batch(
                &table(),
                &[
                    col("v").sum().over(["g"]),
                    col("v").reverse().over(["g"]).alias("r"),
                    col("v").list().over(["g"]).alias("l"),
                ],
            )
            .unwrap();
        assert_eq!(output.stats.group_misses, 1);
        assert_eq!(output.stats.group_hits, 2);
    }
}
