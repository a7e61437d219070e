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

//! Window Expression Execution
//!
//! This module evaluates `inner.over(keys)` expressions.
//!
//! For every group of the partition keys (in the group index's canonical
//! first-occurrence order) the inner expression is evaluated on the group's
//! rows, then the per-group results are mapped back to original row order:
//!
//! - Aggregate (`col("v").mean().over(["g"])`) - one scalar per group, broadcast
//! - Transform (`col("v").shift(1).over(["g"])`) - one value per group row, scattered
//! - ListCollect (`col("v").list().over(["g"])`) - one list per group, broadcast,
//!   or scattered element-wise when followed by `.flatten()`

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use std::fmt;
use std::sync::Arc;

use crate::core::{Error, Result, Table, Value};
use crate::expr::Expr;

use super::cache::BatchCache;
use super::config::ExecutorConfig;
use super::evaluator::{Evaluated, ExpressionEval, Frame};
use super::group_index::GroupIndex;
use super::scatter;

/// How a window's inner expression maps a group to output rows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WindowKind {
    /// One scalar per group, broadcast to every row of the group
    Aggregate,
    /// One value per group row, written back to the row it came from
    Transform,
    /// One list value holding all of the group's values
    ListCollect,
}

impl WindowKind {
    /// Classify a window's inner expression
    pub fn classify(inner: &Expr) -> Self {
        match inner.strip_alias() {
            Expr::List(_) => WindowKind::ListCollect,
            e if e.is_scalar() => WindowKind::Aggregate,
            _ => WindowKind::Transform,
        }
    }
}

impl fmt::Display for WindowKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WindowKind::Aggregate => write!(f, "aggregate"),
            WindowKind::Transform => write!(f, "transform"),
            WindowKind::ListCollect => write!(f, "list"),
        }
    }
}

/// Result of evaluating a window's inner expression on one group
#[derive(Debug, Clone, PartialEq)]
pub enum GroupResult {
    /// Aggregate result
    Scalar(Value),
    /// Transform result, same length as the group
    Sequence(Vec<Value>),
    /// ListCollect result: `Value::List` of the group's values
    List(Value),
}

/// Per-group results in group order
pub type GroupResults = Vec<GroupResult>;

/// Evaluates window expressions against one table within one batch
pub struct WindowEvaluator<'a> {
    evaluator: &'a dyn ExpressionEval,
    cache: &'a BatchCache,
    config: &'a ExecutorConfig,
    parallel_groups: bool,
}

impl<'a> WindowEvaluator<'a> {
    /// Create a window evaluator sharing the batch's cache
    pub fn new(
        evaluator: &'a dyn ExpressionEval,
        cache: &'a BatchCache,
        config: &'a ExecutorConfig,
    ) -> Self {
        Self {
            evaluator,
            cache,
            config,
            parallel_groups: true,
        }
    }

    /// Always evaluate groups on the calling thread
    ///
    /// Required when sibling expressions already run on the rayon pool: a
    /// worker blocked inside a cache slot's initializer must not steal a
    /// sibling task that waits on the same slot.
    pub fn sequential_groups(mut self) -> Self {
        self.parallel_groups = false;
        self
    }

    /// Evaluate `inner.over(keys)`, returning a column in original row order
    pub fn evaluate_window(
        &self,
        table: &Table,
        inner: &Expr,
        keys: &[String],
    ) -> Result<Vec<Value>> {
        let kind = WindowKind::classify(inner);
        let (index, results) = self.group_results(table, inner, keys, kind)?;
        match kind {
            WindowKind::Aggregate | WindowKind::ListCollect => {
                scatter::broadcast(&index, &results)
            }
            WindowKind::Transform => scatter::scatter(&index, &results),
        }
    }

    /// Evaluate `inner.list().over(keys).flatten()`
    ///
    /// `window` is the operand of the flatten. Every list element is written
    /// back to the row position it was collected from, so row order is kept.
    pub fn evaluate_flatten(&self, table: &Table, window: &Expr) -> Result<Vec<Value>> {
        let (inner, keys) = match window.strip_alias() {
            Expr::Window {
                input,
                partition_by,
            } if WindowKind::classify(input) == WindowKind::ListCollect => {
                (input.as_ref(), partition_by.as_slice())
            }
            _ => {
                return Err(Error::not_supported(format!(
                    "flatten is only supported on a .list().over(..) expression, got {}",
                    window
                )))
            }
        };
        let (index, results) = self.group_results(table, inner, keys, WindowKind::ListCollect)?;
        scatter::flatten(&index, &results)
    }

    /// Group index and per-group results, both shared through the batch cache
    fn group_results(
        &self,
        table: &Table,
        inner: &Expr,
        keys: &[String],
        kind: WindowKind,
    ) -> Result<(Arc<GroupIndex>, Arc<GroupResults>)> {
        if inner.contains_window() {
            return Err(Error::not_supported(format!(
                "window expression nested inside another window: {}",
                inner
            )));
        }

        self.evaluator.validate(inner)?;

        let index = self.cache.group_index(table, keys)?;
        let results = self
            .cache
            .window_results((inner.to_string(), keys.to_vec()), || {
                self.evaluate_groups(table, inner, &index, kind)
            })?;
        Ok((index, results))
    }

    /// Evaluate the inner expression on every group, in group order
    fn evaluate_groups(
        &self,
        table: &Table,
        inner: &Expr,
        index: &GroupIndex,
        kind: WindowKind,
    ) -> Result<GroupResults> {
        let use_parallel = self.parallel_groups
            && self
                .config
                .should_parallel_groups(index.group_count(), table.height());

        tracing::debug!(
            expression = %inner,
            kind = %kind,
            groups = index.group_count(),
            rows = table.height(),
            parallel = use_parallel,
            "evaluating window"
        );

        if use_parallel {
            return self.evaluate_groups_parallel(table, inner, index, kind);
        }

        index
            .groups()
            .iter()
            .map(|rows| self.evaluate_group(table, inner, kind, rows))
            .collect()
    }

    #[cfg(feature = "parallel")]
    fn evaluate_groups_parallel(
        &self,
        table: &Table,
        inner: &Expr,
        index: &GroupIndex,
        kind: WindowKind,
    ) -> Result<GroupResults> {
        // Collected in group order, so the output matches the sequential path
        index
            .groups()
            .par_iter()
            .map(|rows| self.evaluate_group(table, inner, kind, rows))
            .collect()
    }

    #[cfg(not(feature = "parallel"))]
    fn evaluate_groups_parallel(
        &self,
        table: &Table,
        inner: &Expr,
        index: &GroupIndex,
        kind: WindowKind,
    ) -> Result<GroupResults> {
        index
            .groups()
            .iter()
            .map(|rows| self.evaluate_group(table, inner, kind, rows))
            .collect()
    }

    /// Evaluate the inner expression on one group's rows
    fn evaluate_group(
        &self,
        table: &Table,
        inner: &Expr,
        kind: WindowKind,
        rows: &[usize],
    ) -> Result<GroupResult> {
        let frame = Frame::group(table, rows);

        if kind == WindowKind::ListCollect {
            let collected = match inner.strip_alias() {
                Expr::List(input) => input,
                other => {
                    return Err(Error::internal(format!(
                        "list window without list expression: {}",
                        other
                    )))
                }
            };
            let values = match self.evaluator.evaluate(collected, &frame)? {
                Evaluated::Scalar(value) => vec![value],
                Evaluated::Series(values) => values,
            };
            return Ok(GroupResult::List(Value::list(values)));
        }

        match self.evaluator.evaluate(inner, &frame)? {
            Evaluated::Scalar(value) => Ok(GroupResult::Scalar(value)),
            Evaluated::Series(values) => {
                if values.len() != rows.len() {
                    return Err(Error::WindowLengthMismatch {
                        expected: rows.len(),
                        got: values.len(),
                    });
                }
                Ok(GroupResult::Sequence(values))
            }
        }
    }
}
