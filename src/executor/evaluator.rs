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

//! Non-windowed expression evaluation
//!
//! The window engine treats expression evaluation as a pure function from a
//! [`Frame`] (a table restricted to some rows) to an [`Evaluated`] result.
//! [`ExpressionEval`] is that seam; [`DefaultEvaluator`] is the built-in
//! implementation backed by the function registry.

use crate::core::{DataType, Error, Operator, Result, Table, Value};
use crate::expr::Expr;
use crate::functions::{global_registry, FunctionRegistry};

/// A table restricted to a subsequence of its rows
///
/// Inside a window the frame holds one group's row positions in group order.
#[derive(Debug, Clone, Copy)]
pub struct Frame<'a> {
    table: &'a Table,
    rows: Option<&'a [usize]>,
}

impl<'a> Frame<'a> {
    /// All rows of `table` in order
    pub fn full(table: &'a Table) -> Self {
        Self { table, rows: None }
    }

    /// The given row positions of `table`, in the given order
    pub fn group(table: &'a Table, rows: &'a [usize]) -> Self {
        Self {
            table,
            rows: Some(rows),
        }
    }

    /// The underlying table
    pub fn table(&self) -> &'a Table {
        self.table
    }

    /// Number of rows in the frame
    pub fn len(&self) -> usize {
        match self.rows {
            Some(rows) => rows.len(),
            None => self.table.height(),
        }
    }

    /// Returns true if the frame has no rows
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Values of a column at the frame's rows
    pub fn column(&self, name: &str) -> Result<Vec<Value>> {
        let column = self.table.column(name)?;
        match self.rows {
            None => Ok(column.values().to_vec()),
            Some(rows) => rows
                .iter()
                .map(|&row| {
                    column.get(row).cloned().ok_or_else(|| {
                        Error::internal(format!(
                            "row {} out of bounds for column {}",
                            row,
                            column.name()
                        ))
                    })
                })
                .collect(),
        }
    }
}

/// Result of evaluating an expression on a frame
#[derive(Debug, Clone, PartialEq)]
pub enum Evaluated {
    /// One value for the whole frame
    Scalar(Value),
    /// One value per row (or, for ranges, any number of values)
    Series(Vec<Value>),
}

impl Evaluated {
    /// Materialize as a sequence, broadcasting a scalar to `len` rows
    pub fn into_series(self, len: usize) -> Vec<Value> {
        match self {
            Evaluated::Scalar(value) => vec![value; len],
            Evaluated::Series(values) => values,
        }
    }

    /// Returns true for a scalar result
    pub fn is_scalar(&self) -> bool {
        matches!(self, Evaluated::Scalar(_))
    }
}

/// Evaluates expressions over a frame
///
/// Implementations must be pure: the same expression over the same frame
/// always yields the same result. The window engine calls this once per group,
/// possibly from several threads.
pub trait ExpressionEval: Send + Sync {
    /// Evaluate `expr` over `frame`
    fn evaluate(&self, expr: &Expr, frame: &Frame<'_>) -> Result<Evaluated>;

    /// Check `expr` without evaluating it
    ///
    /// Called once per window before the group loop, so invalid function
    /// options fail even when the table has no rows.
    fn validate(&self, _expr: &Expr) -> Result<()> {
        Ok(())
    }
}

/// Built-in evaluator for every non-window expression
pub struct DefaultEvaluator {
    registry: &'static FunctionRegistry,
}

impl Default for DefaultEvaluator {
    fn default() -> Self {
        Self::new()
    }
}

impl DefaultEvaluator {
    /// Create an evaluator using the global function registry
    pub fn new() -> Self {
        Self {
            registry: global_registry(),
        }
    }

    /// Create an evaluator using a custom registry
    pub fn with_registry(registry: &'static FunctionRegistry) -> Self {
        Self { registry }
    }

    fn scalar_integer(&self, expr: &Expr, frame: &Frame<'_>) -> Result<i64> {
        match self.evaluate(expr, frame)? {
            Evaluated::Scalar(Value::Integer(n)) => Ok(n),
            Evaluated::Scalar(other) => Err(Error::type_mismatch("ARANGE", other.data_type())),
            Evaluated::Series(_) => Err(Error::invalid_argument(format!(
                "range bound must be a scalar: {}",
                expr
            ))),
        }
    }
}

impl ExpressionEval for DefaultEvaluator {
    fn validate(&self, expr: &Expr) -> Result<()> {
        let mut result = Ok(());
        expr.visit(&mut |node| {
            if result.is_err() {
                return;
            }
            result = match node {
                Expr::Aggregate {
                    function, options, ..
                } => self.registry.create_aggregate(function, options).map(drop),
                Expr::Transform {
                    function, options, ..
                } => self.registry.create_transform(function, options).map(drop),
                _ => Ok(()),
            };
        });
        result
    }

    fn evaluate(&self, expr: &Expr, frame: &Frame<'_>) -> Result<Evaluated> {
        match expr {
            Expr::Column(name) => Ok(Evaluated::Series(frame.column(name)?)),
            Expr::Literal(value) => Ok(Evaluated::Scalar(value.clone())),
            Expr::Len => Ok(Evaluated::Scalar(Value::Integer(frame.len() as i64))),
            Expr::IntRange { start, end } => {
                let start = self.scalar_integer(start, frame)?;
                let end = self.scalar_integer(end, frame)?;
                // Bounded by the frame before anything is allocated
                let length = usize::try_from((end as i128 - start as i128).max(0)).map_err(|_| {
                    Error::invalid_argument(format!("range [{}, {}) is too long", start, end))
                })?;
                if length > frame.len() {
                    return Err(Error::WindowLengthMismatch {
                        expected: frame.len(),
                        got: length,
                    });
                }
                Ok(Evaluated::Series((start..end).map(Value::Integer).collect()))
            }
            Expr::Binary { left, op, right } => {
                let left = self.evaluate(left, frame)?;
                let right = self.evaluate(right, frame)?;
                combine(left, *op, right)
            }
            Expr::Aggregate {
                function,
                input,
                options,
            } => {
                let mut kernel = self.registry.create_aggregate(function, options)?;
                let values = self.evaluate(input, frame)?.into_series(frame.len());
                for value in &values {
                    kernel.accumulate(value)?;
                }
                Ok(Evaluated::Scalar(kernel.result()))
            }
            Expr::Transform {
                function,
                input,
                options,
            } => {
                let kernel = self.registry.create_transform(function, options)?;
                let values = self.evaluate(input, frame)?.into_series(frame.len());
                let out = kernel.transform(&values)?;
                if out.len() != values.len() {
                    return Err(Error::internal(format!(
                        "{} returned {} values for {} inputs",
                        kernel.name(),
                        out.len(),
                        values.len()
                    )));
                }
                Ok(Evaluated::Series(out))
            }
            Expr::List(input) => {
                let values = self.evaluate(input, frame)?.into_series(frame.len());
                Ok(Evaluated::Scalar(Value::list(values)))
            }
            Expr::Window { .. } | Expr::Flatten(_) => Err(Error::not_supported(format!(
                "window expression cannot be nested here: {}",
                expr
            ))),
            Expr::Alias(input, _) => self.evaluate(input, frame),
        }
    }
}

/// Combine two evaluated operands, broadcasting scalars
pub fn combine(left: Evaluated, op: Operator, right: Evaluated) -> Result<Evaluated> {
    match (left, right) {
        (Evaluated::Scalar(a), Evaluated::Scalar(b)) => {
            Ok(Evaluated::Scalar(apply_binary(&a, op, &b)?))
        }
        (Evaluated::Scalar(a), Evaluated::Series(b)) => Ok(Evaluated::Series(
            b.iter()
                .map(|v| apply_binary(&a, op, v))
                .collect::<Result<_>>()?,
        )),
        (Evaluated::Series(a), Evaluated::Scalar(b)) => Ok(Evaluated::Series(
            a.iter()
                .map(|v| apply_binary(v, op, &b))
                .collect::<Result<_>>()?,
        )),
        (Evaluated::Series(a), Evaluated::Series(b)) => {
            if a.len() != b.len() {
                return Err(Error::invalid_argument(format!(
                    "cannot apply {} to sequences of length {} and {}",
                    op,
                    a.len(),
                    b.len()
                )));
            }
            Ok(Evaluated::Series(
                a.iter()
                    .zip(b.iter())
                    .map(|(x, y)| apply_binary(x, op, y))
                    .collect::<Result<_>>()?,
            ))
        }
    }
}

/// Apply a binary operator to two values
///
/// NULL operands yield NULL. Integer arithmetic is checked and integer
/// division by zero yields NULL; float arithmetic follows IEEE 754, so NaN
/// and infinities flow through as data.
pub fn apply_binary(a: &Value, op: Operator, b: &Value) -> Result<Value> {
    if op.is_comparison() {
        if a.is_null() || b.is_null() {
            return Ok(Value::Null(DataType::Boolean));
        }
        let ordering = a.compare(b)?;
        let result = match op {
            Operator::Eq => ordering.is_eq(),
            Operator::Ne => ordering.is_ne(),
            Operator::Gt => ordering.is_gt(),
            Operator::Gte => ordering.is_ge(),
            Operator::Lt => ordering.is_lt(),
            Operator::Lte => ordering.is_le(),
            _ => return Err(Error::internal(format!("{} is not a comparison", op))),
        };
        return Ok(Value::Boolean(result));
    }

    match (a, b) {
        (Value::Integer(x), Value::Integer(y)) => {
            let result = match op {
                Operator::Add => x.checked_add(*y),
                Operator::Sub => x.checked_sub(*y),
                Operator::Mul => x.checked_mul(*y),
                Operator::Div => {
                    if *y == 0 {
                        return Ok(Value::Null(DataType::Integer));
                    }
                    x.checked_div(*y)
                }
                _ => None,
            };
            result.map(Value::Integer).ok_or_else(|| {
                Error::invalid_argument(format!("integer overflow in {} {} {}", x, op, y))
            })
        }
        _ if a.is_null() || b.is_null() => {
            let data_type = if a.data_type() == DataType::Integer || b.data_type() == DataType::Integer
            {
                DataType::Integer
            } else {
                DataType::Float
            };
            Ok(Value::Null(data_type))
        }
        _ => {
            let (x, y) = match (a.data_type().is_numeric(), b.data_type().is_numeric()) {
                (true, true) => (a.as_float64(), b.as_float64()),
                (false, _) => return Err(Error::type_mismatch(op.to_string(), a.data_type())),
                (_, false) => return Err(Error::type_mismatch(op.to_string(), b.data_type())),
            };
            let (x, y) = x.zip(y).ok_or_else(|| Error::internal("numeric value without float"))?;
            let result = match op {
                Operator::Add => x + y,
                Operator::Sub => x - y,
                Operator::Mul => x * y,
                Operator::Div => x / y,
                _ => return Err(Error::internal(format!("{} is not arithmetic", op))),
            };
            Ok(Value::Float(result))
        }
    }
}
