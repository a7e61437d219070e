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

//! Expression trees
//!
//! An [`Expr`] describes how to compute one output column. Window
//! expressions are built with [`Expr::over`]:
//!
//! ```rust
//! use overeval::expr::{col, count, arange};
//!
//! let standardized = (col("v") - col("v").mean().over(["g"])) / col("v").std(1).over(["g"]);
//! let position = arange(0, count()).over(["g"]);
//! let reversed = col("v").reverse().list().over(["g"]).flatten();
//! ```
//!
//! The [`Display`](std::fmt::Display) form of an expression is canonical:
//! structurally equal expressions print identically, which is what the
//! per-batch window cache keys on.

mod builder;

pub use builder::{arange, col, count, lit};

use std::fmt;

use crate::core::{Operator, Value};

/// Output name of literal and range expressions
pub const LITERAL_NAME: &str = "literal";
/// Output name of the row count expression
pub const COUNT_NAME: &str = "count";

/// A column expression
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Reference to a column of the input table
    Column(String),
    /// Constant value, broadcast to the frame length
    Literal(Value),
    /// Number of rows of the frame (`count()`)
    Len,
    /// Integer range `[start, end)`; both bounds evaluate to scalars
    IntRange { start: Box<Expr>, end: Box<Expr> },
    /// Binary operation with scalar/sequence broadcasting
    Binary {
        left: Box<Expr>,
        op: Operator,
        right: Box<Expr>,
    },
    /// Aggregate kernel collapsing the frame to one value
    Aggregate {
        function: String,
        input: Box<Expr>,
        options: Vec<Value>,
    },
    /// Transform kernel mapping the frame to a sequence of the same length
    Transform {
        function: String,
        input: Box<Expr>,
        options: Vec<Value>,
    },
    /// Collect the frame's values into one list value
    List(Box<Expr>),
    /// Evaluate `input` per group of `partition_by` and map back to row order
    Window {
        input: Box<Expr>,
        partition_by: Vec<String>,
    },
    /// Explode a `.list().over(..)` result back to one value per row
    Flatten(Box<Expr>),
    /// Rename the output column
    Alias(Box<Expr>, String),
}

impl Expr {
    /// Name of the column this expression produces
    ///
    /// The alias if one is set, otherwise the left-most root column.
    /// Literals and ranges are named `literal`, `count()` is named `count`.
    pub fn output_name(&self) -> &str {
        match self {
            Expr::Alias(_, name) => name,
            Expr::Column(name) => name,
            Expr::Literal(_) | Expr::IntRange { .. } => LITERAL_NAME,
            Expr::Len => COUNT_NAME,
            Expr::Binary { left, .. } => left.output_name(),
            Expr::Aggregate { input, .. }
            | Expr::Transform { input, .. }
            | Expr::List(input)
            | Expr::Window { input, .. }
            | Expr::Flatten(input) => input.output_name(),
        }
    }

    /// Returns true if this expression yields one value regardless of frame length
    pub fn is_scalar(&self) -> bool {
        match self {
            Expr::Literal(_) | Expr::Len | Expr::Aggregate { .. } | Expr::List(_) => true,
            Expr::Column(_)
            | Expr::IntRange { .. }
            | Expr::Transform { .. }
            | Expr::Window { .. }
            | Expr::Flatten(_) => false,
            Expr::Binary { left, right, .. } => left.is_scalar() && right.is_scalar(),
            Expr::Alias(inner, _) => inner.is_scalar(),
        }
    }

    /// Returns true if a window expression appears anywhere in this tree
    pub fn contains_window(&self) -> bool {
        let mut found = false;
        self.visit(&mut |e| found |= matches!(e, Expr::Window { .. }));
        found
    }

    /// Names of all columns referenced by this expression, first occurrence order
    pub fn referenced_columns(&self) -> Vec<&str> {
        let mut columns: Vec<&str> = Vec::new();
        self.visit(&mut |e| {
            if let Expr::Column(name) = e {
                if !columns.contains(&name.as_str()) {
                    columns.push(name);
                }
            }
            if let Expr::Window { partition_by, .. } = e {
                for key in partition_by {
                    if !columns.contains(&key.as_str()) {
                        columns.push(key);
                    }
                }
            }
        });
        columns
    }

    /// The expression with any outer aliases removed
    pub fn strip_alias(&self) -> &Expr {
        match self {
            Expr::Alias(inner, _) => inner.strip_alias(),
            other => other,
        }
    }

    /// Pre-order traversal
    pub fn visit<'a>(&'a self, f: &mut impl FnMut(&'a Expr)) {
        f(self);
        match self {
            Expr::Column(_) | Expr::Literal(_) | Expr::Len => {}
            Expr::IntRange { start, end } => {
                start.visit(f);
                end.visit(f);
            }
            Expr::Binary { left, right, .. } => {
                left.visit(f);
                right.visit(f);
            }
            Expr::Aggregate { input, .. }
            | Expr::Transform { input, .. }
            | Expr::List(input)
            | Expr::Window { input, .. }
            | Expr::Flatten(input)
            | Expr::Alias(input, _) => input.visit(f),
        }
    }
}

fn write_call(
    f: &mut fmt::Formatter<'_>,
    input: &Expr,
    function: &str,
    options: &[Value],
) -> fmt::Result {
    write!(f, "{}.{}(", input, function.to_lowercase())?;
    for (i, option) in options.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{}", option)?;
    }
    write!(f, ")")
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Column(name) => write!(f, "col({:?})", name),
            Expr::Literal(value) => write!(f, "lit({})", value),
            Expr::Len => write!(f, "count()"),
            Expr::IntRange { start, end } => write!(f, "arange({}, {})", start, end),
            Expr::Binary { left, op, right } => write!(f, "[({}) {} ({})]", left, op, right),
            Expr::Aggregate {
                function,
                input,
                options,
            }
            | Expr::Transform {
                function,
                input,
                options,
            } => write_call(f, input, function, options),
            Expr::List(input) => write!(f, "{}.list()", input),
            Expr::Window {
                input,
                partition_by,
            } => {
                let keys: Vec<String> = partition_by.iter().map(|k| format!("{:?}", k)).collect();
                write!(f, "{}.over([{}])", input, keys.join(", "))
            }
            Expr::Flatten(input) => write!(f, "{}.flatten()", input),
            Expr::Alias(input, name) => write!(f, "{}.alias({:?})", input, name),
        }
    }
}
