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

//! Expression builder API

use std::ops::{Add, Div, Mul, Sub};

use crate::core::{Operator, Value};
use crate::functions::{QuantileInterpolation, RankMethod};

use super::Expr;

/// Reference a column by name
pub fn col(name: impl Into<String>) -> Expr {
    Expr::Column(name.into())
}

/// A constant value
pub fn lit(value: impl Into<Value>) -> Expr {
    Expr::Literal(value.into())
}

/// Number of rows in the current frame (the group, inside a window)
pub fn count() -> Expr {
    Expr::Len
}

/// Integer range `[start, end)`
///
/// `arange(0, count()).over(["g"])` numbers the rows of every group from 0.
pub fn arange(start: impl Into<Expr>, end: impl Into<Expr>) -> Expr {
    Expr::IntRange {
        start: Box::new(start.into()),
        end: Box::new(end.into()),
    }
}

impl From<Value> for Expr {
    fn from(value: Value) -> Self {
        Expr::Literal(value)
    }
}

impl From<i64> for Expr {
    fn from(value: i64) -> Self {
        Expr::Literal(Value::Integer(value))
    }
}

impl From<i32> for Expr {
    fn from(value: i32) -> Self {
        Expr::Literal(Value::Integer(value as i64))
    }
}

impl From<f64> for Expr {
    fn from(value: f64) -> Self {
        Expr::Literal(Value::Float(value))
    }
}

impl Expr {
    fn aggregate(self, function: &str, options: Vec<Value>) -> Expr {
        Expr::Aggregate {
            function: function.to_string(),
            input: Box::new(self),
            options,
        }
    }

    fn transform(self, function: &str, options: Vec<Value>) -> Expr {
        Expr::Transform {
            function: function.to_string(),
            input: Box::new(self),
            options,
        }
    }

    fn binary(self, op: Operator, right: Expr) -> Expr {
        Expr::Binary {
            left: Box::new(self),
            op,
            right: Box::new(right),
        }
    }

    // Aggregates

    /// Number of non-NULL values
    pub fn count(self) -> Expr {
        self.aggregate("COUNT", Vec::new())
    }

    /// Sum of the non-NULL values
    pub fn sum(self) -> Expr {
        self.aggregate("SUM", Vec::new())
    }

    /// Arithmetic mean of the non-NULL values
    pub fn mean(self) -> Expr {
        self.aggregate("MEAN", Vec::new())
    }

    /// Smallest non-NULL value
    pub fn min(self) -> Expr {
        self.aggregate("MIN", Vec::new())
    }

    /// Largest non-NULL value
    pub fn max(self) -> Expr {
        self.aggregate("MAX", Vec::new())
    }

    /// First value, NULL included
    pub fn first(self) -> Expr {
        self.aggregate("FIRST", Vec::new())
    }

    /// Last value, NULL included
    pub fn last(self) -> Expr {
        self.aggregate("LAST", Vec::new())
    }

    /// Number of distinct values, NULL counted once
    pub fn n_unique(self) -> Expr {
        self.aggregate("N_UNIQUE", Vec::new())
    }

    /// Median of the non-NULL values
    pub fn median(self) -> Expr {
        self.aggregate("MEDIAN", Vec::new())
    }

    /// Standard deviation with `ddof` delta degrees of freedom (1 = sample)
    pub fn std(self, ddof: u8) -> Expr {
        self.aggregate("STD", vec![Value::Integer(ddof as i64)])
    }

    /// Variance with `ddof` delta degrees of freedom (1 = sample)
    pub fn var(self, ddof: u8) -> Expr {
        self.aggregate("VAR", vec![Value::Integer(ddof as i64)])
    }

    /// Quantile `p` using the default (nearest) interpolation
    ///
    /// `p` is validated when the expression is evaluated: outside [0, 1]
    /// evaluation fails with `InvalidQuantile`.
    pub fn quantile(self, p: f64) -> Expr {
        self.aggregate("QUANTILE", vec![Value::Float(p)])
    }

    /// Quantile `p` with an explicit interpolation method
    pub fn quantile_with(self, p: f64, interpolation: QuantileInterpolation) -> Expr {
        self.aggregate(
            "QUANTILE",
            vec![Value::Float(p), Value::text(interpolation.to_string())],
        )
    }

    // Transforms

    /// Shift values by `n` positions; vacated positions become NULL
    pub fn shift(self, n: i64) -> Expr {
        self.transform("SHIFT", vec![Value::Integer(n)])
    }

    /// Reverse the order of the values
    pub fn reverse(self) -> Expr {
        self.transform("REVERSE", Vec::new())
    }

    /// Running sum; NULL positions stay NULL
    pub fn cum_sum(self) -> Expr {
        self.transform("CUM_SUM", Vec::new())
    }

    /// Running minimum
    pub fn cum_min(self) -> Expr {
        self.transform("CUM_MIN", Vec::new())
    }

    /// Running maximum
    pub fn cum_max(self) -> Expr {
        self.transform("CUM_MAX", Vec::new())
    }

    /// Running count of non-NULL values
    pub fn cum_count(self) -> Expr {
        self.transform("CUM_COUNT", Vec::new())
    }

    /// Difference with the value `n` rows earlier
    pub fn diff(self, n: i64) -> Expr {
        self.transform("DIFF", vec![Value::Integer(n)])
    }

    /// Rank of every value, ties resolved by `method`; NULLs stay unranked
    pub fn rank(self, method: RankMethod) -> Expr {
        self.transform("RANK", vec![Value::text(method.to_string())])
    }

    // Windowing

    /// Collect the values into one list
    pub fn list(self) -> Expr {
        Expr::List(Box::new(self))
    }

    /// Evaluate this expression per group of the given key columns
    pub fn over<I, S>(self, partition_by: I) -> Expr
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Expr::Window {
            input: Box::new(self),
            partition_by: partition_by.into_iter().map(Into::into).collect(),
        }
    }

    /// Explode a `.list().over(..)` result back to one value per row
    pub fn flatten(self) -> Expr {
        Expr::Flatten(Box::new(self))
    }

    /// Name the output column
    pub fn alias(self, name: impl Into<String>) -> Expr {
        Expr::Alias(Box::new(self), name.into())
    }

    // Comparisons

    /// Equality comparison (`==`)
    pub fn equal(self, other: impl Into<Expr>) -> Expr {
        self.binary(Operator::Eq, other.into())
    }

    /// Inequality comparison (`!=`)
    pub fn not_equal(self, other: impl Into<Expr>) -> Expr {
        self.binary(Operator::Ne, other.into())
    }

    /// Greater than (`>`)
    pub fn gt(self, other: impl Into<Expr>) -> Expr {
        self.binary(Operator::Gt, other.into())
    }

    /// Greater than or equal (`>=`)
    pub fn gt_eq(self, other: impl Into<Expr>) -> Expr {
        self.binary(Operator::Gte, other.into())
    }

    /// Less than (`<`)
    pub fn lt(self, other: impl Into<Expr>) -> Expr {
        self.binary(Operator::Lt, other.into())
    }

    /// Less than or equal (`<=`)
    pub fn lt_eq(self, other: impl Into<Expr>) -> Expr {
        self.binary(Operator::Lte, other.into())
    }
}

macro_rules! impl_arithmetic {
    ($trait:ident, $method:ident, $op:expr) => {
        impl<R: Into<Expr>> $trait<R> for Expr {
            type Output = Expr;

            fn $method(self, rhs: R) -> Expr {
                self.binary($op, rhs.into())
            }
        }
    };
}

impl_arithmetic!(Add, add, Operator::Add);
impl_arithmetic!(Sub, sub, Operator::Sub);
impl_arithmetic!(Mul, mul, Operator::Mul);
impl_arithmetic!(Div, div, Operator::Div);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_shapes() {
        let e = col("v").shift(1).over(["g"]);
        match &e {
            Expr::Window {
                input,
                partition_by,
            } => {
                assert_eq!(partition_by, &vec!["g".to_string()]);
                assert!(matches!(input.as_ref(), Expr::Transform { function, .. } if function == "SHIFT"));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_arithmetic_operators() {
        let e = col("a") + 1 - col("b") * 2.5 / lit(3);
        assert!(matches!(e, Expr::Binary { op: Operator::Sub, .. }));
        assert!(matches!(col("a").gt(0), Expr::Binary { op: Operator::Gt, .. }));
    }

    #[test]
    fn test_arange_bounds() {
        let e = arange(0, count());
        assert_eq!(e.to_string(), "arange(lit(0), count())");
    }

    #[test]
    fn test_quantile_options() {
        let e = col("v").quantile_with(0.25, QuantileInterpolation::Linear);
        assert_eq!(e.to_string(), r#"col("v").quantile(0.25, "linear")"#);
    }
}
