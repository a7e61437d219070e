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

//! Cumulative transforms: CUM_SUM, CUM_MIN, CUM_MAX, CUM_COUNT
//!
//! Each output position holds the running result over the group's values up
//! to and including that position. A NULL input yields NULL at its own
//! position and does not affect the running state.

use std::cmp::Ordering;

use crate::core::{Error, Result, Value};
use crate::functions::{
    FunctionDataType, FunctionInfo, FunctionSignature, FunctionType, TransformFunction,
};

// ============================================================================
// CUM_SUM
// ============================================================================

/// CUM_SUM transform
///
/// Integer inputs keep an integer running sum; a float anywhere in the group
/// switches the remainder to float.
#[derive(Default)]
pub struct CumSumFunction;

impl TransformFunction for CumSumFunction {
    fn name(&self) -> &str {
        "CUM_SUM"
    }

    fn info(&self) -> FunctionInfo {
        FunctionInfo::new(
            "CUM_SUM",
            FunctionType::Transform,
            "Returns the running sum of values within the group",
            FunctionSignature::new(FunctionDataType::Numeric, FunctionDataType::Numeric, 0, 0),
        )
    }

    fn transform(&self, partition: &[Value]) -> Result<Vec<Value>> {
        let mut int_sum: i64 = 0;
        let mut float_sum: Option<f64> = None;
        let mut out = Vec::with_capacity(partition.len());

        for value in partition {
            match value {
                Value::Null(_) => out.push(value.clone()),
                Value::Integer(i) => match float_sum.as_mut() {
                    Some(f) => {
                        *f += *i as f64;
                        out.push(Value::Float(*f));
                    }
                    None => {
                        int_sum = int_sum.wrapping_add(*i);
                        out.push(Value::Integer(int_sum));
                    }
                },
                Value::Float(v) => {
                    let f = float_sum.get_or_insert(int_sum as f64);
                    *f += v;
                    out.push(Value::Float(*f));
                }
                other => return Err(Error::type_mismatch("CUM_SUM", other.data_type())),
            }
        }
        Ok(out)
    }

    fn clone_box(&self) -> Box<dyn TransformFunction> {
        Box::new(CumSumFunction)
    }
}

// ============================================================================
// CUM_MIN / CUM_MAX
// ============================================================================

fn running_extreme(function: &str, partition: &[Value], keep: Ordering) -> Result<Vec<Value>> {
    let mut current: Option<&Value> = None;
    let mut out = Vec::with_capacity(partition.len());

    for value in partition {
        if value.is_null() {
            out.push(value.clone());
            continue;
        }
        if !value.data_type().is_orderable() {
            return Err(Error::type_mismatch(function, value.data_type()));
        }
        current = match current {
            Some(c) if value.compare(c)? != keep => Some(c),
            _ => Some(value),
        };
        if let Some(c) = current {
            out.push(c.clone());
        }
    }
    Ok(out)
}

/// CUM_MIN transform
#[derive(Default)]
pub struct CumMinFunction;

impl TransformFunction for CumMinFunction {
    fn name(&self) -> &str {
        "CUM_MIN"
    }

    fn info(&self) -> FunctionInfo {
        FunctionInfo::new(
            "CUM_MIN",
            FunctionType::Transform,
            "Returns the running minimum of values within the group",
            FunctionSignature::new(FunctionDataType::SameAsInput, FunctionDataType::Any, 0, 0),
        )
    }

    fn transform(&self, partition: &[Value]) -> Result<Vec<Value>> {
        running_extreme("CUM_MIN", partition, Ordering::Less)
    }

    fn clone_box(&self) -> Box<dyn TransformFunction> {
        Box::new(CumMinFunction)
    }
}

/// CUM_MAX transform
#[derive(Default)]
pub struct CumMaxFunction;

impl TransformFunction for CumMaxFunction {
    fn name(&self) -> &str {
        "CUM_MAX"
    }

    fn info(&self) -> FunctionInfo {
        FunctionInfo::new(
            "CUM_MAX",
            FunctionType::Transform,
            "Returns the running maximum of values within the group",
            FunctionSignature::new(FunctionDataType::SameAsInput, FunctionDataType::Any, 0, 0),
        )
    }

    fn transform(&self, partition: &[Value]) -> Result<Vec<Value>> {
        running_extreme("CUM_MAX", partition, Ordering::Greater)
    }

    fn clone_box(&self) -> Box<dyn TransformFunction> {
        Box::new(CumMaxFunction)
    }
}

// ============================================================================
// CUM_COUNT
// ============================================================================

/// CUM_COUNT transform
///
/// Running count of non-NULL values. Unlike the other cumulative transforms
/// every position, NULL ones included, receives the count so far.
#[derive(Default)]
pub struct CumCountFunction;

impl TransformFunction for CumCountFunction {
    fn name(&self) -> &str {
        "CUM_COUNT"
    }

    fn info(&self) -> FunctionInfo {
        FunctionInfo::new(
            "CUM_COUNT",
            FunctionType::Transform,
            "Returns the running count of non-NULL values within the group",
            FunctionSignature::new(FunctionDataType::Integer, FunctionDataType::Any, 0, 0),
        )
    }

    fn transform(&self, partition: &[Value]) -> Result<Vec<Value>> {
        let mut count = 0i64;
        Ok(partition
            .iter()
            .map(|v| {
                if !v.is_null() {
                    count += 1;
                }
                Value::Integer(count)
            })
            .collect())
    }

    fn clone_box(&self) -> Box<dyn TransformFunction> {
        Box::new(CumCountFunction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ints(values: &[i64]) -> Vec<Value> {
        values.iter().map(|v| Value::Integer(*v)).collect()
    }

    #[test]
    fn test_cum_sum_integers() {
        let out = CumSumFunction.transform(&ints(&[1, 2, 3])).unwrap();
        assert_eq!(out, ints(&[1, 3, 6]));
    }

    #[test]
    fn test_cum_sum_switches_to_float() {
        let out = CumSumFunction
            .transform(&[Value::Integer(1), Value::Float(0.5), Value::Integer(2)])
            .unwrap();
        assert_eq!(
            out,
            vec![Value::Integer(1), Value::Float(1.5), Value::Float(3.5)]
        );
    }

    #[test]
    fn test_cum_sum_null_positions() {
        let out = CumSumFunction
            .transform(&[Value::Integer(1), Value::null_unknown(), Value::Integer(2)])
            .unwrap();
        assert_eq!(out[0], Value::Integer(1));
        assert!(out[1].is_null());
        assert_eq!(out[2], Value::Integer(3));
    }

    #[test]
    fn test_cum_sum_rejects_text() {
        assert!(CumSumFunction
            .transform(&[Value::text("a")])
            .unwrap_err()
            .is_type_error());
    }

    #[test]
    fn test_cum_min_max() {
        let input = ints(&[3, 1, 4, 1, 5]);
        assert_eq!(
            CumMinFunction.transform(&input).unwrap(),
            ints(&[3, 1, 1, 1, 1])
        );
        assert_eq!(
            CumMaxFunction.transform(&input).unwrap(),
            ints(&[3, 3, 4, 4, 5])
        );
    }

    #[test]
    fn test_cum_max_text() {
        let input = vec![Value::text("b"), Value::text("a"), Value::text("c")];
        let out = CumMaxFunction.transform(&input).unwrap();
        assert_eq!(
            out,
            vec![Value::text("b"), Value::text("b"), Value::text("c")]
        );
    }

    #[test]
    fn test_cum_count() {
        let out = CumCountFunction
            .transform(&[Value::Integer(7), Value::null_unknown(), Value::Integer(9)])
            .unwrap();
        assert_eq!(out, ints(&[1, 1, 2]));
    }
}
