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

//! DIFF transform

use crate::core::{Error, Result, Value};
use crate::functions::{
    integer_option, FunctionDataType, FunctionInfo, FunctionSignature, FunctionType,
    TransformFunction,
};

/// DIFF transform
///
/// `out[i] = x[i] - x[i - n]` within the group. Positions without a partner
/// row, or where either side is NULL, are NULL. A negative `n` compares with
/// a later row instead.
pub struct DiffFunction {
    offset: i64,
}

impl Default for DiffFunction {
    fn default() -> Self {
        Self { offset: 1 }
    }
}

impl DiffFunction {
    /// Create a new DIFF transform with the given offset
    pub fn new(offset: i64) -> Self {
        Self { offset }
    }
}

fn subtract(current: &Value, previous: &Value) -> Result<Value> {
    match (current, previous) {
        (Value::Null(_), _) | (_, Value::Null(_)) => Ok(Value::null_unknown()),
        (Value::Integer(a), Value::Integer(b)) => Ok(Value::Integer(a.wrapping_sub(*b))),
        (a, b) => match (a.as_float64(), b.as_float64()) {
            (Some(x), Some(y)) if a.data_type().is_numeric() && b.data_type().is_numeric() => {
                Ok(Value::Float(x - y))
            }
            _ => {
                let offending = if a.data_type().is_numeric() { b } else { a };
                Err(Error::type_mismatch("DIFF", offending.data_type()))
            }
        },
    }
}

impl TransformFunction for DiffFunction {
    fn name(&self) -> &str {
        "DIFF"
    }

    fn info(&self) -> FunctionInfo {
        FunctionInfo::new(
            "DIFF",
            FunctionType::Transform,
            "Returns the difference with the value offset rows earlier in the group",
            FunctionSignature::new(FunctionDataType::Numeric, FunctionDataType::Numeric, 0, 1),
        )
    }

    fn configure(&mut self, options: &[Value]) -> Result<()> {
        self.offset = integer_option("DIFF", options, 1)?;
        Ok(())
    }

    fn transform(&self, partition: &[Value]) -> Result<Vec<Value>> {
        let len = partition.len() as i64;
        (0..len)
            .map(|i| {
                match i.checked_sub(self.offset) {
                    Some(partner) if (0..len).contains(&partner) => {
                        subtract(&partition[i as usize], &partition[partner as usize])
                    }
                    _ => Ok(Value::null_unknown()),
                }
            })
            .collect()
    }

    fn clone_box(&self) -> Box<dyn TransformFunction> {
        Box::new(DiffFunction::new(self.offset))
    }
}
