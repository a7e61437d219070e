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

//! SUM aggregate function

use crate::core::{Error, Result, Value};
use crate::functions::{
    AggregateFunction, FunctionDataType, FunctionInfo, FunctionSignature, FunctionType,
};

/// Sum state - tracks whether we have integers or floats
#[derive(Default)]
enum SumState {
    #[default]
    Empty,
    Integer(i64),
    Float(f64),
}

/// SUM aggregate function
///
/// Returns the sum of all non-NULL values in the group.
/// Returns int64 for integer inputs, float64 once a float is seen, and 0 for
/// a group without values. Integer overflow wraps.
#[derive(Default)]
pub struct SumFunction {
    state: SumState,
}

impl AggregateFunction for SumFunction {
    fn name(&self) -> &str {
        "SUM"
    }

    fn info(&self) -> FunctionInfo {
        FunctionInfo::new(
            "SUM",
            FunctionType::Aggregate,
            "Returns the sum of all non-NULL values in the group",
            FunctionSignature::new(FunctionDataType::SameAsInput, FunctionDataType::Numeric, 0, 0),
        )
    }

    fn accumulate(&mut self, value: &Value) -> Result<()> {
        match value {
            Value::Null(_) => {}
            Value::Integer(i) => match &mut self.state {
                SumState::Empty => self.state = SumState::Integer(*i),
                SumState::Integer(sum) => *sum = sum.wrapping_add(*i),
                SumState::Float(sum) => *sum += *i as f64,
            },
            Value::Float(f) => match &mut self.state {
                SumState::Empty => self.state = SumState::Float(*f),
                SumState::Integer(sum) => {
                    self.state = SumState::Float(*sum as f64 + f);
                }
                SumState::Float(sum) => *sum += f,
            },
            other => return Err(Error::type_mismatch("SUM", other.data_type())),
        }
        Ok(())
    }

    fn result(&self) -> Value {
        match &self.state {
            SumState::Empty => Value::Integer(0),
            SumState::Integer(sum) => Value::Integer(*sum),
            SumState::Float(sum) => Value::Float(*sum),
        }
    }

    fn reset(&mut self) {
        self.state = SumState::Empty;
    }

    fn clone_box(&self) -> Box<dyn AggregateFunction> {
        Box::new(SumFunction::default())
    }
}
