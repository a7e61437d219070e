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

//! MEAN aggregate function

use crate::core::{Result, Value};
use crate::functions::{
    AggregateFunction, FunctionDataType, FunctionInfo, FunctionSignature, FunctionType,
};

use super::numeric_input;

/// MEAN aggregate function
///
/// Returns the average of all non-NULL values in the group.
/// Always returns a float64; NULL for a group without values.
#[derive(Default)]
pub struct MeanFunction {
    sum: f64,
    count: i64,
}

impl AggregateFunction for MeanFunction {
    fn name(&self) -> &str {
        "MEAN"
    }

    fn info(&self) -> FunctionInfo {
        FunctionInfo::new(
            "MEAN",
            FunctionType::Aggregate,
            "Returns the average of all non-NULL values in the group",
            FunctionSignature::new(FunctionDataType::Float, FunctionDataType::Numeric, 0, 0),
        )
    }

    fn accumulate(&mut self, value: &Value) -> Result<()> {
        if let Some(v) = numeric_input("MEAN", value)? {
            self.sum += v;
            self.count += 1;
        }
        Ok(())
    }

    fn result(&self) -> Value {
        if self.count == 0 {
            Value::null_unknown()
        } else {
            Value::Float(self.sum / self.count as f64)
        }
    }

    fn reset(&mut self) {
        self.sum = 0.0;
        self.count = 0;
    }

    fn clone_box(&self) -> Box<dyn AggregateFunction> {
        Box::new(MeanFunction::default())
    }
}
