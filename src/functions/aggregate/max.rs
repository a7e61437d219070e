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

//! MAX aggregate function

use std::cmp::Ordering;

use crate::core::{Error, Result, Value};
use crate::functions::{
    AggregateFunction, FunctionDataType, FunctionInfo, FunctionSignature, FunctionType,
};

/// MAX aggregate function
///
/// Returns the maximum of all non-NULL values in the group.
/// Works with numbers, text and booleans; NaN orders after every number.
#[derive(Default)]
pub struct MaxFunction {
    max_value: Option<Value>,
}

impl AggregateFunction for MaxFunction {
    fn name(&self) -> &str {
        "MAX"
    }

    fn info(&self) -> FunctionInfo {
        FunctionInfo::new(
            "MAX",
            FunctionType::Aggregate,
            "Returns the maximum of all non-NULL values in the group",
            FunctionSignature::new(FunctionDataType::SameAsInput, FunctionDataType::Any, 0, 0),
        )
    }

    fn accumulate(&mut self, value: &Value) -> Result<()> {
        if value.is_null() {
            return Ok(());
        }
        if !value.data_type().is_orderable() {
            return Err(Error::type_mismatch("MAX", value.data_type()));
        }

        match &self.max_value {
            None => self.max_value = Some(value.clone()),
            Some(current) => {
                if value.compare(current)? == Ordering::Greater {
                    self.max_value = Some(value.clone());
                }
            }
        }
        Ok(())
    }

    fn result(&self) -> Value {
        self.max_value.clone().unwrap_or_else(Value::null_unknown)
    }

    fn reset(&mut self) {
        self.max_value = None;
    }

    fn clone_box(&self) -> Box<dyn AggregateFunction> {
        Box::new(MaxFunction::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_max_numbers() {
        let mut max = MaxFunction::default();
        for v in [3, 1, 2] {
            max.accumulate(&Value::Integer(v)).unwrap();
        }
        assert_eq!(max.result(), Value::Integer(3));
    }

    #[test]
    fn test_max_nan_is_largest() {
        let mut max = MaxFunction::default();
        max.accumulate(&Value::Float(1.0)).unwrap();
        max.accumulate(&Value::Float(f64::NAN)).unwrap();
        max.accumulate(&Value::Float(2.0)).unwrap();
        assert!(max.result().is_nan());
    }

    #[test]
    fn test_max_reset() {
        let mut max = MaxFunction::default();
        max.accumulate(&Value::Integer(1)).unwrap();
        max.reset();
        assert!(max.result().is_null());
    }
}
