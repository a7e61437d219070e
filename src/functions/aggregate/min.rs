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

//! MIN aggregate function

use std::cmp::Ordering;

use crate::core::{Error, Result, Value};
use crate::functions::{
    AggregateFunction, FunctionDataType, FunctionInfo, FunctionSignature, FunctionType,
};

/// MIN aggregate function
///
/// Returns the minimum of all non-NULL values in the group.
/// Works with numbers, text and booleans; NaN orders after every number.
#[derive(Default)]
pub struct MinFunction {
    min_value: Option<Value>,
}

impl AggregateFunction for MinFunction {
    fn name(&self) -> &str {
        "MIN"
    }

    fn info(&self) -> FunctionInfo {
        FunctionInfo::new(
            "MIN",
            FunctionType::Aggregate,
            "Returns the minimum of all non-NULL values in the group",
            FunctionSignature::new(FunctionDataType::SameAsInput, FunctionDataType::Any, 0, 0),
        )
    }

    fn accumulate(&mut self, value: &Value) -> Result<()> {
        if value.is_null() {
            return Ok(());
        }
        if !value.data_type().is_orderable() {
            return Err(Error::type_mismatch("MIN", value.data_type()));
        }

        match &self.min_value {
            None => self.min_value = Some(value.clone()),
            Some(current) => {
                if value.compare(current)? == Ordering::Less {
                    self.min_value = Some(value.clone());
                }
            }
        }
        Ok(())
    }

    fn result(&self) -> Value {
        self.min_value.clone().unwrap_or_else(Value::null_unknown)
    }

    fn reset(&mut self) {
        self.min_value = None;
    }

    fn clone_box(&self) -> Box<dyn AggregateFunction> {
        Box::new(MinFunction::default())
    }
}
