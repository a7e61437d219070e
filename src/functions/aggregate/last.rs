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

//! LAST aggregate function

use crate::core::{Result, Value};
use crate::functions::{
    AggregateFunction, FunctionDataType, FunctionInfo, FunctionSignature, FunctionType,
};

/// LAST aggregate function
///
/// Returns the last value of the group in group order. NULL is a value like any other
/// here, so a group starting (or ending) with NULL yields NULL.
#[derive(Default)]
pub struct LastFunction {
    value: Option<Value>,
}

impl AggregateFunction for LastFunction {
    fn name(&self) -> &str {
        "LAST"
    }

    fn info(&self) -> FunctionInfo {
        FunctionInfo::new(
            "LAST",
            FunctionType::Aggregate,
            "Returns the last value of the group",
            FunctionSignature::new(FunctionDataType::SameAsInput, FunctionDataType::Any, 0, 0),
        )
    }

    fn accumulate(&mut self, value: &Value) -> Result<()> {
        self.value = Some(value.clone());
        Ok(())
    }

    fn result(&self) -> Value {
        self.value.clone().unwrap_or_else(Value::null_unknown)
    }

    fn reset(&mut self) {
        self.value = None;
    }

    fn clone_box(&self) -> Box<dyn AggregateFunction> {
        Box::new(LastFunction::default())
    }
}
