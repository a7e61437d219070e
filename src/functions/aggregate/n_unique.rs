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

//! N_UNIQUE aggregate function

use crate::core::{Result, Value};
use crate::functions::{
    AggregateFunction, FunctionDataType, FunctionInfo, FunctionSignature, FunctionType,
};

use super::DistinctTracker;

/// N_UNIQUE aggregate function
///
/// Returns the number of distinct values in the group, NULL counted once.
#[derive(Default)]
pub struct NUniqueFunction {
    tracker: DistinctTracker,
}

impl AggregateFunction for NUniqueFunction {
    fn name(&self) -> &str {
        "N_UNIQUE"
    }

    fn info(&self) -> FunctionInfo {
        FunctionInfo::new(
            "N_UNIQUE",
            FunctionType::Aggregate,
            "Returns the number of distinct values in the group",
            FunctionSignature::new(FunctionDataType::Integer, FunctionDataType::Any, 0, 0),
        )
    }

    fn accumulate(&mut self, value: &Value) -> Result<()> {
        self.tracker.check_and_add(value);
        Ok(())
    }

    fn result(&self) -> Value {
        Value::Integer(self.tracker.count() as i64)
    }

    fn reset(&mut self) {
        self.tracker.reset();
    }

    fn clone_box(&self) -> Box<dyn AggregateFunction> {
        Box::new(NUniqueFunction::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_n_unique() {
        let mut n = NUniqueFunction::default();
        for v in [
            Value::Integer(1),
            Value::Integer(1),
            Value::Float(f64::NAN),
            Value::Float(f64::NAN),
            Value::null_unknown(),
        ] {
            n.accumulate(&v).unwrap();
        }
        assert_eq!(n.result(), Value::Integer(3));
    }
}
