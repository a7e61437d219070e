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

//! SHIFT transform

use crate::core::{Result, Value};
use crate::functions::{
    integer_option, FunctionDataType, FunctionInfo, FunctionSignature, FunctionType,
    TransformFunction,
};

/// SHIFT transform
///
/// Moves every value of the group `offset` positions later (or earlier for a
/// negative offset). Vacated positions become NULL. Values are copied as
/// opaque data, NaN included.
pub struct ShiftFunction {
    offset: i64,
}

impl Default for ShiftFunction {
    fn default() -> Self {
        Self { offset: 1 }
    }
}

impl ShiftFunction {
    /// Create a new SHIFT transform with the given offset
    pub fn new(offset: i64) -> Self {
        Self { offset }
    }

    /// Configured offset
    pub fn offset(&self) -> i64 {
        self.offset
    }
}

impl TransformFunction for ShiftFunction {
    fn name(&self) -> &str {
        "SHIFT"
    }

    fn info(&self) -> FunctionInfo {
        FunctionInfo::new(
            "SHIFT",
            FunctionType::Transform,
            "Shifts values within the group by offset positions, filling with NULL",
            FunctionSignature::new(FunctionDataType::SameAsInput, FunctionDataType::Any, 0, 1),
        )
    }

    fn configure(&mut self, options: &[Value]) -> Result<()> {
        self.offset = integer_option("SHIFT", options, 1)?;
        Ok(())
    }

    fn transform(&self, partition: &[Value]) -> Result<Vec<Value>> {
        let len = partition.len();
        let fill = Value::null(
            partition
                .iter()
                .find(|v| !v.is_null())
                .map(Value::data_type)
                .unwrap_or_default(),
        );

        let distance = self.offset.unsigned_abs().min(len as u64) as usize;
        let mut out = Vec::with_capacity(len);
        if self.offset >= 0 {
            out.extend(std::iter::repeat(fill).take(distance));
            out.extend_from_slice(&partition[..len - distance]);
        } else {
            out.extend_from_slice(&partition[distance..]);
            out.extend(std::iter::repeat(fill).take(distance));
        }
        Ok(out)
    }

    fn clone_box(&self) -> Box<dyn TransformFunction> {
        Box::new(ShiftFunction::new(self.offset))
    }
}
