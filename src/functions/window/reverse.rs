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

//! REVERSE transform

use crate::core::{Result, Value};
use crate::functions::{
    FunctionDataType, FunctionInfo, FunctionSignature, FunctionType, TransformFunction,
};

/// REVERSE transform
///
/// Returns the group's values in reverse order. Scattered back over the
/// group's row positions, each row keeps its position and receives the
/// value mirrored within its group.
#[derive(Default)]
pub struct ReverseFunction;

impl TransformFunction for ReverseFunction {
    fn name(&self) -> &str {
        "REVERSE"
    }

    fn info(&self) -> FunctionInfo {
        FunctionInfo::new(
            "REVERSE",
            FunctionType::Transform,
            "Reverses the order of values within the group",
            FunctionSignature::new(FunctionDataType::SameAsInput, FunctionDataType::Any, 0, 0),
        )
    }

    fn transform(&self, partition: &[Value]) -> Result<Vec<Value>> {
        Ok(partition.iter().rev().cloned().collect())
    }

    fn clone_box(&self) -> Box<dyn TransformFunction> {
        Box::new(ReverseFunction)
    }
}
