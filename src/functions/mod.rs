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

//! Function System
//!
//! This module provides the per-group kernels the window engine drives:
//!
//! - [`AggregateFunction`] - Aggregate kernels (COUNT, MEAN, STD, QUANTILE, etc.)
//!   that collapse a group to one value
//! - [`TransformFunction`] - Sequence transforms (SHIFT, REVERSE, CUM_SUM, etc.)
//!   that map a group to a sequence of the same length
//! - [`FunctionRegistry`] - Registry for function lookup by name

pub mod aggregate;
pub mod registry;
pub mod window;

use crate::core::{Error, Result, Value};

/// Function type classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FunctionType {
    /// Aggregate function (collapses a group to one value)
    Aggregate,
    /// Transform function (one output per input row)
    Transform,
}

/// Data type for function signatures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FunctionDataType {
    /// Any type
    Any,
    /// Integer type
    Integer,
    /// Float type
    Float,
    /// Integer or float
    Numeric,
    /// Same type as the input
    SameAsInput,
}

/// Function signature information
///
/// `min_options`/`max_options` bound the number of extra options a function
/// accepts besides its input sequence (e.g. the probability of QUANTILE).
#[derive(Debug, Clone)]
pub struct FunctionSignature {
    /// Return type
    pub return_type: FunctionDataType,
    /// Accepted input type
    pub input_type: FunctionDataType,
    /// Minimum number of options
    pub min_options: usize,
    /// Maximum number of options
    pub max_options: usize,
}

impl FunctionSignature {
    /// Create a new function signature
    pub fn new(
        return_type: FunctionDataType,
        input_type: FunctionDataType,
        min_options: usize,
        max_options: usize,
    ) -> Self {
        Self {
            return_type,
            input_type,
            min_options,
            max_options,
        }
    }

    /// Validate option count
    pub fn validate_option_count(&self, count: usize) -> Result<()> {
        if count < self.min_options {
            return Err(Error::invalid_argument(format!(
                "expected at least {} options, got {}",
                self.min_options, count
            )));
        }
        if count > self.max_options {
            return Err(Error::invalid_argument(format!(
                "expected at most {} options, got {}",
                self.max_options, count
            )));
        }
        Ok(())
    }
}

/// Function information
#[derive(Debug, Clone)]
pub struct FunctionInfo {
    /// Function name
    pub name: String,
    /// Function type
    pub function_type: FunctionType,
    /// Description
    pub description: String,
    /// Signature
    pub signature: FunctionSignature,
}

impl FunctionInfo {
    /// Create a new function info
    pub fn new(
        name: impl Into<String>,
        function_type: FunctionType,
        description: impl Into<String>,
        signature: FunctionSignature,
    ) -> Self {
        Self {
            name: name.into(),
            function_type,
            description: description.into(),
            signature,
        }
    }
}

/// Trait for aggregate functions
///
/// An aggregate consumes the values of one group in group order and yields a
/// single value. Kernels must accept empty and single-value groups and return
/// NULL where the statistic is undefined.
pub trait AggregateFunction: Send + Sync {
    /// Get the function name
    fn name(&self) -> &str;

    /// Get function information
    fn info(&self) -> FunctionInfo;

    /// Configure the function with its options
    ///
    /// Called once before accumulation. QUANTILE(p) receives `&[Value::Float(p)]`.
    /// Default implementation ignores options.
    fn configure(&mut self, _options: &[Value]) -> Result<()> {
        Ok(())
    }

    /// Accumulate a value into the aggregate
    ///
    /// Returns `TypeMismatch` when the value's type is not supported.
    fn accumulate(&mut self, value: &Value) -> Result<()>;

    /// Get the final result
    fn result(&self) -> Value;

    /// Reset the aggregate state
    fn reset(&mut self);

    /// Clone the function (including its configuration) into a new, empty instance
    fn clone_box(&self) -> Box<dyn AggregateFunction>;
}

/// Trait for transform functions
///
/// A transform maps the values of one group, in group order, to a sequence
/// of exactly the same length.
pub trait TransformFunction: Send + Sync {
    /// Get the function name
    fn name(&self) -> &str;

    /// Get function information
    fn info(&self) -> FunctionInfo;

    /// Configure the function with its options
    fn configure(&mut self, _options: &[Value]) -> Result<()> {
        Ok(())
    }

    /// Transform one group
    fn transform(&self, partition: &[Value]) -> Result<Vec<Value>>;

    /// Clone the function into a new instance
    fn clone_box(&self) -> Box<dyn TransformFunction>;
}

/// Reads an integer option, `default` when absent
pub(crate) fn integer_option(function: &str, options: &[Value], default: i64) -> Result<i64> {
    match options.first() {
        None => Ok(default),
        Some(Value::Integer(n)) => Ok(*n),
        Some(other) => Err(Error::invalid_argument(format!(
            "{} expects an integer option, got {}",
            function,
            other.data_type()
        ))),
    }
}

// Re-export main types
pub use aggregate::{
    CountFunction, FirstFunction, LastFunction, MaxFunction, MeanFunction, MedianFunction,
    MinFunction, NUniqueFunction, QuantileFunction, QuantileInterpolation, StdFunction, SumFunction,
    VarFunction,
};
pub use registry::{global_registry, FunctionRegistry};
pub use window::{
    CumCountFunction, CumMaxFunction, CumMinFunction, CumSumFunction, DiffFunction, RankFunction,
    RankMethod, ReverseFunction, ShiftFunction,
};
