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

//! Statistical aggregate functions: STD, VAR, MEDIAN

use crate::core::{Error, Result, Value};
use crate::functions::{
    AggregateFunction, FunctionDataType, FunctionInfo, FunctionSignature, FunctionType,
};

use super::numeric_input;

/// Default delta degrees of freedom: the sample (N - 1) definition
const DEFAULT_DDOF: u8 = 1;

fn ddof_option(function: &str, options: &[Value]) -> Result<u8> {
    match options.first() {
        None => Ok(DEFAULT_DDOF),
        Some(Value::Integer(d)) if (0..=u8::MAX as i64).contains(d) => Ok(*d as u8),
        Some(other) => Err(Error::invalid_argument(format!(
            "{} expects a non-negative integer ddof, got {}",
            function, other
        ))),
    }
}

/// Variance with `n - ddof` as denominator, None when `n <= ddof`
fn variance(values: &[f64], ddof: u8) -> Option<f64> {
    let n = values.len();
    if n <= ddof as usize {
        return None;
    }
    let mean = values.iter().sum::<f64>() / n as f64;
    let squares = values.iter().map(|x| (x - mean).powi(2)).sum::<f64>();
    Some(squares / (n - ddof as usize) as f64)
}

// ============================================================================
// VAR - Variance
// ============================================================================

/// VAR aggregate function
///
/// Computes the variance of all non-NULL values.
/// Formula: sum((x - mean)^2) / (N - ddof)
/// ddof defaults to 1 (Bessel's correction). A group with N <= ddof yields NULL.
pub struct VarFunction {
    values: Vec<f64>,
    ddof: u8,
}

impl Default for VarFunction {
    fn default() -> Self {
        Self {
            values: Vec::new(),
            ddof: DEFAULT_DDOF,
        }
    }
}

impl AggregateFunction for VarFunction {
    fn name(&self) -> &str {
        "VAR"
    }

    fn info(&self) -> FunctionInfo {
        FunctionInfo::new(
            "VAR",
            FunctionType::Aggregate,
            "Returns the variance of non-NULL values (sample variance by default)",
            FunctionSignature::new(FunctionDataType::Float, FunctionDataType::Numeric, 0, 1),
        )
    }

    fn configure(&mut self, options: &[Value]) -> Result<()> {
        self.ddof = ddof_option("VAR", options)?;
        Ok(())
    }

    fn accumulate(&mut self, value: &Value) -> Result<()> {
        if let Some(f) = numeric_input("VAR", value)? {
            self.values.push(f);
        }
        Ok(())
    }

    fn result(&self) -> Value {
        variance(&self.values, self.ddof)
            .map(Value::Float)
            .unwrap_or_else(Value::null_unknown)
    }

    fn reset(&mut self) {
        self.values.clear();
    }

    fn clone_box(&self) -> Box<dyn AggregateFunction> {
        Box::new(VarFunction {
            values: Vec::new(),
            ddof: self.ddof,
        })
    }
}

// ============================================================================
// STD - Standard Deviation
// ============================================================================

/// STD aggregate function
///
/// Computes the standard deviation of all non-NULL values, the square root
/// of [`VarFunction`] with the same ddof.
#[derive(Default)]
pub struct StdFunction {
    inner: VarFunction,
}

impl AggregateFunction for StdFunction {
    fn name(&self) -> &str {
        "STD"
    }

    fn info(&self) -> FunctionInfo {
        FunctionInfo::new(
            "STD",
            FunctionType::Aggregate,
            "Returns the standard deviation of non-NULL values (sample by default)",
            FunctionSignature::new(FunctionDataType::Float, FunctionDataType::Numeric, 0, 1),
        )
    }

    fn configure(&mut self, options: &[Value]) -> Result<()> {
        self.inner.ddof = ddof_option("STD", options)?;
        Ok(())
    }

    fn accumulate(&mut self, value: &Value) -> Result<()> {
        if let Some(f) = numeric_input("STD", value)? {
            self.inner.values.push(f);
        }
        Ok(())
    }

    fn result(&self) -> Value {
        variance(&self.inner.values, self.inner.ddof)
            .map(|v| Value::Float(v.sqrt()))
            .unwrap_or_else(Value::null_unknown)
    }

    fn reset(&mut self) {
        self.inner.reset();
    }

    fn clone_box(&self) -> Box<dyn AggregateFunction> {
        Box::new(StdFunction {
            inner: VarFunction {
                values: Vec::new(),
                ddof: self.inner.ddof,
            },
        })
    }
}

// ============================================================================
// MEDIAN
// ============================================================================

/// MEDIAN aggregate function
///
/// Returns the median (middle value) of all non-NULL values.
/// For even number of values, returns the average of the two middle values.
#[derive(Default)]
pub struct MedianFunction {
    values: Vec<f64>,
}

impl AggregateFunction for MedianFunction {
    fn name(&self) -> &str {
        "MEDIAN"
    }

    fn info(&self) -> FunctionInfo {
        FunctionInfo::new(
            "MEDIAN",
            FunctionType::Aggregate,
            "Returns the median (middle value) of non-NULL values",
            FunctionSignature::new(FunctionDataType::Float, FunctionDataType::Numeric, 0, 0),
        )
    }

    fn accumulate(&mut self, value: &Value) -> Result<()> {
        if let Some(f) = numeric_input("MEDIAN", value)? {
            self.values.push(f);
        }
        Ok(())
    }

    fn result(&self) -> Value {
        if self.values.is_empty() {
            return Value::null_unknown();
        }

        let mut sorted = self.values.clone();
        sorted.sort_by(f64::total_cmp);

        let n = sorted.len();
        let median = if n % 2 == 0 {
            (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
        } else {
            sorted[n / 2]
        };

        Value::Float(median)
    }

    fn reset(&mut self) {
        self.values.clear();
    }

    fn clone_box(&self) -> Box<dyn AggregateFunction> {
        Box::new(MedianFunction::default())
    }
}
