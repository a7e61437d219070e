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

//! QUANTILE aggregate function

use std::fmt;
use std::str::FromStr;

use crate::core::{Error, Result, Value};
use crate::functions::{
    AggregateFunction, FunctionDataType, FunctionInfo, FunctionSignature, FunctionType,
};

use super::numeric_input;

/// How a quantile between two order statistics is resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QuantileInterpolation {
    /// Order statistic closest to `p * (n - 1)`, ties rounded away from zero
    #[default]
    Nearest,
    /// Linear interpolation between the two surrounding order statistics
    Linear,
    /// Lower surrounding order statistic
    Lower,
    /// Higher surrounding order statistic
    Higher,
    /// Mean of the two surrounding order statistics
    Midpoint,
}

impl fmt::Display for QuantileInterpolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            QuantileInterpolation::Nearest => "nearest",
            QuantileInterpolation::Linear => "linear",
            QuantileInterpolation::Lower => "lower",
            QuantileInterpolation::Higher => "higher",
            QuantileInterpolation::Midpoint => "midpoint",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for QuantileInterpolation {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "nearest" => Ok(QuantileInterpolation::Nearest),
            "linear" => Ok(QuantileInterpolation::Linear),
            "lower" => Ok(QuantileInterpolation::Lower),
            "higher" => Ok(QuantileInterpolation::Higher),
            "midpoint" => Ok(QuantileInterpolation::Midpoint),
            _ => Err(Error::invalid_argument(format!(
                "unknown quantile interpolation: {}",
                s
            ))),
        }
    }
}

/// QUANTILE aggregate function
///
/// Options: `[p]` or `[p, interpolation]`. `p` must lie in [0, 1]; anything
/// else (NaN included) is `InvalidQuantile`, never clamped.
pub struct QuantileFunction {
    values: Vec<f64>,
    quantile: f64,
    interpolation: QuantileInterpolation,
}

impl Default for QuantileFunction {
    fn default() -> Self {
        Self {
            values: Vec::new(),
            quantile: 0.5,
            interpolation: QuantileInterpolation::default(),
        }
    }
}

impl QuantileFunction {
    /// Create a configured quantile kernel
    pub fn new(quantile: f64, interpolation: QuantileInterpolation) -> Result<Self> {
        validate_quantile(quantile)?;
        Ok(Self {
            values: Vec::new(),
            quantile,
            interpolation,
        })
    }
}

fn validate_quantile(p: f64) -> Result<()> {
    if (0.0..=1.0).contains(&p) {
        Ok(())
    } else {
        Err(Error::InvalidQuantile(p))
    }
}

/// Quantile of already sorted values
pub(crate) fn sorted_quantile(
    sorted: &[f64],
    p: f64,
    interpolation: QuantileInterpolation,
) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let position = p * (sorted.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let value = match interpolation {
        QuantileInterpolation::Nearest => sorted[position.round() as usize],
        QuantileInterpolation::Lower => sorted[lower],
        QuantileInterpolation::Higher => sorted[upper],
        QuantileInterpolation::Midpoint => (sorted[lower] + sorted[upper]) / 2.0,
        QuantileInterpolation::Linear => {
            if lower == upper {
                sorted[lower]
            } else {
                sorted[lower] + (sorted[upper] - sorted[lower]) * (position - lower as f64)
            }
        }
    };
    Some(value)
}

impl AggregateFunction for QuantileFunction {
    fn name(&self) -> &str {
        "QUANTILE"
    }

    fn info(&self) -> FunctionInfo {
        FunctionInfo::new(
            "QUANTILE",
            FunctionType::Aggregate,
            "Returns the p-th quantile of non-NULL values",
            FunctionSignature::new(FunctionDataType::Float, FunctionDataType::Numeric, 1, 2),
        )
    }

    fn configure(&mut self, options: &[Value]) -> Result<()> {
        let quantile = match options.first() {
            Some(Value::Float(p)) => *p,
            Some(Value::Integer(p)) => *p as f64,
            Some(other) => {
                return Err(Error::invalid_argument(format!(
                    "QUANTILE expects a numeric probability, got {}",
                    other.data_type()
                )))
            }
            None => return Err(Error::invalid_argument("QUANTILE requires a probability")),
        };
        validate_quantile(quantile)?;

        let interpolation = match options.get(1) {
            None => QuantileInterpolation::default(),
            Some(Value::Text(method)) => method.parse()?,
            Some(other) => {
                return Err(Error::invalid_argument(format!(
                    "QUANTILE interpolation must be text, got {}",
                    other.data_type()
                )))
            }
        };

        self.quantile = quantile;
        self.interpolation = interpolation;
        Ok(())
    }

    fn accumulate(&mut self, value: &Value) -> Result<()> {
        if let Some(f) = numeric_input("QUANTILE", value)? {
            self.values.push(f);
        }
        Ok(())
    }

    fn result(&self) -> Value {
        let mut sorted = self.values.clone();
        sorted.sort_by(f64::total_cmp);
        sorted_quantile(&sorted, self.quantile, self.interpolation)
            .map(Value::Float)
            .unwrap_or_else(Value::null_unknown)
    }

    fn reset(&mut self) {
        self.values.clear();
    }

    fn clone_box(&self) -> Box<dyn AggregateFunction> {
        Box::new(QuantileFunction {
            values: Vec::new(),
            quantile: self.quantile,
            interpolation: self.interpolation,
        })
    }
}
