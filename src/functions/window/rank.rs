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

//! RANK transform

use std::fmt;
use std::str::FromStr;

use crate::core::{Error, Result, Value};
use crate::functions::{
    FunctionDataType, FunctionInfo, FunctionSignature, FunctionType, TransformFunction,
};

/// How tied values are ranked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RankMethod {
    /// Ties share the lowest rank, leaving gaps afterwards (SQL RANK)
    #[default]
    Min,
    /// Ties share the highest rank
    Max,
    /// Ties share a rank and the next distinct value follows without gaps (SQL DENSE_RANK)
    Dense,
    /// Ties are broken by position within the group
    Ordinal,
    /// Ties share the mean of the ranks they span (FLOAT result)
    Average,
}

impl fmt::Display for RankMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RankMethod::Min => "min",
            RankMethod::Max => "max",
            RankMethod::Dense => "dense",
            RankMethod::Ordinal => "ordinal",
            RankMethod::Average => "average",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for RankMethod {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "min" => Ok(RankMethod::Min),
            "max" => Ok(RankMethod::Max),
            "dense" => Ok(RankMethod::Dense),
            "ordinal" => Ok(RankMethod::Ordinal),
            "average" => Ok(RankMethod::Average),
            _ => Err(Error::invalid_argument(format!("unknown rank method: {}", s))),
        }
    }
}

/// RANK transform
///
/// Ranks each value within its group in ascending order, starting at 1.
/// NULL values are not ranked and yield NULL.
///
/// Example with the default method: `[10, 20, 10, 30]` ranks as `[1, 3, 1, 4]`.
#[derive(Default)]
pub struct RankFunction {
    method: RankMethod,
}

impl RankFunction {
    /// Create a new RANK transform with the given tie method
    pub fn new(method: RankMethod) -> Self {
        Self { method }
    }
}

impl TransformFunction for RankFunction {
    fn name(&self) -> &str {
        "RANK"
    }

    fn info(&self) -> FunctionInfo {
        FunctionInfo::new(
            "RANK",
            FunctionType::Transform,
            "Returns the rank of each value within the group",
            FunctionSignature::new(FunctionDataType::Integer, FunctionDataType::Any, 0, 1),
        )
    }

    fn configure(&mut self, options: &[Value]) -> Result<()> {
        self.method = match options.first() {
            None => RankMethod::default(),
            Some(Value::Text(method)) => method.parse()?,
            Some(other) => {
                return Err(Error::invalid_argument(format!(
                    "RANK method must be text, got {}",
                    other.data_type()
                )))
            }
        };
        Ok(())
    }

    fn transform(&self, partition: &[Value]) -> Result<Vec<Value>> {
        let mut order: Vec<usize> = Vec::with_capacity(partition.len());
        for (i, value) in partition.iter().enumerate() {
            if value.is_null() {
                continue;
            }
            if !value.data_type().is_orderable() {
                return Err(Error::type_mismatch("RANK", value.data_type()));
            }
            order.push(i);
        }

        // Reject mixed types up front; the sort itself relies on the total order
        if let Some(&first) = order.first() {
            for &i in &order[1..] {
                partition[i].compare(&partition[first])?;
            }
        }
        order.sort_by(|&a, &b| partition[a].cmp(&partition[b]));

        let mut out = vec![Value::null_unknown(); partition.len()];
        let mut dense = 0i64;
        let mut start = 0usize;
        while start < order.len() {
            let mut end = start + 1;
            while end < order.len() && partition[order[end]] == partition[order[start]] {
                end += 1;
            }
            dense += 1;
            for (offset, &row) in order[start..end].iter().enumerate() {
                out[row] = match self.method {
                    RankMethod::Min => Value::Integer(start as i64 + 1),
                    RankMethod::Max => Value::Integer(end as i64),
                    RankMethod::Dense => Value::Integer(dense),
                    RankMethod::Ordinal => Value::Integer((start + offset) as i64 + 1),
                    RankMethod::Average => Value::Float((start + 1 + end) as f64 / 2.0),
                };
            }
            start = end;
        }
        Ok(out)
    }

    fn clone_box(&self) -> Box<dyn TransformFunction> {
        Box::new(RankFunction::new(self.method))
    }
}
