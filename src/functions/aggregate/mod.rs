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

//! Aggregate Functions
//!
//! This module provides the aggregate kernels a window expression can
//! broadcast back over its group:
//!
//! - [`CountFunction`] - COUNT(column), non-NULL values
//! - [`SumFunction`] - SUM(column)
//! - [`MeanFunction`] - MEAN(column)
//! - [`MinFunction`] - MIN(column)
//! - [`MaxFunction`] - MAX(column)
//! - [`FirstFunction`] - FIRST(column)
//! - [`LastFunction`] - LAST(column)
//! - [`NUniqueFunction`] - N_UNIQUE(column)
//! - [`StdFunction`] - STD(column, ddof)
//! - [`VarFunction`] - VAR(column, ddof)
//! - [`MedianFunction`] - MEDIAN(column)
//! - [`QuantileFunction`] - QUANTILE(column, p)

mod count;
mod first;
mod last;
mod max;
mod mean;
mod min;
mod n_unique;
mod quantile;
mod statistics;
mod sum;

pub use count::CountFunction;
pub use first::FirstFunction;
pub use last::LastFunction;
pub use max::MaxFunction;
pub use mean::MeanFunction;
pub use min::MinFunction;
pub use n_unique::NUniqueFunction;
pub use quantile::{QuantileFunction, QuantileInterpolation};
pub use statistics::{MedianFunction, StdFunction, VarFunction};
pub use sum::SumFunction;

use ahash::AHashSet;

use crate::core::{Error, Result, Value};

/// Extract the numeric value of an input for a numeric kernel
///
/// NULL yields `Ok(None)` and is skipped by the caller. NaN is returned as is.
pub(crate) fn numeric_input(function: &str, value: &Value) -> Result<Option<f64>> {
    match value {
        Value::Null(_) => Ok(None),
        Value::Integer(i) => Ok(Some(*i as f64)),
        Value::Float(f) => Ok(Some(*f)),
        other => Err(Error::type_mismatch(function, other.data_type())),
    }
}

/// Helper struct for tracking distinct values
#[derive(Default, Debug)]
pub struct DistinctTracker {
    seen: AHashSet<Value>,
}

impl DistinctTracker {
    /// Check if a value has been seen before (returns true if new)
    pub fn check_and_add(&mut self, value: &Value) -> bool {
        if self.seen.contains(value) {
            false
        } else {
            self.seen.insert(value.clone())
        }
    }

    /// Get the count of distinct values
    pub fn count(&self) -> usize {
        self.seen.len()
    }

    /// Reset the tracker
    pub fn reset(&mut self) {
        self.seen.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distinct_tracker() {
        let mut tracker = DistinctTracker::default();

        assert!(tracker.check_and_add(&Value::Integer(1)));
        assert!(!tracker.check_and_add(&Value::Integer(1))); // duplicate
        assert!(!tracker.check_and_add(&Value::Float(1.0))); // equal across numeric types
        assert!(tracker.check_and_add(&Value::Integer(2)));
        assert!(tracker.check_and_add(&Value::text("hello")));
        assert!(tracker.check_and_add(&Value::null_unknown()));

        assert_eq!(tracker.count(), 4);

        tracker.reset();
        assert_eq!(tracker.count(), 0);
    }

    #[test]
    fn test_numeric_input() {
        assert_eq!(numeric_input("MEAN", &Value::Integer(2)).unwrap(), Some(2.0));
        assert_eq!(numeric_input("MEAN", &Value::null_unknown()).unwrap(), None);
        assert!(numeric_input("MEAN", &Value::Float(f64::NAN))
            .unwrap()
            .unwrap()
            .is_nan());
        assert!(numeric_input("MEAN", &Value::text("a"))
            .unwrap_err()
            .is_type_error());
    }
}
