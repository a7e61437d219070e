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

//! Executor configuration

/// Minimum number of groups before per-group evaluation fans out
pub const DEFAULT_MIN_GROUPS_FOR_PARALLEL: usize = 10;
/// Minimum number of rows before per-group evaluation fans out
pub const DEFAULT_MIN_ROWS_FOR_PARALLEL: usize = 1000;

/// Configuration for window evaluation
///
/// Parallel paths are only taken when the crate is built with the
/// `parallel` feature; otherwise every evaluation is sequential.
#[derive(Clone, Debug)]
pub struct ExecutorConfig {
    /// Whether parallel evaluation is enabled
    pub parallel: bool,
    /// Minimum groups to evaluate groups in parallel
    pub min_groups_for_parallel: usize,
    /// Minimum table rows to evaluate groups in parallel
    pub min_rows_for_parallel: usize,
    /// Evaluate the sibling expressions of one batch in parallel
    pub parallel_batch: bool,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            parallel: true,
            min_groups_for_parallel: DEFAULT_MIN_GROUPS_FOR_PARALLEL,
            min_rows_for_parallel: DEFAULT_MIN_ROWS_FOR_PARALLEL,
            parallel_batch: true,
        }
    }
}

impl ExecutorConfig {
    /// Create a new config with custom settings
    pub fn new(
        parallel: bool,
        min_groups_for_parallel: usize,
        min_rows_for_parallel: usize,
        parallel_batch: bool,
    ) -> Self {
        Self {
            parallel,
            min_groups_for_parallel,
            min_rows_for_parallel,
            parallel_batch,
        }
    }

    /// Create a config with parallel evaluation disabled
    pub fn sequential() -> Self {
        Self {
            parallel: false,
            parallel_batch: false,
            ..Default::default()
        }
    }

    /// Create a config that parallelizes regardless of input size
    pub fn always_parallel() -> Self {
        Self {
            min_groups_for_parallel: 0,
            min_rows_for_parallel: 0,
            ..Default::default()
        }
    }

    /// Set the group threshold
    pub fn with_min_groups(mut self, groups: usize) -> Self {
        self.min_groups_for_parallel = groups;
        self
    }

    /// Set the row threshold
    pub fn with_min_rows(mut self, rows: usize) -> Self {
        self.min_rows_for_parallel = rows;
        self
    }

    /// Enable or disable parallel evaluation of sibling expressions
    pub fn with_parallel_batch(mut self, enabled: bool) -> Self {
        self.parallel_batch = enabled;
        self
    }

    /// Check if groups should be evaluated in parallel
    #[inline]
    pub fn should_parallel_groups(&self, group_count: usize, row_count: usize) -> bool {
        cfg!(feature = "parallel")
            && self.parallel
            && group_count >= self.min_groups_for_parallel
            && row_count >= self.min_rows_for_parallel
    }

    /// Check if the expressions of a batch should be evaluated in parallel
    #[inline]
    pub fn should_parallel_batch(&self, expression_count: usize) -> bool {
        cfg!(feature = "parallel") && self.parallel && self.parallel_batch && expression_count > 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_thresholds() {
        let config = ExecutorConfig::default();
        assert_eq!(config.min_groups_for_parallel, 10);
        assert_eq!(config.min_rows_for_parallel, 1000);
        assert!(!config.should_parallel_groups(5, 5000));
        assert!(!config.should_parallel_groups(50, 500));
        assert_eq!(
            config.should_parallel_groups(50, 5000),
            cfg!(feature = "parallel")
        );
    }

    #[test]
    fn test_sequential() {
        let config = ExecutorConfig::sequential();
        assert!(!config.should_parallel_groups(1_000, 1_000_000));
        assert!(!config.should_parallel_batch(8));
    }

    #[test]
    fn test_builders() {
        let config = ExecutorConfig::default()
            .with_min_groups(2)
            .with_min_rows(4)
            .with_parallel_batch(false);
        assert_eq!(config.min_groups_for_parallel, 2);
        assert_eq!(config.min_rows_for_parallel, 4);
        assert!(!config.should_parallel_batch(3));
        assert_eq!(
            ExecutorConfig::always_parallel().should_parallel_groups(1, 1),
            cfg!(feature = "parallel")
        );
    }
}
