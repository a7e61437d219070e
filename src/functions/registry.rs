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

//! Function Registry
//!
//! This module provides the function registry for looking up the aggregate
//! and transform kernels a window expression names.

use std::sync::{Arc, OnceLock};

use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use crate::core::{Error, Result, Value};

/// Global function registry instance
static GLOBAL_REGISTRY: OnceLock<FunctionRegistry> = OnceLock::new();

/// Get the global function registry
#[inline]
pub fn global_registry() -> &'static FunctionRegistry {
    GLOBAL_REGISTRY.get_or_init(FunctionRegistry::new)
}

use super::aggregate::{
    CountFunction, FirstFunction, LastFunction, MaxFunction, MeanFunction, MedianFunction,
    MinFunction, NUniqueFunction, QuantileFunction, StdFunction, SumFunction, VarFunction,
};
use super::window::{
    CumCountFunction, CumMaxFunction, CumMinFunction, CumSumFunction, DiffFunction, RankFunction,
    ReverseFunction, ShiftFunction,
};
use super::{AggregateFunction, FunctionInfo, TransformFunction};

/// Type alias for aggregate function factory
type AggregateFnFactory = Arc<dyn Fn() -> Box<dyn AggregateFunction> + Send + Sync>;
/// Type alias for transform function factory
type TransformFnFactory = Arc<dyn Fn() -> Box<dyn TransformFunction> + Send + Sync>;

/// Function registry for aggregate and transform kernels
pub struct FunctionRegistry {
    /// Aggregate functions
    aggregate_functions: RwLock<FxHashMap<String, AggregateFnFactory>>,
    /// Transform functions
    transform_functions: RwLock<FxHashMap<String, TransformFnFactory>>,
    /// Function info cache
    function_info: RwLock<FxHashMap<String, FunctionInfo>>,
}

impl Default for FunctionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl FunctionRegistry {
    /// Create a new function registry with all built-in functions registered
    pub fn new() -> Self {
        let registry = Self {
            aggregate_functions: RwLock::new(FxHashMap::default()),
            transform_functions: RwLock::new(FxHashMap::default()),
            function_info: RwLock::new(FxHashMap::default()),
        };

        // Register built-in aggregate functions
        registry.register_aggregate::<CountFunction>();
        registry.register_aggregate::<SumFunction>();
        registry.register_aggregate::<MeanFunction>();
        registry.register_aggregate::<MinFunction>();
        registry.register_aggregate::<MaxFunction>();
        registry.register_aggregate::<FirstFunction>();
        registry.register_aggregate::<LastFunction>();
        registry.register_aggregate::<NUniqueFunction>();
        registry.register_aggregate::<StdFunction>();
        registry.register_aggregate::<VarFunction>();
        registry.register_aggregate::<MedianFunction>();
        registry.register_aggregate::<QuantileFunction>();

        // Register built-in transform functions
        registry.register_transform::<ShiftFunction>();
        registry.register_transform::<ReverseFunction>();
        registry.register_transform::<CumSumFunction>();
        registry.register_transform::<CumMinFunction>();
        registry.register_transform::<CumMaxFunction>();
        registry.register_transform::<CumCountFunction>();
        registry.register_transform::<DiffFunction>();
        registry.register_transform::<RankFunction>();

        registry
    }

    /// Register an aggregate function
    pub fn register_aggregate<F: AggregateFunction + Default + 'static>(&self) {
        let instance = F::default();
        let name = instance.name().to_uppercase();
        let info = instance.info();

        self.aggregate_functions
            .write()
            .insert(name.clone(), Arc::new(|| Box::new(F::default())));
        self.function_info.write().insert(name, info);
    }

    /// Register a transform function
    pub fn register_transform<F: TransformFunction + Default + 'static>(&self) {
        let instance = F::default();
        let name = instance.name().to_uppercase();
        let info = instance.info();

        self.transform_functions
            .write()
            .insert(name.clone(), Arc::new(|| Box::new(F::default())));
        self.function_info.write().insert(name, info);
    }

    /// Get a new, unconfigured instance of an aggregate function by name
    pub fn get_aggregate(&self, name: &str) -> Option<Box<dyn AggregateFunction>> {
        // Fast path - name is already uppercase
        let funcs = self.aggregate_functions.read();
        if let Some(f) = funcs.get(name) {
            return Some(f());
        }
        let upper = name.to_uppercase();
        funcs.get(&upper).map(|f| f())
    }

    /// Get a new, unconfigured instance of a transform function by name
    pub fn get_transform(&self, name: &str) -> Option<Box<dyn TransformFunction>> {
        let funcs = self.transform_functions.read();
        if let Some(f) = funcs.get(name) {
            return Some(f());
        }
        let upper = name.to_uppercase();
        funcs.get(&upper).map(|f| f())
    }

    /// Create an aggregate and configure it with `options`
    ///
    /// Fails with `FunctionNotFound` for unknown names and with the kernel's
    /// own error (e.g. `InvalidQuantile`) for rejected options.
    pub fn create_aggregate(
        &self,
        name: &str,
        options: &[Value],
    ) -> Result<Box<dyn AggregateFunction>> {
        let mut function = self
            .get_aggregate(name)
            .ok_or_else(|| Error::FunctionNotFound(name.to_string()))?;
        function
            .info()
            .signature
            .validate_option_count(options.len())?;
        function.configure(options)?;
        Ok(function)
    }

    /// Create a transform and configure it with `options`
    pub fn create_transform(
        &self,
        name: &str,
        options: &[Value],
    ) -> Result<Box<dyn TransformFunction>> {
        let mut function = self
            .get_transform(name)
            .ok_or_else(|| Error::FunctionNotFound(name.to_string()))?;
        function
            .info()
            .signature
            .validate_option_count(options.len())?;
        function.configure(options)?;
        Ok(function)
    }

    /// Check if a function name is an aggregate function
    pub fn is_aggregate(&self, name: &str) -> bool {
        let funcs = self.aggregate_functions.read();
        funcs.contains_key(name) || funcs.contains_key(&name.to_uppercase())
    }

    /// Check if a function name is a transform function
    pub fn is_transform(&self, name: &str) -> bool {
        let funcs = self.transform_functions.read();
        funcs.contains_key(name) || funcs.contains_key(&name.to_uppercase())
    }

    /// Check if a function exists
    pub fn exists(&self, name: &str) -> bool {
        self.is_aggregate(name) || self.is_transform(name)
    }

    /// Get function info by name
    pub fn get_info(&self, name: &str) -> Option<FunctionInfo> {
        self.function_info.read().get(&name.to_uppercase()).cloned()
    }

    /// List all aggregate function names
    pub fn list_aggregates(&self) -> Vec<String> {
        self.aggregate_functions.read().keys().cloned().collect()
    }

    /// List all transform function names
    pub fn list_transforms(&self) -> Vec<String> {
        self.transform_functions.read().keys().cloned().collect()
    }

    /// List all function names
    pub fn list_all(&self) -> Vec<String> {
        let mut names = Vec::new();
        names.extend(self.list_aggregates());
        names.extend(self.list_transforms());
        names.sort();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::functions::FunctionType;

    #[test]
    fn test_registry_new() {
        let registry = FunctionRegistry::new();
        for name in ["COUNT", "SUM", "MEAN", "MIN", "MAX", "STD", "VAR", "QUANTILE"] {
            assert!(registry.is_aggregate(name), "{} should be registered", name);
        }
        for name in ["SHIFT", "REVERSE", "CUM_SUM", "DIFF", "RANK"] {
            assert!(registry.is_transform(name), "{} should be registered", name);
        }
    }

    #[test]
    fn test_registry_case_insensitive() {
        let registry = FunctionRegistry::new();
        assert!(registry.is_aggregate("std"));
        assert!(registry.is_aggregate("Std"));
        assert!(registry.is_transform("shift"));
    }

    #[test]
    fn test_get_aggregate() {
        let registry = FunctionRegistry::new();
        let mean = registry.get_aggregate("MEAN");
        assert!(mean.is_some());
        assert_eq!(mean.unwrap().name(), "MEAN");
        assert!(registry.get_aggregate("SHIFT").is_none());
    }

    #[test]
    fn test_get_transform() {
        let registry = FunctionRegistry::new();
        let reverse = registry.get_transform("REVERSE");
        assert!(reverse.is_some());
        assert_eq!(reverse.unwrap().name(), "REVERSE");
    }

    #[test]
    fn test_create_aggregate_configures() {
        let registry = FunctionRegistry::new();
        let mut quantile = registry
            .create_aggregate("quantile", &[Value::Float(0.9)])
            .unwrap();
        quantile.accumulate(&Value::Float(0.0)).unwrap();
        quantile.accumulate(&Value::Float(2.0)).unwrap();
        assert_eq!(quantile.result(), Value::Float(2.0));
    }

    #[test]
    fn test_create_errors() {
        let registry = FunctionRegistry::new();
        assert_eq!(
            registry.create_aggregate("NOPE", &[]).err(),
            Some(Error::FunctionNotFound("NOPE".to_string()))
        );
        assert_eq!(
            registry
                .create_aggregate("QUANTILE", &[Value::Float(1.5)])
                .err(),
            Some(Error::InvalidQuantile(1.5))
        );
        // QUANTILE requires a probability
        assert!(registry.create_aggregate("QUANTILE", &[]).is_err());
        // REVERSE takes no options
        assert!(registry
            .create_transform("REVERSE", &[Value::Integer(1)])
            .is_err());
    }

    #[test]
    fn test_function_info() {
        let registry = FunctionRegistry::new();
        let info = registry.get_info("cum_sum").unwrap();
        assert_eq!(info.name, "CUM_SUM");
        assert_eq!(info.function_type, FunctionType::Transform);
    }

    #[test]
    fn test_list_functions() {
        let registry = FunctionRegistry::new();
        assert_eq!(registry.list_aggregates().len(), 12);
        assert_eq!(registry.list_transforms().len(), 8);
        let all = registry.list_all();
        assert!(all.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_global_registry() {
        let registry = global_registry();
        assert!(registry.exists("COUNT"));
        assert!(registry.exists("SHIFT"));
        assert!(!registry.exists("NONEXISTENT"));
    }
}
