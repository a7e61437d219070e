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

//! # overeval - Windowed expression evaluation over columnar tables
//!
//! overeval computes expressions "per group" of rows with the
//! `expr.agg_or_transform().over(keys)` construct and returns columns whose
//! length and row order match the input table.
//!
//! ## Key Features
//!
//! - **Aggregate windows** - mean, std, var, quantile, count, ... broadcast to every row of the group
//! - **Transform windows** - shift, reverse, cumulative and rank transforms scattered back in row order
//! - **List windows** - `.list().over(..)` and `.list().over(..).flatten()`
//! - **Shared grouping** - sibling windows over the same keys reuse one group index per batch
//! - **Parallel evaluation** - groups and sibling expressions fan out with Rayon
//!
//! ## Quick Start
//!
//! ```rust
//! use overeval::{col, Column, Executor, Table, Value};
//!
//! let table = Table::new(vec![
//!     Column::from_iter("groups", ["a", "a", "b", "b"]),
//!     Column::from_iter("values", [1.0, 2.0, 3.0, 5.0]),
//! ])
//! .unwrap();
//!
//! let out = Executor::new()
//!     .select(
//!         &table,
//!         &[
//!             col("values").mean().over(["groups"]).alias("mean"),
//!             col("values").shift(1).over(["groups"]).alias("previous"),
//!         ],
//!     )
//!     .unwrap();
//!
//! assert_eq!(
//!     out.column("mean").unwrap().values(),
//!     &[Value::Float(1.5), Value::Float(1.5), Value::Float(4.0), Value::Float(4.0)]
//! );
//! assert!(out.column("previous").unwrap().values()[2].is_null());
//! ```
//!
//! ## Modules
//!
//! - [`core`] - Core types ([`DataType`], [`Value`], [`Column`], [`Table`], [`Error`])
//! - [`expr`] - Expression trees and the builder API ([`col`], [`lit`], [`count`], [`arange`])
//! - [`functions`] - Aggregate and transform kernels, function registry
//! - [`executor`] - Group index, batch cache, window evaluation and scatter

pub mod core;
pub mod executor;
pub mod expr;
pub mod functions;

// Re-export main types for convenience
pub use core::{Column, DataType, Error, Operator, Result, Table, Value};

// Re-export expression builders
pub use expr::{arange, col, count, lit, Expr};

// Re-export function types
pub use functions::{
    global_registry, AggregateFunction, FunctionDataType, FunctionInfo, FunctionRegistry,
    FunctionSignature, FunctionType, QuantileInterpolation, RankMethod, TransformFunction,
};

// Re-export executor types
pub use executor::{
    BatchCache, BatchOutput, CacheStats, DefaultEvaluator, Evaluated, Executor, ExecutorConfig,
    ExpressionEval, Frame, GroupIndex, WindowKind,
};
