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

//! Transform Functions
//!
//! Order-sensitive per-group transforms. Each one maps a group's values, in
//! the group's internal row order, to a sequence of the same length:
//!
//! - [`ShiftFunction`] - SHIFT(column, n)
//! - [`ReverseFunction`] - REVERSE(column)
//! - [`CumSumFunction`] - CUM_SUM(column)
//! - [`CumMinFunction`] - CUM_MIN(column)
//! - [`CumMaxFunction`] - CUM_MAX(column)
//! - [`CumCountFunction`] - CUM_COUNT(column)
//! - [`DiffFunction`] - DIFF(column, n)
//! - [`RankFunction`] - RANK(column, method)

mod cumulative;
mod diff;
mod rank;
mod reverse;
mod shift;

pub use cumulative::{CumCountFunction, CumMaxFunction, CumMinFunction, CumSumFunction};
pub use diff::DiffFunction;
pub use rank::{RankFunction, RankMethod};
pub use reverse::ReverseFunction;
pub use shift::ShiftFunction;
