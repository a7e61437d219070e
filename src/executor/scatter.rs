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

//! Scatter / broadcast of per-group results
//!
//! Maps results computed in group order back to original row order. The
//! output is pre-sized to the table height and every row position belongs to
//! exactly one group, so each slot is written exactly once.

use crate::core::{Error, Result, Value};

use super::group_index::GroupIndex;
use super::window::GroupResult;

fn check_group_count(index: &GroupIndex, results: &[GroupResult]) -> Result<()> {
    if index.group_count() != results.len() {
        return Err(Error::internal(format!(
            "{} group results for {} groups",
            results.len(),
            index.group_count()
        )));
    }
    Ok(())
}

/// Replicate every group's single value to each of its rows
///
/// Sequence results are not accepted here; use [`scatter`].
pub fn broadcast(index: &GroupIndex, results: &[GroupResult]) -> Result<Vec<Value>> {
    check_group_count(index, results)?;
    index
        .row_to_group()
        .iter()
        .map(|&group| match &results[group] {
            GroupResult::Scalar(value) | GroupResult::List(value) => Ok(value.clone()),
            GroupResult::Sequence(_) => Err(Error::internal(
                "cannot broadcast a per-row group result",
            )),
        })
        .collect()
}

/// Write the i-th value of every group's result to the group's i-th row
///
/// Scalar results are broadcast so a transform that happens to produce a
/// scalar for some group still fills every row.
pub fn scatter(index: &GroupIndex, results: &[GroupResult]) -> Result<Vec<Value>> {
    check_group_count(index, results)?;
    let mut out = vec![Value::null_unknown(); index.row_count()];

    for (rows, result) in index.groups().iter().zip(results) {
        match result {
            GroupResult::Sequence(values) => {
                if values.len() != rows.len() {
                    return Err(Error::WindowLengthMismatch {
                        expected: rows.len(),
                        got: values.len(),
                    });
                }
                for (&row, value) in rows.iter().zip(values) {
                    out[row] = value.clone();
                }
            }
            GroupResult::Scalar(value) | GroupResult::List(value) => {
                for &row in rows {
                    out[row] = value.clone();
                }
            }
        }
    }
    Ok(out)
}

/// Explode every group's list back onto the group's rows
///
/// Element i of group g's list lands on the i-th row position of group g,
/// never on the i-th position of the concatenated lists.
pub fn flatten(index: &GroupIndex, results: &[GroupResult]) -> Result<Vec<Value>> {
    check_group_count(index, results)?;
    let mut out = vec![Value::null_unknown(); index.row_count()];

    for (rows, result) in index.groups().iter().zip(results) {
        let elements = match result {
            GroupResult::List(list) => list.as_list().ok_or_else(|| {
                Error::type_mismatch("FLATTEN", list.data_type())
            })?,
            GroupResult::Sequence(values) => values.as_slice(),
            GroupResult::Scalar(value) => {
                return Err(Error::type_mismatch("FLATTEN", value.data_type()))
            }
        };
        if elements.len() != rows.len() {
            return Err(Error::WindowLengthMismatch {
                expected: rows.len(),
                got: elements.len(),
            });
        }
        for (&row, value) in rows.iter().zip(elements) {
            out[row] = value.clone();
        }
    }
    Ok(out)
}
