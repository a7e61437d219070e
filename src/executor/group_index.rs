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

//! Group index construction
//!
//! A [`GroupIndex`] partitions the rows of a table by the values of one or
//! more key columns. It is built in a single left-to-right scan, so groups
//! are numbered in order of first occurrence and every group lists its row
//! positions in ascending (original table) order.

use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::core::{Column, Error, Result, Table, Value};

/// Type alias for partition keys - stack-allocated for common case (up to 4 columns)
pub type PartitionKey = SmallVec<[Value; 4]>;

/// Rows of a table grouped by partition key
#[derive(Debug, Clone, PartialEq)]
pub struct GroupIndex {
    /// Partition column names
    keys: Vec<String>,
    /// Key of every group, in group order
    group_keys: Vec<PartitionKey>,
    /// Row positions of every group, in group order
    groups: Vec<Vec<usize>>,
    /// Inverse map: row position -> group number
    row_to_group: Vec<usize>,
}

impl GroupIndex {
    /// Group the rows of `table` by the named key columns
    pub fn build(table: &Table, keys: &[String]) -> Result<Self> {
        if keys.is_empty() {
            return Err(Error::invalid_argument(
                "a window requires at least one partition column",
            ));
        }
        let columns = keys
            .iter()
            .map(|key| table.column(key))
            .collect::<Result<Vec<&Column>>>()?;
        let index = Self::from_columns(&columns, table.height());

        tracing::debug!(
            keys = ?index.keys,
            rows = index.row_count(),
            groups = index.group_count(),
            "built group index"
        );
        Ok(index)
    }

    /// Group `row_count` rows by the given key columns
    ///
    /// Keys compare with [`Value`] equality: NULLs form one group, NaNs form one group.
    pub fn from_columns(columns: &[&Column], row_count: usize) -> Self {
        let mut lookup: FxHashMap<PartitionKey, usize> = FxHashMap::default();
        let mut group_keys: Vec<PartitionKey> = Vec::new();
        let mut groups: Vec<Vec<usize>> = Vec::new();
        let mut row_to_group = Vec::with_capacity(row_count);

        for row in 0..row_count {
            let key: PartitionKey = columns
                .iter()
                .map(|c| c.get(row).cloned().unwrap_or_else(Value::null_unknown))
                .collect();

            let group = match lookup.get(&key) {
                Some(&group) => group,
                None => {
                    let group = groups.len();
                    lookup.insert(key.clone(), group);
                    group_keys.push(key);
                    groups.push(Vec::new());
                    group
                }
            };
            groups[group].push(row);
            row_to_group.push(group);
        }

        Self {
            keys: columns.iter().map(|c| c.name().to_string()).collect(),
            group_keys,
            groups,
            row_to_group,
        }
    }

    /// Partition column names
    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    /// Number of groups
    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    /// Number of rows covered by the index
    pub fn row_count(&self) -> usize {
        self.row_to_group.len()
    }

    /// Returns true if the index has no groups
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Row positions of every group, in group order
    pub fn groups(&self) -> &[Vec<usize>] {
        &self.groups
    }

    /// Row positions of one group
    pub fn group(&self, group: usize) -> Option<&[usize]> {
        self.groups.get(group).map(Vec::as_slice)
    }

    /// Key values of one group
    pub fn group_key(&self, group: usize) -> Option<&[Value]> {
        self.group_keys.get(group).map(|k| k.as_slice())
    }

    /// Group number of a row
    pub fn group_of_row(&self, row: usize) -> Option<usize> {
        self.row_to_group.get(row).copied()
    }

    /// Row -> group map for every row
    pub fn row_to_group(&self) -> &[usize] {
        &self.row_to_group
    }

    /// Iterate over (key, row positions) in group order
    pub fn iter(&self) -> impl Iterator<Item = (&[Value], &[usize])> {
        self.group_keys
            .iter()
            .zip(self.groups.iter())
            .map(|(k, g)| (k.as_slice(), g.as_slice()))
    }
}
