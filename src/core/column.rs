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

//! Columns and tables
//!
//! A [`Table`] is an ordered sequence of named [`Column`]s that all have the
//! same length. Rows are addressed by their 0-based position. Tables are
//! immutable while an expression batch is evaluated against them.

use std::sync::Arc;

use rustc_hash::FxHashSet;

use super::error::{Error, Result};
use super::types::DataType;
use super::value::Value;

/// A named column of values
///
/// Values are held behind an `Arc` so selecting an unchanged column into a
/// new table does not copy it.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    name: String,
    values: Arc<[Value]>,
}

impl Column {
    /// Create a new column
    pub fn new(name: impl Into<String>, values: impl Into<Vec<Value>>) -> Self {
        Self {
            name: name.into(),
            values: Arc::from(values.into()),
        }
    }

    /// Create a column from any iterator of convertible values
    pub fn from_iter<T, I>(name: impl Into<String>, values: I) -> Self
    where
        T: Into<Value>,
        I: IntoIterator<Item = T>,
    {
        Self::new(
            name,
            values.into_iter().map(Into::into).collect::<Vec<Value>>(),
        )
    }

    /// Column name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Return the same values under another name
    pub fn renamed(&self, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            values: Arc::clone(&self.values),
        }
    }

    /// Column values in row order
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if the column has no rows
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Value at a row position
    pub fn get(&self, row: usize) -> Option<&Value> {
        self.values.get(row)
    }

    /// First non-NULL data type of the column, NULL if all values are NULL
    pub fn data_type(&self) -> DataType {
        self.values
            .iter()
            .find(|v| !v.is_null())
            .map(Value::data_type)
            .unwrap_or(DataType::Null)
    }

    /// Number of NULL values
    pub fn null_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_null()).count()
    }
}

/// An immutable table of equal-length named columns
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    columns: Vec<Column>,
    height: usize,
}

impl Table {
    /// Create a table, validating equal lengths and unique names
    pub fn new(columns: Vec<Column>) -> Result<Self> {
        let height = columns.first().map(Column::len).unwrap_or(0);
        let mut seen = FxHashSet::default();
        for column in &columns {
            if column.len() != height {
                return Err(Error::column_length_mismatch(
                    column.name(),
                    height,
                    column.len(),
                ));
            }
            if !seen.insert(column.name()) {
                return Err(Error::DuplicateColumn(column.name().to_string()));
            }
        }
        Ok(Self { columns, height })
    }

    /// A table with no columns and no rows
    pub fn empty() -> Self {
        Self::default()
    }

    /// Number of rows
    pub fn height(&self) -> usize {
        self.height
    }

    /// Number of columns
    pub fn width(&self) -> usize {
        self.columns.len()
    }

    /// Returns true if the table has no rows
    pub fn is_empty(&self) -> bool {
        self.height == 0
    }

    /// All columns in order
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Column names in order
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(Column::name).collect()
    }

    /// Look up a column by name
    pub fn column(&self, name: &str) -> Result<&Column> {
        self.columns
            .iter()
            .find(|c| c.name() == name)
            .ok_or_else(|| Error::ColumnNotFound(name.to_string()))
    }

    /// Append or replace columns, keeping the position of replaced ones
    pub fn with_columns(&self, new_columns: Vec<Column>) -> Result<Self> {
        let mut columns = self.columns.clone();
        for column in new_columns {
            if !self.columns.is_empty() && column.len() != self.height {
                return Err(Error::column_length_mismatch(
                    column.name(),
                    self.height,
                    column.len(),
                ));
            }
            match columns.iter_mut().find(|c| c.name() == column.name()) {
                Some(existing) => *existing = column,
                None => columns.push(column),
            }
        }
        Table::new(columns)
    }
}
