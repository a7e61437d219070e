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

//! Error types for overeval
//!
//! This module defines all error types raised while evaluating expressions.
//! An undefined statistic over an empty or single-row group is not an error:
//! kernels resolve it to NULL.

use thiserror::Error;

/// Result type alias for overeval operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for expression and window evaluation
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    // =========================================================================
    // Table errors
    // =========================================================================
    /// Column not found in table
    #[error("column '{0}' not found")]
    ColumnNotFound(String),

    /// Duplicate column name in table
    #[error("duplicate column '{0}'")]
    DuplicateColumn(String),

    /// Columns of one table have different lengths
    #[error("column '{column}' has length {got}, expected {expected}")]
    ColumnLengthMismatch {
        column: String,
        expected: usize,
        got: usize,
    },

    // =========================================================================
    // Function errors
    // =========================================================================
    /// Unknown aggregate or transform function
    #[error("function '{0}' not found")]
    FunctionNotFound(String),

    /// Invalid argument for function
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Quantile outside of [0, 1]
    #[error("quantile must be between 0.0 and 1.0, got {0}")]
    InvalidQuantile(f64),

    /// Input type incompatible with the function
    #[error("{function} is not supported for type {data_type}")]
    TypeMismatch { function: String, data_type: String },

    // =========================================================================
    // Window errors
    // =========================================================================
    /// Per-group transform result does not match the group size
    #[error("the length of the window expression did not match that of the group: expected {expected}, got {got}")]
    WindowLengthMismatch { expected: usize, got: usize },

    /// Evaluation of one output column failed
    #[error("failed to evaluate '{expression}': {source}")]
    WindowEvaluation {
        expression: String,
        #[source]
        source: Box<Error>,
    },

    // =========================================================================
    // Other errors
    // =========================================================================
    /// Operation not supported
    #[error("not supported: {0}")]
    NotSupported(String),

    /// Internal error for unexpected conditions
    #[error("{message}")]
    Internal { message: String },
}

impl Error {
    /// Create a new ColumnLengthMismatch error
    pub fn column_length_mismatch(column: impl Into<String>, expected: usize, got: usize) -> Self {
        Error::ColumnLengthMismatch {
            column: column.into(),
            expected,
            got,
        }
    }

    /// Create a new TypeMismatch error
    pub fn type_mismatch(function: impl Into<String>, data_type: impl ToString) -> Self {
        Error::TypeMismatch {
            function: function.into(),
            data_type: data_type.to_string(),
        }
    }

    /// Create a new InvalidArgument error
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Error::InvalidArgument(message.into())
    }

    /// Create a new NotSupported error
    pub fn not_supported(message: impl Into<String>) -> Self {
        Error::NotSupported(message.into())
    }

    /// Create a new Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Error::Internal {
            message: message.into(),
        }
    }

    /// Wrap an error with the display form of the expression that raised it
    ///
    /// Already wrapped errors are returned unchanged so the innermost
    /// expression name is the one reported.
    pub fn in_expression(self, expression: impl Into<String>) -> Self {
        match self {
            Error::WindowEvaluation { .. } => self,
            other => Error::WindowEvaluation {
                expression: expression.into(),
                source: Box::new(other),
            },
        }
    }

    /// Returns the underlying error, looking through `WindowEvaluation`
    pub fn root_cause(&self) -> &Error {
        match self {
            Error::WindowEvaluation { source, .. } => source.root_cause(),
            other => other,
        }
    }

    /// Check if this is a "not found" type error
    pub fn is_not_found(&self) -> bool {
        matches!(
            self.root_cause(),
            Error::ColumnNotFound(_) | Error::FunctionNotFound(_)
        )
    }

    /// Check if this is a type related error
    pub fn is_type_error(&self) -> bool {
        matches!(self.root_cause(), Error::TypeMismatch { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            Error::ColumnNotFound("values".to_string()).to_string(),
            "column 'values' not found"
        );
        assert_eq!(
            Error::InvalidQuantile(1.5).to_string(),
            "quantile must be between 0.0 and 1.0, got 1.5"
        );
        assert_eq!(
            Error::type_mismatch("STD", "TEXT").to_string(),
            "STD is not supported for type TEXT"
        );
        assert_eq!(
            Error::column_length_mismatch("b", 3, 2).to_string(),
            "column 'b' has length 2, expected 3"
        );
    }

    #[test]
    fn test_in_expression_wraps_once() {
        let err = Error::InvalidQuantile(2.0)
            .in_expression("col(value).quantile(2).over([group])")
            .in_expression("outer");
        match &err {
            Error::WindowEvaluation { expression, source } => {
                assert_eq!(expression, "col(value).quantile(2).over([group])");
                assert_eq!(**source, Error::InvalidQuantile(2.0));
            }
            other => panic!("unexpected error {:?}", other),
        }
        assert_eq!(err.root_cause(), &Error::InvalidQuantile(2.0));
    }

    #[test]
    fn test_error_classification() {
        assert!(Error::ColumnNotFound("c".to_string()).is_not_found());
        assert!(Error::FunctionNotFound("f".to_string())
            .in_expression("e")
            .is_not_found());
        assert!(!Error::InvalidQuantile(2.0).is_not_found());

        assert!(Error::type_mismatch("VAR", "BOOLEAN").is_type_error());
        assert!(!Error::not_supported("x").is_type_error());
    }
}
