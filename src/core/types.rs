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

//! Core type definitions for overeval
//!
//! This module defines the fundamental types: DataType, Operator

use std::fmt;
use std::str::FromStr;

use super::error::Error;

/// Logical data types of column values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum DataType {
    /// NULL data type, used for unknown/unspecified types
    #[default]
    Null = 0,

    /// 64-bit signed integer
    Integer = 1,

    /// 64-bit floating point number
    Float = 2,

    /// UTF-8 text string
    Text = 3,

    /// Boolean true/false
    Boolean = 4,

    /// List of values (result of `.list()`)
    List = 5,
}

impl DataType {
    /// Returns true if this type is numeric (INTEGER or FLOAT)
    pub fn is_numeric(&self) -> bool {
        matches!(self, DataType::Integer | DataType::Float)
    }

    /// Returns true if this type can be compared for ordering
    pub fn is_orderable(&self) -> bool {
        !matches!(self, DataType::List)
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataType::Null => write!(f, "NULL"),
            DataType::Integer => write!(f, "INTEGER"),
            DataType::Float => write!(f, "FLOAT"),
            DataType::Text => write!(f, "TEXT"),
            DataType::Boolean => write!(f, "BOOLEAN"),
            DataType::List => write!(f, "LIST"),
        }
    }
}

impl FromStr for DataType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "NULL" => Ok(DataType::Null),
            "INTEGER" | "INT" | "INT32" | "INT64" | "BIGINT" => Ok(DataType::Integer),
            "FLOAT" | "FLOAT32" | "FLOAT64" | "DOUBLE" | "REAL" => Ok(DataType::Float),
            "TEXT" | "STRING" | "UTF8" | "VARCHAR" => Ok(DataType::Text),
            "BOOLEAN" | "BOOL" => Ok(DataType::Boolean),
            "LIST" => Ok(DataType::List),
            _ => Err(Error::invalid_argument(format!("unknown data type: {}", s))),
        }
    }
}

/// Binary operators usable between expressions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Operator {
    /// Addition (+)
    Add = 0,

    /// Subtraction (-)
    Sub = 1,

    /// Multiplication (*)
    Mul = 2,

    /// Division (/)
    Div = 3,

    /// Equality (=)
    Eq = 4,

    /// Inequality (!=)
    Ne = 5,

    /// Greater than (>)
    Gt = 6,

    /// Greater than or equal (>=)
    Gte = 7,

    /// Less than (<)
    Lt = 8,

    /// Less than or equal (<=)
    Lte = 9,
}

impl Operator {
    /// Returns true for +, -, *, /
    pub fn is_arithmetic(&self) -> bool {
        matches!(
            self,
            Operator::Add | Operator::Sub | Operator::Mul | Operator::Div
        )
    }

    /// Returns true for comparison operators
    pub fn is_comparison(&self) -> bool {
        !self.is_arithmetic()
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operator::Add => write!(f, "+"),
            Operator::Sub => write!(f, "-"),
            Operator::Mul => write!(f, "*"),
            Operator::Div => write!(f, "/"),
            Operator::Eq => write!(f, "=="),
            Operator::Ne => write!(f, "!="),
            Operator::Gt => write!(f, ">"),
            Operator::Gte => write!(f, ">="),
            Operator::Lt => write!(f, "<"),
            Operator::Lte => write!(f, "<="),
        }
    }
}

impl FromStr for Operator {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "+" => Ok(Operator::Add),
            "-" => Ok(Operator::Sub),
            "*" => Ok(Operator::Mul),
            "/" => Ok(Operator::Div),
            "=" | "==" => Ok(Operator::Eq),
            "!=" | "<>" => Ok(Operator::Ne),
            ">" => Ok(Operator::Gt),
            ">=" => Ok(Operator::Gte),
            "<" => Ok(Operator::Lt),
            "<=" => Ok(Operator::Lte),
            _ => Err(Error::invalid_argument(format!("unknown operator: {}", s))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_type_parse() {
        assert_eq!("int32".parse::<DataType>().unwrap(), DataType::Integer);
        assert_eq!("Float64".parse::<DataType>().unwrap(), DataType::Float);
        assert_eq!("utf8".parse::<DataType>().unwrap(), DataType::Text);
        assert!("blob".parse::<DataType>().is_err());
    }

    #[test]
    fn test_data_type_properties() {
        assert!(DataType::Integer.is_numeric());
        assert!(DataType::Float.is_numeric());
        assert!(!DataType::Text.is_numeric());
        assert!(!DataType::List.is_orderable());
        assert_eq!(DataType::List.to_string(), "LIST");
    }

    #[test]
    fn test_operator_roundtrip() {
        for op in [
            Operator::Add,
            Operator::Sub,
            Operator::Mul,
            Operator::Div,
            Operator::Eq,
            Operator::Ne,
            Operator::Gt,
            Operator::Gte,
            Operator::Lt,
            Operator::Lte,
        ] {
            assert_eq!(op.to_string().parse::<Operator>().unwrap(), op);
        }
        assert!(Operator::Div.is_arithmetic());
        assert!(Operator::Lte.is_comparison());
    }
}
