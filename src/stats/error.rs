//! Defines structured error types for converting resource readings.
//!
//! # Error Types
//!
//! - [`ConversionError::Empty`]: The reading was blank.
//! - [`ConversionError::InvalidValue`]: The reading is not a decimal number.
//! - [`ConversionError::UnsupportedUnit`]: The reading is a number in a unit the
//!   converter does not handle.
//! - [`ConversionError::NonFinite`] and [`ConversionError::Negative`]: The reading
//!   parsed, but is not a usable resource amount.

use std::fmt;
use std::num::ParseFloatError;

use thiserror::Error;

/// The reading a conversion error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Cpu,
    Memory,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Field::Cpu => "cpu",
            Field::Memory => "memory",
        };
        write!(f, "{name}")
    }
}

#[derive(Debug, Error)]
pub enum ConversionError {
    #[error("empty {field} reading")]
    Empty { field: Field },

    #[error("invalid {field} reading '{value}': {source}")]
    InvalidValue {
        field: Field,
        value: String,
        #[source]
        source: ParseFloatError,
    },

    #[error("unsupported {field} unit '{unit}' in '{value}'")]
    UnsupportedUnit {
        field: Field,
        value: String,
        unit: String,
    },

    #[error("{field} reading '{value}' is not finite")]
    NonFinite { field: Field, value: String },

    #[error("{field} reading '{value}' is negative")]
    Negative { field: Field, value: String },
}
