//! Provides a generic trait for parsing unit-suffixed readings into numbers.
//!
//! Implementors pick the part of the raw text that carries the reading, name the
//! unit suffix to strip and may refine the error reported for unparseable text.
//!
//! # Example: Implementing `SuffixedValue`
//!
//! ```rust
//! use protocol_stats_exporter::stats::{Field, SuffixedValue};
//!
//! struct Seconds(f64);
//!
//! impl SuffixedValue for Seconds {
//!     const FIELD: Field = Field::Cpu;
//!     const SUFFIX: &'static str = "s";
//!
//!     fn from_value(value: f64) -> Self {
//!         Seconds(value)
//!     }
//! }
//!
//! assert_eq!(Seconds::from_text("1.5s").unwrap().0, 1.5);
//! ```

use std::num::ParseFloatError;

use super::{ConversionError, Field};

/// A trait for readings of the form `<decimal><suffix>`, e.g. `12.5%` or `128MiB`.
pub trait SuffixedValue: Sized {
    /// The reading this type represents, used for error reporting.
    const FIELD: Field;

    /// The unit suffix stripped before parsing. It is optional in the input.
    const SUFFIX: &'static str;

    /// Wraps an already validated value.
    fn from_value(value: f64) -> Self;

    /// Selects the token that holds the reading. Defaults to the trimmed text.
    fn select_token(text: &str) -> &str {
        text.trim()
    }

    /// Parses the raw text into `Self`.
    ///
    /// # Errors
    ///
    /// Returns a [`ConversionError`] if the selected token is empty, is not a decimal
    /// number once the suffix is stripped, or is not a finite, non-negative value.
    fn from_text(text: &str) -> Result<Self, ConversionError> {
        let token = Self::select_token(text);
        if token.is_empty() {
            return Err(ConversionError::Empty { field: Self::FIELD });
        }

        let number = token.strip_suffix(Self::SUFFIX).unwrap_or(token);
        let value = number
            .parse::<f64>()
            .map_err(|source| Self::on_parse_error(token, number, source))?;

        if !value.is_finite() {
            return Err(ConversionError::NonFinite {
                field: Self::FIELD,
                value: token.to_owned(),
            });
        }
        if value < 0.0 {
            return Err(ConversionError::Negative {
                field: Self::FIELD,
                value: token.to_owned(),
            });
        }

        // `abs` folds `-0` into `0`
        Ok(Self::from_value(value.abs()))
    }

    /// Builds the error for a token whose number part failed to parse.
    ///
    /// By default, this reports [`ConversionError::InvalidValue`] for the number part.
    fn on_parse_error(_token: &str, number: &str, source: ParseFloatError) -> ConversionError {
        ConversionError::InvalidValue {
            field: Self::FIELD,
            value: number.to_owned(),
            source,
        }
    }
}
