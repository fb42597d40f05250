//! Memory readings as printed in the `MEM USAGE / LIMIT` column of `docker stats`.
//!
//! Only the used amount (the first whitespace-separated token) is read, and only
//! the `MiB` unit is understood. A bare number is taken as MiB.

use std::num::ParseFloatError;

use super::{ConversionError, Field, SuffixedValue};

/// Used memory in megabytes (MiB), e.g. the `128MiB` of `128MiB / 512MiB`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MemoryMb(f64);

impl MemoryMb {
    pub fn value(&self) -> f64 {
        self.0
    }
}

impl SuffixedValue for MemoryMb {
    const FIELD: Field = Field::Memory;
    const SUFFIX: &'static str = "MiB";

    fn from_value(value: f64) -> Self {
        Self(value)
    }

    fn select_token(text: &str) -> &str {
        text.split_whitespace().next().unwrap_or_default()
    }

    /// Reports numbers carrying a different unit (`1.2GiB`, `512KiB`, `0B`) as
    /// [`ConversionError::UnsupportedUnit`].
    fn on_parse_error(token: &str, number: &str, source: ParseFloatError) -> ConversionError {
        let amount = token.trim_end_matches(|c: char| c.is_ascii_alphabetic());
        let unit = &token[amount.len()..];
        if !unit.is_empty() && amount.parse::<f64>().is_ok() {
            return ConversionError::UnsupportedUnit {
                field: Self::FIELD,
                value: token.to_owned(),
                unit: unit.to_owned(),
            };
        }

        ConversionError::InvalidValue {
            field: Self::FIELD,
            value: number.to_owned(),
            source,
        }
    }
}
