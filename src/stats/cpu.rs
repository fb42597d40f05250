//! CPU readings as printed in the `CPU %` column of `docker stats`.

use super::{Field, SuffixedValue};

/// CPU usage in percent, e.g. `12.50%`.
///
/// Multi-core containers may exceed `100`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CpuPercent(f64);

impl CpuPercent {
    pub fn value(&self) -> f64 {
        self.0
    }
}

impl SuffixedValue for CpuPercent {
    const FIELD: Field = Field::Cpu;
    const SUFFIX: &'static str = "%";

    fn from_value(value: f64) -> Self {
        Self(value)
    }
}
