//! Conversion of the human-readable resource readings printed by `docker stats`
//! into plain numbers.
//!
//! `docker stats` reports CPU usage as a percentage string (`"12.50%"`) and memory
//! usage as `"<used> / <limit>"` with binary unit suffixes (`"128MiB / 512MiB"`).
//! This module turns those strings into a [`Measurement`] with fixed semantic
//! units: percent for CPU and megabytes (MiB) for memory.
//!
//! # Main types
//!
//! - [`Measurement`]: The converted CPU and memory readings of one container.
//! - [`CpuPercent`] and [`MemoryMb`]: Single readings, parsed through the
//!   [`SuffixedValue`] trait.
//! - [`ConversionError`]: Why a reading could not be converted.
//!
//! # Units
//!
//! Only the `MiB` suffix is understood for memory. Readings in any other unit
//! (`GiB`, `KiB`, `B`, ...) are rejected with [`ConversionError::UnsupportedUnit`]
//! instead of being rescaled.
//!
//! # Example
//!
//! ```rust
//! use protocol_stats_exporter::stats;
//!
//! let m = stats::convert("12.5%", "128MiB / 512MiB").unwrap();
//! assert_eq!(m.cpu_percent(), 12.5);
//! assert_eq!(m.memory_mb(), 128.0);
//!
//! assert!(stats::convert("abc%", "128MiB / 512MiB").is_err());
//! ```

mod cpu;
mod error;
mod memory;
mod parser;

pub use cpu::CpuPercent;
pub use error::{ConversionError, Field};
pub use memory::MemoryMb;
pub use parser::SuffixedValue;

/// Converted resource readings of a single container.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Measurement {
    cpu_percent: f64,
    memory_mb: f64,
}

impl Measurement {
    pub fn new(cpu: CpuPercent, memory: MemoryMb) -> Self {
        Self {
            cpu_percent: cpu.value(),
            memory_mb: memory.value(),
        }
    }

    /// CPU usage in percent of one core, as reported by the runtime.
    pub fn cpu_percent(&self) -> f64 {
        self.cpu_percent
    }

    /// Used memory in megabytes (MiB).
    pub fn memory_mb(&self) -> f64 {
        self.memory_mb
    }
}

/// Converts the raw CPU and memory text of one container.
///
/// # Errors
///
/// Returns a [`ConversionError`] if either field cannot be converted. The caller is
/// expected to drop the sample, not the whole pass.
pub fn convert(cpu_text: &str, mem_text: &str) -> Result<Measurement, ConversionError> {
    let cpu = CpuPercent::from_text(cpu_text)?;
    let memory = MemoryMb::from_text(mem_text)?;
    Ok(Measurement::new(cpu, memory))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_convert_valid() {
        let m = convert("12.5%", "128MiB / 512MiB").unwrap();
        assert_eq!(m.cpu_percent(), 12.5);
        assert_eq!(m.memory_mb(), 128.0);
    }

    #[test]
    fn test_convert_invalid_cpu() {
        let err = convert("abc%", "128MiB / 512MiB").unwrap_err();
        match err {
            ConversionError::InvalidValue { field, value, .. } => {
                assert_eq!(field, Field::Cpu);
                assert_eq!(value, "abc");
            }
            _ => panic!("Expected InvalidValue error"),
        }
    }

    #[test]
    fn test_convert_invalid_memory() {
        let err = convert("1%", "lots / 512MiB").unwrap_err();
        assert!(matches!(
            err,
            ConversionError::InvalidValue {
                field: Field::Memory,
                ..
            }
        ));
    }

    #[test]
    fn test_convert_zero_usage() {
        let m = convert("0.00%", "0B / 0B");
        // `docker stats` prints stopped containers as `0B`, which is not MiB
        assert!(matches!(
            m,
            Err(ConversionError::UnsupportedUnit { ref unit, .. }) if unit == "B"
        ));

        let m = convert("0.00%", "0MiB / 0MiB").unwrap();
        assert_eq!(m.cpu_percent(), 0.0);
        assert_eq!(m.memory_mb(), 0.0);
    }
}
