use super::{Error, Result};

/// Default name of the CPU metric.
pub const DEFAULT_CPU_METRIC: &str = "docker_container_cpu_percent";
/// Default name of the memory metric.
pub const DEFAULT_MEMORY_METRIC: &str = "docker_container_memory_mb";

/// Label names attached to every metric line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelKeys {
    container: String,
    protocol: String,
    service: String,
}

impl LabelKeys {
    /// # Errors
    ///
    /// Returns [`Error::InvalidLabelName`] for names outside `[a-zA-Z_][a-zA-Z0-9_]*`
    /// and for reserved names starting with `__`.
    pub fn new(
        container: impl Into<String>,
        protocol: impl Into<String>,
        service: impl Into<String>,
    ) -> Result<Self> {
        let keys = Self {
            container: container.into(),
            protocol: protocol.into(),
            service: service.into(),
        };
        for key in [&keys.container, &keys.protocol, &keys.service] {
            if !is_valid_label_name(key) {
                return Err(Error::InvalidLabelName(key.clone()));
            }
        }
        Ok(keys)
    }

    pub fn container(&self) -> &str {
        &self.container
    }

    pub fn protocol(&self) -> &str {
        &self.protocol
    }

    pub fn service(&self) -> &str {
        &self.service
    }
}

impl Default for LabelKeys {
    fn default() -> Self {
        Self {
            container: "container".to_owned(),
            protocol: "protocol".to_owned(),
            service: "service".to_owned(),
        }
    }
}

/// Metric and label names used when rendering a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpositionConfig {
    cpu_metric: String,
    memory_metric: String,
    labels: LabelKeys,
}

impl ExpositionConfig {
    /// # Errors
    ///
    /// Returns [`Error::InvalidMetricName`] for names outside
    /// `[a-zA-Z_:][a-zA-Z0-9_:]*`.
    pub fn new(
        cpu_metric: impl Into<String>,
        memory_metric: impl Into<String>,
        labels: LabelKeys,
    ) -> Result<Self> {
        let cpu_metric = cpu_metric.into();
        let memory_metric = memory_metric.into();
        for name in [&cpu_metric, &memory_metric] {
            if !is_valid_metric_name(name) {
                return Err(Error::InvalidMetricName(name.clone()));
            }
        }
        Ok(Self {
            cpu_metric,
            memory_metric,
            labels,
        })
    }

    pub fn cpu_metric(&self) -> &str {
        &self.cpu_metric
    }

    pub fn memory_metric(&self) -> &str {
        &self.memory_metric
    }

    pub fn labels(&self) -> &LabelKeys {
        &self.labels
    }
}

impl Default for ExpositionConfig {
    fn default() -> Self {
        Self {
            cpu_metric: DEFAULT_CPU_METRIC.to_owned(),
            memory_metric: DEFAULT_MEMORY_METRIC.to_owned(),
            labels: LabelKeys::default(),
        }
    }
}

fn is_valid_metric_name(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_' || c == ':')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == ':')
}

fn is_valid_label_name(name: &str) -> bool {
    let mut chars = name.chars();
    !name.starts_with("__")
        && matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_names() {
        let config = ExpositionConfig::default();
        assert_eq!(config.cpu_metric(), "docker_container_cpu_percent");
        assert_eq!(config.memory_metric(), "docker_container_memory_mb");
        assert_eq!(config.labels().container(), "container");
        assert_eq!(config.labels().protocol(), "protocol");
        assert_eq!(config.labels().service(), "service");
    }

    #[test]
    fn test_metric_name_validation() {
        assert!(ExpositionConfig::new("bench:cpu_pct", "_mem", LabelKeys::default()).is_ok());
        assert!(matches!(
            ExpositionConfig::new("1cpu", "mem", LabelKeys::default()),
            Err(Error::InvalidMetricName(n)) if n == "1cpu"
        ));
        assert!(ExpositionConfig::new("cpu", "mem-mb", LabelKeys::default()).is_err());
        assert!(ExpositionConfig::new("", "mem", LabelKeys::default()).is_err());
    }

    #[test]
    fn test_label_name_validation() {
        assert!(LabelKeys::new("name", "proto", "svc").is_ok());
        assert!(matches!(
            LabelKeys::new("name", "__proto", "svc"),
            Err(Error::InvalidLabelName(n)) if n == "__proto"
        ));
        assert!(LabelKeys::new("na:me", "proto", "svc").is_err());
        assert!(LabelKeys::new("name", "proto", "").is_err());
    }
}
