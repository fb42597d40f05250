use crate::stats::Measurement;

use super::{ContainerName, Error, Protocol, Result, Service};

/// The protocol and service a container belongs to, derived from its name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    name: ContainerName,
    protocol: Protocol,
    service: Service,
}

impl Classification {
    pub fn name(&self) -> &ContainerName {
        &self.name
    }

    pub fn protocol(&self) -> &Protocol {
        &self.protocol
    }

    pub fn service(&self) -> Service {
        self.service
    }
}

/// A classified container together with its converted resource readings.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifiedSample {
    classification: Classification,
    measurement: Measurement,
}

impl ClassifiedSample {
    pub fn new(classification: Classification, measurement: Measurement) -> Self {
        Self {
            classification,
            measurement,
        }
    }

    pub fn classification(&self) -> &Classification {
        &self.classification
    }

    pub fn measurement(&self) -> &Measurement {
        &self.measurement
    }
}

/// Classifies a container by its name.
///
/// The name is split on `-`. The first token is taken verbatim as the protocol and
/// the second one must be a known [`Service`]. Any further tokens (replica
/// suffixes and the like) are ignored.
///
/// Returns `None` for names that do not follow the convention. This includes the
/// `NAME` header that `docker stats` prints in table mode, since it has no second
/// token.
///
/// # Examples
///
/// ```
/// # use protocol_stats_exporter::container::{classify, Service};
/// let c = classify("rest-order-1").unwrap();
/// assert_eq!(c.protocol().as_ref(), "rest");
/// assert_eq!(c.service(), Service::Order);
///
/// assert!(classify("NAME").is_none());
/// assert!(classify("kafka-broker").is_none());
/// ```
pub fn classify(container_name: &str) -> Option<Classification> {
    match try_classify(container_name) {
        Ok(classification) => Some(classification),
        Err(err) => {
            log::debug!(target: "classifier", "skipping container: {err}");
            None
        }
    }
}

fn try_classify(container_name: &str) -> Result<Classification> {
    let name = ContainerName::new(container_name)?;
    let mut tokens = container_name.split('-');
    let (Some(protocol), Some(service)) = (tokens.next(), tokens.next()) else {
        return Err(Error::MissingServiceToken(container_name.to_owned()));
    };

    let service = service.parse::<Service>()?;
    let protocol = Protocol::new(protocol)?;

    Ok(Classification {
        name,
        protocol,
        service,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_rejects_single_token() {
        assert!(classify("NAME").is_none());
        assert!(classify("standalone").is_none());
        assert!(matches!(
            try_classify("standalone"),
            Err(Error::MissingServiceToken(_))
        ));
    }

    #[test]
    fn test_classify_accepts_known_services() {
        let cases = [
            ("rest-order", "rest", Service::Order),
            ("jsonrpc-payment", "jsonrpc", Service::Payment),
            ("grpc-notification", "grpc", Service::Notification),
        ];
        for (name, protocol, service) in cases {
            let c = classify(name).unwrap();
            assert_eq!(c.name().as_ref(), name);
            assert_eq!(c.protocol().as_ref(), protocol);
            assert_eq!(c.service(), service);
        }
    }

    #[test]
    fn test_classify_ignores_trailing_tokens() {
        let c = classify("rest-order-1").unwrap();
        assert_eq!(c.protocol().as_ref(), "rest");
        assert_eq!(c.service(), Service::Order);
        assert_eq!(c.name().as_ref(), "rest-order-1");

        let c = classify("grpc-payment-replica-2").unwrap();
        assert_eq!(c.protocol().as_ref(), "grpc");
        assert_eq!(c.service(), Service::Payment);
    }

    #[test]
    fn test_classify_long_name() {
        let name = format!("rest-order-{}", "x".repeat(250));
        assert!(name.len() > 255);

        let c = classify(&name).unwrap();
        assert_eq!(c.name().as_ref(), name);
        assert_eq!(c.protocol().as_ref(), "rest");
        assert_eq!(c.service(), Service::Order);
    }

    #[test]
    fn test_classify_passes_any_protocol_token() {
        let c = classify("kafka-order").unwrap();
        assert_eq!(c.protocol().as_ref(), "kafka");

        let c = classify("rabbitmq-notification-1").unwrap();
        assert_eq!(c.protocol().as_ref(), "rabbitmq");
    }

    #[test]
    fn test_classify_rejects_unknown_service() {
        assert!(classify("rest-unknown").is_none());
        assert!(classify("kafka-broker").is_none());
        assert!(matches!(
            try_classify("rest-Order"),
            Err(Error::UnknownService(s)) if s == "Order"
        ));
    }

    #[test]
    fn test_classify_rejects_empty_tokens() {
        assert!(matches!(try_classify("-order"), Err(Error::EmptyProtocol)));
        assert!(classify("rest-").is_none());
        assert!(classify("").is_none());
    }

    #[test]
    fn test_classify_service_must_be_second_token() {
        assert!(classify("order-rest").is_none());
        assert!(classify("bench-rest-order").is_none());
    }
}
