//! Container identity as seen by the exporter.
//!
//! Containers of the protocol benchmark are named `<protocol>-<service>[-suffix]`,
//! e.g. `rest-order`, `jsonrpc-payment-2` or `grpc-notification`. The name is the
//! only classification key: [`classify`] splits it into a [`Protocol`] and a
//! [`Service`] and rejects everything that does not follow the convention.
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

mod classify;
mod error;

pub use classify::{Classification, ClassifiedSample, classify};
pub use error::{Error, Result};

/// A validated container name.
///
/// # Examples
///
/// ```
/// # use protocol_stats_exporter::container::ContainerName;
/// let name = ContainerName::new("rest-order-1").unwrap();
/// assert_eq!(name.as_ref(), "rest-order-1");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContainerName(Arc<str>);

impl ContainerName {
    /// Creates a new `ContainerName` from the given raw name.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidContainerName`] if the name is empty.
    pub fn new(src: impl AsRef<str>) -> Result<Self> {
        let src = src.as_ref();
        if src.is_empty() {
            return Err(Error::InvalidContainerName(src.to_owned()));
        }

        Ok(Self(src.into()))
    }
}

impl AsRef<str> for ContainerName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContainerName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The protocol token of a container name.
///
/// Any non-empty token is accepted, so containers of brokers (`kafka-*`,
/// `rabbitmq-*`) or of protocols added later pass through unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Protocol(Arc<str>);

impl Protocol {
    /// Creates a new `Protocol` from a name token.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyProtocol`] if the token is empty.
    pub fn new(src: impl AsRef<str>) -> Result<Self> {
        let src = src.as_ref();
        if src.is_empty() {
            return Err(Error::EmptyProtocol);
        }
        Ok(Self(src.into()))
    }
}

impl AsRef<str> for Protocol {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The logical services implemented by every protocol under benchmark.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Service {
    Order,
    Payment,
    Notification,
}

impl Service {
    /// All recognized services.
    pub const ALL: [Service; 3] = [Service::Order, Service::Payment, Service::Notification];

    pub fn as_str(&self) -> &'static str {
        match self {
            Service::Order => "order",
            Service::Payment => "payment",
            Service::Notification => "notification",
        }
    }
}

impl FromStr for Service {
    type Err = Error;

    /// Parses a service token. Matching is exact and case-sensitive.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "order" => Ok(Service::Order),
            "payment" => Ok(Service::Payment),
            "notification" => Ok(Service::Notification),
            other => Err(Error::UnknownService(other.to_owned())),
        }
    }
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
