//! Endpoint references and the connections that join them.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::IntegrationError;

/// Instance name that refers to the top-level system itself.
pub const TOP_INSTANCE: &str = "this";

/// A textual reference to a port: `<instance>.<port>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EndpointRef {
    /// `this` or a component instance name.
    pub instance: String,
    /// The port name within that scope.
    pub port: String,
}

impl EndpointRef {
    /// Creates an endpoint from its two halves.
    pub fn new(instance: impl Into<String>, port: impl Into<String>) -> Self {
        Self {
            instance: instance.into(),
            port: port.into(),
        }
    }

    /// Parses `<instance>.<port>`, splitting on the first `.`.
    ///
    /// Both halves must be non-empty.
    pub fn parse(text: &str) -> Result<Self, IntegrationError> {
        match text.split_once('.') {
            Some((instance, port)) if !instance.is_empty() && !port.is_empty() => {
                Ok(Self::new(instance, port))
            }
            _ => Err(IntegrationError::MalformedEndpoint {
                text: text.to_string(),
            }),
        }
    }

    /// Returns `true` if this endpoint names a top-level port.
    pub fn is_top(&self) -> bool {
        self.instance == TOP_INSTANCE
    }
}

impl fmt::Display for EndpointRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.instance, self.port)
    }
}

/// A named connection from one source endpoint to one or more destinations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Connection {
    /// The connection name, used in messages.
    pub name: String,
    /// The driving endpoint.
    pub source: EndpointRef,
    /// Fan-out destinations in declaration order.
    pub destinations: Vec<EndpointRef>,
}

impl Connection {
    /// Creates a connection from already-parsed endpoints.
    pub fn new(name: impl Into<String>, source: EndpointRef, destinations: Vec<EndpointRef>) -> Self {
        Self {
            name: name.into(),
            source,
            destinations,
        }
    }

    /// Parses a connection from endpoint texts.
    pub fn parse<S: AsRef<str>>(
        name: impl Into<String>,
        source: &str,
        destinations: &[S],
    ) -> Result<Self, IntegrationError> {
        let source = EndpointRef::parse(source)?;
        let destinations = destinations
            .iter()
            .map(|d| EndpointRef::parse(d.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(name, source, destinations))
    }
}
