//! Endpoint resolution against the system's port tables.
//!
//! Resolution is eager and all-or-nothing: [`resolve_connections`] binds every
//! endpoint of every connection before anything is classified, and the first
//! dangling reference fails the whole system. The resolved views borrow from
//! the [`System`] and cannot outlive it.

use forge_ir::{Component, Connection, EndpointRef, IntegrationError, Port, System};

/// An endpoint bound to the port it names.
#[derive(Debug, Clone, Copy)]
pub struct ResolvedEndpoint<'a> {
    /// The textual reference.
    pub endpoint: &'a EndpointRef,
    /// The port it names.
    pub port: &'a Port,
    /// The owning component; `None` for top-level ports.
    pub component: Option<&'a Component>,
}

impl ResolvedEndpoint<'_> {
    /// Returns `true` if the endpoint names a top-level port.
    pub fn is_top(&self) -> bool {
        self.component.is_none()
    }

    /// The instance name (`this` for top-level ports).
    pub fn instance(&self) -> &str {
        &self.endpoint.instance
    }

    /// `<instance>.<port>`, for messages.
    pub fn label(&self) -> String {
        self.endpoint.to_string()
    }
}

/// A connection whose endpoints have all been bound.
#[derive(Debug, Clone)]
pub struct ResolvedConnection<'a> {
    /// The connection as declared.
    pub connection: &'a Connection,
    /// The bound source.
    pub source: ResolvedEndpoint<'a>,
    /// The bound destinations, in declaration order.
    pub destinations: Vec<ResolvedEndpoint<'a>>,
}

/// Parses endpoint text into an [`EndpointRef`].
pub fn resolve(endpoint_text: &str) -> Result<EndpointRef, IntegrationError> {
    EndpointRef::parse(endpoint_text)
}

/// Looks up the port an endpoint names.
pub fn bind<'a>(system: &'a System, endpoint: &EndpointRef) -> Result<&'a Port, IntegrationError> {
    lookup(system, endpoint).map(|(port, _)| port)
}

fn lookup<'a>(
    system: &'a System,
    endpoint: &EndpointRef,
) -> Result<(&'a Port, Option<&'a Component>), IntegrationError> {
    if endpoint.is_top() {
        let port = system
            .top_port(&endpoint.port)
            .ok_or_else(|| IntegrationError::UnknownPort {
                instance: endpoint.instance.clone(),
                port: endpoint.port.clone(),
            })?;
        return Ok((port, None));
    }

    let component =
        system
            .component(&endpoint.instance)
            .ok_or_else(|| IntegrationError::UnknownInstance {
                instance: endpoint.instance.clone(),
                endpoint: endpoint.to_string(),
            })?;
    let port = component
        .port(&endpoint.port)
        .ok_or_else(|| IntegrationError::UnknownPort {
            instance: endpoint.instance.clone(),
            port: endpoint.port.clone(),
        })?;
    Ok((port, Some(component)))
}

fn resolve_endpoint<'a>(
    system: &'a System,
    endpoint: &'a EndpointRef,
) -> Result<ResolvedEndpoint<'a>, IntegrationError> {
    let (port, component) = lookup(system, endpoint)?;
    Ok(ResolvedEndpoint {
        endpoint,
        port,
        component,
    })
}

/// Binds every endpoint of every connection, in declaration order.
pub fn resolve_connections(system: &System) -> Result<Vec<ResolvedConnection<'_>>, IntegrationError> {
    system
        .connections()
        .iter()
        .map(|connection| {
            let source = resolve_endpoint(system, &connection.source)?;
            let destinations = connection
                .destinations
                .iter()
                .map(|d| resolve_endpoint(system, d))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(ResolvedConnection {
                connection,
                source,
                destinations,
            })
        })
        .collect()
}
