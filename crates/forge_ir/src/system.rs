//! The resolved in-memory model of one system.

use indexmap::IndexMap;
use serde::Serialize;

use crate::component::Component;
use crate::endpoint::{Connection, TOP_INSTANCE};
use crate::error::IntegrationError;
use crate::port::Port;

/// Top-level ports, component instances, and the connections between them.
///
/// Names are unique within each table; the insertion order of every table is
/// the order in which the emitter writes them out.
#[derive(Debug, Clone, Default, Serialize)]
pub struct System {
    top_ports: IndexMap<String, Port>,
    components: IndexMap<String, Component>,
    connections: Vec<Connection>,
}

impl System {
    /// Creates an empty system.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a system from its parts, checking name uniqueness.
    pub fn from_parts(
        top_ports: Vec<Port>,
        components: Vec<Component>,
        connections: Vec<Connection>,
    ) -> Result<Self, IntegrationError> {
        let mut system = Self::new();
        for port in top_ports {
            system.add_top_port(port)?;
        }
        for component in components {
            system.add_component(component)?;
        }
        for connection in connections {
            system.add_connection(connection);
        }
        Ok(system)
    }

    /// Adds a top-level port.
    pub fn add_top_port(&mut self, port: Port) -> Result<(), IntegrationError> {
        let name = port.name().to_string();
        if self.top_ports.contains_key(&name) {
            return Err(IntegrationError::DuplicatePort {
                instance: TOP_INSTANCE.to_string(),
                port: name,
            });
        }
        self.top_ports.insert(name, port);
        Ok(())
    }

    /// Adds a component instance.
    ///
    /// Fails with `DuplicateInstance` if the name is taken, and with
    /// `ReservedInstanceName` for the top-level sentinel.
    pub fn add_component(&mut self, component: Component) -> Result<(), IntegrationError> {
        if component.name == TOP_INSTANCE {
            return Err(IntegrationError::ReservedInstanceName {
                name: component.name,
            });
        }
        if self.components.contains_key(&component.name) {
            return Err(IntegrationError::DuplicateInstance {
                name: component.name,
            });
        }
        self.components.insert(component.name.clone(), component);
        Ok(())
    }

    /// Appends a connection. Connections are processed in insertion order.
    pub fn add_connection(&mut self, connection: Connection) {
        self.connections.push(connection);
    }

    /// Top-level ports in declaration order.
    pub fn top_ports(&self) -> &IndexMap<String, Port> {
        &self.top_ports
    }

    /// Component instances in declaration order.
    pub fn components(&self) -> &IndexMap<String, Component> {
        &self.components
    }

    /// Connections in declaration order.
    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    /// Looks up a top-level port.
    pub fn top_port(&self, name: &str) -> Option<&Port> {
        self.top_ports.get(name)
    }

    /// Looks up a component instance.
    pub fn component(&self, name: &str) -> Option<&Component> {
        self.components.get(name)
    }
}
