//! Component instances placed in a system.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::IntegrationError;
use crate::port::Port;

/// A parameter override value given at instantiation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    /// A literal integer.
    Integer(i64),
    /// A symbolic name, emitted verbatim and followed during width resolution.
    Symbolic(String),
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Integer(v) => write!(f, "{v}"),
            ParamValue::Symbolic(s) => write!(f, "{s}"),
        }
    }
}

/// A named instance of a hardware building block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Component {
    /// The instance name, unique within the system.
    pub name: String,
    /// Where the block's port specification came from.
    pub spec_reference: String,
    /// Where the block's HDL source lives.
    pub source_reference: String,
    /// Parameter overrides in declaration order.
    pub parameters: IndexMap<String, ParamValue>,
    /// The block's ports keyed by port name.
    pub ports: IndexMap<String, Port>,
}

impl Component {
    /// Creates a component with no parameters and no ports.
    pub fn new(
        name: impl Into<String>,
        spec_reference: impl Into<String>,
        source_reference: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            spec_reference: spec_reference.into(),
            source_reference: source_reference.into(),
            parameters: IndexMap::new(),
            ports: IndexMap::new(),
        }
    }

    /// Adds a parameter override.
    pub fn with_parameter(mut self, key: impl Into<String>, value: ParamValue) -> Self {
        self.parameters.insert(key.into(), value);
        self
    }

    /// Adds a port, failing if the name is already taken.
    pub fn add_port(&mut self, port: Port) -> Result<(), IntegrationError> {
        let name = port.name().to_string();
        if self.ports.contains_key(&name) {
            return Err(IntegrationError::DuplicatePort {
                instance: self.name.clone(),
                port: name,
            });
        }
        self.ports.insert(name, port);
        Ok(())
    }

    /// Builder form of [`add_port`](Self::add_port); a duplicate replaces the earlier port.
    pub fn with_port(mut self, port: Port) -> Self {
        self.ports.insert(port.name().to_string(), port);
        self
    }

    /// Looks up a port by name.
    pub fn port(&self, name: &str) -> Option<&Port> {
        self.ports.get(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::port::Direction;

    #[test]
    fn add_port_rejects_duplicates() {
        let mut c = Component::new("fifo0", "fifo.json", "fifo.sv");
        c.add_port(Port::signal("clk", Direction::Input, 1)).unwrap();
        let err = c
            .add_port(Port::signal("clk", Direction::Input, 1))
            .unwrap_err();
        assert_eq!(
            err,
            IntegrationError::DuplicatePort {
                instance: "fifo0".to_string(),
                port: "clk".to_string(),
            }
        );
    }

    #[test]
    fn parameters_keep_insertion_order() {
        let c = Component::new("a", "a.json", "a.sv")
            .with_parameter("WIDTH", ParamValue::Integer(32))
            .with_parameter("MODE", ParamValue::Symbolic("FAST".to_string()))
            .with_parameter("DEPTH", ParamValue::Integer(16));
        let keys: Vec<_> = c.parameters.keys().map(String::as_str).collect();
        assert_eq!(keys, ["WIDTH", "MODE", "DEPTH"]);
    }

    #[test]
    fn param_value_untagged_serde() {
        let v: ParamValue = serde_json::from_str("32").unwrap();
        assert_eq!(v, ParamValue::Integer(32));
        let v: ParamValue = serde_json::from_str("\"DATA_W\"").unwrap();
        assert_eq!(v, ParamValue::Symbolic("DATA_W".to_string()));
        assert_eq!(ParamValue::Integer(-4).to_string(), "-4");
    }
}
