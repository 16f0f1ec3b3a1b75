//! Port definitions for top-level and component interfaces.
//!
//! A [`Port`] is either a plain [`SignalPort`] (one wire with a direction and
//! width) or an [`InterfacePort`] (a bundle of logical sub-signals following a
//! named wiring protocol).

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::IntegrationError;

/// The direction of a signal port on a module boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Data flows into the module.
    Input,
    /// Data flows out of the module.
    Output,
}

impl Direction {
    /// Returns the opposite direction.
    pub fn flipped(self) -> Self {
        match self {
            Direction::Input => Direction::Output,
            Direction::Output => Direction::Input,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Input => write!(f, "input"),
            Direction::Output => write!(f, "output"),
        }
    }
}

/// The protocol-level role of an interface port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Initiates transfers; forward sub-signals are outputs.
    Master,
    /// Receives transfers; forward sub-signals are inputs.
    Slave,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Master => write!(f, "master"),
            Role::Slave => write!(f, "slave"),
        }
    }
}

/// A single wire port.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignalPort {
    /// The port name.
    pub name: String,
    /// The direction of data flow.
    pub direction: Direction,
    /// The bit width, at least 1.
    pub width: u32,
}

/// A multi-signal port following a wiring protocol such as AXI-Stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterfacePort {
    /// The port name.
    pub name: String,
    /// Master or slave.
    pub role: Role,
    /// The protocol id, e.g. `axi_stream`.
    pub protocol: String,
    /// Protocol parameters; values are decimal literals or symbolic names.
    pub parameters: IndexMap<String, String>,
    /// Logical sub-signal name to the concrete signal name used for this port.
    pub signal_map: IndexMap<String, String>,
}

/// The two port variants, without their payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PortKind {
    /// A [`SignalPort`].
    Signal,
    /// An [`InterfacePort`].
    Interface,
}

impl fmt::Display for PortKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PortKind::Signal => write!(f, "signal"),
            PortKind::Interface => write!(f, "interface"),
        }
    }
}

/// A port on the top-level system or on a component instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Port {
    /// A single wire.
    Signal(SignalPort),
    /// A protocol bundle.
    Interface(InterfacePort),
}

impl Port {
    /// Creates a signal port.
    pub fn signal(name: impl Into<String>, direction: Direction, width: u32) -> Self {
        Port::Signal(SignalPort {
            name: name.into(),
            direction,
            width,
        })
    }

    /// Creates an interface port with empty parameter and signal maps.
    pub fn interface(name: impl Into<String>, role: Role, protocol: impl Into<String>) -> Self {
        Port::Interface(InterfacePort {
            name: name.into(),
            role,
            protocol: protocol.into(),
            parameters: IndexMap::new(),
            signal_map: IndexMap::new(),
        })
    }

    /// Adds a protocol parameter. Has no effect on signal ports.
    pub fn with_parameter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        if let Port::Interface(ref mut iface) = self {
            iface.parameters.insert(key.into(), value.into());
        }
        self
    }

    /// Adds a signal map entry. Has no effect on signal ports.
    pub fn with_mapping(mut self, logical: impl Into<String>, concrete: impl Into<String>) -> Self {
        if let Port::Interface(ref mut iface) = self {
            iface.signal_map.insert(logical.into(), concrete.into());
        }
        self
    }

    /// The port name.
    pub fn name(&self) -> &str {
        match self {
            Port::Signal(s) => &s.name,
            Port::Interface(i) => &i.name,
        }
    }

    /// The variant of this port.
    pub fn kind(&self) -> PortKind {
        match self {
            Port::Signal(_) => PortKind::Signal,
            Port::Interface(_) => PortKind::Interface,
        }
    }
}

/// Checks that two ports may be joined by a connection.
///
/// Both ports must be the same variant, and interface ports must speak the
/// same protocol. Direction and role are not compared. `connection`,
/// `from_label` and `to_label` only feed the error message.
pub fn ports_compatible(
    connection: &str,
    from_label: &str,
    from: &Port,
    to_label: &str,
    to: &Port,
) -> Result<(), IntegrationError> {
    match (from, to) {
        (Port::Signal(_), Port::Signal(_)) => Ok(()),
        (Port::Interface(a), Port::Interface(b)) => {
            if a.protocol == b.protocol {
                Ok(())
            } else {
                Err(IntegrationError::ProtocolMismatch {
                    connection: connection.to_string(),
                    from_port: from_label.to_string(),
                    from_protocol: a.protocol.clone(),
                    to_port: to_label.to_string(),
                    to_protocol: b.protocol.clone(),
                })
            }
        }
        _ => Err(IntegrationError::PortTypeMismatch {
            connection: connection.to_string(),
            from_port: from_label.to_string(),
            from_kind: from.kind(),
            to_port: to_label.to_string(),
            to_kind: to.kind(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn axis(name: &str, role: Role) -> Port {
        Port::interface(name, role, "axi_stream")
            .with_parameter("tdata_width", "32")
            .with_mapping("tdata", format!("{name}_tdata"))
    }

    #[test]
    fn signal_ports_are_compatible_regardless_of_direction() {
        let a = Port::signal("a", Direction::Output, 1);
        let b = Port::signal("b", Direction::Output, 8);
        assert!(ports_compatible("c", "x.a", &a, "y.b", &b).is_ok());
    }

    #[test]
    fn interface_ports_same_protocol_compatible() {
        let m = axis("m_axis", Role::Master);
        let s = axis("s_axis", Role::Master);
        assert!(ports_compatible("c", "a.m_axis", &m, "b.s_axis", &s).is_ok());
    }

    #[test]
    fn signal_to_interface_mismatch_both_directions() {
        let sig = Port::signal("clk", Direction::Input, 1);
        let iface = axis("s_axis", Role::Slave);

        let err = ports_compatible("c0", "this.clk", &sig, "a.s_axis", &iface).unwrap_err();
        assert!(matches!(
            err,
            IntegrationError::PortTypeMismatch {
                from_kind: PortKind::Signal,
                to_kind: PortKind::Interface,
                ..
            }
        ));

        let err = ports_compatible("c0", "a.s_axis", &iface, "this.clk", &sig).unwrap_err();
        assert!(matches!(
            err,
            IntegrationError::PortTypeMismatch {
                from_kind: PortKind::Interface,
                to_kind: PortKind::Signal,
                ..
            }
        ));
    }

    #[test]
    fn protocol_mismatch_names_both_protocols() {
        let a = axis("m_axis", Role::Master);
        let b = Port::interface("s_apb", Role::Slave, "apb");
        match ports_compatible("bus", "a.m_axis", &a, "b.s_apb", &b).unwrap_err() {
            IntegrationError::ProtocolMismatch {
                from_protocol,
                to_protocol,
                ..
            } => {
                assert_eq!(from_protocol, "axi_stream");
                assert_eq!(to_protocol, "apb");
            }
            other => panic!("expected ProtocolMismatch, got {other:?}"),
        }
    }

    #[test]
    fn builders_ignore_signal_ports() {
        let p = Port::signal("clk", Direction::Input, 1)
            .with_parameter("x", "1")
            .with_mapping("a", "b");
        assert_eq!(p, Port::signal("clk", Direction::Input, 1));
    }

    #[test]
    fn direction_flip_and_display() {
        assert_eq!(Direction::Input.flipped(), Direction::Output);
        assert_eq!(Direction::Output.flipped(), Direction::Input);
        assert_eq!(Direction::Input.to_string(), "input");
        assert_eq!(Role::Slave.to_string(), "slave");
    }

    #[test]
    fn port_serde_roundtrip_preserves_map_order() {
        let p = Port::interface("s_axis", Role::Slave, "axi_stream")
            .with_mapping("tvalid", "v")
            .with_mapping("tdata", "d")
            .with_mapping("tready", "r");
        let json = serde_json::to_string(&p).unwrap();
        let back: Port = serde_json::from_str(&json).unwrap();
        let Port::Interface(iface) = back else {
            panic!("expected interface");
        };
        let keys: Vec<_> = iface.signal_map.keys().cloned().collect();
        assert_eq!(keys, ["tvalid", "tdata", "tready"]);
    }
}
