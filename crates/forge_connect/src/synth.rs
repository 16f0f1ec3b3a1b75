//! Interconnect synthesis for component-to-component connections.
//!
//! When neither end of a connection is a top-level port, the two component
//! ports are joined through freshly declared wires. Wire names come from a
//! counter local to one build, so identical input always yields identical
//! names.

use indexmap::IndexMap;

use forge_ir::{Component, IntegrationError, InterfacePort, Port, ProtocolRegistry, SignalPort};

use crate::width::resolve_width;

/// A wire declared inside the top module to join two component ports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterconnectSignal {
    /// Generated name, unique within the build.
    pub name: String,
    /// Bit width, at least 1.
    pub width: u32,
}

/// Creates interconnect ports and keeps the list of wires they introduce.
#[derive(Debug, Default)]
pub struct InterconnectSynthesizer {
    next_id: usize,
    signals: Vec<InterconnectSignal>,
}

impl InterconnectSynthesizer {
    /// Creates a synthesizer whose first port is `interconnect_0`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Synthesizes the external side for a port owned by `component`.
    ///
    /// A signal port yields one wire of the same width. An interface port
    /// yields an interface with the same protocol and parameters whose signal
    /// map points every logical sub-signal at a new `<base>_<sub-signal>`
    /// wire; width-bearing sub-signals take their width from the port's
    /// parameters resolved against `component`'s overrides.
    pub fn synthesize(
        &mut self,
        source: &Port,
        component: &Component,
        registry: &ProtocolRegistry,
    ) -> Result<Port, IntegrationError> {
        let base = format!("interconnect_{}", self.next_id);
        let (port, wires) = match source {
            Port::Signal(sig) => {
                let wire = InterconnectSignal {
                    name: base.clone(),
                    width: sig.width,
                };
                let port = Port::Signal(SignalPort {
                    name: base,
                    direction: sig.direction,
                    width: sig.width,
                });
                (port, vec![wire])
            }
            Port::Interface(iface) => synthesize_interface(base, iface, component, registry)?,
        };
        self.next_id += 1;
        self.signals.extend(wires);
        Ok(port)
    }

    /// Consumes the synthesizer, returning its wires.
    pub fn into_signals(self) -> Vec<InterconnectSignal> {
        self.signals
    }
}

fn synthesize_interface(
    base: String,
    iface: &InterfacePort,
    component: &Component,
    registry: &ProtocolRegistry,
) -> Result<(Port, Vec<InterconnectSignal>), IntegrationError> {
    let descriptor = registry.require(&iface.protocol, &component.name, &iface.name)?;

    let mut signal_map = IndexMap::with_capacity(iface.signal_map.len());
    let mut wires = Vec::with_capacity(iface.signal_map.len());
    for logical in iface.signal_map.keys() {
        let width = match descriptor.width_param(logical) {
            Some(key) => {
                let value =
                    iface
                        .parameters
                        .get(key)
                        .ok_or_else(|| IntegrationError::MissingParameter {
                            key: key.to_string(),
                            instance: component.name.clone(),
                            port: iface.name.clone(),
                        })?;
                resolve_width(key, value, component)?
            }
            None => 1,
        };
        let name = format!("{base}_{logical}");
        signal_map.insert(logical.clone(), name.clone());
        wires.push(InterconnectSignal { name, width });
    }

    let port = Port::Interface(InterfacePort {
        name: base,
        role: iface.role,
        protocol: iface.protocol.clone(),
        parameters: iface.parameters.clone(),
        signal_map,
    });
    Ok((port, wires))
}

#[cfg(test)]
mod tests {
    use super::*;
    use forge_ir::{Direction, ParamValue, Role};

    fn producer() -> Component {
        Component::new("a", "a.json", "a.sv").with_parameter("DATA_W", ParamValue::Integer(16))
    }

    fn m_axis(width: &str) -> Port {
        Port::interface("m_axis", Role::Master, "axi_stream")
            .with_parameter("tdata_width", width)
            .with_mapping("tdata", "m_axis_tdata")
            .with_mapping("tvalid", "m_axis_tvalid")
            .with_mapping("tready", "m_axis_tready")
    }

    #[test]
    fn signal_gets_one_wire_of_source_width() {
        let mut synth = InterconnectSynthesizer::new();
        let port = synth
            .synthesize(
                &Port::signal("dout", Direction::Output, 12),
                &producer(),
                &ProtocolRegistry::with_builtins(),
            )
            .unwrap();
        assert_eq!(port, Port::signal("interconnect_0", Direction::Output, 12));
        assert_eq!(
            synth.into_signals(),
            [InterconnectSignal {
                name: "interconnect_0".to_string(),
                width: 12
            }]
        );
    }

    #[test]
    fn interface_wires_follow_signal_map_order() {
        let mut synth = InterconnectSynthesizer::new();
        let port = synth
            .synthesize(&m_axis("32"), &producer(), &ProtocolRegistry::with_builtins())
            .unwrap();

        let Port::Interface(iface) = port else {
            panic!("expected interface");
        };
        assert_eq!(iface.name, "interconnect_0");
        assert_eq!(iface.protocol, "axi_stream");
        assert_eq!(iface.signal_map["tdata"], "interconnect_0_tdata");
        assert_eq!(iface.signal_map["tready"], "interconnect_0_tready");

        let signals = synth.into_signals();
        let wires: Vec<_> = signals
            .iter()
            .map(|s| (s.name.as_str(), s.width))
            .collect();
        assert_eq!(
            wires,
            [
                ("interconnect_0_tdata", 32),
                ("interconnect_0_tvalid", 1),
                ("interconnect_0_tready", 1),
            ]
        );
    }

    #[test]
    fn width_resolves_through_overrides() {
        let mut synth = InterconnectSynthesizer::new();
        synth
            .synthesize(&m_axis("DATA_W"), &producer(), &ProtocolRegistry::with_builtins())
            .unwrap();
        assert_eq!(synth.into_signals()[0].width, 16);
    }

    #[test]
    fn counter_advances_per_port() {
        let registry = ProtocolRegistry::with_builtins();
        let mut synth = InterconnectSynthesizer::new();
        let sig = Port::signal("d", Direction::Output, 1);
        synth.synthesize(&sig, &producer(), &registry).unwrap();
        let second = synth.synthesize(&sig, &producer(), &registry).unwrap();
        assert_eq!(second.name(), "interconnect_1");
        assert_eq!(synth.into_signals().len(), 2);
    }

    #[test]
    fn missing_width_parameter() {
        let port = Port::interface("m_axis", Role::Master, "axi_stream")
            .with_mapping("tdata", "m_axis_tdata");
        let err = InterconnectSynthesizer::new()
            .synthesize(&port, &producer(), &ProtocolRegistry::with_builtins())
            .unwrap_err();
        assert!(matches!(
            err,
            IntegrationError::MissingParameter { ref key, ref instance, .. }
                if key == "tdata_width" && instance == "a"
        ));
    }

    #[test]
    fn unresolvable_width() {
        let err = InterconnectSynthesizer::new()
            .synthesize(&m_axis("WIDE"), &producer(), &ProtocolRegistry::with_builtins())
            .unwrap_err();
        assert!(matches!(err, IntegrationError::UnresolvedWidth { .. }));
    }

    #[test]
    fn unknown_protocol_is_unsupported() {
        let port = Port::interface("bus", Role::Master, "wishbone").with_mapping("cyc", "cyc_o");
        let err = InterconnectSynthesizer::new()
            .synthesize(&port, &producer(), &ProtocolRegistry::with_builtins())
            .unwrap_err();
        assert!(matches!(err, IntegrationError::UnsupportedProtocol { ref protocol, .. } if protocol == "wishbone"));
    }

    #[test]
    fn failed_synthesis_does_not_advance_counter() {
        let registry = ProtocolRegistry::with_builtins();
        let mut synth = InterconnectSynthesizer::new();
        assert!(synth.synthesize(&m_axis("WIDE"), &producer(), &registry).is_err());
        let port = synth.synthesize(&m_axis("8"), &producer(), &registry).unwrap();
        assert_eq!(port.name(), "interconnect_0");
        assert_eq!(synth.into_signals().len(), 3);
    }
}
