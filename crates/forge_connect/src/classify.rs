//! Connection classification and per-instance signal-map construction.
//!
//! Each (source, destination) pair of a connection is one of:
//!
//! - **direct**: exactly one side is a top-level port. The component side is
//!   bound straight to the top-level signal names.
//! - **intermediate**: both sides are component ports. The pair is joined
//!   through a synthesized interconnect; all intermediate pairs of one
//!   connection share the same interconnect.
//! - **top loop**: both sides are top-level ports. The pair becomes a
//!   feedthrough `assign` inside the top module.
//!
//! A component port that drives a connection drives a single net for the
//! whole build. Intermediate pairs reuse that net when the port is already
//! bound or when the same connection also reaches a top-level port; extra
//! top-level outputs on the net are driven by `assign`.
//!
//! The result is a [`ConnectionPlan`] that the emitter consumes unchanged.

use indexmap::IndexMap;

use forge_diagnostics::DiagnosticSink;
use forge_ir::{
    ports_compatible, Component, Direction, IntegrationError, InterfacePort, Port,
    ProtocolRegistry, System, TOP_INSTANCE,
};

use crate::errors;
use crate::resolve::{resolve_connections, ResolvedConnection, ResolvedEndpoint};
use crate::synth::{InterconnectSignal, InterconnectSynthesizer};

/// Component port signal name to the external signal it binds to.
pub type SignalMap = IndexMap<String, String>;

/// How a (source, destination) pair is wired.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PairKind {
    /// One top-level port and one component port.
    Direct,
    /// Two component ports joined through an interconnect.
    Intermediate,
    /// Two top-level ports.
    TopLoop,
}

impl PairKind {
    /// Classifies a pair of resolved endpoints.
    pub fn of(source: &ResolvedEndpoint<'_>, destination: &ResolvedEndpoint<'_>) -> Self {
        match (source.is_top(), destination.is_top()) {
            (true, true) => PairKind::TopLoop,
            (false, false) => PairKind::Intermediate,
            _ => PairKind::Direct,
        }
    }
}

/// A continuous assignment inside the top module.
///
/// The target is a top-level output or a synthesized wire, never a
/// top-level input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Feedthrough {
    /// The driven signal.
    pub target: String,
    /// The driving signal.
    pub driver: String,
}

/// Everything classification produced for one build.
#[derive(Debug, Clone, Default)]
pub struct ConnectionPlan {
    signal_maps: IndexMap<String, SignalMap>,
    interconnects: Vec<InterconnectSignal>,
    feedthroughs: Vec<Feedthrough>,
}

impl ConnectionPlan {
    /// Signal maps for every component instance, in declaration order.
    ///
    /// Instances that no connection touches have an empty map.
    pub fn signal_maps(&self) -> &IndexMap<String, SignalMap> {
        &self.signal_maps
    }

    /// The signal map of one instance.
    pub fn signal_map(&self, instance: &str) -> Option<&SignalMap> {
        self.signal_maps.get(instance)
    }

    /// Synthesized wires in creation order.
    pub fn interconnects(&self) -> &[InterconnectSignal] {
        &self.interconnects
    }

    /// Continuous assignments in connection order.
    pub fn feedthroughs(&self) -> &[Feedthrough] {
        &self.feedthroughs
    }
}

/// Resolves, checks, and classifies every connection of `system`.
///
/// Endpoints are all bound before any pair is classified. The first error
/// aborts the build. Role and direction oddities and unconnected component
/// ports are reported to `sink` as warnings.
pub fn plan_connections(
    system: &System,
    registry: &ProtocolRegistry,
    sink: &DiagnosticSink,
) -> Result<ConnectionPlan, IntegrationError> {
    let resolved = resolve_connections(system)?;

    let mut builder = PlanBuilder {
        registry,
        sink,
        synth: InterconnectSynthesizer::new(),
        signal_maps: system
            .components()
            .keys()
            .map(|name| (name.clone(), SignalMap::new()))
            .collect(),
        feedthroughs: Vec::new(),
    };

    for connection in &resolved {
        builder.classify(connection)?;
    }

    for component in system.components().values() {
        builder.report_unconnected(component);
    }

    Ok(ConnectionPlan {
        signal_maps: builder.signal_maps,
        interconnects: builder.synth.into_signals(),
        feedthroughs: builder.feedthroughs,
    })
}

struct PlanBuilder<'r> {
    registry: &'r ProtocolRegistry,
    sink: &'r DiagnosticSink,
    synth: InterconnectSynthesizer,
    signal_maps: IndexMap<String, SignalMap>,
    feedthroughs: Vec<Feedthrough>,
}

/// The external port a component source drives, with its owner for messages.
struct Net {
    port: Port,
    owner: String,
}

impl PlanBuilder<'_> {
    fn classify(&mut self, resolved: &ResolvedConnection<'_>) -> Result<(), IntegrationError> {
        let name = resolved.connection.name.as_str();
        let source = &resolved.source;

        for destination in &resolved.destinations {
            ports_compatible(
                name,
                &source.label(),
                source.port,
                &destination.label(),
                destination.port,
            )?;
            self.check_signal_maps(source, destination)?;
            let kind = PairKind::of(source, destination);
            self.check_orientation(name, kind, source, destination);
        }

        let Some(from) = source.component else {
            for destination in &resolved.destinations {
                match destination.component {
                    Some(_) => self.bind(name, destination, source.port, TOP_INSTANCE)?,
                    None => self.feedthrough(source.port, destination.port)?,
                }
            }
            return Ok(());
        };

        // A component port drives one net per build: whatever it is already
        // bound to, else the first top-level destination, else a fresh
        // interconnect.
        let mut net = self.existing_net(source).or_else(|| {
            resolved
                .destinations
                .iter()
                .find(|d| d.is_top())
                .map(|d| Net {
                    port: d.port.clone(),
                    owner: TOP_INSTANCE.to_string(),
                })
        });

        for destination in &resolved.destinations {
            let current = match net.take() {
                Some(current) => current,
                None => Net {
                    port: self.synth.synthesize(source.port, from, self.registry)?,
                    owner: from.name.clone(),
                },
            };
            self.bind(name, source, &current.port, &current.owner)?;
            match destination.component {
                Some(_) => self.bind(name, destination, &current.port, &current.owner)?,
                None => self.bridge(&current.port, destination.port)?,
            }
            net = Some(current);
        }
        Ok(())
    }

    /// The net a component port is already bound to, if every one of its
    /// signals is bound.
    fn existing_net(&self, endpoint: &ResolvedEndpoint<'_>) -> Option<Net> {
        let map = self.signal_maps.get(endpoint.instance())?;
        let port = match endpoint.port {
            Port::Signal(sig) => {
                Port::signal(map.get(&sig.name)?.clone(), sig.direction, sig.width)
            }
            Port::Interface(iface) => {
                if iface.signal_map.is_empty() {
                    return None;
                }
                let mut net = Port::interface(iface.name.clone(), iface.role, iface.protocol.clone());
                for (logical, concrete) in &iface.signal_map {
                    net = net.with_mapping(logical.clone(), map.get(concrete)?.clone());
                }
                net
            }
        };
        Some(Net {
            port,
            owner: endpoint.instance().to_string(),
        })
    }

    /// Drives the outputs of a top-level port from a component's net.
    fn bridge(&mut self, net: &Port, top: &Port) -> Result<(), IntegrationError> {
        match (net, top) {
            (Port::Signal(n), Port::Signal(t)) => self.push_bridge(&n.name, &t.name, t.direction),
            (Port::Interface(n), Port::Interface(t)) => {
                let descriptor = self.registry.require(&t.protocol, TOP_INSTANCE, &t.name)?;
                for (logical, top_signal) in &t.signal_map {
                    let net_signal = n.signal_map.get(logical).ok_or_else(|| {
                        IntegrationError::SignalMapMismatch {
                            signal: logical.clone(),
                            instance: TOP_INSTANCE.to_string(),
                            port: t.name.clone(),
                        }
                    })?;
                    self.push_bridge(net_signal, top_signal, descriptor.direction(logical, t.role));
                }
            }
            // Already rejected by `ports_compatible`.
            _ => {}
        }
        Ok(())
    }

    /// Top-level inputs are never assigned.
    fn push_bridge(&mut self, net: &str, top: &str, top_dir: Direction) {
        if top_dir == Direction::Output && net != top {
            self.feedthroughs.push(Feedthrough {
                target: top.to_string(),
                driver: net.to_string(),
            });
        }
    }

    /// Records the bindings of a component-side port against an external port.
    fn bind(
        &mut self,
        connection: &str,
        component_side: &ResolvedEndpoint<'_>,
        external: &Port,
        external_instance: &str,
    ) -> Result<(), IntegrationError> {
        let instance = component_side.instance();
        match (component_side.port, external) {
            (Port::Signal(port), Port::Signal(ext)) => self.record(instance, &port.name, &ext.name),
            (Port::Interface(port), Port::Interface(ext)) => {
                for (logical, concrete) in &port.signal_map {
                    let target = ext.signal_map.get(logical).ok_or_else(|| {
                        IntegrationError::SignalMapMismatch {
                            signal: logical.clone(),
                            instance: external_instance.to_string(),
                            port: ext.name.clone(),
                        }
                    })?;
                    self.record(instance, concrete, target)?;
                }
                Ok(())
            }
            (port, ext) => Err(IntegrationError::PortTypeMismatch {
                connection: connection.to_string(),
                from_port: component_side.label(),
                from_kind: port.kind(),
                to_port: format!("{external_instance}.{}", ext.name()),
                to_kind: ext.kind(),
            }),
        }
    }

    fn record(&mut self, instance: &str, signal: &str, external: &str) -> Result<(), IntegrationError> {
        let map = self.signal_maps.entry(instance.to_string()).or_default();
        match map.get(signal) {
            Some(existing) if existing != external => Err(IntegrationError::ConflictingBinding {
                instance: instance.to_string(),
                signal: signal.to_string(),
                existing: existing.clone(),
                requested: external.to_string(),
            }),
            Some(_) => Ok(()),
            None => {
                map.insert(signal.to_string(), external.to_string());
                Ok(())
            }
        }
    }

    /// Both interface ports must map the protocol's canonical sub-signals and
    /// exactly the same logical keys.
    fn check_signal_maps(
        &self,
        source: &ResolvedEndpoint<'_>,
        destination: &ResolvedEndpoint<'_>,
    ) -> Result<(), IntegrationError> {
        let (Port::Interface(a), Port::Interface(b)) = (source.port, destination.port) else {
            return Ok(());
        };

        if let Some(descriptor) = self.registry.get(&a.protocol) {
            for required in descriptor.required_signals() {
                require_mapping(&required.name, a, source.instance())?;
                require_mapping(&required.name, b, destination.instance())?;
            }
        }
        for logical in a.signal_map.keys() {
            require_mapping(logical, b, destination.instance())?;
        }
        for logical in b.signal_map.keys() {
            require_mapping(logical, a, source.instance())?;
        }
        Ok(())
    }

    /// Warns when a pair does not look like one driver and one receiver.
    ///
    /// Across the top boundary matching directions are expected (a top input
    /// feeds a component input); between two components or two top ports
    /// opposite ones are.
    fn check_orientation(
        &self,
        connection: &str,
        kind: PairKind,
        source: &ResolvedEndpoint<'_>,
        destination: &ResolvedEndpoint<'_>,
    ) {
        let (same, from, to) = match (source.port, destination.port) {
            (Port::Signal(a), Port::Signal(b)) => (
                a.direction == b.direction,
                a.direction.to_string(),
                b.direction.to_string(),
            ),
            (Port::Interface(a), Port::Interface(b)) => {
                (a.role == b.role, a.role.to_string(), b.role.to_string())
            }
            _ => return,
        };
        let expect_same = kind == PairKind::Direct;
        if same != expect_same {
            self.sink.emit(errors::warning_orientation(
                connection,
                &source.label(),
                &from,
                &destination.label(),
                &to,
            ));
        }
    }

    fn feedthrough(&mut self, source: &Port, destination: &Port) -> Result<(), IntegrationError> {
        match (source, destination) {
            (Port::Signal(a), Port::Signal(b)) => {
                self.push_assign(&a.name, a.direction, &b.name, b.direction);
            }
            (Port::Interface(a), Port::Interface(b)) => {
                let descriptor = self.registry.require(&a.protocol, TOP_INSTANCE, &a.name)?;
                for (logical, a_signal) in &a.signal_map {
                    let b_signal = b.signal_map.get(logical).ok_or_else(|| {
                        IntegrationError::SignalMapMismatch {
                            signal: logical.clone(),
                            instance: TOP_INSTANCE.to_string(),
                            port: b.name.clone(),
                        }
                    })?;
                    self.push_assign(
                        a_signal,
                        descriptor.direction(logical, a.role),
                        b_signal,
                        descriptor.direction(logical, b.role),
                    );
                }
            }
            // Already rejected by `ports_compatible`.
            _ => {}
        }
        Ok(())
    }

    /// A top-level input drives; with no clear driver the source drives.
    /// Self-assignments and assignments to a top-level input are skipped.
    fn push_assign(&mut self, from: &str, from_dir: Direction, to: &str, to_dir: Direction) {
        if from == to {
            return;
        }
        let (target, driver) = match (from_dir, to_dir) {
            (_, Direction::Output) => (to, from),
            (Direction::Output, Direction::Input) => (from, to),
            (Direction::Input, Direction::Input) => return,
        };
        self.feedthroughs.push(Feedthrough {
            target: target.to_string(),
            driver: driver.to_string(),
        });
    }

    fn report_unconnected(&self, component: &Component) {
        let Some(map) = self.signal_maps.get(&component.name) else {
            return;
        };
        for port in component.ports.values() {
            let connected = match port {
                Port::Signal(sig) => map.contains_key(&sig.name),
                Port::Interface(iface) => iface.signal_map.values().any(|s| map.contains_key(s)),
            };
            if !connected {
                self.sink
                    .emit(errors::warning_unconnected(&component.name, port.name()));
            }
        }
    }
}

fn require_mapping(logical: &str, port: &InterfacePort, instance: &str) -> Result<(), IntegrationError> {
    if port.signal_map.contains_key(logical) {
        Ok(())
    } else {
        Err(IntegrationError::SignalMapMismatch {
            signal: logical.to_string(),
            instance: instance.to_string(),
            port: port.name.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use forge_diagnostics::Severity;
    use forge_ir::{Connection, ParamValue, Role};

    fn axis(name: &str, role: Role, prefix: &str, width: &str) -> Port {
        Port::interface(name, role, "axi_stream")
            .with_parameter("tdata_width", width)
            .with_mapping("tdata", format!("{prefix}_tdata"))
            .with_mapping("tvalid", format!("{prefix}_tvalid"))
            .with_mapping("tready", format!("{prefix}_tready"))
    }

    fn producer() -> Component {
        Component::new("a", "a.json", "a.sv")
            .with_parameter("DATA_W", ParamValue::Integer(32))
            .with_port(Port::signal("clk_in", Direction::Input, 1))
            .with_port(Port::signal("dout", Direction::Output, 8))
            .with_port(axis("m_axis", Role::Master, "m_axis", "32"))
    }

    fn consumer(name: &str) -> Component {
        Component::new(name, "b.json", "b.sv")
            .with_port(Port::signal("clk_in", Direction::Input, 1))
            .with_port(Port::signal("din", Direction::Input, 8))
            .with_port(axis("s_axis", Role::Slave, "s_axis", "32"))
    }

    fn plan(system: &System) -> Result<ConnectionPlan, IntegrationError> {
        plan_connections(system, &ProtocolRegistry::with_builtins(), &DiagnosticSink::new())
    }

    fn conn(name: &str, src: &str, dsts: &[&str]) -> Connection {
        Connection::parse(name, src, dsts).unwrap()
    }

    #[test]
    fn no_connections_yields_empty_maps() {
        let system = System::from_parts(vec![], vec![producer()], vec![]).unwrap();
        let plan = plan(&system).unwrap();
        assert!(plan.signal_map("a").unwrap().is_empty());
        assert!(plan.interconnects().is_empty());
        assert!(plan.feedthroughs().is_empty());
    }

    #[test]
    fn direct_signal_binding() {
        let system = System::from_parts(
            vec![Port::signal("clk", Direction::Output, 1)],
            vec![producer()],
            vec![conn("c0", "this.clk", &["a.clk_in"])],
        )
        .unwrap();
        let plan = plan(&system).unwrap();
        assert_eq!(plan.signal_map("a").unwrap()["clk_in"], "clk");
        assert!(plan.interconnects().is_empty());
    }

    #[test]
    fn direct_binding_from_component_to_top() {
        let system = System::from_parts(
            vec![Port::signal("result", Direction::Output, 8)],
            vec![producer()],
            vec![conn("c0", "a.dout", &["this.result"])],
        )
        .unwrap();
        let plan = plan(&system).unwrap();
        assert_eq!(plan.signal_map("a").unwrap()["dout"], "result");
    }

    #[test]
    fn direct_interface_binding_uses_top_signal_names() {
        let system = System::from_parts(
            vec![axis("s_axis", Role::Slave, "in", "32")],
            vec![consumer("b")],
            vec![conn("c0", "this.s_axis", &["b.s_axis"])],
        )
        .unwrap();
        let plan = plan(&system).unwrap();
        let map = plan.signal_map("b").unwrap();
        assert_eq!(map["s_axis_tdata"], "in_tdata");
        assert_eq!(map["s_axis_tvalid"], "in_tvalid");
        assert_eq!(map["s_axis_tready"], "in_tready");
    }

    #[test]
    fn intermediate_axi_stream_creates_one_interconnect_set() {
        let system = System::from_parts(
            vec![],
            vec![producer(), consumer("b")],
            vec![conn("stream", "a.m_axis", &["b.s_axis"])],
        )
        .unwrap();
        let plan = plan(&system).unwrap();

        let wires: Vec<_> = plan
            .interconnects()
            .iter()
            .map(|w| (w.name.as_str(), w.width))
            .collect();
        assert_eq!(
            wires,
            [
                ("interconnect_0_tdata", 32),
                ("interconnect_0_tvalid", 1),
                ("interconnect_0_tready", 1),
            ]
        );

        let a = plan.signal_map("a").unwrap();
        let b = plan.signal_map("b").unwrap();
        assert_eq!(a["m_axis_tdata"], "interconnect_0_tdata");
        assert_eq!(b["s_axis_tdata"], "interconnect_0_tdata");
        assert_eq!(a["m_axis_tready"], b["s_axis_tready"]);
    }

    #[test]
    fn fan_out_shares_one_interconnect() {
        let system = System::from_parts(
            vec![],
            vec![producer(), consumer("b"), consumer("c")],
            vec![conn("bus", "a.dout", &["b.din", "c.din"])],
        )
        .unwrap();
        let plan = plan(&system).unwrap();
        assert_eq!(plan.interconnects().len(), 1);
        assert_eq!(plan.interconnects()[0].width, 8);
        assert_eq!(plan.signal_map("b").unwrap()["din"], "interconnect_0");
        assert_eq!(plan.signal_map("c").unwrap()["din"], "interconnect_0");
    }

    #[test]
    fn top_fan_out_binds_every_destination() {
        let system = System::from_parts(
            vec![Port::signal("clk", Direction::Input, 1)],
            vec![producer(), consumer("b")],
            vec![conn("clocks", "this.clk", &["a.clk_in", "b.clk_in"])],
        )
        .unwrap();
        let plan = plan(&system).unwrap();
        assert_eq!(plan.signal_map("a").unwrap()["clk_in"], "clk");
        assert_eq!(plan.signal_map("b").unwrap()["clk_in"], "clk");
    }

    #[test]
    fn signal_to_interface_is_type_mismatch() {
        let system = System::from_parts(
            vec![Port::signal("clk", Direction::Input, 1)],
            vec![consumer("b")],
            vec![conn("bad", "this.clk", &["b.s_axis"])],
        )
        .unwrap();
        assert!(matches!(
            plan(&system),
            Err(IntegrationError::PortTypeMismatch { .. })
        ));
    }

    #[test]
    fn missing_tdata_is_signal_map_mismatch() {
        let lacking = Port::interface("s_axis", Role::Slave, "axi_stream")
            .with_mapping("tvalid", "s_axis_tvalid")
            .with_mapping("tready", "s_axis_tready");
        let b = Component::new("b", "b.json", "b.sv").with_port(lacking);
        let system = System::from_parts(
            vec![],
            vec![producer(), b],
            vec![conn("stream", "a.m_axis", &["b.s_axis"])],
        )
        .unwrap();
        match plan(&system).unwrap_err() {
            IntegrationError::SignalMapMismatch {
                signal, instance, ..
            } => {
                assert_eq!(signal, "tdata");
                assert_eq!(instance, "b");
            }
            other => panic!("expected SignalMapMismatch, got {other:?}"),
        }
    }

    #[test]
    fn extra_optional_signal_on_one_side_is_mismatch() {
        let top = axis("s_axis", Role::Slave, "in", "32").with_mapping("tlast", "in_tlast");
        let system = System::from_parts(
            vec![top],
            vec![consumer("b")],
            vec![conn("c0", "this.s_axis", &["b.s_axis"])],
        )
        .unwrap();
        match plan(&system).unwrap_err() {
            IntegrationError::SignalMapMismatch {
                signal, instance, ..
            } => {
                assert_eq!(signal, "tlast");
                assert_eq!(instance, "b");
            }
            other => panic!("expected SignalMapMismatch, got {other:?}"),
        }
    }

    #[test]
    fn conflicting_binding_is_rejected() {
        let system = System::from_parts(
            vec![
                Port::signal("clk_a", Direction::Input, 1),
                Port::signal("clk_b", Direction::Input, 1),
            ],
            vec![producer()],
            vec![
                conn("c0", "this.clk_a", &["a.clk_in"]),
                conn("c1", "this.clk_b", &["a.clk_in"]),
            ],
        )
        .unwrap();
        assert!(matches!(
            plan(&system),
            Err(IntegrationError::ConflictingBinding { ref existing, ref requested, .. })
                if existing == "clk_a" && requested == "clk_b"
        ));
    }

    #[test]
    fn repeated_identical_binding_is_accepted() {
        let system = System::from_parts(
            vec![Port::signal("clk", Direction::Input, 1)],
            vec![producer()],
            vec![
                conn("c0", "this.clk", &["a.clk_in"]),
                conn("c1", "this.clk", &["a.clk_in"]),
            ],
        )
        .unwrap();
        assert!(plan(&system).is_ok());
    }

    #[test]
    fn top_loop_becomes_feedthrough() {
        let system = System::from_parts(
            vec![
                Port::signal("loop_out", Direction::Output, 4),
                Port::signal("loop_in", Direction::Input, 4),
            ],
            vec![],
            vec![conn("loop", "this.loop_out", &["this.loop_in"])],
        )
        .unwrap();
        let plan = plan(&system).unwrap();
        assert_eq!(
            plan.feedthroughs(),
            [Feedthrough {
                target: "loop_out".to_string(),
                driver: "loop_in".to_string(),
            }]
        );
    }

    #[test]
    fn interface_top_loop_respects_tready_flow() {
        let system = System::from_parts(
            vec![
                axis("s_axis", Role::Slave, "in", "8"),
                axis("m_axis", Role::Master, "out", "8"),
            ],
            vec![],
            vec![conn("bypass", "this.s_axis", &["this.m_axis"])],
        )
        .unwrap();
        let plan = plan(&system).unwrap();
        let pairs: Vec<_> = plan
            .feedthroughs()
            .iter()
            .map(|f| (f.target.as_str(), f.driver.as_str()))
            .collect();
        assert_eq!(
            pairs,
            [
                ("out_tdata", "in_tdata"),
                ("out_tvalid", "in_tvalid"),
                ("in_tready", "out_tready"),
            ]
        );
    }

    #[test]
    fn fan_out_to_component_and_top_shares_the_top_net() {
        for dsts in [["b.din", "this.result"], ["this.result", "b.din"]] {
            let system = System::from_parts(
                vec![Port::signal("result", Direction::Output, 8)],
                vec![producer(), consumer("b")],
                vec![conn("c0", "a.dout", &dsts)],
            )
            .unwrap();
            let plan = plan(&system).unwrap_or_else(|e| panic!("{dsts:?}: {e}"));
            assert_eq!(plan.signal_map("a").unwrap()["dout"], "result");
            assert_eq!(plan.signal_map("b").unwrap()["din"], "result");
            assert!(plan.interconnects().is_empty());
            assert!(plan.feedthroughs().is_empty());
        }
    }

    #[test]
    fn interface_fan_out_to_component_and_top() {
        let system = System::from_parts(
            vec![axis("m_out", Role::Master, "out", "32")],
            vec![producer(), consumer("b")],
            vec![conn("stream", "a.m_axis", &["b.s_axis", "this.m_out"])],
        )
        .unwrap();
        let plan = plan(&system).unwrap();
        assert!(plan.interconnects().is_empty());
        assert_eq!(plan.signal_map("a").unwrap()["m_axis_tdata"], "out_tdata");
        assert_eq!(plan.signal_map("b").unwrap()["s_axis_tdata"], "out_tdata");
        assert_eq!(plan.signal_map("b").unwrap()["s_axis_tready"], "out_tready");
    }

    #[test]
    fn one_output_feeding_two_connections_keeps_one_net() {
        let system = System::from_parts(
            vec![],
            vec![producer(), consumer("b"), consumer("c")],
            vec![
                conn("to_b", "a.dout", &["b.din"]),
                conn("to_c", "a.dout", &["c.din"]),
            ],
        )
        .unwrap();
        let plan = plan(&system).unwrap();
        assert_eq!(plan.interconnects().len(), 1);
        assert_eq!(plan.signal_map("a").unwrap()["dout"], "interconnect_0");
        assert_eq!(plan.signal_map("b").unwrap()["din"], "interconnect_0");
        assert_eq!(plan.signal_map("c").unwrap()["din"], "interconnect_0");
    }

    #[test]
    fn bound_output_later_routed_to_top_gets_an_assign() {
        let system = System::from_parts(
            vec![Port::signal("result", Direction::Output, 8)],
            vec![producer(), consumer("b")],
            vec![
                conn("to_b", "a.dout", &["b.din"]),
                conn("to_top", "a.dout", &["this.result"]),
            ],
        )
        .unwrap();
        let plan = plan(&system).unwrap();
        assert_eq!(plan.signal_map("a").unwrap()["dout"], "interconnect_0");
        assert_eq!(
            plan.feedthroughs(),
            [Feedthrough {
                target: "result".to_string(),
                driver: "interconnect_0".to_string(),
            }]
        );
    }

    #[test]
    fn top_self_loop_emits_nothing() {
        let system = System::from_parts(
            vec![Port::signal("clk", Direction::Input, 1)],
            vec![],
            vec![conn("loop", "this.clk", &["this.clk"])],
        )
        .unwrap();
        assert!(plan(&system).unwrap().feedthroughs().is_empty());
    }

    #[test]
    fn top_input_is_never_assigned() {
        let system = System::from_parts(
            vec![
                Port::signal("in_a", Direction::Input, 4),
                Port::signal("in_b", Direction::Input, 4),
            ],
            vec![],
            vec![conn("inputs", "this.in_a", &["this.in_b"])],
        )
        .unwrap();
        let sink = DiagnosticSink::new();
        let plan = plan_connections(&system, &ProtocolRegistry::with_builtins(), &sink).unwrap();
        assert!(plan.feedthroughs().is_empty());
        assert!(sink.take_all().iter().any(|d| d.code == errors::W300));
    }

    #[test]
    fn role_oddities_warn_but_succeed() {
        let two_masters = Component::new("b", "b.json", "b.sv")
            .with_port(axis("s_axis", Role::Master, "s_axis", "32"));
        let system = System::from_parts(
            vec![],
            vec![producer(), two_masters],
            vec![conn("stream", "a.m_axis", &["b.s_axis"])],
        )
        .unwrap();
        let sink = DiagnosticSink::new();
        plan_connections(&system, &ProtocolRegistry::with_builtins(), &sink).unwrap();
        let warnings = sink.take_all();
        assert!(warnings
            .iter()
            .any(|d| d.severity == Severity::Warning && d.code == errors::W300));
    }

    #[test]
    fn unconnected_ports_are_reported() {
        let system = System::from_parts(
            vec![Port::signal("clk", Direction::Input, 1)],
            vec![producer()],
            vec![conn("c0", "this.clk", &["a.clk_in"])],
        )
        .unwrap();
        let sink = DiagnosticSink::new();
        plan_connections(&system, &ProtocolRegistry::with_builtins(), &sink).unwrap();
        let unconnected: Vec<_> = sink
            .take_all()
            .into_iter()
            .filter(|d| d.code == errors::W301)
            .map(|d| d.message)
            .collect();
        assert_eq!(unconnected.len(), 2);
        assert!(unconnected[0].contains("`dout`"));
        assert!(unconnected[1].contains("`m_axis`"));
    }

    #[test]
    fn pair_kind_classification() {
        let system = System::from_parts(
            vec![Port::signal("clk", Direction::Input, 1)],
            vec![producer(), consumer("b")],
            vec![
                conn("x", "this.clk", &["a.clk_in"]),
                conn("y", "a.dout", &["b.din"]),
                conn("z", "this.clk", &["this.clk"]),
            ],
        )
        .unwrap();
        let resolved = resolve_connections(&system).unwrap();
        let kinds: Vec<_> = resolved
            .iter()
            .map(|r| PairKind::of(&r.source, &r.destinations[0]))
            .collect();
        assert_eq!(
            kinds,
            [PairKind::Direct, PairKind::Intermediate, PairKind::TopLoop]
        );
    }
}
