//! Wiring protocol descriptors.
//!
//! A [`ProtocolDescriptor`] lists the logical sub-signals of a protocol and,
//! for each one, whether it is part of the canonical set every connectable
//! port must map, which port parameter governs its width, and which way it
//! flows relative to the master. The [`ProtocolRegistry`] holds the built-in
//! `axi_stream` descriptor plus any descriptors supplied by configuration.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::IntegrationError;
use crate::port::{Direction, Role};

/// Protocol id of the built-in AXI-Stream descriptor.
pub const AXI_STREAM: &str = "axi_stream";

/// Which way a sub-signal travels between master and slave.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Flow {
    /// Driven by the master, read by the slave.
    #[default]
    Forward,
    /// Driven by the slave, read by the master (e.g. `tready`).
    Reverse,
}

/// One logical sub-signal of a protocol.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProtocolSignal {
    /// Logical name, e.g. `tdata`.
    pub name: String,
    /// Port parameter holding this sub-signal's width; `None` means width 1.
    #[serde(default)]
    pub width_param: Option<String>,
    /// Direction relative to the master.
    #[serde(default)]
    pub flow: Flow,
    /// Whether every connectable port must map this sub-signal.
    #[serde(default)]
    pub required: bool,
}

impl ProtocolSignal {
    fn new(name: &str, width_param: Option<&str>, flow: Flow, required: bool) -> Self {
        Self {
            name: name.to_string(),
            width_param: width_param.map(str::to_string),
            flow,
            required,
        }
    }
}

/// The sub-signal table of one wiring protocol.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProtocolDescriptor {
    /// The protocol id used in port specifications.
    pub name: String,
    /// Sub-signals in declaration order.
    pub signals: Vec<ProtocolSignal>,
}

impl ProtocolDescriptor {
    /// Creates a descriptor from a name and its sub-signal table.
    pub fn new(name: impl Into<String>, signals: Vec<ProtocolSignal>) -> Self {
        Self {
            name: name.into(),
            signals,
        }
    }

    /// The built-in AXI-Stream descriptor.
    ///
    /// `tdata`, `tvalid` and `tready` form the canonical set. `tdata` and
    /// `tdest` take their widths from `tdata_width` and `tdest_width`; `tready`
    /// is the only sub-signal driven by the slave.
    pub fn axi_stream() -> Self {
        Self::new(
            AXI_STREAM,
            vec![
                ProtocolSignal::new("tdata", Some("tdata_width"), Flow::Forward, true),
                ProtocolSignal::new("tvalid", None, Flow::Forward, true),
                ProtocolSignal::new("tready", None, Flow::Reverse, true),
                ProtocolSignal::new("tlast", None, Flow::Forward, false),
                ProtocolSignal::new("tdest", Some("tdest_width"), Flow::Forward, false),
                ProtocolSignal::new("tkeep", None, Flow::Forward, false),
                ProtocolSignal::new("tstrb", None, Flow::Forward, false),
                ProtocolSignal::new("tid", None, Flow::Forward, false),
                ProtocolSignal::new("tuser", None, Flow::Forward, false),
            ],
        )
    }

    /// Looks up a sub-signal by logical name.
    pub fn signal(&self, logical: &str) -> Option<&ProtocolSignal> {
        self.signals.iter().find(|s| s.name == logical)
    }

    /// The canonical sub-signals every connectable port must map.
    pub fn required_signals(&self) -> impl Iterator<Item = &ProtocolSignal> {
        self.signals.iter().filter(|s| s.required)
    }

    /// The width parameter key of a sub-signal, if it carries one.
    ///
    /// Sub-signals absent from the table carry no width parameter.
    pub fn width_param(&self, logical: &str) -> Option<&str> {
        self.signal(logical).and_then(|s| s.width_param.as_deref())
    }

    /// Absolute direction of a sub-signal on a port with the given role.
    ///
    /// Sub-signals absent from the table flow forward.
    pub fn direction(&self, logical: &str, role: Role) -> Direction {
        let flow = self.signal(logical).map_or(Flow::Forward, |s| s.flow);
        let forward = match role {
            Role::Master => Direction::Output,
            Role::Slave => Direction::Input,
        };
        match flow {
            Flow::Forward => forward,
            Flow::Reverse => forward.flipped(),
        }
    }
}

/// The set of protocols known to one build, in registration order.
#[derive(Debug, Clone, Default)]
pub struct ProtocolRegistry {
    protocols: IndexMap<String, ProtocolDescriptor>,
}

impl ProtocolRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry holding the built-in descriptors.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry
            .protocols
            .insert(AXI_STREAM.to_string(), ProtocolDescriptor::axi_stream());
        registry
    }

    /// Registers a descriptor. A protocol id may only be registered once.
    pub fn register(&mut self, descriptor: ProtocolDescriptor) -> Result<(), IntegrationError> {
        if self.protocols.contains_key(&descriptor.name) {
            return Err(IntegrationError::DuplicateProtocol {
                name: descriptor.name,
            });
        }
        self.protocols.insert(descriptor.name.clone(), descriptor);
        Ok(())
    }

    /// Looks up a descriptor by protocol id.
    pub fn get(&self, protocol: &str) -> Option<&ProtocolDescriptor> {
        self.protocols.get(protocol)
    }

    /// Looks up a descriptor, failing with `UnsupportedProtocol` when absent.
    pub fn require(
        &self,
        protocol: &str,
        instance: &str,
        port: &str,
    ) -> Result<&ProtocolDescriptor, IntegrationError> {
        self.get(protocol)
            .ok_or_else(|| IntegrationError::UnsupportedProtocol {
                protocol: protocol.to_string(),
                instance: instance.to_string(),
                port: port.to_string(),
            })
    }

    /// Registered protocol ids in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.protocols.keys().map(String::as_str)
    }
}
