//! Document types deserialized from the system JSON, component spec JSON, and
//! `forge.toml`.

use indexmap::IndexMap;
use serde::Deserialize;

use forge_ir::{ParamValue, ProtocolSignal};

/// The top-level system description.
#[derive(Debug, Deserialize)]
pub struct SystemSpec {
    /// Optional top-module name.
    #[serde(default)]
    pub name: Option<String>,
    /// Ports of the top-level module.
    #[serde(default)]
    pub interface_ports: Vec<PortSpec>,
    /// Component instances in declaration order.
    #[serde(default)]
    pub components: Vec<ComponentEntry>,
    /// Requested connections in declaration order.
    #[serde(default)]
    pub connections: Vec<ConnectionSpec>,
}

/// A per-component spec file.
#[derive(Debug, Deserialize)]
pub struct ComponentSpec {
    /// Optional block name; informational only.
    #[serde(default)]
    pub name: Option<String>,
    /// The block's ports.
    #[serde(default)]
    pub interface_ports: Vec<PortSpec>,
}

/// One entry of an `interface_ports` list.
#[derive(Debug, Deserialize)]
pub struct PortSpec {
    /// Port name.
    pub name: String,
    /// `wire` for a signal port, otherwise the protocol id.
    #[serde(rename = "type")]
    pub port_type: String,
    /// `input`/`output` for wires, `master`/`slave` for interfaces.
    pub mode: String,
    /// Bit width of a wire; defaults to 1.
    #[serde(default)]
    pub width: Option<i64>,
    /// Interface parameters; integers are kept as their decimal text.
    #[serde(default)]
    pub parameters: IndexMap<String, ScalarValue>,
    /// Logical sub-signal to concrete signal name.
    #[serde(default)]
    pub port_maps: IndexMap<String, String>,
}

/// An interface parameter value as written in JSON.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum ScalarValue {
    /// A JSON number.
    Integer(i64),
    /// A JSON string.
    Text(String),
}

impl ScalarValue {
    /// The value as the text stored on an interface port.
    pub fn into_text(self) -> String {
        match self {
            ScalarValue::Integer(v) => v.to_string(),
            ScalarValue::Text(s) => s,
        }
    }
}

/// One entry of the `components` list.
#[derive(Debug, Deserialize)]
pub struct ComponentEntry {
    /// Instance name.
    pub name: String,
    /// Path to the component spec JSON, relative to the system file.
    pub spec_path: String,
    /// Path to the HDL source, relative to the system file.
    pub src_path: String,
    /// Parameter overrides.
    #[serde(default)]
    pub parameters: IndexMap<String, ParamValue>,
}

/// One entry of the `connections` list.
#[derive(Debug, Deserialize)]
pub struct ConnectionSpec {
    /// Connection name.
    pub name: String,
    /// Source endpoint text.
    pub src: String,
    /// Destination endpoint texts.
    #[serde(default)]
    pub dsts: Vec<String>,
    /// Single destination, used when `dsts` is absent.
    #[serde(default)]
    pub dst: Option<String>,
}

impl ConnectionSpec {
    /// All destinations: `dsts` if given, otherwise `dst`.
    pub fn destinations(&self) -> Vec<&str> {
        if self.dsts.is_empty() {
            self.dst.iter().map(String::as_str).collect()
        } else {
            self.dsts.iter().map(String::as_str).collect()
        }
    }
}

/// The project configuration parsed from `forge.toml`.
#[derive(Debug, Default, Deserialize)]
pub struct ForgeConfig {
    /// Project settings.
    #[serde(default)]
    pub project: ProjectSection,
    /// Emission settings.
    #[serde(default)]
    pub emit: EmitSection,
    /// Additional protocol descriptors keyed by protocol id.
    #[serde(default)]
    pub protocols: IndexMap<String, ProtocolTable>,
}

/// The `[project]` table.
#[derive(Debug, Default, Deserialize)]
pub struct ProjectSection {
    /// Top-module name override.
    #[serde(default)]
    pub top: Option<String>,
}

/// The `[emit]` table.
#[derive(Debug, Deserialize)]
pub struct EmitSection {
    /// Spaces per indentation level.
    #[serde(default = "default_indent")]
    pub indent: usize,
    /// Whether to emit a generated-file comment.
    #[serde(default)]
    pub header_comment: bool,
}

impl Default for EmitSection {
    fn default() -> Self {
        Self {
            indent: default_indent(),
            header_comment: false,
        }
    }
}

fn default_indent() -> usize {
    4
}

/// A `[protocols.<id>]` table.
#[derive(Debug, Deserialize)]
pub struct ProtocolTable {
    /// Sub-signals in declaration order.
    pub signals: Vec<ProtocolSignal>,
}
