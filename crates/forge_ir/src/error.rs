//! Error types for system construction, connection resolution, and emission.

use crate::endpoint::TOP_INSTANCE;
use crate::port::PortKind;

/// Errors that abort the integration of a system.
///
/// Every variant is fatal: the stage that detects it stops immediately and no
/// partial output is produced. Each variant names the offending instance,
/// port, signal, or parameter.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IntegrationError {
    /// An endpoint reference lacks the `<instance>.<port>` separator.
    #[error("malformed endpoint `{text}`: expected `<instance>.<port>`")]
    MalformedEndpoint {
        /// The endpoint text as written.
        text: String,
    },

    /// Two components share an instance name.
    #[error("duplicate component instance `{name}`")]
    DuplicateInstance {
        /// The repeated instance name.
        name: String,
    },

    /// A component tried to use the top-level sentinel as its instance name.
    #[error("instance name `{name}` is reserved for the top-level system")]
    ReservedInstanceName {
        /// The rejected instance name.
        name: String,
    },

    /// Two ports in the same scope share a name.
    #[error("duplicate port `{port}` in {}", describe_scope(.instance))]
    DuplicatePort {
        /// The owning instance (`this` for top-level ports).
        instance: String,
        /// The repeated port name.
        port: String,
    },

    /// An endpoint names a component instance that does not exist.
    #[error("unknown component instance `{instance}` in endpoint `{endpoint}`")]
    UnknownInstance {
        /// The missing instance name.
        instance: String,
        /// The full endpoint reference.
        endpoint: String,
    },

    /// An endpoint names a port that its instance does not have.
    #[error("{} has no port `{port}`", describe_scope(.instance))]
    UnknownPort {
        /// The instance that was searched (`this` for the top level).
        instance: String,
        /// The missing port name.
        port: String,
    },

    /// A signal port was connected to an interface port.
    #[error("connection `{connection}` joins {from_kind} port `{from_port}` to {to_kind} port `{to_port}`")]
    PortTypeMismatch {
        /// The connection being classified.
        connection: String,
        /// The source endpoint.
        from_port: String,
        /// The variant of the source port.
        from_kind: PortKind,
        /// The destination endpoint.
        to_port: String,
        /// The variant of the destination port.
        to_kind: PortKind,
    },

    /// Two interface ports with different protocols were connected.
    #[error(
        "connection `{connection}` joins `{from_port}` ({from_protocol}) to `{to_port}` ({to_protocol})"
    )]
    ProtocolMismatch {
        /// The connection being classified.
        connection: String,
        /// The source endpoint.
        from_port: String,
        /// Protocol of the source port.
        from_protocol: String,
        /// The destination endpoint.
        to_port: String,
        /// Protocol of the destination port.
        to_protocol: String,
    },

    /// A logical sub-signal has no counterpart in one side's signal map.
    #[error("sub-signal `{signal}` is missing from the signal map of port `{port}` on `{instance}`")]
    SignalMapMismatch {
        /// The logical sub-signal name.
        signal: String,
        /// The instance whose port lacks the entry (`this` for the top level).
        instance: String,
        /// The port whose signal map lacks the entry.
        port: String,
    },

    /// A width parameter is neither a known override nor an integer literal.
    #[error("cannot resolve width parameter `{key}` = `{value}` on instance `{instance}`")]
    UnresolvedWidth {
        /// The protocol parameter key (e.g. `tdata_width`).
        key: String,
        /// The trimmed parameter value that failed to resolve.
        value: String,
        /// The instance whose override table was consulted.
        instance: String,
    },

    /// A protocol has no descriptor in the registry.
    #[error("unsupported protocol `{protocol}` on port `{port}` of `{instance}`")]
    UnsupportedProtocol {
        /// The unrecognized protocol id.
        protocol: String,
        /// The instance owning the port.
        instance: String,
        /// The interface port.
        port: String,
    },

    /// A width-bearing sub-signal's parameter was never declared on the port.
    #[error("port `{port}` on `{instance}` does not declare width parameter `{key}`")]
    MissingParameter {
        /// The required parameter key.
        key: String,
        /// The instance owning the port.
        instance: String,
        /// The interface port.
        port: String,
    },

    /// A component port would be bound to two different external signals.
    #[error("port signal `{signal}` of `{instance}` is bound to both `{existing}` and `{requested}`")]
    ConflictingBinding {
        /// The component instance.
        instance: String,
        /// The component-side signal name.
        signal: String,
        /// The external signal it is already bound to.
        existing: String,
        /// The external signal a later connection asked for.
        requested: String,
    },

    /// The module-name collaborator could not name a component's module.
    #[error("cannot determine the module of instance `{instance}`: {reason}")]
    ModuleNameUnavailable {
        /// The component instance.
        instance: String,
        /// Why the lookup failed.
        reason: String,
    },

    /// A protocol descriptor was registered twice.
    #[error("protocol `{name}` is already registered")]
    DuplicateProtocol {
        /// The protocol id.
        name: String,
    },
}

fn describe_scope(instance: &str) -> String {
    if instance == TOP_INSTANCE {
        "the top-level system".to_string()
    } else {
        format!("component `{instance}`")
    }
}
