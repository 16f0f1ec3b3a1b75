//! Diagnostic codes and helper functions for integration errors and warnings.
//!
//! Error codes `E300`--`E314` map one-to-one onto [`IntegrationError`]
//! variants. Warning codes `W300`--`W301` cover accepted but suspicious
//! wiring (matching roles, unconnected ports).

use forge_diagnostics::{Category, Diagnostic, DiagnosticCode};
use forge_ir::{IntegrationError, TOP_INSTANCE};

/// Endpoint text without an `<instance>.<port>` separator.
pub const E300: DiagnosticCode = DiagnosticCode::new(Category::Error, 300);

/// Duplicate component instance name.
pub const E301: DiagnosticCode = DiagnosticCode::new(Category::Error, 301);

/// Component instance named after the top-level sentinel.
pub const E302: DiagnosticCode = DiagnosticCode::new(Category::Error, 302);

/// Duplicate port name within one scope.
pub const E303: DiagnosticCode = DiagnosticCode::new(Category::Error, 303);

/// Endpoint names an unknown component instance.
pub const E304: DiagnosticCode = DiagnosticCode::new(Category::Error, 304);

/// Endpoint names an unknown port.
pub const E305: DiagnosticCode = DiagnosticCode::new(Category::Error, 305);

/// Signal port connected to an interface port.
pub const E306: DiagnosticCode = DiagnosticCode::new(Category::Error, 306);

/// Interface ports of different protocols connected.
pub const E307: DiagnosticCode = DiagnosticCode::new(Category::Error, 307);

/// Sub-signal missing from one side's signal map.
pub const E308: DiagnosticCode = DiagnosticCode::new(Category::Error, 308);

/// Width parameter that resolves to no positive integer.
pub const E309: DiagnosticCode = DiagnosticCode::new(Category::Error, 309);

/// Protocol without a registered descriptor.
pub const E310: DiagnosticCode = DiagnosticCode::new(Category::Error, 310);

/// Width parameter not declared on an interface port.
pub const E311: DiagnosticCode = DiagnosticCode::new(Category::Error, 311);

/// Component port bound to two different external signals.
pub const E312: DiagnosticCode = DiagnosticCode::new(Category::Error, 312);

/// Module name of a component could not be determined.
pub const E313: DiagnosticCode = DiagnosticCode::new(Category::Error, 313);

/// Protocol descriptor registered twice.
pub const E314: DiagnosticCode = DiagnosticCode::new(Category::Error, 314);

/// Pair with matching roles or directions where opposite ones are expected, or vice versa.
pub const W300: DiagnosticCode = DiagnosticCode::new(Category::Warning, 300);

/// Component port that no connection binds.
pub const W301: DiagnosticCode = DiagnosticCode::new(Category::Warning, 301);

/// Returns the diagnostic code for an integration error.
pub fn code_for(err: &IntegrationError) -> DiagnosticCode {
    match err {
        IntegrationError::MalformedEndpoint { .. } => E300,
        IntegrationError::DuplicateInstance { .. } => E301,
        IntegrationError::ReservedInstanceName { .. } => E302,
        IntegrationError::DuplicatePort { .. } => E303,
        IntegrationError::UnknownInstance { .. } => E304,
        IntegrationError::UnknownPort { .. } => E305,
        IntegrationError::PortTypeMismatch { .. } => E306,
        IntegrationError::ProtocolMismatch { .. } => E307,
        IntegrationError::SignalMapMismatch { .. } => E308,
        IntegrationError::UnresolvedWidth { .. } => E309,
        IntegrationError::UnsupportedProtocol { .. } => E310,
        IntegrationError::MissingParameter { .. } => E311,
        IntegrationError::ConflictingBinding { .. } => E312,
        IntegrationError::ModuleNameUnavailable { .. } => E313,
        IntegrationError::DuplicateProtocol { .. } => E314,
    }
}

/// Converts an integration error into a diagnostic with location and help.
pub fn to_diagnostic(err: &IntegrationError) -> Diagnostic {
    let diag = Diagnostic::error(code_for(err), err.to_string());
    match err {
        IntegrationError::MalformedEndpoint { .. } => {
            diag.with_help("write endpoints as `<instance>.<port>`, using `this` for top-level ports")
        }
        IntegrationError::DuplicateInstance { name } => diag.at(instance_location(name)),
        IntegrationError::ReservedInstanceName { .. } => {
            diag.with_help(format!("`{TOP_INSTANCE}` refers to the top-level system; rename the instance"))
        }
        IntegrationError::DuplicatePort { instance, .. } => diag.at(instance_location(instance)),
        IntegrationError::UnknownInstance { .. } => {
            diag.with_help("check the `components` list of the system description")
        }
        IntegrationError::UnknownPort { instance, .. } => diag.at(instance_location(instance)),
        IntegrationError::PortTypeMismatch { connection, .. } => diag
            .at(connection_location(connection))
            .with_note("signal ports connect only to signal ports, interface ports only to interface ports"),
        IntegrationError::ProtocolMismatch { connection, .. } => {
            diag.at(connection_location(connection))
        }
        IntegrationError::SignalMapMismatch { signal, instance, .. } => diag
            .at(instance_location(instance))
            .with_help(format!("add `{signal}` to the port's `port_maps`")),
        IntegrationError::UnresolvedWidth { instance, .. } => diag
            .at(instance_location(instance))
            .with_help("use a positive integer literal or the name of an integer component parameter"),
        IntegrationError::UnsupportedProtocol { instance, .. } => diag
            .at(instance_location(instance))
            .with_help("declare the protocol under `[protocols]` in forge.toml"),
        IntegrationError::MissingParameter { instance, key, .. } => diag
            .at(instance_location(instance))
            .with_help(format!("add `{key}` to the port's `parameters`")),
        IntegrationError::ConflictingBinding { instance, .. } => diag
            .at(instance_location(instance))
            .with_note("a component port signal can be bound to only one external signal"),
        IntegrationError::ModuleNameUnavailable { instance, .. } => diag
            .at(instance_location(instance))
            .with_help("check the component's `src_path`"),
        IntegrationError::DuplicateProtocol { .. } => diag,
    }
}

/// Creates a warning for a pair whose roles or directions look reversed.
pub fn warning_orientation(
    connection: &str,
    from_port: &str,
    from: &str,
    to_port: &str,
    to: &str,
) -> Diagnostic {
    Diagnostic::warning(
        W300,
        format!("`{from_port}` ({from}) is connected to `{to_port}` ({to})"),
    )
    .at(connection_location(connection))
    .with_note("the ports may be driven from both sides or from neither")
}

/// Creates a warning for a component port no connection binds.
pub fn warning_unconnected(instance: &str, port: &str) -> Diagnostic {
    Diagnostic::warning(
        W301,
        format!("port `{port}` is unconnected on instance `{instance}`"),
    )
    .at(instance_location(instance))
}

fn connection_location(connection: &str) -> String {
    format!("connection `{connection}`")
}

fn instance_location(instance: &str) -> String {
    if instance == TOP_INSTANCE {
        "top-level ports".to_string()
    } else {
        format!("instance `{instance}`")
    }
}
