//! Shared helpers for the `forge` pipeline: configuration lookup, diagnostic
//! reporting, and the port listing.

use std::fmt::Write;
use std::path::Path;

use forge_config::{find_config, ForgeConfig, LoadError};
use forge_diagnostics::{
    DiagnosticRenderer, DiagnosticSink, JsonRenderer, Severity, TerminalRenderer,
};
use forge_ir::{Port, System};

use crate::{GlobalArgs, ReportFormat};

/// Loads `--config` if given, else a `forge.toml` next to the system file,
/// else the defaults.
pub fn load_project_config(system: &Path, global: &GlobalArgs) -> Result<ForgeConfig, LoadError> {
    let path = match &global.config {
        Some(path) => Some(path.clone()),
        None => find_config(system),
    };
    match path {
        Some(path) => {
            if global.verbose {
                eprintln!("   Config {}", path.display());
            }
            forge_config::load_config(&path)
        }
        None => Ok(ForgeConfig::default()),
    }
}

/// Renders everything in `sink` to stderr and returns the exit status:
/// 1 if any error was reported, else 0.
///
/// Warnings and notes are dropped when quiet.
pub fn report(sink: &DiagnosticSink, global: &GlobalArgs) -> i32 {
    let failed = sink.has_errors();
    let renderer: Box<dyn DiagnosticRenderer> = match global.format {
        ReportFormat::Text => Box::new(TerminalRenderer::new(global.color)),
        ReportFormat::Json => Box::new(JsonRenderer),
    };
    for diag in sink.take_all() {
        if global.quiet && diag.severity != Severity::Error {
            continue;
        }
        eprintln!("{}", renderer.render(&diag));
    }
    i32::from(failed)
}

/// Describes every top-level port, one block per port.
pub fn describe_ports(system: &System) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "System Interface Ports:");
    let _ = writeln!(out, "-----------------------");
    for port in system.top_ports().values() {
        let _ = writeln!(out, "Port: {}", port.name());
        match port {
            Port::Signal(sig) => {
                let _ = writeln!(out, "  type: wire");
                let _ = writeln!(out, "  mode: {}", sig.direction);
                let _ = writeln!(out, "  width: {}", sig.width);
            }
            Port::Interface(iface) => {
                let _ = writeln!(out, "  type: interface");
                let _ = writeln!(out, "  mode: {}", iface.role);
                let _ = writeln!(out, "  protocol: {}", iface.protocol);
                let _ = writeln!(out, "  parameters:");
                for (k, v) in &iface.parameters {
                    let _ = writeln!(out, "    {k} = {v}");
                }
                let _ = writeln!(out, "  signal map:");
                for (k, v) in &iface.signal_map {
                    let _ = writeln!(out, "    {k} -> {v}");
                }
            }
        }
        out.push('\n');
    }
    out
}
