//! SystemVerilog text generation.
//!
//! # Layout
//!
//! ```text
//! module soc_top (
//!     input logic clk,
//!     input logic [32-1:0] in_tdata,
//!     ...
//! );
//!
//!     logic [31:0] interconnect_0_tdata;
//!     logic interconnect_0_tvalid;
//!
//!     producer #(.DATA_W(32)) a (
//!         .clk_in(clk),
//!         .m_axis_tdata(interconnect_0_tdata)
//!     );
//!
//!     assign out_tdata = in_tdata;
//!
//! endmodule
//! ```
//!
//! Every section follows the insertion order of the model, so identical input
//! yields byte-identical text.

use forge_connect::ConnectionPlan;
use forge_ir::{
    Component, IntegrationError, InterfacePort, Port, ProtocolRegistry, SignalPort, System,
    TOP_INSTANCE,
};

use crate::names::ModuleNameResolver;

/// Formatting knobs for the emitted module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmitOptions {
    /// Spaces per indentation level.
    pub indent: usize,
    /// Whether to start the output with a generated-file comment.
    pub header_comment: bool,
}

impl Default for EmitOptions {
    fn default() -> Self {
        Self {
            indent: 4,
            header_comment: false,
        }
    }
}

/// Emits the top module for `system` as planned by `plan`.
///
/// Fails when a top-level interface port uses an unregistered protocol or
/// lacks a width parameter, or when `modules` cannot name a component's
/// module. A system without connections is emitted as a port shell with no
/// instantiations.
pub fn emit_top_module<R>(
    system: &System,
    plan: &ConnectionPlan,
    registry: &ProtocolRegistry,
    modules: &R,
    top_name: &str,
    options: &EmitOptions,
) -> Result<String, IntegrationError>
where
    R: ModuleNameResolver + ?Sized,
{
    let mut w = ModuleWriter::new(options.indent);

    if options.header_comment {
        w.line(0, &format!("// Generated by forge for top module `{top_name}`. Do not edit."));
    }

    let mut ports = Vec::new();
    for port in system.top_ports().values() {
        match port {
            Port::Signal(sig) => ports.push(signal_declaration(sig)),
            Port::Interface(iface) => interface_declarations(iface, registry, &mut ports)?,
        }
    }
    if ports.is_empty() {
        w.line(0, &format!("module {top_name} ();"));
    } else {
        w.line(0, &format!("module {top_name} ("));
        w.list(1, &ports);
        w.line(0, ");");
    }

    if !plan.interconnects().is_empty() {
        w.blank();
        for wire in plan.interconnects() {
            w.line(1, &format!("logic {}{};", range(wire.width), wire.name));
        }
    }

    if !system.connections().is_empty() {
        for component in system.components().values() {
            w.blank();
            instantiation(&mut w, component, plan, modules)?;
        }
    }

    if !plan.feedthroughs().is_empty() {
        w.blank();
        for f in plan.feedthroughs() {
            w.line(1, &format!("assign {} = {};", f.target, f.driver));
        }
    }

    w.blank();
    w.line(0, "endmodule");
    Ok(w.finish())
}

fn signal_declaration(sig: &SignalPort) -> String {
    format!("{} logic {}{}", sig.direction, range(sig.width), sig.name)
}

fn interface_declarations(
    iface: &InterfacePort,
    registry: &ProtocolRegistry,
    out: &mut Vec<String>,
) -> Result<(), IntegrationError> {
    let descriptor = registry.require(&iface.protocol, TOP_INSTANCE, &iface.name)?;
    for (logical, concrete) in &iface.signal_map {
        let direction = descriptor.direction(logical, iface.role);
        let range = match descriptor.width_param(logical) {
            Some(key) => format!("[{}-1:0] ", top_width(iface, key)?),
            None => String::new(),
        };
        out.push(format!("{direction} logic {range}{concrete}"));
    }
    Ok(())
}

/// The width text of a top-level sub-signal, kept verbatim.
///
/// The top module has no overrides to resolve against, so symbolic values are
/// passed through for the enclosing design to define.
fn top_width<'a>(iface: &'a InterfacePort, key: &str) -> Result<&'a str, IntegrationError> {
    let value = iface
        .parameters
        .get(key)
        .ok_or_else(|| IntegrationError::MissingParameter {
            key: key.to_string(),
            instance: TOP_INSTANCE.to_string(),
            port: iface.name.clone(),
        })?
        .trim();
    let literal_below_one = value.parse::<i64>().is_ok_and(|v| v < 1);
    if value.is_empty() || literal_below_one {
        return Err(IntegrationError::UnresolvedWidth {
            key: key.to_string(),
            value: value.to_string(),
            instance: TOP_INSTANCE.to_string(),
        });
    }
    Ok(value)
}

fn instantiation<R>(
    w: &mut ModuleWriter,
    component: &Component,
    plan: &ConnectionPlan,
    modules: &R,
) -> Result<(), IntegrationError>
where
    R: ModuleNameResolver + ?Sized,
{
    let module = modules.module_name(component)?;
    let params = if component.parameters.is_empty() {
        String::new()
    } else {
        let overrides: Vec<_> = component
            .parameters
            .iter()
            .map(|(k, v)| format!(".{k}({v})"))
            .collect();
        format!(" #({})", overrides.join(", "))
    };

    let bindings: Vec<_> = plan
        .signal_map(&component.name)
        .into_iter()
        .flatten()
        .map(|(port, external)| format!(".{port}({external})"))
        .collect();

    if bindings.is_empty() {
        w.line(1, &format!("{module}{params} {} ();", component.name));
    } else {
        w.line(1, &format!("{module}{params} {} (", component.name));
        w.list(2, &bindings);
        w.line(1, ");");
    }
    Ok(())
}

fn range(width: u32) -> String {
    if width > 1 {
        format!("[{}:0] ", width - 1)
    } else {
        String::new()
    }
}

struct ModuleWriter {
    out: String,
    indent: usize,
}

impl ModuleWriter {
    fn new(indent: usize) -> Self {
        Self {
            out: String::new(),
            indent,
        }
    }

    fn line(&mut self, level: usize, text: &str) {
        self.out.extend(std::iter::repeat(' ').take(level * self.indent));
        self.out.push_str(text);
        self.out.push('\n');
    }

    /// Writes comma-separated items, one per line.
    fn list(&mut self, level: usize, items: &[String]) {
        for (i, item) in items.iter().enumerate() {
            if i + 1 < items.len() {
                self.line(level, &format!("{item},"));
            } else {
                self.line(level, item);
            }
        }
    }

    fn blank(&mut self) {
        self.out.push('\n');
    }

    fn finish(self) -> String {
        self.out
    }
}
