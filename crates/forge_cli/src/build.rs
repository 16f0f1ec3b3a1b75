//! The `forge` pipeline: load, resolve, classify, emit.
//!
//! 1. Load `forge.toml` (explicit, adjacent, or defaults)
//! 2. Load the system description and component specs
//! 3. Build the protocol registry
//! 4. Resolve and classify connections, synthesizing interconnects
//! 5. Emit the top module and write it out
//!
//! Integration failures are rendered as coded diagnostics; I/O and parse
//! failures propagate to `main`.

use forge_config::{LoadError, SourceModuleScanner};
use forge_connect::errors::to_diagnostic;
use forge_connect::plan_connections;
use forge_diagnostics::DiagnosticSink;
use forge_emit::emit_top_module;
use forge_ir::IntegrationError;

use crate::pipeline::{describe_ports, load_project_config, report};
use crate::{Cli, GlobalArgs};

/// Runs the pipeline. Returns exit code 0 on success, 1 on integration errors.
pub fn run(cli: &Cli, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let config = load_project_config(&cli.system, global)?;

    if !global.quiet {
        eprintln!("   Loading {}", cli.system.display());
    }
    let loaded = match forge_config::load_system(&cli.system) {
        Ok(loaded) => loaded,
        Err(LoadError::Integration(e)) => return Ok(fail(&e, &DiagnosticSink::new(), global)),
        Err(e) => return Err(e.into()),
    };
    let system = &loaded.system;
    if global.verbose {
        eprintln!(
            "   Loaded {} top-level port(s), {} component(s), {} connection(s)",
            system.top_ports().len(),
            system.components().len(),
            system.connections().len()
        );
    }

    if cli.list_ports {
        print!("{}", describe_ports(system));
        return Ok(0);
    }

    let sink = DiagnosticSink::new();
    let registry = match config.protocol_registry() {
        Ok(registry) => registry,
        Err(e) => return Ok(fail(&e, &sink, global)),
    };

    let plan = match plan_connections(system, &registry, &sink) {
        Ok(plan) => plan,
        Err(e) => return Ok(fail(&e, &sink, global)),
    };
    if global.verbose {
        eprintln!(
            "   Resolved {} connection(s), synthesized {} interconnect signal(s), {} warning(s)",
            system.connections().len(),
            plan.interconnects().len(),
            sink.warning_count()
        );
    }

    if cli.check {
        let status = report(&sink, global);
        if !global.quiet {
            eprintln!("   Checked {}: ok", cli.system.display());
        }
        return Ok(status);
    }

    let top = config.top_module_name(cli.top.as_deref(), &loaded, &cli.system);
    let text = match emit_top_module(
        system,
        &plan,
        &registry,
        &SourceModuleScanner,
        &top,
        &config.emit_options(),
    ) {
        Ok(text) => text,
        Err(e) => return Ok(fail(&e, &sink, global)),
    };

    let status = report(&sink, global);

    match &cli.output {
        Some(path) => {
            std::fs::write(path, &text)?;
            if !global.quiet {
                eprintln!("   Wrote module `{top}` to {}", path.display());
            }
        }
        None => print!("{text}"),
    }
    Ok(status)
}

/// Renders the warnings gathered so far followed by the fatal error.
fn fail(err: &IntegrationError, sink: &DiagnosticSink, global: &GlobalArgs) -> i32 {
    sink.emit(to_diagnostic(err));
    report(sink, global)
}
