//! Forge CLI: generates a SystemVerilog top module from a system description.
//!
//! `forge <SYSTEM>` loads the system JSON and its component specs, resolves
//! and classifies every connection, and writes the integrated top module to
//! standard output (or `--output`). `--check` stops after classification and
//! `--list-ports` prints the top-level port table instead of a module.

#![warn(missing_docs)]

mod build;
mod pipeline;

use std::io::IsTerminal;
use std::path::PathBuf;
use std::process;

use clap::{Parser, ValueEnum};

/// Forge: a hardware system integrator.
#[derive(Parser, Debug)]
#[command(name = "forge", version, about = "Forge hardware system integrator")]
pub struct Cli {
    /// Suppress all output except errors.
    #[arg(short, long)]
    pub quiet: bool,

    /// Report each pipeline stage on stderr.
    #[arg(short, long)]
    pub verbose: bool,

    /// Control colored output.
    #[arg(long, value_enum, default_value_t = ColorChoice::Auto)]
    pub color: ColorChoice,

    /// Path to a `forge.toml` configuration file.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Override the top module name.
    #[arg(long)]
    pub top: Option<String>,

    /// Write the module to this file instead of standard output.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Output format for diagnostics.
    #[arg(short, long, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,

    /// Validate the system without emitting a module.
    #[arg(long, conflicts_with = "list_ports")]
    pub check: bool,

    /// Print the top-level port table instead of a module.
    #[arg(long)]
    pub list_ports: bool,

    /// Path to the system description JSON.
    pub system: PathBuf,
}

/// Controls whether colored output is produced.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ColorChoice {
    /// Detect from terminal capabilities.
    Auto,
    /// Always produce colored output.
    Always,
    /// Never produce colored output.
    Never,
}

/// Diagnostic output format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// Human-readable terminal output.
    Text,
    /// One JSON object per line.
    Json,
}

/// Global settings derived from CLI flags.
pub struct GlobalArgs {
    /// Whether to suppress non-error output.
    pub quiet: bool,
    /// Whether to print stage reports.
    pub verbose: bool,
    /// Whether to use colored output.
    pub color: bool,
    /// Diagnostic output format.
    pub format: ReportFormat,
    /// Optional path to a custom config file.
    pub config: Option<PathBuf>,
}

fn main() {
    let cli = Cli::parse();

    let color = match cli.color {
        ColorChoice::Auto => std::io::stderr().is_terminal(),
        ColorChoice::Always => true,
        ColorChoice::Never => false,
    };

    let global = GlobalArgs {
        quiet: cli.quiet,
        verbose: cli.verbose,
        color,
        format: cli.format,
        config: cli.config.clone(),
    };

    match build::run(&cli, &global) {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    }
}
