//! Conformance test helpers for the forge integration pipeline.
//!
//! Provides shared functions that run an on-disk project through the full
//! pipeline (load → resolve → classify → emit) and return structured results
//! for assertion in integration tests.

#![warn(missing_docs)]

use std::fs;
use std::path::{Path, PathBuf};

use forge_config::{LoadError, SourceModuleScanner};
use forge_connect::errors::to_diagnostic;
use forge_connect::plan_connections;
use forge_diagnostics::{Diagnostic, DiagnosticSink};
use forge_emit::emit_top_module;
use forge_ir::IntegrationError;

/// Result of running the full pipeline on one project.
pub struct PipelineResult {
    /// The emitted module text, absent when the build failed.
    pub output: Option<String>,
    /// The fatal integration error, if any.
    pub error: Option<IntegrationError>,
    /// All diagnostics, warnings first and the fatal error last.
    pub diagnostics: Vec<Diagnostic>,
    /// Number of warning-severity diagnostics.
    pub warning_count: usize,
}

/// Runs the full pipeline on the system description at `system_path`.
///
/// `forge.toml` is picked up from the same directory when present. Errors
/// that are not integration errors (I/O, JSON, configuration) are returned
/// as `Err`.
pub fn run_project(system_path: &Path) -> Result<PipelineResult, LoadError> {
    run_project_with_top(system_path, None)
}

/// Like [`run_project`], with `top` standing in for the `--top` override.
pub fn run_project_with_top(
    system_path: &Path,
    top: Option<&str>,
) -> Result<PipelineResult, LoadError> {
    let config = match forge_config::find_config(system_path) {
        Some(path) => forge_config::load_config(&path)?,
        None => forge_config::ForgeConfig::default(),
    };

    let sink = DiagnosticSink::new();
    let loaded = match forge_config::load_system(system_path) {
        Ok(loaded) => loaded,
        Err(LoadError::Integration(e)) => return Ok(failed(e, &sink)),
        Err(e) => return Err(e),
    };

    let top = config.top_module_name(top, &loaded, system_path);
    let result = config.protocol_registry().and_then(|registry| {
        let plan = plan_connections(&loaded.system, &registry, &sink)?;
        emit_top_module(
            &loaded.system,
            &plan,
            &registry,
            &SourceModuleScanner,
            &top,
            &config.emit_options(),
        )
    });

    Ok(match result {
        Ok(text) => finished(Some(text), None, &sink),
        Err(e) => failed(e, &sink),
    })
}

fn failed(err: IntegrationError, sink: &DiagnosticSink) -> PipelineResult {
    sink.emit(to_diagnostic(&err));
    finished(None, Some(err), sink)
}

fn finished(
    output: Option<String>,
    error: Option<IntegrationError>,
    sink: &DiagnosticSink,
) -> PipelineResult {
    let warning_count = sink.warning_count();
    PipelineResult {
        output,
        error,
        diagnostics: sink.take_all(),
        warning_count,
    }
}

/// A scratch project on disk.
///
/// Files are written relative to `root`; the caller owns the directory's
/// lifetime (typically a `tempfile::TempDir`).
pub struct Project {
    root: PathBuf,
}

impl Project {
    /// Wraps an existing directory.
    pub fn new(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
        }
    }

    /// Writes `content` to `relative`, creating parent directories.
    pub fn file(&self, relative: &str, content: &str) -> &Self {
        let path = self.root.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap_or_else(|e| panic!("create {parent:?}: {e}"));
        }
        fs::write(&path, content).unwrap_or_else(|e| panic!("write {path:?}: {e}"));
        self
    }

    /// Writes a component spec JSON and a matching one-module source file.
    ///
    /// The spec lands at `<stem>.json` and the source at `rtl/<stem>.sv`
    /// declaring `module <module>`.
    pub fn component(&self, stem: &str, module: &str, interface_ports: &str) -> &Self {
        self.file(
            &format!("{stem}.json"),
            &format!(r#"{{ "name": "{stem}", "interface_ports": {interface_ports} }}"#),
        );
        self.file(
            &format!("rtl/{stem}.sv"),
            &format!("module {module} (\n);\nendmodule\n"),
        )
    }

    /// Path of a file inside the project.
    pub fn path(&self, relative: &str) -> PathBuf {
        self.root.join(relative)
    }

    /// Runs the pipeline on `relative`, panicking on non-integration errors.
    pub fn run(&self, relative: &str) -> PipelineResult {
        self.run_with_top(relative, None)
    }

    /// Runs the pipeline on `relative` with a `--top` override.
    pub fn run_with_top(&self, relative: &str, top: Option<&str>) -> PipelineResult {
        run_project_with_top(&self.path(relative), top)
            .unwrap_or_else(|e| panic!("pipeline failed: {e}"))
    }
}
