//! `forge.toml` loading and validation.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use forge_emit::EmitOptions;
use forge_ir::{IntegrationError, ProtocolDescriptor, ProtocolRegistry, AXI_STREAM};

use crate::error::LoadError;
use crate::loader::LoadedSystem;
use crate::types::ForgeConfig;

/// File name looked up next to the system description.
pub const CONFIG_FILE_NAME: &str = "forge.toml";

/// Module name used when no other source names the top module.
const FALLBACK_TOP: &str = "top";

/// Returns the `forge.toml` sitting next to `system_path`, if there is one.
pub fn find_config(system_path: &Path) -> Option<PathBuf> {
    let dir = system_path.parent().unwrap_or_else(|| Path::new("."));
    let candidate = dir.join(CONFIG_FILE_NAME);
    candidate.is_file().then_some(candidate)
}

/// Loads and validates a `forge.toml` file.
pub fn load_config(path: &Path) -> Result<ForgeConfig, LoadError> {
    let content = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    load_config_from_str(&content)
}

/// Parses and validates a `forge.toml` configuration from a string.
pub fn load_config_from_str(content: &str) -> Result<ForgeConfig, LoadError> {
    let config: ForgeConfig =
        toml::from_str(content).map_err(|e| LoadError::ConfigParse(e.to_string()))?;
    validate_config(&config)?;
    Ok(config)
}

fn validate_config(config: &ForgeConfig) -> Result<(), LoadError> {
    if let Some(top) = &config.project.top {
        if top.trim().is_empty() {
            return Err(LoadError::ConfigValidation(
                "`project.top` must not be empty".to_string(),
            ));
        }
    }
    if !(1..=8).contains(&config.emit.indent) {
        return Err(LoadError::ConfigValidation(format!(
            "`emit.indent` must be between 1 and 8, got {}",
            config.emit.indent
        )));
    }
    for (name, table) in &config.protocols {
        if name == AXI_STREAM {
            return Err(LoadError::ConfigValidation(format!(
                "protocol `{AXI_STREAM}` is built in and cannot be redefined"
            )));
        }
        if table.signals.is_empty() {
            return Err(LoadError::ConfigValidation(format!(
                "protocol `{name}` declares no signals"
            )));
        }
        let mut seen = HashSet::new();
        for signal in &table.signals {
            if !seen.insert(signal.name.as_str()) {
                return Err(LoadError::ConfigValidation(format!(
                    "protocol `{name}` declares signal `{}` twice",
                    signal.name
                )));
            }
        }
    }
    Ok(())
}

impl ForgeConfig {
    /// The built-in protocols followed by those declared in `[protocols]`.
    pub fn protocol_registry(&self) -> Result<ProtocolRegistry, IntegrationError> {
        let mut registry = ProtocolRegistry::with_builtins();
        for (name, table) in &self.protocols {
            registry.register(ProtocolDescriptor::new(name.clone(), table.signals.clone()))?;
        }
        Ok(registry)
    }

    /// Picks the top module name: `flag` (the `--top` override), then
    /// `[project] top`, then the description's `name`, then the stem of
    /// `system_path`.
    pub fn top_module_name(
        &self,
        flag: Option<&str>,
        loaded: &LoadedSystem,
        system_path: &Path,
    ) -> String {
        flag.map(str::to_string)
            .or_else(|| self.project.top.clone())
            .or_else(|| loaded.name.clone())
            .or_else(|| {
                system_path
                    .file_stem()
                    .map(|s| s.to_string_lossy().into_owned())
            })
            .unwrap_or_else(|| FALLBACK_TOP.to_string())
    }

    /// Emission options from the `[emit]` table.
    pub fn emit_options(&self) -> EmitOptions {
        EmitOptions {
            indent: self.emit.indent,
            header_comment: self.emit.header_comment,
        }
    }
}
