//! System description loading.
//!
//! Component spec and source paths are resolved against the directory of the
//! system file. Instance names are checked before any component spec is read,
//! so a duplicate instance is reported even when later entries are broken.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use forge_ir::{
    Component, Connection, Direction, IntegrationError, Port, Role, System, TOP_INSTANCE,
};

use crate::error::LoadError;
use crate::types::{ComponentEntry, ComponentSpec, PortSpec, SystemSpec};

const WIRE: &str = "wire";

/// A system together with the metadata the emitter needs.
#[derive(Debug)]
pub struct LoadedSystem {
    /// The resolved model.
    pub system: System,
    /// The `name` field of the system description, if present.
    pub name: Option<String>,
}

/// Loads a system description and every component spec it references.
pub fn load_system(path: &Path) -> Result<LoadedSystem, LoadError> {
    let content = read(path)?;
    let spec: SystemSpec = serde_json::from_str(&content).map_err(|source| LoadError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
    build_system(spec, base_dir)
}

/// Parses a system description from a string.
///
/// Component spec paths are resolved against `base_dir`.
pub fn load_system_from_str(content: &str, base_dir: &Path) -> Result<LoadedSystem, LoadError> {
    let spec: SystemSpec = serde_json::from_str(content).map_err(|source| LoadError::Json {
        path: PathBuf::from("<input>"),
        source,
    })?;
    build_system(spec, base_dir)
}

fn build_system(spec: SystemSpec, base_dir: &Path) -> Result<LoadedSystem, LoadError> {
    check_instance_names(&spec.components)?;

    let mut system = System::new();
    for port in spec.interface_ports {
        system.add_top_port(build_port(port)?)?;
    }
    for entry in spec.components {
        system.add_component(load_component(entry, base_dir)?)?;
    }
    for conn in &spec.connections {
        let destinations = conn.destinations();
        if destinations.is_empty() {
            return Err(LoadError::MissingDestination {
                connection: conn.name.clone(),
            });
        }
        system.add_connection(Connection::parse(
            conn.name.as_str(),
            &conn.src,
            destinations.as_slice(),
        )?);
    }

    Ok(LoadedSystem {
        system,
        name: spec.name,
    })
}

fn check_instance_names(entries: &[ComponentEntry]) -> Result<(), IntegrationError> {
    let mut seen = HashSet::new();
    for entry in entries {
        if entry.name == TOP_INSTANCE {
            return Err(IntegrationError::ReservedInstanceName {
                name: entry.name.clone(),
            });
        }
        if !seen.insert(entry.name.as_str()) {
            return Err(IntegrationError::DuplicateInstance {
                name: entry.name.clone(),
            });
        }
    }
    Ok(())
}

fn load_component(entry: ComponentEntry, base_dir: &Path) -> Result<Component, LoadError> {
    let spec_path = base_dir.join(&entry.spec_path);
    let source_path = base_dir.join(&entry.src_path);

    let content = read(&spec_path)?;
    let spec: ComponentSpec = serde_json::from_str(&content).map_err(|source| LoadError::Json {
        path: spec_path.clone(),
        source,
    })?;

    let mut component = Component::new(
        entry.name,
        spec_path.to_string_lossy(),
        source_path.to_string_lossy(),
    );
    component.parameters = entry.parameters;
    for port in spec.interface_ports {
        component.add_port(build_port(port)?)?;
    }
    Ok(component)
}

fn build_port(spec: PortSpec) -> Result<Port, LoadError> {
    if spec.port_type == WIRE {
        let direction = match spec.mode.as_str() {
            "input" => Direction::Input,
            "output" => Direction::Output,
            _ => {
                return Err(LoadError::InvalidMode {
                    port: spec.name,
                    mode: spec.mode,
                    expected: "`input` or `output`",
                })
            }
        };
        let raw = spec.width.unwrap_or(1);
        let width = u32::try_from(raw)
            .ok()
            .filter(|w| *w >= 1)
            .ok_or_else(|| LoadError::InvalidWidth {
                port: spec.name.clone(),
                width: raw,
            })?;
        return Ok(Port::signal(spec.name, direction, width));
    }

    let role = match spec.mode.as_str() {
        "master" => Role::Master,
        "slave" => Role::Slave,
        _ => {
            return Err(LoadError::InvalidMode {
                port: spec.name,
                mode: spec.mode,
                expected: "`master` or `slave`",
            })
        }
    };
    let mut port = Port::interface(spec.name, role, spec.port_type);
    for (key, value) in spec.parameters {
        port = port.with_parameter(key, value.into_text());
    }
    for (logical, concrete) in spec.port_maps {
        port = port.with_mapping(logical, concrete);
    }
    Ok(port)
}

fn read(path: &Path) -> Result<String, LoadError> {
    std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}
