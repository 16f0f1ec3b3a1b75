//! Width expression resolution through a component's parameter overrides.

use forge_ir::{Component, IntegrationError, ParamValue};

/// Resolves a width parameter value to a bit width.
///
/// The trimmed value is first looked up by exact name in the component's
/// parameter overrides; a symbolic override is followed in turn. A value
/// that names no override is parsed as a decimal literal. Anything else,
/// including widths below 1 and reference cycles, is `UnresolvedWidth`.
pub fn resolve_width(key: &str, value: &str, component: &Component) -> Result<u32, IntegrationError> {
    let original = value.trim();
    let unresolved = || IntegrationError::UnresolvedWidth {
        key: key.to_string(),
        value: original.to_string(),
        instance: component.name.clone(),
    };

    let mut current = original;
    // Each hop consumes one override, so a chain longer than the table is a cycle.
    for _ in 0..=component.parameters.len() {
        match component.parameters.get(current) {
            Some(ParamValue::Integer(v)) => {
                return u32::try_from(*v)
                    .ok()
                    .filter(|w| *w >= 1)
                    .ok_or_else(unresolved);
            }
            Some(ParamValue::Symbolic(next)) => current = next.trim(),
            None => {
                return current
                    .parse::<u32>()
                    .ok()
                    .filter(|w| *w >= 1)
                    .ok_or_else(unresolved);
            }
        }
    }
    Err(unresolved())
}
