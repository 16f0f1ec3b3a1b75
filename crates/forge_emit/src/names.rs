//! The module-name lookup seam between the emitter and the loader.

use indexmap::IndexMap;

use forge_ir::{Component, IntegrationError};

/// Supplies the module name declared by a component's HDL source.
pub trait ModuleNameResolver {
    /// Returns the module name to instantiate for `component`.
    fn module_name(&self, component: &Component) -> Result<String, IntegrationError>;
}

/// A fixed table keyed by source reference.
impl ModuleNameResolver for IndexMap<String, String> {
    fn module_name(&self, component: &Component) -> Result<String, IntegrationError> {
        self.get(&component.source_reference)
            .cloned()
            .ok_or_else(|| IntegrationError::ModuleNameUnavailable {
                instance: component.name.clone(),
                reason: format!("no module known for `{}`", component.source_reference),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_lookup_by_source_reference() {
        let mut table = IndexMap::new();
        table.insert("rtl/fifo.sv".to_string(), "axis_fifo".to_string());

        let fifo = Component::new("fifo0", "fifo.json", "rtl/fifo.sv");
        assert_eq!(table.module_name(&fifo).unwrap(), "axis_fifo");

        let other = Component::new("dma0", "dma.json", "rtl/dma.sv");
        assert!(matches!(
            table.module_name(&other),
            Err(IntegrationError::ModuleNameUnavailable { ref instance, .. }) if instance == "dma0"
        ));
    }
}
