//! Actual-shape extraction from a loaded module snapshot

use crate::models::module::{LoadedModule, RuntimeValue, ValueKind};
use crate::models::shape::Shape;
use std::collections::HashSet;

/// Builds the runtime-side shape of a module
pub struct ActualShapeExtractor {
    ignored_properties: HashSet<String>,
}

impl ActualShapeExtractor {
    pub fn new<I, S>(ignored_properties: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            ignored_properties: ignored_properties.into_iter().map(Into::into).collect(),
        }
    }

    pub fn extract(&self, module_name: &str, module: &LoadedModule) -> Shape {
        self.extract_value(module_name, &module.exports)
    }

    pub fn extract_value(&self, module_name: &str, exports: &RuntimeValue) -> Shape {
        let mut shape = Shape::new(module_name);

        for key in exports.enumerable_keys() {
            if !self.ignored_properties.contains(key) {
                shape.add_property(key, None);
            }
        }
        shape.is_callable = exports.is_callable();
        shape.is_constructible = exports.is_constructible();
        // Anything but a plain object means the export slot was replaced
        shape.uses_module_exports_assignment = exports.kind != ValueKind::Object;

        tracing::debug!(
            module = module_name,
            kind = ?exports.kind,
            properties = shape.properties().len(),
            callable = shape.is_callable,
            constructible = shape.is_constructible,
            replaced = shape.uses_module_exports_assignment,
            "extracted actual shape"
        );
        shape
    }
}
