//! Structural summary of a module's exported surface

use crate::models::diagnostic::Position;
use serde::{Deserialize, Serialize};

/// An exported property, optionally pointing back into the declaration text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShapeProperty {
    pub name: String,
    pub position: Option<Position>,
}

/// Exported surface of one module, seen from one side.
///
/// Properties keep insertion order (declaration order on the declared side,
/// key order on the runtime side) so diagnostics come out in a stable order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shape {
    pub name: String,
    properties: Vec<ShapeProperty>,
    pub is_callable: bool,
    pub is_constructible: bool,
    /// Declaration side: top-level `export =`
    pub uses_export_equals: bool,
    /// Runtime side: the export slot was replaced by a non-bag value
    pub uses_module_exports_assignment: bool,
    /// Declaration side: `export default` outside an ambient module wrapper
    pub has_default_export_marker: bool,
    pub default_export_position: Option<Position>,
}

impl Shape {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            properties: Vec::new(),
            is_callable: false,
            is_constructible: false,
            uses_export_equals: false,
            uses_module_exports_assignment: false,
            has_default_export_marker: false,
            default_export_position: None,
        }
    }

    /// Add a property; the first occurrence of a name wins
    pub fn add_property(&mut self, name: impl Into<String>, position: Option<Position>) {
        let name = name.into();
        if !self.has_property(&name) {
            self.properties.push(ShapeProperty { name, position });
        }
    }

    pub fn has_property(&self, name: &str) -> bool {
        self.properties.iter().any(|p| p.name == name)
    }

    pub fn properties(&self) -> &[ShapeProperty] {
        &self.properties
    }

    pub fn property_names(&self) -> impl Iterator<Item = &str> {
        self.properties.iter().map(|p| p.name.as_str())
    }

    /// Whether the exported value itself can be invoked or constructed
    pub fn is_invocable(&self) -> bool {
        self.is_callable || self.is_constructible
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_property_occurrence_wins() {
        let mut shape = Shape::new("pkg");
        shape.add_property("foo", Some(Position::new(1, 2)));
        shape.add_property("bar", None);
        shape.add_property("foo", Some(Position::new(10, 2)));

        assert_eq!(shape.properties().len(), 2);
        assert_eq!(shape.properties()[0].position, Some(Position::new(1, 2)));
        assert_eq!(shape.property_names().collect::<Vec<_>>(), vec!["foo", "bar"]);
    }

    #[test]
    fn test_invocable() {
        let mut shape = Shape::new("pkg");
        assert!(!shape.is_invocable());
        shape.is_constructible = true;
        assert!(shape.is_invocable());
    }
}
