//! Runtime snapshot of a loaded JavaScript module
//!
//! The loader layer turns an evaluated module into this pure-data form once;
//! nothing downstream holds on to a live runtime.

use serde::{Deserialize, Serialize};

/// Runtime classification of the exported value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    /// Plain object (the usual bag of named exports)
    Object,
    /// Ordinary or arrow function
    Function,
    /// ES class or constructor function
    Class,
    Array,
    Primitive,
    Null,
    Undefined,
}

/// An own key of the exported value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnKey {
    pub name: String,
    #[serde(default = "default_enumerable")]
    pub enumerable: bool,
}

fn default_enumerable() -> bool {
    true
}

impl OwnKey {
    pub fn enumerable(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            enumerable: true,
        }
    }

    pub fn hidden(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            enumerable: false,
        }
    }
}

/// Snapshot of `module.exports` after evaluation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuntimeValue {
    pub kind: ValueKind,
    /// Whether `new value()` would succeed
    #[serde(default)]
    pub constructible: bool,
    #[serde(default)]
    pub keys: Vec<OwnKey>,
    /// The `__esModule` interop flag is set on the value
    #[serde(default)]
    pub es_module: bool,
}

impl RuntimeValue {
    pub fn object(keys: impl IntoIterator<Item = OwnKey>) -> Self {
        Self {
            kind: ValueKind::Object,
            constructible: false,
            keys: keys.into_iter().collect(),
            es_module: false,
        }
    }

    pub fn function(keys: impl IntoIterator<Item = OwnKey>) -> Self {
        Self {
            kind: ValueKind::Function,
            constructible: true,
            keys: keys.into_iter().collect(),
            es_module: false,
        }
    }

    pub fn class(keys: impl IntoIterator<Item = OwnKey>) -> Self {
        Self {
            kind: ValueKind::Class,
            constructible: true,
            keys: keys.into_iter().collect(),
            es_module: false,
        }
    }

    pub fn primitive() -> Self {
        Self {
            kind: ValueKind::Primitive,
            constructible: false,
            keys: Vec::new(),
            es_module: false,
        }
    }

    pub fn with_es_module(mut self, es_module: bool) -> Self {
        self.es_module = es_module;
        self
    }

    pub fn is_callable(&self) -> bool {
        matches!(self.kind, ValueKind::Function | ValueKind::Class)
    }

    pub fn is_constructible(&self) -> bool {
        match self.kind {
            ValueKind::Class => true,
            ValueKind::Function => self.constructible,
            _ => false,
        }
    }

    /// Own enumerable string keys, in key order
    pub fn enumerable_keys(&self) -> impl Iterator<Item = &str> {
        self.keys
            .iter()
            .filter(|key| key.enumerable)
            .map(|key| key.name.as_str())
    }
}

/// Raw JavaScript source as delivered by the fetch collaborator
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceText {
    Available(String),
    /// The collaborator could not retrieve the source
    Unavailable,
}

impl SourceText {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            SourceText::Available(text) => Some(text),
            SourceText::Unavailable => None,
        }
    }
}

impl From<Option<String>> for SourceText {
    fn from(text: Option<String>) -> Self {
        text.map(SourceText::Available)
            .unwrap_or(SourceText::Unavailable)
    }
}

/// A loaded module: the exported value plus the text it came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedModule {
    pub exports: RuntimeValue,
    pub source: SourceText,
}

impl LoadedModule {
    pub fn new(exports: RuntimeValue, source: SourceText) -> Self {
        Self { exports, source }
    }
}
