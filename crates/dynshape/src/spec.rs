// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Declarative inputs: type specs, property definitions and setters.

use crate::contract::InterfaceDef;
use crate::generated::GeneratedType;
use crate::value::{IntoValue, Value, ValueKind};
use std::sync::Arc;

/// Name, kind and optional default of one property.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyDef {
    name: Arc<str>,
    kind: ValueKind,
    default: Option<Value>,
}

impl PropertyDef {
    pub fn new(name: impl Into<Arc<str>>, kind: ValueKind) -> Self {
        Self {
            name: name.into(),
            kind,
            default: None,
        }
    }

    /// Value new instances start with instead of the kind's default.
    pub fn with_default(mut self, value: impl IntoValue) -> Self {
        self.default = Some(value.into_value());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> ValueKind {
        self.kind
    }

    pub fn default_value(&self) -> Option<&Value> {
        self.default.as_ref()
    }
}

/// A `(name, value)` assignment applied to an instance.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertySetter {
    pub name: String,
    pub value: Value,
}

impl PropertySetter {
    pub fn new(name: impl Into<String>, value: impl IntoValue) -> Self {
        Self {
            name: name.into(),
            value: value.into_value(),
        }
    }

    /// Assign null.
    pub fn null(name: impl Into<String>) -> Self {
        Self::new(name, Value::Null)
    }
}

/// Declarative description of a type to synthesize.
///
/// ```rust
/// use dynshape::{GenerationEngine, PropertyDef, TypeSpec, ValueKind};
///
/// let spec = TypeSpec::new("SensorReading")
///     .property(PropertyDef::new("SensorId", ValueKind::U32))
///     .property(PropertyDef::new("Celsius", ValueKind::F64).with_default(20.0))
///     .with_notify(true);
///
/// let engine = GenerationEngine::default();
/// let activator = engine.generate(&spec).unwrap();
/// let reading = activator.create();
/// assert_eq!(activator.get_value_as::<f64>(&reading, "Celsius").unwrap(), 20.0);
/// ```
#[derive(Debug, Clone)]
pub struct TypeSpec {
    name: Arc<str>,
    properties: Vec<PropertyDef>,
    base: Option<Arc<GeneratedType>>,
    interfaces: Vec<Arc<InterfaceDef>>,
    notify: bool,
    sealed: bool,
}

impl TypeSpec {
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        Self {
            name: name.into(),
            properties: Vec::new(),
            base: None,
            interfaces: Vec::new(),
            notify: false,
            sealed: false,
        }
    }

    pub fn property(mut self, def: PropertyDef) -> Self {
        self.properties.push(def);
        self
    }

    pub fn properties_from(mut self, defs: impl IntoIterator<Item = PropertyDef>) -> Self {
        self.properties.extend(defs);
        self
    }

    pub fn with_base(mut self, base: Arc<GeneratedType>) -> Self {
        self.base = Some(base);
        self
    }

    pub fn with_interface(mut self, iface: Arc<InterfaceDef>) -> Self {
        self.interfaces.push(iface);
        self
    }

    /// Raise change notification from every generated setter.
    pub fn with_notify(mut self, notify: bool) -> Self {
        self.notify = notify;
        self
    }

    pub fn with_sealed(mut self, sealed: bool) -> Self {
        self.sealed = sealed;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn properties(&self) -> &[PropertyDef] {
        &self.properties
    }

    pub fn base(&self) -> Option<&Arc<GeneratedType>> {
        self.base.as_ref()
    }

    pub fn interfaces(&self) -> &[Arc<InterfaceDef>] {
        &self.interfaces
    }

    pub fn notify(&self) -> bool {
        self.notify
    }

    pub fn sealed(&self) -> bool {
        self.sealed
    }
}
