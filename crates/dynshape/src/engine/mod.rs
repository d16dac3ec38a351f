// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Generation engine.
//!
//! A [`GenerationEngine`] owns the name registry and hands out [`TypeBuilder`]
//! sessions. A session moves `Building -> Finalized` exactly once; any
//! declare-call on a finalized session fails with
//! [`Error::FinalizedStateViolation`](crate::Error::FinalizedStateViolation).
//!
//! # Example
//!
//! ```rust
//! use dynshape::{EngineConfig, GenerationEngine, InstanceActivator, ValueKind};
//!
//! let engine = GenerationEngine::new(EngineConfig::default());
//! let mut session = engine.begin("Customer").unwrap();
//! session.declare_notify_support().unwrap();
//! session.declare_property("Name", ValueKind::String, true).unwrap();
//! let customer = session.finalize().unwrap();
//!
//! let activator = InstanceActivator::new(customer);
//! let instance = activator.create();
//! assert!(activator.get_value(&instance, "Name").unwrap().is_null());
//! ```

mod builder;
mod registry;

pub use builder::{BuildState, TypeBuilder};
pub use registry::TypeRegistry;

use crate::activator::InstanceActivator;
use crate::config::EngineConfig;
use crate::error::Result;
use crate::generated::GeneratedType;
use crate::spec::TypeSpec;
use std::sync::Arc;

/// Entry point for synthesizing types.
///
/// The engine can be shared between threads; each [`TypeBuilder`] it returns
/// is used by one caller at a time.
#[derive(Debug, Default)]
pub struct GenerationEngine {
    config: EngineConfig,
    registry: TypeRegistry,
}

impl GenerationEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            registry: TypeRegistry::new(),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    /// Open a session for a new type named `name`.
    pub fn begin(&self, name: impl Into<Arc<str>>) -> Result<TypeBuilder<'_>> {
        let name = name.into();
        self.registry.reserve(&name)?;
        log::debug!("[engine] begin {}", self.config.qualify(&name));
        Ok(TypeBuilder::new(self, name))
    }

    /// Finalized type previously generated under `name`.
    pub fn lookup(&self, name: &str) -> Option<Arc<GeneratedType>> {
        self.registry.get(name)
    }

    /// Run a whole session from a [`TypeSpec`] and wrap the result.
    ///
    /// Calls are issued in the order: notify support, base, interfaces,
    /// properties, finalize. The spec's notify flag applies to every interface
    /// and property.
    pub fn generate(&self, spec: &TypeSpec) -> Result<InstanceActivator> {
        let mut session = self.begin(spec.name())?;
        if spec.notify() {
            session.declare_notify_support()?;
        }
        if let Some(base) = spec.base() {
            session.declare_base(base)?;
        }
        for iface in spec.interfaces() {
            session.declare_interface(iface, spec.notify())?;
        }
        for property in spec.properties() {
            session.declare_property_def(property, spec.notify())?;
        }
        if spec.sealed() {
            session.declare_sealed()?;
        }
        Ok(InstanceActivator::new(session.finalize()?))
    }
}
