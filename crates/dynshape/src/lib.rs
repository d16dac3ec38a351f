// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! # dynshape - runtime type synthesis
//!
//! Describe a data shape at run time (name, typed properties with defaults, an
//! optional base type, structural interfaces, optional change notification) and
//! get back a concrete, instantiable type.
//!
//! ## Quick Start
//!
//! ```rust
//! use dynshape::{
//!     GenerationEngine, PropertyChangedHandler, PropertyDef, PropertySetter, TypeSpec, ValueKind,
//! };
//!
//! let engine = GenerationEngine::default();
//! let spec = TypeSpec::new("Customer")
//!     .property(PropertyDef::new("Name", ValueKind::String))
//!     .with_notify(true);
//! let customers = engine.generate(&spec)?;
//!
//! let mut acme = customers.create();
//! acme.subscribe(&PropertyChangedHandler::new(|_, event| {
//!     println!("{} changed", event.property_name);
//! }))?;
//! customers.set_values(&mut acme, [PropertySetter::new("Name", "Acme")])?;
//! assert_eq!(customers.get_value_as::<String>(&acme, "Name")?, "Acme");
//! # Ok::<(), dynshape::Error>(())
//! ```
//!
//! ## Architecture
//!
//! ```text
//! TypeSpec ──> GenerationEngine::begin ──> TypeBuilder (Building)
//!                                              │ declare_* ...
//!                                              ▼ finalize
//!                                    Arc<GeneratedType> (immutable)
//!                                              │
//!                                              ▼
//!                          InstanceActivator ──> Instance (slot arena)
//!                                                   └─ HandlerList (ArcSwap snapshot)
//! ```
//!
//! ## Key Types
//!
//! - [`GenerationEngine`] / [`TypeBuilder`]: build sessions and the name registry
//! - [`GeneratedType`]: finalized layout, accessors, interfaces, base linkage
//! - [`InstanceActivator`]: cached factory and name-indexed get/set
//! - [`Instance`]: slot storage plus the lock-free handler list
//! - [`InterfaceDef`]: structural contracts a type can declare

pub mod activator;
pub mod config;
pub mod contract;
pub mod engine;
pub mod error;
pub mod generated;
pub mod instance;
pub mod notify;
pub mod spec;
pub mod value;

pub use activator::InstanceActivator;
pub use config::{ConfigError, EngineConfig};
pub use contract::{Access, ContractMember, InterfaceDef};
pub use engine::{BuildState, GenerationEngine, TypeBuilder, TypeRegistry};
pub use error::{Error, Result};
pub use generated::{GeneratedType, PropertyInfo, PropertyOrigin, TypeId};
pub use instance::{Instance, InterfaceView, InterfaceViewMut};
pub use notify::{HandlerList, PropertyChangedEvent, PropertyChangedHandler};
pub use spec::{PropertyDef, PropertySetter, TypeSpec};
pub use value::{FromValue, IntoValue, Value, ValueKind};
