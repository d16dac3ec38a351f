// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Instance activator: cached construction and name-indexed access.
//!
//! Everything name-related is resolved once in [`InstanceActivator::new`]:
//! the accessor table maps property names to slots and the factory closure
//! holds a ready-made default slot template. `create()` is a template clone.

use crate::error::{Error, Result};
use crate::generated::GeneratedType;
use crate::instance::Instance;
use crate::spec::PropertySetter;
use crate::value::{FromValue, Value};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

type Factory = Box<dyn Fn() -> Instance + Send + Sync>;

/// Resolved getter/setter pair of one property.
#[derive(Debug, Clone, Copy)]
struct Accessor {
    slot: usize,
}

/// Creates and manipulates instances of one finalized type.
pub struct InstanceActivator {
    ty: Arc<GeneratedType>,
    accessors: HashMap<Arc<str>, Accessor>,
    factory: Factory,
}

impl InstanceActivator {
    /// Build the accessor table and factory for `ty`.
    pub fn new(ty: Arc<GeneratedType>) -> Self {
        let accessors = ty
            .properties()
            .iter()
            .enumerate()
            .map(|(slot, p)| (p.name.clone(), Accessor { slot }))
            .collect();

        let template = ty.default_slots();
        let factory_ty = ty.clone();
        let factory: Factory =
            Box::new(move || Instance::from_slots(factory_ty.clone(), template.clone()));

        log::debug!(
            "[activator] {} ready ({} accessors)",
            ty.qualified_name(),
            ty.properties().len()
        );

        Self {
            ty,
            accessors,
            factory,
        }
    }

    pub fn generated_type(&self) -> &Arc<GeneratedType> {
        &self.ty
    }

    /// Property names, in slot order.
    pub fn property_names(&self) -> impl Iterator<Item = &str> {
        self.ty.properties().iter().map(|p| p.name())
    }

    /// New instance with every property at its default.
    pub fn create(&self) -> Instance {
        (self.factory)()
    }

    /// New instance with `setters` applied left to right.
    ///
    /// The first failing setter aborts; the partially initialized instance is
    /// dropped.
    pub fn create_with<I>(&self, setters: I) -> Result<Instance>
    where
        I: IntoIterator<Item = PropertySetter>,
    {
        let mut instance = self.create();
        self.apply(&mut instance, setters)?;
        Ok(instance)
    }

    /// Apply `setters` left to right to an existing instance.
    ///
    /// Setters before a failing one stay applied.
    pub fn set_values<I>(&self, instance: &mut Instance, setters: I) -> Result<()>
    where
        I: IntoIterator<Item = PropertySetter>,
    {
        self.ensure_compatible(instance)?;
        self.apply(instance, setters)
    }

    /// Current value of `name` on `instance`.
    pub fn get_value<'i>(&self, instance: &'i Instance, name: &str) -> Result<&'i Value> {
        self.ensure_compatible(instance)?;
        let accessor = self.accessor(name)?;
        Ok(instance.read_slot(accessor.slot))
    }

    /// Current value of `name` viewed as `T`.
    ///
    /// A null slot only views as `Option<T>` (or [`Value`]); asking for
    /// `String` on an unset string property is a `TypeMismatch`, use
    /// `Option<String>` when the property may be unset.
    pub fn get_value_as<T: FromValue>(&self, instance: &Instance, name: &str) -> Result<T> {
        T::from_value(self.get_value(instance, name)?)
    }

    fn apply<I>(&self, instance: &mut Instance, setters: I) -> Result<()>
    where
        I: IntoIterator<Item = PropertySetter>,
    {
        for setter in setters {
            let accessor = self.accessor(&setter.name)?;
            instance.write_slot(accessor.slot, setter.value)?;
        }
        Ok(())
    }

    fn accessor(&self, name: &str) -> Result<Accessor> {
        self.accessors
            .get(name)
            .copied()
            .ok_or_else(|| Error::UnknownProperty(name.to_string()))
    }

    /// Slots resolved for this type are valid for it and its subtypes only.
    fn ensure_compatible(&self, instance: &Instance) -> Result<()> {
        if instance.is_a(&self.ty) {
            Ok(())
        } else {
            Err(Error::mismatch(
                self.ty.qualified_name(),
                instance.generated_type().qualified_name(),
            ))
        }
    }
}

impl fmt::Debug for InstanceActivator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InstanceActivator")
            .field("type", &self.ty.qualified_name())
            .field("accessors", &self.accessors.len())
            .finish_non_exhaustive()
    }
}
