// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Finalized, immutable type handles.

use crate::config::PROPERTY_CHANGED_EVENT;
use crate::contract::InterfaceDef;
use crate::value::{Value, ValueKind};
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

static NEXT_TYPE_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identifier of a generated type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeId(u64);

impl TypeId {
    pub(crate) fn next() -> Self {
        Self(NEXT_TYPE_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for TypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Where a property of a generated type comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertyOrigin {
    /// `declare_property` on this type.
    Declared,
    /// Synthesized for a read/write member of the named interface.
    Interface(Arc<str>),
    /// Part of the named base type's layout.
    Inherited(Arc<str>),
}

/// One property of a generated type: backing slot plus accessor pair.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyInfo {
    pub(crate) name: Arc<str>,
    pub(crate) kind: ValueKind,
    pub(crate) default: Value,
    pub(crate) notify: bool,
    pub(crate) backing_field: String,
    pub(crate) origin: PropertyOrigin,
}

impl PropertyInfo {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> ValueKind {
        self.kind
    }

    /// Value of the slot in a freshly created instance.
    pub fn default_value(&self) -> &Value {
        &self.default
    }

    /// Whether the setter raises a property-changed event.
    pub fn notifies(&self) -> bool {
        self.notify
    }

    pub fn backing_field(&self) -> &str {
        &self.backing_field
    }

    pub fn origin(&self) -> &PropertyOrigin {
        &self.origin
    }
}

/// Immutable description of a synthesized type.
///
/// Slots are laid out base-first: a base type's properties keep their slot
/// indices in every derived type, so an accessor resolved against a base also
/// addresses the same slot in any subtype instance.
#[derive(Debug)]
pub struct GeneratedType {
    pub(crate) id: TypeId,
    pub(crate) name: Arc<str>,
    pub(crate) qualified_name: String,
    pub(crate) base: Option<Arc<GeneratedType>>,
    pub(crate) properties: Vec<PropertyInfo>,
    pub(crate) index: HashMap<Arc<str>, usize>,
    pub(crate) interfaces: Vec<Arc<InterfaceDef>>,
    pub(crate) notify: bool,
    pub(crate) sealed: bool,
}

impl GeneratedType {
    pub fn id(&self) -> TypeId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name including the engine namespace.
    pub fn qualified_name(&self) -> &str {
        &self.qualified_name
    }

    pub fn base(&self) -> Option<&Arc<GeneratedType>> {
        self.base.as_ref()
    }

    /// All properties in slot order, inherited ones first.
    pub fn properties(&self) -> &[PropertyInfo] {
        &self.properties
    }

    pub fn property(&self, name: &str) -> Option<&PropertyInfo> {
        self.slot_of(name).map(|slot| &self.properties[slot])
    }

    pub(crate) fn slot_of(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    /// Interfaces declared directly on this type.
    pub fn interfaces(&self) -> &[Arc<InterfaceDef>] {
        &self.interfaces
    }

    /// Whether this type or one of its bases declared `iface`.
    ///
    /// Contracts match on name and members; a same-named contract with a
    /// different member set is a different contract.
    pub fn implements(&self, iface: &InterfaceDef) -> bool {
        self.ancestry()
            .any(|ty| ty.interfaces.iter().any(|i| **i == *iface))
    }

    /// Structural check: every member of `iface` resolves to a property of the
    /// same kind. Generated properties always carry both accessors.
    pub fn conforms_to(&self, iface: &InterfaceDef) -> bool {
        iface
            .members()
            .iter()
            .all(|m| self.property(&m.name).is_some_and(|p| p.kind == m.kind))
    }

    /// `true` for `self` and any type deriving from `other`.
    pub fn is_subtype_of(&self, other: &GeneratedType) -> bool {
        self.ancestry().any(|ty| ty.id == other.id)
    }

    /// Self followed by each base up the chain.
    pub fn ancestry(&self) -> impl Iterator<Item = &GeneratedType> {
        std::iter::successors(Some(self), |ty| ty.base.as_deref())
    }

    pub fn supports_notify(&self) -> bool {
        self.notify
    }

    /// Event name when the type carries change notification.
    pub fn notify_event(&self) -> Option<&'static str> {
        self.notify.then_some(PROPERTY_CHANGED_EVENT)
    }

    /// Sealed types cannot be used as a base.
    pub fn is_sealed(&self) -> bool {
        self.sealed
    }

    /// Slot values of a freshly constructed instance.
    pub(crate) fn default_slots(&self) -> Vec<Value> {
        self.properties.iter().map(|p| p.default.clone()).collect()
    }
}

impl fmt::Display for GeneratedType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.qualified_name)
    }
}
