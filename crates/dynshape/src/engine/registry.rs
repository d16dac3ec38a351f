// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Name registry scoped to one engine.

use crate::error::{Error, Result};
use crate::generated::GeneratedType;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::Arc;

/// Registry slot state.
#[derive(Debug, Clone)]
enum Slot {
    /// Claimed by a builder session that has not finalized yet.
    Reserved,
    Finalized(Arc<GeneratedType>),
}

/// Tracks every type name claimed through one [`GenerationEngine`](super::GenerationEngine).
///
/// Names are reserved when a session begins, so two live sessions can never
/// produce the same name. Finalized types stay registered for the registry's
/// lifetime.
#[derive(Debug, Default)]
pub struct TypeRegistry {
    types: DashMap<Arc<str>, Slot>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim `name` for a new session.
    pub(crate) fn reserve(&self, name: &Arc<str>) -> Result<()> {
        match self.types.entry(name.clone()) {
            Entry::Occupied(_) => Err(Error::NameConflict(name.to_string())),
            Entry::Vacant(vacant) => {
                vacant.insert(Slot::Reserved);
                Ok(())
            }
        }
    }

    /// Drop a reservation that never finalized. Finalized entries are kept.
    pub(crate) fn release(&self, name: &str) {
        let removed = self
            .types
            .remove_if(name, |_, slot| matches!(slot, Slot::Reserved));
        if removed.is_some() {
            log::debug!("[engine] released unfinalized type name {}", name);
        }
    }

    pub(crate) fn publish(&self, ty: Arc<GeneratedType>) {
        self.types.insert(ty.name.clone(), Slot::Finalized(ty));
    }

    /// Finalized type registered under `name`.
    pub fn get(&self, name: &str) -> Option<Arc<GeneratedType>> {
        self.types.get(name).and_then(|slot| match slot.value() {
            Slot::Finalized(ty) => Some(ty.clone()),
            Slot::Reserved => None,
        })
    }

    /// Whether `name` is reserved or finalized.
    pub fn contains(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    /// Number of finalized types.
    pub fn len(&self) -> usize {
        self.types
            .iter()
            .filter(|entry| matches!(entry.value(), Slot::Finalized(_)))
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Names of all finalized types, sorted.
    pub fn names(&self) -> Vec<Arc<str>> {
        let mut names: Vec<_> = self
            .types
            .iter()
            .filter(|entry| matches!(entry.value(), Slot::Finalized(_)))
            .map(|entry| entry.key().clone())
            .collect();
        names.sort();
        names
    }
}
