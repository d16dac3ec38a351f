// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Builder session: one type under construction.

use super::GenerationEngine;
use crate::contract::InterfaceDef;
use crate::error::{Error, Result};
use crate::generated::{GeneratedType, PropertyInfo, PropertyOrigin, TypeId};
use crate::spec::PropertyDef;
use crate::value::{Value, ValueKind};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// Lifecycle of a [`TypeBuilder`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildState {
    Building,
    /// A declare-call failed; the session must be discarded.
    Failed,
    /// Terminal. The type has been published.
    Finalized,
}

/// A property declared in this session, not yet laid out.
#[derive(Debug)]
struct PendingProperty {
    name: Arc<str>,
    kind: ValueKind,
    default: Value,
    notify: bool,
    origin: PropertyOrigin,
}

/// Stateful session producing one [`GeneratedType`].
///
/// Obtained from [`GenerationEngine::begin`]. The session is single-caller;
/// it holds the type name reserved until it finalizes or is dropped.
#[derive(Debug)]
pub struct TypeBuilder<'e> {
    engine: &'e GenerationEngine,
    name: Arc<str>,
    state: BuildState,
    base: Option<Arc<GeneratedType>>,
    interfaces: Vec<Arc<InterfaceDef>>,
    properties: Vec<PendingProperty>,
    /// Inherited slots whose setters must raise in this type.
    notify_inherited: HashSet<Arc<str>>,
    notify_declared: bool,
    sealed: bool,
}

impl<'e> TypeBuilder<'e> {
    pub(super) fn new(engine: &'e GenerationEngine, name: Arc<str>) -> Self {
        Self {
            engine,
            name,
            state: BuildState::Building,
            base: None,
            interfaces: Vec::new(),
            properties: Vec::new(),
            notify_inherited: HashSet::new(),
            notify_declared: false,
            sealed: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn state(&self) -> BuildState {
        self.state
    }

    /// Set the single parent type.
    pub fn declare_base(&mut self, base: &Arc<GeneratedType>) -> Result<()> {
        self.run(|b| {
            if let Some(existing) = &b.base {
                return Err(Error::InvalidBaseType {
                    base: base.name().to_string(),
                    reason: format!("{} already derives from {}", b.name, existing.name()),
                });
            }
            if base.is_sealed() {
                return Err(Error::InvalidBaseType {
                    base: base.name().to_string(),
                    reason: "type is sealed".into(),
                });
            }
            if let Some(clash) = b.properties.iter().find(|p| base.property(&p.name).is_some()) {
                return Err(Error::DuplicatePropertyName(clash.name.to_string()));
            }
            log::trace!("[engine] {} : {}", b.name, base.name());
            b.base = Some(base.clone());
            Ok(())
        })
    }

    /// Conform to `iface`, synthesizing a backing field and accessor pair for
    /// every read/write member not already provided.
    ///
    /// A member already provided with the same kind (by the base, a declared
    /// property or another interface) shares that slot.
    pub fn declare_interface(&mut self, iface: &Arc<InterfaceDef>, notify: bool) -> Result<()> {
        self.run(|b| {
            b.require_notify(notify)?;
            for member in iface.read_write_members() {
                if let Some(existing) = b.resolve_kind(&member.name) {
                    if existing != member.kind {
                        return Err(Error::DuplicatePropertyName(member.name.to_string()));
                    }
                    match b.properties.iter_mut().find(|p| p.name == member.name) {
                        Some(own) => own.notify |= notify,
                        None if notify => {
                            b.notify_inherited.insert(member.name.clone());
                        }
                        None => {}
                    }
                    log::trace!(
                        "[engine] {}.{} already provided, shared with {}",
                        b.name,
                        member.name,
                        iface.name()
                    );
                    continue;
                }
                log::trace!(
                    "[engine] {}.{}: {} (interface {})",
                    b.name,
                    member.name,
                    member.kind,
                    iface.name()
                );
                b.properties.push(PendingProperty {
                    name: member.name.clone(),
                    kind: member.kind,
                    default: member.kind.default_value(),
                    notify,
                    origin: PropertyOrigin::Interface(Arc::from(iface.name())),
                });
            }
            if !b.interfaces.iter().any(|i| **i == **iface) {
                b.interfaces.push(iface.clone());
            }
            Ok(())
        })
    }

    /// Declare a property with the kind's default value.
    pub fn declare_property(
        &mut self,
        name: impl Into<Arc<str>>,
        kind: ValueKind,
        notify: bool,
    ) -> Result<()> {
        self.declare_property_def(&PropertyDef::new(name, kind), notify)
    }

    /// Declare a property from a full definition, including its default.
    pub fn declare_property_def(&mut self, def: &PropertyDef, notify: bool) -> Result<()> {
        self.run(|b| {
            b.require_notify(notify)?;
            if b.resolve_kind(def.name()).is_some() {
                return Err(Error::DuplicatePropertyName(def.name().to_string()));
            }
            let default = match def.default_value() {
                Some(value) if !def.kind().accepts(value) => {
                    return Err(Error::mismatch(def.kind(), value.kind_name()));
                }
                Some(value) => value.clone(),
                None => def.kind().default_value(),
            };
            log::trace!("[engine] {}.{}: {}", b.name, def.name(), def.kind());
            b.properties.push(PendingProperty {
                name: Arc::from(def.name()),
                kind: def.kind(),
                default,
                notify,
                origin: PropertyOrigin::Declared,
            });
            Ok(())
        })
    }

    /// Add the handler slot, add/remove protocol and raise routine.
    pub fn declare_notify_support(&mut self) -> Result<()> {
        self.run(|b| {
            if b.notify_declared {
                return Err(Error::NotifySupportRedeclared(b.name.to_string()));
            }
            if b.base.as_ref().is_some_and(|base| base.supports_notify()) {
                log::debug!("[engine] {} inherits change notification from its base", b.name);
            }
            b.notify_declared = true;
            Ok(())
        })
    }

    /// Forbid deriving from the finalized type.
    pub fn declare_sealed(&mut self) -> Result<()> {
        self.run(|b| {
            b.sealed = true;
            Ok(())
        })
    }

    /// Freeze the session and publish the type.
    pub fn finalize(&mut self) -> Result<Arc<GeneratedType>> {
        self.run(|b| {
            let ty = Arc::new(b.layout()?);
            b.engine.registry().publish(ty.clone());
            b.state = BuildState::Finalized;
            log::debug!(
                "[engine] finalized {} ({} properties, {} interfaces, notify={})",
                ty.qualified_name(),
                ty.properties().len(),
                ty.interfaces().len(),
                ty.supports_notify()
            );
            Ok(ty)
        })
    }

    fn layout(&self) -> Result<GeneratedType> {
        let config = self.engine.config();
        let mut properties: Vec<PropertyInfo> = match &self.base {
            Some(base) => base
                .properties()
                .iter()
                .map(|p| PropertyInfo {
                    notify: p.notify || self.notify_inherited.contains(&p.name),
                    origin: match &p.origin {
                        PropertyOrigin::Inherited(owner) => PropertyOrigin::Inherited(owner.clone()),
                        _ => PropertyOrigin::Inherited(base.name.clone()),
                    },
                    ..p.clone()
                })
                .collect(),
            None => Vec::new(),
        };
        properties.extend(self.properties.iter().map(|p| PropertyInfo {
            name: p.name.clone(),
            kind: p.kind,
            default: p.default.clone(),
            notify: p.notify,
            backing_field: config.backing_field_name(&p.name),
            origin: p.origin.clone(),
        }));

        let index: HashMap<Arc<str>, usize> = properties
            .iter()
            .enumerate()
            .map(|(slot, p)| (p.name.clone(), slot))
            .collect();

        for iface in &self.interfaces {
            for member in iface.members() {
                let reason = match index.get(&member.name).map(|&slot| &properties[slot]) {
                    None => "is not implemented".to_string(),
                    Some(p) if p.kind != member.kind => {
                        format!("has kind {}, expected {}", p.kind, member.kind)
                    }
                    Some(_) => continue,
                };
                return Err(Error::UnsatisfiedContract {
                    interface: iface.name().to_string(),
                    member: member.name.to_string(),
                    reason,
                });
            }
        }

        Ok(GeneratedType {
            id: TypeId::next(),
            name: self.name.clone(),
            qualified_name: config.qualify(&self.name),
            base: self.base.clone(),
            properties,
            index,
            interfaces: self.interfaces.clone(),
            notify: self.has_notify(),
            sealed: self.sealed,
        })
    }

    fn has_notify(&self) -> bool {
        self.notify_declared || self.base.as_ref().is_some_and(|b| b.supports_notify())
    }

    fn require_notify(&self, notify: bool) -> Result<()> {
        if notify && !self.has_notify() {
            return Err(Error::MissingNotifyCapability(self.name.to_string()));
        }
        Ok(())
    }

    /// Kind of `name` if this session or its base already provides it.
    fn resolve_kind(&self, name: &str) -> Option<ValueKind> {
        self.properties
            .iter()
            .find(|p| &*p.name == name)
            .map(|p| p.kind)
            .or_else(|| self.base.as_ref()?.property(name).map(|p| p.kind()))
    }

    /// Run a declare-call, enforcing the state machine.
    fn run<T>(&mut self, op: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        match self.state {
            BuildState::Building => {}
            BuildState::Failed => return Err(Error::SessionFailed(self.name.to_string())),
            BuildState::Finalized => {
                return Err(Error::FinalizedStateViolation(self.name.to_string()))
            }
        }
        let result = op(self);
        if let Err(e) = &result {
            log::debug!("[engine] session {} failed: {}", self.name, e);
            self.state = BuildState::Failed;
        }
        result
    }
}

impl Drop for TypeBuilder<'_> {
    fn drop(&mut self) {
        if self.state != BuildState::Finalized {
            self.engine.registry().release(&self.name);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;

    fn engine() -> GenerationEngine {
        GenerationEngine::new(EngineConfig::default())
    }

    #[test]
    fn test_empty_type() {
        let engine = engine();
        let mut b = engine.begin("TestType").expect("begin");
        let ty = b.finalize().expect("finalize");

        assert_eq!(ty.name(), "TestType");
        assert_eq!(ty.qualified_name(), "Dynshape.DynamicEntities.TestType");
        assert!(ty.properties().is_empty());
        assert_eq!(b.state(), BuildState::Finalized);
    }

    #[test]
    fn test_property_layout() {
        let engine = engine();
        let mut b = engine.begin("Point").expect("begin");
        b.declare_property("X", ValueKind::F64, false).expect("x");
        b.declare_property("Y", ValueKind::F64, false).expect("y");
        let ty = b.finalize().expect("finalize");

        let names: Vec<_> = ty.properties().iter().map(|p| p.name()).collect();
        assert_eq!(names, vec!["X", "Y"]);
        assert_eq!(ty.property("Y").map(|p| p.backing_field()), Some("_Y"));
        assert_eq!(ty.property("X").map(|p| p.default_value()), Some(&Value::F64(0.0)));
    }

    #[test]
    fn test_duplicate_property() {
        let engine = engine();
        let mut b = engine.begin("Dup").expect("begin");
        b.declare_property("A", ValueKind::I32, false).expect("a");
        assert_eq!(
            b.declare_property("A", ValueKind::String, false),
            Err(Error::DuplicatePropertyName("A".into()))
        );
        assert_eq!(b.state(), BuildState::Failed);
        assert_eq!(b.finalize().unwrap_err(), Error::SessionFailed("Dup".into()));
    }

    #[test]
    fn test_declare_after_finalize() {
        let engine = engine();
        let mut b = engine.begin("Frozen").expect("begin");
        b.finalize().expect("finalize");

        assert_eq!(
            b.declare_property("Late", ValueKind::I32, false),
            Err(Error::FinalizedStateViolation("Frozen".into()))
        );
        assert_eq!(
            b.finalize().unwrap_err(),
            Error::FinalizedStateViolation("Frozen".into())
        );
    }

    #[test]
    fn test_notify_requires_support() {
        let engine = engine();
        let mut b = engine.begin("Quiet").expect("begin");
        assert_eq!(
            b.declare_property("Name", ValueKind::String, true),
            Err(Error::MissingNotifyCapability("Quiet".into()))
        );

        let mut b = engine.begin("Loud").expect("begin");
        b.declare_notify_support().expect("notify");
        b.declare_property("Name", ValueKind::String, true).expect("name");
        assert_eq!(
            b.declare_notify_support(),
            Err(Error::NotifySupportRedeclared("Loud".into()))
        );
    }

    #[test]
    fn test_notify_interface_requires_support() {
        let engine = engine();
        let named = InterfaceDef::builder("INamed")
            .property("Name", ValueKind::String)
            .build();

        let mut b = engine.begin("Quiet").expect("begin");
        assert_eq!(
            b.declare_interface(&named, true),
            Err(Error::MissingNotifyCapability("Quiet".into()))
        );
        assert_eq!(b.state(), BuildState::Failed);

        let mut b = engine.begin("Silent").expect("begin");
        b.declare_interface(&named, false).expect("no notify needed");
        let ty = b.finalize().expect("finalize");
        assert_eq!(ty.property("Name").map(|p| p.notifies()), Some(false));
    }

    #[test]
    fn test_default_must_match_kind() {
        let engine = engine();
        let mut b = engine.begin("Defaults").expect("begin");
        let def = PropertyDef::new("Count", ValueKind::U32).with_default("three");
        assert!(matches!(
            b.declare_property_def(&def, false),
            Err(Error::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_sealed_base_rejected() {
        let engine = engine();
        let mut b = engine.begin("Leaf").expect("begin");
        b.declare_sealed().expect("seal");
        let leaf = b.finalize().expect("finalize");

        let mut d = engine.begin("Derived").expect("begin");
        assert!(matches!(
            d.declare_base(&leaf),
            Err(Error::InvalidBaseType { .. })
        ));
    }

    #[test]
    fn test_single_parent() {
        let engine = engine();
        let a = engine.begin("A").and_then(|mut b| b.finalize()).expect("a");
        let c = engine.begin("C").and_then(|mut b| b.finalize()).expect("c");

        let mut d = engine.begin("D").expect("begin");
        d.declare_base(&a).expect("first base");
        assert!(matches!(d.declare_base(&c), Err(Error::InvalidBaseType { .. })));
    }

    #[test]
    fn test_base_property_clash() {
        let engine = engine();
        let mut b = engine.begin("Entity").expect("begin");
        b.declare_property("Id", ValueKind::I64, false).expect("id");
        let entity = b.finalize().expect("finalize");

        let mut d = engine.begin("Order").expect("begin");
        d.declare_base(&entity).expect("base");
        assert_eq!(
            d.declare_property("Id", ValueKind::I64, false),
            Err(Error::DuplicatePropertyName("Id".into()))
        );
    }

    #[test]
    fn test_inherited_layout_prefix() {
        let engine = engine();
        let mut b = engine.begin("Entity").expect("begin");
        b.declare_property("Id", ValueKind::I64, false).expect("id");
        let entity = b.finalize().expect("finalize");

        let mut d = engine.begin("Order").expect("begin");
        d.declare_base(&entity).expect("base");
        d.declare_property("Total", ValueKind::F64, false).expect("total");
        let order = d.finalize().expect("finalize");

        assert_eq!(order.properties()[0].name(), "Id");
        assert_eq!(
            order.properties()[0].origin(),
            &PropertyOrigin::Inherited(Arc::from("Entity"))
        );
        assert!(order.is_subtype_of(&entity));
        assert!(!entity.is_subtype_of(&order));
    }

    #[test]
    fn test_interface_members_synthesized() {
        let engine = engine();
        let named = InterfaceDef::builder("INamed")
            .property("Name", ValueKind::String)
            .build();

        let mut b = engine.begin("Tag").expect("begin");
        b.declare_interface(&named, false).expect("iface");
        let ty = b.finalize().expect("finalize");

        assert!(ty.implements(&named));
        assert!(ty.conforms_to(&named));
        assert_eq!(
            ty.property("Name").map(|p| p.origin().clone()),
            Some(PropertyOrigin::Interface(Arc::from("INamed")))
        );
    }

    #[test]
    fn test_interface_shared_member() {
        let engine = engine();
        let named = InterfaceDef::builder("INamed")
            .property("Name", ValueKind::String)
            .build();
        let labelled = InterfaceDef::builder("ILabelled")
            .property("Name", ValueKind::String)
            .property("Label", ValueKind::String)
            .build();

        let mut b = engine.begin("Both").expect("begin");
        b.declare_interface(&named, false).expect("named");
        b.declare_interface(&labelled, false).expect("labelled");
        let ty = b.finalize().expect("finalize");
        assert_eq!(ty.properties().len(), 2);
        assert!(ty.implements(&named) && ty.implements(&labelled));
    }

    #[test]
    fn test_interface_kind_clash() {
        let engine = engine();
        let a = InterfaceDef::builder("IA").property("Value", ValueKind::I32).build();
        let b_iface = InterfaceDef::builder("IB").property("Value", ValueKind::String).build();

        let mut b = engine.begin("Clash").expect("begin");
        b.declare_interface(&a, false).expect("a");
        assert_eq!(
            b.declare_interface(&b_iface, false),
            Err(Error::DuplicatePropertyName("Value".into()))
        );
    }

    #[test]
    fn test_read_only_member_must_be_provided() {
        let engine = engine();
        let versioned = InterfaceDef::builder("IVersioned")
            .read_only("Version", ValueKind::U32)
            .build();

        let mut b = engine.begin("Unversioned").expect("begin");
        b.declare_interface(&versioned, false).expect("iface");
        assert!(matches!(
            b.finalize(),
            Err(Error::UnsatisfiedContract { ref member, .. }) if member == "Version"
        ));

        let mut b = engine.begin("Versioned").expect("begin");
        b.declare_interface(&versioned, false).expect("iface");
        b.declare_property("Version", ValueKind::U32, false).expect("version");
        let ty = b.finalize().expect("finalize");
        assert!(ty.implements(&versioned));
    }

    #[test]
    fn test_dropped_session_releases_name() {
        let engine = engine();
        {
            let mut b = engine.begin("Scratch").expect("begin");
            b.declare_property("X", ValueKind::I32, false).expect("x");
        }
        assert!(!engine.registry().contains("Scratch"));
        engine.begin("Scratch").expect("begin again");
    }

    #[test]
    fn test_finalized_name_stays_taken() {
        let engine = engine();
        engine
            .begin("Kept")
            .and_then(|mut b| b.finalize())
            .expect("kept");
        assert_eq!(
            engine.begin("Kept").map(|_| ()),
            Err(Error::NameConflict("Kept".into()))
        );
        assert!(engine.lookup("Kept").is_some());
    }
}
