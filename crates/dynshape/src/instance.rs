// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Instances of generated types.

use crate::contract::{ContractMember, InterfaceDef};
use crate::error::{Error, Result};
use crate::generated::GeneratedType;
use crate::notify::{HandlerList, PropertyChangedHandler};
use crate::value::{FromValue, IntoValue, Value};
use std::fmt;
use std::sync::Arc;

/// One object of a [`GeneratedType`]: an arena of slots addressed through the
/// type's name index.
///
/// Field access is not synchronized; share an instance across threads only for
/// reads and handler (un)registration, which are lock-free.
pub struct Instance {
    ty: Arc<GeneratedType>,
    slots: Vec<Value>,
    handlers: Option<HandlerList>,
}

impl Instance {
    pub(crate) fn from_slots(ty: Arc<GeneratedType>, slots: Vec<Value>) -> Self {
        let handlers = ty.supports_notify().then(HandlerList::new);
        Self {
            ty,
            slots,
            handlers,
        }
    }

    pub fn generated_type(&self) -> &Arc<GeneratedType> {
        &self.ty
    }

    /// Current value of `name`.
    pub fn get(&self, name: &str) -> Result<&Value> {
        let slot = self.slot_of(name)?;
        Ok(self.read_slot(slot))
    }

    /// Current value of `name` viewed as `T`.
    pub fn get_as<T: FromValue>(&self, name: &str) -> Result<T> {
        T::from_value(self.get(name)?)
    }

    /// Run the setter of `name`: store, then raise if the property notifies.
    pub fn set(&mut self, name: &str, value: impl IntoValue) -> Result<()> {
        let slot = self.slot_of(name)?;
        self.write_slot(slot, value.into_value())
    }

    fn slot_of(&self, name: &str) -> Result<usize> {
        self.ty
            .slot_of(name)
            .ok_or_else(|| Error::UnknownProperty(name.to_string()))
    }

    pub(crate) fn read_slot(&self, slot: usize) -> &Value {
        &self.slots[slot]
    }

    /// Setter body. The raise is unconditional: assigning the current value
    /// still notifies.
    pub(crate) fn write_slot(&mut self, slot: usize, value: Value) -> Result<()> {
        let property = &self.ty.properties[slot];
        if !property.kind.accepts(&value) {
            return Err(Error::mismatch(property.kind, value.kind_name()));
        }
        self.slots[slot] = value;
        if property.notify {
            self.raise_property_changed(&property.name);
        }
        Ok(())
    }

    fn raise_property_changed(&self, name: &Arc<str>) {
        if let Some(handlers) = &self.handlers {
            handlers.raise(self, name);
        }
    }

    /// "is-a": the instance's type is `ty` or derives from it.
    pub fn is_a(&self, ty: &GeneratedType) -> bool {
        self.ty.is_subtype_of(ty)
    }

    pub fn implements(&self, iface: &InterfaceDef) -> bool {
        self.ty.implements(iface)
    }

    /// Borrow the instance through `iface`, if its type declares it.
    pub fn as_interface<'a>(&'a self, iface: &'a InterfaceDef) -> Option<InterfaceView<'a>> {
        self.implements(iface).then_some(InterfaceView {
            instance: self,
            iface,
        })
    }

    pub fn as_interface_mut<'a>(
        &'a mut self,
        iface: &'a InterfaceDef,
    ) -> Option<InterfaceViewMut<'a>> {
        if !self.implements(iface) {
            return None;
        }
        Some(InterfaceViewMut {
            instance: self,
            iface,
        })
    }

    /// Handler slot, present when the type supports change notification.
    pub fn property_changed(&self) -> Option<&HandlerList> {
        self.handlers.as_ref()
    }

    /// Register a property-changed handler.
    pub fn subscribe(&self, handler: &PropertyChangedHandler) -> Result<()> {
        self.notify_slot()?.add(handler);
        Ok(())
    }

    /// Unregister a handler; unknown handlers are ignored.
    pub fn unsubscribe(&self, handler: &PropertyChangedHandler) -> Result<()> {
        self.notify_slot()?.remove(handler);
        Ok(())
    }

    pub fn handler_count(&self) -> usize {
        self.handlers.as_ref().map_or(0, HandlerList::len)
    }

    fn notify_slot(&self) -> Result<&HandlerList> {
        self.handlers
            .as_ref()
            .ok_or_else(|| Error::MissingNotifyCapability(self.ty.name().to_string()))
    }
}

impl fmt::Debug for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct(self.ty.name());
        for (property, value) in self.ty.properties().iter().zip(&self.slots) {
            s.field(property.name(), value);
        }
        s.finish()
    }
}

fn contract_member<'a>(iface: &'a InterfaceDef, name: &str) -> Result<&'a ContractMember> {
    iface
        .member(name)
        .ok_or_else(|| Error::UnknownProperty(name.to_string()))
}

fn access_violation(iface: &InterfaceDef, name: &str, access: &'static str) -> Error {
    Error::AccessViolation {
        interface: iface.name().to_string(),
        property: name.to_string(),
        access,
    }
}

/// Read-only view of an instance restricted to one interface's members.
#[derive(Debug, Clone, Copy)]
pub struct InterfaceView<'a> {
    instance: &'a Instance,
    iface: &'a InterfaceDef,
}

impl<'a> InterfaceView<'a> {
    pub fn interface(&self) -> &'a InterfaceDef {
        self.iface
    }

    pub fn get(&self, name: &str) -> Result<&'a Value> {
        if !contract_member(self.iface, name)?.access.readable() {
            return Err(access_violation(self.iface, name, "readable"));
        }
        self.instance.get(name)
    }

    pub fn get_as<T: FromValue>(&self, name: &str) -> Result<T> {
        T::from_value(self.get(name)?)
    }
}

/// Mutable view of an instance restricted to one interface's members.
#[derive(Debug)]
pub struct InterfaceViewMut<'a> {
    instance: &'a mut Instance,
    iface: &'a InterfaceDef,
}

impl InterfaceViewMut<'_> {
    pub fn get(&self, name: &str) -> Result<&Value> {
        if !contract_member(self.iface, name)?.access.readable() {
            return Err(access_violation(self.iface, name, "readable"));
        }
        self.instance.get(name)
    }

    pub fn get_as<T: FromValue>(&self, name: &str) -> Result<T> {
        T::from_value(self.get(name)?)
    }

    pub fn set(&mut self, name: &str, value: impl IntoValue) -> Result<()> {
        if !contract_member(self.iface, name)?.access.writable() {
            return Err(access_violation(self.iface, name, "writable"));
        }
        self.instance.set(name, value)
    }
}
