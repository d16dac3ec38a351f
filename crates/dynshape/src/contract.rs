// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Structural interface contracts.
//!
//! An [`InterfaceDef`] names a set of accessors a generated type must expose.
//! Conformance is structural: a type satisfies the contract when every member
//! resolves to a property of the same name and kind with the required access.

use crate::value::ValueKind;
use std::sync::Arc;

/// Which accessors a contract member exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Access {
    ReadWrite,
    ReadOnly,
    WriteOnly,
}

impl Access {
    pub fn readable(self) -> bool {
        matches!(self, Self::ReadWrite | Self::ReadOnly)
    }

    pub fn writable(self) -> bool {
        matches!(self, Self::ReadWrite | Self::WriteOnly)
    }
}

/// One accessor requirement of an interface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractMember {
    pub name: Arc<str>,
    pub kind: ValueKind,
    pub access: Access,
}

/// A named structural contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterfaceDef {
    name: Arc<str>,
    members: Vec<ContractMember>,
}

impl InterfaceDef {
    pub fn builder(name: impl Into<Arc<str>>) -> InterfaceBuilder {
        InterfaceBuilder {
            name: name.into(),
            members: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn members(&self) -> &[ContractMember] {
        &self.members
    }

    pub fn member(&self, name: &str) -> Option<&ContractMember> {
        self.members.iter().find(|m| &*m.name == name)
    }

    /// Members that get a synthesized backing field and accessor pair.
    pub fn read_write_members(&self) -> impl Iterator<Item = &ContractMember> {
        self.members
            .iter()
            .filter(|m| m.access == Access::ReadWrite)
    }
}

/// Fluent builder for [`InterfaceDef`].
#[derive(Debug)]
pub struct InterfaceBuilder {
    name: Arc<str>,
    members: Vec<ContractMember>,
}

impl InterfaceBuilder {
    /// Add a member with both a getter and a setter.
    pub fn property(self, name: impl Into<Arc<str>>, kind: ValueKind) -> Self {
        self.member(name, kind, Access::ReadWrite)
    }

    /// Add a getter-only member.
    pub fn read_only(self, name: impl Into<Arc<str>>, kind: ValueKind) -> Self {
        self.member(name, kind, Access::ReadOnly)
    }

    /// Add a setter-only member.
    pub fn write_only(self, name: impl Into<Arc<str>>, kind: ValueKind) -> Self {
        self.member(name, kind, Access::WriteOnly)
    }

    pub fn member(mut self, name: impl Into<Arc<str>>, kind: ValueKind, access: Access) -> Self {
        self.members.push(ContractMember {
            name: name.into(),
            kind,
            access,
        });
        self
    }

    pub fn build(self) -> Arc<InterfaceDef> {
        Arc::new(InterfaceDef {
            name: self.name,
            members: self.members,
        })
    }
}
