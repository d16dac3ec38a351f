// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Error types for type generation and instance access.

use thiserror::Error;

/// Errors raised by the generation engine, instances and activators.
///
/// Every error is reported synchronously by the call that triggers it. A failed
/// declare-call leaves its [`TypeBuilder`](crate::TypeBuilder) unusable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("Type name already in use: {0}")]
    NameConflict(String),

    #[error("Duplicate property name: {0}")]
    DuplicatePropertyName(String),

    #[error("Unknown property: {0}")]
    UnknownProperty(String),

    #[error("Type mismatch: expected {expected}, got {found}")]
    TypeMismatch { expected: String, found: String },

    #[error("Invalid base type {base}: {reason}")]
    InvalidBaseType { base: String, reason: String },

    #[error("Type {0} is already finalized")]
    FinalizedStateViolation(String),

    #[error("Type {0} has no change-notification support")]
    MissingNotifyCapability(String),

    #[error("Change-notification support already declared on {0}")]
    NotifySupportRedeclared(String),

    #[error("Interface {interface} not satisfied: member {member} {reason}")]
    UnsatisfiedContract {
        interface: String,
        member: String,
        reason: String,
    },

    #[error("Property {property} is not {access} through interface {interface}")]
    AccessViolation {
        interface: String,
        property: String,
        access: &'static str,
    },

    #[error("Builder session for {0} failed earlier and must be discarded")]
    SessionFailed(String),
}

impl Error {
    pub(crate) fn mismatch(expected: impl ToString, found: impl ToString) -> Self {
        Self::TypeMismatch {
            expected: expected.to_string(),
            found: found.to_string(),
        }
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
