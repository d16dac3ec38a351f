// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Lock-free property-changed handler registration.
//!
//! The handler set is an immutable `Vec` behind an [`ArcSwap`]. Add and remove
//! read the current snapshot, build a new one, and publish it with a
//! compare-and-swap; a lost race retries against the fresh snapshot. A raise
//! broadcasts to whichever snapshot it loaded, never to a half-updated set.

use crate::instance::Instance;
use arc_swap::{ArcSwap, Guard};
use std::fmt;
use std::sync::Arc;

/// Payload delivered to handlers after a notify-enabled setter stores.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyChangedEvent {
    pub property_name: Arc<str>,
}

type HandlerFn = dyn Fn(&Instance, &PropertyChangedEvent) + Send + Sync;

/// A registered callback. Identity is the shared allocation: clones of one
/// handler are the same handler, two handlers built from equal closures are not.
#[derive(Clone)]
pub struct PropertyChangedHandler {
    inner: Arc<HandlerFn>,
}

impl PropertyChangedHandler {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&Instance, &PropertyChangedEvent) + Send + Sync + 'static,
    {
        Self { inner: Arc::new(f) }
    }

    /// Identity comparison.
    pub fn same(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    fn invoke(&self, sender: &Instance, event: &PropertyChangedEvent) {
        (self.inner)(sender, event);
    }
}

impl fmt::Debug for PropertyChangedHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyChangedHandler")
            .field("ptr", &Arc::as_ptr(&self.inner).cast::<()>())
            .finish()
    }
}

/// Handler slot of a notify-capable instance.
pub struct HandlerList {
    slot: ArcSwap<Vec<PropertyChangedHandler>>,
}

impl HandlerList {
    pub fn new() -> Self {
        Self {
            slot: ArcSwap::from_pointee(Vec::new()),
        }
    }

    /// Register `handler`. Already-registered handlers are left as they are.
    pub fn add(&self, handler: &PropertyChangedHandler) {
        self.update(|current| {
            if current.iter().any(|h| h.same(handler)) {
                return None;
            }
            let mut next = Vec::with_capacity(current.len() + 1);
            next.extend(current.iter().cloned());
            next.push(handler.clone());
            Some(next)
        });
    }

    /// Unregister `handler`. Unknown handlers are ignored.
    pub fn remove(&self, handler: &PropertyChangedHandler) {
        self.update(|current| {
            if !current.iter().any(|h| h.same(handler)) {
                return None;
            }
            Some(
                current
                    .iter()
                    .filter(|h| !h.same(handler))
                    .cloned()
                    .collect(),
            )
        });
    }

    /// Read-compute-swap loop. `compute` returning `None` leaves the slot
    /// untouched.
    fn update<F>(&self, compute: F)
    where
        F: Fn(&[PropertyChangedHandler]) -> Option<Vec<PropertyChangedHandler>>,
    {
        let mut current = self.slot.load_full();
        loop {
            let Some(next) = compute(&current) else {
                return;
            };
            let previous = self.slot.compare_and_swap(&current, Arc::new(next));
            if Arc::ptr_eq(&*previous, &current) {
                return;
            }
            log::trace!("[notify] handler snapshot changed concurrently, retrying");
            current = Guard::into_inner(previous);
        }
    }

    /// Current handler set.
    pub fn snapshot(&self) -> Arc<Vec<PropertyChangedHandler>> {
        self.slot.load_full()
    }

    pub fn len(&self) -> usize {
        self.slot.load().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Invoke every handler of one snapshot, in registration order.
    pub(crate) fn raise(&self, sender: &Instance, property_name: &Arc<str>) {
        let handlers = self.slot.load();
        if handlers.is_empty() {
            return;
        }
        let event = PropertyChangedEvent {
            property_name: property_name.clone(),
        };
        for handler in handlers.iter() {
            handler.invoke(sender, &event);
        }
    }
}

impl Default for HandlerList {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for HandlerList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerList")
            .field("handlers", &self.len())
            .finish()
    }
}
