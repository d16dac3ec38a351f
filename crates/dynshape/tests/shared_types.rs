// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

#![allow(clippy::uninlined_format_args)] // Test/bench code readability over pedantic
#![allow(clippy::missing_panics_doc)] // Tests panic on failure

//! Engine and finalized types shared between threads.

use dynshape::{
    EngineConfig, Error, GenerationEngine, InstanceActivator, PropertyDef, PropertySetter,
    TypeSpec, ValueKind,
};
use std::collections::HashSet;
use std::sync::Arc;

#[test]
fn test_parallel_sessions_get_unique_names() {
    let engine = GenerationEngine::new(EngineConfig::default());

    let results: Vec<_> = std::thread::scope(|s| {
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let engine = &engine;
                // Two threads per name.
                s.spawn(move || engine.generate(&TypeSpec::new(format!("Shape{}", i / 2))).is_ok())
            })
            .collect();
        handles
            .into_iter()
            .map(|h| h.join().expect("join"))
            .collect()
    });

    assert_eq!(results.iter().filter(|ok| **ok).count(), 4);
    assert_eq!(engine.registry().len(), 4);
    let names: HashSet<_> = engine.registry().names().into_iter().collect();
    assert_eq!(names.len(), 4);
}

#[test]
fn test_activator_shared_across_threads() {
    let engine = GenerationEngine::default();
    let activator = Arc::new(
        engine
            .generate(
                &TypeSpec::new("Sample")
                    .property(PropertyDef::new("Index", ValueKind::U64))
                    .property(PropertyDef::new("Tag", ValueKind::String)),
            )
            .expect("generate"),
    );

    std::thread::scope(|s| {
        for i in 0..8u64 {
            let activator = activator.clone();
            s.spawn(move || {
                let instance = activator
                    .create_with([
                        PropertySetter::new("Index", i),
                        PropertySetter::new("Tag", format!("t{}", i)),
                    ])
                    .expect("create");
                assert_eq!(activator.get_value_as::<u64>(&instance, "Index").expect("get"), i);
            });
        }
    });
}

#[test]
fn test_lookup_and_rewrap() {
    let engine = GenerationEngine::default();
    engine
        .generate(&TypeSpec::new("Invoice").property(PropertyDef::new("Total", ValueKind::F64)))
        .expect("generate");

    let ty = engine.lookup("Invoice").expect("registered");
    assert_eq!(ty.qualified_name(), "Dynshape.DynamicEntities.Invoice");

    let activator = InstanceActivator::new(ty);
    let invoice = activator
        .create_with([PropertySetter::new("Total", 99.5f64)])
        .expect("create");
    assert_eq!(activator.get_value_as::<f64>(&invoice, "Total").expect("get"), 99.5);
    assert!(matches!(
        activator.get_value_as::<String>(&invoice, "Total"),
        Err(Error::TypeMismatch { .. })
    ));
}

#[test]
fn test_custom_namespace() {
    let engine = GenerationEngine::new(EngineConfig {
        namespace: "Acme.Models".into(),
        backing_field_prefix: "m_".into(),
    });
    let activator = engine
        .generate(&TypeSpec::new("Part").property(PropertyDef::new("Sku", ValueKind::String)))
        .expect("generate");

    let ty = activator.generated_type();
    assert_eq!(ty.to_string(), "Acme.Models.Part");
    assert_eq!(ty.property("Sku").map(|p| p.backing_field()), Some("m_Sku"));
}
