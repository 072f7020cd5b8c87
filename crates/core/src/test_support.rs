// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Proptest strategies for the data model, shared across crates' property
//! tests so every invariant check draws objects from the same distribution.

use crate::object::{ObjectClass, ObjectKey};
use proptest::prelude::*;

pub fn object_class() -> impl Strategy<Value = ObjectClass> {
    prop_oneof![
        Just(ObjectClass::Host),
        Just(ObjectClass::Target),
        Just(ObjectClass::Filesystem),
        Just(ObjectClass::PowerDevice),
        Just(ObjectClass::ConfigParam),
    ]
}

/// An `ObjectKey` with a short numeric-looking id, matching the shape real
/// inventories use (`target/7`, not arbitrary Unicode).
pub fn object_key() -> impl Strategy<Value = ObjectKey> {
    (object_class(), 0u32..64).prop_map(|(class, id)| ObjectKey::new(class, id.to_string()))
}
