// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Stateful objects: the entities the scheduler drives through state machines.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The closed set of manageable entity classes.
///
/// This is the Rust-native stand-in for content-type polymorphism: the
/// original system downcasts on a `content_type` foreign key, here it is an
/// explicit, exhaustively-matchable discriminator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectClass {
    Host,
    Target,
    Filesystem,
    PowerDevice,
    ConfigParam,
}

crate::simple_display! {
    ObjectClass {
        Host => "host",
        Target => "target",
        Filesystem => "filesystem",
        PowerDevice => "power_device",
        ConfigParam => "config_param",
    }
}

impl ObjectClass {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "host" => Some(Self::Host),
            "target" => Some(Self::Target),
            "filesystem" => Some(Self::Filesystem),
            "power_device" => Some(Self::PowerDevice),
            "config_param" => Some(Self::ConfigParam),
            _ => None,
        }
    }
}

/// Identity of a stateful object: `(content_type, id)` in spec terms.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ObjectKey {
    pub class: ObjectClass,
    pub id: String,
}

impl ObjectKey {
    pub fn new(class: ObjectClass, id: impl Into<String>) -> Self {
        Self { class, id: id.into() }
    }
}

impl fmt::Display for ObjectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.class, self.id)
    }
}

/// A domain entity with a finite state machine.
///
/// Implementations are expected to be cheap, `Clone`-able snapshots handed
/// out by a [`crate::oracle::ModelRegistry`]; the scheduler never mutates
/// one directly, it only reads `state()` and asks for the object's key.
pub trait StatefulObject: fmt::Debug + Send + Sync {
    fn key(&self) -> ObjectKey;

    /// Current persisted state. May lag the "expected" state the planner
    /// tracks while jobs are pending.
    fn state(&self) -> &str;

    /// The finite set of valid states for this object's class.
    fn states(&self) -> &'static [&'static str];

    /// If true, `state` can never change (e.g. a deleted/removed object
    /// frozen for historical Job records).
    fn immutable_state(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn object_class_round_trips_through_display_and_parse() {
        for class in [
            ObjectClass::Host,
            ObjectClass::Target,
            ObjectClass::Filesystem,
            ObjectClass::PowerDevice,
            ObjectClass::ConfigParam,
        ] {
            assert_eq!(ObjectClass::parse(&class.to_string()), Some(class));
        }
    }

    #[test]
    fn object_key_display_is_class_slash_id() {
        let key = ObjectKey::new(ObjectClass::Target, "7");
        assert_eq!(key.to_string(), "target/7");
    }
}
