// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! CLI-facing wrapper parsing `class/id` into an [`ObjectKey`], shared by
//! every subcommand that takes an object argument.

use lcm_core::object::{ObjectClass, ObjectKey};
use std::str::FromStr;

#[derive(Debug, Clone)]
pub struct ObjectKeyArg(pub ObjectKey);

impl FromStr for ObjectKeyArg {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let (class, id) = raw.split_once('/').ok_or_else(|| format!("expected class/id, got `{raw}`"))?;
        let class = ObjectClass::parse(class).ok_or_else(|| format!("unknown object class `{class}`"))?;
        if id.is_empty() {
            return Err(format!("missing id in `{raw}`"));
        }
        Ok(Self(ObjectKey::new(class, id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_class_slash_id() {
        let parsed: ObjectKeyArg = "target/7".parse().expect("valid");
        assert_eq!(parsed.0, ObjectKey::new(ObjectClass::Target, "7"));
    }

    #[test]
    fn rejects_missing_slash() {
        assert!("target7".parse::<ObjectKeyArg>().is_err());
    }

    #[test]
    fn rejects_unknown_class() {
        assert!("widget/7".parse::<ObjectKeyArg>().is_err());
    }
}
