// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Closed tag vocabularies for actions and parameters.
//!
//! Two fixed enumerations established at compiler-definition time:
//! - Action tags classify whether invoking an action reads or mutates remote
//!   state. Downstream policy/authorization logic uses the classification;
//!   the compiler only validates membership.
//! - Parameter tags annotate individual properties inside an action's
//!   parameter shape (e.g. values that should be predefined by the caller
//!   rather than generated, or treated as secrets).
//!
//! Both vocabularies are re-emitted into generated code as an enumeration
//! plus an array constant so downstream crates never hardcode the strings.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use strum::{Display, EnumString, VariantNames};

/// Action-level tag: read/write classification of the remote call.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, VariantNames, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ActionTag {
    /// The action only reads remote state.
    Read,
    /// The action mutates remote state.
    Write,
}

/// Parameter-level tag annotating a single property of an action's shape.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, VariantNames, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ParameterTag {
    /// The value should be supplied by the caller, never synthesized.
    Predefined,
    /// The value is sensitive and must not appear in logs or traces.
    Secret,
}

/// The full ordered action tag vocabulary as string literals.
pub fn action_tag_names() -> &'static [&'static str] {
    <ActionTag as VariantNames>::VARIANTS
}

/// The full ordered parameter tag vocabulary as string literals.
pub fn parameter_tag_names() -> &'static [&'static str] {
    <ParameterTag as VariantNames>::VARIANTS
}

/// Closed-set membership check for action tags.
pub fn is_action_tag(s: &str) -> bool {
    ActionTag::from_str(s).is_ok()
}

/// Closed-set membership check for parameter tags.
pub fn is_parameter_tag(s: &str) -> bool {
    ParameterTag::from_str(s).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_tag_vocabulary() {
        assert_eq!(action_tag_names(), &["read", "write"]);
    }

    #[test]
    fn test_parameter_tag_vocabulary() {
        assert_eq!(parameter_tag_names(), &["predefined", "secret"]);
    }

    #[test]
    fn test_action_tag_membership() {
        assert!(is_action_tag("read"));
        assert!(is_action_tag("write"));
        assert!(!is_action_tag("readonly"));
        assert!(!is_action_tag("READ"));
        assert!(!is_action_tag(""));
    }

    #[test]
    fn test_parameter_tag_membership() {
        assert!(is_parameter_tag("predefined"));
        assert!(is_parameter_tag("secret"));
        assert!(!is_parameter_tag("hidden"));
    }

    #[test]
    fn test_action_tag_display() {
        assert_eq!(ActionTag::Read.to_string(), "read");
        assert_eq!(ActionTag::Write.to_string(), "write");
    }

    #[test]
    fn test_action_tag_serde_round_trip() {
        let json = serde_json::to_string(&ActionTag::Write).unwrap();
        assert_eq!(json, "\"write\"");
        let parsed: ActionTag = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, ActionTag::Write);
    }

    #[test]
    fn test_parameter_tag_from_str() {
        assert_eq!(
            ParameterTag::from_str("secret").unwrap(),
            ParameterTag::Secret
        );
        assert!(ParameterTag::from_str("Secret").is_err());
    }
}
