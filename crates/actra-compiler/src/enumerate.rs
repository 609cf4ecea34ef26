// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Registry enumeration.
//!
//! A single walk over the registry derives two closed enumerations for
//! generated code: the set of provider identifiers and the set of distinct
//! action identifiers across all providers. These are informational typing
//! aids for downstream code; the compiler itself does not use them.

use actra_registry::types::Registry;

use crate::idents::{pascal_case, upper_snake_case};

/// One member of a derived enumeration.
#[derive(Debug, Clone, PartialEq)]
pub struct EnumEntry {
    /// The identifier as declared in the registry.
    pub id: String,
    /// PascalCase variant name for the generated enum.
    pub variant: String,
    /// UPPER_SNAKE string value returned by `as_str()`.
    pub value: String,
}

/// The two enumerations derived from one registry walk.
#[derive(Debug, Clone, Default)]
pub struct Enumerations {
    /// Every provider identifier, in declaration order.
    pub providers: Vec<EnumEntry>,
    /// Every distinct action identifier across all providers, first-seen order.
    pub actions: Vec<EnumEntry>,
}

/// Walk the registry once and derive both enumerations.
///
/// Actions are deduplicated by identifier regardless of which provider(s)
/// declare them. Identifiers whose PascalCase forms coincide are also
/// deduplicated, first declaration wins, so the emitted enums never carry
/// duplicate variants.
pub fn enumerate_registry(registry: &Registry) -> Enumerations {
    let mut enums = Enumerations::default();

    for (provider, actions) in &registry.providers {
        push_unique(&mut enums.providers, provider);
        for action in actions.keys() {
            push_unique(&mut enums.actions, action);
        }
    }

    enums
}

fn push_unique(entries: &mut Vec<EnumEntry>, id: &str) {
    let variant = pascal_case(id);
    if entries.iter().any(|e| e.id == id || e.variant == variant) {
        return;
    }
    entries.push(EnumEntry {
        id: id.to_string(),
        value: upper_snake_case(id),
        variant,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn registry_from(value: serde_json::Value) -> Registry {
        serde_json::from_value(value).unwrap()
    }

    fn action() -> serde_json::Value {
        json!({ "displayName": "X", "description": "", "scopes": [] })
    }

    #[test]
    fn test_providers_in_declaration_order() {
        let enums = enumerate_registry(&registry_from(json!({
            "zeta": { "ping": action() },
            "alpha": { "pong": action() }
        })));
        let ids: Vec<&str> = enums.providers.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["zeta", "alpha"]);
    }

    #[test]
    fn test_actions_deduplicated_across_providers() {
        let enums = enumerate_registry(&registry_from(json!({
            "alpha": { "list": action(), "get": action() },
            "beta": { "list": action(), "update": action() }
        })));
        let ids: Vec<&str> = enums.actions.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["list", "get", "update"]);
    }

    #[test]
    fn test_normalized_forms() {
        let enums = enumerate_registry(&registry_from(json!({
            "shop-api": { "get-order": action() }
        })));
        assert_eq!(enums.providers[0].variant, "ShopApi");
        assert_eq!(enums.providers[0].value, "SHOP_API");
        assert_eq!(enums.actions[0].variant, "GetOrder");
        assert_eq!(enums.actions[0].value, "GET_ORDER");
    }

    #[test]
    fn test_colliding_variants_deduplicated() {
        let enums = enumerate_registry(&registry_from(json!({
            "alpha": { "get-order": action() },
            "beta": { "getOrder": action() }
        })));
        // Both normalize to GetOrder; first declaration wins.
        assert_eq!(enums.actions.len(), 1);
        assert_eq!(enums.actions[0].id, "get-order");
    }
}
