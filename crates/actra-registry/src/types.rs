// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Registry file data model.
//!
//! The registry is the root input of the compiler: a JSON file mapping
//! provider identifiers to their actions, each described by an
//! [`ActionDefinition`]. Definitions are read once at generation time and
//! never mutated.
//!
//! Maps are `IndexMap` so iteration follows the file's declaration order,
//! which keeps generated output byte-identical across runs.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The full declarative registry: provider -> action -> definition.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Registry {
    /// Providers in declaration order, each mapping action ids to definitions.
    pub providers: IndexMap<String, IndexMap<String, ActionDefinition>>,
}

impl Registry {
    /// Total number of actions across all providers.
    pub fn action_count(&self) -> usize {
        self.providers.values().map(|actions| actions.len()).sum()
    }

    /// Iterate every (provider, action, definition) triple in declaration order.
    pub fn iter_actions(&self) -> impl Iterator<Item = (&str, &str, &ActionDefinition)> {
        self.providers.iter().flat_map(|(provider, actions)| {
            actions
                .iter()
                .map(move |(action, definition)| (provider.as_str(), action.as_str(), definition))
        })
    }
}

/// One action as declared in the registry.
///
/// `parameters` and `output` are kept as raw JSON here; the compiler's
/// structural validator parses them into typed shapes and reports itemized
/// violations instead of a bare deserialization error.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ActionDefinition {
    /// Human-readable action name shown in catalogs.
    pub display_name: String,
    /// What the action does.
    pub description: String,
    /// Capability identifiers required to invoke the action, in order.
    pub scopes: Vec<String>,
    /// Action-level tags, validated against the action tag vocabulary.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    /// Parameter shape. Absent means the action takes no input.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Value>,
    /// Output shape. Absent means the action returns nothing meaningful.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<Value>,
}
