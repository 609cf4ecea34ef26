// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! The per-action metadata record emitted into the generated template module.
//!
//! The dispatch layer looks up `(provider, name)` pairs against these records
//! to describe and route actions. Every template is validated against
//! [`ActionTemplate::record_schema`] before it is emitted, so a malformed
//! registry entry can never silently produce malformed metadata.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::schema::{ObjectSchema, Schema};
use crate::tags;

/// Serialized metadata for one action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionTemplate {
    /// Provider identifier as declared in the registry.
    pub provider: String,
    /// Action identifier as declared in the registry.
    pub name: String,
    /// Human-readable action name.
    pub display_name: String,
    /// What the action does.
    pub description: String,
    /// Capability identifiers required to invoke the action.
    pub scopes: Vec<String>,
    /// Action-level tags (members of the action tag vocabulary).
    pub tags: Vec<String>,
    /// Parameter shape as declared, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Value>,
    /// Output shape as declared, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<Value>,
}

impl ActionTemplate {
    /// The fixed record schema every emitted template must satisfy.
    pub fn record_schema() -> Schema {
        let tag_values = tags::action_tag_names()
            .iter()
            .map(|name| json!(name))
            .collect();
        Schema::Object(ObjectSchema {
            required: vec![
                "provider".to_string(),
                "name".to_string(),
                "displayName".to_string(),
                "description".to_string(),
                "scopes".to_string(),
                "tags".to_string(),
            ],
            properties: vec![
                ("provider".to_string(), Schema::String),
                ("name".to_string(), Schema::String),
                ("displayName".to_string(), Schema::String),
                ("description".to_string(), Schema::String),
                (
                    "scopes".to_string(),
                    Schema::Array(Box::new(Schema::String)),
                ),
                (
                    "tags".to_string(),
                    Schema::Array(Box::new(Schema::Enum(tag_values))),
                ),
                ("parameters".to_string(), Schema::Any),
                ("output".to_string(), Schema::Any),
            ],
            additional: false,
        })
    }
}
