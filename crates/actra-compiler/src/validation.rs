// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Registry validation before code generation.
//!
//! This module validates the whole registry before any emission:
//! - Provider and action identifiers are non-empty
//! - Action-level tags belong to the action tag vocabulary
//! - `parameters`/`output` shapes pass the structural checker (which covers
//!   required/properties consistency and parameter-level tags)
//! - Derived symbols (PascalCase prefixes and snake_case function stems)
//!   are unique across the registry
//!
//! All errors are collected so one run reports every diagnostic, but a single
//! error aborts the run before anything is generated or written.

use std::collections::HashMap;
use std::str::FromStr;

use actra_registry::tags::{self, ActionTag};
use actra_registry::types::{ActionDefinition, Registry};

use crate::idents::{derive_fn_stem, derive_prefix};
use crate::shape::{ObjectShape, ShapeViolation, parse_object_shape};

// ============================================================================
// Validation Result Types
// ============================================================================

/// Result of registry validation containing errors and warnings.
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    /// Hard errors that abort the generation run.
    pub errors: Vec<ValidationError>,
    /// Soft warnings that don't abort but indicate potential issues.
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationResult {
    /// Returns true if there are no errors (warnings are allowed).
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    /// Returns true if there are any errors.
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Returns true if there are any warnings.
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// One action that passed validation, carrying everything emission needs.
#[derive(Debug, Clone)]
pub struct ValidatedAction {
    /// Provider identifier as declared.
    pub provider: String,
    /// Action identifier as declared.
    pub action: String,
    /// The declared definition.
    pub definition: ActionDefinition,
    /// Parsed action-level tags.
    pub action_tags: Vec<ActionTag>,
    /// PascalCase prefix shared by the action's bindings.
    pub prefix: String,
    /// snake_case stem for the action's generated functions.
    pub fn_stem: String,
    /// Parsed parameter shape, if declared.
    pub parameters: Option<ObjectShape>,
    /// Parsed output shape, if declared.
    pub output: Option<ObjectShape>,
}

// ============================================================================
// Validation Errors
// ============================================================================

/// Which declared shape of an action a violation belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeSection {
    /// The `parameters` shape.
    Parameters,
    /// The `output` shape.
    Output,
}

impl ShapeSection {
    /// The registry keyword for this section.
    pub fn as_str(&self) -> &'static str {
        match self {
            ShapeSection::Parameters => "parameters",
            ShapeSection::Output => "output",
        }
    }
}

/// Errors that can occur during registry validation.
#[derive(Debug, Clone)]
#[allow(missing_docs)] // Fields are self-documenting from variant docs
pub enum ValidationError {
    /// A provider key is the empty string.
    EmptyProviderId,
    /// An action key is the empty string.
    EmptyActionId { provider: String },
    /// Action-level tags outside the action tag vocabulary.
    InvalidActionTags {
        provider: String,
        action: String,
        invalid: Vec<String>,
    },
    /// A `parameters`/`output` shape failed the structural checker.
    InvalidShape {
        provider: String,
        action: String,
        section: ShapeSection,
        violations: Vec<ShapeViolation>,
    },
    /// Two distinct (provider, action) pairs derive the same generated
    /// symbol (PascalCase prefix or snake_case function stem).
    SymbolCollision {
        symbol: String,
        first: (String, String),
        second: (String, String),
    },
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::EmptyProviderId => {
                write!(f, "[E001] Registry contains an empty provider identifier")
            }
            ValidationError::EmptyActionId { provider } => {
                write!(
                    f,
                    "[E002] Provider '{}' contains an empty action identifier",
                    provider
                )
            }
            ValidationError::InvalidActionTags {
                provider,
                action,
                invalid,
            } => {
                write!(
                    f,
                    "[E010] Action '{}/{}' has invalid tags [{}]. Accepted tags: {}",
                    provider,
                    action,
                    invalid.join(", "),
                    tags::action_tag_names().join(", ")
                )
            }
            ValidationError::InvalidShape {
                provider,
                action,
                section,
                violations,
            } => {
                writeln!(
                    f,
                    "[E020] Action '{}/{}' has an invalid {} shape:",
                    provider,
                    action,
                    section.as_str()
                )?;
                for (i, violation) in violations.iter().enumerate() {
                    if i > 0 {
                        writeln!(f)?;
                    }
                    write!(f, "       - {}", violation)?;
                }
                Ok(())
            }
            ValidationError::SymbolCollision {
                symbol,
                first,
                second,
            } => {
                write!(
                    f,
                    "[E030] Actions '{}/{}' and '{}/{}' both derive the generated symbol '{}'. \
                     Rename one so generated symbols stay unique.",
                    first.0, first.1, second.0, second.1, symbol
                )
            }
        }
    }
}

impl std::error::Error for ValidationError {}

// ============================================================================
// Validation Warnings
// ============================================================================

/// Warnings that indicate potential issues but don't abort generation.
#[derive(Debug, Clone)]
#[allow(missing_docs)] // Fields are self-documenting from variant docs
pub enum ValidationWarning {
    /// Action declares no tags, so policy layers cannot classify it.
    UntaggedAction { provider: String, action: String },
    /// Action declares no scopes.
    NoScopes { provider: String, action: String },
}

impl std::fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationWarning::UntaggedAction { provider, action } => {
                write!(
                    f,
                    "[W001] Action '{}/{}' declares no tags; read/write classification is unavailable downstream",
                    provider, action
                )
            }
            ValidationWarning::NoScopes { provider, action } => {
                write!(
                    f,
                    "[W002] Action '{}/{}' declares no required scopes",
                    provider, action
                )
            }
        }
    }
}

// ============================================================================
// Validation Entry Point
// ============================================================================

/// Validate the whole registry.
///
/// Returns the validated actions in registry iteration order together with
/// the collected diagnostics. The action list is only meaningful when
/// `result.is_ok()`; callers must abort on any error.
pub fn validate_registry(registry: &Registry) -> (Vec<ValidatedAction>, ValidationResult) {
    let mut result = ValidationResult::default();
    let mut actions = Vec::with_capacity(registry.action_count());
    let mut seen_symbols = SeenSymbols::default();

    for (provider, provider_actions) in &registry.providers {
        if provider.is_empty() {
            result.errors.push(ValidationError::EmptyProviderId);
            continue;
        }
        for (action, definition) in provider_actions {
            if action.is_empty() {
                result.errors.push(ValidationError::EmptyActionId {
                    provider: provider.clone(),
                });
                continue;
            }
            if let Some(validated) =
                validate_action(provider, action, definition, &mut seen_symbols, &mut result)
            {
                actions.push(validated);
            }
        }
    }

    (actions, result)
}

/// Generated symbols already claimed by earlier actions. Prefixes and fn
/// stems are derived independently (PascalCase vs snake_case), so two pairs
/// can collide on one without colliding on the other.
#[derive(Debug, Default)]
struct SeenSymbols {
    prefixes: HashMap<String, (String, String)>,
    fn_stems: HashMap<String, (String, String)>,
}

impl SeenSymbols {
    /// Claim both symbols for `(provider, action)`, or return the colliding
    /// symbol together with the pair that claimed it first.
    fn claim(
        &mut self,
        prefix: &str,
        fn_stem: &str,
        provider: &str,
        action: &str,
    ) -> Result<(), (String, (String, String))> {
        if let Some(first) = self.prefixes.get(prefix) {
            return Err((prefix.to_string(), first.clone()));
        }
        if let Some(first) = self.fn_stems.get(fn_stem) {
            return Err((fn_stem.to_string(), first.clone()));
        }
        let pair = (provider.to_string(), action.to_string());
        self.prefixes.insert(prefix.to_string(), pair.clone());
        self.fn_stems.insert(fn_stem.to_string(), pair);
        Ok(())
    }
}

fn validate_action(
    provider: &str,
    action: &str,
    definition: &ActionDefinition,
    seen_symbols: &mut SeenSymbols,
    result: &mut ValidationResult,
) -> Option<ValidatedAction> {
    let mut ok = true;

    let action_tags = validate_action_tags(provider, action, definition, result, &mut ok);

    if definition.tags.is_empty() {
        result.warnings.push(ValidationWarning::UntaggedAction {
            provider: provider.to_string(),
            action: action.to_string(),
        });
    }
    if definition.scopes.is_empty() {
        result.warnings.push(ValidationWarning::NoScopes {
            provider: provider.to_string(),
            action: action.to_string(),
        });
    }

    let parameters = validate_shape(
        provider,
        action,
        ShapeSection::Parameters,
        definition.parameters.as_ref(),
        result,
        &mut ok,
    );
    let output = validate_shape(
        provider,
        action,
        ShapeSection::Output,
        definition.output.as_ref(),
        result,
        &mut ok,
    );

    let prefix = derive_prefix(provider, action);
    let fn_stem = derive_fn_stem(provider, action);
    if let Err((symbol, first)) = seen_symbols.claim(&prefix, &fn_stem, provider, action) {
        result.errors.push(ValidationError::SymbolCollision {
            symbol,
            first,
            second: (provider.to_string(), action.to_string()),
        });
        ok = false;
    }

    if !ok {
        return None;
    }

    Some(ValidatedAction {
        provider: provider.to_string(),
        action: action.to_string(),
        definition: definition.clone(),
        action_tags,
        fn_stem,
        prefix,
        parameters,
        output,
    })
}

fn validate_action_tags(
    provider: &str,
    action: &str,
    definition: &ActionDefinition,
    result: &mut ValidationResult,
    ok: &mut bool,
) -> Vec<ActionTag> {
    let mut parsed = Vec::with_capacity(definition.tags.len());
    let mut invalid = Vec::new();
    for tag in &definition.tags {
        match ActionTag::from_str(tag) {
            Ok(t) => parsed.push(t),
            Err(_) => invalid.push(tag.clone()),
        }
    }
    if !invalid.is_empty() {
        result.errors.push(ValidationError::InvalidActionTags {
            provider: provider.to_string(),
            action: action.to_string(),
            invalid,
        });
        *ok = false;
    }
    parsed
}

fn validate_shape(
    provider: &str,
    action: &str,
    section: ShapeSection,
    declared: Option<&serde_json::Value>,
    result: &mut ValidationResult,
    ok: &mut bool,
) -> Option<ObjectShape> {
    let value = declared?;
    match parse_object_shape(value) {
        Ok(shape) => Some(shape),
        Err(violations) => {
            result.errors.push(ValidationError::InvalidShape {
                provider: provider.to_string(),
                action: action.to_string(),
                section,
                violations,
            });
            *ok = false;
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn registry_from(value: serde_json::Value) -> Registry {
        serde_json::from_value(value).unwrap()
    }

    fn demo_ping() -> serde_json::Value {
        json!({
            "demo": {
                "ping": {
                    "displayName": "Ping",
                    "description": "Check connectivity",
                    "scopes": ["demo.read"],
                    "tags": ["read"],
                    "parameters": {
                        "type": "object",
                        "required": ["id"],
                        "properties": { "id": { "type": "string" } }
                    }
                }
            }
        })
    }

    #[test]
    fn test_valid_registry_passes() {
        let (actions, result) = validate_registry(&registry_from(demo_ping()));
        assert!(result.is_ok(), "unexpected errors: {:?}", result.errors);
        assert_eq!(actions.len(), 1);

        let action = &actions[0];
        assert_eq!(action.provider, "demo");
        assert_eq!(action.action, "ping");
        assert_eq!(action.prefix, "DemoPing");
        assert_eq!(action.fn_stem, "demo_ping");
        assert_eq!(action.action_tags, vec![ActionTag::Read]);
        assert!(action.parameters.is_some());
        assert!(action.output.is_none());
    }

    #[test]
    fn test_invalid_action_tag_rejected() {
        let (_, result) = validate_registry(&registry_from(json!({
            "demo": {
                "ping": {
                    "displayName": "Ping",
                    "description": "Check connectivity",
                    "scopes": [],
                    "tags": ["read", "destructive"]
                }
            }
        })));
        assert!(result.has_errors());
        let rendered = result.errors[0].to_string();
        assert!(rendered.starts_with("[E010]"));
        assert!(rendered.contains("destructive"));
        assert!(rendered.contains("read, write"));
    }

    #[test]
    fn test_invalid_parameter_shape_reports_violations() {
        let (_, result) = validate_registry(&registry_from(json!({
            "demo": {
                "ping": {
                    "displayName": "Ping",
                    "description": "Check connectivity",
                    "scopes": [],
                    "parameters": {
                        "type": "object",
                        "required": ["ghost"],
                        "properties": {}
                    }
                }
            }
        })));
        assert_eq!(result.errors.len(), 1);
        match &result.errors[0] {
            ValidationError::InvalidShape {
                section,
                violations,
                ..
            } => {
                assert_eq!(*section, ShapeSection::Parameters);
                assert_eq!(violations.len(), 1);
            }
            other => panic!("unexpected error: {:?}", other),
        }
        let rendered = result.errors[0].to_string();
        assert!(rendered.contains("[E020]"));
        assert!(rendered.contains("ghost"));
    }

    #[test]
    fn test_empty_identifiers_rejected() {
        let (_, result) = validate_registry(&registry_from(json!({
            "": {
                "ping": {
                    "displayName": "P", "description": "", "scopes": []
                }
            },
            "demo": {
                "": {
                    "displayName": "P", "description": "", "scopes": []
                }
            }
        })));
        assert_eq!(result.errors.len(), 2);
        assert!(matches!(result.errors[0], ValidationError::EmptyProviderId));
        assert!(matches!(
            result.errors[1],
            ValidationError::EmptyActionId { .. }
        ));
    }

    #[test]
    fn test_prefix_collision_detected() {
        // "shop-api/get-order" and "shop/api-get-order" both derive
        // ShopApiGetOrder.
        let (_, result) = validate_registry(&registry_from(json!({
            "shop-api": {
                "get-order": { "displayName": "A", "description": "", "scopes": [], "tags": ["read"] }
            },
            "shop": {
                "api-get-order": { "displayName": "B", "description": "", "scopes": [], "tags": ["read"] }
            }
        })));
        assert_eq!(result.errors.len(), 1);
        match &result.errors[0] {
            ValidationError::SymbolCollision { symbol, first, second } => {
                assert_eq!(symbol, "ShopApiGetOrder");
                assert_eq!(first, &("shop-api".to_string(), "get-order".to_string()));
                assert_eq!(second, &("shop".to_string(), "api-get-order".to_string()));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_fn_stem_collision_detected() {
        // "AB" and "Ab" keep distinct PascalCase prefixes (ABGo vs AbGo) but
        // flatten to the same snake_case stem ab_go, which would duplicate
        // every generated function symbol.
        let (actions, result) = validate_registry(&registry_from(json!({
            "AB": {
                "go": { "displayName": "A", "description": "", "scopes": [], "tags": ["read"] }
            },
            "Ab": {
                "go": { "displayName": "B", "description": "", "scopes": [], "tags": ["read"] }
            }
        })));
        assert_eq!(actions.len(), 1);
        assert_eq!(result.errors.len(), 1);
        match &result.errors[0] {
            ValidationError::SymbolCollision { symbol, first, second } => {
                assert_eq!(symbol, "ab_go");
                assert_eq!(first, &("AB".to_string(), "go".to_string()));
                assert_eq!(second, &("Ab".to_string(), "go".to_string()));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_same_action_name_across_providers_is_fine() {
        let (actions, result) = validate_registry(&registry_from(json!({
            "alpha": {
                "list": { "displayName": "L", "description": "", "scopes": [], "tags": ["read"] }
            },
            "beta": {
                "list": { "displayName": "L", "description": "", "scopes": [], "tags": ["read"] }
            }
        })));
        assert!(result.is_ok());
        assert_eq!(actions.len(), 2);
        assert_eq!(actions[0].prefix, "AlphaList");
        assert_eq!(actions[1].prefix, "BetaList");
    }

    #[test]
    fn test_warnings_do_not_block() {
        let (actions, result) = validate_registry(&registry_from(json!({
            "demo": {
                "noop": { "displayName": "N", "description": "", "scopes": [] }
            }
        })));
        assert!(result.is_ok());
        assert!(result.has_warnings());
        assert_eq!(actions.len(), 1);
        let rendered: Vec<String> = result.warnings.iter().map(|w| w.to_string()).collect();
        assert!(rendered.iter().any(|w| w.starts_with("[W001]")));
        assert!(rendered.iter().any(|w| w.starts_with("[W002]")));
    }

    #[test]
    fn test_all_errors_collected_in_one_run() {
        let (_, result) = validate_registry(&registry_from(json!({
            "demo": {
                "bad-tags": {
                    "displayName": "A", "description": "", "scopes": [], "tags": ["nope"]
                },
                "bad-shape": {
                    "displayName": "B", "description": "", "scopes": [], "tags": ["read"],
                    "output": { "type": "object", "required": ["x"], "properties": {} }
                }
            }
        })));
        assert_eq!(result.errors.len(), 2);
    }
}
