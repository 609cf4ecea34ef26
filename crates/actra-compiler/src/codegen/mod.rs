// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Code generation for the two emitted modules.
//!
//! This module generates Rust source using proc-macro2/quote for type-safe
//! construction instead of string templating. Shapes are first translated
//! into a structured schema-expression IR ([`schema_expr::SchemaExpr`]) and
//! rendered to tokens at the very end.

pub mod bindings;
pub mod preamble;
pub mod schema_expr;
pub mod templates;

use proc_macro2::TokenStream;
use quote::quote;

use actra_registry::schema::FieldError;

use crate::validation::ShapeSection;

// ============================================================================
// Codegen Error Types
// ============================================================================

/// Errors that can occur during code generation.
#[derive(Debug, Clone)]
pub enum CodegenError {
    /// A declared shape construct cannot be represented as a runtime schema.
    Untranslatable {
        /// Provider identifier.
        provider: String,
        /// Action identifier.
        action: String,
        /// Which declared shape failed.
        section: ShapeSection,
        /// Path of the offending node inside the shape.
        path: String,
        /// Why translation failed.
        reason: String,
    },
    /// An assembled template record failed its own record schema. Indicates
    /// an inconsistency between the definition and the template it produced.
    InvalidTemplate {
        /// Provider identifier.
        provider: String,
        /// Action identifier.
        action: String,
        /// The field-level failures from the record schema.
        violations: Vec<FieldError>,
    },
}

impl std::fmt::Display for CodegenError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CodegenError::Untranslatable {
                provider,
                action,
                section,
                path,
                reason,
            } => {
                write!(
                    f,
                    "Cannot translate the {} shape of '{}/{}' at {}: {}",
                    section.as_str(),
                    provider,
                    action,
                    path,
                    reason
                )
            }
            CodegenError::InvalidTemplate {
                provider,
                action,
                violations,
            } => {
                writeln!(
                    f,
                    "Template record for '{}/{}' fails its record schema:",
                    provider, action
                )?;
                for (i, violation) in violations.iter().enumerate() {
                    if i > 0 {
                        writeln!(f)?;
                    }
                    write!(f, "  - {}", violation)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for CodegenError {}

/// Emit the complete schemas/bindings module: the fixed preamble followed by
/// the three bindings of every action, in registry iteration order.
///
/// # Errors
///
/// Returns `CodegenError` if any action's shapes cannot be translated.
pub fn emit_schemas_module(
    actions: &[crate::validation::ValidatedAction],
    enums: &crate::enumerate::Enumerations,
) -> Result<TokenStream, CodegenError> {
    let preamble_tokens = preamble::emit_preamble(enums);
    let mut action_tokens = Vec::with_capacity(actions.len());
    for action in actions {
        action_tokens.push(bindings::emit_action_bindings(action)?);
    }
    Ok(quote! {
        #preamble_tokens
        #(#action_tokens)*
    })
}

/// Convert a serde_json::Value to a TokenStream that constructs it.
///
/// Scalars produce inline constructors. Objects and arrays serialize to a
/// JSON string at generation time and parse at runtime, which keeps large
/// embedded shapes to a single line of generated code.
pub fn json_to_tokens(value: &serde_json::Value) -> TokenStream {
    match value {
        serde_json::Value::Null => {
            quote! { serde_json::Value::Null }
        }
        serde_json::Value::Bool(b) => {
            quote! { serde_json::Value::Bool(#b) }
        }
        serde_json::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                quote! { serde_json::Value::Number(serde_json::Number::from(#i)) }
            } else if let Some(u) = n.as_u64() {
                quote! { serde_json::Value::Number(serde_json::Number::from(#u)) }
            } else if let Some(f) = n.as_f64() {
                quote! {
                    serde_json::Value::Number(
                        serde_json::Number::from_f64(#f).unwrap_or_else(|| serde_json::Number::from(0))
                    )
                }
            } else {
                quote! { serde_json::Value::Number(serde_json::Number::from(0)) }
            }
        }
        serde_json::Value::String(s) => {
            quote! { serde_json::Value::String(#s.to_string()) }
        }
        serde_json::Value::Array(_) | serde_json::Value::Object(_) => {
            let json_str = serde_json::to_string(value).unwrap_or_else(|_| "null".to_string());
            quote! {
                serde_json::from_str::<serde_json::Value>(#json_str).unwrap()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_json_to_tokens_scalars() {
        assert!(json_to_tokens(&json!(null)).to_string().contains("Null"));
        assert!(json_to_tokens(&json!(true)).to_string().contains("true"));
        assert!(json_to_tokens(&json!(42)).to_string().contains("42"));
        assert!(json_to_tokens(&json!("hi")).to_string().contains("hi"));
    }

    #[test]
    fn test_json_to_tokens_object_embeds_string() {
        let tokens = json_to_tokens(&json!({"type": "object"}));
        let output = tokens.to_string();
        assert!(output.contains("from_str"));
        assert!(output.contains("object"));
    }

    #[test]
    fn test_codegen_error_display() {
        let error = CodegenError::Untranslatable {
            provider: "demo".to_string(),
            action: "ping".to_string(),
            section: ShapeSection::Parameters,
            path: "$.properties.x".to_string(),
            reason: "empty oneOf".to_string(),
        };
        let rendered = error.to_string();
        assert!(rendered.contains("demo/ping"));
        assert!(rendered.contains("parameters"));
        assert!(rendered.contains("$.properties.x"));
    }
}
