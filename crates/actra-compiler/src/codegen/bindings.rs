// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Per-action type binding emission.
//!
//! For each validated action this emits, in order: the parameter binding
//! (`{Prefix}Params`), its schema function, the output binding
//! (`{Prefix}Output`), its schema function, and the function binding
//! (`{Prefix}Function`) instantiating the generic `ActionFn` shape with the
//! two preceding bindings. The three named bindings always travel together
//! under the action's derived prefix.

use proc_macro2::{Ident, Span, TokenStream};
use quote::quote;

use crate::codegen::CodegenError;
use crate::codegen::schema_expr::SchemaExpr;
use crate::idents::field_ident;
use crate::validation::{ShapeSection, ValidatedAction};

/// Emit all bindings for one action.
///
/// # Errors
///
/// Returns `CodegenError::Untranslatable` when a declared shape construct
/// cannot be represented as a runtime schema.
pub fn emit_action_bindings(action: &ValidatedAction) -> Result<TokenStream, CodegenError> {
    let params_expr = SchemaExpr::for_parameters(action.parameters.as_ref())
        .map_err(|e| untranslatable(action, ShapeSection::Parameters, e))?;
    let output_expr = SchemaExpr::for_output(action.output.as_ref())
        .map_err(|e| untranslatable(action, ShapeSection::Output, e))?;

    let params_ident = ident(&format!("{}Params", action.prefix));
    let output_ident = ident(&format!("{}Output", action.prefix));
    let function_ident = ident(&format!("{}Function", action.prefix));
    let params_schema_fn = ident(&format!("{}_params_schema", action.fn_stem));
    let output_schema_fn = ident(&format!("{}_output_schema", action.fn_stem));

    let params_binding = emit_record_binding(
        &params_ident,
        &params_expr,
        &format!("Parameters for '{}/{}'.", action.provider, action.action),
    );
    let output_binding = emit_record_binding(
        &output_ident,
        &output_expr,
        &format!("Output of '{}/{}'.", action.provider, action.action),
    );

    let params_schema_tokens = params_expr.to_tokens();
    let output_schema_tokens = output_expr.to_tokens();
    let params_schema_doc = format!(
        "Runtime parameter schema for '{}/{}'.",
        action.provider, action.action
    );
    let output_schema_doc = format!(
        "Runtime output schema for '{}/{}'.",
        action.provider, action.action
    );
    let function_doc = format!(
        "Callable contract for '{}/{}': (parameters, credentials) -> output.",
        action.provider, action.action
    );

    Ok(quote! {
        #params_binding

        #[doc = #params_schema_doc]
        pub fn #params_schema_fn() -> Schema {
            #params_schema_tokens
        }

        #output_binding

        #[doc = #output_schema_doc]
        pub fn #output_schema_fn() -> Schema {
            #output_schema_tokens
        }

        #[doc = #function_doc]
        pub type #function_ident = ActionFn<#params_ident, #output_ident>;
    })
}

/// Emit the named Rust binding for a top-level schema expression: a struct
/// for closed objects, a map alias for catch-all objects, a unit alias for
/// the null output.
fn emit_record_binding(name: &Ident, expr: &SchemaExpr, doc: &str) -> TokenStream {
    match expr {
        SchemaExpr::Null => quote! {
            #[doc = #doc]
            pub type #name = ();
        },
        SchemaExpr::Object {
            required,
            properties,
            additional,
        } => {
            if *additional && properties.is_empty() {
                return quote! {
                    #[doc = #doc]
                    pub type #name = serde_json::Map<String, serde_json::Value>;
                };
            }
            let fields = properties.iter().map(|(property, schema)| {
                emit_field(property, schema, required.iter().any(|r| r == property))
            });
            let deny = if *additional {
                quote! {}
            } else {
                quote! { #[serde(deny_unknown_fields)] }
            };
            quote! {
                #[doc = #doc]
                #[derive(Debug, Clone, Serialize, Deserialize)]
                #deny
                pub struct #name {
                    #(#fields)*
                }
            }
        }
        // Non-object top levels only arise for outputs; bind the raw value.
        _ => quote! {
            #[doc = #doc]
            pub type #name = serde_json::Value;
        },
    }
}

fn emit_field(property: &str, schema: &SchemaExpr, required: bool) -> TokenStream {
    let name = field_ident(property);
    let field = ident(&name);
    let rename = if name == property {
        quote! {}
    } else {
        quote! { #[serde(rename = #property)] }
    };
    let ty = rust_type(schema);
    if required {
        quote! {
            #rename
            pub #field: #ty,
        }
    } else {
        quote! {
            #rename
            #[serde(default, skip_serializing_if = "Option::is_none")]
            pub #field: Option<#ty>,
        }
    }
}

/// The statically-checkable Rust type for a schema expression.
fn rust_type(expr: &SchemaExpr) -> TokenStream {
    match expr {
        SchemaExpr::String => quote! { String },
        SchemaExpr::Integer => quote! { i64 },
        SchemaExpr::Number => quote! { f64 },
        SchemaExpr::Boolean => quote! { bool },
        SchemaExpr::Null => quote! { () },
        SchemaExpr::Any => quote! { serde_json::Value },
        SchemaExpr::Enum(values) => {
            if values.iter().all(|v| v.is_string()) {
                quote! { String }
            } else {
                quote! { serde_json::Value }
            }
        }
        SchemaExpr::Array(item) => {
            let item_ty = rust_type(item);
            quote! { Vec<#item_ty> }
        }
        // Nested objects stay dynamic; the runtime schema still checks their
        // inner structure field by field.
        SchemaExpr::Object { .. } => quote! { serde_json::Map<String, serde_json::Value> },
        SchemaExpr::OneOf(_) => quote! { serde_json::Value },
    }
}

fn ident(name: &str) -> Ident {
    Ident::new(name, Span::call_site())
}

fn untranslatable(
    action: &ValidatedAction,
    section: ShapeSection,
    error: crate::codegen::schema_expr::TranslateError,
) -> CodegenError {
    CodegenError::Untranslatable {
        provider: action.provider.clone(),
        action: action.action.clone(),
        section,
        path: error.path,
        reason: error.reason,
    }
}
