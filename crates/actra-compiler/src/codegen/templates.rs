// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Template module emission.
//!
//! Emits one `ActionTemplate` constructor per action plus the lookup helpers
//! the dispatch layer consumes (`all_templates`, `find_template`). Every
//! record is validated against `ActionTemplate::record_schema()` before its
//! constructor is emitted, so malformed registry entries cannot silently
//! produce malformed metadata.

use proc_macro2::{Ident, Span, TokenStream};
use quote::quote;

use actra_registry::template::ActionTemplate;

use crate::codegen::{CodegenError, json_to_tokens};
use crate::validation::ValidatedAction;

/// Emit the complete template module for all validated actions.
///
/// # Errors
///
/// Returns `CodegenError::InvalidTemplate` when an assembled record fails
/// the fixed record schema.
pub fn emit_templates_module(actions: &[ValidatedAction]) -> Result<TokenStream, CodegenError> {
    let mut constructors = Vec::with_capacity(actions.len());
    let mut constructor_names = Vec::with_capacity(actions.len());

    for action in actions {
        let (tokens, fn_name) = emit_template_constructor(action)?;
        constructors.push(tokens);
        constructor_names.push(fn_name);
    }

    Ok(quote! {
        use actra_registry::template::ActionTemplate;

        #(#constructors)*

        #[doc = "Every action template, in registry declaration order."]
        pub fn all_templates() -> Vec<ActionTemplate> {
            vec![#(#constructor_names()),*]
        }

        #[doc = "Look up the template for a (provider, action) pair."]
        pub fn find_template(provider: &str, name: &str) -> Option<ActionTemplate> {
            all_templates()
                .into_iter()
                .find(|template| template.provider == provider && template.name == name)
        }
    })
}

/// Build, check, and emit the template constructor for one action.
fn emit_template_constructor(
    action: &ValidatedAction,
) -> Result<(TokenStream, Ident), CodegenError> {
    let template = ActionTemplate {
        provider: action.provider.clone(),
        name: action.action.clone(),
        display_name: action.definition.display_name.clone(),
        description: action.definition.description.clone(),
        scopes: action.definition.scopes.clone(),
        tags: action.definition.tags.clone(),
        parameters: action.definition.parameters.clone(),
        output: action.definition.output.clone(),
    };

    // The record must satisfy its fixed schema before anything is emitted.
    let serialized = serde_json::to_value(&template).map_err(|e| CodegenError::InvalidTemplate {
        provider: action.provider.clone(),
        action: action.action.clone(),
        violations: vec![actra_registry::schema::FieldError {
            path: "$".to_string(),
            message: format!("template does not serialize: {}", e),
        }],
    })?;
    if let Err(violations) = ActionTemplate::record_schema().validate(&serialized) {
        return Err(CodegenError::InvalidTemplate {
            provider: action.provider.clone(),
            action: action.action.clone(),
            violations,
        });
    }

    let fn_name = Ident::new(
        &format!("{}_template", action.fn_stem),
        Span::call_site(),
    );
    let doc = format!("Action template for '{}/{}'.", action.provider, action.action);

    let provider = &template.provider;
    let name = &template.name;
    let display_name = &template.display_name;
    let description = &template.description;
    let scopes = &template.scopes;
    let tags = &template.tags;
    let parameters = option_value_tokens(template.parameters.as_ref());
    let output = option_value_tokens(template.output.as_ref());

    let tokens = quote! {
        #[doc = #doc]
        pub fn #fn_name() -> ActionTemplate {
            ActionTemplate {
                provider: #provider.to_string(),
                name: #name.to_string(),
                display_name: #display_name.to_string(),
                description: #description.to_string(),
                scopes: vec![#(#scopes.to_string()),*],
                tags: vec![#(#tags.to_string()),*],
                parameters: #parameters,
                output: #output,
            }
        }
    };

    Ok((tokens, fn_name))
}

fn option_value_tokens(value: Option<&serde_json::Value>) -> TokenStream {
    match value {
        Some(value) => {
            let value_tokens = json_to_tokens(value);
            quote! { Some(#value_tokens) }
        }
        None => quote! { None },
    }
}
