// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Fixed preamble of the schemas/bindings module.
//!
//! Emitted once per generation run, before any per-action bindings:
//! - the shared credentials record (registry-independent, optional
//!   string-valued authentication fields)
//! - the tag vocabulary constants and enumeration re-exports
//! - the generic function-shape declarations (`ActionFuture`, `ActionFn`)
//! - the two registry enumerations (providers, distinct action names)

use proc_macro2::{Ident, Span, TokenStream};
use quote::quote;

use actra_registry::tags;

use crate::enumerate::{EnumEntry, Enumerations};

/// Emit the full preamble for one generation run.
pub fn emit_preamble(enums: &Enumerations) -> TokenStream {
    let imports = emit_imports();
    let credentials = emit_credentials();
    let vocabularies = emit_tag_vocabularies();
    let function_shape = emit_function_shape();
    let provider_enum = emit_enumeration("Provider", "PROVIDERS", "provider", &enums.providers);
    let action_enum = emit_enumeration("ActionName", "ACTION_NAMES", "action name", &enums.actions);

    quote! {
        #imports
        #credentials
        #vocabularies
        #function_shape
        #provider_enum
        #action_enum
    }
}

fn emit_imports() -> TokenStream {
    quote! {
        use serde::{Deserialize, Serialize};
        use actra_registry::schema::{ObjectSchema, Schema};
    }
}

/// The shared credentials shape composed into every function binding.
fn emit_credentials() -> TokenStream {
    quote! {
        #[doc = "Shared credentials record passed to every action implementation."]
        #[derive(Debug, Clone, Default, Serialize, Deserialize)]
        #[serde(rename_all = "camelCase")]
        pub struct Credentials {
            #[serde(default, skip_serializing_if = "Option::is_none")]
            pub token: Option<String>,
            #[serde(default, skip_serializing_if = "Option::is_none")]
            pub api_key: Option<String>,
            #[serde(default, skip_serializing_if = "Option::is_none")]
            pub base_url: Option<String>,
            #[serde(default, skip_serializing_if = "Option::is_none")]
            pub username: Option<String>,
            #[serde(default, skip_serializing_if = "Option::is_none")]
            pub password: Option<String>,
            #[serde(default, skip_serializing_if = "Option::is_none")]
            pub tenant_id: Option<String>,
            #[serde(default, skip_serializing_if = "Option::is_none")]
            pub client_id: Option<String>,
            #[serde(default, skip_serializing_if = "Option::is_none")]
            pub client_secret: Option<String>,
        }
    }
}

fn emit_tag_vocabularies() -> TokenStream {
    let action_tags = tags::action_tag_names();
    let parameter_tags = tags::parameter_tag_names();
    quote! {
        pub use actra_registry::tags::{ActionTag, ParameterTag};

        #[doc = "The closed action tag vocabulary."]
        pub const ACTION_TAGS: &[&str] = &[#(#action_tags),*];

        #[doc = "The closed parameter tag vocabulary."]
        pub const PARAMETER_TAGS: &[&str] = &[#(#parameter_tags),*];
    }
}

fn emit_function_shape() -> TokenStream {
    quote! {
        #[doc = "Boxed future returned by every action implementation."]
        pub type ActionFuture<O> =
            std::pin::Pin<Box<dyn std::future::Future<Output = Result<O, String>> + Send>>;

        #[doc = "The generic callable action shape: (parameters, credentials) -> output."]
        pub type ActionFn<P, O> = fn(P, Credentials) -> ActionFuture<O>;
    }
}

/// Emit one derived enumeration: the enum, its `as_str`, and the `ALL` array.
/// `noun` is the human-readable name used in the generated doc comments.
fn emit_enumeration(
    enum_name: &str,
    all_name: &str,
    noun: &str,
    entries: &[EnumEntry],
) -> TokenStream {
    let enum_ident = ident(enum_name);
    let all_ident = ident(all_name);
    let variants: Vec<Ident> = entries.iter().map(|e| ident(&e.variant)).collect();
    let values: Vec<&str> = entries.iter().map(|e| e.value.as_str()).collect();
    let enum_doc = format!("Every {} identifier in the registry.", noun);
    let all_doc = format!("All `{}` members, in registry declaration order.", enum_name);

    quote! {
        #[doc = #enum_doc]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum #enum_ident {
            #(#variants,)*
        }

        impl #enum_ident {
            #[doc = "The normalized identifier string."]
            pub fn as_str(&self) -> &'static str {
                match self {
                    #(#enum_ident::#variants => #values,)*
                }
            }
        }

        #[doc = #all_doc]
        pub const #all_ident: &[#enum_ident] = &[#(#enum_ident::#variants),*];
    }
}

fn ident(name: &str) -> Ident {
    Ident::new(name, Span::call_site())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enumerate::enumerate_registry;
    use actra_registry::types::Registry;
    use serde_json::json;

    fn enums() -> Enumerations {
        let registry: Registry = serde_json::from_value(json!({
            "demo": {
                "ping": { "displayName": "P", "description": "", "scopes": [] }
            },
            "shop-api": {
                "get-order": { "displayName": "G", "description": "", "scopes": [] },
                "ping": { "displayName": "P", "description": "", "scopes": [] }
            }
        }))
        .unwrap();
        enumerate_registry(&registry)
    }

    #[test]
    fn test_credentials_struct_emitted() {
        let code = emit_preamble(&enums()).to_string();
        assert!(code.contains("pub struct Credentials"));
        assert!(code.contains("pub token : Option < String >"));
        assert!(code.contains("pub client_secret : Option < String >"));
    }

    #[test]
    fn test_tag_vocabulary_constants() {
        let code = emit_preamble(&enums()).to_string();
        assert!(code.contains("pub const ACTION_TAGS : & [& str] = & [\"read\" , \"write\"]"));
        assert!(
            code.contains("pub const PARAMETER_TAGS : & [& str] = & [\"predefined\" , \"secret\"]")
        );
        assert!(code.contains("pub use actra_registry :: tags :: { ActionTag , ParameterTag }"));
    }

    #[test]
    fn test_function_shape_aliases() {
        let code = emit_preamble(&enums()).to_string();
        assert!(code.contains("pub type ActionFuture < O >"));
        assert!(code.contains("pub type ActionFn < P , O > = fn (P , Credentials) -> ActionFuture < O >"));
    }

    #[test]
    fn test_provider_enumeration() {
        let code = emit_preamble(&enums()).to_string();
        assert!(code.contains("pub enum Provider"));
        assert!(code.contains("Demo"));
        assert!(code.contains("ShopApi"));
        assert!(code.contains("\"SHOP_API\""));
        assert!(code.contains("pub const PROVIDERS"));
    }

    #[test]
    fn test_action_enumeration_deduplicated() {
        let code = emit_preamble(&enums()).to_string();
        assert!(code.contains("pub enum ActionName"));
        assert!(code.contains("GetOrder"));
        // "ping" appears under two providers but yields one variant.
        assert_eq!(code.matches("\"PING\"").count(), 1);
    }

    #[test]
    fn test_enumeration_docs_read_naturally() {
        let code = emit_preamble(&enums()).to_string();
        assert!(code.contains("Every provider identifier in the registry."));
        assert!(code.contains("Every action name identifier in the registry."));
    }
}
