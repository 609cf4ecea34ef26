// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Schema-expression IR for the runtime schema synthesizer.
//!
//! Declared shapes are translated into this small tagged tree, transformed
//! there (open records become explicit catch-all objects, absent shapes get
//! their fixed defaults), and rendered to tokens constructing
//! `actra_registry::schema::Schema` values only at the very end. The emitted
//! tokens assume the generated module imports `Schema` and `ObjectSchema`.

use proc_macro2::TokenStream;
use quote::quote;
use serde_json::Value;

use crate::codegen::json_to_tokens;
use crate::shape::{ObjectShape, PropertyShape, PropertyType};

/// A schema expression, mirroring the runtime `Schema` enum.
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaExpr {
    /// Any string.
    String,
    /// A whole number.
    Integer,
    /// Any JSON number.
    Number,
    /// A boolean.
    Boolean,
    /// JSON null: the "no meaningful return value" schema.
    Null,
    /// Any JSON value.
    Any,
    /// One of a fixed set of literal values.
    Enum(Vec<Value>),
    /// An array of the inner expression.
    Array(Box<SchemaExpr>),
    /// An object with declared properties.
    Object {
        /// Required property names.
        required: Vec<String>,
        /// Declared properties in declaration order.
        properties: Vec<(String, SchemaExpr)>,
        /// Whether undeclared keys are accepted.
        additional: bool,
    },
    /// Exactly one of the variants must match.
    OneOf(Vec<SchemaExpr>),
}

/// A construct the translation cannot represent.
#[derive(Debug, Clone, PartialEq)]
pub struct TranslateError {
    /// Path of the offending node inside the shape.
    pub path: String,
    /// Why it cannot be represented.
    pub reason: String,
}

impl SchemaExpr {
    /// The parameter schema for an action: the declared shape, or the fixed
    /// "accepts no fields" object when the action declares no parameters.
    pub fn for_parameters(shape: Option<&ObjectShape>) -> Result<SchemaExpr, TranslateError> {
        match shape {
            Some(shape) => Self::from_object(shape, "$"),
            None => Ok(SchemaExpr::Object {
                required: Vec::new(),
                properties: Vec::new(),
                additional: false,
            }),
        }
    }

    /// The output schema for an action: the declared shape, or `Null` when
    /// the action returns nothing meaningful.
    pub fn for_output(shape: Option<&ObjectShape>) -> Result<SchemaExpr, TranslateError> {
        match shape {
            Some(shape) => Self::from_object(shape, "$"),
            None => Ok(SchemaExpr::Null),
        }
    }

    fn from_object(shape: &ObjectShape, path: &str) -> Result<SchemaExpr, TranslateError> {
        // Open record rewrite: no declared properties and additionals not
        // forbidden means "arbitrary key/value pairs", emitted as the
        // explicit catch-all object form.
        if shape.properties.is_empty() && shape.additional != Some(false) {
            return Ok(SchemaExpr::Object {
                required: Vec::new(),
                properties: Vec::new(),
                additional: true,
            });
        }

        let mut properties = Vec::with_capacity(shape.properties.len());
        for (name, property) in &shape.properties {
            let child_path = format!("{}.properties.{}", path, name);
            properties.push((name.clone(), Self::from_property(property, &child_path)?));
        }
        Ok(SchemaExpr::Object {
            required: shape.required.clone(),
            properties,
            additional: shape.additional.unwrap_or(false),
        })
    }

    fn from_property(property: &PropertyShape, path: &str) -> Result<SchemaExpr, TranslateError> {
        if let Some(variants) = &property.one_of {
            if property.ty.is_some() {
                return Err(TranslateError {
                    path: path.to_string(),
                    reason: "node declares both 'type' and 'oneOf'".to_string(),
                });
            }
            if variants.is_empty() {
                return Err(TranslateError {
                    path: path.to_string(),
                    reason: "'oneOf' must list at least one variant".to_string(),
                });
            }
            let translated = variants
                .iter()
                .enumerate()
                .map(|(i, variant)| {
                    Self::from_property(variant, &format!("{}.oneOf[{}]", path, i))
                })
                .collect::<Result<Vec<_>, _>>()?;
            return Ok(SchemaExpr::OneOf(translated));
        }

        if let Some(values) = &property.enum_values {
            if values.is_empty() {
                return Err(TranslateError {
                    path: path.to_string(),
                    reason: "'enum' must list at least one value".to_string(),
                });
            }
            return Ok(SchemaExpr::Enum(values.clone()));
        }

        match property.ty {
            Some(PropertyType::String) => Ok(SchemaExpr::String),
            Some(PropertyType::Integer) => Ok(SchemaExpr::Integer),
            Some(PropertyType::Number) => Ok(SchemaExpr::Number),
            Some(PropertyType::Boolean) => Ok(SchemaExpr::Boolean),
            Some(PropertyType::Array) => {
                let item = match &property.items {
                    Some(items) => Self::from_property(items, &format!("{}.items", path))?,
                    None => SchemaExpr::Any,
                };
                Ok(SchemaExpr::Array(Box::new(item)))
            }
            Some(PropertyType::Object) => {
                if property.is_open_record() {
                    return Ok(SchemaExpr::Object {
                        required: Vec::new(),
                        properties: Vec::new(),
                        additional: true,
                    });
                }
                let mut properties = Vec::with_capacity(property.properties.len());
                for (name, child) in &property.properties {
                    let child_path = format!("{}.properties.{}", path, name);
                    properties.push((name.clone(), Self::from_property(child, &child_path)?));
                }
                Ok(SchemaExpr::Object {
                    required: property.required.clone(),
                    properties,
                    additional: property.additional.unwrap_or(false),
                })
            }
            None => Err(TranslateError {
                path: path.to_string(),
                reason: "node has no representable 'type'".to_string(),
            }),
        }
    }

    /// Render to tokens constructing the equivalent runtime `Schema`.
    pub fn to_tokens(&self) -> TokenStream {
        match self {
            SchemaExpr::String => quote! { Schema::String },
            SchemaExpr::Integer => quote! { Schema::Integer },
            SchemaExpr::Number => quote! { Schema::Number },
            SchemaExpr::Boolean => quote! { Schema::Boolean },
            SchemaExpr::Null => quote! { Schema::Null },
            SchemaExpr::Any => quote! { Schema::Any },
            SchemaExpr::Enum(values) => {
                let value_tokens = values.iter().map(json_to_tokens);
                quote! { Schema::Enum(vec![#(#value_tokens),*]) }
            }
            SchemaExpr::Array(item) => {
                let item_tokens = item.to_tokens();
                quote! { Schema::Array(Box::new(#item_tokens)) }
            }
            SchemaExpr::Object {
                required,
                properties,
                additional,
            } => {
                let property_tokens = properties.iter().map(|(name, schema)| {
                    let schema_tokens = schema.to_tokens();
                    quote! { (#name.to_string(), #schema_tokens) }
                });
                quote! {
                    Schema::Object(ObjectSchema {
                        required: vec![#(#required.to_string()),*],
                        properties: vec![#(#property_tokens),*],
                        additional: #additional,
                    })
                }
            }
            SchemaExpr::OneOf(variants) => {
                let variant_tokens = variants.iter().map(|v| v.to_tokens());
                quote! { Schema::OneOf(vec![#(#variant_tokens),*]) }
            }
        }
    }
}
