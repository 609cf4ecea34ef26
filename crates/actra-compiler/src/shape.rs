// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Structural parsing of declared parameter/output shapes.
//!
//! An action's `parameters` and `output` are JSON-Schema-like objects. This
//! module is the strict structural checker: it parses the raw JSON into a
//! typed [`ObjectShape`], rejecting undeclared keywords, unknown types,
//! `required` entries without a matching property, and parameter tags
//! outside the closed vocabulary. All violations for one shape are collected
//! and reported together.

use actra_registry::tags::{self, ParameterTag};
use indexmap::IndexMap;
use serde_json::Value;
use std::collections::HashMap;
use std::str::FromStr;

use crate::idents::field_ident;

/// Schema keywords the structural checker accepts. Anything else is a violation.
const ALLOWED_KEYWORDS: &[&str] = &[
    "type",
    "description",
    "required",
    "properties",
    "items",
    "enum",
    "oneOf",
    "tags",
    "additionalProperties",
    "default",
    "example",
];

/// The `type` keyword values the checker accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyType {
    /// `"string"`
    String,
    /// `"integer"`
    Integer,
    /// `"number"`
    Number,
    /// `"boolean"`
    Boolean,
    /// `"array"`
    Array,
    /// `"object"`
    Object,
}

impl PropertyType {
    /// Parse a `type` keyword value.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "string" => Some(PropertyType::String),
            "integer" => Some(PropertyType::Integer),
            "number" => Some(PropertyType::Number),
            "boolean" => Some(PropertyType::Boolean),
            "array" => Some(PropertyType::Array),
            "object" => Some(PropertyType::Object),
            _ => None,
        }
    }

    /// The keyword string form.
    pub fn as_str(&self) -> &'static str {
        match self {
            PropertyType::String => "string",
            PropertyType::Integer => "integer",
            PropertyType::Number => "number",
            PropertyType::Boolean => "boolean",
            PropertyType::Array => "array",
            PropertyType::Object => "object",
        }
    }
}

/// A validated top-level parameter or output shape (always an object).
#[derive(Debug, Clone, Default)]
pub struct ObjectShape {
    /// Property names that callers must supply, in declaration order.
    pub required: Vec<String>,
    /// Declared properties in declaration order.
    pub properties: IndexMap<String, PropertyShape>,
    /// The `additionalProperties` keyword, if declared.
    pub additional: Option<bool>,
}

/// One property descriptor inside a shape.
#[derive(Debug, Clone, Default)]
pub struct PropertyShape {
    /// The declared `type`, if any (`enum`/`oneOf` nodes may omit it).
    pub ty: Option<PropertyType>,
    /// Free-text description.
    pub description: Option<String>,
    /// `required` of a nested object node.
    pub required: Vec<String>,
    /// `properties` of a nested object node.
    pub properties: IndexMap<String, PropertyShape>,
    /// `items` of an array node.
    pub items: Option<Box<PropertyShape>>,
    /// `enum` literal values.
    pub enum_values: Option<Vec<Value>>,
    /// `oneOf` variant shapes.
    pub one_of: Option<Vec<PropertyShape>>,
    /// Parameter tags, already checked against the closed vocabulary.
    pub tags: Vec<ParameterTag>,
    /// The `additionalProperties` keyword, if declared.
    pub additional: Option<bool>,
    /// Declared default value, carried through to the emitted template.
    pub default: Option<Value>,
    /// Declared example value, carried through to the emitted template.
    pub example: Option<Value>,
}

impl PropertyShape {
    /// True for an object node that declares no properties and does not
    /// forbid additional ones: an open-ended record of arbitrary pairs.
    pub fn is_open_record(&self) -> bool {
        self.ty == Some(PropertyType::Object)
            && self.properties.is_empty()
            && self.additional != Some(false)
    }
}

/// A single structural violation found while parsing a shape.
#[derive(Debug, Clone, PartialEq)]
pub enum ShapeViolation {
    /// A schema node is not a JSON object.
    NotAnObject {
        /// Path of the offending node.
        path: String,
        /// JSON type actually found.
        found: String,
    },
    /// A node declares none of `type`, `enum`, `oneOf`.
    MissingType {
        /// Path of the offending node.
        path: String,
    },
    /// The `type` keyword value is not recognized.
    UnknownType {
        /// Path of the offending node.
        path: String,
        /// The declared value.
        found: String,
    },
    /// The top-level shape is not `type: object`.
    TopLevelNotObject {
        /// The declared top-level type.
        found: String,
    },
    /// A keyword outside the accepted set.
    UnknownKeyword {
        /// Path of the offending node.
        path: String,
        /// The undeclared keyword.
        keyword: String,
    },
    /// A keyword has the wrong JSON shape (e.g. `required` not a string array).
    MalformedKeyword {
        /// Path of the offending node.
        path: String,
        /// The keyword in question.
        keyword: String,
        /// What went wrong.
        reason: String,
    },
    /// A `required` entry has no matching `properties` key.
    RequiredFieldMissing {
        /// Path of the object node.
        path: String,
        /// The `required` entry without a property.
        field: String,
    },
    /// A `tags` array contains values outside the parameter tag vocabulary.
    InvalidParameterTags {
        /// Path of the offending node.
        path: String,
        /// The unrecognized values.
        invalid: Vec<String>,
    },
    /// Two top-level properties map onto the same generated field name.
    PropertyNameClash {
        /// Path of the object node.
        path: String,
        /// The property declared first.
        first: String,
        /// The property that clashes with it.
        second: String,
        /// The field name both derive.
        ident: String,
    },
}

impl std::fmt::Display for ShapeViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ShapeViolation::NotAnObject { path, found } => {
                write!(f, "{}: schema node must be an object, got {}", path, found)
            }
            ShapeViolation::MissingType { path } => {
                write!(f, "{}: schema node declares no 'type', 'enum', or 'oneOf'", path)
            }
            ShapeViolation::UnknownType { path, found } => {
                write!(
                    f,
                    "{}: unknown type '{}'. Accepted types: string, integer, number, boolean, array, object",
                    path, found
                )
            }
            ShapeViolation::TopLevelNotObject { found } => {
                write!(f, "$: top-level shape must have type 'object', got '{}'", found)
            }
            ShapeViolation::UnknownKeyword { path, keyword } => {
                write!(
                    f,
                    "{}: undeclared schema keyword '{}'. Accepted keywords: {}",
                    path,
                    keyword,
                    ALLOWED_KEYWORDS.join(", ")
                )
            }
            ShapeViolation::MalformedKeyword { path, keyword, reason } => {
                write!(f, "{}: malformed '{}': {}", path, keyword, reason)
            }
            ShapeViolation::RequiredFieldMissing { path, field } => {
                write!(
                    f,
                    "{}: required field '{}' has no matching key in properties",
                    path, field
                )
            }
            ShapeViolation::InvalidParameterTags { path, invalid } => {
                write!(
                    f,
                    "{}: invalid parameter tags [{}]. Accepted tags: {}",
                    path,
                    invalid.join(", "),
                    tags::parameter_tag_names().join(", ")
                )
            }
            ShapeViolation::PropertyNameClash {
                path,
                first,
                second,
                ident,
            } => {
                write!(
                    f,
                    "{}: properties '{}' and '{}' both map to the generated field name '{}'",
                    path, first, second, ident
                )
            }
        }
    }
}

/// Parse and structurally validate a declared top-level shape.
///
/// # Errors
///
/// Returns every violation found in the shape, not just the first.
pub fn parse_object_shape(value: &Value) -> Result<ObjectShape, Vec<ShapeViolation>> {
    let mut violations = Vec::new();
    let shape = parse_node(value, "$", &mut violations);

    // Top level must be an object schema. enum/oneOf stand in for `type` on
    // inner nodes but would be silently dropped here, so they are rejected.
    match shape.ty {
        Some(PropertyType::Object) => {}
        Some(other) => violations.push(ShapeViolation::TopLevelNotObject {
            found: other.as_str().to_string(),
        }),
        None => {
            if shape.enum_values.is_some() {
                violations.push(ShapeViolation::TopLevelNotObject {
                    found: "enum".to_string(),
                });
            } else if shape.one_of.is_some() {
                violations.push(ShapeViolation::TopLevelNotObject {
                    found: "oneOf".to_string(),
                });
            }
            // A bare node was already reported as MissingType.
        }
    }

    // Top-level properties become struct fields; distinct properties must
    // not flatten onto the same field name.
    let mut seen_fields: HashMap<String, String> = HashMap::new();
    for name in shape.properties.keys() {
        let ident = field_ident(name);
        match seen_fields.get(&ident) {
            Some(first) => violations.push(ShapeViolation::PropertyNameClash {
                path: "$".to_string(),
                first: first.clone(),
                second: name.clone(),
                ident,
            }),
            None => {
                seen_fields.insert(ident, name.clone());
            }
        }
    }

    if violations.is_empty() {
        Ok(ObjectShape {
            required: shape.required,
            properties: shape.properties,
            additional: shape.additional,
        })
    } else {
        Err(violations)
    }
}

fn parse_node(value: &Value, path: &str, violations: &mut Vec<ShapeViolation>) -> PropertyShape {
    let map = match value {
        Value::Object(map) => map,
        other => {
            violations.push(ShapeViolation::NotAnObject {
                path: path.to_string(),
                found: json_type_name(other).to_string(),
            });
            return PropertyShape::default();
        }
    };

    for keyword in map.keys() {
        if !ALLOWED_KEYWORDS.contains(&keyword.as_str()) {
            violations.push(ShapeViolation::UnknownKeyword {
                path: path.to_string(),
                keyword: keyword.clone(),
            });
        }
    }

    let mut shape = PropertyShape::default();

    match map.get("type") {
        Some(Value::String(ty)) => match PropertyType::parse(ty) {
            Some(parsed) => shape.ty = Some(parsed),
            None => violations.push(ShapeViolation::UnknownType {
                path: path.to_string(),
                found: ty.clone(),
            }),
        },
        Some(other) => violations.push(ShapeViolation::MalformedKeyword {
            path: path.to_string(),
            keyword: "type".to_string(),
            reason: format!("must be a string, got {}", json_type_name(other)),
        }),
        None => {
            if !map.contains_key("enum") && !map.contains_key("oneOf") {
                violations.push(ShapeViolation::MissingType {
                    path: path.to_string(),
                });
            }
        }
    }

    if let Some(description) = map.get("description") {
        match description {
            Value::String(s) => shape.description = Some(s.clone()),
            other => violations.push(ShapeViolation::MalformedKeyword {
                path: path.to_string(),
                keyword: "description".to_string(),
                reason: format!("must be a string, got {}", json_type_name(other)),
            }),
        }
    }

    if let Some(required) = map.get("required") {
        shape.required = parse_string_array(required, path, "required", violations);
    }

    if let Some(properties) = map.get("properties") {
        match properties {
            Value::Object(entries) => {
                for (name, descriptor) in entries {
                    let child_path = format!("{}.properties.{}", path, name);
                    let child = parse_node(descriptor, &child_path, violations);
                    shape.properties.insert(name.clone(), child);
                }
            }
            other => violations.push(ShapeViolation::MalformedKeyword {
                path: path.to_string(),
                keyword: "properties".to_string(),
                reason: format!("must be an object, got {}", json_type_name(other)),
            }),
        }
    }

    if let Some(items) = map.get("items") {
        let items_path = format!("{}.items", path);
        shape.items = Some(Box::new(parse_node(items, &items_path, violations)));
    }

    if let Some(enum_values) = map.get("enum") {
        match enum_values {
            Value::Array(values) => shape.enum_values = Some(values.clone()),
            other => violations.push(ShapeViolation::MalformedKeyword {
                path: path.to_string(),
                keyword: "enum".to_string(),
                reason: format!("must be an array, got {}", json_type_name(other)),
            }),
        }
    }

    if let Some(one_of) = map.get("oneOf") {
        match one_of {
            Value::Array(variants) => {
                let parsed = variants
                    .iter()
                    .enumerate()
                    .map(|(i, variant)| {
                        let variant_path = format!("{}.oneOf[{}]", path, i);
                        parse_node(variant, &variant_path, violations)
                    })
                    .collect();
                shape.one_of = Some(parsed);
            }
            other => violations.push(ShapeViolation::MalformedKeyword {
                path: path.to_string(),
                keyword: "oneOf".to_string(),
                reason: format!("must be an array, got {}", json_type_name(other)),
            }),
        }
    }

    if let Some(tag_values) = map.get("tags") {
        let raw = parse_string_array(tag_values, path, "tags", violations);
        let mut invalid = Vec::new();
        for tag in &raw {
            match ParameterTag::from_str(tag) {
                Ok(parsed) => shape.tags.push(parsed),
                Err(_) => invalid.push(tag.clone()),
            }
        }
        if !invalid.is_empty() {
            violations.push(ShapeViolation::InvalidParameterTags {
                path: path.to_string(),
                invalid,
            });
        }
    }

    if let Some(additional) = map.get("additionalProperties") {
        match additional {
            Value::Bool(flag) => shape.additional = Some(*flag),
            other => violations.push(ShapeViolation::MalformedKeyword {
                path: path.to_string(),
                keyword: "additionalProperties".to_string(),
                reason: format!("must be a boolean, got {}", json_type_name(other)),
            }),
        }
    }

    shape.default = map.get("default").cloned();
    shape.example = map.get("example").cloned();

    // required entries must reference declared properties
    for field in &shape.required {
        if !shape.properties.contains_key(field) {
            violations.push(ShapeViolation::RequiredFieldMissing {
                path: path.to_string(),
                field: field.clone(),
            });
        }
    }

    shape
}

fn parse_string_array(
    value: &Value,
    path: &str,
    keyword: &str,
    violations: &mut Vec<ShapeViolation>,
) -> Vec<String> {
    match value {
        Value::Array(entries) => {
            let mut out = Vec::with_capacity(entries.len());
            for entry in entries {
                match entry {
                    Value::String(s) => out.push(s.clone()),
                    other => {
                        violations.push(ShapeViolation::MalformedKeyword {
                            path: path.to_string(),
                            keyword: keyword.to_string(),
                            reason: format!(
                                "entries must be strings, got {}",
                                json_type_name(other)
                            ),
                        });
                    }
                }
            }
            out
        }
        other => {
            violations.push(ShapeViolation::MalformedKeyword {
                path: path.to_string(),
                keyword: keyword.to_string(),
                reason: format!("must be an array, got {}", json_type_name(other)),
            });
            Vec::new()
        }
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
