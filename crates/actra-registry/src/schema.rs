// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Runtime-checked schemas for action parameters and outputs.
//!
//! Generated code constructs `Schema` values and uses them to validate
//! untyped JSON input at call time, reporting precise per-field errors.
//! Paths use `$` for the root, `$.field` for object members and
//! `$.field[2]` for array elements.

use serde_json::Value;

/// A runtime-checkable schema value.
#[derive(Debug, Clone, PartialEq)]
pub enum Schema {
    /// Any string.
    String,
    /// A whole number (i64/u64 range).
    Integer,
    /// Any JSON number.
    Number,
    /// A boolean.
    Boolean,
    /// JSON null. Used as the "no meaningful return value" output schema.
    Null,
    /// Any JSON value.
    Any,
    /// Exactly one of a fixed set of literal values.
    Enum(Vec<Value>),
    /// An array whose elements all match the inner schema.
    Array(Box<Schema>),
    /// An object with declared properties.
    Object(ObjectSchema),
    /// Exactly one of the variant schemas must match.
    OneOf(Vec<Schema>),
}

/// The object form of [`Schema`].
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectSchema {
    /// Property names that must be present.
    pub required: Vec<String>,
    /// Declared properties, in declaration order.
    pub properties: Vec<(String, Schema)>,
    /// Whether keys outside `properties` are accepted.
    pub additional: bool,
}

/// A single field-level validation failure.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldError {
    /// Dotted path to the offending value, rooted at `$`.
    pub path: String,
    /// Human-readable description of the failure.
    pub message: String,
}

impl std::fmt::Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

impl Schema {
    /// An object schema that accepts no fields at all.
    ///
    /// Used as the parameter schema for actions that declare no parameters.
    pub fn empty_object() -> Schema {
        Schema::Object(ObjectSchema {
            required: Vec::new(),
            properties: Vec::new(),
            additional: false,
        })
    }

    /// An object schema that accepts arbitrary additional properties.
    ///
    /// This is the explicit catch-all form open records are rewritten to.
    pub fn open_object() -> Schema {
        Schema::Object(ObjectSchema {
            required: Vec::new(),
            properties: Vec::new(),
            additional: true,
        })
    }

    /// Validate an untyped value against this schema.
    ///
    /// # Errors
    ///
    /// Returns every field-level violation found, with dotted paths.
    pub fn validate(&self, value: &Value) -> Result<(), Vec<FieldError>> {
        let mut errors = Vec::new();
        self.check(value, "$", &mut errors);
        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }

    fn check(&self, value: &Value, path: &str, errors: &mut Vec<FieldError>) {
        match self {
            Schema::String => {
                if !value.is_string() {
                    errors.push(type_error(path, "string", value));
                }
            }
            Schema::Integer => {
                let ok = matches!(value, Value::Number(n) if n.as_i64().is_some() || n.as_u64().is_some());
                if !ok {
                    errors.push(type_error(path, "integer", value));
                }
            }
            Schema::Number => {
                if !value.is_number() {
                    errors.push(type_error(path, "number", value));
                }
            }
            Schema::Boolean => {
                if !value.is_boolean() {
                    errors.push(type_error(path, "boolean", value));
                }
            }
            Schema::Null => {
                if !value.is_null() {
                    errors.push(type_error(path, "null", value));
                }
            }
            Schema::Any => {}
            Schema::Enum(allowed) => {
                if !allowed.contains(value) {
                    let rendered: Vec<String> = allowed.iter().map(|v| v.to_string()).collect();
                    errors.push(FieldError {
                        path: path.to_string(),
                        message: format!(
                            "value {} is not one of the allowed values: {}",
                            value,
                            rendered.join(", ")
                        ),
                    });
                }
            }
            Schema::Array(item) => match value {
                Value::Array(elements) => {
                    for (i, element) in elements.iter().enumerate() {
                        item.check(element, &format!("{}[{}]", path, i), errors);
                    }
                }
                other => errors.push(type_error(path, "array", other)),
            },
            Schema::Object(object) => object.check(value, path, errors),
            Schema::OneOf(variants) => {
                // Exactly one variant must match; zero and multiple are
                // distinct failures so ambiguous input is never accepted.
                let mut matched = 0usize;
                for variant in variants {
                    let mut scratch = Vec::new();
                    variant.check(value, path, &mut scratch);
                    if scratch.is_empty() {
                        matched += 1;
                    }
                }
                if matched == 0 {
                    errors.push(FieldError {
                        path: path.to_string(),
                        message: format!("value matches none of the {} allowed variants", variants.len()),
                    });
                } else if matched > 1 {
                    errors.push(FieldError {
                        path: path.to_string(),
                        message: format!(
                            "value is ambiguous: matches {} of {} variants, expected exactly one",
                            matched,
                            variants.len()
                        ),
                    });
                }
            }
        }
    }
}

impl ObjectSchema {
    fn check(&self, value: &Value, path: &str, errors: &mut Vec<FieldError>) {
        let map = match value {
            Value::Object(map) => map,
            other => {
                errors.push(type_error(path, "object", other));
                return;
            }
        };

        for name in &self.required {
            if !map.contains_key(name) {
                errors.push(FieldError {
                    path: format!("{}.{}", path, name),
                    message: "required field is missing".to_string(),
                });
            }
        }

        for (name, schema) in &self.properties {
            if let Some(field_value) = map.get(name) {
                schema.check(field_value, &format!("{}.{}", path, name), errors);
            }
        }

        if !self.additional {
            for key in map.keys() {
                if !self.properties.iter().any(|(name, _)| name == key) {
                    errors.push(FieldError {
                        path: format!("{}.{}", path, key),
                        message: "unknown field is not accepted".to_string(),
                    });
                }
            }
        }
    }
}

fn type_error(path: &str, expected: &str, actual: &Value) -> FieldError {
    FieldError {
        path: path.to_string(),
        message: format!("expected {}, got {}", expected, json_type_name(actual)),
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

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object(required: &[&str], properties: Vec<(&str, Schema)>, additional: bool) -> Schema {
        Schema::Object(ObjectSchema {
            required: required.iter().map(|s| s.to_string()).collect(),
            properties: properties
                .into_iter()
                .map(|(name, schema)| (name.to_string(), schema))
                .collect(),
            additional,
        })
    }

    #[test]
    fn test_scalar_types() {
        assert!(Schema::String.validate(&json!("hi")).is_ok());
        assert!(Schema::String.validate(&json!(1)).is_err());
        assert!(Schema::Integer.validate(&json!(42)).is_ok());
        assert!(Schema::Integer.validate(&json!(4.5)).is_err());
        assert!(Schema::Number.validate(&json!(4.5)).is_ok());
        assert!(Schema::Number.validate(&json!("4.5")).is_err());
        assert!(Schema::Boolean.validate(&json!(true)).is_ok());
        assert!(Schema::Null.validate(&json!(null)).is_ok());
        assert!(Schema::Null.validate(&json!(0)).is_err());
    }

    #[test]
    fn test_any_accepts_everything() {
        assert!(Schema::Any.validate(&json!(null)).is_ok());
        assert!(Schema::Any.validate(&json!({"a": [1, 2]})).is_ok());
    }

    #[test]
    fn test_enum_membership() {
        let schema = Schema::Enum(vec![json!("asc"), json!("desc")]);
        assert!(schema.validate(&json!("asc")).is_ok());

        let errors = schema.validate(&json!("up")).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].message.contains("\"asc\""));
        assert!(errors[0].message.contains("\"desc\""));
    }

    #[test]
    fn test_array_element_paths() {
        let schema = Schema::Array(Box::new(Schema::Integer));
        assert!(schema.validate(&json!([1, 2, 3])).is_ok());

        let errors = schema.validate(&json!([1, "two", 3])).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].path, "$[1]");
    }

    #[test]
    fn test_object_required_missing() {
        let schema = object(&["id"], vec![("id", Schema::String)], false);
        let errors = schema.validate(&json!({})).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].path, "$.id");
        assert!(errors[0].message.contains("required"));
    }

    #[test]
    fn test_object_rejects_unknown_fields() {
        let schema = object(&[], vec![("id", Schema::String)], false);
        let errors = schema.validate(&json!({"id": "a", "extra": 1})).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].path, "$.extra");
    }

    #[test]
    fn test_open_object_accepts_anything() {
        let schema = Schema::open_object();
        assert!(schema.validate(&json!({"anything": [1, null]})).is_ok());
        assert!(schema.validate(&json!("not an object")).is_err());
    }

    #[test]
    fn test_empty_object_accepts_no_fields() {
        let schema = Schema::empty_object();
        assert!(schema.validate(&json!({})).is_ok());
        assert!(schema.validate(&json!({"x": 1})).is_err());
    }

    #[test]
    fn test_nested_object_paths() {
        let schema = object(
            &["user"],
            vec![(
                "user",
                object(&["name"], vec![("name", Schema::String)], false),
            )],
            false,
        );
        let errors = schema.validate(&json!({"user": {"name": 7}})).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].path, "$.user.name");
    }

    #[test]
    fn test_one_of_exactly_one_match() {
        let schema = Schema::OneOf(vec![
            object(&["id"], vec![("id", Schema::String)], false),
            object(&["ids"], vec![("ids", Schema::Array(Box::new(Schema::String)))], false),
        ]);
        assert!(schema.validate(&json!({"id": "a"})).is_ok());
        assert!(schema.validate(&json!({"ids": ["a", "b"]})).is_ok());
    }

    #[test]
    fn test_one_of_zero_matches() {
        let schema = Schema::OneOf(vec![Schema::String, Schema::Integer]);
        let errors = schema.validate(&json!(true)).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].message.contains("matches none"));
    }

    #[test]
    fn test_one_of_multiple_matches_is_ambiguous() {
        // Both variants accept the same open object.
        let schema = Schema::OneOf(vec![Schema::open_object(), Schema::Any]);
        let errors = schema.validate(&json!({})).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].message.contains("ambiguous"));
        assert!(errors[0].message.contains("2 of 2"));
    }

    #[test]
    fn test_field_error_display() {
        let error = FieldError {
            path: "$.id".to_string(),
            message: "expected string, got number".to_string(),
        };
        assert_eq!(error.to_string(), "$.id: expected string, got number");
    }

    #[test]
    fn test_multiple_errors_reported_together() {
        let schema = object(
            &["id", "count"],
            vec![("id", Schema::String), ("count", Schema::Integer)],
            false,
        );
        let errors = schema
            .validate(&json!({"id": 1, "stray": true}))
            .unwrap_err();
        // Wrong type for id, missing count, unknown stray.
        assert_eq!(errors.len(), 3);
    }
}
