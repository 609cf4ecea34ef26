// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Deterministic identifier derivation.
//!
//! Maps registry identifiers (provider ids, action ids, property names) to
//! convention-compliant Rust symbol names. Derivation is pure string work so
//! the same registry always yields the same symbols.

/// PascalCase form of an identifier: segments split on separators and
/// lower-to-upper case boundaries, each capitalized.
pub fn pascal_case(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut start_of_segment = true;
    let mut prev_lower = false;
    for c in s.chars() {
        if c.is_ascii_alphanumeric() {
            if c.is_ascii_uppercase() && prev_lower {
                start_of_segment = true;
            }
            if start_of_segment {
                result.push(c.to_ascii_uppercase());
                start_of_segment = false;
            } else {
                result.push(c);
            }
            prev_lower = c.is_ascii_lowercase() || c.is_ascii_digit();
        } else {
            start_of_segment = true;
            prev_lower = false;
        }
    }
    if result.is_empty() {
        return "_Empty".to_string();
    }
    if result.chars().next().is_some_and(|c| c.is_ascii_digit()) {
        result.insert(0, '_');
    }
    result
}

/// snake_case form of an identifier. Separators become underscores and
/// camelCase boundaries are split.
pub fn snake_case(s: &str) -> String {
    let mut result = String::with_capacity(s.len() + 4);
    let mut prev_lower = false;
    for c in s.chars() {
        if c.is_ascii_alphanumeric() {
            if c.is_ascii_uppercase() && prev_lower {
                result.push('_');
            }
            result.push(c.to_ascii_lowercase());
            prev_lower = c.is_ascii_lowercase() || c.is_ascii_digit();
        } else {
            if !result.is_empty() && !result.ends_with('_') {
                result.push('_');
            }
            prev_lower = false;
        }
    }
    while result.ends_with('_') {
        result.pop();
    }
    if result.is_empty() {
        return "_empty".to_string();
    }
    if result.chars().next().is_some_and(|c| c.is_ascii_digit()) {
        result.insert(0, '_');
    }
    result
}

/// UPPER_SNAKE form used for enumeration string values (`DEMO`, `PING`).
pub fn upper_snake_case(s: &str) -> String {
    snake_case(s).to_ascii_uppercase()
}

/// The shared PascalCase prefix for everything belonging to one action:
/// `{Provider}{ActionName}`.
pub fn derive_prefix(provider: &str, action: &str) -> String {
    format!("{}{}", pascal_case(provider), pascal_case(action))
}

/// The snake_case stem for generated functions belonging to one action.
pub fn derive_fn_stem(provider: &str, action: &str) -> String {
    format!("{}_{}", snake_case(provider), snake_case(action))
}

/// Rust keywords that need escaping when a property name maps onto them.
const RUST_KEYWORDS: &[&str] = &[
    "as", "async", "await", "break", "const", "continue", "crate", "dyn", "else", "enum",
    "extern", "false", "fn", "for", "if", "impl", "in", "let", "loop", "match", "mod", "move",
    "mut", "pub", "ref", "return", "self", "static", "struct", "super", "trait", "true", "type",
    "unsafe", "use", "where", "while",
];

/// snake_case field name for a declared property, suffixed with `_` when it
/// would collide with a Rust keyword (the serde rename keeps the wire name).
pub fn field_ident(property: &str) -> String {
    let snake = snake_case(property);
    if RUST_KEYWORDS.contains(&snake.as_str()) {
        format!("{}_", snake)
    } else {
        snake
    }
}
