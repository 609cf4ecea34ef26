// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Action Registry Type Definitions - Single Source of Truth
//!
//! This crate defines the declarative action registry types used throughout
//! the codebase:
//! - Deserialization of the registry JSON (providers -> actions -> definitions)
//! - The closed tag vocabularies for actions and parameters
//! - The runtime-checked `Schema` values that generated code constructs
//! - The `ActionTemplate` metadata record consumed by the dispatch layer
//!
//! The compiler crate (`actra-compiler`) reads these types at generation time;
//! generated modules link against them at runtime.

// Runtime-checked schema values and field-level validation
pub mod schema;

// Closed tag vocabularies for actions and parameters
pub mod tags;

// Per-action metadata record emitted into the template module
pub mod template;

// Registry file data model
pub mod types;

// Re-export main types
pub use schema::{FieldError, ObjectSchema, Schema};
pub use tags::{ActionTag, ParameterTag};
pub use template::ActionTemplate;
pub use types::{ActionDefinition, Registry};
