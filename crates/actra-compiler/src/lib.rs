// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Actra Compiler - Action Registry to Generated Source Modules
//!
//! This crate compiles the declarative action registry into two generated
//! Rust modules: per-action template metadata constants, and runtime-checked
//! schemas with statically-checkable type bindings.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Action Schema Compilation Pipeline                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//!
//!     ┌─────────────┐      ┌─────────────┐      ┌─────────────┐
//!     │  Registry   │      │  Validated  │      │  Generated  │
//!     │   (JSON)    │─────▶│   Actions   │─────▶│   Modules   │
//!     │             │      │ (+ shapes)  │      │  (tokens)   │
//!     └─────────────┘      └─────────────┘      └─────────────┘
//!           │                     │                    │
//!           ▼                     ▼                    ▼
//!     ┌─────────────┐      ┌─────────────┐      ┌─────────────┐
//!     │ Shape check │      │ Identifier  │      │ templates.rs│
//!     │ + tag vocab │      │ derivation  │      │ schemas.rs  │
//!     └─────────────┘      └─────────────┘      └─────────────┘
//! ```
//!
//! # Compilation Pipeline
//!
//! 1. **Parse**: Load the registry JSON (providers -> actions -> definitions)
//! 2. **Validate**: Structural shape checks, tag vocabularies, prefix uniqueness
//! 3. **Translate**: Shapes become a structured schema-expression IR
//! 4. **Emit**: Build both modules as token streams
//! 5. **Persist**: Write both files, only after everything succeeded
//!
//! The pipeline is single-pass and fail-fast: any error aborts the run before
//! either file is written, so the generated pair can never be inconsistent.
//!
//! # Usage
//!
//! ```ignore
//! use actra_compiler::assemble::{GenerationInput, generate};
//!
//! let report = generate(&GenerationInput {
//!     registry_path: "registry.json".into(),
//!     templates_out: "generated/templates.rs".into(),
//!     schemas_out: "generated/schemas.rs".into(),
//! })?;
//! println!("{} actions emitted", report.action_count);
//! ```
//!
//! # Modules
//!
//! - [`assemble`]: Generation orchestration and disk I/O
//! - [`codegen`]: Token emission for both generated modules
//! - [`enumerate`]: Provider/action enumeration derivation
//! - [`idents`]: Deterministic identifier derivation
//! - [`shape`]: Structural parsing of declared shapes
//! - [`validation`]: Registry-wide validation

#![deny(missing_docs)]

/// Generation orchestration and disk I/O.
pub mod assemble;

/// Token emission for both generated modules.
pub mod codegen;

/// Provider/action enumeration derivation.
pub mod enumerate;

/// Deterministic identifier derivation.
pub mod idents;

/// Structural parsing of declared shapes.
pub mod shape;

/// Registry-wide validation.
pub mod validation;

// Re-export main types
pub use assemble::{GenerationInput, GenerationReport, generate};
pub use codegen::CodegenError;
pub use enumerate::{EnumEntry, Enumerations, enumerate_registry};
pub use shape::{ObjectShape, PropertyShape, ShapeViolation, parse_object_shape};
pub use validation::{
    ValidatedAction, ValidationError, ValidationResult, ValidationWarning, validate_registry,
};

// Re-export registry types for convenience
pub use actra_registry::{ActionDefinition, ActionTemplate, Registry};
