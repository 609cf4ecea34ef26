// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Source file assembly: the top-level generation driver.
//!
//! Orchestrates one run: read and parse the registry, validate it as a
//! whole, build both output modules fully in memory, and only then write
//! them to disk. A failure at any step aborts before persistence, so a
//! failed run leaves previously generated files untouched and the two
//! outputs are always consistent with each other.

use sha2::{Digest, Sha256};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use actra_registry::types::Registry;

use crate::codegen::{self, CodegenError, templates};
use crate::enumerate::enumerate_registry;
use crate::validation::validate_registry;

/// Header line prepended to both generated files.
const GENERATED_HEADER: &str = "// @generated by actra-compile. Do not edit by hand.\n\n";

/// Input for one generation run.
#[derive(Debug, Clone)]
pub struct GenerationInput {
    /// Path of the JSON registry file.
    pub registry_path: PathBuf,
    /// Destination of the template module.
    pub templates_out: PathBuf,
    /// Destination of the schemas/bindings module.
    pub schemas_out: PathBuf,
}

/// Result of a successful generation run.
#[derive(Debug, Clone)]
pub struct GenerationReport {
    /// Number of providers in the registry.
    pub provider_count: usize,
    /// Number of actions emitted.
    pub action_count: usize,
    /// Where the template module was written.
    pub templates_path: PathBuf,
    /// Where the schemas/bindings module was written.
    pub schemas_path: PathBuf,
    /// SHA-256 of the template module source.
    pub templates_checksum: String,
    /// SHA-256 of the schemas/bindings module source.
    pub schemas_checksum: String,
}

/// Run the whole pipeline: load, validate, emit, persist.
///
/// # Errors
///
/// Returns `io::ErrorKind::InvalidData` for registry shape, validation, and
/// code generation failures; plain I/O errors for file access. On any error
/// neither output file has been written.
pub fn generate(input: &GenerationInput) -> io::Result<GenerationReport> {
    info!(registry = %input.registry_path.display(), "loading action registry");
    let raw = fs::read_to_string(&input.registry_path)?;
    let registry: Registry = serde_json::from_str(&raw).map_err(|e| {
        io::Error::new(
            io::ErrorKind::InvalidData,
            format!("Registry shape error: {}", e),
        )
    })?;

    let (actions, result) = validate_registry(&registry);
    for warning in &result.warnings {
        warn!("{}", warning);
    }
    if result.has_errors() {
        let rendered: Vec<String> = result.errors.iter().map(ToString::to_string).collect();
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("Registry validation failed:\n{}", rendered.join("\n")),
        ));
    }
    debug!(
        providers = registry.providers.len(),
        actions = actions.len(),
        "registry validated"
    );

    let enums = enumerate_registry(&registry);

    // Build both modules completely before touching the filesystem.
    let templates_module = templates::emit_templates_module(&actions).map_err(codegen_error)?;
    let schemas_module = codegen::emit_schemas_module(&actions, &enums).map_err(codegen_error)?;

    let templates_source = render(templates_module);
    let schemas_source = render(schemas_module);

    write_source(&input.templates_out, &templates_source)?;
    write_source(&input.schemas_out, &schemas_source)?;

    let report = GenerationReport {
        provider_count: registry.providers.len(),
        action_count: actions.len(),
        templates_path: input.templates_out.clone(),
        schemas_path: input.schemas_out.clone(),
        templates_checksum: checksum(&templates_source),
        schemas_checksum: checksum(&schemas_source),
    };
    info!(
        providers = report.provider_count,
        actions = report.action_count,
        templates = %report.templates_path.display(),
        schemas = %report.schemas_path.display(),
        "generation complete"
    );
    Ok(report)
}

fn codegen_error(error: CodegenError) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, error.to_string())
}

fn render(tokens: proc_macro2::TokenStream) -> String {
    format!("{}{}\n", GENERATED_HEADER, tokens)
}

fn write_source(path: &Path, source: &str) -> io::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, source)
}

fn checksum(source: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(source.as_bytes());
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn write_registry(dir: &tempfile::TempDir, value: &serde_json::Value) -> GenerationInput {
        let registry_path = dir.path().join("registry.json");
        fs::write(&registry_path, serde_json::to_string_pretty(value).unwrap()).unwrap();
        GenerationInput {
            registry_path,
            templates_out: dir.path().join("generated/templates.rs"),
            schemas_out: dir.path().join("generated/schemas.rs"),
        }
    }

    fn demo_registry() -> serde_json::Value {
        json!({
            "demo": {
                "ping": {
                    "displayName": "Ping",
                    "description": "Check connectivity",
                    "scopes": ["demo.read"],
                    "tags": ["read"],
                    "parameters": {
                        "type": "object",
                        "required": ["id"],
                        "properties": { "id": { "type": "string" } }
                    }
                }
            }
        })
    }

    #[test]
    fn test_successful_run_writes_both_files() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_registry(&dir, &demo_registry());

        let report = generate(&input).unwrap();
        assert_eq!(report.provider_count, 1);
        assert_eq!(report.action_count, 1);
        assert!(input.templates_out.exists());
        assert!(input.schemas_out.exists());

        let templates = fs::read_to_string(&input.templates_out).unwrap();
        let schemas = fs::read_to_string(&input.schemas_out).unwrap();
        assert!(templates.starts_with(GENERATED_HEADER));
        assert!(templates.contains("demo_ping_template"));
        assert!(schemas.contains("DemoPingParams"));
        assert!(schemas.contains("DemoPingFunction"));
    }

    #[test]
    fn test_validation_failure_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_registry(
            &dir,
            &json!({
                "demo": {
                    "ping": {
                        "displayName": "Ping",
                        "description": "",
                        "scopes": [],
                        "tags": ["mystery"]
                    }
                }
            }),
        );

        let error = generate(&input).unwrap_err();
        assert_eq!(error.kind(), io::ErrorKind::InvalidData);
        assert!(error.to_string().contains("[E010]"));
        assert!(!input.templates_out.exists());
        assert!(!input.schemas_out.exists());
    }

    #[test]
    fn test_malformed_root_shape_fails_before_processing() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_registry(&dir, &json!({ "demo": ["not", "a", "map"] }));

        let error = generate(&input).unwrap_err();
        assert!(error.to_string().contains("Registry shape error"));
        assert!(!input.templates_out.exists());
        assert!(!input.schemas_out.exists());
    }

    #[test]
    fn test_missing_registry_file() {
        let dir = tempfile::tempdir().unwrap();
        let input = GenerationInput {
            registry_path: dir.path().join("absent.json"),
            templates_out: dir.path().join("templates.rs"),
            schemas_out: dir.path().join("schemas.rs"),
        };
        assert!(generate(&input).is_err());
    }

    #[test]
    fn test_idempotent_reruns_are_byte_identical() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_registry(&dir, &demo_registry());

        let first = generate(&input).unwrap();
        let first_templates = fs::read(&input.templates_out).unwrap();
        let first_schemas = fs::read(&input.schemas_out).unwrap();

        let second = generate(&input).unwrap();
        assert_eq!(first.templates_checksum, second.templates_checksum);
        assert_eq!(first.schemas_checksum, second.schemas_checksum);
        assert_eq!(first_templates, fs::read(&input.templates_out).unwrap());
        assert_eq!(first_schemas, fs::read(&input.schemas_out).unwrap());
    }

    #[test]
    fn test_failed_rerun_leaves_previous_outputs() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_registry(&dir, &demo_registry());
        generate(&input).unwrap();
        let before = fs::read_to_string(&input.schemas_out).unwrap();

        // Corrupt the registry and rerun.
        fs::write(&input.registry_path, "{ not json").unwrap();
        assert!(generate(&input).is_err());

        let after = fs::read_to_string(&input.schemas_out).unwrap();
        assert_eq!(before, after);
    }
}
