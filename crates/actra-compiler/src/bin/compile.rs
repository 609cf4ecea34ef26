// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Action schema compiler CLI
//!
//! Compiles the action registry JSON into the two generated source modules.
//!
//! Usage:
//!
//! ```text
//! actra-compile --registry <path> [--templates-out <path>] [--schemas-out <path>]
//! ```
//!
//! Example:
//!
//! ```text
//! actra-compile --registry registry.json --templates-out src/generated/templates.rs
//! ```

use actra_compiler::assemble::{GenerationInput, generate};
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

fn print_usage() {
    eprintln!(
        r#"Usage: actra-compile [OPTIONS]

Compile the action registry JSON into generated source modules.

OPTIONS:
    --registry <path>        Path to the registry JSON file (required)
    --templates-out <path>   Template module destination (default: generated/templates.rs)
    --schemas-out <path>     Schemas/bindings module destination (default: generated/schemas.rs)
    --help                   Show this help message

ENVIRONMENT:
    RUST_LOG                 Log filter for diagnostics (default: warn)

EXAMPLES:
    # Compile into the default generated/ directory
    actra-compile --registry registry.json

    # Compile into a crate's source tree
    actra-compile --registry registry.json \
        --templates-out src/generated/templates.rs \
        --schemas-out src/generated/schemas.rs
"#
    );
}

struct Args {
    registry_path: PathBuf,
    templates_out: PathBuf,
    schemas_out: PathBuf,
}

fn parse_args() -> Result<Args, String> {
    let args: Vec<String> = std::env::args().collect();

    let mut registry_path: Option<PathBuf> = None;
    let mut templates_out = PathBuf::from("generated/templates.rs");
    let mut schemas_out = PathBuf::from("generated/schemas.rs");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                print_usage();
                std::process::exit(0);
            }
            "--registry" => {
                i += 1;
                if i >= args.len() {
                    return Err("--registry requires a path".to_string());
                }
                registry_path = Some(PathBuf::from(&args[i]));
            }
            "--templates-out" => {
                i += 1;
                if i >= args.len() {
                    return Err("--templates-out requires a path".to_string());
                }
                templates_out = PathBuf::from(&args[i]);
            }
            "--schemas-out" => {
                i += 1;
                if i >= args.len() {
                    return Err("--schemas-out requires a path".to_string());
                }
                schemas_out = PathBuf::from(&args[i]);
            }
            arg => {
                return Err(format!("Unknown argument: {}", arg));
            }
        }
        i += 1;
    }

    let registry_path = registry_path.ok_or("--registry is required")?;

    Ok(Args {
        registry_path,
        templates_out,
        schemas_out,
    })
}

fn main() -> ExitCode {
    // Initialize minimal logging (default to warn if RUST_LOG not set)
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()),
        )
        .with_writer(io::stderr)
        .init();

    let args = match parse_args() {
        Ok(args) => args,
        Err(e) => {
            eprintln!("Error: {}", e);
            eprintln!();
            print_usage();
            return ExitCode::FAILURE;
        }
    };

    let input = GenerationInput {
        registry_path: args.registry_path,
        templates_out: args.templates_out,
        schemas_out: args.schemas_out,
    };

    eprintln!("Compiling registry: {}", input.registry_path.display());

    let report = match generate(&input) {
        Ok(report) => report,
        Err(e) => {
            eprintln!("Generation failed: {}", e);
            return ExitCode::FAILURE;
        }
    };

    eprintln!("Generation successful:");
    eprintln!("  Providers: {}", report.provider_count);
    eprintln!("  Actions: {}", report.action_count);
    eprintln!("  Templates checksum: {}", report.templates_checksum);
    eprintln!("  Schemas checksum: {}", report.schemas_checksum);

    // Print output paths to stdout for scripts to capture
    println!("{}", report.templates_path.display());
    println!("{}", report.schemas_path.display());

    ExitCode::SUCCESS
}
