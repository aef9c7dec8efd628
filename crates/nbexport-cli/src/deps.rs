//! Deps command implementation for nbexport CLI.
//!
//! Lists the dependencies declared in an existing package manifest.

use std::fs;

use nbexport_core::dependencies_from_manifest;

use crate::colors;

/// Execute the deps command.
pub fn execute(manifest_path: &str) -> anyhow::Result<()> {
    let contents = fs::read_to_string(manifest_path)
        .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", manifest_path, e))?;

    let dependencies = dependencies_from_manifest(&contents);
    if dependencies.is_empty() {
        println!("{}No dependencies declared.{}", colors::YELLOW, colors::RESET);
        return Ok(());
    }

    for dep in &dependencies {
        println!("{}{}{}\t{}", colors::GREEN, dep.name, colors::RESET, dep.raw_spec);
    }

    Ok(())
}
