//! Inspect command implementation for nbexport CLI.
//!
//! Shows which cells would be exported without writing anything.

use std::path::Path;

use nbexport_core::{ExportConfig, NotebookExport, dependency};

use crate::colors;

/// Execute the inspect command.
pub fn execute(notebook_path: &str, working_dir: Option<&str>) -> anyhow::Result<()> {
    let mut config = ExportConfig::default();
    if let Some(dir) = working_dir {
        config = config.with_working_dir(Path::new(dir).canonicalize()?);
    }

    let exporter = NotebookExport::with_config(notebook_path, config);
    let classified = exporter.classify()?;
    let dependencies = dependency::extract(&classified.installs, &exporter.config().working_dir);

    println!(
        "\n{}{}{}",
        colors::BOLD,
        exporter.notebook_path().display(),
        colors::RESET
    );
    println!("{}", "─".repeat(50));

    let exported_lines: usize = classified.exports.iter().map(|c| c.lines.len()).sum();
    println!(
        "Export cells:     {} ({} lines)",
        classified.exports.len(),
        exported_lines
    );
    println!("Install cells:    {}", classified.installs.len());

    println!("Executables:      {}", classified.executables.len());
    for exe in &classified.executables {
        println!(
            "  {}{}{} ({} lines)",
            colors::CYAN,
            exe.name,
            colors::RESET,
            exe.lines.len()
        );
    }

    println!("Dependencies:     {}", dependencies.len());
    for dep in &dependencies {
        println!(
            "  {}{}{} {}{}{}",
            colors::CYAN,
            dep.name,
            colors::RESET,
            colors::DIM,
            dep.raw_spec,
            colors::RESET
        );
    }

    Ok(())
}
