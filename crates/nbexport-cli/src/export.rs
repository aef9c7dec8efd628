//! Export command implementation for nbexport CLI.
//!
//! Runs the export pipeline once, or again on every change of the notebook.

use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::time::{Duration, Instant};

use nbexport_core::{DuplicatePolicy, ExportConfig, ExportResult, LinkMode, NotebookExport};
use notify_debouncer_mini::notify::{RecursiveMode, Watcher};
use notify_debouncer_mini::{DebounceEventResult, new_debouncer};

use crate::colors;

/// Options collected from the command line.
#[derive(Debug, Clone)]
pub struct ExportOptions {
    pub prefix: String,
    pub package: Option<String>,
    pub output_dir: Option<String>,
    pub working_dir: Option<String>,
    pub tools_version: String,
    pub hardlink: bool,
    pub dedupe: bool,
    pub propagate: bool,
}

impl ExportOptions {
    /// Build the library configuration.
    pub fn to_config(&self) -> anyhow::Result<ExportConfig> {
        let mut config = ExportConfig::default()
            .with_prefix(&self.prefix)
            .with_tools_version(&self.tools_version)
            .with_propagate(self.propagate);

        if let Some(dir) = &self.working_dir {
            config = config.with_working_dir(Path::new(dir).canonicalize()?);
        }
        if let Some(dir) = &self.output_dir {
            let dir = config.resolve(dir);
            config = config.with_output_dir(dir);
        }
        if self.hardlink {
            config = config.with_link_mode(LinkMode::HardLink);
        }
        if self.dedupe {
            config = config.with_duplicate_policy(DuplicatePolicy::FirstWins);
        }

        Ok(config)
    }
}

/// Execute the export command.
pub fn execute(notebook_path: &str, options: &ExportOptions, watch: bool) -> anyhow::Result<()> {
    let config = options.to_config()?;
    let exporter = NotebookExport::with_config(notebook_path, config);
    if !exporter.notebook_path().exists() {
        anyhow::bail!("Notebook not found: {}", notebook_path);
    }

    let package_path = options
        .package
        .as_ref()
        .map(|p| exporter.config().resolve(p))
        .unwrap_or_else(|| exporter.default_package_path());

    println!(
        "\n{}nbexport{} - {}{}{}",
        colors::BOLD,
        colors::RESET,
        colors::CYAN,
        exporter.notebook_path().display(),
        colors::RESET
    );
    println!("{}", "─".repeat(50));

    if !watch {
        return match export_once(&exporter, &package_path) {
            ExportResult::Success => Ok(()),
            ExportResult::Failure { reason } => anyhow::bail!("Export failed: {}", reason),
        };
    }

    export_once(&exporter, &package_path);
    watch_and_export(&exporter, &package_path)
}

/// Run the pipeline once and report the outcome.
fn export_once(exporter: &NotebookExport, package_path: &Path) -> ExportResult {
    let start = Instant::now();

    print!("  → {} ... ", package_path.display());
    colors::flush_stdout();

    let result = exporter.export_to(package_path);
    let elapsed = start.elapsed();

    match &result {
        ExportResult::Success => println!(
            "{}✓{} ({:.2}ms)",
            colors::GREEN,
            colors::RESET,
            elapsed.as_secs_f64() * 1000.0
        ),
        ExportResult::Failure { reason } => {
            println!("{}✗{}", colors::RED, colors::RESET);
            eprintln!("{}Error:{} {}", colors::RED, colors::RESET, reason);
        }
    }

    result
}

/// Watch the notebook file and re-export on every change.
fn watch_and_export(exporter: &NotebookExport, package_path: &Path) -> anyhow::Result<()> {
    let notebook: PathBuf = exporter.notebook_path().canonicalize()?;
    let watch_dir = notebook.parent().unwrap_or(Path::new(".")).to_path_buf();

    let (tx, rx) = mpsc::channel();
    let target = notebook.clone();
    let mut debouncer = new_debouncer(
        Duration::from_millis(200),
        move |result: DebounceEventResult| {
            if let Ok(events) = result
                && events.iter().any(|event| event.path == target)
            {
                let _ = tx.send(());
            }
        },
    )
    .map_err(|e| anyhow::anyhow!("Failed to create file watcher: {}", e))?;

    debouncer
        .watcher()
        .watch(&watch_dir, RecursiveMode::NonRecursive)
        .map_err(|e| anyhow::anyhow!("Failed to watch {}: {}", watch_dir.display(), e))?;

    println!(
        "\n{}Watching {} for changes... (Ctrl+C to stop){}",
        colors::DIM,
        notebook.display(),
        colors::RESET
    );

    while rx.recv().is_ok() {
        if !notebook.exists() {
            eprintln!(
                "\n{}Warning:{} Notebook file removed: {}",
                colors::YELLOW,
                colors::RESET,
                notebook.display()
            );
            continue;
        }
        println!("\n{}File changed, exporting...{}", colors::YELLOW, colors::RESET);
        export_once(exporter, package_path);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options() -> ExportOptions {
        ExportOptions {
            prefix: "P_".to_string(),
            package: None,
            output_dir: None,
            working_dir: None,
            tools_version: "5.0".to_string(),
            hardlink: false,
            dedupe: false,
            propagate: true,
        }
    }

    #[test]
    fn test_to_config_defaults() {
        let config = options().to_config().unwrap();
        assert_eq!(config.prefix, "P_");
        assert_eq!(config.tools_version, "5.0");
        assert_eq!(config.link_mode, LinkMode::Copy);
        assert_eq!(config.duplicate_policy, DuplicatePolicy::Keep);
        assert!(config.output_dir.is_none());
    }

    #[test]
    fn test_to_config_flags() {
        let opts = ExportOptions {
            hardlink: true,
            dedupe: true,
            propagate: false,
            output_dir: Some("out".to_string()),
            ..options()
        };
        let config = opts.to_config().unwrap();
        assert_eq!(config.link_mode, LinkMode::HardLink);
        assert_eq!(config.duplicate_policy, DuplicatePolicy::FirstWins);
        assert!(!config.propagate);
        assert_eq!(config.output_dir(), config.working_dir.join("out"));
    }
}
