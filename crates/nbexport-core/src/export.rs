//! The export pipeline.
//!
//! ```text
//! notebook.ipynb ──► cells ──► classify ──┬─► exports ─────────────┐
//!                                         ├─► installs ──► extract ─┼─► render ──► Package.swift
//!                                         └─► executables ─────────┘            Sources/...
//!                                                                        │
//!                    pull local dependency sources ◄─────────────────────┘
//!                                │
//!                    propagate to sibling packages
//! ```
//!
//! Each stage runs only if the previous one succeeded. Nothing is cached:
//! every stage reads the notebook again.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::cells::{self, ClassifiedCells};
use crate::config::ExportConfig;
use crate::dependency::{self, DependencyDescription};
use crate::error::Result;
use crate::manifest::{self, GeneratedPackage, ManifestConfig, SOURCE_EXTENSION};
use crate::notebook;
use crate::propagate;

/// Outcome of an export operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportResult {
    Success,
    Failure { reason: String },
}

impl ExportResult {
    pub fn is_success(&self) -> bool {
        matches!(self, ExportResult::Success)
    }

    /// The failure reason, if any.
    pub fn reason(&self) -> Option<&str> {
        match self {
            ExportResult::Success => None,
            ExportResult::Failure { reason } => Some(reason.as_str()),
        }
    }
}

impl<T> From<Result<T>> for ExportResult {
    fn from(result: Result<T>) -> Self {
        match result {
            Ok(_) => ExportResult::Success,
            Err(e) => ExportResult::Failure {
                reason: e.to_string(),
            },
        }
    }
}

impl fmt::Display for ExportResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportResult::Success => write!(f, "success"),
            ExportResult::Failure { reason } => write!(f, "failure: {}", reason),
        }
    }
}

/// Exports one notebook as a package.
#[derive(Debug, Clone)]
pub struct NotebookExport {
    notebook_path: PathBuf,
    config: ExportConfig,
}

impl NotebookExport {
    /// Create an exporter with the default configuration.
    pub fn new(notebook_path: impl AsRef<Path>) -> Self {
        Self::with_config(notebook_path, ExportConfig::default())
    }

    /// Create an exporter. A relative notebook path resolves against the working directory.
    pub fn with_config(notebook_path: impl AsRef<Path>, config: ExportConfig) -> Self {
        Self {
            notebook_path: config.resolve(notebook_path),
            config,
        }
    }

    pub fn notebook_path(&self) -> &Path {
        &self.notebook_path
    }

    pub fn config(&self) -> &ExportConfig {
        &self.config
    }

    /// Notebook file name without its extension.
    pub fn notebook_stem(&self) -> String {
        self.notebook_path
            .file_stem()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string()
    }

    /// File name of the generated library source, e.g. `01_matmul.swift`.
    pub fn script_name(&self) -> String {
        format!("{}.{}", self.notebook_stem(), SOURCE_EXTENSION)
    }

    /// Default destination: `<output_dir>/<prefix><notebook stem>`.
    pub fn default_package_path(&self) -> PathBuf {
        self.config
            .output_dir()
            .join(format!("{}{}", self.config.prefix, self.notebook_stem()))
    }

    /// Read and classify the notebook's cells.
    pub fn classify(&self) -> Result<ClassifiedCells> {
        let cells = notebook::read_cells(&self.notebook_path)?;
        Ok(cells::classify(&cells))
    }

    /// Dependencies declared in the notebook's install cells.
    pub fn dependencies(&self) -> Result<Vec<DependencyDescription>> {
        let classified = self.classify()?;
        Ok(dependency::extract(
            &classified.installs,
            &self.config.working_dir,
        ))
    }

    /// Render the package for `package_path` without writing anything.
    pub fn render(&self, package_path: &Path) -> Result<GeneratedPackage> {
        let package_path = self.config.resolve(package_path);
        let package_name = propagate::package_name(&package_path);
        let classified = self.classify()?;
        let dependencies = dependency::extract(&classified.installs, &self.config.working_dir);

        let notebook_file_name = self
            .notebook_path
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string();

        let config = ManifestConfig {
            name: &package_name,
            tools_version: &self.config.tools_version,
            duplicate_policy: self.config.duplicate_policy,
        };

        Ok(manifest::render_package(
            &config,
            &notebook_file_name,
            &self.script_name(),
            &classified.exports,
            &classified.executables,
            &dependencies,
            &package_path,
        ))
    }

    /// Generate the manifest and all sources into `package_path`.
    pub fn to_package(&self, package_path: &Path) -> Result<GeneratedPackage> {
        let package_path = self.config.resolve(package_path);
        let package = self.render(&package_path)?;

        for file in package.files() {
            let destination = package_path.join(&file.relative_path);
            propagate::write_file(&destination, &file.contents)?;
            tracing::info!("Wrote {}", destination.display());
        }

        Ok(package)
    }

    /// Pull the sources of sibling local dependencies into `package_path`.
    pub fn pull_local_dependency_sources(&self, package_path: &Path) -> Result<usize> {
        let package_path = self.config.resolve(package_path);
        let dependencies = self.dependencies()?;
        propagate::pull_local_dependency_sources(
            &dependencies,
            &self.config.prefix,
            &package_path,
            &self.config.working_dir,
            self.config.link_mode,
        )
    }

    /// Push this notebook's freshly generated source into sibling packages.
    pub fn propagate_to_siblings(&self, package_path: &Path) -> Result<usize> {
        let package_path = self.config.resolve(package_path);
        propagate::propagate_to_siblings(
            &self.config.prefix,
            &package_path,
            &self.script_name(),
            self.config.link_mode,
        )
    }

    /// Export to the default package path.
    pub fn export(&self) -> ExportResult {
        self.export_to(&self.default_package_path())
    }

    /// Run the whole pipeline against `package_path`, stopping at the first failure.
    pub fn export_to(&self, package_path: &Path) -> ExportResult {
        tracing::info!(
            "Exporting {} → {}",
            self.notebook_path.display(),
            package_path.display()
        );

        let result: ExportResult = self.to_package(package_path).into();
        if !result.is_success() {
            return result;
        }

        let pulled = self.pull_local_dependency_sources(package_path);
        if let Ok(count) = &pulled {
            tracing::info!("Pulled {} files from local dependencies", count);
        }
        let result: ExportResult = pulled.into();
        if !result.is_success() || !self.config.propagate {
            return result;
        }

        let updated = self.propagate_to_siblings(package_path);
        if let Ok(count) = &updated {
            tracing::info!("Updated {} sibling packages", count);
        }
        updated.into()
    }
}
