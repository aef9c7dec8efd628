//! Export notebook cells as a Swift package.
//!
//! Cells marked `// export` become the package's library source, cells marked
//! `// executable: <name>` become executable targets, and `%install` lines
//! become manifest dependencies:
//!
//! ```text
//! 02_fully_connected.ipynb ──► NotebookExport ──► FastaiNotebook_02_fully_connected/
//!                                                 ├── Package.swift
//!                                                 └── Sources/
//!                                                     └── FastaiNotebook_02_fully_connected/
//!                                                         └── 02_fully_connected.swift
//! ```
//!
//! After generation, sources of sibling local dependencies are pulled in and
//! the new source is pushed to siblings that already carry a copy of it.

pub mod cells;
pub mod config;
pub mod dependency;
pub mod directive;
pub mod error;
pub mod export;
pub mod manifest;
pub mod notebook;
pub mod propagate;

pub use cells::{Cell, ClassifiedCells, ExecutableSource, classify};
pub use config::{DuplicatePolicy, ExportConfig, LinkMode};
pub use dependency::{DependencyDescription, dependencies_from_manifest};
pub use error::{Error, Result};
pub use export::{ExportResult, NotebookExport};
pub use manifest::{GeneratedFile, GeneratedPackage, ManifestConfig};

/// Version of this crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
