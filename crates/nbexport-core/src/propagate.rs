//! Keeping sibling packages in sync.
//!
//! Packages generated from one notebook collection live side by side and
//! share a naming prefix:
//!
//! ```text
//! work/
//! ├── FastaiNotebook_01_matmul/
//! │   ├── Package.swift
//! │   └── Sources/FastaiNotebook_01_matmul/01_matmul.swift
//! └── FastaiNotebook_02_fully_connected/
//!     ├── Package.swift
//!     └── Sources/FastaiNotebook_02_fully_connected/
//!         ├── 01_matmul.swift          <- pulled from the local dependency
//!         └── 02_fully_connected.swift
//! ```
//!
//! Every write replaces the destination, so each step can be re-run.

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::LinkMode;
use crate::dependency::DependencyDescription;
use crate::error::{Error, Result};
use crate::manifest::{SOURCES_DIR, normalize};

/// Directory holding the library sources of the package at `package_path`.
pub fn library_sources_dir(package_path: &Path) -> PathBuf {
    let name = package_name(package_path);
    package_path.join(SOURCES_DIR).join(name)
}

/// Base name of a package directory.
pub fn package_name(package_path: &Path) -> String {
    package_path
        .file_name()
        .unwrap_or_default()
        .to_string_lossy()
        .to_string()
}

/// Create a directory and its parents; succeeds if it already exists.
pub fn ensure_dir(path: &Path) -> Result<()> {
    fs::create_dir_all(path).map_err(|e| Error::create_dir(path, e))
}

/// Write `contents` to `path`, creating parent directories and replacing any existing file.
pub fn write_file(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    fs::write(path, contents).map_err(|e| Error::write(path, e))
}

/// Copy or link `from` onto `to`, replacing `to` if it exists.
///
/// Placing a file onto itself is a no-op.
pub fn place_file(from: &Path, to: &Path, mode: LinkMode) -> Result<()> {
    if normalize(from) == normalize(to) {
        return Ok(());
    }

    let copy_error = |e: std::io::Error| Error::Copy {
        from: from.to_path_buf(),
        to: to.to_path_buf(),
        message: e.to_string(),
    };

    match mode {
        LinkMode::Copy => {
            // Read first: `to` may already be a hard link to `from`.
            let bytes = fs::read(from).map_err(copy_error)?;
            fs::write(to, bytes).map_err(copy_error)?;
        }
        LinkMode::HardLink => {
            if to.symlink_metadata().is_ok() {
                fs::remove_file(to).map_err(copy_error)?;
            }
            fs::hard_link(from, to).map_err(copy_error)?;
        }
    }
    Ok(())
}

/// Copy the library sources of sibling local dependencies into this package.
///
/// Only dependencies named with `prefix` and declared as `.package(path: ...)`
/// are considered, and only when the referenced package shares the parent
/// directory of `package_path`. Relative paths resolve against `working_dir`.
/// Returns the number of files placed.
pub fn pull_local_dependency_sources(
    dependencies: &[DependencyDescription],
    prefix: &str,
    package_path: &Path,
    working_dir: &Path,
    mode: LinkMode,
) -> Result<usize> {
    let destination = library_sources_dir(package_path);
    let package_parent = package_path.parent().map(normalize);
    let this_package = normalize(package_path);
    let mut placed = 0;

    for dep in dependencies {
        if !dep.name.starts_with(prefix) {
            continue;
        }
        let Some(dep_path) = dep.resolved_local_path(working_dir) else {
            continue;
        };
        if dep_path.parent().map(normalize) != package_parent {
            tracing::debug!("Skipping {}: not a sibling package", dep.name);
            continue;
        }
        if normalize(&dep_path) == this_package {
            tracing::debug!("Skipping {}: the package itself", dep.name);
            continue;
        }

        let source_dir = dep_path.join(SOURCES_DIR).join(&dep.name);
        let entries = fs::read_dir(&source_dir).map_err(|e| Error::list_dir(&source_dir, e))?;
        ensure_dir(&destination)?;

        for entry in entries {
            let entry = entry.map_err(|e| Error::list_dir(&source_dir, e))?;
            let file_type = entry.file_type().map_err(|e| Error::list_dir(&source_dir, e))?;
            if !file_type.is_file() {
                continue;
            }
            let target = destination.join(entry.file_name());
            place_file(&entry.path(), &target, mode)?;
            tracing::debug!("Pulled {} → {}", entry.path().display(), target.display());
            placed += 1;
        }
    }

    Ok(placed)
}

/// Overwrite this notebook's source in every sibling package that already has it.
///
/// Siblings are directories next to `package_path` whose name starts with
/// `prefix`. A sibling without `Sources/<sibling>/<script_name>` has never
/// received this notebook and is skipped. Returns the number of files updated.
pub fn propagate_to_siblings(
    prefix: &str,
    package_path: &Path,
    script_name: &str,
    mode: LinkMode,
) -> Result<usize> {
    let Some(parent) = package_path.parent() else {
        return Ok(0);
    };
    let parent = if parent.as_os_str().is_empty() {
        Path::new(".")
    } else {
        parent
    };

    let script_source = library_sources_dir(package_path).join(script_name);
    let this_package = normalize(package_path);
    let mut updated = 0;

    let entries = fs::read_dir(parent).map_err(|e| Error::list_dir(parent, e))?;
    for entry in entries {
        let entry = entry.map_err(|e| Error::list_dir(parent, e))?;
        let file_type = entry.file_type().map_err(|e| Error::list_dir(parent, e))?;
        if !file_type.is_dir() || !entry.file_name().to_string_lossy().starts_with(prefix) {
            continue;
        }

        let sibling = entry.path();
        if normalize(&sibling) == this_package {
            continue;
        }

        let target = library_sources_dir(&sibling).join(script_name);
        if !target.is_file() {
            continue;
        }

        place_file(&script_source, &target, mode)?;
        tracing::info!("Updated {}", target.display());
        updated += 1;
    }

    Ok(updated)
}
