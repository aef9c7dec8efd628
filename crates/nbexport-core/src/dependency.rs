//! Dependency declarations extracted from `%install` cells.
//!
//! A dependency is kept as its raw `.package(...)` expression. The only
//! structure ever recovered from it is the local-path shape:
//!
//! ```text
//! .package(path: "/abs/path/to/FastaiNotebook_01")
//! ```

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;

use crate::cells::Cell;
use crate::directive;

/// Placeholder replaced by the export working directory.
pub const CWD_PLACEHOLDER: &str = "$cwd";

/// `.package(path: "<path>"...)`
/// Groups: 1=path
static LOCAL_PATH_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^\s*\.package\(path:\s*"([^"]*)"(.*)\)\s*$"#).expect("local path pattern is valid")
});

/// One `.package(...)` expression, allowing a single level of nested calls
/// such as `.branch("master")`.
static PACKAGE_EXPR_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\.package\((?:[^()]|\([^()]*\))*\)").expect("package pattern is valid")
});

/// `url: "<location>"` or `path: "<location>"` inside a package expression.
/// Groups: 1=location
static LOCATION_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?:url|path):\s*"([^"]*)""#).expect("location pattern is valid")
});

/// A declared dependency: module name plus the verbatim package expression.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DependencyDescription {
    /// Module name used in `import` statements and target dependencies.
    pub name: String,

    /// The dependency expression exactly as declared (after `$cwd` substitution).
    pub raw_spec: String,
}

impl DependencyDescription {
    pub fn new(name: impl Into<String>, raw_spec: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            raw_spec: raw_spec.into(),
        }
    }

    /// The path of a `.package(path: ...)` dependency, or `None` for anything else.
    pub fn local_path(&self) -> Option<&str> {
        LOCAL_PATH_PATTERN
            .captures(&self.raw_spec)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
    }

    /// The local path resolved against `base` when it is relative.
    pub fn resolved_local_path(&self, base: &Path) -> Option<PathBuf> {
        self.local_path().map(|path| {
            let path = Path::new(path);
            if path.is_absolute() {
                path.to_path_buf()
            } else {
                base.join(path)
            }
        })
    }

    /// The spec with its local path replaced by `new_path`.
    ///
    /// Returns the spec unchanged when it is not a local-path declaration.
    pub fn with_local_path(&self, new_path: &str) -> String {
        match LOCAL_PATH_PATTERN
            .captures(&self.raw_spec)
            .and_then(|caps| caps.get(1))
        {
            Some(m) => format!(
                "{}{}{}",
                &self.raw_spec[..m.start()],
                new_path,
                &self.raw_spec[m.end()..]
            ),
            None => self.raw_spec.clone(),
        }
    }
}

/// Parse one `%install` line into dependencies, substituting `$cwd`.
pub fn dependencies_from_install_line(line: &str, cwd: &Path) -> Vec<DependencyDescription> {
    let cwd = cwd.to_string_lossy();
    directive::install_directives(line)
        .into_iter()
        .map(|found| {
            DependencyDescription::new(found.name, found.spec.replace(CWD_PLACEHOLDER, &cwd))
        })
        .collect()
}

/// Extract every dependency declared in the given install cells, in line order.
///
/// Duplicates are kept.
pub fn extract(install_sources: &[Cell], cwd: &Path) -> Vec<DependencyDescription> {
    let dependencies: Vec<DependencyDescription> = install_sources
        .iter()
        .flat_map(|cell| cell.lines.iter())
        .flat_map(|line| dependencies_from_install_line(line, cwd))
        .collect();

    for dep in &dependencies {
        tracing::debug!("Dependency {} = {}", dep.name, dep.raw_spec);
    }

    dependencies
}

/// Scan the dependency expressions of an existing package manifest.
///
/// Names are derived from the last path component of the `url:` or `path:`
/// argument, without a trailing `.git` or `.swift`.
pub fn dependencies_from_manifest(contents: &str) -> Vec<DependencyDescription> {
    PACKAGE_EXPR_PATTERN
        .find_iter(contents)
        .filter_map(|expr| {
            let spec = expr.as_str();
            let location = LOCATION_PATTERN.captures(spec)?.get(1)?.as_str();
            let name = module_name_from_location(location)?;
            Some(DependencyDescription::new(name, spec))
        })
        .collect()
}

fn module_name_from_location(location: &str) -> Option<String> {
    let last = location
        .trim_end_matches('/')
        .rsplit(['/', '\\'])
        .next()
        .filter(|s| !s.is_empty())?;
    let name = last.strip_suffix(".git").unwrap_or(last);
    let name = name.strip_suffix(".swift").unwrap_or(name);
    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}
