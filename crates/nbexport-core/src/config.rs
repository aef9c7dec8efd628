//! Export configuration.

use std::path::{Path, PathBuf};

/// Prefix shared by the packages generated from one notebook collection.
pub const DEFAULT_PACKAGE_PREFIX: &str = "FastaiNotebook_";

/// Default `swift-tools-version` written into generated manifests.
pub const DEFAULT_TOOLS_VERSION: &str = "4.2";

/// How files are materialised in other packages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LinkMode {
    /// Write an independent copy.
    #[default]
    Copy,
    /// Replace the destination with a hard link to the source.
    HardLink,
}

/// What to do with several dependencies of the same name when rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DuplicatePolicy {
    /// Render every declaration, in extraction order.
    #[default]
    Keep,
    /// Render only the first declaration of each name.
    FirstWins,
}

/// Configuration for exporting a notebook.
#[derive(Debug, Clone)]
pub struct ExportConfig {
    /// Naming prefix of sibling packages.
    pub prefix: String,

    /// Substituted for `$cwd` in install specs, and base for relative paths.
    pub working_dir: PathBuf,

    /// Parent of the default package directory. Falls back to `working_dir`.
    pub output_dir: Option<PathBuf>,

    /// `swift-tools-version` of the generated manifest.
    pub tools_version: String,

    /// How propagated files are written.
    pub link_mode: LinkMode,

    /// How repeated dependency names are rendered.
    pub duplicate_policy: DuplicatePolicy,

    /// Whether the exported source is pushed into sibling packages.
    pub propagate: bool,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            prefix: DEFAULT_PACKAGE_PREFIX.to_string(),
            working_dir: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            output_dir: None,
            tools_version: DEFAULT_TOOLS_VERSION.to_string(),
            link_mode: LinkMode::Copy,
            duplicate_policy: DuplicatePolicy::Keep,
            propagate: true,
        }
    }
}

impl ExportConfig {
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub fn with_working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = dir.into();
        self
    }

    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(dir.into());
        self
    }

    pub fn with_tools_version(mut self, version: impl Into<String>) -> Self {
        self.tools_version = version.into();
        self
    }

    pub fn with_link_mode(mut self, mode: LinkMode) -> Self {
        self.link_mode = mode;
        self
    }

    pub fn with_duplicate_policy(mut self, policy: DuplicatePolicy) -> Self {
        self.duplicate_policy = policy;
        self
    }

    pub fn with_propagate(mut self, propagate: bool) -> Self {
        self.propagate = propagate;
        self
    }

    /// Directory the default package is created in.
    pub fn output_dir(&self) -> &Path {
        self.output_dir.as_deref().unwrap_or(&self.working_dir)
    }

    /// Make `path` absolute by joining it onto the working directory.
    pub fn resolve(&self, path: impl AsRef<Path>) -> PathBuf {
        let path = path.as_ref();
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.working_dir.join(path)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ExportConfig::default();
        assert_eq!(config.prefix, "FastaiNotebook_");
        assert_eq!(config.tools_version, "4.2");
        assert_eq!(config.link_mode, LinkMode::Copy);
        assert_eq!(config.duplicate_policy, DuplicatePolicy::Keep);
        assert!(config.propagate);
        assert_eq!(config.output_dir(), config.working_dir.as_path());
    }

    #[test]
    fn test_output_dir_override() {
        let config = ExportConfig::default()
            .with_working_dir("/work")
            .with_output_dir("/out");
        assert_eq!(config.output_dir(), Path::new("/out"));
    }

    #[test]
    fn test_resolve() {
        let config = ExportConfig::default().with_working_dir("/work");
        assert_eq!(config.resolve("pkg"), PathBuf::from("/work/pkg"));
        assert_eq!(config.resolve("/abs/pkg"), PathBuf::from("/abs/pkg"));
    }
}
