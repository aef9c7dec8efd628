//! Line directives recognised inside notebook cells.
//!
//! Three directive shapes are understood:
//!
//! ```text
//! // export
//! // executable: printShape
//! %install '.package(url: "https://github.com/mxcl/Path.swift", from: "0.16.1")' Path
//! ```
//!
//! Matching is line oriented and never fails: a line that does not match
//! simply yields `None`.

use std::sync::LazyLock;

use regex::Regex;

/// `// export` on a line of its own.
static EXPORT_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*//\s*export\s*$").expect("export pattern is valid"));

/// `// executable: <name>`
/// Groups: 1=name
static EXECUTABLE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*//\s*executable:\s+(\S+)\s*$").expect("executable pattern is valid")
});

/// `%install '<spec>' <name>`. The spec group is greedy so quotes nested
/// inside it are kept; the name is whatever follows the last `' `.
/// Groups: 1=spec, 2=name
static INSTALL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*%install\s+'(.*)'\s+(\S.*?)\s*$").expect("install pattern is valid")
});

/// A single `%install` directive split into its parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallDirective<'a> {
    /// The quoted dependency expression, without the surrounding quotes.
    pub spec: &'a str,
    /// The module name following the spec.
    pub name: &'a str,
}

/// Whether `line` is an export marker.
pub fn is_export_marker(line: &str) -> bool {
    EXPORT_PATTERN.is_match(line)
}

/// The executable name declared by `line`, if it is an executable marker.
pub fn executable_name(line: &str) -> Option<&str> {
    EXECUTABLE_PATTERN
        .captures(line)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Whether `line` contains an install directive.
pub fn is_install_line(line: &str) -> bool {
    INSTALL_PATTERN.is_match(line)
}

/// Every install directive found on `line`, in order.
pub fn install_directives(line: &str) -> Vec<InstallDirective<'_>> {
    INSTALL_PATTERN
        .captures_iter(line)
        .filter_map(|caps| {
            let spec = caps.get(1)?.as_str();
            let name = caps.get(2)?.as_str();
            Some(InstallDirective { spec, name })
        })
        .collect()
}
