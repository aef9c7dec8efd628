//! Package manifest and module source generation.
//!
//! Produces a `Package.swift` with one library product named after the
//! package, one executable product per executable target, and the declared
//! dependencies. Local `.package(path: ...)` dependencies are rewritten to be
//! relative to the destination package so the tree can be moved as a whole.

use std::path::{Component, Path, PathBuf};

use rustc_hash::FxHashSet;

use crate::cells::{Cell, ExecutableSource};
use crate::config::DuplicatePolicy;
use crate::dependency::DependencyDescription;

/// Name of the generated manifest file.
pub const MANIFEST_FILE: &str = "Package.swift";

/// Directory holding one subdirectory per target.
pub const SOURCES_DIR: &str = "Sources";

/// Extension of generated source files.
pub const SOURCE_EXTENSION: &str = "swift";

/// Configuration for generating a package manifest.
#[derive(Debug, Clone)]
pub struct ManifestConfig<'a> {
    /// Package name, also the library product and target name.
    pub name: &'a str,
    /// Value of the `swift-tools-version` line.
    pub tools_version: &'a str,
    /// How repeated dependency names are rendered.
    pub duplicate_policy: DuplicatePolicy,
}

impl<'a> Default for ManifestConfig<'a> {
    fn default() -> Self {
        Self {
            name: "generated",
            tools_version: "4.2",
            duplicate_policy: DuplicatePolicy::Keep,
        }
    }
}

/// A file to be written, relative to the package root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    pub relative_path: PathBuf,
    pub contents: String,
}

/// Everything rendered for one package.
#[derive(Debug, Clone)]
pub struct GeneratedPackage {
    /// `Package.swift` contents.
    pub manifest: String,
    /// The library source, at `Sources/<package>/<script>`.
    pub library: GeneratedFile,
    /// One `Sources/<name>/main.swift` per executable.
    pub executables: Vec<GeneratedFile>,
}

impl GeneratedPackage {
    /// Every generated file, manifest included, in write order.
    pub fn files(&self) -> Vec<GeneratedFile> {
        let mut files = Vec::with_capacity(self.executables.len() + 2);
        files.push(self.library.clone());
        files.extend(self.executables.iter().cloned());
        files.push(GeneratedFile {
            relative_path: PathBuf::from(MANIFEST_FILE),
            contents: self.manifest.clone(),
        });
        files
    }
}

/// Render the manifest and every source file of a package.
///
/// * `notebook_file_name` - named in the header of each generated source
/// * `script_name` - file name of the library source
/// * `package_path` - destination package directory, used for relative paths
pub fn render_package(
    config: &ManifestConfig<'_>,
    notebook_file_name: &str,
    script_name: &str,
    exports: &[Cell],
    executables: &[ExecutableSource],
    dependencies: &[DependencyDescription],
    package_path: &Path,
) -> GeneratedPackage {
    let dependencies = apply_duplicate_policy(dependencies, config.duplicate_policy);
    let mut imports = import_names(&dependencies);

    let library = GeneratedFile {
        relative_path: Path::new(SOURCES_DIR).join(config.name).join(script_name),
        contents: module_source(
            notebook_file_name,
            exports.iter().map(|c| c.lines.as_slice()),
            &imports,
        ),
    };

    if !imports.iter().any(|name| name == config.name) {
        imports.push(config.name.to_string());
    }
    let executable_files: Vec<GeneratedFile> = executables
        .iter()
        .map(|exe| GeneratedFile {
            relative_path: Path::new(SOURCES_DIR)
                .join(&exe.name)
                .join(format!("main.{}", SOURCE_EXTENSION)),
            contents: module_source(
                notebook_file_name,
                std::iter::once(exe.lines.as_slice()),
                &imports,
            ),
        })
        .collect();

    let executable_names: Vec<&str> = executables.iter().map(|e| e.name.as_str()).collect();
    let manifest = generate_package_swift(config, &dependencies, &executable_names, package_path);

    GeneratedPackage {
        manifest,
        library,
        executables: executable_files,
    }
}

/// Render a module source: generated-file header, imports, then each cell.
pub fn module_source<'a>(
    notebook_file_name: &str,
    cells: impl IntoIterator<Item = &'a [String]>,
    imports: &[String],
) -> String {
    let mut source = String::new();

    source.push_str("/*\n");
    source.push_str("THIS FILE WAS AUTOGENERATED! DO NOT EDIT!\n");
    source.push_str(&format!("file to edit: {}\n", notebook_file_name));
    source.push_str("\n*/\n\n");

    for name in imports {
        source.push_str(&format!("import {}\n", name));
    }

    for lines in cells {
        source.push('\n');
        source.push_str(&lines.join("\n"));
        source.push('\n');
    }

    source
}

/// Generate a `Package.swift` manifest.
///
/// Dependencies are rendered from their raw spec in the given order; local
/// absolute paths become relative to `package_path`.
pub fn generate_package_swift(
    config: &ManifestConfig<'_>,
    dependencies: &[DependencyDescription],
    executable_names: &[&str],
    package_path: &Path,
) -> String {
    let name = config.name;
    let mut manifest = String::new();

    manifest.push_str(&format!("// swift-tools-version:{}\n", config.tools_version));
    manifest.push_str("import PackageDescription\n\n");
    manifest.push_str("let package = Package(\n");
    manifest.push_str(&format!("    name: \"{}\",\n", name));

    // Products
    manifest.push_str("    products: [\n");
    manifest.push_str(&format!(
        "        .library(name: \"{}\", targets: [\"{}\"]),\n",
        name, name
    ));
    for exe in executable_names {
        manifest.push_str(&format!(
            "        .executable(name: \"{}\", targets: [\"{}\"]),\n",
            exe, exe
        ));
    }
    manifest.push_str("    ],\n");

    // Dependencies
    manifest.push_str("    dependencies: [\n");
    for dep in dependencies {
        manifest.push_str(&format!(
            "        {},\n",
            dependency_spec_relative_to(dep, package_path)
        ));
    }
    manifest.push_str("    ],\n");

    // Targets
    let dependency_names: Vec<String> = dependencies
        .iter()
        .map(|d| format!("\"{}\"", d.name))
        .collect();
    manifest.push_str("    targets: [\n");
    manifest.push_str(&format!(
        "        .target(name: \"{}\", dependencies: [{}]),\n",
        name,
        dependency_names.join(", ")
    ));
    for exe in executable_names {
        manifest.push_str(&format!(
            "        .target(name: \"{}\", dependencies: [\"{}\"]),\n",
            exe, name
        ));
    }
    manifest.push_str("    ]\n");
    manifest.push_str(")\n");

    manifest
}

/// The dependency's spec with an absolute local path made relative to `package_path`.
///
/// Remote specs and relative local paths are returned verbatim.
pub fn dependency_spec_relative_to(dep: &DependencyDescription, package_path: &Path) -> String {
    match dep.local_path().map(Path::new) {
        Some(path) if path.is_absolute() && package_path.is_absolute() => {
            let relative = relative_path(package_path, path);
            dep.with_local_path(&path_to_manifest_string(&relative))
        }
        _ => dep.raw_spec.clone(),
    }
}

/// Compute the path of `to` relative to the directory `from`.
///
/// Both paths are normalized lexically first; no filesystem access happens.
pub fn relative_path(from: &Path, to: &Path) -> PathBuf {
    let from = normalize(from);
    let to = normalize(to);
    let from_parts: Vec<Component<'_>> = from.components().collect();
    let to_parts: Vec<Component<'_>> = to.components().collect();

    let common = from_parts
        .iter()
        .zip(&to_parts)
        .take_while(|(a, b)| a == b)
        .count();

    let mut relative = PathBuf::new();
    for _ in common..from_parts.len() {
        relative.push("..");
    }
    for part in &to_parts[common..] {
        relative.push(part.as_os_str());
    }

    if relative.as_os_str().is_empty() {
        PathBuf::from(".")
    } else {
        relative
    }
}

/// Lexically resolve `.` and `..` components.
pub fn normalize(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                let popped = matches!(
                    normalized.components().next_back(),
                    Some(Component::Normal(_))
                ) && normalized.pop();
                if !popped && !normalized.has_root() {
                    normalized.push("..");
                }
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
}

fn path_to_manifest_string(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

fn apply_duplicate_policy(
    dependencies: &[DependencyDescription],
    policy: DuplicatePolicy,
) -> Vec<DependencyDescription> {
    match policy {
        DuplicatePolicy::Keep => dependencies.to_vec(),
        DuplicatePolicy::FirstWins => {
            let mut seen = FxHashSet::default();
            dependencies
                .iter()
                .filter(|dep| seen.insert(dep.name.as_str()))
                .cloned()
                .collect()
        }
    }
}

/// Dependency names for `import` lines, each once, in first-seen order.
fn import_names(dependencies: &[DependencyDescription]) -> Vec<String> {
    let mut seen = FxHashSet::default();
    dependencies
        .iter()
        .filter(|dep| seen.insert(dep.name.as_str()))
        .map(|dep| dep.name.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn remote(name: &str) -> DependencyDescription {
        DependencyDescription::new(
            name,
            format!(".package(url: \"https://example.com/{}\", from: \"1.0.0\")", name),
        )
    }

    #[test]
    fn test_relative_path() {
        assert_eq!(
            relative_path(Path::new("/a/b/Pkg"), Path::new("/a/b/Dep")),
            PathBuf::from("../Dep")
        );
        assert_eq!(
            relative_path(Path::new("/a/b/Pkg"), Path::new("/x/y")),
            PathBuf::from("../../../x/y")
        );
        assert_eq!(
            relative_path(Path::new("/a/b"), Path::new("/a/b/c/d")),
            PathBuf::from("c/d")
        );
        assert_eq!(relative_path(Path::new("/a"), Path::new("/a/")), PathBuf::from("."));
        assert_eq!(
            relative_path(Path::new("/a/./b/../c"), Path::new("/a/d")),
            PathBuf::from("../d")
        );
    }

    #[test]
    fn test_relative_path_round_trip() {
        let pairs = [
            ("/work/FastaiNotebook_02", "/work/FastaiNotebook_01"),
            ("/work/out/Pkg", "/libs/shared/Util"),
            ("/a", "/a/b/c"),
            ("/", "/deep/er/path"),
        ];
        for (dest, target) in pairs {
            let rel = relative_path(Path::new(dest), Path::new(target));
            assert_eq!(normalize(&Path::new(dest).join(&rel)), PathBuf::from(target));
        }
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize(Path::new("/a/./b/../c")), PathBuf::from("/a/c"));
        assert_eq!(normalize(Path::new("/../a")), PathBuf::from("/a"));
        assert_eq!(normalize(Path::new("../a/../../b")), PathBuf::from("../../b"));
    }

    #[test]
    fn test_module_source() {
        let cells = [vec!["let a = 1".to_string()], vec!["let b = 2".to_string()]];
        let source = module_source(
            "01_matmul.ipynb",
            cells.iter().map(Vec::as_slice),
            &["Foo".to_string()],
        );

        assert_eq!(
            source,
            "/*\nTHIS FILE WAS AUTOGENERATED! DO NOT EDIT!\nfile to edit: 01_matmul.ipynb\n\n*/\n\nimport Foo\n\nlet a = 1\n\nlet b = 2\n"
        );
    }

    #[test]
    fn test_manifest_layout() {
        let config = ManifestConfig {
            name: "Demo",
            ..Default::default()
        };
        let deps = vec![remote("Foo"), remote("Bar")];
        let manifest = generate_package_swift(&config, &deps, &["train"], Path::new("/work/Demo"));

        let expected = r#"// swift-tools-version:4.2
import PackageDescription

let package = Package(
    name: "Demo",
    products: [
        .library(name: "Demo", targets: ["Demo"]),
        .executable(name: "train", targets: ["train"]),
    ],
    dependencies: [
        .package(url: "https://example.com/Foo", from: "1.0.0"),
        .package(url: "https://example.com/Bar", from: "1.0.0"),
    ],
    targets: [
        .target(name: "Demo", dependencies: ["Foo", "Bar"]),
        .target(name: "train", dependencies: ["Demo"]),
    ]
)
"#;
        assert_eq!(manifest, expected);
    }

    #[test]
    fn test_local_dependency_rewritten() {
        let config = ManifestConfig {
            name: "FastaiNotebook_02",
            ..Default::default()
        };
        let deps = vec![DependencyDescription::new(
            "FastaiNotebook_01",
            r#".package(path: "/work/FastaiNotebook_01")"#,
        )];
        let manifest =
            generate_package_swift(&config, &deps, &[], Path::new("/work/FastaiNotebook_02"));

        assert!(manifest.contains(r#"        .package(path: "../FastaiNotebook_01"),"#));
        assert!(!manifest.contains("/work/FastaiNotebook_01"));
    }

    #[test]
    fn test_relative_local_dependency_verbatim() {
        let dep = DependencyDescription::new("Util", r#".package(path: "libs/Util")"#);
        assert_eq!(
            dependency_spec_relative_to(&dep, Path::new("/work/Pkg")),
            dep.raw_spec
        );
    }

    #[test]
    fn test_duplicate_policy() {
        let deps = vec![
            remote("Foo"),
            DependencyDescription::new("Foo", r#".package(path: "/x/Foo")"#),
        ];

        let kept = apply_duplicate_policy(&deps, DuplicatePolicy::Keep);
        assert_eq!(kept.len(), 2);

        let first = apply_duplicate_policy(&deps, DuplicatePolicy::FirstWins);
        assert_eq!(first, vec![remote("Foo")]);
    }

    #[test]
    fn test_render_package() {
        let config = ManifestConfig {
            name: "Demo",
            ..Default::default()
        };
        let exports = vec![Cell::from_text("let x = 1")];
        let executables = vec![ExecutableSource {
            name: "run".to_string(),
            lines: vec!["print(x)".to_string()],
        }];
        let deps = vec![remote("Foo"), remote("Foo")];

        let package = render_package(
            &config,
            "demo.ipynb",
            "demo.swift",
            &exports,
            &executables,
            &deps,
            Path::new("/work/Demo"),
        );

        assert_eq!(
            package.library.relative_path,
            PathBuf::from("Sources/Demo/demo.swift")
        );
        assert_eq!(package.library.contents.matches("import Foo\n").count(), 1);
        assert!(!package.library.contents.contains("import Demo"));
        assert!(package.library.contents.ends_with("\nlet x = 1\n"));

        let exe = &package.executables[0];
        assert_eq!(exe.relative_path, PathBuf::from("Sources/run/main.swift"));
        assert!(exe.contents.contains("import Foo\nimport Demo\n"));
        assert!(exe.contents.ends_with("\nprint(x)\n"));

        assert!(package.manifest.contains(".executable(name: \"run\", targets: [\"run\"])"));
        assert_eq!(package.files().len(), 3);
        assert_eq!(package.files()[2].relative_path, PathBuf::from(MANIFEST_FILE));
    }
}
