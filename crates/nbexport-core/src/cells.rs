//! Cell classification.
//!
//! Sorts notebook cells into the three groups the exporter cares about:
//! export cells, install cells and executable cells. The passes are
//! independent, so a cell may land in more than one group.

use rustc_hash::FxHashMap;

use crate::directive;

/// A notebook cell as an ordered list of lines, without line terminators.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cell {
    pub lines: Vec<String>,
}

impl Cell {
    /// Create a cell, stripping one trailing `\n` (or `\r\n`) from each line.
    pub fn new(lines: Vec<String>) -> Self {
        let lines = lines
            .into_iter()
            .map(|mut line| {
                if line.ends_with('\n') {
                    line.pop();
                    if line.ends_with('\r') {
                        line.pop();
                    }
                }
                line
            })
            .collect();
        Self { lines }
    }

    /// Create a cell from a block of text, one line per `\n`.
    pub fn from_text(text: &str) -> Self {
        Self::new(text.lines().map(str::to_string).collect())
    }

    /// First line of the cell, if any.
    pub fn first_line(&self) -> Option<&str> {
        self.lines.first().map(String::as_str)
    }

    /// All lines after the first one.
    pub fn body(&self) -> &[String] {
        self.lines.get(1..).unwrap_or_default()
    }
}

/// The merged source of one executable target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutableSource {
    /// Target name from the `// executable:` marker.
    pub name: String,
    /// Lines of every cell with this name, separated by a blank line.
    pub lines: Vec<String>,
}

/// Result of classifying a notebook.
#[derive(Debug, Clone, Default)]
pub struct ClassifiedCells {
    /// Export cells, marker line removed, in notebook order.
    pub exports: Vec<Cell>,
    /// Whole install cells, in notebook order.
    pub installs: Vec<Cell>,
    /// Executables merged by name, in first-seen order.
    pub executables: Vec<ExecutableSource>,
}

/// Classify a notebook's cells.
pub fn classify(cells: &[Cell]) -> ClassifiedCells {
    ClassifiedCells {
        exports: export_sources(cells),
        installs: install_sources(cells),
        executables: executable_sources(cells),
    }
}

/// Export cells, with the `// export` marker line removed.
pub fn export_sources(cells: &[Cell]) -> Vec<Cell> {
    cells
        .iter()
        .filter(|cell| cell.first_line().is_some_and(directive::is_export_marker))
        .map(|cell| Cell {
            lines: cell.body().to_vec(),
        })
        .collect()
}

/// Cells containing at least one `%install` line anywhere. The whole cell is kept.
pub fn install_sources(cells: &[Cell]) -> Vec<Cell> {
    cells
        .iter()
        .filter(|cell| cell.lines.iter().any(|line| directive::is_install_line(line)))
        .cloned()
        .collect()
}

/// Executable cells merged by name.
pub fn executable_sources(cells: &[Cell]) -> Vec<ExecutableSource> {
    let mut index: FxHashMap<String, usize> = FxHashMap::default();
    let mut merged: Vec<ExecutableSource> = Vec::new();

    for cell in cells {
        let Some(name) = cell.first_line().and_then(directive::executable_name) else {
            continue;
        };

        match index.get(name) {
            Some(&pos) => {
                let target = &mut merged[pos];
                target.lines.push(String::new());
                target.lines.extend_from_slice(cell.body());
            }
            None => {
                tracing::debug!("Found executable cell: {}", name);
                index.insert(name.to_string(), merged.len());
                merged.push(ExecutableSource {
                    name: name.to_string(),
                    lines: cell.body().to_vec(),
                });
            }
        }
    }

    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cell(text: &str) -> Cell {
        Cell::from_text(text)
    }

    #[test]
    fn test_cell_new_strips_terminators() {
        let c = Cell::new(vec!["a\n".into(), "b\r\n".into(), "c".into(), "\n".into()]);
        assert_eq!(c.lines, vec!["a", "b", "c", ""]);
    }

    #[test]
    fn test_export_cells_in_order() {
        let cells = vec![
            cell("// export\nlet a = 1"),
            cell("print(a)"),
            cell("//export\nlet b = 2\nlet c = 3"),
        ];

        let exports = export_sources(&cells);
        assert_eq!(exports.len(), 2);
        assert_eq!(exports[0].lines, vec!["let a = 1"]);
        assert_eq!(exports[1].lines, vec!["let b = 2", "let c = 3"]);
    }

    #[test]
    fn test_export_marker_only_on_first_line() {
        let cells = vec![cell("let a = 1\n// export")];
        assert!(export_sources(&cells).is_empty());
    }

    #[test]
    fn test_empty_cell_is_ignored() {
        let cells = vec![Cell::default()];
        let classified = classify(&cells);
        assert!(classified.exports.is_empty());
        assert!(classified.installs.is_empty());
        assert!(classified.executables.is_empty());
    }

    #[test]
    fn test_install_anywhere_keeps_whole_cell() {
        let cells = vec![cell(
            "// dependencies\n%install '.package(path: \"/a\")' A\n%install '.package(path: \"/b\")' B",
        )];

        let installs = install_sources(&cells);
        assert_eq!(installs.len(), 1);
        assert_eq!(installs[0].lines.len(), 3);
    }

    #[test]
    fn test_executables_merged_by_name() {
        let cells = vec![
            cell("// executable: train\nlet a = 1"),
            cell("// executable: infer\nrun()"),
            cell("// executable: train\nlet b = 2"),
        ];

        let executables = executable_sources(&cells);
        assert_eq!(executables.len(), 2);
        assert_eq!(executables[0].name, "train");
        assert_eq!(executables[0].lines, vec!["let a = 1", "", "let b = 2"]);
        assert_eq!(executables[1].name, "infer");
        assert_eq!(executables[1].lines, vec!["run()"]);
    }

    #[test]
    fn test_independent_passes() {
        let cells = vec![cell(
            "// export\n%install '.package(path: \"/x\")' X\nlet y = 1",
        )];

        let classified = classify(&cells);
        assert_eq!(classified.exports.len(), 1);
        assert_eq!(classified.installs.len(), 1);
        assert!(classified.executables.is_empty());
    }
}
