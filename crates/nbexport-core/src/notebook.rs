//! Jupyter notebook (.ipynb) decoding.
//!
//! Only the `cells[].source` entries matter for exporting; everything else in
//! the document (metadata, outputs, execution counts) is ignored.

use std::fs;
use std::path::Path;

use serde::Deserialize;
use serde_json::Value;

use crate::cells::Cell;
use crate::error::{Error, Result};

/// The subset of a Jupyter notebook that exporting needs.
#[derive(Debug, Deserialize)]
struct RawNotebook {
    cells: Vec<RawCell>,
}

/// A Jupyter cell. `source` is usually a list of lines but nbformat also
/// allows a single string.
#[derive(Debug, Deserialize)]
struct RawCell {
    source: Option<Value>,
}

impl RawCell {
    fn into_cell(self) -> Option<Cell> {
        match self.source? {
            Value::Array(items) => {
                let lines = items
                    .into_iter()
                    .map(|item| match item {
                        Value::String(line) => Some(line),
                        _ => None,
                    })
                    .collect::<Option<Vec<_>>>()?;
                Some(Cell::new(lines))
            }
            Value::String(text) => Some(Cell::new(
                text.split_inclusive('\n').map(str::to_string).collect(),
            )),
            _ => None,
        }
    }
}

/// Read a notebook file and decode its cells.
pub fn read_cells(path: impl AsRef<Path>) -> Result<Vec<Cell>> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| Error::read(path, e))?;
    parse_cells(&content).map_err(|e| Error::notebook(path, e))
}

/// Decode the cells of a notebook document.
///
/// Cells without a usable `source` are skipped. A document that is not a
/// mapping with a `cells` list is a structural error.
pub fn parse_cells(json: &str) -> Result<Vec<Cell>> {
    let value: Value = serde_json::from_str(json)?;
    if !value.is_object() {
        return Err(Error::InvalidNotebook(
            "top level is not a mapping".to_string(),
        ));
    }
    if value.get("cells").is_none() {
        return Err(Error::InvalidNotebook("missing `cells` entry".to_string()));
    }

    let notebook: RawNotebook = serde_json::from_value(value)?;
    let total = notebook.cells.len();
    let cells: Vec<Cell> = notebook
        .cells
        .into_iter()
        .filter_map(RawCell::into_cell)
        .collect();

    if cells.len() < total {
        tracing::debug!("Skipped {} cells without source", total - cells.len());
    }

    Ok(cells)
}
