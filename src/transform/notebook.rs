//! Notebook conversion - flatten Jupyter notebook JSON into a linear script
//!
//! Code cells are emitted verbatim; markdown and raw cells become commented
//! blocks. The conversion is lossy by design (outputs and metadata are
//! dropped). A notebook that fails to parse causes the file to be skipped.

use serde_json::Value;

use crate::core::error::{PackError, Result};

/// Convert nbformat v4 notebook JSON to a linear Python-script representation
pub fn convert_notebook(json_text: &str) -> Result<String> {
    let doc: Value = serde_json::from_str(json_text)
        .map_err(|e| PackError::Notebook(format!("invalid notebook JSON: {}", e)))?;

    let cells = doc
        .get("cells")
        .and_then(Value::as_array)
        .ok_or_else(|| PackError::Notebook("notebook has no cells array".to_string()))?;

    let mut script = String::new();
    for cell in cells {
        let cell_type = cell.get("cell_type").and_then(Value::as_str).unwrap_or("");
        let source = cell_source(cell);
        if source.trim().is_empty() {
            continue;
        }
        match cell_type {
            "code" => {
                script.push_str(&source);
            }
            "markdown" | "raw" => {
                for line in source.lines() {
                    script.push_str("# ");
                    script.push_str(line);
                    script.push('\n');
                }
            }
            other => {
                log::debug!("Ignoring notebook cell of type '{}'", other);
                continue;
            }
        }
        if !script.ends_with('\n') {
            script.push('\n');
        }
        script.push('\n');
    }
    Ok(script)
}

/// Cell source is either one string or a list of line strings
fn cell_source(cell: &Value) -> String {
    match cell.get("source") {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Array(lines)) => lines
            .iter()
            .filter_map(Value::as_str)
            .collect::<Vec<_>>()
            .concat(),
        _ => String::new(),
    }
}
