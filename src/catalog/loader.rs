//! Catalog ingestion from JSON files.
//!
//! Individual malformed entries are logged and skipped (partial success
//! model); a file in which every entry fails is treated as a structural
//! problem and rejected.

use std::path::Path;

use serde_json::Value;

use crate::catalog::types::ToolSpec;
use crate::error::{AppError, Result};

/// Read and parse a catalog file.
pub fn load_tools_file(path: &Path) -> Result<Vec<ToolSpec>> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        AppError::CatalogError(format!(
            "Failed to read tools file '{}': {}",
            path.display(),
            e
        ))
    })?;
    let json: Value = serde_json::from_str(&content)
        .map_err(|e| AppError::CatalogError(format!("Invalid JSON in tools file: {}", e)))?;
    parse_tools_json(&json)
}

/// Parse a catalog document: either a plain JSON array of tool specs or an
/// MCP `list_tools` JSON-RPC response (`result.tools[]`).
pub fn parse_tools_json(json: &Value) -> Result<Vec<ToolSpec>> {
    let entries = match json {
        Value::Array(entries) => entries.as_slice(),
        other => other
            .get("result")
            .and_then(|r| r.get("tools"))
            .and_then(|t| t.as_array())
            .map(Vec::as_slice)
            .ok_or_else(|| {
                AppError::CatalogError(
                    "Expected a JSON array of tool specs or a 'result.tools' array".into(),
                )
            })?,
    };

    let mut specs = Vec::with_capacity(entries.len());
    for (idx, entry) in entries.iter().enumerate() {
        match parse_entry(entry) {
            Ok(spec) => specs.push(spec),
            Err(e) => {
                tracing::warn!(index = idx, error = %e, "Skipping malformed tool definition");
            }
        }
    }

    if specs.is_empty() && !entries.is_empty() {
        return Err(AppError::CatalogError(
            "All tool definitions failed to parse".into(),
        ));
    }

    tracing::debug!(
        total = entries.len(),
        parsed = specs.len(),
        "Catalog parse complete"
    );
    Ok(specs)
}

/// Parse one entry, accepting either the native spec shape or an MCP tool
/// definition (whose `inputSchema` becomes `args_schema`).
fn parse_entry(entry: &Value) -> Result<ToolSpec> {
    let mut spec: ToolSpec = serde_json::from_value(entry.clone())
        .map_err(|e| AppError::CatalogError(format!("Invalid tool spec: {}", e)))?;
    if spec.name.trim().is_empty() {
        return Err(AppError::CatalogError(
            "Tool missing required 'name' field".into(),
        ));
    }
    if spec.args_schema.is_none() {
        if let Some(schema) = entry.get("inputSchema") {
            spec.args_schema = Some(schema.clone());
        }
    }
    Ok(spec)
}
