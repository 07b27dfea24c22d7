//! Tool catalog: spec/result types and JSON ingestion.
//!
//! The loader accepts both a plain array of tool specs and an MCP
//! `list_tools` JSON-RPC response, so a catalog file can be captured straight
//! from a server without reshaping.

pub mod loader;
pub mod types;

pub use loader::{load_tools_file, parse_tools_json};
pub use types::{Field, Suggestion, ToolKind, ToolSpec};
