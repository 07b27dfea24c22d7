//! Type definitions for the tool catalog.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Reserved name prefixes that mark a tool as MCP-backed. This is a naming
/// convention applied at output time only and never affects matching.
const MCP_PREFIXES: [&str; 4] = ["db.", "api.", "mcp.", "filesystem."];

/// A declared capability the engine may suggest.
///
/// `name` doubles as the unique identifier within a catalog and the default
/// result label. All other fields are optional; `args_schema` is opaque and
/// passed through unchanged to results as `arguments_template`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolSpec {
    /// Unique tool identifier (non-empty).
    pub name: String,

    /// Human-readable prose describing what the tool does.
    #[serde(default)]
    pub description: String,

    /// Explicit match keywords. Insertion order carries no meaning.
    #[serde(default)]
    pub keywords: Vec<String>,

    /// Alternative names for the tool.
    #[serde(default)]
    pub aliases: Vec<String>,

    /// Surfaced in result metadata; never indexed for matching.
    #[serde(default)]
    pub tags: Vec<String>,

    /// Opaque argument schema, echoed back as `arguments_template`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub args_schema: Option<Value>,

    /// Locale hints for the tokenizer. Tools still match in other locales.
    #[serde(default)]
    pub locales: Vec<String>,
}

impl ToolSpec {
    /// Minimal constructor used by tests and the demo catalog.
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            keywords: Vec::new(),
            aliases: Vec::new(),
            tags: Vec::new(),
            args_schema: None,
            locales: Vec::new(),
        }
    }

    pub fn with_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keywords = keywords.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_aliases<I, S>(mut self, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.aliases = aliases.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }
}

/// Output labeling convention derived from the tool name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolKind {
    Tool,
    Mcp,
}

impl ToolKind {
    pub fn for_name(name: &str) -> Self {
        if MCP_PREFIXES.iter().any(|p| name.starts_with(p)) {
            Self::Mcp
        } else {
            Self::Tool
        }
    }
}

/// Indexed source field of a posting. The field determines the posting weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    Name,
    Description,
    Keywords,
    Aliases,
}

impl Field {
    /// Fixed per-field match weight.
    pub fn weight(self) -> f64 {
        match self {
            Field::Name => 3.0,
            Field::Aliases => 2.5,
            Field::Keywords => 2.0,
            Field::Description => 1.0,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::Description => "description",
            Field::Keywords => "keywords",
            Field::Aliases => "aliases",
        }
    }
}

/// A ranked result returned by the engine.
#[derive(Debug, Clone, Serialize)]
pub struct Suggestion {
    pub id: String,
    pub kind: ToolKind,
    pub score: f64,
    pub label: String,
    /// Human-readable explanation, one `term: fields` clause per matched term.
    pub reason: String,
    pub arguments_template: Value,
    /// Open sub-map for forward-compatible annotations (currently `tags`).
    pub metadata: Map<String, Value>,
}

impl Suggestion {
    /// Build a suggestion for `spec` with the given score and reason.
    pub fn from_spec(spec: &ToolSpec, score: f64, reason: String) -> Self {
        let mut metadata = Map::new();
        if !spec.tags.is_empty() {
            metadata.insert(
                "tags".to_string(),
                Value::Array(spec.tags.iter().cloned().map(Value::String).collect()),
            );
        }
        Self {
            id: spec.name.clone(),
            kind: ToolKind::for_name(&spec.name),
            score,
            label: spec.name.clone(),
            reason,
            arguments_template: spec
                .args_schema
                .clone()
                .unwrap_or_else(|| Value::Object(Map::new())),
            metadata,
        }
    }
}
