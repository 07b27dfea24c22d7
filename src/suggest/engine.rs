//! The suggestion engine: catalog maintenance, session routing, and the
//! query pipeline (tokenize → segment → rank per window → combine).

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde::{Deserialize, Serialize};

use crate::catalog::{Field, Suggestion, ToolSpec};
use crate::error::{AppError, Result};

use super::index::InvertedIndex;
use super::ranker::{rank_window, QueryWindow};
use super::segmenter::{resolve_separators, Segmenter};
use super::session::SessionStore;
use super::tokenizer::{ends_in_word_char, normalize, Tokenizer};
use super::trie::Trie;

/// How scores of a tool matched in several intent windows are merged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CombineStrategy {
    #[default]
    Max,
    Sum,
}

/// Engine construction parameters. Invalid values fail construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineOptions {
    pub top_k: usize,
    pub max_intents: usize,
    /// `None` selects the built-in separator defaults; a provided list (even
    /// an empty one) overrides them.
    pub intent_separator_tokens: Option<Vec<String>>,
    pub combine_strategy: CombineStrategy,
    pub min_score: f64,
    pub locales: Vec<String>,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            top_k: 5,
            max_intents: 1,
            intent_separator_tokens: None,
            combine_strategy: CombineStrategy::Max,
            min_score: 1.0,
            locales: vec!["pt".to_string(), "en".to_string()],
        }
    }
}

impl EngineOptions {
    pub fn validate(&self) -> Result<()> {
        if self.top_k == 0 {
            return Err(AppError::ConfigInvalid("top_k must be at least 1".into()));
        }
        if self.max_intents == 0 {
            return Err(AppError::ConfigInvalid(
                "max_intents must be at least 1".into(),
            ));
        }
        if !self.min_score.is_finite() || self.min_score < 0.0 {
            return Err(AppError::ConfigInvalid(
                "min_score must be a finite value >= 0".into(),
            ));
        }
        Ok(())
    }
}

/// Outcome of a catalog mutation; rejected specs never destabilize state.
#[derive(Debug, Default)]
pub struct AddReport {
    pub added: usize,
    pub rejected: Vec<AppError>,
}

/// Catalog, trie, and inverted index, swapped together under one lock so a
/// ranking pass always sees the three structures in a consistent state.
#[derive(Default)]
struct CatalogIndex {
    tools: HashMap<String, ToolSpec>,
    order: Vec<String>,
    trie: Trie,
    index: InvertedIndex,
    terms_by_tool: HashMap<String, Vec<String>>,
}

impl CatalogIndex {
    fn insert(&mut self, spec: ToolSpec, tokenizer: &Tokenizer) {
        let terms_by_field = extract_terms_by_field(&spec, tokenizer);
        let distinct = self.index.add_tool(&spec.name, &terms_by_field);
        for term in &distinct {
            self.trie.insert(term);
        }
        self.terms_by_tool.insert(spec.name.clone(), distinct);
        self.order.push(spec.name.clone());
        self.tools.insert(spec.name.clone(), spec);
    }

    fn remove(&mut self, name: &str) -> bool {
        if self.tools.remove(name).is_none() {
            return false;
        }
        self.order.retain(|n| n != name);
        let terms = self.terms_by_tool.remove(name).unwrap_or_default();
        for dead in self.index.remove_tool(name, &terms) {
            self.trie.remove(&dead);
        }
        true
    }
}

/// Normalized per-field term lists for one tool.
fn extract_terms_by_field(spec: &ToolSpec, tokenizer: &Tokenizer) -> Vec<(Field, Vec<String>)> {
    let mut keywords = Vec::new();
    for keyword in &spec.keywords {
        keywords.extend(tokenizer.index_terms(keyword));
    }
    let mut aliases = Vec::new();
    for alias in &spec.aliases {
        aliases.extend(tokenizer.index_terms(alias));
    }
    vec![
        (Field::Name, tokenizer.index_terms(&spec.name)),
        (Field::Description, tokenizer.index_terms(&spec.description)),
        (Field::Keywords, keywords),
        (Field::Aliases, aliases),
    ]
}

/// Lexical suggestion engine over a dynamic tool catalog.
///
/// Reads (`submit`, `feed`) take the catalog read lock for a single ranking
/// pass; catalog writes (`add_tools`, `remove_tool`) are serialized behind
/// the write lock. Session buffers live in their own store and never affect
/// another session's results.
pub struct SuggestionEngine {
    options: EngineOptions,
    tokenizer: Tokenizer,
    segmenter: Segmenter,
    catalog: RwLock<CatalogIndex>,
    sessions: SessionStore,
}

impl SuggestionEngine {
    pub fn new(tools: Vec<ToolSpec>, options: EngineOptions) -> Result<Self> {
        options.validate()?;
        let tokenizer = Tokenizer::new(&options.locales);
        let separators = resolve_separators(options.intent_separator_tokens.as_deref());
        let segmenter = Segmenter::new(separators, options.max_intents);
        let engine = Self {
            options,
            tokenizer,
            segmenter,
            catalog: RwLock::new(CatalogIndex::default()),
            sessions: SessionStore::new(),
        };
        let report = engine.add_tools(tools);
        if !report.rejected.is_empty() {
            tracing::warn!(
                rejected = report.rejected.len(),
                "Catalog contained rejected tool specs"
            );
        }
        Ok(engine)
    }

    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    /// Replace the session buffer and rank the full text as finalized input.
    pub fn submit(&self, text: &str, session_id: &str) -> Vec<Suggestion> {
        self.sessions.replace(session_id, text);
        self.suggest(text, false)
    }

    /// Append a delta to the session buffer and rank the live buffer; the
    /// trailing token is treated as a prefix unless the buffer ends at a
    /// token boundary or on a separator.
    pub fn feed(&self, delta: &str, session_id: &str) -> Vec<Suggestion> {
        let buffer = self.sessions.append(session_id, delta);
        self.suggest(&buffer, true)
    }

    /// Drop the session. Unknown ids are a no-op.
    pub fn reset(&self, session_id: &str) {
        self.sessions.remove(session_id);
    }

    /// Current buffer of a session, if any. Mostly useful in tests.
    pub fn session_buffer(&self, session_id: &str) -> Option<String> {
        self.sessions.buffer(session_id)
    }

    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    /// Insert tools incrementally. Specs with an empty name or a name already
    /// in the catalog are rejected and reported; the rest are indexed.
    pub fn add_tools(&self, specs: impl IntoIterator<Item = ToolSpec>) -> AddReport {
        let mut catalog = self.write_catalog();
        let mut report = AddReport::default();
        for spec in specs {
            if spec.name.trim().is_empty() {
                tracing::warn!("Skipping tool spec with empty name");
                report
                    .rejected
                    .push(AppError::ValidationError("tool name must be non-empty".into()));
                continue;
            }
            if catalog.tools.contains_key(&spec.name) {
                tracing::warn!(tool = %spec.name, "Skipping duplicate tool spec");
                report.rejected.push(AppError::DuplicateTool(spec.name));
                continue;
            }
            catalog.insert(spec, &self.tokenizer);
            report.added += 1;
        }
        if report.added > 0 {
            tracing::debug!(
                added = report.added,
                total = catalog.tools.len(),
                "Catalog updated"
            );
        }
        report
    }

    /// Remove a tool and all of its postings.
    pub fn remove_tool(&self, name: &str) -> Result<()> {
        let mut catalog = self.write_catalog();
        if catalog.remove(name) {
            tracing::debug!(tool = %name, total = catalog.tools.len(), "Tool removed");
            Ok(())
        } else {
            Err(AppError::UnknownTool(name.to_string()))
        }
    }

    pub fn tool_count(&self) -> usize {
        self.read_catalog().tools.len()
    }

    /// Catalog snapshot in insertion order.
    pub fn tool_specs(&self) -> Vec<ToolSpec> {
        let catalog = self.read_catalog();
        catalog
            .order
            .iter()
            .filter_map(|name| catalog.tools.get(name).cloned())
            .collect()
    }

    /// Run the pipeline on `text`. `live` marks an un-submitted buffer whose
    /// trailing token may still be mid-word.
    fn suggest(&self, text: &str, live: bool) -> Vec<Suggestion> {
        if normalize(text).chars().count() < 2 {
            return Vec::new();
        }
        let raw_tokens = self.tokenizer.tokens(text);
        if raw_tokens.is_empty() {
            return Vec::new();
        }

        let prefix_mode = live
            && ends_in_word_char(text)
            && raw_tokens
                .last()
                .is_some_and(|t| !self.segmenter.is_separator(t));

        let token_windows = self.segmenter.split(&raw_tokens);
        let last_idx = token_windows.len().saturating_sub(1);
        let mut windows: Vec<QueryWindow> = Vec::new();
        for (idx, &window_tokens) in token_windows.iter().enumerate() {
            let (body, prefix): (&[String], Option<&String>) = if idx == last_idx && prefix_mode {
                match window_tokens.split_last() {
                    Some((last, rest)) => (rest, Some(last)),
                    None => (window_tokens, None),
                }
            } else {
                (window_tokens, None)
            };
            let complete: Vec<String> = body
                .iter()
                .filter(|t| !self.tokenizer.is_stopword(t))
                .cloned()
                .collect();
            // the prefix token is exempt from stopword filtering
            let prefix = prefix.cloned();
            if !complete.is_empty() || prefix.is_some() {
                windows.push(QueryWindow { complete, prefix });
            }
        }
        if windows.is_empty() {
            return Vec::new();
        }

        let catalog = self.read_catalog();
        let window_cap = self.options.top_k * windows.len();

        // window scores merged per tool; clauses concatenate in window order
        // with adjacent duplicates dropped
        struct Combined {
            score: f64,
            clauses: Vec<String>,
        }
        let mut combined: HashMap<String, Combined> = HashMap::new();

        for window in &windows {
            let ranked = rank_window(
                &catalog.index,
                &catalog.trie,
                window,
                self.options.min_score,
                window_cap,
            );
            for tool in ranked {
                let entry = combined.entry(tool.name).or_insert(Combined {
                    score: 0.0,
                    clauses: Vec::new(),
                });
                entry.score = match self.options.combine_strategy {
                    CombineStrategy::Max => entry.score.max(tool.score),
                    CombineStrategy::Sum => entry.score + tool.score,
                };
                for clause in &tool.clauses {
                    let rendered = clause.render();
                    if entry.clauses.last() != Some(&rendered) {
                        entry.clauses.push(rendered);
                    }
                }
            }
        }

        let mut ranked: Vec<(String, Combined)> = combined.into_iter().collect();
        ranked.sort_by(|(a_name, a), (b_name, b)| {
            b.score
                .total_cmp(&a.score)
                .then_with(|| b.clauses.len().cmp(&a.clauses.len()))
                .then_with(|| a_name.cmp(b_name))
        });
        ranked.truncate(self.options.top_k);

        ranked
            .into_iter()
            .filter_map(|(name, entry)| {
                let spec = catalog.tools.get(&name)?;
                Some(Suggestion::from_spec(
                    spec,
                    entry.score,
                    entry.clauses.join("; "),
                ))
            })
            .collect()
    }

    fn read_catalog(&self) -> RwLockReadGuard<'_, CatalogIndex> {
        self.catalog.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_catalog(&self) -> RwLockWriteGuard<'_, CatalogIndex> {
        self.catalog.write().unwrap_or_else(PoisonError::into_inner)
    }
}
