//! Term → tool inverted index with field-weighted postings and smoothed IDF.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use crate::catalog::Field;

/// One (term, tool) record: the source field fixes the weight, `tf` counts
/// occurrences of the term in that field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Posting {
    pub tool: String,
    pub field: Field,
    pub tf: u32,
}

#[derive(Debug, Default)]
pub struct InvertedIndex {
    postings: HashMap<String, Vec<Posting>>,
    doc_freq: HashMap<String, usize>,
    num_tools: usize,
}

impl InvertedIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index one tool from its per-field term lists. Returns the distinct
    /// terms touched, which callers feed to the trie and keep for removal.
    pub fn add_tool(&mut self, tool: &str, terms_by_field: &[(Field, Vec<String>)]) -> Vec<String> {
        let mut tf: HashMap<(&str, Field), u32> = HashMap::new();
        for (field, terms) in terms_by_field {
            for term in terms {
                *tf.entry((term.as_str(), *field)).or_insert(0) += 1;
            }
        }

        let mut distinct: Vec<String> = Vec::new();
        for ((term, field), count) in tf {
            let entry = self.postings.entry(term.to_string()).or_default();
            entry.push(Posting {
                tool: tool.to_string(),
                field,
                tf: count,
            });
            if !distinct.iter().any(|t| t == term) {
                distinct.push(term.to_string());
                *self.doc_freq.entry(term.to_string()).or_insert(0) += 1;
            }
        }
        self.num_tools += 1;
        distinct
    }

    /// Drop every posting of `tool` for the given terms. Returns the terms
    /// whose document frequency reached zero, so the caller can soft-remove
    /// them from the trie.
    pub fn remove_tool(&mut self, tool: &str, terms: &[String]) -> Vec<String> {
        let mut dead = Vec::new();
        for term in terms {
            if let Entry::Occupied(mut posts) = self.postings.entry(term.clone()) {
                posts.get_mut().retain(|p| p.tool != tool);
                if posts.get().is_empty() {
                    posts.remove();
                }
            }
            if let Entry::Occupied(mut df) = self.doc_freq.entry(term.clone()) {
                *df.get_mut() = df.get().saturating_sub(1);
                if *df.get() == 0 {
                    df.remove();
                    dead.push(term.clone());
                }
            }
        }
        self.num_tools = self.num_tools.saturating_sub(1);
        dead
    }

    pub fn postings(&self, term: &str) -> Option<&[Posting]> {
        self.postings.get(term).map(Vec::as_slice)
    }

    pub fn doc_freq(&self, term: &str) -> usize {
        self.doc_freq.get(term).copied().unwrap_or(0)
    }

    pub fn num_tools(&self) -> usize {
        self.num_tools
    }

    /// Smoothed inverse document frequency, always ≥ 1 for unseen terms.
    pub fn idf(&self, term: &str) -> f64 {
        let n = self.num_tools as f64;
        let df = self.doc_freq(term) as f64;
        ((n + 1.0) / (df + 1.0)).ln() + 1.0
    }
}
