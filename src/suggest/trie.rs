//! Character-keyed prefix tree over indexed terms.
//!
//! Children are kept in a `BTreeMap` so prefix expansion walks depth-first in
//! ascending character order, which makes the (capped) expansion output
//! deterministic across runs.

use std::collections::BTreeMap;

/// Hard cap on prefix expansion, a latency guard for very short prefixes.
pub const PREFIX_EXPANSION_LIMIT: usize = 64;

#[derive(Debug, Default)]
struct TrieNode {
    children: BTreeMap<char, TrieNode>,
    terminal: bool,
}

#[derive(Debug, Default)]
pub struct Trie {
    root: TrieNode,
}

impl Trie {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a term, marking its final node terminal. Idempotent.
    pub fn insert(&mut self, term: &str) {
        let mut node = &mut self.root;
        for ch in term.chars() {
            node = node.children.entry(ch).or_default();
        }
        node.terminal = true;
    }

    /// Soft-delete: unmark the terminal without pruning nodes.
    pub fn remove(&mut self, term: &str) {
        let mut node = &mut self.root;
        for ch in term.chars() {
            match node.children.get_mut(&ch) {
                Some(child) => node = child,
                None => return,
            }
        }
        node.terminal = false;
    }

    /// Up to `limit` terminal terms starting with `prefix`, in depth-first
    /// ascending-character order. The prefix itself is included when it is an
    /// indexed term.
    pub fn prefix_terms(&self, prefix: &str, limit: usize) -> Vec<String> {
        let mut node = &self.root;
        for ch in prefix.chars() {
            match node.children.get(&ch) {
                Some(child) => node = child,
                None => return Vec::new(),
            }
        }
        let mut out = Vec::new();
        let mut buf = prefix.to_string();
        collect_terms(node, &mut buf, &mut out, limit);
        out
    }
}

fn collect_terms(node: &TrieNode, buf: &mut String, out: &mut Vec<String>, limit: usize) {
    if out.len() >= limit {
        return;
    }
    if node.terminal {
        out.push(buf.clone());
    }
    for (&ch, child) in &node.children {
        if out.len() >= limit {
            break;
        }
        buf.push(ch);
        collect_terms(child, buf, out, limit);
        buf.pop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build(terms: &[&str]) -> Trie {
        let mut trie = Trie::new();
        for t in terms {
            trie.insert(t);
        }
        trie
    }

    #[test]
    fn prefix_terms_basic() {
        let trie = build(&["exportar", "csv", "baixar"]);
        assert_eq!(trie.prefix_terms("expor", 64), vec!["exportar"]);
        assert_eq!(trie.prefix_terms("cs", 64), vec!["csv"]);
        assert_eq!(trie.prefix_terms("bai", 64), vec!["baixar"]);
        assert!(trie.prefix_terms("zzz", 64).is_empty());
    }

    #[test]
    fn prefix_includes_exact_term_first() {
        let trie = build(&["export", "exporter", "exported"]);
        let terms = trie.prefix_terms("export", 64);
        assert_eq!(terms, vec!["export", "exported", "exporter"]);
    }

    #[test]
    fn expansion_order_is_deterministic_and_sorted() {
        let trie = build(&["send", "search", "select", "sea"]);
        let terms = trie.prefix_terms("se", 64);
        assert_eq!(terms, vec!["sea", "search", "select", "send"]);
    }

    #[test]
    fn limit_caps_expansion() {
        let mut trie = Trie::new();
        for i in 0..100 {
            trie.insert(&format!("term{i:03}"));
        }
        assert_eq!(trie.prefix_terms("term", 64).len(), 64);
        assert_eq!(trie.prefix_terms("term", 5).len(), 5);
    }

    #[test]
    fn insert_is_idempotent() {
        let mut trie = Trie::new();
        trie.insert("csv");
        trie.insert("csv");
        assert_eq!(trie.prefix_terms("c", 64), vec!["csv"]);
    }

    #[test]
    fn remove_soft_deletes_the_terminal() {
        let mut trie = build(&["export", "exported"]);
        trie.remove("export");
        assert_eq!(trie.prefix_terms("exp", 64), vec!["exported"]);
        // removing an unknown term is a no-op
        trie.remove("missing");
        assert_eq!(trie.prefix_terms("exp", 64), vec!["exported"]);
        // re-insert restores the terminal
        trie.insert("export");
        assert_eq!(trie.prefix_terms("exp", 64), vec!["export", "exported"]);
    }
}
