//! Per-window scoring over the inverted index and trie.
//!
//! Complete query terms are looked up directly; the trailing prefix token of
//! a live buffer is expanded through the trie (capped) with its length bonus
//! damped in proportion to how much of the completion was actually typed.

use std::cmp::Ordering;
use std::collections::HashMap;

use crate::catalog::Field;

use super::index::InvertedIndex;
use super::trie::{Trie, PREFIX_EXPANSION_LIMIT};

/// One window of query terms, already stopword-filtered. `prefix` is the
/// trailing partial token when the window closes a live buffer.
#[derive(Debug, Clone, Default)]
pub struct QueryWindow {
    pub complete: Vec<String>,
    pub prefix: Option<String>,
}

/// One matched-term explanation: the term plus the fields it matched,
/// heaviest field first.
#[derive(Debug, Clone, PartialEq)]
pub struct ReasonClause {
    pub term: String,
    pub fields: Vec<Field>,
}

impl ReasonClause {
    pub fn render(&self) -> String {
        let fields: Vec<&str> = self.fields.iter().map(|f| f.as_str()).collect();
        format!("{}: {}", self.term, fields.join(","))
    }
}

/// A tool scored within a single window.
#[derive(Debug, Clone)]
pub struct RankedTool {
    pub name: String,
    pub score: f64,
    pub matched_terms: usize,
    /// Clauses ordered by descending contribution.
    pub clauses: Vec<ReasonClause>,
}

/// Longer terms are slightly more informative.
fn length_bonus(term: &str) -> f64 {
    1.0 + 0.1 * (term.chars().count().saturating_sub(3)) as f64
}

struct Accumulator {
    score: f64,
    matched_terms: usize,
    // (contribution, clause) for post-hoc ordering
    clauses: Vec<(f64, ReasonClause)>,
}

/// Rank a single window: gather query terms (with prefix expansion), sum
/// per-tool contributions, cut below `min_score`, sort, truncate to `cap`.
pub fn rank_window(
    index: &InvertedIndex,
    trie: &Trie,
    window: &QueryWindow,
    min_score: f64,
    cap: usize,
) -> Vec<RankedTool> {
    // (term, damp factor on the length bonus); a term contributes once per
    // window no matter how often it occurs in the query
    let mut query_terms: Vec<(String, f64)> = Vec::new();
    for term in &window.complete {
        if !query_terms.iter().any(|(t, _)| t == term) {
            query_terms.push((term.clone(), 1.0));
        }
    }
    if let Some(prefix) = &window.prefix {
        let typed = prefix.chars().count() as f64;
        for expansion in trie.prefix_terms(prefix, PREFIX_EXPANSION_LIMIT) {
            if query_terms.iter().any(|(t, _)| t == &expansion) {
                continue;
            }
            let full = expansion.chars().count() as f64;
            let damp = (typed / full).min(1.0);
            query_terms.push((expansion, damp));
        }
    }
    if query_terms.is_empty() {
        return Vec::new();
    }

    let mut by_tool: HashMap<String, Accumulator> = HashMap::new();
    for (term, damp) in &query_terms {
        let Some(postings) = index.postings(term) else {
            continue;
        };
        let idf = index.idf(term);
        let bonus = length_bonus(term) * damp;

        // fold this term's postings per tool before scoring
        let mut per_tool: HashMap<&str, (f64, Vec<Field>)> = HashMap::new();
        for posting in postings {
            let entry = per_tool.entry(posting.tool.as_str()).or_insert((0.0, Vec::new()));
            entry.0 += posting.field.weight() * f64::from(posting.tf);
            if !entry.1.contains(&posting.field) {
                entry.1.push(posting.field);
            }
        }

        for (tool, (weighted_tf, mut fields)) in per_tool {
            let contribution = weighted_tf * idf * bonus;
            fields.sort_by(|a, b| {
                b.weight()
                    .total_cmp(&a.weight())
                    .then_with(|| a.as_str().cmp(b.as_str()))
            });
            let acc = by_tool.entry(tool.to_string()).or_insert(Accumulator {
                score: 0.0,
                matched_terms: 0,
                clauses: Vec::new(),
            });
            acc.score += contribution;
            acc.matched_terms += 1;
            acc.clauses.push((
                contribution,
                ReasonClause {
                    term: term.clone(),
                    fields,
                },
            ));
        }
    }

    let mut ranked: Vec<RankedTool> = by_tool
        .into_iter()
        .filter(|(_, acc)| acc.score >= min_score)
        .map(|(name, mut acc)| {
            acc.clauses.sort_by(|a, b| {
                b.0.total_cmp(&a.0).then_with(|| a.1.term.cmp(&b.1.term))
            });
            RankedTool {
                name,
                score: acc.score,
                matched_terms: acc.matched_terms,
                clauses: acc.clauses.into_iter().map(|(_, c)| c).collect(),
            }
        })
        .collect();

    ranked.sort_by(compare_ranked);
    ranked.truncate(cap);
    ranked
}

/// Score descending, then matched-term count descending, then name ascending.
pub fn compare_ranked(a: &RankedTool, b: &RankedTool) -> Ordering {
    b.score
        .total_cmp(&a.score)
        .then_with(|| b.matched_terms.cmp(&a.matched_terms))
        .then_with(|| a.name.cmp(&b.name))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture() -> (InvertedIndex, Trie) {
        let mut index = InvertedIndex::new();
        let mut trie = Trie::new();
        for terms in [
            (
                "export_csv",
                vec![
                    (Field::Name, vec!["export".to_string(), "csv".to_string()]),
                    (
                        Field::Keywords,
                        vec!["export".to_string(), "csv".to_string(), "file".to_string()],
                    ),
                ],
            ),
            (
                "send_email",
                vec![
                    (Field::Name, vec!["send".to_string(), "email".to_string()]),
                    (
                        Field::Keywords,
                        vec!["email".to_string(), "send".to_string()],
                    ),
                ],
            ),
        ] {
            let inserted = index.add_tool(terms.0, &terms.1);
            for term in inserted {
                trie.insert(&term);
            }
        }
        (index, trie)
    }

    fn window(complete: &[&str], prefix: Option<&str>) -> QueryWindow {
        QueryWindow {
            complete: complete.iter().map(|s| s.to_string()).collect(),
            prefix: prefix.map(str::to_string),
        }
    }

    #[test]
    fn exact_terms_rank_the_matching_tool_first() {
        let (index, trie) = fixture();
        let ranked = rank_window(&index, &trie, &window(&["export", "csv"], None), 1.0, 3);
        assert_eq!(ranked[0].name, "export_csv");
        assert_eq!(ranked[0].matched_terms, 2);
        assert!(ranked.iter().all(|r| r.name != "send_email"));
    }

    #[test]
    fn prefix_expansion_reaches_the_tool() {
        let (index, trie) = fixture();
        let ranked = rank_window(&index, &trie, &window(&[], Some("exp")), 1.0, 3);
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].name, "export_csv");
    }

    #[test]
    fn prefix_damping_lowers_the_contribution() {
        let (index, trie) = fixture();
        let full = rank_window(&index, &trie, &window(&["export"], None), 0.0, 3);
        let partial = rank_window(&index, &trie, &window(&[], Some("exp")), 0.0, 3);
        let full_score = full.iter().find(|r| r.name == "export_csv").unwrap().score;
        let partial_score = partial
            .iter()
            .find(|r| r.name == "export_csv")
            .unwrap()
            .score;
        assert!(partial_score < full_score);
        // damp factor is len("exp")/len("export") applied to the bonus only
        let expected = full_score / length_bonus("export") * (length_bonus("export") * 0.5);
        assert!((partial_score - expected).abs() < 1e-9);
    }

    #[test]
    fn duplicate_query_terms_contribute_once() {
        let (index, trie) = fixture();
        let once = rank_window(&index, &trie, &window(&["export"], None), 0.0, 3);
        let twice = rank_window(&index, &trie, &window(&["export", "export"], None), 0.0, 3);
        assert!((once[0].score - twice[0].score).abs() < 1e-9);
    }

    #[test]
    fn min_score_drops_weak_matches() {
        let (index, trie) = fixture();
        let ranked = rank_window(&index, &trie, &window(&["export"], None), 1e9, 3);
        assert!(ranked.is_empty());
    }

    #[test]
    fn reason_clauses_are_ordered_by_contribution() {
        let (index, trie) = fixture();
        let ranked = rank_window(&index, &trie, &window(&["file", "export"], None), 0.0, 3);
        let top = &ranked[0];
        assert_eq!(top.name, "export_csv");
        // "export" hits name+keywords, "file" only keywords, so export leads
        assert_eq!(top.clauses[0].term, "export");
        assert_eq!(top.clauses[0].render(), "export: name,keywords");
        assert_eq!(top.clauses[1].render(), "file: keywords");
    }

    #[test]
    fn ties_break_on_matched_terms_then_name() {
        let mut index = InvertedIndex::new();
        let trie = Trie::new();
        index.add_tool("b_tool", &[(Field::Keywords, vec!["alpha".to_string()])]);
        index.add_tool("a_tool", &[(Field::Keywords, vec!["alpha".to_string()])]);
        let ranked = rank_window(&index, &trie, &window(&["alpha"], None), 0.0, 5);
        assert_eq!(ranked[0].name, "a_tool");
        assert_eq!(ranked[1].name, "b_tool");
    }

    #[test]
    fn length_bonus_grows_past_three_chars() {
        assert!((length_bonus("csv") - 1.0).abs() < 1e-9);
        assert!((length_bonus("send") - 1.1).abs() < 1e-9);
        assert!((length_bonus("export") - 1.3).abs() < 1e-9);
    }
}
