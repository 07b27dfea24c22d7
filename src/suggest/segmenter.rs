//! Multi-intent segmentation of a token sequence.
//!
//! When more than one intent is allowed, separator tokens ("and", "then",
//! "e", "depois", ...) split the input into contiguous runs, each ranked as
//! an independent window. Consecutive separators never produce empty windows.

use std::collections::HashSet;

use super::tokenizer::normalize;

/// Default separators, English locale.
pub const ENGLISH_SEPARATORS: &[&str] = &["and", "then", "also", "or", "plus"];

/// Default separators, Portuguese locale (normalized forms).
pub const PORTUGUESE_SEPARATORS: &[&str] = &["e", "depois", "tambem", "ou"];

/// Resolve the separator set: a caller-provided list (even an empty one)
/// overrides the defaults. Entries are normalized so configuration may use
/// accented forms ("também").
pub fn resolve_separators(overrides: Option<&[String]>) -> HashSet<String> {
    let mut set = HashSet::new();
    match overrides {
        Some(tokens) => {
            for token in tokens {
                let norm = normalize(token);
                if !norm.is_empty() {
                    set.insert(norm);
                }
            }
        }
        None => {
            set.extend(ENGLISH_SEPARATORS.iter().map(|s| s.to_string()));
            set.extend(PORTUGUESE_SEPARATORS.iter().map(|s| s.to_string()));
        }
    }
    set
}

#[derive(Debug, Clone)]
pub struct Segmenter {
    separators: HashSet<String>,
    max_intents: usize,
}

impl Segmenter {
    pub fn new(separators: HashSet<String>, max_intents: usize) -> Self {
        Self {
            separators,
            max_intents: max_intents.max(1),
        }
    }

    pub fn is_separator(&self, token: &str) -> bool {
        self.max_intents > 1 && self.separators.contains(token)
    }

    /// Split `tokens` into up to `max_intents` windows, left to right. With a
    /// single allowed intent the whole sequence is one window and separators
    /// are ordinary tokens.
    pub fn split<'a>(&self, tokens: &'a [String]) -> Vec<&'a [String]> {
        if tokens.is_empty() {
            return Vec::new();
        }
        if self.max_intents <= 1 {
            return vec![tokens];
        }

        let mut windows: Vec<&[String]> = Vec::new();
        let mut start = 0;
        for (idx, token) in tokens.iter().enumerate() {
            if self.separators.contains(token.as_str()) {
                if start < idx {
                    windows.push(&tokens[start..idx]);
                }
                start = idx + 1;
            }
        }
        if start < tokens.len() {
            windows.push(&tokens[start..]);
        }
        windows.truncate(self.max_intents);
        windows
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toks(s: &str) -> Vec<String> {
        s.split_whitespace().map(str::to_string).collect()
    }

    fn segmenter(max_intents: usize) -> Segmenter {
        Segmenter::new(resolve_separators(None), max_intents)
    }

    #[test]
    fn single_intent_is_one_window() {
        let tokens = toks("export data and send email");
        let windows = segmenter(1).split(&tokens);
        assert_eq!(windows.len(), 1);
        assert_eq!(windows[0].len(), 5);
    }

    #[test]
    fn separators_split_windows() {
        let tokens = toks("export data and send email");
        let windows = segmenter(3).split(&tokens);
        assert_eq!(windows.len(), 2);
        assert_eq!(windows[0], toks("export data").as_slice());
        assert_eq!(windows[1], toks("send email").as_slice());
    }

    #[test]
    fn consecutive_separators_yield_no_empty_window() {
        let tokens = toks("export and and send");
        let windows = segmenter(3).split(&tokens);
        assert_eq!(windows.len(), 2);
        assert_eq!(windows[0], toks("export").as_slice());
        assert_eq!(windows[1], toks("send").as_slice());
    }

    #[test]
    fn excess_windows_are_dropped_left_to_right() {
        let tokens = toks("export then send then query then delete");
        let windows = segmenter(2).split(&tokens);
        assert_eq!(windows.len(), 2);
        assert_eq!(windows[0], toks("export").as_slice());
        assert_eq!(windows[1], toks("send").as_slice());
    }

    #[test]
    fn portuguese_separators_are_included_by_default() {
        let tokens = toks("exportar dados e enviar email");
        let windows = segmenter(3).split(&tokens);
        assert_eq!(windows.len(), 2);
    }

    #[test]
    fn override_replaces_defaults_even_when_empty() {
        let seg = Segmenter::new(resolve_separators(Some(&[])), 3);
        let tokens = toks("export and send");
        assert_eq!(seg.split(&tokens).len(), 1);

        let custom = resolve_separators(Some(&["também".to_string()]));
        assert!(custom.contains("tambem"));
        assert!(!custom.contains("and"));
    }

    #[test]
    fn leading_and_trailing_separators_are_absorbed() {
        let tokens = toks("and export data and");
        let windows = segmenter(3).split(&tokens);
        assert_eq!(windows.len(), 1);
        assert_eq!(windows[0], toks("export data").as_slice());
    }
}
