//! Text normalization, stopword filtering, and tokenization.
//!
//! Normalization lowercases, folds diacritics, and collapses every run of
//! characters outside `[a-z0-9]` into a single space, so that queries typed
//! with or without accents ("relatório" / "relatorio") index and match
//! identically. Stopword lists are intentionally small and published here as
//! stable constants, one per supported locale.

use std::collections::HashSet;

/// Minimal English stopword list, sorted for binary search.
pub const ENGLISH_STOPWORDS: &[&str] = &[
    "a", "an", "and", "are", "at", "but", "for", "from", "i", "in", "is", "like", "me", "my",
    "need", "of", "on", "or", "please", "the", "to", "want", "with", "would", "you",
];

/// Minimal Portuguese stopword list (normalized forms), sorted for binary search.
pub const PORTUGUESE_STOPWORDS: &[&str] = &[
    "a", "ao", "aos", "as", "com", "da", "das", "de", "desejo", "do", "dos", "e", "em", "eu",
    "favor", "gostaria", "me", "meu", "meus", "minha", "minhas", "na", "nas", "no", "nos", "o",
    "os", "ou", "para", "por", "pra", "preciso", "que", "quero", "sao", "um", "uma", "umas",
    "uns", "vou",
];

/// Stopword list for a language code, if one is bundled.
fn stopwords_for(locale: &str) -> Option<&'static [&'static str]> {
    // "pt-BR" and friends select by primary subtag
    let primary = locale.split('-').next().unwrap_or(locale);
    match primary.to_ascii_lowercase().as_str() {
        "en" => Some(ENGLISH_STOPWORDS),
        "pt" => Some(PORTUGUESE_STOPWORDS),
        _ => None,
    }
}

/// Fold a lowercase Latin character with diacritics to its base letter.
/// Covers the Latin-1 Supplement range, which is all the bundled locales use.
fn fold_diacritic(c: char) -> char {
    match c {
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' => 'a',
        'ç' => 'c',
        'è' | 'é' | 'ê' | 'ë' => 'e',
        'ì' | 'í' | 'î' | 'ï' => 'i',
        'ñ' => 'n',
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' => 'o',
        'ù' | 'ú' | 'û' | 'ü' => 'u',
        'ý' | 'ÿ' => 'y',
        other => other,
    }
}

/// Normalize text: lowercase, fold diacritics, collapse runs of characters
/// outside `[a-z0-9]` into a single space, trim.
pub fn normalize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pending_space = false;
    for c in text.chars().flat_map(char::to_lowercase) {
        let c = fold_diacritic(c);
        if c.is_ascii_alphanumeric() {
            if pending_space && !out.is_empty() {
                out.push(' ');
            }
            pending_space = false;
            out.push(c);
        } else {
            pending_space = true;
        }
    }
    out
}

/// True when the last character of `text` normalizes into a word character,
/// i.e. the buffer ends mid-token rather than at a boundary.
pub fn ends_in_word_char(text: &str) -> bool {
    text.chars()
        .last()
        .into_iter()
        .flat_map(char::to_lowercase)
        .last()
        .map(fold_diacritic)
        .is_some_and(|c| c.is_ascii_alphanumeric())
}

/// Noise tokens carry no matching signal: pure digit runs and long
/// single-character repeats (e.g. "aaaa" from a held key).
fn is_noise(token: &str) -> bool {
    if token.is_empty() {
        return true;
    }
    if token.bytes().all(|b| b.is_ascii_digit()) {
        return true;
    }
    let mut chars = token.chars();
    let first = chars.next().unwrap_or_default();
    token.chars().count() >= 4 && chars.all(|c| c == first)
}

/// Locale-aware tokenizer. Construction resolves the stopword set once; the
/// per-call operations are allocation-light and lock-free.
#[derive(Debug, Clone)]
pub struct Tokenizer {
    stopwords: HashSet<&'static str>,
}

impl Tokenizer {
    /// Build a tokenizer for the given language codes. Unknown locales are
    /// ignored rather than rejected, so catalogs can carry hints for
    /// languages without a bundled stopword list.
    pub fn new<S: AsRef<str>>(locales: &[S]) -> Self {
        let mut stopwords = HashSet::new();
        for locale in locales {
            if let Some(list) = stopwords_for(locale.as_ref()) {
                stopwords.extend(list.iter().copied());
            }
        }
        Self { stopwords }
    }

    pub fn is_stopword(&self, token: &str) -> bool {
        self.stopwords.contains(token)
    }

    /// Ordered tokens of `text` after normalization and noise filtering.
    /// Stopwords are retained; positional filtering is the caller's call
    /// because the trailing token of a live buffer is exempt.
    pub fn tokens(&self, text: &str) -> Vec<String> {
        normalize(text)
            .split_whitespace()
            .filter(|t| !is_noise(t))
            .map(str::to_string)
            .collect()
    }

    /// Tokens suitable for indexing a catalog field: stopwords dropped.
    pub fn index_terms(&self, text: &str) -> Vec<String> {
        self.tokens(text)
            .into_iter()
            .filter(|t| !self.is_stopword(t))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pt_en() -> Tokenizer {
        Tokenizer::new(&["pt", "en"])
    }

    #[test]
    fn normalize_lowercases_and_folds_accents() {
        assert_eq!(normalize("Relatório Ação"), "relatorio acao");
        assert_eq!(normalize("É"), "e");
    }

    #[test]
    fn normalize_collapses_punctuation_runs() {
        assert_eq!(normalize("export -- csv!!"), "export csv");
        assert_eq!(normalize("  a\t b  "), "a b");
        assert_eq!(normalize("...!"), "");
    }

    #[test]
    fn tokens_keep_order_and_drop_noise() {
        let tok = pt_en();
        assert_eq!(tok.tokens("123 0000 !!!!"), Vec::<String>::new());
        assert_eq!(tok.tokens("s3 bucket 0000"), vec!["s3", "bucket"]);
        assert_eq!(
            tok.tokens("Preciso exportar tabela"),
            vec!["preciso", "exportar", "tabela"]
        );
    }

    #[test]
    fn index_terms_drop_stopwords_in_both_locales() {
        let tok = pt_en();
        let terms = tok.index_terms("Olá, eu gostaria de exportar meus dados para csv");
        assert!(terms.contains(&"exportar".to_string()));
        assert!(terms.contains(&"dados".to_string()));
        assert!(terms.contains(&"csv".to_string()));
        assert!(!terms.contains(&"eu".to_string()));
        assert!(!terms.contains(&"gostaria".to_string()));

        let terms = tok.index_terms("send an email to the team");
        assert_eq!(terms, vec!["send", "email", "team"]);
    }

    #[test]
    fn unknown_locale_keeps_everything() {
        let tok = Tokenizer::new(&["de"]);
        assert_eq!(tok.tokens("der hund"), vec!["der", "hund"]);
        assert!(!tok.is_stopword("der"));
    }

    #[test]
    fn repeated_char_tokens_are_noise() {
        let tok = pt_en();
        assert_eq!(tok.tokens("aaaa bbbb real"), vec!["real"]);
        // three repeats is still a word
        assert_eq!(tok.tokens("aaa"), vec!["aaa"]);
    }

    #[test]
    fn ends_in_word_char_tracks_the_buffer_tail() {
        assert!(ends_in_word_char("expor"));
        assert!(ends_in_word_char("relatóri"));
        assert!(!ends_in_word_char("export "));
        assert!(!ends_in_word_char("export,"));
        assert!(!ends_in_word_char(""));
    }

    #[test]
    fn stopword_lists_are_sorted_and_normalized() {
        for list in [ENGLISH_STOPWORDS, PORTUGUESE_STOPWORDS] {
            for pair in list.windows(2) {
                assert!(pair[0] < pair[1], "{} >= {}", pair[0], pair[1]);
            }
            for word in list {
                assert_eq!(normalize(word), *word);
            }
        }
    }
}
