//! Term frequency tables and term sets.
//!
//! A *term* is a lowercased, whitespace-delimited token. Separators are Unicode
//! whitespace plus the ASCII information separators U+001C..=U+001F. Nothing else happens here:
//! no stopword removal, no stemming, no punctuation stripping. Callers wanting those
//! should preprocess text before it reaches the ranker.

use std::collections::{HashMap, HashSet};

fn is_separator(c: char) -> bool {
    c.is_whitespace() || ('\u{1c}'..='\u{1f}').contains(&c)
}

fn raw_tokens(text: &str) -> impl Iterator<Item = &str> + '_ {
    text.split(is_separator).filter(|t| !t.is_empty())
}

/// Split `text` into terms: split on separators, then lowercase.
pub fn tokenize(text: &str) -> impl Iterator<Item = String> + '_ {
    raw_tokens(text).map(str::to_lowercase)
}

/// Number of terms in `text` (duplicates included).
pub fn token_count(text: &str) -> usize {
    raw_tokens(text).count()
}

/// Term -> occurrence count, summed over every input token stream.
///
/// Counts commute, so the table is the same whatever order texts are added in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TermFrequencies {
    counts: HashMap<String, u64>,
}

impl TermFrequencies {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table over the concatenated tokens of all `texts`.
    ///
    /// Used for the corpus-wide table (one entry per document) and for the query
    /// table (a single text).
    pub fn from_texts<I, S>(texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut freqs = Self::new();
        for text in texts {
            freqs.add_text(text.as_ref());
        }
        freqs
    }

    /// Add every token of `text`.
    pub fn add_text(&mut self, text: &str) {
        self.add_terms(tokenize(text));
    }

    /// Add already-tokenized terms. Terms are lowercased on the way in.
    pub fn add_terms<I, S>(&mut self, terms: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for term in terms {
            *self
                .counts
                .entry(term.as_ref().to_lowercase())
                .or_insert(0) += 1;
        }
    }

    /// Count for `term` (0 if absent).
    pub fn get(&self, term: &str) -> u64 {
        self.counts.get(term).copied().unwrap_or(0)
    }

    /// Sum of counts for every term in `terms`.
    pub fn sum_over(&self, terms: &TermSet) -> u64 {
        terms.iter().map(|t| self.get(t)).sum()
    }

    /// Number of distinct terms.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// Whether no term has been counted.
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Total occurrences across all terms.
    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    /// Iterate `(term, count)` pairs in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> + '_ {
        self.counts.iter().map(|(t, &c)| (t.as_str(), c))
    }
}

/// Distinct terms of one document or query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TermSet {
    terms: HashSet<String>,
}

impl TermSet {
    /// Distinct lowercased tokens of `text`.
    pub fn from_text(text: &str) -> Self {
        Self {
            terms: tokenize(text).collect(),
        }
    }

    /// Number of distinct terms.
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Whether `term` is present.
    pub fn contains(&self, term: &str) -> bool {
        self.terms.contains(term)
    }

    /// Size of the intersection with `other`.
    pub fn overlap(&self, other: &TermSet) -> usize {
        // Probe the smaller set against the larger one.
        let (small, large) = if self.len() <= other.len() {
            (self, other)
        } else {
            (other, self)
        };
        small.terms.iter().filter(|t| large.contains(t)).count()
    }

    /// Iterate terms in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = &str> + '_ {
        self.terms.iter().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokenize_lowercases_and_splits_on_whitespace() {
        let terms: Vec<String> = tokenize("  Exercise\tIMPROVES\nhealth. ").collect();
        assert_eq!(terms, vec!["exercise", "improves", "health."]);
    }

    #[test]
    fn information_separators_split_terms() {
        let text = "alpha\u{1c}Beta\u{1d}gamma\u{1e}delta\u{1f}\u{1f}eps";
        let terms: Vec<String> = tokenize(text).collect();
        assert_eq!(terms, vec!["alpha", "beta", "gamma", "delta", "eps"]);
        assert_eq!(token_count(text), 5);
        assert_eq!(token_count("\u{1c} \u{1f}"), 0);
    }

    #[test]
    fn counts_are_u64() {
        let mut freqs = TermFrequencies::new();
        freqs.counts.insert("big".to_string(), u64::from(u32::MAX));
        freqs.add_terms(["big", "BIG"]);
        assert_eq!(freqs.get("big"), u64::from(u32::MAX) + 2);
        assert_eq!(freqs.total(), u64::from(u32::MAX) + 2);
    }

    #[test]
    fn corpus_table_sums_across_documents() {
        let freqs = TermFrequencies::from_texts(["a b a", "B c"]);
        assert_eq!(freqs.get("a"), 2);
        assert_eq!(freqs.get("b"), 2);
        assert_eq!(freqs.get("c"), 1);
        assert_eq!(freqs.get("missing"), 0);
        assert_eq!(freqs.len(), 3);
        assert_eq!(freqs.total(), 5);
    }

    #[test]
    fn table_is_order_independent() {
        let forward = TermFrequencies::from_texts(["x y", "y z z"]);
        let backward = TermFrequencies::from_texts(["y z z", "x y"]);
        assert_eq!(forward, backward);
    }

    #[test]
    fn add_terms_lowercases() {
        let mut freqs = TermFrequencies::new();
        freqs.add_terms(["Rust", "rust", "RUST"]);
        assert_eq!(freqs.get("rust"), 3);
    }

    #[test]
    fn empty_inputs_give_empty_table() {
        let freqs = TermFrequencies::from_texts(["", "   "]);
        assert!(freqs.is_empty());
        assert_eq!(freqs.total(), 0);
    }

    #[test]
    fn term_set_dedups_and_overlaps() {
        let doc = TermSet::from_text("Health and diet matter health");
        assert_eq!(doc.len(), 4);
        let query = TermSet::from_text("exercise HEALTH");
        assert_eq!(doc.overlap(&query), 1);
        assert_eq!(query.overlap(&doc), 1);
        assert_eq!(doc.overlap(&TermSet::default()), 0);
    }

    #[test]
    fn sum_over_uses_distinct_terms() {
        let freqs = TermFrequencies::from_texts(["a a b", "a c"]);
        let set = TermSet::from_text("a a b zzz");
        assert_eq!(freqs.sum_over(&set), 3 + 1);
    }
}
