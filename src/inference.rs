//! Inference-model relevance.
//!
//! Estimates \(P(R \mid D, Q)\) with a three-term approximation:
//!
//! - `p_doc`   = \(\sum_{w \in D} cf(w) / (|D| + \epsilon)\), the mean corpus frequency of the
//!   document's distinct terms
//! - `p_query` = \(\sum_{w \in Q} qf(w) / (|Q| + \epsilon)\), the mean in-query frequency of the
//!   query's distinct terms
//! - `p_q_given_d` = \(|Q \cap D| / (|Q| + \epsilon)\)
//!
//! and `relevance = p_q_given_d * p_doc / (p_query + ε)`.
//!
//! `p_query` depends only on the query, so within one ranking call it is a constant
//! normalizer; ordering comes from `p_q_given_d * p_doc`. These are heuristic scores,
//! not calibrated probabilities.

use crate::frequency::{TermFrequencies, TermSet};
use crate::rank::Scorer;
use crate::SMOOTHING;

/// Inference-model parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InferenceParams {
    /// Additive smoothing in every denominator.
    ///
    /// Must be finite and `> 0`; anything else is replaced by [`SMOOTHING`] when scoring.
    pub smoothing: f64,
}

impl InferenceParams {
    /// Create parameters with custom smoothing (non-positive or non-finite values fall back
    /// to [`SMOOTHING`]).
    pub fn with_smoothing(smoothing: f64) -> Self {
        Self { smoothing }.sanitized()
    }

    /// Smoothing that keeps every denominator strictly positive.
    pub fn effective_smoothing(&self) -> f64 {
        if self.smoothing > 0.0 && self.smoothing.is_finite() {
            self.smoothing
        } else {
            SMOOTHING
        }
    }

    fn sanitized(self) -> Self {
        Self {
            smoothing: self.effective_smoothing(),
        }
    }
}

impl Default for InferenceParams {
    fn default() -> Self {
        Self {
            smoothing: SMOOTHING,
        }
    }
}

/// Inference-model scorer for one query over one corpus.
///
/// Query-side statistics are computed once in [`InferenceScorer::new`] and reused for
/// every document.
#[derive(Debug, Clone)]
pub struct InferenceScorer<'a> {
    query_terms: &'a TermSet,
    corpus_freqs: &'a TermFrequencies,
    p_query: f64,
    smoothing: f64,
}

impl<'a> InferenceScorer<'a> {
    /// Prepare a scorer from the query's term set and the two frequency tables.
    pub fn new(
        query_terms: &'a TermSet,
        corpus_freqs: &'a TermFrequencies,
        query_freqs: &TermFrequencies,
        params: InferenceParams,
    ) -> Self {
        let smoothing = params.effective_smoothing();
        let p_query =
            query_freqs.sum_over(query_terms) as f64 / (query_terms.len() as f64 + smoothing);
        Self {
            query_terms,
            corpus_freqs,
            p_query,
            smoothing,
        }
    }

    /// The query-wide normalizer shared by every document.
    pub fn p_query(&self) -> f64 {
        self.p_query
    }
}

impl Scorer for InferenceScorer<'_> {
    fn score(&self, doc_terms: &TermSet) -> f64 {
        let eps = self.smoothing;
        let p_doc = self.corpus_freqs.sum_over(doc_terms) as f64 / (doc_terms.len() as f64 + eps);
        let common = self.query_terms.overlap(doc_terms) as f64;
        let p_q_given_d = common / (self.query_terms.len() as f64 + eps);
        (p_q_given_d * p_doc) / (self.p_query + eps)
    }
}

/// Inference-model relevance of `document` for `query`, given precomputed tables.
///
/// Convenience for one-off scoring; [`crate::rank`] reuses a single
/// [`InferenceScorer`] across the corpus instead.
pub fn relevance(
    query: &str,
    document: &str,
    corpus_freqs: &TermFrequencies,
    query_freqs: &TermFrequencies,
    params: InferenceParams,
) -> f64 {
    let query_terms = TermSet::from_text(query);
    InferenceScorer::new(&query_terms, corpus_freqs, query_freqs, params)
        .score(&TermSet::from_text(document))
}

#[cfg(test)]
mod tests {
    use super::*;

    const CORPUS: [&str; 2] = ["exercise improves health", "health and diet matter"];

    fn score(query: &str, doc: &str) -> f64 {
        let corpus = TermFrequencies::from_texts(CORPUS);
        let qf = TermFrequencies::from_texts([query]);
        relevance(query, doc, &corpus, &qf, InferenceParams::default())
    }

    #[test]
    fn matches_hand_computed_values() {
        // cf: exercise=1 improves=1 health=2 and=1 diet=1 matter=1
        // doc0: p_doc = 4/3, p_q_given_d = 1, p_query = 1
        let s0 = score("exercise health", CORPUS[0]);
        assert!((s0 - 4.0 / 3.0).abs() < 1e-3, "{s0}");
        // doc1: p_doc = 5/4, p_q_given_d = 1/2
        let s1 = score("exercise health", CORPUS[1]);
        assert!((s1 - 0.625).abs() < 1e-3, "{s1}");
    }

    #[test]
    fn empty_document_scores_zero() {
        assert_eq!(score("exercise health", ""), 0.0);
    }

    #[test]
    fn empty_query_scores_zero_without_faulting() {
        let s = score("", CORPUS[0]);
        assert!(s.is_finite());
        assert_eq!(s, 0.0);
    }

    #[test]
    fn p_query_is_query_wide() {
        let corpus = TermFrequencies::from_texts(CORPUS);
        let q = "health health diet";
        let qt = TermSet::from_text(q);
        let qf = TermFrequencies::from_texts([q]);
        let scorer = InferenceScorer::new(&qt, &corpus, &qf, InferenceParams::default());
        // (2 + 1) / (2 + eps)
        assert!((scorer.p_query() - 1.5).abs() < 1e-3);
    }

    #[test]
    fn invalid_smoothing_falls_back() {
        let corpus = TermFrequencies::from_texts(["a b", ""]);
        let qf = TermFrequencies::from_texts([""]);
        for smoothing in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let params = InferenceParams { smoothing };
            assert_eq!(params.effective_smoothing(), SMOOTHING);
            for doc in ["a b", ""] {
                let s = relevance("", doc, &corpus, &qf, params);
                assert!(s.is_finite() && s >= 0.0, "smoothing {smoothing}: {s}");
            }
        }
        assert_eq!(InferenceParams::with_smoothing(0.0).smoothing, SMOOTHING);
        assert_eq!(InferenceParams::with_smoothing(0.5).smoothing, 0.5);
    }

    #[test]
    fn disjoint_document_scores_zero() {
        assert_eq!(score("exercise", "diet matter"), 0.0);
    }
}
