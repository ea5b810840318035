//! Belief-network relevance: term overlap weighted by document specificity.
//!
//! `relevance = p_q_given_d * p_doc` with
//! - `p_doc` = `1 / |D|` (or ε for an empty document), so smaller vocabularies weigh each
//!   shared term more heavily
//! - `p_q_given_d` = `|Q ∩ D| / |Q|` (or ε for an empty query)
//!
//! No corpus statistics are needed.

use crate::frequency::TermSet;
use crate::rank::Scorer;
use crate::SMOOTHING;

/// Belief-network scorer for one query.
#[derive(Debug, Clone, Copy)]
pub struct BeliefScorer<'a> {
    query_terms: &'a TermSet,
}

impl<'a> BeliefScorer<'a> {
    /// Prepare a scorer from the query's term set.
    pub fn new(query_terms: &'a TermSet) -> Self {
        Self { query_terms }
    }
}

impl Scorer for BeliefScorer<'_> {
    fn score(&self, doc_terms: &TermSet) -> f64 {
        let p_doc = if doc_terms.is_empty() {
            SMOOTHING
        } else {
            1.0 / doc_terms.len() as f64
        };
        let p_q_given_d = if self.query_terms.is_empty() {
            SMOOTHING
        } else {
            self.query_terms.overlap(doc_terms) as f64 / self.query_terms.len() as f64
        };
        p_q_given_d * p_doc
    }
}

/// Belief-network relevance of `document` for `query`.
pub fn relevance(query: &str, document: &str) -> f64 {
    let query_terms = TermSet::from_text(query);
    BeliefScorer::new(&query_terms).score(&TermSet::from_text(document))
}
