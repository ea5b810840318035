//! Ranking engine: builds the per-call statistics, picks a model and orders every document.
//!
//! Ranking is deterministic: score descending, then document position ascending. Every
//! document gets a score (nothing is filtered or truncated); top-k is the caller's concern.

use crate::belief::BeliefScorer;
use crate::frequency::{token_count, TermFrequencies, TermSet};
use crate::inference::{InferenceParams, InferenceScorer};
use crate::select::{self, SelectorParams};
use crate::Error;
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// A relevance model that scores one document's term set.
pub trait Scorer: Sync {
    /// Non-negative relevance of a document; higher is more relevant.
    fn score(&self, doc_terms: &TermSet) -> f64;
}

/// Which relevance model produced a ranking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Model {
    /// Smoothed conditional-probability model using corpus-wide frequencies.
    Inference,
    /// Overlap model with a document-specificity bonus.
    Belief,
}

impl fmt::Display for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Model::Inference => f.write_str("Inference Model"),
            Model::Belief => f.write_str("Belief Network"),
        }
    }
}

impl FromStr for Model {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "inference" | "inference model" => Ok(Model::Inference),
            "belief" | "belief network" => Ok(Model::Belief),
            _ => Err(Error::UnknownModel(s.to_string())),
        }
    }
}

/// How the model is chosen for a ranking call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ModelPolicy {
    /// Let the selector decide per query.
    #[default]
    Auto,
    /// Always use this model.
    Fixed(Model),
}

/// Ranking parameters.
#[derive(Debug, Clone, Copy, Default)]
pub struct RankParams {
    /// Inference-model smoothing.
    pub inference: InferenceParams,
    /// Model selection thresholds.
    pub selector: SelectorParams,
    /// Automatic or fixed model choice.
    pub policy: ModelPolicy,
}

impl RankParams {
    /// Parameters that skip selection and always use `model`.
    pub fn fixed(model: Model) -> Self {
        Self {
            policy: ModelPolicy::Fixed(model),
            ..Self::default()
        }
    }
}

/// One document's score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoredDocument {
    /// Zero-based position in the supplied corpus.
    pub doc_id: usize,
    /// Relevance score (finite, non-negative).
    pub score: f64,
}

/// Ordered hits plus the model that produced them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Ranking {
    /// Model used for every score in `hits`.
    pub model: Model,
    /// One entry per document, best first.
    pub hits: Vec<ScoredDocument>,
}

/// Per-call statistics shared by both scorers and the selector.
///
/// Holds the corpus-wide and query frequency tables plus each document's term set. Built
/// fresh for every call and never mutated afterwards.
#[derive(Debug, Clone)]
pub struct RankContext {
    doc_terms: Vec<TermSet>,
    corpus_freqs: TermFrequencies,
    query_terms: TermSet,
    query_freqs: TermFrequencies,
    query_tokens: usize,
}

impl RankContext {
    /// Tokenize `query` and every document, and count terms.
    pub fn new<S: AsRef<str> + Sync>(query: &str, documents: &[S]) -> Self {
        #[cfg(feature = "parallel")]
        let doc_terms: Vec<TermSet> = documents
            .par_iter()
            .map(|d| TermSet::from_text(d.as_ref()))
            .collect();
        #[cfg(not(feature = "parallel"))]
        let doc_terms: Vec<TermSet> = documents
            .iter()
            .map(|d| TermSet::from_text(d.as_ref()))
            .collect();

        Self {
            doc_terms,
            corpus_freqs: TermFrequencies::from_texts(documents),
            query_terms: TermSet::from_text(query),
            query_freqs: TermFrequencies::from_texts([query]),
            query_tokens: token_count(query),
        }
    }

    /// Number of documents.
    pub fn num_docs(&self) -> usize {
        self.doc_terms.len()
    }

    /// Number of query tokens, duplicates included.
    pub fn query_tokens(&self) -> usize {
        self.query_tokens
    }

    /// Corpus-wide term frequencies.
    pub fn corpus_freqs(&self) -> &TermFrequencies {
        &self.corpus_freqs
    }

    /// Query term frequencies.
    pub fn query_freqs(&self) -> &TermFrequencies {
        &self.query_freqs
    }

    /// Inference-model scorer bound to this call's statistics.
    pub fn inference_scorer(&self, params: InferenceParams) -> InferenceScorer<'_> {
        InferenceScorer::new(
            &self.query_terms,
            &self.corpus_freqs,
            &self.query_freqs,
            params,
        )
    }

    /// Belief-model scorer bound to this call's query.
    pub fn belief_scorer(&self) -> BeliefScorer<'_> {
        BeliefScorer::new(&self.query_terms)
    }

    /// Score every document under `model` and sort.
    pub fn rank_model(&self, model: Model, params: InferenceParams) -> Vec<ScoredDocument> {
        match model {
            Model::Inference => self.rank_with(&self.inference_scorer(params)),
            Model::Belief => self.rank_with(&self.belief_scorer()),
        }
    }

    /// Score every document with `scorer` and sort.
    pub fn rank_with<R: Scorer>(&self, scorer: &R) -> Vec<ScoredDocument> {
        let score_one = |(doc_id, terms): (usize, &TermSet)| ScoredDocument {
            doc_id,
            score: scorer.score(terms),
        };
        #[cfg(feature = "parallel")]
        let mut hits: Vec<ScoredDocument> =
            self.doc_terms.par_iter().enumerate().map(score_one).collect();
        #[cfg(not(feature = "parallel"))]
        let mut hits: Vec<ScoredDocument> =
            self.doc_terms.iter().enumerate().map(score_one).collect();

        sort_hits(&mut hits);
        hits
    }
}

/// Deterministic: score desc, then doc_id asc.
fn sort_hits(hits: &mut [ScoredDocument]) {
    hits.sort_by(|a, b| {
        b.score
            .total_cmp(&a.score)
            .then_with(|| a.doc_id.cmp(&b.doc_id))
    });
}

/// Rank `documents` for `query`, choosing the model automatically.
pub fn rank<S: AsRef<str> + Sync>(query: &str, documents: &[S]) -> Vec<ScoredDocument> {
    rank_with_params(query, documents, RankParams::default()).hits
}

/// Rank `documents` for `query` under `params`, reporting the model used.
pub fn rank_with_params<S: AsRef<str> + Sync>(
    query: &str,
    documents: &[S],
    params: RankParams,
) -> Ranking {
    let ctx = RankContext::new(query, documents);
    let ranking = match params.policy {
        ModelPolicy::Fixed(model) => Ranking {
            model,
            hits: ctx.rank_model(model, params.inference),
        },
        ModelPolicy::Auto => {
            let selection = select::select(&ctx, params.selector, params.inference);
            let model = selection.model;
            let hits = match selection.into_probe_hits() {
                Some(hits) => hits,
                None => ctx.rank_model(model, params.inference),
            };
            Ranking { model, hits }
        }
    };
    tracing::debug!(
        docs = ctx.num_docs(),
        query_tokens = ctx.query_tokens(),
        model = %ranking.model,
        "ranked corpus"
    );
    ranking
}

/// Rank under the inference model only.
pub fn rank_inference<S: AsRef<str> + Sync>(
    query: &str,
    documents: &[S],
    params: InferenceParams,
) -> Vec<ScoredDocument> {
    RankContext::new(query, documents).rank_model(Model::Inference, params)
}

/// Rank under the belief model only.
pub fn rank_belief<S: AsRef<str> + Sync>(query: &str, documents: &[S]) -> Vec<ScoredDocument> {
    RankContext::new(query, documents).rank_model(Model::Belief, InferenceParams::default())
}
