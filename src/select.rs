//! Per-query model selection.
//!
//! Short queries (at most [`SelectorParams::short_query_max_terms`] tokens) always use the
//! belief model. Longer queries are ranked under both models and the model whose best
//! document scores strictly higher wins; equal top scores go to the belief model.
//!
//! The probe rankings are kept on the [`Selection`] so the engine can return the winning
//! one instead of ranking a third time.

use crate::inference::InferenceParams;
use crate::rank::{Model, RankContext, RankParams, ScoredDocument};
use serde::Serialize;

/// Model selection parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectorParams {
    /// Queries with at most this many tokens skip the probe and use the belief model.
    pub short_query_max_terms: usize,
}

impl Default for SelectorParams {
    fn default() -> Self {
        Self {
            short_query_max_terms: 3,
        }
    }
}

/// Outcome of model selection for one query.
#[derive(Debug, Clone, Serialize)]
pub struct Selection {
    /// Chosen model.
    pub model: Model,
    /// Query token count (duplicates included).
    pub query_tokens: usize,
    /// Whether both models were ranked to decide.
    pub probed: bool,
    /// Best inference-model score, when probed and the corpus is non-empty.
    pub inference_top: Option<f64>,
    /// Best belief-model score, when probed and the corpus is non-empty.
    pub belief_top: Option<f64>,
    #[serde(skip)]
    probe: Option<Probe>,
}

#[derive(Debug, Clone)]
struct Probe {
    inference: Vec<ScoredDocument>,
    belief: Vec<ScoredDocument>,
}

impl Selection {
    /// The already-computed ranking for the chosen model, if the selector probed.
    pub fn into_probe_hits(self) -> Option<Vec<ScoredDocument>> {
        let probe = self.probe?;
        Some(match self.model {
            Model::Inference => probe.inference,
            Model::Belief => probe.belief,
        })
    }
}

fn top_score(hits: &[ScoredDocument]) -> Option<f64> {
    hits.first().map(|h| h.score)
}

/// Inference must be strictly better; ties and empty corpora go to belief.
fn pick_model(inference_top: Option<f64>, belief_top: Option<f64>) -> Model {
    match (inference_top, belief_top) {
        (Some(i), Some(b)) if i > b => Model::Inference,
        _ => Model::Belief,
    }
}

/// Choose a model for the query and corpus captured in `ctx`.
pub fn select(ctx: &RankContext, params: SelectorParams, inference: InferenceParams) -> Selection {
    let query_tokens = ctx.query_tokens();
    if query_tokens <= params.short_query_max_terms {
        tracing::debug!(query_tokens, "short query, using belief model");
        return Selection {
            model: Model::Belief,
            query_tokens,
            probed: false,
            inference_top: None,
            belief_top: None,
            probe: None,
        };
    }

    let inference_hits = ctx.rank_model(Model::Inference, inference);
    let belief_hits = ctx.rank_model(Model::Belief, inference);
    let inference_top = top_score(&inference_hits);
    let belief_top = top_score(&belief_hits);

    let model = pick_model(inference_top, belief_top);
    tracing::debug!(
        query_tokens,
        ?inference_top,
        ?belief_top,
        model = %model,
        "probed both models"
    );

    Selection {
        model,
        query_tokens,
        probed: true,
        inference_top,
        belief_top,
        probe: Some(Probe {
            inference: inference_hits,
            belief: belief_hits,
        }),
    }
}

/// Choose a model for `query` over `documents`.
///
/// A [`crate::ModelPolicy::Fixed`] policy in `params` is ignored; this always runs the
/// selection rule.
pub fn select_model<S: AsRef<str> + Sync>(
    query: &str,
    documents: &[S],
    params: RankParams,
) -> Model {
    let ctx = RankContext::new(query, documents);
    select(&ctx, params.selector, params.inference).model
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rank::Scorer;

    const CORPUS: [&str; 2] = ["exercise improves health", "health and diet matter"];
    const LONG_QUERY: &str = "the effects of regular exercise on long term health outcomes";

    #[test]
    fn short_queries_always_pick_belief() {
        for q in ["", "health", "exercise health", "a b c", "A A A"] {
            let ctx = RankContext::new(q, &CORPUS);
            let sel = select(&ctx, SelectorParams::default(), InferenceParams::default());
            assert_eq!(sel.model, Model::Belief, "query {q:?}");
            assert!(!sel.probed);
            assert!(sel.into_probe_hits().is_none());
        }
    }

    #[test]
    fn long_query_probes_and_picks_strictly_greater_top() {
        let ctx = RankContext::new(LONG_QUERY, &CORPUS);
        let sel = select(&ctx, SelectorParams::default(), InferenceParams::default());
        assert!(sel.probed);
        assert_eq!(sel.query_tokens, 10);
        let (Some(i), Some(b)) = (sel.inference_top, sel.belief_top) else {
            panic!("expected both top scores");
        };
        let expected = if i > b { Model::Inference } else { Model::Belief };
        assert_eq!(sel.model, expected);
    }

    #[test]
    fn long_query_scenario_picks_inference() {
        // Inference top: doc0 with 2 shared of 10 query terms and mean cf 4/3, over p_query ~1.
        // Belief top: 2/10 * 1/3.
        let model = select_model(LONG_QUERY, &CORPUS, RankParams::default());
        assert_eq!(model, Model::Inference);
    }

    #[test]
    fn duplicate_tokens_count_toward_threshold() {
        let ctx = RankContext::new("health health health health", &CORPUS);
        let sel = select(&ctx, SelectorParams::default(), InferenceParams::default());
        assert!(sel.probed);
    }

    #[test]
    fn equal_top_scores_pick_belief() {
        // No shared terms: both models score every document 0.
        let ctx = RankContext::new("w x y z", &CORPUS);
        let sel = select(&ctx, SelectorParams::default(), InferenceParams::default());
        assert_eq!(sel.inference_top, Some(0.0));
        assert_eq!(sel.belief_top, Some(0.0));
        assert_eq!(sel.model, Model::Belief);
    }

    #[test]
    fn nonzero_tie_picks_belief() {
        assert_eq!(pick_model(Some(0.25), Some(0.25)), Model::Belief);
        assert_eq!(pick_model(Some(1.0 / 3.0), Some(1.0 / 3.0)), Model::Belief);
        assert_eq!(pick_model(Some(0.25), Some(0.5)), Model::Belief);
        assert_eq!(pick_model(Some(0.5), Some(0.25)), Model::Inference);
        assert_eq!(pick_model(Some(0.5), None), Model::Belief);
        assert_eq!(pick_model(None, None), Model::Belief);
    }

    #[test]
    fn empty_corpus_long_query_picks_belief() {
        let docs: [&str; 0] = [];
        let ctx = RankContext::new(LONG_QUERY, &docs);
        let sel = select(&ctx, SelectorParams::default(), InferenceParams::default());
        assert_eq!(sel.model, Model::Belief);
        assert_eq!(sel.inference_top, None);
    }

    #[test]
    fn probe_hits_are_the_chosen_models_ranking() {
        let ctx = RankContext::new(LONG_QUERY, &CORPUS);
        let scorer = ctx.inference_scorer(InferenceParams::default());
        let top = scorer.score(&crate::frequency::TermSet::from_text(CORPUS[0]));
        let sel = select(&ctx, SelectorParams::default(), InferenceParams::default());
        let hits = sel.into_probe_hits().expect("probed");
        assert_eq!(hits[0].doc_id, 0);
        assert_eq!(hits[0].score, top);
    }

    #[test]
    fn custom_threshold() {
        let ctx = RankContext::new("exercise health", &CORPUS);
        let params = SelectorParams {
            short_query_max_terms: 1,
        };
        let sel = select(&ctx, params, InferenceParams::default());
        assert!(sel.probed);
    }
}
