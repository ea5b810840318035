//! `probir`: probabilistic document ranking over an in-memory corpus.
//!
//! Two relevance models score a free-text query against plain-text documents:
//! - [`inference`]: a smoothed three-term approximation of \(P(R \mid D, Q)\) that uses
//!   corpus-wide term frequencies.
//! - [`belief`]: a cheaper term-overlap estimate with a document-specificity bonus.
//!
//! [`select`] picks the model per query (short queries go straight to the belief model;
//! longer ones probe both and keep the stronger top match), and [`rank`] orders every
//! document by score.
//!
//! Scope:
//! - Bounded in-memory corpora, rebuilt per call (no caching, no persistence)
//! - Deterministic ranking (score desc, tie-break by document position)
//! - Lowercase + whitespace tokenization only; stopwords/synonyms belong upstream
//!
//! Non-goals:
//! - Inverted indexes / incremental indexing
//! - Calibrated probabilities (scores are only comparable within one call and one model)
//!
//! ```
//! let docs = ["exercise improves health", "health and diet matter"];
//! let hits = probir::rank("exercise health", &docs);
//! assert_eq!(hits[0].doc_id, 0);
//! assert_eq!(hits[1].doc_id, 1);
//! ```

pub mod belief;
pub mod corpus;
pub mod frequency;
pub mod inference;
pub mod rank;
pub mod select;

pub use error::Error;
pub use rank::{rank, rank_with_params, Model, ModelPolicy, RankParams, Ranking, ScoredDocument};

/// Additive smoothing constant used wherever a denominator could be zero.
pub const SMOOTHING: f64 = 0.0001;

mod error {
    use std::path::PathBuf;

    /// Errors for the host-facing surfaces (document loading, model parsing).
    ///
    /// Scoring and ranking themselves are total and never return this.
    #[derive(thiserror::Error, Debug)]
    pub enum Error {
        /// A document source could not be read.
        #[error("failed to read {path}: {source}")]
        Io {
            /// Path that failed.
            path: PathBuf,
            /// Underlying I/O error.
            #[source]
            source: std::io::Error,
        },
        /// A document directory held no `.txt` files.
        #[error("no documents found in {0}")]
        EmptyCorpus(PathBuf),
        /// Model name was not recognised.
        #[error("unknown model: {0:?} (expected `inference` or `belief`)")]
        UnknownModel(String),
    }
}
