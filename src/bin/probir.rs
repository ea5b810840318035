//! `probir` CLI: rank a directory of `.txt` files (or a one-document-per-line corpus)
//! against one or more queries.

#[cfg(feature = "cli")]
use clap::{Args, Parser, Subcommand, ValueEnum};
#[cfg(feature = "cli")]
use probir::corpus::{self, SourceDocument};
#[cfg(feature = "cli")]
use probir::rank::RankContext;
#[cfg(feature = "cli")]
use probir::{rank_with_params, select, Model, ModelPolicy, RankParams, Ranking};
#[cfg(feature = "cli")]
use std::path::PathBuf;

#[cfg(feature = "cli")]
#[derive(Parser, Debug)]
#[command(author, version, about = "Probabilistic document ranking CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[cfg(feature = "cli")]
#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
struct Source {
    /// Directory of `.txt` documents (one document per file, sorted by name).
    #[arg(short, long)]
    dir: Option<PathBuf>,

    /// Corpus file with one document per line.
    #[arg(short, long)]
    input: Option<PathBuf>,
}

#[cfg(feature = "cli")]
impl Source {
    fn load(&self) -> Result<Vec<SourceDocument>, probir::Error> {
        match (&self.dir, &self.input) {
            (Some(dir), _) => corpus::load_dir(dir),
            (None, Some(input)) => corpus::load_lines(input),
            // clap enforces exactly one of the two.
            (None, None) => Ok(Vec::new()),
        }
    }
}

#[cfg(feature = "cli")]
#[derive(ValueEnum, Clone, Copy, Debug, Default)]
enum ModelArg {
    /// Pick per query.
    #[default]
    Auto,
    /// Always use the inference model.
    Inference,
    /// Always use the belief network.
    Belief,
}

#[cfg(feature = "cli")]
impl From<ModelArg> for ModelPolicy {
    fn from(arg: ModelArg) -> Self {
        match arg {
            ModelArg::Auto => ModelPolicy::Auto,
            ModelArg::Inference => ModelPolicy::Fixed(Model::Inference),
            ModelArg::Belief => ModelPolicy::Fixed(Model::Belief),
        }
    }
}

#[cfg(feature = "cli")]
#[derive(Subcommand, Debug)]
enum Commands {
    /// Rank every document for each query.
    Rank {
        #[command(flatten)]
        source: Source,

        /// Model choice.
        #[arg(short, long, value_enum, default_value_t = ModelArg::Auto)]
        model: ModelArg,

        /// Print only the top-k documents (all by default).
        #[arg(short, long)]
        k: Option<usize>,

        /// Emit one JSON object per query instead of text.
        #[arg(long, default_value_t = false)]
        json: bool,

        /// Queries (each argument is one query).
        #[arg(required = true)]
        queries: Vec<String>,
    },

    /// Show how the model would be selected for each query.
    Explain {
        #[command(flatten)]
        source: Source,

        /// Emit one JSON object per query instead of text.
        #[arg(long, default_value_t = false)]
        json: bool,

        /// Queries (each argument is one query).
        #[arg(required = true)]
        queries: Vec<String>,
    },
}

#[cfg(feature = "cli")]
#[derive(serde::Serialize)]
struct QueryReport<'a> {
    query: &'a str,
    #[serde(flatten)]
    ranking: Ranking,
}

#[cfg(feature = "cli")]
fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(feature = "cli")]
fn fmt_top(score: Option<f64>) -> String {
    score.map_or_else(|| "-".to_string(), |s| format!("{s:.4}"))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    #[cfg(feature = "cli")]
    {
        init_tracing();
        let cli = Cli::parse();

        match cli.command {
            Commands::Rank {
                source,
                model,
                k,
                json,
                queries,
            } => {
                let docs = source.load()?;
                let texts = corpus::texts(&docs);
                if !json {
                    println!("Loaded {} documents.", texts.len());
                }

                let params = RankParams {
                    policy: model.into(),
                    ..RankParams::default()
                };
                for query in &queries {
                    let mut ranking = rank_with_params(query, &texts, params);
                    if let Some(k) = k {
                        ranking.hits.truncate(k);
                    }

                    if json {
                        let report = QueryReport {
                            query: query.as_str(),
                            ranking,
                        };
                        println!("{}", serde_json::to_string(&report)?);
                        continue;
                    }

                    println!();
                    println!("Ranking documents for query '{query}':");
                    println!("Selected Model: {}", ranking.model);
                    for hit in &ranking.hits {
                        println!(
                            "Document {}: Relevance Probability = {:.4}",
                            hit.doc_id + 1,
                            hit.score
                        );
                    }
                }
            }
            Commands::Explain {
                source,
                json,
                queries,
            } => {
                let docs = source.load()?;
                let texts = corpus::texts(&docs);
                let params = RankParams::default();

                for query in &queries {
                    let ctx = RankContext::new(query, &texts);
                    let selection = select::select(&ctx, params.selector, params.inference);

                    if json {
                        println!("{}", serde_json::to_string(&selection)?);
                        continue;
                    }

                    println!("Query: '{query}'");
                    println!("  tokens: {}", selection.query_tokens);
                    println!("  probed: {}", if selection.probed { "yes" } else { "no" });
                    println!("  inference top: {}", fmt_top(selection.inference_top));
                    println!("  belief top: {}", fmt_top(selection.belief_top));
                    println!("Selected Model: {}", selection.model);
                }
            }
        }
    }

    #[cfg(not(feature = "cli"))]
    println!("CLI feature is disabled. Build with --features cli to enable.");

    Ok(())
}
