//! `insight`: batch scoring and result lookup from the command line.
//!
//! Three subcommands mirror the pipeline lifecycle:
//! - `fit`     compute the reference distribution from a high-rated corpus
//! - `score`   score a JSONL batch of listings into a result snapshot
//! - `lookup`  retrieve one listing's stored result from a snapshot

use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use tracing::warn;
use tracing_subscriber::EnvFilter;

use insight::{
    score_batch, FeatureSchema, Listing, ListingId, MemoryResultStore, ModelArtifact,
    PipelineConfig, PipelineContext, QualityModel, RecommendConfig, ReferenceDistribution,
    ResultStore, StoreError, StoredResult,
};

#[derive(Parser)]
#[command(name = "insight", about = "Listing quality scoring and recommendations")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Fit the reference distribution from a high-rated listing corpus
    Fit {
        /// JSONL file of high-rated listings
        #[arg(long)]
        listings: PathBuf,

        /// Output path for the reference artifact (JSON)
        #[arg(long)]
        out: PathBuf,

        /// Version tag recorded in the artifact
        #[arg(long, default_value = "v1")]
        version: String,
    },

    /// Score a batch of listings and write a result snapshot
    Score {
        /// JSONL file of listings to score
        #[arg(long)]
        listings: PathBuf,

        /// Classifier parameter artifact (JSON)
        #[arg(long)]
        model: PathBuf,

        /// Reference distribution artifact (JSON)
        #[arg(long)]
        reference: PathBuf,

        /// Output path for the result snapshot (JSON)
        #[arg(long)]
        out: PathBuf,

        /// Cap on suggestions per listing
        #[arg(long, default_value_t = 5)]
        max_suggestions: usize,

        /// Emit a "no major issues" row for listings with no deficiencies
        #[arg(long)]
        with_fallback: bool,
    },

    /// Look up one listing's stored result in a snapshot
    Lookup {
        /// Result snapshot written by `score`
        #[arg(long)]
        results: PathBuf,

        #[arg(long)]
        seller_id: u64,

        #[arg(long)]
        listing_id: u64,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    match Cli::parse().command {
        Command::Fit {
            listings,
            out,
            version,
        } => fit(&listings, &out, &version),
        Command::Score {
            listings,
            model,
            reference,
            out,
            max_suggestions,
            with_fallback,
        } => score(&listings, &model, &reference, &out, max_suggestions, with_fallback).await,
        Command::Lookup {
            results,
            seller_id,
            listing_id,
        } => lookup(&results, ListingId::new(seller_id, listing_id)).await,
    }
}

/// Read one listing per JSONL line; unparseable lines are warned about and
/// skipped so one bad row never sinks the file.
fn read_listings(path: &Path) -> anyhow::Result<Vec<Listing>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading listings from {}", path.display()))?;

    let mut listings = Vec::new();
    for (line_number, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<Listing>(line) {
            Ok(listing) => listings.push(listing),
            Err(error) => warn!(line = line_number + 1, %error, "skipping unparseable row"),
        }
    }

    if listings.is_empty() {
        bail!("no valid listing rows in {}", path.display());
    }
    Ok(listings)
}

fn fit(listings_path: &Path, out: &Path, version: &str) -> anyhow::Result<()> {
    let schema = FeatureSchema::v1();
    let listings = read_listings(listings_path)?;

    let mut vectors = Vec::with_capacity(listings.len());
    for listing in &listings {
        match insight::extract(listing, &schema) {
            Ok(vector) => vectors.push(vector),
            Err(error) => warn!(%error, "skipping malformed listing"),
        }
    }

    let reference = ReferenceDistribution::fit(version, &schema, &vectors)?;
    reference.save(out)?;
    println!(
        "Fitted reference distribution over {} listings -> {}",
        vectors.len(),
        out.display()
    );
    Ok(())
}

async fn score(
    listings_path: &Path,
    model_path: &Path,
    reference_path: &Path,
    out: &Path,
    max_suggestions: usize,
    with_fallback: bool,
) -> anyhow::Result<()> {
    let schema = FeatureSchema::v1();
    let artifact = ModelArtifact::load(model_path)
        .with_context(|| format!("loading model from {}", model_path.display()))?;
    let model = QualityModel::from_artifact(artifact, &schema)?;
    let reference = ReferenceDistribution::load(reference_path, &schema)
        .with_context(|| format!("loading reference from {}", reference_path.display()))?;

    let mut recommend = RecommendConfig::default().with_max_suggestions(max_suggestions);
    if with_fallback {
        recommend = recommend.with_fallback();
    }

    let ctx = PipelineContext::builder(schema)
        .with_model(model)
        .with_reference(reference)
        .with_config(PipelineConfig::default().with_recommend(recommend))
        .build()?;

    let listings = read_listings(listings_path)?;
    let store = MemoryResultStore::new();
    let report = score_batch(&listings, &ctx, &store).await?;
    store.save_snapshot(out)?;

    println!(
        "Scored {} listings ({} failed) -> {}",
        report.scored,
        report.failed.len(),
        out.display()
    );
    for failure in &report.failed {
        println!("  row {}: {}", failure.row + 1, failure.error);
    }
    Ok(())
}

async fn lookup(results_path: &Path, id: ListingId) -> anyhow::Result<()> {
    let store = MemoryResultStore::load_snapshot(results_path)
        .with_context(|| format!("loading results from {}", results_path.display()))?;

    let mut sample: Vec<ListingId> = store.ids().await?;
    sample.sort_by_key(|i| (i.seller_id, i.listing_id));
    sample.truncate(5);
    println!(
        "{} results loaded (sample ids: {})",
        store.count().await?,
        sample
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    );

    match store.get_result(id).await {
        Ok(result) => print_result(id, &result),
        Err(StoreError::NotFound { .. }) => {
            println!("No recommendations available for listing {id}.");
        }
        Err(error) => return Err(error.into()),
    }
    Ok(())
}

fn print_result(id: ListingId, result: &StoredResult) {
    println!("Listing {id}");
    if result.prediction.label.is_high_rated() {
        println!(
            "  Great news! Your listing is among the top high-rated listings \
             (confidence {:.1}%).",
            result.prediction.confidence * 100.0
        );
    } else {
        println!(
            "  There are listings rated higher than yours (high-rated \
             confidence {:.1}%). Suggestions below can help you improve.",
            result.prediction.confidence * 100.0
        );
    }

    if result.suggestions.is_empty() {
        println!("  No suggestions.");
    } else {
        for suggestion in &result.suggestions {
            println!("  {}. {}", suggestion.priority_rank, suggestion.text);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_read_listings_skips_bad_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("listings.jsonl");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, r#"{{"seller_id": 1, "listing_id": 2, "price": 80}}"#).unwrap();
        writeln!(file, "not json at all").unwrap();
        writeln!(file).unwrap();
        writeln!(file, r#"{{"seller_id": "3", "listing_id": "4", "price": "120.5"}}"#).unwrap();

        let listings = read_listings(&path).unwrap();
        assert_eq!(listings.len(), 2);
        assert_eq!(listings[1].id(), Some(ListingId::new(3, 4)));
    }

    #[test]
    fn test_read_listings_rejects_empty_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.jsonl");
        std::fs::write(&path, "\n\n").unwrap();
        assert!(read_listings(&path).is_err());
    }
}
