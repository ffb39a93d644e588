//! Batch orchestration: score listings and persist results.
//!
//! Each listing's transform (extract, predict, analyze, generate) is
//! atomic and pure; the only shared state is the read-only context and the
//! result store. Malformed listings are recorded and skipped, since one bad
//! record must not abort a batch. Schema or initialization errors abort the
//! run because they invalidate every subsequent result.

use tracing::{info, warn};

use crate::error::{PipelineError, Result};
use crate::model::context::PipelineContext;
use crate::pipeline::analyze::analyze;
use crate::pipeline::extract::extract;
use crate::pipeline::recommend::generate;
use crate::traits::store::ResultStore;
use crate::types::listing::{Listing, ListingId};
use crate::types::result::StoredResult;

/// Per-listing failure captured by a batch run.
#[derive(Debug, Clone)]
pub struct BatchFailure {
    /// Zero-based position in the input batch
    pub row: usize,

    /// Identifier pair, when the record carried one
    pub id: Option<ListingId>,

    /// Human-readable cause
    pub error: String,
}

/// Success/failure report for one batch run.
#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    /// Listings scored and persisted
    pub scored: usize,

    /// Listings skipped with their causes
    pub failed: Vec<BatchFailure>,
}

impl BatchReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// True when every listing in the batch was scored.
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Score one listing end to end.
///
/// The atomic per-listing transform: no partial vector or prediction is
/// ever observable. Pure given a frozen context, and safe to call from
/// any number of tasks in parallel.
pub fn score_listing(listing: &Listing, ctx: &PipelineContext) -> Result<(ListingId, StoredResult)> {
    let vector = extract(listing, &ctx.schema)?;
    let prediction = ctx.model.predict(&vector)?;
    let deficiencies = analyze(&vector, &prediction, ctx)?;
    let suggestions = generate(&deficiencies, &ctx.config.recommend);

    let id = listing.id().ok_or(PipelineError::MalformedListing {
        field: "listing_id",
    })?;
    Ok((id, StoredResult::new(prediction, suggestions)))
}

/// Score a batch of listings, persisting each result as it completes.
///
/// Returns a per-listing success/failure report. Only `MalformedListing`
/// is isolated per row; any other error aborts the run immediately.
pub async fn score_batch<S: ResultStore>(
    listings: &[Listing],
    ctx: &PipelineContext,
    store: &S,
) -> Result<BatchReport> {
    info!(
        listings = listings.len(),
        model = ctx.model.version(),
        "scoring batch"
    );

    let mut report = BatchReport::new();

    for (row, listing) in listings.iter().enumerate() {
        match score_listing(listing, ctx) {
            Ok((id, result)) => {
                store.store_result(id, &result).await?;
                report.scored += 1;
            }
            Err(error @ PipelineError::MalformedListing { .. }) => {
                warn!(row, %error, "skipping malformed listing");
                report.failed.push(BatchFailure {
                    row,
                    id: listing.id(),
                    error: error.to_string(),
                });
            }
            Err(fatal) => return Err(fatal),
        }
    }

    info!(
        scored = report.scored,
        failed = report.failed.len(),
        "batch complete"
    );

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stores::MemoryResultStore;
    use crate::testing::{context_with, weak_listing, well_listing};

    #[tokio::test]
    async fn test_batch_scores_and_persists() {
        let ctx = context_with(&[("photo_count", 0.4)], &[("photo_count", 10.0, 3.0)]);
        let store = MemoryResultStore::new();
        let listings = vec![well_listing(1, 1), weak_listing(1, 2)];

        let report = score_batch(&listings, &ctx, &store).await.unwrap();
        assert_eq!(report.scored, 2);
        assert!(report.is_success());
        assert_eq!(store.len(), 2);
    }

    #[tokio::test]
    async fn test_malformed_listing_is_isolated() {
        let ctx = context_with(&[("photo_count", 0.4)], &[("photo_count", 10.0, 3.0)]);
        let store = MemoryResultStore::new();

        let mut broken = well_listing(1, 2);
        broken.price = None;
        let listings = vec![well_listing(1, 1), broken, weak_listing(1, 3)];

        let report = score_batch(&listings, &ctx, &store).await.unwrap();
        assert_eq!(report.scored, 2);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].row, 1);
        assert!(report.failed[0].error.contains("price"));
        assert!(!report.is_success());
    }

    #[tokio::test]
    async fn test_rerun_is_idempotent() {
        let ctx = context_with(
            &[("photo_count", 0.4), ("cancellation_strictness", 0.6)],
            &[
                ("photo_count", 10.0, 3.0),
                ("cancellation_strictness", 2.0, 1.0),
            ],
        );
        let listings = vec![well_listing(1, 1), weak_listing(2, 2)];

        let store_a = MemoryResultStore::new();
        let store_b = MemoryResultStore::new();
        score_batch(&listings, &ctx, &store_a).await.unwrap();
        score_batch(&listings, &ctx, &store_b).await.unwrap();

        for listing in &listings {
            let id = listing.id().unwrap();
            let a = store_a.get_result(id).await.unwrap();
            let b = store_b.get_result(id).await.unwrap();
            assert_eq!(a.prediction, b.prediction);
            assert_eq!(a.suggestions, b.suggestions);
        }
    }
}
