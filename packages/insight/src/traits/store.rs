//! Result-store trait: the seam between the batch pipeline and whatever
//! persistence the host chooses.
//!
//! The store is written by a batch run and read by the lookup path; at
//! serving time it is an immutable snapshot, so lookups need no
//! coordination and may proceed fully concurrently.

use async_trait::async_trait;

use crate::error::StoreResult;
use crate::types::listing::ListingId;
use crate::types::result::StoredResult;

/// Keyed store of precomputed `(prediction, suggestions)` results.
#[async_trait]
pub trait ResultStore: Send + Sync {
    /// Persist the result for one listing.
    async fn store_result(&self, id: ListingId, result: &StoredResult) -> StoreResult<()>;

    /// Retrieve the result for one listing.
    ///
    /// Fails with `StoreError::NotFound` when the identifier pair is
    /// absent. That is an expected outcome; the caller surfaces it as
    /// "no recommendations available for this listing".
    async fn get_result(&self, id: ListingId) -> StoreResult<StoredResult>;

    /// Number of stored results.
    async fn count(&self) -> StoreResult<usize>;

    /// All stored identifier pairs, in unspecified order.
    async fn ids(&self) -> StoreResult<Vec<ListingId>>;
}
