//! Typed errors for the scoring pipeline.
//!
//! Uses `thiserror` for library errors (not `anyhow`) to provide
//! strongly-typed, composable error handling.
//!
//! Propagation policy:
//! - `MalformedListing` is a per-listing failure: the batch runner records
//!   it and continues with the remaining listings.
//! - `SchemaMismatch` and `ModelNotLoaded` invalidate every subsequent
//!   result and abort the run.
//! - `NotFound` is an expected lookup outcome ("no data for this listing"),
//!   not an internal fault.

use thiserror::Error;

use crate::types::listing::ListingId;

/// Errors that can occur while scoring listings.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Raw record is missing a required field with no documented default.
    ///
    /// Isolated per listing: one bad record must not abort a batch.
    #[error("malformed listing: missing required field `{field}`")]
    MalformedListing { field: &'static str },

    /// Feature vector keys don't match the frozen model schema.
    ///
    /// Indicates version skew between extractor and classifier artifacts;
    /// fatal for the whole run.
    #[error("feature schema mismatch: expected fingerprint {expected}, got {actual}")]
    SchemaMismatch { expected: String, actual: String },

    /// Classifier or reference distribution used before initialization.
    ///
    /// Programming-contract violation; fatal.
    #[error("model not loaded: {0}")]
    ModelNotLoaded(&'static str),

    /// Artifact loading or validation failed.
    #[error("artifact error: {0}")]
    Artifact(#[from] ArtifactError),

    /// Result store operation failed while persisting a batch.
    #[error("result store error: {0}")]
    Store(#[from] StoreError),
}

/// Errors loading or saving versioned artifacts (model parameters,
/// reference distribution, result snapshots).
#[derive(Debug, Error)]
pub enum ArtifactError {
    /// Filesystem error
    #[error("artifact I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error
    #[error("artifact JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Artifact was produced against a different schema version
    #[error("artifact version mismatch: expected {expected}, found {found}")]
    VersionMismatch { expected: String, found: String },
}

/// Errors from the result store / lookup path.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No precomputed result for this identifier pair.
    ///
    /// Expected and user-visible as "no recommendations available for this
    /// listing"; callers must surface it as a normal not-found response.
    #[error("no result stored for listing {id}")]
    NotFound { id: ListingId },

    /// Backend storage failure
    #[error("storage error: {0}")]
    Backend(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, PipelineError>;

/// Result type alias for artifact operations.
pub type ArtifactResult<T> = std::result::Result<T, ArtifactError>;

/// Result type alias for store operations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;
