//! Listing Quality Scoring & Recommendation Library
//!
//! Ingests raw rental-listing records, engineers a fixed-shape feature
//! vector per listing, classifies each as high-rated or not, and turns the
//! gap to the high-rated reference distribution into ranked, actionable
//! suggestions ("add a cancellation policy", "increase photo count").
//!
//! # Design Philosophy
//!
//! **Interpretable over clever**
//!
//! - Deterministic, table-driven suggestions that are auditable and testable
//! - Severity weighted by the classifier's own coefficients, not raw
//!   statistical deviation
//! - Frozen, versioned artifacts; schema skew is an error, never a guess
//! - One immutable context object, no ambient global state
//!
//! # Usage
//!
//! ```rust,ignore
//! use insight::{FeatureSchema, MemoryResultStore, ModelArtifact, PipelineContext,
//!               QualityModel, ReferenceDistribution};
//!
//! // Initialize once: artifacts are validated against the schema here,
//! // before any listing is scored.
//! let schema = FeatureSchema::v1();
//! let model = QualityModel::from_artifact(ModelArtifact::load("model.json")?, &schema)?;
//! let reference = ReferenceDistribution::load("reference.json", &schema)?;
//! let ctx = PipelineContext::builder(schema)
//!     .with_model(model)
//!     .with_reference(reference)
//!     .build()?;
//!
//! // Batch-score, persisting into a result store.
//! let store = MemoryResultStore::new();
//! let report = insight::score_batch(&listings, &ctx, &store).await?;
//!
//! // Serve lookups from the immutable snapshot.
//! let result = store.get_result(id).await?; // StoreError::NotFound when absent
//! ```
//!
//! # Modules
//!
//! - [`types`] - Listings, feature vectors, predictions, suggestions
//! - [`model`] - Frozen classifier/reference artifacts and the context
//! - [`pipeline`] - Extract, analyze, recommend, and the batch runner
//! - [`traits`] - The `ResultStore` seam
//! - [`stores`] - Storage implementations (`MemoryResultStore`)
//! - [`testing`] - Deterministic fixtures

pub mod error;
pub mod model;
pub mod pipeline;
pub mod stores;
pub mod testing;
pub mod traits;
pub mod types;

// Re-export core types at crate root
pub use error::{ArtifactError, PipelineError, StoreError};
pub use model::{
    ContextBuilder, FeatureStats, ModelArtifact, PipelineContext, QualityModel,
    ReferenceDistribution,
};
pub use traits::ResultStore;
pub use types::{
    config::{PipelineConfig, RecommendConfig},
    deficiency::{Deficiency, Suggestion},
    features::{FeatureSchema, FeatureVector},
    listing::{Listing, ListingId},
    prediction::{Label, Prediction},
    result::StoredResult,
};

// Re-export pipeline entry points
pub use pipeline::{
    analyze, extract, generate, score_batch, score_listing, BatchFailure, BatchReport,
};

// Re-export stores
pub use stores::MemoryResultStore;
