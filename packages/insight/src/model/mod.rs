//! Frozen, versioned model artifacts and the pipeline context.

pub mod context;
pub mod quality;
pub mod reference;

pub use context::{ContextBuilder, PipelineContext};
pub use quality::{ModelArtifact, QualityModel};
pub use reference::{FeatureStats, ReferenceDistribution};
