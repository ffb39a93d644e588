//! Frozen quality-classifier parameters.
//!
//! Training is an offline, external batch job; the runtime only consumes a
//! versioned artifact of logistic-regression coefficients. Linear
//! coefficients double as the feature-importance source the deficiency
//! analyzer needs, which keeps suggestions interpretable rather than
//! merely anomaly-based.

use std::path::Path;

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{ArtifactResult, PipelineError, Result};
use crate::types::features::{FeatureSchema, FeatureVector};
use crate::types::prediction::{Label, Prediction};

/// Serialized classifier parameters, as produced by the offline trainer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelArtifact {
    /// Artifact version tag, e.g. "2024-11-listings-eu"
    pub version: String,

    /// Fingerprint of the feature schema the model was trained against
    pub schema_fingerprint: String,

    /// Per-feature logistic-regression coefficients, in schema order
    pub weights: IndexMap<String, f64>,

    /// Intercept term
    pub intercept: f64,

    /// When the trainer produced this artifact
    pub created_at: DateTime<Utc>,
}

impl ModelArtifact {
    /// Build an artifact from explicit coefficients.
    pub fn new(
        version: impl Into<String>,
        schema: &FeatureSchema,
        weights: IndexMap<String, f64>,
        intercept: f64,
    ) -> Self {
        Self {
            version: version.into(),
            schema_fingerprint: schema.fingerprint(),
            weights,
            intercept,
            created_at: Utc::now(),
        }
    }

    /// Load an artifact from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> ArtifactResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Save the artifact as pretty-printed JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> ArtifactResult<()> {
        let text = serde_json::to_string_pretty(self)?;
        std::fs::write(path, text)?;
        Ok(())
    }
}

/// A loaded, validated quality classifier.
///
/// Immutable after construction; safe to share across any number of
/// concurrent listing evaluations.
#[derive(Debug, Clone)]
pub struct QualityModel {
    version: String,
    schema_fingerprint: String,
    weights: IndexMap<String, f64>,
    intercept: f64,
    max_abs_weight: f64,
}

impl QualityModel {
    /// Validate an artifact against the extractor schema and freeze it.
    ///
    /// Fails with `SchemaMismatch` when the artifact was trained against a
    /// different schema, or when its coefficient set does not cover the
    /// schema's features exactly.
    pub fn from_artifact(artifact: ModelArtifact, schema: &FeatureSchema) -> Result<Self> {
        let expected = schema.fingerprint();
        if artifact.schema_fingerprint != expected {
            return Err(PipelineError::SchemaMismatch {
                expected,
                actual: artifact.schema_fingerprint,
            });
        }

        let covers_schema = artifact.weights.len() == schema.len()
            && schema.names().iter().all(|n| artifact.weights.contains_key(n));
        if !covers_schema {
            return Err(PipelineError::SchemaMismatch {
                expected,
                actual: format!("{} coefficients (artifact {})", artifact.weights.len(), artifact.version),
            });
        }

        let max_abs_weight = artifact
            .weights
            .values()
            .fold(0.0_f64, |acc, w| acc.max(w.abs()));

        Ok(Self {
            version: artifact.version,
            schema_fingerprint: artifact.schema_fingerprint,
            weights: artifact.weights,
            intercept: artifact.intercept,
            max_abs_weight,
        })
    }

    /// Artifact version tag.
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Fingerprint of the schema this model was trained against.
    pub fn schema_fingerprint(&self) -> &str {
        &self.schema_fingerprint
    }

    /// Coefficient for a feature (0.0 for names outside the schema).
    pub fn weight(&self, feature: &str) -> f64 {
        self.weights.get(feature).copied().unwrap_or(0.0)
    }

    /// Normalized feature importance in `[0, 1]`: `|w| / max|w|`.
    ///
    /// Used by the deficiency analyzer to scale severity by actual
    /// predictive contribution.
    pub fn importance(&self, feature: &str) -> f64 {
        if self.max_abs_weight == 0.0 {
            return 0.0;
        }
        self.weight(feature).abs() / self.max_abs_weight
    }

    /// Classify one feature vector.
    ///
    /// Confidence is the calibrated probability of the high-rated class;
    /// the label thresholds it at 0.5.
    pub fn predict(&self, vector: &FeatureVector) -> Result<Prediction> {
        if vector.schema_fingerprint != self.schema_fingerprint {
            return Err(PipelineError::SchemaMismatch {
                expected: self.schema_fingerprint.clone(),
                actual: vector.schema_fingerprint.clone(),
            });
        }

        let logit: f64 = self.intercept
            + vector
                .iter()
                .map(|(name, value)| self.weight(name) * value)
                .sum::<f64>();

        let confidence = sigmoid(logit);
        let label = if confidence >= 0.5 {
            Label::HighRated
        } else {
            Label::LowRated
        };

        Ok(Prediction::new(label, confidence))
    }
}

fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}
