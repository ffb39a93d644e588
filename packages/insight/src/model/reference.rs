//! Reference distribution of feature values among high-rated listings.
//!
//! Computed once over the high-rated subset of a training corpus, then
//! read-only for the lifetime of the run. The deficiency analyzer compares
//! each listing against these per-feature statistics.

use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{ArtifactError, ArtifactResult, PipelineError, Result};
use crate::types::features::{FeatureSchema, FeatureVector};

/// Summary statistics for one feature over the high-rated corpus.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureStats {
    /// Central tendency
    pub mean: f64,

    /// Population standard deviation
    pub std: f64,
}

impl FeatureStats {
    pub fn new(mean: f64, std: f64) -> Self {
        Self { mean, std }
    }
}

/// Per-feature reference statistics, versioned against the schema.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReferenceDistribution {
    /// Artifact version tag
    pub version: String,

    /// Fingerprint of the schema the statistics were computed under
    pub schema_fingerprint: String,

    /// Stats per feature, in schema order
    stats: IndexMap<String, FeatureStats>,
}

impl ReferenceDistribution {
    /// Fit statistics over feature vectors of the high-rated subset.
    ///
    /// Every vector must carry the schema's fingerprint; a foreign vector
    /// means artifact skew and fails the fit with `SchemaMismatch`.
    pub fn fit(
        version: impl Into<String>,
        schema: &FeatureSchema,
        vectors: &[FeatureVector],
    ) -> Result<Self> {
        let fingerprint = schema.fingerprint();
        for vector in vectors {
            if vector.schema_fingerprint != fingerprint {
                return Err(PipelineError::SchemaMismatch {
                    expected: fingerprint,
                    actual: vector.schema_fingerprint.clone(),
                });
            }
        }

        let n = vectors.len() as f64;
        let mut stats = IndexMap::with_capacity(schema.len());

        for name in schema.names() {
            let (mean, std) = if vectors.is_empty() {
                (0.0, 0.0)
            } else {
                let sum: f64 = vectors.iter().filter_map(|v| v.get(name)).sum();
                let mean = sum / n;
                let var: f64 = vectors
                    .iter()
                    .filter_map(|v| v.get(name))
                    .map(|x| (x - mean).powi(2))
                    .sum::<f64>()
                    / n;
                (mean, var.sqrt())
            };
            stats.insert(name.clone(), FeatureStats::new(mean, std));
        }

        Ok(Self {
            version: version.into(),
            schema_fingerprint: fingerprint,
            stats,
        })
    }

    /// Build a distribution from explicit per-feature statistics.
    ///
    /// Intended for tests and for trainers that compute stats externally.
    pub fn from_stats(
        version: impl Into<String>,
        schema: &FeatureSchema,
        stats: IndexMap<String, FeatureStats>,
    ) -> Self {
        Self {
            version: version.into(),
            schema_fingerprint: schema.fingerprint(),
            stats,
        }
    }

    /// Stats for one feature.
    pub fn stats(&self, feature: &str) -> Option<&FeatureStats> {
        self.stats.get(feature)
    }

    /// Number of features covered.
    pub fn len(&self) -> usize {
        self.stats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stats.is_empty()
    }

    /// Load from a JSON file, rejecting artifacts computed under a
    /// different schema.
    pub fn load(path: impl AsRef<Path>, schema: &FeatureSchema) -> ArtifactResult<Self> {
        let text = std::fs::read_to_string(path)?;
        let loaded: Self = serde_json::from_str(&text)?;

        let expected = schema.fingerprint();
        if loaded.schema_fingerprint != expected {
            return Err(ArtifactError::VersionMismatch {
                expected,
                found: loaded.schema_fingerprint,
            });
        }
        Ok(loaded)
    }

    /// Save as pretty-printed JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> ArtifactResult<()> {
        let text = serde_json::to_string_pretty(self)?;
        std::fs::write(path, text)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::extract::extract;
    use crate::types::listing::Listing;

    #[test]
    fn test_fit_mean_and_std() {
        let schema = FeatureSchema::v1();
        let vectors: Vec<_> = [4_u64, 8, 12]
            .iter()
            .map(|photos| {
                extract(&Listing::new(1, *photos, 100.0).with_photo_count(*photos), &schema)
                    .unwrap()
            })
            .collect();

        let reference = ReferenceDistribution::fit("test", &schema, &vectors).unwrap();
        let stats = reference.stats("photo_count").unwrap();
        assert!((stats.mean - 8.0).abs() < 1e-9);
        // population std of {4, 8, 12}
        assert!((stats.std - (32.0_f64 / 3.0).sqrt()).abs() < 1e-9);
    }

    #[test]
    fn test_fit_rejects_foreign_vectors() {
        let schema = FeatureSchema::v1();
        let mut other = FeatureSchema::v1();
        other.version = "v2".to_string();

        let vector = extract(&Listing::new(1, 1, 100.0), &other).unwrap();
        let err = ReferenceDistribution::fit("test", &schema, &[vector]).unwrap_err();
        assert!(matches!(err, PipelineError::SchemaMismatch { .. }));
    }

    #[test]
    fn test_load_rejects_skewed_artifact() {
        let schema = FeatureSchema::v1();
        let mut other = FeatureSchema::v1();
        other.version = "v2".to_string();

        let reference = ReferenceDistribution::fit("test", &other, &[]).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reference.json");
        reference.save(&path).unwrap();

        let err = ReferenceDistribution::load(&path, &schema).unwrap_err();
        assert!(matches!(err, ArtifactError::VersionMismatch { .. }));
    }
}
