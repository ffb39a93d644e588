//! Immutable pipeline context: schema + frozen artifacts + config.
//!
//! All process-wide state (model parameters, reference distribution) lives
//! in one explicitly constructed, immutable object passed into every
//! pipeline call, so multiple model versions can coexist in tests or
//! during rollout. No listing is scored before the context exists.

use crate::error::{PipelineError, Result};
use crate::model::quality::QualityModel;
use crate::model::reference::ReferenceDistribution;
use crate::types::config::PipelineConfig;
use crate::types::features::FeatureSchema;

/// Everything a scoring run needs, loaded once at initialization.
#[derive(Debug, Clone)]
pub struct PipelineContext {
    pub schema: FeatureSchema,
    pub model: QualityModel,
    pub reference: ReferenceDistribution,
    pub config: PipelineConfig,
}

impl PipelineContext {
    /// Start building a context for a schema.
    pub fn builder(schema: FeatureSchema) -> ContextBuilder {
        ContextBuilder {
            schema,
            model: None,
            reference: None,
            config: PipelineConfig::default(),
        }
    }
}

/// Builder enforcing the initialization contract: scoring before the
/// classifier and reference distribution are loaded is a programming
/// error, surfaced as `ModelNotLoaded` at `build()`.
pub struct ContextBuilder {
    schema: FeatureSchema,
    model: Option<QualityModel>,
    reference: Option<ReferenceDistribution>,
    config: PipelineConfig,
}

impl ContextBuilder {
    /// Attach loaded classifier parameters.
    pub fn with_model(mut self, model: QualityModel) -> Self {
        self.model = Some(model);
        self
    }

    /// Attach the reference distribution.
    pub fn with_reference(mut self, reference: ReferenceDistribution) -> Self {
        self.reference = Some(reference);
        self
    }

    /// Override the default pipeline config.
    pub fn with_config(mut self, config: PipelineConfig) -> Self {
        self.config = config;
        self
    }

    /// Validate and freeze the context.
    ///
    /// Fails with `ModelNotLoaded` when an artifact is missing, and with
    /// `SchemaMismatch` when the model or reference was produced under a
    /// different schema than the extractor's.
    pub fn build(self) -> Result<PipelineContext> {
        let model = self
            .model
            .ok_or(PipelineError::ModelNotLoaded("classifier parameters"))?;
        let reference = self
            .reference
            .ok_or(PipelineError::ModelNotLoaded("reference distribution"))?;

        let expected = self.schema.fingerprint();
        if model.schema_fingerprint() != expected {
            return Err(PipelineError::SchemaMismatch {
                expected,
                actual: model.schema_fingerprint().to_string(),
            });
        }
        if reference.schema_fingerprint != expected {
            return Err(PipelineError::SchemaMismatch {
                expected,
                actual: reference.schema_fingerprint.clone(),
            });
        }

        Ok(PipelineContext {
            schema: self.schema,
            model,
            reference,
            config: self.config,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_without_model_fails() {
        let schema = FeatureSchema::v1();
        let reference = ReferenceDistribution::fit("test", &schema, &[]).unwrap();

        let err = PipelineContext::builder(schema)
            .with_reference(reference)
            .build()
            .unwrap_err();

        assert!(matches!(err, PipelineError::ModelNotLoaded(_)));
    }

    #[test]
    fn test_build_without_reference_fails() {
        let schema = FeatureSchema::v1();
        let err = PipelineContext::builder(schema).build().unwrap_err();
        assert!(matches!(err, PipelineError::ModelNotLoaded(_)));
    }

    #[test]
    fn test_build_rejects_skewed_reference() {
        let schema = FeatureSchema::v1();
        let mut other = FeatureSchema::v1();
        other.version = "v2".to_string();

        let reference = ReferenceDistribution::fit("test", &other, &[]).unwrap();
        let model = crate::testing::uniform_model(&schema, 0.1);

        let err = PipelineContext::builder(schema)
            .with_model(model)
            .with_reference(reference)
            .build()
            .unwrap_err();

        assert!(matches!(err, PipelineError::SchemaMismatch { .. }));
    }
}
