//! Deficiency analysis: which features drag a listing's score down.
//!
//! For each feature the analyzer standardizes the listing's deviation from
//! the high-rated reference distribution and scales it by the classifier's
//! importance weight, so severity reflects actual predictive contribution
//! rather than raw statistical deviation. Fully deterministic: the same
//! inputs always yield the same ordered list.

use crate::error::{PipelineError, Result};
use crate::model::context::PipelineContext;
use crate::types::deficiency::Deficiency;
use crate::types::features::FeatureVector;
use crate::types::prediction::Prediction;

/// Floor for near-constant features so standardization never divides by
/// zero; a feature the high-rated corpus holds constant simply produces a
/// huge z-score when violated, which is the intended signal.
const STD_FLOOR: f64 = 1e-9;

/// Rank the features most responsible for a low (or borderline) score.
///
/// Returns an empty list, a valid outcome rather than an error, when the
/// prediction is confidently high-rated, or when no deviation clears the
/// severity noise floor. Output is sorted by severity descending with ties
/// broken by the schema's fixed feature ordering.
pub fn analyze(
    vector: &FeatureVector,
    prediction: &Prediction,
    ctx: &PipelineContext,
) -> Result<Vec<Deficiency>> {
    let expected = ctx.schema.fingerprint();
    if vector.schema_fingerprint != expected {
        return Err(PipelineError::SchemaMismatch {
            expected,
            actual: vector.schema_fingerprint.clone(),
        });
    }

    // Confidently high-rated listings get no deficiencies; borderline
    // high-rated ones may still receive minor suggestions.
    if prediction.label.is_high_rated() && !prediction.is_borderline(ctx.config.borderline_margin) {
        return Ok(Vec::new());
    }

    let mut deficiencies = Vec::new();
    for name in ctx.schema.names() {
        let observed = match vector.get(name) {
            Some(v) => v,
            None => continue,
        };
        let stats = match ctx.reference.stats(name) {
            Some(s) => s,
            None => continue,
        };

        let z = (observed - stats.mean) / stats.std.max(STD_FLOOR);
        let weight = ctx.model.weight(name);

        // A deviation only counts against the listing when it opposes the
        // high-rated class: below the reference on a positive-weight
        // feature, or above it on a negative-weight one.
        if z * weight >= 0.0 {
            continue;
        }

        let severity = z.abs() * ctx.model.importance(name);
        if severity < ctx.config.min_severity {
            continue;
        }

        deficiencies.push(Deficiency::new(name.clone(), observed, stats.mean, severity));
    }

    // Severity descending; ties resolve by schema position so output order
    // is reproducible byte for byte.
    deficiencies.sort_by(|a, b| {
        b.severity
            .partial_cmp(&a.severity)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| {
                ctx.schema
                    .position(&a.feature)
                    .cmp(&ctx.schema.position(&b.feature))
            })
    });

    Ok(deficiencies)
}
