//! Persisted per-listing results served by the lookup path.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::deficiency::Suggestion;
use crate::types::prediction::Prediction;

/// The `(label, confidence, ranked suggestions)` value persisted per
/// listing by a batch run. This is the only contract the lookup service
/// depends on; physical encoding beyond serde is a collaborator concern.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredResult {
    pub prediction: Prediction,

    /// Ordered by `priority_rank`
    pub suggestions: Vec<Suggestion>,

    /// When the batch run scored this listing
    pub scored_at: DateTime<Utc>,
}

impl StoredResult {
    pub fn new(prediction: Prediction, suggestions: Vec<Suggestion>) -> Self {
        Self {
            prediction,
            suggestions,
            scored_at: Utc::now(),
        }
    }
}
