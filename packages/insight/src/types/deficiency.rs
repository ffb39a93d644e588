//! Deficiencies and the suggestions derived from them.

use serde::{Deserialize, Serialize};

/// One feature flagged as responsible for a low (or borderline) score.
///
/// `severity` is the standardized deviation from the high-rated reference
/// distribution, scaled by the classifier's importance weight for the
/// feature, so deficiencies are comparable across differently-scaled
/// features.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Deficiency {
    /// Schema feature name
    pub feature: String,

    /// The listing's value for this feature
    pub observed: f64,

    /// Central tendency of the high-rated reference distribution
    pub reference: f64,

    /// Importance-weighted standardized deviation, `>= 0`
    pub severity: f64,
}

impl Deficiency {
    pub fn new(feature: impl Into<String>, observed: f64, reference: f64, severity: f64) -> Self {
        Self {
            feature: feature.into(),
            observed,
            reference,
            severity,
        }
    }
}

/// One ranked, human-readable, actionable suggestion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    /// Action text from the fixed template table
    pub text: String,

    /// 1-based rank; lower rank = higher expected impact
    pub priority_rank: usize,
}

impl Suggestion {
    pub fn new(text: impl Into<String>, priority_rank: usize) -> Self {
        Self {
            text: text.into(),
            priority_rank,
        }
    }
}
