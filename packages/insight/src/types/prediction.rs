//! Classifier output types.

use serde::{Deserialize, Serialize};

/// Binary quality label assigned by the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Label {
    /// Listing is predicted to be among the high-rated group
    HighRated,
    /// Listing is predicted to rate below the high-rated threshold
    LowRated,
}

impl Label {
    pub fn is_high_rated(&self) -> bool {
        matches!(self, Label::HighRated)
    }
}

/// Per-listing classifier prediction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub label: Label,

    /// Calibrated probability of the high-rated class, in `[0, 1]`
    pub confidence: f64,
}

impl Prediction {
    pub fn new(label: Label, confidence: f64) -> Self {
        Self {
            label,
            confidence: confidence.clamp(0.0, 1.0),
        }
    }

    /// High-rated but not comfortably so: still eligible for minor
    /// suggestions below the configured margin.
    pub fn is_borderline(&self, margin: f64) -> bool {
        self.label.is_high_rated() && self.confidence < margin
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confidence_clamping() {
        assert_eq!(Prediction::new(Label::HighRated, 1.5).confidence, 1.0);
        assert_eq!(Prediction::new(Label::LowRated, -0.1).confidence, 0.0);
    }

    #[test]
    fn test_borderline() {
        let solid = Prediction::new(Label::HighRated, 0.95);
        let shaky = Prediction::new(Label::HighRated, 0.55);
        let low = Prediction::new(Label::LowRated, 0.2);

        assert!(!solid.is_borderline(0.70));
        assert!(shaky.is_borderline(0.70));
        assert!(!low.is_borderline(0.70));
    }
}
