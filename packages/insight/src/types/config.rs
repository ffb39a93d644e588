//! Configuration types for the scoring pipeline.

use serde::{Deserialize, Serialize};

/// Tunables for deficiency analysis and recommendation generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// High-rated predictions below this confidence still receive minor
    /// suggestions ("almost no suggestions" is a documented outcome, not
    /// an error). Default: 0.70.
    pub borderline_margin: f64,

    /// Noise floor: deficiencies below this severity are discarded.
    /// Default: 0.25.
    pub min_severity: f64,

    /// Recommendation generation settings.
    #[serde(default)]
    pub recommend: RecommendConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            borderline_margin: 0.70,
            min_severity: 0.25,
            recommend: RecommendConfig::default(),
        }
    }
}

impl PipelineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the borderline confidence margin.
    pub fn with_borderline_margin(mut self, margin: f64) -> Self {
        self.borderline_margin = margin.clamp(0.0, 1.0);
        self
    }

    /// Set the minimum severity noise floor.
    pub fn with_min_severity(mut self, min_severity: f64) -> Self {
        self.min_severity = min_severity.max(0.0);
        self
    }

    /// Set recommendation config.
    pub fn with_recommend(mut self, recommend: RecommendConfig) -> Self {
        self.recommend = recommend;
        self
    }
}

/// Settings for turning deficiencies into suggestions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendConfig {
    /// Cap on emitted suggestions, to avoid overwhelming a host.
    /// Default: 5.
    pub max_suggestions: usize,

    /// Emit a friendly "no major issues detected" row when a scored
    /// listing has zero deficiencies. Off by default; presentation layers
    /// opt in.
    pub include_fallback: bool,
}

impl Default for RecommendConfig {
    fn default() -> Self {
        Self {
            max_suggestions: 5,
            include_fallback: false,
        }
    }
}

impl RecommendConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the suggestion cap.
    pub fn with_max_suggestions(mut self, max: usize) -> Self {
        self.max_suggestions = max;
        self
    }

    /// Enable the "no major issues" fallback row.
    pub fn with_fallback(mut self) -> Self {
        self.include_fallback = true;
        self
    }
}
