//! Feature schema and ordered feature vectors.
//!
//! Every listing scored under one pipeline configuration must produce a
//! vector with the same keys in the same order: the classifier and the
//! deficiency analyzer both depend on that contract. The schema carries a
//! SHA-256 fingerprint so version skew between artifacts is detected
//! instead of silently mis-scoring.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Frozen, versioned feature schema established at training time.
///
/// Holds the ordered feature-name list plus the categorical vocabularies
/// used for encoding. The declaration order doubles as the fixed
/// feature-priority ordering used to break severity ties deterministically.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureSchema {
    /// Schema version tag, e.g. "v1"
    pub version: String,

    /// Ordered feature names
    names: Vec<String>,

    /// Room-type vocabulary (one-hot); unseen values map to `unknown`
    pub room_types: Vec<String>,

    /// Cancellation-policy vocabulary, ordered from least to most strict;
    /// position in this list is the ordinal encoding
    pub cancellation_policies: Vec<String>,
}

/// Room-type bucket for categories outside the trained vocabulary.
pub const UNKNOWN_CATEGORY: &str = "unknown";

impl FeatureSchema {
    /// The production v1 schema.
    ///
    /// Order matters: higher-impact features come first so that severity
    /// ties resolve toward the more actionable suggestion.
    pub fn v1() -> Self {
        let room_types = vec![
            "entire_home".to_string(),
            "private_room".to_string(),
            "shared_room".to_string(),
            "hotel_room".to_string(),
            UNKNOWN_CATEGORY.to_string(),
        ];

        let cancellation_policies = vec![
            "none".to_string(),
            "flexible".to_string(),
            "moderate".to_string(),
            "strict".to_string(),
        ];

        let mut names: Vec<String> = [
            "cancellation_strictness",
            "photo_count",
            "description_length",
            "title_length",
            "amenity_count",
            "has_wifi",
            "has_kitchen",
            "has_parking",
            "has_washer",
            "pet_friendly",
            "price",
            "minimum_nights",
            "review_count",
            "centrality",
            "instant_bookable",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();

        for room_type in &room_types {
            names.push(format!("room_type_{room_type}"));
        }

        Self {
            version: "v1".to_string(),
            names,
            room_types,
            cancellation_policies,
        }
    }

    /// Ordered feature names.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Number of features.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Position of a feature in the fixed priority ordering.
    pub fn position(&self, feature: &str) -> Option<usize> {
        self.names.iter().position(|n| n == feature)
    }

    /// Ordinal encoding of a cancellation policy; unseen values fall into
    /// the least-strict bucket (0).
    pub fn cancellation_ordinal(&self, policy: &str) -> f64 {
        self.cancellation_policies
            .iter()
            .position(|p| p.eq_ignore_ascii_case(policy))
            .unwrap_or(0) as f64
    }

    /// Map a raw room type onto the trained vocabulary, falling back to
    /// the explicit `unknown` bucket.
    pub fn room_type_bucket<'a>(&'a self, room_type: Option<&str>) -> &'a str {
        room_type
            .and_then(|raw| {
                self.room_types
                    .iter()
                    .find(|t| t.eq_ignore_ascii_case(raw.trim()))
            })
            .map(String::as_str)
            .unwrap_or(UNKNOWN_CATEGORY)
    }

    /// Stable SHA-256 fingerprint over version, names, and vocabularies.
    ///
    /// Travels with every vector and artifact so that a schema change is
    /// caught as a mismatch rather than a silently wrong score.
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.version.as_bytes());
        for name in &self.names {
            hasher.update(b"\0");
            hasher.update(name.as_bytes());
        }
        hasher.update(b"\0rt");
        for t in &self.room_types {
            hasher.update(b"\0");
            hasher.update(t.as_bytes());
        }
        hasher.update(b"\0cp");
        for p in &self.cancellation_policies {
            hasher.update(b"\0");
            hasher.update(p.as_bytes());
        }
        format!("{:x}", hasher.finalize())
    }
}

/// Ordered feature-name to value mapping derived from one listing.
///
/// Keys and their order always equal the schema it was extracted under;
/// the fingerprint makes that checkable at classification time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    values: IndexMap<String, f64>,
    /// Fingerprint of the schema this vector was extracted under
    pub schema_fingerprint: String,
}

impl FeatureVector {
    /// Create an empty vector tagged with a schema fingerprint.
    ///
    /// Intended for the extractor, which fills values in schema order.
    pub fn empty(schema: &FeatureSchema) -> Self {
        Self {
            values: IndexMap::with_capacity(schema.len()),
            schema_fingerprint: schema.fingerprint(),
        }
    }

    /// Append a feature value. Insertion order is preserved.
    pub fn push(&mut self, name: impl Into<String>, value: f64) {
        self.values.insert(name.into(), value);
    }

    /// Get a feature value by name.
    pub fn get(&self, name: &str) -> Option<f64> {
        self.values.get(name).copied()
    }

    /// Iterate `(name, value)` in schema order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.values.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Feature names in schema order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Check this vector was extracted under the given schema.
    pub fn matches_schema(&self, schema: &FeatureSchema) -> bool {
        self.schema_fingerprint == schema.fingerprint()
    }

    /// Replace one value, keeping order. Test helper for perturbations.
    pub fn with_value(mut self, name: &str, value: f64) -> Self {
        if let Some(slot) = self.values.get_mut(name) {
            *slot = value;
        }
        self
    }
}
