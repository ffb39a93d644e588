//! Fixture builders for tests and examples.
//!
//! Everything here is deterministic: fixed listings, explicit model
//! coefficients, explicit reference statistics.

use indexmap::IndexMap;

use crate::model::context::PipelineContext;
use crate::model::quality::{ModelArtifact, QualityModel};
use crate::model::reference::{FeatureStats, ReferenceDistribution};
use crate::types::features::FeatureSchema;
use crate::types::listing::Listing;

/// A well-appointed listing: strict cancellation policy, many photos,
/// rich description, common amenities, central location.
pub fn well_listing(seller_id: u64, listing_id: u64) -> Listing {
    Listing::new(seller_id, listing_id, 85.0)
        .with_title("Bright canal-side loft in the old town")
        .with_description(
            "Spacious and bright loft overlooking the canal, two minutes from \
             the tram stop. Sleeps four across two bedrooms, fully equipped \
             kitchen, fast WiFi, and a washer in the hallway closet.",
        )
        .with_amenities(["wifi", "kitchen", "washer", "heating", "parking"])
        .with_location(52.3680, 4.9036)
        .with_photo_count(25)
        .with_review_count(140)
        .with_room_type("entire_home")
        .with_cancellation_policy("strict")
        .instant_bookable()
        .with_country("Netherlands")
}

/// A weak listing: no photos, no cancellation policy, empty description,
/// no amenities, no location.
pub fn weak_listing(seller_id: u64, listing_id: u64) -> Listing {
    Listing::new(seller_id, listing_id, 95.0)
        .with_title("Room")
        .with_country("Netherlands")
}

/// Model over the v1 schema with the given `(feature, weight)` pairs;
/// every other coefficient is zero.
pub fn model_with_weights(
    schema: &FeatureSchema,
    pairs: &[(&str, f64)],
    intercept: f64,
) -> QualityModel {
    let mut weights = IndexMap::new();
    for name in schema.names() {
        weights.insert(name.clone(), 0.0);
    }
    for (name, weight) in pairs {
        weights.insert((*name).to_string(), *weight);
    }

    QualityModel::from_artifact(
        ModelArtifact::new("test-model", schema, weights, intercept),
        schema,
    )
    .expect("fixture artifact matches schema")
}

/// Model with the same weight on every feature.
pub fn uniform_model(schema: &FeatureSchema, weight: f64) -> QualityModel {
    let pairs: Vec<(&str, f64)> = schema.names().iter().map(|n| (n.as_str(), weight)).collect();
    model_with_weights(schema, &pairs, 0.0)
}

/// Reference distribution with the given `(feature, mean, std)` triples;
/// every other feature gets mean 0, std 1.
pub fn reference_of(schema: &FeatureSchema, triples: &[(&str, f64, f64)]) -> ReferenceDistribution {
    let mut stats = IndexMap::new();
    for name in schema.names() {
        stats.insert(name.clone(), FeatureStats::new(0.0, 1.0));
    }
    for (name, mean, std) in triples {
        stats.insert((*name).to_string(), FeatureStats::new(*mean, *std));
    }
    ReferenceDistribution::from_stats("test-reference", schema, stats)
}

/// Ready-to-use context over the v1 schema from explicit coefficients and
/// reference statistics, with default config.
pub fn context_with(weights: &[(&str, f64)], stats: &[(&str, f64, f64)]) -> PipelineContext {
    let schema = FeatureSchema::v1();
    let model = model_with_weights(&schema, weights, 0.0);
    let reference = reference_of(&schema, stats);

    PipelineContext::builder(schema)
        .with_model(model)
        .with_reference(reference)
        .build()
        .expect("fixture context is coherent")
}
