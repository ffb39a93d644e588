//! End-to-end pipeline scenarios covering extract, predict, analyze, generate,
//! batch isolation, and lookup behavior.

use insight::testing::{context_with, model_with_weights, weak_listing, well_listing};
use insight::{
    analyze, extract, score_batch, score_listing, FeatureSchema, Label, ListingId,
    MemoryResultStore, PipelineConfig, PipelineContext, RecommendConfig, ResultStore, StoreError,
};

/// A context whose reference statistics are centered on the well-appointed
/// fixture listing, so that listing sits within one standard deviation of
/// the reference on every feature.
fn production_like_context() -> PipelineContext {
    let schema = FeatureSchema::v1();
    let model = model_with_weights(
        &schema,
        &[
            ("cancellation_strictness", 1.2),
            ("photo_count", 0.15),
            ("description_length", 0.01),
            ("amenity_count", 0.3),
            ("has_wifi", 0.8),
            ("review_count", 0.01),
            ("centrality", 0.5),
            ("minimum_nights", -0.2),
        ],
        -6.0,
    );

    let well = extract(&well_listing(1, 1), &schema).unwrap();
    let triples: Vec<(String, f64, f64)> = well
        .iter()
        .map(|(name, value)| (name.to_string(), value, (value.abs() * 0.25).max(1.0)))
        .collect();
    let borrowed: Vec<(&str, f64, f64)> =
        triples.iter().map(|(n, m, s)| (n.as_str(), *m, *s)).collect();

    let reference = insight::testing::reference_of(&schema, &borrowed);
    PipelineContext::builder(schema)
        .with_model(model)
        .with_reference(reference)
        .build()
        .unwrap()
}

#[test]
fn scenario_a_strong_listing_gets_no_suggestions() {
    let ctx = production_like_context();
    let listing = well_listing(42, 4242);

    let (_, result) = score_listing(&listing, &ctx).unwrap();

    assert_eq!(result.prediction.label, Label::HighRated);
    assert!(
        result.prediction.confidence >= 0.95,
        "confidence was {}",
        result.prediction.confidence
    );
    assert!(result.suggestions.is_empty());
}

#[test]
fn scenario_b_missing_policy_and_photos_rank_first() {
    let ctx = production_like_context();

    // Mostly fine, but no cancellation policy and zero photos; description
    // slightly short of the reference so a lower-severity deficiency exists
    // to rank against.
    let listing = well_listing(7, 7001)
        .with_cancellation_policy("none")
        .with_photo_count(0)
        .with_description("Nice flat near the center with plenty of light.");

    let (_, result) = score_listing(&listing, &ctx).unwrap();
    assert_eq!(result.prediction.label, Label::LowRated);

    assert!(result.suggestions.len() >= 2);
    let top_two: Vec<&str> = result.suggestions[..2].iter().map(|s| s.text.as_str()).collect();
    assert!(
        top_two.iter().any(|t| t.contains("cancellation policy")),
        "top suggestions were {top_two:?}"
    );
    assert!(
        top_two.iter().any(|t| t.contains("photo count")),
        "top suggestions were {top_two:?}"
    );

    // Lower-severity deficiencies rank strictly below the two big ones.
    if let Some(description_suggestion) = result
        .suggestions
        .iter()
        .find(|s| s.text.contains("description"))
    {
        assert!(description_suggestion.priority_rank > 2);
    }
}

#[test]
fn full_pipeline_is_deterministic_and_idempotent() {
    let ctx = production_like_context();
    let listing = weak_listing(3, 33);

    let (id_a, result_a) = score_listing(&listing, &ctx).unwrap();
    let (id_b, result_b) = score_listing(&listing, &ctx).unwrap();

    assert_eq!(id_a, id_b);
    assert_eq!(result_a.prediction, result_b.prediction);
    assert_eq!(result_a.suggestions, result_b.suggestions);

    // analyze twice on the same inputs: byte-identical ordered output
    let vector = extract(&listing, &ctx.schema).unwrap();
    let prediction = ctx.model.predict(&vector).unwrap();
    let x = analyze(&vector, &prediction, &ctx).unwrap();
    let y = analyze(&vector, &prediction, &ctx).unwrap();
    assert_eq!(x, y);
}

#[test]
fn extraction_schema_is_total_over_field_presence() {
    let schema = FeatureSchema::v1();
    let expected: Vec<&str> = schema.names().iter().map(String::as_str).collect();

    let sparse = weak_listing(1, 1);
    let rich = well_listing(2, 2);

    for listing in [&sparse, &rich] {
        let vector = extract(listing, &schema).unwrap();
        let names: Vec<&str> = vector.names().collect();
        assert_eq!(names, expected);
    }
}

#[tokio::test]
async fn batch_isolates_bad_rows_and_serves_lookups() {
    let ctx = context_with(
        &[("photo_count", 0.5), ("cancellation_strictness", 0.8)],
        &[
            ("photo_count", 12.0, 4.0),
            ("cancellation_strictness", 2.0, 1.0),
        ],
    );
    let store = MemoryResultStore::new();

    let mut malformed = well_listing(5, 50);
    malformed.listing_id = None;
    let listings = vec![well_listing(5, 51), malformed, weak_listing(5, 52)];

    let report = score_batch(&listings, &ctx, &store).await.unwrap();
    assert_eq!(report.scored, 2);
    assert_eq!(report.failed.len(), 1);
    assert!(report.failed[0].error.contains("listing_id"));

    // Lookup hit: the weak listing is borderline under this model and
    // still receives suggestions
    let hit = store.get_result(ListingId::new(5, 52)).await.unwrap();
    assert!(!hit.suggestions.is_empty());

    // Lookup miss is a typed not-found, never a fault
    let miss = store.get_result(ListingId::new(5, 50)).await.unwrap_err();
    assert!(matches!(miss, StoreError::NotFound { .. }));
}

#[test]
fn fallback_row_replaces_empty_suggestions_when_enabled() {
    let schema = FeatureSchema::v1();
    let base = production_like_context();
    let config = PipelineConfig::default().with_recommend(RecommendConfig::default().with_fallback());

    let ctx = PipelineContext::builder(schema)
        .with_model(base.model.clone())
        .with_reference(base.reference.clone())
        .with_config(config)
        .build()
        .unwrap();

    let (_, result) = score_listing(&well_listing(9, 90), &ctx).unwrap();
    assert_eq!(result.suggestions.len(), 1);
    assert!(result.suggestions[0].text.contains("No major issues"));
}
