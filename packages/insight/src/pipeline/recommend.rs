//! Recommendation generation: turn deficiencies into ranked, actionable text.
//!
//! Table-driven and fully deterministic, with no learned text generation, so
//! every suggestion is auditable back to the deficiency that produced it.

use crate::types::config::RecommendConfig;
use crate::types::deficiency::{Deficiency, Suggestion};

/// Version tag of the template table below. Bump when templates change so
/// persisted results can be traced to the wording that produced them.
pub const TEMPLATE_TABLE_VERSION: &str = "v1";

/// Fallback row for listings with zero deficiencies, when enabled.
pub const NO_ISSUES_TEXT: &str =
    "No major issues detected. Your listing looks good; consider small refinements to stay competitive.";

/// One row of the feature-to-action lookup table.
struct Template {
    /// Deduplication key: deficiencies sharing a key merge into one
    /// suggestion with their severities combined.
    key: &'static str,
    /// Schema features this template covers
    features: &'static [&'static str],
    /// Human-readable action
    text: &'static str,
}

/// Fixed, versioned feature-to-suggestion table.
///
/// All one-hot room-type features share one key so a listing odd on
/// several of them yields a single suggestion rather than five.
const TEMPLATES: &[Template] = &[
    Template {
        key: "cancellation_policy",
        features: &["cancellation_strictness"],
        text: "Add a clear cancellation policy; guests book high-rated listings that state one up front.",
    },
    Template {
        key: "photos",
        features: &["photo_count"],
        text: "Increase your photo count; listings with more photos rate consistently higher.",
    },
    Template {
        key: "description",
        features: &["description_length"],
        text: "Expand your description with structure and detail: space, sleeping arrangement, neighborhood.",
    },
    Template {
        key: "title",
        features: &["title_length"],
        text: "Write a fuller, more descriptive title that highlights your listing's strongest point.",
    },
    Template {
        key: "amenities",
        features: &["amenity_count"],
        text: "List more of your amenities; guests filter on them and rate completeness highly.",
    },
    Template {
        key: "wifi",
        features: &["has_wifi"],
        text: "Add WiFi, or mention it explicitly in your amenity list if you already offer it.",
    },
    Template {
        key: "kitchen",
        features: &["has_kitchen"],
        text: "Mention kitchen access in your amenities; it is a top filter for longer stays.",
    },
    Template {
        key: "parking",
        features: &["has_parking"],
        text: "Mention parking options in your amenities, even street or paid parking nearby.",
    },
    Template {
        key: "washer",
        features: &["has_washer"],
        text: "Mention laundry facilities if available; a washer is a strong amenity signal.",
    },
    Template {
        key: "pets",
        features: &["pet_friendly"],
        text: "Consider allowing pets, or state your pet policy clearly in the description.",
    },
    Template {
        key: "price",
        features: &["price"],
        text: "Review your nightly price against comparable high-rated listings in your area.",
    },
    Template {
        key: "minimum_nights",
        features: &["minimum_nights"],
        text: "Lower your minimum-nights requirement to match what high-rated listings offer.",
    },
    Template {
        key: "reviews",
        features: &["review_count"],
        text: "Encourage guests to leave reviews; review volume builds trust with new bookers.",
    },
    Template {
        key: "location_appeal",
        features: &["centrality"],
        text: "Boost location appeal by mentioning nearby landmarks and transport connections.",
    },
    Template {
        key: "instant_booking",
        features: &["instant_bookable"],
        text: "Enable instant booking; guests favor listings they can book without a request.",
    },
    Template {
        key: "room_type",
        features: &[
            "room_type_entire_home",
            "room_type_private_room",
            "room_type_shared_room",
            "room_type_hotel_room",
            "room_type_unknown",
        ],
        text: "Make sure your room type is set accurately; mislabeled listings disappoint guests.",
    },
];

fn template_for(feature: &str) -> Option<&'static Template> {
    TEMPLATES.iter().find(|t| t.features.contains(&feature))
}

/// Translate an ordered deficiency list into ranked suggestions.
///
/// Deficiencies mapping to the same template deduplicate, combining their
/// severities, so the merged suggestion ranks by total expected impact.
/// Output is capped at `config.max_suggestions` and assigned 1-based
/// priority ranks. Deterministic given the same input.
pub fn generate(deficiencies: &[Deficiency], config: &RecommendConfig) -> Vec<Suggestion> {
    // (template, combined severity, first-seen index) per dedup key
    let mut merged: Vec<(&'static Template, f64, usize)> = Vec::new();

    for (index, deficiency) in deficiencies.iter().enumerate() {
        let Some(template) = template_for(&deficiency.feature) else {
            continue;
        };

        match merged.iter_mut().find(|(t, _, _)| t.key == template.key) {
            Some((_, severity, _)) => *severity += deficiency.severity,
            None => merged.push((template, deficiency.severity, index)),
        }
    }

    // Combined severity descending; ties keep the incoming deficiency
    // order, which is already the deterministic analyzer order.
    merged.sort_by(|a, b| {
        b.1.partial_cmp(&a.1)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.2.cmp(&b.2))
    });

    let mut suggestions: Vec<Suggestion> = merged
        .into_iter()
        .take(config.max_suggestions)
        .enumerate()
        .map(|(rank, (template, _, _))| Suggestion::new(template.text, rank + 1))
        .collect();

    if suggestions.is_empty() && config.include_fallback {
        suggestions.push(Suggestion::new(NO_ISSUES_TEXT, 1));
    }

    suggestions
}
