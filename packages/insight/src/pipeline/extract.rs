//! Feature extraction: one raw listing becomes one fixed-shape feature vector.
//!
//! Deterministic, no randomness: the same listing under the same schema
//! always produces the same vector. Missing optional attributes take
//! documented defaults; only `seller_id`, `listing_id`, and `price` are
//! required.

use crate::error::{PipelineError, Result};
use crate::types::features::{FeatureSchema, FeatureVector};
use crate::types::listing::Listing;

/// Amenity keyword behind each presence-indicator feature.
///
/// Matching is case-insensitive substring over the normalized tag list, so
/// "Fast WiFi" and "wifi" both light up `has_wifi`.
const AMENITY_KEYWORDS: &[(&str, &str)] = &[
    ("has_wifi", "wifi"),
    ("has_kitchen", "kitchen"),
    ("has_parking", "parking"),
    ("has_washer", "washer"),
    ("pet_friendly", "pet"),
];

/// Fixed city-center table for the centrality feature.
///
/// Deliberately coarse: nearest-center distance is a proxy for "how
/// central is this listing", not a geocoder.
const CITY_CENTERS: &[(&str, f64, f64)] = &[
    ("amsterdam", 52.3676, 4.9041),
    ("berlin", 52.5200, 13.4050),
    ("london", 51.5074, -0.1278),
    ("paris", 48.8566, 2.3522),
    ("rome", 41.9028, 12.4964),
    ("madrid", 40.4168, -3.7038),
    ("lisbon", 38.7223, -9.1393),
    ("vienna", 48.2082, 16.3738),
];

/// Derive the feature vector for one listing under a frozen schema.
///
/// Total for well-formed input. Fails only with `MalformedListing` when a
/// required field is absent; every optional field has a documented default
/// (photo count 0, amenities empty, text "", coordinates zero
/// centrality, cancellation policy "none", minimum nights 1).
pub fn extract(listing: &Listing, schema: &FeatureSchema) -> Result<FeatureVector> {
    if listing.seller_id.is_none() {
        return Err(PipelineError::MalformedListing { field: "seller_id" });
    }
    if listing.listing_id.is_none() {
        return Err(PipelineError::MalformedListing { field: "listing_id" });
    }
    let price = listing
        .price
        .ok_or(PipelineError::MalformedListing { field: "price" })?;

    let amenities_normalized: Vec<String> = listing
        .amenities
        .iter()
        .map(|a| a.to_lowercase())
        .collect();
    let room_bucket = schema.room_type_bucket(listing.room_type.as_deref());

    let mut vector = FeatureVector::empty(schema);
    for name in schema.names() {
        let value = match name.as_str() {
            "cancellation_strictness" => {
                schema.cancellation_ordinal(listing.cancellation_policy.as_deref().unwrap_or("none"))
            }
            "photo_count" => listing.photo_count.unwrap_or(0) as f64,
            "description_length" => listing.description.chars().count() as f64,
            "title_length" => listing.title.chars().count() as f64,
            "amenity_count" => listing.amenities.len() as f64,
            "price" => price,
            "minimum_nights" => listing.minimum_nights.unwrap_or(1) as f64,
            "review_count" => listing.review_count.unwrap_or(0) as f64,
            "centrality" => centrality(listing.latitude, listing.longitude),
            "instant_bookable" => {
                if listing.instant_bookable {
                    1.0
                } else {
                    0.0
                }
            }
            other => {
                if let Some((_, keyword)) = AMENITY_KEYWORDS.iter().find(|(f, _)| *f == other) {
                    has_amenity(&amenities_normalized, keyword)
                } else if let Some(bucket) = other.strip_prefix("room_type_") {
                    if bucket == room_bucket {
                        1.0
                    } else {
                        0.0
                    }
                } else {
                    // Unknown schema entries extract as zero rather than
                    // failing; the fingerprint check catches real drift.
                    0.0
                }
            }
        };
        vector.push(name.clone(), value);
    }

    Ok(vector)
}

fn has_amenity(normalized: &[String], keyword: &str) -> f64 {
    if normalized.iter().any(|a| a.contains(keyword)) {
        1.0
    } else {
        0.0
    }
}

/// Inverse-distance centrality in `(0, 1]`, 0.0 when coordinates are absent.
fn centrality(latitude: Option<f64>, longitude: Option<f64>) -> f64 {
    let (lat, lon) = match (latitude, longitude) {
        (Some(lat), Some(lon)) => (lat, lon),
        _ => return 0.0,
    };

    let nearest_km = CITY_CENTERS
        .iter()
        .map(|(_, c_lat, c_lon)| haversine_km(lat, lon, *c_lat, *c_lon))
        .fold(f64::INFINITY, f64::min);

    1.0 / (1.0 + nearest_km / 10.0)
}

fn haversine_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    const EARTH_RADIUS_KM: f64 = 6371.0;

    let d_lat = (lat2 - lat1).to_radians();
    let d_lon = (lon2 - lon1).to_radians();
    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lon / 2.0).sin().powi(2);

    2.0 * EARTH_RADIUS_KM * a.sqrt().atan2((1.0 - a).sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vector_matches_schema_key_set() {
        let schema = FeatureSchema::v1();
        let listing = Listing::new(7, 8, 90.0);
        let vector = extract(&listing, &schema).unwrap();

        let vector_names: Vec<_> = vector.names().collect();
        let schema_names: Vec<_> = schema.names().iter().map(String::as_str).collect();
        assert_eq!(vector_names, schema_names);
        assert!(vector.matches_schema(&schema));
    }

    #[test]
    fn test_missing_optionals_use_defaults() {
        let schema = FeatureSchema::v1();
        let listing = Listing::new(1, 2, 50.0);
        let vector = extract(&listing, &schema).unwrap();

        assert_eq!(vector.get("photo_count"), Some(0.0));
        assert_eq!(vector.get("description_length"), Some(0.0));
        assert_eq!(vector.get("amenity_count"), Some(0.0));
        assert_eq!(vector.get("minimum_nights"), Some(1.0));
        assert_eq!(vector.get("centrality"), Some(0.0));
        assert_eq!(vector.get("cancellation_strictness"), Some(0.0));
        assert_eq!(vector.get("room_type_unknown"), Some(1.0));
    }

    #[test]
    fn test_required_fields_fail_fast() {
        let schema = FeatureSchema::v1();

        let mut no_price = Listing::new(1, 2, 0.0);
        no_price.price = None;
        let err = extract(&no_price, &schema).unwrap_err();
        assert!(matches!(
            err,
            PipelineError::MalformedListing { field: "price" }
        ));

        let mut no_seller = Listing::new(1, 2, 10.0);
        no_seller.seller_id = None;
        let err = extract(&no_seller, &schema).unwrap_err();
        assert!(matches!(
            err,
            PipelineError::MalformedListing { field: "seller_id" }
        ));
    }

    #[test]
    fn test_amenity_indicators() {
        let schema = FeatureSchema::v1();
        let listing = Listing::new(1, 2, 75.0)
            .with_amenities(["Fast WiFi", "Full Kitchen", "Pets allowed"]);
        let vector = extract(&listing, &schema).unwrap();

        assert_eq!(vector.get("has_wifi"), Some(1.0));
        assert_eq!(vector.get("has_kitchen"), Some(1.0));
        assert_eq!(vector.get("pet_friendly"), Some(1.0));
        assert_eq!(vector.get("has_parking"), Some(0.0));
        assert_eq!(vector.get("amenity_count"), Some(3.0));
    }

    #[test]
    fn test_room_type_one_hot_with_unknown_bucket() {
        let schema = FeatureSchema::v1();

        let known = Listing::new(1, 2, 75.0).with_room_type("private_room");
        let v = extract(&known, &schema).unwrap();
        assert_eq!(v.get("room_type_private_room"), Some(1.0));
        assert_eq!(v.get("room_type_unknown"), Some(0.0));

        let unseen = Listing::new(1, 3, 75.0).with_room_type("treehouse");
        let v = extract(&unseen, &schema).unwrap();
        assert_eq!(v.get("room_type_treehouse"), None);
        assert_eq!(v.get("room_type_unknown"), Some(1.0));
    }

    #[test]
    fn test_centrality_decreases_with_distance() {
        let schema = FeatureSchema::v1();

        // Central Amsterdam vs. well outside the city
        let central = Listing::new(1, 2, 75.0).with_location(52.3676, 4.9041);
        let remote = Listing::new(1, 3, 75.0).with_location(53.2, 6.5);

        let c = extract(&central, &schema).unwrap().get("centrality").unwrap();
        let r = extract(&remote, &schema).unwrap().get("centrality").unwrap();

        assert!(c > 0.99);
        assert!(r < c);
        assert!(r > 0.0);
    }

    #[test]
    fn test_extraction_is_deterministic() {
        let schema = FeatureSchema::v1();
        let listing = Listing::new(1, 2, 75.0)
            .with_description("Bright and airy flat near the canal")
            .with_amenities(["wifi", "washer"])
            .with_location(52.37, 4.9)
            .with_photo_count(9);

        let a = extract(&listing, &schema).unwrap();
        let b = extract(&listing, &schema).unwrap();
        assert_eq!(a, b);
    }
}
