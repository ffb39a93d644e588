//! Raw listing records and lenient field coercion.
//!
//! Listings arrive from whatever tabular source the collaborator provides,
//! so scalar fields tolerate the usual CSV-export noise: numbers as strings,
//! `""`/`"nan"`/`"none"`/`"null"` as missing, amenity lists as
//! `"['a','b']"` or `"a; b"` or `"a, b"`.

use serde::de::Deserializer;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Composite identifier for one listing: `(seller_id, listing_id)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ListingId {
    pub seller_id: u64,
    pub listing_id: u64,
}

impl ListingId {
    pub fn new(seller_id: u64, listing_id: u64) -> Self {
        Self {
            seller_id,
            listing_id,
        }
    }
}

impl std::fmt::Display for ListingId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.seller_id, self.listing_id)
    }
}

/// One raw rental listing record, immutable once ingested.
///
/// Required fields (no documented default): `seller_id`, `listing_id`,
/// `price`. They are kept as `Option` here so that a missing value is
/// reported as a per-listing `MalformedListing` at extraction time instead
/// of failing the whole deserialization pass.
///
/// Everything else defaults: absent photo count to 0, absent amenities to
/// empty, absent description and title to "", absent cancellation policy
/// to "none", absent minimum nights to 1, absent coordinates to no location
/// features.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Listing {
    #[serde(default, deserialize_with = "de_lenient_u64")]
    pub seller_id: Option<u64>,

    #[serde(default, deserialize_with = "de_lenient_u64")]
    pub listing_id: Option<u64>,

    /// Listing title (free text)
    #[serde(default, deserialize_with = "de_lenient_string")]
    pub title: String,

    /// Listing description (free text)
    #[serde(default, deserialize_with = "de_lenient_string")]
    pub description: String,

    /// Amenity tags, parsed leniently from list-ish strings
    #[serde(default, deserialize_with = "de_tag_list")]
    pub amenities: Vec<String>,

    #[serde(default, deserialize_with = "de_lenient_f64")]
    pub latitude: Option<f64>,

    #[serde(default, deserialize_with = "de_lenient_f64")]
    pub longitude: Option<f64>,

    /// Nightly price. Required.
    #[serde(default, deserialize_with = "de_lenient_f64")]
    pub price: Option<f64>,

    #[serde(default, deserialize_with = "de_lenient_u64")]
    pub minimum_nights: Option<u64>,

    #[serde(default, deserialize_with = "de_lenient_u64")]
    pub review_count: Option<u64>,

    #[serde(default, deserialize_with = "de_lenient_u64")]
    pub photo_count: Option<u64>,

    /// Room type, e.g. "entire_home", "private_room"
    #[serde(default, deserialize_with = "de_lenient_opt_string")]
    pub room_type: Option<String>,

    /// Cancellation policy, e.g. "none", "flexible", "moderate", "strict"
    #[serde(default, deserialize_with = "de_lenient_opt_string")]
    pub cancellation_policy: Option<String>,

    #[serde(default, deserialize_with = "de_lenient_bool")]
    pub instant_bookable: bool,

    /// Country or region label, used only for presentation
    #[serde(default, deserialize_with = "de_lenient_opt_string")]
    pub country: Option<String>,
}

impl Listing {
    /// Create a minimal listing with identifiers and price set.
    pub fn new(seller_id: u64, listing_id: u64, price: f64) -> Self {
        Self {
            seller_id: Some(seller_id),
            listing_id: Some(listing_id),
            price: Some(price),
            ..Default::default()
        }
    }

    /// Composite identifier, if both id fields are present.
    pub fn id(&self) -> Option<ListingId> {
        Some(ListingId::new(self.seller_id?, self.listing_id?))
    }

    // =========================================================================
    // Builder methods (test fixtures and programmatic construction)
    // =========================================================================

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_amenities(mut self, amenities: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.amenities = amenities.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_location(mut self, latitude: f64, longitude: f64) -> Self {
        self.latitude = Some(latitude);
        self.longitude = Some(longitude);
        self
    }

    pub fn with_minimum_nights(mut self, nights: u64) -> Self {
        self.minimum_nights = Some(nights);
        self
    }

    pub fn with_review_count(mut self, count: u64) -> Self {
        self.review_count = Some(count);
        self
    }

    pub fn with_photo_count(mut self, count: u64) -> Self {
        self.photo_count = Some(count);
        self
    }

    pub fn with_room_type(mut self, room_type: impl Into<String>) -> Self {
        self.room_type = Some(room_type.into());
        self
    }

    pub fn with_cancellation_policy(mut self, policy: impl Into<String>) -> Self {
        self.cancellation_policy = Some(policy.into());
        self
    }

    pub fn instant_bookable(mut self) -> Self {
        self.instant_bookable = true;
        self
    }

    pub fn with_country(mut self, country: impl Into<String>) -> Self {
        self.country = Some(country.into());
        self
    }
}

// =============================================================================
// Lenient coercion
// =============================================================================

fn is_missing_marker(s: &str) -> bool {
    let t = s.trim();
    t.is_empty() || matches!(t.to_ascii_lowercase().as_str(), "nan" | "none" | "null")
}

/// Coerce a JSON value to `f64`, treating blank/placeholder strings as missing.
pub fn coerce_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) if !is_missing_marker(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

/// Coerce a JSON value to `u64`, accepting float-formatted strings ("12.0").
pub fn coerce_u64(value: &Value) -> Option<u64> {
    coerce_f64(value).filter(|f| *f >= 0.0).map(|f| f as u64)
}

/// Parse a loosely formatted tag list into a clean `Vec<String>`.
///
/// Accepts `"['wifi','kitchen']"`, `"wifi; kitchen"`, `"wifi, kitchen"`,
/// or a single bare tag. Blank and placeholder values yield an empty list.
pub fn parse_tag_list(raw: &str) -> Vec<String> {
    if is_missing_marker(raw) || raw.trim() == "[]" {
        return Vec::new();
    }

    let stripped: String = raw
        .trim()
        .trim_start_matches('[')
        .trim_end_matches(']')
        .replace(['\'', '"'], "");

    let sep = if stripped.contains(';') { ';' } else { ',' };
    stripped
        .split(sep)
        .map(|p| p.trim().to_string())
        .filter(|p| !p.is_empty())
        .collect()
}

fn de_lenient_f64<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<Option<f64>, D::Error> {
    let value = Option::<Value>::deserialize(d)?;
    Ok(value.as_ref().and_then(coerce_f64))
}

fn de_lenient_u64<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<Option<u64>, D::Error> {
    let value = Option::<Value>::deserialize(d)?;
    Ok(value.as_ref().and_then(coerce_u64))
}

fn de_lenient_string<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<String, D::Error> {
    let value = Option::<Value>::deserialize(d)?;
    Ok(match value {
        Some(Value::String(s)) if !is_missing_marker(&s) => s,
        _ => String::new(),
    })
}

fn de_lenient_opt_string<'de, D: Deserializer<'de>>(
    d: D,
) -> std::result::Result<Option<String>, D::Error> {
    let value = Option::<Value>::deserialize(d)?;
    Ok(match value {
        Some(Value::String(s)) if !is_missing_marker(&s) => Some(s.trim().to_string()),
        _ => None,
    })
}

fn de_lenient_bool<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<bool, D::Error> {
    let value = Option::<Value>::deserialize(d)?;
    Ok(match value {
        Some(Value::Bool(b)) => b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0),
        Some(Value::String(s)) => {
            matches!(s.trim().to_ascii_lowercase().as_str(), "t" | "true" | "1" | "yes")
        }
        _ => false,
    })
}

fn de_tag_list<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<Vec<String>, D::Error> {
    let value = Option::<Value>::deserialize(d)?;
    Ok(match value {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|v| v.as_str())
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect(),
        Some(Value::String(s)) => parse_tag_list(&s),
        _ => Vec::new(),
    })
}
