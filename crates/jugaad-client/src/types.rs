//! Request and response payloads for the Jugaad backend.
//!
//! Responses are validated at the boundary: a payload missing a required
//! field fails deserialization as a typed error instead of leaking absent
//! values into view state. Fields the backend is known to omit are modelled
//! as `Option` with `serde(default)`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use jugaad_core::{Identity, LocationResult};

/// Body of `POST /get-items`: who is asking, and for which delivery area.
#[derive(Debug, Clone, Serialize)]
pub struct ItemsQuery {
    pub uid: String,
    pub email: String,
    pub username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pincode: Option<String>,
}

impl ItemsQuery {
    #[must_use]
    pub fn new(identity: &Identity, location: &LocationResult) -> Self {
        Self {
            uid: identity.uid.clone(),
            email: identity.email.clone(),
            username: identity.display_name.clone(),
            pincode: location.pincode.clone(),
        }
    }
}

/// One tracked item as returned by `/get-items`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackedItem {
    pub item_id: String,
    pub name: String,
    pub source_url: String,
    pub mrp_price: f64,
    pub selling_price: f64,
    #[serde(default)]
    pub category: Option<String>,
    pub is_available: bool,
    #[serde(default)]
    pub price_change: Option<String>,
    #[serde(default)]
    pub max_price: Option<f64>,
    #[serde(default)]
    pub max_offer: Option<f64>,
}

/// Body of `POST /get-item`: the item plus the caller's resolved location,
/// which the backend uses for store distance and availability.
#[derive(Debug, Clone, Serialize)]
pub struct ItemQuery {
    pub item_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pincode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lat: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lng: Option<f64>,
}

impl ItemQuery {
    #[must_use]
    pub fn new(item_id: &str, location: &LocationResult) -> Self {
        Self {
            item_id: item_id.to_owned(),
            pincode: location.pincode.clone(),
            lat: location.latitude,
            lng: location.longitude,
        }
    }
}

/// One price-history sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub last_updated_timestamp: DateTime<Utc>,
    pub selling_price: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemMetadata {
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub distance: Option<f64>,
}

/// Full item detail as returned by `/get-item`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemDetail {
    pub name: String,
    #[serde(default)]
    pub store_lat: Option<f64>,
    #[serde(default)]
    pub store_lng: Option<f64>,
    pub selling_price: f64,
    pub mrp_price: f64,
    #[serde(default)]
    pub discount_percent: Option<f64>,
    pub source_url: String,
    #[serde(default)]
    pub image_url: Option<String>,
    pub last_updated_timestamp: DateTime<Utc>,
    #[serde(default)]
    pub logs: Vec<PricePoint>,
    #[serde(default)]
    pub max_order_quantity: Option<String>,
    pub is_available: bool,
    #[serde(default)]
    pub item_metadata: ItemMetadata,
}

/// Body of `POST /add-items`: a new price alert.
#[derive(Debug, Clone, Serialize)]
pub struct AlertRequest {
    pub uid: String,
    pub email: String,
    pub username: String,
    pub url: String,
    pub min_price: f64,
    pub max_price: f64,
    pub min_offer: f64,
    pub max_offer: f64,
    pub notes: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pincode: Option<String>,
}

/// Body of `POST /delete-item`.
#[derive(Debug, Clone, Serialize)]
pub struct DeleteItemRequest {
    pub uid: String,
    pub item_id: String,
}

/// Body of `POST /signup`.
#[derive(Debug, Clone, Serialize)]
pub struct SignupRequest {
    pub uid: String,
    pub email: String,
    pub username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pincode: Option<String>,
}

impl SignupRequest {
    #[must_use]
    pub fn new(identity: &Identity, location: &LocationResult) -> Self {
        Self {
            uid: identity.uid.clone(),
            email: identity.email.clone(),
            username: identity.display_name.clone(),
            pincode: location.pincode.clone(),
        }
    }
}

/// Response of `GET /chat/stream-plan`: a recipe plan with shoppable items.
///
/// Despite the endpoint name the backend answers with a single JSON
/// document, not a stream.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MealPlan {
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub cooking_time: Option<String>,
    #[serde(default)]
    pub serving_size: Option<u32>,
    #[serde(default)]
    pub items: Vec<PlanItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanItem {
    pub name: String,
    pub price: f64,
    #[serde(default)]
    pub query: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub quantity: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub mrp: Option<f64>,
    #[serde(default)]
    pub source_url: Option<String>,
    #[serde(default)]
    pub is_available: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use jugaad_core::Coordinates;

    fn identity() -> Identity {
        Identity {
            uid: "uid-1".to_owned(),
            email: "user@example.com".to_owned(),
            display_name: "Test User".to_owned(),
        }
    }

    #[test]
    fn items_query_omits_missing_pincode() {
        let query = ItemsQuery::new(&identity(), &LocationResult::unresolved());
        let body = serde_json::to_value(&query).unwrap();
        assert!(body.get("pincode").is_none());
        assert_eq!(body["uid"], "uid-1");
        assert_eq!(body["username"], "Test User");
    }

    #[test]
    fn item_query_carries_resolved_location() {
        let location = LocationResult::resolved(
            "682020".to_owned(),
            Coordinates {
                latitude: 9.93,
                longitude: 76.26,
            },
        );
        let query = ItemQuery::new("item-7", &location);
        let body = serde_json::to_value(&query).unwrap();
        assert_eq!(body["item_id"], "item-7");
        assert_eq!(body["pincode"], "682020");
        assert_eq!(body["lat"], 9.93);
        assert_eq!(body["lng"], 76.26);
    }

    #[test]
    fn tracked_item_tolerates_absent_optional_fields() {
        let item: TrackedItem = serde_json::from_value(serde_json::json!({
            "item_id": "42",
            "name": "Ghee 1L",
            "source_url": "https://example.com/ghee",
            "mrp_price": 650.0,
            "selling_price": 540.0,
            "is_available": true,
        }))
        .unwrap();
        assert_eq!(item.category, None);
        assert_eq!(item.max_price, None);
    }

    #[test]
    fn tracked_item_rejects_missing_price() {
        let result: Result<TrackedItem, _> = serde_json::from_value(serde_json::json!({
            "item_id": "42",
            "name": "Ghee 1L",
            "source_url": "https://example.com/ghee",
            "is_available": true,
        }));
        assert!(result.is_err(), "missing prices must fail at the boundary");
    }
}
