//! Domain models for the street-food store API.
//!
//! # Design
//! These types mirror the backend's JSON schema (camelCase on the wire) but
//! are defined independently of the mock-server crate. Integration tests
//! catch any schema drift between the two. Everything here is
//! request/response-scoped plain data; nothing is cached by the client.

use serde::{Deserialize, Serialize};

/// A geographic position in double-precision degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub latitude: f64,
    pub longitude: f64,
}

impl Position {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// Closed set of food categories. `Bungeoppang` is the backend's default
/// when a menu is submitted without a category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StoreCategory {
    Bungeoppang,
    Takoyaki,
    Gyeranppang,
    Hotteok,
}

impl StoreCategory {
    /// Wire value used in multipart form fields.
    pub fn as_str(&self) -> &'static str {
        match self {
            StoreCategory::Bungeoppang => "BUNGEOPPANG",
            StoreCategory::Takoyaki => "TAKOYAKI",
            StoreCategory::Gyeranppang => "GYERANPPANG",
            StoreCategory::Hotteok => "HOTTEOK",
        }
    }
}

/// One sellable item within a store. `price` is free-form text; the backend
/// accepts both numeric strings and descriptions like "3개 1000원".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Menu {
    pub name: String,
    #[serde(default)]
    pub price: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<StoreCategory>,
}

impl Menu {
    pub fn new(name: impl Into<String>, price: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            price: price.into(),
            category: None,
        }
    }
}

/// A store being constructed client-side, before the backend has assigned
/// an id. Persisted stores are `Store`.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreDraft {
    pub store_name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub category: Option<StoreCategory>,
    pub menus: Vec<Menu>,
}

/// Identity of the user who reported a store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reporter {
    pub user_id: i64,
    #[serde(default)]
    pub name: Option<String>,
}

/// Reference to a photo already stored on the backend. Local images pending
/// upload are `ImageUpload`; the two are never conflated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Image {
    pub image_id: i64,
    pub url: String,
}

/// A local image payload awaiting upload.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageUpload {
    pub bytes: Vec<u8>,
    pub file_name: String,
    pub content_type: String,
}

impl ImageUpload {
    /// JPEG upload with the fixed part metadata the backend expects.
    pub fn jpeg(bytes: Vec<u8>) -> Self {
        Self {
            bytes,
            file_name: "image.jpeg".to_string(),
            content_type: "image/jpeg".to_string(),
        }
    }
}

/// Store summary returned by the near-stores search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreSummary {
    pub id: i64,
    pub store_name: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub category: Option<StoreCategory>,
    /// Distance from the caller's position in meters, when the server
    /// computed one.
    #[serde(default)]
    pub distance: Option<i64>,
}

/// Full store detail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Store {
    pub id: i64,
    pub store_name: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub category: Option<StoreCategory>,
    #[serde(default)]
    pub menus: Vec<Menu>,
    #[serde(default)]
    pub images: Vec<Image>,
    #[serde(default)]
    pub distance: Option<i64>,
    #[serde(default)]
    pub user: Option<Reporter>,
}

/// Compact card returned by the registered-stores search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreCard {
    pub id: i64,
    pub store_name: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub category: Option<StoreCategory>,
}

/// One slice of a paginated result set (Spring-style envelope).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub content: Vec<T>,
    pub total_elements: i64,
    pub total_pages: i64,
}

/// Result of creating a store: the newly assigned id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveResponse {
    pub store_id: i64,
}

/// Closed set of reasons a store deletion can be requested with. The server
/// rejects values outside this set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeleteReason {
    /// The store no longer exists.
    Nostore,
    /// The store's location is wrong.
    Wrongnostore,
    /// Duplicate of an already-reported store.
    Overlapstore,
    /// The listing content is wrong.
    Wrongcontent,
}

impl DeleteReason {
    /// Wire value for the `deleteReasonType` query parameter.
    pub fn as_str(&self) -> &'static str {
        match self {
            DeleteReason::Nostore => "NOSTORE",
            DeleteReason::Wrongnostore => "WRONGNOSTORE",
            DeleteReason::Overlapstore => "OVERLAPSTORE",
            DeleteReason::Wrongcontent => "WRONGCONTENT",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn save_response_deserializes_store_id() {
        let resp: SaveResponse = serde_json::from_str(r#"{"storeId":42}"#).unwrap();
        assert_eq!(resp.store_id, 42);
    }

    #[test]
    fn store_summary_tolerates_missing_optionals() {
        let json = r#"{"id":1,"storeName":"붕어빵","latitude":37.5,"longitude":127.0}"#;
        let summary: StoreSummary = serde_json::from_str(json).unwrap();
        assert!(summary.category.is_none());
        assert!(summary.distance.is_none());
    }

    #[test]
    fn store_detail_roundtrips_through_json() {
        let store = Store {
            id: 7,
            store_name: "호떡집".to_string(),
            latitude: 37.5,
            longitude: 127.0,
            category: Some(StoreCategory::Hotteok),
            menus: vec![Menu::new("호떡", "1000")],
            images: vec![Image {
                image_id: 3,
                url: "https://cdn.example.com/3.jpeg".to_string(),
            }],
            distance: Some(120),
            user: Some(Reporter {
                user_id: 9,
                name: Some("reporter".to_string()),
            }),
        };
        let json = serde_json::to_string(&store).unwrap();
        let back: Store = serde_json::from_str(&json).unwrap();
        assert_eq!(back, store);
    }

    #[test]
    fn category_wire_values_match_serde_rename() {
        for category in [
            StoreCategory::Bungeoppang,
            StoreCategory::Takoyaki,
            StoreCategory::Gyeranppang,
            StoreCategory::Hotteok,
        ] {
            let json = serde_json::to_string(&category).unwrap();
            assert_eq!(json, format!("\"{}\"", category.as_str()));
        }
    }

    #[test]
    fn delete_reason_wire_values_match_serde_rename() {
        for reason in [
            DeleteReason::Nostore,
            DeleteReason::Wrongnostore,
            DeleteReason::Overlapstore,
            DeleteReason::Wrongcontent,
        ] {
            let json = serde_json::to_string(&reason).unwrap();
            assert_eq!(json, format!("\"{}\"", reason.as_str()));
        }
    }

    #[test]
    fn page_deserializes_spring_envelope() {
        let json = r#"{"content":[{"storeId":1}],"totalElements":12,"totalPages":2}"#;
        let page: Page<SaveResponse> = serde_json::from_str(json).unwrap();
        assert_eq!(page.content.len(), 1);
        assert_eq!(page.total_elements, 12);
        assert_eq!(page.total_pages, 2);
    }

    #[test]
    fn menu_without_category_omits_field_when_serialized() {
        let menu = Menu::new("붕어빵", "500");
        let json = serde_json::to_value(&menu).unwrap();
        assert!(json.get("category").is_none());
    }
}
