//! Stateless HTTP request builder and response parser for the store API.
//!
//! # Design
//! `StoreClient` holds only an `ApiConfig` and carries no mutable state
//! between calls. Each backend operation is split into a `build_*` method
//! that produces an `HttpRequest` and a `parse_*` method that consumes an
//! `HttpResponse`. The caller executes the actual HTTP round-trip, keeping
//! the core deterministic and free of I/O dependencies.
//!
//! Paths and field names (`menu[i].name`, `storeId`, ...) are bit-exact
//! contracts with the backend and must not be renamed.

use serde::de::DeserializeOwned;

use crate::config::ApiConfig;
use crate::error::ApiError;
use crate::http::{FormPart, HttpBody, HttpMethod, HttpRequest, HttpResponse};
use crate::types::{
    DeleteReason, Image, ImageUpload, Page, Position, SaveResponse, Store, StoreCard,
    StoreCategory, StoreDraft, StoreSummary,
};

/// Stateless client for the store API.
///
/// Builds `HttpRequest` values and parses `HttpResponse` values without
/// touching the network. The caller is responsible for executing the HTTP
/// round-trip between `build_*` and `parse_*`; `StoreService` does exactly
/// that for async callers.
#[derive(Debug, Clone)]
pub struct StoreClient {
    config: ApiConfig,
}

impl StoreClient {
    pub fn new(config: ApiConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    fn request(&self, method: HttpMethod, path: &str) -> HttpRequest {
        HttpRequest {
            method,
            path: format!("{}{path}", self.config.base_url),
            query: Vec::new(),
            headers: self.config.default_headers.clone(),
            body: HttpBody::Empty,
        }
    }

    // ---- search near stores ------------------------------------------------

    pub fn build_search_near_stores(
        &self,
        current: Position,
        map_center: Position,
        distance: f64,
    ) -> HttpRequest {
        let mut req = self.request(HttpMethod::Get, "/api/v1/stores");
        req.query = vec![
            ("distance".to_string(), fmt_f64(distance)),
            ("latitude".to_string(), fmt_f64(current.latitude)),
            ("longitude".to_string(), fmt_f64(current.longitude)),
            ("mapLatitude".to_string(), fmt_f64(map_center.latitude)),
            ("mapLongitude".to_string(), fmt_f64(map_center.longitude)),
        ];
        req
    }

    pub fn parse_search_near_stores(
        &self,
        response: HttpResponse,
    ) -> Result<Vec<StoreSummary>, ApiError> {
        let stores: Vec<StoreSummary> = self.decode(response)?;
        self.check_page_len(stores.len())?;
        Ok(stores)
    }

    // ---- save store --------------------------------------------------------

    /// `user_id` is the submitting user's identity, read by the caller at
    /// call time; the client never caches it.
    pub fn build_save_store(&self, draft: &StoreDraft, user_id: &str) -> HttpRequest {
        let mut parts = store_fields(draft);
        parts.push(FormPart::text("userId", user_id));
        parts.extend(menu_fields(draft));

        let mut req = self.request(HttpMethod::Post, "/api/v1/store/save");
        req.body = HttpBody::Multipart(parts);
        req
    }

    pub fn parse_save_store(&self, response: HttpResponse) -> Result<SaveResponse, ApiError> {
        self.decode(response)
    }

    // ---- photos ------------------------------------------------------------

    pub fn build_save_photos(&self, store_id: i64, uploads: &[ImageUpload]) -> HttpRequest {
        let mut parts: Vec<FormPart> = uploads
            .iter()
            .map(|upload| {
                FormPart::file(
                    "image",
                    upload.bytes.clone(),
                    upload.file_name.clone(),
                    upload.content_type.clone(),
                )
            })
            .collect();
        parts.push(FormPart::text("storeId", store_id.to_string()));

        let mut req = self.request(HttpMethod::Post, &format!("/api/v1/store/{store_id}/images"));
        req.body = HttpBody::Multipart(parts);
        req
    }

    /// Any 2xx is the success sentinel; the body is opaque and never decoded.
    pub fn parse_save_photos(&self, response: HttpResponse) -> Result<(), ApiError> {
        self.check_sentinel(response)
    }

    pub fn build_get_photos(&self, store_id: i64) -> HttpRequest {
        self.request(HttpMethod::Get, &format!("/api/v1/store/{store_id}/images"))
    }

    pub fn parse_get_photos(&self, response: HttpResponse) -> Result<Vec<Image>, ApiError> {
        self.decode(response)
    }

    pub fn build_delete_photo(&self, store_id: i64, photo_id: i64) -> HttpRequest {
        self.request(
            HttpMethod::Delete,
            &format!("/api/v1/store/{store_id}/images/{photo_id}"),
        )
    }

    pub fn parse_delete_photo(&self, response: HttpResponse) -> Result<(), ApiError> {
        self.check_sentinel(response)
    }

    // ---- update store ------------------------------------------------------

    pub fn build_update_store(&self, store_id: i64, draft: &StoreDraft) -> HttpRequest {
        let mut parts = store_fields(draft);
        parts.push(FormPart::text("storeId", store_id.to_string()));
        parts.extend(menu_fields(draft));

        let mut req = self.request(HttpMethod::Put, "/api/v1/store/update");
        req.body = HttpBody::Multipart(parts);
        req
    }

    pub fn parse_update_store(&self, response: HttpResponse) -> Result<(), ApiError> {
        self.check_sentinel(response)
    }

    // ---- store detail ------------------------------------------------------

    /// `current` is passed so the server can compute distance-dependent
    /// fields on the detail.
    pub fn build_get_store_detail(&self, store_id: i64, current: Position) -> HttpRequest {
        let mut req = self.request(HttpMethod::Get, "/api/v1/store/detail");
        req.query = vec![
            ("storeId".to_string(), store_id.to_string()),
            ("latitude".to_string(), fmt_f64(current.latitude)),
            ("longitude".to_string(), fmt_f64(current.longitude)),
        ];
        req
    }

    pub fn parse_get_store_detail(&self, response: HttpResponse) -> Result<Store, ApiError> {
        self.decode(response)
    }

    // ---- paginated listings ------------------------------------------------

    pub fn build_get_reported_stores(&self, page: u32) -> HttpRequest {
        let mut req = self.request(HttpMethod::Get, "/api/v1/store/user");
        req.query = vec![("page".to_string(), page.to_string())];
        req
    }

    pub fn parse_get_reported_stores(
        &self,
        response: HttpResponse,
    ) -> Result<Page<Store>, ApiError> {
        let page: Page<Store> = self.decode(response)?;
        self.check_page_len(page.content.len())?;
        Ok(page)
    }

    pub fn build_search_registered_stores(&self, position: Position, page: u32) -> HttpRequest {
        let mut req = self.request(HttpMethod::Get, "/api/v1/stores/user");
        req.query = vec![
            ("latitude".to_string(), fmt_f64(position.latitude)),
            ("longitude".to_string(), fmt_f64(position.longitude)),
            ("page".to_string(), page.to_string()),
        ];
        req
    }

    pub fn parse_search_registered_stores(
        &self,
        response: HttpResponse,
    ) -> Result<Page<StoreCard>, ApiError> {
        let page: Page<StoreCard> = self.decode(response)?;
        self.check_page_len(page.content.len())?;
        Ok(page)
    }

    // ---- delete store ------------------------------------------------------

    pub fn build_delete_store(
        &self,
        store_id: i64,
        reason: DeleteReason,
        user_id: &str,
    ) -> HttpRequest {
        let mut req = self.request(HttpMethod::Delete, "/api/v1/store/delete");
        req.query = vec![
            ("storeId".to_string(), store_id.to_string()),
            ("userId".to_string(), user_id.to_string()),
            ("deleteReasonType".to_string(), reason.as_str().to_string()),
        ];
        req
    }

    /// A 400 means deletion was already requested for this store and maps to
    /// the dedicated domain failure, never to a generic HTTP failure.
    pub fn parse_delete_store(&self, response: HttpResponse) -> Result<(), ApiError> {
        if response.status == 400 {
            return Err(ApiError::DeleteAlreadyRequested);
        }
        self.check_sentinel(response)
    }

    // ---- shared parsing ----------------------------------------------------

    fn decode<T: DeserializeOwned>(&self, response: HttpResponse) -> Result<T, ApiError> {
        if !response.is_success() {
            return Err(http_failure(&response));
        }
        serde_json::from_str(&response.body).map_err(|e| ApiError::Decode(e.to_string()))
    }

    fn check_sentinel(&self, response: HttpResponse) -> Result<(), ApiError> {
        if response.is_success() {
            Ok(())
        } else {
            Err(http_failure(&response))
        }
    }

    fn check_page_len(&self, len: usize) -> Result<(), ApiError> {
        if len > self.config.page_size {
            return Err(ApiError::Decode(format!(
                "server returned {len} items, page size is {}",
                self.config.page_size
            )));
        }
        Ok(())
    }
}

/// Store-level multipart fields shared by save and update.
fn store_fields(draft: &StoreDraft) -> Vec<FormPart> {
    let mut parts = vec![
        FormPart::text("storeName", draft.store_name.clone()),
        FormPart::text("latitude", fmt_f64(draft.latitude)),
        FormPart::text("longitude", fmt_f64(draft.longitude)),
    ];
    if let Some(category) = draft.category {
        parts.push(FormPart::text("category", category.as_str()));
    }
    parts
}

/// Flatten the menu list into ordered indexed fields. Index order matches
/// list order; the server contract depends on it. A menu without a category
/// falls back to BUNGEOPPANG, matching the backend default.
fn menu_fields(draft: &StoreDraft) -> Vec<FormPart> {
    let mut parts = Vec::with_capacity(draft.menus.len() * 3);
    for (index, menu) in draft.menus.iter().enumerate() {
        let category = menu.category.unwrap_or(StoreCategory::Bungeoppang);
        parts.push(FormPart::text(
            format!("menu[{index}].category"),
            category.as_str(),
        ));
        parts.push(FormPart::text(
            format!("menu[{index}].name"),
            menu.name.clone(),
        ));
        parts.push(FormPart::text(
            format!("menu[{index}].price"),
            menu.price.clone(),
        ));
    }
    parts
}

/// Map a non-2xx response to `ApiError::Http`, preferring the server's JSON
/// `message` field over the raw body.
fn http_failure(response: &HttpResponse) -> ApiError {
    let message = serde_json::from_str::<serde_json::Value>(&response.body)
        .ok()
        .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(String::from))
        .unwrap_or_else(|| response.body.clone());
    ApiError::Http {
        status: response.status,
        message,
    }
}

/// Format a coordinate or radius the way the backend expects: shortest
/// representation that round-trips, no scientific notation for the ranges
/// involved.
fn fmt_f64(value: f64) -> String {
    format!("{value}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::FormValue;
    use crate::types::Menu;

    fn client() -> StoreClient {
        StoreClient::new(ApiConfig::new("http://localhost:3000"))
    }

    fn ok(body: &str) -> HttpResponse {
        HttpResponse {
            status: 200,
            headers: Vec::new(),
            body: body.to_string(),
        }
    }

    fn status(status: u16, body: &str) -> HttpResponse {
        HttpResponse {
            status,
            headers: Vec::new(),
            body: body.to_string(),
        }
    }

    fn hotteok_draft() -> StoreDraft {
        StoreDraft {
            store_name: "호떡집".to_string(),
            latitude: 37.5,
            longitude: 127.0,
            category: Some(StoreCategory::Hotteok),
            menus: vec![Menu::new("호떡", "1000")],
        }
    }

    fn text_fields(req: &HttpRequest) -> Vec<(String, String)> {
        match &req.body {
            HttpBody::Multipart(parts) => parts
                .iter()
                .filter_map(|p| match &p.value {
                    FormValue::Text(v) => Some((p.name.clone(), v.clone())),
                    FormValue::File { .. } => None,
                })
                .collect(),
            HttpBody::Empty => panic!("expected multipart body"),
        }
    }

    #[test]
    fn search_near_stores_builds_query_parameters() {
        let req = client().build_search_near_stores(
            Position::new(37.5, 127.0),
            Position::new(37.51, 127.01),
            2000.0,
        );
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.path, "http://localhost:3000/api/v1/stores");
        assert_eq!(
            req.query,
            vec![
                ("distance".to_string(), "2000".to_string()),
                ("latitude".to_string(), "37.5".to_string()),
                ("longitude".to_string(), "127".to_string()),
                ("mapLatitude".to_string(), "37.51".to_string()),
                ("mapLongitude".to_string(), "127.01".to_string()),
            ]
        );
        assert_eq!(req.body, HttpBody::Empty);
    }

    #[test]
    fn default_headers_attach_to_every_request() {
        let config = ApiConfig::new("http://localhost:3000")
            .with_header("Authorization", "Bearer token");
        let c = StoreClient::new(config);

        let reqs = vec![
            c.build_search_near_stores(Position::new(0.0, 0.0), Position::new(0.0, 0.0), 1.0),
            c.build_save_store(&hotteok_draft(), "10"),
            c.build_save_photos(1, &[]),
            c.build_get_photos(1),
            c.build_delete_photo(1, 2),
            c.build_update_store(1, &hotteok_draft()),
            c.build_get_store_detail(1, Position::new(0.0, 0.0)),
            c.build_get_reported_stores(1),
            c.build_search_registered_stores(Position::new(0.0, 0.0), 1),
            c.build_delete_store(1, DeleteReason::Nostore, "10"),
        ];
        for req in reqs {
            assert_eq!(
                req.headers,
                vec![("Authorization".to_string(), "Bearer token".to_string())],
                "missing default header on {}",
                req.path
            );
        }
    }

    #[test]
    fn save_store_flattens_menus_in_order() {
        let mut draft = hotteok_draft();
        draft.menus = vec![
            Menu::new("호떡", "1000"),
            Menu {
                name: "씨앗호떡".to_string(),
                price: "1500".to_string(),
                category: Some(StoreCategory::Hotteok),
            },
            Menu::new("붕어빵", "500"),
        ];
        let req = client().build_save_store(&draft, "10");
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.path, "http://localhost:3000/api/v1/store/save");

        let fields = text_fields(&req);
        let menu_fields: Vec<_> = fields
            .iter()
            .filter(|(name, _)| name.starts_with("menu["))
            .cloned()
            .collect();
        assert_eq!(
            menu_fields,
            vec![
                ("menu[0].category".to_string(), "BUNGEOPPANG".to_string()),
                ("menu[0].name".to_string(), "호떡".to_string()),
                ("menu[0].price".to_string(), "1000".to_string()),
                ("menu[1].category".to_string(), "HOTTEOK".to_string()),
                ("menu[1].name".to_string(), "씨앗호떡".to_string()),
                ("menu[1].price".to_string(), "1500".to_string()),
                ("menu[2].category".to_string(), "BUNGEOPPANG".to_string()),
                ("menu[2].name".to_string(), "붕어빵".to_string()),
                ("menu[2].price".to_string(), "500".to_string()),
            ]
        );
    }

    #[test]
    fn menu_flattening_is_idempotent() {
        let draft = hotteok_draft();
        let first = text_fields(&client().build_save_store(&draft, "10"));
        let second = text_fields(&client().build_save_store(&draft, "10"));
        assert_eq!(first, second);
    }

    #[test]
    fn save_store_includes_user_identity() {
        let req = client().build_save_store(&hotteok_draft(), "10");
        let fields = text_fields(&req);
        assert!(fields.contains(&("userId".to_string(), "10".to_string())));
        assert!(fields.contains(&("storeName".to_string(), "호떡집".to_string())));
        assert!(fields.contains(&("latitude".to_string(), "37.5".to_string())));
        assert!(fields.contains(&("longitude".to_string(), "127".to_string())));
        assert!(fields.contains(&("category".to_string(), "HOTTEOK".to_string())));
    }

    #[test]
    fn save_store_parses_new_store_id() {
        let resp = client().parse_save_store(ok(r#"{"storeId":42}"#)).unwrap();
        assert_eq!(resp.store_id, 42);
    }

    #[test]
    fn save_photos_builds_one_part_per_image_plus_store_id() {
        let uploads = vec![
            ImageUpload::jpeg(vec![1, 2, 3]),
            ImageUpload::jpeg(vec![4, 5, 6]),
        ];
        let req = client().build_save_photos(7, &uploads);
        assert_eq!(req.path, "http://localhost:3000/api/v1/store/7/images");

        let parts = match &req.body {
            HttpBody::Multipart(parts) => parts,
            HttpBody::Empty => panic!("expected multipart body"),
        };
        assert_eq!(parts.len(), 3);
        assert!(parts[..2].iter().all(|p| p.name == "image"));
        assert_eq!(parts[2], FormPart::text("storeId", "7"));
    }

    #[test]
    fn save_photos_treats_any_2xx_as_success_without_reading_body() {
        let resp = status(201, "not json at all");
        assert!(client().parse_save_photos(resp).is_ok());
    }

    #[test]
    fn get_photos_parses_image_list() {
        let body = r#"[{"imageId":99,"url":"https://cdn.example.com/99.jpeg"}]"#;
        let images = client().parse_get_photos(ok(body)).unwrap();
        assert_eq!(images.len(), 1);
        assert_eq!(images[0].image_id, 99);
    }

    #[test]
    fn delete_photo_204_is_success_sentinel() {
        let req = client().build_delete_photo(7, 99);
        assert_eq!(req.method, HttpMethod::Delete);
        assert_eq!(req.path, "http://localhost:3000/api/v1/store/7/images/99");
        assert!(client().parse_delete_photo(status(204, "")).is_ok());
    }

    #[test]
    fn delete_photo_404_is_http_failure() {
        let err = client()
            .parse_delete_photo(status(404, r#"{"message":"no such image"}"#))
            .unwrap_err();
        match err {
            ApiError::Http { status: 404, message } => assert_eq!(message, "no such image"),
            other => panic!("expected Http 404, got {other:?}"),
        }
    }

    #[test]
    fn update_store_carries_store_id_field() {
        let req = client().build_update_store(7, &hotteok_draft());
        assert_eq!(req.method, HttpMethod::Put);
        assert_eq!(req.path, "http://localhost:3000/api/v1/store/update");
        let fields = text_fields(&req);
        assert!(fields.contains(&("storeId".to_string(), "7".to_string())));
        assert!(fields.contains(&("menu[0].name".to_string(), "호떡".to_string())));
    }

    #[test]
    fn update_store_yields_exactly_one_outcome_kind() {
        // Either the sentinel or a classified failure, never a payload.
        assert!(client().parse_update_store(status(200, "success")).is_ok());
        let err = client().parse_update_store(status(500, "boom")).unwrap_err();
        assert!(matches!(err, ApiError::Http { status: 500, .. }));
    }

    #[test]
    fn store_detail_builds_position_query() {
        let req = client().build_get_store_detail(1, Position::new(0.0, 0.0));
        assert_eq!(req.path, "http://localhost:3000/api/v1/store/detail");
        assert_eq!(
            req.query,
            vec![
                ("storeId".to_string(), "1".to_string()),
                ("latitude".to_string(), "0".to_string()),
                ("longitude".to_string(), "0".to_string()),
            ]
        );
    }

    #[test]
    fn store_detail_malformed_json_is_decode_failure() {
        let err = client()
            .parse_get_store_detail(ok("<html>oops</html>"))
            .unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));
    }

    #[test]
    fn reported_stores_parses_page_envelope() {
        let body = r#"{"content":[{"id":1,"storeName":"붕어빵","latitude":37.5,"longitude":127.0}],"totalElements":1,"totalPages":1}"#;
        let page = client().parse_get_reported_stores(ok(body)).unwrap();
        assert_eq!(page.content.len(), 1);
        assert_eq!(page.content[0].store_name, "붕어빵");
    }

    #[test]
    fn page_longer_than_configured_size_is_decode_failure() {
        let c = StoreClient::new(ApiConfig::new("http://localhost:3000").with_page_size(2));
        let body = r#"{"content":[
            {"id":1,"storeName":"a","latitude":0.0,"longitude":0.0},
            {"id":2,"storeName":"b","latitude":0.0,"longitude":0.0},
            {"id":3,"storeName":"c","latitude":0.0,"longitude":0.0}
        ],"totalElements":3,"totalPages":1}"#;
        let err = c.parse_get_reported_stores(ok(body)).unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));
    }

    #[test]
    fn near_search_longer_than_page_size_is_decode_failure() {
        let c = StoreClient::new(ApiConfig::new("http://localhost:3000").with_page_size(1));
        let body = r#"[
            {"id":1,"storeName":"a","latitude":0.0,"longitude":0.0},
            {"id":2,"storeName":"b","latitude":0.0,"longitude":0.0}
        ]"#;
        let err = c.parse_search_near_stores(ok(body)).unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));
    }

    #[test]
    fn registered_stores_builds_position_and_page_query() {
        let req = client().build_search_registered_stores(Position::new(37.5, 127.0), 2);
        assert_eq!(req.path, "http://localhost:3000/api/v1/stores/user");
        assert_eq!(
            req.query,
            vec![
                ("latitude".to_string(), "37.5".to_string()),
                ("longitude".to_string(), "127".to_string()),
                ("page".to_string(), "2".to_string()),
            ]
        );
    }

    #[test]
    fn delete_store_encodes_reason_and_identity() {
        let req = client().build_delete_store(7, DeleteReason::Overlapstore, "10");
        assert_eq!(req.method, HttpMethod::Delete);
        assert_eq!(req.path, "http://localhost:3000/api/v1/store/delete");
        assert_eq!(
            req.query,
            vec![
                ("storeId".to_string(), "7".to_string()),
                ("userId".to_string(), "10".to_string()),
                ("deleteReasonType".to_string(), "OVERLAPSTORE".to_string()),
            ]
        );
    }

    #[test]
    fn delete_store_400_is_domain_failure_never_generic() {
        let err = client()
            .parse_delete_store(status(400, r#"{"message":"already requested"}"#))
            .unwrap_err();
        assert!(matches!(err, ApiError::DeleteAlreadyRequested));
    }

    #[test]
    fn delete_store_other_failures_stay_http() {
        let err = client().parse_delete_store(status(500, "boom")).unwrap_err();
        assert!(matches!(err, ApiError::Http { status: 500, .. }));
        assert!(client().parse_delete_store(status(200, "success")).is_ok());
    }

    #[test]
    fn http_failure_falls_back_to_raw_body_without_message_field() {
        let err = client()
            .parse_get_photos(status(500, "internal error"))
            .unwrap_err();
        match err {
            ApiError::Http { status: 500, message } => assert_eq!(message, "internal error"),
            other => panic!("expected Http 500, got {other:?}"),
        }
    }
}
