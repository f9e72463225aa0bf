//! In-memory mock of the street-food store backend.
//!
//! Implements the ten endpoints the core client targets, including the
//! multipart `menu[i].*` field reconstruction on save/update and the 400
//! answer for a duplicate deletion request. State lives in an
//! `Arc<RwLock<..>>` so tests can run the app either via `run` on a real
//! listener or via `tower::ServiceExt::oneshot`.

use std::sync::Arc;

use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::{net::TcpListener, sync::RwLock};
use tracing::{debug, info};

pub const PAGE_SIZE: usize = 20;

const CATEGORIES: [&str; 4] = ["BUNGEOPPANG", "TAKOYAKI", "GYERANPPANG", "HOTTEOK"];
const DELETE_REASONS: [&str; 4] = ["NOSTORE", "WRONGNOSTORE", "OVERLAPSTORE", "WRONGCONTENT"];

#[derive(Clone, Debug)]
pub struct MenuRecord {
    pub name: String,
    pub price: String,
    pub category: Option<String>,
}

#[derive(Clone, Debug)]
pub struct ImageRecord {
    pub image_id: i64,
    pub url: String,
}

#[derive(Clone, Debug)]
pub struct StoreRecord {
    pub id: i64,
    pub store_name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub category: Option<String>,
    pub menus: Vec<MenuRecord>,
    pub images: Vec<ImageRecord>,
    pub user_id: String,
    pub delete_requested: bool,
}

#[derive(Default)]
pub struct MockState {
    stores: Vec<StoreRecord>,
    next_store_id: i64,
    next_image_id: i64,
}

pub type Db = Arc<RwLock<MockState>>;

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(MockState::default()));
    Router::new()
        .route("/api/v1/stores", get(search_near_stores))
        .route("/api/v1/stores/user", get(registered_stores))
        .route("/api/v1/store/save", post(save_store))
        .route("/api/v1/store/update", put(update_store))
        .route("/api/v1/store/delete", delete(delete_store))
        .route("/api/v1/store/detail", get(store_detail))
        .route("/api/v1/store/user", get(reported_stores))
        .route(
            "/api/v1/store/{store_id}/images",
            get(list_images).post(upload_images),
        )
        .route(
            "/api/v1/store/{store_id}/images/{image_id}",
            delete(delete_image),
        )
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

// ---------------------------------------------------------------------------
// Wire DTOs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct MenuDto {
    name: String,
    price: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    category: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ImageDto {
    image_id: i64,
    url: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SummaryDto {
    id: i64,
    store_name: String,
    latitude: f64,
    longitude: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    category: Option<String>,
    distance: i64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DetailDto {
    id: i64,
    store_name: String,
    latitude: f64,
    longitude: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    category: Option<String>,
    menus: Vec<MenuDto>,
    images: Vec<ImageDto>,
    distance: i64,
    user: serde_json::Value,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CardDto {
    id: i64,
    store_name: String,
    latitude: f64,
    longitude: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    category: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PageDto<T> {
    content: Vec<T>,
    total_elements: i64,
    total_pages: i64,
}

fn menu_dto(menu: &MenuRecord) -> MenuDto {
    MenuDto {
        name: menu.name.clone(),
        price: menu.price.clone(),
        category: menu.category.clone(),
    }
}

fn image_dto(image: &ImageRecord) -> ImageDto {
    ImageDto {
        image_id: image.image_id,
        url: image.url.clone(),
    }
}

fn error_body(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "message": message }))).into_response()
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct NearQuery {
    distance: f64,
    latitude: f64,
    longitude: f64,
    map_latitude: f64,
    map_longitude: f64,
}

async fn search_near_stores(
    State(db): State<Db>,
    Query(query): Query<NearQuery>,
) -> Json<Vec<SummaryDto>> {
    let state = db.read().await;
    let summaries = state
        .stores
        .iter()
        .filter(|s| !s.delete_requested)
        .filter(|s| {
            distance_meters(query.map_latitude, query.map_longitude, s.latitude, s.longitude)
                <= query.distance
        })
        .take(PAGE_SIZE)
        .map(|s| SummaryDto {
            id: s.id,
            store_name: s.store_name.clone(),
            latitude: s.latitude,
            longitude: s.longitude,
            category: s.category.clone(),
            distance: distance_meters(query.latitude, query.longitude, s.latitude, s.longitude)
                as i64,
        })
        .collect();
    Json(summaries)
}

async fn save_store(State(db): State<Db>, multipart: Multipart) -> Response {
    let fields = match text_fields(multipart).await {
        Ok(fields) => fields,
        Err(resp) => return resp,
    };
    let (store_name, latitude, longitude) = match required_store_fields(&fields) {
        Ok(parsed) => parsed,
        Err(resp) => return resp,
    };
    let Some(user_id) = fields.iter().find(|(k, _)| k == "userId").map(|(_, v)| v.clone()) else {
        return error_body(StatusCode::BAD_REQUEST, "userId is required");
    };
    let menus = match menus_from_fields(&fields) {
        Ok(menus) => menus,
        Err(resp) => return resp,
    };
    let category = fields.iter().find(|(k, _)| k == "category").map(|(_, v)| v.clone());
    if let Some(c) = &category {
        if !CATEGORIES.contains(&c.as_str()) {
            return error_body(StatusCode::UNPROCESSABLE_ENTITY, "unknown category");
        }
    }

    let mut state = db.write().await;
    state.next_store_id += 1;
    let id = state.next_store_id;
    state.stores.push(StoreRecord {
        id,
        store_name,
        latitude,
        longitude,
        category,
        menus,
        images: Vec::new(),
        user_id,
        delete_requested: false,
    });
    info!(store_id = id, "store saved");
    (StatusCode::OK, Json(json!({ "storeId": id }))).into_response()
}

async fn update_store(State(db): State<Db>, multipart: Multipart) -> Response {
    let fields = match text_fields(multipart).await {
        Ok(fields) => fields,
        Err(resp) => return resp,
    };
    let Some(store_id) = fields
        .iter()
        .find(|(k, _)| k == "storeId")
        .and_then(|(_, v)| v.parse::<i64>().ok())
    else {
        return error_body(StatusCode::BAD_REQUEST, "storeId is required");
    };
    let (store_name, latitude, longitude) = match required_store_fields(&fields) {
        Ok(parsed) => parsed,
        Err(resp) => return resp,
    };
    let menus = match menus_from_fields(&fields) {
        Ok(menus) => menus,
        Err(resp) => return resp,
    };

    let mut state = db.write().await;
    let Some(store) = state.stores.iter_mut().find(|s| s.id == store_id) else {
        return error_body(StatusCode::NOT_FOUND, "store not found");
    };
    store.store_name = store_name;
    store.latitude = latitude;
    store.longitude = longitude;
    store.menus = menus;
    debug!(store_id, "store updated");
    (StatusCode::OK, "success").into_response()
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct DeleteQuery {
    store_id: i64,
    #[allow(dead_code)]
    user_id: String,
    delete_reason_type: String,
}

async fn delete_store(State(db): State<Db>, Query(query): Query<DeleteQuery>) -> Response {
    if !DELETE_REASONS.contains(&query.delete_reason_type.as_str()) {
        return error_body(StatusCode::UNPROCESSABLE_ENTITY, "unknown delete reason");
    }
    let mut state = db.write().await;
    let Some(store) = state.stores.iter_mut().find(|s| s.id == query.store_id) else {
        return error_body(StatusCode::NOT_FOUND, "store not found");
    };
    if store.delete_requested {
        return error_body(StatusCode::BAD_REQUEST, "deletion already requested");
    }
    store.delete_requested = true;
    info!(store_id = query.store_id, reason = %query.delete_reason_type, "deletion requested");
    (StatusCode::OK, "success").into_response()
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct DetailQuery {
    store_id: i64,
    latitude: f64,
    longitude: f64,
}

async fn store_detail(State(db): State<Db>, Query(query): Query<DetailQuery>) -> Response {
    let state = db.read().await;
    let Some(store) = state.stores.iter().find(|s| s.id == query.store_id) else {
        return error_body(StatusCode::NOT_FOUND, "store not found");
    };
    let detail = DetailDto {
        id: store.id,
        store_name: store.store_name.clone(),
        latitude: store.latitude,
        longitude: store.longitude,
        category: store.category.clone(),
        menus: store.menus.iter().map(menu_dto).collect(),
        images: store.images.iter().map(image_dto).collect(),
        distance: distance_meters(query.latitude, query.longitude, store.latitude, store.longitude)
            as i64,
        user: json!({ "userId": store.user_id.parse::<i64>().unwrap_or(0) }),
    };
    Json(detail).into_response()
}

#[derive(Deserialize)]
struct PageQuery {
    page: usize,
}

async fn reported_stores(State(db): State<Db>, Query(query): Query<PageQuery>) -> Response {
    let state = db.read().await;
    let all: Vec<&StoreRecord> = state.stores.iter().collect();
    let (slice, total_pages) = page_slice(&all, query.page);
    let content: Vec<DetailDto> = slice
        .iter()
        .map(|s| DetailDto {
            id: s.id,
            store_name: s.store_name.clone(),
            latitude: s.latitude,
            longitude: s.longitude,
            category: s.category.clone(),
            menus: s.menus.iter().map(menu_dto).collect(),
            images: s.images.iter().map(image_dto).collect(),
            distance: 0,
            user: json!({ "userId": s.user_id.parse::<i64>().unwrap_or(0) }),
        })
        .collect();
    Json(PageDto {
        content,
        total_elements: all.len() as i64,
        total_pages,
    })
    .into_response()
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RegisteredQuery {
    #[allow(dead_code)]
    latitude: f64,
    #[allow(dead_code)]
    longitude: f64,
    page: usize,
}

async fn registered_stores(State(db): State<Db>, Query(query): Query<RegisteredQuery>) -> Response {
    let state = db.read().await;
    let all: Vec<&StoreRecord> = state.stores.iter().collect();
    let (slice, total_pages) = page_slice(&all, query.page);
    let content: Vec<CardDto> = slice
        .iter()
        .map(|s| CardDto {
            id: s.id,
            store_name: s.store_name.clone(),
            latitude: s.latitude,
            longitude: s.longitude,
            category: s.category.clone(),
        })
        .collect();
    Json(PageDto {
        content,
        total_elements: all.len() as i64,
        total_pages,
    })
    .into_response()
}

async fn list_images(State(db): State<Db>, Path(store_id): Path<i64>) -> Response {
    let state = db.read().await;
    let Some(store) = state.stores.iter().find(|s| s.id == store_id) else {
        return error_body(StatusCode::NOT_FOUND, "store not found");
    };
    Json(store.images.iter().map(image_dto).collect::<Vec<_>>()).into_response()
}

async fn upload_images(
    State(db): State<Db>,
    Path(store_id): Path<i64>,
    mut multipart: Multipart,
) -> Response {
    let mut uploads = 0usize;
    loop {
        match multipart.next_field().await {
            Ok(Some(field)) => {
                if field.name() == Some("image") {
                    if field.bytes().await.is_err() {
                        return error_body(StatusCode::BAD_REQUEST, "unreadable image part");
                    }
                    uploads += 1;
                }
                // the storeId text field duplicates the path parameter
            }
            Ok(None) => break,
            Err(_) => return error_body(StatusCode::BAD_REQUEST, "malformed multipart body"),
        }
    }
    if uploads == 0 {
        return error_body(StatusCode::BAD_REQUEST, "no image parts");
    }

    let mut state = db.write().await;
    let Some(index) = state.stores.iter().position(|s| s.id == store_id) else {
        return error_body(StatusCode::NOT_FOUND, "store not found");
    };
    for _ in 0..uploads {
        state.next_image_id += 1;
        let image_id = state.next_image_id;
        state.stores[index].images.push(ImageRecord {
            image_id,
            url: format!("https://mock.local/store/{store_id}/{image_id}.jpeg"),
        });
    }
    debug!(store_id, uploads, "images stored");
    StatusCode::OK.into_response()
}

async fn delete_image(
    State(db): State<Db>,
    Path((store_id, image_id)): Path<(i64, i64)>,
) -> Response {
    let mut state = db.write().await;
    let Some(store) = state.stores.iter_mut().find(|s| s.id == store_id) else {
        return error_body(StatusCode::NOT_FOUND, "store not found");
    };
    let before = store.images.len();
    store.images.retain(|i| i.image_id != image_id);
    if store.images.len() == before {
        return error_body(StatusCode::NOT_FOUND, "image not found");
    }
    StatusCode::NO_CONTENT.into_response()
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Drain a multipart body into ordered (name, value) text fields.
async fn text_fields(mut multipart: Multipart) -> Result<Vec<(String, String)>, Response> {
    let mut fields = Vec::new();
    loop {
        match multipart.next_field().await {
            Ok(Some(field)) => {
                let name = field.name().unwrap_or_default().to_string();
                match field.text().await {
                    Ok(value) => fields.push((name, value)),
                    Err(_) => {
                        return Err(error_body(StatusCode::BAD_REQUEST, "unreadable field"))
                    }
                }
            }
            Ok(None) => break,
            Err(_) => return Err(error_body(StatusCode::BAD_REQUEST, "malformed multipart body")),
        }
    }
    Ok(fields)
}

fn required_store_fields(fields: &[(String, String)]) -> Result<(String, f64, f64), Response> {
    let find = |key: &str| fields.iter().find(|(k, _)| k == key).map(|(_, v)| v.clone());
    let Some(store_name) = find("storeName") else {
        return Err(error_body(StatusCode::BAD_REQUEST, "storeName is required"));
    };
    let latitude = find("latitude").and_then(|v| v.parse::<f64>().ok());
    let longitude = find("longitude").and_then(|v| v.parse::<f64>().ok());
    let (Some(latitude), Some(longitude)) = (latitude, longitude) else {
        return Err(error_body(StatusCode::BAD_REQUEST, "position is required"));
    };
    Ok((store_name, latitude, longitude))
}

/// Rebuild the menu list from `menu[i].*` fields, stopping at the first gap.
/// Field index order is the list order the client submitted.
fn menus_from_fields(fields: &[(String, String)]) -> Result<Vec<MenuRecord>, Response> {
    let find = |key: String| fields.iter().find(|(k, _)| *k == key).map(|(_, v)| v.clone());
    let mut menus = Vec::new();
    let mut index = 0;
    while let Some(name) = find(format!("menu[{index}].name")) {
        let category = find(format!("menu[{index}].category"));
        if let Some(c) = &category {
            if !CATEGORIES.contains(&c.as_str()) {
                return Err(error_body(
                    StatusCode::UNPROCESSABLE_ENTITY,
                    "unknown menu category",
                ));
            }
        }
        menus.push(MenuRecord {
            name,
            price: find(format!("menu[{index}].price")).unwrap_or_default(),
            category,
        });
        index += 1;
    }
    Ok(menus)
}

/// 1-based pagination over a stable snapshot.
fn page_slice<'a, T>(items: &'a [T], page: usize) -> (&'a [T], i64) {
    let total_pages = items.len().div_ceil(PAGE_SIZE) as i64;
    let page = page.max(1);
    let start = (page - 1) * PAGE_SIZE;
    if start >= items.len() {
        return (&[], total_pages);
    }
    let end = (start + PAGE_SIZE).min(items.len());
    (&items[start..end], total_pages)
}

/// Equirectangular approximation, good enough for neighborhood radii.
fn distance_meters(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    const EARTH_RADIUS_M: f64 = 6_371_000.0;
    let x = (lon2 - lon1).to_radians() * ((lat1 + lat2) / 2.0).to_radians().cos();
    let y = (lat2 - lat1).to_radians();
    (x * x + y * y).sqrt() * EARTH_RADIUS_M
}
