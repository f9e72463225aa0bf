//! Async dispatch layer: one network round trip per operation.
//!
//! # Design
//! `StoreService` pairs a `StoreClient` with a `Transport` implementation
//! supplied by the host (reqwest in the integration tests). Each operation
//! builds a request, performs exactly one round trip, and parses the
//! response — one success or one classified failure per call, never both.
//! Concurrent calls are independent; there is no coalescing, deduplication,
//! or retry here. Dropping the returned future abandons the in-flight call
//! and releases the transport's connection; no compensation is attempted
//! for already-sent multipart bodies.

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::client::StoreClient;
use crate::config::ApiConfig;
use crate::error::{ApiError, TransportError};
use crate::http::{HttpRequest, HttpResponse};
use crate::types::{
    DeleteReason, Image, ImageUpload, Page, Position, SaveResponse, Store, StoreCard, StoreDraft,
    StoreSummary,
};

/// Executes a single HTTP round trip. Implemented by the host; the core
/// never opens a connection itself. Timeouts and connection pooling are the
/// implementation's concern.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}

/// Async store API service: the ten backend operations, each completing
/// exactly once with its success type or an `ApiError`.
pub struct StoreService<T: Transport> {
    client: StoreClient,
    transport: T,
}

impl<T: Transport> StoreService<T> {
    pub fn new(config: ApiConfig, transport: T) -> Self {
        Self {
            client: StoreClient::new(config),
            transport,
        }
    }

    /// The underlying build/parse client, for hosts that execute I/O
    /// themselves.
    pub fn client(&self) -> &StoreClient {
        &self.client
    }

    async fn send(&self, op: &'static str, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        debug!(op, method = ?request.method, path = %request.path, "dispatching request");
        match self.transport.execute(request).await {
            Ok(response) => {
                debug!(op, status = response.status, "response received");
                Ok(response)
            }
            Err(e) => {
                warn!(op, error = %e, "transport failure");
                Err(e.into())
            }
        }
    }

    pub async fn search_near_stores(
        &self,
        current: Position,
        map_center: Position,
        distance: f64,
    ) -> Result<Vec<StoreSummary>, ApiError> {
        let req = self.client.build_search_near_stores(current, map_center, distance);
        let resp = self.send("search_near_stores", req).await?;
        self.client.parse_search_near_stores(resp)
    }

    /// `user_id` is read by the caller at call time and never cached here.
    pub async fn save_store(
        &self,
        draft: &StoreDraft,
        user_id: &str,
    ) -> Result<SaveResponse, ApiError> {
        let req = self.client.build_save_store(draft, user_id);
        let resp = self.send("save_store", req).await?;
        self.client.parse_save_store(resp)
    }

    pub async fn save_photos(
        &self,
        store_id: i64,
        uploads: &[ImageUpload],
    ) -> Result<(), ApiError> {
        let req = self.client.build_save_photos(store_id, uploads);
        let resp = self.send("save_photos", req).await?;
        self.client.parse_save_photos(resp)
    }

    pub async fn get_photos(&self, store_id: i64) -> Result<Vec<Image>, ApiError> {
        let req = self.client.build_get_photos(store_id);
        let resp = self.send("get_photos", req).await?;
        self.client.parse_get_photos(resp)
    }

    pub async fn delete_photo(&self, store_id: i64, photo_id: i64) -> Result<(), ApiError> {
        let req = self.client.build_delete_photo(store_id, photo_id);
        let resp = self.send("delete_photo", req).await?;
        self.client.parse_delete_photo(resp)
    }

    pub async fn update_store(&self, store_id: i64, draft: &StoreDraft) -> Result<(), ApiError> {
        let req = self.client.build_update_store(store_id, draft);
        let resp = self.send("update_store", req).await?;
        self.client.parse_update_store(resp)
    }

    pub async fn get_store_detail(
        &self,
        store_id: i64,
        current: Position,
    ) -> Result<Store, ApiError> {
        let req = self.client.build_get_store_detail(store_id, current);
        let resp = self.send("get_store_detail", req).await?;
        self.client.parse_get_store_detail(resp)
    }

    pub async fn get_reported_stores(&self, page: u32) -> Result<Page<Store>, ApiError> {
        let req = self.client.build_get_reported_stores(page);
        let resp = self.send("get_reported_stores", req).await?;
        self.client.parse_get_reported_stores(resp)
    }

    pub async fn search_registered_stores(
        &self,
        position: Position,
        page: u32,
    ) -> Result<Page<StoreCard>, ApiError> {
        let req = self.client.build_search_registered_stores(position, page);
        let resp = self.send("search_registered_stores", req).await?;
        self.client.parse_search_registered_stores(resp)
    }

    pub async fn delete_store(
        &self,
        store_id: i64,
        reason: DeleteReason,
        user_id: &str,
    ) -> Result<(), ApiError> {
        let req = self.client.build_delete_store(store_id, reason, user_id);
        let resp = self.send("delete_store", req).await?;
        self.client.parse_delete_store(resp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Menu;

    /// Transport that answers every request with one canned response.
    struct CannedTransport {
        status: u16,
        body: String,
    }

    impl CannedTransport {
        fn new(status: u16, body: &str) -> Self {
            Self {
                status,
                body: body.to_string(),
            }
        }
    }

    #[async_trait]
    impl Transport for CannedTransport {
        async fn execute(&self, _request: HttpRequest) -> Result<HttpResponse, TransportError> {
            Ok(HttpResponse {
                status: self.status,
                headers: Vec::new(),
                body: self.body.clone(),
            })
        }
    }

    /// Transport that fails at the connection level.
    struct DownTransport;

    #[async_trait]
    impl Transport for DownTransport {
        async fn execute(&self, _request: HttpRequest) -> Result<HttpResponse, TransportError> {
            Err(TransportError("connection refused".to_string()))
        }
    }

    fn service<T: Transport>(transport: T) -> StoreService<T> {
        StoreService::new(ApiConfig::new("http://localhost:3000"), transport)
    }

    fn hotteok_draft() -> StoreDraft {
        StoreDraft {
            store_name: "호떡집".to_string(),
            latitude: 37.5,
            longitude: 127.0,
            category: None,
            menus: vec![Menu::new("호떡", "1000")],
        }
    }

    #[tokio::test]
    async fn save_store_returns_new_store_id() {
        let svc = service(CannedTransport::new(200, r#"{"storeId":42}"#));
        let resp = svc.save_store(&hotteok_draft(), "10").await.unwrap();
        assert_eq!(resp.store_id, 42);
    }

    #[tokio::test]
    async fn delete_store_maps_400_to_domain_failure() {
        let svc = service(CannedTransport::new(400, ""));
        let err = svc
            .delete_store(7, DeleteReason::Nostore, "10")
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::DeleteAlreadyRequested));
    }

    #[tokio::test]
    async fn connection_failure_surfaces_as_transport_error() {
        let svc = service(DownTransport);
        let err = svc.get_photos(1).await.unwrap_err();
        assert!(matches!(err, ApiError::Transport(_)));
    }

    #[tokio::test]
    async fn update_store_sentinel_on_2xx() {
        let svc = service(CannedTransport::new(200, "success"));
        assert!(svc.update_store(7, &hotteok_draft()).await.is_ok());
    }

    #[tokio::test]
    async fn concurrent_calls_complete_independently() {
        let svc = service(CannedTransport::new(200, r#"[]"#));
        let (photos, stores) = tokio::join!(
            svc.get_photos(1),
            svc.search_near_stores(Position::new(0.0, 0.0), Position::new(0.0, 0.0), 100.0)
        );
        assert!(photos.unwrap().is_empty());
        assert!(stores.unwrap().is_empty());
    }
}
