//! API client core for the street-food store backend.
//!
//! # Overview
//! Turns typed method calls into HTTP requests against the store backend
//! (nearby search, store save/update/delete, photo upload, paginated
//! listings) and decodes responses into domain models, classifying every
//! failure uniformly.
//!
//! # Design
//! - `StoreClient` is the deterministic core: `build_*` produces an
//!   `HttpRequest` as plain data, `parse_*` consumes an `HttpResponse`.
//!   It never touches the network (host-does-IO pattern).
//! - `StoreService` wraps the client with a host-supplied `Transport` and
//!   exposes each operation as an `async fn` performing exactly one round
//!   trip.
//! - Wire details (paths, `menu[i].*` field flattening, `storeId` fields)
//!   are bit-exact backend contracts.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod service;
pub mod types;

pub use client::StoreClient;
pub use config::ApiConfig;
pub use error::{ApiError, TransportError};
pub use http::{FormPart, FormValue, HttpBody, HttpMethod, HttpRequest, HttpResponse};
pub use service::{StoreService, Transport};
pub use types::{
    DeleteReason, Image, ImageUpload, Menu, Page, Position, Reporter, SaveResponse, Store,
    StoreCard, StoreCategory, StoreDraft, StoreSummary,
};
