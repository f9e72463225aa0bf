//! HTTP transport types for the host-does-IO pattern.
//!
//! # Design
//! These types describe HTTP requests and responses as plain data. The core
//! crate builds `HttpRequest` values and parses `HttpResponse` values without
//! ever touching the network — the caller (host) executes the actual I/O.
//! This keeps the core deterministic and easy to test, and lets any transport
//! (reqwest, a mock, a recorded fixture) drive it.
//!
//! All fields use owned types (`String`, `Vec`) so values can be moved into
//! whatever executor the host uses without lifetime concerns.

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

/// Body of a request built by the client.
///
/// The backend takes either no body (GET/DELETE with query parameters) or a
/// `multipart/form-data` body for the mutating endpoints; there is no JSON
/// request body anywhere in the store API.
#[derive(Debug, Clone, PartialEq)]
pub enum HttpBody {
    Empty,
    Multipart(Vec<FormPart>),
}

/// One part of a `multipart/form-data` body.
#[derive(Debug, Clone, PartialEq)]
pub struct FormPart {
    pub name: String,
    pub value: FormValue,
}

impl FormPart {
    pub fn text(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: FormValue::Text(value.into()),
        }
    }

    pub fn file(
        name: impl Into<String>,
        bytes: Vec<u8>,
        file_name: impl Into<String>,
        content_type: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            value: FormValue::File {
                bytes,
                file_name: file_name.into(),
                content_type: content_type.into(),
            },
        }
    }
}

/// Value of a multipart part: a plain text field or a file attachment.
#[derive(Debug, Clone, PartialEq)]
pub enum FormValue {
    Text(String),
    File {
        bytes: Vec<u8>,
        file_name: String,
        content_type: String,
    },
}

/// An HTTP request described as plain data.
///
/// Built by `StoreClient::build_*` methods. The caller executes this request
/// against the network and returns the corresponding `HttpResponse`.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
    pub body: HttpBody,
}

/// An HTTP response described as plain data.
///
/// Constructed by the caller after executing an `HttpRequest`, then passed
/// to `StoreClient::parse_*` methods for decoding.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpResponse {
    /// True when the status signals success. Several endpoints treat any 2xx
    /// as the literal success marker without decoding a payload.
    pub fn is_success(&self) -> bool {
        (200..=299).contains(&self.status)
    }
}
