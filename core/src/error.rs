//! Error taxonomy for the store API client.
//!
//! # Design
//! Four terminal outcomes: an HTTP-level rejection with the server's status
//! and message, a domain rejection (currently only the duplicate
//! deletion request on store delete), a decode failure for bodies that do
//! not match the expected shape, and a transport failure when no response
//! was received at all. Nothing is retried or recovered here; every failure
//! surfaces to the caller as the operation's single outcome.

use thiserror::Error;

/// Connection-level failure: the request never produced an HTTP response.
#[derive(Debug, Error)]
#[error("transport error: {0}")]
pub struct TransportError(pub String);

/// Errors returned by `StoreClient` parse methods and `StoreService`
/// operations.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The server answered with a non-2xx status not otherwise special-cased.
    /// `message` is the server-supplied message when one was present, else
    /// the raw response body.
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    /// Store deletion was already requested for this store (server 400 on
    /// the delete endpoint).
    #[error("deletion already requested for this store")]
    DeleteAlreadyRequested,

    /// The response body could not be decoded into the expected shape.
    #[error("decode failed: {0}")]
    Decode(String),

    /// No response was received from the server.
    #[error(transparent)]
    Transport(#[from] TransportError),
}
