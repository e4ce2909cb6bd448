//! Error types for the request gateway.
//!
//! # Design
//! Dispatch only fails when the exchange itself fails (`Transport`) or the
//! payload cannot be encoded (`Serialization`). Status codes are data until
//! the caller asks for `HttpResponse::error_for_status`, which produces
//! `NotFound` or `Status`. `NotFound` gets a dedicated variant because
//! callers frequently distinguish "the resource does not exist" from "the
//! server returned an unexpected status."

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never produced a response (connection refused, DNS,
    /// malformed URL, broken body stream).
    #[error("transport error: {0}")]
    Transport(String),

    /// The server returned 404.
    #[error("resource not found")]
    NotFound,

    /// The server returned a non-2xx status other than 404.
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    Deserialization(String),
}
