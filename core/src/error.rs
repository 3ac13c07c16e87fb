//! Error types for the listings API client.
//!
//! # Design
//! `NotFound` gets a dedicated variant because callers frequently distinguish
//! "the resource does not exist" from "the server returned an unexpected
//! status." All other non-2xx responses land in `HttpError` with the raw
//! status code and body for debugging.
//!
//! Two errors never reach the network: `InvalidField` is raised while a
//! field selection is being built, and the pagination variants are raised
//! before a search request is built. `MalformedResponse` means the response
//! envelope itself had the wrong shape; a single bad listing inside a good
//! envelope is not an `ApiError` at all (see `normalize::RecordError`).

use thiserror::Error;

/// Errors returned by the client, the normalizer and the field selectors.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The server returned 404.
    #[error("resource not found: {url}")]
    NotFound { url: String },

    /// The server returned a non-success status other than 404.
    #[error("HTTP error {status}: {body}")]
    HttpError { status: u16, body: String },

    /// The request never produced a response.
    #[error("transport failed: {0}")]
    Transport(String),

    /// The response body could not be decoded as JSON.
    #[error("deserialization failed: {0}")]
    DeserializationError(String),

    /// A field name outside the selector's closed schema was requested.
    #[error("`{field}` is not a selectable field of {selector}")]
    InvalidField {
        selector: &'static str,
        field: String,
    },

    /// The response envelope lacks the path to the listings array.
    #[error("malformed response: missing key `{key}`")]
    MalformedResponse { key: String },

    #[error("page size must be between 1 and {max}, got {size}")]
    InvalidPageSize { size: u32, max: u32 },

    #[error("page number must be greater than 0")]
    InvalidPage,

    #[error("invalid URL '{url}': {message}")]
    InvalidUrl { url: String, message: String },
}

impl ApiError {
    /// True for errors caused by the caller's own input rather than the provider.
    pub fn is_caller_error(&self) -> bool {
        matches!(
            self,
            ApiError::InvalidField { .. }
                | ApiError::InvalidPageSize { .. }
                | ApiError::InvalidPage
                | ApiError::InvalidUrl { .. }
        )
    }
}
