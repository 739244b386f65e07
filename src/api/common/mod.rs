//
//  kibana-api
//  api/common/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Common API Types for the Kibana REST API
//!
//! This module provides the types shared by every endpoint group: the error
//! taxonomy, the typed response wrapper, the success rule each endpoint uses
//! to classify status codes, and the structured error payload returned when
//! Kibana answers with a non-success status.
//!
//! # Overview
//!
//! - [`Error`] - Unified error type for all API operations
//! - [`ApiResponse`] - Typed response carrying status code, headers and body
//! - [`ErrorResponse`] / [`ErrorPayload`] - Non-success response details
//! - [`SuccessRule`] - Which status codes an endpoint treats as success
//! - Pagination types (re-exported from the `pagination` submodule)
//! - NDJSON export types (re-exported from the `ndjson` submodule)
//!
//! # Example
//!
//! ```rust
//! use kibana_api::api::common::{Error, ErrorPayload};
//!
//! fn describe(err: &Error) -> String {
//!     match err {
//!         Error::Status(response) => match &response.error {
//!             ErrorPayload::Json(value) => format!("{}: {}", response.status_code, value),
//!             ErrorPayload::Text(text) => format!("{}: {}", response.status_code, text),
//!         },
//!         other => other.to_string(),
//!     }
//! }
//! ```

use std::fmt;

use reqwest::header::HeaderMap;
use reqwest::StatusCode;
use thiserror::Error;

use crate::api::transport::TransportError;

mod ndjson;
mod pagination;

pub use ndjson::*;
pub use pagination::*;

/// Result alias used by every endpoint call.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Unified error type for all Kibana API operations.
///
/// Every failure is surfaced synchronously to the caller; nothing is retried
/// or recovered inside the client.
///
/// # Variants
///
/// | Variant | Raised when | Network call made |
/// |---------|-------------|-------------------|
/// | `Validation` | A required request field is missing | No |
/// | `Serialize` | The request body cannot be encoded | No |
/// | `Url` | The endpoint URL cannot be built | No |
/// | `Option` | A [`RequestOption`](crate::api::RequestOption) failed | No |
/// | `Transport` | The transport could not complete the exchange | Yes |
/// | `BodyRead` | The response body could not be read | Yes |
/// | `Decode` | A success response does not match the declared schema | Yes |
/// | `Status` | Kibana answered with a non-success status | Yes |
#[derive(Error, Debug)]
pub enum Error {
    /// A required field was missing or empty.
    #[error("Invalid request: {0}")]
    Validation(String),

    /// The request body could not be serialized to JSON.
    #[error("Failed to encode request body: {0}")]
    Serialize(#[source] serde_json::Error),

    /// The endpoint URL could not be built from the base URL.
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// A request option rejected the outgoing request.
    #[error("Request option failed: {0}")]
    Option(String),

    /// The transport failed before a response was received.
    ///
    /// The transport's error is passed through unchanged.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// Reading the response body failed.
    #[error("Failed to read response body (HTTP Status Code {status}): {source}")]
    BodyRead {
        /// Status of the response whose body could not be read.
        status: StatusCode,
        /// The underlying read failure.
        #[source]
        source: reqwest::Error,
    },

    /// A success response could not be decoded into the declared type.
    #[error("Failed to decode response body (HTTP Status Code {status}): {source}")]
    Decode {
        /// Status of the response that failed to decode.
        status: StatusCode,
        /// The raw response body, for inspecting what came back instead.
        body: bytes::Bytes,
        /// The underlying JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// Kibana answered with a non-success status code.
    #[error("{0}")]
    Status(ErrorResponse),
}

impl Error {
    /// Returns the HTTP status code associated with this error, if a
    /// response was received.
    pub fn status_code(&self) -> Option<StatusCode> {
        match self {
            Self::Status(response) => Some(response.status_code),
            Self::Decode { status, .. } | Self::BodyRead { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns `true` for a non-success response with status 404.
    pub fn is_not_found(&self) -> bool {
        self.status_code() == Some(StatusCode::NOT_FOUND)
    }
}

/// Rejects an empty required field before any network call is made.
pub(crate) fn require(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::Validation(format!("{field} is required")));
    }
    Ok(())
}

/// Successful, typed API response.
///
/// # Type Parameters
///
/// - `T` - The decoded body type declared by the endpoint
///
/// # Example
///
/// ```rust,no_run
/// use kibana_api::api::spaces::GetSpaceRequest;
/// use kibana_api::KibanaClient;
///
/// # async fn example() -> kibana_api::Result<()> {
/// let client = KibanaClient::new("http://localhost:5601")?;
/// let response = client
///     .spaces()
///     .get(&GetSpaceRequest { id: "default".to_string() }, &[])
///     .await?;
/// println!("{} -> {}", response.status_code, response.body.name);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ApiResponse<T> {
    /// The status code Kibana answered with.
    pub status_code: StatusCode,

    /// The response headers.
    pub headers: HeaderMap,

    /// The decoded response body.
    pub body: T,
}

impl<T> ApiResponse<T> {
    /// Consumes the response and returns the decoded body.
    pub fn into_body(self) -> T {
        self.body
    }

    /// Maps the body while keeping status and headers.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ApiResponse<U> {
        ApiResponse {
            status_code: self.status_code,
            headers: self.headers,
            body: f(self.body),
        }
    }
}

/// Which status codes an endpoint treats as success.
///
/// Most Kibana endpoints answer exactly `200`; endpoints that create or
/// delete resources may answer `204` or other 2xx codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SuccessRule {
    /// Only `200 OK` is a success.
    #[default]
    Exactly200,

    /// Any 2xx status below `299` is a success.
    Below299,
}

impl SuccessRule {
    /// Returns `true` when `status` counts as success under this rule.
    pub fn accepts(self, status: StatusCode) -> bool {
        match self {
            Self::Exactly200 => status == StatusCode::OK,
            Self::Below299 => (200..299).contains(&status.as_u16()),
        }
    }
}

/// Body of a non-success response.
///
/// Kibana normally answers errors with a JSON object such as
/// `{"statusCode":404,"error":"Not Found","message":"..."}`; proxies in front
/// of Kibana often answer with plain text instead.
#[derive(Debug, Clone, PartialEq)]
pub enum ErrorPayload {
    /// The body decoded as JSON.
    Json(serde_json::Value),

    /// The body was not JSON; the raw text is kept.
    Text(String),
}

impl ErrorPayload {
    /// Decodes `body` as JSON, falling back to lossy UTF-8 text.
    pub fn from_bytes(body: &[u8]) -> Self {
        match serde_json::from_slice(body) {
            Ok(value) => Self::Json(value),
            Err(_) => Self::Text(String::from_utf8_lossy(body).into_owned()),
        }
    }

    /// Extracts the human-readable message, if any.
    ///
    /// Looks for Kibana's `message` field, then for an `error` string, and
    /// returns the raw text for non-JSON payloads.
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Json(value) => value
                .get("message")
                .and_then(|m| m.as_str())
                .or_else(|| value.get("error").and_then(|e| e.as_str())),
            Self::Text(text) if !text.is_empty() => Some(text.as_str()),
            Self::Text(_) => None,
        }
    }
}

/// Details of a response whose status did not satisfy the endpoint's
/// [`SuccessRule`].
///
/// The body has been read fully; it is kept both raw and as a best-effort
/// decoded [`ErrorPayload`].
#[derive(Debug, Clone)]
pub struct ErrorResponse {
    /// The status code Kibana answered with.
    pub status_code: StatusCode,

    /// The response headers.
    pub headers: HeaderMap,

    /// The decoded error payload.
    pub error: ErrorPayload,

    /// The body exactly as received.
    pub raw_body: Vec<u8>,
}

impl ErrorResponse {
    pub(crate) fn new(status_code: StatusCode, headers: HeaderMap, body: &[u8]) -> Self {
        Self {
            status_code,
            headers,
            error: ErrorPayload::from_bytes(body),
            raw_body: body.to_vec(),
        }
    }

    /// The raw body as lossy UTF-8 text.
    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.raw_body).into_owned()
    }
}

impl fmt::Display for ErrorResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "HTTP Status Code {}: {}",
            self.status_code.as_u16(),
            self.body_text()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_rules() {
        assert!(SuccessRule::Exactly200.accepts(StatusCode::OK));
        assert!(!SuccessRule::Exactly200.accepts(StatusCode::NO_CONTENT));
        assert!(SuccessRule::Below299.accepts(StatusCode::NO_CONTENT));
        assert!(SuccessRule::Below299.accepts(StatusCode::CREATED));
        assert!(!SuccessRule::Below299.accepts(StatusCode::NOT_FOUND));
        assert!(!SuccessRule::Below299.accepts(StatusCode::MULTIPLE_CHOICES));
    }

    #[test]
    fn test_error_payload_json_message() {
        let payload = ErrorPayload::from_bytes(
            br#"{"statusCode":400,"error":"Bad Request","message":"[name]: required"}"#,
        );
        assert!(matches!(payload, ErrorPayload::Json(_)));
        assert_eq!(payload.message(), Some("[name]: required"));
    }

    #[test]
    fn test_error_payload_text_fallback() {
        let payload = ErrorPayload::from_bytes(b"Not Found");
        assert_eq!(payload, ErrorPayload::Text("Not Found".to_string()));
        assert_eq!(payload.message(), Some("Not Found"));
    }

    #[test]
    fn test_error_response_display() {
        let response = ErrorResponse::new(StatusCode::NOT_FOUND, HeaderMap::new(), b"Not Found");
        assert_eq!(response.to_string(), "HTTP Status Code 404: Not Found");
    }

    #[test]
    fn test_require() {
        assert!(require("id", "default").is_ok());
        let err = require("id", "  ").unwrap_err();
        assert_eq!(err.to_string(), "Invalid request: id is required");
    }
}
