//
//  bitbucket-context
//  api/common/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Common API Types for Bitbucket Cloud and Server
//!
//! This module provides shared types used by both the Bitbucket Cloud and the
//! Bitbucket Server/Data Center API implementations.
//!
//! # Overview
//!
//! - [`ApiError`] - Unified error type for all API operations
//! - Pagination types (re-exported from the `pagination` submodule)
//!
//! # Example
//!
//! ```rust
//! use bitbucket_context::api::common::ApiError;
//!
//! fn describe(result: Result<(), ApiError>) -> String {
//!     match result {
//!         Ok(()) => "ok".to_string(),
//!         Err(ApiError::NotFound(resource)) => format!("missing: {}", resource),
//!         Err(e) => e.to_string(),
//!     }
//! }
//!
//! assert_eq!(describe(Err(ApiError::NotFound("repo".into()))), "missing: repo");
//! ```

use reqwest::StatusCode;
use thiserror::Error;

mod pagination;

pub use pagination::*;

/// Unified error type for all Bitbucket API operations.
///
/// `ApiError` covers the failure scenarios seen when talking to either
/// Bitbucket platform. Errors are never retried by this crate; they are
/// propagated to the caller unchanged.
///
/// # Variants
///
/// | Variant | Description | HTTP Status |
/// |---------|-------------|-------------|
/// | `AuthFailed` | Invalid or expired credentials | 401 |
/// | `Forbidden` | Insufficient permissions | 403 |
/// | `NotFound` | Requested resource does not exist | 404 |
/// | `RateLimited` | Too many requests | 429 |
/// | `BadRequest` | Invalid request parameters | 400 |
/// | `ServerError` | Internal server error | 5xx |
/// | `Network` | Transport-level failure | N/A |
/// | `Decode` | Response body did not match the expected shape | N/A |
/// | `Unknown` | Anything else | N/A |
#[derive(Error, Debug)]
pub enum ApiError {
    /// Authentication failed due to invalid or expired credentials.
    #[error("Authentication failed: {0}")]
    AuthFailed(String),

    /// The requested resource was not found.
    ///
    /// Lookups that treat a missing resource as "absent" never surface this
    /// variant; it is only produced by calls that require the resource.
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// API rate limit has been exceeded.
    #[error("Rate limit exceeded")]
    RateLimited,

    /// Access to the resource is forbidden.
    #[error("Permission denied: {0}")]
    Forbidden(String),

    /// The request was malformed or contained invalid parameters.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// An internal server error occurred on the Bitbucket server.
    #[error("Server error: {0}")]
    ServerError(String),

    /// A network-level error occurred during the request.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The response body could not be decoded into the expected type.
    #[error("Could not decode response: {0}")]
    Decode(String),

    /// An unknown or unexpected error occurred.
    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl ApiError {
    /// Builds an error from a non-success HTTP status and its response body.
    ///
    /// The human readable message is extracted from the Bitbucket error body
    /// with [`error_message`]; the status code selects the variant.
    pub fn from_status(status: StatusCode, body: &str) -> Self {
        let message = error_message(status, body);
        match status {
            StatusCode::UNAUTHORIZED => Self::AuthFailed(message),
            StatusCode::FORBIDDEN => Self::Forbidden(message),
            StatusCode::NOT_FOUND => Self::NotFound(message),
            StatusCode::TOO_MANY_REQUESTS => Self::RateLimited,
            StatusCode::BAD_REQUEST => Self::BadRequest(message),
            s if s.is_server_error() => Self::ServerError(message),
            _ => Self::Unknown(message),
        }
    }

    /// Returns `true` for errors caused by missing or rejected credentials.
    pub fn is_auth_error(&self) -> bool {
        matches!(self, Self::AuthFailed(_) | Self::Forbidden(_))
    }
}

/// Extracts a user-friendly message from a Bitbucket API error body.
///
/// Bitbucket Cloud returns errors in the format:
/// ```json
/// {"type": "error", "error": {"message": "Human readable message"}}
/// ```
///
/// Bitbucket Server returns errors in the format:
/// ```json
/// {"errors": [{"message": "Human readable message"}]}
/// ```
///
/// If neither shape matches, the status and the raw body are returned.
pub fn error_message(status: StatusCode, body: &str) -> String {
    if let Ok(json) = serde_json::from_str::<serde_json::Value>(body) {
        // Cloud format: {"type": "error", "error": {"message": "..."}}
        if let Some(message) = json
            .get("error")
            .and_then(|e| e.get("message"))
            .and_then(|m| m.as_str())
        {
            return message.to_string();
        }

        // Server format: {"errors": [{"message": "..."}]}
        if let Some(message) = json
            .get("errors")
            .and_then(|e| e.as_array())
            .and_then(|arr| arr.first())
            .and_then(|e| e.get("message"))
            .and_then(|m| m.as_str())
        {
            return message.to_string();
        }

        if let Some(message) = json.get("message").and_then(|m| m.as_str()) {
            return message.to_string();
        }
    }

    format!("API error ({}): {}", status, body)
}
