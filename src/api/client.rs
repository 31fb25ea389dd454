//
//  bitbucket-context
//  api/client.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # HTTP Client Wrapper for Bitbucket API
//!
//! This module provides the core HTTP client used by the platform-specific
//! API implementations in [`cloud`](super::cloud) and [`server`](super::server).
//!
//! ## Features
//!
//! - Base URL selection per platform (Cloud API 2.0, Server API 1.0)
//! - Authentication header injection
//! - Percent-encoded path segments (branch names and file paths may contain `/`)
//! - "Absent" lookups: `404 Not Found` and `204 No Content` map to `None`
//! - Typed errors ([`ApiError`]) with messages extracted from Bitbucket error bodies

use std::time::Duration;

use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use super::common::ApiError;
use crate::auth::AuthCredential;
use crate::config::{HostConfig, HostType, BITBUCKET_API};

/// The HTTP client for talking to a single Bitbucket instance.
///
/// # Creating a Client
///
/// ```rust,no_run
/// use bitbucket_context::api::BitbucketClient;
///
/// // For Bitbucket Cloud
/// let cloud_client = BitbucketClient::cloud()?;
///
/// // For Bitbucket Server/DC, possibly mounted under a sub-path
/// let server_client = BitbucketClient::server("bitbucket.example.com/bitbucket")?;
/// # Ok::<(), bitbucket_context::api::ApiError>(())
/// ```
///
/// # Authentication
///
/// ```rust,no_run
/// use bitbucket_context::api::BitbucketClient;
/// use bitbucket_context::auth::AuthCredential;
///
/// let client = BitbucketClient::cloud()?
///     .with_auth(AuthCredential::bearer("your-token"));
/// # Ok::<(), bitbucket_context::api::ApiError>(())
/// ```
pub struct BitbucketClient {
    /// The underlying HTTP client
    http: Client,
    /// API root, e.g. `https://api.bitbucket.org/2.0`
    base_url: String,
    /// The platform type (Cloud or Server/DC)
    host_type: HostType,
    /// Optional authentication credentials
    auth: Option<AuthCredential>,
}

impl BitbucketClient {
    /// Creates a new client configured for Bitbucket Cloud.
    ///
    /// The client targets `https://api.bitbucket.org/2.0`.
    pub fn cloud() -> Result<Self, ApiError> {
        Self::build(
            format!("https://{}/2.0", BITBUCKET_API),
            HostType::Cloud,
            None,
        )
    }

    /// Creates a new client configured for Bitbucket Server/Data Center.
    ///
    /// The client targets `https://<host>/rest/api/1.0`. The host may carry
    /// a sub-path when the server is mounted below the web root
    /// (e.g. `example.com/bitbucket`).
    pub fn server(host: &str) -> Result<Self, ApiError> {
        Self::build(
            format!("https://{}/rest/api/1.0", host),
            HostType::Server,
            None,
        )
    }

    /// Creates a client from a host configuration.
    ///
    /// An explicit `api_base` in the configuration wins over the default
    /// base URL of the platform; `timeout_secs` sets a request timeout.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use bitbucket_context::api::BitbucketClient;
    /// use bitbucket_context::config::{HostConfig, HostType};
    ///
    /// let config = HostConfig {
    ///     host: "bitbucket.example.com".to_string(),
    ///     flavor: Some(HostType::Server),
    ///     ..Default::default()
    /// };
    ///
    /// let client = BitbucketClient::from_config(&config)?;
    /// assert_eq!(client.base_url(), "https://bitbucket.example.com/rest/api/1.0");
    /// # Ok::<(), bitbucket_context::api::ApiError>(())
    /// ```
    pub fn from_config(config: &HostConfig) -> Result<Self, ApiError> {
        let host_type = config.host_type();
        let base_url = match (&config.api_base, &host_type) {
            (Some(base), _) => base.trim_end_matches('/').to_string(),
            (None, HostType::Cloud) => format!("https://{}/2.0", BITBUCKET_API),
            (None, HostType::Server) => format!("https://{}/rest/api/1.0", config.host),
        };
        let timeout = config.timeout_secs.map(Duration::from_secs);

        Self::build(base_url, host_type, timeout)
    }

    fn build(
        base_url: String,
        host_type: HostType,
        timeout: Option<Duration>,
    ) -> Result<Self, ApiError> {
        let mut builder = Client::builder().user_agent(format!("bbctx/{}", crate::VERSION));
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            http: builder.build()?,
            base_url,
            host_type,
            auth: None,
        })
    }

    /// Points the client at a different API root.
    ///
    /// Mostly useful for tests against a local mock server.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Sets the authentication credentials for this client.
    pub fn with_auth(mut self, auth: AuthCredential) -> Self {
        self.auth = Some(auth);
        self
    }

    /// Checks if this client is configured for Bitbucket Cloud.
    pub fn is_cloud(&self) -> bool {
        matches!(self.host_type, HostType::Cloud)
    }

    /// Checks if this client is configured for Bitbucket Server/DC.
    pub fn is_server(&self) -> bool {
        matches!(self.host_type, HostType::Server)
    }

    /// Returns the base URL for API requests.
    ///
    /// ```rust
    /// use bitbucket_context::api::BitbucketClient;
    ///
    /// let server = BitbucketClient::server("bb.example.com").unwrap();
    /// assert_eq!(server.base_url(), "https://bb.example.com/rest/api/1.0");
    /// ```
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Builds the full request URL from path segments.
    ///
    /// Each segment is percent-encoded individually, so a branch named
    /// `feature/login` stays a single segment (`feature%2Flogin`).
    pub fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = Url::parse(&self.base_url).map_err(|e| {
            ApiError::Unknown(format!("invalid API base URL {}: {}", self.base_url, e))
        })?;
        url.path_segments_mut()
            .map_err(|_| ApiError::Unknown(format!("API base URL cannot be a base: {}", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Makes an HTTP GET request and deserializes the JSON response.
    ///
    /// # Errors
    ///
    /// Returns an error if the network request fails, the response status is
    /// not successful (2xx), or the body cannot be deserialized to `T`.
    pub async fn get<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        query: &[(&str, &str)],
    ) -> Result<T, ApiError> {
        let response = self.send(segments, query).await?;
        let status = response.status();

        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(ApiError::from_status(status, &text));
        }

        decode(response).await
    }

    /// Makes an HTTP GET request for a resource that may not exist.
    ///
    /// `404 Not Found` and `204 No Content` yield `Ok(None)`; every other
    /// non-success status is an error.
    pub async fn get_optional<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        query: &[(&str, &str)],
    ) -> Result<Option<T>, ApiError> {
        let response = self.send(segments, query).await?;
        let status = response.status();

        if status == StatusCode::NOT_FOUND || status == StatusCode::NO_CONTENT {
            debug!(%status, "resource absent");
            return Ok(None);
        }

        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(ApiError::from_status(status, &text));
        }

        decode(response).await.map(Some)
    }

    async fn send(&self, segments: &[&str], query: &[(&str, &str)]) -> Result<Response, ApiError> {
        let url = self.endpoint(segments)?;
        debug!(url = %url, "GET");

        let mut request = self.http.get(url).query(query);
        if let Some(auth) = &self.auth {
            request = auth.apply_to_request(request);
        }

        Ok(request.send().await?)
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let text = response.text().await?;
    serde_json::from_str(&text).map_err(|e| ApiError::Decode(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Named {
        name: String,
    }

    #[test]
    fn test_base_urls() {
        assert_eq!(
            BitbucketClient::cloud().unwrap().base_url(),
            "https://api.bitbucket.org/2.0"
        );
        assert_eq!(
            BitbucketClient::server("example.com/bitbucket").unwrap().base_url(),
            "https://example.com/bitbucket/rest/api/1.0"
        );
    }

    #[test]
    fn test_from_config_prefers_api_base() {
        let config = HostConfig {
            host: "bb.example.com".to_string(),
            flavor: Some(HostType::Server),
            api_base: Some("http://localhost:7990/rest/api/1.0/".to_string()),
            ..Default::default()
        };
        let client = BitbucketClient::from_config(&config).unwrap();
        assert!(client.is_server());
        assert_eq!(client.base_url(), "http://localhost:7990/rest/api/1.0");
    }

    #[test]
    fn test_endpoint_encodes_segments() {
        let client = BitbucketClient::cloud().unwrap();
        let url = client
            .endpoint(&["repositories", "alice", "proj", "commits", "feature/login"])
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.bitbucket.org/2.0/repositories/alice/proj/commits/feature%2Flogin"
        );
    }

    #[tokio::test]
    async fn test_get_sends_bearer_token_and_query() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/things/one")
            .match_header("authorization", "Bearer secret")
            .match_query(Matcher::UrlEncoded("limit".into(), "1".into()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"name": "one"}"#)
            .create_async()
            .await;

        let client = BitbucketClient::cloud()
            .unwrap()
            .with_base_url(server.url())
            .with_auth(AuthCredential::bearer("secret"));
        let named: Named = client.get(&["things", "one"], &[("limit", "1")]).await.unwrap();

        assert_eq!(named.name, "one");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_get_optional_maps_not_found_to_none() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/things/missing")
            .with_status(404)
            .with_body(r#"{"errors": [{"message": "gone"}]}"#)
            .create_async()
            .await;

        let client = BitbucketClient::cloud().unwrap().with_base_url(server.url());
        let named: Option<Named> = client.get_optional(&["things", "missing"], &[]).await.unwrap();
        assert!(named.is_none());
    }

    #[tokio::test]
    async fn test_get_maps_error_status() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/things/private")
            .with_status(403)
            .with_body(r#"{"type": "error", "error": {"message": "Access denied"}}"#)
            .create_async()
            .await;

        let client = BitbucketClient::cloud().unwrap().with_base_url(server.url());
        let err = client
            .get::<Named>(&["things", "private"], &[])
            .await
            .unwrap_err();
        match err {
            ApiError::Forbidden(message) => assert_eq!(message, "Access denied"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_get_reports_decode_errors() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/things/odd")
            .with_status(200)
            .with_body(r#"{"unexpected": true}"#)
            .create_async()
            .await;

        let client = BitbucketClient::cloud().unwrap().with_base_url(server.url());
        let err = client.get::<Named>(&["things", "odd"], &[]).await.unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));
    }
}
