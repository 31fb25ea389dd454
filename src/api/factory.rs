//
//  bitbucket-context
//  api/factory.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Construction of authenticated [`HostingApi`] clients.
//!
//! The resolver builds a fresh client for every request, authenticated as
//! the requesting user. [`BitbucketApiFactory`] does that for a configured
//! host; tests substitute their own [`ApiFactory`].

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tracing::debug;

use super::client::BitbucketClient;
use super::cloud::CloudApi;
use super::common::ApiError;
use super::hosting::HostingApi;
use super::server::ServerApi;
use crate::auth::{AuthCredential, CredentialError, TokenProvider, User};
use crate::config::{HostConfig, HostType};

/// Failures while building a client.
#[derive(Error, Debug)]
pub enum FactoryError {
    /// No usable token for the user.
    #[error(transparent)]
    Credentials(#[from] CredentialError),

    /// The HTTP client could not be built.
    #[error(transparent)]
    Client(#[from] ApiError),
}

/// Builds a [`HostingApi`] authenticated as a user.
#[async_trait]
pub trait ApiFactory: Send + Sync {
    /// Creates a client acting on behalf of `user`.
    async fn create(&self, user: &User) -> Result<Arc<dyn HostingApi>, FactoryError>;
}

/// [`ApiFactory`] for one configured Bitbucket host.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use bitbucket_context::api::{ApiFactory, BitbucketApiFactory};
/// use bitbucket_context::auth::{StaticTokenProvider, Token, User};
/// use bitbucket_context::config::{HostConfig, HostType};
///
/// # #[tokio::main]
/// # async fn main() {
/// let factory = BitbucketApiFactory::new(
///     HostConfig::for_host("bb.example.com"),
///     Arc::new(StaticTokenProvider::new(Token::new("pat"))),
/// );
/// let api = factory.create(&User::new("42")).await.unwrap();
/// assert_eq!(api.host_type(), HostType::Server);
/// # }
/// ```
pub struct BitbucketApiFactory {
    host: HostConfig,
    tokens: Arc<dyn TokenProvider>,
}

impl BitbucketApiFactory {
    /// Creates a factory for `host` using `tokens` for authentication.
    pub fn new(host: HostConfig, tokens: Arc<dyn TokenProvider>) -> Self {
        Self { host, tokens }
    }
}

#[async_trait]
impl ApiFactory for BitbucketApiFactory {
    async fn create(&self, user: &User) -> Result<Arc<dyn HostingApi>, FactoryError> {
        let token = self.tokens.get_token_with_scopes(user, &[]).await?;
        let client = BitbucketClient::from_config(&self.host)?
            .with_auth(AuthCredential::from_token(&token, self.host.auth));

        let host_type = self.host.host_type();
        debug!(host = %self.host.host, %host_type, base_url = client.base_url(), "created API client");

        let api: Arc<dyn HostingApi> = match host_type {
            HostType::Cloud => Arc::new(CloudApi::new(client)),
            HostType::Server => Arc::new(
                ServerApi::new(client).with_default_branch_lookup(self.host.lookup_default_branch),
            ),
        };
        Ok(api)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{AuthScheme, StaticTokenProvider, Token};
    use chrono::{Duration, Utc};

    fn server_config(url: String, auth: AuthScheme) -> HostConfig {
        HostConfig {
            host: "bb.example.com".to_string(),
            flavor: Some(HostType::Server),
            auth,
            api_base: Some(url),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_creates_authenticated_server_client() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/projects/P/repos/r")
            .match_header("authorization", "Bearer pat")
            .with_status(200)
            .with_body(r#"{"project": {"key": "P"}, "name": "r"}"#)
            .create_async()
            .await;

        let factory = BitbucketApiFactory::new(
            server_config(server.url(), AuthScheme::Bearer),
            Arc::new(StaticTokenProvider::new(Token::new("pat"))),
        );
        let api = factory.create(&User::new("42")).await.unwrap();
        assert_eq!(api.host_type(), HostType::Server);
        assert!(api.get_repository("P", "r").await.unwrap().is_some());
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_basic_auth_uses_anonymous_user() {
        let mut server = mockito::Server::new_async().await;
        // base64("nobody:pat")
        let mock = server
            .mock("GET", "/projects/P/repos/r")
            .match_header("authorization", "Basic bm9ib2R5OnBhdA==")
            .with_status(200)
            .with_body(r#"{"project": {"key": "P"}}"#)
            .create_async()
            .await;

        let factory = BitbucketApiFactory::new(
            server_config(server.url(), AuthScheme::Basic),
            Arc::new(StaticTokenProvider::new(Token::new("pat"))),
        );
        let api = factory.create(&User::new("42")).await.unwrap();
        api.get_repository("P", "r").await.unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_cloud_flavor() {
        let factory = BitbucketApiFactory::new(
            HostConfig::for_host("bitbucket.org"),
            Arc::new(StaticTokenProvider::new(Token::new("pat"))),
        );
        let api = factory.create(&User::new("42")).await.unwrap();
        assert_eq!(api.host_type(), HostType::Cloud);
    }

    #[tokio::test]
    async fn test_expired_token_is_rejected() {
        let token = Token::new("pat").with_expiry(Utc::now() - Duration::minutes(5));
        let factory = BitbucketApiFactory::new(
            HostConfig::for_host("bitbucket.org"),
            Arc::new(StaticTokenProvider::new(token)),
        );
        let err = factory.create(&User::new("42")).await.err().unwrap();
        assert!(matches!(err, FactoryError::Credentials(CredentialError::Expired { .. })));
    }
}
