//
//  bitbucket-context
//  auth/token.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Tokens and Token Providers
//!
//! The resolver needs two things from the credential side:
//!
//! - a token with the scopes required to build an API client
//!   ([`TokenProvider::get_token_with_scopes`]), and
//! - the user's current token to attach to a "repository not found" error,
//!   so an upstream flow can ask the user for more permissions
//!   ([`TokenProvider::get_current_token`]).
//!
//! Token values are never logged. [`Token`]'s `Debug` output redacts them.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The user on whose behalf a context is resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    /// Stable user identifier, used in logs and keyring lookups.
    pub id: String,
    /// Optional display name.
    pub name: Option<String>,
}

impl User {
    /// Creates a user with just an identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: None,
        }
    }
}

impl std::fmt::Display for User {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.name {
            Some(name) => write!(f, "{} ({})", name, self.id),
            None => write!(f, "{}", self.id),
        }
    }
}

/// An access token for a Bitbucket host.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    value: String,

    /// Username the token belongs to, used for basic authentication.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    /// Scopes granted to the token. Empty means "unknown / not restricted".
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub scopes: Vec<String>,

    /// Expiry of the token, if it has one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
}

impl Token {
    /// Creates a token with no username, scopes or expiry.
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            username: None,
            scopes: Vec::new(),
            expires_at: None,
        }
    }

    /// Sets the username.
    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    /// Sets the granted scopes.
    pub fn with_scopes(mut self, scopes: Vec<String>) -> Self {
        self.scopes = scopes;
        self
    }

    /// Sets the expiry.
    pub fn with_expiry(mut self, expires_at: DateTime<Utc>) -> Self {
        self.expires_at = Some(expires_at);
        self
    }

    /// The secret token value.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Whether the token has expired.
    pub fn is_expired(&self) -> bool {
        self.expires_at.is_some_and(|exp| exp < Utc::now())
    }

    /// Whether the token is known to grant every scope in `scopes`.
    ///
    /// A token without recorded scopes is assumed to grant everything.
    pub fn has_scopes(&self, scopes: &[String]) -> bool {
        self.scopes.is_empty() || scopes.iter().all(|s| self.scopes.contains(s))
    }
}

impl std::fmt::Debug for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Token")
            .field("value", &"***")
            .field("username", &self.username)
            .field("scopes", &self.scopes)
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Failures while obtaining a token.
#[derive(Error, Debug)]
pub enum CredentialError {
    /// No token is stored for the user on this host.
    #[error("No token found for {user} on {host}")]
    Missing {
        /// User identifier.
        user: String,
        /// Bitbucket host.
        host: String,
    },

    /// The stored token has expired. Refreshing is left to the caller.
    #[error("Token for {user} has expired")]
    Expired {
        /// User identifier.
        user: String,
    },

    /// The token does not grant the requested scopes.
    #[error("Token for {user} lacks scopes: {scopes}")]
    MissingScopes {
        /// User identifier.
        user: String,
        /// Comma-separated list of the missing scopes.
        scopes: String,
    },

    /// The credential store failed.
    #[error("Credential store error: {0}")]
    Store(String),
}

/// Supplies tokens for users.
#[async_trait]
pub trait TokenProvider: Send + Sync {
    /// Returns a token for `user` that grants every scope in `scopes`.
    async fn get_token_with_scopes(
        &self,
        user: &User,
        scopes: &[String],
    ) -> Result<Token, CredentialError>;

    /// Returns the user's current token regardless of scopes.
    async fn get_current_token(&self, user: &User) -> Result<Token, CredentialError>;
}

/// Checks expiry and scopes of a token handed out for `user`.
pub fn check_token(token: Token, user: &User, scopes: &[String]) -> Result<Token, CredentialError> {
    if token.is_expired() {
        return Err(CredentialError::Expired {
            user: user.id.clone(),
        });
    }

    if !token.has_scopes(scopes) {
        let missing: Vec<&str> = scopes
            .iter()
            .filter(|s| !token.scopes.contains(s))
            .map(String::as_str)
            .collect();
        return Err(CredentialError::MissingScopes {
            user: user.id.clone(),
            scopes: missing.join(", "),
        });
    }

    Ok(token)
}

/// A provider that hands out one fixed token to every user.
///
/// Used when the token comes from a command-line flag or `BBCTX_TOKEN`.
#[derive(Debug, Clone)]
pub struct StaticTokenProvider {
    token: Token,
}

impl StaticTokenProvider {
    /// Creates a provider serving `token`.
    pub fn new(token: Token) -> Self {
        Self { token }
    }
}

#[async_trait]
impl TokenProvider for StaticTokenProvider {
    async fn get_token_with_scopes(
        &self,
        user: &User,
        scopes: &[String],
    ) -> Result<Token, CredentialError> {
        check_token(self.token.clone(), user, scopes)
    }

    async fn get_current_token(&self, _user: &User) -> Result<Token, CredentialError> {
        Ok(self.token.clone())
    }
}

/// Validates the format of a token string.
///
/// A token must be non-empty and must not contain whitespace. This is a
/// format check only; the server decides whether the token is accepted.
///
/// ```rust
/// use bitbucket_context::auth::validate_token;
///
/// assert!(validate_token("NjM0NTY3ODkwMTIzNDU2Nzg5MA=="));
/// assert!(!validate_token(""));
/// assert!(!validate_token("has space"));
/// ```
pub fn validate_token(token: &str) -> bool {
    !token.is_empty() && !token.chars().any(char::is_whitespace)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_debug_redacts_value() {
        let token = Token::new("super-secret").with_username("alice");
        let rendered = format!("{:?}", token);
        assert!(!rendered.contains("super-secret"));
        assert!(rendered.contains("alice"));
    }

    #[test]
    fn test_check_token_rejects_expired() {
        let token = Token::new("t").with_expiry(Utc::now() - Duration::hours(1));
        let err = check_token(token, &User::new("u1"), &[]).unwrap_err();
        assert!(matches!(err, CredentialError::Expired { .. }));
    }

    #[test]
    fn test_check_token_reports_missing_scopes() {
        let token = Token::new("t").with_scopes(vec!["repository".to_string()]);
        let wanted = vec!["repository".to_string(), "pullrequest".to_string()];
        match check_token(token, &User::new("u1"), &wanted).unwrap_err() {
            CredentialError::MissingScopes { scopes, .. } => assert_eq!(scopes, "pullrequest"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_unscoped_token_grants_everything() {
        let token = Token::new("t");
        assert!(token.has_scopes(&["repository".to_string()]));
    }

    #[tokio::test]
    async fn test_static_provider_serves_token() {
        let provider = StaticTokenProvider::new(Token::new("abc"));
        let user = User::new("u1");
        let token = provider.get_token_with_scopes(&user, &[]).await.unwrap();
        assert_eq!(token.value(), "abc");
        let current = provider.get_current_token(&user).await.unwrap();
        assert_eq!(current, token);
    }

    #[test]
    fn test_user_display() {
        let mut user = User::new("42");
        assert_eq!(user.to_string(), "42");
        user.name = Some("Robot Kumquat".to_string());
        assert_eq!(user.to_string(), "Robot Kumquat (42)");
    }
}
