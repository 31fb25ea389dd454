//
//  bitbucket-context
//  context/error.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Errors produced while resolving a context URL.

use thiserror::Error;

use crate::api::{ApiError, FactoryError};
use crate::auth::{CredentialError, Token, User};
use crate::exit_codes;

/// Failure to resolve a context URL.
///
/// Errors are never retried; they propagate to the caller unchanged.
#[derive(Error, Debug)]
pub enum ContextError {
    /// The URL is not an absolute URL or lacks an owner or repository.
    #[error("Malformed context URL {url}: {reason}")]
    MalformedUrl {
        /// The offending URL.
        url: String,
        /// What is wrong with it.
        reason: String,
    },

    /// The repository does not exist or the user cannot see it.
    ///
    /// Carries the user's current token so a caller can decide whether to
    /// ask for more permissions. The token never appears in `Display`.
    #[error("Repository {owner}/{repo_name} not found on {host}")]
    NotFound {
        /// The user's current token, if one could be read.
        token: Option<Token>,
        /// The requesting user.
        user: User,
        /// The host that was asked.
        host: String,
        /// Workspace or project key from the URL.
        owner: String,
        /// Repository name from the URL.
        repo_name: String,
    },

    /// The hosting API failed.
    #[error("Bitbucket API error: {0}")]
    Upstream(#[from] ApiError),

    /// The normalizer was handed no record, or one it cannot interpret.
    #[error("Unknown repository.")]
    UnknownRepository,

    /// A repository record lacks a usable clone URL.
    #[error("Invalid clone URL for {repository}: {reason}")]
    InvalidCloneUrl {
        /// `owner/name` of the repository.
        repository: String,
        /// What is wrong with the URL.
        reason: String,
    },

    /// No usable token for the user.
    #[error(transparent)]
    Credentials(#[from] CredentialError),
}

impl From<FactoryError> for ContextError {
    fn from(e: FactoryError) -> Self {
        match e {
            FactoryError::Credentials(e) => Self::Credentials(e),
            FactoryError::Client(e) => Self::Upstream(e),
        }
    }
}

impl ContextError {
    /// Process exit code for this error.
    ///
    /// ```rust
    /// use bitbucket_context::api::ApiError;
    /// use bitbucket_context::context::ContextError;
    /// use bitbucket_context::exit_codes;
    ///
    /// assert_eq!(ContextError::Upstream(ApiError::RateLimited).exit_code(), exit_codes::RATE_LIMIT);
    /// assert_eq!(ContextError::UnknownRepository.exit_code(), exit_codes::ERROR);
    /// ```
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::MalformedUrl { .. } => exit_codes::USAGE,
            Self::NotFound { .. } => exit_codes::NOT_FOUND,
            Self::Credentials(_) => exit_codes::AUTH_ERROR,
            Self::Upstream(ApiError::RateLimited) => exit_codes::RATE_LIMIT,
            Self::Upstream(ApiError::NotFound(_)) => exit_codes::NOT_FOUND,
            Self::Upstream(e) if e.is_auth_error() => exit_codes::AUTH_ERROR,
            _ => exit_codes::ERROR,
        }
    }

    pub(crate) fn malformed(url: &str, reason: impl Into<String>) -> Self {
        Self::MalformedUrl {
            url: url.to_string(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_display_omits_token() {
        let err = ContextError::NotFound {
            token: Some(Token::new("very-secret")),
            user: User::new("42"),
            host: "bb.example.com".to_string(),
            owner: "JLDEC".to_string(),
            repo_name: "test123".to_string(),
        };
        let rendered = err.to_string();
        assert_eq!(rendered, "Repository JLDEC/test123 not found on bb.example.com");
        assert!(!format!("{:?}", err).contains("very-secret"));
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(
            ContextError::malformed("nope", "relative URL").exit_code(),
            exit_codes::USAGE
        );
        assert_eq!(
            ContextError::Upstream(ApiError::AuthFailed("bad token".into())).exit_code(),
            exit_codes::AUTH_ERROR
        );
        assert_eq!(
            ContextError::Credentials(CredentialError::Expired { user: "42".into() }).exit_code(),
            exit_codes::AUTH_ERROR
        );
        assert_eq!(
            ContextError::Upstream(ApiError::ServerError("boom".into())).exit_code(),
            exit_codes::ERROR
        );
    }

    #[test]
    fn test_factory_error_conversion() {
        let err: ContextError = FactoryError::Client(ApiError::RateLimited).into();
        assert!(matches!(err, ContextError::Upstream(ApiError::RateLimited)));
    }
}
