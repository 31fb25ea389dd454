//
//  bitbucket-context
//  auth/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Authentication Module
//!
//! Credential plumbing between the user who asked for a context and the
//! Bitbucket API client that serves it.
//!
//! ## Module Structure
//!
//! - [`token`]: [`User`], [`Token`] and the [`TokenProvider`] contract
//! - [`keyring`]: Token storage in the system keyring
//!
//! The resolver only ever asks a [`TokenProvider`] for tokens; acquiring or
//! refreshing them (OAuth flows, PAT creation) happens elsewhere.
//!
//! ## Example
//!
//! ```rust
//! use bitbucket_context::auth::{AuthCredential, AuthScheme, Token};
//!
//! let token = Token::new("NjM0NTY3ODkw");
//! let credential = AuthCredential::from_token(&token, AuthScheme::Bearer);
//! assert!(matches!(credential, AuthCredential::Bearer { .. }));
//! ```

mod keyring;
mod token;

pub use keyring::*;
pub use token::*;

use reqwest::RequestBuilder;
use serde::{Deserialize, Serialize};

/// Username sent with basic authentication when the token carries none.
pub const ANONYMOUS_BASIC_USER: &str = "nobody";

/// How a token is presented to the Bitbucket instance.
///
/// Bitbucket Cloud and most Server/DC installations accept bearer tokens.
/// Some Server/DC deployments only accept the token as the password of an
/// HTTP basic login.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthScheme {
    /// `Authorization: Bearer <token>`
    #[default]
    Bearer,
    /// `Authorization: Basic <username:token>`
    Basic,
}

/// Authentication credentials applied to outgoing API requests.
///
/// `Debug` output never includes the secret.
#[derive(Clone)]
pub enum AuthCredential {
    /// Bearer token authentication (OAuth access token or PAT).
    Bearer {
        /// The token value.
        token: String,
    },
    /// HTTP basic authentication.
    Basic {
        /// The username for authentication.
        username: String,
        /// The password (or token used as password).
        password: String,
    },
}

impl AuthCredential {
    /// Creates a bearer credential.
    pub fn bearer(token: impl Into<String>) -> Self {
        Self::Bearer {
            token: token.into(),
        }
    }

    /// Creates a basic credential.
    pub fn basic(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self::Basic {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Builds the credential for `token` according to the host's scheme.
    ///
    /// For [`AuthScheme::Basic`] the token's username is used, falling back
    /// to [`ANONYMOUS_BASIC_USER`].
    pub fn from_token(token: &Token, scheme: AuthScheme) -> Self {
        match scheme {
            AuthScheme::Bearer => Self::bearer(token.value()),
            AuthScheme::Basic => Self::basic(
                token
                    .username
                    .clone()
                    .unwrap_or_else(|| ANONYMOUS_BASIC_USER.to_string()),
                token.value(),
            ),
        }
    }

    /// Applies the authentication credential to an HTTP request.
    pub fn apply_to_request(&self, request: RequestBuilder) -> RequestBuilder {
        match self {
            Self::Bearer { token } => request.bearer_auth(token),
            Self::Basic { username, password } => request.basic_auth(username, Some(password)),
        }
    }
}

impl std::fmt::Debug for AuthCredential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bearer { .. } => f.debug_struct("Bearer").field("token", &"***").finish(),
            Self::Basic { username, .. } => f
                .debug_struct("Basic")
                .field("username", username)
                .field("password", &"***")
                .finish(),
        }
    }
}
