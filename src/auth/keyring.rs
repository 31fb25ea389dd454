//
//  bitbucket-context
//  auth/keyring.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Secure Token Storage
//!
//! Tokens are kept in the platform's native keyring:
//!
//! - **macOS**: Keychain Services
//! - **Linux**: Secret Service API (GNOME Keyring, KWallet)
//! - **Windows**: Windows Credential Manager
//!
//! ## Storage Model
//!
//! - **Service**: `bitbucket-context`
//! - **Key**: `<user>@<host>`
//! - **Value**: the [`Token`] serialized as JSON. A plain string is also
//!   accepted and read as a bare token value.
//!
//! ## Example
//!
//! ```rust,no_run
//! use bitbucket_context::auth::{KeyringStore, Token};
//!
//! let store = KeyringStore::new();
//! store.store("alice", "bitbucket.org", &Token::new("app-password"))?;
//!
//! if let Some(token) = store.get("alice", "bitbucket.org")? {
//!     println!("found token for {:?}", token.username);
//! }
//! # Ok::<(), bitbucket_context::auth::CredentialError>(())
//! ```

use async_trait::async_trait;
use keyring::Entry;
use tracing::debug;

use super::token::{check_token, CredentialError, Token, TokenProvider, User};

/// The service name used to identify this application in the system keyring.
const SERVICE_NAME: &str = "bitbucket-context";

/// Token storage backed by the system keyring.
///
/// # Notes
///
/// - The keyring may require user interaction (password, biometrics) on first access.
/// - On Linux, a secret service daemon (GNOME Keyring, KWallet) must be running.
pub struct KeyringStore {
    service: String,
}

impl Default for KeyringStore {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyringStore {
    /// Creates a store using the `bitbucket-context` service name.
    pub fn new() -> Self {
        Self {
            service: SERVICE_NAME.to_string(),
        }
    }

    /// Keyring entry key for a user on a host.
    ///
    /// ```rust
    /// use bitbucket_context::auth::KeyringStore;
    ///
    /// assert_eq!(KeyringStore::entry_key("alice", "bitbucket.org"), "alice@bitbucket.org");
    /// ```
    pub fn entry_key(user: &str, host: &str) -> String {
        format!("{}@{}", user, host)
    }

    fn entry(&self, user: &str, host: &str) -> Result<Entry, CredentialError> {
        Entry::new(&self.service, &Self::entry_key(user, host)).map_err(store_error)
    }

    /// Stores (or replaces) the token for `user` on `host`.
    pub fn store(&self, user: &str, host: &str, token: &Token) -> Result<(), CredentialError> {
        let serialized =
            serde_json::to_string(token).map_err(|e| CredentialError::Store(e.to_string()))?;
        self.entry(user, host)?
            .set_password(&serialized)
            .map_err(store_error)
    }

    /// Retrieves the token for `user` on `host`, if one is stored.
    pub fn get(&self, user: &str, host: &str) -> Result<Option<Token>, CredentialError> {
        match self.entry(user, host)?.get_password() {
            Ok(secret) => Ok(Some(decode_token(&secret))),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(store_error(e)),
        }
    }

    /// Deletes the token for `user` on `host`. Deleting a missing entry is not an error.
    pub fn delete(&self, user: &str, host: &str) -> Result<(), CredentialError> {
        match self.entry(user, host)?.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(store_error(e)),
        }
    }
}

fn store_error(e: keyring::Error) -> CredentialError {
    CredentialError::Store(e.to_string())
}

/// Reads a stored secret: JSON [`Token`] first, bare token value otherwise.
fn decode_token(secret: &str) -> Token {
    serde_json::from_str(secret).unwrap_or_else(|_| Token::new(secret.trim()))
}

/// A [`TokenProvider`] that reads tokens from the system keyring.
pub struct KeyringTokenProvider {
    store: KeyringStore,
    host: String,
}

impl KeyringTokenProvider {
    /// Creates a provider for tokens stored for `host`.
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            store: KeyringStore::new(),
            host: host.into(),
        }
    }

    fn lookup(&self, user: &User) -> Result<Token, CredentialError> {
        debug!(user_id = %user.id, host = %self.host, "reading token from keyring");
        self.store
            .get(&user.id, &self.host)?
            .ok_or_else(|| CredentialError::Missing {
                user: user.id.clone(),
                host: self.host.clone(),
            })
    }
}

#[async_trait]
impl TokenProvider for KeyringTokenProvider {
    async fn get_token_with_scopes(
        &self,
        user: &User,
        scopes: &[String],
    ) -> Result<Token, CredentialError> {
        let token = self.lookup(user)?;
        check_token(token, user, scopes)
    }

    async fn get_current_token(&self, user: &User) -> Result<Token, CredentialError> {
        self.lookup(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_key() {
        assert_eq!(
            KeyringStore::entry_key("42", "bb.example.com/bitbucket"),
            "42@bb.example.com/bitbucket"
        );
    }

    #[test]
    fn test_decode_token_json() {
        let token = decode_token(r#"{"value": "abc", "username": "alice"}"#);
        assert_eq!(token.value(), "abc");
        assert_eq!(token.username.as_deref(), Some("alice"));
    }

    #[test]
    fn test_decode_token_plain_string() {
        let token = decode_token("plain-token\n");
        assert_eq!(token.value(), "plain-token");
        assert!(token.username.is_none());
    }
}
