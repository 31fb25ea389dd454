//
//  bitbucket-context
//  config/hosts.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Host Configuration
//!
//! Per-host settings and helpers for telling Bitbucket Cloud and Bitbucket
//! Server/Data Center apart.
//!
//! | Feature | Cloud | Server/DC |
//! |---------|-------|-----------|
//! | Hostname | `bitbucket.org` | Custom, optionally with a sub-path |
//! | API Base | `api.bitbucket.org/2.0` | `<host>/rest/api/1.0` |
//! | Owner | Workspace | Project key |
//! | Default branch | `mainbranch` on the repository | Separate endpoint |
//!
//! ## Usage
//!
//! ```rust
//! use bitbucket_context::config::{is_cloud_host, normalize_host, HostConfig, HostType};
//!
//! assert!(is_cloud_host("bitbucket.org"));
//! assert!(!is_cloud_host("bitbucket.company.com"));
//!
//! assert_eq!(normalize_host("https://BB.Example.com/bitbucket/"), "bb.example.com/bitbucket");
//!
//! let config = HostConfig::for_host("bb.example.com/bitbucket");
//! assert_eq!(config.host_type(), HostType::Server);
//! ```

use serde::{Deserialize, Serialize};

use crate::auth::AuthScheme;

/// The primary hostname for Bitbucket Cloud.
pub const BITBUCKET_CLOUD: &str = "bitbucket.org";

/// The API hostname for Bitbucket Cloud.
pub const BITBUCKET_API: &str = "api.bitbucket.org";

/// The Bitbucket platform flavor a host runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum HostType {
    /// Bitbucket Cloud (API 2.0).
    Cloud,
    /// Bitbucket Server/Data Center (API 1.0).
    Server,
}

impl std::fmt::Display for HostType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cloud => write!(f, "cloud"),
            Self::Server => write!(f, "server"),
        }
    }
}

/// Settings for one Bitbucket host.
///
/// ```toml
/// [hosts."bb.example.com/bitbucket"]
/// flavor = "server"
/// auth = "basic"
/// lookup_default_branch = true
/// timeout_secs = 30
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct HostConfig {
    /// Host, possibly with a sub-path (`bb.example.com/bitbucket`).
    /// Filled from the table key when omitted.
    #[serde(default)]
    pub host: String,

    /// Platform flavor. Inferred from the hostname when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flavor: Option<HostType>,

    /// How the token is presented to the host.
    #[serde(default)]
    pub auth: AuthScheme,

    /// Ask a Server/DC host for the repository's real default branch
    /// instead of assuming `master`.
    #[serde(default)]
    pub lookup_default_branch: bool,

    /// Explicit API root, overriding the platform default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_base: Option<String>,

    /// Request timeout in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

impl HostConfig {
    /// Default settings for `host`, with the flavor inferred from the name.
    pub fn for_host(host: &str) -> Self {
        Self {
            host: normalize_host(host),
            ..Default::default()
        }
    }

    /// The effective platform flavor.
    ///
    /// An explicit `flavor` wins; otherwise `bitbucket.org` is Cloud and
    /// every other host is Server/DC.
    pub fn host_type(&self) -> HostType {
        self.flavor.unwrap_or_else(|| {
            if is_cloud_host(&self.host) {
                HostType::Cloud
            } else {
                HostType::Server
            }
        })
    }
}

/// Checks if a host is Bitbucket Cloud.
pub fn is_cloud_host(host: &str) -> bool {
    let host = normalize_host(host);
    host == BITBUCKET_CLOUD || host == BITBUCKET_API
}

/// Normalizes a host for storage and lookup.
///
/// Strips the scheme and trailing slashes, trims whitespace and lowercases
/// the authority. A sub-path is kept as written.
pub fn normalize_host(host: &str) -> String {
    let host = host.trim();
    let host = host.strip_prefix("https://").unwrap_or(host);
    let host = host.strip_prefix("http://").unwrap_or(host);
    let host = host.trim_end_matches('/');
    match host.split_once('/') {
        Some((authority, sub_path)) => format!("{}/{}", authority.to_lowercase(), sub_path),
        None => host.to_lowercase(),
    }
}
