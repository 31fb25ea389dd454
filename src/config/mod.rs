//
//  bitbucket-context
//  config/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Configuration Module
//!
//! Loads resolver and per-host settings from a TOML file stored in the
//! platform-specific configuration directory.
//!
//! ## Configuration File Location
//!
//! - **Linux**: `~/.config/bbctx/config.toml`
//! - **macOS**: `~/Library/Application Support/bbctx/config.toml`
//! - **Windows**: `C:\Users\<User>\AppData\Roaming\bbctx\config.toml`
//!
//! A missing file is not an error; every setting has a default.
//!
//! ## Example Configuration File
//!
//! ```toml
//! [resolver]
//! max_fork_depth = 1
//!
//! [hosts."bitbucket.org"]
//! flavor = "cloud"
//!
//! [hosts."bb.example.com/bitbucket"]
//! flavor = "server"
//! auth = "basic"
//! lookup_default_branch = true
//! timeout_secs = 30
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use bitbucket_context::config::{Config, HostType};
//!
//! let config = Config::load()?;
//! let host = config.host_config("bb.example.com/bitbucket");
//! assert_eq!(host.host_type(), HostType::Server);
//! # Ok::<(), anyhow::Error>(())
//! ```

mod hosts;

pub use hosts::*;

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use url::Url;

/// Number of fork ancestors fetched when none is configured.
pub const DEFAULT_MAX_FORK_DEPTH: u32 = 1;

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Resolver behaviour.
    #[serde(default)]
    pub resolver: ResolverConfig,

    /// Per-host settings keyed by host (optionally with a sub-path).
    #[serde(default)]
    pub hosts: HashMap<String, HostConfig>,
}

/// Settings of the context resolver.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolverConfig {
    /// How many fork ancestors are fetched and normalized.
    #[serde(default = "default_max_fork_depth")]
    pub max_fork_depth: u32,

    /// Host used when neither `--host` nor `BBCTX_HOST` is given and no
    /// configured host matches the URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_host: Option<String>,
}

fn default_max_fork_depth() -> u32 {
    DEFAULT_MAX_FORK_DEPTH
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            max_fork_depth: DEFAULT_MAX_FORK_DEPTH,
            default_host: None,
        }
    }
}

impl Config {
    /// Loads the configuration from the default location.
    ///
    /// # Errors
    ///
    /// Fails if the configuration directory cannot be determined, or the
    /// file exists but cannot be read or parsed.
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        Self::load_from(&path)
    }

    /// Loads the configuration from `path`, falling back to defaults when
    /// the file does not exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        Ok(config)
    }

    /// Returns the path of the configuration file.
    pub fn config_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("", "", "bbctx")
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Returns the effective settings for `host`.
    ///
    /// Table keys are compared after [`normalize_host`]. Unknown hosts get
    /// [`HostConfig::for_host`] defaults.
    pub fn host_config(&self, host: &str) -> HostConfig {
        let host = normalize_host(host);
        self.hosts
            .iter()
            .find(|(key, _)| normalize_host(key) == host)
            .map(|(_, config)| HostConfig {
                host: host.clone(),
                ..config.clone()
            })
            .unwrap_or_else(|| HostConfig::for_host(&host))
    }

    /// Picks the host a context URL belongs to.
    ///
    /// The longest configured host that prefixes the URL's
    /// `authority/path` wins, so a Server mounted under a sub-path is found.
    /// Otherwise the configured `default_host`, and finally the URL's
    /// authority.
    ///
    /// ```rust
    /// use bitbucket_context::config::{Config, HostConfig};
    /// use url::Url;
    ///
    /// let mut config = Config::default();
    /// config.hosts.insert("example.com/bitbucket".into(), HostConfig::default());
    ///
    /// let url = Url::parse("https://example.com/bitbucket/projects/P/repos/r").unwrap();
    /// assert_eq!(config.host_for_url(&url), "example.com/bitbucket");
    ///
    /// let url = Url::parse("https://bitbucket.org/alice/proj").unwrap();
    /// assert_eq!(config.host_for_url(&url), "bitbucket.org");
    /// ```
    pub fn host_for_url(&self, url: &Url) -> String {
        let authority = match (url.host_str(), url.port()) {
            (Some(host), Some(port)) => format!("{}:{}", host, port),
            (Some(host), None) => host.to_string(),
            (None, _) => String::new(),
        };
        let candidate = normalize_host(&format!("{}{}", authority, url.path()));

        let configured = self
            .hosts
            .keys()
            .map(|key| normalize_host(key))
            .filter(|key| candidate == *key || candidate.starts_with(&format!("{}/", key)))
            .max_by_key(String::len);

        configured
            .or_else(|| self.resolver.default_host.as_deref().map(normalize_host))
            .unwrap_or_else(|| normalize_host(&authority))
    }
}
