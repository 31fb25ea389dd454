//
//  bitbucket-context
//  cli/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! CLI command definitions using clap derive macros

mod auth;
mod parse;
mod resolve;

pub use auth::AuthCommand;
pub use parse::ParseCommand;
pub use resolve::ResolveCommand;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use url::Url;

use crate::config::{normalize_host, Config, HostConfig, HostType, BITBUCKET_CLOUD};
use crate::context::ContextError;
use crate::output::{OutputFormat, OutputWriter};

/// Bitbucket context resolver - turn a Bitbucket URL into a workspace context
#[derive(Parser, Debug)]
#[command(
    name = "bbctx",
    version,
    about = "Turn a Bitbucket URL into a workspace context",
    long_about = "bbctx resolves URLs copied from Bitbucket Cloud or Server/Data Center \
                  into the repository, ref, revision and path to check out.",
    propagate_version = true,
    after_help = "Use 'bbctx <command> --help' for more information about a command."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalOptions,
}

/// Global options available to all commands
#[derive(Parser, Debug, Clone, Default)]
pub struct GlobalOptions {
    /// Bitbucket host, optionally with a sub-path (bb.example.com/bitbucket)
    #[arg(long, global = true, env = "BBCTX_HOST")]
    pub host: Option<String>,

    /// Platform flavor of the host
    #[arg(long, global = true, value_enum, env = "BBCTX_FLAVOR")]
    pub flavor: Option<HostType>,

    /// User id the request is made for
    #[arg(long, global = true, env = "BBCTX_USER", default_value = "default")]
    pub user: String,

    /// Access token (otherwise read from the system keyring)
    #[arg(long, global = true, env = "BBCTX_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Configuration file to use instead of the default location
    #[arg(long, global = true, env = "BBCTX_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output format as JSON
    #[arg(long, global = true)]
    pub json: bool,
}

impl GlobalOptions {
    /// Output writer for the selected format.
    pub fn output(&self) -> OutputWriter {
        OutputWriter::new(if self.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        })
    }

    /// Loads `--config`, or the default configuration file.
    pub fn load_config(&self) -> Result<Config> {
        match &self.config {
            Some(path) => Config::load_from(path),
            None => Config::load(),
        }
    }

    /// Host settings for a command that has no URL to go by.
    ///
    /// `--host`, then the configured `default_host`, then Bitbucket Cloud.
    pub fn default_host_config(&self, config: &Config) -> HostConfig {
        let host = self
            .host
            .clone()
            .or_else(|| config.resolver.default_host.clone())
            .unwrap_or_else(|| BITBUCKET_CLOUD.to_string());
        self.apply_flavor(config.host_config(&host))
    }

    /// Host settings for `context_url`.
    ///
    /// `--host` wins; otherwise the host is picked from the URL.
    pub fn host_config_for_url(&self, config: &Config, context_url: &str) -> Result<HostConfig> {
        let host = match &self.host {
            Some(host) => normalize_host(host),
            None => {
                let url = Url::parse(context_url)
                    .map_err(|e| ContextError::malformed(context_url, e.to_string()))?;
                config.host_for_url(&url)
            }
        };
        Ok(self.apply_flavor(config.host_config(&host)))
    }

    fn apply_flavor(&self, mut host: HostConfig) -> HostConfig {
        if let Some(flavor) = self.flavor {
            host.flavor = Some(flavor);
        }
        host
    }
}

/// Top-level commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Resolve a URL into a workspace context
    Resolve(ResolveCommand),

    /// Split a URL into its parts without contacting Bitbucket
    Parse(ParseCommand),

    /// Manage tokens stored in the system keyring
    Auth(AuthCommand),

    /// Print version information
    Version,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).unwrap()
    }

    #[test]
    fn test_global_options_after_subcommand() {
        let cli = parse(&[
            "bbctx",
            "parse",
            "https://bb.example.com/projects/P/repos/r",
            "--host",
            "bb.example.com",
            "--flavor",
            "server",
            "--json",
        ]);
        assert_eq!(cli.global.host.as_deref(), Some("bb.example.com"));
        assert_eq!(cli.global.flavor, Some(HostType::Server));
        assert!(cli.global.json);
        assert!(matches!(cli.command, Commands::Parse(_)));
    }

    #[test]
    fn test_host_from_url_when_no_flag() {
        let global = GlobalOptions::default();
        let config = Config::default();
        let host = global
            .host_config_for_url(&config, "https://bitbucket.org/alice/proj")
            .unwrap();
        assert_eq!(host.host, "bitbucket.org");
        assert_eq!(host.host_type(), HostType::Cloud);
    }

    #[test]
    fn test_flag_overrides_url_and_flavor() {
        let global = GlobalOptions {
            host: Some("https://Example.com/bitbucket/".to_string()),
            flavor: Some(HostType::Server),
            ..Default::default()
        };
        let host = global
            .host_config_for_url(&Config::default(), "not a url")
            .unwrap();
        assert_eq!(host.host, "example.com/bitbucket");
        assert_eq!(host.host_type(), HostType::Server);
    }

    #[test]
    fn test_unparseable_url_is_malformed() {
        let err = GlobalOptions::default()
            .host_config_for_url(&Config::default(), "not a url")
            .unwrap_err();
        let err = err.downcast_ref::<ContextError>().unwrap();
        assert!(matches!(err, ContextError::MalformedUrl { .. }));
    }

    #[test]
    fn test_default_host_config() {
        let mut config = Config::default();
        assert_eq!(
            GlobalOptions::default().default_host_config(&config).host,
            "bitbucket.org"
        );

        config.resolver.default_host = Some("bb.example.com".to_string());
        let host = GlobalOptions::default().default_host_config(&config);
        assert_eq!(host.host, "bb.example.com");
        assert_eq!(host.host_type(), HostType::Server);
    }
}
