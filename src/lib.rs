//
//  bitbucket-context
//  lib.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Bitbucket Context Library
//!
//! Resolves URLs copied from the Bitbucket web UI into workspace contexts:
//! the repository to clone, the ref and revision to check out, and the path
//! to open.
//!
//! ## Overview
//!
//! Both Bitbucket Cloud and Bitbucket Server/Data Center URLs are
//! understood, including Server instances mounted under a sub-path
//! (`https://example.com/bitbucket/projects/...`). Repositories from either
//! platform are normalized into one model, and forks carry a bounded chain
//! of their upstream repositories.
//!
//! ## Module Structure
//!
//! - [`cli`]: Command-line interface definitions using clap
//! - [`api`]: HTTP clients for Bitbucket Cloud and Server/DC APIs
//! - [`auth`]: Tokens, credentials and keychain storage
//! - [`config`]: Configuration file management
//! - [`context`]: URL parsing and context resolution
//! - [`output`]: Output formatting (Text, JSON)
//!
//! ## Example Usage
//!
//! ```rust
//! use bitbucket_context::config::HostType;
//! use bitbucket_context::context::{navigator_hints, parse_url};
//!
//! let parts = parse_url(
//!     HostType::Cloud,
//!     "bitbucket.org",
//!     "https://bitbucket.org/alice/proj/src/main/README.md",
//! )
//! .unwrap();
//! assert_eq!(parts.owner, "alice");
//!
//! let hints = navigator_hints(HostType::Cloud, &parts);
//! assert_eq!(hints.path.as_deref(), Some("README.md"));
//! ```
//!
//! ## Platform Differences
//!
//! | Feature | Cloud | Server/DC |
//! |---------|-------|-----------|
//! | Owner | Workspace | Project key |
//! | Fork parents | Yes | No |
//! | Default branch | Reported | Assumed `master` unless looked up |
//! | Sub-path hosting | No | Yes |

/// Command-line interface definitions.
///
/// Contains all CLI commands, arguments, and subcommands defined using the clap derive API.
pub mod cli;

/// API client implementations for Bitbucket platforms.
///
/// This module provides HTTP clients for interacting with:
/// - Bitbucket Cloud API v2.0
/// - Bitbucket Server/Data Center API v1.0
///
/// The clients handle authentication, request building, pagination, and error handling.
pub mod api;

/// Authentication and credential management.
pub mod auth;

/// Configuration file management.
///
/// Manages the configuration stored in platform-specific locations:
/// - Linux: `~/.config/bbctx/config.toml`
/// - macOS: `~/Library/Application Support/bbctx/config.toml`
/// - Windows: `%APPDATA%\bbctx\config\config.toml`
pub mod config;

/// URL parsing and workspace context resolution.
pub mod context;

/// Output formatting for people and scripts.
pub mod output;

/// Re-export of the main CLI struct for convenient access.
///
/// # Example
///
/// ```rust,no_run
/// use clap::Parser;
/// use bitbucket_context::Cli;
///
/// let cli = Cli::parse();
/// ```
pub use cli::Cli;

/// Re-export of the configuration struct.
pub use config::Config;

/// Re-export of the resolver and its result.
pub use context::{ContextResolver, WorkspaceContext};

/// Application name constant.
///
/// The name of the CLI binary, used for display purposes and configuration paths.
pub const APP_NAME: &str = "bbctx";

/// Application version constant.
///
/// ```rust
/// use bitbucket_context::VERSION;
///
/// println!("bbctx version {}", VERSION);
/// ```
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Exit codes for the CLI.
///
/// Standardized exit codes following Unix conventions, allowing scripts
/// to programmatically detect the outcome of CLI operations.
///
/// # Exit Code Ranges
///
/// - `0`: Success
/// - `1-3`: General errors and usage issues
/// - `4-7`: Authentication-related issues
/// - `8-15`: Resource-related issues
/// - `32+`: External service issues
pub mod exit_codes {
    /// Successful execution.
    pub const SUCCESS: i32 = 0;

    /// General error.
    ///
    /// An unspecified error occurred during execution.
    /// Check stderr for details.
    pub const ERROR: i32 = 1;

    /// Invalid usage or arguments, including malformed context URLs.
    pub const USAGE: i32 = 2;

    /// Authentication required or failed.
    ///
    /// No token is stored for the user, the token has expired, or the
    /// host rejected it. Run `bbctx auth login` to store a token.
    pub const AUTH_ERROR: i32 = 4;

    /// Resource not found.
    ///
    /// The repository does not exist or the user cannot see it.
    pub const NOT_FOUND: i32 = 8;

    /// API rate limit exceeded.
    pub const RATE_LIMIT: i32 = 32;
}
