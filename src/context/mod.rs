//
//  bitbucket-context
//  context/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Workspace Context Module
//!
//! Turns a URL copied from the Bitbucket web UI (a branch view, a file, a
//! commit) into a [`WorkspaceContext`]: which repository to clone, which
//! ref and revision to check out, and which path to open.
//!
//! ## Architecture
//!
//! Leaf first:
//!
//! - [`repository`](to_repository): maps Cloud and Server records onto one
//!   [`Repository`] model, including a bounded walk up the fork chain
//! - [`url`](parse_url): splits a context URL into [`UrlParts`], honouring
//!   hosts mounted under a sub-path, and derives [`NavigatorHints`]
//! - [`ContextResolver`]: fetches the repository, fills in the default
//!   branch, the tip revision and the file/directory flag
//!
//! Data flows `URL -> UrlParts -> API calls -> Repository -> WorkspaceContext`.
//! Nothing is cached; every value is built per request.
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use bitbucket_context::api::BitbucketApiFactory;
//! use bitbucket_context::auth::{StaticTokenProvider, Token, User};
//! use bitbucket_context::config::{HostConfig, HostType};
//! use bitbucket_context::context::ContextResolver;
//!
//! # async fn run() -> Result<(), bitbucket_context::context::ContextError> {
//! let tokens = Arc::new(StaticTokenProvider::new(Token::new("pat")));
//! let host = HostConfig::for_host("bb.example.com");
//! let factory = Arc::new(BitbucketApiFactory::new(host, tokens.clone()));
//!
//! let resolver = ContextResolver::new("bb.example.com", HostType::Server, factory, tokens);
//! let context = resolver
//!     .handle(&User::new("42"), "https://bb.example.com/projects/JLDEC/repos/test123")
//!     .await?;
//! println!("{}", context.title);
//! # Ok(())
//! # }
//! ```

mod error;
mod repository;
mod resolver;
mod url;

#[cfg(test)]
mod fakes;

pub use self::url::*;
pub use error::*;
pub use repository::*;
pub use resolver::*;

use serde::{Deserialize, Serialize};

/// The pieces of a context URL.
///
/// `more_segments` and `search_params` are kept verbatim and in order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UrlParts {
    /// The configured host the URL belongs to (may include a sub-path).
    pub host: String,
    /// Workspace (Cloud) or project key (Server/DC).
    pub owner: String,
    /// Repository slug, without a trailing `.git`.
    pub repo_name: String,
    /// Path segments after the repository.
    pub more_segments: Vec<String>,
    /// Query parameters.
    pub search_params: Vec<(String, String)>,
}

impl UrlParts {
    /// Value of the first query parameter named `key`.
    pub fn search_param(&self, key: &str) -> Option<&str> {
        self.search_params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// A repository, independent of the platform that hosts it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Repository {
    /// Host the repository lives on.
    pub host: String,
    /// Workspace (Cloud) or project key (Server/DC).
    pub owner: String,
    /// Repository name.
    pub name: String,
    /// Absolute HTTP(S) clone URL.
    pub clone_url: String,
    /// Whether the repository requires authentication to read.
    pub private: bool,
    /// The default branch.
    pub default_branch: String,
    /// Fork ancestry, if this repository is a fork.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fork: Option<Fork>,
}

impl Repository {
    /// `owner/name`.
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }

    /// Number of fork ancestors attached to this repository.
    pub fn fork_depth(&self) -> usize {
        let mut depth = 0;
        let mut current = self;
        while let Some(fork) = &current.fork {
            depth += 1;
            current = &fork.parent;
        }
        depth
    }
}

/// The upstream a repository was forked from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fork {
    /// The parent repository.
    pub parent: Box<Repository>,
}

/// What kind of thing `ref` names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RefType {
    /// A branch name.
    Branch,
    /// A tag name.
    Tag,
    /// A commit hash.
    Revision,
}

impl std::fmt::Display for RefType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Branch => write!(f, "branch"),
            Self::Tag => write!(f, "tag"),
            Self::Revision => write!(f, "revision"),
        }
    }
}

/// Partial navigator information taken from the URL before any API call.
///
/// Every field left unset is filled in by the resolver.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigatorHints {
    /// Branch or tag name.
    #[serde(rename = "ref", skip_serializing_if = "Option::is_none")]
    pub git_ref: Option<String>,
    /// Kind of `git_ref`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ref_type: Option<RefType>,
    /// Commit hash.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revision: Option<String>,
    /// Path inside the repository.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// Whether `path` is a file.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_file: Option<bool>,
}

/// The resolved location inside a repository, ready for provisioning a
/// workspace.
///
/// When `ref_type` is `None` the repository has no commits on the requested
/// ref: `git_ref` is `None` and `revision` is empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceContext {
    /// `"<owner>/<repo> - <ref or revision>[:<path>]"`.
    pub title: String,
    /// The repository to clone.
    pub repository: Repository,
    /// Branch or tag to check out.
    #[serde(rename = "ref", default, skip_serializing_if = "Option::is_none")]
    pub git_ref: Option<String>,
    /// Kind of `git_ref`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ref_type: Option<RefType>,
    /// Commit to check out; empty for an empty repository.
    pub revision: String,
    /// Path to open; empty for the repository root.
    pub path: String,
    /// Whether `path` names a file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_file: Option<bool>,
}
