//
//  bitbucket-context
//  api/server/repositories.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Bitbucket Server/DC Repository API
//!
//! Types for repositories in Bitbucket Server/Data Center. A repository
//! always belongs to exactly one project and is addressed by the project key
//! and its slug:
//!
//! ```text
//! GET /rest/api/1.0/projects/{projectKey}/repos/{repositorySlug}
//! GET /rest/api/1.0/projects/{projectKey}/repos/{repositorySlug}/branches/default
//! ```
//!
//! Only `project.key` is required on the wire; everything else defaults so
//! that partial records (older servers, restricted permissions) still load.

use serde::{Deserialize, Serialize};

/// Name of the clone link used for the canonical clone URL.
pub const HTTP_CLONE_LINK: &str = "http";

/// A Bitbucket Server/DC repository.
///
/// # Example
///
/// ```rust
/// use bitbucket_context::api::server::Repository;
///
/// let json = r#"{
///     "project": {"key": "JLDEC"},
///     "name": "test123",
///     "public": false,
///     "links": {"clone": [
///         {"name": "ssh", "href": "ssh://git@bb.example.com:7999/jldec/test123.git"},
///         {"name": "http", "href": "https://bb.example.com/scm/jldec/test123.git"}
///     ]}
/// }"#;
/// let repo: Repository = serde_json::from_str(json).unwrap();
/// assert_eq!(repo.project.key, "JLDEC");
/// assert_eq!(repo.http_clone_url(), Some("https://bb.example.com/scm/jldec/test123.git"));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Repository {
    /// Numeric repository ID.
    #[serde(default)]
    pub id: Option<u64>,

    /// URL-friendly identifier, unique within the project.
    #[serde(default)]
    pub slug: String,

    /// Display name.
    #[serde(default)]
    pub name: String,

    /// Owning project.
    pub project: ProjectRef,

    /// Whether the repository is readable without authentication.
    #[serde(rename = "public", default)]
    pub is_public: bool,

    /// Hypermedia links.
    #[serde(default)]
    pub links: RepositoryLinks,
}

impl Repository {
    /// `href` of the clone link named `http`, if present.
    pub fn http_clone_url(&self) -> Option<&str> {
        self.links
            .clone
            .iter()
            .find(|link| link.name == HTTP_CLONE_LINK)
            .map(|link| link.href.as_str())
    }
}

/// Reference to the project owning a repository.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectRef {
    /// Short uppercase project key (e.g. `JLDEC`).
    pub key: String,

    /// Numeric project ID.
    #[serde(default)]
    pub id: Option<u64>,

    /// Display name.
    #[serde(default)]
    pub name: Option<String>,
}

/// Links attached to a repository.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RepositoryLinks {
    /// Clone URLs, one per protocol (`http`, `ssh`).
    #[serde(default)]
    pub clone: Vec<CloneLink>,
}

/// A clone URL for one protocol.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CloneLink {
    /// The clone URL.
    pub href: String,

    /// Protocol name (`http` or `ssh`).
    pub name: String,
}

/// A branch as returned by the default-branch endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Branch {
    /// Fully qualified ref, e.g. `refs/heads/main`.
    #[serde(default)]
    pub id: String,

    /// Short branch name, e.g. `main`.
    #[serde(rename = "displayId")]
    pub display_id: String,

    /// Tip commit of the branch.
    #[serde(rename = "latestCommit", default)]
    pub latest_commit: Option<String>,

    /// Whether this is the default branch.
    #[serde(rename = "isDefault", default)]
    pub is_default: bool,
}
