//
//  bitbucket-context
//  api/cloud/repositories.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Cloud repository API types.
//!
//! Only the fields needed to build a workspace context are modelled; every
//! field except `full_name` is optional on the wire.
//!
//! # Notes
//!
//! - The `full_name` field follows the format `{workspace}/{repo_slug}`
//! - `mainbranch` is absent on repositories without any commits
//! - `parent` is only present on forks

use serde::{Deserialize, Serialize};

/// A Bitbucket Cloud repository.
///
/// ```rust
/// use bitbucket_context::api::cloud::Repository;
///
/// let json = r#"{
///     "full_name": "alice/proj",
///     "name": "proj",
///     "is_private": true,
///     "mainbranch": {"name": "main", "type": "branch"},
///     "parent": {"full_name": "upstream/proj"}
/// }"#;
/// let repo: Repository = serde_json::from_str(json).unwrap();
/// assert_eq!(repo.split_full_name(), Some(("alice", "proj")));
/// assert_eq!(repo.parent_full_name(), Some("upstream/proj"));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Repository {
    /// `{workspace}/{repo_slug}`.
    pub full_name: String,

    /// Display name.
    #[serde(default)]
    pub name: String,

    /// Unique identifier in braces, e.g. `{b7c8...}`.
    #[serde(default)]
    pub uuid: Option<String>,

    /// Whether the repository is private.
    #[serde(default)]
    pub is_private: bool,

    /// The main (default) branch.
    #[serde(default)]
    pub mainbranch: Option<Branch>,

    /// The repository this one was forked from.
    #[serde(default)]
    pub parent: Option<ParentRef>,
}

impl Repository {
    /// Splits `full_name` into workspace and repository slug.
    pub fn split_full_name(&self) -> Option<(&str, &str)> {
        split_full_name(&self.full_name)
    }

    /// Name of the main branch, if one is set.
    pub fn main_branch(&self) -> Option<&str> {
        self.mainbranch
            .as_ref()
            .map(|b| b.name.as_str())
            .filter(|name| !name.is_empty())
    }

    /// `full_name` of the fork parent, if this repository is a fork.
    pub fn parent_full_name(&self) -> Option<&str> {
        self.parent
            .as_ref()
            .and_then(|p| p.full_name.as_deref())
            .filter(|name| !name.is_empty())
    }
}

/// A branch reference.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Branch {
    /// Branch name.
    pub name: String,

    /// Reference type, typically `"branch"`.
    #[serde(rename = "type", default)]
    pub branch_type: Option<String>,
}

/// Reference to a fork parent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParentRef {
    /// `{workspace}/{repo_slug}` of the parent.
    #[serde(default)]
    pub full_name: Option<String>,
}

/// Splits a `{workspace}/{repo_slug}` full name.
///
/// Both halves must be non-empty.
pub fn split_full_name(full_name: &str) -> Option<(&str, &str)> {
    let (owner, name) = full_name.split_once('/')?;
    if owner.is_empty() || name.is_empty() {
        return None;
    }
    Some((owner, name))
}
