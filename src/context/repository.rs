//
//  bitbucket-context
//  context/repository.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Repository Normalizer
//!
//! Maps Cloud and Server/DC repository records onto [`Repository`].
//!
//! | Field | Cloud | Server/DC |
//! |-------|-------|-----------|
//! | `owner` | first half of `full_name` | `project.key` |
//! | `name` | second half of `full_name` | `name` |
//! | `clone_url` | `https://<host>/<owner>/<name>.git` | `links.clone` entry named `http` |
//! | `private` | `is_private` | `!public` |
//! | `default_branch` | `mainbranch.name`, else `master` | lookup if enabled, else `master` |
//! | `fork` | `parent.full_name`, up to the depth limit | never |

use ::url::Url;
use tracing::{debug, warn};

use super::{ContextError, Fork, Repository};
use crate::api::{cloud, server, HostingApi, RawRepository};

/// Default branch assumed when the platform does not report one.
pub const DEFAULT_BRANCH: &str = "master";

/// Normalizes `raw` and up to `max_fork_depth` of its fork ancestors.
///
/// Parents are fetched one at a time, walking up the chain until a record
/// has no parent, a parent cannot be found, or the depth limit is reached.
///
/// # Errors
///
/// - [`ContextError::UnknownRepository`] if `raw` is `None` or unreadable
/// - [`ContextError::InvalidCloneUrl`] if a Server record has no usable `http` clone link
/// - [`ContextError::Upstream`] if a parent or default-branch lookup fails
pub async fn to_repository(
    api: &dyn HostingApi,
    host: &str,
    raw: Option<RawRepository>,
    max_fork_depth: u32,
) -> Result<Repository, ContextError> {
    let raw = raw.ok_or(ContextError::UnknownRepository)?;

    let mut chain = vec![raw];
    let mut remaining = max_fork_depth;
    while remaining > 0 {
        let parent_name = match chain.last() {
            Some(RawRepository::Cloud(repo)) => repo.parent_full_name().map(str::to_string),
            _ => None,
        };
        let Some(parent_name) = parent_name else {
            break;
        };

        match api.get_parent_repository(&parent_name).await? {
            Some(parent) => chain.push(parent),
            None => {
                debug!(parent = %parent_name, "fork parent not accessible");
                break;
            }
        }
        remaining -= 1;
    }

    let mut normalized: Option<Repository> = None;
    for raw in chain.into_iter().rev() {
        let mut repository = normalize(api, host, raw).await?;
        repository.fork = normalized.map(|parent| Fork {
            parent: Box::new(parent),
        });
        normalized = Some(repository);
    }

    normalized.ok_or(ContextError::UnknownRepository)
}

async fn normalize(
    api: &dyn HostingApi,
    host: &str,
    raw: RawRepository,
) -> Result<Repository, ContextError> {
    match raw {
        RawRepository::Cloud(repo) => normalize_cloud(host, &repo),
        RawRepository::Server(repo) => normalize_server(api, host, &repo).await,
    }
}

fn normalize_cloud(host: &str, repo: &cloud::Repository) -> Result<Repository, ContextError> {
    let (owner, name) = repo.split_full_name().ok_or_else(|| {
        debug!(full_name = %repo.full_name, "unreadable full_name");
        ContextError::UnknownRepository
    })?;
    let clone_url = validate_clone_url(
        &format!("{}/{}", owner, name),
        &format!("https://{}/{}/{}.git", host, owner, name),
    )?;

    Ok(Repository {
        host: host.to_string(),
        owner: owner.to_string(),
        name: name.to_string(),
        clone_url,
        private: repo.is_private,
        default_branch: repo.main_branch().unwrap_or(DEFAULT_BRANCH).to_string(),
        fork: None,
    })
}

async fn normalize_server(
    api: &dyn HostingApi,
    host: &str,
    repo: &server::Repository,
) -> Result<Repository, ContextError> {
    let owner = repo.project.key.clone();
    let name = if repo.name.is_empty() {
        repo.slug.clone()
    } else {
        repo.name.clone()
    };
    let full_name = format!("{}/{}", owner, name);

    let href = repo
        .http_clone_url()
        .ok_or_else(|| ContextError::InvalidCloneUrl {
            repository: full_name.clone(),
            reason: "no http clone link".to_string(),
        })?;
    let clone_url = validate_clone_url(&full_name, href)?;

    let slug = if repo.slug.is_empty() { &name } else { &repo.slug };
    let default_branch = match api.get_default_branch(&owner, slug).await? {
        Some(branch) => branch,
        None => {
            warn!(
                repository = %full_name,
                "default branch not reported, assuming {}", DEFAULT_BRANCH
            );
            DEFAULT_BRANCH.to_string()
        }
    };

    Ok(Repository {
        host: host.to_string(),
        owner,
        name,
        clone_url,
        private: !repo.is_public,
        default_branch,
        fork: None,
    })
}

/// Checks that a clone URL is an absolute HTTP(S) URL.
fn validate_clone_url(repository: &str, href: &str) -> Result<String, ContextError> {
    let invalid = |reason: String| ContextError::InvalidCloneUrl {
        repository: repository.to_string(),
        reason,
    };

    let url = Url::parse(href).map_err(|e| invalid(format!("{}: {}", href, e)))?;
    match url.scheme() {
        "https" => {}
        "http" => warn!(repository, clone_url = href, "clone URL is not using https"),
        other => return Err(invalid(format!("unsupported scheme {}", other))),
    }
    if url.host_str().is_none() {
        return Err(invalid(format!("{} has no host", href)));
    }

    Ok(href.to_string())
}
