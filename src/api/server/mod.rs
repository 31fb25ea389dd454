//
//  bitbucket-context
//  api/server/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Bitbucket Server/Data Center API
//!
//! [`HostingApi`] implementation for self-hosted Bitbucket (REST API 1.0).
//!
//! ## Key Concepts
//!
//! - **Projects**: repositories are addressed by project key and slug
//! - **No fork parents**: the repository record carries no parent, so
//!   [`HostingApi::get_parent_repository`] keeps its default (`None`)
//! - **Default branch**: not part of the repository record; fetched from
//!   `branches/default` only when enabled for the host

pub mod browse;
pub mod commits;
pub mod repositories;

pub use browse::PathType;
pub use commits::Commit;
pub use repositories::*;

use async_trait::async_trait;
use tracing::debug;

use super::client::BitbucketClient;
use super::common::{ApiError, ServerPaginatedResponse};
use super::hosting::{FileMetadata, HostingApi, RawRepository};
use crate::config::HostType;

/// Bitbucket Server/DC implementation of [`HostingApi`].
pub struct ServerApi {
    client: BitbucketClient,
    lookup_default_branch: bool,
}

impl ServerApi {
    /// Wraps a client configured for a Server/DC host.
    pub fn new(client: BitbucketClient) -> Self {
        Self {
            client,
            lookup_default_branch: false,
        }
    }

    /// Enables querying `branches/default` for the real default branch.
    pub fn with_default_branch_lookup(mut self, enabled: bool) -> Self {
        self.lookup_default_branch = enabled;
        self
    }
}

#[async_trait]
impl HostingApi for ServerApi {
    fn host_type(&self) -> HostType {
        HostType::Server
    }

    async fn get_repository(
        &self,
        owner: &str,
        repo: &str,
    ) -> Result<Option<RawRepository>, ApiError> {
        debug!(project = owner, repo, "fetching server repository");
        let repository: Option<Repository> = self
            .client
            .get_optional(&["projects", owner, "repos", repo], &[])
            .await?;
        Ok(repository.map(RawRepository::Server))
    }

    async fn get_latest_commit(
        &self,
        owner: &str,
        repo: &str,
        git_ref: &str,
    ) -> Result<Option<String>, ApiError> {
        debug!(project = owner, repo, git_ref, "fetching tip commit");
        let page: Option<ServerPaginatedResponse<Commit>> = self
            .client
            .get_optional(
                &["projects", owner, "repos", repo, "commits"],
                &[("until", git_ref), ("limit", "1")],
            )
            .await?;
        Ok(page.and_then(|p| p.first().map(|c| c.id.clone())))
    }

    async fn get_file_metadata(
        &self,
        owner: &str,
        repo: &str,
        revision: &str,
        path: &str,
    ) -> Result<Option<FileMetadata>, ApiError> {
        debug!(project = owner, repo, revision, path, "fetching path type");
        let mut segments = vec!["projects", owner, "repos", repo, "browse"];
        segments.extend(path.split('/').filter(|s| !s.is_empty()));

        let path_type: Option<PathType> = self
            .client
            .get_optional(&segments, &[("at", revision), ("type", "true")])
            .await?;
        Ok(path_type.map(|t| t.into_metadata(path)))
    }

    async fn get_default_branch(
        &self,
        owner: &str,
        repo: &str,
    ) -> Result<Option<String>, ApiError> {
        if !self.lookup_default_branch {
            return Ok(None);
        }

        debug!(project = owner, repo, "fetching default branch");
        let branch: Option<Branch> = self
            .client
            .get_optional(&["projects", owner, "repos", repo, "branches", "default"], &[])
            .await?;
        Ok(branch.map(|b| b.display_id).filter(|name| !name.is_empty()))
    }
}
