//
//  bitbucket-context
//  api/hosting.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! The hosting capability trait shared by both Bitbucket platforms.
//!
//! The context resolver is written once against [`HostingApi`]; each platform
//! supplies an implementation ([`CloudApi`](super::cloud::CloudApi),
//! [`ServerApi`](super::server::ServerApi)). Lookups of resources that may
//! legitimately be missing return `Ok(None)` instead of an error.

use async_trait::async_trait;

use super::cloud;
use super::common::ApiError;
use super::server;
use crate::config::HostType;

/// A repository record as returned by one of the platforms.
#[derive(Debug, Clone)]
pub enum RawRepository {
    /// Bitbucket Cloud repository.
    Cloud(cloud::Repository),
    /// Bitbucket Server/DC repository.
    Server(server::Repository),
}

impl RawRepository {
    /// The platform the record came from.
    pub fn host_type(&self) -> HostType {
        match self {
            Self::Cloud(_) => HostType::Cloud,
            Self::Server(_) => HostType::Server,
        }
    }
}

/// Kind of an entry in a repository tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// A regular file.
    File,
    /// A directory.
    Directory,
}

/// Metadata of a path at a given revision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileMetadata {
    /// Path of the entry, relative to the repository root.
    pub path: String,
    /// Whether the entry is a file or a directory.
    pub kind: EntryKind,
}

impl FileMetadata {
    /// Returns `true` if the entry is a regular file.
    pub fn is_file(&self) -> bool {
        self.kind == EntryKind::File
    }
}

/// Read access to a Bitbucket host, scoped to what context resolution needs.
#[async_trait]
pub trait HostingApi: Send + Sync {
    /// The platform this implementation talks to.
    fn host_type(&self) -> HostType;

    /// Fetches a repository. `owner` is the workspace (Cloud) or project
    /// key (Server/DC). A missing repository is `Ok(None)`.
    async fn get_repository(&self, owner: &str, repo: &str)
        -> Result<Option<RawRepository>, ApiError>;

    /// Hash of the newest commit reachable from `git_ref`, or `Ok(None)` if
    /// the ref has no commits.
    async fn get_latest_commit(
        &self,
        owner: &str,
        repo: &str,
        git_ref: &str,
    ) -> Result<Option<String>, ApiError>;

    /// Metadata of `path` at `revision`. A missing entry is `Ok(None)`.
    async fn get_file_metadata(
        &self,
        owner: &str,
        repo: &str,
        revision: &str,
        path: &str,
    ) -> Result<Option<FileMetadata>, ApiError>;

    /// Fetches a fork parent by its `owner/name` full name.
    ///
    /// Platforms without fork information return `Ok(None)`.
    async fn get_parent_repository(
        &self,
        _full_name: &str,
    ) -> Result<Option<RawRepository>, ApiError> {
        Ok(None)
    }

    /// The repository's default branch, when the platform reports it
    /// separately from the repository record and the lookup is enabled.
    async fn get_default_branch(
        &self,
        _owner: &str,
        _repo: &str,
    ) -> Result<Option<String>, ApiError> {
        Ok(None)
    }
}
