//
//  bitbucket-context
//  api/cloud/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Bitbucket Cloud API
//!
//! [`HostingApi`] implementation for Bitbucket Cloud (REST API 2.0).
//!
//! ## Endpoints
//!
//! ```text
//! GET /2.0/repositories/{workspace}/{repo_slug}
//! GET /2.0/repositories/{workspace}/{repo_slug}/commits/{ref}?pagelen=1
//! GET /2.0/repositories/{workspace}/{repo_slug}/src/{commit}/{path}?format=meta
//! ```

pub mod commits;
pub mod repositories;
pub mod src;

pub use commits::Commit;
pub use repositories::*;
pub use src::SrcMeta;

use async_trait::async_trait;
use tracing::debug;

use super::client::BitbucketClient;
use super::common::{ApiError, PaginatedResponse};
use super::hosting::{FileMetadata, HostingApi, RawRepository};
use crate::config::HostType;

/// Bitbucket Cloud implementation of [`HostingApi`].
pub struct CloudApi {
    client: BitbucketClient,
}

impl CloudApi {
    /// Wraps a client configured for Bitbucket Cloud.
    pub fn new(client: BitbucketClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl HostingApi for CloudApi {
    fn host_type(&self) -> HostType {
        HostType::Cloud
    }

    async fn get_repository(
        &self,
        owner: &str,
        repo: &str,
    ) -> Result<Option<RawRepository>, ApiError> {
        debug!(workspace = owner, repo, "fetching cloud repository");
        let repository: Option<Repository> = self
            .client
            .get_optional(&["repositories", owner, repo], &[])
            .await?;
        Ok(repository.map(RawRepository::Cloud))
    }

    async fn get_latest_commit(
        &self,
        owner: &str,
        repo: &str,
        git_ref: &str,
    ) -> Result<Option<String>, ApiError> {
        debug!(workspace = owner, repo, git_ref, "fetching tip commit");
        let page: Option<PaginatedResponse<Commit>> = self
            .client
            .get_optional(
                &["repositories", owner, repo, "commits", git_ref],
                &[("pagelen", "1")],
            )
            .await?;
        Ok(page.and_then(|p| p.first().map(|c| c.hash.clone())))
    }

    async fn get_file_metadata(
        &self,
        owner: &str,
        repo: &str,
        revision: &str,
        path: &str,
    ) -> Result<Option<FileMetadata>, ApiError> {
        debug!(workspace = owner, repo, revision, path, "fetching file metadata");
        let mut segments = vec!["repositories", owner, repo, "src", revision];
        segments.extend(path.split('/').filter(|s| !s.is_empty()));

        let meta: Option<SrcMeta> = self
            .client
            .get_optional(&segments, &[("format", "meta")])
            .await?;
        Ok(meta.map(FileMetadata::from))
    }

    async fn get_parent_repository(
        &self,
        full_name: &str,
    ) -> Result<Option<RawRepository>, ApiError> {
        match split_full_name(full_name) {
            Some((owner, name)) => self.get_repository(owner, name).await,
            None => {
                debug!(full_name, "ignoring malformed parent name");
                Ok(None)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::hosting::EntryKind;
    use mockito::Matcher;

    fn api_for(server: &mockito::ServerGuard) -> CloudApi {
        CloudApi::new(BitbucketClient::cloud().unwrap().with_base_url(server.url()))
    }

    #[tokio::test]
    async fn test_get_repository() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/repositories/alice/proj")
            .with_status(200)
            .with_body(r#"{"full_name": "alice/proj", "is_private": true, "mainbranch": {"name": "main"}}"#)
            .create_async()
            .await;

        let api = api_for(&server);
        match api.get_repository("alice", "proj").await.unwrap() {
            Some(RawRepository::Cloud(repo)) => {
                assert!(repo.is_private);
                assert_eq!(repo.main_branch(), Some("main"));
            }
            other => panic!("unexpected record: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_get_repository_missing() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/repositories/alice/nope")
            .with_status(404)
            .with_body(r#"{"type": "error", "error": {"message": "Repository alice/nope not found"}}"#)
            .create_async()
            .await;

        let api = api_for(&server);
        assert!(api.get_repository("alice", "nope").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_get_latest_commit_encodes_ref() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock(
                "GET",
                Matcher::Regex(r"^/repositories/alice/proj/commits/feature(%2F|/)login$".into()),
            )
            .match_query(Matcher::UrlEncoded("pagelen".into(), "1".into()))
            .with_status(200)
            .with_body(r#"{"pagelen": 1, "values": [{"hash": "0123abc"}]}"#)
            .create_async()
            .await;

        let api = api_for(&server);
        let tip = api
            .get_latest_commit("alice", "proj", "feature/login")
            .await
            .unwrap();
        assert_eq!(tip.as_deref(), Some("0123abc"));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_get_latest_commit_empty() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/repositories/alice/proj/commits/master")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"pagelen": 1, "values": []}"#)
            .create_async()
            .await;

        let api = api_for(&server);
        assert!(api
            .get_latest_commit("alice", "proj", "master")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_get_file_metadata() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/repositories/alice/proj/src/abc123/docs/README.md")
            .match_query(Matcher::UrlEncoded("format".into(), "meta".into()))
            .with_status(200)
            .with_body(r#"{"type": "commit_file", "path": "docs/README.md", "size": 12}"#)
            .expect(1)
            .create_async()
            .await;

        let api = api_for(&server);
        let meta = api
            .get_file_metadata("alice", "proj", "abc123", "docs/README.md")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(meta.kind, EntryKind::File);
        assert_eq!(meta.path, "docs/README.md");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_get_file_metadata_directory() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/repositories/alice/proj/src/abc123/docs")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"type": "commit_directory", "path": "docs"}"#)
            .create_async()
            .await;

        let api = api_for(&server);
        let meta = api
            .get_file_metadata("alice", "proj", "abc123", "docs/")
            .await
            .unwrap()
            .unwrap();
        assert!(!meta.is_file());
    }

    #[tokio::test]
    async fn test_get_parent_repository() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/repositories/upstream/proj")
            .with_status(200)
            .with_body(r#"{"full_name": "upstream/proj"}"#)
            .create_async()
            .await;

        let api = api_for(&server);
        assert!(api
            .get_parent_repository("upstream/proj")
            .await
            .unwrap()
            .is_some());
        assert!(api.get_parent_repository("broken").await.unwrap().is_none());
    }
}
