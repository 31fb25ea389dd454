//
//  bitbucket-context
//  context/fakes.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! In-memory stand-ins for the hosting API and token provider.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::api::cloud;
use crate::api::server;
use crate::api::{
    ApiError, ApiFactory, EntryKind, FactoryError, FileMetadata, HostingApi, RawRepository,
};
use crate::auth::{CredentialError, Token, TokenProvider, User};
use crate::config::HostType;

pub fn cloud_repo(full_name: &str, parent: Option<&str>) -> RawRepository {
    RawRepository::Cloud(cloud::Repository {
        full_name: full_name.to_string(),
        name: full_name.rsplit('/').next().unwrap_or_default().to_string(),
        uuid: None,
        is_private: false,
        mainbranch: None,
        parent: parent.map(|p| cloud::ParentRef {
            full_name: Some(p.to_string()),
        }),
    })
}

pub fn server_repo(key: &str, name: &str, public: bool) -> RawRepository {
    let lower_key = key.to_lowercase();
    RawRepository::Server(server::Repository {
        id: Some(1),
        slug: name.to_string(),
        name: name.to_string(),
        project: server::ProjectRef {
            key: key.to_string(),
            id: None,
            name: None,
        },
        is_public: public,
        links: server::RepositoryLinks {
            clone: vec![
                server::CloneLink {
                    name: "ssh".to_string(),
                    href: format!("ssh://git@bb.example.com:7999/{}/{}.git", lower_key, name),
                },
                server::CloneLink {
                    name: "http".to_string(),
                    href: format!("https://bb.example.com/scm/{}/{}.git", lower_key, name),
                },
            ],
        },
    })
}

#[derive(Default)]
pub struct FakeApi {
    host_type: Option<HostType>,
    repositories: HashMap<(String, String), RawRepository>,
    parents: HashMap<String, RawRepository>,
    commits: HashMap<String, String>,
    files: HashMap<String, EntryKind>,
    default_branch: Option<String>,
    fail_commits: bool,
    commit_refs: Mutex<Vec<String>>,
    repository_calls: AtomicUsize,
    file_calls: AtomicUsize,
    parent_calls: AtomicUsize,
}

impl FakeApi {
    pub fn with_host_type(mut self, host_type: HostType) -> Self {
        self.host_type = Some(host_type);
        self
    }

    pub fn with_repository(mut self, owner: &str, name: &str, raw: RawRepository) -> Self {
        self.repositories
            .insert((owner.to_string(), name.to_string()), raw);
        self
    }

    pub fn with_parent(mut self, raw: RawRepository) -> Self {
        if let RawRepository::Cloud(repo) = &raw {
            self.parents.insert(repo.full_name.clone(), raw.clone());
        }
        self
    }

    pub fn with_commit(mut self, git_ref: &str, sha: &str) -> Self {
        self.commits.insert(git_ref.to_string(), sha.to_string());
        self
    }

    pub fn with_file(mut self, path: &str, kind: EntryKind) -> Self {
        self.files.insert(path.to_string(), kind);
        self
    }

    pub fn with_default_branch(mut self, branch: &str) -> Self {
        self.default_branch = Some(branch.to_string());
        self
    }

    pub fn failing_commits(mut self) -> Self {
        self.fail_commits = true;
        self
    }

    pub fn reset(self) -> Self {
        self.repository_calls.store(0, Ordering::SeqCst);
        self.file_calls.store(0, Ordering::SeqCst);
        self.parent_calls.store(0, Ordering::SeqCst);
        self.commit_refs.lock().unwrap().clear();
        self
    }

    pub fn repository_calls(&self) -> usize {
        self.repository_calls.load(Ordering::SeqCst)
    }

    pub fn file_calls(&self) -> usize {
        self.file_calls.load(Ordering::SeqCst)
    }

    pub fn parent_calls(&self) -> usize {
        self.parent_calls.load(Ordering::SeqCst)
    }

    pub fn commit_refs(&self) -> Vec<String> {
        self.commit_refs.lock().unwrap().clone()
    }
}

#[async_trait]
impl HostingApi for FakeApi {
    fn host_type(&self) -> HostType {
        self.host_type.unwrap_or(HostType::Server)
    }

    async fn get_repository(
        &self,
        owner: &str,
        repo: &str,
    ) -> Result<Option<RawRepository>, ApiError> {
        self.repository_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .repositories
            .get(&(owner.to_string(), repo.to_string()))
            .cloned())
    }

    async fn get_latest_commit(
        &self,
        _owner: &str,
        _repo: &str,
        git_ref: &str,
    ) -> Result<Option<String>, ApiError> {
        self.commit_refs.lock().unwrap().push(git_ref.to_string());
        if self.fail_commits {
            return Err(ApiError::ServerError("commits unavailable".to_string()));
        }
        Ok(self.commits.get(git_ref).cloned())
    }

    async fn get_file_metadata(
        &self,
        _owner: &str,
        _repo: &str,
        _revision: &str,
        path: &str,
    ) -> Result<Option<FileMetadata>, ApiError> {
        self.file_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.files.get(path).map(|kind| FileMetadata {
            path: path.to_string(),
            kind: *kind,
        }))
    }

    async fn get_parent_repository(
        &self,
        full_name: &str,
    ) -> Result<Option<RawRepository>, ApiError> {
        self.parent_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.parents.get(full_name).cloned())
    }

    async fn get_default_branch(
        &self,
        _owner: &str,
        _repo: &str,
    ) -> Result<Option<String>, ApiError> {
        Ok(self.default_branch.clone())
    }
}

pub struct FakeFactory {
    pub api: Arc<FakeApi>,
}

#[async_trait]
impl ApiFactory for FakeFactory {
    async fn create(&self, _user: &User) -> Result<Arc<dyn HostingApi>, FactoryError> {
        let api: Arc<dyn HostingApi> = self.api.clone();
        Ok(api)
    }
}

pub struct FakeTokens {
    pub token: Option<Token>,
}

#[async_trait]
impl TokenProvider for FakeTokens {
    async fn get_token_with_scopes(
        &self,
        user: &User,
        _scopes: &[String],
    ) -> Result<Token, CredentialError> {
        self.get_current_token(user).await
    }

    async fn get_current_token(&self, user: &User) -> Result<Token, CredentialError> {
        self.token.clone().ok_or_else(|| CredentialError::Missing {
            user: user.id.clone(),
            host: "bb.example.com".to_string(),
        })
    }
}
