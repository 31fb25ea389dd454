//
//  bitbucket-context
//  context/resolver.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Context Resolver
//!
//! Resolves a context URL into a [`WorkspaceContext`].
//!
//! ## Resolution Steps
//!
//! 1. Parse the URL into [`UrlParts`] and derive [`NavigatorHints`]
//! 2. Fetch the repository; a missing one is [`ContextError::NotFound`]
//! 3. Normalize it (including fork parents, up to the configured depth)
//! 4. Default the ref to the default branch and the ref type to `branch`
//! 5. Look up the tip revision of the ref unless the URL named one
//! 6. Decide whether the path is a file, with at most one metadata lookup
//! 7. Compose the title
//!
//! Any API failure aborts the resolution; nothing is retried and no partial
//! context is returned.
//!
//! ## Empty Refs
//!
//! A ref without commits (an empty repository, or a branch that does not
//! exist yet) resolves to `ref = None`, `ref_type = None`, `revision = ""`,
//! whether or not the ref is the default branch.

use std::sync::Arc;

use tracing::{debug, error, info, info_span, Instrument};

use super::{
    navigator_hints, parse_url, to_repository, ContextError, NavigatorHints, RefType,
    UrlParts, WorkspaceContext,
};
use crate::api::ApiFactory;
use crate::auth::{TokenProvider, User};
use crate::config::{HostType, DEFAULT_MAX_FORK_DEPTH};

/// Tunables of the resolver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolverOptions {
    /// How many fork ancestors are fetched.
    pub max_fork_depth: u32,
}

impl Default for ResolverOptions {
    fn default() -> Self {
        Self {
            max_fork_depth: DEFAULT_MAX_FORK_DEPTH,
        }
    }
}

/// Resolves context URLs for one Bitbucket host.
///
/// The resolver holds no mutable state and can be shared across tasks.
pub struct ContextResolver {
    host: String,
    host_type: HostType,
    api_factory: Arc<dyn ApiFactory>,
    tokens: Arc<dyn TokenProvider>,
    options: ResolverOptions,
}

impl ContextResolver {
    /// Creates a resolver for `host`.
    ///
    /// # Parameters
    ///
    /// * `host` - The configured host, possibly with a sub-path
    /// * `host_type` - Which URL layout and API flavor the host uses
    /// * `api_factory` - Builds an authenticated API client per user
    /// * `tokens` - Supplies the token attached to "not found" errors
    pub fn new(
        host: impl Into<String>,
        host_type: HostType,
        api_factory: Arc<dyn ApiFactory>,
        tokens: Arc<dyn TokenProvider>,
    ) -> Self {
        Self {
            host: host.into(),
            host_type,
            api_factory,
            tokens,
            options: ResolverOptions::default(),
        }
    }

    /// Replaces the resolver options.
    pub fn with_options(mut self, options: ResolverOptions) -> Self {
        self.options = options;
        self
    }

    /// The host this resolver serves.
    pub fn host(&self) -> &str {
        &self.host
    }

    /// The platform flavor of the host.
    pub fn host_type(&self) -> HostType {
        self.host_type
    }

    /// Parses `context_url` using this host's URL layout.
    pub fn parse_url(&self, context_url: &str) -> Result<UrlParts, ContextError> {
        parse_url(self.host_type, &self.host, context_url)
    }

    /// Resolves `context_url` on behalf of `user`.
    ///
    /// Failures are logged with the user id and the URL, then returned
    /// unchanged.
    pub async fn handle(
        &self,
        user: &User,
        context_url: &str,
    ) -> Result<WorkspaceContext, ContextError> {
        let span = info_span!("handle", user_id = %user.id, context_url);

        async {
            let result = self.handle_inner(user, context_url).await;
            if let Err(e) = &result {
                error!(user_id = %user.id, context_url, error = %e, "Error parsing Bitbucket context");
            }
            result
        }
        .instrument(span)
        .await
    }

    async fn handle_inner(
        &self,
        user: &User,
        context_url: &str,
    ) -> Result<WorkspaceContext, ContextError> {
        let parts = self.parse_url(context_url)?;
        let hints = navigator_hints(self.host_type, &parts);
        debug!(?hints, "derived navigator hints");

        self.resolve_navigator_context(user, &parts.host, &parts.owner, &parts.repo_name, hints)
            .await
    }

    /// Resolves a repository location, filling in whatever `hints` leaves
    /// unset.
    ///
    /// # Errors
    ///
    /// - [`ContextError::NotFound`] if the repository does not exist
    /// - [`ContextError::Upstream`] if any API call fails
    /// - [`ContextError::Credentials`] if no token is available
    pub async fn resolve_navigator_context(
        &self,
        user: &User,
        host: &str,
        owner: &str,
        repo_name: &str,
        hints: NavigatorHints,
    ) -> Result<WorkspaceContext, ContextError> {
        let span = info_span!("resolve_navigator_context", owner, repo_name);

        async {
            let result = self
                .resolve_navigator_context_inner(user, host, owner, repo_name, hints)
                .await;
            if let Err(e) = &result {
                error!(user_id = %user.id, error = %e, "Error parsing Bitbucket navigator request context");
            }
            result
        }
        .instrument(span)
        .await
    }

    async fn resolve_navigator_context_inner(
        &self,
        user: &User,
        host: &str,
        owner: &str,
        repo_name: &str,
        mut hints: NavigatorHints,
    ) -> Result<WorkspaceContext, ContextError> {
        let api = self.api_factory.create(user).await?;

        let Some(raw) = api.get_repository(owner, repo_name).await? else {
            let token = match self.tokens.get_current_token(user).await {
                Ok(token) => Some(token),
                Err(e) => {
                    debug!(error = %e, "no current token to attach");
                    None
                }
            };
            return Err(ContextError::NotFound {
                token,
                user: user.clone(),
                host: self.host.clone(),
                owner: owner.to_string(),
                repo_name: repo_name.to_string(),
            });
        };

        let repository =
            to_repository(api.as_ref(), host, Some(raw), self.options.max_fork_depth).await?;
        debug!(repository = %repository.full_name(), private = repository.private, "normalized repository");

        let mut revision = hints.revision.take().filter(|r| !r.is_empty());
        if revision.is_none() {
            hints.git_ref = hints
                .git_ref
                .filter(|r| !r.is_empty())
                .or_else(|| Some(repository.default_branch.clone()));
        }
        let mut ref_type = hints.ref_type.or(Some(RefType::Branch));
        let mut git_ref = hints.git_ref;

        if revision.is_none() {
            let tip = match git_ref.as_deref() {
                Some(name) => api.get_latest_commit(owner, repo_name, name).await?,
                None => None,
            };
            match tip {
                Some(sha) => revision = Some(sha),
                None => {
                    info!(git_ref = ?git_ref, "ref has no commits, treating as empty");
                    git_ref = None;
                    ref_type = None;
                }
            }
        }
        let revision = revision.unwrap_or_default();

        let (path, is_file) = match hints.path.filter(|p| !p.is_empty()) {
            None => (String::new(), false),
            Some(path) => {
                let is_file = match hints.is_file {
                    Some(is_file) => is_file,
                    None if revision.is_empty() => false,
                    None => api
                        .get_file_metadata(owner, repo_name, &revision, &path)
                        .await?
                        .map(|meta| meta.is_file())
                        .unwrap_or(false),
                };
                (path, is_file)
            }
        };

        let title = format!(
            "{}/{} - {}{}",
            owner,
            repo_name,
            git_ref.as_deref().unwrap_or(&revision),
            if path.is_empty() {
                String::new()
            } else {
                format!(":{}", path)
            }
        );

        Ok(WorkspaceContext {
            title,
            repository,
            git_ref,
            ref_type,
            revision,
            path,
            is_file: Some(is_file),
        })
    }
}
