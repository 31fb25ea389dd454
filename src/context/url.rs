//
//  bitbucket-context
//  context/url.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Context URL Parser
//!
//! Splits a browser URL into owner, repository and whatever follows.
//!
//! ## Supported URL Layouts
//!
//! ### Bitbucket Cloud
//! - `https://bitbucket.org/<workspace>/<repo>`
//! - `https://bitbucket.org/<workspace>/<repo>/src/<branch-or-commit>/<path>`
//! - `https://bitbucket.org/<workspace>/<repo>/branch/<branch>`
//! - `https://bitbucket.org/<workspace>/<repo>/commits/<sha>`
//!
//! ### Bitbucket Server/Data Center
//! - `https://<host>/projects/<KEY>/repos/<repo>`
//! - `https://<host>/projects/<KEY>/repos/<repo>/browse/<path>?at=refs/heads/<branch>`
//! - `https://<host>/projects/<KEY>/repos/<repo>/commits/<sha>`
//!
//! ## Sub-path Mounts
//!
//! A Server instance may live below the web root, e.g. host
//! `example.com/bitbucket`. Every `/` in the configured host drops one
//! leading path segment before the layout is applied.

use ::url::Url;
use once_cell::sync::Lazy;
use percent_encoding::percent_decode_str;
use regex::Regex;

use super::{ContextError, NavigatorHints, RefType, UrlParts};
use crate::config::HostType;

static COMMIT_HASH: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9a-fA-F]{40}$").unwrap());

const HEADS_PREFIX: &str = "refs/heads/";
const TAGS_PREFIX: &str = "refs/tags/";

/// Returns `true` if `value` looks like a full 40 character commit hash.
///
/// ```rust
/// use bitbucket_context::context::is_commit_hash;
///
/// assert!(is_commit_hash("0123456789abcdef0123456789abcdef01234567"));
/// assert!(!is_commit_hash("main"));
/// assert!(!is_commit_hash("0123abc"));
/// ```
pub fn is_commit_hash(value: &str) -> bool {
    COMMIT_HASH.is_match(value)
}

/// Parses a context URL for `host`.
///
/// `host` is the configured host, possibly with a sub-path; it is returned
/// unchanged in [`UrlParts::host`].
///
/// # Errors
///
/// [`ContextError::MalformedUrl`] if `context_url` is not an absolute URL
/// or has too few path segments to name an owner and a repository.
///
/// # Example
///
/// ```rust
/// use bitbucket_context::config::HostType;
/// use bitbucket_context::context::parse_url;
///
/// let parts = parse_url(
///     HostType::Server,
///     "example.com/bitbucket",
///     "https://example.com/bitbucket/projects/JLDEC/repos/test123.git",
/// ).unwrap();
/// assert_eq!(parts.owner, "JLDEC");
/// assert_eq!(parts.repo_name, "test123");
/// assert!(parts.more_segments.is_empty());
/// ```
pub fn parse_url(
    host_type: HostType,
    host: &str,
    context_url: &str,
) -> Result<UrlParts, ContextError> {
    let url = Url::parse(context_url)
        .map_err(|e| ContextError::malformed(context_url, e.to_string()))?;
    if url.cannot_be_a_base() || url.host_str().is_none() {
        return Err(ContextError::malformed(context_url, "not a web URL"));
    }

    let pathname = url.path();
    let pathname = pathname.strip_prefix('/').unwrap_or(pathname);
    let pathname = pathname.strip_suffix('/').unwrap_or(pathname);
    let mut segments: Vec<&str> = pathname.split('/').collect();

    let relative_path_length = host.trim_matches('/').split('/').count() - 1;
    segments.drain(..relative_path_length.min(segments.len()));

    let (owner_index, repo_index) = match host_type {
        HostType::Cloud => (0, 1),
        HostType::Server => (1, 3),
    };
    let more_segments_start = repo_index + 1;

    let owner = segments.get(owner_index).copied().unwrap_or_default();
    let repo_name = segments.get(repo_index).copied().unwrap_or_default();
    if owner.is_empty() || repo_name.is_empty() {
        return Err(ContextError::malformed(
            context_url,
            "expected an owner and a repository in the path",
        ));
    }

    let ends_with_repo_name = segments.len() == more_segments_start;
    let more_segments = if ends_with_repo_name {
        Vec::new()
    } else {
        segments[more_segments_start..]
            .iter()
            .map(|s| s.to_string())
            .collect()
    };

    Ok(UrlParts {
        host: host.to_string(),
        owner: owner.to_string(),
        repo_name: parse_repo_name(repo_name, ends_with_repo_name),
        more_segments,
        search_params: url.query_pairs().into_owned().collect(),
    })
}

fn parse_repo_name(repo_name: &str, ends_with_repo_name: bool) -> String {
    if ends_with_repo_name {
        repo_name.strip_suffix(".git").unwrap_or(repo_name).to_string()
    } else {
        repo_name.to_string()
    }
}

/// Derives ref, revision and path hints from the segments after the
/// repository.
///
/// Segments are percent-decoded first, so hints carry the real ref and
/// path (`my%20file.md` becomes `my file.md`). Unknown layouts yield empty
/// hints, leaving everything to the resolver.
pub fn navigator_hints(host_type: HostType, parts: &UrlParts) -> NavigatorHints {
    let segments: Vec<String> = parts.more_segments.iter().map(|s| decode(s)).collect();
    match host_type {
        HostType::Cloud => cloud_hints(&segments),
        HostType::Server => server_hints(parts, &segments),
    }
}

fn decode(segment: &str) -> String {
    percent_decode_str(segment).decode_utf8_lossy().into_owned()
}

fn cloud_hints(segments: &[String]) -> NavigatorHints {
    let mut hints = NavigatorHints::default();
    match segments {
        [kind, rev, rest @ ..] if kind == "src" => {
            set_ref_or_revision(&mut hints, rev);
            hints.path = join_path(rest);
        }
        [kind, rest @ ..] if kind == "branch" && !rest.is_empty() => {
            hints.git_ref = Some(rest.join("/"));
            hints.ref_type = Some(RefType::Branch);
        }
        [kind, sha, ..] if kind == "commits" && is_commit_hash(sha) => {
            hints.revision = Some(sha.clone());
            hints.ref_type = Some(RefType::Revision);
        }
        _ => {}
    }
    hints
}

fn server_hints(parts: &UrlParts, segments: &[String]) -> NavigatorHints {
    let mut hints = NavigatorHints::default();
    match segments {
        [kind, rest @ ..] if kind == "browse" => {
            hints.path = join_path(rest);
        }
        [kind, sha, ..] if kind == "commits" && is_commit_hash(sha) => {
            hints.revision = Some(sha.clone());
            hints.ref_type = Some(RefType::Revision);
            return hints;
        }
        _ => {}
    }

    if let Some(at) = parts.search_param("at").filter(|at| !at.is_empty()) {
        if let Some(branch) = at.strip_prefix(HEADS_PREFIX) {
            hints.git_ref = Some(branch.to_string());
            hints.ref_type = Some(RefType::Branch);
        } else if let Some(tag) = at.strip_prefix(TAGS_PREFIX) {
            hints.git_ref = Some(tag.to_string());
            hints.ref_type = Some(RefType::Tag);
        } else {
            set_ref_or_revision(&mut hints, at);
        }
    }
    hints
}

fn set_ref_or_revision(hints: &mut NavigatorHints, value: &str) {
    if is_commit_hash(value) {
        hints.revision = Some(value.to_string());
        hints.ref_type = Some(RefType::Revision);
    } else {
        hints.git_ref = Some(value.to_string());
        hints.ref_type = Some(RefType::Branch);
    }
}

fn join_path(segments: &[String]) -> Option<String> {
    let path = segments
        .iter()
        .filter(|s| !s.is_empty())
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join("/");
    (!path.is_empty()).then_some(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::fakes::{cloud_repo, FakeApi};
    use crate::context::to_repository;

    const SHA: &str = "0123456789abcdef0123456789abcdef01234567";

    #[test]
    fn test_server_url_without_sub_path() {
        let parts = parse_url(
            HostType::Server,
            "bb.example.com",
            "https://bb.example.com/projects/JLDEC/repos/test123",
        )
        .unwrap();
        assert_eq!(parts.host, "bb.example.com");
        assert_eq!(parts.owner, "JLDEC");
        assert_eq!(parts.repo_name, "test123");
        assert!(parts.more_segments.is_empty());
        assert!(parts.search_params.is_empty());
    }

    #[test]
    fn test_sub_path_drops_leading_segments() {
        let parts = parse_url(
            HostType::Server,
            "example.com/a/b",
            "https://example.com/a/b/projects/JLDEC/repos/test123/browse/src?at=refs/heads/dev",
        )
        .unwrap();
        assert_eq!(parts.owner, "JLDEC");
        assert_eq!(parts.repo_name, "test123");
        assert_eq!(parts.more_segments, vec!["browse", "src"]);
        assert_eq!(
            parts.search_params,
            vec![("at".to_string(), "refs/heads/dev".to_string())]
        );
    }

    #[test]
    fn test_git_suffix_only_stripped_at_end() {
        let parts = parse_url(
            HostType::Cloud,
            "bitbucket.org",
            "https://bitbucket.org/alice/proj.git",
        )
        .unwrap();
        assert_eq!(parts.repo_name, "proj");

        let parts = parse_url(
            HostType::Cloud,
            "bitbucket.org",
            "https://bitbucket.org/alice/proj.git/src/main",
        )
        .unwrap();
        assert_eq!(parts.repo_name, "proj.git");
    }

    #[tokio::test]
    async fn test_cloud_clone_url_round_trips() {
        let api = FakeApi::default();
        let repo = to_repository(&api, "bitbucket.org", Some(cloud_repo("alice/proj", None)), 1)
            .await
            .unwrap();

        let parts = parse_url(HostType::Cloud, "bitbucket.org", &repo.clone_url).unwrap();
        assert_eq!(parts.owner, repo.owner);
        assert_eq!(parts.repo_name, repo.name);
        assert!(parts.more_segments.is_empty());
    }

    #[test]
    fn test_hints_are_percent_decoded() {
        let parts = parse_url(
            HostType::Server,
            "bb.example.com",
            "https://bb.example.com/projects/P/repos/r/browse/docs/my%20file.md",
        )
        .unwrap();
        assert_eq!(parts.more_segments, vec!["browse", "docs", "my%20file.md"]);
        let hints = navigator_hints(HostType::Server, &parts);
        assert_eq!(hints.path.as_deref(), Some("docs/my file.md"));

        let parts = parse_url(
            HostType::Cloud,
            "bitbucket.org",
            "https://bitbucket.org/alice/proj/src/feature%2Flogin/d%C3%A9j%C3%A0.md",
        )
        .unwrap();
        assert_eq!(parts.more_segments[1], "feature%2Flogin");
        let hints = navigator_hints(HostType::Cloud, &parts);
        assert_eq!(hints.git_ref.as_deref(), Some("feature/login"));
        assert_eq!(hints.ref_type, Some(RefType::Branch));
        assert_eq!(hints.path.as_deref(), Some("déjà.md"));
    }

    #[test]
    fn test_trailing_slash_is_ignored() {
        let parts = parse_url(
            HostType::Cloud,
            "bitbucket.org",
            "https://bitbucket.org/alice/proj/",
        )
        .unwrap();
        assert_eq!(parts.repo_name, "proj");
        assert!(parts.more_segments.is_empty());
    }

    #[test]
    fn test_malformed_urls() {
        for url in [
            "not a url",
            "/projects/JLDEC/repos/test123",
            "mailto:someone@example.com",
            "https://bb.example.com/projects/JLDEC",
            "https://bb.example.com/",
        ] {
            let err = parse_url(HostType::Server, "bb.example.com", url).unwrap_err();
            assert!(
                matches!(err, ContextError::MalformedUrl { .. }),
                "{url} should be malformed"
            );
        }
    }

    #[test]
    fn test_cloud_src_hints() {
        let parts = parse_url(
            HostType::Cloud,
            "bitbucket.org",
            "https://bitbucket.org/alice/proj/src/main/docs/README.md",
        )
        .unwrap();
        let hints = navigator_hints(HostType::Cloud, &parts);
        assert_eq!(hints.git_ref.as_deref(), Some("main"));
        assert_eq!(hints.ref_type, Some(RefType::Branch));
        assert_eq!(hints.path.as_deref(), Some("docs/README.md"));
        assert!(hints.revision.is_none());
    }

    #[test]
    fn test_cloud_src_with_commit() {
        let url = format!("https://bitbucket.org/alice/proj/src/{SHA}/");
        let parts = parse_url(HostType::Cloud, "bitbucket.org", &url).unwrap();
        let hints = navigator_hints(HostType::Cloud, &parts);
        assert_eq!(hints.revision.as_deref(), Some(SHA));
        assert_eq!(hints.ref_type, Some(RefType::Revision));
        assert!(hints.git_ref.is_none());
        assert!(hints.path.is_none());
    }

    #[test]
    fn test_cloud_branch_and_commit_hints() {
        let parts = parse_url(
            HostType::Cloud,
            "bitbucket.org",
            "https://bitbucket.org/alice/proj/branch/feature/login",
        )
        .unwrap();
        let hints = navigator_hints(HostType::Cloud, &parts);
        assert_eq!(hints.git_ref.as_deref(), Some("feature/login"));

        let url = format!("https://bitbucket.org/alice/proj/commits/{SHA}");
        let parts = parse_url(HostType::Cloud, "bitbucket.org", &url).unwrap();
        let hints = navigator_hints(HostType::Cloud, &parts);
        assert_eq!(hints.revision.as_deref(), Some(SHA));
    }

    #[test]
    fn test_server_browse_hints() {
        let parts = parse_url(
            HostType::Server,
            "bb.example.com",
            "https://bb.example.com/projects/JLDEC/repos/test123/browse/src/main.rs?at=refs%2Ftags%2Fv1.0",
        )
        .unwrap();
        let hints = navigator_hints(HostType::Server, &parts);
        assert_eq!(hints.path.as_deref(), Some("src/main.rs"));
        assert_eq!(hints.git_ref.as_deref(), Some("v1.0"));
        assert_eq!(hints.ref_type, Some(RefType::Tag));
    }

    #[test]
    fn test_server_at_commit_and_plain_branch() {
        let url = format!("https://bb.example.com/projects/P/repos/r/browse?at={SHA}");
        let parts = parse_url(HostType::Server, "bb.example.com", &url).unwrap();
        let hints = navigator_hints(HostType::Server, &parts);
        assert_eq!(hints.revision.as_deref(), Some(SHA));
        assert!(hints.path.is_none());

        let url = "https://bb.example.com/projects/P/repos/r/browse?at=develop";
        let parts = parse_url(HostType::Server, "bb.example.com", url).unwrap();
        let hints = navigator_hints(HostType::Server, &parts);
        assert_eq!(hints.git_ref.as_deref(), Some("develop"));
        assert_eq!(hints.ref_type, Some(RefType::Branch));
    }

    #[test]
    fn test_server_commit_hint() {
        let url = format!("https://bb.example.com/projects/P/repos/r/commits/{SHA}");
        let parts = parse_url(HostType::Server, "bb.example.com", &url).unwrap();
        let hints = navigator_hints(HostType::Server, &parts);
        assert_eq!(hints.revision.as_deref(), Some(SHA));
        assert_eq!(hints.ref_type, Some(RefType::Revision));
    }

    #[test]
    fn test_unknown_segments_give_no_hints() {
        let parts = parse_url(
            HostType::Server,
            "bb.example.com",
            "https://bb.example.com/projects/P/repos/r/pull-requests/12",
        )
        .unwrap();
        assert_eq!(navigator_hints(HostType::Server, &parts), NavigatorHints::default());
    }
}
