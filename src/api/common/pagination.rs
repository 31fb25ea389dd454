//
//  bitbucket-context
//  api/common/pagination.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Pagination Types for Bitbucket API Responses
//!
//! Each platform pages list endpoints differently:
//!
//! | Type | Platform | Strategy |
//! |------|----------|----------|
//! | [`PaginatedResponse`] | Cloud | URL-based (next/previous links), `pagelen` |
//! | [`ServerPaginatedResponse`] | Server | Offset-based (`start`), `limit` |
//!
//! Context resolution only ever asks for the first element of a single page
//! (the tip commit of a ref), so both types expose [`first`](PaginatedResponse::first)
//! next to the usual paging helpers.

use serde::{Deserialize, Serialize};

/// Paginated response from Bitbucket Cloud API.
///
/// # Example
///
/// ```rust
/// use bitbucket_context::api::common::PaginatedResponse;
///
/// let json = r#"{"values": [1, 2], "pagelen": 2, "next": "https://example.com?page=2"}"#;
/// let page: PaginatedResponse<u32> = serde_json::from_str(json).unwrap();
/// assert!(page.has_next());
/// assert_eq!(page.first(), Some(&1));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginatedResponse<T> {
    /// Items in the current page.
    #[serde(default = "Vec::new")]
    pub values: Vec<T>,

    /// Current page number (1-indexed).
    #[serde(default)]
    pub page: Option<u32>,

    /// Number of items per page.
    #[serde(default)]
    pub pagelen: Option<u32>,

    /// Total number of items across all pages, when reported.
    #[serde(default)]
    pub size: Option<u32>,

    /// URL of the next page.
    #[serde(default)]
    pub next: Option<String>,

    /// URL of the previous page.
    #[serde(default)]
    pub previous: Option<String>,
}

impl<T> PaginatedResponse<T> {
    /// Returns `true` when another page is available.
    pub fn has_next(&self) -> bool {
        self.next.is_some()
    }

    /// URL of the next page, if any.
    pub fn next_url(&self) -> Option<&str> {
        self.next.as_deref()
    }

    /// First item of this page.
    pub fn first(&self) -> Option<&T> {
        self.values.first()
    }
}

/// Paginated response from Bitbucket Server/Data Center API.
///
/// # Example
///
/// ```rust
/// use bitbucket_context::api::common::ServerPaginatedResponse;
///
/// let json = r#"{"values": [], "size": 0, "limit": 1, "isLastPage": true, "start": 0}"#;
/// let page: ServerPaginatedResponse<String> = serde_json::from_str(json).unwrap();
/// assert!(!page.has_next());
/// assert!(page.first().is_none());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerPaginatedResponse<T> {
    /// Items in the current page.
    #[serde(default = "Vec::new")]
    pub values: Vec<T>,

    /// Number of items in this page.
    #[serde(default)]
    pub size: u32,

    /// Requested page size.
    #[serde(default)]
    pub limit: u32,

    /// Whether this is the last page.
    #[serde(default, rename = "isLastPage")]
    pub is_last_page: bool,

    /// Start offset of the next page.
    #[serde(default, rename = "nextPageStart")]
    pub next_page_start: Option<u32>,

    /// Start offset of this page.
    #[serde(default)]
    pub start: u32,
}

impl<T> ServerPaginatedResponse<T> {
    /// Returns `true` when another page is available.
    pub fn has_next(&self) -> bool {
        !self.is_last_page
    }

    /// Start offset to request for the next page.
    pub fn next_start(&self) -> Option<u32> {
        self.next_page_start
    }

    /// First item of this page.
    pub fn first(&self) -> Option<&T> {
        self.values.first()
    }
}
