//
//  bitbucket-context
//  api/server/commits.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Server/DC commit API types.
//!
//! `GET /projects/{key}/repos/{slug}/commits?until={ref}&limit=1` lists
//! commits reachable from `until`, newest first.

use serde::{Deserialize, Serialize};

/// A commit as listed by the commits endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Commit {
    /// Full SHA.
    pub id: String,

    /// Abbreviated SHA.
    #[serde(rename = "displayId", default)]
    pub display_id: Option<String>,

    /// Commit message.
    #[serde(default)]
    pub message: Option<String>,

    /// Author timestamp in milliseconds since the epoch.
    #[serde(rename = "authorTimestamp", default)]
    pub author_timestamp: Option<i64>,
}
