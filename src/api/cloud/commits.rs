//
//  bitbucket-context
//  api/cloud/commits.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Cloud commit API types.

use serde::{Deserialize, Serialize};

/// A commit as listed by `GET /repositories/{workspace}/{slug}/commits/{ref}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Commit {
    /// Full 40 character SHA.
    pub hash: String,

    /// Commit date (ISO 8601).
    #[serde(default)]
    pub date: Option<String>,

    /// Commit message.
    #[serde(default)]
    pub message: Option<String>,
}
