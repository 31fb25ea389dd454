//
//  bitbucket-context
//  api/cloud/src.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Cloud source browsing types.
//!
//! `GET /repositories/{workspace}/{slug}/src/{commit}/{path}?format=meta`
//! returns the metadata of a single tree entry instead of its content.

use serde::{Deserialize, Serialize};

use crate::api::hosting::{EntryKind, FileMetadata};

/// Entry type reported for files.
pub const COMMIT_FILE: &str = "commit_file";

/// Metadata of a tree entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SrcMeta {
    /// `commit_file` or `commit_directory`.
    #[serde(rename = "type")]
    pub entry_type: String,

    /// Path relative to the repository root.
    #[serde(default)]
    pub path: String,

    /// File size in bytes (files only).
    #[serde(default)]
    pub size: Option<u64>,
}

impl From<SrcMeta> for FileMetadata {
    fn from(meta: SrcMeta) -> Self {
        let kind = if meta.entry_type == COMMIT_FILE {
            EntryKind::File
        } else {
            EntryKind::Directory
        };
        Self {
            path: meta.path,
            kind,
        }
    }
}
