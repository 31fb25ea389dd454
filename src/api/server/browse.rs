//
//  bitbucket-context
//  api/server/browse.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Server/DC path type lookup.
//!
//! `GET /projects/{key}/repos/{slug}/browse/{path}?at={rev}&type=true`
//! answers `{"type": "FILE"}` or `{"type": "DIRECTORY"}` instead of the
//! entry's content.

use serde::{Deserialize, Serialize};

use crate::api::hosting::{EntryKind, FileMetadata};

/// Entry type reported for files.
pub const FILE_TYPE: &str = "FILE";

/// Response of a `type=true` browse request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathType {
    /// `FILE` or `DIRECTORY`.
    #[serde(rename = "type")]
    pub entry_type: String,
}

impl PathType {
    /// Converts into [`FileMetadata`] for `path`.
    pub fn into_metadata(self, path: &str) -> FileMetadata {
        let kind = if self.entry_type.eq_ignore_ascii_case(FILE_TYPE) {
            EntryKind::File
        } else {
            EntryKind::Directory
        };
        FileMetadata {
            path: path.trim_matches('/').to_string(),
            kind,
        }
    }
}
