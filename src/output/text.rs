//
//  bitbucket-context
//  output/text.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Text renderings of contexts and parsed URLs.

use std::io::{self, Write};

use super::{write_field, TextOutput};
use crate::context::{NavigatorHints, Repository, UrlParts, WorkspaceContext};

impl TextOutput for WorkspaceContext {
    fn write_text(&self, out: &mut dyn Write, color: bool) -> io::Result<()> {
        if color {
            writeln!(out, "{}", console::style(&self.title).bold())?;
        } else {
            writeln!(out, "{}", self.title)?;
        }
        writeln!(out)?;

        write_repository(out, &self.repository, color)?;
        write_field(out, "Ref", self.git_ref.as_deref().unwrap_or("-"), color)?;
        let ref_type = self
            .ref_type
            .map(|t| t.to_string())
            .unwrap_or_else(|| "-".to_string());
        write_field(out, "Ref type", &ref_type, color)?;
        write_field(out, "Revision", or_dash(&self.revision), color)?;
        write_field(out, "Path", or_dash(&self.path), color)?;
        if let Some(is_file) = self.is_file {
            write_field(out, "Kind", if is_file { "file" } else { "directory" }, color)?;
        }
        Ok(())
    }
}

fn write_repository(out: &mut dyn Write, repository: &Repository, color: bool) -> io::Result<()> {
    write_field(out, "Repository", &repository.full_name(), color)?;
    write_field(out, "Host", &repository.host, color)?;
    write_field(out, "Clone URL", &repository.clone_url, color)?;
    write_field(
        out,
        "Visibility",
        if repository.private { "private" } else { "public" },
        color,
    )?;
    write_field(out, "Default branch", &repository.default_branch, color)?;

    let mut fork = repository.fork.as_ref();
    while let Some(current) = fork {
        write_field(out, "Forked from", &current.parent.full_name(), color)?;
        fork = current.parent.fork.as_ref();
    }
    Ok(())
}

impl TextOutput for UrlParts {
    fn write_text(&self, out: &mut dyn Write, color: bool) -> io::Result<()> {
        write_field(out, "Host", &self.host, color)?;
        write_field(out, "Owner", &self.owner, color)?;
        write_field(out, "Repository", &self.repo_name, color)?;
        if !self.more_segments.is_empty() {
            write_field(out, "Segments", &self.more_segments.join("/"), color)?;
        }
        for (key, value) in &self.search_params {
            write_field(out, &format!("?{}", key), value, color)?;
        }
        Ok(())
    }
}

impl TextOutput for NavigatorHints {
    fn write_text(&self, out: &mut dyn Write, color: bool) -> io::Result<()> {
        if let Some(git_ref) = &self.git_ref {
            write_field(out, "Ref", git_ref, color)?;
        }
        if let Some(ref_type) = self.ref_type {
            write_field(out, "Ref type", &ref_type.to_string(), color)?;
        }
        if let Some(revision) = &self.revision {
            write_field(out, "Revision", revision, color)?;
        }
        if let Some(path) = &self.path {
            write_field(out, "Path", path, color)?;
        }
        if let Some(is_file) = self.is_file {
            write_field(out, "Kind", if is_file { "file" } else { "directory" }, color)?;
        }
        Ok(())
    }
}

fn or_dash(value: &str) -> &str {
    if value.is_empty() {
        "-"
    } else {
        value
    }
}
