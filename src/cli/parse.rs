//
//  bitbucket-context
//  cli/parse.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! `bbctx parse`: offline URL splitting, useful to check a host setup.

use std::io::{self, Write};

use anyhow::Result;
use clap::Args;
use serde::Serialize;

use crate::config::HostType;
use crate::context::{navigator_hints, parse_url, NavigatorHints, UrlParts};
use crate::output::{write_field, TextOutput};

use super::GlobalOptions;

/// Split a URL into its parts without contacting Bitbucket.
#[derive(Args, Debug)]
pub struct ParseCommand {
    /// URL copied from the Bitbucket web UI
    pub url: String,
}

/// A parsed URL together with what it says about the navigator.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ParsedUrl {
    host_type: HostType,
    #[serde(flatten)]
    parts: UrlParts,
    hints: NavigatorHints,
}

impl TextOutput for ParsedUrl {
    fn write_text(&self, out: &mut dyn Write, color: bool) -> io::Result<()> {
        write_field(out, "Flavor", &self.host_type.to_string(), color)?;
        self.parts.write_text(out, color)?;
        self.hints.write_text(out, color)
    }
}

impl ParseCommand {
    pub async fn run(&self, global: &GlobalOptions) -> Result<()> {
        let config = global.load_config()?;
        let host = global.host_config_for_url(&config, &self.url)?;
        let host_type = host.host_type();

        let parts = parse_url(host_type, &host.host, &self.url)?;
        let hints = navigator_hints(host_type, &parts);

        global.output().write(&ParsedUrl {
            host_type,
            parts,
            hints,
        })
    }
}
