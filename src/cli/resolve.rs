//
//  bitbucket-context
//  cli/resolve.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! `bbctx resolve`: the full resolution against a live Bitbucket host.

use std::sync::Arc;

use anyhow::Result;
use clap::Args;
use tracing::debug;

use crate::api::BitbucketApiFactory;
use crate::auth::{
    validate_token, KeyringTokenProvider, StaticTokenProvider, Token, TokenProvider, User,
};
use crate::context::{ContextResolver, ResolverOptions};

use super::GlobalOptions;

/// Resolve a URL into a workspace context.
#[derive(Args, Debug)]
pub struct ResolveCommand {
    /// URL copied from the Bitbucket web UI
    pub url: String,

    /// Username for HTTP Basic authentication (hosts with auth = "basic")
    #[arg(long)]
    pub username: Option<String>,

    /// Number of fork ancestors to include (overrides the config file)
    #[arg(long)]
    pub max_fork_depth: Option<u32>,
}

impl ResolveCommand {
    pub async fn run(&self, global: &GlobalOptions) -> Result<()> {
        let config = global.load_config()?;
        let host = global.host_config_for_url(&config, &self.url)?;
        debug!(host = %host.host, flavor = %host.host_type(), "resolving");

        let tokens: Arc<dyn TokenProvider> = match &global.token {
            Some(value) => {
                if !validate_token(value) {
                    anyhow::bail!("Invalid token format");
                }
                let mut token = Token::new(value.clone());
                if let Some(username) = &self.username {
                    token = token.with_username(username.clone());
                }
                Arc::new(StaticTokenProvider::new(token))
            }
            None => Arc::new(KeyringTokenProvider::new(host.host.clone())),
        };

        let options = ResolverOptions {
            max_fork_depth: self
                .max_fork_depth
                .unwrap_or(config.resolver.max_fork_depth),
        };
        let factory = Arc::new(BitbucketApiFactory::new(host.clone(), tokens.clone()));
        let resolver = ContextResolver::new(host.host.clone(), host.host_type(), factory, tokens)
            .with_options(options);

        let context = resolver.handle(&User::new(global.user.clone()), &self.url).await?;
        global.output().write(&context)
    }
}
