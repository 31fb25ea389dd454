//
//  bitbucket-context
//  cli/auth.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Token management commands.
//!
//! Tokens live in the system keyring under `<user>@<host>`, the same key
//! `bbctx resolve` reads when no `--token` is given.

use std::io::BufRead;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{Args, Subcommand};

use crate::auth::{validate_token, KeyringStore, Token};

use super::GlobalOptions;

/// Manage tokens stored in the system keyring.
#[derive(Args, Debug)]
pub struct AuthCommand {
    #[command(subcommand)]
    pub command: AuthSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum AuthSubcommand {
    /// Store a token for a host
    Login(LoginArgs),

    /// Remove the stored token for a host
    Logout,

    /// Show whether a token is stored for a host
    Status,
}

#[derive(Args, Debug)]
pub struct LoginArgs {
    /// Read the token from standard input instead of --token
    #[arg(long)]
    pub with_token: bool,

    /// Username sent with the token for HTTP Basic authentication
    #[arg(long)]
    pub username: Option<String>,

    /// When the token stops being valid (RFC 3339)
    #[arg(long)]
    pub expires_at: Option<DateTime<Utc>>,
}

impl AuthCommand {
    pub async fn run(&self, global: &GlobalOptions) -> Result<()> {
        match &self.command {
            AuthSubcommand::Login(args) => login(args, global),
            AuthSubcommand::Logout => logout(global),
            AuthSubcommand::Status => status(global),
        }
    }
}

fn login(args: &LoginArgs, global: &GlobalOptions) -> Result<()> {
    let config = global.load_config()?;
    let host = global.default_host_config(&config).host;

    let value = if args.with_token {
        read_token_from_stdin()?
    } else {
        global
            .token
            .clone()
            .context("No token given; pass --token, set BBCTX_TOKEN or use --with-token")?
    };
    if !validate_token(&value) {
        anyhow::bail!("Invalid token format");
    }

    let mut token = Token::new(value);
    if let Some(username) = &args.username {
        token = token.with_username(username.clone());
    }
    if let Some(expires_at) = args.expires_at {
        token = token.with_expiry(expires_at);
    }

    KeyringStore::new().store(&global.user, &host, &token)?;
    global
        .output()
        .write_success(&format!("Stored token for {} on {}", global.user, host));
    Ok(())
}

fn logout(global: &GlobalOptions) -> Result<()> {
    let config = global.load_config()?;
    let host = global.default_host_config(&config).host;

    KeyringStore::new().delete(&global.user, &host)?;
    global
        .output()
        .write_success(&format!("Removed token for {} on {}", global.user, host));
    Ok(())
}

fn status(global: &GlobalOptions) -> Result<()> {
    let config = global.load_config()?;
    let host = global.default_host_config(&config).host;
    let output = global.output();

    match KeyringStore::new().get(&global.user, &host)? {
        Some(token) if token.is_expired() => {
            output.write_warning(&format!("Token for {} on {} has expired", global.user, host));
        }
        Some(token) => {
            let mut message = format!("Token stored for {} on {}", global.user, host);
            if let Some(username) = &token.username {
                message.push_str(&format!(" (basic auth as {})", username));
            }
            output.write_success(&message);
        }
        None => anyhow::bail!("No token stored for {} on {}", global.user, host),
    }
    Ok(())
}

/// Reads a single line from stdin and trims it.
fn read_token_from_stdin() -> Result<String> {
    let mut line = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut line)
        .context("Failed to read token from stdin")?;
    Ok(line.trim().to_string())
}
