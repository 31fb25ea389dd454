//
//  bitbucket-context
//  main.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use bitbucket_context::cli::{Cli, Commands};
use bitbucket_context::context::ContextError;
use bitbucket_context::exit_codes;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    init_logging();

    // Parse CLI arguments
    let cli = Cli::parse();

    // Execute command
    let result = run(cli).await;

    // Handle result and exit
    match result {
        Ok(()) => std::process::exit(exit_codes::SUCCESS),
        Err(e) => {
            eprintln!("Error: {e:#}");
            std::process::exit(exit_code(&e));
        }
    }
}

/// Initialize logging based on environment
fn init_logging() {
    let filter = EnvFilter::try_from_env("BBCTX_DEBUG")
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

/// Maps resolver errors to their exit code
fn exit_code(e: &anyhow::Error) -> i32 {
    e.downcast_ref::<ContextError>()
        .map(ContextError::exit_code)
        .unwrap_or(exit_codes::ERROR)
}

/// Main command dispatcher
async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Resolve(cmd) => cmd.run(&cli.global).await,
        Commands::Parse(cmd) => cmd.run(&cli.global).await,
        Commands::Auth(cmd) => cmd.run(&cli.global).await,
        Commands::Version => {
            println!("bbctx version {}", bitbucket_context::VERSION);
            Ok(())
        }
    }
}
