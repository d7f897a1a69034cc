// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! GraphLink CLI entry point

use clap::Parser;
use colored::Colorize;

mod cli;
use cli::{Cli, Commands};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command line arguments first to get log level
    let cli = Cli::parse();

    // Determine log level from CLI args or environment variable
    let log_level = if cli.verbose {
        // -v/--verbose flag takes precedence
        log::LevelFilter::Debug
    } else if let Some(level) = cli.log_level {
        // --log-level flag
        level.to_level_filter()
    } else {
        // Default to Warn (can still be overridden by RUST_LOG env var)
        log::LevelFilter::Warn
    };

    // Initialize logger
    env_logger::Builder::from_default_env()
        .filter_level(log_level)
        .init();

    // The client is async; the console drives it through one runtime.
    let rt = tokio::runtime::Runtime::new()?;

    // Handle commands
    match cli.command {
        Commands::Version => {
            println!("{} {}", "GraphLink".bold().green(), graphlink::VERSION);
            println!("Reactive client for Bolt graph databases");
            Ok(())
        }

        Commands::Query { query, format } => cli::handle_query(
            &rt,
            &cli.uri,
            cli.user,
            cli.password,
            cli.database,
            query,
            format,
        ),

        Commands::Console => {
            cli::handle_console(&rt, &cli.uri, cli.user, cli.password, cli.database)
        }
    }
}
