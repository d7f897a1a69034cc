// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! CLI command definitions for GraphLink

use clap::{Parser, Subcommand, ValueEnum};

/// Log level options
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum LogLevel {
    /// Only errors
    Error,
    /// Warnings and errors
    Warn,
    /// Info, warnings, and errors
    Info,
    /// Debug messages and above (verbose)
    Debug,
    /// All messages including trace (very verbose)
    Trace,
    /// Disable all logging
    Off,
}

impl LogLevel {
    /// Convert to log::LevelFilter
    pub fn to_level_filter(self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
            LogLevel::Off => log::LevelFilter::Off,
        }
    }
}

/// Output format options
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table output
    Table,
    /// JSON output
    Json,
    /// CSV output
    Csv,
}

/// GraphLink CLI - reactive graph database console
#[derive(Parser)]
#[command(name = "graphlink")]
#[command(about = "GraphLink - A reactive client console for Bolt graph databases")]
#[command(version)]
pub struct Cli {
    /// Server URI (bolt://, neo4j://, or memory:// for the in-process demo driver)
    #[arg(long, global = true, default_value = "bolt://localhost:7687")]
    pub uri: String,

    /// Username for authentication
    #[arg(short = 'u', long = "user", global = true)]
    pub user: Option<String>,

    /// Password for authentication (if not provided, will be prompted)
    #[arg(short = 'p', long = "password", global = true)]
    pub password: Option<String>,

    /// Target database (server default if omitted)
    #[arg(short = 'd', long = "database", global = true)]
    pub database: Option<String>,

    /// Set log level (error, warn, info, debug, trace, off)
    #[arg(short = 'l', long = "log-level", global = true, value_enum)]
    pub log_level: Option<LogLevel>,

    /// Verbose mode (equivalent to --log-level debug)
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Show detailed version information
    Version,

    /// Execute a single Cypher query
    Query {
        /// The Cypher query to execute
        query: String,

        /// Output format
        #[arg(short, long, default_value = "table")]
        format: OutputFormat,
    },

    /// Interactive Cypher console (REPL)
    Console,
}
