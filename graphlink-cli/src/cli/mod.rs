// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! CLI module for GraphLink
//!
//! Provides the command-line interface: an interactive Cypher console
//! (REPL) and one-off query execution against a configured server.

pub mod commands;
pub mod console;
pub mod output;

pub use commands::{Cli, Commands};
pub use console::{handle_console, handle_query};
