// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! CLI command handlers for GraphLink

use colored::Colorize;
use rustyline::{error::ReadlineError, CompletionType, Config, EditMode, Editor};
use std::path::Path;
use tokio::runtime::Runtime;

use super::commands::OutputFormat;
use super::output::ResultFormatter;
use graphlink::{
    translate_driver_error, ClientConfig, GraphClient, Record, RecordCursor, ResultSummary,
    Statement,
};

/// Build the client configuration and connect.
fn connect(
    rt: &Runtime,
    uri: &str,
    user: Option<String>,
    password: Option<String>,
    database: Option<String>,
) -> Result<GraphClient, Box<dyn std::error::Error>> {
    let memory = uri.starts_with("memory://");

    // The in-process demo driver needs no credentials.
    let (username, password) = if memory {
        (user.unwrap_or_default(), password.unwrap_or_default())
    } else {
        let username = user.unwrap_or_else(|| {
            print!("Username: ");
            std::io::Write::flush(&mut std::io::stdout()).unwrap();
            let mut input = String::new();
            std::io::stdin().read_line(&mut input).unwrap();
            input.trim().to_string()
        });
        let password = match password {
            Some(pwd) => pwd,
            None => {
                print!("Password: ");
                std::io::Write::flush(&mut std::io::stdout())?;
                rpassword::read_password()?
            }
        };
        (username, password)
    };

    let mut builder = ClientConfig::builder(uri).username(username).password(password);
    if let Some(database) = database {
        builder = builder.database(database);
    }
    let config = builder.build()?;

    let client = rt.block_on(GraphClient::connect(config))?;
    Ok(client)
}

/// Execute one query through the delegation interface, collecting both the
/// records and the result summary.
fn execute(
    rt: &Runtime,
    client: &GraphClient,
    cypher: String,
) -> graphlink::Result<(Vec<Record>, ResultSummary)> {
    rt.block_on(
        client
            .delegate_to(move |runner| {
                Box::pin(async move {
                    let mut cursor = runner
                        .run(Statement::new(&cypher))
                        .await
                        .map_err(translate_driver_error)?;
                    let mut records = Vec::new();
                    while let Some(record) =
                        cursor.next().await.map_err(translate_driver_error)?
                    {
                        records.push(record);
                    }
                    let summary = cursor.consume().await.map_err(translate_driver_error)?;
                    Ok((records, summary))
                })
            })
            .run(),
    )
}

/// Handle the query command (one-off query execution)
pub fn handle_query(
    rt: &Runtime,
    uri: &str,
    user: Option<String>,
    password: Option<String>,
    database: Option<String>,
    query: String,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let client = connect(rt, uri, user, password, database)?;

    match execute(rt, &client, query) {
        Ok((records, summary)) => {
            println!("{}", ResultFormatter::format(&records, &summary, format));
            Ok(())
        }
        Err(e) => {
            eprintln!("{}", format!("Error: {}", e).red());
            Err(e.into())
        }
    }
}

/// Handle the console (REPL) command
pub fn handle_console(
    rt: &Runtime,
    uri: &str,
    user: Option<String>,
    password: Option<String>,
    database: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let client = connect(rt, uri, user, password, database)?;

    println!("{}", "GraphLink".bold().green());
    println!("Connected to {}", uri.cyan());
    println!("Type 'help' for commands, 'exit' or 'quit' to exit");
    println!("Multi-line queries supported - use ';' to terminate\n");

    let config = Config::builder()
        .edit_mode(EditMode::Emacs)
        .history_ignore_space(true)
        .completion_type(CompletionType::List)
        .auto_add_history(false)
        .build();

    let mut rl = Editor::<(), _>::with_config(config)?;

    let history_path = ".graphlink/.cypher_history.txt";
    if let Some(parent) = Path::new(&history_path).parent() {
        std::fs::create_dir_all(parent)?;
    }

    let _ = rl.load_history(&history_path);

    let mut query_buffer = String::new();

    loop {
        let prompt = if query_buffer.is_empty() {
            "cypher> ".to_string()
        } else {
            "   ...> ".to_string()
        };

        let line = match rl.readline(&prompt) {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) => {
                if !query_buffer.is_empty() {
                    query_buffer.clear();
                    println!("{}", "\nQuery buffer cleared".yellow());
                }
                continue;
            }
            Err(ReadlineError::Eof) => {
                println!("{}", "Goodbye!".green());
                break;
            }
            Err(err) => {
                eprintln!("{}", format!("Error: {:?}", err).red());
                break;
            }
        };

        let trimmed = line.trim();

        // Handle special commands
        if query_buffer.is_empty() {
            match trimmed.to_lowercase().as_str() {
                "exit" | "quit" => {
                    println!("{}", "Goodbye!".green());
                    break;
                }
                "help" => {
                    print_help();
                    continue;
                }
                "clear" => {
                    print!("\x1B[2J\x1B[1;1H");
                    std::io::Write::flush(&mut std::io::stdout()).unwrap();
                    continue;
                }
                "" => continue,
                _ => {}
            }
        }

        // Append line to buffer
        query_buffer.push_str(&line);
        query_buffer.push('\n');

        // Check if query is complete (ends with semicolon)
        if trimmed.ends_with(';') {
            let query = query_buffer.trim().trim_end_matches(';').to_string();
            rl.add_history_entry(query_buffer.trim())?;

            match execute(rt, &client, query) {
                Ok((records, summary)) => {
                    let output =
                        ResultFormatter::format(&records, &summary, OutputFormat::Table);
                    println!("{}", output);
                }
                Err(e) => {
                    eprintln!("{}", format!("Error: {}", e).red());
                }
            }

            query_buffer.clear();
        }
    }

    // Save history
    let _ = rl.save_history(&history_path);

    Ok(())
}

/// Print help message
fn print_help() {
    println!("{}", "Available commands:".bold().green());
    println!("  {}  - Show this help message", "help".cyan());
    println!("  {}  - Exit the console", "exit/quit".cyan());
    println!("  {}  - Clear the screen", "clear".cyan());
    println!("\n{}", "Query syntax:".bold().green());
    println!("  Multi-line queries are supported");
    println!("  Terminate queries with semicolon (;)");
    println!("\n{}", "Examples:".bold().green());
    println!("  {}", "MATCH (n:Person) RETURN n.name;".yellow());
    println!("  {}", "CREATE (p:Person {{name: 'Alice'}});".yellow());
}
