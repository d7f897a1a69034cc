// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Result formatting for CLI output

use super::commands::OutputFormat;
use colored::*;
use comfy_table::{presets::UTF8_FULL, Cell, Color, Table};
use graphlink::{Record, ResultSummary, Value};

/// Result formatter for different output formats
pub struct ResultFormatter;

impl ResultFormatter {
    /// Format query results in the specified format
    pub fn format(records: &[Record], summary: &ResultSummary, format: OutputFormat) -> String {
        match format {
            OutputFormat::Table => Self::format_table(records, summary),
            OutputFormat::Json => Self::format_json(records),
            OutputFormat::Csv => Self::format_csv(records),
        }
    }

    fn columns(records: &[Record]) -> Vec<String> {
        records
            .first()
            .map(|record| record.columns().to_vec())
            .unwrap_or_default()
    }

    /// Format results as a table using comfy-table
    fn format_table(records: &[Record], summary: &ResultSummary) -> String {
        if records.is_empty() {
            let mut output = format!("{}\n", "No results found".yellow());
            if summary.counters.contains_updates() {
                output.push_str(&Self::format_counters(summary));
            }
            return output;
        }

        let mut output = String::new();
        output.push_str(&format!("{}\n", "Query Results".bold().green()));
        output.push_str(&format!("Rows returned: {}\n\n", records.len()));

        let columns = Self::columns(records);

        let mut table = Table::new();
        table.load_preset(UTF8_FULL);

        let header_cells: Vec<Cell> = columns
            .iter()
            .map(|col| Cell::new(col).fg(Color::Green))
            .collect();
        table.set_header(header_cells);

        for record in records {
            let row_values: Vec<String> = columns
                .iter()
                .map(|col| {
                    record
                        .get(col)
                        .map(|v| v.to_string())
                        .unwrap_or_else(|| "NULL".to_string())
                })
                .collect();
            table.add_row(row_values);
        }

        output.push_str(&table.to_string());
        output.push('\n');

        if summary.counters.contains_updates() {
            output.push_str(&Self::format_counters(summary));
        }

        output
    }

    /// Format results as JSON
    fn format_json(records: &[Record]) -> String {
        let columns = Self::columns(records);
        let json_result = serde_json::json!({
            "status": "success",
            "columns": columns,
            "rows": records.iter().map(|record| {
                let mut row_map = serde_json::Map::new();
                for col in record.columns() {
                    let value = record.get(col)
                        .map(|v| v.to_json())
                        .unwrap_or(serde_json::Value::Null);
                    row_map.insert(col.clone(), value);
                }
                serde_json::Value::Object(row_map)
            }).collect::<Vec<_>>(),
            "row_count": records.len(),
        });

        serde_json::to_string_pretty(&json_result).unwrap_or_else(|_| {
            "{\"status\": \"error\", \"error\": \"Could not serialize results to JSON\"}"
                .to_string()
        })
    }

    /// Format results as CSV
    fn format_csv(records: &[Record]) -> String {
        let columns = Self::columns(records);
        let mut output = String::new();

        output.push_str(&columns.join(","));
        output.push('\n');

        for record in records {
            let row_values: Vec<String> = columns
                .iter()
                .map(|col| {
                    record
                        .get(col)
                        .map(Self::value_to_csv_string)
                        .unwrap_or_default()
                })
                .collect();
            output.push_str(&row_values.join(","));
            output.push('\n');
        }

        output
    }

    fn format_counters(summary: &ResultSummary) -> String {
        let c = summary.counters;
        let mut parts = Vec::new();
        if c.nodes_created > 0 {
            parts.push(format!("{} node(s) created", c.nodes_created));
        }
        if c.nodes_deleted > 0 {
            parts.push(format!("{} node(s) deleted", c.nodes_deleted));
        }
        if c.relationships_created > 0 {
            parts.push(format!("{} relationship(s) created", c.relationships_created));
        }
        if c.relationships_deleted > 0 {
            parts.push(format!("{} relationship(s) deleted", c.relationships_deleted));
        }
        if c.properties_set > 0 {
            parts.push(format!("{} property(ies) set", c.properties_set));
        }
        if parts.is_empty() {
            return String::new();
        }
        format!("{}\n", parts.join(", ").cyan())
    }

    /// Convert a Value to a CSV-safe string
    fn value_to_csv_string(value: &Value) -> String {
        let s = value.to_string();
        if s.contains(',') || s.contains('"') || s.contains('\n') {
            format!("\"{}\"", s.replace('"', "\"\""))
        } else {
            s
        }
    }
}
