// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Result-summary processing

use crate::driver::types::{NotificationSeverity, ResultSummary};

/// Surface a consumed summary's notifications in the log and hand the
/// summary back.
pub fn process(summary: ResultSummary) -> ResultSummary {
    for notification in &summary.notifications {
        match notification.severity {
            NotificationSeverity::Warning => log::warn!(
                "{}: {} ({})",
                notification.code,
                notification.title,
                notification.description
            ),
            NotificationSeverity::Information => log::info!(
                "{}: {} ({})",
                notification.code,
                notification.title,
                notification.description
            ),
        }
    }
    if summary.counters.contains_updates() {
        log::debug!(
            "query updated the graph: {:?} ({} record(s) streamed)",
            summary.counters,
            summary.records_streamed
        );
    }
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::types::{Notification, SummaryCounters};

    #[test]
    fn test_process_returns_summary_unchanged() {
        let summary = ResultSummary {
            counters: SummaryCounters {
                nodes_created: 2,
                ..SummaryCounters::default()
            },
            notifications: vec![Notification {
                severity: NotificationSeverity::Warning,
                code: "Neo.ClientNotification.Statement.CartesianProduct".to_string(),
                title: "Cartesian product".to_string(),
                description: "consider adding a relationship".to_string(),
            }],
            records_streamed: 3,
            available_after_ms: None,
            consumed_after_ms: None,
        };

        let processed = process(summary.clone());
        assert_eq!(processed, summary);
    }
}
