// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Bookmark-tracking query-runner wrapper
//!
//! Wraps the handle a logical operation executes against: either a session
//! the client opened itself, or an ambient transaction retrieved from the
//! task context. Only client-owned sessions are closed here, and only they
//! contribute to the bookmark set; ambient handles belong to
//! `with_transaction`.

use super::bookmarks::{Bookmark, BookmarkManager};
use super::tx::TransactionContext;
use crate::driver::traits::{QueryRunner, RecordCursor, Session};
use crate::driver::types::{DriverError, DriverResult, Statement};
use std::collections::HashSet;
use std::sync::Arc;

enum RunnerKind {
    /// An ambient transaction; lifecycle owned elsewhere.
    Ambient(TransactionContext),
    /// A session this client opened and must close.
    Owned {
        session: Box<dyn Session>,
        used_bookmarks: HashSet<Bookmark>,
    },
}

/// The runner one logical operation executes against.
pub struct DelegatingQueryRunner {
    kind: Option<RunnerKind>,
    bookmarks: Arc<BookmarkManager>,
}

impl DelegatingQueryRunner {
    pub(crate) fn ambient(context: TransactionContext, bookmarks: Arc<BookmarkManager>) -> Self {
        Self {
            kind: Some(RunnerKind::Ambient(context)),
            bookmarks,
        }
    }

    pub(crate) fn owned(
        session: Box<dyn Session>,
        used_bookmarks: HashSet<Bookmark>,
        bookmarks: Arc<BookmarkManager>,
    ) -> Self {
        Self {
            kind: Some(RunnerKind::Owned {
                session,
                used_bookmarks,
            }),
            bookmarks,
        }
    }

    /// Whether this runner wraps a session the client opened itself.
    pub fn is_client_owned(&self) -> bool {
        matches!(self.kind, Some(RunnerKind::Owned { .. }))
    }

    /// Submit a statement to the wrapped handle.
    pub async fn run(&mut self, statement: Statement) -> DriverResult<Box<dyn RecordCursor>> {
        match self.kind.as_mut() {
            Some(RunnerKind::Ambient(context)) => context.run(statement).await,
            Some(RunnerKind::Owned { session, .. }) => session.run(statement).await,
            None => Err(DriverError::SessionClosed),
        }
    }

    /// Release the runner: close a client-owned session and swap the
    /// bookmarks it consumed for the one it produced. Releasing an ambient
    /// runner is a no-op.
    pub async fn release(mut self) -> DriverResult<()> {
        match self.kind.take() {
            Some(RunnerKind::Owned {
                mut session,
                used_bookmarks,
            }) => {
                session.close().await?;
                self.bookmarks
                    .update(&used_bookmarks, session.last_bookmark());
                Ok(())
            }
            Some(RunnerKind::Ambient(_)) | None => Ok(()),
        }
    }
}

impl Drop for DelegatingQueryRunner {
    fn drop(&mut self) {
        // Backstop for abandoned or cancelled executions: the session still
        // gets closed and the bookmark swap still happens, off-task.
        if let Some(RunnerKind::Owned {
            mut session,
            used_bookmarks,
        }) = self.kind.take()
        {
            log::debug!("query runner dropped without release; closing session in background");
            let bookmarks = self.bookmarks.clone();
            if let Ok(handle) = tokio::runtime::Handle::try_current() {
                handle.spawn(async move {
                    match session.close().await {
                        Ok(()) => bookmarks.update(&used_bookmarks, session.last_bookmark()),
                        Err(e) => log::warn!("failed to close abandoned session: {}", e),
                    }
                });
            } else {
                log::warn!("no runtime available to close abandoned session");
            }
        }
    }
}
