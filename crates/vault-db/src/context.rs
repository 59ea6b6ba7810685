//! # Request Context
//!
//! Deadline and cancellation signal threaded through every storage call.
//!
//! ## How It Works
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  RequestContext::cancellable() ──► (root ctx, CancelHandle)            │
//! │       │                                                                 │
//! │       │  per request: root.clone().with_timeout(5s)                    │
//! │       ▼                                                                 │
//! │  ctx.run(storage future)                                               │
//! │       │                                                                 │
//! │       ├── future finishes first      → its result                      │
//! │       ├── CancelHandle::cancel()     → StorageError::Cancelled         │
//! │       └── deadline reached           → StorageError::DeadlineExceeded  │
//! │                                                                         │
//! │  Dropping the storage future aborts the in-flight statement.           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Children cloned from a context share its cancellation signal; a timeout
//! only ever tightens the deadline.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::Instant;

use crate::error::{StorageError, StorageResult};

/// Caller-supplied deadline and cancellation for one logical operation.
#[derive(Debug, Clone)]
pub struct RequestContext {
    deadline: Option<Instant>,
    cancelled: watch::Receiver<bool>,
}

/// Cancels every context derived from the root it was created with.
#[derive(Debug, Clone)]
pub struct CancelHandle {
    tx: Arc<watch::Sender<bool>>,
}

impl CancelHandle {
    /// Signals cancellation. Idempotent.
    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }

    /// Returns true once `cancel` has been called.
    pub fn is_cancelled(&self) -> bool {
        *self.tx.borrow()
    }
}

impl RequestContext {
    /// A context that is never cancelled and has no deadline.
    ///
    /// Used for startup work such as schema bootstrap.
    pub fn background() -> Self {
        let (_tx, rx) = watch::channel(false);
        RequestContext {
            deadline: None,
            cancelled: rx,
        }
    }

    /// A root context plus the handle that cancels it.
    pub fn cancellable() -> (Self, CancelHandle) {
        let (tx, rx) = watch::channel(false);
        (
            RequestContext {
                deadline: None,
                cancelled: rx,
            },
            CancelHandle { tx: Arc::new(tx) },
        )
    }

    /// Returns a context whose deadline is at most `timeout` from now.
    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    /// Returns a context whose deadline is at most `deadline`.
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(match self.deadline {
            Some(current) if current < deadline => current,
            _ => deadline,
        });
        self
    }

    /// The deadline, if any.
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Returns true once the cancel handle fired.
    pub fn is_cancelled(&self) -> bool {
        *self.cancelled.borrow()
    }

    /// Fails fast if the context is already cancelled or expired.
    pub fn check(&self) -> StorageResult<()> {
        if self.is_cancelled() {
            return Err(StorageError::Cancelled);
        }
        if matches!(self.deadline, Some(deadline) if Instant::now() >= deadline) {
            return Err(StorageError::DeadlineExceeded);
        }
        Ok(())
    }

    /// Runs a storage future under this context.
    ///
    /// Cancellation wins over a result that becomes ready at the same time.
    pub async fn run<T, F>(&self, operation: F) -> StorageResult<T>
    where
        F: Future<Output = StorageResult<T>>,
    {
        self.check()?;

        let mut cancelled = self.cancelled.clone();
        let cancel_signal = async move {
            loop {
                if *cancelled.borrow_and_update() {
                    return;
                }
                if cancelled.changed().await.is_err() {
                    // Sender gone: nobody can cancel any more.
                    std::future::pending::<()>().await;
                }
            }
        };

        let deadline = self.deadline;
        let expiry = async move {
            match deadline {
                Some(deadline) => tokio::time::sleep_until(deadline).await,
                None => std::future::pending::<()>().await,
            }
        };

        tokio::select! {
            biased;
            _ = cancel_signal => Err(StorageError::Cancelled),
            _ = expiry => Err(StorageError::DeadlineExceeded),
            result = operation => result,
        }
    }
}

impl Default for RequestContext {
    fn default() -> Self {
        RequestContext::background()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
