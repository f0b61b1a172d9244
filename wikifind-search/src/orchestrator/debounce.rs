//! Quiet-window debouncing with logical cancellation.
//!
//! Every call to [`Debouncer::schedule`] takes a fresh [`RequestTicket`] from
//! a shared, monotonically increasing sequence. The task only runs if its
//! ticket is still the newest one when the quiet window ends, so a burst of
//! schedules collapses into a single run with the last arguments.
//!
//! Tickets stay useful after the task starts: a running cycle checks
//! [`RequestTicket::is_current`] before applying its result. Nothing is ever
//! aborted; a superseded fetch completes in the background and is ignored.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;

/// Proof of which request a piece of work belongs to.
#[derive(Debug, Clone)]
pub struct RequestTicket {
    id: u64,
    latest: Arc<AtomicU64>,
}

impl RequestTicket {
    /// Sequence number of this request.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// True while no newer request has been issued.
    pub fn is_current(&self) -> bool {
        self.latest.load(Ordering::SeqCst) == self.id
    }
}

/// Coalesces bursts of requests into the last one.
#[derive(Debug, Clone)]
pub struct Debouncer {
    wait: Duration,
    sequence: Arc<AtomicU64>,
}

impl Debouncer {
    /// Create a debouncer with the given quiet window.
    pub fn new(wait: Duration) -> Self {
        Self {
            wait,
            sequence: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Issue a new ticket, superseding every earlier one.
    pub fn issue(&self) -> RequestTicket {
        let id = self.sequence.fetch_add(1, Ordering::SeqCst) + 1;
        RequestTicket {
            id,
            latest: Arc::clone(&self.sequence),
        }
    }

    /// Supersede all outstanding tickets without starting new work.
    pub fn cancel_pending(&self) {
        self.sequence.fetch_add(1, Ordering::SeqCst);
    }

    /// Schedule `task` to run after the quiet window.
    ///
    /// The returned handle resolves to `None` if a newer request was issued
    /// before the window ended (the task never ran), otherwise to the
    /// task's output.
    pub fn schedule<F, Fut, T>(&self, task: F) -> JoinHandle<Option<T>>
    where
        F: FnOnce(RequestTicket) -> Fut + Send + 'static,
        Fut: Future<Output = T> + Send + 'static,
        T: Send + 'static,
    {
        let ticket = self.issue();
        let wait = self.wait;
        tokio::spawn(async move {
            tokio::time::sleep(wait).await;
            if !ticket.is_current() {
                tracing::debug!(ticket = ticket.id(), "request coalesced");
                return None;
            }
            Some(task(ticket).await)
        })
    }
}
