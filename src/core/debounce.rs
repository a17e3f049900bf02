//! Cooperative debounce timer for use inside a `tokio::select!` loop.

use std::time::Duration;
use tokio::time::{Instant, sleep_until};
use tracing::debug;

/// Coalesces bursts of triggers into a single firing `delay` after the
/// last one.
///
/// Scheduling again before the deadline supersedes the pending firing.
/// [`Debouncer::fired`] never completes while nothing is scheduled, so it
/// is safe to poll from a `select!` arm on every loop iteration.
#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    deadline: Option<Instant>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            deadline: None,
        }
    }

    pub fn schedule(&mut self) {
        if self.deadline.is_some() {
            debug!("Superseding pending debounce");
        }
        self.deadline = Some(Instant::now() + self.delay);
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Completes once the current deadline passes, then disarms.
    pub async fn fired(&mut self) {
        match self.deadline {
            Some(deadline) => {
                sleep_until(deadline).await;
                self.deadline = None;
            }
            None => std::future::pending::<()>().await,
        }
    }
}
