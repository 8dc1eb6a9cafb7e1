use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use log::{debug, warn};

use super::ProviderError;

/// Proof that a fetch was requested. Only the latest ticket completes.
#[derive(Debug, PartialEq, Eq)]
#[must_use]
pub struct Ticket(u64);

/// The latest fetched value of some input plus the generation of the newest
/// outstanding request.
#[derive(Debug)]
pub struct Refresh<T: ?Sized> {
    current: Arc<T>,
    generation: u64,
    pending: Option<u64>,
}

impl<T: ?Sized> Refresh<T> {
    pub fn new(initial: Arc<T>) -> Self {
        Self {
            current: initial,
            generation: 0,
            pending: None,
        }
    }

    pub fn current(&self) -> &Arc<T> {
        &self.current
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Starts a fetch. Any earlier ticket becomes stale.
    pub fn begin(&mut self) -> Ticket {
        self.generation += 1;
        self.pending = Some(self.generation);
        Ticket(self.generation)
    }

    /// Hands back a fetch result. Returns whether the value was replaced.
    ///
    /// A failed fetch replaces the value with an empty one for this cycle.
    pub fn complete(&mut self, ticket: Ticket, result: Result<Arc<T>, ProviderError>) -> bool
    where
        Arc<T>: Default,
    {
        if self.pending != Some(ticket.0) {
            debug!(
                "dropping stale fetch {} (latest is {})",
                ticket.0, self.generation
            );
            return false;
        }
        self.pending = None;
        self.current = result.unwrap_or_else(|e| {
            warn!("fetch failed, using empty value: {e}");
            Arc::default()
        });
        true
    }
}

/// Collapses bursts of triggers into one action after a quiet period.
///
/// Time is passed in by the caller, so nothing here sleeps or spawns.
#[derive(Debug, Clone)]
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

    /// Pushes the deadline out to `now + delay`.
    pub fn trigger(&mut self, now: Instant) {
        self.deadline = Some(now + self.delay);
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Whether the quiet period has elapsed. Fires once per burst.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}
