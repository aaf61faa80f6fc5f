#![forbid(unsafe_code)]

//! Deterministic one-shot timers driven by an explicit clock.

use std::collections::BTreeMap;
use std::time::Duration;

use crate::host::{TimerHost, TimerId};

/// Timer queue whose clock only moves when the host calls
/// [`advance`](DeterministicTimers::advance).
#[derive(Debug, Clone, Default)]
pub struct DeterministicTimers {
    now: Duration,
    next_id: u64,
    pending: BTreeMap<TimerId, Duration>,
}

impl DeterministicTimers {
    /// Create a queue with the clock at zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current monotonic time.
    #[must_use]
    pub const fn now(&self) -> Duration {
        self.now
    }

    /// Advance the clock by `dt` and return the timers that came due, in
    /// deadline order (ties broken by creation order). Returned timers are
    /// no longer pending.
    pub fn advance(&mut self, dt: Duration) -> Vec<TimerId> {
        self.now = self.now.saturating_add(dt);
        let mut due: Vec<(Duration, TimerId)> = self
            .pending
            .iter()
            .filter(|(_, deadline)| **deadline <= self.now)
            .map(|(id, deadline)| (*deadline, *id))
            .collect();
        due.sort();
        for (_, id) in &due {
            self.pending.remove(id);
        }
        due.into_iter().map(|(_, id)| id).collect()
    }

    /// Whether `id` is scheduled and has not fired or been cleared.
    #[must_use]
    pub fn is_pending(&self, id: TimerId) -> bool {
        self.pending.contains_key(&id)
    }

    /// Number of scheduled timers.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Deadline of a scheduled timer.
    #[must_use]
    pub fn deadline(&self, id: TimerId) -> Option<Duration> {
        self.pending.get(&id).copied()
    }
}

impl TimerHost for DeterministicTimers {
    fn set_timer(&mut self, duration: Duration) -> TimerId {
        self.next_id += 1;
        let id = TimerId(self.next_id);
        self.pending.insert(id, self.now.saturating_add(duration));
        id
    }

    fn clear_timer(&mut self, id: TimerId) {
        self.pending.remove(&id);
    }
}
