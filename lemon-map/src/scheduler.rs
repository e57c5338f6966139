use std::time::{Duration, Instant};

/// Actions that must run once a deadline has passed, polled from the frame loop.
pub struct Scheduler<T> {
    pending: Vec<(Instant, T)>,
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Scheduler<T> {
    pub fn new() -> Self {
        Self {
            pending: Vec::new(),
        }
    }

    pub fn schedule_after(&mut self, now: Instant, delay: Duration, action: T) {
        self.pending.push((now + delay, action));
    }

    /// Removes and returns every action whose deadline is not after `now`,
    /// earliest first. Actions sharing a deadline keep their scheduling order.
    pub fn take_due(&mut self, now: Instant) -> Vec<T> {
        let (mut due, pending): (Vec<_>, Vec<_>) = self
            .pending
            .drain(..)
            .partition(|(deadline, _)| *deadline <= now);
        self.pending = pending;

        due.sort_by_key(|(deadline, _)| *deadline);
        due.into_iter().map(|(_, action)| action).collect()
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.pending.iter().map(|(deadline, _)| *deadline).min()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
