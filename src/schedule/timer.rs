use std::time::{Duration, Instant};

/// A cancellable single-shot timer.
///
/// At most one deadline is pending; scheduling again replaces it. The event
/// loop asks for the deadline to size its input poll and calls
/// [`TickTimer::fire_if_due`] once per iteration.
#[derive(Debug, Default, Clone)]
pub struct TickTimer {
    deadline: Option<Instant>,
}

impl TickTimer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule_at(&mut self, at: Instant) {
        self.deadline = Some(at);
    }

    pub fn schedule_in(&mut self, now: Instant, delay: Duration) {
        self.schedule_at(now + delay);
    }

    /// Drop the pending deadline, returning whether one was pending.
    pub fn cancel(&mut self) -> bool {
        self.deadline.take().is_some()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Time left until the deadline, zero when overdue.
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.deadline.map(|d| d.saturating_duration_since(now))
    }

    /// Consume the deadline if it has passed. A fired timer stays idle until
    /// scheduled again.
    pub fn fire_if_due(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(d) if d <= now => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}
