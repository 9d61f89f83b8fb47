use std::time::Duration;

use crate::config::ScheduleSettings;

/// Discrete exponential decay from `from` towards `to`.
///
/// The `n`th call to [`DecayScheduler::next`] returns
/// `d * from + (1 - d) * to` with `d = 0.5^(n / half_life)`, so the first call
/// yields exactly `from` and later calls approach `to` without reaching it.
#[derive(Debug, Clone)]
pub struct DecayScheduler {
    from: f64,
    to: f64,
    half_life: f64,
    count: u64,
}

impl DecayScheduler {
    pub fn new(from: f64, to: f64, half_life: f64) -> Self {
        Self {
            from,
            to,
            half_life,
            count: 0,
        }
    }

    /// Scheduler measuring tick delays in milliseconds.
    pub fn from_settings(settings: &ScheduleSettings) -> Self {
        Self::new(
            settings.initial_ms as f64,
            settings.steady_ms as f64,
            settings.half_life,
        )
    }

    /// Number of values produced so far.
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Produce the next value and advance the counter.
    pub fn next_value(&mut self) -> f64 {
        let decay = 0.5f64.powf(self.count as f64 / self.half_life);
        self.count += 1;
        decay * self.from + (1.0 - decay) * self.to
    }

    /// Produce the next value interpreted as a millisecond delay.
    pub fn next(&mut self) -> Duration {
        let ms = self.next_value().max(0.0);
        Duration::from_secs_f64(ms / 1000.0)
    }
}
