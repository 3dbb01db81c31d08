/// A tick source scheduled on the wheel's millisecond clock.
///
/// The owner arms it with [`Ticker::start`] or [`Ticker::start_after`] and the
/// orchestrator calls [`Ticker::fire`] once the clock reaches [`Ticker::next_due`].
/// Interval tickers re-arm themselves after each fire; one-shot tickers disarm.
/// Cancelling or dropping a ticker discards its schedule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticker {
    period_ms: u64,
    repeat: bool,
    next_due: Option<u64>,
}

impl Ticker {
    pub fn interval(period_ms: u64) -> Self {
        Self {
            period_ms,
            repeat: true,
            next_due: None,
        }
    }

    pub fn one_shot() -> Self {
        Self {
            period_ms: 0,
            repeat: false,
            next_due: None,
        }
    }

    pub fn period_ms(&self) -> u64 {
        self.period_ms
    }

    /// Arms an interval ticker; the first fire lands one period after `now`.
    pub fn start(&mut self, now: u64) {
        self.next_due = Some(now.saturating_add(self.period_ms));
    }

    /// Arms the ticker to fire once `delay_ms` after `now`.
    pub fn start_after(&mut self, now: u64, delay_ms: u64) {
        self.next_due = Some(now.saturating_add(delay_ms));
    }

    pub fn cancel(&mut self) {
        self.next_due = None;
    }

    pub fn is_running(&self) -> bool {
        self.next_due.is_some()
    }

    pub fn next_due(&self) -> Option<u64> {
        self.next_due
    }

    pub fn is_due(&self, now: u64) -> bool {
        matches!(self.next_due, Some(due) if due <= now)
    }

    /// Consumes the pending fire and returns the time it was due at.
    pub fn fire(&mut self) -> Option<u64> {
        let due = self.next_due?;
        self.next_due = if self.repeat {
            Some(due.saturating_add(self.period_ms))
        } else {
            None
        };
        Some(due)
    }
}
