use crate::constants::{ARROW_MAX_TILT, ARROW_TILT_STEP};
use crate::ticker::Ticker;

/// Decorative arrow tilt that dips and springs back on every sector crossing.
///
/// A new trigger cancels the running shake but keeps the current tilt, so
/// rapid crossings compound into one continuous wobble instead of snapping
/// the arrow back to rest.
#[derive(Debug)]
pub struct ArrowShaker {
    tilt: f64,
    increment: f64,
    timer: Ticker,
}

impl ArrowShaker {
    pub fn new(tick_ms: u64) -> Self {
        Self {
            tilt: 0.0,
            increment: -ARROW_TILT_STEP,
            timer: Ticker::interval(tick_ms),
        }
    }

    pub fn tilt(&self) -> f64 {
        self.tilt
    }

    pub fn is_shaking(&self) -> bool {
        self.timer.is_running()
    }

    pub fn next_due(&self) -> Option<u64> {
        self.timer.next_due()
    }

    pub fn trigger(&mut self, now: u64) {
        self.timer.cancel();
        self.increment = -ARROW_TILT_STEP;
        self.timer.start(now);
    }

    /// Advances the shake by one tick and returns the new tilt.
    pub fn on_tick(&mut self) -> Option<f64> {
        self.timer.fire()?;
        if self.tilt <= -ARROW_MAX_TILT {
            self.increment = ARROW_TILT_STEP;
        }
        self.tilt = (self.tilt + self.increment).max(-ARROW_MAX_TILT);
        if self.tilt >= 0.0 {
            self.tilt = 0.0;
            self.timer.cancel();
        }
        Some(self.tilt)
    }
}
