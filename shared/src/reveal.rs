use crate::activity::ActivityMachine;
use crate::config::WheelConfig;
use crate::ticker::Ticker;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RevealTiming {
    pub pause_ms: u64,
    pub final_pause_ms: u64,
    pub fade_tick_ms: u64,
    pub fade_step: f64,
    pub glyph_scale: f64,
    pub hold_during_pause: bool,
}

impl From<&WheelConfig> for RevealTiming {
    fn from(config: &WheelConfig) -> Self {
        Self {
            pause_ms: config.reveal_pause_ms,
            final_pause_ms: config.final_pause_ms,
            fade_tick_ms: config.fade_tick_ms,
            fade_step: config.fade_step,
            glyph_scale: config.glyph_scale,
            hold_during_pause: config.hold_glyph_during_pause,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RevealEvent {
    Show { value: u32, opacity: f64, scale: f64 },
    Fade { value: u32, opacity: f64, scale: f64 },
    Remove { value: u32 },
    Complete { final_number: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Phase {
    Pausing { current: u32, visible: bool },
    Fading { current: u32, opacity: f64, scale: f64 },
}

/// Counts up from 1 to the won value, flashing and fading one number at a
/// time. Number `k + 1` only starts once number `k` has been removed.
#[derive(Debug)]
pub struct RevealSequencer {
    timing: RevealTiming,
    final_number: u32,
    phase: Option<Phase>,
    pause: Ticker,
    fade: Ticker,
}

impl RevealSequencer {
    pub fn new(timing: RevealTiming) -> Self {
        Self {
            timing,
            final_number: 0,
            phase: None,
            pause: Ticker::one_shot(),
            fade: Ticker::interval(timing.fade_tick_ms),
        }
    }

    pub fn is_revealing(&self) -> bool {
        self.phase.is_some()
    }

    /// Number currently pausing or fading.
    pub fn current(&self) -> Option<u32> {
        self.phase.map(|phase| match phase {
            Phase::Pausing { current, .. } | Phase::Fading { current, .. } => current,
        })
    }

    pub fn final_number(&self) -> u32 {
        self.final_number
    }

    pub fn next_due(&self) -> Option<u64> {
        match (self.pause.next_due(), self.fade.next_due()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    pub fn pending_timers(&self) -> usize {
        usize::from(self.pause.is_running()) + usize::from(self.fade.is_running())
    }

    pub(crate) fn start(
        &mut self,
        final_number: u32,
        now: u64,
        activity: &mut ActivityMachine,
    ) -> Vec<RevealEvent> {
        self.pause.cancel();
        self.fade.cancel();
        self.final_number = final_number;

        let mut events = Vec::new();
        if final_number == 0 {
            self.phase = None;
            activity.finish_reveal();
            events.push(RevealEvent::Complete { final_number });
            return events;
        }
        self.begin_step(1, now, &mut events);
        events
    }

    pub(crate) fn on_timer(&mut self, activity: &mut ActivityMachine) -> Vec<RevealEvent> {
        let mut events = Vec::new();
        if let Some(due) = self.pause.fire() {
            self.end_pause(due, &mut events);
        } else if let Some(due) = self.fade.fire() {
            self.fade_step(due, activity, &mut events);
        }
        events
    }

    fn pause_for(&self, current: u32) -> u64 {
        if current == self.final_number {
            self.timing.final_pause_ms
        } else {
            self.timing.pause_ms
        }
    }

    fn begin_step(&mut self, current: u32, now: u64, events: &mut Vec<RevealEvent>) {
        let visible = self.timing.hold_during_pause;
        if visible {
            events.push(RevealEvent::Show {
                value: current,
                opacity: 1.0,
                scale: self.timing.glyph_scale,
            });
        }
        self.phase = Some(Phase::Pausing { current, visible });
        self.pause.start_after(now, self.pause_for(current));
    }

    fn end_pause(&mut self, now: u64, events: &mut Vec<RevealEvent>) {
        let Some(Phase::Pausing { current, visible }) = self.phase else {
            return;
        };
        if !visible {
            events.push(RevealEvent::Show {
                value: current,
                opacity: 1.0,
                scale: self.timing.glyph_scale,
            });
        }
        self.phase = Some(Phase::Fading {
            current,
            opacity: 1.0,
            scale: self.timing.glyph_scale,
        });
        self.fade.start(now);
    }

    fn fade_step(
        &mut self,
        now: u64,
        activity: &mut ActivityMachine,
        events: &mut Vec<RevealEvent>,
    ) {
        let Some(Phase::Fading {
            current,
            opacity,
            scale,
        }) = self.phase
        else {
            self.fade.cancel();
            return;
        };

        let opacity = (opacity - self.timing.fade_step).max(0.0);
        let scale = (scale - self.timing.fade_step).max(0.0);
        events.push(RevealEvent::Fade {
            value: current,
            opacity,
            scale,
        });

        if opacity > 0.0 || scale > 0.0 {
            self.phase = Some(Phase::Fading {
                current,
                opacity,
                scale,
            });
            return;
        }

        self.fade.cancel();
        events.push(RevealEvent::Remove { value: current });
        if current < self.final_number {
            self.begin_step(current + 1, now, events);
        } else {
            self.phase = None;
            activity.finish_reveal();
            events.push(RevealEvent::Complete {
                final_number: self.final_number,
            });
        }
    }
}
