use serde::{Deserialize, Serialize};
use strum::Display;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default, Display)]
#[strum(serialize_all = "lowercase")]
pub enum ActivityState {
    #[default]
    Idle,
    Spinning,
    Revealing,
}

/// Gates user input while the wheel spins or reveals a result.
///
/// Only the animation scheduler and the reveal sequencer move the state, so
/// the transitions are crate-private. Each transition only applies from its
/// expected source state and reports whether it did.
#[derive(Debug, Default)]
pub struct ActivityMachine {
    state: ActivityState,
}

impl ActivityMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> ActivityState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state != ActivityState::Idle
    }

    /// Whether a spin request would be accepted right now.
    pub fn can_spin(&self) -> bool {
        self.state == ActivityState::Idle
    }

    pub(crate) fn begin_spin(&mut self) -> bool {
        self.transition(ActivityState::Idle, ActivityState::Spinning)
    }

    pub(crate) fn finish_spin(&mut self) -> bool {
        self.transition(ActivityState::Spinning, ActivityState::Revealing)
    }

    pub(crate) fn finish_reveal(&mut self) -> bool {
        self.transition(ActivityState::Revealing, ActivityState::Idle)
    }

    fn transition(&mut self, from: ActivityState, to: ActivityState) -> bool {
        if self.state != from {
            log::warn!("Ignoring transition {} -> {} while {}", from, to, self.state);
            return false;
        }
        log::debug!("Wheel state {} -> {}", from, to);
        self.state = to;
        true
    }
}
