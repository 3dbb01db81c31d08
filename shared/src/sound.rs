use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

use crate::constants::{SPIN_CUE_DURATION, SPIN_CUE_START, WIN_CUE_DURATION, WIN_CUE_START};
use crate::error::WheelError;
use crate::render::AudioSink;
use crate::ticker::Ticker;

#[derive(
    Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Cue {
    Spin,
    Win,
}

/// Where a cue lives inside the sound sprite, in seconds.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct CueSpan {
    pub start: f64,
    pub duration: f64,
}

impl CueSpan {
    pub fn duration_ms(&self) -> u64 {
        (self.duration * 1000.0).round() as u64
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct CueTable {
    pub spin: CueSpan,
    pub win: CueSpan,
}

impl Default for CueTable {
    fn default() -> Self {
        Self {
            spin: CueSpan {
                start: SPIN_CUE_START,
                duration: SPIN_CUE_DURATION,
            },
            win: CueSpan {
                start: WIN_CUE_START,
                duration: WIN_CUE_DURATION,
            },
        }
    }
}

impl CueTable {
    pub fn get(&self, cue: Cue) -> CueSpan {
        match cue {
            Cue::Spin => self.spin,
            Cue::Win => self.win,
        }
    }

    pub fn validate(&self) -> Result<(), WheelError> {
        for (name, span) in [("spin", self.spin), ("win", self.win)] {
            if !(span.start >= 0.0) || !span.start.is_finite() {
                return Err(WheelError::InvalidCue {
                    cue: name,
                    reason: "start offset must be finite and not negative",
                });
            }
            if !(span.duration > 0.0) || !span.duration.is_finite() {
                return Err(WheelError::InvalidCue {
                    cue: name,
                    reason: "duration must be positive and finite",
                });
            }
            // Looping cues re-arm after this many ms, so it must not round to zero
            if span.duration_ms() == 0 {
                return Err(WheelError::InvalidCue {
                    cue: name,
                    reason: "duration must be at least one millisecond",
                });
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Playback {
    cue: Cue,
    looping: bool,
}

/// Plays named slices of one audio element, restarting looped cues until
/// another cue supersedes them.
pub struct SoundSprite {
    cues: CueTable,
    sink: Option<Box<dyn AudioSink>>,
    playing: Option<Playback>,
    timer: Ticker,
}

impl SoundSprite {
    pub fn new(cues: CueTable) -> Self {
        Self {
            cues,
            sink: None,
            playing: None,
            timer: Ticker::one_shot(),
        }
    }

    pub fn attach(&mut self, sink: Box<dyn AudioSink>) {
        self.sink = Some(sink);
    }

    pub fn current(&self) -> Option<Cue> {
        self.playing.map(|playback| playback.cue)
    }

    pub fn is_looping(&self) -> bool {
        self.playing.map_or(false, |playback| playback.looping)
    }

    pub fn next_due(&self) -> Option<u64> {
        self.timer.next_due()
    }

    pub fn is_playing(&self) -> bool {
        self.timer.is_running()
    }

    pub fn play(&mut self, cue: Cue, looping: bool, now: u64) {
        if let Some(sink) = self.sink.as_mut() {
            sink.pause();
        }
        self.timer.cancel();

        let span = self.cues.get(cue);
        log::debug!("Playing cue '{}' at {:.3}s (loop: {})", cue, span.start, looping);
        if let Some(sink) = self.sink.as_mut() {
            sink.seek(span.start);
            sink.resume();
        }
        self.playing = Some(Playback { cue, looping });
        self.timer.start_after(now, span.duration_ms());
    }

    /// Ends the current slice once its duration has elapsed, restarting it if looped.
    pub fn on_timer(&mut self) -> Option<Cue> {
        let due = self.timer.fire()?;
        if let Some(sink) = self.sink.as_mut() {
            sink.pause();
        }
        let playback = self.playing.take()?;
        if playback.looping {
            self.play(playback.cue, true, due);
        }
        Some(playback.cue)
    }
}
