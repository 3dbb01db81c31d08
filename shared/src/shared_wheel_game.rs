use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::activity::{ActivityMachine, ActivityState};
use crate::arrow::ArrowShaker;
use crate::config::WheelConfig;
use crate::error::WheelError;
use crate::render::{AudioSink, Glyph, GlyphHandle, Renderer};
use crate::reveal::{RevealEvent, RevealSequencer, RevealTiming};
use crate::scheduler::{AnimationScheduler, SpinStep};
use crate::sound::{Cue, SoundSprite};
use crate::spin_engine::{SectorTable, SpinEngine, SpinPlan};

/// Represents the result of a wheel spin
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct WheelResult {
    pub sector_index: usize,
    pub value: u32,
    pub orientation: f64,
    pub plan: SpinPlan,
}

// Tick sources due at the same instant fire in this order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum TimerSlot {
    Spin,
    Shake,
    Reveal,
    Sound,
}

/// The prize wheel: spins, shakes the arrow, reveals the prize and gates input
/// while doing so.
///
/// Time only moves when the host calls [`WheelGame::advance`]. Renderer and
/// audio collaborators are optional; until they are attached every update to
/// them is skipped.
pub struct WheelGame {
    engine: SpinEngine,
    activity: ActivityMachine,
    scheduler: AnimationScheduler,
    arrow: ArrowShaker,
    reveal: RevealSequencer,
    sound: SoundSprite,
    renderer: Option<Box<dyn Renderer>>,
    glyph: Option<GlyphHandle>,
    orientation: f64,
    now: u64,
    rng: StdRng,
    current_plan: Option<SpinPlan>,
    last_result: Option<WheelResult>,
    spins_completed: u64,
}

impl WheelGame {
    pub fn new(config: WheelConfig) -> Result<Self, WheelError> {
        Self::with_rng(config, StdRng::from_entropy())
    }

    pub fn with_seed(config: WheelConfig, seed: u64) -> Result<Self, WheelError> {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: WheelConfig, rng: StdRng) -> Result<Self, WheelError> {
        config.validate()?;
        let sectors = SectorTable::new(config.sectors.clone())?;
        let engine = SpinEngine::new(
            sectors,
            config.min_spins,
            config.min_duration_ms,
            config.additional_duration_ms,
        )?;

        Ok(Self {
            engine,
            activity: ActivityMachine::new(),
            scheduler: AnimationScheduler::new(config.spin_tick_ms, config.easing),
            arrow: ArrowShaker::new(config.shake_tick_ms),
            reveal: RevealSequencer::new(RevealTiming::from(&config)),
            sound: SoundSprite::new(config.cues),
            renderer: None,
            glyph: None,
            orientation: 0.0,
            now: 0,
            rng,
            current_plan: None,
            last_result: None,
            spins_completed: 0,
        })
    }

    /// Hands the wheel its renderer and syncs it with the current pose.
    pub fn attach_renderer(&mut self, mut renderer: Box<dyn Renderer>) {
        renderer.set_wheel_orientation(self.orientation);
        renderer.set_arrow_tilt(self.arrow.tilt());
        self.renderer = Some(renderer);
    }

    pub fn attach_audio(&mut self, sink: Box<dyn AudioSink>) {
        self.sound.attach(sink);
    }

    pub fn sectors(&self) -> &SectorTable {
        self.engine.sectors()
    }

    pub fn state(&self) -> ActivityState {
        self.activity.state()
    }

    pub fn is_active(&self) -> bool {
        self.activity.is_active()
    }

    pub fn orientation(&self) -> f64 {
        self.orientation
    }

    pub fn arrow_tilt(&self) -> f64 {
        self.arrow.tilt()
    }

    pub fn now(&self) -> u64 {
        self.now
    }

    pub fn last_result(&self) -> Option<WheelResult> {
        self.last_result
    }

    pub fn spins_completed(&self) -> u64 {
        self.spins_completed
    }

    pub fn current_cue(&self) -> Option<Cue> {
        self.sound.current()
    }

    /// Number of tick sources still armed.
    pub fn pending_timers(&self) -> usize {
        usize::from(self.scheduler.timer().is_running())
            + usize::from(self.arrow.is_shaking())
            + self.reveal.pending_timers()
            + usize::from(self.sound.is_playing())
    }

    /// Starts a spin if the wheel is idle. Requests while busy are ignored.
    pub fn request_spin(&mut self) -> Option<SpinPlan> {
        if self.activity.is_active() {
            log::debug!("Spin request ignored while {}", self.activity.state());
            return None;
        }

        let plan = self.engine.plan_spin(&mut self.rng);
        if !self.scheduler.start(
            plan,
            self.orientation,
            self.engine.sectors(),
            self.now,
            &mut self.activity,
        ) {
            return None;
        }
        self.current_plan = Some(plan);
        self.sound.play(Cue::Spin, true, self.now);
        Some(plan)
    }

    pub fn advance(&mut self, delta_ms: u64) {
        self.advance_to(self.now.saturating_add(delta_ms));
    }

    /// Fires every tick source due up to `target_ms`, in time order.
    pub fn advance_to(&mut self, target_ms: u64) {
        while let Some((due, slot)) = self.next_timer() {
            if due > target_ms {
                break;
            }
            self.now = due;
            self.dispatch(slot);
        }
        self.now = self.now.max(target_ms);
    }

    fn next_timer(&self) -> Option<(u64, TimerSlot)> {
        [
            (self.scheduler.next_due(), TimerSlot::Spin),
            (self.arrow.next_due(), TimerSlot::Shake),
            (self.reveal.next_due(), TimerSlot::Reveal),
            (self.sound.next_due(), TimerSlot::Sound),
        ]
        .into_iter()
        .filter_map(|(due, slot)| due.map(|due| (due, slot)))
        .min()
    }

    fn dispatch(&mut self, slot: TimerSlot) {
        match slot {
            TimerSlot::Spin => {
                match self
                    .scheduler
                    .on_tick(self.engine.sectors(), &mut self.activity)
                {
                    Some(SpinStep::Frame {
                        orientation,
                        crossed_boundary,
                    }) => {
                        self.set_orientation(orientation);
                        if crossed_boundary {
                            self.arrow.trigger(self.now);
                        }
                    }
                    Some(SpinStep::Finished { orientation }) => self.complete_spin(orientation),
                    None => {}
                }
            }
            TimerSlot::Shake => {
                if let Some(tilt) = self.arrow.on_tick() {
                    if let Some(renderer) = self.renderer.as_mut() {
                        renderer.set_arrow_tilt(tilt);
                    }
                }
            }
            TimerSlot::Reveal => {
                let events = self.reveal.on_timer(&mut self.activity);
                self.apply_reveal(events);
            }
            TimerSlot::Sound => {
                self.sound.on_timer();
            }
        }
    }

    fn set_orientation(&mut self, orientation: f64) {
        self.orientation = orientation;
        if let Some(renderer) = self.renderer.as_mut() {
            renderer.set_wheel_orientation(orientation);
        }
    }

    fn complete_spin(&mut self, orientation: f64) {
        self.set_orientation(orientation);
        // Superseding the looped spin cue also stops it
        self.sound.play(Cue::Win, false, self.now);

        let sector_index = self.engine.sectors().index_at(orientation);
        let value = self.engine.resolve_sector(orientation);
        if let Some(plan) = self.current_plan.take() {
            self.last_result = Some(WheelResult {
                sector_index,
                value,
                orientation,
                plan,
            });
        }
        self.spins_completed += 1;
        log::info!(
            "Wheel stopped on sector {} worth {} after {} sectors",
            sector_index,
            value,
            self.last_result.map_or(0, |result| result.plan.sectors_to_travel)
        );

        let events = self.reveal.start(value, self.now, &mut self.activity);
        self.apply_reveal(events);
    }

    fn apply_reveal(&mut self, events: Vec<RevealEvent>) {
        for event in events {
            match event {
                RevealEvent::Show {
                    value,
                    opacity,
                    scale,
                } => {
                    if let Some(renderer) = self.renderer.as_mut() {
                        let glyph = Glyph {
                            value,
                            opacity,
                            scale,
                            position: renderer.viewport().center(),
                        };
                        self.glyph = Some(renderer.show_glyph(&glyph));
                    }
                }
                RevealEvent::Fade { opacity, scale, .. } => {
                    if let (Some(renderer), Some(handle)) = (self.renderer.as_mut(), self.glyph) {
                        renderer.update_glyph(handle, opacity, scale);
                    }
                }
                RevealEvent::Remove { .. } => {
                    if let Some(handle) = self.glyph.take() {
                        if let Some(renderer) = self.renderer.as_mut() {
                            renderer.remove_glyph(handle);
                        }
                    }
                }
                RevealEvent::Complete { final_number } => {
                    log::info!("Revealed {}, wheel ready", final_number);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::Viewport;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Orientation(f64),
        Tilt(f64),
        Show(u32, GlyphHandle),
        Update(GlyphHandle, f64, f64),
        Remove(GlyphHandle),
        Pause,
        Seek(f64),
        Resume,
    }

    type CallLog = Rc<RefCell<Vec<Call>>>;

    struct RecordingRenderer {
        calls: CallLog,
        next_handle: u64,
    }

    impl Renderer for RecordingRenderer {
        fn set_wheel_orientation(&mut self, radians: f64) {
            self.calls.borrow_mut().push(Call::Orientation(radians));
        }
        fn set_arrow_tilt(&mut self, radians: f64) {
            self.calls.borrow_mut().push(Call::Tilt(radians));
        }
        fn show_glyph(&mut self, glyph: &Glyph) -> GlyphHandle {
            self.next_handle += 1;
            let handle = GlyphHandle(self.next_handle);
            assert_eq!(glyph.position, (400.0, 300.0));
            self.calls.borrow_mut().push(Call::Show(glyph.value, handle));
            handle
        }
        fn update_glyph(&mut self, handle: GlyphHandle, opacity: f64, scale: f64) {
            self.calls.borrow_mut().push(Call::Update(handle, opacity, scale));
        }
        fn remove_glyph(&mut self, handle: GlyphHandle) {
            self.calls.borrow_mut().push(Call::Remove(handle));
        }
        fn viewport(&self) -> Viewport {
            Viewport {
                width: 800.0,
                height: 600.0,
            }
        }
    }

    struct RecordingSink(CallLog);

    impl AudioSink for RecordingSink {
        fn pause(&mut self) {
            self.0.borrow_mut().push(Call::Pause);
        }
        fn seek(&mut self, seconds: f64) {
            self.0.borrow_mut().push(Call::Seek(seconds));
        }
        fn resume(&mut self) {
            self.0.borrow_mut().push(Call::Resume);
        }
    }

    fn wheel_with_log(config: WheelConfig, seed: u64) -> (WheelGame, CallLog) {
        let calls: CallLog = Rc::new(RefCell::new(Vec::new()));
        let mut wheel = WheelGame::with_seed(config, seed).unwrap();
        wheel.attach_renderer(Box::new(RecordingRenderer {
            calls: calls.clone(),
            next_handle: 0,
        }));
        wheel.attach_audio(Box::new(RecordingSink(calls.clone())));
        calls.borrow_mut().clear();
        (wheel, calls)
    }

    fn run_until_idle(wheel: &mut WheelGame) {
        for _ in 0..100_000 {
            if !wheel.is_active() {
                return;
            }
            wheel.advance(5);
        }
        panic!("wheel never went idle");
    }

    #[test]
    fn test_idle_before_first_spin() {
        let wheel = WheelGame::with_seed(WheelConfig::default(), 1).unwrap();
        assert!(!wheel.is_active());
        assert_eq!(wheel.state(), ActivityState::Idle);
        assert_eq!(wheel.pending_timers(), 0);
        assert_eq!(wheel.last_result(), None);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = WheelConfig {
            sectors: Vec::new(),
            ..WheelConfig::default()
        };
        assert!(matches!(
            WheelGame::new(config),
            Err(WheelError::EmptySectorTable)
        ));
    }

    #[test]
    fn test_unplayable_configs_fail_at_construction() {
        let mut config = WheelConfig::default();
        config.cues.spin.duration = 0.0004;
        assert!(matches!(
            WheelGame::with_seed(config, 1),
            Err(WheelError::InvalidCue { cue: "spin", .. })
        ));

        let config = WheelConfig {
            min_spins: 3_000_000_000,
            ..WheelConfig::default()
        };
        assert!(matches!(
            WheelGame::with_seed(config, 1),
            Err(WheelError::SpinTooLong { .. })
        ));
    }

    #[test]
    fn test_second_request_is_ignored() {
        let mut wheel = WheelGame::with_seed(WheelConfig::default(), 3).unwrap();
        let plan = wheel.request_spin().unwrap();
        assert_eq!(wheel.request_spin(), None);
        wheel.advance(100);
        assert_eq!(wheel.request_spin(), None);

        run_until_idle(&mut wheel);
        assert_eq!(wheel.spins_completed(), 1);
        assert_eq!(wheel.last_result().unwrap().plan, plan);
    }

    #[test]
    fn test_active_until_final_glyph_removed() {
        let (mut wheel, calls) = wheel_with_log(WheelConfig::default(), 11);
        wheel.request_spin().unwrap();
        assert_eq!(wheel.state(), ActivityState::Spinning);

        let mut saw_revealing = false;
        while wheel.is_active() {
            if wheel.state() == ActivityState::Revealing {
                saw_revealing = true;
                // Until the last glyph goes away the wheel stays busy
                let removed = calls
                    .borrow()
                    .iter()
                    .filter(|call| matches!(call, Call::Remove(_)))
                    .count();
                let value = wheel.last_result().unwrap().value as usize;
                assert!(removed < value);
            }
            wheel.advance(5);
        }
        assert!(saw_revealing);

        let value = wheel.last_result().unwrap().value;
        let calls = calls.borrow();
        let shown: Vec<u32> = calls
            .iter()
            .filter_map(|call| match call {
                Call::Show(value, _) => Some(*value),
                _ => None,
            })
            .collect();
        assert_eq!(shown, (1..=value).collect::<Vec<_>>());
        assert!(matches!(calls.last(), Some(Call::Remove(_))));
        assert_eq!(wheel.pending_timers(), 0);
    }

    #[test]
    fn test_result_matches_planned_travel() {
        let mut wheel = WheelGame::with_seed(WheelConfig::default(), 21).unwrap();
        let mut expected_index = 0;
        for _ in 0..3 {
            let plan = wheel.request_spin().unwrap();
            expected_index = (expected_index + plan.sectors_to_travel as usize) % 16;
            run_until_idle(&mut wheel);

            let result = wheel.last_result().unwrap();
            assert_eq!(result.sector_index, expected_index);
            assert_eq!(result.value, WheelConfig::default().sectors[expected_index]);
            assert!(wheel.orientation() >= 0.0);
            assert!(wheel.orientation() < wheel.sectors().full_turn());
        }
        assert_eq!(wheel.spins_completed(), 3);
    }

    #[test]
    fn test_spin_loops_sound_then_plays_win() {
        let (mut wheel, calls) = wheel_with_log(WheelConfig::default(), 5);
        wheel.request_spin().unwrap();
        assert_eq!(wheel.current_cue(), Some(Cue::Spin));

        while wheel.state() == ActivityState::Spinning {
            wheel.advance(5);
        }
        assert_eq!(wheel.current_cue(), Some(Cue::Win));

        let seeks: Vec<f64> = calls
            .borrow()
            .iter()
            .filter_map(|call| match call {
                Call::Seek(at) => Some(*at),
                _ => None,
            })
            .collect();
        // Spins last at least two seconds, so the spin cue restarts at least once
        assert!(seeks.len() >= 3);
        assert_eq!(*seeks.last().unwrap(), 2.418);
        assert!(seeks[..seeks.len() - 1].iter().all(|at| *at == 0.0));

        run_until_idle(&mut wheel);
        assert_eq!(wheel.current_cue(), None);
    }

    #[test]
    fn test_arrow_shakes_within_range() {
        let (mut wheel, calls) = wheel_with_log(WheelConfig::default(), 8);
        wheel.request_spin().unwrap();
        run_until_idle(&mut wheel);

        let tilts: Vec<f64> = calls
            .borrow()
            .iter()
            .filter_map(|call| match call {
                Call::Tilt(tilt) => Some(*tilt),
                _ => None,
            })
            .collect();
        assert!(!tilts.is_empty());
        assert!(tilts.iter().all(|tilt| *tilt >= -0.5 - 1e-9 && *tilt <= 0.0));
        assert_eq!(wheel.arrow_tilt(), 0.0);
    }

    #[test]
    fn test_orientation_published_every_frame() {
        let (mut wheel, calls) = wheel_with_log(WheelConfig::default(), 2);
        let plan = wheel.request_spin().unwrap();
        wheel.advance(plan.duration_ms as u64 + 20);
        assert_eq!(wheel.state(), ActivityState::Revealing);

        let frames = calls
            .borrow()
            .iter()
            .filter(|call| matches!(call, Call::Orientation(_)))
            .count() as u64;
        // One per rotation tick plus the normalized final pose
        assert_eq!(frames, plan.duration_ms as u64 / 20 + 1);
    }

    #[test]
    fn test_runs_without_collaborators() {
        let mut wheel = WheelGame::with_seed(WheelConfig::default(), 4).unwrap();
        wheel.request_spin().unwrap();
        run_until_idle(&mut wheel);
        assert!(wheel.last_result().is_some());
        assert_eq!(wheel.pending_timers(), 0);
    }

    #[test]
    fn test_renderer_attached_mid_spin() {
        let calls: CallLog = Rc::new(RefCell::new(Vec::new()));
        let mut wheel = WheelGame::with_seed(WheelConfig::default(), 6).unwrap();
        wheel.request_spin().unwrap();
        wheel.advance(500);
        let pose = wheel.orientation();

        wheel.attach_renderer(Box::new(RecordingRenderer {
            calls: calls.clone(),
            next_handle: 0,
        }));
        assert_eq!(calls.borrow()[0], Call::Orientation(pose));
        run_until_idle(&mut wheel);
        assert!(calls
            .borrow()
            .iter()
            .any(|call| matches!(call, Call::Remove(_))));
    }

    #[test]
    fn test_single_value_wheel_counts_to_three() {
        let config = WheelConfig {
            sectors: vec![3],
            min_spins: 1,
            ..WheelConfig::default()
        };
        let (mut wheel, calls) = wheel_with_log(config, 9);
        wheel.request_spin().unwrap();
        run_until_idle(&mut wheel);

        let glyph_calls: Vec<Call> = calls
            .borrow()
            .iter()
            .filter(|call| matches!(call, Call::Show(..) | Call::Remove(_)))
            .cloned()
            .collect();
        assert_eq!(
            glyph_calls,
            vec![
                Call::Show(1, GlyphHandle(1)),
                Call::Remove(GlyphHandle(1)),
                Call::Show(2, GlyphHandle(2)),
                Call::Remove(GlyphHandle(2)),
                Call::Show(3, GlyphHandle(3)),
                Call::Remove(GlyphHandle(3)),
            ]
        );
        assert!(!wheel.is_active());
    }
}
