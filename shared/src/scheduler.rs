use crate::activity::ActivityMachine;
use crate::easing::Easing;
use crate::spin_engine::{SectorTable, SpinPlan};
use crate::ticker::Ticker;

/// Outcome of one rotation tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SpinStep {
    Frame { orientation: f64, crossed_boundary: bool },
    /// The spin is over; `orientation` is normalized into one full turn.
    Finished { orientation: f64 },
}

#[derive(Debug, Clone)]
struct SpinRun {
    plan: SpinPlan,
    start_orientation: f64,
    elapsed_ms: u64,
    orientation: f64,
    shake_reference: f64,
}

/// Drives the wheel's rotation for one spin at a time.
#[derive(Debug)]
pub struct AnimationScheduler {
    easing: Easing,
    timer: Ticker,
    run: Option<SpinRun>,
}

impl AnimationScheduler {
    pub fn new(tick_ms: u64, easing: Easing) -> Self {
        Self {
            easing,
            timer: Ticker::interval(tick_ms),
            run: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.run.is_some()
    }

    pub fn timer(&self) -> &Ticker {
        &self.timer
    }

    pub fn next_due(&self) -> Option<u64> {
        self.timer.next_due()
    }

    pub fn plan(&self) -> Option<&SpinPlan> {
        self.run.as_ref().map(|run| &run.plan)
    }

    /// Starts animating `plan` from `start_orientation`. Refused unless the
    /// wheel is idle.
    pub(crate) fn start(
        &mut self,
        plan: SpinPlan,
        start_orientation: f64,
        sectors: &SectorTable,
        now: u64,
        activity: &mut ActivityMachine,
    ) -> bool {
        if self.run.is_some() || !activity.begin_spin() {
            return false;
        }
        self.run = Some(SpinRun {
            plan,
            start_orientation,
            elapsed_ms: 0,
            orientation: start_orientation,
            // First shake lands roughly half a sector into the spin
            shake_reference: start_orientation - sectors.sector_width() / 2.0,
        });
        self.timer.start(now);
        true
    }

    pub(crate) fn on_tick(
        &mut self,
        sectors: &SectorTable,
        activity: &mut ActivityMachine,
    ) -> Option<SpinStep> {
        self.timer.fire()?;
        let period = self.timer.period_ms();
        let Some(run) = self.run.as_mut() else {
            self.timer.cancel();
            return None;
        };

        run.elapsed_ms += period;
        if run.elapsed_ms as f64 <= run.plan.duration_ms {
            let progress = run.elapsed_ms as f64 / run.plan.duration_ms;
            run.orientation =
                run.start_orientation + run.plan.total_rotation * self.easing.apply(progress);
            let crossed_boundary = run.orientation - run.shake_reference >= sectors.sector_width();
            if crossed_boundary {
                run.shake_reference = run.orientation;
            }
            return Some(SpinStep::Frame {
                orientation: run.orientation,
                crossed_boundary,
            });
        }

        self.timer.cancel();
        let orientation = run.orientation.rem_euclid(sectors.full_turn());
        self.run = None;
        activity.finish_spin();
        Some(SpinStep::Finished { orientation })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activity::ActivityState;

    fn table() -> SectorTable {
        SectorTable::new(vec![4, 2, 6, 3, 7, 5, 3, 5, 2, 15, 3, 2, 5, 7, 3, 2]).unwrap()
    }

    fn plan(sectors: &SectorTable, steps: u32, duration_ms: f64) -> SpinPlan {
        SpinPlan {
            sectors_to_travel: steps,
            total_rotation: steps as f64 * sectors.sector_width(),
            duration_ms,
        }
    }

    fn run_to_end(
        scheduler: &mut AnimationScheduler,
        sectors: &SectorTable,
        activity: &mut ActivityMachine,
    ) -> (Vec<SpinStep>, f64) {
        let mut steps = Vec::new();
        while let Some(step) = scheduler.on_tick(sectors, activity) {
            steps.push(step);
            if let SpinStep::Finished { orientation } = step {
                return (steps, orientation);
            }
        }
        panic!("spin never finished");
    }

    #[test]
    fn test_frames_follow_eased_progress() {
        let sectors = table();
        let mut activity = ActivityMachine::new();
        let mut scheduler = AnimationScheduler::new(20, Easing::OutQuad);
        let plan = plan(&sectors, 32, 2000.0);
        assert!(scheduler.start(plan, 0.0, &sectors, 0, &mut activity));
        assert_eq!(activity.state(), ActivityState::Spinning);

        let (steps, _) = run_to_end(&mut scheduler, &sectors, &mut activity);
        // 100 frames up to elapsed == duration, then the completion tick
        assert_eq!(steps.len(), 101);
        match steps[49] {
            SpinStep::Frame { orientation, .. } => {
                let expected = plan.total_rotation * 0.75;
                assert!((orientation - expected).abs() < 1e-9);
            }
            other => panic!("unexpected step {:?}", other),
        }
        match steps[99] {
            SpinStep::Frame { orientation, .. } => {
                assert!((orientation - plan.total_rotation).abs() < 1e-9);
            }
            other => panic!("unexpected step {:?}", other),
        }
    }

    #[test]
    fn test_completion_stops_timer_and_hands_off() {
        let sectors = table();
        let mut activity = ActivityMachine::new();
        let mut scheduler = AnimationScheduler::new(20, Easing::OutQuad);
        scheduler.start(plan(&sectors, 35, 2300.0), 0.0, &sectors, 0, &mut activity);

        let (_, orientation) = run_to_end(&mut scheduler, &sectors, &mut activity);
        assert!(!scheduler.timer().is_running());
        assert!(!scheduler.is_running());
        assert_eq!(activity.state(), ActivityState::Revealing);
        assert!(orientation >= 0.0 && orientation < sectors.full_turn());
        // 35 steps from sector 0 lands on sector 3
        assert_eq!(sectors.index_at(orientation), 3);
    }

    #[test]
    fn test_boundary_crossings_fire_about_once_per_sector() {
        let sectors = table();
        let mut activity = ActivityMachine::new();
        let mut scheduler = AnimationScheduler::new(20, Easing::OutQuad);
        scheduler.start(plan(&sectors, 32, 2000.0), 0.0, &sectors, 0, &mut activity);

        let (steps, _) = run_to_end(&mut scheduler, &sectors, &mut activity);
        let crossings = steps
            .iter()
            .filter(|step| matches!(step, SpinStep::Frame { crossed_boundary: true, .. }))
            .count();
        // Coarse ticks can cover more than a sector, so never more than one per sector
        assert!(crossings >= 1);
        assert!(crossings <= 32);
    }

    #[test]
    fn test_first_shake_waits_for_half_sector() {
        let sectors = table();
        let width = sectors.sector_width();
        let mut activity = ActivityMachine::new();
        let mut scheduler = AnimationScheduler::new(20, Easing::OutQuad);
        scheduler.start(plan(&sectors, 16, 4000.0), 0.0, &sectors, 0, &mut activity);

        let (steps, _) = run_to_end(&mut scheduler, &sectors, &mut activity);
        let first = steps
            .iter()
            .find_map(|step| match step {
                SpinStep::Frame { orientation, crossed_boundary: true } => Some(*orientation),
                _ => None,
            })
            .unwrap();
        assert!(first >= width / 2.0);
        assert!(first < width);
    }

    #[test]
    fn test_start_refused_while_busy() {
        let sectors = table();
        let mut activity = ActivityMachine::new();
        let mut scheduler = AnimationScheduler::new(20, Easing::OutQuad);
        assert!(scheduler.start(plan(&sectors, 32, 2000.0), 0.0, &sectors, 0, &mut activity));
        assert!(!scheduler.start(plan(&sectors, 40, 3000.0), 0.0, &sectors, 5, &mut activity));
        assert_eq!(scheduler.plan().map(|p| p.sectors_to_travel), Some(32));
        assert_eq!(scheduler.next_due(), Some(20));
    }

    #[test]
    fn test_idle_tick_is_noop() {
        let sectors = table();
        let mut activity = ActivityMachine::new();
        let mut scheduler = AnimationScheduler::new(20, Easing::OutQuad);
        assert_eq!(scheduler.on_tick(&sectors, &mut activity), None);
        assert_eq!(activity.state(), ActivityState::Idle);
    }
}
