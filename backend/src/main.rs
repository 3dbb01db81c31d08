use std::time::Duration;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::{interval, Instant, Interval, MissedTickBehavior};
use tracing::{info, warn};
use wheel_shared::{Viewport, WheelGame};

use crate::console::{ConsoleAudio, ConsoleRenderer};
use crate::settings::Settings;

mod console;
mod logging;
mod settings;

const VIEWPORT: Viewport = Viewport {
    width: 800.0,
    height: 600.0,
};

/// Keeps the wheel's millisecond clock in step with real time.
struct FrameClock {
    started: Instant,
    frames: Interval,
}

impl FrameClock {
    fn new(frame_ms: u64) -> Self {
        let mut frames = interval(Duration::from_millis(frame_ms));
        frames.set_missed_tick_behavior(MissedTickBehavior::Skip);
        Self {
            started: Instant::now(),
            frames,
        }
    }

    async fn tick(&mut self, wheel: &mut WheelGame) {
        self.frames.tick().await;
        wheel.advance_to(self.started.elapsed().as_millis() as u64);
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::from_path(".env").ok();
    logging::setup();

    let settings = Settings::from_env()?;
    let mut wheel = match settings.seed {
        Some(seed) => WheelGame::with_seed(settings.wheel.clone(), seed)?,
        None => WheelGame::new(settings.wheel.clone())?,
    };
    wheel.attach_renderer(Box::new(ConsoleRenderer::new(VIEWPORT)));
    wheel.attach_audio(Box::new(ConsoleAudio::default()));

    info!(
        "Wheel ready with {} sectors: {:?}",
        wheel.sectors().len(),
        wheel.sectors().values()
    );

    let mut clock = FrameClock::new(settings.frame_ms);
    if settings.spins == 0 {
        run_interactive(&mut wheel, &mut clock).await?;
    } else {
        run_automatic(&mut wheel, &mut clock, settings.spins).await?;
    }

    info!("Done after {} spins", wheel.spins_completed());
    Ok(())
}

async fn run_automatic(
    wheel: &mut WheelGame,
    clock: &mut FrameClock,
    spins: u32,
) -> Result<(), Box<dyn std::error::Error>> {
    for round in 1..=spins {
        match wheel.request_spin() {
            Some(plan) => info!(
                "🎡 Spin {}/{}: {} sectors over {:.0}ms",
                round, spins, plan.sectors_to_travel, plan.duration_ms
            ),
            None => warn!("Spin {} refused while {}", round, wheel.state()),
        }
        while wheel.is_active() {
            clock.tick(wheel).await;
        }
        report(wheel)?;
    }
    Ok(())
}

enum Input {
    Line(Option<String>),
    Quit,
    Frame,
}

/// Every line on stdin is a spin request. Requests during a spin or reveal
/// are dropped, exactly like clicks on a busy wheel.
async fn run_interactive(
    wheel: &mut WheelGame,
    clock: &mut FrameClock,
) -> Result<(), Box<dyn std::error::Error>> {
    info!("Press Enter to spin, Ctrl-D to quit");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut reported = wheel.spins_completed();

    loop {
        let input = tokio::select! {
            line = lines.next_line() => Input::Line(line?),
            _ = tokio::signal::ctrl_c() => Input::Quit,
            _ = clock.tick(wheel) => Input::Frame,
        };

        match input {
            Input::Line(None) | Input::Quit => break,
            Input::Line(Some(_)) => match wheel.request_spin() {
                Some(plan) => info!("🎡 Spinning {} sectors", plan.sectors_to_travel),
                None => info!("Wheel is busy ({}), ignoring", wheel.state()),
            },
            Input::Frame => {
                if wheel.spins_completed() != reported && !wheel.is_active() {
                    reported = wheel.spins_completed();
                    report(wheel)?;
                }
            }
        }
    }

    // Let a spin in flight finish before exiting
    while wheel.is_active() {
        clock.tick(wheel).await;
    }
    if wheel.spins_completed() != reported {
        report(wheel)?;
    }
    Ok(())
}

fn report(wheel: &WheelGame) -> Result<(), serde_json::Error> {
    if let Some(result) = wheel.last_result() {
        info!("🏆 Won {} | {}", result.value, serde_json::to_string(&result)?);
    }
    Ok(())
}
