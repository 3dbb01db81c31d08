pub mod activity;
pub mod arrow;
pub mod config;
pub mod constants;
pub mod easing;
pub mod error;
pub mod render;
pub mod reveal;
pub mod scheduler;
pub mod shared_wheel_game;
pub mod sound;
pub mod spin_engine;
pub mod ticker;

pub use activity::ActivityState;
pub use config::WheelConfig;
pub use error::WheelError;
pub use render::{AudioSink, Glyph, GlyphHandle, Renderer, Viewport};
pub use shared_wheel_game::{WheelGame, WheelResult};
pub use sound::{Cue, CueSpan, CueTable};
pub use spin_engine::{SectorTable, SpinEngine, SpinPlan};
