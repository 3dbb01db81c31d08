// Prize values in the order they appear around the wheel
pub const DEFAULT_SECTORS: [u32; 16] = [4, 2, 6, 3, 7, 5, 3, 5, 2, 15, 3, 2, 5, 7, 3, 2];

pub const MIN_SPINS: u32 = 2;
pub const MIN_SPIN_DURATION_MS: u64 = 2000;
pub const ADDITIONAL_SPIN_DURATION_MS: u64 = 2000;

pub const SPIN_TICK_MS: u64 = 20;
pub const SHAKE_TICK_MS: u64 = 10;
pub const FADE_TICK_MS: u64 = 10;

pub const REVEAL_PAUSE_MS: u64 = 250;
pub const FINAL_REVEAL_PAUSE_MS: u64 = 2250;

// Arrow swings down to -ARROW_MAX_TILT and back up in ARROW_TILT_STEP increments
pub const ARROW_TILT_STEP: f64 = 0.1;
pub const ARROW_MAX_TILT: f64 = 0.5;

pub const GLYPH_FADE_STEP: f64 = 0.05;
pub const GLYPH_NOMINAL_SCALE: f64 = 1.0;

// Sound sprite offsets, in seconds
pub const SPIN_CUE_START: f64 = 0.0;
pub const SPIN_CUE_DURATION: f64 = 2.0;
pub const WIN_CUE_START: f64 = 2.418;
pub const WIN_CUE_DURATION: f64 = 1.638;
