use serde::{Deserialize, Serialize};

/// Deceleration curves for the wheel. Every curve maps 0 to 0 and 1 to 1,
/// never decreases, and has a decreasing slope.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum Easing {
    #[default]
    OutQuad,
    OutCubic,
    OutQuart,
}

impl Easing {
    /// Maps normalized progress to eased progress. Input outside [0, 1] is clamped.
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::OutQuad => ease_out_quad(t),
            Self::OutCubic => 1.0 - (1.0 - t).powi(3),
            Self::OutQuart => 1.0 - (1.0 - t).powi(4),
        }
    }
}

pub fn ease_out_quad(t: f64) -> f64 {
    t * (2.0 - t)
}
