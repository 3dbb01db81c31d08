use std::fmt;

#[derive(Debug)]
pub enum WheelError {
    EmptySectorTable,
    InvalidMinSpins(u32),
    SpinTooLong { min_spins: u32, sectors: usize },
    ZeroTickPeriod(&'static str),
    InvalidFadeStep(f64),
    InvalidCue { cue: &'static str, reason: &'static str },
    Config(serde_json::Error),
}

impl fmt::Display for WheelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptySectorTable => write!(f, "Sector table must contain at least one sector"),
            Self::InvalidMinSpins(spins) => {
                write!(f, "Minimum spins must be at least 1, got {}", spins)
            }
            Self::SpinTooLong { min_spins, sectors } => write!(
                f,
                "{} minimum spins over {} sectors is more travel than a spin can plan",
                min_spins, sectors
            ),
            Self::ZeroTickPeriod(name) => {
                write!(f, "Tick period '{}' must be greater than zero", name)
            }
            Self::InvalidFadeStep(step) => write!(f, "Fade step must be positive, got {}", step),
            Self::InvalidCue { cue, reason } => {
                write!(f, "Invalid sound cue '{}': {}", cue, reason)
            }
            Self::Config(e) => write!(f, "Config error: {}", e),
        }
    }
}

impl std::error::Error for WheelError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Config(e) => Some(e),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for WheelError {
    fn from(err: serde_json::Error) -> Self {
        Self::Config(err)
    }
}
