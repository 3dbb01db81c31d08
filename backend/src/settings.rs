use std::{fmt, fs, io};

use wheel_shared::{WheelConfig, WheelError};

pub const DEFAULT_SPINS: u32 = 3;
pub const DEFAULT_FRAME_MS: u64 = 16;

#[derive(Debug)]
pub enum SettingsError {
    Io { path: String, source: io::Error },
    Wheel(WheelError),
    InvalidNumber { var: &'static str, value: String },
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "Failed to read {}: {}", path, source),
            Self::Wheel(e) => write!(f, "Invalid wheel config: {}", e),
            Self::InvalidNumber { var, value } => {
                write!(f, "{} must be a positive number, got '{}'", var, value)
            }
        }
    }
}

impl std::error::Error for SettingsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Wheel(e) => Some(e),
            Self::InvalidNumber { .. } => None,
        }
    }
}

impl From<WheelError> for SettingsError {
    fn from(err: WheelError) -> Self {
        Self::Wheel(err)
    }
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub wheel: WheelConfig,
    /// Spins to run automatically; 0 waits for Enter on stdin instead.
    pub spins: u32,
    pub frame_ms: u64,
    pub seed: Option<u64>,
}

impl Settings {
    pub fn from_env() -> Result<Self, SettingsError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, SettingsError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let wheel = match lookup("WHEEL_CONFIG") {
            Some(path) => {
                let json = fs::read_to_string(&path)
                    .map_err(|source| SettingsError::Io { path, source })?;
                WheelConfig::from_json_str(&json)?
            }
            None => WheelConfig::default(),
        };

        let spins = parse_var(&lookup, "WHEEL_SPINS")?.unwrap_or(DEFAULT_SPINS);
        let frame_ms = parse_var(&lookup, "WHEEL_FRAME_MS")?.unwrap_or(DEFAULT_FRAME_MS);
        if frame_ms == 0 {
            return Err(SettingsError::InvalidNumber {
                var: "WHEEL_FRAME_MS",
                value: frame_ms.to_string(),
            });
        }
        let seed = parse_var(&lookup, "WHEEL_SEED")?;

        Ok(Self {
            wheel,
            spins,
            frame_ms,
            seed,
        })
    }
}

fn parse_var<F, T>(lookup: &F, var: &'static str) -> Result<Option<T>, SettingsError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(var) {
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| SettingsError::InvalidNumber { var, value }),
        None => Ok(None),
    }
}
