use embassy_time::Duration;
use serde::{Deserialize, Deserializer};

const SPEED_NAME_SLOW: &str = "slow";

/// Configured playback speed of an effect
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum EffectSpeed {
    Slow,
    #[default]
    Fast,
    /// Literal seconds per frame
    Seconds(f32),
}

/// Slow and fast frame durations of a routine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameTiming {
    pub slow: Duration,
    pub fast: Duration,
}

impl FrameTiming {
    pub const fn from_millis(slow: u64, fast: u64) -> Self {
        Self {
            slow: Duration::from_millis(slow),
            fast: Duration::from_millis(fast),
        }
    }
}

impl EffectSpeed {
    /// Parse a speed token. Anything but `slow` is fast.
    pub fn from_token(token: &str) -> Self {
        if token.eq_ignore_ascii_case(SPEED_NAME_SLOW) {
            Self::Slow
        } else {
            Self::Fast
        }
    }

    /// Resolve the frame duration against a routine's timing
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn resolve(self, timing: FrameTiming) -> Duration {
        match self {
            Self::Slow => timing.slow,
            Self::Fast => timing.fast,
            Self::Seconds(seconds) if seconds.is_finite() && seconds > 0.0 => {
                Duration::from_micros((f64::from(seconds) * 1_000_000.0) as u64)
            }
            Self::Seconds(_) => Duration::from_micros(0),
        }
    }
}

impl<'de> Deserialize<'de> for EffectSpeed {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Seconds(f32),
            Token(String),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Seconds(seconds) => Self::Seconds(seconds),
            Raw::Token(token) => Self::from_token(&token),
        })
    }
}
