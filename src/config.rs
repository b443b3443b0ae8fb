//! Lighting configuration
//!
//! Every field is optional. Missing or invalid values fall back to a safe
//! default and are reported through `log::warn!`, never as errors.

use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer};

use crate::color::{BLACK, BLUE, GREEN, RED, Rgb, WHITE, rgb_from_u32};
use crate::effect::{EffectId, EffectSpeed};
use crate::pixel_map::ColorSpec;
use crate::state::PrinterState;

const COLOR_TOKEN_RAINBOW: &str = "rainbow";

/// Color value as written in configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum ColorValue {
    /// `[r, g, b]`
    Rgb([u8; 3]),
    /// Named token, only `rainbow` is recognized
    Token(String),
}

impl ColorValue {
    pub fn is_rainbow(&self) -> bool {
        matches!(self, Self::Token(token) if token.eq_ignore_ascii_case(COLOR_TOKEN_RAINBOW))
    }

    pub fn rgb(&self) -> Option<Rgb> {
        match self {
            Self::Rgb([r, g, b]) => Some(Rgb::new(*r, *g, *b)),
            Self::Token(_) => None,
        }
    }
}

impl From<Rgb> for ColorValue {
    fn from(color: Rgb) -> Self {
        Self::Rgb([color.r, color.g, color.b])
    }
}

/// Effect configuration of one printer state
///
/// A value of the wrong type is dropped with a warning, so the entry resolves
/// as if it were missing.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct EffectConfig {
    #[serde(deserialize_with = "deserialize_lenient")]
    pub effect: Option<String>,
    #[serde(deserialize_with = "deserialize_lenient")]
    pub color_1: Option<ColorValue>,
    #[serde(deserialize_with = "deserialize_lenient")]
    pub color_2: Option<ColorValue>,
    #[serde(deserialize_with = "deserialize_lenient")]
    pub speed: Option<EffectSpeed>,
    #[serde(deserialize_with = "deserialize_lenient")]
    pub reverse: Option<bool>,
    /// Clear the strip before every `noise` frame
    #[serde(deserialize_with = "deserialize_lenient")]
    pub clear_frames: Option<bool>,
}

impl EffectConfig {
    /// Resolved effect, `solid` if missing or unknown
    pub fn effect_id(&self) -> EffectId {
        let Some(name) = self.effect.as_deref() else {
            return EffectId::Solid;
        };
        EffectId::parse_from_str(name).unwrap_or_else(|| {
            log::warn!("unknown effect {name:?}, falling back to {}", EffectId::Solid);
            EffectId::Solid
        })
    }

    /// Resolved color spec, solid white if no color is given
    pub fn color_spec(&self) -> ColorSpec {
        let Some(first) = &self.color_1 else {
            return ColorSpec::Solid(WHITE);
        };
        if first.is_rainbow() {
            return ColorSpec::Rainbow;
        }

        let Some(start) = first.rgb() else {
            log::warn!("invalid color_1 {first:?}, using white");
            return ColorSpec::Solid(WHITE);
        };
        match self.color_2.as_ref().map(|second| (second, second.rgb())) {
            None => ColorSpec::Solid(start),
            Some((_, Some(end))) => ColorSpec::Gradient(start, end),
            Some((second, None)) => {
                log::warn!("invalid color_2 {second:?}, using solid color_1");
                ColorSpec::Solid(start)
            }
        }
    }

    pub fn speed(&self) -> EffectSpeed {
        self.speed.unwrap_or_default()
    }

    pub fn reverse(&self) -> bool {
        self.reverse.unwrap_or(false)
    }

    pub fn clear_frames(&self) -> bool {
        self.clear_frames.unwrap_or(false)
    }
}

/// Effect configuration of every animated printer state
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct EffectsSettings {
    pub standby: EffectConfig,
    pub paused: EffectConfig,
    pub error: EffectConfig,
    pub complete: EffectConfig,
}

impl EffectsSettings {
    /// Configuration of an animated state, `None` for printing
    pub fn for_state(&self, state: PrinterState) -> Option<&EffectConfig> {
        match state {
            PrinterState::Standby => Some(&self.standby),
            PrinterState::Paused => Some(&self.paused),
            PrinterState::Error => Some(&self.error),
            PrinterState::Complete => Some(&self.complete),
            PrinterState::Printing => None,
        }
    }
}

/// Colors of one progress bar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct ProgressConfig {
    #[serde(deserialize_with = "deserialize_rgb")]
    pub base_color: Rgb,
    #[serde(deserialize_with = "deserialize_rgb")]
    pub progress_color: Rgb,
    #[serde(default)]
    pub reverse: bool,
}

impl ProgressConfig {
    pub const fn new(base_color: Rgb, progress_color: Rgb) -> Self {
        Self {
            base_color,
            progress_color,
            reverse: false,
        }
    }
}

#[allow(clippy::unreadable_literal)]
const HEATING_VIOLET: Rgb = rgb_from_u32(0xEE82EE);

/// Progress bars shown while printing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ProgressSettings {
    pub bed_heating: ProgressConfig,
    pub hotend_heating: ProgressConfig,
    pub printing: ProgressConfig,
}

impl Default for ProgressSettings {
    fn default() -> Self {
        Self {
            bed_heating: ProgressConfig::new(BLUE, HEATING_VIOLET),
            hotend_heating: ProgressConfig::new(HEATING_VIOLET, RED),
            printing: ProgressConfig::new(BLACK, GREEN),
        }
    }
}

/// Strip level settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct StripSettings {
    pub led_count: usize,
    pub led_brightness: u8,
    /// Seconds in standby or complete before the strip is turned off, 0 disables
    pub idle_timeout: u64,
}

impl Default for StripSettings {
    fn default() -> Self {
        Self {
            led_count: 10,
            led_brightness: 255,
            idle_timeout: 0,
        }
    }
}

fn deserialize_rgb<'de, D>(deserializer: D) -> Result<Rgb, D::Error>
where
    D: Deserializer<'de>,
{
    let [r, g, b] = <[u8; 3]>::deserialize(deserializer)?;
    Ok(Rgb::new(r, g, b))
}

fn deserialize_lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Lenient<T> {
        Valid(T),
        Invalid(IgnoredAny),
    }

    Ok(match Lenient::<T>::deserialize(deserializer)? {
        Lenient::Valid(value) => Some(value),
        Lenient::Invalid(_) => {
            log::warn!(
                "ignoring invalid {} value in effect configuration",
                std::any::type_name::<T>()
            );
            None
        }
    })
}
