//! Effect catalog
//!
//! Every effect is a closed [`EffectId`] variant mapped to a routine. A
//! routine renders exactly one animation cycle onto the strip; the engine
//! calls it again and again for continuous animation.

mod chase;
mod fade;
mod fill;
mod solid;
mod speed;
mod twinkle;
mod wave;

use core::fmt;

use embassy_time::Duration;
use rand::rngs::StdRng;

pub use speed::{EffectSpeed, FrameTiming};

use crate::color::{BLACK, Rgb};
use crate::error::Result;
use crate::pacer::Pacer;
use crate::pixel_map::PixelMap;
use crate::strip::Strip;

const EFFECT_NAME_SOLID: &str = "solid";
const EFFECT_NAME_FADE: &str = "fade";
const EFFECT_NAME_CHASE: &str = "chase";
const EFFECT_NAME_BOUNCE: &str = "bounce";
const EFFECT_NAME_CHASE_GHOST: &str = "chase_ghost";
const EFFECT_NAME_GHOST_BOUNCE: &str = "ghost_bounce";
const EFFECT_NAME_FILL: &str = "fill";
const EFFECT_NAME_FILL_UNFILL: &str = "fill_unfill";
const EFFECT_NAME_FILL_CHASE: &str = "fill_chase";
const EFFECT_NAME_TWINKLE: &str = "twinkle";
const EFFECT_NAME_TWINKLE_COLORS: &str = "twinkle_colors";
const EFFECT_NAME_NOISE: &str = "noise";
const EFFECT_NAME_WAVE: &str = "wave";
const EFFECT_NAME_SLAVA_UKRAINI: &str = "slava_ukraini";

/// Per brightness step
const STEP_TIMING: FrameTiming = FrameTiming::from_millis(10, 5);
/// Per frame
const FRAME_TIMING: FrameTiming = FrameTiming::from_millis(100, 50);

/// Known effects that can be configured
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EffectId {
    Solid,
    Fade,
    Chase,
    Bounce,
    ChaseGhost,
    GhostBounce,
    Fill,
    FillUnfill,
    FillChase,
    Twinkle,
    TwinkleColors,
    Noise,
    Wave,
    SlavaUkraini,
}

impl EffectId {
    pub const ALL: [Self; 14] = [
        Self::Solid,
        Self::Fade,
        Self::Chase,
        Self::Bounce,
        Self::ChaseGhost,
        Self::GhostBounce,
        Self::Fill,
        Self::FillUnfill,
        Self::FillChase,
        Self::Twinkle,
        Self::TwinkleColors,
        Self::Noise,
        Self::Wave,
        Self::SlavaUkraini,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Solid => EFFECT_NAME_SOLID,
            Self::Fade => EFFECT_NAME_FADE,
            Self::Chase => EFFECT_NAME_CHASE,
            Self::Bounce => EFFECT_NAME_BOUNCE,
            Self::ChaseGhost => EFFECT_NAME_CHASE_GHOST,
            Self::GhostBounce => EFFECT_NAME_GHOST_BOUNCE,
            Self::Fill => EFFECT_NAME_FILL,
            Self::FillUnfill => EFFECT_NAME_FILL_UNFILL,
            Self::FillChase => EFFECT_NAME_FILL_CHASE,
            Self::Twinkle => EFFECT_NAME_TWINKLE,
            Self::TwinkleColors => EFFECT_NAME_TWINKLE_COLORS,
            Self::Noise => EFFECT_NAME_NOISE,
            Self::Wave => EFFECT_NAME_WAVE,
            Self::SlavaUkraini => EFFECT_NAME_SLAVA_UKRAINI,
        }
    }

    pub fn parse_from_str(s: &str) -> Option<Self> {
        match s {
            EFFECT_NAME_SOLID => Some(Self::Solid),
            EFFECT_NAME_FADE => Some(Self::Fade),
            EFFECT_NAME_CHASE => Some(Self::Chase),
            EFFECT_NAME_BOUNCE => Some(Self::Bounce),
            EFFECT_NAME_CHASE_GHOST => Some(Self::ChaseGhost),
            EFFECT_NAME_GHOST_BOUNCE => Some(Self::GhostBounce),
            EFFECT_NAME_FILL => Some(Self::Fill),
            EFFECT_NAME_FILL_UNFILL => Some(Self::FillUnfill),
            EFFECT_NAME_FILL_CHASE => Some(Self::FillChase),
            EFFECT_NAME_TWINKLE => Some(Self::Twinkle),
            EFFECT_NAME_TWINKLE_COLORS => Some(Self::TwinkleColors),
            EFFECT_NAME_NOISE => Some(Self::Noise),
            EFFECT_NAME_WAVE => Some(Self::Wave),
            EFFECT_NAME_SLAVA_UKRAINI => Some(Self::SlavaUkraini),
            _ => None,
        }
    }

    /// Slow and fast frame durations of the routine
    pub const fn timing(self) -> FrameTiming {
        match self {
            Self::Fade | Self::Chase | Self::Bounce | Self::ChaseGhost | Self::GhostBounce => {
                STEP_TIMING
            }
            Self::Solid
            | Self::Fill
            | Self::FillUnfill
            | Self::FillChase
            | Self::Twinkle
            | Self::TwinkleColors
            | Self::Noise
            | Self::Wave
            | Self::SlavaUkraini => FRAME_TIMING,
        }
    }

    /// Render one animation cycle
    pub(crate) fn play<S: Strip, P: Pacer>(self, playback: &mut Playback<'_, S, P>) -> Result<()> {
        match self {
            Self::Solid => solid::solid(playback),
            Self::Fade => fade::fade(playback),
            Self::Chase => chase::chase(playback),
            Self::Bounce => chase::bounce(playback),
            Self::ChaseGhost => chase::chase_ghost(playback),
            Self::GhostBounce => chase::ghost_bounce(playback),
            Self::Fill => fill::fill(playback, true),
            Self::FillUnfill => fill::fill_unfill(playback),
            Self::FillChase => fill::fill_chase(playback),
            Self::Twinkle => twinkle::twinkle(playback),
            Self::TwinkleColors => twinkle::twinkle_colors(playback),
            Self::Noise => twinkle::noise(playback),
            Self::Wave => wave::wave(playback),
            Self::SlavaUkraini => wave::slava_ukraini(playback),
        }
    }
}

impl fmt::Display for EffectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything a routine needs to draw one cycle
pub(crate) struct Playback<'a, S, P> {
    pub(crate) strip: &'a mut S,
    pub(crate) pacer: &'a P,
    pub(crate) rng: &'a mut StdRng,
    pub(crate) pixels: &'a PixelMap,
    pub(crate) brightness: u8,
    pub(crate) timing: FrameTiming,
    pub(crate) speed: EffectSpeed,
    pub(crate) reverse: bool,
    pub(crate) clear_frames: bool,
}

impl<S: Strip, P: Pacer> Playback<'_, S, P> {
    /// Duration of one frame at the configured speed
    fn frame(&self) -> Duration {
        self.speed.resolve(self.timing)
    }

    fn wait(&self, duration: Duration) {
        self.pacer.pause(duration);
    }

    fn len(&self) -> usize {
        self.pixels.len()
    }

    fn blank(&mut self) {
        for index in 0..self.strip.pixel_count() {
            self.strip.set_pixel(index, BLACK);
        }
    }

    fn clear(&mut self) -> Result<()> {
        self.blank();
        self.strip.show()
    }

    fn base_color(&self, index: usize) -> Rgb {
        self.pixels.get(index).unwrap_or(BLACK)
    }
}

/// Indices `0..len` in traversal order
fn traverse(len: usize, reverse: bool) -> impl Iterator<Item = usize> {
    (0..len).map(move |i| if reverse { len - 1 - i } else { i })
}
