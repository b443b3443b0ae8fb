//! Breathing effect
//!
//! The pixel map is painted once at full color, then the global brightness
//! ramps up to the configured level and back down to zero.

use super::Playback;
use crate::error::Result;
use crate::pacer::Pacer;
use crate::strip::Strip;

/// Frames to hold at the top and bottom of the ramp
const HOLD_FRAMES: u32 = 5;

pub(super) fn fade<S: Strip, P: Pacer>(playback: &mut Playback<'_, S, P>) -> Result<()> {
    let step = playback.frame();
    for (index, color) in playback.pixels.iter().enumerate() {
        playback.strip.set_pixel(index, color);
    }
    playback.strip.show()?;

    for level in 0..playback.brightness {
        playback.strip.set_brightness(level);
        playback.strip.show()?;
        playback.wait(step);
    }
    playback.wait(step * HOLD_FRAMES);

    for level in (0..=playback.brightness).rev() {
        playback.strip.set_brightness(level);
        playback.strip.show()?;
        playback.wait(step);
    }
    playback.wait(step * HOLD_FRAMES);

    Ok(())
}
