//! Fill effects
//!
//! Pixels light up one at a time in traversal order until the strip is
//! full, then optionally clear again.

use super::{Playback, traverse};
use crate::color::BLACK;
use crate::error::Result;
use crate::pacer::Pacer;
use crate::strip::Strip;

/// Frames to hold a full strip when filling on its own
const FILL_HOLD_FRAMES: u32 = 5;
/// Frames to pause between filling and clearing
const TURN_FRAMES: u32 = 2;

/// Fill the strip. With `hold` the full strip stays lit for a while.
pub(super) fn fill<S: Strip, P: Pacer>(playback: &mut Playback<'_, S, P>, hold: bool) -> Result<()> {
    let step = playback.frame();
    playback.strip.set_brightness(playback.brightness);
    playback.clear()?;

    for index in traverse(playback.len(), playback.reverse) {
        let color = playback.base_color(index);
        playback.strip.set_pixel(index, color);
        playback.strip.show()?;
        playback.wait(step);
    }

    if hold {
        playback.wait(step * FILL_HOLD_FRAMES);
    }
    Ok(())
}

/// Fill, then clear in the opposite direction
pub(super) fn fill_unfill<S: Strip, P: Pacer>(playback: &mut Playback<'_, S, P>) -> Result<()> {
    let step = playback.frame();
    fill(playback, false)?;
    playback.wait(step * TURN_FRAMES);

    let reverse = playback.reverse;
    unfill(playback, !reverse)?;
    playback.wait(step * TURN_FRAMES);
    Ok(())
}

/// Fill, then clear in the same direction
pub(super) fn fill_chase<S: Strip, P: Pacer>(playback: &mut Playback<'_, S, P>) -> Result<()> {
    let step = playback.frame();
    fill(playback, false)?;
    playback.wait(step * TURN_FRAMES);

    let reverse = playback.reverse;
    unfill(playback, reverse)
}

fn unfill<S: Strip, P: Pacer>(playback: &mut Playback<'_, S, P>, reverse: bool) -> Result<()> {
    let step = playback.frame();
    for index in traverse(playback.len(), reverse) {
        playback.strip.set_pixel(index, BLACK);
        playback.strip.show()?;
        playback.wait(step);
    }
    Ok(())
}
