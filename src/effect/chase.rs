//! Chase effects
//!
//! A single lit pixel, optionally trailed by dimming ghosts, sweeps the
//! strip. Every pixel write is flushed on its own, so a sweep takes
//! `positions * pixels` steps.

use super::{Playback, traverse};
use crate::color::{BLACK, scale_brightness};
use crate::error::Result;
use crate::pacer::Pacer;
use crate::strip::Strip;

/// Quarters making up the configured brightness
const FULL: u16 = 4;
/// Trail brightness in quarters of the configured level, by distance from
/// the highest lit index
const GHOST_TRAIL: [u16; 4] = [4, 3, 2, 1];
/// Reversed sweeps move toward index 0, so the trail is mirrored
const GHOST_TRAIL_REVERSED: [u16; 4] = [1, 2, 3, 4];

pub(super) fn chase<S: Strip, P: Pacer>(playback: &mut Playback<'_, S, P>) -> Result<()> {
    // One extra position so the pixel leaves the strip
    sweep(playback, 1, |offset| (offset == 0).then_some(FULL))
}

pub(super) fn chase_ghost<S: Strip, P: Pacer>(playback: &mut Playback<'_, S, P>) -> Result<()> {
    let trail = if playback.reverse {
        &GHOST_TRAIL_REVERSED
    } else {
        &GHOST_TRAIL
    };
    sweep(playback, trail.len() + 1, |offset| trail.get(offset).copied())
}

pub(super) fn bounce<S: Strip, P: Pacer>(playback: &mut Playback<'_, S, P>) -> Result<()> {
    there_and_back(playback, chase)
}

pub(super) fn ghost_bounce<S: Strip, P: Pacer>(playback: &mut Playback<'_, S, P>) -> Result<()> {
    there_and_back(playback, chase_ghost)
}

fn there_and_back<S: Strip, P: Pacer>(
    playback: &mut Playback<'_, S, P>,
    routine: fn(&mut Playback<'_, S, P>) -> Result<()>,
) -> Result<()> {
    routine(playback)?;
    playback.reverse = !playback.reverse;
    let result = routine(playback);
    playback.reverse = !playback.reverse;
    result
}

/// Sweep the strip.
///
/// `level` maps the distance below the sweep position to a brightness in
/// quarters of the configured level, `None` meaning off.
fn sweep<S, P, F>(playback: &mut Playback<'_, S, P>, overshoot: usize, level: F) -> Result<()>
where
    S: Strip,
    P: Pacer,
    F: Fn(usize) -> Option<u16>,
{
    let step = playback.frame();
    let brightness = playback.brightness;
    let reverse = playback.reverse;
    let len = playback.len();
    playback.strip.set_brightness(brightness);

    for head in traverse(len + overshoot, reverse) {
        for index in 0..len {
            let color = match head.checked_sub(index).and_then(&level) {
                Some(quarters) => scale_brightness(
                    playback.base_color(index),
                    quarter_level(brightness, quarters),
                ),
                None => BLACK,
            };
            playback.strip.set_pixel(index, color);
            playback.strip.show()?;
            playback.wait(step);
        }
    }

    if reverse {
        playback.clear()?;
    }
    Ok(())
}

#[allow(clippy::cast_possible_truncation)]
fn quarter_level(brightness: u8, quarters: u16) -> u8 {
    (u16::from(brightness) * quarters.min(FULL) / FULL) as u8
}
