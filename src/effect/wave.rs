//! Waving flag effects
//!
//! The base colors are drawn every frame and a dimmed comb travels across
//! them. The sweep runs past both ends so the comb enters and leaves.

use super::{Playback, traverse};
use crate::color::{BLUE, Rgb, YELLOW, scale_brightness};
use crate::error::Result;
use crate::pacer::Pacer;
use crate::strip::Strip;

/// Brightness of the comb taps, from the sweep position downwards
const COMB: [u8; 7] = [80, 60, 40, 20, 40, 60, 80];
const OVERSHOOT: usize = 8;

pub(super) fn wave<S: Strip, P: Pacer>(playback: &mut Playback<'_, S, P>) -> Result<()> {
    let pixels = playback.pixels;
    sweep_comb(playback, |index| pixels.get(index).unwrap_or_default())
}

/// Two-color flag split at the middle, colors swap when reversed
pub(super) fn slava_ukraini<S: Strip, P: Pacer>(playback: &mut Playback<'_, S, P>) -> Result<()> {
    let (first, second) = if playback.reverse {
        (BLUE, YELLOW)
    } else {
        (YELLOW, BLUE)
    };
    let len = playback.len();
    sweep_comb(playback, |index| {
        if 2 * index + 1 < len { first } else { second }
    })
}

fn sweep_comb<S, P, F>(playback: &mut Playback<'_, S, P>, color_at: F) -> Result<()>
where
    S: Strip,
    P: Pacer,
    F: Fn(usize) -> Rgb,
{
    let step = playback.frame();
    let len = playback.len();
    playback.strip.set_brightness(playback.brightness);

    for position in traverse(len + OVERSHOOT, playback.reverse) {
        for index in 0..len {
            playback.strip.set_pixel(index, color_at(index));
        }
        for (offset, level) in COMB.iter().enumerate() {
            let Some(index) = position.checked_sub(offset).filter(|index| *index < len) else {
                continue;
            };
            playback
                .strip
                .set_pixel(index, scale_brightness(color_at(index), *level));
        }
        playback.strip.show()?;
        playback.wait(step);
    }
    Ok(())
}
