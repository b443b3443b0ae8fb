//! Random sparkle effects
//!
//! Each cycle lasts roughly two seconds regardless of speed: the frame
//! count is derived from the frame duration.

use embassy_time::Duration;
use rand::Rng;

use super::Playback;
use crate::color::{BLACK, Rgb};
use crate::error::Result;
use crate::pacer::Pacer;
use crate::strip::Strip;

const CYCLE_MICROS: u64 = 2_000_000;
const MIN_FRAME_MICROS: u64 = 1_000;

/// One random pixel in its pixel map color per frame
pub(super) fn twinkle<S: Strip, P: Pacer>(playback: &mut Playback<'_, S, P>) -> Result<()> {
    sparkle(playback, |playback, index| playback.base_color(index))
}

/// One random pixel in a random color per frame
pub(super) fn twinkle_colors<S: Strip, P: Pacer>(playback: &mut Playback<'_, S, P>) -> Result<()> {
    sparkle(playback, |playback, _| random_color(playback.rng))
}

/// Random pixels set to random colors or off, accumulating across frames
pub(super) fn noise<S: Strip, P: Pacer>(playback: &mut Playback<'_, S, P>) -> Result<()> {
    let step = playback.frame();
    let len = playback.len();
    if len == 0 {
        return Ok(());
    }
    playback.strip.set_brightness(playback.brightness);

    for _ in 0..frame_count(step) {
        if playback.clear_frames {
            playback.blank();
        }
        let touched = playback.rng.random_range(1..=(len / 2).max(1));
        for _ in 0..touched {
            let lit = playback.rng.random_bool(0.5);
            let index = playback.rng.random_range(0..len);
            let color = if lit {
                random_color(playback.rng)
            } else {
                BLACK
            };
            playback.strip.set_pixel(index, color);
        }
        playback.strip.show()?;
        playback.wait(step);
    }
    Ok(())
}

fn sparkle<S, P, F>(playback: &mut Playback<'_, S, P>, color_at: F) -> Result<()>
where
    S: Strip,
    P: Pacer,
    F: Fn(&mut Playback<'_, S, P>, usize) -> Rgb,
{
    let step = playback.frame();
    let len = playback.len();
    if len == 0 {
        return Ok(());
    }
    playback.strip.set_brightness(playback.brightness);
    playback.clear()?;

    for _ in 0..frame_count(step) {
        let index = playback.rng.random_range(0..len);
        let color = color_at(playback, index);
        playback.strip.set_pixel(index, color);
        playback.strip.show()?;
        playback.wait(step);
        playback.clear()?;
    }
    Ok(())
}

/// Frames that fit into one cycle
#[allow(clippy::cast_possible_truncation)]
fn frame_count(step: Duration) -> usize {
    (CYCLE_MICROS / step.as_micros().max(MIN_FRAME_MICROS)) as usize
}

fn random_color<R: Rng>(rng: &mut R) -> Rgb {
    Rgb::new(rng.random(), rng.random(), rng.random())
}
