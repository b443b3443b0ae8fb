use super::Playback;
use crate::color::scale_brightness;
use crate::error::Result;
use crate::pacer::Pacer;
use crate::strip::Strip;

/// Static pixel map, held for one frame
pub(super) fn solid<S: Strip, P: Pacer>(playback: &mut Playback<'_, S, P>) -> Result<()> {
    let brightness = playback.brightness;
    playback.strip.set_brightness(brightness);
    for (index, color) in playback.pixels.iter().enumerate() {
        playback
            .strip
            .set_pixel(index, scale_brightness(color, brightness));
    }
    playback.strip.show()?;

    playback.wait(playback.frame());
    Ok(())
}
