use crate::color::{Rgb, mix_colors};

/// Fill a linear gradient between two positions (inclusive)
///
/// The pixel at `start_pos` gets `start_color`, the pixel at `end_pos` gets
/// `end_color` and every pixel in between is mixed proportionally to its
/// distance from the start. Positions past the end of `leds` are skipped.
#[allow(clippy::cast_precision_loss)]
pub fn fill_gradient(
    leds: &mut [Rgb],
    start_pos: usize,
    start_color: Rgb,
    end_pos: usize,
    end_color: Rgb,
) {
    if leds.is_empty() {
        return;
    }

    // Ensure proper ordering
    let (start_pos, end_pos, start_color, end_color) = if end_pos < start_pos {
        (end_pos, start_pos, end_color, start_color)
    } else {
        (start_pos, end_pos, start_color, end_color)
    };

    let distance = end_pos - start_pos;
    for (pos, led) in leds
        .iter_mut()
        .enumerate()
        .take(end_pos + 1)
        .skip(start_pos)
    {
        *led = if distance == 0 {
            start_color
        } else {
            let share_of_end = (pos - start_pos) as f32 / distance as f32;
            mix_colors(end_color, start_color, Some(share_of_end))
        };
    }
}
