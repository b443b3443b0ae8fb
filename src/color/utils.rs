use crate::color::Rgb;

/// Mix two RGB colors
///
/// # Arguments
/// * `a` - First color
/// * `b` - Second color
/// * `share_of_a` - Weight of `a` (0.0 = all b, 1.0 = all a). `None` averages
///   both colors evenly.
///
/// Each channel is rounded half away from zero.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn mix_colors(a: Rgb, b: Rgb, share_of_a: Option<f32>) -> Rgb {
    let share = share_of_a.unwrap_or(0.5).clamp(0.0, 1.0);
    let mix = |x: u8, y: u8| {
        (f32::from(x) * share + f32::from(y) * (1.0 - share))
            .round()
            .clamp(0.0, 255.0) as u8
    };

    Rgb {
        r: mix(a.r, b.r),
        g: mix(a.g, b.g),
        b: mix(a.b, b.b),
    }
}

/// Scale a color by a brightness level (0-255 = 0.0-1.0)
///
/// Truncates instead of rounding, so 255 is identity and 0 is black.
#[inline]
#[allow(clippy::cast_possible_truncation)]
pub const fn scale_brightness(color: Rgb, brightness: u8) -> Rgb {
    const fn scale(value: u8, brightness: u8) -> u8 {
        ((value as u16 * brightness as u16) / 255) as u8
    }

    Rgb {
        r: scale(color.r, brightness),
        g: scale(color.g, brightness),
        b: scale(color.b, brightness),
    }
}

/// Create an RGB color from a u32 value (0xRRGGBB format)
#[allow(clippy::cast_possible_truncation)]
pub const fn rgb_from_u32(color: u32) -> Rgb {
    Rgb {
        r: ((color >> 16) & 0xFF) as u8,
        g: ((color >> 8) & 0xFF) as u8,
        b: (color & 0xFF) as u8,
    }
}
