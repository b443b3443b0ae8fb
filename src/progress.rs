//! Progress bar renderer

use crate::color::{Rgb, mix_colors, scale_brightness};
use crate::config::ProgressConfig;
use crate::error::Result;
use crate::strip::Strip;

/// Renders a percentage as a partially filled bar with one blended boundary
/// pixel
///
/// Each call redraws the whole strip and flushes it once. Nothing is kept
/// between calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressBar {
    config: ProgressConfig,
    brightness: u8,
}

impl ProgressBar {
    pub const fn new(config: ProgressConfig, brightness: u8) -> Self {
        Self { config, brightness }
    }

    pub const fn config(&self) -> &ProgressConfig {
        &self.config
    }

    pub const fn brightness(&self) -> u8 {
        self.brightness
    }

    /// Draw `percent` (clamped to 0..=100) of the strip in the progress color
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_precision_loss,
        clippy::cast_sign_loss
    )]
    pub fn set_progress<S: Strip + ?Sized>(&self, strip: &mut S, percent: f32) -> Result<()> {
        let count = strip.pixel_count();
        let percent = if percent.is_finite() {
            f64::from(percent).clamp(0.0, 100.0)
        } else {
            0.0
        };
        let upper_bar = percent / 100.0 * count as f64;
        let whole = (upper_bar.floor() as usize).min(count);
        let remainder = upper_bar - upper_bar.floor();

        let position = |index: usize| {
            if self.config.reverse {
                count - 1 - index
            } else {
                index
            }
        };

        strip.set_brightness(self.brightness);
        let mut index = 0;
        while index < whole {
            strip.set_pixel(position(index), self.scaled(self.config.progress_color));
            index += 1;
        }

        if remainder > 0.0 && index < count {
            let tween = mix_colors(
                self.config.progress_color,
                self.config.base_color,
                Some(remainder as f32),
            );
            strip.set_pixel(position(index), self.scaled(tween));
            index += 1;
        }

        while index < count {
            strip.set_pixel(position(index), self.scaled(self.config.base_color));
            index += 1;
        }

        strip.show()
    }

    fn scaled(&self, color: Rgb) -> Rgb {
        scale_brightness(color, self.brightness)
    }
}
