//! Per-state pixel maps
//!
//! A pixel map holds the base color of every physical pixel for one printer
//! state. It is built once from a [`ColorSpec`] when configuration is loaded
//! and never changes during playback; brightness is applied per draw.

use crate::color::{GREEN, PURPLE, RED, Rgb, fill_gradient};

/// How the pixels of a state are colored
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorSpec {
    /// Every pixel has the same color
    Solid(Rgb),
    /// Two-color gradient from the first pixel to the last
    Gradient(Rgb, Rgb),
    /// Fixed red -> green -> purple spectrum
    Rainbow,
}

/// Ordered base colors, one per physical pixel
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PixelMap {
    pixels: Vec<Rgb>,
}

impl PixelMap {
    /// Build the pixel map of a color spec for a strip of `pixel_count` LEDs
    pub fn build(spec: ColorSpec, pixel_count: usize) -> Self {
        let mut pixels = vec![Rgb::default(); pixel_count];
        match spec {
            ColorSpec::Solid(color) => pixels.fill(color),
            ColorSpec::Gradient(start, end) => fill_two_color(&mut pixels, start, end),
            ColorSpec::Rainbow => fill_rainbow(&mut pixels),
        }
        Self { pixels }
    }

    pub fn len(&self) -> usize {
        self.pixels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    /// Color of the pixel at `index`
    pub fn get(&self, index: usize) -> Option<Rgb> {
        self.pixels.get(index).copied()
    }

    pub fn as_slice(&self) -> &[Rgb] {
        &self.pixels
    }

    pub fn iter(&self) -> impl Iterator<Item = Rgb> + '_ {
        self.pixels.iter().copied()
    }
}

/// First pixel is `start`, last is `end`; interior pixel `i` carries
/// `i / (N - 2)` of `end`, so the blend reaches `end` one pixel early.
fn fill_two_color(pixels: &mut [Rgb], start: Rgb, end: Rgb) {
    let Some(last) = pixels.len().checked_sub(1) else {
        return;
    };
    if last == 0 {
        pixels[0] = start;
        return;
    }

    fill_gradient(pixels, 0, start, last - 1, end);
    pixels[0] = start;
    pixels[last] = end;
}

/// Red at the head, green at the middle, purple at the tail
fn fill_rainbow(pixels: &mut [Rgb]) {
    let Some(last) = pixels.len().checked_sub(1) else {
        return;
    };
    let middle = (pixels.len() / 2).saturating_sub(1);

    fill_gradient(pixels, 0, RED, middle, GREEN);
    fill_gradient(pixels, middle, GREEN, last, PURPLE);
}
