//! Named reference colors
//!
//! The seven rainbow stops plus the two colors every strip needs. The stops
//! are reference colors: the rainbow pixel map blends red, green and purple
//! only, so `VIOLET` and `ORANGE` are never drawn by it.
#![allow(clippy::unreadable_literal)]

use super::{Rgb, rgb_from_u32};

pub const VIOLET: Rgb = rgb_from_u32(0x9400D3);
pub const PURPLE: Rgb = rgb_from_u32(0x4B0082);
pub const BLUE: Rgb = rgb_from_u32(0x0000FF);
pub const GREEN: Rgb = rgb_from_u32(0x00FF00);
pub const YELLOW: Rgb = rgb_from_u32(0xFFFF00);
pub const ORANGE: Rgb = rgb_from_u32(0xFF7F00);
pub const RED: Rgb = rgb_from_u32(0xFF0000);

pub const WHITE: Rgb = rgb_from_u32(0xFFFFFF);
pub const BLACK: Rgb = rgb_from_u32(0x000000);
