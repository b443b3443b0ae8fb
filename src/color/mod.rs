mod gradient;
mod palette;
mod utils;

pub use gradient::fill_gradient;
pub use palette::{BLACK, BLUE, GREEN, ORANGE, PURPLE, RED, VIOLET, WHITE, YELLOW};
use smart_leds::RGB8;
pub use utils::{mix_colors, rgb_from_u32, scale_brightness};

pub type Rgb = RGB8;
