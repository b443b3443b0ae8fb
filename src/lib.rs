pub mod color;
pub mod config;
pub mod effect;
pub mod engine;
pub mod error;
pub mod lifecycle;
pub mod pacer;
pub mod pixel_map;
pub mod progress;
pub mod state;
pub mod strip;

pub use config::{
    ColorValue, EffectConfig, EffectsSettings, ProgressConfig, ProgressSettings, StripSettings,
};
pub use effect::{EffectId, EffectSpeed, FrameTiming};
pub use engine::EffectEngine;
pub use error::{Error, Result};
pub use lifecycle::{LifecycleController, RunSignal};
pub use pacer::{NoDelay, Pacer, ThreadPacer};
pub use pixel_map::{ColorSpec, PixelMap};
pub use progress::ProgressBar;
pub use state::PrinterState;
pub use strip::{MemoryStrip, SmartLedsStrip, Strip, StripEvent, StripLog, StripOp, clear_strip};

pub use color::Rgb;
pub use embassy_time::Duration;
