//! Effect engine
//!
//! Owns the strip, the per-state pixel maps and the playback settings of
//! the selected state, and replays the selected routine until told to stop.

use std::collections::BTreeMap;

use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::config::{EffectConfig, EffectsSettings};
use crate::effect::{EffectId, EffectSpeed, Playback};
use crate::error::Result;
use crate::lifecycle::RunSignal;
use crate::pacer::{Pacer, ThreadPacer};
use crate::pixel_map::PixelMap;
use crate::state::PrinterState;
use crate::strip::{Strip, clear_strip};

/// Configuration used for states without their own entry
static FALLBACK_EFFECT: EffectConfig = EffectConfig {
    effect: None,
    color_1: None,
    color_2: None,
    speed: None,
    reverse: None,
    clear_frames: None,
};

const STATES: [PrinterState; 5] = [
    PrinterState::Printing,
    PrinterState::Standby,
    PrinterState::Paused,
    PrinterState::Error,
    PrinterState::Complete,
];

/// Playback settings resolved for the selected state
#[derive(Debug, Clone, Copy, PartialEq)]
struct Selection {
    state: PrinterState,
    effect: EffectId,
    speed: EffectSpeed,
    reverse: bool,
    clear_frames: bool,
}

impl Selection {
    fn resolve(state: PrinterState, config: &EffectConfig) -> Self {
        Self {
            state,
            effect: config.effect_id(),
            speed: config.speed(),
            reverse: config.reverse(),
            clear_frames: config.clear_frames(),
        }
    }
}

/// Effect Engine - renders looping effects for a printer state
pub struct EffectEngine<S, P = ThreadPacer> {
    // External dependencies and configuration
    strip: S,
    pacer: P,
    effects: EffectsSettings,
    brightness: u8,

    // Internal state
    pixel_maps: BTreeMap<PrinterState, PixelMap>,
    selection: Selection,
    rng: StdRng,
}

impl<S: Strip, P: Pacer> EffectEngine<S, P> {
    /// Create an engine and build the pixel map of every state
    ///
    /// Standby is selected initially.
    pub fn new(strip: S, pacer: P, brightness: u8, effects: EffectsSettings) -> Self {
        let state = PrinterState::Standby;
        let mut engine = Self {
            strip,
            pacer,
            brightness,
            pixel_maps: BTreeMap::new(),
            selection: Selection::resolve(state, config_for(&effects, state)),
            effects,
            rng: StdRng::from_os_rng(),
        };
        engine.rebuild_pixel_maps();
        engine
    }

    /// Use a specific random source, e.g. a seeded one
    #[must_use]
    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = rng;
        self
    }

    /// Replace the effect configuration and rebuild every pixel map
    pub fn set_effects(&mut self, effects: EffectsSettings) {
        self.effects = effects;
        self.rebuild_pixel_maps();
        self.select(self.selection.state);
    }

    /// Change the brightness used by subsequent draws
    ///
    /// Pixel maps keep their full colors, so nothing is rebuilt.
    pub fn set_brightness(&mut self, brightness: u8) {
        self.brightness = brightness;
    }

    /// Resolve effect, speed and direction for `state`
    pub fn select(&mut self, state: PrinterState) {
        let selection = Selection::resolve(state, config_for(&self.effects, state));
        log::debug!(
            "{state}: effect {}, speed {:?}, reverse {}",
            selection.effect,
            selection.speed,
            selection.reverse
        );
        self.selection = selection;
    }

    /// Render one full cycle of the selected effect
    pub fn run_cycle(&mut self) -> Result<()> {
        let Some(pixels) = self.pixel_maps.get(&self.selection.state) else {
            return Ok(());
        };
        let effect = self.selection.effect;
        let mut playback = Playback {
            strip: &mut self.strip,
            pacer: &self.pacer,
            rng: &mut self.rng,
            pixels,
            brightness: self.brightness,
            timing: effect.timing(),
            speed: self.selection.speed,
            reverse: self.selection.reverse,
            clear_frames: self.selection.clear_frames,
        };
        let result = effect.play(&mut playback);
        self.selection.reverse = playback.reverse;
        result
    }

    /// Select `state` and replay its effect until `signal` asks to stop
    ///
    /// The stop request is only observed between cycles. Blocks, so it is
    /// meant to run on its own thread.
    pub fn run_effect(&mut self, state: PrinterState, signal: &RunSignal) -> Result<()> {
        self.select(state);
        while let Some(_cycle) = signal.begin_cycle() {
            self.run_cycle()?;
        }
        log::trace!("{state}: effect loop exited");
        Ok(())
    }

    /// Turn every pixel off and flush
    pub fn clear_strip(&mut self) -> Result<()> {
        clear_strip(&mut self.strip)
    }

    pub fn pixel_map(&self, state: PrinterState) -> Option<&PixelMap> {
        self.pixel_maps.get(&state)
    }

    pub fn state(&self) -> PrinterState {
        self.selection.state
    }

    pub fn effect(&self) -> EffectId {
        self.selection.effect
    }

    pub fn reverse(&self) -> bool {
        self.selection.reverse
    }

    pub fn brightness(&self) -> u8 {
        self.brightness
    }

    pub fn strip(&self) -> &S {
        &self.strip
    }

    pub fn strip_mut(&mut self) -> &mut S {
        &mut self.strip
    }

    pub fn into_strip(self) -> S {
        self.strip
    }

    fn rebuild_pixel_maps(&mut self) {
        let pixel_count = self.strip.pixel_count();
        self.pixel_maps = STATES
            .into_iter()
            .map(|state| {
                let spec = config_for(&self.effects, state).color_spec();
                (state, PixelMap::build(spec, pixel_count))
            })
            .collect();
    }
}

fn config_for(effects: &EffectsSettings, state: PrinterState) -> &EffectConfig {
    effects.for_state(state).unwrap_or(&FALLBACK_EFFECT)
}
