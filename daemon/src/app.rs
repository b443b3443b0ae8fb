//! Polling loop: printer status in, strip effects out

use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::time::Instant;

use anyhow::Context;
use printer_light_composer::{
    EffectEngine, LifecycleController, Pacer, PrinterState, ProgressBar, Strip,
};

use crate::moonraker::{PrinterApi, PrintingStats};
use crate::settings::Settings;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

/// What the strip currently shows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Observed {
    Unknown,
    Unavailable,
    State(PrinterState),
}

/// Progress phase while printing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    BedHeating,
    HotendHeating,
    Printing,
}

impl Phase {
    fn of(stats: &PrintingStats) -> (Self, f64) {
        if stats.bed.is_heating() {
            (Self::BedHeating, stats.bed.heating_percent)
        } else if stats.extruder.is_heating() {
            (Self::HotendHeating, stats.extruder.heating_percent)
        } else {
            (Self::Printing, stats.done_percent)
        }
    }
}

struct ProgressBars {
    bed_heating: ProgressBar,
    hotend_heating: ProgressBar,
    printing: ProgressBar,
}

impl ProgressBars {
    fn new(settings: &Settings) -> Self {
        let brightness = settings.strip.layout.led_brightness;
        let progress = &settings.progress;
        Self {
            bed_heating: ProgressBar::new(progress.bed_heating, brightness),
            hotend_heating: ProgressBar::new(progress.hotend_heating, brightness),
            printing: ProgressBar::new(progress.printing, brightness),
        }
    }

    fn get(&self, phase: Phase) -> &ProgressBar {
        match phase {
            Phase::BedHeating => &self.bed_heating,
            Phase::HotendHeating => &self.hotend_heating,
            Phase::Printing => &self.printing,
        }
    }
}

pub struct App<S, P, A>
where
    S: Strip + Send + 'static,
    P: Pacer + 'static,
{
    settings: Settings,
    api: A,
    controller: LifecycleController<S, P>,
    bars: ProgressBars,
    observed: Observed,
    since: Instant,
    idle_off: bool,
}

impl<S, P, A> App<S, P, A>
where
    S: Strip + Send + 'static,
    P: Pacer + 'static,
    A: PrinterApi,
{
    pub fn new(settings: Settings, api: A, strip: S, pacer: P) -> Self {
        let engine = EffectEngine::new(
            strip,
            pacer,
            settings.strip.layout.led_brightness,
            settings.effects.clone(),
        );
        Self {
            bars: ProgressBars::new(&settings),
            settings,
            api,
            controller: LifecycleController::new(engine),
            observed: Observed::Unknown,
            since: Instant::now(),
            idle_off: false,
        }
    }

    /// Poll until the shutdown channel fires or the printer is powered off
    pub fn run(&mut self, shutdown: &Receiver<()>) -> anyhow::Result<()> {
        let poll_interval = self.settings.moonraker.poll_interval();
        loop {
            if self.tick(Instant::now())? == Flow::Exit {
                break;
            }
            match shutdown.recv_timeout(poll_interval) {
                Err(RecvTimeoutError::Timeout) => {}
                Ok(()) | Err(RecvTimeoutError::Disconnected) => {
                    log::info!("shutting down");
                    break;
                }
            }
        }
        self.controller.stop().context("failed to clear the strip")
    }

    /// One poll of the printer status
    pub fn tick(&mut self, now: Instant) -> anyhow::Result<Flow> {
        let observed = match self.api.printer_state() {
            Some(state) => Observed::State(state),
            None => Observed::Unavailable,
        };
        let changed = observed != self.observed;
        if changed {
            log::info!("printer state: {}", describe(observed));
            self.since = now;
            self.idle_off = false;
        }
        self.observed = observed;

        match observed {
            Observed::Unknown => Ok(Flow::Continue),
            Observed::Unavailable => {
                if changed {
                    self.controller.stop()?;
                }
                Ok(Flow::Continue)
            }
            Observed::State(PrinterState::Printing) => {
                if changed {
                    self.api.reset_base_temps();
                }
                self.show_progress()?;
                Ok(Flow::Continue)
            }
            Observed::State(state) => self.show_effect(state, changed, now),
        }
    }

    #[cfg(test)]
    fn controller(&self) -> &LifecycleController<S, P> {
        &self.controller
    }

    fn show_progress(&mut self) -> anyhow::Result<()> {
        let stats = match self.api.printing_stats() {
            Ok(stats) => stats,
            Err(err) => {
                log::warn!("no printing stats: {err:#}");
                // The previous state's effect must not outlive the change to printing
                if self.controller.current_state().is_some() {
                    self.controller.stop()?;
                }
                return Ok(());
            }
        };

        let (phase, percent) = Phase::of(&stats);
        log::debug!(
            "{phase:?}: {percent}% (bed power {}%, hotend power {}%)",
            stats.bed.power_percent,
            stats.extruder.power_percent
        );
        #[allow(clippy::cast_possible_truncation)]
        let percent = percent as f32;
        self.controller.set_progress(self.bars.get(phase), percent)?;
        Ok(())
    }

    fn show_effect(
        &mut self,
        state: PrinterState,
        changed: bool,
        now: Instant,
    ) -> anyhow::Result<Flow> {
        if self.idle_off {
            return self.check_power_off(state);
        }

        if self.idle_timed_out(state, now) {
            log::info!("{state} for too long, turning the strip off");
            self.controller.stop()?;
            self.idle_off = true;
            return self.check_power_off(state);
        }

        if changed || self.controller.current_state().is_none() {
            self.controller.transition(state)?;
        }
        self.check_power_off(state)
    }

    fn idle_timed_out(&self, state: PrinterState, now: Instant) -> bool {
        let idle = matches!(state, PrinterState::Standby | PrinterState::Complete);
        match self.settings.strip.idle_timeout() {
            Some(timeout) if idle => now.saturating_duration_since(self.since) > timeout,
            _ => false,
        }
    }

    fn check_power_off(&mut self, state: PrinterState) -> anyhow::Result<Flow> {
        let shutdown = self.settings.shutdown;
        if !shutdown.when_complete || state != PrinterState::Complete {
            return Ok(Flow::Continue);
        }

        let stats = match self.api.printing_stats() {
            Ok(stats) => stats,
            Err(err) => {
                log::warn!("no heater temperatures: {err:#}");
                return Ok(Flow::Continue);
            }
        };
        if stats.bed.temp >= shutdown.bed_temp_for_off
            || stats.extruder.temp >= shutdown.hotend_temp_for_off
        {
            return Ok(Flow::Continue);
        }

        log::info!(
            "print complete and cooled down (bed {}°C, hotend {}°C), powering off",
            stats.bed.temp,
            stats.extruder.temp
        );
        self.controller.stop()?;
        self.api.power_off()?;
        Ok(Flow::Exit)
    }
}

fn describe(observed: Observed) -> &'static str {
    match observed {
        Observed::Unknown => "unknown",
        Observed::Unavailable => "unavailable",
        Observed::State(state) => state.as_str(),
    }
}
