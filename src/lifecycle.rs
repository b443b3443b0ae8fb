//! Lifecycle controller
//!
//! Runs the effect engine on a background thread and stops it
//! synchronously. The engine owns the strip and is moved into the thread,
//! then handed back through the join handle, so the control loop can only
//! draw once the animation thread is gone.

use std::mem;
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};

use crate::engine::EffectEngine;
use crate::error::{Error, Result};
use crate::pacer::{Pacer, ThreadPacer};
use crate::progress::ProgressBar;
use crate::state::PrinterState;
use crate::strip::Strip;

#[derive(Debug, Default)]
struct Flags {
    stop_requested: bool,
    running: bool,
}

/// Stop flag and running indicator shared with the animation thread
#[derive(Debug, Default)]
pub struct RunSignal {
    flags: Mutex<Flags>,
    changed: Condvar,
}

impl RunSignal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask the effect loop to exit after the current cycle
    pub fn stop_thread(&self) {
        self.flags().stop_requested = true;
        self.changed.notify_all();
    }

    /// Allow the effect loop to run
    pub fn start_thread(&self) {
        self.flags().stop_requested = false;
    }

    pub fn is_stop_requested(&self) -> bool {
        self.flags().stop_requested
    }

    /// Returns if a cycle is being rendered right now
    pub fn effect_running(&self) -> bool {
        self.flags().running
    }

    /// Block until no cycle is being rendered
    pub fn wait_idle(&self) {
        let guard = self.flags();
        let _guard = self
            .changed
            .wait_while(guard, |flags| flags.running)
            .unwrap_or_else(PoisonError::into_inner);
    }

    /// Mark a cycle as started unless a stop was requested
    ///
    /// Checking the flag and raising the indicator happen under one lock, so
    /// once a stopper has seen the loop idle it never draws again. The
    /// indicator drops with the returned guard, also when the cycle panics.
    pub(crate) fn begin_cycle(&self) -> Option<CycleGuard<'_>> {
        let mut flags = self.flags();
        if flags.stop_requested {
            return None;
        }
        flags.running = true;
        Some(CycleGuard { signal: self })
    }

    fn end_cycle(&self) {
        self.flags().running = false;
        self.changed.notify_all();
    }

    fn flags(&self) -> MutexGuard<'_, Flags> {
        self.flags.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Keeps the running indicator raised while a cycle renders
pub(crate) struct CycleGuard<'a> {
    signal: &'a RunSignal,
}

impl Drop for CycleGuard<'_> {
    fn drop(&mut self) {
        self.signal.end_cycle();
    }
}

type EffectThread<S, P> = JoinHandle<(EffectEngine<S, P>, Result<()>)>;

enum EngineSlot<S, P> {
    Idle(EffectEngine<S, P>),
    Running {
        state: PrinterState,
        thread: EffectThread<S, P>,
    },
    Lost,
}

/// Starts and stops looping effects, at most one at a time
pub struct LifecycleController<S, P = ThreadPacer>
where
    S: Strip + Send + 'static,
    P: Pacer + 'static,
{
    signal: Arc<RunSignal>,
    slot: EngineSlot<S, P>,
}

impl<S, P> LifecycleController<S, P>
where
    S: Strip + Send + 'static,
    P: Pacer + 'static,
{
    pub fn new(engine: EffectEngine<S, P>) -> Self {
        Self {
            signal: Arc::new(RunSignal::new()),
            slot: EngineSlot::Idle(engine),
        }
    }

    /// Start the looping effect of `state` on a background thread
    ///
    /// Fails with [`Error::AlreadyRunning`] while another effect is alive.
    pub fn start(&mut self, state: PrinterState) -> Result<()> {
        let engine = match mem::replace(&mut self.slot, EngineSlot::Lost) {
            EngineSlot::Idle(engine) => engine,
            EngineSlot::Running {
                state: running,
                thread,
            } => {
                self.slot = EngineSlot::Running {
                    state: running,
                    thread,
                };
                return Err(Error::AlreadyRunning(running));
            }
            EngineSlot::Lost => return Err(Error::EngineLost),
        };

        self.signal.start_thread();
        let signal = Arc::clone(&self.signal);
        let thread = thread::Builder::new()
            .name(format!("effect-{state}"))
            .spawn(move || {
                let mut engine = engine;
                let result = engine.run_effect(state, &signal);
                (engine, result)
            })
            .map_err(Error::Spawn)?;

        log::debug!("{state}: effect thread started");
        self.slot = EngineSlot::Running { state, thread };
        Ok(())
    }

    /// Stop the running effect, if any, and blank the strip
    pub fn stop(&mut self) -> Result<()> {
        let stopped = self.halt();
        let cleared = match &mut self.slot {
            EngineSlot::Idle(engine) => engine.clear_strip(),
            _ => Ok(()),
        };
        stopped.and(cleared)
    }

    /// Stop whatever runs and start the effect of `state` if it has one
    pub fn transition(&mut self, state: PrinterState) -> Result<()> {
        self.stop()?;
        if state.is_animated() {
            self.start(state)?;
        }
        Ok(())
    }

    /// Stop any effect and draw a progress bar
    pub fn set_progress(&mut self, bar: &ProgressBar, percent: f32) -> Result<()> {
        self.halt()?;
        match &mut self.slot {
            EngineSlot::Idle(engine) => bar.set_progress(engine.strip_mut(), percent),
            _ => Err(Error::EngineLost),
        }
    }

    /// Stop any effect and turn the strip off
    pub fn clear_strip(&mut self) -> Result<()> {
        self.stop()
    }

    /// Returns if a cycle is being rendered right now
    pub fn effect_running(&self) -> bool {
        self.signal.effect_running()
    }

    /// State whose effect thread is alive
    pub fn current_state(&self) -> Option<PrinterState> {
        match &self.slot {
            EngineSlot::Running { state, .. } => Some(*state),
            _ => None,
        }
    }

    /// Shared stop flag and running indicator
    pub fn signal(&self) -> &RunSignal {
        &self.signal
    }

    /// The engine, while no effect is running
    pub fn engine(&self) -> Option<&EffectEngine<S, P>> {
        match &self.slot {
            EngineSlot::Idle(engine) => Some(engine),
            _ => None,
        }
    }

    /// The engine, while no effect is running
    pub fn engine_mut(&mut self) -> Option<&mut EffectEngine<S, P>> {
        match &mut self.slot {
            EngineSlot::Idle(engine) => Some(engine),
            _ => None,
        }
    }

    /// Stop, blank the strip and give the engine back
    pub fn into_engine(mut self) -> Result<EffectEngine<S, P>> {
        self.stop()?;
        match mem::replace(&mut self.slot, EngineSlot::Lost) {
            EngineSlot::Idle(engine) => Ok(engine),
            _ => Err(Error::EngineLost),
        }
    }

    /// Synchronous stop: raise the flag, wait for the loop to go idle and
    /// take the engine back
    fn halt(&mut self) -> Result<()> {
        let (state, thread) = match mem::replace(&mut self.slot, EngineSlot::Lost) {
            EngineSlot::Running { state, thread } => (state, thread),
            EngineSlot::Lost => return Err(Error::EngineLost),
            idle @ EngineSlot::Idle(_) => {
                self.slot = idle;
                return Ok(());
            }
        };

        self.signal.stop_thread();
        self.signal.wait_idle();
        match thread.join() {
            Ok((engine, result)) => {
                log::debug!("{state}: effect thread stopped");
                self.slot = EngineSlot::Idle(engine);
                result
            }
            Err(_) => {
                log::error!("{state}: effect thread panicked");
                Err(Error::EngineLost)
            }
        }
    }
}

impl<S, P> Drop for LifecycleController<S, P>
where
    S: Strip + Send + 'static,
    P: Pacer + 'static,
{
    fn drop(&mut self) {
        if let Err(err) = self.halt() {
            if !matches!(err, Error::EngineLost) {
                log::warn!("effect stopped with error: {err}");
            }
        }
    }
}
