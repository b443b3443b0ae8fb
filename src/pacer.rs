//! Frame pacing
//!
//! Routines never sleep on their own. They ask a [`Pacer`] to wait between
//! frames, so the same routine can drive hardware in real time or run
//! instantly under test.

use embassy_time::Duration;

/// Waits between frames
pub trait Pacer: Send {
    /// Block the calling thread for `duration`
    fn pause(&self, duration: Duration);
}

/// Sleeps the current thread
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadPacer;

impl Pacer for ThreadPacer {
    fn pause(&self, duration: Duration) {
        let micros = duration.as_micros();
        if micros > 0 {
            std::thread::sleep(std::time::Duration::from_micros(micros));
        }
    }
}

/// Never waits
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDelay;

impl Pacer for NoDelay {
    fn pause(&self, _duration: Duration) {}
}
