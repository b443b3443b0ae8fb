use thiserror::Error;

use crate::state::PrinterState;

#[derive(Debug, Error)]
pub enum Error {
    /// Flushing the frame to the strip failed
    #[error("strip write failed: {0}")]
    Strip(String),

    /// An effect thread is alive and has not been stopped
    #[error("an effect is already running for {0}")]
    AlreadyRunning(PrinterState),

    /// The animation thread panicked and took the strip with it
    #[error("animation thread panicked, strip is no longer available")]
    EngineLost,

    /// The animation thread could not be spawned
    #[error("failed to spawn animation thread")]
    Spawn(#[source] std::io::Error),
}

pub type Result<T> = core::result::Result<T, Error>;
