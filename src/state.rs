use core::fmt;

const STATE_NAME_PRINTING: &str = "printing";
const STATE_NAME_STANDBY: &str = "standby";
const STATE_NAME_PAUSED: &str = "paused";
const STATE_NAME_ERROR: &str = "error";
const STATE_NAME_COMPLETE: &str = "complete";

/// Printer state as reported by the status provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PrinterState {
    Printing,
    Standby,
    Paused,
    Error,
    Complete,
}

impl PrinterState {
    /// States rendered by a looping effect. Printing is rendered as progress.
    pub const ANIMATED: [Self; 4] = [Self::Standby, Self::Paused, Self::Error, Self::Complete];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Printing => STATE_NAME_PRINTING,
            Self::Standby => STATE_NAME_STANDBY,
            Self::Paused => STATE_NAME_PAUSED,
            Self::Error => STATE_NAME_ERROR,
            Self::Complete => STATE_NAME_COMPLETE,
        }
    }

    pub fn parse_from_str(s: &str) -> Option<Self> {
        match s {
            STATE_NAME_PRINTING => Some(Self::Printing),
            STATE_NAME_STANDBY => Some(Self::Standby),
            STATE_NAME_PAUSED => Some(Self::Paused),
            STATE_NAME_ERROR => Some(Self::Error),
            STATE_NAME_COMPLETE => Some(Self::Complete),
            _ => None,
        }
    }

    /// Returns if the state is shown with a looping effect
    pub const fn is_animated(self) -> bool {
        !matches!(self, Self::Printing)
    }
}

impl fmt::Display for PrinterState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
