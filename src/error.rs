use crate::common::{Int, UInt};
use crate::stats::StatSystem;

/// Rejected user input. Faults outside the roll itself (storage, configuration)
/// have their own error types so hosts can tell the two apart.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum RollError {
    #[error("invalid dice expression: {0:?}")]
    MalformedExpression(String),
    #[error(transparent)]
    LimitExceeded(#[from] LimitExceeded),
    #[error("unknown stat system {0:?}; available: {ids}", ids = StatSystem::ids())]
    UnknownSystem(String),
    #[error("invalid modifier: {0:?}")]
    InvalidModifier(String),
}

#[derive(thiserror::Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum LimitExceeded {
    #[error("too many dice! maximum is {max}")]
    TooManyDice { max: usize },
    #[error("too many sides! maximum is {max}")]
    TooManySides { max: UInt },
    #[error("must roll at least one die")]
    NoDice,
    #[error("dice must have at least 1 side")]
    NoSides,
    #[error("maximum {max} rolls at once")]
    TooManyRepeats { max: usize },
    #[error("must roll at least once")]
    NoRepeats,
}

impl LimitExceeded {
    /// The configured ceiling that was crossed, if any.
    pub fn limit(&self) -> Option<Int> {
        match *self {
            Self::TooManyDice { max } | Self::TooManyRepeats { max } => Some(max as Int),
            Self::TooManySides { max } => Some(max as Int),
            Self::NoDice | Self::NoSides | Self::NoRepeats => None,
        }
    }
}
