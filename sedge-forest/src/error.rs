//! Errors reported while building forests and orders.

use std::error::Error;
use std::fmt;

/// A rejected forest construction.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ForestError {
    /// No accepted parse ends at the requested earleme.
    NoParse(u32),
    /// The requested end position lies beyond the recognized input.
    BadEarleme(u32),
    /// The recognizer never started input.
    NotStarted,
    /// A token was revoked and the recognizer was not cleaned.
    Inconsistent,
}

impl fmt::Display for ForestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            ForestError::NoParse(earleme) => {
                write!(f, "no parse ends at earleme {}", earleme)
            }
            ForestError::BadEarleme(earleme) => {
                write!(f, "earleme {} was never reached", earleme)
            }
            ForestError::NotStarted => {
                write!(f, "the recognizer never started input")
            }
            ForestError::Inconsistent => {
                write!(f, "the recognizer holds revoked tokens and needs cleaning")
            }
        }
    }
}

impl Error for ForestError {}

/// A rejected order mutation.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum OrderError {
    /// The order was already used for enumeration and cannot change.
    Frozen,
}

impl fmt::Display for OrderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            OrderError::Frozen => write!(f, "the order is frozen"),
        }
    }
}

impl Error for OrderError {}
