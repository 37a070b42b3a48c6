//! Errors reported during evaluation.

use std::error::Error;
use std::fmt;

/// A rejected valuer construction.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ValueError {
    /// The tree holds no parse: none was pulled yet, or enumeration is
    /// exhausted.
    NoTree,
}

impl fmt::Display for ValueError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            ValueError::NoTree => write!(f, "the tree holds no parse"),
        }
    }
}

impl Error for ValueError {}
