//! Errors reported by the recognizer.

use std::error::Error;
use std::fmt;

use sedge_symbol::Symbol;

use sedge_grammar::AssertionId;

/// A rejected recognizer call. Except for [`ItemCountOverflow`], which
/// kills the recognizer, a rejected call leaves the parse state exactly
/// as it was.
///
/// [`ItemCountOverflow`]: RecognitionError::ItemCountOverflow
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum RecognitionError {
    /// Input has not been started yet.
    NotStarted,
    /// Input was already started.
    AlreadyStarted,
    /// The token symbol is not a terminal.
    NotATerminal(Symbol),
    /// No item at the current location expects the token symbol.
    UnexpectedToken(Symbol),
    /// The token length is zero or larger than [`MAX_TOKEN_LENGTH`].
    ///
    /// [`MAX_TOKEN_LENGTH`]: crate::MAX_TOKEN_LENGTH
    BadTokenLength(u32),
    /// The same symbol was already queued or scanned over the same span.
    DuplicateToken(Symbol),
    /// No such zero-width assertion.
    UnknownAssertion(AssertionId),
    /// No event of this class was requested for the symbol.
    EventNotRequested(Symbol),
    /// No queued or scanned token matches the given symbol and span.
    UnknownToken(Symbol),
    /// An Earley set outgrew the item ordinal width. The recognizer is
    /// permanently unusable.
    ItemCountOverflow,
    /// A previous fatal condition already killed this recognizer.
    Dead,
}

impl fmt::Display for RecognitionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            RecognitionError::NotStarted => write!(f, "input has not been started"),
            RecognitionError::AlreadyStarted => write!(f, "input was already started"),
            RecognitionError::NotATerminal(sym) => {
                write!(f, "symbol {:?} is not a terminal", sym)
            }
            RecognitionError::UnexpectedToken(sym) => {
                write!(f, "symbol {:?} is not expected at this location", sym)
            }
            RecognitionError::BadTokenLength(len) => {
                write!(f, "token length {} is out of range", len)
            }
            RecognitionError::DuplicateToken(sym) => {
                write!(f, "symbol {:?} was already read over this span", sym)
            }
            RecognitionError::UnknownAssertion(id) => {
                write!(f, "assertion {} does not exist", id)
            }
            RecognitionError::EventNotRequested(sym) => {
                write!(f, "no event was requested for symbol {:?}", sym)
            }
            RecognitionError::UnknownToken(sym) => {
                write!(f, "no token with symbol {:?} matches the span", sym)
            }
            RecognitionError::ItemCountOverflow => {
                write!(f, "an Earley set outgrew the item ordinal width")
            }
            RecognitionError::Dead => {
                write!(f, "the recognizer was killed by an earlier fatal error")
            }
        }
    }
}

impl Error for RecognitionError {}
