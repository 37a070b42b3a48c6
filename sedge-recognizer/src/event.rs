//! Grammar events observed during recognition.

use sedge_symbol::Symbol;

/// An event fired while an Earley set was being built. Events are
/// queued in firing order and drained with [`Recognizer::events`].
///
/// [`Recognizer::events`]: crate::Recognizer::events
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ParseEvent {
    /// A symbol with a requested completion event was completed.
    SymbolCompleted { symbol: Symbol, earleme: u32 },
    /// A symbol with a requested nulled event derived the empty string.
    SymbolNulled { symbol: Symbol, earleme: u32 },
    /// A symbol with a requested prediction event was predicted.
    SymbolPredicted { symbol: Symbol, earleme: u32 },
    /// A terminal with a requested prediction event is expected at the
    /// current location.
    SymbolExpected { symbol: Symbol, earleme: u32 },
    /// No terminal is expected and no alternative is pending; the
    /// recognizer accepts no further input.
    Exhausted { earleme: u32 },
}
