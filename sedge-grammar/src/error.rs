//! Errors and warnings reported by grammar precomputation.

use std::error::Error;
use std::fmt;

use sedge_symbol::Symbol;

use crate::ExternalRuleId;

/// A defect that makes a grammar unusable, detected while building it or
/// during precomputation. A rejected call leaves the grammar unchanged.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum GrammarError {
    /// The grammar has no rules at all.
    NoRules,
    /// No start symbol was assigned before precomputation.
    NoStart,
    /// A symbol id does not belong to this grammar's symbol space.
    BadSymbol(Symbol),
    /// A rule is malformed: a symbol out of range, or a sequence bound
    /// other than zero or one.
    BadRule(ExternalRuleId),
    /// The same LHS/RHS pair was added twice.
    DuplicateRule(ExternalRuleId),
    /// A sequence rule's LHS is also the LHS of another rule.
    SequenceLhsNotUnique(Symbol),
    /// The start symbol derives no string of terminals.
    UnproductiveStart(Symbol),
    /// A terminal symbol can derive the empty string.
    NullingTerminal(Symbol),
    /// A sequence counts repetitions of a nullable symbol, making the
    /// repetition count of the empty string ambiguous.
    CountedNullable(Symbol),
}

impl fmt::Display for GrammarError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            GrammarError::NoRules => write!(f, "grammar has no rules"),
            GrammarError::NoStart => write!(f, "grammar has no start symbol"),
            GrammarError::BadSymbol(sym) => {
                write!(f, "symbol {:?} is not part of this grammar", sym)
            }
            GrammarError::BadRule(rule) => write!(f, "rule {} is malformed", rule),
            GrammarError::DuplicateRule(rule) => {
                write!(f, "rule {} duplicates an earlier rule", rule)
            }
            GrammarError::SequenceLhsNotUnique(sym) => {
                write!(f, "sequence LHS {:?} also appears as another rule's LHS", sym)
            }
            GrammarError::UnproductiveStart(sym) => {
                write!(f, "start symbol {:?} is unproductive", sym)
            }
            GrammarError::NullingTerminal(sym) => {
                write!(f, "terminal {:?} can derive the empty string", sym)
            }
            GrammarError::CountedNullable(sym) => {
                write!(f, "sequence counts the nullable symbol {:?}", sym)
            }
        }
    }
}

impl Error for GrammarError {}

/// A non-fatal condition noticed during precomputation. The compiled
/// grammar is usable; callers decide whether to reject it.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum GrammarWarning {
    /// The rule participates in a cycle of unit derivations.
    CyclicRule(ExternalRuleId),
    /// The symbol cannot be reached from the start symbol.
    InaccessibleSymbol(Symbol),
    /// The symbol derives no string of terminals; rules using it are
    /// dropped from the compiled grammar.
    UnproductiveSymbol(Symbol),
}

impl fmt::Display for GrammarWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            GrammarWarning::CyclicRule(rule) => {
                write!(f, "rule {} participates in a unit-derivation cycle", rule)
            }
            GrammarWarning::InaccessibleSymbol(sym) => {
                write!(f, "symbol {:?} is inaccessible from the start symbol", sym)
            }
            GrammarWarning::UnproductiveSymbol(sym) => {
                write!(f, "symbol {:?} is unproductive", sym)
            }
        }
    }
}
