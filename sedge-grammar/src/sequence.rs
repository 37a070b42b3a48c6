//! Sequences are similar to regex repetitions.

use sedge_symbol::Symbol;

use crate::grammar::{ExternalRule, ExternalRuleKind, Grammar};
use crate::ExternalRuleId;

use self::Separator::*;

/// The separator symbol and mode of separation in a sequence, or `Null`
/// for no separation.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Separator {
    /// Separation with the trailing separator included. In other words,
    /// all elements are followed by the separator.
    Trailing(Symbol),
    /// The separator occurs between elements.
    Proper(Symbol),
    /// The union of `Trailing` and `Proper`. In other words, the
    /// trailing separator may or may not be present.
    Liberal(Symbol),
    /// No separation.
    Null,
}

impl Separator {
    /// The separator symbol, if any.
    pub fn symbol(self) -> Option<Symbol> {
        match self {
            Trailing(sep) | Proper(sep) | Liberal(sep) => Some(sep),
            Null => None,
        }
    }
}

/// Sequence rule builder.
pub struct SequenceRuleBuilder<'a> {
    grammar: &'a mut Grammar,
    lhs: Symbol,
    min: u32,
    separator: Separator,
    rank: i32,
    null_ranks_high: bool,
}

impl<'a> SequenceRuleBuilder<'a> {
    pub(crate) fn new(grammar: &'a mut Grammar, lhs: Symbol) -> Self {
        SequenceRuleBuilder {
            grammar,
            lhs,
            min: 1,
            separator: Separator::Null,
            rank: 0,
            null_ranks_high: false,
        }
    }

    /// Assigns the separator symbol and mode of separation.
    pub fn separator(mut self, sep: Separator) -> Self {
        self.separator = sep;
        self
    }

    /// Sets proper separation with the given separator symbol.
    pub fn intersperse(self, sym: Symbol) -> Self {
        self.separator(Separator::Proper(sym))
    }

    /// Assigns the minimum number of repetitions, zero or one.
    pub fn min(mut self, min: u32) -> Self {
        self.min = min;
        self
    }

    /// Assigns the sequence rule's rank.
    pub fn rank(mut self, rank: i32) -> Self {
        self.rank = rank;
        self
    }

    /// Orders the null variant of a zero-minimum sequence above its
    /// non-null variants when ranking ambiguous parses.
    pub fn null_ranks_high(mut self, yes: bool) -> Self {
        self.null_ranks_high = yes;
        self
    }

    /// Adds the sequence rule to the grammar, repeating `item`.
    pub fn rhs(self, item: Symbol) -> ExternalRuleId {
        let rule = ExternalRule {
            lhs: self.lhs,
            kind: ExternalRuleKind::Sequence {
                item,
                min: self.min,
                separator: self.separator,
            },
            rank: self.rank,
            null_ranks_high: self.null_ranks_high,
            assertions: vec![],
        };
        self.grammar.add_external_rule(rule)
    }
}
