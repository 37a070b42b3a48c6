//! Grammar rules can be built with the builder pattern.

use sedge_symbol::Symbol;

use crate::grammar::{ExternalRule, ExternalRuleKind, Grammar};
use crate::AssertionId;

/// The rule builder. Modifiers apply to the next call to `rhs` and are
/// reset afterwards.
pub struct RuleBuilder<'a> {
    grammar: &'a mut Grammar,
    lhs: Symbol,
    rank: i32,
    null_ranks_high: bool,
    assertions: Vec<AssertionId>,
}

impl<'a> RuleBuilder<'a> {
    pub(crate) fn new(grammar: &'a mut Grammar, lhs: Symbol) -> Self {
        RuleBuilder {
            grammar,
            lhs,
            rank: 0,
            null_ranks_high: false,
            assertions: vec![],
        }
    }

    /// Starts building a new rule with the given LHS.
    pub fn rule(mut self, lhs: Symbol) -> Self {
        self.lhs = lhs;
        self.reset();
        self
    }

    /// Assigns the rank of the next rule alternative.
    pub fn rank(mut self, rank: i32) -> Self {
        self.rank = rank;
        self
    }

    /// Orders null variants of the next alternative above non-null
    /// variants when ranking ambiguous parses.
    pub fn null_ranks_high(mut self, yes: bool) -> Self {
        self.null_ranks_high = yes;
        self
    }

    /// Gates the next alternative's prediction on a zero-width
    /// assertion.
    pub fn assertion(mut self, assertion: AssertionId) -> Self {
        self.assertions.push(assertion);
        self
    }

    /// Adds a rule alternative to the grammar.
    pub fn rhs(mut self, syms: impl AsRef<[Symbol]>) -> Self {
        let rule = ExternalRule {
            lhs: self.lhs,
            kind: ExternalRuleKind::Bnf {
                rhs: syms.as_ref().into(),
            },
            rank: self.rank,
            null_ranks_high: self.null_ranks_high,
            assertions: std::mem::take(&mut self.assertions),
        };
        self.grammar.add_external_rule(rule);
        self.reset();
        self
    }

    fn reset(&mut self) {
        self.rank = 0;
        self.null_ranks_high = false;
        self.assertions.clear();
    }
}
