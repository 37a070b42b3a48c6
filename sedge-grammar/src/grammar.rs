//! Definitions of the external grammar type and its rules.

use std::collections::HashSet;
use std::rc::Rc;

use sedge_symbol::{Symbol, SymbolBitSet, SymbolSource};

use crate::census::Census;
use crate::error::{GrammarError, GrammarWarning};
use crate::rewrite;
use crate::rule_builder::RuleBuilder;
use crate::sequence::{Separator, SequenceRuleBuilder};
use crate::tables::{CompiledGrammar, InternalRule};
use crate::{AssertionId, ExternalRuleId};

/// A context-free grammar under construction.
///
/// The grammar is mutable until [`fn precompute`] consumes it; the
/// compiled result is immutable, so a precomputed grammar can never be
/// mutated again.
///
/// [`fn precompute`]: Grammar::precompute
#[derive(Clone, Debug, Default)]
pub struct Grammar {
    pub(crate) sym_source: SymbolSource,
    pub(crate) terminal_marks: SymbolBitSet,
    pub(crate) valued: SymbolBitSet,
    pub(crate) sym_ranks: Vec<i32>,
    pub(crate) completion_events: SymbolBitSet,
    pub(crate) nulled_events: SymbolBitSet,
    pub(crate) prediction_events: SymbolBitSet,
    pub(crate) rules: Vec<ExternalRule>,
    pub(crate) start: Option<Symbol>,
    pub(crate) assertion_defaults: Vec<bool>,
}

/// A grammar rule as the user supplied it.
#[derive(Clone, Debug)]
pub struct ExternalRule {
    /// The rule's left-hand side symbol.
    pub lhs: Symbol,
    /// Plain BNF, or a repetition.
    pub kind: ExternalRuleKind,
    /// The rule's rank, used when ordering ambiguous parses.
    pub rank: i32,
    /// Whether null variants of this rule outrank non-null variants.
    pub null_ranks_high: bool,
    /// Zero-width assertions gating this rule's prediction.
    pub assertions: Vec<AssertionId>,
}

/// The two kinds of external rules.
#[derive(Clone, Debug)]
pub enum ExternalRuleKind {
    /// An ordinary BNF rule. The RHS may be empty.
    Bnf {
        /// The rule's right-hand side symbols.
        rhs: Rc<[Symbol]>,
    },
    /// A repetition of `item`, `min` or more times.
    Sequence {
        /// The repeated symbol.
        item: Symbol,
        /// The minimum number of repetitions, zero or one.
        min: u32,
        /// The way elements are separated, or `Null`.
        separator: Separator,
    },
}

impl Grammar {
    /// Creates an empty grammar.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns generated symbols.
    pub fn sym<const N: usize>(&mut self) -> [Symbol; N] {
        let mut result = [Default::default(); N];
        for dest in &mut result {
            *dest = self.next_sym();
        }
        result
    }

    /// Generates a new unique symbol.
    pub fn next_sym(&mut self) -> Symbol {
        let sym = self.sym_source.next_sym();
        self.sym_ranks.push(0);
        sym
    }

    /// Returns the number of symbols in use.
    pub fn num_syms(&self) -> usize {
        self.sym_source.num_syms()
    }

    /// Assigns the start symbol.
    pub fn set_start(&mut self, start: Symbol) {
        self.start = Some(start);
    }

    /// Returns the start symbol, if assigned.
    pub fn start(&self) -> Option<Symbol> {
        self.start
    }

    /// Marks a symbol as a terminal. Symbols that appear on no rule's
    /// LHS are terminals whether marked or not.
    pub fn mark_terminal(&mut self, sym: Symbol) {
        self.terminal_marks.grow(sym.usize() + 1);
        self.terminal_marks.set(sym, true);
    }

    /// Assigns a symbol's rank.
    pub fn set_rank(&mut self, sym: Symbol, rank: i32) {
        self.sym_ranks[sym.usize()] = rank;
    }

    /// Returns a symbol's rank.
    pub fn rank_of(&self, sym: Symbol) -> i32 {
        self.sym_ranks.get(sym.usize()).copied().unwrap_or(0)
    }

    /// Marks a symbol as valued: its tokens and nulled instances are
    /// reported to the semantic layer. The designation is locked once
    /// the grammar is precomputed.
    pub fn set_valued(&mut self, sym: Symbol, valued: bool) {
        self.valued.grow(sym.usize() + 1);
        self.valued.set(sym, valued);
    }

    /// Requests an event whenever the symbol is completed.
    pub fn request_completion_event(&mut self, sym: Symbol) {
        self.completion_events.grow(sym.usize() + 1);
        self.completion_events.set(sym, true);
    }

    /// Requests an event whenever the symbol is nulled.
    pub fn request_nulled_event(&mut self, sym: Symbol) {
        self.nulled_events.grow(sym.usize() + 1);
        self.nulled_events.set(sym, true);
    }

    /// Requests an event whenever the symbol is predicted.
    pub fn request_prediction_event(&mut self, sym: Symbol) {
        self.prediction_events.grow(sym.usize() + 1);
        self.prediction_events.set(sym, true);
    }

    /// Creates a zero-width assertion with the given default value.
    /// Assertions gate rule prediction; recognizers may override the
    /// value between earlemes.
    pub fn add_assertion(&mut self, default: bool) -> AssertionId {
        self.assertion_defaults.push(default);
        self.assertion_defaults.len() - 1
    }

    /// Starts building a new rule.
    pub fn rule(&mut self, lhs: Symbol) -> RuleBuilder<'_> {
        RuleBuilder::new(self, lhs)
    }

    /// Starts building a new sequence rule.
    pub fn sequence(&mut self, lhs: Symbol) -> SequenceRuleBuilder<'_> {
        SequenceRuleBuilder::new(self, lhs)
    }

    /// Returns an iterator over the list of grammar rules.
    pub fn rules(&self) -> impl Iterator<Item = &ExternalRule> {
        self.rules.iter()
    }

    /// The number of rules added so far. Rules are identified by their
    /// position in insertion order.
    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    pub(crate) fn add_external_rule(&mut self, rule: ExternalRule) -> ExternalRuleId {
        self.rules.push(rule);
        self.rules.len() - 1
    }

    /// Precomputes the grammar, consuming the builder.
    ///
    /// In order: sequence expansion, the symbol census (terminal,
    /// nullable, nulling, productive, accessible), defect checks, cycle
    /// detection, nulling-symbol elimination with factoring, and the
    /// construction of the dotted-rule and prediction tables.
    pub fn precompute(mut self) -> Result<CompiledGrammar, GrammarError> {
        self.validate()?;
        let external_sym_count = self.sym_source.num_syms();
        let start = self.start.ok_or(GrammarError::NoStart)?;

        let flat = rewrite::expand_sequences(&self.rules, &mut self.sym_source);
        let census = Census::new(
            self.sym_source.num_syms(),
            &flat,
            &self.terminal_marks,
            start,
        );
        self.check_defects(&census, start)?;

        let mut warnings = vec![];
        let mut cyclic_sources = HashSet::new();
        for &flat_idx in &census.cyclic_rules {
            if cyclic_sources.insert(flat[flat_idx].source) {
                warnings.push(GrammarWarning::CyclicRule(flat[flat_idx].source));
            }
        }
        let is_cyclic = !census.cyclic_rules.is_empty();

        let mut internal =
            rewrite::eliminate_nulling(&flat, &census, &self.rules, &mut self.sym_source, &mut warnings);

        // The unique synthetic start rule. A start symbol that only
        // derives the empty string gets no start rule; such a grammar
        // accepts exactly the empty input.
        let mut start_rule = None;
        if !census.nulling[start] {
            let accept_sym = self.sym_source.next_sym();
            internal.push(InternalRule {
                lhs: accept_sym,
                rhs: vec![start],
                rank: 0,
                source: None,
                virtual_lhs: false,
                virtual_rhs: false,
                real_symbol_count: 1,
                separator_dot: None,
                nulls_at: vec![vec![], vec![]],
            });
            start_rule = Some(internal.len() - 1);
        }

        Ok(CompiledGrammar::build(
            self,
            start,
            external_sym_count,
            census,
            internal,
            start_rule,
            is_cyclic,
            warnings,
        ))
    }

    fn validate(&self) -> Result<(), GrammarError> {
        if self.rules.is_empty() {
            return Err(GrammarError::NoRules);
        }
        let start = self.start.ok_or(GrammarError::NoStart)?;
        let num_syms = self.num_syms();
        if start.usize() >= num_syms {
            return Err(GrammarError::BadSymbol(start));
        }

        let mut seen = HashSet::new();
        let mut sequence_lhs = HashSet::new();
        for (id, rule) in self.rules.iter().enumerate() {
            if rule.lhs.usize() >= num_syms {
                return Err(GrammarError::BadRule(id));
            }
            match rule.kind {
                ExternalRuleKind::Bnf { ref rhs } => {
                    if rhs.iter().any(|sym| sym.usize() >= num_syms) {
                        return Err(GrammarError::BadRule(id));
                    }
                    if !seen.insert((rule.lhs, rhs.to_vec())) {
                        return Err(GrammarError::DuplicateRule(id));
                    }
                }
                ExternalRuleKind::Sequence {
                    item,
                    min,
                    separator,
                } => {
                    let sep_ok = separator
                        .symbol()
                        .map_or(true, |sep| sep.usize() < num_syms);
                    if item.usize() >= num_syms || !sep_ok || min > 1 {
                        return Err(GrammarError::BadRule(id));
                    }
                    if !sequence_lhs.insert(rule.lhs) {
                        return Err(GrammarError::SequenceLhsNotUnique(rule.lhs));
                    }
                }
            }
        }
        for rule in &self.rules {
            if matches!(rule.kind, ExternalRuleKind::Bnf { .. })
                && sequence_lhs.contains(&rule.lhs)
            {
                return Err(GrammarError::SequenceLhsNotUnique(rule.lhs));
            }
        }
        Ok(())
    }

    fn check_defects(&self, census: &Census, start: Symbol) -> Result<(), GrammarError> {
        for sym in census.terminal.iter() {
            if census.nullable[sym] {
                return Err(GrammarError::NullingTerminal(sym));
            }
        }
        for rule in &self.rules {
            if let ExternalRuleKind::Sequence {
                item, separator, ..
            } = rule.kind
            {
                if census.nullable[item] {
                    return Err(GrammarError::CountedNullable(item));
                }
                if let Some(sep) = separator.symbol() {
                    if census.nullable[sep] {
                        return Err(GrammarError::CountedNullable(sep));
                    }
                }
            }
        }
        if !census.productive[start] {
            return Err(GrammarError::UnproductiveStart(start));
        }
        Ok(())
    }

}
