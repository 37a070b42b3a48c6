//! The compiled grammar: immutable tables shared read-only by every
//! recognizer built from one grammar.

use bit_matrix::BitMatrix;

use sedge_symbol::{Symbol, SymbolBitMatrix, SymbolBitSet};

use crate::census::Census;
use crate::error::GrammarWarning;
use crate::grammar::{ExternalRule, Grammar};
use crate::{AhmId, AssertionId, InternalRuleId};

/// A rewritten, nulling-free production of the compiled grammar.
#[derive(Clone, Debug)]
pub struct InternalRule {
    /// The rule's left-hand side symbol.
    pub lhs: Symbol,
    /// The rule's right-hand side. Never empty, never contains a
    /// nulling symbol.
    pub rhs: Vec<Symbol>,
    /// Rank in the combined external-rank/null-variant-tier scale.
    pub rank: i64,
    /// The external rule this one was rewritten from. The synthetic
    /// start rule has none.
    pub source: Option<crate::ExternalRuleId>,
    /// The LHS is a factoring-only virtual symbol; completing this rule
    /// is invisible to the semantic layer.
    pub virtual_lhs: bool,
    /// The RHS ends in or passes through a virtual chain symbol.
    pub virtual_rhs: bool,
    /// How many externally visible argument slots this rule contributes,
    /// counting its nulled symbols but not its virtual chain symbol.
    pub real_symbol_count: u32,
    /// The dot position of a sequence separator whose value is
    /// discarded.
    pub separator_dot: Option<usize>,
    /// For each dot position, the externally visible symbols nulled
    /// directly before it. Has `rhs.len() + 1` entries.
    pub nulls_at: Vec<Vec<Symbol>>,
}

/// A dotted-rule state: one per (internal rule, dot position), numbered
/// globally and shared by all recognizers for the grammar.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Ahm {
    /// The internal rule this state belongs to.
    pub rule: InternalRuleId,
    /// The dot position, `0 ..= rhs.len()`.
    pub dot: usize,
    /// The symbol expected next, or `None` for a completion state.
    pub postdot: Option<Symbol>,
    /// Advancing over the postdot symbol completes a right-recursive
    /// rule, making the completion eligible for Leo memoization.
    pub leo_eligible: bool,
}

impl Ahm {
    /// A state with the dot before the first RHS symbol.
    pub fn is_prediction(&self) -> bool {
        self.dot == 0
    }

    /// A state with the dot after the last RHS symbol.
    pub fn is_completion(&self) -> bool {
        self.postdot.is_none()
    }
}

/// A precomputed grammar. All tables are immutable; recognizers,
/// forests and valuers borrow them through shared ownership.
#[derive(Debug)]
pub struct CompiledGrammar {
    num_syms: usize,
    external_sym_count: usize,
    terminal: SymbolBitSet,
    nullable: SymbolBitSet,
    nulling: SymbolBitSet,
    valued: SymbolBitSet,
    sym_ranks: Vec<i32>,
    completion_events: SymbolBitSet,
    nulled_events: SymbolBitSet,
    prediction_events: SymbolBitSet,
    external_rules: Vec<ExternalRule>,
    rules: Vec<InternalRule>,
    rule_assertions: Vec<Vec<AssertionId>>,
    assertion_defaults: Vec<bool>,
    ahms: Vec<Ahm>,
    rule_ahm_start: Vec<AhmId>,
    prediction_matrix: BitMatrix,
    start: Symbol,
    start_rule: Option<InternalRuleId>,
    null_parse_allowed: bool,
    is_cyclic: bool,
    warnings: Vec<GrammarWarning>,
}

impl CompiledGrammar {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn build(
        grammar: Grammar,
        start: Symbol,
        external_sym_count: usize,
        census: Census,
        rules: Vec<InternalRule>,
        start_rule: Option<InternalRuleId>,
        is_cyclic: bool,
        warnings: Vec<GrammarWarning>,
    ) -> Self {
        let num_syms = grammar.sym_source.num_syms();

        let mut terminal = census.terminal;
        terminal.grow(num_syms);
        let mut nullable = census.nullable;
        nullable.grow(num_syms);
        let mut nulling = census.nulling;
        nulling.grow(num_syms);
        let mut valued = grammar.valued;
        valued.grow(num_syms);
        let mut sym_ranks = grammar.sym_ranks;
        sym_ranks.resize(num_syms, 0);
        let mut completion_events = grammar.completion_events;
        completion_events.grow(num_syms);
        let mut nulled_events = grammar.nulled_events;
        nulled_events.grow(num_syms);
        let mut prediction_events = grammar.prediction_events;
        prediction_events.grow(num_syms);

        // Virtual symbols introduced by rewriting are never terminals.
        // A symbol both marked terminal and given rules keeps both
        // roles; the recognizer accepts its tokens and its derivations.

        let (ahms, rule_ahm_start) = build_ahms(&rules, num_syms);
        let prediction_matrix = build_prediction_matrix(&rules, num_syms);

        let rule_assertions = rules
            .iter()
            .map(|rule| match rule.source {
                Some(ext) => grammar.rules[ext].assertions.clone(),
                None => vec![],
            })
            .collect();

        let null_parse_allowed = nullable[start];

        CompiledGrammar {
            num_syms,
            external_sym_count,
            terminal,
            nullable,
            nulling,
            valued,
            sym_ranks,
            completion_events,
            nulled_events,
            prediction_events,
            external_rules: grammar.rules,
            rules,
            rule_assertions,
            assertion_defaults: grammar.assertion_defaults,
            ahms,
            rule_ahm_start,
            prediction_matrix,
            start,
            start_rule,
            null_parse_allowed,
            is_cyclic,
            warnings,
        }
    }

    /// The number of symbols, counting the synthetic ones introduced by
    /// rewriting.
    pub fn num_syms(&self) -> usize {
        self.num_syms
    }

    /// The number of symbols the user created.
    pub fn external_sym_count(&self) -> usize {
        self.external_sym_count
    }

    pub fn is_terminal(&self, sym: Symbol) -> bool {
        self.terminal[sym]
    }

    pub fn is_nullable(&self, sym: Symbol) -> bool {
        self.nullable[sym]
    }

    pub fn is_nulling(&self, sym: Symbol) -> bool {
        self.nulling[sym]
    }

    pub fn is_valued(&self, sym: Symbol) -> bool {
        self.valued[sym]
    }

    pub fn rank_of(&self, sym: Symbol) -> i32 {
        self.sym_ranks[sym.usize()]
    }

    pub fn completion_event_requested(&self, sym: Symbol) -> bool {
        self.completion_events[sym]
    }

    pub fn nulled_event_requested(&self, sym: Symbol) -> bool {
        self.nulled_events[sym]
    }

    pub fn prediction_event_requested(&self, sym: Symbol) -> bool {
        self.prediction_events[sym]
    }

    /// The internal rules.
    pub fn rules(&self) -> &[InternalRule] {
        &self.rules
    }

    pub fn rule(&self, id: InternalRuleId) -> &InternalRule {
        &self.rules[id]
    }

    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// The external rules, in insertion order.
    pub fn external_rules(&self) -> &[ExternalRule] {
        &self.external_rules
    }

    pub fn external_rule(&self, id: crate::ExternalRuleId) -> &ExternalRule {
        &self.external_rules[id]
    }

    /// The dotted-rule state table.
    pub fn ahms(&self) -> &[Ahm] {
        &self.ahms
    }

    pub fn ahm(&self, id: AhmId) -> Ahm {
        self.ahms[id]
    }

    pub fn ahm_count(&self) -> usize {
        self.ahms.len()
    }

    /// The state for the given rule and dot position.
    pub fn ahm_id(&self, rule: InternalRuleId, dot: usize) -> AhmId {
        debug_assert!(dot <= self.rules[rule].rhs.len());
        self.rule_ahm_start[rule] + dot
    }

    /// The state one dot position further along. Valid only when the
    /// given state has a postdot symbol.
    pub fn advance(&self, ahm: AhmId) -> AhmId {
        debug_assert!(self.ahms[ahm].postdot.is_some());
        ahm + 1
    }

    /// The rules predicted when the given symbol is expected, closed
    /// transitively over left corners.
    pub fn predicted_rules(&self, sym: Symbol) -> impl Iterator<Item = InternalRuleId> + '_ {
        self.prediction_matrix
            .iter_row(sym.usize())
            .enumerate()
            .filter_map(|(rule_id, predicted)| if predicted { Some(rule_id) } else { None })
    }

    /// The start symbol the user assigned.
    pub fn start(&self) -> Symbol {
        self.start
    }

    /// The synthetic start rule, absent when the start symbol derives
    /// only the empty string.
    pub fn start_rule(&self) -> Option<InternalRuleId> {
        self.start_rule
    }

    /// The initial dotted state of the start rule.
    pub fn start_prediction_ahm(&self) -> Option<AhmId> {
        self.start_rule.map(|rule| self.rule_ahm_start[rule])
    }

    /// The completed dotted state of the start rule; an Earley item
    /// with this state and origin zero accepts the input.
    pub fn accept_ahm(&self) -> Option<AhmId> {
        self.start_rule.map(|rule| self.rule_ahm_start[rule] + 1)
    }

    /// Whether the empty input is a parse.
    pub fn null_parse_allowed(&self) -> bool {
        self.null_parse_allowed
    }

    /// Whether the grammar contains a unit-derivation cycle. Cyclic
    /// grammars precompute fully; callers decide whether to reject
    /// them.
    pub fn is_cyclic(&self) -> bool {
        self.is_cyclic
    }

    /// Non-fatal conditions noticed during precomputation.
    pub fn warnings(&self) -> &[GrammarWarning] {
        &self.warnings
    }

    pub fn assertion_defaults(&self) -> &[bool] {
        &self.assertion_defaults
    }

    pub fn assertion_count(&self) -> usize {
        self.assertion_defaults.len()
    }

    /// The assertions gating the given internal rule's prediction.
    pub fn rule_assertions(&self, rule: InternalRuleId) -> &[AssertionId] {
        &self.rule_assertions[rule]
    }
}

fn build_ahms(rules: &[InternalRule], num_syms: usize) -> (Vec<Ahm>, Vec<AhmId>) {
    // A rule is right-recursive when its last RHS symbol can derive a
    // string ending in the rule's LHS. The right-corner closure finds
    // exactly those rules; their penultimate states are Leo-eligible.
    let mut right_corner = SymbolBitMatrix::new(num_syms);
    for rule in rules {
        if let Some(&last) = rule.rhs.last() {
            right_corner.set(rule.lhs, last, true);
        }
    }
    right_corner.transitive_closure();

    let mut ahms = vec![];
    let mut rule_ahm_start = Vec::with_capacity(rules.len());
    for (rule_id, rule) in rules.iter().enumerate() {
        rule_ahm_start.push(ahms.len());
        let last = *rule.rhs.last().expect("internal rules are never empty");
        let right_recursive = last == rule.lhs || right_corner.get(last, rule.lhs);
        for dot in 0..=rule.rhs.len() {
            ahms.push(Ahm {
                rule: rule_id,
                dot,
                postdot: rule.rhs.get(dot).copied(),
                leo_eligible: right_recursive && dot + 1 == rule.rhs.len(),
            });
        }
    }
    (ahms, rule_ahm_start)
}

fn build_prediction_matrix(rules: &[InternalRule], num_syms: usize) -> BitMatrix {
    let mut rules_by_lhs = vec![vec![]; num_syms];
    for (rule_id, rule) in rules.iter().enumerate() {
        rules_by_lhs[rule.lhs.usize()].push(rule_id);
    }

    // The left-corner relation, closed reflexively and transitively:
    // a symbol predicts every rule whose LHS it can reach through
    // leftmost derivation steps.
    let mut left_corner = SymbolBitMatrix::new(num_syms);
    for rule in rules {
        left_corner.set(rule.lhs, rule.rhs[0], true);
    }
    left_corner.transitive_closure();
    left_corner.reflexive_closure();

    let mut prediction = BitMatrix::new(num_syms, rules.len());
    for sym in 0..num_syms {
        for target in left_corner.iter_row_syms(Symbol::from(sym)) {
            for &rule_id in &rules_by_lhs[target.usize()] {
                prediction.set(sym, rule_id, true);
            }
        }
    }
    prediction
}
