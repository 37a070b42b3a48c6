//! The recognizer: one Earley set per input position, advanced a set at
//! a time.

use std::collections::HashMap;
use std::rc::Rc;

use bit_vec::BitVec;
use log::trace;

use sedge_symbol::{Symbol, SymbolBitSet};

use sedge_grammar::{AhmId, AssertionId, CompiledGrammar};

use crate::error::RecognitionError;
use crate::event::ParseEvent;
use crate::item::{Alternative, EarleySet, Item, ItemRef, LeoItem, LeoRef, Source, Token};

/// Tokens may span at most this many earlemes.
pub const MAX_TOKEN_LENGTH: u32 = 1 << 20;

/// Earley items within one set are addressed by a `u32` ordinal.
const MAX_SET_ITEMS: usize = u32::MAX as usize;

/// An Earley recognizer over a compiled grammar.
///
/// The recognizer moves through three phases: before input, during
/// input, and exhausted. [`start_input`] materializes earleme zero;
/// from then on the caller alternates between queueing token
/// [`alternative`]s and advancing with [`complete`]. Exhaustion is a
/// query, not a phase transition the caller must act on.
///
/// [`start_input`]: Recognizer::start_input
/// [`alternative`]: Recognizer::alternative
/// [`complete`]: Recognizer::complete
pub struct Recognizer<T> {
    grammar: Rc<CompiledGrammar>,
    sets: Vec<EarleySet>,
    tokens: Vec<Token<T>>,
    pending: Vec<Alternative>,
    /// Claim-on-first-use memo for the set under construction; maps
    /// (state, origin) to the item index. Reset each earleme.
    memo: HashMap<(AhmId, u32), u32>,
    /// Rules already predicted in the set under construction.
    seen_rules: BitVec,
    assertion_values: Vec<bool>,
    /// Assertion values captured at first use within the current set.
    assertion_memo: Vec<Option<bool>>,
    completion_active: SymbolBitSet,
    nulled_active: SymbolBitSet,
    prediction_active: SymbolBitSet,
    fired_completions: SymbolBitSet,
    fired_nulled: SymbolBitSet,
    fired_predictions: SymbolBitSet,
    events: Vec<ParseEvent>,
    leo_enabled: bool,
    started: bool,
    exhausted: bool,
    consistent: bool,
    first_dirty: u32,
    dead: bool,
}

impl<T: Clone> Recognizer<T> {
    /// Creates a recognizer sharing the given compiled grammar.
    pub fn new(grammar: Rc<CompiledGrammar>) -> Self {
        let num_syms = grammar.num_syms();
        let requested = |test: fn(&CompiledGrammar, Symbol) -> bool| {
            let mut set = SymbolBitSet::from_elem(num_syms, false);
            for id in 0..num_syms {
                let sym = Symbol::from(id);
                set.set(sym, test(&grammar, sym));
            }
            set
        };
        Recognizer {
            completion_active: requested(CompiledGrammar::completion_event_requested),
            nulled_active: requested(CompiledGrammar::nulled_event_requested),
            prediction_active: requested(CompiledGrammar::prediction_event_requested),
            assertion_values: grammar.assertion_defaults().to_vec(),
            assertion_memo: vec![None; grammar.assertion_count()],
            seen_rules: BitVec::from_elem(grammar.rule_count(), false),
            fired_completions: SymbolBitSet::from_elem(num_syms, false),
            fired_nulled: SymbolBitSet::from_elem(num_syms, false),
            fired_predictions: SymbolBitSet::from_elem(num_syms, false),
            grammar,
            sets: vec![],
            tokens: vec![],
            pending: vec![],
            memo: HashMap::new(),
            events: vec![],
            leo_enabled: true,
            started: false,
            exhausted: false,
            consistent: true,
            first_dirty: u32::MAX,
            dead: false,
        }
    }

    /// The compiled grammar this recognizer runs.
    pub fn grammar(&self) -> &Rc<CompiledGrammar> {
        &self.grammar
    }

    /// Turns Leo memoization of right-recursive completions on or off.
    /// Recognition results are identical either way; only the amount of
    /// work per completion differs. Callable only before input starts.
    pub fn set_leo_enabled(&mut self, enabled: bool) -> Result<(), RecognitionError> {
        self.check_alive()?;
        if self.started {
            return Err(RecognitionError::AlreadyStarted);
        }
        self.leo_enabled = enabled;
        Ok(())
    }

    /// The current input position: the ordinal of the newest set.
    pub fn earleme(&self) -> u32 {
        (self.sets.len() as u32).saturating_sub(1)
    }

    /// The furthest earleme any queued token reaches.
    pub fn furthest_earleme(&self) -> u32 {
        self.pending
            .iter()
            .map(|alt| alt.end)
            .max()
            .map_or(self.earleme(), |end| end.max(self.earleme()))
    }

    /// Whether the recognizer can accept further input.
    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    /// Whether all scanned tokens are still accepted. Cleared by
    /// [`revoke_alternative`], restored by [`clean`].
    ///
    /// [`revoke_alternative`]: Recognizer::revoke_alternative
    /// [`clean`]: Recognizer::clean
    pub fn is_consistent(&self) -> bool {
        self.consistent
    }

    /// The terminals some item at the current location expects.
    pub fn expected_terminals(&self) -> Vec<Symbol> {
        match self.sets.last() {
            Some(set) => set
                .postdot
                .keys()
                .copied()
                .filter(|&sym| self.grammar.is_terminal(sym))
                .collect(),
            None => vec![],
        }
    }

    /// The Earley sets built so far, one per earleme.
    pub fn sets(&self) -> &[EarleySet] {
        &self.sets
    }

    /// The set at the given earleme.
    pub fn set(&self, earleme: u32) -> &EarleySet {
        &self.sets[earleme as usize]
    }

    /// Every token queued or scanned so far.
    pub fn tokens(&self) -> &[Token<T>] {
        &self.tokens
    }

    /// The item addressed by `item`.
    pub fn item(&self, item: ItemRef) -> &Item {
        self.sets[item.set as usize].item(item.index)
    }

    /// The Leo item addressed by `leo`.
    pub fn leo_item(&self, leo: LeoRef) -> &LeoItem {
        &self.sets[leo.set as usize].leo_items[&leo.symbol]
    }

    /// Drains the events fired since the last drain, in firing order.
    pub fn events(&mut self) -> impl Iterator<Item = ParseEvent> + '_ {
        self.events.drain(..)
    }

    /// Overrides a zero-width assertion's value. Takes effect the next
    /// time a set's predictions consult the assertion; sets that
    /// already captured a value keep it.
    pub fn set_assertion(
        &mut self,
        assertion: AssertionId,
        value: bool,
    ) -> Result<(), RecognitionError> {
        self.check_alive()?;
        if assertion >= self.assertion_values.len() {
            return Err(RecognitionError::UnknownAssertion(assertion));
        }
        self.assertion_values[assertion] = value;
        Ok(())
    }

    /// Toggles delivery of a requested completion event.
    pub fn set_completion_event_active(
        &mut self,
        symbol: Symbol,
        active: bool,
    ) -> Result<(), RecognitionError> {
        self.check_alive()?;
        if !self.grammar.completion_event_requested(symbol) {
            return Err(RecognitionError::EventNotRequested(symbol));
        }
        self.completion_active.set(symbol, active);
        Ok(())
    }

    /// Toggles delivery of a requested nulled event.
    pub fn set_nulled_event_active(
        &mut self,
        symbol: Symbol,
        active: bool,
    ) -> Result<(), RecognitionError> {
        self.check_alive()?;
        if !self.grammar.nulled_event_requested(symbol) {
            return Err(RecognitionError::EventNotRequested(symbol));
        }
        self.nulled_active.set(symbol, active);
        Ok(())
    }

    /// Toggles delivery of a requested prediction event.
    pub fn set_prediction_event_active(
        &mut self,
        symbol: Symbol,
        active: bool,
    ) -> Result<(), RecognitionError> {
        self.check_alive()?;
        if !self.grammar.prediction_event_requested(symbol) {
            return Err(RecognitionError::EventNotRequested(symbol));
        }
        self.prediction_active.set(symbol, active);
        Ok(())
    }

    /// Materializes earleme zero: the start rule's prediction and its
    /// closure.
    pub fn start_input(&mut self) -> Result<(), RecognitionError> {
        self.check_alive()?;
        if self.started {
            return Err(RecognitionError::AlreadyStarted);
        }
        self.started = true;
        self.begin_set(0);
        if let Some(start_ahm) = self.grammar.start_prediction_ahm() {
            self.insert_item(start_ahm, 0, Source::Predicted)?;
            if let Some(postdot) = self.grammar.ahm(start_ahm).postdot {
                self.predict(postdot)?;
            }
        }
        let start = self.grammar.start();
        if self.grammar.null_parse_allowed() {
            self.fire_nulled(start, 0);
        }
        self.finish_set();
        Ok(())
    }

    /// Queues a token alternative starting at the current earleme.
    /// A rejected call queues nothing and changes no state.
    pub fn alternative(
        &mut self,
        symbol: Symbol,
        value: T,
        length: u32,
    ) -> Result<(), RecognitionError> {
        self.check_alive()?;
        if !self.started {
            return Err(RecognitionError::NotStarted);
        }
        if !self.grammar.is_terminal(symbol) {
            return Err(RecognitionError::NotATerminal(symbol));
        }
        if length == 0 || length > MAX_TOKEN_LENGTH {
            return Err(RecognitionError::BadTokenLength(length));
        }
        let start = self.earleme();
        let end = start + length;
        let current = self.sets.last().expect("input was started");
        let expected = current
            .waiting_on(symbol)
            .iter()
            .any(|&index| current.item(index).active);
        if !expected {
            return Err(RecognitionError::UnexpectedToken(symbol));
        }
        let duplicate = self.tokens.iter().any(|token| {
            !token.rejected && token.symbol == symbol && token.start == start && token.end == end
        });
        if duplicate {
            return Err(RecognitionError::DuplicateToken(symbol));
        }
        self.tokens.push(Token {
            symbol,
            start,
            end,
            value,
            rejected: false,
        });
        self.pending.push(Alternative {
            token: self.tokens.len() - 1,
            end,
        });
        Ok(())
    }

    /// Advances one earleme: scans the alternatives ending here, then
    /// closes the new set under completion and prediction.
    pub fn complete(&mut self) -> Result<(), RecognitionError> {
        self.check_alive()?;
        if !self.started {
            return Err(RecognitionError::NotStarted);
        }
        let earleme = self.sets.len() as u32;
        self.begin_set(earleme);

        // Scanning.
        let mut due = vec![];
        self.pending.retain(|alt| {
            if alt.end == earleme {
                due.push(*alt);
                false
            } else {
                true
            }
        });
        for alt in due {
            let token = self.tokens[alt.token].clone();
            if token.rejected {
                continue;
            }
            let waiting: Vec<u32> = self.sets[token.start as usize]
                .waiting_on(token.symbol)
                .to_vec();
            for index in waiting {
                let origin_set = token.start;
                let waiter = self.sets[origin_set as usize].item(index);
                if !waiter.active {
                    continue;
                }
                let (waiter_ahm, waiter_origin) = (waiter.ahm, waiter.origin);
                let predecessor = (self.grammar.ahm(waiter_ahm).dot > 0).then_some(ItemRef {
                    set: origin_set,
                    index,
                });
                self.insert_item(
                    self.grammar.advance(waiter_ahm),
                    waiter_origin,
                    Source::Token {
                        predecessor,
                        token: alt.token,
                    },
                )?;
            }
        }

        // Completion and prediction, to a fixed point. Items appended
        // during the pass are picked up by the growing index.
        let mut work = 0;
        while work < self.current_set().items.len() {
            let item = &self.current_set().items[work];
            let ahm = self.grammar.ahm(item.ahm);
            if ahm.is_completion() {
                self.complete_item(work as u32)?;
            } else if !ahm.is_prediction() {
                // Dot-zero postdots are already covered by the
                // transitive prediction closure.
                if let Some(postdot) = ahm.postdot {
                    self.predict(postdot)?;
                }
            }
            work += 1;
        }

        self.finish_set();
        trace!(
            "earleme {}: {} items, {} leo items",
            earleme,
            self.current_set().items.len(),
            self.current_set().leo_items.len()
        );
        Ok(())
    }

    /// Withdraws a token. A token that was merely queued is dropped;
    /// a token already scanned marks the parse inconsistent until
    /// [`clean`] runs.
    ///
    /// [`clean`]: Recognizer::clean
    pub fn revoke_alternative(
        &mut self,
        symbol: Symbol,
        start: u32,
        length: u32,
    ) -> Result<(), RecognitionError> {
        self.check_alive()?;
        if length == 0 || length > MAX_TOKEN_LENGTH {
            return Err(RecognitionError::BadTokenLength(length));
        }
        let end = start + length;
        let found = self.tokens.iter().position(|token| {
            !token.rejected && token.symbol == symbol && token.start == start && token.end == end
        });
        let index = found.ok_or(RecognitionError::UnknownToken(symbol))?;
        self.tokens[index].rejected = true;
        if end > self.earleme() {
            // Not yet scanned; un-queueing keeps the sets consistent.
            self.pending.retain(|alt| alt.token != index);
        } else {
            self.consistent = false;
            self.first_dirty = self.first_dirty.min(end);
        }
        Ok(())
    }

    /// Re-derives item and Leo-item activity from the surviving tokens,
    /// starting at the earliest earleme a revocation touched. A no-op
    /// when the parse is already consistent.
    pub fn clean(&mut self) -> Result<(), RecognitionError> {
        self.check_alive()?;
        if self.consistent {
            return Ok(());
        }
        for ordinal in self.first_dirty as usize..self.sets.len() {
            // Activity is the least fixed point of "some source link
            // survives": starting from inactive keeps self-supporting
            // unit cycles from outliving their last real derivation.
            for item in &mut self.sets[ordinal].items {
                item.active = self.grammar.ahm(item.ahm).is_prediction();
            }
            loop {
                let mut changed = false;
                for index in 0..self.sets[ordinal].items.len() {
                    if self.sets[ordinal].items[index].active {
                        continue;
                    }
                    let survives = self.sets[ordinal].items[index]
                        .sources
                        .clone()
                        .iter()
                        .any(|source| self.source_survives(source));
                    if survives {
                        self.sets[ordinal].items[index].active = true;
                        changed = true;
                    }
                }
                if !changed {
                    break;
                }
            }
            let revived: Vec<(Symbol, bool)> = self.sets[ordinal]
                .leo_items
                .iter()
                .map(|(&symbol, leo)| {
                    let base_alive = self.item(leo.base).active;
                    let chain_alive = leo
                        .predecessor
                        .map_or(true, |pred| self.leo_item(pred).active);
                    (symbol, base_alive && chain_alive)
                })
                .collect();
            for (symbol, active) in revived {
                if let Some(leo) = self.sets[ordinal].leo_items.get_mut(&symbol) {
                    leo.active = active;
                }
            }
        }
        self.consistent = true;
        self.first_dirty = u32::MAX;
        Ok(())
    }

    fn source_survives(&self, source: &Source) -> bool {
        let item_alive = |item: ItemRef| self.item(item).active;
        match *source {
            Source::Predicted => true,
            Source::Token { predecessor, token } => {
                !self.tokens[token].rejected && predecessor.map_or(true, item_alive)
            }
            Source::Completion { predecessor, cause } => {
                item_alive(cause) && predecessor.map_or(true, item_alive)
            }
            Source::Leo { leo, cause } => item_alive(cause) && self.leo_item(leo).active,
        }
    }

    fn check_alive(&self) -> Result<(), RecognitionError> {
        if self.dead {
            Err(RecognitionError::Dead)
        } else {
            Ok(())
        }
    }

    fn current_set(&self) -> &EarleySet {
        self.sets.last().expect("a set is under construction")
    }

    fn begin_set(&mut self, ordinal: u32) {
        self.sets.push(EarleySet::new(ordinal));
        self.memo.clear();
        self.seen_rules = BitVec::from_elem(self.grammar.rule_count(), false);
        self.assertion_memo = vec![None; self.grammar.assertion_count()];
        let num_syms = self.grammar.num_syms();
        self.fired_completions = SymbolBitSet::from_elem(num_syms, false);
        self.fired_nulled = SymbolBitSet::from_elem(num_syms, false);
        self.fired_predictions = SymbolBitSet::from_elem(num_syms, false);
    }

    /// Creates the item once per (state, origin) per set; later
    /// derivations append source links, making the item ambiguous.
    fn insert_item(
        &mut self,
        ahm: AhmId,
        origin: u32,
        source: Source,
    ) -> Result<(), RecognitionError> {
        let set = self.sets.last_mut().expect("a set is under construction");
        if let Some(&index) = self.memo.get(&(ahm, origin)) {
            let item = &mut set.items[index as usize];
            if !item.sources.contains(&source) {
                item.sources.push(source);
            }
            return Ok(());
        }
        if set.items.len() >= MAX_SET_ITEMS {
            self.dead = true;
            return Err(RecognitionError::ItemCountOverflow);
        }
        set.items.push(Item {
            ahm,
            origin,
            sources: vec![source],
            active: true,
        });
        self.memo.insert((ahm, origin), set.items.len() as u32 - 1);
        self.fire_item_events(ahm, origin);
        Ok(())
    }

    /// Advances every item waiting on the completed item's LHS, or
    /// takes the origin set's Leo shortcut when one covers the symbol.
    fn complete_item(&mut self, index: u32) -> Result<(), RecognitionError> {
        let current = self.earleme();
        let item = self.current_set().item(index);
        let (ahm, origin) = (item.ahm, item.origin);
        let lhs = self.grammar.rule(self.grammar.ahm(ahm).rule).lhs;
        let cause = ItemRef {
            set: current,
            index,
        };

        if self.leo_enabled {
            let origin_set = &self.sets[origin as usize];
            if let Some(leo) = origin_set.leo_item(lhs) {
                if leo.active {
                    let (top_ahm, top_origin) = (leo.top_ahm, leo.top_origin);
                    let event_symbols = leo.event_symbols.clone();
                    self.insert_item(
                        top_ahm,
                        top_origin,
                        Source::Leo {
                            leo: LeoRef {
                                set: origin,
                                symbol: lhs,
                            },
                            cause,
                        },
                    )?;
                    // Completions the chain short-circuits still
                    // announce themselves.
                    for symbol in event_symbols {
                        self.fire_completion(symbol, current);
                    }
                    return Ok(());
                }
            }
        }

        let waiting: Vec<u32> = self.sets[origin as usize].waiting_on(lhs).to_vec();
        for waiter_index in waiting {
            let waiter = self.sets[origin as usize].item(waiter_index);
            if !waiter.active {
                continue;
            }
            let (waiter_ahm, waiter_origin) = (waiter.ahm, waiter.origin);
            let predecessor = (self.grammar.ahm(waiter_ahm).dot > 0).then_some(ItemRef {
                set: origin,
                index: waiter_index,
            });
            self.insert_item(
                self.grammar.advance(waiter_ahm),
                waiter_origin,
                Source::Completion { predecessor, cause },
            )?;
        }
        Ok(())
    }

    /// Adds the initial item of every rule the symbol predicts, using
    /// the precomputed left-corner closure.
    fn predict(&mut self, symbol: Symbol) -> Result<(), RecognitionError> {
        let grammar = self.grammar.clone();
        let origin = self.earleme();
        for rule in grammar.predicted_rules(symbol) {
            if self.seen_rules[rule] {
                continue;
            }
            self.seen_rules.set(rule, true);
            if !self.assertions_hold(rule) {
                continue;
            }
            self.insert_item(grammar.ahm_id(rule, 0), origin, Source::Predicted)?;
        }
        Ok(())
    }

    /// Evaluates the rule's assertions, capturing each assertion's
    /// value at its first use within the current set.
    fn assertions_hold(&mut self, rule: sedge_grammar::InternalRuleId) -> bool {
        for &assertion in self.grammar.rule_assertions(rule) {
            let value =
                *self.assertion_memo[assertion].get_or_insert(self.assertion_values[assertion]);
            if !value {
                return false;
            }
        }
        true
    }

    /// Builds the postdot index for the finished set, constructs Leo
    /// items over its single-entry chains, and fires location events.
    fn finish_set(&mut self) {
        let grammar = self.grammar.clone();
        let set = self.sets.last_mut().expect("a set is under construction");
        for (index, item) in set.items.iter().enumerate() {
            if let Some(postdot) = grammar.ahm(item.ahm).postdot {
                set.postdot.entry(postdot).or_default().push(index as u32);
            }
        }

        if self.leo_enabled {
            let ordinal = self.earleme();
            let mut created: Vec<(Symbol, LeoItem)> = vec![];
            for (&symbol, indices) in &self.sets[ordinal as usize].postdot {
                if indices.len() != 1 {
                    continue;
                }
                let base_index = indices[0];
                let base = self.sets[ordinal as usize].item(base_index);
                let ahm = grammar.ahm(base.ahm);
                if !ahm.leo_eligible || !base.active {
                    continue;
                }
                let rule = grammar.rule(ahm.rule);
                let base_ref = ItemRef {
                    set: ordinal,
                    index: base_index,
                };
                // Reuse an unbroken chain segment ending at the base's
                // origin; the chain may even continue within this set,
                // when an earlier symbol of the pass built it.
                let chain = self.sets[base.origin as usize]
                    .leo_item(rule.lhs)
                    .filter(|leo| leo.active)
                    .or_else(|| {
                        created
                            .iter()
                            .find(|(sym, _)| *sym == rule.lhs && base.origin == ordinal)
                            .map(|(_, leo)| leo)
                    });
                let leo = match chain {
                    Some(chain) => {
                        let mut event_symbols = chain.event_symbols.clone();
                        if self.completion_event_visible(ahm.rule) {
                            event_symbols.push(rule.lhs);
                        }
                        LeoItem {
                            symbol,
                            top_ahm: chain.top_ahm,
                            top_origin: chain.top_origin,
                            base: base_ref,
                            predecessor: Some(LeoRef {
                                set: base.origin,
                                symbol: rule.lhs,
                            }),
                            event_symbols,
                            active: true,
                        }
                    }
                    None => LeoItem {
                        symbol,
                        top_ahm: grammar.advance(base.ahm),
                        top_origin: base.origin,
                        base: base_ref,
                        predecessor: None,
                        event_symbols: vec![],
                        active: true,
                    },
                };
                created.push((symbol, leo));
            }
            let set = self.sets.last_mut().expect("a set is under construction");
            for (symbol, leo) in created {
                set.leo_items.insert(symbol, leo);
            }
        }

        let earleme = self.earleme();
        let expected: Vec<Symbol> = self.sets[earleme as usize]
            .postdot
            .keys()
            .copied()
            .filter(|&sym| grammar.is_terminal(sym))
            .collect();
        for symbol in &expected {
            if grammar.prediction_event_requested(*symbol) && self.prediction_active[*symbol] {
                self.events.push(ParseEvent::SymbolExpected {
                    symbol: *symbol,
                    earleme,
                });
            }
        }
        if expected.is_empty() && self.pending.is_empty() && !self.exhausted {
            self.exhausted = true;
            self.events.push(ParseEvent::Exhausted { earleme });
        }
    }

    /// Events for a freshly created item: completions and predictions
    /// of externally visible rules, plus the symbols nulled at the
    /// item's dot. Each symbol fires at most once per set and class.
    fn fire_item_events(&mut self, ahm: AhmId, origin: u32) {
        let grammar = self.grammar.clone();
        let state = grammar.ahm(ahm);
        let rule = grammar.rule(state.rule);
        let earleme = self.earleme();
        let visible = !rule.virtual_lhs && rule.source.is_some();

        if state.is_completion() && visible {
            self.fire_completion(rule.lhs, earleme);
        }
        if state.is_prediction() && visible {
            if grammar.prediction_event_requested(rule.lhs)
                && self.prediction_active[rule.lhs]
                && !self.fired_predictions[rule.lhs]
            {
                self.fired_predictions.set(rule.lhs, true);
                self.events.push(ParseEvent::SymbolPredicted {
                    symbol: rule.lhs,
                    earleme,
                });
            }
        }
        if state.dot > 0 {
            for &symbol in &rule.nulls_at[state.dot] {
                self.fire_nulled(symbol, earleme);
            }
            if state.dot == 1 {
                for &symbol in &rule.nulls_at[0] {
                    self.fire_nulled(symbol, origin);
                }
            }
        }
    }

    fn fire_completion(&mut self, symbol: Symbol, earleme: u32) {
        if self.grammar.completion_event_requested(symbol)
            && self.completion_active[symbol]
            && !self.fired_completions[symbol]
        {
            self.fired_completions.set(symbol, true);
            self.events
                .push(ParseEvent::SymbolCompleted { symbol, earleme });
        }
    }

    fn fire_nulled(&mut self, symbol: Symbol, earleme: u32) {
        if self.grammar.nulled_event_requested(symbol)
            && self.nulled_active[symbol]
            && !self.fired_nulled[symbol]
        {
            self.fired_nulled.set(symbol, true);
            self.events
                .push(ParseEvent::SymbolNulled { symbol, earleme });
        }
    }

    fn completion_event_visible(&self, rule: sedge_grammar::InternalRuleId) -> bool {
        let rule = self.grammar.rule(rule);
        !rule.virtual_lhs
            && rule.source.is_some()
            && self.grammar.completion_event_requested(rule.lhs)
    }
}
