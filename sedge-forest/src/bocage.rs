//! The bocage builder: a backward reachability pass over the
//! recognizer's item graph, then a forward pass materializing one
//! or-node per distinct (rule, origin, end, dot) and one and-node per
//! distinct (predecessor, cause) under it.

use std::collections::HashMap;
use std::rc::Rc;

use bit_vec::BitVec;
use log::debug;

use sedge_symbol::Symbol;

use sedge_grammar::{CompiledGrammar, InternalRuleId};
use sedge_recognizer::{ItemRef, Recognizer, Source};

use crate::error::ForestError;

/// Identifies an or-node of a bocage.
pub type OrId = u32;
/// Identifies an and-node of a bocage.
pub type AndId = u32;
/// Identifies a token leaf of a bocage.
pub type LeafId = u32;

/// A choice point: all the ways one rule reached one dot position over
/// one span of input.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct OrNode {
    /// The internal rule.
    pub rule: InternalRuleId,
    /// The earleme the span begins at.
    pub origin: u32,
    /// The earleme the span ends at.
    pub end: u32,
    /// How many RHS symbols the span covers; equal to the RHS length
    /// for a completion.
    pub dot: usize,
}

/// One resolution of a choice point.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct AndNode {
    /// The or-node covering every symbol before the last one, absent
    /// when the last symbol is the first.
    pub predecessor: Option<OrId>,
    /// What the last symbol derives.
    pub cause: Cause,
}

/// The derivation of an and-node's last symbol.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Cause {
    /// A nonterminal: another choice point.
    Or(OrId),
    /// A terminal: a scanned token. Tokens need no further choices.
    Token(LeafId),
}

/// A scanned token shared by every and-node that consumes it.
#[derive(Clone, Debug)]
pub struct TokenLeaf<T> {
    /// The token's terminal symbol.
    pub symbol: Symbol,
    /// The earleme the token starts at.
    pub start: u32,
    /// The earleme the token ends at.
    pub end: u32,
    /// The caller's semantic value.
    pub value: T,
}

/// The bocage's entry point.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Root {
    /// The empty input was parsed by a nullable start symbol; the
    /// forest is the lone nulled-start derivation.
    Null,
    /// The completed start rule's or-node.
    Or(OrId),
}

/// A shared parse forest over a finished recognition.
pub struct Bocage<T> {
    grammar: Rc<CompiledGrammar>,
    or_nodes: Vec<OrNode>,
    or_choices: Vec<Vec<AndId>>,
    and_nodes: Vec<AndNode>,
    leaves: Vec<TokenLeaf<T>>,
    root: Root,
    ambiguous: bool,
}

impl<T: Clone> Bocage<T> {
    /// Builds the forest of every parse accepted at `end`, which
    /// defaults to the current earleme. Fails with
    /// [`ForestError::NoParse`] when nothing is accepted there.
    pub fn new(recognizer: &Recognizer<T>, end: Option<u32>) -> Result<Self, ForestError> {
        if recognizer.sets().is_empty() {
            return Err(ForestError::NotStarted);
        }
        if !recognizer.is_consistent() {
            return Err(ForestError::Inconsistent);
        }
        let grammar = recognizer.grammar().clone();
        let end = end.unwrap_or_else(|| recognizer.earleme());
        if end > recognizer.earleme() {
            return Err(ForestError::BadEarleme(end));
        }

        let root_item = grammar.accept_ahm().and_then(|accept| {
            recognizer
                .set(end)
                .items
                .iter()
                .position(|item| {
                    item.ahm == accept
                        && item.origin == 0
                        && item.active
                        && item
                            .sources
                            .iter()
                            .any(|source| link_valid(recognizer, source))
                })
                .map(|index| ItemRef {
                    set: end,
                    index: index as u32,
                })
        });

        let root_item = match root_item {
            Some(root_item) => root_item,
            None if end == 0 && grammar.null_parse_allowed() => {
                return Ok(Bocage {
                    grammar,
                    or_nodes: vec![],
                    or_choices: vec![],
                    and_nodes: vec![],
                    leaves: vec![],
                    root: Root::Null,
                    ambiguous: false,
                });
            }
            None => return Err(ForestError::NoParse(end)),
        };

        let mut builder = Builder {
            grammar: &grammar,
            recognizer,
            visited: recognizer
                .sets()
                .iter()
                .map(|set| BitVec::from_elem(set.items.len(), false))
                .collect(),
            or_keys: HashMap::new(),
            or_nodes: vec![],
            or_choices: vec![],
            and_nodes: vec![],
            leaves: vec![],
            leaf_keys: HashMap::new(),
            ambiguous: false,
        };
        builder.discover(root_item);
        builder.materialize();
        let root = Root::Or(builder.or_of_item(root_item));
        let Builder {
            or_nodes,
            or_choices,
            and_nodes,
            leaves,
            ambiguous,
            ..
        } = builder;
        debug!(
            "bocage: {} or-nodes, {} and-nodes, {} leaves",
            or_nodes.len(),
            and_nodes.len(),
            leaves.len()
        );
        Ok(Bocage {
            grammar,
            or_nodes,
            or_choices,
            and_nodes,
            leaves,
            root,
            ambiguous,
        })
    }

    /// The compiled grammar the parse ran over.
    pub fn grammar(&self) -> &Rc<CompiledGrammar> {
        &self.grammar
    }

    /// The forest's entry point.
    pub fn root(&self) -> Root {
        self.root
    }

    /// The number of or-nodes.
    pub fn or_count(&self) -> usize {
        self.or_nodes.len()
    }

    /// The or-node addressed by `id`.
    pub fn or_node(&self, id: OrId) -> &OrNode {
        &self.or_nodes[id as usize]
    }

    /// The and-nodes resolving the or-node, in insertion order.
    pub fn choices(&self, id: OrId) -> &[AndId] {
        &self.or_choices[id as usize]
    }

    /// The and-node addressed by `id`.
    pub fn and_node(&self, id: AndId) -> &AndNode {
        &self.and_nodes[id as usize]
    }

    /// The token leaf addressed by `id`.
    pub fn leaf(&self, id: LeafId) -> &TokenLeaf<T> {
        &self.leaves[id as usize]
    }

    /// 1 when the parse is unique, 2 when some choice point has more
    /// than one resolution.
    pub fn ambiguity_metric(&self) -> u32 {
        if self.ambiguous {
            2
        } else {
            1
        }
    }
}

/// A source link takes part in derivations only while every item and
/// token it references is still accepted.
fn link_valid<T: Clone>(recognizer: &Recognizer<T>, source: &Source) -> bool {
    let alive = |item: ItemRef| recognizer.item(item).active;
    match *source {
        Source::Predicted => false,
        Source::Token { predecessor, token } => {
            !recognizer.tokens()[token].rejected && predecessor.map_or(true, alive)
        }
        Source::Completion { predecessor, cause } => {
            alive(cause) && predecessor.map_or(true, alive)
        }
        Source::Leo { leo, cause } => alive(cause) && recognizer.leo_item(leo).active,
    }
}

struct Builder<'a, T: Clone> {
    grammar: &'a Rc<CompiledGrammar>,
    recognizer: &'a Recognizer<T>,
    visited: Vec<BitVec>,
    or_keys: HashMap<(InternalRuleId, u32, u32, usize), OrId>,
    or_nodes: Vec<OrNode>,
    or_choices: Vec<Vec<AndId>>,
    and_nodes: Vec<AndNode>,
    leaves: Vec<TokenLeaf<T>>,
    leaf_keys: HashMap<usize, LeafId>,
    ambiguous: bool,
}

impl<'a, T: Clone> Builder<'a, T> {
    /// Marks every item that takes part in some accepted derivation,
    /// walking source links backward from the root. Each item is
    /// visited exactly once.
    fn discover(&mut self, root: ItemRef) {
        let mut stack = vec![root];
        self.visited[root.set as usize].set(root.index as usize, true);
        while let Some(item_ref) = stack.pop() {
            let item = self.recognizer.item(item_ref);
            let sources = item.sources.clone();
            for source in &sources {
                if !link_valid(self.recognizer, source) {
                    continue;
                }
                match *source {
                    Source::Predicted => {}
                    Source::Token { predecessor, .. } => {
                        if let Some(predecessor) = predecessor {
                            self.visit(predecessor, &mut stack);
                        }
                    }
                    Source::Completion { predecessor, cause } => {
                        self.visit(cause, &mut stack);
                        if let Some(predecessor) = predecessor {
                            self.visit(predecessor, &mut stack);
                        }
                    }
                    Source::Leo { leo, cause } => {
                        self.visit(cause, &mut stack);
                        let mut link = Some(leo);
                        while let Some(leo_ref) = link {
                            let leo = self.recognizer.leo_item(leo_ref);
                            self.visit(leo.base, &mut stack);
                            link = leo.predecessor;
                        }
                    }
                }
            }
        }
    }

    fn visit(&mut self, item: ItemRef, stack: &mut Vec<ItemRef>) {
        let seen = &mut self.visited[item.set as usize];
        if !seen[item.index as usize] {
            seen.set(item.index as usize, true);
            stack.push(item);
        }
    }

    /// Creates the or-nodes of every discovered item, oldest span
    /// first, then fills in their and-nodes. Leo links expand into the
    /// chain of completions they short-circuited.
    fn materialize(&mut self) {
        for set in 0..self.visited.len() {
            for index in 0..self.visited[set].len() {
                if self.visited[set][index] {
                    let item_ref = ItemRef {
                        set: set as u32,
                        index: index as u32,
                    };
                    let item = self.recognizer.item(item_ref);
                    let ahm = self.grammar.ahm(item.ahm);
                    if ahm.dot > 0 {
                        self.intern_or(ahm.rule, item.origin, set as u32, ahm.dot);
                    }
                }
            }
        }

        for set in 0..self.visited.len() {
            for index in 0..self.visited[set].len() {
                if !self.visited[set][index] {
                    continue;
                }
                let item_ref = ItemRef {
                    set: set as u32,
                    index: index as u32,
                };
                let item = self.recognizer.item(item_ref);
                let ahm = self.grammar.ahm(item.ahm);
                if ahm.dot == 0 {
                    continue;
                }
                let or_id = self.or_of_item(item_ref);
                let sources = item.sources.clone();
                for source in &sources {
                    if !link_valid(self.recognizer, source) {
                        continue;
                    }
                    match *source {
                        Source::Predicted => {}
                        Source::Token { predecessor, token } => {
                            let leaf = self.intern_leaf(token);
                            let predecessor = predecessor.map(|item| self.or_of_item(item));
                            self.add_and(or_id, predecessor, Cause::Token(leaf));
                        }
                        Source::Completion { predecessor, cause } => {
                            let cause = Cause::Or(self.or_of_item(cause));
                            let predecessor = predecessor.map(|item| self.or_of_item(item));
                            self.add_and(or_id, predecessor, cause);
                        }
                        Source::Leo { leo, cause } => {
                            self.expand_leo(or_id, leo, cause, set as u32);
                        }
                    }
                }
            }
        }
    }

    /// Replays a Leo chain bottom-up: each link's base advances over
    /// the completion below it, producing the completion the next link
    /// consumes. The final completion is the chain's top item itself.
    fn expand_leo(
        &mut self,
        top_or: OrId,
        leo: sedge_recognizer::LeoRef,
        cause: ItemRef,
        end: u32,
    ) {
        let mut cause_or = self.or_of_item(cause);
        let mut link = Some(leo);
        while let Some(leo_ref) = link {
            let leo_item = self.recognizer.leo_item(leo_ref);
            let (base_ref, predecessor_link) = (leo_item.base, leo_item.predecessor);
            let base = self.recognizer.item(base_ref);
            let base_ahm = self.grammar.ahm(base.ahm);
            let rhs_len = self.grammar.rule(base_ahm.rule).rhs.len();
            let completed = self.intern_or(base_ahm.rule, base.origin, end, rhs_len);
            let predecessor = (base_ahm.dot > 0).then(|| self.or_of_item(base_ref));
            self.add_and(completed, predecessor, Cause::Or(cause_or));
            cause_or = completed;
            link = predecessor_link;
        }
        debug_assert_eq!(cause_or, top_or, "a Leo chain must end at its top item");
    }

    fn intern_or(&mut self, rule: InternalRuleId, origin: u32, end: u32, dot: usize) -> OrId {
        match self.or_keys.get(&(rule, origin, end, dot)) {
            Some(&id) => id,
            None => {
                let id = self.or_nodes.len() as OrId;
                self.or_nodes.push(OrNode {
                    rule,
                    origin,
                    end,
                    dot,
                });
                self.or_choices.push(vec![]);
                self.or_keys.insert((rule, origin, end, dot), id);
                id
            }
        }
    }

    fn or_of_item(&mut self, item_ref: ItemRef) -> OrId {
        let item = self.recognizer.item(item_ref);
        let ahm = self.grammar.ahm(item.ahm);
        self.intern_or(ahm.rule, item.origin, item_ref.set, ahm.dot)
    }

    fn intern_leaf(&mut self, token: usize) -> LeafId {
        match self.leaf_keys.get(&token) {
            Some(&id) => id,
            None => {
                let source = &self.recognizer.tokens()[token];
                let id = self.leaves.len() as LeafId;
                self.leaves.push(TokenLeaf {
                    symbol: source.symbol,
                    start: source.start,
                    end: source.end,
                    value: source.value.clone(),
                });
                self.leaf_keys.insert(token, id);
                id
            }
        }
    }

    /// Adds one resolution, suppressing duplicates per or-node.
    fn add_and(&mut self, or_id: OrId, predecessor: Option<OrId>, cause: Cause) {
        let and_node = AndNode { predecessor, cause };
        let choices = &mut self.or_choices[or_id as usize];
        if choices
            .iter()
            .any(|&and| self.and_nodes[and as usize] == and_node)
        {
            return;
        }
        self.and_nodes.push(and_node);
        choices.push(self.and_nodes.len() as AndId - 1);
        if choices.len() > 1 {
            self.ambiguous = true;
        }
    }
}
