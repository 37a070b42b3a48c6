//! Replay of one enumerated parse as an ordered stream of semantic
//! steps.

use std::ops::Range;

use sedge_symbol::Symbol;

use sedge_grammar::{CompiledGrammar, ExternalRuleId};
use sedge_forest::{Cause, Root};

use crate::error::ValueError;
use crate::tree::{Nook, Tree};

/// One semantic construction event. Steps arrive bottom-up and left to
/// right; `result` positions index a value stack the caller maintains.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Step<T> {
    /// A scanned token contributes its value.
    Token {
        /// The token's terminal symbol.
        symbol: Symbol,
        /// The earleme the token starts at.
        start: u32,
        /// The earleme the token ends at.
        end: u32,
        /// The caller's semantic value, as submitted to the recognizer.
        value: T,
        /// Where the value goes on the caller's stack.
        result: usize,
    },
    /// A rule of the external grammar was completed over its argument
    /// span. Factored and sequence-expanded rules are folded back into
    /// the single range the external rule's RHS occupies.
    Rule {
        /// The completed external rule.
        rule: ExternalRuleId,
        /// The rule's left-hand side symbol.
        lhs: Symbol,
        /// The earleme the derivation starts at.
        start: u32,
        /// The earleme the derivation ends at.
        end: u32,
        /// The positions of the rule's arguments on the caller's stack.
        args: Range<usize>,
        /// Where the rule's value goes; always the first argument
        /// position.
        result: usize,
    },
    /// A valued symbol derived the empty string.
    NullingSymbol {
        /// The nulled symbol.
        symbol: Symbol,
        /// The earleme the empty derivation sits at.
        location: u32,
        /// Where the symbol's value goes on the caller's stack.
        result: usize,
    },
}

/// Replays the tree's current parse step by step.
///
/// The valuer borrows the tree, which keeps the nook stack from
/// advancing under it; pull the next parse only after dropping the
/// valuer.
pub struct Valuer<'t, T> {
    _tree: &'t Tree<T>,
    steps: std::vec::IntoIter<Step<T>>,
}

impl<'t, T: Clone> Valuer<'t, T> {
    /// Prepares the replay of the tree's current parse.
    pub fn new(tree: &'t Tree<T>) -> Result<Self, ValueError> {
        if !tree.has_tree() {
            return Err(ValueError::NoTree);
        }
        Ok(Valuer {
            _tree: tree,
            steps: build_steps(tree).into_iter(),
        })
    }

    /// The next semantic step, or `None` when the replay is over.
    pub fn next_step(&mut self) -> Option<Step<T>> {
        self.steps.next()
    }
}

impl<'t, T: Clone> Iterator for Valuer<'t, T> {
    type Item = Step<T>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_step()
    }
}

/// The replay phases of one nook: the predecessor subtree, then the
/// nulls crossed before the last symbol and the symbol's own
/// derivation, then the completion bookkeeping.
#[derive(Clone, Copy)]
enum Phase {
    Pred,
    Cause,
    Finish,
}

fn build_steps<T: Clone>(tree: &Tree<T>) -> Vec<Step<T>> {
    let order = tree.order();
    let bocage = order.bocage();
    let grammar = bocage.grammar();
    let mut steps = vec![];

    let root = match bocage.root() {
        Root::Null => {
            // The whole parse is one nulled start symbol.
            push_null(grammar, &mut steps, &mut 0, grammar.start(), 0);
            return steps;
        }
        Root::Or(root) => root,
    };
    debug_assert_eq!(tree.stack()[0].or_node, root);

    // Argument positions of values on the caller's stack; virtual
    // rules grow the count of the external rule under assembly.
    let mut height = 0usize;
    let mut virtual_stack: Vec<u32> = vec![];

    let mut walk: Vec<(usize, Phase)> = vec![(0, Phase::Pred)];
    while let Some((index, phase)) = walk.pop() {
        let nook: Nook = tree.stack()[index];
        let or_node = bocage.or_node(nook.or_node);
        let and_id = order.choices(nook.or_node)[nook.choice];
        let and_node = bocage.and_node(and_id);
        let rule = grammar.rule(or_node.rule);
        let at_separator = rule.separator_dot == Some(or_node.dot - 1);
        match phase {
            Phase::Pred => {
                walk.push((index, Phase::Cause));
                if let Some(pred) = nook.pred_nook {
                    walk.push((pred, Phase::Pred));
                }
            }
            Phase::Cause => {
                walk.push((index, Phase::Finish));
                let location = match and_node.cause {
                    Cause::Token(leaf) => bocage.leaf(leaf).start,
                    Cause::Or(cause) => bocage.or_node(cause).origin,
                };
                for &symbol in &rule.nulls_at[or_node.dot - 1] {
                    push_null(grammar, &mut steps, &mut height, symbol, location);
                }
                match and_node.cause {
                    Cause::Token(leaf_id) => {
                        // Separator values are discarded.
                        if !at_separator {
                            let leaf = bocage.leaf(leaf_id);
                            steps.push(Step::Token {
                                symbol: leaf.symbol,
                                start: leaf.start,
                                end: leaf.end,
                                value: leaf.value.clone(),
                                result: height,
                            });
                            height += 1;
                        }
                    }
                    Cause::Or(_) => {
                        if let Some(cause) = nook.cause_nook {
                            walk.push((cause, Phase::Pred));
                        }
                    }
                }
            }
            Phase::Finish => {
                if at_separator && matches!(and_node.cause, Cause::Or(_)) {
                    // A nonterminal separator left one value behind.
                    height -= 1;
                }
                if or_node.dot == rule.rhs.len() {
                    for &symbol in &rule.nulls_at[rule.rhs.len()] {
                        push_null(grammar, &mut steps, &mut height, symbol, or_node.end);
                    }
                    match (rule.virtual_lhs, rule.virtual_rhs) {
                        (true, false) => virtual_stack.push(rule.real_symbol_count),
                        (true, true) => {
                            if let Some(top) = virtual_stack.last_mut() {
                                *top += rule.real_symbol_count;
                            }
                        }
                        (false, virtual_rhs) => {
                            let mut total = rule.real_symbol_count as usize;
                            if virtual_rhs {
                                total += virtual_stack.pop().unwrap_or(0) as usize;
                            }
                            let arg_0 = height - total;
                            if let Some(source) = rule.source {
                                steps.push(Step::Rule {
                                    rule: source,
                                    lhs: grammar.external_rule(source).lhs,
                                    start: or_node.origin,
                                    end: or_node.end,
                                    args: arg_0..height,
                                    result: arg_0,
                                });
                            }
                            height = arg_0 + 1;
                        }
                    }
                }
            }
        }
    }
    steps
}

/// A nulled symbol occupies an argument slot; it announces itself only
/// when valued.
fn push_null<T>(
    grammar: &CompiledGrammar,
    steps: &mut Vec<Step<T>>,
    height: &mut usize,
    symbol: Symbol,
    location: u32,
) {
    if grammar.is_valued(symbol) {
        steps.push(Step::NullingSymbol {
            symbol,
            location,
            result: *height,
        });
    }
    *height += 1;
}
