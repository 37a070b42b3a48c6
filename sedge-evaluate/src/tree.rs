//! Depth-first enumeration of the parses in an ordered bocage.

use std::rc::Rc;

use bit_vec::BitVec;
use log::trace;

use sedge_forest::{Cause, OrId, Order, Root};

/// One frame of the enumerator's stack. The live stack of nooks is the
/// currently materialized parse tree.
#[derive(Clone, Copy, Debug)]
pub struct Nook {
    /// The choice point this frame resolves.
    pub or_node: OrId,
    /// The index of the chosen and-node in the frozen order.
    pub choice: usize,
    /// The frame whose expansion pushed this one; the root has none.
    pub parent: Option<usize>,
    /// Whether this frame expands its parent's cause (else its
    /// predecessor).
    pub is_cause: bool,
    /// The chosen and-node's cause needs no further expansion.
    pub cause_done: bool,
    /// The chosen and-node's predecessor needs no further expansion.
    pub pred_done: bool,
    /// The frame expanding the cause, once pushed.
    pub cause_nook: Option<usize>,
    /// The frame expanding the predecessor, once pushed.
    pub pred_nook: Option<usize>,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum State {
    /// No parse was pulled yet.
    Fresh,
    /// The nook stack holds a parse.
    HasTree,
    /// Every parse was enumerated. Terminal.
    Exhausted,
}

/// Enumerates the parses of an ordered bocage, most preferred first.
///
/// Each call to [`next`] either advances to a new parse by
/// chronological backtracking over the nook stack, or reports
/// exhaustion, from which there is no way back. An or-node never plays
/// two roles in one parse: expansion refuses to reuse a node already
/// in use elsewhere in the current tree and backtracks past the
/// refusal instead.
///
/// [`next`]: Tree::next
pub struct Tree<T> {
    order: Rc<Order<T>>,
    stack: Vec<Nook>,
    in_use: BitVec,
    state: State,
    parse_count: usize,
}

impl<T: Clone> Tree<T> {
    /// Creates an enumerator over the given order. Freezes the order
    /// at the first pull.
    pub fn new(order: Rc<Order<T>>) -> Self {
        let or_count = order.bocage().or_count();
        Tree {
            order,
            stack: vec![],
            in_use: BitVec::from_elem(or_count, false),
            state: State::Fresh,
            parse_count: 0,
        }
    }

    /// The order this enumerator walks.
    pub fn order(&self) -> &Rc<Order<T>> {
        &self.order
    }

    /// The current parse tree's frames. Empty for the null parse.
    pub fn stack(&self) -> &[Nook] {
        &self.stack
    }

    /// How many parses were enumerated so far.
    pub fn parse_count(&self) -> usize {
        self.parse_count
    }

    /// Whether enumeration has ended for good.
    pub fn is_exhausted(&self) -> bool {
        self.state == State::Exhausted
    }

    /// Whether the current parse is the nulled-start parse of an empty
    /// input.
    pub fn is_null_parse(&self) -> bool {
        self.state == State::HasTree && self.order.bocage().root() == Root::Null
    }

    /// Whether the enumerator currently holds a parse.
    pub fn has_tree(&self) -> bool {
        self.state == State::HasTree
    }

    /// Materializes the next parse and returns its zero-based index,
    /// or `None` forever once every parse was enumerated.
    pub fn next(&mut self) -> Option<usize> {
        match self.state {
            State::Exhausted => return None,
            State::Fresh => {
                self.state = State::HasTree;
                match self.order.bocage().root() {
                    Root::Null => {
                        // The lone parse of an empty input; the empty
                        // nook stack is the whole tree.
                        self.parse_count = 1;
                        return Some(0);
                    }
                    Root::Or(root) => {
                        self.push_nook(root, None, false);
                    }
                }
            }
            State::HasTree => {
                if self.order.bocage().root() == Root::Null || !self.backtrack() {
                    self.state = State::Exhausted;
                    return None;
                }
            }
        }
        loop {
            if self.expand() {
                self.parse_count += 1;
                trace!("tree {}: {} nooks", self.parse_count - 1, self.stack.len());
                return Some(self.parse_count - 1);
            }
            if !self.backtrack() {
                self.state = State::Exhausted;
                return None;
            }
        }
    }

    fn push_nook(&mut self, or_node: OrId, parent: Option<usize>, is_cause: bool) -> usize {
        self.in_use.set(or_node as usize, true);
        self.stack.push(Nook {
            or_node,
            choice: 0,
            parent,
            is_cause,
            cause_done: false,
            pred_done: false,
            cause_nook: None,
            pred_nook: None,
        });
        self.stack.len() - 1
    }

    /// Pushes a child frame for every pending cause and predecessor
    /// until the tree is complete. Fails when a child's or-node is
    /// already in use elsewhere in this tree; the caller backtracks
    /// past the refusal.
    fn expand(&mut self) -> bool {
        let mut work: Vec<usize> = (0..self.stack.len())
            .filter(|&index| !self.stack[index].cause_done || !self.stack[index].pred_done)
            .collect();
        while let Some(&index) = work.last() {
            let nook = self.stack[index];
            let and_id = self.order.choices(nook.or_node)[nook.choice];
            let and_node = *self.order.bocage().and_node(and_id);
            if !nook.cause_done {
                match and_node.cause {
                    Cause::Token(_) => {
                        self.stack[index].cause_done = true;
                    }
                    Cause::Or(cause) => {
                        if self.in_use[cause as usize] {
                            return false;
                        }
                        let child = self.push_nook(cause, Some(index), true);
                        self.stack[index].cause_done = true;
                        self.stack[index].cause_nook = Some(child);
                        work.push(child);
                    }
                }
                continue;
            }
            if !nook.pred_done {
                match and_node.predecessor {
                    None => {
                        self.stack[index].pred_done = true;
                    }
                    Some(predecessor) => {
                        if self.in_use[predecessor as usize] {
                            return false;
                        }
                        let child = self.push_nook(predecessor, Some(index), false);
                        self.stack[index].pred_done = true;
                        self.stack[index].pred_nook = Some(child);
                        work.push(child);
                    }
                }
                continue;
            }
            work.pop();
        }
        true
    }

    /// Chronological backtracking: pops frames from the top until one
    /// can advance to its next choice, releasing each popped frame's
    /// in-use mark and its slot in the parent. An empty stack means
    /// exhaustion.
    fn backtrack(&mut self) -> bool {
        loop {
            let advanceable = match self.stack.last() {
                None => return false,
                Some(top) => top.choice + 1 < self.order.choices(top.or_node).len(),
            };
            if advanceable {
                if let Some(top) = self.stack.last_mut() {
                    top.choice += 1;
                    top.cause_done = false;
                    top.pred_done = false;
                    top.cause_nook = None;
                    top.pred_nook = None;
                }
                return true;
            }
            if let Some(nook) = self.stack.pop() {
                self.in_use.set(nook.or_node as usize, false);
                if let Some(parent) = nook.parent {
                    if nook.is_cause {
                        self.stack[parent].cause_done = false;
                        self.stack[parent].cause_nook = None;
                    } else {
                        self.stack[parent].pred_done = false;
                        self.stack[parent].pred_nook = None;
                    }
                }
            }
        }
    }
}
