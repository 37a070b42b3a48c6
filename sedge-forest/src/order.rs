//! Orderings over a bocage's choice points.

use std::cell::{Cell, RefCell};
use std::cmp::Reverse;
use std::rc::Rc;

use bit_vec::BitVec;

use crate::bocage::{AndId, Bocage, Cause, OrId, Root};
use crate::error::OrderError;

/// A per-or-node ordering of and-node choices.
///
/// The default order is the bocage's insertion order. A rank order
/// sorts each or-node's choices by the rank of the causing rule or
/// token symbol, stably, optionally keeping only the top-ranked group.
/// Choice lists are built lazily, the first time enumeration visits
/// their or-node, and cached. The first use freezes the order.
pub struct Order<T> {
    bocage: Rc<Bocage<T>>,
    rank_ordered: bool,
    high_rank_only: bool,
    frozen: Cell<bool>,
    cache: RefCell<Vec<Option<Rc<[AndId]>>>>,
}

impl<T: Clone> Order<T> {
    /// Creates the natural order over the bocage.
    pub fn new(bocage: Rc<Bocage<T>>) -> Self {
        let or_count = bocage.or_count();
        Order {
            bocage,
            rank_ordered: false,
            high_rank_only: false,
            frozen: Cell::new(false),
            cache: RefCell::new(vec![None; or_count]),
        }
    }

    /// The bocage this order wraps.
    pub fn bocage(&self) -> &Rc<Bocage<T>> {
        &self.bocage
    }

    /// Switches to rank ordering. With `high_rank_only`, choices below
    /// an or-node's top rank are dropped from enumeration entirely.
    /// Fails once the order is frozen.
    pub fn set_rank_ordered(&mut self, high_rank_only: bool) -> Result<(), OrderError> {
        if self.frozen.get() {
            return Err(OrderError::Frozen);
        }
        self.rank_ordered = true;
        self.high_rank_only = high_rank_only;
        Ok(())
    }

    /// Whether the order has been used and can no longer change.
    pub fn is_frozen(&self) -> bool {
        self.frozen.get()
    }

    /// The or-node's choices, most preferred first. Freezes the order.
    pub fn choices(&self, or_node: OrId) -> Rc<[AndId]> {
        self.frozen.set(true);
        if let Some(choices) = &self.cache.borrow()[or_node as usize] {
            return choices.clone();
        }
        let mut choices = self.bocage.choices(or_node).to_vec();
        if self.rank_ordered {
            choices.sort_by_key(|&and| Reverse(self.and_rank(and)));
            if self.high_rank_only {
                let top = self.and_rank(choices[0]);
                choices.retain(|&and| self.and_rank(and) == top);
            }
        }
        let choices: Rc<[AndId]> = choices.into();
        self.cache.borrow_mut()[or_node as usize] = Some(choices.clone());
        choices
    }

    /// 1 when enumeration under this order yields a unique parse, 2
    /// when some reachable choice point keeps more than one choice.
    /// Freezes the order.
    pub fn ambiguity_metric(&self) -> u32 {
        self.frozen.set(true);
        let root = match self.bocage.root() {
            Root::Null => return 1,
            Root::Or(root) => root,
        };
        let mut seen = BitVec::from_elem(self.bocage.or_count(), false);
        let mut stack = vec![root];
        seen.set(root as usize, true);
        let mut metric = 1;
        while let Some(or_node) = stack.pop() {
            let choices = self.choices(or_node);
            if choices.len() > 1 {
                metric = 2;
            }
            for &and in choices.iter() {
                let and_node = self.bocage.and_node(and);
                let mut push = |or: OrId| {
                    if !seen[or as usize] {
                        seen.set(or as usize, true);
                        stack.push(or);
                    }
                };
                if let Some(predecessor) = and_node.predecessor {
                    push(predecessor);
                }
                if let Cause::Or(cause) = and_node.cause {
                    push(cause);
                }
            }
        }
        metric
    }

    /// A choice ranks by its causing rule, or by its token's symbol
    /// rank aligned to the non-null tier of the rule rank scale.
    fn and_rank(&self, and: AndId) -> i64 {
        match self.bocage.and_node(and).cause {
            Cause::Or(cause) => {
                let rule = self.bocage.or_node(cause).rule;
                self.bocage.grammar().rule(rule).rank
            }
            Cause::Token(leaf) => {
                let symbol = self.bocage.leaf(leaf).symbol;
                self.bocage.grammar().rank_of(symbol) as i64 * 4 + 3
            }
        }
    }
}
