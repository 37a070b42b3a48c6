//! Helpers shared by the integration tests: pipeline drivers, forest
//! shape dumps, and a brute-force reference counter of parse trees.

use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use sedge::*;

#[allow(dead_code)]
pub fn init_logs() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Runs a recognizer over one-earleme tokens whose values are their
/// input positions.
pub fn recognize(
    grammar: &Rc<CompiledGrammar>,
    input: &[Symbol],
    leo: bool,
) -> Result<Recognizer<u32>, RecognitionError> {
    let mut recognizer = Recognizer::new(grammar.clone());
    recognizer.set_leo_enabled(leo)?;
    recognizer.start_input()?;
    for (position, &symbol) in input.iter().enumerate() {
        recognizer.alternative(symbol, position as u32, 1)?;
        recognizer.complete()?;
    }
    Ok(recognizer)
}

/// Whether the grammar accepts the input.
#[allow(dead_code)]
pub fn accepts(grammar: &Rc<CompiledGrammar>, input: &[Symbol]) -> bool {
    match recognize(grammar, input, true) {
        Ok(recognizer) => Bocage::new(&recognizer, None).is_ok(),
        Err(_) => false,
    }
}

/// Parses the input all the way to a forest; panics when it is not
/// accepted.
#[allow(dead_code)]
pub fn forest(grammar: &Rc<CompiledGrammar>, input: &[Symbol], leo: bool) -> Bocage<u32> {
    let recognizer = recognize(grammar, input, leo).unwrap();
    Bocage::new(&recognizer, None).unwrap()
}

/// Enumerates every parse of the forest under the natural order, each
/// rendered as its replayed step fingerprints.
#[allow(dead_code)]
pub fn all_parses(bocage: Bocage<u32>) -> Vec<Vec<String>> {
    let order = Rc::new(Order::new(Rc::new(bocage)));
    let mut tree = Tree::new(order);
    let mut parses = vec![];
    while tree.next().is_some() {
        let steps: Vec<String> = Valuer::new(&tree)
            .unwrap()
            .map(|step| format!("{:?}", step))
            .collect();
        parses.push(steps);
    }
    parses
}

/// Replays the current tree, reducing every rule to the concatenation
/// of its arguments. The result is the parse's token values from left
/// to right, independent of the tree's shape.
#[allow(dead_code)]
pub fn replayed_tokens(tree: &Tree<u32>) -> Vec<u32> {
    let mut stack: Vec<Vec<u32>> = vec![];
    let place = |stack: &mut Vec<Vec<u32>>, at: usize, values: Vec<u32>| {
        if stack.len() <= at {
            stack.resize(at + 1, vec![]);
        }
        stack[at] = values;
    };
    for step in Valuer::new(tree).unwrap() {
        match step {
            Step::Token { value, result, .. } => place(&mut stack, result, vec![value]),
            Step::NullingSymbol { result, .. } => place(&mut stack, result, vec![]),
            Step::Rule { args, result, .. } => {
                if stack.len() < args.end {
                    stack.resize(args.end, vec![]);
                }
                let folded: Vec<u32> = stack[args]
                    .iter()
                    .flat_map(|values| values.iter().copied())
                    .collect();
                stack.truncate(result);
                stack.push(folded);
            }
        }
    }
    stack.into_iter().flatten().collect()
}

/// The forest's structure as a normalized listing, independent of node
/// creation order. Two forests with equal shapes encode the same set
/// of derivations.
#[allow(dead_code)]
pub fn bocage_shape(bocage: &Bocage<u32>) -> Vec<String> {
    let or_key = |id: OrId| {
        let or_node = bocage.or_node(id);
        format!(
            "({},{},{},{})",
            or_node.rule, or_node.origin, or_node.end, or_node.dot
        )
    };
    let mut shape: Vec<String> = (0..bocage.or_count() as OrId)
        .map(|id| {
            let mut choices: Vec<String> = bocage
                .choices(id)
                .iter()
                .map(|&and| {
                    let and_node = bocage.and_node(and);
                    let predecessor = and_node
                        .predecessor
                        .map(or_key)
                        .unwrap_or_else(|| "-".into());
                    let cause = match and_node.cause {
                        Cause::Or(cause) => or_key(cause),
                        Cause::Token(leaf) => {
                            let leaf = bocage.leaf(leaf);
                            format!("tok({:?},{},{})", leaf.symbol, leaf.start, leaf.end)
                        }
                    };
                    format!("pred:{} cause:{}", predecessor, cause)
                })
                .collect();
            choices.sort();
            format!("{} {:?}", or_key(id), choices)
        })
        .collect();
    shape.sort();
    shape
}

/// Counts the distinct parse trees of a plain-BNF grammar by brute
/// force. Ground truth for small inputs; not for cyclic grammars.
#[allow(dead_code)]
pub struct Reference {
    pub rules: Vec<(Symbol, Vec<Symbol>)>,
    pub terminals: Vec<Symbol>,
    pub start: Symbol,
}

#[allow(dead_code)]
impl Reference {
    pub fn count(&self, input: &[Symbol]) -> usize {
        let mut memo = HashMap::new();
        let mut guard = HashSet::new();
        self.count_symbol(self.start, 0, input.len(), input, &mut memo, &mut guard)
    }

    pub fn derives(&self, input: &[Symbol]) -> bool {
        self.count(input) > 0
    }

    fn count_symbol(
        &self,
        symbol: Symbol,
        from: usize,
        to: usize,
        input: &[Symbol],
        memo: &mut HashMap<(Symbol, usize, usize), usize>,
        guard: &mut HashSet<(Symbol, usize, usize)>,
    ) -> usize {
        if let Some(&count) = memo.get(&(symbol, from, to)) {
            return count;
        }
        // A span re-entered while still being counted contributes
        // nothing: a well-founded tree always bottoms out in strictly
        // smaller subproblems.
        if !guard.insert((symbol, from, to)) {
            return 0;
        }
        let mut count = 0;
        if self.terminals.contains(&symbol) && to == from + 1 && input[from] == symbol {
            count += 1;
        }
        for (lhs, rhs) in &self.rules {
            if *lhs == symbol {
                count += self.count_sequence(rhs, from, to, input, memo, guard);
            }
        }
        guard.remove(&(symbol, from, to));
        memo.insert((symbol, from, to), count);
        count
    }

    fn count_sequence(
        &self,
        rhs: &[Symbol],
        from: usize,
        to: usize,
        input: &[Symbol],
        memo: &mut HashMap<(Symbol, usize, usize), usize>,
        guard: &mut HashSet<(Symbol, usize, usize)>,
    ) -> usize {
        match rhs.split_first() {
            None => (from == to) as usize,
            Some((&first, rest)) => (from..=to)
                .map(|mid| {
                    let left = self.count_symbol(first, from, mid, input, memo, guard);
                    if left == 0 {
                        0
                    } else {
                        left * self.count_sequence(rest, mid, to, input, memo, guard)
                    }
                })
                .sum(),
        }
    }
}

/// Every string over `alphabet` of length up to `max_len`.
#[allow(dead_code)]
pub fn all_strings(alphabet: &[Symbol], max_len: usize) -> Vec<Vec<Symbol>> {
    let mut strings = vec![vec![]];
    let mut frontier = vec![vec![]];
    for _ in 0..max_len {
        let mut next = vec![];
        for string in &frontier {
            for &symbol in alphabet {
                let mut longer = string.clone();
                longer.push(symbol);
                next.push(longer);
            }
        }
        strings.extend(next.iter().cloned());
        frontier = next;
    }
    strings
}
