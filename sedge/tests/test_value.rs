//! The value stepper: factored rules and sequences are invisible to
//! the semantic layer, and replay reconstructs the input.

mod support;

use std::rc::Rc;

use sedge::*;

use support::{forest, recognize, replayed_tokens};

fn steps_of(grammar: &Rc<CompiledGrammar>, input: &[Symbol]) -> Vec<Step<u32>> {
    let bocage = Rc::new(forest(grammar, input, true));
    let order = Rc::new(Order::new(bocage));
    let mut tree = Tree::new(order);
    tree.next().unwrap();
    Valuer::new(&tree).unwrap().collect()
}

/// Nulled symbols occupy argument slots around their neighbors, in RHS
/// order, and announce themselves when valued.
#[test]
fn factored_nullables_fold_into_one_argument_range() {
    let mut g = Grammar::new();
    let [s, front, back, x, fa, ba] = g.sym();
    g.rule(s)
        .rhs([front, x, back])
        .rule(front)
        .rhs([])
        .rule(front)
        .rhs([fa])
        .rule(back)
        .rhs([])
        .rule(back)
        .rhs([ba]);
    g.set_valued(front, true);
    g.set_valued(back, true);
    g.set_start(s);
    let grammar = Rc::new(g.precompute().unwrap());

    let steps = steps_of(&grammar, &[x]);
    assert_eq!(
        steps,
        vec![
            Step::NullingSymbol {
                symbol: front,
                location: 0,
                result: 0,
            },
            Step::Token {
                symbol: x,
                start: 0,
                end: 1,
                value: 0,
                result: 1,
            },
            Step::NullingSymbol {
                symbol: back,
                location: 1,
                result: 2,
            },
            Step::Rule {
                rule: 0,
                lhs: s,
                start: 0,
                end: 1,
                args: 0..3,
                result: 0,
            },
        ]
    );
}

/// A chain of factoring pieces still presents one argument range per
/// external rule.
#[test]
fn long_nullable_chains_replay_transparently() {
    let mut g = Grammar::new();
    let [s, n, t, tn] = g.sym();
    g.rule(s)
        .rhs([t, n, n, n])
        .rule(n)
        .rhs([])
        .rule(n)
        .rhs([tn]);
    g.set_start(s);
    let grammar = Rc::new(g.precompute().unwrap());

    // All three `n`s nonempty.
    let steps = steps_of(&grammar, &[t, tn, tn, tn]);
    let rule_steps: Vec<_> = steps
        .iter()
        .filter_map(|step| match step {
            Step::Rule { rule, args, .. } => Some((*rule, args.clone())),
            _ => None,
        })
        .collect();
    // Three completions of `n ::= tn`, then `s` over all four slots.
    assert_eq!(rule_steps.len(), 4);
    assert_eq!(rule_steps[3], (0, 0..4));

    let bocage = Rc::new(forest(&grammar, &[t, tn, tn, tn], true));
    let mut tree = Tree::new(Rc::new(Order::new(bocage)));
    tree.next().unwrap();
    assert_eq!(replayed_tokens(&tree), vec![0, 1, 2, 3]);
}

/// Sequence pieces fold back into a single rule step; separator values
/// are discarded.
#[test]
fn separated_sequence_replays_items_only() {
    let mut g = Grammar::new();
    let [list, item, comma] = g.sym();
    g.sequence(list).intersperse(comma).rhs(item);
    g.set_start(list);
    let grammar = Rc::new(g.precompute().unwrap());

    let input = [item, comma, item, comma, item];
    let steps = steps_of(&grammar, &input);
    let tokens: Vec<u32> = steps
        .iter()
        .filter_map(|step| match step {
            Step::Token { value, .. } => Some(*value),
            _ => None,
        })
        .collect();
    assert_eq!(tokens, vec![0, 2, 4]);
    match steps.last() {
        Some(Step::Rule {
            rule,
            lhs,
            args,
            start,
            end,
            ..
        }) => {
            assert_eq!((*rule, *lhs), (0, list));
            assert_eq!(args.clone(), 0..3);
            assert_eq!((*start, *end), (0, 5));
        }
        other => panic!("expected a rule step, got {:?}", other),
    }
}

/// A zero-minimum sequence accepts the empty input as a nulled LHS.
#[test]
fn zero_minimum_sequence_allows_empty_input() {
    let mut g = Grammar::new();
    let [list, item] = g.sym();
    g.sequence(list).min(0).rhs(item);
    g.set_valued(list, true);
    g.set_start(list);
    let grammar = Rc::new(g.precompute().unwrap());

    let recognizer = recognize(&grammar, &[], true).unwrap();
    let bocage = Rc::new(Bocage::new(&recognizer, None).unwrap());
    let mut tree = Tree::new(Rc::new(Order::new(bocage)));
    assert_eq!(tree.next(), Some(0));
    let steps: Vec<_> = Valuer::new(&tree).unwrap().collect();
    assert!(matches!(
        steps[..],
        [Step::NullingSymbol { symbol, .. }] if symbol == list
    ));

    let one = steps_of(&grammar, &[item]);
    assert!(one
        .iter()
        .any(|step| matches!(step, Step::Rule { args, .. } if args.clone() == (0..1))));
}

/// The valuer refuses to run before a parse exists.
#[test]
fn valuer_requires_a_tree() {
    let mut g = Grammar::new();
    let [s, a] = g.sym();
    g.rule(s).rhs([a]);
    g.set_start(s);
    let grammar = Rc::new(g.precompute().unwrap());
    let bocage = Rc::new(forest(&grammar, &[a], true));
    let mut tree = Tree::new(Rc::new(Order::new(bocage)));
    assert!(matches!(Valuer::new(&tree), Err(ValueError::NoTree)));
    tree.next().unwrap();
    assert!(Valuer::new(&tree).is_ok());
    assert_eq!(tree.next(), None);
    assert!(matches!(Valuer::new(&tree), Err(ValueError::NoTree)));
}

/// Tokens replay left to right across arbitrary tree shapes.
#[test]
fn replay_reconstructs_the_input_order() {
    let mut g = Grammar::new();
    let [s, l, r, a, b] = g.sym();
    g.rule(s)
        .rhs([l, r])
        .rule(l)
        .rhs([a, b])
        .rule(r)
        .rhs([a])
        .rule(r)
        .rhs([a, r]);
    g.set_start(s);
    let grammar = Rc::new(g.precompute().unwrap());

    let input = [a, b, a, a, a];
    let bocage = Rc::new(forest(&grammar, &input, true));
    let mut tree = Tree::new(Rc::new(Order::new(bocage)));
    tree.next().unwrap();
    assert_eq!(replayed_tokens(&tree), vec![0, 1, 2, 3, 4]);
}
