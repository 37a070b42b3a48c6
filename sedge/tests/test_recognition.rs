//! Recognition agrees with the formal CFG semantics, checked against a
//! brute-force reference on small grammars.

mod support;

use std::rc::Rc;

use sedge::*;
use test_case::test_case;

use support::{accepts, all_parses, all_strings, forest, recognize, Reference};

/// Balanced parentheses with explicit concatenation; ambiguous through
/// the associativity of `S ::= S S`.
fn paren_grammar() -> (Rc<CompiledGrammar>, Reference, Vec<Symbol>) {
    let mut g = Grammar::new();
    let [s, open, close] = g.sym();
    g.rule(s)
        .rhs([s, s])
        .rule(s)
        .rhs([open, s, close])
        .rule(s)
        .rhs([open, close]);
    g.set_start(s);
    let reference = Reference {
        rules: vec![
            (s, vec![s, s]),
            (s, vec![open, s, close]),
            (s, vec![open, close]),
        ],
        terminals: vec![open, close],
        start: s,
    };
    (
        Rc::new(g.precompute().unwrap()),
        reference,
        vec![open, close],
    )
}

#[test]
fn matches_reference_on_balanced_parens() {
    support::init_logs();
    let (grammar, reference, alphabet) = paren_grammar();
    for input in all_strings(&alphabet, 6) {
        assert_eq!(
            accepts(&grammar, &input),
            reference.derives(&input),
            "disagreement on {:?}",
            input
        );
    }
}

#[test]
fn matches_reference_on_a_n_b_n() {
    let mut g = Grammar::new();
    let [s, a, b] = g.sym();
    g.rule(s).rhs([a, s, b]).rule(s).rhs([a, b]);
    g.set_start(s);
    let grammar = Rc::new(g.precompute().unwrap());
    let reference = Reference {
        rules: vec![(s, vec![a, s, b]), (s, vec![a, b])],
        terminals: vec![a, b],
        start: s,
    };
    for input in all_strings(&[a, b], 6) {
        assert_eq!(accepts(&grammar, &input), reference.derives(&input));
    }
}

/// Tree enumeration yields exactly the derivations the reference
/// counts, with no duplicates, whether or not Leo memoization runs.
#[test_case(true; "leo on")]
#[test_case(false; "leo off")]
fn tree_count_matches_reference(leo: bool) {
    let (grammar, reference, alphabet) = paren_grammar();
    let (open, close) = (alphabet[0], alphabet[1]);
    for input in [
        vec![open, close],
        vec![open, close, open, close],
        vec![open, open, close, close, open, close],
        vec![open, close, open, close, open, close],
    ] {
        let parses = all_parses(forest(&grammar, &input, leo));
        assert_eq!(parses.len(), reference.count(&input), "on {:?}", input);
        let distinct: std::collections::HashSet<_> = parses.iter().collect();
        assert_eq!(distinct.len(), parses.len(), "duplicates on {:?}", input);
    }
}

/// A longer token spans several earlemes; the sets in between stay
/// empty of items while the token is in flight.
#[test]
fn accepts_multi_earleme_tokens() {
    let mut g = Grammar::new();
    let [s, wide, a] = g.sym();
    g.rule(s).rhs([wide, a]);
    g.mark_terminal(wide);
    g.set_start(s);
    let grammar = Rc::new(g.precompute().unwrap());

    let mut recognizer = Recognizer::new(grammar);
    recognizer.start_input().unwrap();
    recognizer.alternative(wide, 0, 3).unwrap();
    recognizer.complete().unwrap();
    recognizer.complete().unwrap();
    recognizer.complete().unwrap();
    recognizer.alternative(a, 1, 1).unwrap();
    recognizer.complete().unwrap();
    assert!(Bocage::new(&recognizer, None).is_ok());
}

/// A bocage can be built at any earleme where a parse ends, not only
/// the last one.
#[test]
fn forest_at_earlier_end_position() {
    let mut g = Grammar::new();
    let [s, a] = g.sym();
    g.rule(s).rhs([a]).rule(s).rhs([a, a]);
    g.set_start(s);
    let grammar = Rc::new(g.precompute().unwrap());
    let recognizer = recognize(&grammar, &[a, a], true).unwrap();
    assert!(Bocage::new(&recognizer, Some(1)).is_ok());
    assert!(Bocage::new(&recognizer, Some(2)).is_ok());
    assert_eq!(
        Bocage::new(&recognizer, Some(3)).err(),
        Some(ForestError::BadEarleme(3))
    );
}

#[test]
fn forests_require_started_input() {
    let mut g = Grammar::new();
    let [s, a] = g.sym();
    g.rule(s).rhs([a]);
    g.set_start(s);
    let grammar = Rc::new(g.precompute().unwrap());
    let recognizer: Recognizer<u32> = Recognizer::new(grammar);
    assert_eq!(
        Bocage::new(&recognizer, None).err(),
        Some(ForestError::NotStarted)
    );
}

#[test]
fn no_parse_is_an_ordinary_condition() {
    let mut g = Grammar::new();
    let [s, a, b] = g.sym();
    g.rule(s).rhs([a, b]);
    g.set_start(s);
    let grammar = Rc::new(g.precompute().unwrap());
    let recognizer = recognize(&grammar, &[a], true).unwrap();
    assert_eq!(
        Bocage::new(&recognizer, None).err(),
        Some(ForestError::NoParse(1))
    );
}
