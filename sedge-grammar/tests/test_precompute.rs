use sedge_grammar::error::{GrammarError, GrammarWarning};
use sedge_grammar::Grammar;

#[test]
fn test_no_rules() {
    let mut g = Grammar::new();
    let [start] = g.sym();
    g.set_start(start);
    assert_eq!(g.precompute().unwrap_err(), GrammarError::NoRules);
}

#[test]
fn test_no_start() {
    let mut g = Grammar::new();
    let [start, a] = g.sym();
    g.rule(start).rhs([a]);
    assert_eq!(g.precompute().unwrap_err(), GrammarError::NoStart);
}

#[test]
fn test_unproductive_start() {
    let mut g = Grammar::new();
    let [start, a] = g.sym();
    // `start` derives only `a`, and `a` derives only itself.
    g.rule(start).rhs([a]).rule(a).rhs([a]);
    g.set_start(start);
    assert_eq!(
        g.precompute().unwrap_err(),
        GrammarError::UnproductiveStart(start)
    );
}

#[test]
fn test_nulling_terminal() {
    let mut g = Grammar::new();
    let [start, a] = g.sym();
    g.rule(start).rhs([a]).rule(a).rhs([]);
    g.mark_terminal(a);
    g.set_start(start);
    assert_eq!(
        g.precompute().unwrap_err(),
        GrammarError::NullingTerminal(a)
    );
}

#[test]
fn test_counted_nullable() {
    let mut g = Grammar::new();
    let [start, item, t] = g.sym();
    g.sequence(start).rhs(item);
    g.rule(item).rhs([]).rule(item).rhs([t]);
    g.set_start(start);
    assert_eq!(
        g.precompute().unwrap_err(),
        GrammarError::CountedNullable(item)
    );
}

#[test]
fn test_duplicate_rule() {
    let mut g = Grammar::new();
    let [start, a] = g.sym();
    g.rule(start).rhs([a]).rule(start).rhs([a]);
    g.set_start(start);
    assert_eq!(g.precompute().unwrap_err(), GrammarError::DuplicateRule(1));
}

#[test]
fn test_sequence_lhs_not_unique() {
    let mut g = Grammar::new();
    let [start, item] = g.sym();
    g.sequence(start).rhs(item);
    g.rule(start).rhs([item]);
    g.set_start(start);
    assert_eq!(
        g.precompute().unwrap_err(),
        GrammarError::SequenceLhsNotUnique(start)
    );
}

#[test]
fn test_cyclic_grammar_precomputes_with_warnings() {
    let mut g = Grammar::new();
    let [start, a, b, t] = g.sym();
    g.rule(start)
        .rhs([a])
        .rule(a)
        .rhs([b])
        .rule(b)
        .rhs([a])
        .rule(a)
        .rhs([t]);
    g.set_start(start);
    let compiled = g.precompute().unwrap();
    assert!(compiled.is_cyclic());
    let cyclic: Vec<_> = compiled
        .warnings()
        .iter()
        .filter(|warning| matches!(warning, GrammarWarning::CyclicRule(_)))
        .collect();
    assert_eq!(cyclic.len(), 2);
}

#[test]
fn test_acyclic_grammar() {
    let mut g = Grammar::new();
    let [start, a, t] = g.sym();
    g.rule(start).rhs([a]).rule(a).rhs([t]);
    g.set_start(start);
    let compiled = g.precompute().unwrap();
    assert!(!compiled.is_cyclic());
    assert!(compiled.warnings().is_empty());
}

#[test]
fn test_self_loop_is_a_cycle() {
    let mut g = Grammar::new();
    let [start, t] = g.sym();
    g.rule(start).rhs([start]).rule(start).rhs([t]);
    g.set_start(start);
    let compiled = g.precompute().unwrap();
    assert!(compiled.is_cyclic());
}

#[test]
fn test_nullable_start_allows_null_parse() {
    let mut g = Grammar::new();
    let [start] = g.sym();
    g.rule(start).rhs([]);
    g.set_start(start);
    let compiled = g.precompute().unwrap();
    assert!(compiled.null_parse_allowed());
    assert!(compiled.start_rule().is_none());
    assert_eq!(compiled.rule_count(), 0);
}

#[test]
fn test_inaccessible_rule_dropped() {
    let mut g = Grammar::new();
    let [start, a, t, u] = g.sym();
    g.rule(start).rhs([t]).rule(a).rhs([u]);
    g.set_start(start);
    let compiled = g.precompute().unwrap();
    assert!(compiled
        .warnings()
        .iter()
        .any(|warning| matches!(warning, GrammarWarning::InaccessibleSymbol(sym) if *sym == a)));
    // Only the start rule and `start ::= t` survive.
    assert_eq!(compiled.rule_count(), 2);
}

#[test]
fn test_terminals_are_inferred() {
    let mut g = Grammar::new();
    let [start, t] = g.sym();
    g.rule(start).rhs([t]);
    g.set_start(start);
    let compiled = g.precompute().unwrap();
    assert!(compiled.is_terminal(t));
    assert!(!compiled.is_terminal(start));
}
