//! The symbol census: terminal, nullable, nulling, productive and
//! accessible symbol sets, plus unit-derivation cycle detection.

use sedge_symbol::{Symbol, SymbolBitMatrix, SymbolBitSet};

use crate::rewrite::FlatRule;

/// Property mode for the RHS closure.
#[derive(Clone, Copy, Eq, PartialEq)]
enum RhsPropertyMode {
    /// If **all** symbols on the RHS have the property, the LHS has it
    /// too.
    All,
    /// If **any** symbol on the RHS has the property, the LHS has it
    /// too.
    Any,
}

/// Per-symbol facts computed over the sequence-expanded rule set.
pub(crate) struct Census {
    /// Symbols that input tokens may carry.
    pub terminal: SymbolBitSet,
    /// Symbols that derive the empty string.
    pub nullable: SymbolBitSet,
    /// Symbols that derive only the empty string.
    pub nulling: SymbolBitSet,
    /// Symbols that derive at least one string of terminals.
    pub productive: SymbolBitSet,
    /// Symbols reachable from the start symbol.
    pub accessible: SymbolBitSet,
    /// Indices of rules that participate in a unit-derivation cycle.
    pub cyclic_rules: Vec<usize>,
}

impl Census {
    pub fn new(
        num_syms: usize,
        rules: &[FlatRule],
        terminal_marks: &SymbolBitSet,
        start: Symbol,
    ) -> Self {
        let occurrences = occurrence_index(num_syms, rules);

        // Symbols with no rules of their own are terminals, in addition
        // to the explicitly marked ones.
        let mut terminal = terminal_marks.clone();
        terminal.grow(num_syms);
        let mut no_rules = SymbolBitSet::from_elem(num_syms, false);
        for rule in rules {
            no_rules.set(rule.lhs, true);
        }
        no_rules.negate();
        terminal.union(&no_rules);

        let mut nullable = SymbolBitSet::from_elem(num_syms, false);
        for rule in rules {
            if rule.rhs.is_empty() {
                nullable.set(rule.lhs, true);
            }
        }
        rhs_closure(rules, &occurrences, &mut nullable, RhsPropertyMode::All);

        let mut productive = terminal.clone();
        for rule in rules {
            if rule.rhs.is_empty() {
                productive.set(rule.lhs, true);
            }
        }
        rhs_closure(rules, &occurrences, &mut productive, RhsPropertyMode::All);

        // A nullable symbol that can also derive something nonempty is
        // not nulling.
        let mut nonempty = terminal.clone();
        rhs_closure(rules, &occurrences, &mut nonempty, RhsPropertyMode::Any);
        let mut nulling = SymbolBitSet::from_elem(num_syms, false);
        for sym in nullable.iter() {
            if !nonempty[sym] {
                nulling.set(sym, true);
            }
        }

        let mut derivation = SymbolBitMatrix::new(num_syms);
        for rule in rules {
            for &sym in &rule.rhs {
                derivation.set(rule.lhs, sym, true);
            }
        }
        derivation.transitive_closure();
        derivation.reflexive_closure();
        let mut accessible = SymbolBitSet::from_elem(num_syms, false);
        for sym in derivation.iter_row_syms(start) {
            accessible.set(sym, true);
        }

        let cyclic_rules = cyclic_rules(num_syms, rules, &nullable);

        Census {
            terminal,
            nullable,
            nulling,
            productive,
            accessible,
            cyclic_rules,
        }
    }
}

fn occurrence_index(num_syms: usize, rules: &[FlatRule]) -> Vec<Vec<usize>> {
    let mut occurrences = vec![vec![]; num_syms];
    for (rule_idx, rule) in rules.iter().enumerate() {
        for &sym in &rule.rhs {
            let entry = &mut occurrences[sym.usize()];
            if entry.last() != Some(&rule_idx) {
                entry.push(rule_idx);
            }
        }
    }
    occurrences
}

/// If **any** or **all** symbols on the RHS have the property, the LHS
/// has it too. Updates the given symbol set according to the above, and
/// does it transitively.
fn rhs_closure(
    rules: &[FlatRule],
    occurrences: &[Vec<usize>],
    property: &mut SymbolBitSet,
    property_mode: RhsPropertyMode,
) {
    let mut work_stack: Vec<Symbol> = property.iter().collect();

    while let Some(work_sym) = work_stack.pop() {
        for &rule_idx in &occurrences[work_sym.usize()] {
            let rule = &rules[rule_idx];
            let mut rhs_iter = rule.rhs.iter();
            let get_property = |sym: &Symbol| property[*sym];
            let rhs_satisfies_property = match property_mode {
                RhsPropertyMode::All => rhs_iter.all(get_property),
                RhsPropertyMode::Any => rhs_iter.any(get_property),
            };
            if !property[rule.lhs] && rhs_satisfies_property {
                property.set(rule.lhs, true);
                work_stack.push(rule.lhs);
            }
        }
    }
}

/// A rule of form `A ::= … B …` counts as a unit derivation of `B`
/// whenever every other RHS symbol is nullable. Cycles among unit
/// derivations make the grammar cyclic: some derivations never make
/// progress.
fn cyclic_rules(num_syms: usize, rules: &[FlatRule], nullable: &SymbolBitSet) -> Vec<usize> {
    let mut unit_derivation = SymbolBitMatrix::new(num_syms);
    for rule in rules {
        for i in unit_positions(rule, nullable) {
            // A self-loop `A ::= A` is a cycle on its own; it is kept
            // out of the matrix and checked directly below.
            if rule.rhs[i] != rule.lhs {
                unit_derivation.set(rule.lhs, rule.rhs[i], true);
            }
        }
    }
    unit_derivation.transitive_closure();

    let mut result = vec![];
    for (rule_idx, rule) in rules.iter().enumerate() {
        let cyclic = unit_positions(rule, nullable).any(|i| {
            rule.rhs[i] == rule.lhs || unit_derivation.get(rule.rhs[i], rule.lhs)
        });
        if cyclic {
            result.push(rule_idx);
        }
    }
    result
}

/// Positions `i` in `rule`'s RHS where every *other* symbol is nullable,
/// so `rule.rhs[i]` is a unit derivation of `rule.lhs`.
fn unit_positions<'a>(
    rule: &'a FlatRule,
    nullable: &'a SymbolBitSet,
) -> impl Iterator<Item = usize> + 'a {
    let rhs = &rule.rhs;
    (0..rhs.len()).filter(move |&i| {
        rhs.iter()
            .enumerate()
            .all(|(j, &sym)| j == i || nullable[sym])
    })
}
