//! Rewrites the external grammar into its nulling-free internal form.
//! Sequence rules expand into plain rules; nulling symbol occurrences
//! are deleted and recorded per dot; nullable symbol occurrences are
//! factored away piecewise through synthetic virtual symbols.

use log::trace;

use sedge_symbol::{Symbol, SymbolBitSet, SymbolSource};

use crate::census::Census;
use crate::error::GrammarWarning;
use crate::grammar::{ExternalRule, ExternalRuleKind};
use crate::sequence::Separator;
use crate::tables::InternalRule;
use crate::ExternalRuleId;

/// A rule over the external symbol space with sequences already
/// expanded. Empty RHSes are allowed here; the nulling eliminator
/// consumes them.
pub(crate) struct FlatRule {
    pub lhs: Symbol,
    pub rhs: Vec<Symbol>,
    pub source: ExternalRuleId,
    pub kind: FlatKind,
}

#[derive(Clone, Copy, Debug)]
pub(crate) enum FlatKind {
    Plain,
    /// `lhs ::= seq` or `lhs ::= seq sep`: the externally visible rule
    /// of an expanded sequence.
    SequenceTop { separator_dot: Option<usize> },
    /// `seq ::= item`.
    SequenceUnit,
    /// `seq ::= seq item` or `seq ::= seq sep item`.
    SequenceAppend { separator_dot: Option<usize> },
}

/// Expands every sequence rule into a small template of plain rules
/// encoding the zero/one/many and separator placement cases.
pub(crate) fn expand_sequences(
    rules: &[ExternalRule],
    syms: &mut SymbolSource,
) -> Vec<FlatRule> {
    let mut flat = vec![];
    for (id, rule) in rules.iter().enumerate() {
        match rule.kind {
            ExternalRuleKind::Bnf { ref rhs } => flat.push(FlatRule {
                lhs: rule.lhs,
                rhs: rhs.to_vec(),
                source: id,
                kind: FlatKind::Plain,
            }),
            ExternalRuleKind::Sequence {
                item,
                min,
                separator,
            } => expand_sequence(rule.lhs, item, min, separator, id, syms, &mut flat),
        }
    }
    flat
}

fn expand_sequence(
    lhs: Symbol,
    item: Symbol,
    min: u32,
    separator: Separator,
    source: ExternalRuleId,
    syms: &mut SymbolSource,
    flat: &mut Vec<FlatRule>,
) {
    let seq = syms.next_sym();
    let mut push = |lhs: Symbol, rhs: Vec<Symbol>, kind: FlatKind| {
        flat.push(FlatRule {
            lhs,
            rhs,
            source,
            kind,
        });
    };

    push(seq, vec![item], FlatKind::SequenceUnit);
    match separator.symbol() {
        Some(sep) => push(
            seq,
            vec![seq, sep, item],
            FlatKind::SequenceAppend {
                separator_dot: Some(1),
            },
        ),
        None => push(
            seq,
            vec![seq, item],
            FlatKind::SequenceAppend {
                separator_dot: None,
            },
        ),
    }
    match separator {
        Separator::Trailing(sep) => push(
            lhs,
            vec![seq, sep],
            FlatKind::SequenceTop {
                separator_dot: Some(1),
            },
        ),
        Separator::Liberal(sep) => {
            push(
                lhs,
                vec![seq],
                FlatKind::SequenceTop {
                    separator_dot: None,
                },
            );
            push(
                lhs,
                vec![seq, sep],
                FlatKind::SequenceTop {
                    separator_dot: Some(1),
                },
            );
        }
        Separator::Proper(_) | Separator::Null => push(
            lhs,
            vec![seq],
            FlatKind::SequenceTop {
                separator_dot: None,
            },
        ),
    }
    if min == 0 {
        push(lhs, vec![], FlatKind::Plain);
    }
}

/// Rewrites the expanded rule set into nulling-free internal rules.
/// Rules using unproductive symbols and rules with inaccessible LHSes
/// are dropped with a warning; entirely nulling rules contribute only
/// to the census.
pub(crate) fn eliminate_nulling(
    flat: &[FlatRule],
    census: &Census,
    externals: &[ExternalRule],
    syms: &mut SymbolSource,
    warnings: &mut Vec<GrammarWarning>,
) -> Vec<InternalRule> {
    let mut internal = vec![];
    let mut warned = SymbolBitSet::from_elem(census.productive.len(), false);

    for rule in flat {
        if !census.accessible[rule.lhs] {
            if !warned[rule.lhs] {
                warned.set(rule.lhs, true);
                warnings.push(GrammarWarning::InaccessibleSymbol(rule.lhs));
            }
            continue;
        }
        if let Some(&bad) = rule.rhs.iter().find(|&&sym| !census.productive[sym]) {
            if !warned[bad] {
                warned.set(bad, true);
                warnings.push(GrammarWarning::UnproductiveSymbol(bad));
            }
            continue;
        }
        if rule.rhs.is_empty() {
            continue;
        }
        rewrite_rule(rule, census, externals, syms, &mut internal);
    }
    internal
}

fn rewrite_rule(
    rule: &FlatRule,
    census: &Census,
    externals: &[ExternalRule],
    syms: &mut SymbolSource,
    out: &mut Vec<InternalRule>,
) {
    let ext = &externals[rule.source];

    // Delete nulling symbol occurrences, keeping them for valuation.
    // `nulls_before[i]` holds the nulled symbols sitting directly before
    // the `i`th kept symbol; the final entry holds trailing nulls.
    let mut kept = vec![];
    let mut nulls_before: Vec<Vec<Symbol>> = vec![vec![]];
    for &sym in &rule.rhs {
        if census.nulling[sym] {
            nulls_before.last_mut().unwrap().push(sym);
        } else {
            kept.push(sym);
            nulls_before.push(vec![]);
        }
    }
    if kept.is_empty() {
        // Entirely nulling. The null derivation is represented by null
        // leaves in the forest, not by internal rules.
        return;
    }

    match rule.kind {
        FlatKind::Plain => {
            factor(rule.lhs, &kept, &nulls_before, true, rule.source, ext, census, syms, out);
        }
        FlatKind::SequenceTop { separator_dot } => {
            out.push(sequence_piece(rule, ext, kept, false, true, 0, separator_dot));
        }
        FlatKind::SequenceUnit => {
            out.push(sequence_piece(rule, ext, kept, true, false, 1, None));
        }
        FlatKind::SequenceAppend { separator_dot } => {
            out.push(sequence_piece(rule, ext, kept, true, true, 1, separator_dot));
        }
    }
}

fn sequence_piece(
    rule: &FlatRule,
    ext: &ExternalRule,
    rhs: Vec<Symbol>,
    virtual_lhs: bool,
    virtual_rhs: bool,
    real_symbol_count: u32,
    separator_dot: Option<usize>,
) -> InternalRule {
    // Counted symbols are never nullable, so sequence pieces pass
    // through the eliminator unchanged.
    let nulls_at = vec![vec![]; rhs.len() + 1];
    InternalRule {
        lhs: rule.lhs,
        rank: rank_with_tier(ext, 0),
        rhs,
        source: Some(rule.source),
        virtual_lhs,
        virtual_rhs,
        real_symbol_count,
        separator_dot,
        nulls_at,
    }
}

fn rank_with_tier(ext: &ExternalRule, nulled: usize) -> i64 {
    let tier = if ext.null_ranks_high {
        nulled
    } else {
        3 - nulled
    };
    ext.rank as i64 * 4 + tier as i64
}

/// Factors a nulling-free RHS that may still contain nullable symbols.
/// Whenever more than two nullable positions remain, the RHS is cut
/// after the first of them and the remainder continues through a fresh
/// virtual symbol, so every piece has at most two nullable positions.
fn factor(
    lhs: Symbol,
    rhs: &[Symbol],
    nulls: &[Vec<Symbol>],
    is_top: bool,
    source: ExternalRuleId,
    ext: &ExternalRule,
    census: &Census,
    syms: &mut SymbolSource,
    out: &mut Vec<InternalRule>,
) {
    let nullable_positions: Vec<usize> = rhs
        .iter()
        .enumerate()
        .filter(|&(_, &sym)| census.nullable[sym])
        .map(|(i, _)| i)
        .collect();

    if nullable_positions.len() > 2 {
        let cut = nullable_positions[1];
        let virtual_sym = syms.next_sym();
        emit_piece(
            lhs,
            &rhs[..cut],
            &nulls[..cut],
            Some((virtual_sym, &rhs[cut..], &nulls[cut..])),
            is_top,
            source,
            ext,
            census,
            out,
        );
        factor(
            virtual_sym,
            &rhs[cut..],
            &nulls[cut..],
            false,
            source,
            ext,
            census,
            syms,
            out,
        );
    } else {
        emit_piece(lhs, rhs, nulls, None, is_top, source, ext, census, out);
    }
}

/// Emits one alternative per null/non-null combination of the piece's
/// nullable positions. An alternative that would have an empty RHS is
/// skipped: its derivation is externally a nulled symbol, represented
/// by a null leaf where the symbol is used.
fn emit_piece(
    lhs: Symbol,
    piece_syms: &[Symbol],
    piece_nulls: &[Vec<Symbol>],
    continuation: Option<(Symbol, &[Symbol], &[Vec<Symbol>])>,
    is_top: bool,
    source: ExternalRuleId,
    ext: &ExternalRule,
    census: &Census,
    out: &mut Vec<InternalRule>,
) {
    let mut optional: Vec<usize> = piece_syms
        .iter()
        .enumerate()
        .filter(|&(_, &sym)| census.nullable[sym])
        .map(|(i, _)| i)
        .collect();
    let virtual_position = piece_syms.len();
    if let Some((_, tail_syms, _)) = continuation {
        if tail_syms.iter().all(|&sym| census.nullable[sym]) {
            optional.push(virtual_position);
        }
    }
    debug_assert!(optional.len() <= 2);

    for choice in 0..1u32 << optional.len() {
        let is_nulled =
            |pos: usize| optional.iter().position(|&p| p == pos).map_or(false, |idx| choice & (1 << idx) != 0);

        let mut rhs: Vec<Symbol> = vec![];
        let mut nulls_at: Vec<Vec<Symbol>> = vec![vec![]];
        for (i, &sym) in piece_syms.iter().enumerate() {
            nulls_at.last_mut().unwrap().extend(piece_nulls[i].iter().copied());
            if is_nulled(i) {
                nulls_at.last_mut().unwrap().push(sym);
            } else {
                rhs.push(sym);
                nulls_at.push(vec![]);
            }
        }
        let mut virtual_rhs = false;
        match continuation {
            Some((virtual_sym, tail_syms, tail_nulls)) => {
                if is_nulled(virtual_position) {
                    // The whole remainder is nulled; fold its symbols,
                    // in order, into the null list at this dot.
                    let acc = nulls_at.last_mut().unwrap();
                    for (j, &sym) in tail_syms.iter().enumerate() {
                        acc.extend(tail_nulls[j].iter().copied());
                        acc.push(sym);
                    }
                    acc.extend(tail_nulls[tail_syms.len()].iter().copied());
                } else {
                    rhs.push(virtual_sym);
                    nulls_at.push(vec![]);
                    virtual_rhs = true;
                }
            }
            None => {
                nulls_at
                    .last_mut()
                    .unwrap()
                    .extend(piece_nulls[piece_syms.len()].iter().copied());
            }
        }
        if rhs.is_empty() {
            continue;
        }

        let nulled_positions = (0..=virtual_position).filter(|&p| is_nulled(p)).count();
        let real_symbol_count = rhs.len() - virtual_rhs as usize
            + nulls_at.iter().map(|nulls| nulls.len()).sum::<usize>();
        trace!(
            "FACTOR {:?} ::= {:?} nulls {:?} tier {}",
            lhs,
            rhs,
            nulls_at,
            nulled_positions
        );
        out.push(InternalRule {
            lhs,
            rhs,
            rank: rank_with_tier(ext, nulled_positions),
            source: Some(source),
            virtual_lhs: !is_top,
            virtual_rhs,
            real_symbol_count: real_symbol_count as u32,
            separator_dot: None,
            nulls_at,
        });
    }
}
