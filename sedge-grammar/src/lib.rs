//! Grammar construction and precomputation.
//!
//! A [`Grammar`] is built symbol by symbol and rule by rule, then
//! [`Grammar::precompute`] consumes it and produces an immutable
//! [`CompiledGrammar`]: a nulling-free internal rule set, the dotted-rule
//! state table, per-symbol prediction closures and right-recursion
//! information. Recognizers share the compiled grammar read-only.

mod census;
pub mod error;
pub mod grammar;
mod rewrite;
pub mod rule_builder;
pub mod sequence;
pub mod tables;

pub use crate::error::{GrammarError, GrammarWarning};
pub use crate::grammar::{ExternalRule, ExternalRuleKind, Grammar};
pub use crate::rule_builder::RuleBuilder;
pub use crate::sequence::{Separator, SequenceRuleBuilder};
pub use crate::tables::{Ahm, CompiledGrammar, InternalRule};

/// Identifies a rule as the user supplied it, in insertion order.
pub type ExternalRuleId = usize;
/// Identifies a rewritten, nulling-free rule of the compiled grammar.
pub type InternalRuleId = usize;
/// Identifies a dotted-rule state of the compiled grammar.
pub type AhmId = usize;
/// Identifies a zero-width assertion.
pub type AssertionId = usize;
