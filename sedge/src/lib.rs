//! sedge recognizes context-free grammars and extracts their parse
//! forests.
//!
//! The pipeline runs in five stages, each consuming the previous one's
//! handle:
//!
//! 1. build a [`Grammar`] and [`precompute`] it into a
//!    [`CompiledGrammar`];
//! 2. drive a [`Recognizer`] over the input, one token alternative and
//!    one earleme at a time;
//! 3. condense the accepted derivations into a [`Bocage`], the shared
//!    parse forest;
//! 4. attach an [`Order`] to its choice points, by insertion order or
//!    by rank;
//! 5. enumerate parses with a [`Tree`] and replay each one's semantic
//!    [`Step`]s with a [`Valuer`].
//!
//! Grammars may be ambiguous, cyclic, and nullable; recognition stays
//! linear for every grammar the Earley/Leo combination handles in
//! linear time, and degrades polynomially otherwise.
//!
//! [`precompute`]: Grammar::precompute
//!
//! ```
//! use std::rc::Rc;
//! use sedge::*;
//!
//! let mut grammar = Grammar::new();
//! let [sum, plus, n] = grammar.sym();
//! grammar.rule(sum).rhs([sum, plus, sum]).rule(sum).rhs([n]);
//! grammar.set_start(sum);
//! let compiled = Rc::new(grammar.precompute().unwrap());
//!
//! let mut recognizer = Recognizer::new(compiled);
//! recognizer.start_input().unwrap();
//! for (i, &sym) in [n, plus, n, plus, n].iter().enumerate() {
//!     recognizer.alternative(sym, i as u32, 1).unwrap();
//!     recognizer.complete().unwrap();
//! }
//!
//! let bocage = Rc::new(Bocage::new(&recognizer, None).unwrap());
//! assert_eq!(bocage.ambiguity_metric(), 2);
//! let order = Rc::new(Order::new(bocage));
//! let mut tree = Tree::new(order);
//! let mut parses = 0;
//! while tree.next().is_some() {
//!     parses += 1;
//!     let steps: Vec<_> = Valuer::new(&tree).unwrap().collect();
//!     assert!(!steps.is_empty());
//! }
//! assert_eq!(parses, 2);
//! ```

pub use sedge_symbol::{Symbol, SymbolBitMatrix, SymbolBitSet, SymbolSource};

pub use sedge_grammar::{
    Ahm, AhmId, AssertionId, CompiledGrammar, ExternalRule, ExternalRuleId, ExternalRuleKind,
    Grammar, GrammarError, GrammarWarning, InternalRule, InternalRuleId, RuleBuilder, Separator,
    SequenceRuleBuilder,
};

pub use sedge_recognizer::{
    Alternative, EarleySet, Item, ItemRef, LeoItem, LeoRef, ParseEvent, RecognitionError,
    Recognizer, Source, Token, MAX_TOKEN_LENGTH,
};

pub use sedge_forest::{
    AndId, AndNode, Bocage, Cause, ForestError, LeafId, OrId, OrNode, Order, OrderError, Root,
    TokenLeaf,
};

pub use sedge_evaluate::{Nook, Step, Tree, ValueError, Valuer};
