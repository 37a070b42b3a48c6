//! Earley sets, items, Leo items and the source links that record how
//! each item was derived.
//!
//! Items are small values held in per-set vectors and addressed by
//! [`ItemRef`], a (set ordinal, index) pair. The forest builder walks
//! the same structures backward through [`Source`] links, so everything
//! here is read-accessible outside the crate.

use std::collections::BTreeMap;

use sedge_symbol::Symbol;

use sedge_grammar::AhmId;

/// Addresses one Earley item: the set it lives in and its index there.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct ItemRef {
    /// The ordinal of the set holding the item.
    pub set: u32,
    /// The item's index within its set.
    pub index: u32,
}

/// Addresses one Leo item: the set it lives in and its transition
/// symbol. A set holds at most one Leo item per symbol.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct LeoRef {
    /// The ordinal of the set holding the Leo item.
    pub set: u32,
    /// The transition symbol the Leo item was built for.
    pub symbol: Symbol,
}

/// One way an Earley item was derived. An item with several links is
/// ambiguous at its position.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Source {
    /// A dot-zero item added by prediction.
    Predicted,
    /// The dot advanced over a scanned token.
    Token {
        /// The item the dot advanced from, absent when it was a
        /// prediction.
        predecessor: Option<ItemRef>,
        /// Index of the scanned token in the recognizer's token list.
        token: usize,
    },
    /// The dot advanced over a completed nonterminal.
    Completion {
        /// The item the dot advanced from, absent when it was a
        /// prediction.
        predecessor: Option<ItemRef>,
        /// The completed item that caused the advance.
        cause: ItemRef,
    },
    /// A whole chain of right-recursive completions, memoized by a Leo
    /// item, advanced at once.
    Leo {
        /// The bottom of the memoized chain.
        leo: LeoRef,
        /// The completed item that set the chain off.
        cause: ItemRef,
    },
}

/// An Earley item: a dotted-rule state valid over a span of input.
/// The end of the span is the ordinal of the set holding the item.
#[derive(Clone, Debug)]
pub struct Item {
    /// The dotted-rule state.
    pub ahm: AhmId,
    /// The ordinal of the set where this item's span begins.
    pub origin: u32,
    /// Every derivation of this item found so far.
    pub sources: Vec<Source>,
    /// Cleared by consistency repair when no derivation survives token
    /// revocation.
    pub active: bool,
}

/// Memoizes a chain of right-recursive unit completions, so that
/// completing the whole chain is one item insertion instead of one per
/// link.
#[derive(Clone, Debug)]
pub struct LeoItem {
    /// The symbol whose completion this Leo item stands in for.
    pub symbol: Symbol,
    /// The dotted state of the item at the top of the chain, already
    /// advanced past its last symbol.
    pub top_ahm: AhmId,
    /// The origin of the item at the top of the chain.
    pub top_origin: u32,
    /// The unique item expecting the transition symbol; its advance is
    /// the bottom link of the chain.
    pub base: ItemRef,
    /// The next Leo item up the chain, if the chain continues past the
    /// base's origin.
    pub predecessor: Option<LeoRef>,
    /// Symbols with requested completion events among the completions
    /// this chain short-circuits; fired when the chain is used.
    pub event_symbols: Vec<Symbol>,
    /// Cleared together with the base item by consistency repair.
    pub active: bool,
}

/// One Earley set: every parser state reachable at one input position.
#[derive(Clone, Debug, Default)]
pub struct EarleySet {
    /// The set's input position. Sets are stored in a chain of strictly
    /// increasing ordinals.
    pub ordinal: u32,
    /// The set's items, in creation order.
    pub items: Vec<Item>,
    /// Maps a symbol to the items of this set expecting it next.
    pub postdot: BTreeMap<Symbol, Vec<u32>>,
    /// At most one Leo item per postdot symbol.
    pub leo_items: BTreeMap<Symbol, LeoItem>,
}

impl EarleySet {
    pub(crate) fn new(ordinal: u32) -> Self {
        EarleySet {
            ordinal,
            ..Self::default()
        }
    }

    /// The item addressed by `index`.
    pub fn item(&self, index: u32) -> &Item {
        &self.items[index as usize]
    }

    /// The items of this set expecting the given symbol.
    pub fn waiting_on(&self, symbol: Symbol) -> &[u32] {
        self.postdot
            .get(&symbol)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// The set's Leo item for the given transition symbol.
    pub fn leo_item(&self, symbol: Symbol) -> Option<&LeoItem> {
        self.leo_items.get(&symbol)
    }
}

/// A scanned or queued input token.
#[derive(Clone, Debug)]
pub struct Token<T> {
    /// The token's terminal symbol.
    pub symbol: Symbol,
    /// The earleme the token starts at.
    pub start: u32,
    /// The earleme the token ends at. Always greater than `start`.
    pub end: u32,
    /// The caller's semantic value.
    pub value: T,
    /// Set by [`Recognizer::revoke_alternative`]; a rejected token
    /// takes part in no derivation.
    ///
    /// [`Recognizer::revoke_alternative`]: crate::Recognizer::revoke_alternative
    pub rejected: bool,
}

/// A queued token alternative, waiting for the earleme it ends at.
#[derive(Clone, Copy, Debug)]
pub struct Alternative {
    /// Index of the queued token in the recognizer's token list.
    pub token: usize,
    /// The earleme the token ends at.
    pub end: u32,
}
