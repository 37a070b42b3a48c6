//! Parse tree enumeration and semantic value replay.
//!
//! A [`Tree`] walks an ordered bocage depth first, materializing one
//! parse at a time in rank order; the live stack of nooks is the
//! current parse tree. A [`Valuer`] borrows a tree and replays it as
//! an ordered stream of [`Step`]s for a caller-supplied semantic
//! action layer; the borrow keeps the tree in place until the replay
//! is dropped.

mod error;
mod tree;
mod valuer;

pub use crate::error::ValueError;
pub use crate::tree::{Nook, Tree};
pub use crate::valuer::{Step, Valuer};
