//! Shared parse forests.
//!
//! A [`Bocage`] condenses every derivation a finished recognizer
//! accepts into a graph of or-nodes (choice points) and and-nodes (one
//! resolution of a choice). An [`Order`] overlays the bocage with a
//! per-choice-point ordering, either the natural insertion order or a
//! rank-based one; tree enumeration visits choices in that order.

mod bocage;
mod error;
mod order;

pub use crate::bocage::{AndId, AndNode, Bocage, Cause, LeafId, OrId, OrNode, Root, TokenLeaf};
pub use crate::error::{ForestError, OrderError};
pub use crate::order::Order;
