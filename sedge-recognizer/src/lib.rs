//! The Earley recognizer, extended with Leo's optimization for right
//! recursion.
//!
//! A [`Recognizer`] is driven token by token: the caller queues
//! alternatives for the current input location with
//! [`Recognizer::alternative`] and advances one earleme at a time with
//! [`Recognizer::complete`]. The recognizer keeps every Earley set it
//! builds; a finished recognition is handed to the forest builder, which
//! reads the item graph back through its source links.

mod error;
mod event;
mod item;
mod recognizer;

pub use crate::error::RecognitionError;
pub use crate::event::ParseEvent;
pub use crate::item::{
    Alternative, EarleySet, Item, ItemRef, LeoItem, LeoRef, Source, Token,
};
pub use crate::recognizer::{Recognizer, MAX_TOKEN_LENGTH};
