//! Tarot cards and the card provider collaborator.

pub mod card;
pub mod deck;

pub use card::{Card, Suit};
pub use deck::{CardSource, Deck};
