//! Card provider collaborator and a standard shuffled deck.

use crate::core::GameRng;

use super::card::{Card, Suit};

/// Source of cards for a challenge.
///
/// The combat core never owns hands; front-ends draw from a `CardSource`,
/// hand cards to the controller, and discard what was spent.
pub trait CardSource {
    /// Draw the top card, or `None` when nothing is left.
    fn draw(&mut self) -> Option<Card>;

    /// Return a spent card.
    fn discard(&mut self, card: Card);

    /// The designated zero-value wildcard.
    fn wildcard(&self) -> Card {
        Card::fool()
    }

    /// Draw up to `count` cards.
    fn draw_many(&mut self, count: usize) -> Vec<Card> {
        let mut drawn = Vec::with_capacity(count);
        for _ in 0..count {
            match self.draw() {
                Some(card) => drawn.push(card),
                None => break,
            }
        }
        drawn
    }
}

/// A shuffled tarot deck: the 52 minor cards plus The Fool.
///
/// When the draw pile runs out the discard pile is reshuffled into it.
///
/// ```
/// use tarot_tactics::cards::{CardSource, Deck};
/// use tarot_tactics::core::GameRng;
///
/// let mut deck = Deck::standard(GameRng::new(42));
/// assert_eq!(deck.remaining(), 53);
///
/// let hand = deck.draw_many(5);
/// assert_eq!(hand.len(), 5);
/// assert_eq!(deck.remaining(), 48);
/// ```
#[derive(Clone, Debug)]
pub struct Deck {
    draw_pile: Vec<Card>,
    discard_pile: Vec<Card>,
    rng: GameRng,
}

impl Deck {
    /// Build and shuffle a standard deck.
    pub fn standard(mut rng: GameRng) -> Self {
        let mut draw_pile: Vec<Card> = Suit::MINOR
            .iter()
            .flat_map(|&suit| (Card::ACE..=Card::KING).map(move |rank| Card::new(suit, rank)))
            .collect();
        draw_pile.push(Card::fool());
        rng.shuffle(&mut draw_pile);

        Self {
            draw_pile,
            discard_pile: Vec::new(),
            rng,
        }
    }

    /// Build an unshuffled deck from explicit cards. The last card is drawn first.
    pub fn from_cards(cards: Vec<Card>, rng: GameRng) -> Self {
        Self {
            draw_pile: cards,
            discard_pile: Vec::new(),
            rng,
        }
    }

    /// Cards left in the draw pile.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.draw_pile.len()
    }

    /// Cards in the discard pile.
    #[must_use]
    pub fn discarded(&self) -> usize {
        self.discard_pile.len()
    }

    fn reshuffle(&mut self) {
        self.draw_pile.append(&mut self.discard_pile);
        self.rng.shuffle(&mut self.draw_pile);
        tracing::debug!(cards = self.draw_pile.len(), "reshuffled discard pile into deck");
    }
}

impl CardSource for Deck {
    fn draw(&mut self) -> Option<Card> {
        if self.draw_pile.is_empty() && !self.discard_pile.is_empty() {
            self.reshuffle();
        }
        self.draw_pile.pop()
    }

    fn discard(&mut self, card: Card) {
        self.discard_pile.push(card);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_deck_contents() {
        let mut deck = Deck::standard(GameRng::new(1));
        let cards = deck.draw_many(100);

        assert_eq!(cards.len(), 53);
        assert_eq!(cards.iter().filter(|c| c.is_wildcard()).count(), 1);
        for suit in Suit::MINOR {
            assert_eq!(cards.iter().filter(|c| c.suit == suit).count(), 13);
        }
    }

    #[test]
    fn test_same_seed_same_order() {
        let a = Deck::standard(GameRng::new(77)).draw_many(10);
        let b = Deck::standard(GameRng::new(77)).draw_many(10);
        assert_eq!(a, b);
    }

    #[test]
    fn test_reshuffle_discards() {
        let mut deck = Deck::from_cards(vec![Card::new(Suit::Cups, 3)], GameRng::new(0));
        let card = deck.draw().unwrap();
        assert!(deck.draw().is_none());

        deck.discard(card);
        assert_eq!(deck.discarded(), 1);
        assert_eq!(deck.draw(), Some(card));
        assert_eq!(deck.discarded(), 0);
    }

    #[test]
    fn test_wildcard() {
        let deck = Deck::standard(GameRng::new(3));
        assert_eq!(deck.wildcard(), Card::fool());
    }
}
