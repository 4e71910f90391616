//! Tarot cards: suits, ranks and face values.

use serde::{Deserialize, Serialize};

/// A tarot suit.
///
/// The four minor suits each map to one attribute and one action family.
/// `Major` is the catch-all suit of the trump cards; The Fool belongs to it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Suit {
    /// Might. Attacks.
    Swords,
    /// Cunning. Battlefield control and movement.
    Wands,
    /// Heart. Defense and support.
    Cups,
    /// Lore. Utility and magic.
    Pentacles,
    /// Trumps. No attribute of its own.
    Major,
}

impl Suit {
    /// The four suits that carry an attribute, in deck order.
    pub const MINOR: [Suit; 4] = [Suit::Swords, Suit::Wands, Suit::Cups, Suit::Pentacles];

    /// The suit a target defends with against an action of this suit.
    ///
    /// `Major` has no opposite and returns itself.
    #[must_use]
    pub const fn opposing(self) -> Suit {
        match self {
            Suit::Swords => Suit::Pentacles,
            Suit::Pentacles => Suit::Swords,
            Suit::Wands => Suit::Cups,
            Suit::Cups => Suit::Wands,
            Suit::Major => Suit::Major,
        }
    }

    /// Check if this is one of the four minor suits.
    #[must_use]
    pub const fn is_minor(self) -> bool {
        !matches!(self, Suit::Major)
    }
}

impl std::fmt::Display for Suit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Suit::Swords => "Swords",
            Suit::Wands => "Wands",
            Suit::Cups => "Cups",
            Suit::Pentacles => "Pentacles",
            Suit::Major => "Major Arcana",
        };
        f.write_str(name)
    }
}

/// A single card: suit plus rank.
///
/// Minor ranks run Ace (1) through 10, then Page (11), Queen (12) and
/// King (13). The face value of a card is its rank.
///
/// ```
/// use tarot_tactics::cards::{Card, Suit};
///
/// let king = Card::new(Suit::Swords, 13);
/// assert_eq!(king.value(), 13);
/// assert_eq!(king.to_string(), "King of Swords");
///
/// let fool = Card::fool();
/// assert!(fool.is_wildcard());
/// assert_eq!(fool.value(), 0);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Card {
    pub suit: Suit,
    pub rank: u8,
}

impl Card {
    pub const ACE: u8 = 1;
    pub const PAGE: u8 = 11;
    pub const QUEEN: u8 = 12;
    pub const KING: u8 = 13;

    /// Create a card.
    #[must_use]
    pub const fn new(suit: Suit, rank: u8) -> Self {
        Self { suit, rank }
    }

    /// The Fool: the zero-value wildcard.
    #[must_use]
    pub const fn fool() -> Self {
        Self {
            suit: Suit::Major,
            rank: 0,
        }
    }

    /// Face value used in tests and initiative.
    #[must_use]
    pub const fn value(self) -> i32 {
        self.rank as i32
    }

    /// Check if this is The Fool.
    #[must_use]
    pub const fn is_wildcard(self) -> bool {
        matches!(self.suit, Suit::Major) && self.rank == 0
    }

    /// Check if this is an Ace.
    #[must_use]
    pub const fn is_ace(self) -> bool {
        self.suit.is_minor() && self.rank == Self::ACE
    }
}

impl std::fmt::Display for Card {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_wildcard() {
            return f.write_str("The Fool");
        }
        if self.suit == Suit::Major {
            return write!(f, "Trump {}", self.rank);
        }
        match self.rank {
            Self::ACE => write!(f, "Ace of {}", self.suit),
            Self::PAGE => write!(f, "Page of {}", self.suit),
            Self::QUEEN => write!(f, "Queen of {}", self.suit),
            Self::KING => write!(f, "King of {}", self.suit),
            n => write!(f, "{} of {}", n, self.suit),
        }
    }
}
