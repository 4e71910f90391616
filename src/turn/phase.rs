//! Session vocabulary: phases, initiative slots and challenge outcomes.

use serde::{Deserialize, Serialize};

use crate::cards::Card;
use crate::core::CombatantId;

/// Where the turn controller is in its cycle.
///
/// `Starting`, `CountUp`, `Resolving` and `Ending` are transient: they are
/// entered and left inside a single controller call. A caller only ever
/// observes the resting phases.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    #[default]
    Idle,
    Starting,
    /// Waiting for every living combatant to commit an initiative card.
    PreRound,
    CountUp,
    /// Waiting for the active combatant's primary action.
    AwaitingAction,
    Resolving,
    /// Waiting for the presentation layer to finish showing a result.
    VisualSync,
    /// Accepting minor-action declarations.
    MinorWindow,
    Ending,
}

impl Phase {
    /// Check if the controller can rest in this phase between calls.
    #[must_use]
    pub const fn is_resting(self) -> bool {
        matches!(
            self,
            Phase::Idle | Phase::PreRound | Phase::AwaitingAction | Phase::VisualSync | Phase::MinorWindow
        )
    }
}

/// Flavor of encounter. Carried through events for the presentation layer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChallengeKind {
    #[default]
    Skirmish,
    Ambush,
    BossFight,
}

/// A combatant's committed initiative card for the round.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InitiativeSlot {
    pub card: Card,
    pub revealed: bool,
}

impl InitiativeSlot {
    #[must_use]
    pub const fn new(card: Card) -> Self {
        Self { card, revealed: false }
    }

    /// The count at which this slot acts. The wildcard acts first.
    #[must_use]
    pub fn count(&self, max_rank: u8) -> u8 {
        if self.card.is_wildcard() {
            1
        } else {
            self.card.rank.clamp(1, max_rank)
        }
    }
}

/// How a challenge ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Victory,
    Defeat,
    /// Ended from outside before either side fell.
    Abandoned,
}

/// Final report of a challenge.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChallengeSummary {
    pub outcome: Outcome,
    /// Rounds started, including the one in progress when it ended.
    pub rounds: u32,
    pub survivors: Vec<CombatantId>,
    pub fallen: Vec<CombatantId>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::Suit;

    #[test]
    fn test_resting_phases() {
        assert!(Phase::PreRound.is_resting());
        assert!(Phase::VisualSync.is_resting());
        assert!(!Phase::CountUp.is_resting());
        assert!(!Phase::Resolving.is_resting());
    }

    #[test]
    fn test_slot_count() {
        assert_eq!(InitiativeSlot::new(Card::fool()).count(13), 1);
        assert_eq!(InitiativeSlot::new(Card::new(Suit::Cups, 7)).count(13), 7);
        assert_eq!(InitiativeSlot::new(Card::new(Suit::Cups, 13)).count(10), 10);
    }

    #[test]
    fn test_summary_serialization() {
        let summary = ChallengeSummary {
            outcome: Outcome::Victory,
            rounds: 3,
            survivors: vec![CombatantId(1)],
            fallen: vec![CombatantId(2)],
        };
        let json = serde_json::to_string(&summary).unwrap();
        assert!(json.contains("victory"));
        let deserialized: ChallengeSummary = serde_json::from_str(&json).unwrap();
        assert_eq!(summary, deserialized);
    }
}
