//! The combatant model.
//!
//! A `Combatant` is built by the encounter layer before a challenge starts
//! and then mutated only by the resolver. Public mutators are builder-style
//! setup methods; runtime changes (conditions, zone, armor) go through
//! crate-internal methods so the wound ladder and engagement stay coherent.

use serde::{Deserialize, Serialize};

use super::conditions::{Condition, Conditions};
use crate::cards::{Card, Suit};
use crate::core::{CombatantId, Weapon};
use crate::zones::ZoneId;

/// Which side a combatant fights for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    /// Player-controlled.
    Player,
    /// Controlled by the opponent policy.
    Opponent,
}

impl Side {
    #[must_use]
    pub const fn is_player(self) -> bool {
        matches!(self, Side::Player)
    }

    /// The other side.
    #[must_use]
    pub const fn enemy(self) -> Side {
        match self {
            Side::Player => Side::Opponent,
            Side::Opponent => Side::Player,
        }
    }
}

/// Behavioral archetype, read by the opponent policy.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Archetype {
    #[default]
    Default,
    Aggressive,
    Defensive,
    Elite,
    Boss,
}

impl Archetype {
    /// Elite and boss combatants spend face cards on special abilities.
    #[must_use]
    pub const fn has_specials(self) -> bool {
        matches!(self, Archetype::Elite | Archetype::Boss)
    }
}

/// The four suit-bound attributes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Attributes {
    /// Swords.
    pub might: i32,
    /// Wands.
    pub cunning: i32,
    /// Cups.
    pub heart: i32,
    /// Pentacles.
    pub lore: i32,
}

impl Attributes {
    #[must_use]
    pub const fn new(might: i32, cunning: i32, heart: i32, lore: i32) -> Self {
        Self {
            might,
            cunning,
            heart,
            lore,
        }
    }

    /// The attribute bound to a suit. `Major` uses the strongest attribute.
    #[must_use]
    pub fn get(&self, suit: Suit) -> i32 {
        match suit {
            Suit::Swords => self.might,
            Suit::Wands => self.cunning,
            Suit::Cups => self.heart,
            Suit::Pentacles => self.lore,
            Suit::Major => self.strongest().1,
        }
    }

    pub fn set(&mut self, suit: Suit, value: i32) {
        match suit {
            Suit::Swords => self.might = value,
            Suit::Wands => self.cunning = value,
            Suit::Cups => self.heart = value,
            Suit::Pentacles => self.lore = value,
            Suit::Major => {}
        }
    }

    /// The most invested suit and its value. Ties go to deck order.
    #[must_use]
    pub fn strongest(&self) -> (Suit, i32) {
        let mut best = (Suit::Swords, self.might);
        for suit in [Suit::Wands, Suit::Cups, Suit::Pentacles] {
            let value = self.get(suit);
            if value > best.1 {
                best = (suit, value);
            }
        }
        best
    }
}

/// Kind of prepared reaction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DefenseKind {
    /// Adds the banked card value to the difficulty of the next attack.
    Dodge,
    /// Counter-attacks the next melee attacker.
    Riposte,
}

/// A prepared reaction with its banked card.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingDefense {
    pub kind: DefenseKind,
    pub card: Card,
    /// Weapon readied for a riposte.
    pub weapon: Option<Weapon>,
}

/// A participant in a challenge.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Combatant {
    pub id: CombatantId,
    pub name: String,
    pub side: Side,
    pub archetype: Archetype,
    attributes: Attributes,
    zone: ZoneId,
    conditions: Conditions,
    pub(crate) armor_notches: u8,
    talents: Vec<String>,
    talent_wound_slots: u8,
    pub(crate) talent_wounds: u8,
    pub(crate) ammunition: u32,
    pub(crate) pending_defense: Option<PendingDefense>,
    pub(crate) is_engaged: bool,
}

impl Combatant {
    /// Create a combatant with zeroed attributes and no defenses.
    pub fn new(id: CombatantId, name: impl Into<String>, side: Side, zone: impl Into<ZoneId>) -> Self {
        Self {
            id,
            name: name.into(),
            side,
            archetype: Archetype::Default,
            attributes: Attributes::default(),
            zone: zone.into(),
            conditions: Conditions::empty(),
            armor_notches: 0,
            talents: Vec::new(),
            talent_wound_slots: 0,
            talent_wounds: 0,
            ammunition: 0,
            pending_defense: None,
            is_engaged: false,
        }
    }

    // === Setup (builder pattern) ===

    #[must_use]
    pub fn with_archetype(mut self, archetype: Archetype) -> Self {
        self.archetype = archetype;
        self
    }

    #[must_use]
    pub fn with_attributes(mut self, attributes: Attributes) -> Self {
        self.attributes = attributes;
        self
    }

    #[must_use]
    pub fn with_attribute(mut self, suit: Suit, value: i32) -> Self {
        self.attributes.set(suit, value);
        self
    }

    #[must_use]
    pub fn with_armor(mut self, notches: u8) -> Self {
        self.armor_notches = notches;
        self
    }

    /// Set talents and the declared talent-wound capacity.
    #[must_use]
    pub fn with_talents<S: Into<String>>(mut self, talents: impl IntoIterator<Item = S>, wound_slots: u8) -> Self {
        self.talents = talents.into_iter().map(Into::into).collect();
        self.talent_wound_slots = wound_slots;
        self
    }

    #[must_use]
    pub fn with_ammunition(mut self, ammunition: u32) -> Self {
        self.ammunition = ammunition;
        self
    }

    /// Start the challenge under a condition (ambushed prone, already injured...).
    #[must_use]
    pub fn with_condition(mut self, condition: Condition) -> Self {
        self.conditions.insert(condition);
        self
    }

    // === Queries ===

    #[must_use]
    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    #[must_use]
    pub fn attribute(&self, suit: Suit) -> i32 {
        self.attributes.get(suit)
    }

    #[must_use]
    pub fn zone(&self) -> &ZoneId {
        &self.zone
    }

    #[must_use]
    pub fn conditions(&self) -> Conditions {
        self.conditions
    }

    #[must_use]
    pub fn has(&self, condition: Condition) -> bool {
        self.conditions.contains(condition)
    }

    #[must_use]
    pub fn is_dead(&self) -> bool {
        self.has(Condition::Dead)
    }

    #[must_use]
    pub fn is_alive(&self) -> bool {
        !self.is_dead()
    }

    #[must_use]
    pub fn armor_notches(&self) -> u8 {
        self.armor_notches
    }

    #[must_use]
    pub fn talents(&self) -> &[String] {
        &self.talents
    }

    /// Talent wounds this combatant can absorb in total: the declared
    /// capacity, bounded by the number of talents actually held.
    #[must_use]
    pub fn talent_wound_capacity(&self) -> u8 {
        let held = u8::try_from(self.talents.len()).unwrap_or(u8::MAX);
        self.talent_wound_slots.min(held)
    }

    #[must_use]
    pub fn talent_wounds(&self) -> u8 {
        self.talent_wounds
    }

    #[must_use]
    pub fn ammunition(&self) -> u32 {
        self.ammunition
    }

    #[must_use]
    pub fn pending_defense(&self) -> Option<&PendingDefense> {
        self.pending_defense.as_ref()
    }

    #[must_use]
    pub fn is_engaged(&self) -> bool {
        self.is_engaged
    }

    /// Check whether two combatants fight on opposite sides.
    #[must_use]
    pub fn is_hostile_to(&self, other: &Combatant) -> bool {
        self.side != other.side
    }

    // === Runtime mutation (resolver only) ===

    pub(crate) fn set_zone(&mut self, zone: ZoneId) {
        self.zone = zone;
    }

    pub(crate) fn set_condition(&mut self, condition: Condition) -> bool {
        self.conditions.insert(condition)
    }

    pub(crate) fn clear_condition(&mut self, condition: Condition) -> bool {
        self.conditions.remove(condition)
    }

    /// Heal up to `levels` steps of the wound ladder, most severe first.
    ///
    /// The dead stay dead. Returns the conditions removed.
    pub(crate) fn heal(&mut self, levels: usize) -> Vec<Condition> {
        if self.is_dead() {
            return Vec::new();
        }
        let mut healed = Vec::new();
        for condition in Condition::WOUND_LADDER.iter().rev() {
            if healed.len() >= levels {
                break;
            }
            if self.conditions.remove(*condition) {
                healed.push(*condition);
            }
        }
        healed
    }

    /// Spend one round of ammunition. Returns false when empty.
    pub(crate) fn spend_ammunition(&mut self) -> bool {
        if self.ammunition == 0 {
            return false;
        }
        self.ammunition -= 1;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hero() -> Combatant {
        Combatant::new(CombatantId(1), "Hero", Side::Player, "hall")
    }

    #[test]
    fn test_strongest_attribute() {
        let attrs = Attributes::new(1, 3, 3, 2);
        assert_eq!(attrs.strongest(), (Suit::Wands, 3));
        assert_eq!(attrs.get(Suit::Major), 3);
    }

    #[test]
    fn test_talent_capacity_bounded_by_talents() {
        let c = hero().with_talents(Vec::<String>::new(), 3);
        assert_eq!(c.talent_wound_capacity(), 0);

        let c = hero().with_talents(["Parry", "Grit"], 5);
        assert_eq!(c.talent_wound_capacity(), 2);

        let c = hero().with_talents(["Parry", "Grit", "Luck"], 1);
        assert_eq!(c.talent_wound_capacity(), 1);
    }

    #[test]
    fn test_heal_most_severe_first() {
        let mut c = hero()
            .with_condition(Condition::Staggered)
            .with_condition(Condition::Injured)
            .with_condition(Condition::DeathsDoor);

        assert_eq!(c.heal(1), vec![Condition::DeathsDoor]);
        assert_eq!(c.heal(5), vec![Condition::Injured, Condition::Staggered]);
        assert_eq!(c.conditions().wound_level(), 0);
    }

    #[test]
    fn test_heal_does_not_raise_dead() {
        let mut c = hero().with_condition(Condition::Dead).with_condition(Condition::Injured);
        assert!(c.heal(3).is_empty());
        assert!(c.is_dead());
    }

    #[test]
    fn test_ammunition() {
        let mut c = hero().with_ammunition(1);
        assert!(c.spend_ammunition());
        assert!(!c.spend_ammunition());
        assert_eq!(c.ammunition(), 0);
    }

    #[test]
    fn test_sides() {
        let foe = Combatant::new(CombatantId(2), "Ghoul", Side::Opponent, "hall");
        assert!(hero().is_hostile_to(&foe));
        assert_eq!(Side::Player.enemy(), Side::Opponent);
    }
}
