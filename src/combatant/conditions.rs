//! Boolean combatant conditions stored as a compact bitset.

use serde::{Deserialize, Serialize};

/// A condition a combatant can be under.
///
/// The first five form the wound ladder; the rest are situational.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Condition {
    Stressed,
    Staggered,
    Injured,
    DeathsDoor,
    Dead,
    Rooted,
    Prone,
    Disarmed,
    Defending,
    Frightened,
}

impl Condition {
    /// Every condition, in declaration order.
    pub const ALL: [Condition; 10] = [
        Condition::Stressed,
        Condition::Staggered,
        Condition::Injured,
        Condition::DeathsDoor,
        Condition::Dead,
        Condition::Rooted,
        Condition::Prone,
        Condition::Disarmed,
        Condition::Defending,
        Condition::Frightened,
    ];

    /// Wound conditions below death, least to most severe.
    pub const WOUND_LADDER: [Condition; 3] =
        [Condition::Staggered, Condition::Injured, Condition::DeathsDoor];

    /// Conditions a "recover" action shakes off.
    pub const RECOVERABLE: [Condition; 4] = [
        Condition::Stressed,
        Condition::Frightened,
        Condition::Prone,
        Condition::Rooted,
    ];

    const fn bit(self) -> u16 {
        1 << (self as u16)
    }
}

/// Set of conditions.
///
/// ```
/// use tarot_tactics::combatant::{Condition, Conditions};
///
/// let mut conditions = Conditions::empty();
/// conditions.insert(Condition::Prone);
/// assert!(conditions.contains(Condition::Prone));
/// assert!(!conditions.contains(Condition::Dead));
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Conditions(u16);

impl Conditions {
    /// No conditions.
    #[must_use]
    pub const fn empty() -> Self {
        Self(0)
    }

    #[must_use]
    pub const fn contains(self, condition: Condition) -> bool {
        self.0 & condition.bit() != 0
    }

    /// Set a condition. Returns true if it was newly set.
    pub fn insert(&mut self, condition: Condition) -> bool {
        let fresh = !self.contains(condition);
        self.0 |= condition.bit();
        fresh
    }

    /// Clear a condition. Returns true if it was set.
    pub fn remove(&mut self, condition: Condition) -> bool {
        let was_set = self.contains(condition);
        self.0 &= !condition.bit();
        was_set
    }

    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Iterate over the set conditions in declaration order.
    pub fn iter(self) -> impl Iterator<Item = Condition> {
        Condition::ALL.into_iter().filter(move |c| self.contains(*c))
    }

    /// Number of wound-ladder steps taken (0..=3), ignoring death.
    #[must_use]
    pub fn wound_level(self) -> i32 {
        Condition::WOUND_LADDER
            .iter()
            .filter(|c| self.contains(**c))
            .count() as i32
    }
}

impl FromIterator<Condition> for Conditions {
    fn from_iter<I: IntoIterator<Item = Condition>>(iter: I) -> Self {
        let mut set = Conditions::empty();
        for condition in iter {
            set.insert(condition);
        }
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_remove() {
        let mut set = Conditions::empty();
        assert!(set.insert(Condition::Stressed));
        assert!(!set.insert(Condition::Stressed));
        assert!(set.remove(Condition::Stressed));
        assert!(!set.remove(Condition::Stressed));
        assert!(set.is_empty());
    }

    #[test]
    fn test_all_bits_distinct() {
        let set: Conditions = Condition::ALL.into_iter().collect();
        assert_eq!(set.iter().count(), Condition::ALL.len());
    }

    #[test]
    fn test_wound_level() {
        let set: Conditions = [Condition::Staggered, Condition::Injured, Condition::Prone]
            .into_iter()
            .collect();
        assert_eq!(set.wound_level(), 2);
    }

    #[test]
    fn test_serialization() {
        let json = serde_json::to_string(&Condition::DeathsDoor).unwrap();
        assert_eq!(json, "\"deaths_door\"");
    }
}
