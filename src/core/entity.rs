//! Combatant identification.
//!
//! Every participant in a challenge (hero, henchman, monster) is referenced
//! by a `CombatantId`. The core never owns combatants directly; it looks
//! them up through a [`CombatantProvider`](crate::combatant::CombatantProvider).
//!
//! ```
//! use tarot_tactics::core::CombatantId;
//!
//! let hero = CombatantId::new(1);
//! assert_eq!(hero.raw(), 1);
//! assert_eq!(format!("{hero}"), "Combatant(1)");
//! ```

use serde::{Deserialize, Serialize};

/// Unique identifier for a combatant.
///
/// Ordered so that tables keyed by combatant iterate deterministically.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CombatantId(pub u32);

impl CombatantId {
    /// Create a new combatant ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl From<u32> for CombatantId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for CombatantId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Combatant({})", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordering() {
        let mut ids = vec![CombatantId(3), CombatantId(1), CombatantId(2)];
        ids.sort();
        assert_eq!(ids, vec![CombatantId(1), CombatantId(2), CombatantId(3)]);
    }

    #[test]
    fn test_from_u32() {
        assert_eq!(CombatantId::from(7), CombatantId::new(7));
    }

    #[test]
    fn test_serialization() {
        let id = CombatantId(123);
        let json = serde_json::to_string(&id).unwrap();
        let deserialized: CombatantId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, deserialized);
    }
}
