//! Combatant lookup.
//!
//! The core does not own combatant lifecycles. It reaches combatants
//! through a [`CombatantProvider`] handed to the controller at construction;
//! [`Roster`] is the in-memory implementation most front-ends use.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use super::model::Combatant;
use crate::core::CombatantId;

/// Access to the combatants of an encounter.
pub trait CombatantProvider {
    /// Look up a combatant.
    fn get(&self, id: CombatantId) -> Option<&Combatant>;

    /// Look up a combatant for mutation.
    fn get_mut(&mut self, id: CombatantId) -> Option<&mut Combatant>;

    /// All known ids, in a stable order.
    fn ids(&self) -> Vec<CombatantId>;

    /// Check if an id is known.
    fn contains(&self, id: CombatantId) -> bool {
        self.get(id).is_some()
    }
}

/// In-memory combatant store preserving insertion order.
///
/// ```
/// use tarot_tactics::combatant::{Combatant, CombatantProvider, Roster, Side};
/// use tarot_tactics::core::CombatantId;
///
/// let mut roster = Roster::new();
/// roster.insert(Combatant::new(CombatantId(1), "Ada", Side::Player, "hall"));
/// roster.insert(Combatant::new(CombatantId(2), "Imp", Side::Opponent, "hall"));
///
/// assert_eq!(roster.ids(), vec![CombatantId(1), CombatantId(2)]);
/// assert_eq!(roster.get(CombatantId(2)).map(|c| c.name.as_str()), Some("Imp"));
/// ```
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Roster {
    members: FxHashMap<CombatantId, Combatant>,
    order: Vec<CombatantId>,
}

impl Roster {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a combatant. Replacing keeps the original position.
    pub fn insert(&mut self, combatant: Combatant) {
        let id = combatant.id;
        if self.members.insert(id, combatant).is_none() {
            self.order.push(id);
        }
    }

    /// Add a combatant (builder pattern).
    #[must_use]
    pub fn with(mut self, combatant: Combatant) -> Self {
        self.insert(combatant);
        self
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Iterate in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Combatant> {
        self.order.iter().filter_map(|id| self.members.get(id))
    }
}

impl CombatantProvider for Roster {
    fn get(&self, id: CombatantId) -> Option<&Combatant> {
        self.members.get(&id)
    }

    fn get_mut(&mut self, id: CombatantId) -> Option<&mut Combatant> {
        self.members.get_mut(&id)
    }

    fn ids(&self) -> Vec<CombatantId> {
        self.order.clone()
    }
}
