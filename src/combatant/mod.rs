//! Combatant model: attributes, conditions, layered defenses and lookup.

pub mod conditions;
pub mod model;
pub mod provider;
pub mod wounds;

pub use conditions::{Condition, Conditions};
pub use model::{Archetype, Attributes, Combatant, DefenseKind, PendingDefense, Side};
pub use provider::{CombatantProvider, Roster};
pub use wounds::{DamageClass, WoundTag};
