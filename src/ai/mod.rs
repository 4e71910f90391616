//! Opponent AI.
//!
//! Non-player combatants pick initiative cards and primary actions through
//! an [`OpponentPolicy`]. The stock [`TacticalPolicy`] keys its behavior
//! off each combatant's [`Archetype`](crate::combatant::Archetype).

mod policy;

pub use policy::{Decision, OpponentPolicy, PolicyContext, TacticalPolicy};
