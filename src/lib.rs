//! # tarot-tactics
//!
//! Tactical combat core for a tarot-card dungeon crawler.
//!
//! ## Design Principles
//!
//! 1. **Cards drive everything**: a played card's suit picks the attribute
//!    it tests, its rank sets both initiative and test value.
//!
//! 2. **Injected collaborators**: combatant lookup ([`CombatantProvider`]),
//!    event delivery ([`EventSink`]) and card supply ([`CardSource`]) are
//!    traits handed in by the caller. There are no global singletons.
//!
//! 3. **Explicit suspension**: the controller parks in a resting phase until
//!    the caller reports input or presentation completion. Nothing blocks.
//!
//! ## Architecture
//!
//! - **Turn Controller**: rounds, initiative, count-up, primary turns and
//!   the FIFO minor-action window.
//!
//! - **Action Resolver**: card + attribute tests, action families, weapon
//!   traits, the wound pipeline and the symmetric engagement relation.
//!
//! - **Opponent Policy**: archetype-driven initiative and action selection.
//!
//! ## Modules
//!
//! - `core`: ids, rules configuration, RNG, action requests, errors
//! - `cards`: suits, cards, decks
//! - `zones`: encounter zone topology
//! - `combatant`: attributes, conditions, wounds, combatant lookup
//! - `events`: outbound notifications
//! - `resolver`: action resolution, engagement, banked aid
//! - `turn`: the turn controller
//! - `ai`: opponent policies

pub mod ai;
pub mod cards;
pub mod combatant;
pub mod core;
pub mod events;
pub mod resolver;
pub mod turn;
pub mod zones;

// Re-export commonly used types
pub use crate::core::{
    ActionKind, ActionRequest, AttackStyle, CombatantId, ControllerError, GameRng, GameRngState, Maneuver,
    RequestError, ResolveError, RulesConfig, Support, Utility, Weapon, WeaponClass,
};

pub use crate::cards::{Card, CardSource, Deck, Suit};

pub use crate::zones::{ZoneId, ZoneMap};

pub use crate::combatant::{
    Archetype, Attributes, Combatant, CombatantProvider, Condition, Conditions, DamageClass, DefenseKind,
    PendingDefense, Roster, Side, WoundTag,
};

pub use crate::events::{CombatEvent, EventLog, EventSink, NullSink};

pub use crate::resolver::{ActionResolver, ActionResult, AidBank, EffectTag, EngagementTable, ResolveContext};

pub use crate::turn::{ChallengeKind, ChallengeSummary, InitiativeSlot, Outcome, Phase, TurnController};

pub use crate::ai::{Decision, OpponentPolicy, PolicyContext, TacticalPolicy};
