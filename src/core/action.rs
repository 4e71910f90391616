//! Action requests: who acts, with which card, doing what.
//!
//! The declared action is independent of the card's suit on a primary turn:
//! any card can fuel any action. Each action family still has a home suit,
//! which matters in the minor-action window where the two must agree.
//!
//! ```
//! use tarot_tactics::cards::{Card, Suit};
//! use tarot_tactics::core::{ActionKind, ActionRequest, CombatantId, Weapon, WeaponClass};
//!
//! let strike = ActionRequest::new(
//!     CombatantId(1),
//!     Card::new(Suit::Cups, 9),
//!     ActionKind::melee(CombatantId(2)),
//! )
//! .unwrap()
//! .with_weapon(Weapon::new("Maul", WeaponClass::Blunt));
//!
//! assert_eq!(strike.kind.suit(), Suit::Swords);
//! assert_eq!(strike.kind.target(), Some(CombatantId(2)));
//!
//! // Hostile actions cannot target the actor.
//! assert!(ActionRequest::new(CombatantId(1), Card::fool(), ActionKind::melee(CombatantId(1))).is_err());
//! ```

use serde::{Deserialize, Serialize};

use super::entity::CombatantId;
use super::error::RequestError;
use crate::cards::{Card, Suit};
use crate::zones::ZoneId;

/// Weapon families with distinct traits.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeaponClass {
    /// Swords and knives: an extra wound on a great success.
    Blade,
    /// Maces and hammers: doubled wounds on a crushing margin.
    Blunt,
    /// Spears and rapiers: ignores armor on a great success or a helpless target.
    Piercing,
    /// Cleaves into a second foe after felling the first.
    Axe,
    /// Ranged. Critical wound on a great success.
    Bow,
}

impl WeaponClass {
    #[must_use]
    pub const fn is_ranged(self) -> bool {
        matches!(self, WeaponClass::Bow)
    }
}

/// An equipped weapon.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Weapon {
    pub name: String,
    pub class: WeaponClass,
}

impl Weapon {
    pub fn new(name: impl Into<String>, class: WeaponClass) -> Self {
        Self {
            name: name.into(),
            class,
        }
    }

    #[must_use]
    pub fn is_ranged(&self) -> bool {
        self.class.is_ranged()
    }
}

/// How an attack is delivered.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttackStyle {
    Melee,
    Ranged,
    /// An elite's signature move: melee reach, critical wound.
    Special,
}

/// Battlefield-control maneuvers.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Maneuver {
    Trip,
    Disarm,
    Grapple,
    Displace { destination: ZoneId },
}

/// Defense and support actions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Support {
    Defend,
    Dodge,
    Riposte,
    Heal { target: CombatantId },
    Aid { target: CombatantId },
}

/// Utility and magic actions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Utility {
    Banter { target: CombatantId },
    Cast { target: CombatantId },
    Intimidate { target: CombatantId },
    Recover,
}

/// The declared action.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    Attack { target: CombatantId, style: AttackStyle },
    Control { target: CombatantId, maneuver: Maneuver },
    Support(Support),
    Utility(Utility),
    /// Walk into an adjacent zone, suffering parting blows if engaged.
    Move { destination: ZoneId },
    /// Slip away from melee into an adjacent zone without parting blows.
    Avoid { destination: ZoneId },
}

impl ActionKind {
    pub fn melee(target: CombatantId) -> Self {
        ActionKind::Attack {
            target,
            style: AttackStyle::Melee,
        }
    }

    pub fn ranged(target: CombatantId) -> Self {
        ActionKind::Attack {
            target,
            style: AttackStyle::Ranged,
        }
    }

    pub fn special(target: CombatantId) -> Self {
        ActionKind::Attack {
            target,
            style: AttackStyle::Special,
        }
    }

    pub fn move_to(destination: impl Into<ZoneId>) -> Self {
        ActionKind::Move {
            destination: destination.into(),
        }
    }

    pub fn avoid(destination: impl Into<ZoneId>) -> Self {
        ActionKind::Avoid {
            destination: destination.into(),
        }
    }

    /// Home suit of the action family.
    #[must_use]
    pub fn suit(&self) -> Suit {
        match self {
            ActionKind::Attack { .. } => Suit::Swords,
            ActionKind::Control { .. } | ActionKind::Move { .. } | ActionKind::Avoid { .. } => Suit::Wands,
            ActionKind::Support(_) => Suit::Cups,
            ActionKind::Utility(_) => Suit::Pentacles,
        }
    }

    /// The combatant this action is aimed at, if any.
    #[must_use]
    pub fn target(&self) -> Option<CombatantId> {
        match self {
            ActionKind::Attack { target, .. } | ActionKind::Control { target, .. } => Some(*target),
            ActionKind::Support(Support::Heal { target } | Support::Aid { target }) => Some(*target),
            ActionKind::Utility(
                Utility::Banter { target } | Utility::Cast { target } | Utility::Intimidate { target },
            ) => Some(*target),
            ActionKind::Support(Support::Defend | Support::Dodge | Support::Riposte)
            | ActionKind::Utility(Utility::Recover)
            | ActionKind::Move { .. }
            | ActionKind::Avoid { .. } => None,
        }
    }

    /// Zone the action names, if any.
    #[must_use]
    pub fn destination(&self) -> Option<&ZoneId> {
        match self {
            ActionKind::Move { destination } | ActionKind::Avoid { destination } => Some(destination),
            ActionKind::Control {
                maneuver: Maneuver::Displace { destination },
                ..
            } => Some(destination),
            _ => None,
        }
    }

    /// Check if this action may target the actor itself.
    #[must_use]
    pub fn allows_self_target(&self) -> bool {
        matches!(self, ActionKind::Support(Support::Heal { .. }))
    }

    /// Short verb for descriptions and logs.
    #[must_use]
    pub fn verb(&self) -> &'static str {
        match self {
            ActionKind::Attack { style: AttackStyle::Melee, .. } => "strikes at",
            ActionKind::Attack { style: AttackStyle::Ranged, .. } => "shoots at",
            ActionKind::Attack { style: AttackStyle::Special, .. } => "unleashes a signature move on",
            ActionKind::Control { maneuver: Maneuver::Trip, .. } => "tries to trip",
            ActionKind::Control { maneuver: Maneuver::Disarm, .. } => "tries to disarm",
            ActionKind::Control { maneuver: Maneuver::Grapple, .. } => "grapples",
            ActionKind::Control { maneuver: Maneuver::Displace { .. }, .. } => "shoves",
            ActionKind::Support(Support::Defend) => "takes a defensive stance",
            ActionKind::Support(Support::Dodge) => "readies a dodge",
            ActionKind::Support(Support::Riposte) => "readies a riposte",
            ActionKind::Support(Support::Heal { .. }) => "tends to",
            ActionKind::Support(Support::Aid { .. }) => "aids",
            ActionKind::Utility(Utility::Banter { .. }) => "taunts",
            ActionKind::Utility(Utility::Cast { .. }) => "casts at",
            ActionKind::Utility(Utility::Intimidate { .. }) => "intimidates",
            ActionKind::Utility(Utility::Recover) => "recovers",
            ActionKind::Move { .. } => "moves to",
            ActionKind::Avoid { .. } => "slips away to",
        }
    }
}

/// A validated action request.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActionRequest {
    pub actor: CombatantId,
    pub card: Card,
    pub kind: ActionKind,
    pub weapon: Option<Weapon>,
}

impl ActionRequest {
    /// Build a request, rejecting self-targeted hostile or aid actions.
    pub fn new(actor: CombatantId, card: Card, kind: ActionKind) -> Result<Self, RequestError> {
        if kind.target() == Some(actor) && !kind.allows_self_target() {
            return Err(RequestError::SelfTarget(actor));
        }
        Ok(Self {
            actor,
            card,
            kind,
            weapon: None,
        })
    }

    /// Attach the equipped weapon (builder pattern).
    #[must_use]
    pub fn with_weapon(mut self, weapon: Weapon) -> Self {
        self.weapon = Some(weapon);
        self
    }

    /// Attach an optional weapon (builder pattern).
    #[must_use]
    pub fn with_optional_weapon(mut self, weapon: Option<Weapon>) -> Self {
        self.weapon = weapon;
        self
    }
}
