//! Action resolution.
//!
//! Turns a played card plus an intended action into mechanical outcomes:
//! a test against a difficulty, family-specific effects, wounds through
//! each target's pipeline, and changes to the engagement relation.
//!
//! ```
//! use tarot_tactics::cards::{Card, Suit};
//! use tarot_tactics::combatant::{Combatant, CombatantProvider, Roster, Side, WoundTag};
//! use tarot_tactics::core::{ActionKind, ActionRequest, CombatantId, RulesConfig};
//! use tarot_tactics::events::EventLog;
//! use tarot_tactics::resolver::{ActionResolver, ResolveContext};
//! use tarot_tactics::zones::ZoneMap;
//!
//! let hero = CombatantId(1);
//! let imp = CombatantId(2);
//! let mut roster = Roster::new()
//!     .with(Combatant::new(hero, "Ada", Side::Player, "hall").with_attribute(Suit::Swords, 2))
//!     .with(Combatant::new(imp, "Imp", Side::Opponent, "hall"));
//! let zones = ZoneMap::new().with_zone("hall");
//! let mut events = EventLog::new();
//!
//! let mut resolver = ActionResolver::new(RulesConfig::default());
//! let mut ctx = ResolveContext::new(&mut roster, &zones, &mut events);
//! let strike = ActionRequest::new(hero, Card::new(Suit::Swords, 8), ActionKind::melee(imp)).unwrap();
//! let result = resolver.resolve(&strike, &mut ctx).unwrap();
//!
//! assert!(result.success);
//! assert_eq!(events.wounds_on(imp), vec![WoundTag::Staggered]);
//! assert!(resolver.engagement().are_engaged(hero, imp));
//! ```

mod aid;
mod engagement;
mod engine;
mod result;

pub use aid::{AidBank, BankedAid};
pub use engagement::EngagementTable;
pub use engine::{effective_defense, opposed_difficulty, ActionResolver, ResolveContext};
pub use result::{ActionResult, EffectTag, WoundRecord};
