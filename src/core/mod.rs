//! Core engine types: ids, configuration, RNG, action requests and errors.

pub mod action;
pub mod config;
pub mod entity;
pub mod error;
pub mod rng;

pub use action::{ActionKind, ActionRequest, AttackStyle, Maneuver, Support, Utility, Weapon, WeaponClass};
pub use config::RulesConfig;
pub use entity::CombatantId;
pub use error::{ControllerError, RequestError, ResolveError, Result};
pub use rng::{GameRng, GameRngState};
