//! Encounter zones.
//!
//! Zones are **encounter-configured**: each challenge brings its own
//! [`ZoneMap`] of named zones and the links between them. Combatants in the
//! same zone can reach each other in melee; moving between linked zones may
//! provoke parting blows.

pub mod map;

pub use map::{ZoneId, ZoneMap};
