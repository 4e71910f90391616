//! Turn control.
//!
//! A challenge runs in rounds. Each round every living combatant commits an
//! initiative card, then a counter climbs from 1 to the deck ceiling and
//! each combatant acts when the count reaches its card's value (players
//! first on ties). After every primary action the presentation layer
//! reports back, a minor-action window opens, and queued minors resolve in
//! declaration order before the count resumes.
//!
//! ## Phases
//!
//! ```text
//! Idle → Starting → PreRound → CountUp → AwaitingAction → Resolving
//!      → VisualSync → MinorWindow → (CountUp | PreRound) … → Ending → Idle
//! ```

mod controller;
mod minor;
mod phase;

pub use controller::TurnController;
pub use minor::MinorQueue;
pub use phase::{ChallengeKind, ChallengeSummary, InitiativeSlot, Outcome, Phase};
