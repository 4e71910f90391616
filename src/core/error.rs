//! Error taxonomy.
//!
//! - [`RequestError`]: a request that is malformed on its own (caught at
//!   construction).
//! - [`ResolveError`]: an invariant violation detected by the resolver, such
//!   as an id the provider does not know. Fatal to the call, never to the
//!   session.
//! - [`ControllerError`]: sequencing errors (wrong phase, wrong actor,
//!   duplicate submission) plus wrapped resolver rejections.
//!
//! Resource failures (no ammunition, target out of reach) are not errors:
//! they come back as a failed [`ActionResult`](crate::resolver::ActionResult).

use thiserror::Error;

use super::entity::CombatantId;
use crate::cards::Suit;
use crate::turn::Phase;
use crate::zones::ZoneId;

/// A request rejected at construction.
#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub enum RequestError {
    #[error("{0} cannot target itself with this action")]
    SelfTarget(CombatantId),
}

/// An invariant violation detected during resolution.
#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub enum ResolveError {
    #[error("unknown combatant: {0}")]
    UnknownCombatant(CombatantId),

    #[error("unknown zone: {0}")]
    UnknownZone(ZoneId),

    #[error("{0} is defeated and cannot act")]
    ActorDefeated(CombatantId),

    #[error("{0} cannot engage itself")]
    SelfEngagement(CombatantId),
}

/// A rejected controller call. State is unchanged.
#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub enum ControllerError {
    #[error("a challenge is already in progress")]
    ChallengeInProgress,

    #[error("no challenge is in progress")]
    NoChallenge,

    #[error("cannot start a challenge with an empty roster")]
    EmptyRoster,

    #[error("unknown combatant: {0}")]
    UnknownCombatant(CombatantId),

    #[error("unknown zone: {0}")]
    UnknownZone(ZoneId),

    #[error("{0} is not part of this challenge")]
    NotInChallenge(CombatantId),

    #[error("{0} is defeated")]
    NotLiving(CombatantId),

    #[error("initiative can only be submitted before the round (phase is {0:?})")]
    NotInPreRound(Phase),

    #[error("{0} already submitted initiative this round")]
    AlreadySubmitted(CombatantId),

    #[error("no action is awaited (phase is {0:?})")]
    NotAwaitingAction(Phase),

    #[error("{0} is not the active combatant")]
    NotActiveCombatant(CombatantId),

    #[error("no presentation is pending (phase is {0:?})")]
    NotInVisualSync(Phase),

    #[error("the minor action window is not open (phase is {0:?})")]
    NotInMinorWindow(Phase),

    #[error("{0} has already used its minor action this round")]
    MinorAlreadyUsed(CombatantId),

    #[error("a {card:?} card cannot fuel a {action:?} minor action")]
    SuitMismatch { card: Suit, action: Suit },

    #[error(transparent)]
    Resolve(#[from] ResolveError),
}

/// Result alias for controller calls.
pub type Result<T> = std::result::Result<T, ControllerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        let err = ControllerError::AlreadySubmitted(CombatantId(2));
        assert_eq!(err.to_string(), "Combatant(2) already submitted initiative this round");

        let err = ControllerError::from(ResolveError::UnknownCombatant(CombatantId(9)));
        assert_eq!(err.to_string(), "unknown combatant: Combatant(9)");
    }
}
