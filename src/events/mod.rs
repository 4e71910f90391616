//! Outbound notifications.
//!
//! The core reports everything that happens through an [`EventSink`]
//! injected at construction; presentation, sound and AI layers subscribe by
//! implementing it. There is no process-wide bus.
//!
//! ```
//! use tarot_tactics::events::{CombatEvent, EventLog, EventSink};
//!
//! let mut log = EventLog::new();
//! log.emit(CombatEvent::RoundStarted { round: 1 });
//! log.emit(CombatEvent::CountTick { count: 1 });
//!
//! assert_eq!(log.len(), 2);
//! assert_eq!(log.count_ticks(), vec![1]);
//! ```

use serde::{Deserialize, Serialize};

use crate::cards::Card;
use crate::combatant::WoundTag;
use crate::core::{ActionRequest, CombatantId};
use crate::resolver::ActionResult;
use crate::turn::{ChallengeKind, ChallengeSummary};

/// Something that happened in a challenge.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CombatEvent {
    ChallengeStarted {
        kind: ChallengeKind,
        roster: Vec<CombatantId>,
    },
    RoundStarted {
        round: u32,
    },
    CountTick {
        count: u8,
    },
    TurnStarted {
        combatant: CombatantId,
        initiative: Card,
    },
    ActionResolved {
        request: ActionRequest,
        result: ActionResult,
    },
    WoundApplied {
        target: CombatantId,
        tag: WoundTag,
    },
    EngagementFormed {
        a: CombatantId,
        b: CombatantId,
    },
    EngagementBroken {
        a: CombatantId,
        b: CombatantId,
    },
    MinorWindowOpened {
        eligible: Vec<CombatantId>,
    },
    MinorDeclared {
        request: ActionRequest,
    },
    ChallengeEnded {
        summary: ChallengeSummary,
    },
}

/// Receiver of combat events.
pub trait EventSink {
    fn emit(&mut self, event: CombatEvent);
}

impl EventSink for Vec<CombatEvent> {
    fn emit(&mut self, event: CombatEvent) {
        self.push(event);
    }
}

/// Sink that drops every event.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSink;

impl EventSink for NullSink {
    fn emit(&mut self, _event: CombatEvent) {}
}

/// Recording sink with query helpers, handy for tests and replays.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct EventLog {
    events: Vec<CombatEvent>,
}

impl EventLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn events(&self) -> &[CombatEvent] {
        &self.events
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Remove and return everything recorded so far.
    pub fn drain(&mut self) -> Vec<CombatEvent> {
        std::mem::take(&mut self.events)
    }

    /// Counts announced by `CountTick`, in order.
    #[must_use]
    pub fn count_ticks(&self) -> Vec<u8> {
        self.events
            .iter()
            .filter_map(|e| match e {
                CombatEvent::CountTick { count } => Some(*count),
                _ => None,
            })
            .collect()
    }

    /// Combatants whose turns started, in order.
    #[must_use]
    pub fn turns_started(&self) -> Vec<CombatantId> {
        self.events
            .iter()
            .filter_map(|e| match e {
                CombatEvent::TurnStarted { combatant, .. } => Some(*combatant),
                _ => None,
            })
            .collect()
    }

    /// Wounds applied to one combatant, in order.
    #[must_use]
    pub fn wounds_on(&self, target: CombatantId) -> Vec<WoundTag> {
        self.events
            .iter()
            .filter_map(|e| match e {
                CombatEvent::WoundApplied { target: t, tag } if *t == target => Some(*tag),
                _ => None,
            })
            .collect()
    }

    /// Actors of resolved actions, in resolution order.
    #[must_use]
    pub fn resolved_actors(&self) -> Vec<CombatantId> {
        self.events
            .iter()
            .filter_map(|e| match e {
                CombatEvent::ActionResolved { request, .. } => Some(request.actor),
                _ => None,
            })
            .collect()
    }
}

impl EventSink for EventLog {
    fn emit(&mut self, event: CombatEvent) {
        self.events.push(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec_sink() {
        let mut sink: Vec<CombatEvent> = Vec::new();
        sink.emit(CombatEvent::CountTick { count: 4 });
        assert_eq!(sink, vec![CombatEvent::CountTick { count: 4 }]);
    }

    #[test]
    fn test_wound_query() {
        let mut log = EventLog::new();
        log.emit(CombatEvent::WoundApplied { target: CombatantId(1), tag: WoundTag::Armor });
        log.emit(CombatEvent::WoundApplied { target: CombatantId(2), tag: WoundTag::Dead });
        log.emit(CombatEvent::WoundApplied { target: CombatantId(1), tag: WoundTag::Staggered });

        assert_eq!(log.wounds_on(CombatantId(1)), vec![WoundTag::Armor, WoundTag::Staggered]);
    }

    #[test]
    fn test_drain() {
        let mut log = EventLog::new();
        log.emit(CombatEvent::RoundStarted { round: 2 });
        assert_eq!(log.drain().len(), 1);
        assert!(log.is_empty());
    }

    #[test]
    fn test_event_serialization() {
        let event = CombatEvent::EngagementFormed { a: CombatantId(1), b: CombatantId(2) };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("engagement_formed"));
        let deserialized: CombatEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(event, deserialized);
    }
}
