//! Melee engagement tracking.
//!
//! Engagement is a symmetric relation: every operation writes both
//! directions at once, and each combatant's `is_engaged` flag is recomputed
//! from the relation after every change. Uses `im` persistent maps so the
//! table clones in O(1) alongside a session snapshot.

use im::{OrdMap, OrdSet};
use serde::{Deserialize, Serialize};

use crate::combatant::CombatantProvider;
use crate::core::{CombatantId, ResolveError};
use crate::events::{CombatEvent, EventSink};

/// Symmetric "locked in melee" relation.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngagementTable {
    links: OrdMap<CombatantId, OrdSet<CombatantId>>,
}

impl EngagementTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if `a` and `b` are engaged with each other.
    #[must_use]
    pub fn are_engaged(&self, a: CombatantId, b: CombatantId) -> bool {
        self.links.get(&a).is_some_and(|set| set.contains(&b))
    }

    /// Everyone `id` is engaged with, in id order.
    #[must_use]
    pub fn engaged_with(&self, id: CombatantId) -> Vec<CombatantId> {
        self.links
            .get(&id)
            .map(|set| set.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Check if `id` is engaged with anyone.
    #[must_use]
    pub fn is_engaged(&self, id: CombatantId) -> bool {
        self.links.get(&id).is_some_and(|set| !set.is_empty())
    }

    /// Every engaged pair once, lower id first.
    #[must_use]
    pub fn pairs(&self) -> Vec<(CombatantId, CombatantId)> {
        self.links
            .iter()
            .flat_map(|(a, set)| set.iter().filter(move |b| a < *b).map(move |b| (*a, *b)))
            .collect()
    }

    /// Check that every entry has its mirror.
    #[must_use]
    pub fn is_symmetric(&self) -> bool {
        self.links
            .iter()
            .all(|(a, set)| set.iter().all(|b| self.are_engaged(*b, *a)))
    }

    /// Engage two combatants. Returns true if the pair is new.
    pub fn form(
        &mut self,
        a: CombatantId,
        b: CombatantId,
        combatants: &mut dyn CombatantProvider,
        events: &mut dyn EventSink,
    ) -> Result<bool, ResolveError> {
        if a == b {
            return Err(ResolveError::SelfEngagement(a));
        }
        for id in [a, b] {
            if !combatants.contains(id) {
                return Err(ResolveError::UnknownCombatant(id));
            }
        }
        if self.are_engaged(a, b) {
            return Ok(false);
        }

        self.link(a, b);
        self.link(b, a);
        self.sync_flag(a, combatants);
        self.sync_flag(b, combatants);

        tracing::debug!(%a, %b, "engagement formed");
        events.emit(CombatEvent::EngagementFormed { a, b });
        Ok(true)
    }

    /// Break one pairing. Returns true if the pair existed.
    pub fn break_pair(
        &mut self,
        a: CombatantId,
        b: CombatantId,
        combatants: &mut dyn CombatantProvider,
        events: &mut dyn EventSink,
    ) -> Result<bool, ResolveError> {
        for id in [a, b] {
            if !combatants.contains(id) {
                return Err(ResolveError::UnknownCombatant(id));
            }
        }
        if !self.are_engaged(a, b) {
            return Ok(false);
        }

        self.unlink(a, b);
        self.unlink(b, a);
        self.sync_flag(a, combatants);
        self.sync_flag(b, combatants);

        tracing::debug!(%a, %b, "engagement broken");
        events.emit(CombatEvent::EngagementBroken { a, b });
        Ok(true)
    }

    /// Break every pairing involving `id`. Returns the former partners.
    pub fn clear_all(
        &mut self,
        id: CombatantId,
        combatants: &mut dyn CombatantProvider,
        events: &mut dyn EventSink,
    ) -> Result<Vec<CombatantId>, ResolveError> {
        if !combatants.contains(id) {
            return Err(ResolveError::UnknownCombatant(id));
        }
        let partners = self.engaged_with(id);
        for partner in &partners {
            self.break_pair(id, *partner, combatants, events)?;
        }
        self.sync_flag(id, combatants);
        Ok(partners)
    }

    /// Forget everything (end of challenge). Flags are reset on known combatants.
    pub fn reset(&mut self, combatants: &mut dyn CombatantProvider) {
        for id in self.links.keys() {
            if let Some(c) = combatants.get_mut(*id) {
                c.is_engaged = false;
            }
        }
        self.links = OrdMap::new();
    }

    fn link(&mut self, from: CombatantId, to: CombatantId) {
        let mut set = self.links.get(&from).cloned().unwrap_or_default();
        set.insert(to);
        self.links.insert(from, set);
    }

    fn unlink(&mut self, from: CombatantId, to: CombatantId) {
        let emptied = match self.links.get_mut(&from) {
            Some(set) => {
                set.remove(&to);
                set.is_empty()
            }
            None => false,
        };
        if emptied {
            self.links.remove(&from);
        }
    }

    fn sync_flag(&self, id: CombatantId, combatants: &mut dyn CombatantProvider) {
        let engaged = self.is_engaged(id);
        if let Some(c) = combatants.get_mut(id) {
            c.is_engaged = engaged;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combatant::{Combatant, Roster, Side};
    use crate::events::EventLog;

    fn roster() -> Roster {
        Roster::new()
            .with(Combatant::new(CombatantId(1), "Ada", Side::Player, "hall"))
            .with(Combatant::new(CombatantId(2), "Imp", Side::Opponent, "hall"))
            .with(Combatant::new(CombatantId(3), "Rat", Side::Opponent, "hall"))
    }

    fn engaged(roster: &Roster, id: u32) -> bool {
        roster.get(CombatantId(id)).unwrap().is_engaged()
    }

    #[test]
    fn test_form_is_mutual() {
        let mut table = EngagementTable::new();
        let mut roster = roster();
        let mut log = EventLog::new();

        assert!(table.form(CombatantId(1), CombatantId(2), &mut roster, &mut log).unwrap());
        assert!(table.are_engaged(CombatantId(1), CombatantId(2)));
        assert!(table.are_engaged(CombatantId(2), CombatantId(1)));
        assert!(engaged(&roster, 1) && engaged(&roster, 2));
        assert!(!engaged(&roster, 3));

        // Forming again is a no-op without a second event.
        assert!(!table.form(CombatantId(2), CombatantId(1), &mut roster, &mut log).unwrap());
        assert_eq!(log.len(), 1);
    }

    #[test]
    fn test_break_recomputes_flags() {
        let mut table = EngagementTable::new();
        let mut roster = roster();
        let mut log = EventLog::new();

        table.form(CombatantId(1), CombatantId(2), &mut roster, &mut log).unwrap();
        table.form(CombatantId(1), CombatantId(3), &mut roster, &mut log).unwrap();
        table.break_pair(CombatantId(2), CombatantId(1), &mut roster, &mut log).unwrap();

        assert!(engaged(&roster, 1), "still engaged with 3");
        assert!(!engaged(&roster, 2));
        assert!(engaged(&roster, 3));
        assert!(table.is_symmetric());
    }

    #[test]
    fn test_round_trip_restores_flags() {
        let mut table = EngagementTable::new();
        let mut roster = roster();
        let mut log = EventLog::new();

        table.form(CombatantId(1), CombatantId(2), &mut roster, &mut log).unwrap();
        table.break_pair(CombatantId(1), CombatantId(2), &mut roster, &mut log).unwrap();

        assert!(!engaged(&roster, 1));
        assert!(!engaged(&roster, 2));
        assert!(table.pairs().is_empty());
    }

    #[test]
    fn test_clear_all() {
        let mut table = EngagementTable::new();
        let mut roster = roster();
        let mut log = EventLog::new();

        table.form(CombatantId(1), CombatantId(2), &mut roster, &mut log).unwrap();
        table.form(CombatantId(1), CombatantId(3), &mut roster, &mut log).unwrap();
        let partners = table.clear_all(CombatantId(1), &mut roster, &mut log).unwrap();

        assert_eq!(partners, vec![CombatantId(2), CombatantId(3)]);
        assert!(table.pairs().is_empty());
        assert!(!engaged(&roster, 1) && !engaged(&roster, 2) && !engaged(&roster, 3));
    }

    #[test]
    fn test_rejects_bad_ids() {
        let mut table = EngagementTable::new();
        let mut roster = roster();
        let mut log = EventLog::new();

        assert_eq!(
            table.form(CombatantId(1), CombatantId(1), &mut roster, &mut log),
            Err(ResolveError::SelfEngagement(CombatantId(1)))
        );
        assert_eq!(
            table.form(CombatantId(1), CombatantId(42), &mut roster, &mut log),
            Err(ResolveError::UnknownCombatant(CombatantId(42)))
        );
        assert!(table.pairs().is_empty());
        assert!(log.is_empty());
    }
}
