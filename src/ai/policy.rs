//! Opponent decision policies.
//!
//! Policies are trait-based so a game can swap in its own behavior:
//! - `OpponentPolicy::choose_initiative`: which card to commit for the round
//! - `OpponentPolicy::choose_action`: what to do with the turn

use serde::{Deserialize, Serialize};

use crate::cards::Card;
use crate::combatant::{Archetype, Combatant, Condition, Side};
use crate::core::{ActionKind, ActionRequest, CombatantId, RulesConfig, Weapon};
use crate::resolver::effective_defense;
use crate::zones::{ZoneId, ZoneMap};

// =============================================================================
// Context
// =============================================================================

/// Read-only view of the battlefield handed to a policy.
#[derive(Clone, Debug)]
pub struct PolicyContext<'a> {
    /// Challenge members in roster order.
    pub combatants: Vec<&'a Combatant>,
    pub zones: &'a ZoneMap,
    pub config: &'a RulesConfig,
}

impl<'a> PolicyContext<'a> {
    pub fn new(combatants: Vec<&'a Combatant>, zones: &'a ZoneMap, config: &'a RulesConfig) -> Self {
        Self {
            combatants,
            zones,
            config,
        }
    }

    #[must_use]
    pub fn get(&self, id: CombatantId) -> Option<&'a Combatant> {
        self.combatants.iter().copied().find(|c| c.id == id)
    }

    /// Living player-controlled combatants, roster order.
    pub fn living_players(&self) -> impl Iterator<Item = &'a Combatant> + '_ {
        self.combatants
            .iter()
            .copied()
            .filter(|c| c.side == Side::Player && c.is_alive())
    }

    /// The easiest living player to hit in `zone`. Ties go to roster order.
    #[must_use]
    pub fn softest_player_in(&self, zone: &ZoneId) -> Option<&'a Combatant> {
        self.living_players()
            .filter(|c| c.zone() == zone)
            .min_by_key(|c| effective_defense(self.config, c))
    }

    /// Zone of the living player closest to `from`, by path length.
    #[must_use]
    pub fn nearest_player_zone(&self, from: &ZoneId) -> Option<&'a ZoneId> {
        self.living_players()
            .filter_map(|c| self.zones.distance(from, c.zone()).map(|d| (d, c.zone())))
            .min_by_key(|(d, _)| *d)
            .map(|(_, zone)| zone)
    }
}

// =============================================================================
// Policy
// =============================================================================

/// A policy's verdict for one turn.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Decision {
    Act(ActionRequest),
    Pass,
}

/// How a non-player combatant picks its cards and actions.
pub trait OpponentPolicy {
    /// Pick the initiative card from `hand`. `None` only for an empty hand.
    fn choose_initiative(&self, me: &Combatant, hand: &[Card]) -> Option<Card>;

    /// Pick the primary action for `me`'s turn.
    fn choose_action(
        &self,
        ctx: &PolicyContext<'_>,
        me: CombatantId,
        hand: &[Card],
        weapon: Option<&Weapon>,
    ) -> Decision;
}

/// Archetype-driven heuristic policy.
///
/// Initiative: aggressive combatants go early with their lowest card,
/// defensive ones late with their highest, everyone else plays the
/// (lower) median.
///
/// Actions, first match wins:
/// 1. elites and bosses spend a face card on a special attack
/// 2. melee the softest player in the zone with the highest card
/// 3. step toward the nearest player with the lowest card
/// 4. pass
#[derive(Clone, Copy, Debug, Default)]
pub struct TacticalPolicy;

impl TacticalPolicy {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

fn sorted(hand: &[Card]) -> Vec<Card> {
    let mut cards = hand.to_vec();
    cards.sort_by_key(|c| (c.value(), c.suit));
    cards
}

impl OpponentPolicy for TacticalPolicy {
    fn choose_initiative(&self, me: &Combatant, hand: &[Card]) -> Option<Card> {
        let cards = sorted(hand);
        if cards.is_empty() {
            return None;
        }
        let index = match me.archetype {
            Archetype::Aggressive => 0,
            Archetype::Defensive => cards.len() - 1,
            _ => (cards.len() - 1) / 2,
        };
        Some(cards[index])
    }

    fn choose_action(
        &self,
        ctx: &PolicyContext<'_>,
        me: CombatantId,
        hand: &[Card],
        weapon: Option<&Weapon>,
    ) -> Decision {
        let Some(actor) = ctx.get(me).filter(|c| c.is_alive()) else {
            return Decision::Pass;
        };
        let cards = sorted(hand);
        let (Some(&lowest), Some(&highest)) = (cards.first(), cards.last()) else {
            return Decision::Pass;
        };

        let act = |card: Card, kind: ActionKind| {
            ActionRequest::new(me, card, kind)
                .map(|r| r.with_optional_weapon(weapon.cloned()))
                .map_or(Decision::Pass, Decision::Act)
        };

        if let Some(target) = ctx.softest_player_in(actor.zone()) {
            if actor.archetype.has_specials() {
                let face = cards.iter().rev().find(|c| ctx.config.is_face_rank(c.rank));
                if let Some(&card) = face {
                    tracing::debug!(%me, target = %target.id, %card, "policy: special attack");
                    return act(card, ActionKind::special(target.id));
                }
            }
            tracing::debug!(%me, target = %target.id, card = %highest, "policy: melee");
            return act(highest, ActionKind::melee(target.id));
        }

        if !actor.has(Condition::Rooted) {
            let step = ctx
                .nearest_player_zone(actor.zone())
                .and_then(|goal| ctx.zones.next_step(actor.zone(), goal));
            if let Some(step) = step {
                tracing::debug!(%me, zone = %step, "policy: advance");
                return act(lowest, ActionKind::Move { destination: step });
            }
        }

        Decision::Pass
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::Suit;

    fn hand() -> Vec<Card> {
        vec![
            Card::new(Suit::Cups, 9),
            Card::new(Suit::Swords, 2),
            Card::new(Suit::Wands, 5),
            Card::new(Suit::Pentacles, 12),
        ]
    }

    fn brute(archetype: Archetype) -> Combatant {
        Combatant::new(CombatantId(9), "Brute", Side::Opponent, "pit").with_archetype(archetype)
    }

    #[test]
    fn test_initiative_by_archetype() {
        let policy = TacticalPolicy::new();
        let hand = hand();

        assert_eq!(
            policy.choose_initiative(&brute(Archetype::Aggressive), &hand),
            Some(Card::new(Suit::Swords, 2))
        );
        assert_eq!(
            policy.choose_initiative(&brute(Archetype::Defensive), &hand),
            Some(Card::new(Suit::Pentacles, 12))
        );
        // Even hand: lower median.
        assert_eq!(
            policy.choose_initiative(&brute(Archetype::Default), &hand),
            Some(Card::new(Suit::Wands, 5))
        );
        assert_eq!(policy.choose_initiative(&brute(Archetype::Default), &[]), None);
    }

    #[test]
    fn test_passes_without_cards() {
        let zones = ZoneMap::new().with_zone("pit");
        let config = RulesConfig::default();
        let me = brute(Archetype::Default);
        let ctx = PolicyContext::new(vec![&me], &zones, &config);

        assert_eq!(TacticalPolicy.choose_action(&ctx, me.id, &[], None), Decision::Pass);
    }
}
