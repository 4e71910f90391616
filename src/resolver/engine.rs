//! The action resolver.
//!
//! `ActionResolver::resolve` turns one [`ActionRequest`] into an
//! [`ActionResult`], mutating combatants along the way:
//!
//! 1. test value = card value + actor attribute for the card's suit
//!    (+ situational modifiers)
//! 2. difficulty = baseline, or target-derived (opposing attribute, stance,
//!    banked dodge)
//! 3. banked aid for the actor is added and spent
//! 4. success = test ≥ difficulty; great on a face card backed by a
//!    trained attribute
//! 5. family-specific effects, weapon traits, wounds and engagement
//!
//! Ids and zones are validated before anything is touched, so an
//! `Err(ResolveError)` never leaves a half-applied action behind.

use crate::cards::{Card, Suit};
use crate::combatant::{
    Combatant, CombatantProvider, Condition, DamageClass, DefenseKind, PendingDefense, Side, WoundTag,
};
use crate::core::{
    ActionKind, ActionRequest, AttackStyle, CombatantId, Maneuver, ResolveError, RulesConfig, Support,
    Utility, WeaponClass,
};
use crate::events::{CombatEvent, EventSink};
use crate::zones::{ZoneId, ZoneMap};

use super::aid::AidBank;
use super::engagement::EngagementTable;
use super::result::{ActionResult, EffectTag, WoundRecord};

/// Everything the resolver needs from the outside for one call.
pub struct ResolveContext<'a> {
    pub combatants: &'a mut dyn CombatantProvider,
    pub zones: &'a ZoneMap,
    pub events: &'a mut dyn EventSink,
}

impl<'a> ResolveContext<'a> {
    pub fn new(
        combatants: &'a mut dyn CombatantProvider,
        zones: &'a ZoneMap,
        events: &'a mut dyn EventSink,
    ) -> Self {
        Self {
            combatants,
            zones,
            events,
        }
    }
}

/// Outcome of the test step.
#[derive(Clone, Copy, Debug)]
struct Roll {
    test: i32,
    difficulty: i32,
    success: bool,
    great: bool,
}

impl Roll {
    fn margin(self) -> i32 {
        self.test - self.difficulty
    }
}

/// Difficulty of an action opposed by `target`, before any banked dodge.
///
/// Base defense plus the target's attribute for the suit opposing the
/// action family; a defensive stance hardens attacks and maneuvers, lying
/// prone softens everything.
#[must_use]
pub fn opposed_difficulty(config: &RulesConfig, target: &Combatant, family: Suit) -> i32 {
    let mut difficulty = config.target_base_defense + target.attribute(family.opposing());
    if target.has(Condition::Defending) && matches!(family, Suit::Swords | Suit::Wands) {
        difficulty += config.defend_bonus;
    }
    if target.has(Condition::Prone) {
        difficulty -= config.prone_penalty;
    }
    difficulty
}

/// How hard `target` is to bring down in melee, as the opponent policy sees it.
///
/// Attack difficulty plus armor and a readied dodge, minus one per wound
/// condition already taken.
#[must_use]
pub fn effective_defense(config: &RulesConfig, target: &Combatant) -> i32 {
    let mut defense = opposed_difficulty(config, target, Suit::Swords);
    defense += i32::from(target.armor_notches());
    if let Some(PendingDefense {
        kind: DefenseKind::Dodge,
        card,
        ..
    }) = target.pending_defense()
    {
        defense += card.value();
    }
    defense - target.conditions().wound_level()
}

/// Stateful mechanics engine: engagement and banked aid live here.
#[derive(Clone, Debug, Default)]
pub struct ActionResolver {
    config: RulesConfig,
    engagement: EngagementTable,
    aid: AidBank,
}

impl ActionResolver {
    pub fn new(config: RulesConfig) -> Self {
        Self {
            config,
            engagement: EngagementTable::new(),
            aid: AidBank::new(),
        }
    }

    #[must_use]
    pub fn config(&self) -> &RulesConfig {
        &self.config
    }

    #[must_use]
    pub fn engagement(&self) -> &EngagementTable {
        &self.engagement
    }

    #[must_use]
    pub fn aid(&self) -> &AidBank {
        &self.aid
    }

    /// Drop all engagement and aid state (end of challenge).
    pub fn reset(&mut self, combatants: &mut dyn CombatantProvider) {
        self.engagement.reset(combatants);
        self.aid.clear();
    }

    // === Engagement ===

    pub fn form_engagement(
        &mut self,
        a: CombatantId,
        b: CombatantId,
        ctx: &mut ResolveContext<'_>,
    ) -> Result<bool, ResolveError> {
        self.engagement.form(a, b, ctx.combatants, ctx.events)
    }

    pub fn break_engagement(
        &mut self,
        a: CombatantId,
        b: CombatantId,
        ctx: &mut ResolveContext<'_>,
    ) -> Result<bool, ResolveError> {
        self.engagement.break_pair(a, b, ctx.combatants, ctx.events)
    }

    pub fn clear_engagements(
        &mut self,
        id: CombatantId,
        ctx: &mut ResolveContext<'_>,
    ) -> Result<Vec<CombatantId>, ResolveError> {
        self.engagement.clear_all(id, ctx.combatants, ctx.events)
    }

    // === Wounds ===

    /// Run one wound through `target`'s pipeline and announce it.
    ///
    /// A killing wound also clears the victim's engagements, prepared
    /// reaction and banked aid.
    pub fn apply_wound(
        &mut self,
        target: CombatantId,
        class: DamageClass,
        ctx: &mut ResolveContext<'_>,
    ) -> Result<WoundTag, ResolveError> {
        let victim = ctx
            .combatants
            .get_mut(target)
            .ok_or(ResolveError::UnknownCombatant(target))?;
        let was_dead = victim.is_dead();
        let tag = victim.apply_wound(class);
        let died = !was_dead && victim.is_dead();
        if died {
            victim.pending_defense = None;
        }

        tracing::debug!(%target, ?class, ?tag, "wound applied");
        ctx.events.emit(CombatEvent::WoundApplied { target, tag });

        if died {
            tracing::info!(%target, "combatant defeated");
            self.aid.consume(target);
            self.engagement.clear_all(target, ctx.combatants, ctx.events)?;
        }
        Ok(tag)
    }

    fn wound(
        &mut self,
        target: CombatantId,
        class: DamageClass,
        ctx: &mut ResolveContext<'_>,
        result: &mut ActionResult,
    ) -> Result<WoundTag, ResolveError> {
        let tag = self.apply_wound(target, class, ctx)?;
        result.wounds.push(WoundRecord { target, tag });
        Ok(tag)
    }

    // === Resolution ===

    /// Resolve one action request.
    pub fn resolve(
        &mut self,
        request: &ActionRequest,
        ctx: &mut ResolveContext<'_>,
    ) -> Result<ActionResult, ResolveError> {
        self.validate(request, ctx)?;
        let actor = lookup(ctx, request.actor)?.clone();

        let result = match &request.kind {
            ActionKind::Attack { target, style } => self.resolve_attack(request, &actor, *target, *style, ctx)?,
            ActionKind::Control { target, maneuver } => {
                self.resolve_control(request, &actor, *target, maneuver, ctx)?
            }
            ActionKind::Support(support) => self.resolve_support(request, &actor, *support, ctx)?,
            ActionKind::Utility(utility) => self.resolve_utility(request, &actor, *utility, ctx)?,
            ActionKind::Move { destination } => self.resolve_move(request, &actor, destination, ctx)?,
            ActionKind::Avoid { destination } => self.resolve_avoid(request, &actor, destination, ctx)?,
        };

        tracing::debug!(
            actor = %request.actor,
            card = %request.card,
            success = result.success,
            great = result.great,
            test = result.test_value,
            difficulty = result.difficulty,
            "action resolved"
        );
        Ok(result)
    }

    /// Reject unknown ids and zones before any mutation.
    fn validate(&self, request: &ActionRequest, ctx: &ResolveContext<'_>) -> Result<(), ResolveError> {
        let actor = lookup(ctx, request.actor)?;
        if actor.is_dead() {
            return Err(ResolveError::ActorDefeated(request.actor));
        }
        if let Some(target) = request.kind.target() {
            lookup(ctx, target)?;
        }
        if let Some(zone) = request.kind.destination() {
            if !ctx.zones.contains(zone) {
                return Err(ResolveError::UnknownZone(zone.clone()));
            }
        }
        Ok(())
    }

    /// Test step shared by every family. Spends the actor's banked aid.
    fn roll(
        &mut self,
        actor: &Combatant,
        card: Card,
        modifier: i32,
        difficulty: i32,
        result: &mut ActionResult,
    ) -> Roll {
        let mut test = card.value() + actor.attribute(card.suit) + modifier;
        if actor.has(Condition::Stressed) {
            test -= self.config.stressed_penalty;
        }
        if let Some(aid) = self.aid.consume(actor.id) {
            tracing::debug!(actor = %actor.id, bonus = aid.bonus, source = %aid.source, "banked aid spent");
            test += aid.bonus;
            result.tag(EffectTag::AidConsumed);
        }

        let success = test >= difficulty;
        let face = self.config.is_face_rank(card.rank);
        let trained = actor.attribute(card.suit) >= self.config.great_attribute_threshold;
        let great = if success { face && trained } else { card.is_ace() };

        result.test_value = test;
        result.difficulty = difficulty;
        result.success = success;
        result.great = great;
        result.tag(if success { EffectTag::Hit } else { EffectTag::Miss });
        if great {
            result.tag(if success { EffectTag::Great } else { EffectTag::GreatFailure });
        }

        Roll {
            test,
            difficulty,
            success,
            great,
        }
    }

    // --- Attacks ---

    fn resolve_attack(
        &mut self,
        request: &ActionRequest,
        actor: &Combatant,
        target_id: CombatantId,
        style: AttackStyle,
        ctx: &mut ResolveContext<'_>,
    ) -> Result<ActionResult, ResolveError> {
        let target = lookup(ctx, target_id)?.clone();
        if target.is_dead() {
            return Ok(ActionResult::whiff(
                EffectTag::NoValidTarget,
                format!("{} has already fallen", target.name),
            ));
        }

        let disarmed = actor.has(Condition::Disarmed);
        let weapon = if disarmed { None } else { request.weapon.clone() };
        let mut modifier = 0;

        match style {
            AttackStyle::Melee | AttackStyle::Special => {
                if actor.zone() != target.zone() {
                    return Ok(ActionResult::whiff(
                        EffectTag::OutOfReach,
                        format!("{} is out of reach of {}", target.name, actor.name),
                    ));
                }
            }
            AttackStyle::Ranged => {
                if !weapon.as_ref().is_some_and(|w| w.is_ranged()) {
                    return Ok(ActionResult::whiff(
                        EffectTag::NoRangedWeapon,
                        format!("{} has nothing to shoot with", actor.name),
                    ));
                }
                let loaded = ctx
                    .combatants
                    .get_mut(actor.id)
                    .is_some_and(Combatant::spend_ammunition);
                if !loaded {
                    return Ok(ActionResult::whiff(
                        EffectTag::OutOfAmmo,
                        format!("{} is out of ammunition", actor.name),
                    ));
                }
                if actor.is_engaged() {
                    modifier -= self.config.ranged_engaged_penalty;
                }
            }
        }

        let mut result = ActionResult::default();

        // The counter may have changed the target (a botched riposte leaves it prone).
        let target = if style == AttackStyle::Melee {
            if let Some(intercepted) = self.try_riposte(actor, &target, ctx, &mut result)? {
                return Ok(intercepted);
            }
            lookup(ctx, target_id)?.clone()
        } else {
            target
        };

        if actor.has(Condition::Frightened) {
            modifier -= self.config.frightened_penalty;
        }
        if actor.has(Condition::Prone) {
            modifier -= self.config.prone_penalty;
        }
        let mob = self.mob_rule_bonus(actor, ctx);
        if mob > 0 {
            modifier += mob;
            result.tag(EffectTag::MobRule);
        }

        let mut difficulty = opposed_difficulty(&self.config, &target, Suit::Swords);
        if let Some(dodge) = take_defense(ctx, target_id, DefenseKind::Dodge) {
            difficulty += dodge.card.value();
            result.tag(EffectTag::Dodged);
        }

        let roll = self.roll(actor, request.card, modifier, difficulty, &mut result);

        if !roll.success {
            if roll.great && style == AttackStyle::Melee {
                set_condition(ctx, actor.id, Condition::Prone);
                result.tag(EffectTag::Prone);
            }
            result.description = describe(actor, request, Some(&target), roll, "misses");
            return Ok(result);
        }

        let mut class = if style == AttackStyle::Special {
            result.tag(EffectTag::Critical);
            DamageClass::Critical
        } else {
            DamageClass::Normal
        };
        let mut count = 1;

        match weapon.as_ref().map(|w| w.class) {
            Some(WeaponClass::Blade) if roll.great => count += 1,
            Some(WeaponClass::Blunt) if roll.margin() >= roll.difficulty => {
                count *= 2;
                result.tag(EffectTag::Crushing);
            }
            Some(WeaponClass::Piercing)
                if class == DamageClass::Normal
                    && (roll.great || target.has(Condition::Prone) || target.has(Condition::Rooted)) =>
            {
                class = DamageClass::Piercing;
                result.tag(EffectTag::Piercing);
            }
            Some(WeaponClass::Bow) if roll.great => {
                class = DamageClass::Critical;
                result.tag(EffectTag::Critical);
            }
            _ => {}
        }

        for _ in 0..count {
            if self.wound(target_id, class, ctx, &mut result)? == WoundTag::Dead {
                break;
            }
        }

        let felled = lookup(ctx, target_id)?.is_dead();
        if felled {
            result.tag(EffectTag::Defeated);
            if weapon.as_ref().is_some_and(|w| w.class == WeaponClass::Axe) {
                self.cleave(actor, &target, ctx, &mut result)?;
            }
        } else if style != AttackStyle::Ranged && lookup(ctx, actor.id)?.is_alive() {
            self.engagement.form(actor.id, target_id, ctx.combatants, ctx.events)?;
            result.tag(EffectTag::Engaged);
        }

        let verdict = if felled { "fells" } else { "hits" };
        result.description = describe(actor, request, Some(&target), roll, verdict);
        Ok(result)
    }

    /// Spend the target's readied riposte on a full counter-attack.
    ///
    /// Returns the finished result if the counter intercepted the attack.
    fn try_riposte(
        &mut self,
        attacker: &Combatant,
        target: &Combatant,
        ctx: &mut ResolveContext<'_>,
        result: &mut ActionResult,
    ) -> Result<Option<ActionResult>, ResolveError> {
        let Some(riposte) = take_defense(ctx, target.id, DefenseKind::Riposte) else {
            return Ok(None);
        };

        let counter = ActionRequest {
            actor: target.id,
            card: riposte.card,
            kind: ActionKind::melee(attacker.id),
            weapon: riposte.weapon,
        };
        tracing::debug!(riposter = %target.id, attacker = %attacker.id, "riposte triggered");
        let countered = self.resolve(&counter, ctx)?;
        result.wounds.extend(countered.wounds.iter().copied());

        let attacker_down = lookup(ctx, attacker.id)?.is_dead();
        if !countered.success && !attacker_down {
            return Ok(None);
        }

        let mut intercepted = ActionResult {
            wounds: std::mem::take(&mut result.wounds),
            test_value: countered.test_value,
            difficulty: countered.difficulty,
            ..ActionResult::default()
        };
        intercepted.tag(EffectTag::Riposted);
        intercepted.tag(EffectTag::Miss);
        intercepted.description = format!(
            "{} is intercepted by {}'s riposte. {}",
            attacker.name, target.name, countered.description
        );
        Ok(Some(intercepted))
    }

    /// Axe trait: one free wound on another foe in the fallen target's zone.
    fn cleave(
        &mut self,
        actor: &Combatant,
        fallen: &Combatant,
        ctx: &mut ResolveContext<'_>,
        result: &mut ActionResult,
    ) -> Result<(), ResolveError> {
        let victim = ctx.combatants.ids().into_iter().find(|id| {
            *id != actor.id
                && *id != fallen.id
                && ctx
                    .combatants
                    .get(*id)
                    .is_some_and(|c| c.is_alive() && c.zone() == fallen.zone() && c.is_hostile_to(actor))
        });
        if let Some(victim) = victim {
            tracing::debug!(actor = %actor.id, %victim, "axe cleaves");
            self.wound(victim, DamageClass::Normal, ctx, result)?;
            result.tag(EffectTag::Cleave);
        }
        Ok(())
    }

    /// Per-ally bonus for a non-player attacking alongside its pack.
    fn mob_rule_bonus(&self, actor: &Combatant, ctx: &ResolveContext<'_>) -> i32 {
        if actor.side != Side::Opponent {
            return 0;
        }
        let allies = ctx
            .combatants
            .ids()
            .into_iter()
            .filter(|id| *id != actor.id)
            .filter_map(|id| ctx.combatants.get(id))
            .filter(|c| c.side == Side::Opponent && c.is_alive() && c.zone() == actor.zone())
            .count() as i32;
        allies * self.config.mob_rule_bonus
    }

    // --- Battlefield control ---

    fn resolve_control(
        &mut self,
        request: &ActionRequest,
        actor: &Combatant,
        target_id: CombatantId,
        maneuver: &Maneuver,
        ctx: &mut ResolveContext<'_>,
    ) -> Result<ActionResult, ResolveError> {
        let target = lookup(ctx, target_id)?.clone();
        if target.is_dead() {
            return Ok(ActionResult::whiff(
                EffectTag::NoValidTarget,
                format!("{} has already fallen", target.name),
            ));
        }
        if actor.zone() != target.zone() {
            return Ok(ActionResult::whiff(
                EffectTag::OutOfReach,
                format!("{} is out of reach of {}", target.name, actor.name),
            ));
        }
        if let Maneuver::Displace { destination } = maneuver {
            if !ctx.zones.are_adjacent(target.zone(), destination) {
                return Ok(ActionResult::whiff(
                    EffectTag::NotAdjacent,
                    format!("{} cannot be pushed into {}", target.name, destination),
                ));
            }
        }

        let mut result = ActionResult::default();
        let difficulty = opposed_difficulty(&self.config, &target, Suit::Wands);
        let roll = self.roll(actor, request.card, 0, difficulty, &mut result);
        if !roll.success {
            result.description = describe(actor, request, Some(&target), roll, "fails");
            return Ok(result);
        }

        match maneuver {
            Maneuver::Trip => {
                set_condition(ctx, target_id, Condition::Prone);
                result.tag(EffectTag::Prone);
            }
            Maneuver::Disarm => {
                set_condition(ctx, target_id, Condition::Disarmed);
                result.tag(EffectTag::Disarmed);
            }
            Maneuver::Grapple => {
                set_condition(ctx, target_id, Condition::Rooted);
                result.tag(EffectTag::Rooted);
                self.engagement.form(actor.id, target_id, ctx.combatants, ctx.events)?;
                result.tag(EffectTag::Engaged);
            }
            Maneuver::Displace { destination } => {
                if !self.engagement.clear_all(target_id, ctx.combatants, ctx.events)?.is_empty() {
                    result.tag(EffectTag::Disengaged);
                }
                set_zone(ctx, target_id, destination.clone());
                result.tag(EffectTag::Displaced);
            }
        }

        result.description = describe(actor, request, Some(&target), roll, "succeeds");
        Ok(result)
    }

    // --- Defense and support ---

    fn resolve_support(
        &mut self,
        request: &ActionRequest,
        actor: &Combatant,
        support: Support,
        ctx: &mut ResolveContext<'_>,
    ) -> Result<ActionResult, ResolveError> {
        let target = match support {
            Support::Heal { target } | Support::Aid { target } => {
                let target = lookup(ctx, target)?.clone();
                if target.is_dead() {
                    return Ok(ActionResult::whiff(
                        EffectTag::NoValidTarget,
                        format!("{} is beyond help", target.name),
                    ));
                }
                if matches!(support, Support::Heal { .. }) && target.zone() != actor.zone() {
                    return Ok(ActionResult::whiff(
                        EffectTag::OutOfReach,
                        format!("{} is too far away to tend", target.name),
                    ));
                }
                Some(target)
            }
            Support::Defend | Support::Dodge | Support::Riposte => None,
        };

        let mut result = ActionResult::default();
        let roll = self.roll(actor, request.card, 0, self.config.baseline_difficulty, &mut result);
        if !roll.success {
            result.description = describe(actor, request, target.as_ref(), roll, "fails");
            return Ok(result);
        }

        match support {
            Support::Defend => {
                set_condition(ctx, actor.id, Condition::Defending);
                result.tag(EffectTag::Defending);
            }
            Support::Dodge | Support::Riposte => {
                let kind = if support == Support::Dodge {
                    result.tag(EffectTag::DodgeReady);
                    DefenseKind::Dodge
                } else {
                    result.tag(EffectTag::RiposteReady);
                    DefenseKind::Riposte
                };
                if let Some(c) = ctx.combatants.get_mut(actor.id) {
                    c.pending_defense = Some(PendingDefense {
                        kind,
                        card: request.card,
                        weapon: request.weapon.clone(),
                    });
                }
            }
            Support::Heal { target } => {
                let levels = if roll.great { 2 } else { 1 };
                let healed = ctx
                    .combatants
                    .get_mut(target)
                    .map(|c| c.heal(levels))
                    .unwrap_or_default();
                if !healed.is_empty() {
                    result.tag(EffectTag::Healed);
                }
            }
            Support::Aid { target } => {
                let bonus = if roll.great {
                    self.config.great_aid_bonus
                } else {
                    self.config.aid_bonus
                };
                self.aid.bank(target, bonus, actor.name.clone());
                result.tag(EffectTag::AidBanked);
            }
        }

        result.description = describe(actor, request, target.as_ref(), roll, "succeeds");
        Ok(result)
    }

    // --- Utility and magic ---

    fn resolve_utility(
        &mut self,
        request: &ActionRequest,
        actor: &Combatant,
        utility: Utility,
        ctx: &mut ResolveContext<'_>,
    ) -> Result<ActionResult, ResolveError> {
        let target = match utility {
            Utility::Banter { target } | Utility::Cast { target } | Utility::Intimidate { target } => {
                let target = lookup(ctx, target)?.clone();
                if target.is_dead() {
                    return Ok(ActionResult::whiff(
                        EffectTag::NoValidTarget,
                        format!("{} has already fallen", target.name),
                    ));
                }
                Some(target)
            }
            Utility::Recover => None,
        };

        let difficulty = match &target {
            Some(target) => opposed_difficulty(&self.config, target, Suit::Pentacles),
            None => self.config.baseline_difficulty,
        };
        let mut result = ActionResult::default();
        let roll = self.roll(actor, request.card, 0, difficulty, &mut result);
        if !roll.success {
            result.description = describe(actor, request, target.as_ref(), roll, "fails");
            return Ok(result);
        }

        match utility {
            Utility::Banter { target } => {
                let rattled = lookup(ctx, target)?.has(Condition::Stressed);
                if rattled {
                    set_condition(ctx, target, Condition::Frightened);
                    result.tag(EffectTag::Frightened);
                } else {
                    set_condition(ctx, target, Condition::Stressed);
                    result.tag(EffectTag::Stressed);
                }
            }
            Utility::Intimidate { target } => {
                set_condition(ctx, target, Condition::Frightened);
                result.tag(EffectTag::Frightened);
            }
            Utility::Cast { target } => {
                let class = if roll.great {
                    result.tag(EffectTag::Critical);
                    DamageClass::Critical
                } else {
                    DamageClass::Normal
                };
                if self.wound(target, class, ctx, &mut result)? == WoundTag::Dead {
                    result.tag(EffectTag::Defeated);
                }
            }
            Utility::Recover => {
                if let Some(c) = ctx.combatants.get_mut(actor.id) {
                    for condition in Condition::RECOVERABLE {
                        c.clear_condition(condition);
                    }
                }
                result.tag(EffectTag::Recovered);
            }
        }

        result.description = describe(actor, request, target.as_ref(), roll, "succeeds");
        Ok(result)
    }

    // --- Movement ---

    /// Common checks for leaving the current zone.
    fn check_departure(actor: &Combatant, destination: &ZoneId, zones: &ZoneMap) -> Option<ActionResult> {
        if !zones.are_adjacent(actor.zone(), destination) {
            return Some(ActionResult::whiff(
                EffectTag::NotAdjacent,
                format!("{} cannot reach {} from {}", actor.name, destination, actor.zone()),
            ));
        }
        if actor.has(Condition::Rooted) {
            return Some(ActionResult::whiff(
                EffectTag::HeldFast,
                format!("{} is held fast", actor.name),
            ));
        }
        None
    }

    fn resolve_move(
        &mut self,
        request: &ActionRequest,
        actor: &Combatant,
        destination: &ZoneId,
        ctx: &mut ResolveContext<'_>,
    ) -> Result<ActionResult, ResolveError> {
        if let Some(whiff) = Self::check_departure(actor, destination, ctx.zones) {
            return Ok(whiff);
        }

        let mut result = ActionResult::default();
        // Walking needs no test; the roll only spends banked aid.
        self.roll(actor, request.card, 0, i32::MIN, &mut result);
        result.great = false;
        result.tags.retain(|t| *t != EffectTag::Great);
        result.difficulty = 0;

        let blockers: Vec<CombatantId> = self
            .engagement
            .engaged_with(actor.id)
            .into_iter()
            .filter(|id| {
                ctx.combatants
                    .get(*id)
                    .is_some_and(|c| c.is_alive() && c.zone() == actor.zone())
            })
            .collect();

        for blocker in &blockers {
            tracing::debug!(mover = %actor.id, %blocker, "parting blow");
            result.tag(EffectTag::PartingBlow);
            if self.wound(actor.id, DamageClass::Normal, ctx, &mut result)? == WoundTag::Dead {
                result.success = false;
                result.tag(EffectTag::Defeated);
                result.tag(EffectTag::MoveBlocked);
                result.description = format!("{} is cut down while trying to leave {}", actor.name, actor.zone());
                return Ok(result);
            }
        }

        if !self.engagement.clear_all(actor.id, ctx.combatants, ctx.events)?.is_empty() {
            result.tag(EffectTag::Disengaged);
        }
        set_zone(ctx, actor.id, destination.clone());
        result.tag(EffectTag::Moved);
        result.description = format!("{} {} {}", actor.name, request.kind.verb(), destination);
        Ok(result)
    }

    fn resolve_avoid(
        &mut self,
        request: &ActionRequest,
        actor: &Combatant,
        destination: &ZoneId,
        ctx: &mut ResolveContext<'_>,
    ) -> Result<ActionResult, ResolveError> {
        if let Some(whiff) = Self::check_departure(actor, destination, ctx.zones) {
            return Ok(whiff);
        }

        let mut result = ActionResult::default();
        let roll = self.roll(actor, request.card, 0, self.config.baseline_difficulty, &mut result);
        if !roll.success {
            result.description = describe(actor, request, None, roll, "stays pinned");
            return Ok(result);
        }

        if !self.engagement.clear_all(actor.id, ctx.combatants, ctx.events)?.is_empty() {
            result.tag(EffectTag::Disengaged);
        }
        set_zone(ctx, actor.id, destination.clone());
        result.tag(EffectTag::Moved);
        result.description = format!("{} {} {}", actor.name, request.kind.verb(), destination);
        Ok(result)
    }
}

// === Helpers ===

fn lookup<'c>(ctx: &'c ResolveContext<'_>, id: CombatantId) -> Result<&'c Combatant, ResolveError> {
    ctx.combatants.get(id).ok_or(ResolveError::UnknownCombatant(id))
}

fn set_condition(ctx: &mut ResolveContext<'_>, id: CombatantId, condition: Condition) {
    if let Some(c) = ctx.combatants.get_mut(id) {
        c.set_condition(condition);
    }
}

fn set_zone(ctx: &mut ResolveContext<'_>, id: CombatantId, zone: ZoneId) {
    if let Some(c) = ctx.combatants.get_mut(id) {
        c.set_zone(zone);
    }
}

/// Remove and return `id`'s prepared reaction if it is of the given kind.
fn take_defense(ctx: &mut ResolveContext<'_>, id: CombatantId, kind: DefenseKind) -> Option<PendingDefense> {
    let c = ctx.combatants.get_mut(id)?;
    if c.pending_defense.as_ref().is_some_and(|d| d.kind == kind) {
        c.pending_defense.take()
    } else {
        None
    }
}

fn describe(
    actor: &Combatant,
    request: &ActionRequest,
    target: Option<&Combatant>,
    roll: Roll,
    verdict: &str,
) -> String {
    let qualifier = match (roll.success, roll.great) {
        (true, true) => " greatly",
        (false, true) => " disastrously",
        _ => "",
    };
    match target {
        Some(target) => format!(
            "{} {} {} with the {} and{} {} ({} vs {})",
            actor.name,
            request.kind.verb(),
            target.name,
            request.card,
            qualifier,
            verdict,
            roll.test,
            roll.difficulty
        ),
        None => format!(
            "{} {} with the {} and{} {} ({} vs {})",
            actor.name,
            request.kind.verb(),
            request.card,
            qualifier,
            verdict,
            roll.test,
            roll.difficulty
        ),
    }
}
