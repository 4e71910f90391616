//! The turn controller state machine.
//!
//! One challenge at a time. Every public operation either advances the
//! machine to its next resting phase or returns a [`ControllerError`] and
//! leaves the session untouched.

use std::collections::VecDeque;

use rustc_hash::{FxHashMap, FxHashSet};

use crate::ai::{Decision, OpponentPolicy, PolicyContext};
use crate::cards::Card;
use crate::combatant::{Combatant, CombatantProvider, Condition, Side};
use crate::core::{ActionRequest, CombatantId, ControllerError, ResolveError, Result, RulesConfig, Weapon};
use crate::events::{CombatEvent, EventSink};
use crate::resolver::{ActionResolver, ActionResult, ResolveContext};
use crate::zones::ZoneMap;

use super::minor::MinorQueue;
use super::phase::{ChallengeKind, ChallengeSummary, InitiativeSlot, Outcome, Phase};

/// What the presentation layer is currently showing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum SyncSource {
    Primary,
    Minor,
}

/// Per-challenge state. Dropped when the challenge ends.
#[derive(Clone, Debug)]
struct Session {
    kind: ChallengeKind,
    zones: ZoneMap,
    roster: Vec<CombatantId>,
    round: u32,
    count: u8,
    initiative: FxHashMap<CombatantId, InitiativeSlot>,
    /// Living members still owing an initiative card, roster order.
    awaiting: Vec<CombatantId>,
    acted: FxHashSet<CombatantId>,
    /// Members due at the current count, in acting order.
    eligible: VecDeque<CombatantId>,
    active: Option<CombatantId>,
    minors: MinorQueue,
    sync: SyncSource,
}

impl Session {
    fn is_member(&self, id: CombatantId) -> bool {
        self.roster.contains(&id)
    }
}

/// Drives a challenge: rounds, initiative, count-up, primary turns and
/// the minor-action window.
///
/// The controller owns its combatant provider and event sink; both are
/// injected at construction.
///
/// ```
/// use tarot_tactics::cards::{Card, Suit};
/// use tarot_tactics::combatant::{Combatant, Roster, Side};
/// use tarot_tactics::core::{CombatantId, RulesConfig};
/// use tarot_tactics::events::EventLog;
/// use tarot_tactics::turn::{ChallengeKind, Phase, TurnController};
/// use tarot_tactics::zones::ZoneMap;
///
/// let roster = Roster::new()
///     .with(Combatant::new(CombatantId(1), "Ada", Side::Player, "hall"))
///     .with(Combatant::new(CombatantId(2), "Imp", Side::Opponent, "hall"));
/// let mut controller = TurnController::new(roster, EventLog::new(), RulesConfig::default());
///
/// controller
///     .start_challenge(&[CombatantId(1), CombatantId(2)], ZoneMap::new().with_zone("hall"), ChallengeKind::Skirmish)
///     .unwrap();
/// assert_eq!(controller.phase(), Phase::PreRound);
///
/// controller.submit_initiative(CombatantId(1), Card::new(Suit::Cups, 4)).unwrap();
/// controller.submit_initiative(CombatantId(2), Card::new(Suit::Swords, 9)).unwrap();
///
/// assert_eq!(controller.phase(), Phase::AwaitingAction);
/// assert_eq!(controller.active(), Some(CombatantId(1)));
/// assert_eq!(controller.count(), 4);
/// ```
#[derive(Debug)]
pub struct TurnController<P: CombatantProvider, S: EventSink> {
    provider: P,
    sink: S,
    resolver: ActionResolver,
    phase: Phase,
    session: Option<Session>,
    last_summary: Option<ChallengeSummary>,
}

impl<P: CombatantProvider, S: EventSink> TurnController<P, S> {
    pub fn new(provider: P, sink: S, config: RulesConfig) -> Self {
        Self {
            provider,
            sink,
            resolver: ActionResolver::new(config),
            phase: Phase::Idle,
            session: None,
            last_summary: None,
        }
    }

    // === Queries ===

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Current round, 0 outside a challenge.
    #[must_use]
    pub fn round(&self) -> u32 {
        self.session.as_ref().map_or(0, |s| s.round)
    }

    /// Current count, 0 before the count-up starts.
    #[must_use]
    pub fn count(&self) -> u8 {
        self.session.as_ref().map_or(0, |s| s.count)
    }

    /// The combatant whose primary action is awaited.
    #[must_use]
    pub fn active(&self) -> Option<CombatantId> {
        self.session.as_ref().and_then(|s| s.active)
    }

    #[must_use]
    pub fn kind(&self) -> Option<ChallengeKind> {
        self.session.as_ref().map(|s| s.kind)
    }

    /// Challenge members in roster order.
    #[must_use]
    pub fn roster(&self) -> &[CombatantId] {
        self.session.as_ref().map(|s| s.roster.as_slice()).unwrap_or(&[])
    }

    /// Members still owing an initiative card, roster order.
    #[must_use]
    pub fn awaiting_initiative(&self) -> Vec<CombatantId> {
        self.session.as_ref().map(|s| s.awaiting.clone()).unwrap_or_default()
    }

    #[must_use]
    pub fn initiative(&self, id: CombatantId) -> Option<&InitiativeSlot> {
        self.session.as_ref().and_then(|s| s.initiative.get(&id))
    }

    /// Check if `id` has taken its primary turn this round.
    #[must_use]
    pub fn has_acted(&self, id: CombatantId) -> bool {
        self.session.as_ref().is_some_and(|s| s.acted.contains(&id))
    }

    /// Queued minor declarations, in resolution order.
    #[must_use]
    pub fn pending_minor(&self) -> Vec<&ActionRequest> {
        self.session
            .as_ref()
            .map(|s| s.minors.iter().collect())
            .unwrap_or_default()
    }

    #[must_use]
    pub fn zones(&self) -> Option<&ZoneMap> {
        self.session.as_ref().map(|s| &s.zones)
    }

    #[must_use]
    pub fn resolver(&self) -> &ActionResolver {
        &self.resolver
    }

    #[must_use]
    pub fn config(&self) -> &RulesConfig {
        self.resolver.config()
    }

    #[must_use]
    pub fn combatants(&self) -> &P {
        &self.provider
    }

    /// Mutable access for setup between challenges.
    ///
    /// `None` while a challenge is running: combatant state then only
    /// changes through resolution.
    pub fn combatants_mut(&mut self) -> Option<&mut P> {
        if self.phase == Phase::Idle {
            Some(&mut self.provider)
        } else {
            None
        }
    }

    #[must_use]
    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// Summary of the most recently finished challenge.
    #[must_use]
    pub fn last_summary(&self) -> Option<&ChallengeSummary> {
        self.last_summary.as_ref()
    }

    /// Read-only battlefield view for an [`OpponentPolicy`].
    #[must_use]
    pub fn policy_context(&self) -> Option<PolicyContext<'_>> {
        let session = self.session.as_ref()?;
        let combatants = session
            .roster
            .iter()
            .filter_map(|id| self.provider.get(*id))
            .collect();
        Some(PolicyContext::new(combatants, &session.zones, self.resolver.config()))
    }

    /// Living enemies sharing `actor`'s zone, roster order.
    #[must_use]
    pub fn valid_targets(&self, actor: CombatantId) -> Vec<CombatantId> {
        let (Some(session), Some(me)) = (self.session.as_ref(), self.provider.get(actor)) else {
            return Vec::new();
        };
        session
            .roster
            .iter()
            .filter_map(|id| self.provider.get(*id))
            .filter(|c| c.is_alive() && c.is_hostile_to(me) && c.zone() == me.zone())
            .map(|c| c.id)
            .collect()
    }

    // === Challenge lifecycle ===

    /// Begin a challenge with `roster` fighting over `zones`.
    pub fn start_challenge(&mut self, roster: &[CombatantId], zones: ZoneMap, kind: ChallengeKind) -> Result<()> {
        if self.phase != Phase::Idle {
            return Err(ControllerError::ChallengeInProgress);
        }
        if roster.is_empty() {
            return Err(ControllerError::EmptyRoster);
        }
        for id in roster {
            let combatant = self.provider.get(*id).ok_or(ControllerError::UnknownCombatant(*id))?;
            if !zones.contains(combatant.zone()) {
                return Err(ControllerError::UnknownZone(combatant.zone().clone()));
            }
        }

        let mut members = Vec::with_capacity(roster.len());
        for id in roster {
            if !members.contains(id) {
                members.push(*id);
            }
        }

        self.phase = Phase::Starting;
        self.resolver.reset(&mut self.provider);
        self.session = Some(Session {
            kind,
            zones,
            roster: members.clone(),
            round: 0,
            count: 0,
            initiative: FxHashMap::default(),
            awaiting: Vec::new(),
            acted: FxHashSet::default(),
            eligible: VecDeque::new(),
            active: None,
            minors: MinorQueue::new(),
            sync: SyncSource::Primary,
        });

        tracing::info!(?kind, size = members.len(), "challenge started");
        self.sink.emit(CombatEvent::ChallengeStarted { kind, roster: members });
        self.begin_round();
        Ok(())
    }

    /// Abandon the challenge in progress.
    pub fn end_challenge(&mut self) -> Result<ChallengeSummary> {
        if self.session.is_none() {
            return Err(ControllerError::NoChallenge);
        }
        Ok(self.finish(Outcome::Abandoned))
    }

    // === Initiative ===

    /// Commit `combatant`'s initiative card for the round.
    pub fn submit_initiative(&mut self, combatant: CombatantId, card: Card) -> Result<()> {
        if self.phase != Phase::PreRound {
            return Err(ControllerError::NotInPreRound(self.phase));
        }
        let session = self.session.as_mut().ok_or(ControllerError::NoChallenge)?;
        if !session.is_member(combatant) {
            return Err(ControllerError::NotInChallenge(combatant));
        }
        if session.initiative.contains_key(&combatant) {
            return Err(ControllerError::AlreadySubmitted(combatant));
        }
        let Some(position) = session.awaiting.iter().position(|id| *id == combatant) else {
            return Err(ControllerError::NotLiving(combatant));
        };

        session.awaiting.remove(position);
        session.initiative.insert(combatant, InitiativeSlot::new(card));
        tracing::debug!(%combatant, %card, remaining = session.awaiting.len(), "initiative committed");

        if session.awaiting.is_empty() {
            self.phase = Phase::CountUp;
            self.advance();
        }
        Ok(())
    }

    /// Let an opponent policy commit initiative for every non-player still owing a card.
    ///
    /// `hands` supplies the cards each combatant may choose from.
    pub fn submit_opponent_initiative<F>(&mut self, policy: &impl OpponentPolicy, mut hands: F) -> Result<()>
    where
        F: FnMut(CombatantId) -> Vec<Card>,
    {
        if self.phase != Phase::PreRound {
            return Err(ControllerError::NotInPreRound(self.phase));
        }
        let choices: Vec<(CombatantId, Card)> = self
            .awaiting_initiative()
            .into_iter()
            .filter_map(|id| self.provider.get(id))
            .filter(|c| c.side == Side::Opponent)
            .filter_map(|c| policy.choose_initiative(c, &hands(c.id)).map(|card| (c.id, card)))
            .collect();
        for (id, card) in choices {
            if self.phase != Phase::PreRound {
                break;
            }
            self.submit_initiative(id, card)?;
        }
        Ok(())
    }

    // === Primary turn ===

    fn check_active(&self, actor: CombatantId) -> Result<()> {
        if self.phase != Phase::AwaitingAction {
            return Err(ControllerError::NotAwaitingAction(self.phase));
        }
        if self.active() != Some(actor) {
            return Err(ControllerError::NotActiveCombatant(actor));
        }
        Ok(())
    }

    /// Resolve the active combatant's primary action.
    pub fn submit_action(&mut self, request: ActionRequest) -> Result<ActionResult> {
        self.check_active(request.actor)?;
        let session = self.session.as_mut().ok_or(ControllerError::NoChallenge)?;

        self.phase = Phase::Resolving;
        let mut ctx = ResolveContext::new(&mut self.provider, &session.zones, &mut self.sink);
        let result = match self.resolver.resolve(&request, &mut ctx) {
            Ok(result) => result,
            Err(err) => {
                tracing::warn!(actor = %request.actor, %err, "primary action rejected");
                self.phase = Phase::AwaitingAction;
                return Err(err.into());
            }
        };

        session.acted.insert(request.actor);
        session.active = None;
        session.sync = SyncSource::Primary;
        self.sink.emit(CombatEvent::ActionResolved {
            request,
            result: result.clone(),
        });
        self.phase = Phase::VisualSync;
        Ok(result)
    }

    /// Forfeit the active combatant's primary action.
    pub fn pass_turn(&mut self, combatant: CombatantId) -> Result<()> {
        self.check_active(combatant)?;
        let session = self.session.as_mut().ok_or(ControllerError::NoChallenge)?;
        session.acted.insert(combatant);
        session.active = None;
        tracing::debug!(%combatant, "turn passed");
        self.open_minor_window();
        Ok(())
    }

    /// Let `policy` take the active combatant's turn.
    ///
    /// Returns the result if the policy acted, `None` if it passed.
    pub fn take_policy_turn(
        &mut self,
        policy: &impl OpponentPolicy,
        hand: &[Card],
        weapon: Option<&Weapon>,
    ) -> Result<Option<ActionResult>> {
        if self.phase != Phase::AwaitingAction {
            return Err(ControllerError::NotAwaitingAction(self.phase));
        }
        let me = self.active().ok_or(ControllerError::NotAwaitingAction(self.phase))?;
        let decision = match self.policy_context() {
            Some(ctx) => policy.choose_action(&ctx, me, hand, weapon),
            None => return Err(ControllerError::NoChallenge),
        };
        match decision {
            Decision::Act(request) => self.submit_action(request).map(Some),
            Decision::Pass => self.pass_turn(me).map(|()| None),
        }
    }

    /// The presentation layer finished showing the last result.
    pub fn visual_sync_complete(&mut self) -> Result<()> {
        if self.phase != Phase::VisualSync {
            return Err(ControllerError::NotInVisualSync(self.phase));
        }
        let source = self.session.as_ref().ok_or(ControllerError::NoChallenge)?.sync;
        match source {
            SyncSource::Primary => {
                if !self.check_end() {
                    self.open_minor_window();
                }
            }
            SyncSource::Minor => self.drain_minor(),
        }
        Ok(())
    }

    // === Minor window ===

    fn open_minor_window(&mut self) {
        let Some(session) = self.session.as_ref() else {
            return;
        };
        let eligible: Vec<CombatantId> = session
            .roster
            .iter()
            .copied()
            .filter(|id| !session.minors.is_spent(*id))
            .filter(|id| self.provider.get(*id).is_some_and(Combatant::is_alive))
            .collect();

        self.phase = Phase::MinorWindow;
        tracing::debug!(eligible = eligible.len(), "minor window opened");
        self.sink.emit(CombatEvent::MinorWindowOpened { eligible });
    }

    /// Queue a minor action. The card's suit must match the action family,
    /// and named combatants and zones must exist.
    pub fn declare_minor(&mut self, request: ActionRequest) -> Result<()> {
        if self.phase != Phase::MinorWindow {
            return Err(ControllerError::NotInMinorWindow(self.phase));
        }
        let session = self.session.as_mut().ok_or(ControllerError::NoChallenge)?;
        let actor = request.actor;
        if !session.is_member(actor) {
            return Err(ControllerError::NotInChallenge(actor));
        }
        if !self.provider.get(actor).is_some_and(Combatant::is_alive) {
            return Err(ControllerError::NotLiving(actor));
        }
        if session.minors.is_spent(actor) {
            return Err(ControllerError::MinorAlreadyUsed(actor));
        }
        if let Some(target) = request.kind.target() {
            if !self.provider.contains(target) {
                return Err(ResolveError::UnknownCombatant(target).into());
            }
        }
        if let Some(zone) = request.kind.destination() {
            if !session.zones.contains(zone) {
                return Err(ResolveError::UnknownZone(zone.clone()).into());
            }
        }
        let family = request.kind.suit();
        if !request.card.suit.is_minor() || request.card.suit != family {
            return Err(ControllerError::SuitMismatch {
                card: request.card.suit,
                action: family,
            });
        }

        tracing::debug!(%actor, card = %request.card, queued = session.minors.len() + 1, "minor declared");
        session.minors.declare(request.clone());
        self.sink.emit(CombatEvent::MinorDeclared { request });
        Ok(())
    }

    /// Close declarations and resolve the queue, one entry per visual sync.
    pub fn resume_minor_window(&mut self) -> Result<()> {
        if self.phase != Phase::MinorWindow {
            return Err(ControllerError::NotInMinorWindow(self.phase));
        }
        self.drain_minor();
        Ok(())
    }

    /// Resolve the next queued minor, or resume the count if none remain.
    fn drain_minor(&mut self) {
        loop {
            let Some(session) = self.session.as_mut() else {
                return;
            };
            let Some(request) = session.minors.pop() else {
                self.phase = Phase::CountUp;
                self.advance();
                return;
            };
            if !self.provider.get(request.actor).is_some_and(Combatant::is_alive) {
                tracing::warn!(actor = %request.actor, "skipping minor action of fallen combatant");
                continue;
            }

            self.phase = Phase::Resolving;
            let mut ctx = ResolveContext::new(&mut self.provider, &session.zones, &mut self.sink);
            match self.resolver.resolve(&request, &mut ctx) {
                Ok(result) => {
                    session.sync = SyncSource::Minor;
                    self.sink.emit(CombatEvent::ActionResolved { request, result });
                    self.phase = Phase::VisualSync;
                    return;
                }
                Err(err) => {
                    tracing::warn!(actor = %request.actor, %err, "skipping rejected minor action");
                }
            }
        }
    }

    // === Rounds and count-up ===

    fn begin_round(&mut self) {
        if self.check_end() {
            return;
        }
        let Some(session) = self.session.as_mut() else {
            return;
        };

        session.round += 1;
        session.count = 0;
        session.initiative.clear();
        session.acted.clear();
        session.eligible.clear();
        session.active = None;
        session.minors.reset();
        session.awaiting = session
            .roster
            .iter()
            .copied()
            .filter(|id| self.provider.get(*id).is_some_and(Combatant::is_alive))
            .collect();

        let round = session.round;
        self.phase = Phase::PreRound;
        tracing::info!(round, "round started");
        self.sink.emit(CombatEvent::RoundStarted { round });
    }

    /// Run the count forward until someone's turn starts, a new round
    /// begins or the challenge ends. End conditions are checked before
    /// every step.
    fn advance(&mut self) {
        let max_rank = self.resolver.config().max_rank;
        loop {
            // A minor action may have decided the challenge mid-count.
            if self.check_end() {
                return;
            }
            let Some(session) = self.session.as_mut() else {
                return;
            };

            if let Some(next) = session.eligible.pop_front() {
                let ready = !session.acted.contains(&next)
                    && self.provider.get(next).is_some_and(Combatant::is_alive);
                if ready {
                    self.start_turn(next);
                    return;
                }
                continue;
            }

            if session.count >= max_rank {
                self.begin_round();
                return;
            }

            session.count += 1;
            let count = session.count;
            let mut due: Vec<&Combatant> = session
                .roster
                .iter()
                .filter(|id| !session.acted.contains(*id))
                .filter(|id| session.initiative.get(*id).is_some_and(|s| s.count(max_rank) == count))
                .filter_map(|id| self.provider.get(*id))
                .filter(|c| c.is_alive())
                .collect();
            // Stable: players first, roster order within each side.
            due.sort_by_key(|c| !c.side.is_player());
            session.eligible = due.into_iter().map(|c| c.id).collect();

            self.sink.emit(CombatEvent::CountTick { count });
        }
    }

    fn start_turn(&mut self, combatant: CombatantId) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        let Some(slot) = session.initiative.get_mut(&combatant) else {
            return;
        };
        slot.revealed = true;
        let initiative = slot.card;
        session.active = Some(combatant);

        if let Some(c) = self.provider.get_mut(combatant) {
            c.clear_condition(Condition::Defending);
        }

        self.phase = Phase::AwaitingAction;
        tracing::debug!(%combatant, %initiative, count = session.count, "turn started");
        self.sink.emit(CombatEvent::TurnStarted { combatant, initiative });
    }

    // === End conditions ===

    /// End the challenge if one side has no one standing.
    fn check_end(&mut self) -> bool {
        let Some(session) = self.session.as_ref() else {
            return false;
        };
        let living = |side: Side| {
            session
                .roster
                .iter()
                .filter_map(|id| self.provider.get(*id))
                .any(|c| c.side == side && c.is_alive())
        };

        let outcome = if !living(Side::Opponent) {
            Outcome::Victory
        } else if !living(Side::Player) {
            Outcome::Defeat
        } else {
            return false;
        };
        self.finish(outcome);
        true
    }

    fn finish(&mut self, outcome: Outcome) -> ChallengeSummary {
        self.phase = Phase::Ending;
        let session = self.session.take();
        let (rounds, roster) = session.map_or((0, Vec::new()), |s| (s.round, s.roster));

        let (survivors, fallen): (Vec<CombatantId>, Vec<CombatantId>) = roster
            .iter()
            .copied()
            .partition(|id| self.provider.get(*id).is_some_and(Combatant::is_alive));
        self.resolver.reset(&mut self.provider);

        let summary = ChallengeSummary {
            outcome,
            rounds,
            survivors,
            fallen,
        };
        tracing::info!(?outcome, rounds, "challenge ended");
        self.sink.emit(CombatEvent::ChallengeEnded {
            summary: summary.clone(),
        });
        self.last_summary = Some(summary.clone());
        self.phase = Phase::Idle;
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::Suit;
    use crate::combatant::Roster;
    use crate::core::ActionKind;
    use crate::events::EventLog;

    const ADA: CombatantId = CombatantId(1);
    const IMP: CombatantId = CombatantId(2);

    fn controller() -> TurnController<Roster, EventLog> {
        let roster = Roster::new()
            .with(Combatant::new(ADA, "Ada", Side::Player, "hall").with_attribute(Suit::Swords, 2))
            .with(Combatant::new(IMP, "Imp", Side::Opponent, "hall"));
        let mut controller = TurnController::new(roster, EventLog::new(), RulesConfig::default());
        controller
            .start_challenge(&[ADA, IMP], ZoneMap::new().with_zone("hall"), ChallengeKind::Skirmish)
            .unwrap();
        controller
    }

    #[test]
    fn test_start_requires_idle() {
        let mut controller = controller();
        assert_eq!(
            controller.start_challenge(&[ADA], ZoneMap::new().with_zone("hall"), ChallengeKind::Ambush),
            Err(ControllerError::ChallengeInProgress)
        );
    }

    #[test]
    fn test_rejected_start_leaves_idle() {
        let mut controller = TurnController::new(Roster::new(), EventLog::new(), RulesConfig::default());
        assert_eq!(
            controller.start_challenge(&[], ZoneMap::new(), ChallengeKind::Skirmish),
            Err(ControllerError::EmptyRoster)
        );
        assert_eq!(
            controller.start_challenge(&[ADA], ZoneMap::new(), ChallengeKind::Skirmish),
            Err(ControllerError::UnknownCombatant(ADA))
        );
        assert_eq!(controller.phase(), Phase::Idle);
        assert!(controller.sink().is_empty());
    }

    #[test]
    fn test_submit_action_wrong_actor() {
        let mut controller = controller();
        controller.submit_initiative(ADA, Card::new(Suit::Cups, 3)).unwrap();
        controller.submit_initiative(IMP, Card::new(Suit::Cups, 8)).unwrap();

        let request = ActionRequest::new(IMP, Card::new(Suit::Swords, 5), ActionKind::melee(ADA)).unwrap();
        assert_eq!(
            controller.submit_action(request),
            Err(ControllerError::NotActiveCombatant(IMP))
        );
        assert_eq!(controller.phase(), Phase::AwaitingAction);
    }

    #[test]
    fn test_resolve_error_keeps_phase() {
        let mut controller = controller();
        controller.submit_initiative(ADA, Card::new(Suit::Cups, 3)).unwrap();
        controller.submit_initiative(IMP, Card::new(Suit::Cups, 8)).unwrap();

        let request =
            ActionRequest::new(ADA, Card::new(Suit::Swords, 5), ActionKind::melee(CombatantId(77))).unwrap();
        let err = controller.submit_action(request).unwrap_err();

        assert!(matches!(err, ControllerError::Resolve(_)));
        assert_eq!(controller.phase(), Phase::AwaitingAction);
        assert_eq!(controller.active(), Some(ADA));
    }

    #[test]
    fn test_defending_lapses_at_turn_start() {
        let mut controller = controller();
        controller.submit_initiative(ADA, Card::new(Suit::Cups, 3)).unwrap();
        controller.submit_initiative(IMP, Card::new(Suit::Cups, 8)).unwrap();

        let defend = ActionRequest::new(
            ADA,
            Card::new(Suit::Cups, 10),
            ActionKind::Support(crate::core::Support::Defend),
        )
        .unwrap();
        assert!(controller.submit_action(defend).unwrap().success);
        assert!(controller.combatants().get(ADA).unwrap().has(Condition::Defending));

        controller.visual_sync_complete().unwrap();
        controller.resume_minor_window().unwrap();
        // Imp's turn
        controller.pass_turn(IMP).unwrap();
        controller.resume_minor_window().unwrap();
        // New round; Ada's next turn clears the stance.
        controller.submit_initiative(ADA, Card::new(Suit::Cups, 1)).unwrap();
        controller.submit_initiative(IMP, Card::new(Suit::Cups, 2)).unwrap();

        assert_eq!(controller.active(), Some(ADA));
        assert!(!controller.combatants().get(ADA).unwrap().has(Condition::Defending));
    }

    #[test]
    fn test_combatants_mut_only_between_challenges() {
        let mut controller = controller();
        assert!(controller.combatants_mut().is_none());

        controller.end_challenge().unwrap();
        let roster = controller.combatants_mut().expect("idle controller allows setup");
        roster.insert(Combatant::new(CombatantId(3), "Bat", Side::Opponent, "hall"));
        assert!(controller.combatants().contains(CombatantId(3)));
    }
}
