//! Wound pipeline tests through the resolver.
//!
//! Wounds enter through `ActionResolver::apply_wound`, which announces
//! every absorbed step and cleans up after a kill.

use tarot_tactics::combatant::{Combatant, CombatantProvider, Condition, DamageClass, Roster, Side, WoundTag};
use tarot_tactics::core::{CombatantId, RulesConfig};
use tarot_tactics::events::{CombatEvent, EventLog};
use tarot_tactics::resolver::{ActionResolver, ResolveContext};
use tarot_tactics::zones::ZoneMap;

const KNIGHT: CombatantId = CombatantId(1);
const SQUIRE: CombatantId = CombatantId(2);

fn setup(knight: Combatant) -> (Roster, ZoneMap, EventLog, ActionResolver) {
    let roster = Roster::new()
        .with(knight)
        .with(Combatant::new(SQUIRE, "Squire", Side::Player, "keep"));
    (
        roster,
        ZoneMap::new().with_zone("keep"),
        EventLog::new(),
        ActionResolver::new(RulesConfig::default()),
    )
}

fn knight() -> Combatant {
    Combatant::new(KNIGHT, "Knight", Side::Opponent, "keep")
}

#[test]
fn test_four_wounds_walk_the_ladder() {
    let (mut roster, zones, mut log, mut resolver) = setup(knight());
    let mut ctx = ResolveContext::new(&mut roster, &zones, &mut log);

    let tags: Vec<WoundTag> = (0..4)
        .map(|_| resolver.apply_wound(KNIGHT, DamageClass::Normal, &mut ctx).unwrap())
        .collect();

    assert_eq!(
        tags,
        vec![WoundTag::Staggered, WoundTag::Injured, WoundTag::DeathsDoor, WoundTag::Dead]
    );
    assert!(roster.get(KNIGHT).unwrap().is_dead());
    assert_eq!(log.wounds_on(KNIGHT), tags);
}

#[test]
fn test_layers_absorb_in_order() {
    let armored = knight().with_armor(1).with_talents(["Shield Wall", "Grit"], 1);
    let (mut roster, zones, mut log, mut resolver) = setup(armored);
    let mut ctx = ResolveContext::new(&mut roster, &zones, &mut log);

    let tags: Vec<WoundTag> = (0..6)
        .map(|_| resolver.apply_wound(KNIGHT, DamageClass::Normal, &mut ctx).unwrap())
        .collect();

    assert_eq!(
        tags,
        vec![
            WoundTag::Armor,
            WoundTag::Talent,
            WoundTag::Staggered,
            WoundTag::Injured,
            WoundTag::DeathsDoor,
            WoundTag::Dead,
        ]
    );
    let knight = roster.get(KNIGHT).unwrap();
    assert_eq!(knight.armor_notches(), 0);
    assert_eq!(knight.talent_wounds(), 1);
}

#[test]
fn test_wounding_the_dead_changes_nothing() {
    let (mut roster, zones, mut log, mut resolver) = setup(knight().with_condition(Condition::Dead).with_armor(1));
    let before = roster.get(KNIGHT).unwrap().clone();
    let mut ctx = ResolveContext::new(&mut roster, &zones, &mut log);

    for class in [DamageClass::Normal, DamageClass::Piercing, DamageClass::Critical] {
        assert_eq!(resolver.apply_wound(KNIGHT, class, &mut ctx).unwrap(), WoundTag::Dead);
    }
    assert_eq!(roster.get(KNIGHT).unwrap(), &before);
}

#[test]
fn test_kill_breaks_engagements() {
    let doomed = knight()
        .with_condition(Condition::Staggered)
        .with_condition(Condition::Injured)
        .with_condition(Condition::DeathsDoor);
    let (mut roster, zones, mut log, mut resolver) = setup(doomed);
    let mut ctx = ResolveContext::new(&mut roster, &zones, &mut log);

    resolver.form_engagement(KNIGHT, SQUIRE, &mut ctx).unwrap();
    assert_eq!(resolver.apply_wound(KNIGHT, DamageClass::Critical, &mut ctx).unwrap(), WoundTag::Dead);

    assert!(resolver.engagement().pairs().is_empty());
    assert!(!roster.get(SQUIRE).unwrap().is_engaged());
    assert!(log.events().iter().any(|e| matches!(
        e,
        CombatEvent::EngagementBroken { a, b } if *a == KNIGHT && *b == SQUIRE
    )));
}

#[test]
fn test_unknown_target_is_rejected() {
    let (mut roster, zones, mut log, mut resolver) = setup(knight());
    let mut ctx = ResolveContext::new(&mut roster, &zones, &mut log);

    assert!(resolver.apply_wound(CombatantId(99), DamageClass::Normal, &mut ctx).is_err());
    assert!(log.is_empty());
}
