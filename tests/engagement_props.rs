//! Property tests for the engagement relation and the wound pipeline.

use proptest::prelude::*;

use tarot_tactics::combatant::{Combatant, CombatantProvider, Condition, DamageClass, Roster, Side, WoundTag};
use tarot_tactics::core::{CombatantId, RulesConfig};
use tarot_tactics::events::EventLog;
use tarot_tactics::resolver::{ActionResolver, ResolveContext};
use tarot_tactics::zones::ZoneMap;

#[derive(Clone, Debug)]
enum Op {
    Form(u32, u32),
    Break(u32, u32),
    Clear(u32),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (1u32..=5, 1u32..=5).prop_map(|(a, b)| Op::Form(a, b)),
        (1u32..=5, 1u32..=5).prop_map(|(a, b)| Op::Break(a, b)),
        (1u32..=5).prop_map(Op::Clear),
    ]
}

fn class() -> impl Strategy<Value = DamageClass> {
    prop_oneof![
        Just(DamageClass::Normal),
        Just(DamageClass::Piercing),
        Just(DamageClass::Critical),
    ]
}

fn roster() -> Roster {
    (1..=5).fold(Roster::new(), |roster, n| {
        let side = if n % 2 == 0 { Side::Opponent } else { Side::Player };
        roster.with(Combatant::new(CombatantId(n), format!("C{n}"), side, "arena"))
    })
}

proptest! {
    #[test]
    fn proptest_engagement_stays_symmetric(ops in prop::collection::vec(op(), 0..40)) {
        let mut roster = roster();
        let zones = ZoneMap::new().with_zone("arena");
        let mut log = EventLog::new();
        let mut resolver = ActionResolver::new(RulesConfig::default());

        for op in &ops {
            let mut ctx = ResolveContext::new(&mut roster, &zones, &mut log);
            let outcome = match *op {
                Op::Form(a, b) => resolver.form_engagement(CombatantId(a), CombatantId(b), &mut ctx).map(|_| ()),
                Op::Break(a, b) => resolver.break_engagement(CombatantId(a), CombatantId(b), &mut ctx).map(|_| ()),
                Op::Clear(a) => resolver.clear_engagements(CombatantId(a), &mut ctx).map(|_| ()),
            };
            if let Op::Form(a, b) = *op {
                prop_assert_eq!(outcome.is_err(), a == b);
            }

            let table = resolver.engagement();
            prop_assert!(table.is_symmetric());
            for id in roster.ids() {
                prop_assert_eq!(roster.get(id).unwrap().is_engaged(), table.is_engaged(id));
                prop_assert!(!table.are_engaged(id, id));
            }
        }
    }

    #[test]
    fn proptest_form_then_break_restores_flags(a in 1u32..=5, b in 1u32..=5) {
        prop_assume!(a != b);
        let mut roster = roster();
        let zones = ZoneMap::new().with_zone("arena");
        let mut log = EventLog::new();
        let mut resolver = ActionResolver::new(RulesConfig::default());
        let mut ctx = ResolveContext::new(&mut roster, &zones, &mut log);

        prop_assert!(resolver.form_engagement(CombatantId(a), CombatantId(b), &mut ctx).unwrap());
        prop_assert!(resolver.break_engagement(CombatantId(b), CombatantId(a), &mut ctx).unwrap());
        prop_assert!(resolver.engagement().pairs().is_empty());

        for id in roster.ids() {
            prop_assert!(!roster.get(id).unwrap().is_engaged());
        }
    }

    #[test]
    fn proptest_wounds_only_escalate(
        armor in 0u8..3,
        talents in 0u8..3,
        classes in prop::collection::vec(class(), 0..12),
    ) {
        let names: Vec<String> = (0..talents).map(|n| format!("Talent {n}")).collect();
        let mut roster = Roster::new().with(
            Combatant::new(CombatantId(1), "Target", Side::Opponent, "arena")
                .with_armor(armor)
                .with_talents(names, talents),
        );
        let zones = ZoneMap::new().with_zone("arena");
        let mut log = EventLog::new();
        let mut resolver = ActionResolver::new(RulesConfig::default());

        let mut level = 0;
        for class in classes {
            let mut ctx = ResolveContext::new(&mut roster, &zones, &mut log);
            let tag = resolver.apply_wound(CombatantId(1), class, &mut ctx).unwrap();
            let target = roster.get(CombatantId(1)).unwrap();

            prop_assert!(target.conditions().wound_level() >= level);
            level = target.conditions().wound_level();
            prop_assert_eq!(tag == WoundTag::Dead, target.has(Condition::Dead));
        }
    }

    #[test]
    fn proptest_dead_is_terminal(class in class(), repeats in 1usize..5) {
        let dead = Combatant::new(CombatantId(1), "Corpse", Side::Opponent, "arena")
            .with_armor(2)
            .with_condition(Condition::Dead);
        let mut roster = Roster::new().with(dead.clone());
        let zones = ZoneMap::new().with_zone("arena");
        let mut log = EventLog::new();
        let mut resolver = ActionResolver::new(RulesConfig::default());

        for _ in 0..repeats {
            let mut ctx = ResolveContext::new(&mut roster, &zones, &mut log);
            prop_assert_eq!(resolver.apply_wound(CombatantId(1), class, &mut ctx).unwrap(), WoundTag::Dead);
        }
        prop_assert_eq!(roster.get(CombatantId(1)).unwrap(), &dead);
    }
}
