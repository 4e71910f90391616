//! The wound pipeline.
//!
//! A single wound is absorbed by the first defense layer that can take it:
//!
//! ```text
//! armor notch → talent wound → staggered → injured → death's door → dead
//! ```
//!
//! - `Critical` wounds skip armor, talents and staggered and land on the
//!   injured step.
//! - `Piercing` wounds skip armor only.
//! - Wounding the dead changes nothing and reports `Dead` again.

use serde::{Deserialize, Serialize};

use super::conditions::Condition;
use super::model::Combatant;

/// How a wound enters the pipeline.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DamageClass {
    #[default]
    Normal,
    Piercing,
    Critical,
}

/// Which layer absorbed a wound.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WoundTag {
    Armor,
    Talent,
    Staggered,
    Injured,
    DeathsDoor,
    Dead,
}

impl WoundTag {
    /// Check if the wound reached the wound ladder (not absorbed by gear or talent).
    #[must_use]
    pub const fn is_condition(self) -> bool {
        !matches!(self, WoundTag::Armor | WoundTag::Talent)
    }
}

impl Combatant {
    /// Run one wound through the pipeline.
    pub(crate) fn apply_wound(&mut self, class: DamageClass) -> WoundTag {
        if self.is_dead() {
            return WoundTag::Dead;
        }

        if class == DamageClass::Critical {
            return self.escalate_from(1);
        }

        if class == DamageClass::Normal && self.armor_notches > 0 {
            self.armor_notches -= 1;
            return WoundTag::Armor;
        }

        if self.talent_wounds < self.talent_wound_capacity() {
            self.talent_wounds += 1;
            return WoundTag::Talent;
        }

        self.escalate_from(0)
    }

    /// Set the first unset condition on the ladder, starting at `step`.
    fn escalate_from(&mut self, step: usize) -> WoundTag {
        const LADDER: [(Condition, WoundTag); 3] = [
            (Condition::Staggered, WoundTag::Staggered),
            (Condition::Injured, WoundTag::Injured),
            (Condition::DeathsDoor, WoundTag::DeathsDoor),
        ];

        for (condition, tag) in &LADDER[step..] {
            if self.set_condition(*condition) {
                return *tag;
            }
        }

        self.set_condition(Condition::Dead);
        WoundTag::Dead
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combatant::Side;
    use crate::core::CombatantId;

    fn target() -> Combatant {
        Combatant::new(CombatantId(5), "Target", Side::Opponent, "pit")
    }

    #[test]
    fn test_bare_escalation() {
        let mut c = target();
        let tags: Vec<WoundTag> = (0..5).map(|_| c.apply_wound(DamageClass::Normal)).collect();
        assert_eq!(
            tags,
            vec![
                WoundTag::Staggered,
                WoundTag::Injured,
                WoundTag::DeathsDoor,
                WoundTag::Dead,
                WoundTag::Dead,
            ]
        );
    }

    #[test]
    fn test_armor_first_then_talents() {
        let mut c = target().with_armor(1).with_talents(["Iron Will"], 2);

        assert_eq!(c.apply_wound(DamageClass::Normal), WoundTag::Armor);
        assert_eq!(c.armor_notches(), 0);
        assert_eq!(c.apply_wound(DamageClass::Normal), WoundTag::Talent);
        // Capacity is bounded by the single talent held.
        assert_eq!(c.apply_wound(DamageClass::Normal), WoundTag::Staggered);
    }

    #[test]
    fn test_piercing_skips_armor() {
        let mut c = target().with_armor(2);
        assert_eq!(c.apply_wound(DamageClass::Piercing), WoundTag::Staggered);
        assert_eq!(c.armor_notches(), 2);
    }

    #[test]
    fn test_piercing_still_hits_talents() {
        let mut c = target().with_armor(2).with_talents(["Dodge"], 1);
        assert_eq!(c.apply_wound(DamageClass::Piercing), WoundTag::Talent);
    }

    #[test]
    fn test_critical_skips_to_injured() {
        let mut c = target().with_armor(3).with_talents(["A", "B"], 2);
        assert_eq!(c.apply_wound(DamageClass::Critical), WoundTag::Injured);
        assert!(!c.has(Condition::Staggered));
        assert_eq!(c.armor_notches(), 3);
        assert_eq!(c.talent_wounds(), 0);

        assert_eq!(c.apply_wound(DamageClass::Critical), WoundTag::DeathsDoor);
        assert_eq!(c.apply_wound(DamageClass::Critical), WoundTag::Dead);
    }

    #[test]
    fn test_dead_is_terminal() {
        let mut c = target().with_armor(1).with_condition(Condition::Dead);
        let before = c.clone();
        assert_eq!(c.apply_wound(DamageClass::Normal), WoundTag::Dead);
        assert_eq!(c, before);
    }

    #[test]
    fn test_normal_after_critical_fills_staggered() {
        let mut c = target();
        c.apply_wound(DamageClass::Critical);
        assert_eq!(c.apply_wound(DamageClass::Normal), WoundTag::Staggered);
        assert_eq!(c.apply_wound(DamageClass::Normal), WoundTag::DeathsDoor);
    }
}
