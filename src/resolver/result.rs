//! Resolution results.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::combatant::WoundTag;
use crate::core::CombatantId;

/// A side effect of a resolved action, for presentation and AI.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectTag {
    Hit,
    Miss,
    Great,
    GreatFailure,
    Engaged,
    Disengaged,
    Riposted,
    Dodged,
    Critical,
    Piercing,
    Crushing,
    Cleave,
    Defeated,
    PartingBlow,
    Prone,
    Disarmed,
    Rooted,
    Displaced,
    Defending,
    DodgeReady,
    RiposteReady,
    Healed,
    AidBanked,
    AidConsumed,
    Stressed,
    Frightened,
    Recovered,
    Moved,
    MoveBlocked,
    MobRule,
    // Resource failures
    OutOfAmmo,
    NoRangedWeapon,
    OutOfReach,
    NotAdjacent,
    NoValidTarget,
    /// A rooted combatant tried to leave its zone.
    HeldFast,
}

impl EffectTag {
    /// Check if the tag marks a resource failure (the action whiffed).
    #[must_use]
    pub const fn is_resource_failure(self) -> bool {
        matches!(
            self,
            EffectTag::OutOfAmmo
                | EffectTag::NoRangedWeapon
                | EffectTag::OutOfReach
                | EffectTag::NotAdjacent
                | EffectTag::NoValidTarget
                | EffectTag::HeldFast
        )
    }
}

/// One wound as it landed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WoundRecord {
    pub target: CombatantId,
    pub tag: WoundTag,
}

/// Outcome of resolving one action request.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionResult {
    pub success: bool,
    /// Great success when `success`, great failure otherwise.
    pub great: bool,
    /// Every wound the action caused, in order (including parting blows and counters).
    pub wounds: SmallVec<[WoundRecord; 4]>,
    pub tags: SmallVec<[EffectTag; 6]>,
    pub description: String,
    pub test_value: i32,
    pub difficulty: i32,
}

impl ActionResult {
    /// A failed action that never reached a test.
    pub fn whiff(tag: EffectTag, description: impl Into<String>) -> Self {
        let mut result = Self {
            description: description.into(),
            ..Self::default()
        };
        result.tags.push(tag);
        result
    }

    #[must_use]
    pub fn has_tag(&self, tag: EffectTag) -> bool {
        self.tags.contains(&tag)
    }

    /// Number of wounds that reached the target's wound ladder or defenses.
    #[must_use]
    pub fn wounds_dealt(&self) -> usize {
        self.wounds.len()
    }

    /// Wounds landed on one combatant.
    pub fn wounds_on(&self, target: CombatantId) -> impl Iterator<Item = WoundTag> + '_ {
        self.wounds
            .iter()
            .filter(move |w| w.target == target)
            .map(|w| w.tag)
    }

    pub(crate) fn tag(&mut self, tag: EffectTag) {
        if !self.tags.contains(&tag) {
            self.tags.push(tag);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whiff() {
        let result = ActionResult::whiff(EffectTag::OutOfAmmo, "quiver is empty");
        assert!(!result.success);
        assert!(result.has_tag(EffectTag::OutOfAmmo));
        assert!(EffectTag::OutOfAmmo.is_resource_failure());
        assert_eq!(result.wounds_dealt(), 0);
    }

    #[test]
    fn test_rooted_is_an_effect_not_a_failure() {
        assert!(!EffectTag::Rooted.is_resource_failure());
        assert!(EffectTag::HeldFast.is_resource_failure());
    }

    #[test]
    fn test_tags_deduplicated() {
        let mut result = ActionResult::default();
        result.tag(EffectTag::Hit);
        result.tag(EffectTag::Hit);
        assert_eq!(result.tags.len(), 1);
    }

    #[test]
    fn test_wounds_on() {
        let mut result = ActionResult::default();
        result.wounds.push(WoundRecord { target: CombatantId(1), tag: WoundTag::Armor });
        result.wounds.push(WoundRecord { target: CombatantId(2), tag: WoundTag::Staggered });
        result.wounds.push(WoundRecord { target: CombatantId(1), tag: WoundTag::Staggered });

        let on_one: Vec<WoundTag> = result.wounds_on(CombatantId(1)).collect();
        assert_eq!(on_one, vec![WoundTag::Armor, WoundTag::Staggered]);
    }

    #[test]
    fn test_serialization() {
        let result = ActionResult::whiff(EffectTag::NotAdjacent, "too far");
        let json = serde_json::to_string(&result).unwrap();
        assert!(json.contains("not_adjacent"));
        let deserialized: ActionResult = serde_json::from_str(&json).unwrap();
        assert_eq!(result, deserialized);
    }
}
