//! Rules configuration.
//!
//! Every tunable number the resolver, controller and opponent policy use
//! lives in [`RulesConfig`]. Front-ends usually keep the defaults; tests and
//! variant rule sets override individual values with the `with_*` builders.

use serde::{Deserialize, Serialize};

/// Tunable rule constants.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RulesConfig {
    /// Highest face value in the deck. The count-up runs `1..=max_rank`.
    pub max_rank: u8,

    /// Lowest rank that counts as a face rank (Page, Queen, King).
    pub face_rank_floor: u8,

    /// Difficulty for tests that are not opposed by a target.
    pub baseline_difficulty: i32,

    /// Base of a target-derived difficulty, before the opposing attribute.
    pub target_base_defense: i32,

    /// Attribute value (for the card's suit) needed for a great success.
    pub great_attribute_threshold: i32,

    /// Difficulty bonus while a target holds a defensive stance.
    pub defend_bonus: i32,

    /// Test penalty for firing a ranged weapon while engaged.
    pub ranged_engaged_penalty: i32,

    /// Bonus banked by a plain "aid another".
    pub aid_bonus: i32,

    /// Bonus banked by a great "aid another".
    pub great_aid_bonus: i32,

    /// Attack bonus per allied non-player sharing the attacker's zone.
    pub mob_rule_bonus: i32,

    /// Attack penalty for a prone attacker, and defense penalty for a prone target.
    pub prone_penalty: i32,

    /// Test penalty for a stressed actor.
    pub stressed_penalty: i32,

    /// Attack penalty for a frightened actor.
    pub frightened_penalty: i32,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            max_rank: 13,
            face_rank_floor: 11,
            baseline_difficulty: 10,
            target_base_defense: 8,
            great_attribute_threshold: 2,
            defend_bonus: 2,
            ranged_engaged_penalty: 3,
            aid_bonus: 2,
            great_aid_bonus: 4,
            mob_rule_bonus: 1,
            prone_penalty: 2,
            stressed_penalty: 1,
            frightened_penalty: 2,
        }
    }
}

impl RulesConfig {
    /// Override the deck ceiling.
    pub fn with_max_rank(mut self, max_rank: u8) -> Self {
        self.max_rank = max_rank;
        self
    }

    /// Override the unopposed difficulty.
    pub fn with_baseline_difficulty(mut self, difficulty: i32) -> Self {
        self.baseline_difficulty = difficulty;
        self
    }

    /// Override the base of target-derived difficulties.
    pub fn with_target_base_defense(mut self, defense: i32) -> Self {
        self.target_base_defense = defense;
        self
    }

    /// Override the great-success attribute threshold.
    pub fn with_great_attribute_threshold(mut self, threshold: i32) -> Self {
        self.great_attribute_threshold = threshold;
        self
    }

    /// Override the per-ally mob rule bonus.
    pub fn with_mob_rule_bonus(mut self, bonus: i32) -> Self {
        self.mob_rule_bonus = bonus;
        self
    }

    /// Override the ranged-while-engaged penalty.
    pub fn with_ranged_engaged_penalty(mut self, penalty: i32) -> Self {
        self.ranged_engaged_penalty = penalty;
        self
    }

    /// Check whether a rank is one of the face ranks.
    #[must_use]
    pub fn is_face_rank(&self, rank: u8) -> bool {
        rank >= self.face_rank_floor && rank <= self.max_rank
    }
}
