//! Banked "aid another" bonuses.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::core::CombatantId;

/// A one-shot bonus waiting for its recipient's next action.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BankedAid {
    pub bonus: i32,
    /// Name of the helper, for descriptions.
    pub source: String,
}

/// Pending aid per recipient. A new aid replaces an unspent one.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct AidBank {
    entries: FxHashMap<CombatantId, BankedAid>,
}

impl AidBank {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Bank a bonus for `target`.
    pub fn bank(&mut self, target: CombatantId, bonus: i32, source: impl Into<String>) {
        self.entries.insert(
            target,
            BankedAid {
                bonus,
                source: source.into(),
            },
        );
    }

    /// Peek at the pending bonus for `target`.
    #[must_use]
    pub fn pending(&self, target: CombatantId) -> Option<&BankedAid> {
        self.entries.get(&target)
    }

    /// Remove and return the pending bonus for `target`.
    pub fn consume(&mut self, target: CombatantId) -> Option<BankedAid> {
        self.entries.remove(&target)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
