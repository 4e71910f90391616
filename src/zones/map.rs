//! Encounter zone topology.
//!
//! A challenge takes place across a handful of named zones ("doorway",
//! "altar", "balcony"). Zones are linked by undirected adjacency; moving
//! is only possible between adjacent zones.

use std::collections::VecDeque;

use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};

/// Zone identifier: a string key into the encounter's zone set.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ZoneId(pub String);

impl ZoneId {
    /// Create a new zone ID.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The zone key.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ZoneId {
    fn from(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl std::fmt::Display for ZoneId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// The zones of one encounter and how they connect.
///
/// ```
/// use tarot_tactics::zones::{ZoneId, ZoneMap};
///
/// let map = ZoneMap::new()
///     .with_link("gate", "hall")
///     .with_link("hall", "altar");
///
/// assert!(map.are_adjacent(&"gate".into(), &"hall".into()));
/// assert_eq!(map.distance(&"gate".into(), &"altar".into()), Some(2));
/// assert_eq!(map.next_step(&"gate".into(), &"altar".into()), Some(ZoneId::new("hall")));
/// ```
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ZoneMap {
    /// Zones in declaration order.
    zones: Vec<ZoneId>,
    links: FxHashMap<ZoneId, FxHashSet<ZoneId>>,
}

impl ZoneMap {
    /// Create an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a zone (builder pattern). Adding an existing zone is a no-op.
    #[must_use]
    pub fn with_zone(mut self, zone: impl Into<ZoneId>) -> Self {
        self.add_zone(zone.into());
        self
    }

    /// Link two zones, adding either if missing (builder pattern).
    #[must_use]
    pub fn with_link(mut self, a: impl Into<ZoneId>, b: impl Into<ZoneId>) -> Self {
        self.link(a.into(), b.into());
        self
    }

    /// Add a zone.
    pub fn add_zone(&mut self, zone: ZoneId) {
        if !self.links.contains_key(&zone) {
            self.links.insert(zone.clone(), FxHashSet::default());
            self.zones.push(zone);
        }
    }

    /// Link two zones symmetrically.
    pub fn link(&mut self, a: ZoneId, b: ZoneId) {
        self.add_zone(a.clone());
        self.add_zone(b.clone());
        if a == b {
            return;
        }
        if let Some(neighbors) = self.links.get_mut(&a) {
            neighbors.insert(b.clone());
        }
        if let Some(neighbors) = self.links.get_mut(&b) {
            neighbors.insert(a);
        }
    }

    /// Check if a zone exists.
    #[must_use]
    pub fn contains(&self, zone: &ZoneId) -> bool {
        self.links.contains_key(zone)
    }

    /// All zones in declaration order.
    #[must_use]
    pub fn zones(&self) -> &[ZoneId] {
        &self.zones
    }

    /// Number of zones.
    #[must_use]
    pub fn len(&self) -> usize {
        self.zones.len()
    }

    /// Check if the map has no zones.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }

    /// Check if two distinct zones are directly linked.
    #[must_use]
    pub fn are_adjacent(&self, a: &ZoneId, b: &ZoneId) -> bool {
        self.links.get(a).is_some_and(|n| n.contains(b))
    }

    /// Neighbors of a zone, sorted for deterministic iteration.
    #[must_use]
    pub fn neighbors(&self, zone: &ZoneId) -> Vec<ZoneId> {
        let mut neighbors: Vec<ZoneId> = self
            .links
            .get(zone)
            .map(|n| n.iter().cloned().collect())
            .unwrap_or_default();
        neighbors.sort();
        neighbors
    }

    /// Number of moves between two zones, or `None` if unreachable.
    #[must_use]
    pub fn distance(&self, from: &ZoneId, to: &ZoneId) -> Option<usize> {
        self.path(from, to).map(|p| p.len())
    }

    /// The first zone to move into on a shortest path from `from` to `to`.
    ///
    /// Returns `None` when already there or unreachable.
    #[must_use]
    pub fn next_step(&self, from: &ZoneId, to: &ZoneId) -> Option<ZoneId> {
        self.path(from, to).and_then(|p| p.into_iter().next())
    }

    /// Shortest path (excluding `from`) by breadth-first search.
    fn path(&self, from: &ZoneId, to: &ZoneId) -> Option<Vec<ZoneId>> {
        if !self.contains(from) || !self.contains(to) {
            return None;
        }
        if from == to {
            return Some(Vec::new());
        }

        let mut came_from: FxHashMap<ZoneId, ZoneId> = FxHashMap::default();
        let mut queue = VecDeque::new();
        queue.push_back(from.clone());

        while let Some(current) = queue.pop_front() {
            for next in self.neighbors(&current) {
                if next == *from || came_from.contains_key(&next) {
                    continue;
                }
                came_from.insert(next.clone(), current.clone());
                if next == *to {
                    let mut path = vec![next.clone()];
                    let mut cursor = current;
                    while cursor != *from {
                        path.push(cursor.clone());
                        cursor = came_from[&cursor].clone();
                    }
                    path.reverse();
                    return Some(path);
                }
                queue.push_back(next);
            }
        }

        None
    }
}
